//! Request/response types for the auth endpoints, plus client-side
//! validation of user submissions.

use crate::auth::error::ValidationErrors;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

/// Role assigned on registration when the caller does not pick one.
pub const DEFAULT_ROLE: &str = "MANAGER";

/// A registration submission. Lives only in memory for the duration of the
/// request; never persisted.
pub struct RegisterDraft {
    pub name: String,
    pub email: String,
    pub password: SecretString,
    pub confirm_password: SecretString,
    pub phone_number: Option<String>,
    pub company: Option<String>,
    pub role: Option<String>,
}

impl RegisterDraft {
    /// Check the draft before submission. A failing draft never reaches the
    /// wire; all violations are reported, not just the first.
    ///
    /// # Errors
    /// Returns every failing field with its message.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();

        if self.name.chars().count() < 2 {
            errors.push("name", "must be at least 2 characters");
        }
        if !self.email.contains('@') {
            errors.push("email", "must be a valid email address");
        }
        if self.password.expose_secret().chars().count() < 8 {
            errors.push("password", "must be at least 8 characters");
        }
        if self.password.expose_secret() != self.confirm_password.expose_secret() {
            errors.push("confirmPassword", "passwords do not match");
        }
        if let Some(phone) = &self.phone_number {
            if phone.chars().count() < 10 {
                errors.push("phoneNumber", "must be at least 10 digits");
            }
        }

        errors.into_result()
    }
}

impl std::fmt::Debug for RegisterDraft {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterDraft")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"***")
            .field("confirm_password", &"***")
            .field("phone_number", &self.phone_number)
            .field("company", &self.company)
            .field("role", &self.role)
            .finish()
    }
}

/// Check a phone verification code: exactly 6 digits.
///
/// # Errors
/// Returns a field error on the code when it does not match.
pub fn validate_phone_code(code: &str) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();
    if code.len() != 6 || !code.bytes().all(|b| b.is_ascii_digit()) {
        errors.push("code", "must be exactly 6 digits");
    }
    errors.into_result()
}

/// Check a password-reset submission before it goes out.
///
/// # Errors
/// Returns every failing field with its message.
pub fn validate_new_password(
    new_password: &SecretString,
    confirm_password: &SecretString,
) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();
    if new_password.expose_secret().chars().count() < 8 {
        errors.push("newPassword", "must be at least 8 characters");
    }
    if new_password.expose_secret() != confirm_password.expose_secret() {
        errors.push("confirmPassword", "passwords do not match");
    }
    errors.into_result()
}

/// Generic `{message}` success envelope used by most write endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessageResponse {
    pub message: Option<String>,
}

/// Response of `GET /auth/verify-email`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyEmailResponse {
    pub message: Option<String>,
    pub phone_verified: Option<bool>,
    pub requires_phone_verification: Option<bool>,
}

impl VerifyEmailResponse {
    /// Whether the account still needs the phone step after this email
    /// confirmation. Mirrors the original routing: phone already verified or
    /// not required means the account is fully active.
    #[must_use]
    pub fn needs_phone_verification(&self) -> bool {
        !self.phone_verified.unwrap_or(false) && self.requires_phone_verification.unwrap_or(false)
    }
}

/// Response of `GET /auth/check-verification-status`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationStatus {
    pub email_verified: bool,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn draft() -> RegisterDraft {
        RegisterDraft {
            name: "Al".to_string(),
            email: "a@b.com".to_string(),
            password: SecretString::from("longenough1".to_string()),
            confirm_password: SecretString::from("longenough1".to_string()),
            phone_number: None,
            company: None,
            role: None,
        }
    }

    #[test]
    fn minimal_valid_draft_passes() {
        draft().validate().unwrap();
    }

    #[test]
    fn short_name_is_rejected() {
        let mut d = draft();
        d.name = "A".to_string();
        let err = d.validate().unwrap_err();
        assert_eq!(err.errors()[0].field, "name");
    }

    #[test]
    fn email_without_at_is_rejected() {
        let mut d = draft();
        d.email = "nobody.example.com".to_string();
        assert!(d.validate().is_err());
    }

    #[test]
    fn short_password_is_rejected() {
        let mut d = draft();
        d.password = SecretString::from("short".to_string());
        d.confirm_password = SecretString::from("short".to_string());
        let err = d.validate().unwrap_err();
        assert_eq!(err.errors()[0].field, "password");
    }

    #[test]
    fn mismatched_passwords_are_rejected() {
        let mut d = draft();
        d.confirm_password = SecretString::from("different1".to_string());
        let err = d.validate().unwrap_err();
        assert_eq!(err.errors()[0].field, "confirmPassword");
    }

    #[test]
    fn short_phone_number_is_rejected() {
        let mut d = draft();
        d.phone_number = Some("12345".to_string());
        let err = d.validate().unwrap_err();
        assert_eq!(err.errors()[0].field, "phoneNumber");
    }

    #[test]
    fn all_violations_are_collected() {
        let d = RegisterDraft {
            name: "A".to_string(),
            email: "bad".to_string(),
            password: SecretString::from("short".to_string()),
            confirm_password: SecretString::from("other".to_string()),
            phone_number: Some("123".to_string()),
            company: None,
            role: None,
        };
        let err = d.validate().unwrap_err();
        assert_eq!(err.errors().len(), 5);
    }

    #[test]
    fn phone_code_must_be_six_digits() {
        validate_phone_code("123456").unwrap();
        assert!(validate_phone_code("12345").is_err());
        assert!(validate_phone_code("1234567").is_err());
        assert!(validate_phone_code("12345a").is_err());
    }

    #[test]
    fn draft_debug_redacts_passwords() {
        let rendered = format!("{:?}", draft());
        assert!(!rendered.contains("longenough1"));
    }

    #[test]
    fn verify_email_routing() {
        let needs_phone = VerifyEmailResponse {
            message: None,
            phone_verified: Some(false),
            requires_phone_verification: Some(true),
        };
        assert!(needs_phone.needs_phone_verification());

        let phone_done = VerifyEmailResponse {
            message: None,
            phone_verified: Some(true),
            requires_phone_verification: Some(true),
        };
        assert!(!phone_done.needs_phone_verification());

        // Absent flags mean the phone step is not required.
        assert!(!VerifyEmailResponse::default().needs_phone_verification());
    }
}
