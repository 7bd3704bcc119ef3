//! Client library for the TestAI authentication and onboarding API.
//!
//! The crate is split along the session lifecycle:
//!
//! - [`store`]: file-backed credential storage (access/refresh tokens plus the
//!   cached user profile), written atomically so readers never observe a
//!   half-updated session.
//! - [`client`]: the HTTP layer. Attaches the bearer token on every request,
//!   clears the store and broadcasts an "unauthenticated" signal on `401`.
//! - [`auth`]: typed operations, one per API endpoint, and the structured
//!   error contract shared with the server.
//! - [`flow`]: the onboarding funnel (register, email verification polling,
//!   phone verification, login branching).
//! - [`guard`]: pre-flight authentication checks for protected actions.
//! - [`cli`]: command-line front end driving all of the above.

pub mod auth;
pub mod cli;
pub mod client;
pub mod flow;
pub mod guard;
pub mod store;
