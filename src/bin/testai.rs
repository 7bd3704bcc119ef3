use anyhow::Result;
use testai::cli::{actions, start};

#[tokio::main]
async fn main() -> Result<()> {
    let (action, globals) = start()?;

    actions::run(action, &globals).await
}
