use anyhow::Result;
use debate_arena::cli;

#[tokio::main]
async fn main() -> Result<()> {
    cli::run().await
}
