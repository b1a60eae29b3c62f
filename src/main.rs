use airquality_processor::cli::{run, Cli};
use anyhow::Context;
use clap::Parser;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    run(cli).await.context("airquality-processor failed")
}
