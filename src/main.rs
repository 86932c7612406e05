use clap::Parser;
use tender_eval_api::cli::{self, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Api => cli::api::run().await,
    }
}
