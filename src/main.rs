use clap::Parser;
use surge_keeper::adapter::inbound::cli::command::Cli;
use surge_keeper::adapter::inbound::cli::{dispatch, output};
use tracing::error;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    if let Err(e) = dispatch::dispatch(cli).await {
        error!(error = %e, "Command failed");
        output::error(&e.to_string());
        std::process::exit(1);
    }
}
