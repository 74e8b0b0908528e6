use anyhow::Result;
use clap::Parser;

use scoreboard::cli::{Cli, Command};
use scoreboard::{logging, server};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.command.args().load_config()?;
    logging::init(config.log.format);

    match cli.command {
        Command::Serve(_) => server::serve(config).await,
        Command::Check(_) => server::check(&config).await,
    }
}
