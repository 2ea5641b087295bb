//! pkgdock CLI - command-line console for a remote binary-package store.

use std::time::Duration;

use clap::Parser;

use pkgdock::config::ConfigFile;
use pkgdock::console::InventoryConsole;
use pkgdock::gateway::HttpGateway;
use pkgdock::logging;

mod commands;
mod error;

use commands::ConsoleCommands;
use error::CliError;

#[derive(Parser)]
#[command(name = "pkgdock")]
#[command(version = pkgdock::VERSION)]
#[command(about = "Inventory console for a remote binary-package store", long_about = None)]
struct Cli {
    /// Store API base URL (overrides the configured gateway_url)
    #[arg(long)]
    gateway_url: Option<String>,

    /// Rows per page in listings (overrides the configured page_size)
    #[arg(long)]
    page_size: Option<usize>,

    #[command(subcommand)]
    command: ConsoleCommands,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let _guard =
        match logging::init_logging(logging::default_log_dir(), logging::default_log_file()) {
            Ok(guard) => guard,
            Err(e) => CliError::LoggingInit(e.to_string()).exit(),
        };

    let config = ConfigFile::load().unwrap_or_default();
    let gateway_url = cli.gateway_url.unwrap_or(config.store.gateway_url);
    let page_size = cli.page_size.unwrap_or(config.listing.page_size);

    let gateway = match HttpGateway::with_timeout(
        gateway_url,
        Duration::from_secs(config.store.timeout_secs),
    ) {
        Ok(gateway) => gateway,
        Err(e) => CliError::Gateway(e).exit(),
    };

    let mut console = InventoryConsole::with_page_size(gateway, page_size);

    if let Err(e) = commands::run(cli.command, &mut console).await {
        e.exit();
    }
}
