//! Console subcommands.
//!
//! Each subcommand has a handler that depends only on the
//! [`CommandContext`](traits::CommandContext) interfaces, keeping the
//! handlers testable with capturing fakes:
//!
//! - `traits`: `Output`, `UserInteraction`, `CommandContext`
//! - `services`: console implementations of the traits
//! - `args`: clap-derived argument types
//! - `handlers`: the command logic
//! - `format`: size/date display helpers

mod args;
mod format;
mod handlers;
mod services;
mod traits;

pub use args::ConsoleCommands;
pub use services::{ConsoleInteraction, ConsoleOutput};

use pkgdock::console::InventoryConsole;
use pkgdock::gateway::HttpGateway;
use traits::CommandContext;

use crate::error::CliError;

/// Run a console subcommand against the store.
pub async fn run(
    command: ConsoleCommands,
    console: &mut InventoryConsole<HttpGateway>,
) -> Result<(), CliError> {
    let output = ConsoleOutput::new();
    let interaction = ConsoleInteraction::new();
    let mut ctx = CommandContext::new(console, &output, &interaction);

    match command {
        ConsoleCommands::List { page } => handlers::list(&mut ctx, page).await,

        ConsoleCommands::Search {
            name,
            version,
            arch,
            file,
            page,
        } => handlers::search(&mut ctx, name, version, arch, file, page).await,

        ConsoleCommands::Show { id, files_page } => handlers::show(&mut ctx, id, files_page).await,

        ConsoleCommands::Stats => handlers::stats(&mut ctx).await,

        ConsoleCommands::Upload { files } => handlers::upload(&mut ctx, files).await,

        ConsoleCommands::Verify { ids } => handlers::verify(&mut ctx, ids).await,

        ConsoleCommands::VerifyAll => handlers::verify_all(&mut ctx).await,

        ConsoleCommands::CheckAll => handlers::check_all(&mut ctx).await,

        ConsoleCommands::Delete { ids, yes } => handlers::delete(&mut ctx, ids, yes).await,

        ConsoleCommands::ClearAll { yes } => handlers::clear_all(&mut ctx, yes).await,

        ConsoleCommands::Download { id, output } => handlers::download(&mut ctx, id, output).await,

        ConsoleCommands::DownloadFile { id, path, output } => {
            handlers::download_file(&mut ctx, id, path, output).await
        }
    }
}
