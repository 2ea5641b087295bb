//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use std::fmt;
use std::process;

use pkgdock::gateway::GatewayError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration error
    Config(String),
    /// A store operation failed
    Gateway(GatewayError),
    /// The listing could not be loaded
    Listing(String),
    /// Failed to write a downloaded file
    FileWrite { path: String, error: std::io::Error },
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        // Print additional help for specific errors
        match self {
            CliError::Gateway(GatewayError::Http(_)) | CliError::Listing(_) => {
                eprintln!();
                eprintln!("Is the store reachable? Check:");
                eprintln!("  1. gateway_url in ~/.pkgdock/config.ini (or --gateway-url)");
                eprintln!("  2. Network connectivity to the store host");
            }
            CliError::Config(_) => {
                eprintln!();
                eprintln!("Run with --gateway-url to override the configured store address.");
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::Gateway(e) => write!(f, "{}", e),
            CliError::Listing(msg) => write!(f, "Failed to load listing: {}", msg),
            CliError::FileWrite { path, error } => {
                write!(f, "Failed to write file '{}': {}", path, error)
            }
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Gateway(e) => Some(e),
            CliError::FileWrite { error, .. } => Some(error),
            _ => None,
        }
    }
}

impl From<GatewayError> for CliError {
    fn from(e: GatewayError) -> Self {
        CliError::Gateway(e)
    }
}
