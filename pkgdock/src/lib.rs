//! pkgdock - inventory console core for a remote binary-package store.
//!
//! This library holds the orchestration state machines behind the console:
//! the upload task queue, the verification and bulk-action coordinators, and
//! the filter/pagination view model. All durable state lives in the remote
//! store; the console only keeps ephemeral view state.
//!
//! # High-Level API
//!
//! Most callers drive everything through the [`console`] facade:
//!
//! ```ignore
//! use pkgdock::console::InventoryConsole;
//! use pkgdock::gateway::HttpGateway;
//!
//! let gateway = HttpGateway::new("http://store.internal:8080/api")?;
//! let mut console = InventoryConsole::new(gateway);
//!
//! console.load().await;
//! for row in console.listing.visible_rows() {
//!     println!("{} {}", row.name, row.version);
//! }
//! ```

pub mod classifier;
pub mod config;
pub mod console;
pub mod gateway;
pub mod listing;
pub mod logging;
pub mod queue;
pub mod selection;
pub mod verify;

/// Version of the pkgdock library and CLI.
///
/// Synchronized across the workspace; injected from `Cargo.toml` at compile
/// time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
