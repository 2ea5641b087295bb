//! CLI argument types (clap-derived).

use std::path::PathBuf;

use clap::Subcommand;

/// Console subcommands.
#[derive(Debug, Subcommand)]
pub enum ConsoleCommands {
    /// List stored packages
    List {
        /// Page to display (1-based)
        #[arg(long, default_value_t = 1)]
        page: usize,
    },

    /// Search packages by metadata, or by file path with --file
    Search {
        /// Package name substring
        #[arg(long, default_value = "")]
        name: String,

        /// Version substring
        #[arg(long, default_value = "")]
        version: String,

        /// Architecture (x86_64, aarch64, armhf, armel, mips, ppc64le, all)
        #[arg(long, default_value = "all")]
        arch: String,

        /// File path substring; routes the search into archive contents
        #[arg(long)]
        file: Option<String>,

        /// Page to display (1-based)
        #[arg(long, default_value_t = 1)]
        page: usize,
    },

    /// Show one package's metadata and file manifest
    Show {
        /// Package id
        id: String,

        /// File-list page to display (1-based)
        #[arg(long, default_value_t = 1)]
        files_page: usize,
    },

    /// Show store-wide statistics
    Stats,

    /// Queue local archives and upload them one at a time
    Upload {
        /// Archive files (name-version-linux-arch.zip/.tar.gz)
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Verify packages by id
    Verify {
        /// Package ids
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// Verify every package in the current listing
    VerifyAll,

    /// Trigger the store's own bulk verification
    CheckAll,

    /// Delete packages by id
    Delete {
        /// Package ids
        #[arg(required = true)]
        ids: Vec<String>,

        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },

    /// Delete every package in the store
    ClearAll {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },

    /// Download a package's full archive
    Download {
        /// Package id
        id: String,

        /// Destination file
        #[arg(long)]
        output: PathBuf,
    },

    /// Download a single file out of a package
    DownloadFile {
        /// Package id
        id: String,

        /// File path inside the archive
        path: String,

        /// Destination file
        #[arg(long)]
        output: PathBuf,
    },
}
