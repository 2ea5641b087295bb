//! Wire data model for the package store.
//!
//! These types mirror the JSON bodies the gateway serves. The client holds a
//! read-mostly cached copy per loaded page or search; the gateway owns all
//! durable state.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::fmt;

/// Identity of a stored package. The store derives it from the archive
/// content (a content hash), so it is stable across re-uploads of identical
/// bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(transparent)]
pub struct PackageId(String);

impl PackageId {
    /// Creates a package id from its string form.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the string value of this id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PackageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for PackageId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for PackageId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Integrity state of a stored package as known to the console.
///
/// Transitions only flow `Pending → Checking → {Valid, Invalid}`. A package
/// in a terminal state may be re-queued back to `Checking` by a new
/// verification request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(from = "String")]
pub enum VerificationStatus {
    /// Never checked (or the server reported an unknown state).
    #[default]
    Pending,
    /// A check is in flight.
    Checking,
    /// The last check confirmed the archive.
    Valid,
    /// The last check failed, or the check itself could not complete.
    Invalid,
}

impl VerificationStatus {
    /// Map the server's wire value onto a status.
    ///
    /// Unknown values collapse to `Pending` rather than erroring: an old or
    /// newer server must not break the listing.
    pub fn from_wire(value: &str) -> Self {
        match value {
            "valid" => VerificationStatus::Valid,
            "invalid" => VerificationStatus::Invalid,
            "checking" => VerificationStatus::Checking,
            _ => VerificationStatus::Pending,
        }
    }

    /// Returns true for `Valid` / `Invalid`.
    pub fn is_terminal(&self) -> bool {
        matches!(self, VerificationStatus::Valid | VerificationStatus::Invalid)
    }
}

impl From<String> for VerificationStatus {
    fn from(s: String) -> Self {
        Self::from_wire(&s)
    }
}

impl fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VerificationStatus::Pending => write!(f, "pending"),
            VerificationStatus::Checking => write!(f, "checking"),
            VerificationStatus::Valid => write!(f, "valid"),
            VerificationStatus::Invalid => write!(f, "invalid"),
        }
    }
}

/// One file inside a stored archive. Owned by its parent package; the
/// console never mutates file entries.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FileEntry {
    /// Path within the archive, unique per package.
    pub path: String,

    /// Size in bytes.
    #[serde(default)]
    pub size: u64,

    /// Per-file download counter.
    #[serde(default)]
    pub download_count: u64,
}

/// A stored package as the gateway reports it.
///
/// Summary listings leave `files` empty; the detail endpoint fills it. File
/// search responses annotate `matched_files` with the entries that matched.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PackageRecord {
    pub id: PackageId,
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub system: String,
    #[serde(default)]
    pub architecture: String,
    #[serde(default)]
    pub original_filename: String,
    #[serde(default)]
    pub upload_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub file_count: u64,
    #[serde(default)]
    pub total_size: u64,
    #[serde(default)]
    pub download_count: u64,
    #[serde(default)]
    pub last_check_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_download_time: Option<DateTime<Utc>>,
    #[serde(rename = "check_status", default)]
    pub status: VerificationStatus,
    #[serde(default)]
    pub files: Vec<FileEntry>,
    #[serde(default)]
    pub matched_files: Vec<FileEntry>,
}

/// Aggregate figures for one architecture.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ArchStat {
    pub architecture: String,
    #[serde(default)]
    pub package_count: u64,
    #[serde(default)]
    pub total_size: u64,
}

/// Aggregate figures for one operating system.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SystemStat {
    pub system: String,
    #[serde(default)]
    pub package_count: u64,
    #[serde(default)]
    pub total_size: u64,
}

/// Store-wide aggregate statistics.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct StoreStatistics {
    #[serde(default)]
    pub total_packages: u64,
    #[serde(default)]
    pub total_size: u64,
    #[serde(default)]
    pub by_architecture: Vec<ArchStat>,
    #[serde(default)]
    pub by_system: Vec<SystemStat>,
}

/// Result of a gateway-side integrity check for one package.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CheckOutcome {
    /// Whether the stored archive verified.
    pub valid: bool,

    /// Server-recorded check timestamp.
    #[serde(default)]
    pub check_time: Option<DateTime<Utc>>,
}

/// Identity the gateway parsed out of an accepted upload.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct UploadReceipt {
    #[serde(default)]
    pub id: Option<PackageId>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub system: Option<String>,
    #[serde(default)]
    pub architecture: Option<String>,
}
