//! Filter criteria and search-mode routing.

use std::fmt;

use crate::gateway::SearchQuery;

/// Architectures the store serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(non_camel_case_types)]
pub enum Arch {
    X86_64,
    Aarch64,
    Armhf,
    Armel,
    Mips,
    Ppc64le,
}

impl Arch {
    /// Every architecture, in display order.
    pub const ALL: [Arch; 6] = [
        Arch::X86_64,
        Arch::Aarch64,
        Arch::Armhf,
        Arch::Armel,
        Arch::Mips,
        Arch::Ppc64le,
    ];

    /// Wire name of the architecture.
    pub fn as_str(&self) -> &'static str {
        match self {
            Arch::X86_64 => "x86_64",
            Arch::Aarch64 => "aarch64",
            Arch::Armhf => "armhf",
            Arch::Armel => "armel",
            Arch::Mips => "mips",
            Arch::Ppc64le => "ppc64le",
        }
    }

    /// Parse a wire name.
    ///
    /// Returns `None` for unknown names; the caller decides whether that is
    /// an error or "all architectures".
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "x86_64" => Some(Arch::X86_64),
            "aarch64" => Some(Arch::Aarch64),
            "armhf" => Some(Arch::Armhf),
            "armel" => Some(Arch::Armel),
            "mips" => Some(Arch::Mips),
            "ppc64le" => Some(Arch::Ppc64le),
            _ => None,
        }
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Which server endpoint a filter routes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    /// Name/version/architecture search over package metadata.
    General,
    /// Substring search over the files inside stored archives.
    FileContent,
}

/// The console's active filter.
///
/// Terms combine conjunctively server-side. A non-empty `file_path` routes
/// the whole search to the file-content endpoint; the other terms route to
/// the general search endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    /// Package name substring.
    pub name: String,
    /// Version substring.
    pub version: String,
    /// Architecture constraint; `None` means all architectures.
    pub arch: Option<Arch>,
    /// File-path substring; routes to the file search mode when non-empty.
    pub file_path: String,
}

impl FilterCriteria {
    /// True when no term is set.
    pub fn is_empty(&self) -> bool {
        self.name.is_empty()
            && self.version.is_empty()
            && self.arch.is_none()
            && self.file_path.is_empty()
    }

    /// Which endpoint this filter routes to.
    pub fn search_mode(&self) -> SearchMode {
        if self.file_path.is_empty() {
            SearchMode::General
        } else {
            SearchMode::FileContent
        }
    }

    /// Terms for the general search endpoint.
    pub fn to_query(&self) -> SearchQuery {
        SearchQuery {
            name: self.name.clone(),
            version: self.version.clone(),
            architecture: self.arch.map(|a| a.as_str().to_string()),
        }
    }
}
