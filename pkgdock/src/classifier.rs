//! Local filename classification for upload candidates.
//!
//! Archive names uploaded to the store must follow the pattern
//! `<name>-<version>-linux-<arch>.<zip|tar.gz>`. The classifier gives the
//! console early feedback before a byte is sent; the gateway performs the
//! authoritative parse server-side.

use regex::Regex;
use std::sync::OnceLock;

/// Pattern for store archive names. Case-insensitive end to end.
///
/// Capture groups: name, version, system, architecture, extension.
const NAME_PATTERN: &str = r"(?i)^(.+)-([^-]+)-(linux)-([^-.]+)\.(zip|tar\.gz)$";

fn name_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(NAME_PATTERN).expect("invalid archive name pattern"))
}

/// Identity parsed out of a well-formed archive filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedName {
    /// Package name (may itself contain hyphens).
    pub name: String,

    /// Version segment (e.g. "v1.2.0").
    pub version: String,

    /// Target operating system ("linux").
    pub system: String,

    /// Target architecture (e.g. "aarch64").
    pub arch: String,
}

/// Outcome of classifying a proposed upload filename.
///
/// `NoMatch` is a distinguished result, not an absence: a filename that does
/// not follow the naming convention is a normal, expected input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// Filename follows the naming convention.
    Match(ParsedName),

    /// Filename does not follow the naming convention.
    NoMatch,
}

impl Classification {
    /// Returns true if the filename matched the naming convention.
    pub fn is_match(&self) -> bool {
        matches!(self, Classification::Match(_))
    }

    /// Returns the parsed identity if the filename matched.
    pub fn parsed(&self) -> Option<&ParsedName> {
        match self {
            Classification::Match(parsed) => Some(parsed),
            Classification::NoMatch => None,
        }
    }
}

/// Classify a proposed upload filename.
///
/// Total over arbitrary input: any string that does not follow the naming
/// convention yields [`Classification::NoMatch`]. Never panics, never touches
/// external state.
///
/// # Example
///
/// ```
/// use pkgdock::classifier::{classify, Classification};
///
/// let c = classify("nginx-v1.2.0-linux-aarch64.tar.gz");
/// assert!(c.is_match());
/// assert_eq!(classify("readme.txt"), Classification::NoMatch);
/// ```
pub fn classify(filename: &str) -> Classification {
    match name_regex().captures(filename) {
        Some(caps) => Classification::Match(ParsedName {
            name: caps[1].to_string(),
            version: caps[2].to_string(),
            system: caps[3].to_string(),
            arch: caps[4].to_string(),
        }),
        None => Classification::NoMatch,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_canonical_name() {
        let c = classify("nginx-v1.2.0-linux-aarch64.tar.gz");
        let parsed = c.parsed().expect("should match");

        assert_eq!(parsed.name, "nginx");
        assert_eq!(parsed.version, "v1.2.0");
        assert_eq!(parsed.system, "linux");
        assert_eq!(parsed.arch, "aarch64");
    }

    #[test]
    fn test_classify_zip_extension() {
        let c = classify("redis-7.2.4-linux-x86_64.zip");
        let parsed = c.parsed().expect("should match");

        assert_eq!(parsed.name, "redis");
        assert_eq!(parsed.version, "7.2.4");
        assert_eq!(parsed.arch, "x86_64");
    }

    #[test]
    fn test_classify_hyphenated_name() {
        // The name group is greedy; the version is the last hyphen-free
        // segment before "linux".
        let c = classify("node-exporter-v1.7.0-linux-armhf.tar.gz");
        let parsed = c.parsed().expect("should match");

        assert_eq!(parsed.name, "node-exporter");
        assert_eq!(parsed.version, "v1.7.0");
        assert_eq!(parsed.arch, "armhf");
    }

    #[test]
    fn test_classify_case_insensitive() {
        let c = classify("Nginx-V1.2.0-Linux-AARCH64.TAR.GZ");
        let parsed = c.parsed().expect("should match");

        assert_eq!(parsed.name, "Nginx");
        assert_eq!(parsed.system, "Linux");
        assert_eq!(parsed.arch, "AARCH64");
    }

    #[test]
    fn test_classify_rejects_plain_file() {
        assert_eq!(classify("readme.txt"), Classification::NoMatch);
    }

    #[test]
    fn test_classify_rejects_missing_system() {
        assert_eq!(classify("nginx-v1.2.0-aarch64.tar.gz"), Classification::NoMatch);
    }

    #[test]
    fn test_classify_rejects_wrong_extension() {
        assert_eq!(classify("nginx-v1.2.0-linux-aarch64.rpm"), Classification::NoMatch);
        assert_eq!(classify("nginx-v1.2.0-linux-aarch64.tar"), Classification::NoMatch);
    }

    #[test]
    fn test_classify_rejects_empty_and_junk() {
        assert_eq!(classify(""), Classification::NoMatch);
        assert_eq!(classify("-"), Classification::NoMatch);
        assert_eq!(classify("...."), Classification::NoMatch);
        assert_eq!(classify("nginx.tar.gz"), Classification::NoMatch);
    }

    #[test]
    fn test_classify_is_match() {
        assert!(classify("htop-3.3.0-linux-mips.zip").is_match());
        assert!(!classify("htop.zip").is_match());
    }
}
