use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// A paper version: a `(major, minor)` pair with strict tuple ordering.
///
/// Versions are parsed from strings of the form `<int>.<int>` with an
/// optional leading `v` (case-insensitive): `"v1.0"`, `"V2.10"`, `"3.4"`.
/// Components are non-negative; sign characters, missing components, and
/// anything beyond two dot-separated integers are rejected.
///
/// Ordering is `major` first, then `minor`, so `v1.9 < v1.10 < v2.0`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
}

impl Version {
    /// The version assigned to a freshly created paper.
    pub const INITIAL: Version = Version { major: 1, minor: 0 };

    /// Create a version from explicit components.
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    /// Parse a version string.
    pub fn parse(s: &str) -> Result<Self, TypeError> {
        let malformed = || TypeError::InvalidVersionFormat(s.to_string());

        let trimmed = s.trim();
        let body = trimmed
            .strip_prefix('v')
            .or_else(|| trimmed.strip_prefix('V'))
            .unwrap_or(trimmed);

        let (major, minor) = body.split_once('.').ok_or_else(malformed)?;
        Ok(Self {
            major: parse_component(major).ok_or_else(malformed)?,
            minor: parse_component(minor).ok_or_else(malformed)?,
        })
    }

    /// Returns `true` if this version is strictly newer than `other`.
    pub fn is_newer_than(&self, other: &Version) -> bool {
        self > other
    }
}

/// Parse a single component: ASCII digits only, no signs, no whitespace.
fn parse_component(s: &str) -> Option<u32> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

impl FromStr for Version {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}.{}", self.major, self.minor)
    }
}
