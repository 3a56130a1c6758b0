//! vCard format versions.

use std::fmt;
use std::str::FromStr;

use crate::error::RfcError;

/// xCard namespace (RFC 6351).
pub const XCARD_NS: &str = "urn:ietf:params:xml:ns:vcard-4.0";

/// vCard version.
///
/// Ordered oldest to newest so rules can be phrased as `version < V4_0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum VCardVersion {
    /// vCard 2.1 (Internet Mail Consortium).
    V2_1,
    /// vCard 3.0 (RFC 2426).
    V3_0,
    /// vCard 4.0 (RFC 6350).
    #[default]
    V4_0,
}

impl VCardVersion {
    /// All versions, oldest first.
    pub const ALL: [Self; 3] = [Self::V2_1, Self::V3_0, Self::V4_0];

    /// Parses from version string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "2.1" => Some(Self::V2_1),
            "3.0" => Some(Self::V3_0),
            "4.0" => Some(Self::V4_0),
            _ => None,
        }
    }

    /// Returns the version string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::V2_1 => "2.1",
            Self::V3_0 => "3.0",
            Self::V4_0 => "4.0",
        }
    }

    /// Whether `PREF` carries a numeric rank. Older versions only know the
    /// boolean `TYPE=pref` marker.
    #[must_use]
    pub const fn supports_numeric_pref(self) -> bool {
        matches!(self, Self::V4_0)
    }
}

impl fmt::Display for VCardVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VCardVersion {
    type Err = RfcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
            .ok_or_else(|| RfcError::InvalidArgument(format!("unknown vCard version: {s}")))
    }
}
