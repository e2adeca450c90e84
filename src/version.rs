//! Tag format revisions.

use std::fmt;

/// One revision of the binary tag format. Ordering follows release order, so
/// version ranges can be expressed as `begin..=end` over `Version` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Version {
    V2_2,
    V2_3,
    V2_4,
}

impl Version {
    pub const EARLIEST: Version = Version::V2_2;
    pub const LATEST: Version = Version::V2_4;

    /// All supported revisions, oldest first.
    pub const ALL: [Version; 3] = [Version::V2_2, Version::V2_3, Version::V2_4];
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Version::V2_2 => write!(f, "2.2"),
            Version::V2_3 => write!(f, "2.3"),
            Version::V2_4 => write!(f, "2.4"),
        }
    }
}
