//! Three-component numeric version.
//!
//! Unlike full semantic versioning, pre-release and build metadata are not
//! allowed. On the wire a version is always the array `[major, minor, patch]`.

use crate::error::ManifestError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "[i64; 3]", into = "[u32; 3]")]
pub struct Version {
    major: u32,
    minor: u32,
    patch: u32,
}

impl Version {
    /// `1.0.0`, used wherever a version is omitted.
    pub const DEFAULT: Version = Version::new(1, 0, 0);

    /// Oldest engine release a header may target: `1.13.0`.
    pub const MIN_ENGINE: Version = Version::new(1, 13, 0);

    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    pub fn major(self) -> u32 {
        self.major
    }

    pub fn minor(self) -> u32 {
        self.minor
    }

    pub fn patch(self) -> u32 {
        self.patch
    }

    pub fn to_array(self) -> [u32; 3] {
        [self.major, self.minor, self.patch]
    }
}

impl Default for Version {
    fn default() -> Self {
        Self::DEFAULT
    }
}

fn version_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(0|[1-9][0-9]*)\.(0|[1-9][0-9]*)\.(0|[1-9][0-9]*)$")
            .expect("version grammar is a valid regex")
    })
}

impl FromStr for Version {
    type Err = ManifestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let caps = version_pattern().captures(s).ok_or_else(|| {
            ManifestError::malformed("version", s, "expected <major>.<minor>.<patch>")
        })?;
        let component = |i: usize| -> Result<u32, ManifestError> {
            caps[i]
                .parse::<u32>()
                .map_err(|_| ManifestError::out_of_range("version", s, "components <= 4294967295"))
        };
        Ok(Self::new(component(1)?, component(2)?, component(3)?))
    }
}

impl TryFrom<[i64; 3]> for Version {
    type Error = ManifestError;

    fn try_from(parts: [i64; 3]) -> Result<Self, Self::Error> {
        let rendered = || format!("{}.{}.{}", parts[0], parts[1], parts[2]);
        let mut out = [0u32; 3];
        for (slot, part) in out.iter_mut().zip(parts) {
            *slot = u32::try_from(part).map_err(|_| {
                ManifestError::out_of_range("version", rendered(), "components in 0..=4294967295")
            })?;
        }
        Ok(Self::new(out[0], out[1], out[2]))
    }
}

impl From<Version> for [u32; 3] {
    fn from(v: Version) -> Self {
        v.to_array()
    }
}

impl From<[u32; 3]> for Version {
    fn from(parts: [u32; 3]) -> Self {
        Self::new(parts[0], parts[1], parts[2])
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_prints_dotted_form() {
        let v: Version = "1.13.0".parse().unwrap();
        assert_eq!(v, Version::MIN_ENGINE);
        assert_eq!(v.to_string(), "1.13.0");
        assert_eq!("0.0.0".parse::<Version>().unwrap(), Version::new(0, 0, 0));
    }

    #[test]
    fn rejects_malformed_grammar() {
        for bad in ["1.0", "1.0.0.0", "01.0.0", "1.0.0-beta", "1.0.0+build", "v1.0.0", "", " 1.0.0"] {
            let err = bad.parse::<Version>().unwrap_err();
            assert!(
                matches!(err, ManifestError::Malformed { field: "version", .. }),
                "{bad}: {err}"
            );
        }
    }

    #[test]
    fn rejects_overflowing_component() {
        let err = "4294967296.0.0".parse::<Version>().unwrap_err();
        assert!(matches!(err, ManifestError::OutOfRange { .. }));
    }

    #[test]
    fn orders_lexicographically() {
        let mut versions = vec![
            Version::new(1, 13, 0),
            Version::new(1, 2, 10),
            Version::new(0, 9, 9),
            Version::new(1, 2, 3),
        ];
        versions.sort();
        assert_eq!(
            versions,
            vec![
                Version::new(0, 9, 9),
                Version::new(1, 2, 3),
                Version::new(1, 2, 10),
                Version::new(1, 13, 0),
            ]
        );
    }

    #[test]
    fn negative_component_is_out_of_range() {
        let err = Version::try_from([1_i64, -1, 0]).unwrap_err();
        assert!(matches!(err, ManifestError::OutOfRange { field: "version", .. }));
    }

    #[test]
    fn serializes_as_compact_array() {
        let json = serde_json::to_string(&Version::new(1, 2, 3)).unwrap();
        assert_eq!(json, "[1,2,3]");
        let back: Version = serde_json::from_str("[1,2,3]").unwrap();
        assert_eq!(back, Version::new(1, 2, 3));
        assert!(serde_json::from_str::<Version>("\"1.2.3\"").is_err());
        assert!(serde_json::from_str::<Version>("[1,-2,3]").is_err());
    }
}
