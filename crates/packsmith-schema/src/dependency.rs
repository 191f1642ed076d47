use crate::error::ManifestError;
use crate::header::Header;
use crate::version::Version;
use std::cmp::Ordering;
use uuid::Uuid;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyOptions {
    pub uuid: Option<Uuid>,
    pub version: Option<Version>,
}

/// Reference to another pack this one requires.
///
/// Equality and ordering use `uuid` first and `version` as a tiebreak, so two
/// versions of the same pack are distinct entries.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Dependency {
    uuid: Uuid,
    version: Version,
}

impl Dependency {
    pub fn new(options: DependencyOptions) -> Result<Self, ManifestError> {
        Ok(Self {
            uuid: options
                .uuid
                .ok_or(ManifestError::MissingField { field: "uuid" })?,
            version: options.version.unwrap_or_default(),
        })
    }

    /// A dependency on the pack described by `header`.
    pub fn on(header: &Header) -> Self {
        Self {
            uuid: header.uuid(),
            version: header.version(),
        }
    }

    pub fn uuid(&self) -> Uuid {
        self.uuid
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn to_options(&self) -> DependencyOptions {
        DependencyOptions {
            uuid: Some(self.uuid),
            version: Some(self.version),
        }
    }
}

impl Ord for Dependency {
    fn cmp(&self, other: &Self) -> Ordering {
        self.uuid
            .cmp(&other.uuid)
            .then_with(|| self.version.cmp(&other.version))
    }
}

impl PartialOrd for Dependency {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
