use crate::error::ManifestError;
use crate::types::SubpackFolder;
use std::cmp::Ordering;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubpackOptions {
    /// Folder path, with or without the leading `subpacks/`.
    pub folder_name: Option<String>,
    pub name: Option<String>,
    /// Memory requirement in units of 0.25 GB.
    pub memory_tier: Option<i64>,
}

/// Optional variant of a resource pack the player can pick.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Subpack {
    folder_name: SubpackFolder,
    name: String,
    memory_tier: Option<u32>,
}

impl Subpack {
    pub fn new(options: SubpackOptions) -> Result<Self, ManifestError> {
        let raw_folder = options
            .folder_name
            .ok_or(ManifestError::MissingField { field: "folder_name" })?;
        let folder_name = SubpackFolder::new(&raw_folder)?;

        let memory_tier = options
            .memory_tier
            .map(|tier| {
                u32::try_from(tier).map_err(|_| {
                    ManifestError::out_of_range("memory_tier", tier, "0..=4294967295")
                })
            })
            .transpose()?;

        let name = options
            .name
            .unwrap_or_else(|| folder_name.name().to_owned());

        Ok(Self {
            folder_name,
            name,
            memory_tier,
        })
    }

    pub fn folder_name(&self) -> &SubpackFolder {
        &self.folder_name
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn memory_tier(&self) -> Option<u32> {
        self.memory_tier
    }

    pub fn to_options(&self) -> SubpackOptions {
        SubpackOptions {
            folder_name: Some(self.folder_name.as_str().to_owned()),
            name: Some(self.name.clone()),
            memory_tier: self.memory_tier.map(i64::from),
        }
    }
}

// Folder first, then display name, then tier with no tier sorting first.
impl Ord for Subpack {
    fn cmp(&self, other: &Self) -> Ordering {
        self.folder_name
            .cmp(&other.folder_name)
            .then_with(|| self.name.cmp(&other.name))
            .then_with(|| self.memory_tier.cmp(&other.memory_tier))
    }
}

impl PartialOrd for Subpack {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn folder(name: &str) -> SubpackOptions {
        SubpackOptions {
            folder_name: Some(name.to_owned()),
            ..SubpackOptions::default()
        }
    }

    #[test]
    fn name_defaults_to_folder() {
        let sp = Subpack::new(folder("high")).unwrap();
        assert_eq!(sp.folder_name().as_str(), "subpacks/high");
        assert_eq!(sp.name(), "high");
        assert_eq!(sp.memory_tier(), None);
    }

    #[test]
    fn folder_is_required_and_validated() {
        let err = Subpack::new(SubpackOptions::default()).unwrap_err();
        assert!(matches!(err, ManifestError::MissingField { field: "folder_name" }));
        let err = Subpack::new(folder("nested/dir")).unwrap_err();
        assert!(matches!(err, ManifestError::Malformed { field: "folder_name", .. }));
    }

    #[test]
    fn negative_memory_tier_is_out_of_range() {
        let err = Subpack::new(SubpackOptions {
            memory_tier: Some(-1),
            ..folder("low")
        })
        .unwrap_err();
        assert!(matches!(err, ManifestError::OutOfRange { field: "memory_tier", .. }));
    }

    #[test]
    fn orders_folder_first() {
        let a = Subpack::new(SubpackOptions {
            name: Some("Zeta".to_owned()),
            ..folder("alpha")
        })
        .unwrap();
        let b = Subpack::new(SubpackOptions {
            name: Some("Alpha".to_owned()),
            ..folder("beta")
        })
        .unwrap();
        assert!(a < b);

        let untiered = Subpack::new(folder("alpha")).unwrap();
        let tiered = Subpack::new(SubpackOptions {
            memory_tier: Some(0),
            ..folder("alpha")
        })
        .unwrap();
        assert!(untiered < tiered);
    }
}
