use crate::capability::Capability;
use crate::codec;
use crate::dependency::Dependency;
use crate::error::ManifestError;
use crate::header::Header;
use crate::metadata::Metadata;
use crate::module::{Module, ModuleType};
use crate::normalize::{self, DEFAULT_FORMAT_VERSION};
use crate::subpack::Subpack;
use std::collections::BTreeSet;
use tracing::debug;

/// Construction input for [`Manifest`].
///
/// Collections may contain duplicates and come in any order; they are
/// deduplicated and sorted when the manifest is built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManifestOptions {
    /// Defaults to 2.
    pub format_version: Option<u8>,
    pub header: Option<Header>,
    pub modules: Vec<Module>,
    pub dependencies: Vec<Dependency>,
    pub capabilities: Vec<Capability>,
    pub metadata: Option<Metadata>,
    pub subpacks: Vec<Subpack>,
}

/// A fully validated pack manifest.
///
/// Instances only exist after every entity rule and the cross-entity pass in
/// [`normalize`] succeeded. Nothing can be mutated afterwards; to change a
/// manifest, edit [`Manifest::to_options`] and build a new one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Manifest {
    format_version: u8,
    header: Header,
    modules: BTreeSet<Module>,
    dependencies: BTreeSet<Dependency>,
    capabilities: BTreeSet<Capability>,
    metadata: Option<Metadata>,
    subpacks: BTreeSet<Subpack>,
}

impl Manifest {
    pub fn new(options: ManifestOptions) -> Result<Self, ManifestError> {
        let format_version = normalize::check_format_version(i64::from(
            options.format_version.unwrap_or(DEFAULT_FORMAT_VERSION),
        ))?;
        let header = options
            .header
            .ok_or(ManifestError::MissingField { field: "header" })?;

        let modules: BTreeSet<Module> = options.modules.into_iter().collect();
        if modules.is_empty() {
            return Err(ManifestError::MissingField { field: "modules" });
        }
        let types = normalize::module_type_set(&modules)?;
        let header = normalize::finalize_header(header, &types, format_version)?;

        let metadata = options.metadata.filter(|m| {
            if m.is_empty() {
                debug!("dropping empty metadata");
            }
            !m.is_empty()
        });

        Ok(Self {
            format_version,
            header,
            modules,
            dependencies: options.dependencies.into_iter().collect(),
            capabilities: options.capabilities.into_iter().collect(),
            metadata,
            subpacks: options.subpacks.into_iter().collect(),
        })
    }

    /// Smallest valid manifest: a named header and one defaulted module.
    pub fn of(name: impl Into<String>, module_type: ModuleType) -> Result<Self, ManifestError> {
        Self::new(ManifestOptions {
            header: Some(Header::named(name)),
            modules: vec![Module::of(module_type)?],
            ..ManifestOptions::default()
        })
    }

    pub fn format_version(&self) -> u8 {
        self.format_version
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Never empty.
    pub fn modules(&self) -> &BTreeSet<Module> {
        &self.modules
    }

    pub fn dependencies(&self) -> &BTreeSet<Dependency> {
        &self.dependencies
    }

    pub fn capabilities(&self) -> &BTreeSet<Capability> {
        &self.capabilities
    }

    pub fn metadata(&self) -> Option<&Metadata> {
        self.metadata.as_ref()
    }

    pub fn subpacks(&self) -> &BTreeSet<Subpack> {
        &self.subpacks
    }

    /// Distinct module types, all from one permitted group.
    pub fn module_types(&self) -> BTreeSet<ModuleType> {
        self.modules.iter().map(Module::module_type).collect()
    }

    pub fn to_options(&self) -> ManifestOptions {
        ManifestOptions {
            format_version: Some(self.format_version),
            header: Some(self.header.clone()),
            modules: self.modules.iter().cloned().collect(),
            dependencies: self.dependencies.iter().cloned().collect(),
            capabilities: self.capabilities.iter().copied().collect(),
            metadata: self.metadata.clone(),
            subpacks: self.subpacks.iter().cloned().collect(),
        }
    }

    /// Decode and validate a manifest document.
    pub fn from_json(input: &str) -> Result<Self, ManifestError> {
        codec::decode(input)
    }

    /// Canonical pretty-printed encoding; unset optional fields are omitted.
    pub fn to_json(&self) -> Result<String, ManifestError> {
        codec::encode(self)
    }
}
