//! Free-form provenance block: authors, license, source URL and the tools
//! that generated the manifest.

use crate::error::ManifestError;
use crate::version::Version;
use regex::Regex;
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::sync::OnceLock;
use url::Url;

const GENERATOR_NAME: &str = "packsmith";

fn generator_name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9_-]{0,32}$").expect("generator name pattern is a valid regex")
    })
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneratedWithOptions {
    pub name: Option<String>,
    /// Empty means `{1.0.0}`.
    pub versions: Vec<Version>,
}

/// A tool and the versions of it that produced the manifest.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GeneratedWith {
    name: String,
    versions: BTreeSet<Version>,
}

impl GeneratedWith {
    pub fn new(options: GeneratedWithOptions) -> Result<Self, ManifestError> {
        let name = options
            .name
            .ok_or(ManifestError::MissingField { field: "generated_with" })?;
        if !generator_name_pattern().is_match(&name) {
            return Err(ManifestError::malformed(
                "generated_with",
                name,
                "at most 32 ASCII letters, digits, '_' or '-'",
            ));
        }
        let mut versions: BTreeSet<Version> = options.versions.into_iter().collect();
        if versions.is_empty() {
            versions.insert(Version::DEFAULT);
        }
        Ok(Self { name, versions })
    }

    /// Record naming this library at its own version.
    pub fn packsmith() -> Result<Self, ManifestError> {
        let version: Version = env!("CARGO_PKG_VERSION").parse()?;
        Self::new(GeneratedWithOptions {
            name: Some(GENERATOR_NAME.to_owned()),
            versions: vec![version],
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Versions in ascending order; never empty.
    pub fn versions(&self) -> &BTreeSet<Version> {
        &self.versions
    }

    pub fn to_options(&self) -> GeneratedWithOptions {
        GeneratedWithOptions {
            name: Some(self.name.clone()),
            versions: self.versions.iter().copied().collect(),
        }
    }
}

impl Ord for GeneratedWith {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name
            .cmp(&other.name)
            .then_with(|| self.versions.iter().cmp(other.versions.iter()))
    }
}

impl PartialOrd for GeneratedWith {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataOptions {
    pub authors: Vec<String>,
    pub url: Option<String>,
    pub license: Option<String>,
    pub generated_with: Vec<GeneratedWith>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Metadata {
    authors: BTreeSet<String>,
    url: Option<String>,
    license: Option<String>,
    generated_with: BTreeSet<GeneratedWith>,
}

impl Metadata {
    pub fn new(options: MetadataOptions) -> Result<Self, ManifestError> {
        let mut authors = BTreeSet::new();
        for author in options.authors {
            if author.trim().is_empty() {
                return Err(ManifestError::malformed(
                    "authors",
                    author,
                    "author must not be blank",
                ));
            }
            authors.insert(author);
        }

        if let Some(url) = &options.url {
            Url::parse(url)
                .map_err(|e| ManifestError::malformed("url", url.as_str(), e.to_string()))?;
        }

        let mut names = BTreeSet::new();
        for record in &options.generated_with {
            if !names.insert(record.name()) {
                return Err(ManifestError::DuplicateKey {
                    field: "generated_with",
                    key: record.name().to_owned(),
                });
            }
        }

        Ok(Self {
            authors,
            url: options.url,
            license: options.license,
            generated_with: options.generated_with.into_iter().collect(),
        })
    }

    pub fn authors(&self) -> &BTreeSet<String> {
        &self.authors
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn license(&self) -> Option<&str> {
        self.license.as_deref()
    }

    /// Records ordered by tool name; names are unique.
    pub fn generated_with(&self) -> &BTreeSet<GeneratedWith> {
        &self.generated_with
    }

    /// True when no field carries a value.
    pub fn is_empty(&self) -> bool {
        self.authors.is_empty()
            && self.url.is_none()
            && self.license.is_none()
            && self.generated_with.is_empty()
    }

    pub fn to_options(&self) -> MetadataOptions {
        MetadataOptions {
            authors: self.authors.iter().cloned().collect(),
            url: self.url.clone(),
            license: self.license.clone(),
            generated_with: self.generated_with.iter().cloned().collect(),
        }
    }
}
