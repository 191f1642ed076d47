//! Pack manifest model, validation, and JSON codec.
//!
//! This crate defines the schema layer for content pack descriptors: the value
//! types ([`Version`], [`ScriptEntry`], [`SubpackFolder`]), the entities making
//! up a manifest ([`Header`], [`Module`], [`Dependency`], [`Subpack`],
//! [`Metadata`]), and the [`Manifest`] aggregate itself.
//!
//! Every entity is built from a plain options struct and validated at
//! construction time; a value that exists is valid. [`Manifest::from_json`]
//! and [`Manifest::to_json`] convert to and from the canonical document form.
//!
//! ```
//! use packsmith_schema::{Manifest, ModuleType};
//!
//! let manifest = Manifest::of("Pack", ModuleType::Resources).unwrap();
//! let text = manifest.to_json().unwrap();
//! assert_eq!(Manifest::from_json(&text).unwrap(), manifest);
//! ```

pub mod capability;
pub mod codec;
pub mod dependency;
pub mod error;
pub mod header;
pub mod manifest;
pub mod metadata;
pub mod module;
pub mod names;
pub mod normalize;
pub mod subpack;
pub mod types;
pub mod version;

pub use capability::Capability;
pub use dependency::{Dependency, DependencyOptions};
pub use error::ManifestError;
pub use header::{Header, HeaderOptions, PackScope};
pub use manifest::{Manifest, ManifestOptions};
pub use metadata::{GeneratedWith, GeneratedWithOptions, Metadata, MetadataOptions};
pub use module::{Language, Module, ModuleOptions, ModuleType, PERMITTED_TYPE_GROUPS};
pub use normalize::{DEFAULT_FORMAT_VERSION, MAX_FORMAT_VERSION, MIN_FORMAT_VERSION};
pub use subpack::{Subpack, SubpackOptions};
pub use types::{ScriptEntry, SubpackFolder};
pub use uuid::Uuid;
pub use version::Version;
