//! Cross-entity validation and defaulting.
//!
//! Runs once per [`Manifest`](crate::Manifest) construction, after every
//! module is known. The header draft is consumed and either comes back with
//! the computed defaults applied or is dropped along with the error, so a
//! partially defaulted header is never observable.

use crate::error::ManifestError;
use crate::header::Header;
use crate::module::{Module, ModuleType};
use crate::version::Version;
use std::collections::BTreeSet;
use tracing::debug;

pub const MIN_FORMAT_VERSION: u8 = 1;
pub const MAX_FORMAT_VERSION: u8 = 2;
pub const DEFAULT_FORMAT_VERSION: u8 = 2;

/// Default for `lock_template_options` on world templates.
pub const DEFAULT_LOCK_TEMPLATE_OPTIONS: bool = false;

pub fn check_format_version(format_version: i64) -> Result<u8, ManifestError> {
    u8::try_from(format_version)
        .ok()
        .filter(|v| (MIN_FORMAT_VERSION..=MAX_FORMAT_VERSION).contains(v))
        .ok_or_else(|| {
            ManifestError::out_of_range(
                "format_version",
                format_version,
                format!("{MIN_FORMAT_VERSION}..={MAX_FORMAT_VERSION}"),
            )
        })
}

/// Distinct module types present, failing if they straddle two permitted groups.
pub fn module_type_set(modules: &BTreeSet<Module>) -> Result<BTreeSet<ModuleType>, ManifestError> {
    let types: BTreeSet<ModuleType> = modules.iter().map(Module::module_type).collect();
    let mut iter = types.iter().copied();
    if let Some(first) = iter.next() {
        // A type outside every group cannot share a manifest with anything.
        let group = first.group();
        if let Some(second) = iter.find(|t| group.is_none() || t.group() != group) {
            return Err(ManifestError::TypeConflict { first, second });
        }
    }
    Ok(types)
}

/// `min_engine_version` is only meaningful for format revision 2 packs that
/// are neither world templates nor skin packs.
pub fn min_engine_version_allowed(types: &BTreeSet<ModuleType>, format_version: u8) -> bool {
    format_version == 2
        && !types.contains(&ModuleType::WorldTemplate)
        && !types.contains(&ModuleType::SkinPack)
}

/// `base_game_version` and `lock_template_options` belong to world templates.
pub fn template_fields_allowed(types: &BTreeSet<ModuleType>) -> bool {
    types.contains(&ModuleType::WorldTemplate)
}

fn at_least_min_engine(field: &'static str, version: Version) -> Result<(), ManifestError> {
    if version < Version::MIN_ENGINE {
        return Err(ManifestError::out_of_range(
            field,
            version,
            format!(">= {}", Version::MIN_ENGINE),
        ));
    }
    Ok(())
}

/// Apply context-dependent legality checks and defaults to a header draft.
///
/// Values the caller supplied are never overridden; only unset fields that
/// the context requires are filled in.
pub fn finalize_header(
    mut header: Header,
    types: &BTreeSet<ModuleType>,
    format_version: u8,
) -> Result<Header, ManifestError> {
    match (
        min_engine_version_allowed(types, format_version),
        header.min_engine_version,
    ) {
        (true, None) => {
            debug!("defaulting min_engine_version to {}", Version::MIN_ENGINE);
            header.min_engine_version = Some(Version::MIN_ENGINE);
        }
        (true, Some(v)) => at_least_min_engine("min_engine_version", v)?,
        (false, Some(v)) => {
            return Err(ManifestError::illegal(
                "min_engine_version",
                v,
                "requires format_version 2 and no world_template or skin_pack module",
            ))
        }
        (false, None) => {}
    }

    let template = template_fields_allowed(types);
    match (template, header.base_game_version) {
        (true, None) => {
            debug!("defaulting base_game_version to {}", Version::MIN_ENGINE);
            header.base_game_version = Some(Version::MIN_ENGINE);
        }
        (true, Some(v)) => at_least_min_engine("base_game_version", v)?,
        (false, Some(v)) => {
            return Err(ManifestError::illegal(
                "base_game_version",
                v,
                "requires a world_template module",
            ))
        }
        (false, None) => {}
    }
    match (template, header.lock_template_options) {
        (true, None) => {
            debug!("defaulting lock_template_options to {DEFAULT_LOCK_TEMPLATE_OPTIONS}");
            header.lock_template_options = Some(DEFAULT_LOCK_TEMPLATE_OPTIONS);
        }
        (false, Some(v)) => {
            return Err(ManifestError::illegal(
                "lock_template_options",
                v,
                "requires a world_template module",
            ))
        }
        _ => {}
    }

    Ok(header)
}
