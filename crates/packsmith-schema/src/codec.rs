//! JSON encoding of manifests.
//!
//! The document shape is fixed by the consuming engine and differs from a
//! plain serde derive of the model in a few places:
//!
//! - every version is a compact `[major,minor,patch]` array on one line;
//! - `generated_with` is an object keyed by tool name whose values are compact
//!   arrays of version arrays;
//! - sets are written in their element order, not insertion order;
//! - enum constants use their wire names from [`crate::names`].
//!
//! Decoding goes through loosely typed wire structs and then through the same
//! validating constructors as programmatic construction, so both paths reject
//! the same inputs with the same errors. A value of the wrong JSON type is
//! kept as it was and reported as malformed under its own field name.

use crate::capability::Capability;
use crate::dependency::{Dependency, DependencyOptions};
use crate::error::ManifestError;
use crate::header::{Header, HeaderOptions, PackScope};
use crate::manifest::{Manifest, ManifestOptions};
use crate::metadata::{GeneratedWith, GeneratedWithOptions, Metadata, MetadataOptions};
use crate::module::{Language, Module, ModuleOptions, ModuleType};
use crate::normalize;
use crate::subpack::{Subpack, SubpackOptions};
use crate::version::Version;
use serde::de::{DeserializeOwned, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use tracing::debug;
use uuid::Uuid;

const INDENT: &str = "  ";

type RawVersion = [i64; 3];

/// A wire value that either decoded as `T` or is kept verbatim, so the
/// conversion step can name the field that held it.
#[derive(Debug)]
enum Loose<T> {
    Valid(T),
    Invalid { value: Value, reason: String },
}

impl<T> Loose<T> {
    fn check(self, field: &'static str) -> Result<T, ManifestError> {
        match self {
            Loose::Valid(v) => Ok(v),
            Loose::Invalid { value, reason } => {
                Err(ManifestError::malformed(field, value.to_string(), reason))
            }
        }
    }
}

impl<T: Serialize> Serialize for Loose<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Loose::Valid(v) => v.serialize(serializer),
            Loose::Invalid { value, .. } => value.serialize(serializer),
        }
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for Loose<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(match T::deserialize(&value) {
            Ok(v) => Loose::Valid(v),
            Err(e) => Loose::Invalid {
                value,
                reason: e.to_string(),
            },
        })
    }
}

fn checked<T>(field: &'static str, raw: Option<Loose<T>>) -> Result<Option<T>, ManifestError> {
    raw.map(|l| l.check(field)).transpose()
}

fn valid<T>(value: T) -> Option<Loose<T>> {
    Some(Loose::Valid(value))
}

// `metadata` stays strict: its `generated_with` map must be read as a stream
// to see duplicate keys.
#[derive(Debug, Serialize, Deserialize)]
struct RawManifest {
    format_version: Option<Loose<i64>>,
    header: Option<Loose<RawHeader>>,
    modules: Option<Loose<Vec<RawModule>>>,
    dependencies: Option<Loose<Vec<RawDependency>>>,
    capabilities: Option<Loose<Vec<String>>>,
    metadata: Option<RawMetadata>,
    subpacks: Option<Loose<Vec<RawSubpack>>>,
}

#[derive(Debug, Serialize, Deserialize)]
struct RawHeader {
    name: Option<Loose<String>>,
    description: Option<Loose<String>>,
    uuid: Option<Loose<String>>,
    version: Option<Loose<RawVersion>>,
    min_engine_version: Option<Loose<RawVersion>>,
    platform_locked: Option<Loose<bool>>,
    pack_scope: Option<Loose<String>>,
    base_game_version: Option<Loose<RawVersion>>,
    lock_template_options: Option<Loose<bool>>,
}

#[derive(Debug, Serialize, Deserialize)]
struct RawModule {
    #[serde(rename = "type")]
    module_type: Option<Loose<String>>,
    description: Option<Loose<String>>,
    uuid: Option<Loose<String>>,
    version: Option<Loose<RawVersion>>,
    language: Option<Loose<String>>,
    entry: Option<Loose<String>>,
}

#[derive(Debug, Serialize, Deserialize)]
struct RawDependency {
    uuid: Option<Loose<String>>,
    version: Option<Loose<RawVersion>>,
}

#[derive(Debug, Serialize, Deserialize)]
struct RawSubpack {
    folder_name: Option<Loose<String>>,
    name: Option<Loose<String>>,
    memory_tier: Option<Loose<i64>>,
}

#[derive(Debug, Serialize, Deserialize)]
struct RawMetadata {
    authors: Option<Loose<Vec<String>>>,
    url: Option<Loose<String>>,
    license: Option<Loose<String>>,
    generated_with: Option<GeneratedWithMap>,
}

/// `{"tool": [[1,0,0], ...], ...}` with entries kept in document order.
///
/// Duplicate keys are kept so that validation can report them instead of the
/// last one silently winning.
#[derive(Debug, Default)]
struct GeneratedWithMap(Vec<(String, Loose<Vec<RawVersion>>)>);

impl Serialize for GeneratedWithMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, versions) in &self.0 {
            map.serialize_entry(name, versions)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for GeneratedWithMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct EntriesVisitor;

        impl<'de> Visitor<'de> for EntriesVisitor {
            type Value = GeneratedWithMap;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an object mapping tool names to arrays of versions")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some(entry) = access.next_entry::<String, Loose<Vec<RawVersion>>>()? {
                    entries.push(entry);
                }
                Ok(GeneratedWithMap(entries))
            }
        }

        deserializer.deserialize_map(EntriesVisitor)
    }
}

// ---- model -> wire ----

fn raw_version(v: Version) -> RawVersion {
    v.to_array().map(i64::from)
}

impl From<&Header> for RawHeader {
    fn from(h: &Header) -> Self {
        Self {
            name: valid(h.name().to_owned()),
            description: h.description().map(|d| Loose::Valid(d.to_owned())),
            uuid: valid(h.uuid().to_string()),
            version: valid(raw_version(h.version())),
            min_engine_version: h.min_engine_version().map(|v| Loose::Valid(raw_version(v))),
            platform_locked: h.platform_locked().map(Loose::Valid),
            pack_scope: h.pack_scope().map(|s| Loose::Valid(s.as_str().to_owned())),
            base_game_version: h.base_game_version().map(|v| Loose::Valid(raw_version(v))),
            lock_template_options: h.lock_template_options().map(Loose::Valid),
        }
    }
}

impl From<&Module> for RawModule {
    fn from(m: &Module) -> Self {
        Self {
            module_type: valid(m.module_type().as_str().to_owned()),
            description: m.description().map(|d| Loose::Valid(d.to_owned())),
            uuid: valid(m.uuid().to_string()),
            version: valid(raw_version(m.version())),
            language: m.language().map(|l| Loose::Valid(l.as_str().to_owned())),
            entry: m.entry().map(|e| Loose::Valid(e.as_str().to_owned())),
        }
    }
}

impl From<&Dependency> for RawDependency {
    fn from(d: &Dependency) -> Self {
        Self {
            uuid: valid(d.uuid().to_string()),
            version: valid(raw_version(d.version())),
        }
    }
}

impl From<&Subpack> for RawSubpack {
    fn from(s: &Subpack) -> Self {
        Self {
            folder_name: valid(s.folder_name().as_str().to_owned()),
            name: valid(s.name().to_owned()),
            memory_tier: s.memory_tier().map(|t| Loose::Valid(i64::from(t))),
        }
    }
}

impl From<&GeneratedWith> for GeneratedWithMap {
    fn from(g: &GeneratedWith) -> Self {
        Self(vec![(
            g.name().to_owned(),
            Loose::Valid(g.versions().iter().copied().map(raw_version).collect()),
        )])
    }
}

impl From<&Metadata> for RawMetadata {
    fn from(m: &Metadata) -> Self {
        let generated_with: Vec<(String, Loose<Vec<RawVersion>>)> = m
            .generated_with()
            .iter()
            .flat_map(|g| GeneratedWithMap::from(g).0)
            .collect();
        Self {
            authors: non_empty(m.authors().iter().cloned().collect()),
            url: m.url().map(|u| Loose::Valid(u.to_owned())),
            license: m.license().map(|l| Loose::Valid(l.to_owned())),
            generated_with: (!generated_with.is_empty()).then_some(GeneratedWithMap(generated_with)),
        }
    }
}

impl From<&Manifest> for RawManifest {
    fn from(m: &Manifest) -> Self {
        Self {
            format_version: valid(i64::from(m.format_version())),
            header: valid(RawHeader::from(m.header())),
            modules: valid(m.modules().iter().map(RawModule::from).collect()),
            dependencies: non_empty(m.dependencies().iter().map(RawDependency::from).collect()),
            capabilities: non_empty(
                m.capabilities()
                    .iter()
                    .map(|c| c.as_str().to_owned())
                    .collect(),
            ),
            metadata: m.metadata().map(RawMetadata::from),
            subpacks: non_empty(m.subpacks().iter().map(RawSubpack::from).collect()),
        }
    }
}

fn non_empty<T>(items: Vec<T>) -> Option<Loose<Vec<T>>> {
    if items.is_empty() {
        None
    } else {
        Some(Loose::Valid(items))
    }
}

// ---- wire -> model ----

fn parse_uuid(field: &'static str, raw: Option<Loose<String>>) -> Result<Option<Uuid>, ManifestError> {
    checked(field, raw)?
        .map(|s| {
            if s.len() != 36 {
                return Err(ManifestError::malformed(
                    field,
                    s,
                    "expected hyphenated form xxxxxxxx-xxxx-xxxx-xxxx-xxxxxxxxxxxx",
                ));
            }
            Uuid::parse_str(&s)
                .map_err(|e| ManifestError::malformed(field, s.as_str(), e.to_string()))
        })
        .transpose()
}

fn parse_version(
    field: &'static str,
    raw: Option<Loose<RawVersion>>,
) -> Result<Option<Version>, ManifestError> {
    checked(field, raw)?
        .map(|parts| Version::try_from(parts).map_err(|e| e.with_field(field)))
        .transpose()
}

fn parse_name<T>(field: &'static str, raw: Option<Loose<String>>) -> Result<Option<T>, ManifestError>
where
    T: std::str::FromStr<Err = ManifestError>,
{
    checked(field, raw)?.map(|s| s.parse()).transpose()
}

impl TryFrom<RawHeader> for Header {
    type Error = ManifestError;

    fn try_from(raw: RawHeader) -> Result<Self, Self::Error> {
        Header::new(HeaderOptions {
            name: checked("name", raw.name)?,
            description: checked("description", raw.description)?,
            uuid: parse_uuid("uuid", raw.uuid)?,
            version: parse_version("version", raw.version)?,
            min_engine_version: parse_version("min_engine_version", raw.min_engine_version)?,
            platform_locked: checked("platform_locked", raw.platform_locked)?,
            pack_scope: parse_name::<PackScope>("pack_scope", raw.pack_scope)?,
            base_game_version: parse_version("base_game_version", raw.base_game_version)?,
            lock_template_options: checked("lock_template_options", raw.lock_template_options)?,
        })
    }
}

impl TryFrom<RawModule> for Module {
    type Error = ManifestError;

    fn try_from(raw: RawModule) -> Result<Self, Self::Error> {
        Module::new(ModuleOptions {
            module_type: parse_name::<ModuleType>("type", raw.module_type)?,
            description: checked("description", raw.description)?,
            uuid: parse_uuid("uuid", raw.uuid)?,
            version: parse_version("version", raw.version)?,
            language: parse_name::<Language>("language", raw.language)?,
            entry: checked("entry", raw.entry)?,
        })
    }
}

impl TryFrom<RawDependency> for Dependency {
    type Error = ManifestError;

    fn try_from(raw: RawDependency) -> Result<Self, Self::Error> {
        Dependency::new(DependencyOptions {
            uuid: parse_uuid("uuid", raw.uuid)?,
            version: parse_version("version", raw.version)?,
        })
    }
}

impl TryFrom<RawSubpack> for Subpack {
    type Error = ManifestError;

    fn try_from(raw: RawSubpack) -> Result<Self, Self::Error> {
        Subpack::new(SubpackOptions {
            folder_name: checked("folder_name", raw.folder_name)?,
            name: checked("name", raw.name)?,
            memory_tier: checked("memory_tier", raw.memory_tier)?,
        })
    }
}

impl TryFrom<RawMetadata> for Metadata {
    type Error = ManifestError;

    fn try_from(raw: RawMetadata) -> Result<Self, Self::Error> {
        let generated_with = raw
            .generated_with
            .unwrap_or_default()
            .0
            .into_iter()
            .map(|(name, versions)| {
                let versions = versions
                    .check("generated_with")?
                    .into_iter()
                    .map(|parts| Version::try_from(parts).map_err(|e| e.with_field("generated_with")))
                    .collect::<Result<Vec<_>, _>>()?;
                GeneratedWith::new(GeneratedWithOptions {
                    name: Some(name),
                    versions,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Metadata::new(MetadataOptions {
            authors: checked("authors", raw.authors)?.unwrap_or_default(),
            url: checked("url", raw.url)?,
            license: checked("license", raw.license)?,
            generated_with,
        })
    }
}

impl TryFrom<RawManifest> for Manifest {
    type Error = ManifestError;

    fn try_from(raw: RawManifest) -> Result<Self, Self::Error> {
        let format_version = checked("format_version", raw.format_version)?
            .map(normalize::check_format_version)
            .transpose()?;
        let header = checked("header", raw.header)?
            .map(Header::try_from)
            .transpose()?;
        let modules = collect("modules", raw.modules, Module::try_from)?;
        let dependencies = collect("dependencies", raw.dependencies, Dependency::try_from)?;
        let capabilities = checked("capabilities", raw.capabilities)?
            .unwrap_or_default()
            .iter()
            .map(|s| s.parse::<Capability>())
            .collect::<Result<Vec<_>, _>>()?;
        let metadata = raw.metadata.map(Metadata::try_from).transpose()?;
        let subpacks = collect("subpacks", raw.subpacks, Subpack::try_from)?;

        Manifest::new(ManifestOptions {
            format_version,
            header,
            modules,
            dependencies,
            capabilities,
            metadata,
            subpacks,
        })
    }
}

fn collect<R, T>(
    field: &'static str,
    raw: Option<Loose<Vec<R>>>,
    convert: impl Fn(R) -> Result<T, ManifestError>,
) -> Result<Vec<T>, ManifestError> {
    checked(field, raw)?
        .unwrap_or_default()
        .into_iter()
        .map(convert)
        .collect()
}

// ---- text ----

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Nulls {
    Omit,
    Keep,
}

/// Decode and validate a manifest document.
pub fn decode(input: &str) -> Result<Manifest, ManifestError> {
    let raw: RawManifest = serde_json::from_str(input)?;
    let manifest = Manifest::try_from(raw)?;
    debug!(
        "decoded manifest '{}' ({} modules)",
        manifest.header().name(),
        manifest.modules().len()
    );
    Ok(manifest)
}

/// Canonical pretty-printed encoding with unset optional fields omitted.
pub fn encode(manifest: &Manifest) -> Result<String, ManifestError> {
    let text = render(&RawManifest::from(manifest), Nulls::Omit)?;
    debug!("encoded manifest '{}' ({} bytes)", manifest.header().name(), text.len());
    Ok(text)
}

fn render<T: Serialize>(raw: &T, nulls: Nulls) -> Result<String, serde_json::Error> {
    let mut value = serde_json::to_value(raw)?;
    if nulls == Nulls::Omit {
        strip_nulls(&mut value);
    }
    let mut out = String::new();
    write_pretty(&value, 0, &mut out);
    Ok(out)
}

fn strip_nulls(value: &mut Value) {
    match value {
        Value::Object(map) => {
            map.retain(|_, v| !v.is_null());
            map.values_mut().for_each(strip_nulls);
        }
        Value::Array(items) => items.iter_mut().for_each(strip_nulls),
        _ => {}
    }
}

/// Arrays holding only numbers, or only such arrays, stay on one line.
fn is_compact(value: &Value) -> bool {
    match value {
        Value::Array(items) => items.iter().all(|v| v.is_number() || is_compact(v)),
        _ => false,
    }
}

fn push_indent(depth: usize, out: &mut String) {
    for _ in 0..depth {
        out.push_str(INDENT);
    }
}

fn write_pretty(value: &Value, depth: usize, out: &mut String) {
    match value {
        Value::Array(items) if !items.is_empty() && !is_compact(value) => {
            out.push_str("[\n");
            for (i, item) in items.iter().enumerate() {
                push_indent(depth + 1, out);
                write_pretty(item, depth + 1, out);
                if i + 1 < items.len() {
                    out.push(',');
                }
                out.push('\n');
            }
            push_indent(depth, out);
            out.push(']');
        }
        Value::Object(map) if !map.is_empty() => {
            out.push_str("{\n");
            for (i, (key, item)) in map.iter().enumerate() {
                push_indent(depth + 1, out);
                out.push_str(&Value::String(key.clone()).to_string());
                out.push_str(": ");
                write_pretty(item, depth + 1, out);
                if i + 1 < map.len() {
                    out.push(',');
                }
                out.push('\n');
            }
            push_indent(depth, out);
            out.push('}');
        }
        other => out.push_str(&other.to_string()),
    }
}

fn fmt_with_nulls<T: Serialize>(raw: &T, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let text = render(raw, Nulls::Keep).map_err(|_| fmt::Error)?;
    f.write_str(&text)
}

/// Diagnostic rendering: the wire form with unset fields shown as `null`.
impl fmt::Display for Manifest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_with_nulls(&RawManifest::from(self), f)
    }
}

impl fmt::Display for Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_with_nulls(&RawHeader::from(self), f)
    }
}

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_with_nulls(&RawModule::from(self), f)
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_with_nulls(&RawDependency::from(self), f)
    }
}

impl fmt::Display for Subpack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_with_nulls(&RawSubpack::from(self), f)
    }
}

impl fmt::Display for Metadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_with_nulls(&RawMetadata::from(self), f)
    }
}

impl fmt::Display for GeneratedWith {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_with_nulls(&GeneratedWithMap::from(self), f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pretty_printer_layout() {
        let value = serde_json::json!({
            "a": [1, 2, 3],
            "b": {"c": [[1, 0, 0], [2, 0, 0]]},
            "d": ["x", "y"],
            "e": [],
            "f": {}
        });
        let mut out = String::new();
        write_pretty(&value, 0, &mut out);
        let expected = r#"{
  "a": [1,2,3],
  "b": {
    "c": [[1,0,0],[2,0,0]]
  },
  "d": [
    "x",
    "y"
  ],
  "e": [],
  "f": {}
}"#;
        assert_eq!(out, expected);
    }

    #[test]
    fn strip_nulls_is_recursive() {
        let mut value = serde_json::json!({"a": null, "b": {"c": null, "d": 1}, "e": [{"f": null}]});
        strip_nulls(&mut value);
        assert_eq!(value, serde_json::json!({"b": {"d": 1}, "e": [{}]}));
    }

    #[test]
    fn generated_with_map_keeps_duplicates_for_validation() {
        let map: GeneratedWithMap =
            serde_json::from_str(r#"{"tool": [[1,0,0]], "tool": [[2,0,0]]}"#).unwrap();
        assert_eq!(map.0.len(), 2);
    }

    #[test]
    fn loose_value_keeps_wrong_type_for_reporting() {
        let loose: Loose<RawVersion> = serde_json::from_str("\"1.0.0\"").unwrap();
        let err = loose.check("version").unwrap_err();
        match err {
            ManifestError::Malformed { field, value, .. } => {
                assert_eq!(field, "version");
                assert_eq!(value, "\"1.0.0\"");
            }
            other => panic!("unexpected error: {other}"),
        }
        let loose: Loose<RawVersion> = serde_json::from_str("[1,2,3]").unwrap();
        assert_eq!(loose.check("version").unwrap(), [1, 2, 3]);
    }

    #[test]
    fn header_display_shows_nulls() {
        let header = Header::new(HeaderOptions {
            name: Some("Pack".to_owned()),
            uuid: Some(Uuid::nil()),
            ..HeaderOptions::default()
        })
        .unwrap();
        let text = header.to_string();
        assert!(text.contains("\"description\": null"), "{text}");
        assert!(text.contains("\"min_engine_version\": null"), "{text}");
        assert!(text.contains("\"version\": [1,0,0]"), "{text}");
        assert!(text.contains("00000000-0000-0000-0000-000000000000"), "{text}");
    }

    #[test]
    fn uuid_must_be_hyphenated() {
        let raw = |s: &str| Some(Loose::Valid(s.to_owned()));
        let err = parse_uuid("uuid", raw("00000000000000000000000000000000")).unwrap_err();
        assert!(matches!(err, ManifestError::Malformed { field: "uuid", .. }));
        let err = parse_uuid("uuid", raw("zzzzzzzz-0000-0000-0000-000000000000")).unwrap_err();
        assert!(matches!(err, ManifestError::Malformed { field: "uuid", .. }));
        assert!(parse_uuid("uuid", raw("0A1B2C3D-0000-4000-8000-000000000000"))
            .unwrap()
            .is_some());
    }
}
