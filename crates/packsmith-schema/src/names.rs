//! Wire names for closed enumerations.
//!
//! Each enumeration gets one [`NameTable`] built on first use. A constant
//! encodes as the snake_case form of its identifier unless it declares an
//! explicit name, and may list alternate spellings accepted only when decoding.
//! Two constants claiming the same primary name make the table fail to build.
//! An alternate claimed by two constants is dropped for both.

use crate::error::ManifestError;
use std::collections::{HashMap, HashSet};

/// Registration of one enum constant.
#[derive(Debug, Clone, Copy)]
pub struct NameEntry<T: 'static> {
    pub value: T,
    pub ident: &'static str,
    pub rename: Option<&'static str>,
    pub alternates: &'static [&'static str],
}

/// Bidirectional constant/name mapping for one enumeration.
#[derive(Debug)]
pub struct NameTable<T> {
    names: Vec<(T, String)>,
    lookup: HashMap<String, T>,
}

impl<T: Copy + Eq> NameTable<T> {
    pub fn new(entries: &[NameEntry<T>]) -> Result<Self, ManifestError> {
        let mut names = Vec::with_capacity(entries.len());
        let mut primary: HashMap<String, T> = HashMap::with_capacity(entries.len());
        let mut alternates: HashMap<&'static str, T> = HashMap::new();
        let mut ambiguous: HashSet<&'static str> = HashSet::new();

        for entry in entries {
            let name = entry
                .rename
                .map_or_else(|| to_snake_case(entry.ident), str::to_owned);
            if primary.insert(name.clone(), entry.value).is_some() {
                return Err(ManifestError::DuplicateKey {
                    field: "serialized name",
                    key: name,
                });
            }
            for &alt in entry.alternates {
                if alternates.insert(alt, entry.value).is_some() {
                    ambiguous.insert(alt);
                }
            }
            names.push((entry.value, name));
        }
        for alt in ambiguous {
            alternates.remove(alt);
        }

        let mut lookup: HashMap<String, T> = alternates
            .into_iter()
            .map(|(alt, value)| (alt.to_owned(), value))
            .collect();
        // Primary names win over any alternate with the same spelling.
        lookup.extend(primary);

        Ok(Self { names, lookup })
    }

    pub fn name_of(&self, value: T) -> Option<&str> {
        self.names
            .iter()
            .find(|(v, _)| *v == value)
            .map(|(_, name)| name.as_str())
    }

    pub fn lookup(&self, name: &str) -> Option<T> {
        self.lookup.get(name).copied()
    }

    /// Primary names in declaration order.
    pub fn primary_names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(|(_, name)| name.as_str())
    }
}

/// Convert a `camelCase`, `PascalCase` or `SCREAMING_SNAKE` identifier to
/// lower snake_case: `minEngineVersion` becomes `min_engine_version`.
pub fn to_snake_case(ident: &str) -> String {
    let chars: Vec<char> = ident.chars().collect();
    let mut out = String::with_capacity(ident.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if !c.is_alphanumeric() {
            if !out.is_empty() && !out.ends_with('_') {
                out.push('_');
            }
            continue;
        }
        if i > 0 && !out.is_empty() && !out.ends_with('_') {
            let prev = chars[i - 1];
            let next = chars.get(i + 1).copied();
            let boundary = (c.is_uppercase() && (prev.is_lowercase() || prev.is_ascii_digit()))
                || (c.is_uppercase()
                    && prev.is_uppercase()
                    && next.is_some_and(char::is_lowercase))
                || (c.is_ascii_digit() && prev.is_alphabetic())
                || (c.is_alphabetic() && prev.is_ascii_digit());
            if boundary {
                out.push('_');
            }
        }
        out.extend(c.to_lowercase());
    }
    while out.ends_with('_') {
        out.pop();
    }
    out
}

/// Longest wire name [`wire_names_unique`] can check.
pub const MAX_WIRE_NAME_LEN: usize = 64;

/// Compile-time rendition of a primary wire name: `rename` if given, else the
/// snake_case form of `ident`. Agrees with [`to_snake_case`] on ASCII input.
pub const fn const_wire_name(ident: &str, rename: Option<&str>) -> ([u8; MAX_WIRE_NAME_LEN], usize) {
    let mut out = [0u8; MAX_WIRE_NAME_LEN];
    let mut len = 0;
    if let Some(rename) = rename {
        let bytes = rename.as_bytes();
        assert!(bytes.len() <= MAX_WIRE_NAME_LEN, "wire name too long");
        while len < bytes.len() {
            out[len] = bytes[len];
            len += 1;
        }
        return (out, len);
    }

    let bytes = ident.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        assert!(len + 2 <= MAX_WIRE_NAME_LEN, "wire name too long");
        let c = bytes[i];
        if !c.is_ascii_alphanumeric() {
            if len > 0 && out[len - 1] != b'_' {
                out[len] = b'_';
                len += 1;
            }
            i += 1;
            continue;
        }
        if i > 0 && len > 0 && out[len - 1] != b'_' {
            let prev = bytes[i - 1];
            let next_lower = i + 1 < bytes.len() && bytes[i + 1].is_ascii_lowercase();
            let boundary = (c.is_ascii_uppercase()
                && (prev.is_ascii_lowercase() || prev.is_ascii_digit()))
                || (c.is_ascii_uppercase() && prev.is_ascii_uppercase() && next_lower)
                || (c.is_ascii_digit() && prev.is_ascii_alphabetic())
                || (c.is_ascii_alphabetic() && prev.is_ascii_digit());
            if boundary {
                out[len] = b'_';
                len += 1;
            }
        }
        out[len] = c.to_ascii_lowercase();
        len += 1;
        i += 1;
    }
    while len > 0 && out[len - 1] == b'_' {
        len -= 1;
    }
    (out, len)
}

const fn same_name(a: &([u8; MAX_WIRE_NAME_LEN], usize), b: &([u8; MAX_WIRE_NAME_LEN], usize)) -> bool {
    if a.1 != b.1 {
        return false;
    }
    let mut i = 0;
    while i < a.1 {
        if a.0[i] != b.0[i] {
            return false;
        }
        i += 1;
    }
    true
}

/// Whether every `(ident, rename)` pair resolves to a distinct primary name.
///
/// [`wire_enum!`] evaluates this in a `const` item, so a collision is a build
/// error rather than a failure on first use:
///
/// ```compile_fail
/// use packsmith_schema::names::wire_names_unique;
///
/// const _: () = assert!(wire_names_unique(&[("Alpha", Some("same")), ("Beta", Some("same"))]));
/// ```
///
/// ```
/// use packsmith_schema::names::wire_names_unique;
///
/// const _: () = assert!(wire_names_unique(&[("Alpha", None), ("Beta", Some("beta_2"))]));
/// ```
pub const fn wire_names_unique(entries: &[(&str, Option<&str>)]) -> bool {
    let mut i = 0;
    while i < entries.len() {
        let a = const_wire_name(entries[i].0, entries[i].1);
        let mut j = i + 1;
        while j < entries.len() {
            let b = const_wire_name(entries[j].0, entries[j].1);
            if same_name(&a, &b) {
                return false;
            }
            j += 1;
        }
        i += 1;
    }
    true
}

/// Declare a closed enumeration with a static wire-name table.
///
/// ```ignore
/// wire_enum! {
///     field = "pack_scope";
///     pub enum PackScope {
///         Global,
///         World,
///     }
/// }
/// ```
///
/// A variant may be followed by `= "name"` to override its wire name and by
/// `| ["alt", ...]` to accept alternate spellings when decoding. Two variants
/// resolving to the same primary name fail to compile.
macro_rules! wire_enum {
    (
        field = $field:literal;
        $(#[$meta:meta])*
        pub enum $name:ident {
            $(
                $(#[$vmeta:meta])*
                $variant:ident $(= $rename:literal)? $(| [$($alt:literal),* $(,)?])?
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub enum $name {
            $( $(#[$vmeta])* $variant, )+
        }

        const _: () = assert!(
            $crate::names::wire_names_unique(&[
                $((stringify!($variant), wire_enum!(@rename $($rename)?)),)+
            ]),
            "wire names of a wire_enum must be unique"
        );

        impl $name {
            /// Every constant in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub(crate) fn name_table() -> &'static $crate::names::NameTable<$name> {
                static TABLE: std::sync::OnceLock<$crate::names::NameTable<$name>> =
                    std::sync::OnceLock::new();
                TABLE.get_or_init(|| {
                    $crate::names::NameTable::new(&[
                        $(
                            $crate::names::NameEntry {
                                value: $name::$variant,
                                ident: stringify!($variant),
                                rename: wire_enum!(@rename $($rename)?),
                                alternates: &[$($($alt),*)?],
                            },
                        )+
                    ])
                    .expect(concat!("wire names of ", stringify!($name), " must be unique"))
                })
            }

            /// The name this constant encodes as.
            pub fn as_str(self) -> &'static str {
                Self::name_table()
                    .name_of(self)
                    .expect("every constant is registered in its table")
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::error::ManifestError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let table = Self::name_table();
                table.lookup(s).ok_or_else(|| {
                    let expected: Vec<&str> = table.primary_names().collect();
                    $crate::error::ManifestError::malformed(
                        $field,
                        s,
                        format!("expected one of: {}", expected.join(", ")),
                    )
                })
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = <String as serde::Deserialize>::deserialize(deserializer)?;
                raw.parse::<$name>().map_err(serde::de::Error::custom)
            }
        }
    };
    (@rename) => { None };
    (@rename $rename:literal) => { Some($rename) };
}

pub(crate) use wire_enum;
