//! Validated relative paths confined to one root directory.
//!
//! A path is normalized (`.` and `..` resolved, empty segments dropped), an
//! optional leading root segment is stripped, and what remains must be exactly
//! one name. That name is checked against a Windows-compatible file name
//! grammar on every host platform. The stored form is always re-anchored under
//! the root with forward slashes: `scripts/main.js`, `subpacks/high`.

use crate::error::ManifestError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Deref;
use std::str::FromStr;

const RESERVED_DEVICE_NAMES: &[&str] = &[
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

const FORBIDDEN_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

const MAX_NAME_LEN: usize = 255;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NameRule {
    /// A file: dots allowed inside, reserved names rejected with any extension.
    File,
    /// A directory: no dots at all.
    Folder,
}

fn check_name(field: &'static str, name: &str, rule: NameRule) -> Result<(), ManifestError> {
    let invalid = |reason: &str| ManifestError::malformed(field, name, reason);
    let chars: Vec<char> = name.chars().collect();
    if chars.is_empty() || chars.len() > MAX_NAME_LEN {
        return Err(invalid("name must be 1 to 255 characters"));
    }
    if rule == NameRule::Folder && name.contains('.') {
        return Err(invalid("folder name must not contain '.'"));
    }

    let stem = match rule {
        NameRule::File => name.split('.').next().unwrap_or(name),
        NameRule::Folder => name,
    };
    if RESERVED_DEVICE_NAMES
        .iter()
        .any(|r| r.eq_ignore_ascii_case(stem))
    {
        return Err(invalid("reserved device name"));
    }

    let last = chars.len() - 1;
    for (i, &c) in chars.iter().enumerate() {
        if FORBIDDEN_CHARS.contains(&c) || c == '\u{7f}' || c < ' ' {
            return Err(invalid("forbidden character"));
        }
        if (i == 0 || i == last) && c == ' ' {
            return Err(invalid("name must not start or end with a space"));
        }
        if i == last && c == '.' {
            return Err(invalid("name must not end with '.'"));
        }
    }
    Ok(())
}

/// Normalize `input` and return the single name it designates under `root`.
fn confine<'a>(
    field: &'static str,
    root: &str,
    input: &'a str,
    rule: NameRule,
) -> Result<&'a str, ManifestError> {
    if input.is_empty() {
        return Err(ManifestError::malformed(field, input, "path must not be empty"));
    }
    if input.starts_with('/') {
        return Err(ManifestError::malformed(field, input, "path must be relative"));
    }

    let mut segments: Vec<&str> = Vec::new();
    for segment in input.split('/') {
        match segment {
            "" | "." => {}
            ".." if segments.last().is_some_and(|s| *s != "..") => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }

    let name = match segments.as_slice() {
        [name] => *name,
        [first, name] if *first == root => *name,
        _ => {
            return Err(ManifestError::malformed(
                field,
                input,
                format!("must name one entry directly under \"{root}\""),
            ))
        }
    };
    check_name(field, name, rule)?;
    Ok(name)
}

macro_rules! rooted_path_newtype {
    ($(#[$meta:meta])* $name:ident, root = $root:literal, field = $field:literal, rule = $rule:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Directory every value of this type lives in.
            pub const ROOT: &'static str = $root;

            /// Validate `input` and anchor it under the root.
            pub fn new(input: &str) -> Result<Self, ManifestError> {
                let name = confine($field, $root, input, $rule)?;
                Ok(Self(format!("{}/{name}", $root)))
            }

            /// Full path including the root, using `/` separators.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// The final path segment without the root.
            pub fn name(&self) -> &str {
                &self.0[$root.len() + 1..]
            }
        }

        impl Deref for $name {
            type Target = str;
            fn deref(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl PartialEq<str> for $name {
            fn eq(&self, other: &str) -> bool {
                self.0 == other
            }
        }

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                self.0 == *other
            }
        }

        impl FromStr for $name {
            type Err = ManifestError;
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }

        impl TryFrom<String> for $name {
            type Error = ManifestError;
            fn try_from(s: String) -> Result<Self, Self::Error> {
                Self::new(&s)
            }
        }

        impl TryFrom<&str> for $name {
            type Error = ManifestError;
            fn try_from(s: &str) -> Result<Self, Self::Error> {
                Self::new(s)
            }
        }

        impl From<$name> for String {
            fn from(p: $name) -> Self {
                p.0
            }
        }
    };
}

rooted_path_newtype!(
    /// Script entry point, a file directly under `scripts/`.
    ScriptEntry,
    root = "scripts",
    field = "entry",
    rule = NameRule::File
);

rooted_path_newtype!(
    /// Subpack directory, a folder directly under `subpacks/`.
    SubpackFolder,
    root = "subpacks",
    field = "folder_name",
    rule = NameRule::Folder
);

impl ScriptEntry {
    /// File extension after the last `.`, if any.
    pub fn extension(&self) -> Option<&str> {
        self.name().rsplit_once('.').map(|(_, ext)| ext)
    }
}
