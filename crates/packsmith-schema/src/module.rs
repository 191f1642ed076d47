use crate::error::ManifestError;
use crate::names::wire_enum;
use crate::types::ScriptEntry;
use crate::version::Version;
use std::cmp::Ordering;
use uuid::Uuid;

wire_enum! {
    field = "type";
    /// What a module contributes to the pack.
    pub enum ModuleType {
        /// Resource pack content.
        Resources,
        /// Behavior pack content.
        Data,
        /// Client-side scripting data.
        ClientData,
        Interface,
        WorldTemplate,
        /// Script API entry point; requires `language` and `entry`.
        Script,
        SkinPack,
    }
}

wire_enum! {
    field = "language";
    /// Scripting language of a SCRIPT module.
    pub enum Language {
        JavaScript = "javascript" | ["JavaScript"],
    }
}

/// Mutually exclusive groups of module types. Every module in a manifest
/// must come from the same group.
pub const PERMITTED_TYPE_GROUPS: &[&[ModuleType]] = &[
    &[ModuleType::Resources],
    &[
        ModuleType::Data,
        ModuleType::ClientData,
        ModuleType::Interface,
        ModuleType::Script,
    ],
    &[ModuleType::WorldTemplate],
    &[ModuleType::SkinPack],
];

impl ModuleType {
    /// Index into [`PERMITTED_TYPE_GROUPS`] of the group containing this type.
    pub fn group(self) -> Option<usize> {
        PERMITTED_TYPE_GROUPS.iter().position(|g| g.contains(&self))
    }
}

impl Language {
    /// File extension an entry written in this language must carry.
    pub fn extension(self) -> &'static str {
        match self {
            Language::JavaScript => "js",
        }
    }
}

impl Default for Language {
    fn default() -> Self {
        Language::JavaScript
    }
}

/// Construction input for [`Module`]. Unset fields take their defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleOptions {
    pub module_type: Option<ModuleType>,
    pub description: Option<String>,
    pub uuid: Option<Uuid>,
    pub version: Option<Version>,
    pub language: Option<Language>,
    /// Path of the script entry, with or without the leading `scripts/`.
    pub entry: Option<String>,
}

/// One functional constituent of a pack.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Module {
    module_type: ModuleType,
    description: Option<String>,
    uuid: Uuid,
    version: Version,
    language: Option<Language>,
    entry: Option<ScriptEntry>,
}

impl Module {
    pub fn new(options: ModuleOptions) -> Result<Self, ManifestError> {
        let module_type = options
            .module_type
            .ok_or(ManifestError::MissingField { field: "type" })?;

        let (language, entry) = if module_type == ModuleType::Script {
            let language = options.language.unwrap_or_default();
            let raw_entry = options
                .entry
                .ok_or(ManifestError::MissingField { field: "entry" })?;
            let entry = ScriptEntry::new(&raw_entry)?;
            if entry.extension() != Some(language.extension()) {
                return Err(ManifestError::malformed(
                    "entry",
                    entry.as_str(),
                    format!(
                        "extension must be .{} when language is {language}",
                        language.extension()
                    ),
                ));
            }
            (Some(language), Some(entry))
        } else {
            if let Some(language) = options.language {
                return Err(ManifestError::illegal(
                    "language",
                    language,
                    "only script modules have a language",
                ));
            }
            if let Some(entry) = options.entry {
                return Err(ManifestError::illegal(
                    "entry",
                    entry,
                    "only script modules have an entry",
                ));
            }
            (None, None)
        };

        Ok(Self {
            module_type,
            description: options.description,
            uuid: options.uuid.unwrap_or_else(Uuid::new_v4),
            version: options.version.unwrap_or_default(),
            language,
            entry,
        })
    }

    /// A module of `module_type` with every other field defaulted.
    ///
    /// Fails for [`ModuleType::Script`], which needs an entry.
    pub fn of(module_type: ModuleType) -> Result<Self, ManifestError> {
        Self::new(ModuleOptions {
            module_type: Some(module_type),
            ..ModuleOptions::default()
        })
    }

    pub fn module_type(&self) -> ModuleType {
        self.module_type
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn uuid(&self) -> Uuid {
        self.uuid
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn language(&self) -> Option<Language> {
        self.language
    }

    pub fn entry(&self) -> Option<&ScriptEntry> {
        self.entry.as_ref()
    }

    pub fn to_options(&self) -> ModuleOptions {
        ModuleOptions {
            module_type: Some(self.module_type),
            description: self.description.clone(),
            uuid: Some(self.uuid),
            version: Some(self.version),
            language: self.language,
            entry: self.entry.as_ref().map(|e| e.as_str().to_owned()),
        }
    }
}

impl Ord for Module {
    fn cmp(&self, other: &Self) -> Ordering {
        self.uuid
            .cmp(&other.uuid)
            .then_with(|| self.version.cmp(&other.version))
            .then_with(|| self.module_type.cmp(&other.module_type))
            .then_with(|| self.language.cmp(&other.language))
            .then_with(|| self.entry.cmp(&other.entry))
            .then_with(|| self.description.cmp(&other.description))
    }
}

impl PartialOrd for Module {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
