use crate::error::ManifestError;
use crate::names::wire_enum;
use crate::version::Version;
use uuid::Uuid;

wire_enum! {
    field = "pack_scope";
    /// Where a pack may be applied.
    pub enum PackScope {
        Global,
        World,
    }
}

/// Construction input for [`Header`].
///
/// Which of `min_engine_version`, `base_game_version` and
/// `lock_template_options` are allowed depends on the manifest's modules and
/// format revision, so they are only checked when the header is attached to
/// a [`Manifest`](crate::Manifest).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderOptions {
    pub name: Option<String>,
    pub description: Option<String>,
    pub uuid: Option<Uuid>,
    pub version: Option<Version>,
    pub min_engine_version: Option<Version>,
    pub platform_locked: Option<bool>,
    pub pack_scope: Option<PackScope>,
    pub base_game_version: Option<Version>,
    pub lock_template_options: Option<bool>,
}

/// Identity and compatibility record of a pack.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Header {
    pub(crate) name: String,
    pub(crate) description: Option<String>,
    pub(crate) uuid: Uuid,
    pub(crate) version: Version,
    pub(crate) min_engine_version: Option<Version>,
    pub(crate) platform_locked: Option<bool>,
    pub(crate) pack_scope: Option<PackScope>,
    pub(crate) base_game_version: Option<Version>,
    pub(crate) lock_template_options: Option<bool>,
}

impl Header {
    pub fn new(options: HeaderOptions) -> Result<Self, ManifestError> {
        let name = options
            .name
            .ok_or(ManifestError::MissingField { field: "name" })?;
        Ok(Self {
            name,
            description: options.description,
            uuid: options.uuid.unwrap_or_else(Uuid::new_v4),
            version: options.version.unwrap_or_default(),
            min_engine_version: options.min_engine_version,
            platform_locked: options.platform_locked,
            pack_scope: options.pack_scope,
            base_game_version: options.base_game_version,
            lock_template_options: options.lock_template_options,
        })
    }

    /// A header with only a name; everything else defaulted.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            uuid: Uuid::new_v4(),
            version: Version::DEFAULT,
            min_engine_version: None,
            platform_locked: None,
            pack_scope: None,
            base_game_version: None,
            lock_template_options: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
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

    pub fn min_engine_version(&self) -> Option<Version> {
        self.min_engine_version
    }

    pub fn platform_locked(&self) -> Option<bool> {
        self.platform_locked
    }

    pub fn pack_scope(&self) -> Option<PackScope> {
        self.pack_scope
    }

    pub fn base_game_version(&self) -> Option<Version> {
        self.base_game_version
    }

    pub fn lock_template_options(&self) -> Option<bool> {
        self.lock_template_options
    }

    pub fn to_options(&self) -> HeaderOptions {
        HeaderOptions {
            name: Some(self.name.clone()),
            description: self.description.clone(),
            uuid: Some(self.uuid),
            version: Some(self.version),
            min_engine_version: self.min_engine_version,
            platform_locked: self.platform_locked,
            pack_scope: self.pack_scope,
            base_game_version: self.base_game_version,
            lock_template_options: self.lock_template_options,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_is_required() {
        let err = Header::new(HeaderOptions::default()).unwrap_err();
        assert!(matches!(err, ManifestError::MissingField { field: "name" }));
    }

    #[test]
    fn draft_keeps_context_fields_unset() {
        let h = Header::named("Pack");
        assert_eq!(h.name(), "Pack");
        assert_eq!(h.version(), Version::DEFAULT);
        assert!(h.min_engine_version().is_none());
        assert!(h.base_game_version().is_none());
        assert!(h.lock_template_options().is_none());
    }

    #[test]
    fn to_options_round_trips() {
        let h = Header::new(HeaderOptions {
            name: Some("Pack".to_owned()),
            description: Some("desc".to_owned()),
            pack_scope: Some(PackScope::World),
            platform_locked: Some(true),
            ..HeaderOptions::default()
        })
        .unwrap();
        assert_eq!(Header::new(h.to_options()).unwrap(), h);
    }

    #[test]
    fn pack_scope_names() {
        assert_eq!(PackScope::Global.as_str(), "global");
        assert_eq!("world".parse::<PackScope>().unwrap(), PackScope::World);
    }
}
