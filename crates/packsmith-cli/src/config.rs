use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Defaults applied to manifests created with `packsmith new`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PacksmithConfig {
    #[serde(default)]
    pub authors: Vec<String>,
    #[serde(default)]
    pub license: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

impl PacksmithConfig {
    /// Load from `$PACKSMITH_CONFIG`, else `~/.config/packsmith/config.json`.
    /// A missing file yields the empty default.
    pub fn load_default() -> Result<Self, String> {
        match default_config_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("failed to read config {}: {e}", path.display()))?;
        serde_json::from_str(&content)
            .map_err(|e| format!("invalid config {}: {e}", path.display()))
    }
}

fn default_config_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os("PACKSMITH_CONFIG") {
        return Some(PathBuf::from(path));
    }
    let home = std::env::var_os("HOME")?;
    Some(PathBuf::from(home).join(".config/packsmith/config.json"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_loads_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"authors": ["Ana"]}"#).unwrap();

        let loaded = PacksmithConfig::load(&path).unwrap();
        assert_eq!(loaded.authors, ["Ana"]);
        assert_eq!(loaded.license, None);
    }

    #[test]
    fn config_rejects_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{authors").unwrap();

        let err = PacksmithConfig::load(&path).unwrap_err();
        assert!(err.starts_with("invalid config"), "{err}");
    }
}
