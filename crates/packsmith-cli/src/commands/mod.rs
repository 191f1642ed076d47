pub mod check;
pub mod completions;
pub mod fmt;
pub mod new;

use packsmith_schema::{Manifest, ManifestError};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_MANIFEST_ERROR: u8 = 2;

pub fn json_pretty(value: &impl serde::Serialize) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|e| format!("JSON serialization failed: {e}"))
}

pub fn manifest_error(err: &ManifestError) -> String {
    format!("manifest error: {err}")
}

pub fn read_manifest(path: &Path) -> Result<(String, Manifest), String> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("failed to read manifest {}: {e}", path.display()))?;
    let manifest = Manifest::from_json(&text).map_err(|e| manifest_error(&e))?;
    Ok((text, manifest))
}

/// Write `content` next to `dest` and rename it into place.
pub fn write_atomic(dest: &Path, content: &str) -> Result<(), String> {
    let dir = dest
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
    let mut tmp = NamedTempFile::new_in(&dir).map_err(|e| format!("write temp file: {e}"))?;
    use std::io::Write;
    tmp.write_all(content.as_bytes())
        .map_err(|e| format!("write temp file: {e}"))?;
    tmp.as_file()
        .sync_all()
        .map_err(|e| format!("fsync temp file: {e}"))?;
    tmp.persist(dest)
        .map_err(|e| format!("persist manifest: {}", e.error))?;
    Ok(())
}

/// Canonical text as stored on disk: the encoding plus a final newline.
pub fn file_text(canonical: &str) -> String {
    format!("{canonical}\n")
}

pub fn colorize_status(status: &str) -> String {
    use console::Style;
    match status {
        "valid" | "formatted" | "written" => Style::new().green().apply_to(status).to_string(),
        "unchanged" => Style::new().dim().apply_to(status).to_string(),
        "needs formatting" => Style::new().yellow().apply_to(status).to_string(),
        other => other.to_owned(),
    }
}
