use super::{
    colorize_status, file_text, json_pretty, manifest_error, read_manifest, write_atomic,
    EXIT_FAILURE, EXIT_SUCCESS,
};
use std::path::Path;
use tracing::debug;

fn is_canonical(input: &str, canonical: &str) -> bool {
    input.strip_suffix('\n').unwrap_or(input) == canonical
}

pub fn run(path: &Path, check: bool, write: bool, json: bool) -> Result<u8, String> {
    let (input, manifest) = read_manifest(path)?;
    let canonical = manifest.to_json().map_err(|e| manifest_error(&e))?;
    let unchanged = is_canonical(&input, &canonical);
    debug!("{} canonical: {unchanged}", path.display());

    if check {
        let status = if unchanged { "unchanged" } else { "needs formatting" };
        if json {
            let payload = serde_json::json!({
                "path": path.display().to_string(),
                "status": status,
            });
            println!("{}", json_pretty(&payload)?);
        } else {
            println!("{}: {}", path.display(), colorize_status(status));
        }
        return Ok(if unchanged { EXIT_SUCCESS } else { EXIT_FAILURE });
    }

    if write {
        let status = if unchanged {
            "unchanged"
        } else {
            write_atomic(path, &file_text(&canonical))?;
            "formatted"
        };
        if json {
            let payload = serde_json::json!({
                "path": path.display().to_string(),
                "status": status,
            });
            println!("{}", json_pretty(&payload)?);
        } else {
            println!("{}: {}", path.display(), colorize_status(status));
        }
        return Ok(EXIT_SUCCESS);
    }

    println!("{canonical}");
    Ok(EXIT_SUCCESS)
}
