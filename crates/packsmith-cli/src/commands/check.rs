use super::{colorize_status, json_pretty, read_manifest, EXIT_SUCCESS};
use packsmith_schema::Manifest;
use std::path::Path;
use tracing::debug;

fn summary(path: &Path, manifest: &Manifest) -> serde_json::Value {
    let header = manifest.header();
    serde_json::json!({
        "status": "valid",
        "path": path.display().to_string(),
        "name": header.name(),
        "uuid": header.uuid().to_string(),
        "version": header.version().to_string(),
        "format_version": manifest.format_version(),
        "module_types": manifest
            .module_types()
            .iter()
            .map(|t| t.as_str())
            .collect::<Vec<_>>(),
        "modules": manifest.modules().len(),
        "dependencies": manifest.dependencies().len(),
        "subpacks": manifest.subpacks().len(),
    })
}

pub fn run(path: &Path, json: bool) -> Result<u8, String> {
    let (_, manifest) = read_manifest(path)?;
    debug!("{} is valid", path.display());

    if json {
        println!("{}", json_pretty(&summary(path, &manifest))?);
    } else {
        let header = manifest.header();
        let types: Vec<&str> = manifest.module_types().iter().map(|t| t.as_str()).collect();
        println!("{}: {}", path.display(), colorize_status("valid"));
        println!("name:            {}", header.name());
        println!("uuid:            {}", header.uuid());
        println!("version:         {}", header.version());
        println!("format_version:  {}", manifest.format_version());
        println!("module types:    {}", types.join(", "));
        if !manifest.dependencies().is_empty() {
            println!("dependencies:    {}", manifest.dependencies().len());
        }
    }
    Ok(EXIT_SUCCESS)
}
