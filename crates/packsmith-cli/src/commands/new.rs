use super::{colorize_status, file_text, json_pretty, manifest_error, write_atomic, EXIT_SUCCESS};
use crate::config::PacksmithConfig;
use dialoguer::Confirm;
use packsmith_schema::{
    GeneratedWith, Header, Manifest, ManifestError, ManifestOptions, Metadata, MetadataOptions,
    Module, ModuleOptions, ModuleType,
};
use std::io::{stderr, stdin, IsTerminal};
use std::path::Path;
use tracing::debug;

pub struct NewArgs<'a> {
    pub name: &'a str,
    pub module_type: ModuleType,
    pub entry: Option<&'a str>,
    pub output: &'a Path,
    pub force: bool,
}

fn build_manifest(
    args: &NewArgs<'_>,
    config: &PacksmithConfig,
) -> Result<Manifest, ManifestError> {
    let module = Module::new(ModuleOptions {
        module_type: Some(args.module_type),
        entry: args.entry.map(str::to_owned),
        ..ModuleOptions::default()
    })?;
    let metadata = Metadata::new(MetadataOptions {
        authors: config.authors.clone(),
        url: config.url.clone(),
        license: config.license.clone(),
        generated_with: vec![GeneratedWith::packsmith()?],
    })?;

    Manifest::new(ManifestOptions {
        header: Some(Header::named(args.name)),
        modules: vec![module],
        metadata: Some(metadata),
        ..ManifestOptions::default()
    })
}

fn ensure_can_write(dest: &Path, force: bool, is_tty: bool) -> Result<(), String> {
    if !dest.exists() || force {
        return Ok(());
    }
    let refusal = || format!("refusing to overwrite existing {} (pass --force)", dest.display());
    if !is_tty {
        return Err(refusal());
    }
    let overwrite = Confirm::new()
        .with_prompt(format!("overwrite {}?", dest.display()))
        .default(false)
        .interact()
        .map_err(|e| format!("prompt failed: {e}"))?;
    if overwrite {
        Ok(())
    } else {
        Err(refusal())
    }
}

fn print_result(args: &NewArgs<'_>, manifest: &Manifest, json: bool) -> Result<(), String> {
    if json {
        let payload = serde_json::json!({
            "status": "written",
            "path": args.output.display().to_string(),
            "name": args.name,
            "uuid": manifest.header().uuid().to_string(),
            "type": args.module_type.as_str(),
        });
        println!("{}", json_pretty(&payload)?);
    } else {
        println!(
            "{} {} for '{}'",
            colorize_status("written"),
            args.output.display(),
            args.name
        );
        println!("uuid: {}", manifest.header().uuid());
    }
    Ok(())
}

pub fn run(args: &NewArgs<'_>, json: bool) -> Result<u8, String> {
    let is_tty = stdin().is_terminal() && stderr().is_terminal();
    let config = PacksmithConfig::load_default()?;
    let manifest = build_manifest(args, &config).map_err(|e| manifest_error(&e))?;
    ensure_can_write(args.output, args.force, is_tty)?;

    let canonical = manifest.to_json().map_err(|e| manifest_error(&e))?;
    write_atomic(args.output, &file_text(&canonical))?;
    debug!("wrote {}", args.output.display());
    print_result(args, &manifest, json)?;
    Ok(EXIT_SUCCESS)
}
