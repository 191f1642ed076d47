mod commands;
mod config;

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use commands::{EXIT_FAILURE, EXIT_MANIFEST_ERROR};
use packsmith_schema::ModuleType;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "packsmith",
    version,
    about = "Check, format, and create content pack manifests"
)]
struct Cli {
    /// Output results as structured JSON.
    #[arg(long, default_value_t = false, global = true)]
    json: bool,

    /// Enable verbose (debug) logging output.
    #[arg(short, long, default_value_t = false, global = true)]
    verbose: bool,

    /// Enable trace-level logging (more detailed than --verbose).
    #[arg(long, default_value_t = false, global = true)]
    trace: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Decode and validate a manifest.
    Check {
        /// Path to manifest JSON file.
        #[arg(default_value = "manifest.json")]
        file: PathBuf,
    },
    /// Rewrite a manifest in canonical form.
    Fmt {
        /// Path to manifest JSON file.
        #[arg(default_value = "manifest.json")]
        file: PathBuf,
        /// Exit non-zero if the file is not already canonical.
        #[arg(long, default_value_t = false, conflicts_with = "write")]
        check: bool,
        /// Replace the file in place instead of printing to stdout.
        #[arg(long, default_value_t = false)]
        write: bool,
    },
    /// Create a minimal manifest.
    New {
        /// Pack name.
        name: String,
        /// Module type (resources, data, client_data, interface, world_template, script, skin_pack).
        #[arg(long = "type", value_parser = parse_module_type)]
        module_type: ModuleType,
        /// Script entry point, required for script packs.
        #[arg(long)]
        entry: Option<String>,
        /// Destination file.
        #[arg(long, short, default_value = "manifest.json")]
        output: PathBuf,
        /// Overwrite an existing file without asking.
        #[arg(long, default_value_t = false)]
        force: bool,
    },
    /// Generate shell completions for bash, zsh, fish, elvish, or powershell.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

fn parse_module_type(raw: &str) -> Result<ModuleType, String> {
    raw.parse().map_err(|e: packsmith_schema::ManifestError| e.to_string())
}

fn main() -> ExitCode {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let msg = info.to_string();
        if msg.contains("Broken pipe")
            || msg.contains("broken pipe")
            || msg.contains("os error 32")
            || msg.contains("failed printing to stdout")
        {
            std::process::exit(0);
        }
        default_hook(info);
    }));

    let cli = Cli::parse();

    let default_level = if cli.trace {
        "trace"
    } else if cli.verbose {
        "debug"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("PACKSMITH_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let json_output = cli.json;

    let result = match cli.command {
        Commands::Check { file } => commands::check::run(&file, json_output),
        Commands::Fmt { file, check, write } => commands::fmt::run(&file, check, write, json_output),
        Commands::New {
            name,
            module_type,
            entry,
            output,
            force,
        } => commands::new::run(
            &commands::new::NewArgs {
                name: &name,
                module_type,
                entry: entry.as_deref(),
                output: &output,
                force,
            },
            json_output,
        ),
        Commands::Completions { shell } => commands::completions::run::<Cli>(shell),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(msg) => {
            eprintln!("error: {msg}");
            let code = if msg.starts_with("manifest error:")
                || msg.starts_with("failed to read manifest")
            {
                EXIT_MANIFEST_ERROR
            } else {
                EXIT_FAILURE
            };
            ExitCode::from(code)
        }
    }
}
