//! The inject compiler CLI.
//!
//! `injectc <model.json>` generates an implementation for every `@Component`
//! class in the model and writes it under the output directory.
//!
//! Options:
//! - `--output` - Directory the generated sources are written to
//! - `--config` - Path to an `inject.toml` (default: next to the model)
//! - `-P key=value` - Processor option, e.g. `inject.enableJavaxAnnotations=true`
//! - `--enable-javax-annotations` / `--generate-companion-extensions`
//! - `--json` - Output diagnostics as JSON (one object per line)
//! - `--no-color` - Disable colorized output

mod logging;

use std::path::{Path, PathBuf};
use std::process;

use anyhow::{bail, Context as _};
use clap::Parser;
use tracing::{debug, info};

use inject_common::Options;
use inject_graph::diagnostics::{render_diagnostic, DiagnosticOptions};
use inject_model::{CollectingMessenger, Diagnostic, MemoryModel};

#[derive(Parser)]
#[command(name = "injectc", version, about = "The inject component compiler")]
struct Cli {
    /// Path to the JSON model of the program
    model: PathBuf,

    /// Directory the generated sources are written to
    #[arg(short, long, default_value = "generated")]
    output: PathBuf,

    /// Path to an inject.toml; defaults to inject.toml next to the model
    #[arg(long)]
    config: Option<PathBuf>,

    /// Processor option as key=value (e.g. inject.generateCompanionExtensions=true)
    #[arg(short = 'P', long = "option", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    options: Vec<(String, String)>,

    /// Recognize javax.inject annotations
    #[arg(long = "enable-javax-annotations")]
    enable_javax_annotations: bool,

    /// Generate `create` as an extension of the component's companion object
    #[arg(long = "generate-companion-extensions")]
    generate_companion_extensions: bool,

    /// Output diagnostics as JSON (one object per line) instead of human-readable format
    #[arg(long)]
    json: bool,

    /// Disable colorized output
    #[arg(long = "no-color")]
    no_color: bool,
}

fn parse_key_value(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.trim().to_string()))
        }
        _ => Err(format!("expected KEY=VALUE, found '{}'", s)),
    }
}

fn main() {
    logging::init();
    let cli = Cli::parse();
    let diag_opts = DiagnosticOptions {
        color: !cli.no_color && !cli.json,
        json: cli.json,
    };

    match run(&cli, &diag_opts) {
        Ok(()) => {}
        Err(e) => {
            if cli.json {
                let msg = serde_json::json!({
                    "code": "C0001",
                    "severity": "error",
                    "message": format!("{:#}", e),
                    "file": "",
                    "spans": [],
                    "fix": null
                });
                eprintln!("{}", msg);
            } else {
                eprintln!("error: {:#}", e);
            }
            process::exit(1);
        }
    }
}

/// Load the model, generate every component, write the files and report
/// diagnostics. Files are written even when a component fails, so stubs
/// are in place for the rest of the build.
fn run(cli: &Cli, diag_opts: &DiagnosticOptions) -> anyhow::Result<()> {
    let options = load_options(cli)?;
    debug!(?options, "resolved options");

    let model = MemoryModel::from_file(&cli.model).map_err(anyhow::Error::msg)?;
    let messenger = CollectingMessenger::new();
    let files = inject_codegen::process(&model, &options, &messenger);

    for file in &files {
        let path = cli.output.join(file.relative_path());
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create '{}'", parent.display()))?;
        }
        std::fs::write(&path, &file.contents)
            .with_context(|| format!("Failed to write '{}'", path.display()))?;
        info!(path = %path.display(), "wrote component");
        if !cli.json {
            eprintln!("  Generated: {}", path.display());
        }
    }

    let diagnostics = messenger.take();
    if report_diagnostics(&model, &cli.model, &diagnostics, diag_opts) {
        bail!("Generation failed due to errors above.");
    }
    Ok(())
}

/// Defaults, then inject.toml, then `-P` options, then flags.
fn load_options(cli: &Cli) -> anyhow::Result<Options> {
    let config = match &cli.config {
        Some(path) => Some(path.clone()),
        None => {
            let beside_model = model_dir(&cli.model).join("inject.toml");
            beside_model.exists().then_some(beside_model)
        }
    };
    let mut options = match config {
        Some(path) => Options::from_file(&path).map_err(anyhow::Error::msg)?,
        None => Options::default(),
    };
    options = options.with_processor_options(
        cli.options
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str())),
    );
    if cli.enable_javax_annotations {
        options.enable_javax_annotations = true;
    }
    if cli.generate_companion_extensions {
        options.generate_companion_extensions = true;
    }
    Ok(options)
}

fn model_dir(model: &Path) -> &Path {
    match model.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    }
}

/// Print every diagnostic to stderr. Spans are resolved against the source
/// file the model names, relative to the model; when it cannot be read the
/// element traces are shown instead. Returns true if any was an error.
fn report_diagnostics(
    model: &MemoryModel,
    model_path: &Path,
    diagnostics: &[Diagnostic],
    diag_opts: &DiagnosticOptions,
) -> bool {
    let (source, file_name) = match model.source() {
        Some(name) => {
            let text = std::fs::read_to_string(model_dir(model_path).join(name)).ok();
            (text, name.to_string())
        }
        None => (None, model_path.display().to_string()),
    };

    let mut has_errors = false;
    for diagnostic in diagnostics {
        has_errors |= diagnostic.is_error();
        let rendered = render_diagnostic(diagnostic, source.as_deref(), &file_name, diag_opts);
        if diag_opts.json {
            eprintln!("{}", rendered);
        } else {
            eprint!("{}", rendered);
        }
    }
    has_errors
}
