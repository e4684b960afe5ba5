use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use glob::glob;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "splice")]
#[command(version)]
#[command(long_version = concat!(
    env!("CARGO_PKG_VERSION"),
    " (commit ",
    env!("SPLICE_BUILD_COMMIT"),
    ", ",
    env!("SPLICE_BUILD_DATE"),
    ")"
))]
#[command(
    about = "Decoder for SPLICE drum-machine pattern files.",
    long_about = None,
    after_help = "Examples:\n  splice pattern show pattern_1.splice\n  splice pattern export pattern_1.splice -o pattern.json\n  splice pattern export pattern_1.splice --stdout --pretty"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Operations on .splice pattern files.
    Pattern {
        #[command(subcommand)]
        command: PatternCommands,
    },
}

#[derive(Subcommand, Debug)]
enum PatternCommands {
    /// Decode a pattern and print its text rendering.
    #[command(alias = "print")]
    #[command(
        after_help = "Examples:\n  splice pattern show pattern_1.splice\n  splice pattern print 'drums/*.splice'"
    )]
    Show {
        /// Path (or single-match glob) to a .splice file
        input: PathBuf,
    },
    /// Decode a pattern and export it as JSON.
    #[command(
        after_help = "Examples:\n  splice pattern export pattern_1.splice -o pattern.json\n  splice pattern export pattern_1.splice --stdout --pretty"
    )]
    Export {
        /// Path (or single-match glob) to a .splice file
        input: PathBuf,

        /// Output path (JSON)
        #[arg(short = 'o', long, required_unless_present = "stdout")]
        output: Option<PathBuf>,

        /// Write JSON to stdout
        #[arg(long, conflicts_with = "output")]
        stdout: bool,

        /// Pretty-print JSON output
        #[arg(long, conflicts_with = "compact")]
        pretty: bool,

        /// Compact JSON output (default)
        #[arg(long)]
        compact: bool,

        /// Suppress non-error output
        #[arg(long)]
        quiet: bool,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Pattern { command } => match command {
            PatternCommands::Show { input } => cmd_pattern_show(input),
            PatternCommands::Export {
                input,
                output,
                stdout,
                pretty,
                compact: _,
                quiet,
            } => cmd_pattern_export(input, output, stdout, pretty, quiet),
        },
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err.message);
            if let Some(hint) = err.hint {
                eprintln!("hint: {}", hint);
            }
            ExitCode::from(2)
        }
    }
}

#[derive(Debug)]
struct CliError {
    message: String,
    hint: Option<String>,
}

impl CliError {
    fn new(message: impl Into<String>, hint: Option<String>) -> Self {
        Self {
            message: message.into(),
            hint,
        }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        CliError::new(format!("{err:#}"), None)
    }
}

fn cmd_pattern_show(input: PathBuf) -> Result<(), CliError> {
    let pattern = load_pattern(&input)?;
    print!("{}", pattern);
    Ok(())
}

fn cmd_pattern_export(
    input: PathBuf,
    output: Option<PathBuf>,
    stdout: bool,
    pretty: bool,
    quiet: bool,
) -> Result<(), CliError> {
    let resolved_input = resolve_input_path(&input)?;
    validate_input_file(&resolved_input)?;

    let output = if stdout {
        None
    } else {
        Some(output.ok_or_else(|| {
            CliError::new(
                "missing output path",
                Some("use -o/--output or --stdout".to_string()),
            )
        })?)
    };
    if let Some(output_path) = output.as_ref() {
        ensure_distinct_output(&resolved_input, output_path)?;
    }

    let pattern = decode(&resolved_input)?;
    let json = serialize_pattern(&pattern, pretty)?;

    let Some(output) = output else {
        println!("{}", json);
        return Ok(());
    };

    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create output directory: {}", parent.display())
            })?;
        }
    }
    fs::write(&output, json + "\n")
        .with_context(|| format!("Failed to write output: {}", output.display()))?;

    if !quiet {
        eprintln!("OK: pattern written -> {}", output.display());
    }
    Ok(())
}

fn load_pattern(input: &Path) -> Result<splice_core::Pattern, CliError> {
    let resolved_input = resolve_input_path(input)?;
    validate_input_file(&resolved_input)?;
    decode(&resolved_input)
}

fn decode(input: &Path) -> Result<splice_core::Pattern, CliError> {
    tracing::info!(path = %input.display(), "decoding pattern");
    splice_core::decode_file(input).map_err(|err| {
        CliError::new(
            format!("failed to decode {}: {}", input.display(), err),
            Some("is this a SPLICE pattern file?".to_string()),
        )
    })
}

fn ensure_distinct_output(input: &Path, output: &Path) -> Result<(), CliError> {
    let input_abs = fs::canonicalize(input)
        .with_context(|| format!("Failed to resolve input path: {}", input.display()))?;
    let output_dir = output
        .parent()
        .map(|parent| {
            if parent.as_os_str().is_empty() {
                fs::canonicalize(".")
            } else {
                fs::canonicalize(parent)
            }
        })
        .transpose();
    // A missing output directory is created later, so it cannot hold the input.
    let Ok(Some(output_dir)) = output_dir else {
        return Ok(());
    };
    let file_name = output
        .file_name()
        .ok_or_else(|| anyhow::anyhow!("Invalid output path: {}", output.display()))?;
    if output_dir.join(file_name) == input_abs {
        return Err(CliError::new(
            format!("output path must differ from input: {}", output.display()),
            Some("choose a different output path".to_string()),
        ));
    }
    Ok(())
}

fn serialize_pattern(pattern: &splice_core::Pattern, pretty: bool) -> Result<String, CliError> {
    // serde_json writes non-finite floats as null, which would not read back.
    if !pattern.tempo.is_finite() {
        return Err(CliError::new(
            format!("tempo {} cannot be represented in JSON", pattern.tempo),
            Some("use `splice pattern show` to inspect this pattern".to_string()),
        ));
    }
    if pretty {
        serde_json::to_string_pretty(pattern)
            .context("JSON serialization failed")
            .map_err(Into::into)
    } else {
        serde_json::to_string(pattern)
            .context("JSON serialization failed")
            .map_err(Into::into)
    }
}

fn validate_input_file(input: &Path) -> Result<(), CliError> {
    if !input.exists() {
        return Err(CliError::new(
            format!("input file not found: {}", input.display()),
            Some("use a .splice file".to_string()),
        ));
    }
    if !input.is_file() {
        return Err(CliError::new(
            format!("input is not a file: {}", input.display()),
            Some("use a .splice file".to_string()),
        ));
    }
    let ext = input
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    if ext != "splice" {
        return Err(CliError::new(
            format!("unsupported input format '{}'", input.display()),
            Some("expected a .splice file".to_string()),
        ));
    }
    Ok(())
}

fn resolve_input_path(input: &Path) -> Result<PathBuf, CliError> {
    let pattern = input.to_string_lossy();
    if !is_glob_pattern(&pattern) {
        return Ok(input.to_path_buf());
    }

    let mut matches = Vec::new();
    let paths = glob(&pattern).map_err(|err| {
        CliError::new(
            format!("invalid input pattern '{}'", pattern),
            Some(format!("pattern error: {}", err.msg)),
        )
    })?;
    for entry in paths {
        let path = entry.map_err(|err| {
            CliError::new(
                format!("invalid input pattern '{}'", pattern),
                Some(format!("pattern error: {}", err)),
            )
        })?;
        if path.is_file() {
            matches.push(path);
        }
    }

    if matches.is_empty() {
        return Err(CliError::new(
            format!("no files match pattern '{}'", pattern),
            Some("check the path or quote the pattern; expected .splice".to_string()),
        ));
    }
    if matches.len() > 1 {
        let hint = "pass a single pattern file, or run once per file".to_string();
        let mut message = format!(
            "multiple files match pattern '{}' ({} matches)",
            pattern,
            matches.len()
        );
        let listed = matches
            .iter()
            .take(3)
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>();
        message.push_str("; matches: ");
        message.push_str(&listed.join(", "));
        if matches.len() > 3 {
            message.push_str(", ...");
        }
        return Err(CliError::new(message, Some(hint)));
    }

    Ok(matches.remove(0))
}

fn is_glob_pattern(input: &str) -> bool {
    input.contains('*') || input.contains('?') || input.contains('[')
}
