// exohunt CLI - headless exoplanet catalog classification

mod classify;
mod exit_codes;
mod table;

use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use exohunt_classify::loader::{self, InputFormat, LoadOptions};
use exohunt_classify::{ClassifyConfig, ClassifyError, Row};

use exit_codes::{
    classify_exit_code, EXIT_ERROR, EXIT_IO, EXIT_PARSE, EXIT_SUCCESS, EXIT_USAGE,
};

#[derive(Parser)]
#[command(name = "exohunt")]
#[command(about = "Classify exoplanet catalog rows from NASA, TESS, HARPS and survey exports")]
#[command(long_version = long_version())]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify every row of a catalog file
    #[command(after_help = "\
Examples:
  exohunt classify cumulative.csv
  exohunt classify toi.tsv --json > result.json
  exohunt classify planets.json --top 20
  cat upload.csv | exohunt classify - --format csv --max-rows 5000")]
    Classify {
        /// Input file, or - for stdin
        input: PathBuf,

        #[command(flatten)]
        source: SourceArgs,

        /// Print the full batch result as JSON to stdout
        #[arg(long)]
        json: bool,

        /// Write the JSON batch result to a file
        #[arg(long)]
        output: Option<PathBuf>,

        /// Rows shown in the human table (JSON output is never truncated)
        #[arg(long, default_value_t = 25)]
        top: usize,

        /// Reject batches with more rows than this
        #[arg(long)]
        max_rows: Option<usize>,

        /// Classify rows across all cores
        #[arg(long)]
        parallel: bool,

        /// Fail if the batch takes longer than this many milliseconds
        #[arg(long)]
        timeout_ms: Option<u64>,
    },

    /// Show detected schema per row and how columns map onto canonical fields
    #[command(after_help = "\
Examples:
  exohunt inspect cumulative.csv
  exohunt inspect upload.csv --json")]
    Inspect {
        /// Input file, or - for stdin
        input: PathBuf,

        #[command(flatten)]
        source: SourceArgs,

        /// Output JSON to stdout instead of a table
        #[arg(long)]
        json: bool,
    },

    /// List the column aliases recognized for each canonical field
    Aliases {
        /// Output JSON to stdout
        #[arg(long)]
        json: bool,
    },

    /// Config file commands
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Parse and validate a config file without running anything
    #[command(after_help = "\
Examples:
  exohunt config validate exohunt.toml")]
    Validate {
        /// Path to the TOML config file
        config: PathBuf,
    },
}

/// Input options shared by `classify` and `inspect`.
#[derive(clap::Args)]
struct SourceArgs {
    /// Input format (default: from extension; stdin defaults to csv)
    #[arg(long, value_enum)]
    format: Option<Format>,

    /// Field delimiter for csv input (default: sniffed)
    #[arg(long)]
    delimiter: Option<char>,

    /// TOML config file
    #[arg(long, env = "EXOHUNT_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Csv,
    Tsv,
    Json,
}

impl From<Format> for InputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Csv => InputFormat::Csv,
            Format::Tsv => InputFormat::Tsv,
            Format::Json => InputFormat::Json,
        }
    }
}

fn long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        " (", env!("GIT_COMMIT_HASH"), ")",
        "\nengine:  exohunt-classify ", env!("CARGO_PKG_VERSION"),
    )
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Classify {
            input,
            source,
            json,
            output,
            top,
            max_rows,
            parallel,
            timeout_ms,
        } => {
            let overrides = classify::Overrides {
                max_rows,
                parallel,
                timeout_ms,
                delimiter: source.delimiter,
            };
            resolve_config(source.config.as_deref(), &overrides).and_then(|config| {
                classify::cmd_classify(&input, source.format, &config, json, output, top)
            })
        }
        Commands::Inspect { input, source, json } => {
            let overrides = classify::Overrides {
                delimiter: source.delimiter,
                ..Default::default()
            };
            resolve_config(source.config.as_deref(), &overrides)
                .and_then(|config| classify::cmd_inspect(&input, source.format, &config, json))
        }
        Commands::Aliases { json } => classify::cmd_aliases(json),
        Commands::Config(ConfigCommands::Validate { config }) => cmd_config_validate(&config),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn args(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self { code: EXIT_IO, message: msg.into(), hint: None }
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        Self { code: EXIT_PARSE, message: msg.into(), hint: None }
    }

    pub fn general(msg: impl Into<String>) -> Self {
        Self { code: EXIT_ERROR, message: msg.into(), hint: None }
    }

    /// Create error from an engine error with its registry exit code.
    pub fn classify(err: ClassifyError) -> Self {
        let code = classify_exit_code(&err);
        let hint = match &err {
            ClassifyError::BatchTooLarge { .. } => {
                Some("raise max_rows in the config or pass --max-rows".to_string())
            }
            ClassifyError::Timeout { .. } => {
                Some("try --parallel, or raise timeout_ms".to_string())
            }
            ClassifyError::Csv(_) => {
                Some("check the delimiter; pass --delimiter or --format tsv".to_string())
            }
            _ => None,
        };
        Self { code, message: err.to_string(), hint }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl From<ClassifyError> for CliError {
    fn from(err: ClassifyError) -> Self {
        CliError::classify(err)
    }
}

// ============================================================================
// Shared input handling
// ============================================================================

/// Load the config file (if any) and apply command-line overrides on top.
fn resolve_config(path: Option<&Path>, overrides: &classify::Overrides) -> Result<ClassifyConfig, CliError> {
    let mut config = match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .map_err(|e| CliError::io(format!("cannot read config {}: {e}", path.display())))?;
            ClassifyConfig::from_toml(&text)?
        }
        None => ClassifyConfig::default(),
    };

    overrides.apply(&mut config);
    config.validate().map_err(|e| CliError::args(e.to_string()))?;
    log::debug!("effective config: {config:?}");
    Ok(config)
}

/// Read rows from a file or from stdin (`-`).
fn read_rows(input: &Path, format: Option<Format>, config: &ClassifyConfig) -> Result<Vec<Row>, CliError> {
    let options = LoadOptions::from(&config.input);
    let format = format.map(InputFormat::from);

    if input.as_os_str() == "-" {
        let mut bytes = Vec::new();
        io::stdin()
            .read_to_end(&mut bytes)
            .map_err(|e| CliError::io(e.to_string()))?;
        if bytes.is_empty() {
            return Err(CliError::parse("no input received on stdin")
                .with_hint("cat cumulative.csv | exohunt classify - --format csv"));
        }
        let text = loader::decode_bytes(bytes);
        return Ok(loader::load_str(&text, format.unwrap_or(InputFormat::Csv), &options)?);
    }

    if !input.exists() {
        return Err(CliError::io(format!("file not found: {}", input.display())));
    }
    Ok(loader::load_path(input, format, &options)?)
}

// ============================================================================
// config validate
// ============================================================================

fn cmd_config_validate(path: &Path) -> Result<(), CliError> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| CliError::io(format!("cannot read config {}: {e}", path.display())))?;
    let config = ClassifyConfig::from_toml(&text)?;

    eprintln!(
        "config OK: max_rows={}, parallel={}, timeout_ms={}",
        config.max_rows,
        config.parallel,
        config.timeout_ms.map_or_else(|| "none".to_string(), |t| t.to_string()),
    );
    Ok(())
}
