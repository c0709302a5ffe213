// lexi - translation table reconciliation (headless)

mod exit_codes;
mod progress;
mod recon;
mod util;

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand};
use env_logger::Env;

use lexigrid_io::csource::{self, EXTRACT_SHEET};
use lexigrid_io::table::TableFormat;
use lexigrid_recon::{KeyColumn, Language};

use exit_codes::{EXIT_RUNTIME, EXIT_SUCCESS, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "lexi")]
#[command(about = "Reconcile multilingual translation tables by key and text similarity")]
#[command(version)]
#[command(subcommand_required = false)]
struct Cli {
    /// More log output (-v info, -vv debug); RUST_LOG takes precedence
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a reconciliation from a TOML config file
    #[command(after_help = "\
Examples:
  lexi run firmware.recon.toml
  lexi run firmware.recon.toml --json
  lexi run firmware.recon.toml --output result.xlsx

Files named in the config are resolved relative to the config file.

Exit codes:
  0  every compared cell matches
  3  mismatches or missing rows/columns
  4  only review items
  5  invalid config
  6  unreadable input or unwritable output
  7  no language column shared by both tables")]
    Run {
        /// Path to the .recon.toml config file
        config: PathBuf,

        /// Output JSON to stdout in addition to configured reports
        #[arg(long)]
        json: bool,

        /// Write an extra report (.json, .csv or .xlsx)
        #[arg(long)]
        output: Option<PathBuf>,

        /// No progress bar or summary
        #[arg(long, short = 'q')]
        quiet: bool,
    },

    /// Compare two translation tables without a config file
    #[command(after_help = "\
Examples:
  lexi compare source.xlsx translated.xlsx
  lexi compare source.csv translated.csv --lang en --lang de -o diff.csv
  lexi compare strings.xlsx vendor.xlsx --sheet Translations --all-candidates
  lexi compare a.csv b.csv --source-key 2 --comparison-key Key --json -q

Without -o the report is written to YYYYmmdd_HHMMSS_comparison.xlsx.")]
    Compare {
        /// Source (reference) table: .xlsx/.xls/.ods/.csv/.tsv
        source: PathBuf,

        /// Comparison (translated) table
        comparison: PathBuf,

        /// Language to compare, by code or header label (repeatable; default all common)
        #[arg(long = "lang", value_name = "LANG")]
        languages: Vec<Language>,

        /// Classify every code-matched candidate, not just the best one
        #[arg(long)]
        all_candidates: bool,

        /// Source key column: header name or 1-based index
        #[arg(long, value_name = "COL")]
        source_key: Option<KeyColumn>,

        /// Comparison key column: header name or 1-based index
        #[arg(long, value_name = "COL")]
        comparison_key: Option<KeyColumn>,

        /// Worksheet to read from spreadsheet inputs (default first)
        #[arg(long)]
        sheet: Option<String>,

        /// Report file (.xlsx, .csv or .json)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Output JSON to stdout
        #[arg(long)]
        json: bool,

        /// No progress bar or summary
        #[arg(long, short = 'q')]
        quiet: bool,
    },

    /// Validate a recon config without running
    #[command(after_help = "\
Examples:
  lexi validate firmware.recon.toml")]
    Validate {
        /// Path to the .recon.toml config file
        config: PathBuf,
    },

    /// Convert C string arrays into a translation table
    #[command(after_help = "\
Examples:
  lexi extract lang_strings.c
  lexi extract lang_strings.c -o strings.csv

Reads every `const char *NAME[MAX_LANGUAGE] = { ... };` declaration.
Without -o the table is written to YYYYmmdd_HHMMSS_extracted.xlsx.")]
    Extract {
        /// C source file
        input: PathBuf,

        /// Output table (.xlsx or .csv)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// List supported languages with their codes and header labels
    Languages,
}

fn init_logging(verbose: u8) {
    let default_filter = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        None => {
            // No subcommand = show help
            eprintln!("Usage: lexi <command> [options]");
            eprintln!("       lexi --help for more information");
            Ok(())
        }
        Some(Commands::Run { config, json, output, quiet }) => {
            recon::cmd_run(config, json, output, quiet)
        }
        Some(Commands::Compare {
            source,
            comparison,
            languages,
            all_candidates,
            source_key,
            comparison_key,
            sheet,
            output,
            json,
            quiet,
        }) => recon::cmd_compare(recon::CompareArgs {
            source,
            comparison,
            languages,
            all_candidates,
            source_key,
            comparison_key,
            sheet,
            output,
            json,
            quiet,
        }),
        Some(Commands::Validate { config }) => recon::cmd_validate(config),
        Some(Commands::Extract { input, output }) => cmd_extract(input, output),
        Some(Commands::Languages) => cmd_languages(),
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
        Self { code: EXIT_RUNTIME, message: msg.into(), hint: None }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

// ============================================================================
// extract
// ============================================================================

fn cmd_extract(input: PathBuf, output: Option<PathBuf>) -> Result<(), CliError> {
    let output = output.unwrap_or_else(|| util::timestamped_path("extracted.xlsx"));
    let format = TableFormat::from_path(&output).map_err(CliError::args)?;

    if !input.exists() {
        return Err(CliError::io(format!("{}: file not found", input.display())));
    }
    let table = csource::extract(&input).map_err(|e| {
        CliError::io(e).with_hint("arrays must be declared as `const char *NAME[MAX_LANGUAGE] = { ... };`")
    })?;

    match format {
        TableFormat::Spreadsheet if has_extension(&output, "xlsx") => {
            lexigrid_io::xlsx::export_table(&table, &output, EXTRACT_SHEET)
        }
        TableFormat::Csv if has_extension(&output, "csv") => lexigrid_io::csv::export_table(&table, &output),
        _ => {
            return Err(CliError::args(format!(
                "{}: extract writes .xlsx or .csv",
                output.display()
            )))
        }
    }
    .map_err(CliError::io)?;

    eprintln!("extracted {} keys to {}", table.row_count().saturating_sub(1), output.display());
    Ok(())
}

fn has_extension(path: &std::path::Path, ext: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(ext))
}

// ============================================================================
// languages
// ============================================================================

fn cmd_languages() -> Result<(), CliError> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();

    for language in Language::ALL {
        writeln!(handle, "{}  {}", util::pad_right(language.code(), 4), language.label())
            .map_err(|e| CliError::io(e.to_string()))?;
    }

    Ok(())
}
