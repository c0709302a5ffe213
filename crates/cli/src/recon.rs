//! `lexi run`, `lexi compare` and `lexi validate`: translation table reconciliation.

use std::path::{Path, PathBuf};

use lexigrid_io::report::{result_label, summary_line, ReportFormat};
use lexigrid_recon::{
    KeyColumn, Language, ReconConfig, ReconError, ReconInput, ReconResult, ReportMode,
    TableConfig, Verdict,
};

use crate::exit_codes::{
    outcome_exit_code, recon_exit_code, EXIT_RUNTIME, EXIT_SUCCESS, EXIT_USAGE,
};
use crate::progress::RecordProgress;
use crate::util::{resolve_relative, timestamped_path};
use crate::CliError;

fn recon_err(code: u8, msg: impl Into<String>) -> CliError {
    CliError { code, message: msg.into(), hint: None }
}

fn read_config(config_path: &Path) -> Result<ReconConfig, CliError> {
    let config_str = std::fs::read_to_string(config_path).map_err(|e| {
        recon_err(EXIT_RUNTIME, format!("cannot read config {}: {e}", config_path.display()))
    })?;
    ReconConfig::from_toml(&config_str).map_err(|e| recon_err(recon_exit_code(&e), e.to_string()))
}

// ============================================================================
// run
// ============================================================================

pub fn cmd_run(
    config_path: PathBuf,
    json_output: bool,
    output_file: Option<PathBuf>,
    quiet: bool,
) -> Result<(), CliError> {
    let config = read_config(&config_path)?;

    // Resolve file paths relative to config file's directory
    let base_dir = config_path.parent().unwrap_or_else(|| Path::new("."));

    let mut outputs: Vec<PathBuf> = [&config.report.json, &config.report.xlsx, &config.report.csv]
        .into_iter()
        .flatten()
        .map(|file| resolve_relative(base_dir, file))
        .collect();
    outputs.extend(output_file);
    for path in &outputs {
        ReportFormat::from_path(path).map_err(|e| recon_err(EXIT_USAGE, e))?;
    }

    let source_path = resolve_relative(base_dir, &config.source.file);
    let comparison_path = resolve_relative(base_dir, &config.comparison.file);
    log::info!(
        "{}: source {}, comparison {}",
        config_path.display(),
        source_path.display(),
        comparison_path.display()
    );
    let result = load_and_run(&config, &source_path, &comparison_path, quiet)?;

    finish(&result, &outputs, json_output, quiet)
}

// ============================================================================
// compare
// ============================================================================

/// Options for a one-off comparison without a config file.
pub struct CompareArgs {
    pub source: PathBuf,
    pub comparison: PathBuf,
    pub languages: Vec<Language>,
    pub all_candidates: bool,
    pub source_key: Option<KeyColumn>,
    pub comparison_key: Option<KeyColumn>,
    pub sheet: Option<String>,
    pub output: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub fn cmd_compare(args: CompareArgs) -> Result<(), CliError> {
    let output = args
        .output
        .unwrap_or_else(|| timestamped_path("comparison.xlsx"));
    ReportFormat::from_path(&output).map_err(|e| recon_err(EXIT_USAGE, e))?;

    let mut config = ReconConfig::adhoc(
        table_config(&args.source, args.sheet.as_deref(), args.source_key),
        table_config(&args.comparison, args.sheet.as_deref(), args.comparison_key),
    );
    config.languages.selected = args.languages;
    if args.all_candidates {
        config.report.mode = ReportMode::All;
    }
    config
        .validate()
        .map_err(|e| recon_err(EXIT_USAGE, e.to_string()))?;

    let result = load_and_run(&config, &args.source, &args.comparison, args.quiet)?;
    finish(&result, &[output], args.json, args.quiet)
}

/// `--sheet` only applies to spreadsheet inputs.
fn table_config(path: &Path, sheet: Option<&str>, key_column: Option<KeyColumn>) -> TableConfig {
    let is_spreadsheet = matches!(
        lexigrid_io::table::TableFormat::from_path(path),
        Ok(lexigrid_io::table::TableFormat::Spreadsheet)
    );
    let mut table = TableConfig::new(path.to_string_lossy());
    table.sheet = sheet.filter(|_| is_spreadsheet).map(str::to_string);
    table.key_column = key_column;
    table
}

// ============================================================================
// validate
// ============================================================================

pub fn cmd_validate(config_path: PathBuf) -> Result<(), CliError> {
    let config = read_config(&config_path)?;
    let languages = if config.languages.selected.is_empty() {
        "all common languages".to_string()
    } else {
        config
            .languages
            .selected
            .iter()
            .map(|l| l.code())
            .collect::<Vec<_>>()
            .join(", ")
    };
    eprintln!(
        "valid: '{}' ({} vs {}), {}, {} mode",
        config.name, config.source.file, config.comparison.file, languages, config.report.mode,
    );
    Ok(())
}

// ============================================================================
// Shared
// ============================================================================

fn load_and_run(
    config: &ReconConfig,
    source_path: &Path,
    comparison_path: &Path,
    quiet: bool,
) -> Result<ReconResult, CliError> {
    let source = lexigrid_io::load_table(source_path, config.source.sheet.as_deref())
        .map_err(|e| recon_err(EXIT_RUNTIME, e))?;
    let comparison = lexigrid_io::load_table(comparison_path, config.comparison.sheet.as_deref())
        .map_err(|e| recon_err(EXIT_RUNTIME, e))?;

    let input = ReconInput { source: &source, comparison: &comparison };
    let mut progress = RecordProgress::new(quiet);
    let result = lexigrid_recon::run_with_progress(config, &input, &mut progress);
    progress.finish();
    result.map_err(|e| {
        let err = recon_err(recon_exit_code(&e), e.to_string());
        match e {
            ReconError::MissingColumn { .. } => err.with_hint(
                "key columns are matched against the header row; use a header name or 1-based index",
            ),
            ReconError::NoLanguages { .. } => err.with_hint(
                "check the header rows or map them with [languages.aliases]; `lexi languages` lists known labels",
            ),
            _ => err,
        }
    })
}

/// Write reports, print summary, and turn the outcome into an exit code.
fn finish(
    result: &ReconResult,
    outputs: &[PathBuf],
    json_output: bool,
    quiet: bool,
) -> Result<(), CliError> {
    for path in outputs {
        lexigrid_io::write_report(result, path).map_err(|e| recon_err(EXIT_RUNTIME, e))?;
        if !quiet {
            eprintln!("wrote {}", path.display());
        }
    }

    if json_output {
        let json_str = lexigrid_io::json::to_string(result)
            .map_err(|e| recon_err(EXIT_RUNTIME, format!("JSON serialization error: {e}")))?;
        println!("{json_str}");
    }

    // Human summary to stderr
    if !quiet {
        print_summary(result);
    }

    let s = &result.summary;
    match outcome_exit_code(s.has_differences, s.needs_review) {
        EXIT_SUCCESS => Ok(()),
        code if s.has_differences => Err(recon_err(code, "differences found")),
        code => Err(recon_err(code, "some translations need review")),
    }
}

fn print_summary(result: &ReconResult) {
    let s = &result.summary;
    let languages: Vec<&str> = result.meta.languages.iter().map(|l| l.code()).collect();
    eprintln!(
        "'{}': {} keys ({} exact, {} by code, {} ambiguous, {} unmatched), {} cells [{}]",
        result.meta.config_name,
        s.source_records,
        s.exact_matched,
        s.code_matched,
        s.ambiguous,
        s.unmatched,
        s.total_cells,
        languages.join(" "),
    );
    let counts: Vec<String> = Verdict::ALL
        .iter()
        .filter(|v| s.count(**v) > 0)
        .map(|v| format!("{} {}", result_label(*v), s.count(*v)))
        .collect();
    if !counts.is_empty() {
        eprintln!("  {}", counts.join(", "));
    }
    eprintln!("{}", summary_line(result));
}
