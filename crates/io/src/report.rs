// Shared layout for verdict reports (CSV and XLSX)

use std::path::Path;

use lexigrid_recon::model::{CellVerdict, ReconResult, Verdict};

/// Columns common to every tabular report.
pub const REPORT_HEADERS: [&str; 7] = [
    "Key",
    "Language",
    "Source text",
    "Comparison text",
    "Result",
    "Score",
    "Comparison key",
];

/// Written in the comparison column when the record has no comparison row.
pub const MISSING_ROW_TEXT: &str = "【代码文件缺失】";

/// Written in the comparison column when the comparison table lacks the language.
pub const MISSING_COLUMN_TEXT: &str = "【语言列缺失】";

pub fn result_label(verdict: Verdict) -> &'static str {
    match verdict {
        Verdict::ExactMatch => "✓ exact",
        Verdict::HighConfidence => "✓ high confidence",
        Verdict::NeedsReview => "? review",
        Verdict::Mismatch => "✗ mismatch",
        Verdict::MissingRow => "⚠ missing row",
        Verdict::MissingColumn => "⚠ missing column",
    }
}

pub fn comparison_text(verdict: &CellVerdict) -> String {
    match (&verdict.target_text, verdict.verdict) {
        (Some(text), _) => text.clone(),
        (None, Verdict::MissingColumn) => MISSING_COLUMN_TEXT.to_string(),
        (None, _) => MISSING_ROW_TEXT.to_string(),
    }
}

/// Score with three decimals; empty for missing cells.
pub fn score_text(score: Option<f64>) -> String {
    score.map(|s| format!("{s:.3}")).unwrap_or_default()
}

/// Output format, chosen from a file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Json,
    Csv,
    Xlsx,
}

impl ReportFormat {
    pub fn from_path(path: &Path) -> Result<Self, String> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            "xlsx" => Ok(Self::Xlsx),
            other => Err(format!(
                "unsupported report format '.{other}' (expected .json, .csv or .xlsx)"
            )),
        }
    }
}

/// Write `result` in the format implied by `path`'s extension.
pub fn write_report(result: &ReconResult, path: &Path) -> Result<(), String> {
    match ReportFormat::from_path(path)? {
        ReportFormat::Json => crate::json::export_report(result, path),
        ReportFormat::Csv => crate::csv::export_report(result, path),
        ReportFormat::Xlsx => crate::xlsx::export_report(result, path),
    }
}

/// One summary line: missing and difference counts, or an all-clear.
pub fn summary_line(result: &ReconResult) -> String {
    let s = &result.summary;
    let mut parts = Vec::new();
    let missing = s.count(Verdict::MissingRow) + s.count(Verdict::MissingColumn);
    if s.unmatched > 0 {
        parts.push(format!("{} key(s) missing from comparison", s.unmatched));
    }
    if missing > 0 {
        parts.push(format!("{missing} missing cell(s)"));
    }
    if s.count(Verdict::Mismatch) > 0 {
        parts.push(format!("{} mismatch(es)", s.count(Verdict::Mismatch)));
    }
    if s.needs_review {
        parts.push(format!("{} to review", s.count(Verdict::NeedsReview)));
    }
    if parts.is_empty() {
        "all compared text matches".to_string()
    } else {
        parts.join(" | ")
    }
}
