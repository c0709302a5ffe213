use std::collections::BTreeMap;

use serde::Serialize;

use crate::config::ReportMode;
use crate::language::Language;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// Contents of one spreadsheet cell, resolved to text at the table boundary.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Cell {
    Text(String),
    #[default]
    Absent,
}

impl Cell {
    /// Whitespace-only values are stored as `Absent`.
    pub fn from_text(value: impl Into<String>) -> Self {
        let value = value.into();
        if value.trim().is_empty() {
            Self::Absent
        } else {
            Self::Text(value)
        }
    }

    pub fn text(&self) -> &str {
        match self {
            Self::Text(s) => s,
            Self::Absent => "",
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }
}

/// Result of reading a 1-based (row, column) position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellRead<'a> {
    Present(&'a str),
    Unreadable,
}

impl<'a> CellRead<'a> {
    /// Unreadable positions read as the empty string.
    pub fn text(self) -> &'a str {
        match self {
            Self::Present(s) => s,
            Self::Unreadable => "",
        }
    }
}

/// A rectangular-ish grid of cells. Row 1 is the header row.
#[derive(Debug, Clone, Default)]
pub struct Table {
    pub name: String,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new(name: impl Into<String>, rows: Vec<Vec<Cell>>) -> Self {
        Self { name: name.into(), rows }
    }

    /// Build a table from plain strings; empty strings become `Cell::Absent`.
    pub fn from_text_rows<S: Into<String>>(name: impl Into<String>, rows: Vec<Vec<S>>) -> Self {
        let rows = rows
            .into_iter()
            .map(|row| row.into_iter().map(Cell::from_text).collect())
            .collect();
        Self::new(name, rows)
    }

    pub fn header(&self) -> &[Cell] {
        self.rows.first().map(|r| r.as_slice()).unwrap_or(&[])
    }

    /// Number of rows including the header.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.rows.iter().map(|r| r.len()).max().unwrap_or(0)
    }

    pub fn read(&self, row: usize, col: usize) -> CellRead<'_> {
        if row == 0 || col == 0 {
            return CellRead::Unreadable;
        }
        match self.rows.get(row - 1).and_then(|r| r.get(col - 1)) {
            Some(cell) => CellRead::Present(cell.text()),
            None => CellRead::Unreadable,
        }
    }

    pub fn text(&self, row: usize, col: usize) -> &str {
        self.read(row, col).text()
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }
}

/// The two tables being reconciled.
pub struct ReconInput<'a> {
    pub source: &'a Table,
    pub comparison: &'a Table,
}

// ---------------------------------------------------------------------------
// Matching
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchTier {
    ExactKey,
    NumericCode,
}

impl std::fmt::Display for MatchTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ExactKey => write!(f, "exact_key"),
            Self::NumericCode => write!(f, "numeric_code"),
        }
    }
}

/// A comparison row proposed for one source row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchCandidate {
    pub source_row: usize,
    pub target_row: usize,
    pub target_key: String,
    pub tier: MatchTier,
    /// Closeness of the two raw keys. Ranks code collisions; never rejects.
    pub key_similarity: f64,
}

/// Terminal state of one source record after reconciliation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "candidates", rename_all = "snake_case")]
pub enum MatchOutcome {
    ExactMatched,
    CodeMatched(usize),
    Unmatched,
}

impl MatchOutcome {
    pub fn from_candidates(candidates: &[MatchCandidate]) -> Self {
        match candidates.first() {
            None => Self::Unmatched,
            Some(c) if c.tier == MatchTier::ExactKey => Self::ExactMatched,
            Some(_) => Self::CodeMatched(candidates.len()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RecordOutcome {
    pub source_key: String,
    pub source_row: usize,
    pub outcome: MatchOutcome,
    pub candidates: Vec<MatchCandidate>,
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    ExactMatch,
    HighConfidence,
    NeedsReview,
    Mismatch,
    /// No comparison row was found for the source record.
    MissingRow,
    /// The comparison table has no column for the language.
    MissingColumn,
}

impl Verdict {
    pub const ALL: [Verdict; 6] = [
        Self::ExactMatch,
        Self::HighConfidence,
        Self::NeedsReview,
        Self::Mismatch,
        Self::MissingRow,
        Self::MissingColumn,
    ];

    pub fn is_missing(self) -> bool {
        matches!(self, Self::MissingRow | Self::MissingColumn)
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ExactMatch => write!(f, "exact_match"),
            Self::HighConfidence => write!(f, "high_confidence"),
            Self::NeedsReview => write!(f, "needs_review"),
            Self::Mismatch => write!(f, "mismatch"),
            Self::MissingRow => write!(f, "missing_row"),
            Self::MissingColumn => write!(f, "missing_column"),
        }
    }
}

/// One classified (record, candidate, language) cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CellVerdict {
    pub source_key: String,
    pub source_row: usize,
    pub target_key: Option<String>,
    pub target_row: Option<usize>,
    pub tier: Option<MatchTier>,
    /// 0 for the best candidate, increasing for lower-ranked code collisions.
    pub candidate_rank: usize,
    pub language: Language,
    pub source_text: String,
    pub target_text: Option<String>,
    pub verdict: Verdict,
    pub score: Option<f64>,
}

// ---------------------------------------------------------------------------
// Summary + Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReconSummary {
    pub source_records: usize,
    pub exact_matched: usize,
    pub code_matched: usize,
    /// Code-tier records with more than one candidate.
    pub ambiguous: usize,
    pub unmatched: usize,
    pub total_cells: usize,
    pub verdict_counts: BTreeMap<Verdict, usize>,
    pub by_language: BTreeMap<Language, BTreeMap<Verdict, usize>>,
    pub has_differences: bool,
    pub needs_review: bool,
}

impl ReconSummary {
    pub fn count(&self, verdict: Verdict) -> usize {
        self.verdict_counts.get(&verdict).copied().unwrap_or(0)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconMeta {
    pub config_name: String,
    pub engine_version: String,
    pub run_at: String,
    pub report_mode: ReportMode,
    pub languages: Vec<Language>,
    pub source_table: String,
    pub comparison_table: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconResult {
    pub meta: ReconMeta,
    pub summary: ReconSummary,
    pub records: Vec<RecordOutcome>,
    pub verdicts: Vec<CellVerdict>,
}
