use crate::config::{ReconConfig, ReportMode};
use crate::error::ReconError;
use crate::index::{build_index, CodeIndex};
use crate::language::{
    find_key_column, resolve_language_columns, LabelTable, Language, LanguageColumnMap,
};
use crate::matcher::reconcile;
use crate::model::{
    CellVerdict, MatchCandidate, MatchOutcome, ReconInput, ReconMeta, ReconResult, RecordOutcome,
};
use crate::similarity::{classify, Target};
use crate::summary::compute_summary;

// ---------------------------------------------------------------------------
// Observers
// ---------------------------------------------------------------------------

/// Receives `(completed, total)` source records as reconciliation advances.
pub trait ProgressObserver {
    fn on_progress(&mut self, completed: usize, total: usize);
}

impl<F: FnMut(usize, usize)> ProgressObserver for F {
    fn on_progress(&mut self, completed: usize, total: usize) {
        self(completed, total)
    }
}

/// Observer that ignores progress.
pub struct NoProgress;

impl ProgressObserver for NoProgress {
    fn on_progress(&mut self, _completed: usize, _total: usize) {}
}

/// Consumer of the ordered verdict stream.
pub trait VerdictSink {
    fn accept(&mut self, verdict: CellVerdict);
}

impl VerdictSink for Vec<CellVerdict> {
    fn accept(&mut self, verdict: CellVerdict) {
        self.push(verdict);
    }
}

// ---------------------------------------------------------------------------
// Language plan
// ---------------------------------------------------------------------------

/// A language to classify, with its column in each table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlannedLanguage {
    pub language: Language,
    pub source_column: usize,
    /// `None` when the comparison table has no column for the language.
    pub comparison_column: Option<usize>,
}

/// Decide which languages are classified, in canonical order.
///
/// With no selection, every language present in both tables. With a selection,
/// each selected language the source table has; those absent from the
/// comparison table are kept and classify as missing columns.
pub fn plan_languages(
    selected: &[Language],
    source: &LanguageColumnMap,
    comparison: &LanguageColumnMap,
) -> Vec<PlannedLanguage> {
    if selected.is_empty() {
        return source
            .languages()
            .filter_map(|language| {
                let comparison_column = comparison.get(language)?;
                Some(PlannedLanguage {
                    language,
                    source_column: source.get(language)?,
                    comparison_column: Some(comparison_column),
                })
            })
            .collect();
    }

    let mut wanted: Vec<Language> = selected.to_vec();
    wanted.sort();
    wanted.dedup();

    wanted
        .into_iter()
        .filter_map(|language| match source.get(language) {
            Some(source_column) => Some(PlannedLanguage {
                language,
                source_column,
                comparison_column: comparison.get(language),
            }),
            None => {
                log::warn!("{language}: selected but not in the source table, skipped");
                None
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Run
// ---------------------------------------------------------------------------

/// Record outcomes of one reconciliation, plus the languages that were classified.
#[derive(Debug, Clone)]
pub struct Reconciliation {
    pub languages: Vec<Language>,
    pub records: Vec<RecordOutcome>,
}

/// Run reconciliation per config. Returns classified verdicts + summary.
pub fn run(config: &ReconConfig, input: &ReconInput) -> Result<ReconResult, ReconError> {
    run_with_progress(config, input, &mut NoProgress)
}

pub fn run_with_progress(
    config: &ReconConfig,
    input: &ReconInput,
    progress: &mut dyn ProgressObserver,
) -> Result<ReconResult, ReconError> {
    let mut verdicts: Vec<CellVerdict> = Vec::new();
    let reconciliation = reconcile_tables(config, input, progress, &mut verdicts)?;
    let summary = compute_summary(&reconciliation.records, &verdicts);

    log::info!(
        "{} records: {} exact, {} by code ({} ambiguous), {} unmatched; {} cells",
        summary.source_records,
        summary.exact_matched,
        summary.code_matched,
        summary.ambiguous,
        summary.unmatched,
        summary.total_cells
    );

    Ok(ReconResult {
        meta: ReconMeta {
            config_name: config.name.clone(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
            report_mode: config.report.mode,
            languages: reconciliation.languages,
            source_table: input.source.name.clone(),
            comparison_table: input.comparison.name.clone(),
        },
        summary,
        records: reconciliation.records,
        verdicts,
    })
}

/// Reconcile every source record and stream verdicts into `sink`.
///
/// Verdicts arrive ordered by source row, then candidate rank, then language.
/// Neither table is modified.
pub fn reconcile_tables(
    config: &ReconConfig,
    input: &ReconInput,
    progress: &mut dyn ProgressObserver,
    sink: &mut dyn VerdictSink,
) -> Result<Reconciliation, ReconError> {
    let source = input.source;
    let comparison = input.comparison;

    let labels = LabelTable::with_aliases(&config.languages.aliases);
    let source_columns = resolve_language_columns(source.header(), &labels);
    let comparison_columns = resolve_language_columns(comparison.header(), &labels);
    let plan = plan_languages(&config.languages.selected, &source_columns, &comparison_columns);
    if plan.is_empty() {
        return Err(ReconError::NoLanguages {
            source: source.name.clone(),
            comparison: comparison.name.clone(),
        });
    }

    let source_key_col =
        find_key_column(&source.name, source.header(), config.source.key_column.as_ref())?;
    let comparison_key_col = find_key_column(
        &comparison.name,
        comparison.header(),
        config.comparison.key_column.as_ref(),
    )?;
    log::debug!("key columns: source {source_key_col}, comparison {comparison_key_col}");

    let source_index = build_index(source, source_key_col);
    let comparison_index = build_index(comparison, comparison_key_col);
    let codes = CodeIndex::build(&comparison_index);

    let entries = source_index.entries();
    let total = entries.len();
    let mut records = Vec::with_capacity(total);

    for (done, (source_key, source_row)) in entries.into_iter().enumerate() {
        let candidates = reconcile(source_key, source_row, &comparison_index, &codes);
        let outcome = MatchOutcome::from_candidates(&candidates);

        let emitted: &[MatchCandidate] = match config.report.mode {
            ReportMode::Best => &candidates[..candidates.len().min(1)],
            ReportMode::All => &candidates,
        };

        if emitted.is_empty() {
            emit_group(input, &plan, source_key, source_row, None, 0, sink);
        }
        for (rank, candidate) in emitted.iter().enumerate() {
            emit_group(input, &plan, source_key, source_row, Some(candidate), rank, sink);
        }

        records.push(RecordOutcome {
            source_key: source_key.to_string(),
            source_row,
            outcome,
            candidates,
        });
        progress.on_progress(done + 1, total);
    }

    Ok(Reconciliation {
        languages: plan.iter().map(|p| p.language).collect(),
        records,
    })
}

/// Classify every planned language for one (record, candidate) pair.
fn emit_group(
    input: &ReconInput,
    plan: &[PlannedLanguage],
    source_key: &str,
    source_row: usize,
    candidate: Option<&MatchCandidate>,
    rank: usize,
    sink: &mut dyn VerdictSink,
) {
    for planned in plan {
        let source_text = input.source.text(source_row, planned.source_column);
        let target = match (candidate, planned.comparison_column) {
            (None, _) => Target::MissingRow,
            (Some(_), None) => Target::MissingColumn,
            (Some(c), Some(col)) => Target::Text(input.comparison.text(c.target_row, col)),
        };
        let (score, verdict) = classify(source_text, target);

        sink.accept(CellVerdict {
            source_key: source_key.to_string(),
            source_row,
            target_key: candidate.map(|c| c.target_key.clone()),
            target_row: candidate.map(|c| c.target_row),
            tier: candidate.map(|c| c.tier),
            candidate_rank: rank,
            language: planned.language,
            source_text: source_text.to_string(),
            target_text: match target {
                Target::Text(text) => Some(text.to_string()),
                Target::MissingRow | Target::MissingColumn => None,
            },
            verdict,
            score,
        });
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
