use crate::model::{CellVerdict, MatchOutcome, ReconSummary, RecordOutcome, Verdict};

/// Compute summary statistics from record outcomes and cell verdicts.
pub fn compute_summary(records: &[RecordOutcome], verdicts: &[CellVerdict]) -> ReconSummary {
    let mut summary = ReconSummary {
        source_records: records.len(),
        total_cells: verdicts.len(),
        ..ReconSummary::default()
    };

    for r in records {
        match r.outcome {
            MatchOutcome::ExactMatched => summary.exact_matched += 1,
            MatchOutcome::CodeMatched(n) => {
                summary.code_matched += 1;
                if n > 1 {
                    summary.ambiguous += 1;
                }
            }
            MatchOutcome::Unmatched => summary.unmatched += 1,
        }
    }

    for v in verdicts {
        *summary.verdict_counts.entry(v.verdict).or_insert(0) += 1;
        *summary
            .by_language
            .entry(v.language)
            .or_default()
            .entry(v.verdict)
            .or_insert(0) += 1;
    }

    summary.has_differences = summary
        .verdict_counts
        .keys()
        .any(|v| *v == Verdict::Mismatch || v.is_missing());
    summary.needs_review = summary.count(Verdict::NeedsReview) > 0;
    summary
}
