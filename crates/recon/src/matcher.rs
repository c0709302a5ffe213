use crate::identifier::extract_source_identifier;
use crate::index::{CodeIndex, RecordIndex};
use crate::model::{MatchCandidate, MatchTier};
use crate::similarity::similarity_ratio;

/// Find comparison rows for one source record.
///
/// Tiers run in order and stop at the first that yields anything:
/// 1. exact raw key: exactly one candidate, key similarity 1.0
/// 2. numeric code: every comparison key whose code matches, ranked by key
///    similarity (descending, ties keep row order)
///
/// An empty result means the record is unmatched.
pub fn reconcile(
    source_key: &str,
    source_row: usize,
    keys: &RecordIndex,
    codes: &CodeIndex,
) -> Vec<MatchCandidate> {
    if let Some(target_row) = keys.get(source_key) {
        return vec![MatchCandidate {
            source_row,
            target_row,
            target_key: source_key.to_string(),
            tier: MatchTier::ExactKey,
            key_similarity: 1.0,
        }];
    }

    let Some(identifier) = extract_source_identifier(source_key) else {
        log::debug!("'{source_key}': no exact key and no code");
        return Vec::new();
    };

    let source_lower = source_key.to_lowercase();
    let mut candidates: Vec<MatchCandidate> = codes
        .matching(&identifier)
        .into_iter()
        .map(|entry| MatchCandidate {
            source_row,
            target_row: entry.row,
            target_key: entry.key.clone(),
            tier: MatchTier::NumericCode,
            key_similarity: similarity_ratio(&source_lower, &entry.key.to_lowercase()),
        })
        .collect();

    // Stable sort keeps discovery order among equal scores.
    candidates.sort_by(|a, b| b.key_similarity.total_cmp(&a.key_similarity));

    if candidates.len() > 1 {
        log::debug!(
            "'{source_key}': code {} matches {} comparison keys",
            identifier.digits(),
            candidates.len()
        );
    }
    candidates
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::build_index;
    use crate::model::Table;

    fn indices(keys: &[&str]) -> (RecordIndex, CodeIndex) {
        let mut rows = vec![vec!["Key"]];
        rows.extend(keys.iter().map(|k| vec![*k]));
        let index = build_index(&Table::from_text_rows("cmp", rows), 1);
        let codes = CodeIndex::build(&index);
        (index, codes)
    }

    #[test]
    fn exact_key_short_circuits() {
        let (keys, codes) = indices(&["key0101_other", "Error0101NoFlash"]);
        let found = reconcile("Error0101NoFlash", 2, &keys, &codes);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].tier, MatchTier::ExactKey);
        assert_eq!(found[0].target_row, 3);
        assert_eq!(found[0].key_similarity, 1.0);
        assert_eq!(found[0].source_row, 2);
    }

    #[test]
    fn three_digit_code_matches_padded_source() {
        let (keys, codes) = indices(&["key101_noflash"]);
        let found = reconcile("Error0101NoFlash", 2, &keys, &codes);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].tier, MatchTier::NumericCode);
        assert_eq!(found[0].target_key, "key101_noflash");
        assert!(found[0].key_similarity > 0.0 && found[0].key_similarity < 1.0);
    }

    #[test]
    fn collects_all_code_collisions_ranked() {
        let (keys, codes) = indices(&["key0101_zzz", "key0101_noflash", "key0202"]);
        let found = reconcile("Error0101NoFlash", 2, &keys, &codes);
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].target_key, "key0101_noflash");
        assert_eq!(found[1].target_key, "key0101_zzz");
        assert!(found[0].key_similarity >= found[1].key_similarity);
    }

    #[test]
    fn equal_scores_keep_row_order() {
        let (keys, codes) = indices(&["key0101b", "key0101a"]);
        let found = reconcile("x0101", 2, &keys, &codes);
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].key_similarity, found[1].key_similarity);
        assert_eq!(found[0].target_row, 2);
        assert_eq!(found[1].target_row, 3);
    }

    #[test]
    fn no_code_and_no_key_is_unmatched() {
        let (keys, codes) = indices(&["key0101"]);
        assert!(reconcile("Error101", 2, &keys, &codes).is_empty());
        assert!(reconcile("Error0102", 2, &keys, &codes).is_empty());
    }

    #[test]
    fn comparison_keys_without_prefix_never_code_match() {
        let (keys, codes) = indices(&["err0101", "0101"]);
        assert!(reconcile("Error0101", 2, &keys, &codes).is_empty());
    }
}
