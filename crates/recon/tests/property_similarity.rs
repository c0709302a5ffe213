// Property-based tests for identifiers, similarity and record matching.
// CI: 256 cases (default). Soak: PROPTEST_CASES=10000 cargo test --release

use proptest::prelude::*;

use lexigrid_recon::config::{ReconConfig, TableConfig};
use lexigrid_recon::engine::run;
use lexigrid_recon::identifier::{extract_comparison_identifier, extract_source_identifier};
use lexigrid_recon::index::{build_index, CodeIndex};
use lexigrid_recon::matcher::reconcile;
use lexigrid_recon::model::{MatchTier, ReconInput, Table, Verdict};
use lexigrid_recon::similarity::{classify, similarity_ratio, Target};

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

fn config_256() -> ProptestConfig {
    ProptestConfig {
        cases: std::env::var("PROPTEST_CASES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(256),
        failure_persistence: None,
        ..ProptestConfig::default()
    }
}

fn arb_text() -> impl Strategy<Value = String> {
    prop_oneof![
        r"[a-e ]{0,12}",
        r"[无闪存您好早上]{0,8}",
        any::<String>().prop_map(|s| s.chars().take(16).collect()),
    ]
}

// ---------------------------------------------------------------------------
// Similarity
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(config_256())]

    #[test]
    fn similarity_is_symmetric(a in arb_text(), b in arb_text()) {
        prop_assert_eq!(similarity_ratio(&a, &b), similarity_ratio(&b, &a));
    }

    #[test]
    fn similarity_is_bounded(a in arb_text(), b in arb_text()) {
        let score = similarity_ratio(&a, &b);
        prop_assert!((0.0..=1.0).contains(&score), "score {} out of range", score);
    }

    #[test]
    fn identical_text_is_exact(s in r"[a-zA-Z0-9 您好]{1,20}") {
        prop_assert_eq!(classify(&s, Target::Text(&s)), (Some(1.0), Verdict::ExactMatch));
    }

    #[test]
    fn empty_source_against_text_is_mismatch(t in r"[a-z]{1,10}") {
        prop_assert_eq!(classify("", Target::Text(&t)), (Some(0.0), Verdict::Mismatch));
    }
}

// ---------------------------------------------------------------------------
// Identifiers
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(config_256())]

    #[test]
    fn source_identifier_is_first_four_digit_run(
        prefix in r"[A-Za-z_]{0,8}",
        digits in r"[0-9]{4}",
        suffix in r"[A-Za-z0-9_]{0,8}",
    ) {
        let key = format!("{prefix}{digits}{suffix}");
        let id = extract_source_identifier(&key).unwrap();
        prop_assert_eq!(id.digits(), digits.as_str());
    }

    #[test]
    fn comparison_identifier_requires_prefix(
        start in r"[a-jl-zA-JL-Z_]",
        rest in r"[A-Za-z_]{0,5}",
        digits in r"[0-9]{3,4}",
    ) {
        let key = format!("{start}{rest}{digits}");
        prop_assert!(extract_comparison_identifier(&key).is_none());
    }

    #[test]
    fn three_digit_codes_pad_and_match(
        filler in r"[A-Za-z_]{0,4}",
        digits in r"[0-9]{3}",
        tail in r"[a-z]{0,6}",
    ) {
        let comparison = extract_comparison_identifier(&format!("key{filler}{digits}{tail}")).unwrap();
        let padded = format!("0{digits}");
        prop_assert_eq!(comparison.padded_form(), Some(padded.as_str()));

        let source = extract_source_identifier(&format!("Err{padded}X")).unwrap();
        prop_assert!(source.matches_comparison(&comparison));
    }
}

// ---------------------------------------------------------------------------
// Matching
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(config_256())]

    #[test]
    fn exact_key_always_short_circuits(
        code in r"[0-9]{4}",
        extra in proptest::collection::vec(r"[a-z]{1,5}", 0..4),
    ) {
        let source_key = format!("key{code}");
        let mut rows = vec![vec!["Key".to_string()]];
        for e in &extra {
            rows.push(vec![format!("key{code}_{e}")]);
        }
        rows.push(vec![source_key.clone()]);
        let table = Table::from_text_rows("cmp", rows);
        let keys = build_index(&table, 1);
        let codes = CodeIndex::build(&keys);

        let found = reconcile(&source_key, 2, &keys, &codes);
        prop_assert_eq!(found.len(), 1);
        prop_assert_eq!(found[0].tier, MatchTier::ExactKey);
        prop_assert_eq!(found[0].key_similarity, 1.0);
    }

    #[test]
    fn keys_without_code_or_match_are_all_missing(
        key in r"[A-Za-z]{1,10}",
        text in r"[a-z]{0,6}",
    ) {
        let source = Table::from_text_rows(
            "src",
            vec![vec!["Key".to_string(), "English".into(), "中文".into()], vec![key, text.clone(), text]],
        );
        let comparison = Table::from_text_rows(
            "cmp",
            vec![vec!["Key", "English", "中文"], vec!["key0001", "a", "b"]],
        );
        let config = ReconConfig::adhoc(TableConfig::new("s"), TableConfig::new("c"));
        let result = run(&config, &ReconInput { source: &source, comparison: &comparison }).unwrap();

        prop_assert_eq!(result.verdicts.len(), 2);
        prop_assert!(result.verdicts.iter().all(|v| v.verdict == Verdict::MissingRow));
    }
}
