use glint_core::config::SuppressionConfig;
use glint_core::models::Pattern;
use glint_patterns::{should_suppress, PatternStore};
use proptest::prelude::*;

proptest! {
    #[test]
    fn accuracy_is_always_a_ratio(confirms in 0u64..200, rejects in 0u64..200) {
        let mut p = Pattern::new("vendor", "6400-Meals", 10.0);
        p.confirm_count = confirms;
        p.reject_count = rejects;
        match p.accuracy() {
            None => prop_assert_eq!(confirms + rejects, 0),
            Some(a) => prop_assert!((0.0..=1.0).contains(&a)),
        }
    }

    #[test]
    fn occurrence_count_and_mean_match_upserts(
        amounts in proptest::collection::vec(0.01f64..10_000.0, 1..50),
    ) {
        let store = PatternStore::new(SuppressionConfig::default());
        for amount in &amounts {
            store.upsert("vendor", "6400-Meals", *amount).unwrap();
        }
        let p = store.get("vendor").unwrap();
        prop_assert_eq!(p.occurrence_count, amounts.len() as u64);
        let mean = amounts.iter().sum::<f64>() / amounts.len() as f64;
        prop_assert!((p.average_amount - mean).abs() < 1e-6);
    }

    #[test]
    fn suppression_never_reverses_as_rejects_grow(confirms in 0u64..20, rejects in 0u64..20) {
        let config = SuppressionConfig::default();
        let mut p = Pattern::new("vendor", "6400-Meals", 10.0);
        p.confirm_count = confirms;
        p.reject_count = rejects;
        if should_suppress(&p, &config) {
            p.reject_count += 1;
            prop_assert!(should_suppress(&p, &config));
        }
    }
}
