use chrono::{NaiveDate, NaiveDateTime};
use proptest::prelude::*;

use prune::config::PruneConfig;
use prune::pruning::filter::parse_post_types;
use prune::pruning::{FilterArgs, FilterSpec, Param, Predicate};

fn arb_cutoff() -> impl Strategy<Value = NaiveDateTime> {
    (1990i32..2100, 1u32..=12, 1u32..=28, 0u32..24, 0u32..60).prop_map(|(y, m, d, h, min)| {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    })
}

fn arb_spec() -> impl Strategy<Value = FilterSpec> {
    (
        arb_cutoff(),
        0.0f64..=1.0,
        prop::collection::btree_set("[a-z_]{1,12}", 0..5),
    )
        .prop_map(|(cutoff, rate, types)| FilterSpec::new(cutoff, rate, types).unwrap())
}

proptest! {
    #[test]
    fn test_normalize_never_panics(
        before in proptest::option::of(".*"),
        rate in proptest::option::of(".*"),
        types in proptest::option::of(".*"),
    ) {
        let args = FilterArgs { before, sample_rate: rate, post_type: types };
        let _ = args.normalize(&PruneConfig::default());
    }

    #[test]
    fn test_accepted_rates_are_in_unit_interval(rate in ".*") {
        let args = FilterArgs { sample_rate: Some(rate), ..FilterArgs::default() };
        if let Ok(spec) = args.normalize(&PruneConfig::default()) {
            prop_assert!((0.0..=1.0).contains(&spec.sample_rate));
        }
    }

    #[test]
    fn test_post_types_are_clean(input in "[a-z ,_]{0,40}") {
        for entry in parse_post_types(&input) {
            prop_assert!(!entry.is_empty());
            prop_assert_eq!(entry.trim(), entry.as_str());
            prop_assert!(!entry.contains(','));
        }
    }

    #[test]
    fn test_rendered_predicate_shape(spec in arb_spec()) {
        let rendered = Predicate::for_filter(&spec).render();

        prop_assert!(!rendered.is_empty());
        prop_assert!(rendered.sql.contains("p.post_date < ?"));
        prop_assert!(rendered.sql.contains("RANDOM()"));
        prop_assert_eq!(rendered.placeholder_count(), rendered.params.len());
        prop_assert_eq!(rendered.sql.contains("post_type"), !spec.type_filter.is_empty());
        prop_assert_eq!(rendered.params.len(), spec.type_filter.len() + 2);
        prop_assert_eq!(rendered.params.last(), Some(&Param::Real(spec.sample_rate)));
    }

    #[test]
    fn test_type_values_never_reach_sql_text(types in prop::collection::btree_set("[^?]{1,20}", 1..4)) {
        let spec = FilterSpec::new(
            NaiveDate::from_ymd_opt(2023, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap(),
            0.5,
            types.clone(),
        ).unwrap();
        let rendered = Predicate::for_filter(&spec).render();
        let expected: Vec<Param> = types.into_iter().map(Param::Text).collect();
        prop_assert_eq!(&rendered.params[..expected.len()], expected.as_slice());
        prop_assert!(rendered.sql.starts_with("p.post_type IN ("));
    }
}
