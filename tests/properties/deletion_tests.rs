use chrono::NaiveDate;
use proptest::prelude::*;

use prune::pruning::FilterSpec;
use prune::test_utils::ContentDbFixture;

const TYPES: [&str; 3] = ["post", "page", "attachment"];

/// (type index, year, meta rows)
fn arb_rows() -> impl Strategy<Value = Vec<(usize, i32, usize)>> {
    prop::collection::vec((0usize..3, 2019i32..2025, 0usize..3), 0..30)
}

fn seed(fixture: &ContentDbFixture, rows: &[(usize, i32, usize)]) {
    for &(type_index, year, meta) in rows {
        let id = fixture.insert_post(TYPES[type_index], "publish", &format!("{year}-06-01 00:00:00"));
        for n in 0..meta {
            fixture.insert_meta(id, &format!("key_{n}"));
        }
    }
}

fn spec(rate: f64, types: &[&str]) -> FilterSpec {
    let cutoff = NaiveDate::from_ymd_opt(2022, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    FilterSpec::new(cutoff, rate, types.iter().map(ToString::to_string)).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn test_full_rate_removes_exactly_the_eligible_rows(rows in arb_rows()) {
        let fixture = ContentDbFixture::new();
        seed(&fixture, &rows);

        let eligible: Vec<_> = rows
            .iter()
            .filter(|(type_index, year, _)| TYPES[*type_index] != "attachment" && *year < 2022)
            .collect();
        let expected_meta: usize = eligible.iter().map(|(_, _, meta)| meta).sum();

        let result = fixture.pruner().prune_posts(&spec(1.0, &["post", "page"])).unwrap();

        prop_assert_eq!(result.rows_deleted, eligible.len());
        prop_assert_eq!(result.meta_rows_deleted, expected_meta);
        prop_assert_eq!(
            fixture.post_count_by_type("attachment"),
            rows.iter().filter(|(type_index, _, _)| *type_index == 2).count()
        );
        prop_assert_eq!(fixture.orphaned_meta_count(), 0);
    }

    #[test]
    fn test_zero_rate_removes_nothing(rows in arb_rows()) {
        let fixture = ContentDbFixture::new();
        seed(&fixture, &rows);
        let posts = fixture.post_count();
        let meta = fixture.meta_count();

        let result = fixture.pruner().prune_posts(&spec(0.0, &[])).unwrap();

        prop_assert_eq!(result.rows_deleted, 0);
        prop_assert_eq!(result.meta_rows_deleted, 0);
        prop_assert_eq!(fixture.post_count(), posts);
        prop_assert_eq!(fixture.meta_count(), meta);
    }

    #[test]
    fn test_partial_rate_only_touches_eligible_rows(rows in arb_rows(), rate in 0.0f64..=1.0) {
        let fixture = ContentDbFixture::new();
        seed(&fixture, &rows);
        let eligible = rows.iter().filter(|(_, year, _)| *year < 2022).count();
        let posts = fixture.post_count();

        let result = fixture.pruner().prune_posts(&spec(rate, &[])).unwrap();

        prop_assert!(result.rows_deleted <= eligible);
        prop_assert_eq!(fixture.post_count(), posts - result.rows_deleted);
        prop_assert_eq!(fixture.orphaned_meta_count(), 0);
    }
}
