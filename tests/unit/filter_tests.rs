use chrono::{NaiveDate, NaiveDateTime};

use prune::config::PruneConfig;
use prune::pruning::{FilterArgs, Predicate};
use prune::test_utils::{TestCase, run_table_tests};

fn now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 3, 31)
        .unwrap()
        .and_hms_opt(8, 0, 0)
        .unwrap()
}

fn args(before: Option<&str>, rate: Option<&str>, types: Option<&str>) -> FilterArgs {
    FilterArgs {
        before: before.map(String::from),
        sample_rate: rate.map(String::from),
        post_type: types.map(String::from),
    }
}

#[test]
fn normalize_table() -> Result<(), String> {
    let cases = vec![
        TestCase {
            name: "all defaults",
            input: args(None, None, None),
            expected: Ok(("2024-09-30 08:00:00".to_string(), 0.8, vec![])),
        },
        TestCase {
            name: "explicit everything",
            input: args(Some("2023-01-01"), Some("1.0"), Some("post")),
            expected: Ok(("2023-01-01 00:00:00".to_string(), 1.0, vec!["post".to_string()])),
        },
        TestCase {
            name: "relative before",
            input: args(Some("1 year ago"), Some("0"), Some("page, post")),
            expected: Ok((
                "2024-03-31 08:00:00".to_string(),
                0.0,
                vec!["page".to_string(), "post".to_string()],
            )),
        },
        TestCase {
            name: "non-numeric rate",
            input: args(None, Some("abc"), None),
            expected: Err("invalid_argument".to_string()),
        },
        TestCase {
            name: "rate above one",
            input: args(None, Some("1.0001"), None),
            expected: Err("invalid_argument".to_string()),
        },
        TestCase {
            name: "garbage date",
            input: args(Some("the day after tomorrow"), None, None),
            expected: Err("invalid_argument".to_string()),
        },
    ];

    run_table_tests(cases, |input| {
        input
            .normalize_at(&PruneConfig::default(), now())
            .map(|spec| {
                (
                    spec.cutoff_string(),
                    spec.sample_rate,
                    spec.type_filter.into_iter().collect::<Vec<_>>(),
                )
            })
            .map_err(|err| err.code().to_string())
    })
}

#[test]
fn rendered_predicate_matches_filter() -> Result<(), String> {
    let cases = vec![
        TestCase {
            name: "no type filter",
            input: args(Some("2023-01-01"), Some("0.5"), None),
            expected: (false, 2),
        },
        TestCase {
            name: "two types",
            input: args(Some("2023-01-01"), Some("0.5"), Some("post,page")),
            expected: (true, 4),
        },
        TestCase {
            name: "duplicate types collapse",
            input: args(Some("2023-01-01"), Some("0.5"), Some("post,post, post")),
            expected: (true, 3),
        },
    ];

    run_table_tests(cases, |input| {
        let spec = input
            .normalize_at(&PruneConfig::default(), now())
            .expect("valid filter");
        let rendered = Predicate::for_filter(&spec).render();
        assert_eq!(rendered.placeholder_count(), rendered.params.len());
        (rendered.sql.contains("post_type"), rendered.params.len())
    })
}
