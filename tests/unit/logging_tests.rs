use prune::pruning::Pruner;
use prune::storage::TargetTables;
use prune::test_utils::RecordingExecutor;
use prune::test_utils::logging::capture_logs;
use tracing::Level;

#[test]
fn delete_outcome_is_logged_with_counts() {
    let tables = TargetTables::with_prefix("wp_").unwrap();
    let mut pruner = Pruner::new(RecordingExecutor::returning(5, 3), tables);

    let (result, logs) = capture_logs(|| pruner.prune_revisions());
    assert_eq!(result.unwrap().rows_deleted, 5);

    let complete = logs
        .iter()
        .find(|entry| entry.message == "delete complete")
        .expect("delete complete event");
    assert_eq!(complete.level, Level::INFO);
    assert_eq!(complete.target, "prune");
    assert_eq!(complete.field("posts"), Some("5"));
    assert_eq!(complete.field("postmeta"), Some("3"));
    assert_eq!(complete.field("table"), Some("wp_posts"));
}

#[test]
fn failed_delete_logs_no_outcome() {
    let tables = TargetTables::with_prefix("wp_").unwrap();
    let mut executor = RecordingExecutor::default();
    executor.fail_with = Some("disk I/O error".to_string());
    let mut pruner = Pruner::new(executor, tables);

    let (result, logs) = capture_logs(|| pruner.prune_revisions());
    assert!(result.is_err());
    assert!(!logs.iter().any(|entry| entry.message == "delete complete"));
}
