use std::path::Path;

use clap::Parser;

use prune::cli::{Cli, Commands, OutputFormat};

fn parse(args: &[&str]) -> Cli {
    let mut argv = vec!["prune"];
    argv.extend_from_slice(args);
    Cli::parse_from(argv)
}

#[test]
fn parse_posts_underscore_flags() {
    match parse(&[
        "posts",
        "--before=2023-01-01",
        "--sample_rate=0.25",
        "--post_type=post,page",
    ])
    .command
    {
        Commands::Posts(args) => {
            assert_eq!(args.before.as_deref(), Some("2023-01-01"));
            assert_eq!(args.sample_rate.as_deref(), Some("0.25"));
            assert_eq!(args.post_type.as_deref(), Some("post,page"));
            assert!(!args.dry_run);
        }
        other => panic!("unexpected command: {:?}", other),
    }
}

#[test]
fn parse_posts_hyphen_aliases() {
    match parse(&["posts", "--sample-rate", "1", "--post-type", "page", "--dry-run"]).command {
        Commands::Posts(args) => {
            assert_eq!(args.sample_rate.as_deref(), Some("1"));
            assert_eq!(args.post_type.as_deref(), Some("page"));
            assert!(args.dry_run);
            assert!(args.before.is_none());
        }
        other => panic!("unexpected command: {:?}", other),
    }
}

#[test]
fn parse_posts_relative_before_with_leading_hyphen() {
    match parse(&["posts", "--before", "-6 months"]).command {
        Commands::Posts(args) => assert_eq!(args.before.as_deref(), Some("-6 months")),
        other => panic!("unexpected command: {:?}", other),
    }
}

#[test]
fn parse_posts_keeps_sample_rate_raw() {
    // Validation happens in the normalizer, not in clap.
    match parse(&["posts", "--sample_rate", "abc"]).command {
        Commands::Posts(args) => assert_eq!(args.sample_rate.as_deref(), Some("abc")),
        other => panic!("unexpected command: {:?}", other),
    }
}

#[test]
fn parse_revisions() {
    match parse(&["revisions"]).command {
        Commands::Revisions(args) => assert!(!args.dry_run),
        other => panic!("unexpected command: {:?}", other),
    }
}

#[test]
fn parse_global_flags_after_subcommand() {
    let cli = parse(&[
        "revisions",
        "--robot",
        "-vv",
        "--db",
        "/srv/content.db",
        "--table-prefix",
        "site2_",
    ]);
    assert!(cli.robot);
    assert_eq!(cli.verbose, 2);
    assert_eq!(cli.db.as_deref(), Some(Path::new("/srv/content.db")));
    assert_eq!(cli.table_prefix.as_deref(), Some("site2_"));
    assert_eq!(cli.output_format(), OutputFormat::Robot);
}

#[test]
fn parse_default_output_is_human() {
    let cli = parse(&["posts"]);
    assert_eq!(cli.output_format(), OutputFormat::Human);
    assert!(!cli.quiet);
    assert!(cli.config.is_none());
}

#[test]
fn parse_rejects_unknown_subcommand() {
    assert!(Cli::try_parse_from(["prune", "comments"]).is_err());
    assert!(Cli::try_parse_from(["prune"]).is_err());
}
