//! Unit-level integration suite entry point.

mod cli_command_parse_tests;
mod filter_tests;
mod logging_tests;
