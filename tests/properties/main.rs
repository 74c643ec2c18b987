//! Property-based test suite entry point.

mod deletion_tests;
mod predicate_tests;
