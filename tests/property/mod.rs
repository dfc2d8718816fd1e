//! Property-based tests

mod cleanup_proptest;
mod reconcile_proptest;
