//! Local store integration tests

mod migrations_test;
