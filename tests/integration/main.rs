//! Library integration tests

mod common;
mod persistence_tests;
