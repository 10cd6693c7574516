//! Test fixtures for tuplestore test suites
//!
//! Tuple builders, pre-seeded engines, an engine that fails on demand, and the
//! shared proptest configuration.

#![deny(unsafe_code)]
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

pub mod faulty;
pub mod proptest_config;
pub mod tuples;

pub use faulty::{Fault, FaultyEngine};
pub use tuples::{seeded_engine, test_tuple};
