//! Shared proptest configuration
//!
//! The `PROPTEST_CASES` environment variable overrides the default case count:
//!
//! ```bash
//! PROPTEST_CASES=500 cargo test
//! ```

use proptest::test_runner::Config as ProptestConfig;

/// Default number of proptest cases
pub const DEFAULT_PROPTEST_CASES: u32 = 64;

/// Returns the number of test cases to run, reading from `PROPTEST_CASES`
#[must_use]
pub fn test_cases() -> u32 {
    std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_PROPTEST_CASES)
}

/// Returns a proptest configuration with the appropriate number of test cases
#[must_use]
pub fn proptest_config() -> ProptestConfig {
    ProptestConfig::with_cases(test_cases())
}
