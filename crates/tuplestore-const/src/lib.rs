//! # Tuplestore Constants
//!
//! Centralized constants used across the tuplestore crates.
//! This crate provides a single source of truth for magic numbers and strings.

// ============================================================================
// Revision Constants
// ============================================================================

/// Raw value stored in `deleted_at_revision` for rows that were never deleted
///
/// This is the largest representable revision, so it can never be assigned to a
/// real commit and always compares greater than any query revision.
pub const LIVE_DELETED_REVISION_RAW: u64 = u64::MAX;

// ============================================================================
// Query Constants
// ============================================================================

/// Default threshold above which a query execution is logged as slow
///
/// Used by:
/// - `QueryExecutor` when no `QueryConfig` is supplied
/// - `tuplestore-config` defaults
pub const DEFAULT_SLOW_QUERY_THRESHOLD_MS: u64 = 250;

// ============================================================================
// Observability Constants
// ============================================================================

/// Filter used when neither the config nor `RUST_LOG` provides one
pub const DEFAULT_LOG_FILTER: &str = "info,tuplestore=debug";

/// Prefix for environment variable overrides (e.g. `TUPLESTORE__QUERY__SLOW_QUERY_THRESHOLD_MS`)
pub const ENV_PREFIX: &str = "TUPLESTORE";
