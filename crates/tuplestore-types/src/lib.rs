//! # Tuplestore Types
//!
//! Shared type definitions for the tuplestore read path.
//!
//! This crate holds the values exchanged between callers, the query layer, and
//! storage engines, so none of those crates need to depend on each other for
//! their vocabulary.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tuplestore_const::LIVE_DELETED_REVISION_RAW;

// ============================================================================
// Core Domain Types
// ============================================================================

/// An object reference with a relation, e.g. `doc:42#viewer`
///
/// On the subject side an empty `relation` means "the object itself" rather
/// than a userset.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectAndRelation {
    pub namespace: String,
    pub object_id: String,
    pub relation: String,
}

impl ObjectAndRelation {
    pub fn new(
        namespace: impl Into<String>,
        object_id: impl Into<String>,
        relation: impl Into<String>,
    ) -> Self {
        Self { namespace: namespace.into(), object_id: object_id.into(), relation: relation.into() }
    }
}

impl fmt::Display for ObjectAndRelation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.object_id)?;
        if !self.relation.is_empty() {
            write!(f, "#{}", self.relation)?;
        }
        Ok(())
    }
}

/// One fact: the resource's relation includes the subject
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RelationTuple {
    pub resource: ObjectAndRelation,
    pub subject: ObjectAndRelation,
}

impl RelationTuple {
    pub fn new(resource: ObjectAndRelation, subject: ObjectAndRelation) -> Self {
        Self { resource, subject }
    }
}

impl fmt::Display for RelationTuple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.resource, self.subject)
    }
}

/// A revision/version token for consistent reads
///
/// Counts committed writes. Reads are pinned to exactly one revision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Revision(pub u64);

impl Revision {
    pub fn zero() -> Self {
        Self(0)
    }

    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }

    /// Returns true if this is the reserved "never deleted" marker
    pub fn is_live_sentinel(&self) -> bool {
        *self == LIVE_DELETED_REVISION
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_live_sentinel() {
            f.write_str("LIVE")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// `deleted_at` value of a row that has never been deleted
///
/// Reserved: no commit is ever assigned this revision.
pub const LIVE_DELETED_REVISION: Revision = Revision(LIVE_DELETED_REVISION_RAW);

// ============================================================================
// Error Types
// ============================================================================

/// Failures reported by a storage engine
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("storage engine unavailable: {0}")]
    Unavailable(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("execution failed: {0}")]
    Execution(String),

    #[error("row cursor failed: {0}")]
    Cursor(String),
}

pub type EngineResult<T> = std::result::Result<T, EngineError>;
