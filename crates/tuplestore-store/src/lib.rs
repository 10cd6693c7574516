//! # Tuplestore Store - Storage Engine Seam
//!
//! Defines the narrow contract between the query layer and a relational
//! execution engine: open a read transaction, run a compiled request inside it,
//! pull raw rows from a cursor, roll back.
//!
//! The query layer never sees how an engine stores rows. It hands over a
//! [`CompiledQuery`] and gets back [`RawRow`]s carrying the six projected tuple
//! columns.

#![deny(unsafe_code)]

use async_trait::async_trait;
use tuplestore_types::EngineResult;

pub mod memory;
pub mod request;
pub mod row;

pub use memory::MemoryEngine;
pub use request::{Cell, Column, CompiledQuery, Predicate, Value, TUPLE_COLUMNS};
pub use row::{DecodeError, RawRow, StoredRow};

/// A relational execution engine that can serve point-in-time reads
#[async_trait]
pub trait ReadEngine: Send + Sync {
    /// Open a read-only transaction
    ///
    /// The transaction only fences the read; callers always roll it back.
    async fn begin_read(&self) -> EngineResult<Box<dyn ReadTransaction>>;
}

/// A read transaction opened by [`ReadEngine::begin_read`]
#[async_trait]
pub trait ReadTransaction: Send {
    /// Run a compiled request and return a cursor over the matching rows
    ///
    /// Engines that cannot translate the request report
    /// [`EngineError::InvalidRequest`](tuplestore_types::EngineError::InvalidRequest).
    async fn run(&mut self, request: &CompiledQuery) -> EngineResult<Box<dyn RowCursor>>;

    /// Release the transaction without committing anything
    async fn rollback(self: Box<Self>) -> EngineResult<()>;
}

/// Rows produced by [`ReadTransaction::run`], in engine order
#[async_trait]
pub trait RowCursor: Send {
    /// Fetch the next row, or `None` once the result set is exhausted
    async fn next_row(&mut self) -> EngineResult<Option<RawRow>>;
}
