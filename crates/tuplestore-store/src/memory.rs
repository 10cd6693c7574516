//! In-memory storage engine for testing and development

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use async_trait::async_trait;
use tokio::sync::{OwnedRwLockReadGuard, RwLock};
use tuplestore_types::{EngineError, EngineResult, RelationTuple, Revision};

use crate::{CompiledQuery, RawRow, ReadEngine, ReadTransaction, RowCursor, StoredRow};

/// Append-only tuple table kept in memory
///
/// Rows keep their insertion order, which is the order reads return them in.
/// A read transaction holds a shared lock on the table until it is rolled
/// back, so writers wait for in-flight reads.
#[derive(Clone, Default)]
pub struct MemoryEngine {
    rows: Arc<RwLock<Vec<StoredRow>>>,
    open_transactions: Arc<AtomicUsize>,
}

impl MemoryEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a live row created at `created_at`
    pub async fn insert(&self, tuple: RelationTuple, created_at: Revision) -> EngineResult<()> {
        if created_at.is_live_sentinel() {
            return Err(EngineError::InvalidRequest(
                "created_at cannot be the live sentinel".to_string(),
            ));
        }
        tracing::trace!(tuple = %tuple, created_at = %created_at, "Inserting row");
        self.rows.write().await.push(StoredRow::live(tuple, created_at));
        Ok(())
    }

    /// Mark every live copy of `tuple` created at or before `at` as deleted at `at`
    ///
    /// Returns the number of rows soft-deleted.
    pub async fn soft_delete(&self, tuple: &RelationTuple, at: Revision) -> EngineResult<usize> {
        if at.is_live_sentinel() {
            return Err(EngineError::InvalidRequest(
                "deleted_at cannot be the live sentinel".to_string(),
            ));
        }
        let mut rows = self.rows.write().await;
        let mut deleted = 0;
        for row in rows.iter_mut() {
            if row.tuple == *tuple && row.is_live() && row.created_at <= at {
                row.deleted_at = at;
                deleted += 1;
            }
        }
        tracing::trace!(tuple = %tuple, at = %at, deleted, "Soft-deleted rows");
        Ok(deleted)
    }

    /// Snapshot of every stored row, deleted ones included
    pub async fn rows(&self) -> Vec<StoredRow> {
        self.rows.read().await.clone()
    }

    /// Number of read transactions begun but not yet rolled back
    pub fn open_transactions(&self) -> usize {
        self.open_transactions.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ReadEngine for MemoryEngine {
    async fn begin_read(&self) -> EngineResult<Box<dyn ReadTransaction>> {
        let rows = Arc::clone(&self.rows).read_owned().await;
        self.open_transactions.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MemoryTransaction { rows, open: Arc::clone(&self.open_transactions) }))
    }
}

struct MemoryTransaction {
    rows: OwnedRwLockReadGuard<Vec<StoredRow>>,
    open: Arc<AtomicUsize>,
}

#[async_trait]
impl ReadTransaction for MemoryTransaction {
    async fn run(&mut self, request: &CompiledQuery) -> EngineResult<Box<dyn RowCursor>> {
        request.validate()?;
        let rows: Vec<RawRow> =
            self.rows.iter().filter(|row| request.matches(row)).map(StoredRow::project).collect();
        Ok(Box::new(MemoryCursor { rows: rows.into_iter() }))
    }

    async fn rollback(self: Box<Self>) -> EngineResult<()> {
        self.open.fetch_sub(1, Ordering::SeqCst);
        Ok(())
    }
}

struct MemoryCursor {
    rows: std::vec::IntoIter<RawRow>,
}

#[async_trait]
impl RowCursor for MemoryCursor {
    async fn next_row(&mut self) -> EngineResult<Option<RawRow>> {
        Ok(self.rows.next())
    }
}
