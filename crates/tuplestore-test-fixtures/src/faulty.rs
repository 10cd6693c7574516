//! A storage engine that fails at a chosen point
//!
//! Wraps a fixed list of rows and injects one [`Fault`]. Counts begun and
//! rolled-back transactions so tests can check the executor always rolls back.

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use async_trait::async_trait;
use tuplestore_store::{CompiledQuery, RawRow, ReadEngine, ReadTransaction, RowCursor};
use tuplestore_types::{EngineError, EngineResult};

/// Where the engine fails
#[derive(Debug, Clone)]
pub enum Fault {
    None,
    Begin(EngineError),
    Run(EngineError),
    /// The cursor errors after yielding this many rows
    CursorAfter(usize, EngineError),
    Rollback(EngineError),
}

#[derive(Clone)]
pub struct FaultyEngine {
    rows: Arc<Vec<RawRow>>,
    fault: Fault,
    begun: Arc<AtomicUsize>,
    rolled_back: Arc<AtomicUsize>,
}

impl FaultyEngine {
    pub fn new(rows: Vec<RawRow>, fault: Fault) -> Self {
        Self {
            rows: Arc::new(rows),
            fault,
            begun: Arc::new(AtomicUsize::new(0)),
            rolled_back: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn begun(&self) -> usize {
        self.begun.load(Ordering::SeqCst)
    }

    pub fn rolled_back(&self) -> usize {
        self.rolled_back.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ReadEngine for FaultyEngine {
    async fn begin_read(&self) -> EngineResult<Box<dyn ReadTransaction>> {
        if let Fault::Begin(err) = &self.fault {
            return Err(err.clone());
        }
        self.begun.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(FaultyTransaction { engine: self.clone() }))
    }
}

struct FaultyTransaction {
    engine: FaultyEngine,
}

#[async_trait]
impl ReadTransaction for FaultyTransaction {
    async fn run(&mut self, _request: &CompiledQuery) -> EngineResult<Box<dyn RowCursor>> {
        if let Fault::Run(err) = &self.engine.fault {
            return Err(err.clone());
        }
        let fail_after = match &self.engine.fault {
            Fault::CursorAfter(n, err) => Some((*n, err.clone())),
            _ => None,
        };
        Ok(Box::new(FaultyCursor {
            rows: self.engine.rows.as_ref().clone().into_iter(),
            yielded: 0,
            fail_after,
        }))
    }

    async fn rollback(self: Box<Self>) -> EngineResult<()> {
        self.engine.rolled_back.fetch_add(1, Ordering::SeqCst);
        match &self.engine.fault {
            Fault::Rollback(err) => Err(err.clone()),
            _ => Ok(()),
        }
    }
}

struct FaultyCursor {
    rows: std::vec::IntoIter<RawRow>,
    yielded: usize,
    fail_after: Option<(usize, EngineError)>,
}

#[async_trait]
impl RowCursor for FaultyCursor {
    async fn next_row(&mut self) -> EngineResult<Option<RawRow>> {
        if let Some((limit, err)) = &self.fail_after {
            if self.yielded >= *limit {
                return Err(err.clone());
            }
        }
        self.yielded += 1;
        Ok(self.rows.next())
    }
}
