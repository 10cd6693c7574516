//! Error types for query execution and iteration

use std::fmt;

use thiserror::Error;
use tuplestore_store::DecodeError;
use tuplestore_types::EngineError;

pub type QueryResult<T> = std::result::Result<T, QueryError>;

/// Step of [`QueryExecutor::execute`](crate::QueryExecutor::execute) that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryStage {
    Begin,
    Compile,
    Execute,
    Decode,
}

impl fmt::Display for QueryStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            QueryStage::Begin => "begin",
            QueryStage::Compile => "compile",
            QueryStage::Execute => "execute",
            QueryStage::Decode => "decode",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryFailure {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// Any failure while running a query; no partial result accompanies it
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unable to query tuples: {stage}: {source}")]
pub struct QueryError {
    stage: QueryStage,
    #[source]
    source: QueryFailure,
}

impl QueryError {
    pub fn new(stage: QueryStage, source: impl Into<QueryFailure>) -> Self {
        Self { stage, source: source.into() }
    }

    /// Classify an engine failure raised while running the request
    pub(crate) fn from_run(err: EngineError) -> Self {
        let stage = match err {
            EngineError::InvalidRequest(_) => QueryStage::Compile,
            _ => QueryStage::Execute,
        };
        Self::new(stage, err)
    }

    pub fn stage(&self) -> QueryStage {
        self.stage
    }

    pub fn failure(&self) -> &QueryFailure {
        &self.source
    }
}

/// Non-fatal misuse of a [`TupleIterator`](crate::TupleIterator), recorded on its error slot
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IteratorError {
    #[error("unable to iterate: iterator closed")]
    Closed,
}
