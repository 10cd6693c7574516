//! Runs tuple queries against a storage engine
//!
//! Each execution opens a read transaction, drains every matching row, rolls
//! the transaction back and hands the caller a fully materialized
//! [`TupleIterator`]. A row that fails to decode fails the whole execution.

use std::sync::Arc;

use tracing::Instrument;
use tuplestore_config::QueryConfig;
use tuplestore_observe::query_span;
use tuplestore_store::{CompiledQuery, ReadEngine, ReadTransaction};
use tuplestore_types::RelationTuple;

use crate::{
    error::{QueryError, QueryResult, QueryStage},
    iterator::TupleIterator,
    metrics::{MetricsSnapshot, OpTimer, QueryMetrics},
    query::TupleQuery,
};

/// Executes [`TupleQuery`]s against one engine
///
/// Holds no per-query state; concurrent executions share only the metrics
/// counters.
pub struct QueryExecutor<E: ReadEngine> {
    engine: E,
    config: QueryConfig,
    metrics: Arc<QueryMetrics>,
}

impl<E: ReadEngine> QueryExecutor<E> {
    pub fn new(engine: E) -> Self {
        Self::with_config(engine, QueryConfig::default())
    }

    pub fn with_config(engine: E, config: QueryConfig) -> Self {
        Self { engine, config, metrics: Arc::new(QueryMetrics::new()) }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Run the query and return an open iterator over every visible match
    ///
    /// # Errors
    ///
    /// Returns a [`QueryError`] tagged with the failing [`QueryStage`] if the
    /// transaction cannot be opened, the engine rejects or fails the request,
    /// or any row fails to decode. Nothing is retried.
    pub async fn execute(&self, query: &TupleQuery) -> QueryResult<TupleIterator> {
        let request = query.compile();
        let span = query_span(query.namespace(), query.as_of().0);
        let timer = OpTimer::new();

        let result = self.fetch(&request).instrument(span.clone()).await;

        let elapsed = timer.elapsed();
        let elapsed_ms = elapsed.as_millis() as u64;
        self.metrics.record_query(elapsed, result.as_ref().ok().map(Vec::len));
        span.record("duration_ms", elapsed_ms);

        let tuples = match result {
            Ok(tuples) => tuples,
            Err(err) => {
                tracing::warn!(parent: &span, error = %err, stage = %err.stage(), "Tuple query failed");
                return Err(err);
            },
        };

        span.record("rows", tuples.len() as u64);
        if self.config.slow_query_threshold().is_some_and(|threshold| elapsed > threshold) {
            self.metrics.record_slow_query();
            tracing::warn!(
                parent: &span,
                query = %request,
                duration_ms = elapsed_ms,
                "Slow tuple query"
            );
        }
        tracing::debug!(parent: &span, rows = tuples.len(), "Tuple query executed");

        Ok(TupleIterator::new(tuples, request.to_string()))
    }

    /// Run the query, hand the open iterator to `f`, then close it
    ///
    /// The iterator is closed on return; `f` must not close it itself.
    pub async fn execute_scoped<T, F>(&self, query: &TupleQuery, f: F) -> QueryResult<T>
    where
        F: FnOnce(&mut TupleIterator) -> T,
    {
        let mut iter = self.execute(query).await?;
        let output = f(&mut iter);
        iter.close();
        Ok(output)
    }

    async fn fetch(&self, request: &CompiledQuery) -> QueryResult<Vec<RelationTuple>> {
        let mut transaction =
            self.engine.begin_read().await.map_err(|e| QueryError::new(QueryStage::Begin, e))?;

        let outcome = drain(transaction.as_mut(), request).await;

        // The transaction only fences the read; nothing is ever committed
        if let Err(err) = transaction.rollback().await {
            tracing::warn!(error = %err, "Failed to roll back read transaction");
        }

        outcome
    }
}

async fn drain(
    transaction: &mut dyn ReadTransaction,
    request: &CompiledQuery,
) -> QueryResult<Vec<RelationTuple>> {
    let mut cursor = transaction.run(request).await.map_err(QueryError::from_run)?;

    let mut tuples = Vec::new();
    while let Some(row) =
        cursor.next_row().await.map_err(|e| QueryError::new(QueryStage::Execute, e))?
    {
        tuples.push(row.into_tuple().map_err(|e| QueryError::new(QueryStage::Decode, e))?);
    }

    Ok(tuples)
}
