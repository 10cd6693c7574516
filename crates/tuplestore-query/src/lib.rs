//! # Tuplestore Query - Point-in-Time Tuple Reads
//!
//! Builds immutable [`TupleQuery`] specifications, executes them against a
//! [`ReadEngine`](tuplestore_store::ReadEngine) inside a read transaction, and
//! delivers the results through a [`TupleIterator`] that must be closed.
//!
//! ```no_run
//! # async fn example() -> Result<(), tuplestore_query::QueryError> {
//! use tuplestore_query::{QueryExecutor, TupleQuery};
//! use tuplestore_store::MemoryEngine;
//! use tuplestore_types::Revision;
//!
//! let executor = QueryExecutor::new(MemoryEngine::new());
//! let query = TupleQuery::for_namespace("doc", Revision(5)).with_object_id("42");
//!
//! let mut tuples = executor.execute(&query).await?;
//! for tuple in tuples.by_ref() {
//!     println!("{}", tuple);
//! }
//! tuples.close();
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]

pub mod error;
pub mod executor;
pub mod iterator;
pub mod metrics;
pub mod query;
pub mod visibility;

pub use error::{IteratorError, QueryError, QueryFailure, QueryResult, QueryStage};
pub use executor::QueryExecutor;
pub use iterator::TupleIterator;
pub use metrics::{MetricsSnapshot, OpTimer, QueryMetrics};
pub use query::TupleQuery;
