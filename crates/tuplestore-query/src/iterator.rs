//! Caller-owned result iterator with an explicit close contract
//!
//! A [`TupleIterator`] is handed out open and must be closed exactly once.
//! Closing twice or dropping it while still open are caller bugs and panic;
//! calling `next()` after close is recorded on the error slot.

use std::collections::VecDeque;

use tuplestore_types::RelationTuple;

use crate::error::IteratorError;

/// Materialized query results, delivered in engine order
#[derive(Debug)]
pub struct TupleIterator {
    tuples: VecDeque<RelationTuple>,
    closed: bool,
    err: Option<IteratorError>,
    /// Description of the query that produced this iterator, for leak reports
    origin: String,
}

impl TupleIterator {
    pub(crate) fn new(tuples: Vec<RelationTuple>, origin: String) -> Self {
        Self { tuples: tuples.into(), closed: false, err: None, origin }
    }

    /// The last recorded misuse, if any
    pub fn last_error(&self) -> Option<&IteratorError> {
        self.err.as_ref()
    }

    /// Number of tuples not yet returned by `next()`
    pub fn remaining(&self) -> usize {
        self.tuples.len()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Release the buffered tuples
    ///
    /// # Panics
    ///
    /// Panics if the iterator was already closed.
    #[allow(clippy::panic)]
    pub fn close(&mut self) {
        if self.closed {
            panic!("tuple iterator double closed");
        }

        self.tuples = VecDeque::new();
        self.closed = true;
    }
}

impl Iterator for TupleIterator {
    type Item = RelationTuple;

    /// Exhaustion and closure both yield `None`; only [`TupleIterator::last_error`]
    /// tells them apart.
    fn next(&mut self) -> Option<RelationTuple> {
        if self.closed {
            self.err = Some(IteratorError::Closed);
            return None;
        }
        self.tuples.pop_front()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.tuples.len(), Some(self.tuples.len()))
    }
}

impl Drop for TupleIterator {
    #[allow(clippy::panic)]
    fn drop(&mut self) {
        if self.closed {
            return;
        }

        tracing::error!(query = %self.origin, "Tuple iterator dropped before close() was called");

        // A second panic while unwinding would abort without a message
        if !std::thread::panicking() {
            panic!("tuple iterator dropped before close() was called\n query: {}", self.origin);
        }
    }
}
