//! Point-in-time visibility over soft-deleted rows
//!
//! A row is visible at revision `R` iff it was created at or before `R` and is
//! either still live or was deleted after `R`. Every compiled query carries
//! these predicates; there is no way to build a query without them.

use tuplestore_store::{Column, Predicate};
use tuplestore_types::{Revision, LIVE_DELETED_REVISION};

/// The visibility rule for `as_of`, as predicates to conjoin with a query
pub fn predicates(as_of: Revision) -> [Predicate; 2] {
    [
        Predicate::lt_or_eq(Column::CreatedAtRevision, as_of),
        Predicate::Or(vec![
            Predicate::eq(Column::DeletedAtRevision, LIVE_DELETED_REVISION),
            Predicate::gt(Column::DeletedAtRevision, as_of),
        ]),
    ]
}

/// Evaluate the visibility rule directly
pub fn is_visible(created_at: Revision, deleted_at: Revision, as_of: Revision) -> bool {
    created_at <= as_of && (deleted_at == LIVE_DELETED_REVISION || deleted_at > as_of)
}
