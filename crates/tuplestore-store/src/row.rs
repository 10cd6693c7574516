//! Row types on both sides of the engine boundary

use thiserror::Error;
use tuplestore_types::{ObjectAndRelation, RelationTuple, Revision, LIVE_DELETED_REVISION};

use crate::request::{Cell, Column, TUPLE_COLUMNS};

/// Failure to turn a [`RawRow`] into a [`RelationTuple`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("expected {expected} columns, found {found}")]
    ColumnCount { expected: usize, found: usize },

    #[error("column {0} is NULL")]
    NullColumn(Column),
}

/// A row as returned by a cursor: the projected tuple columns in
/// [`TUPLE_COLUMNS`] order, each possibly NULL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    values: Vec<Option<String>>,
}

impl RawRow {
    pub fn new(values: Vec<Option<String>>) -> Self {
        Self { values }
    }

    pub fn values(&self) -> &[Option<String>] {
        &self.values
    }

    /// Decode the row, failing on a wrong column count or any NULL column
    pub fn into_tuple(self) -> Result<RelationTuple, DecodeError> {
        let found = self.values.len();
        let cells: [Option<String>; 6] = self
            .values
            .try_into()
            .map_err(|_| DecodeError::ColumnCount { expected: TUPLE_COLUMNS.len(), found })?;
        let [ns, object_id, relation, subject_ns, subject_id, subject_relation] = cells;

        Ok(RelationTuple {
            resource: ObjectAndRelation {
                namespace: required(ns, Column::ResourceNamespace)?,
                object_id: required(object_id, Column::ResourceObjectId)?,
                relation: required(relation, Column::ResourceRelation)?,
            },
            subject: ObjectAndRelation {
                namespace: required(subject_ns, Column::SubjectNamespace)?,
                object_id: required(subject_id, Column::SubjectObjectId)?,
                relation: required(subject_relation, Column::SubjectRelation)?,
            },
        })
    }
}

fn required(value: Option<String>, column: Column) -> Result<String, DecodeError> {
    value.ok_or(DecodeError::NullColumn(column))
}

impl From<&RelationTuple> for RawRow {
    fn from(tuple: &RelationTuple) -> Self {
        Self::new(vec![
            Some(tuple.resource.namespace.clone()),
            Some(tuple.resource.object_id.clone()),
            Some(tuple.resource.relation.clone()),
            Some(tuple.subject.namespace.clone()),
            Some(tuple.subject.object_id.clone()),
            Some(tuple.subject.relation.clone()),
        ])
    }
}

/// A persisted tuple with its bookkeeping revisions
///
/// Rows are append-only; deleting one only sets `deleted_at`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredRow {
    pub tuple: RelationTuple,
    pub created_at: Revision,
    /// [`LIVE_DELETED_REVISION`] while the row is live
    pub deleted_at: Revision,
}

impl StoredRow {
    pub fn live(tuple: RelationTuple, created_at: Revision) -> Self {
        Self { tuple, created_at, deleted_at: LIVE_DELETED_REVISION }
    }

    pub fn is_live(&self) -> bool {
        self.deleted_at.is_live_sentinel()
    }

    pub fn cell(&self, column: Column) -> Cell<'_> {
        match column {
            Column::ResourceNamespace => Cell::Text(&self.tuple.resource.namespace),
            Column::ResourceObjectId => Cell::Text(&self.tuple.resource.object_id),
            Column::ResourceRelation => Cell::Text(&self.tuple.resource.relation),
            Column::SubjectNamespace => Cell::Text(&self.tuple.subject.namespace),
            Column::SubjectObjectId => Cell::Text(&self.tuple.subject.object_id),
            Column::SubjectRelation => Cell::Text(&self.tuple.subject.relation),
            Column::CreatedAtRevision => Cell::Revision(self.created_at),
            Column::DeletedAtRevision => Cell::Revision(self.deleted_at),
        }
    }

    /// Project the tuple columns, dropping the revisions
    pub fn project(&self) -> RawRow {
        RawRow::from(&self.tuple)
    }
}
