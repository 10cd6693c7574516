//! Compiled requests handed to a storage engine
//!
//! A [`CompiledQuery`] is a conjunction of typed [`Predicate`]s over the tuple
//! table plus a fixed projection of the six tuple columns. Engines translate it
//! into whatever their execution layer speaks; [`CompiledQuery::matches`] gives
//! the reference semantics.

use std::fmt;

use tuplestore_types::{EngineError, EngineResult, Revision};

use crate::row::StoredRow;

/// Columns of the tuple table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    ResourceNamespace,
    ResourceObjectId,
    ResourceRelation,
    SubjectNamespace,
    SubjectObjectId,
    SubjectRelation,
    CreatedAtRevision,
    DeletedAtRevision,
}

/// Columns every request projects, in row order
pub const TUPLE_COLUMNS: [Column; 6] = [
    Column::ResourceNamespace,
    Column::ResourceObjectId,
    Column::ResourceRelation,
    Column::SubjectNamespace,
    Column::SubjectObjectId,
    Column::SubjectRelation,
];

impl Column {
    pub fn name(&self) -> &'static str {
        match self {
            Column::ResourceNamespace => "resource_namespace",
            Column::ResourceObjectId => "resource_object_id",
            Column::ResourceRelation => "resource_relation",
            Column::SubjectNamespace => "subject_namespace",
            Column::SubjectObjectId => "subject_object_id",
            Column::SubjectRelation => "subject_relation",
            Column::CreatedAtRevision => "created_at_revision",
            Column::DeletedAtRevision => "deleted_at_revision",
        }
    }

    /// Returns true for the two bookkeeping columns holding revisions
    pub fn is_revision(&self) -> bool {
        matches!(self, Column::CreatedAtRevision | Column::DeletedAtRevision)
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A literal compared against a column
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Text(String),
    Revision(Revision),
}

impl Value {
    pub fn as_cell(&self) -> Cell<'_> {
        match self {
            Value::Text(text) => Cell::Text(text),
            Value::Revision(revision) => Cell::Revision(*revision),
        }
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Value::Text(text.to_string())
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Value::Text(text)
    }
}

impl From<Revision> for Value {
    fn from(revision: Revision) -> Self {
        Value::Revision(revision)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(text) => write!(f, "{:?}", text),
            Value::Revision(revision) => write!(f, "{}", revision),
        }
    }
}

/// A borrowed view of one cell of a stored row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell<'a> {
    Text(&'a str),
    Revision(Revision),
}

/// A single filter over the tuple table
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    Eq(Column, Value),
    LtOrEq(Column, Value),
    Gt(Column, Value),
    Or(Vec<Predicate>),
}

impl Predicate {
    pub fn eq(column: Column, value: impl Into<Value>) -> Self {
        Predicate::Eq(column, value.into())
    }

    pub fn lt_or_eq(column: Column, value: impl Into<Value>) -> Self {
        Predicate::LtOrEq(column, value.into())
    }

    pub fn gt(column: Column, value: impl Into<Value>) -> Self {
        Predicate::Gt(column, value.into())
    }

    /// Check that every comparison pairs a column with a value of its own type
    ///
    /// Ordering comparisons are only defined on revision columns.
    pub fn validate(&self) -> EngineResult<()> {
        match self {
            Predicate::Eq(column, value) => check_kind(*column, value),
            Predicate::LtOrEq(column, value) | Predicate::Gt(column, value) => {
                if !column.is_revision() {
                    return Err(EngineError::InvalidRequest(format!(
                        "ordering comparison on non-revision column {}",
                        column
                    )));
                }
                check_kind(*column, value)
            },
            Predicate::Or(branches) => {
                if branches.is_empty() {
                    return Err(EngineError::InvalidRequest("empty OR predicate".to_string()));
                }
                branches.iter().try_for_each(Predicate::validate)
            },
        }
    }

    /// Evaluate the predicate against a stored row
    pub fn matches(&self, row: &StoredRow) -> bool {
        match self {
            Predicate::Eq(column, value) => row.cell(*column) == value.as_cell(),
            Predicate::LtOrEq(column, value) => match (row.cell(*column), value.as_cell()) {
                (Cell::Revision(stored), Cell::Revision(bound)) => stored <= bound,
                _ => false,
            },
            Predicate::Gt(column, value) => match (row.cell(*column), value.as_cell()) {
                (Cell::Revision(stored), Cell::Revision(bound)) => stored > bound,
                _ => false,
            },
            Predicate::Or(branches) => branches.iter().any(|branch| branch.matches(row)),
        }
    }
}

fn check_kind(column: Column, value: &Value) -> EngineResult<()> {
    match (column.is_revision(), value) {
        (true, Value::Revision(_)) | (false, Value::Text(_)) => Ok(()),
        _ => Err(EngineError::InvalidRequest(format!(
            "value {} does not match the type of column {}",
            value, column
        ))),
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Eq(column, value) => write!(f, "{} = {}", column, value),
            Predicate::LtOrEq(column, value) => write!(f, "{} <= {}", column, value),
            Predicate::Gt(column, value) => write!(f, "{} > {}", column, value),
            Predicate::Or(branches) => {
                f.write_str("(")?;
                for (i, branch) in branches.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" OR ")?;
                    }
                    write!(f, "{}", branch)?;
                }
                f.write_str(")")
            },
        }
    }
}

/// A fully specified request: project [`TUPLE_COLUMNS`] where every predicate holds
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledQuery {
    predicates: Vec<Predicate>,
}

impl CompiledQuery {
    pub fn new(predicates: Vec<Predicate>) -> Self {
        Self { predicates }
    }

    pub fn projection(&self) -> &'static [Column] {
        &TUPLE_COLUMNS
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    pub fn validate(&self) -> EngineResult<()> {
        self.predicates.iter().try_for_each(Predicate::validate)
    }

    /// Returns true if the row satisfies every predicate
    pub fn matches(&self, row: &StoredRow) -> bool {
        self.predicates.iter().all(|predicate| predicate.matches(row))
    }
}

impl fmt::Display for CompiledQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let columns: Vec<&str> = TUPLE_COLUMNS.iter().map(Column::name).collect();
        write!(f, "SELECT {}", columns.join(", "))?;
        for (i, predicate) in self.predicates.iter().enumerate() {
            f.write_str(if i == 0 { " WHERE " } else { " AND " })?;
            write!(f, "{}", predicate)?;
        }
        Ok(())
    }
}
