//! Immutable tuple query specifications
//!
//! A [`TupleQuery`] accumulates filters without touching storage. Every
//! refinement returns a new value, so one base query can be branched into many
//! divergent queries:
//!
//! ```
//! use tuplestore_query::TupleQuery;
//! use tuplestore_types::Revision;
//!
//! let doc = TupleQuery::for_namespace("doc", Revision(5)).with_object_id("42");
//! let viewers = doc.with_relation("viewer");
//! let editors = doc.with_relation("editor");
//! assert_ne!(viewers, editors);
//! ```

use tuplestore_store::{Column, CompiledQuery, Predicate};
use tuplestore_types::{ObjectAndRelation, Revision};

use crate::visibility;

/// A single narrowing filter
#[derive(Debug, Clone, PartialEq, Eq)]
enum Constraint {
    ObjectId(String),
    Relation(String),
    Subject(ObjectAndRelation),
}

impl Constraint {
    fn push_predicates(&self, predicates: &mut Vec<Predicate>) {
        match self {
            Constraint::ObjectId(object_id) => {
                predicates.push(Predicate::eq(Column::ResourceObjectId, object_id.as_str()))
            },
            Constraint::Relation(relation) => {
                predicates.push(Predicate::eq(Column::ResourceRelation, relation.as_str()))
            },
            Constraint::Subject(subject) => predicates.extend([
                Predicate::eq(Column::SubjectNamespace, subject.namespace.as_str()),
                Predicate::eq(Column::SubjectObjectId, subject.object_id.as_str()),
                Predicate::eq(Column::SubjectRelation, subject.relation.as_str()),
            ]),
        }
    }
}

/// Which tuples of one namespace are visible as of one revision
///
/// Constraints combine with AND. Repeating a refinement with the same value
/// changes nothing; repeating it with a different value matches nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TupleQuery {
    namespace: String,
    as_of: Revision,
    constraints: Vec<Constraint>,
}

impl TupleQuery {
    /// Entry point: all tuples of `namespace` visible at `as_of`
    pub fn for_namespace(namespace: impl Into<String>, as_of: Revision) -> Self {
        Self { namespace: namespace.into(), as_of, constraints: Vec::new() }
    }

    /// Narrow to one resource object
    #[must_use]
    pub fn with_object_id(&self, object_id: impl Into<String>) -> Self {
        self.with(Constraint::ObjectId(object_id.into()))
    }

    /// Narrow to one relation on the resource
    #[must_use]
    pub fn with_relation(&self, relation: impl Into<String>) -> Self {
        self.with(Constraint::Relation(relation.into()))
    }

    /// Narrow to tuples whose subject matches all three fields exactly
    ///
    /// An empty `relation` matches subjects that are plain objects.
    #[must_use]
    pub fn with_subject(
        &self,
        namespace: impl Into<String>,
        object_id: impl Into<String>,
        relation: impl Into<String>,
    ) -> Self {
        self.with(Constraint::Subject(ObjectAndRelation::new(namespace, object_id, relation)))
    }

    /// The same filters pinned to another revision
    #[must_use]
    pub fn at_revision(&self, as_of: Revision) -> Self {
        Self { as_of, ..self.clone() }
    }

    fn with(&self, constraint: Constraint) -> Self {
        let mut constraints = self.constraints.clone();
        constraints.push(constraint);
        Self { namespace: self.namespace.clone(), as_of: self.as_of, constraints }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn as_of(&self) -> Revision {
        self.as_of
    }

    /// Compile the filters plus the visibility rule into one request
    pub fn compile(&self) -> CompiledQuery {
        let mut predicates = vec![Predicate::eq(Column::ResourceNamespace, self.namespace.as_str())];
        predicates.extend(visibility::predicates(self.as_of));
        for constraint in &self.constraints {
            constraint.push_predicates(&mut predicates);
        }
        CompiledQuery::new(predicates)
    }
}
