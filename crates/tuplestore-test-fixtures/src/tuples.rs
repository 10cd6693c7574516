//! Helpers for creating test tuples with sensible defaults

use tuplestore_store::MemoryEngine;
use tuplestore_types::{ObjectAndRelation, RelationTuple, Revision};

/// Create a tuple from `ns:id#rel` and `ns:id[#rel]` strings
///
/// A subject without `#rel` gets an empty relation.
///
/// # Example
/// ```
/// use tuplestore_test_fixtures::test_tuple;
///
/// let tuple = test_tuple("doc:42#viewer", "user:alice");
/// assert_eq!(tuple.resource.object_id, "42");
/// assert_eq!(tuple.subject.relation, "");
/// ```
pub fn test_tuple(resource: &str, subject: &str) -> RelationTuple {
    RelationTuple::new(parse_object(resource), parse_object(subject))
}

/// Parse `ns:id` or `ns:id#rel`
fn parse_object(text: &str) -> ObjectAndRelation {
    let (object, relation) = text.split_once('#').unwrap_or((text, ""));
    let (namespace, object_id) =
        object.split_once(':').unwrap_or_else(|| panic!("expected ns:id, got {:?}", text));
    ObjectAndRelation::new(namespace, object_id, relation)
}

/// Build a memory engine holding `tuples`, each live since its revision
pub async fn seeded_engine(tuples: &[(RelationTuple, Revision)]) -> MemoryEngine {
    let engine = MemoryEngine::new();
    for (tuple, created_at) in tuples {
        engine.insert(tuple.clone(), *created_at).await.unwrap();
    }
    engine
}
