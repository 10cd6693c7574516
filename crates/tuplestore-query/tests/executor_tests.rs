//! Query Executor Integration Tests
//!
//! Runs tuple queries end to end against the in-memory engine and against an
//! engine that fails on demand.

use tuplestore_config::QueryConfig;
use tuplestore_query::{IteratorError, QueryExecutor, QueryFailure, QueryStage, TupleQuery};
use tuplestore_store::{Column, DecodeError, MemoryEngine, RawRow};
use tuplestore_test_fixtures::{seeded_engine, test_tuple, Fault, FaultyEngine};
use tuplestore_types::{EngineError, RelationTuple, Revision, LIVE_DELETED_REVISION};

async fn collect(executor: &QueryExecutor<MemoryEngine>, query: &TupleQuery) -> Vec<RelationTuple> {
    executor.execute_scoped(query, |iter| iter.by_ref().collect()).await.unwrap()
}

#[tokio::test]
async fn test_point_in_time_scenario() {
    let alice = test_tuple("doc:42#viewer", "user:alice");
    let executor = QueryExecutor::new(seeded_engine(&[(alice.clone(), Revision(5))]).await);
    let query = TupleQuery::for_namespace("doc", Revision(4)).with_object_id("42");

    // Not yet created at revision 4
    assert!(collect(&executor, &query).await.is_empty());

    // Visible from revision 5 on, with every field intact
    let found = collect(&executor, &query.at_revision(Revision(5))).await;
    assert_eq!(found, vec![alice.clone()]);
    assert_eq!(found[0].subject.relation, "");

    // Soft-deleted at revision 9
    assert_eq!(executor.engine().soft_delete(&alice, Revision(9)).await.unwrap(), 1);
    assert!(collect(&executor, &query.at_revision(Revision(9))).await.is_empty());
    assert_eq!(collect(&executor, &query.at_revision(Revision(8))).await, vec![alice]);
}

#[tokio::test]
async fn test_visibility_grid_through_engine() {
    let r = 10u64;
    let engine = MemoryEngine::new();
    let mut expected = Vec::new();

    for created_at in [r - 1, r, r + 1] {
        for deleted_at in [LIVE_DELETED_REVISION, Revision(r), Revision(r + 1)] {
            let tuple = test_tuple(
                &format!("doc:{}-{}#viewer", created_at, deleted_at),
                "user:alice",
            );
            engine.insert(tuple.clone(), Revision(created_at)).await.unwrap();
            if !deleted_at.is_live_sentinel() {
                engine.soft_delete(&tuple, deleted_at).await.unwrap();
            }
            if created_at <= r && (deleted_at.is_live_sentinel() || deleted_at > Revision(r)) {
                expected.push(tuple);
            }
        }
    }

    let executor = QueryExecutor::new(engine);
    let visible = collect(&executor, &TupleQuery::for_namespace("doc", Revision(r))).await;
    assert_eq!(visible, expected);
    assert_eq!(visible.len(), 4);
}

#[tokio::test]
async fn test_filters_narrow_results() {
    let executor = QueryExecutor::new(
        seeded_engine(&[
            (test_tuple("doc:1#viewer", "user:alice"), Revision(1)),
            (test_tuple("doc:1#editor", "user:alice"), Revision(1)),
            (test_tuple("doc:2#viewer", "user:bob"), Revision(1)),
            (test_tuple("doc:2#viewer", "group:eng#member"), Revision(1)),
            (test_tuple("folder:1#viewer", "user:alice"), Revision(1)),
        ])
        .await,
    );
    let base = TupleQuery::for_namespace("doc", Revision(1));

    assert_eq!(collect(&executor, &base).await.len(), 4);
    assert_eq!(collect(&executor, &base.with_object_id("1")).await.len(), 2);
    assert_eq!(collect(&executor, &base.with_relation("viewer")).await.len(), 3);

    let userset = collect(&executor, &base.with_subject("group", "eng", "member")).await;
    assert_eq!(userset, vec![test_tuple("doc:2#viewer", "group:eng#member")]);

    // Subject matching is exact on all three fields
    assert!(collect(&executor, &base.with_subject("group", "eng", "")).await.is_empty());
}

#[tokio::test]
async fn test_refinement_is_idempotent_and_conjunctive() {
    let executor = QueryExecutor::new(
        seeded_engine(&[
            (test_tuple("doc:1#viewer", "user:alice"), Revision(1)),
            (test_tuple("doc:2#viewer", "user:bob"), Revision(1)),
        ])
        .await,
    );
    let base = TupleQuery::for_namespace("doc", Revision(1));

    let once = collect(&executor, &base.with_object_id("1")).await;
    let twice = collect(&executor, &base.with_object_id("1").with_object_id("1")).await;
    assert_eq!(once, twice);
    assert_eq!(once.len(), 1);

    // Constraints AND together, so conflicting values match nothing
    assert!(collect(&executor, &base.with_object_id("1").with_object_id("2")).await.is_empty());
}

#[tokio::test]
async fn test_branched_queries_do_not_interfere() {
    let executor = QueryExecutor::new(
        seeded_engine(&[
            (test_tuple("doc:1#viewer", "user:alice"), Revision(1)),
            (test_tuple("doc:1#editor", "user:bob"), Revision(1)),
        ])
        .await,
    );
    let base = TupleQuery::for_namespace("doc", Revision(1)).with_object_id("1");
    let viewers = base.with_relation("viewer");
    let editors = base.with_relation("editor");

    assert_eq!(collect(&executor, &viewers).await, vec![test_tuple("doc:1#viewer", "user:alice")]);
    assert_eq!(collect(&executor, &editors).await, vec![test_tuple("doc:1#editor", "user:bob")]);
    assert_eq!(collect(&executor, &base).await.len(), 2);
}

#[tokio::test]
async fn test_results_keep_engine_order() {
    let subjects = ["user:zed", "user:alice", "user:mallory", "user:bob"];
    let seed: Vec<_> =
        subjects.iter().map(|s| (test_tuple("doc:1#viewer", s), Revision(1))).collect();
    let executor = QueryExecutor::new(seeded_engine(&seed).await);

    let found = collect(&executor, &TupleQuery::for_namespace("doc", Revision(1))).await;
    let expected: Vec<_> = seed.into_iter().map(|(tuple, _)| tuple).collect();
    assert_eq!(found, expected);
}

#[tokio::test]
async fn test_iterator_lifecycle() {
    let executor = QueryExecutor::new(
        seeded_engine(&[(test_tuple("doc:1#viewer", "user:alice"), Revision(1))]).await,
    );
    let mut iter = executor.execute(&TupleQuery::for_namespace("doc", Revision(1))).await.unwrap();

    assert_eq!(iter.remaining(), 1);
    assert!(iter.next().is_some());
    assert!(iter.next().is_none());
    assert!(iter.next().is_none());
    assert!(iter.last_error().is_none());

    iter.close();
    assert!(iter.next().is_none());
    assert_eq!(iter.last_error(), Some(&IteratorError::Closed));
}

#[tokio::test]
async fn test_transaction_released_before_iterator_is_returned() {
    let executor = QueryExecutor::new(
        seeded_engine(&[(test_tuple("doc:1#viewer", "user:alice"), Revision(1))]).await,
    );
    let mut iter = executor.execute(&TupleQuery::for_namespace("doc", Revision(1))).await.unwrap();
    assert_eq!(executor.engine().open_transactions(), 0);

    // Writers are not blocked by an unconsumed iterator
    executor.engine().insert(test_tuple("doc:2#viewer", "user:bob"), Revision(2)).await.unwrap();
    assert_eq!(iter.remaining(), 1);
    iter.close();
}

#[tokio::test]
async fn test_begin_failure() {
    let engine = FaultyEngine::new(vec![], Fault::Begin(EngineError::Unavailable("down".into())));
    let executor = QueryExecutor::new(engine);

    let err = executor.execute(&TupleQuery::for_namespace("doc", Revision(1))).await.unwrap_err();
    assert_eq!(err.stage(), QueryStage::Begin);
    assert_eq!(
        err.to_string(),
        "unable to query tuples: begin: storage engine unavailable: down"
    );
    assert_eq!(executor.engine().begun(), 0);
}

#[tokio::test]
async fn test_rejected_request_is_a_compile_failure() {
    let engine =
        FaultyEngine::new(vec![], Fault::Run(EngineError::InvalidRequest("bad column".into())));
    let executor = QueryExecutor::new(engine);

    let err = executor.execute(&TupleQuery::for_namespace("doc", Revision(1))).await.unwrap_err();
    assert_eq!(err.stage(), QueryStage::Compile);
    assert_eq!(executor.engine().rolled_back(), 1);
}

#[tokio::test]
async fn test_cursor_failure_discards_partial_results() {
    let rows = vec![
        RawRow::from(&test_tuple("doc:1#viewer", "user:alice")),
        RawRow::from(&test_tuple("doc:2#viewer", "user:bob")),
    ];
    let engine =
        FaultyEngine::new(rows, Fault::CursorAfter(1, EngineError::Cursor("reset".into())));
    let executor = QueryExecutor::new(engine);

    let err = executor.execute(&TupleQuery::for_namespace("doc", Revision(1))).await.unwrap_err();
    assert_eq!(err.stage(), QueryStage::Execute);
    assert_eq!(err.failure(), &QueryFailure::Engine(EngineError::Cursor("reset".into())));
    assert_eq!(executor.engine().rolled_back(), 1);
}

#[tokio::test]
async fn test_malformed_row_fails_whole_query() {
    let mut broken: Vec<Option<String>> =
        RawRow::from(&test_tuple("doc:2#viewer", "user:bob")).values().to_vec();
    broken[2] = None;
    let rows = vec![RawRow::from(&test_tuple("doc:1#viewer", "user:alice")), RawRow::new(broken)];
    let executor = QueryExecutor::new(FaultyEngine::new(rows, Fault::None));

    let err = executor.execute(&TupleQuery::for_namespace("doc", Revision(1))).await.unwrap_err();
    assert_eq!(err.stage(), QueryStage::Decode);
    assert_eq!(err.failure(), &QueryFailure::Decode(DecodeError::NullColumn(Column::ResourceRelation)));
    assert_eq!(executor.engine().rolled_back(), 1);
}

#[tokio::test]
async fn test_rollback_failure_does_not_mask_results() {
    let rows = vec![RawRow::from(&test_tuple("doc:1#viewer", "user:alice"))];
    let engine = FaultyEngine::new(rows, Fault::Rollback(EngineError::Execution("gone".into())));
    let executor = QueryExecutor::new(engine);

    let found = executor
        .execute_scoped(&TupleQuery::for_namespace("doc", Revision(1)), |iter| iter.count())
        .await
        .unwrap();
    assert_eq!(found, 1);
    assert_eq!(executor.engine().begun(), 1);
    assert_eq!(executor.engine().rolled_back(), 1);
}

#[tokio::test]
async fn test_metrics_track_executions() {
    let executor = QueryExecutor::new(
        seeded_engine(&[
            (test_tuple("doc:1#viewer", "user:alice"), Revision(1)),
            (test_tuple("doc:2#viewer", "user:bob"), Revision(1)),
        ])
        .await,
    );
    let query = TupleQuery::for_namespace("doc", Revision(1));
    collect(&executor, &query).await;
    collect(&executor, &query.with_object_id("2")).await;

    let snapshot = executor.metrics();
    assert_eq!(snapshot.query_count, 2);
    assert_eq!(snapshot.rows_returned, 3);
    assert_eq!(snapshot.query_errors, 0);
}

#[tokio::test]
async fn test_zero_threshold_never_flags_slow_queries() {
    let engine = seeded_engine(&[(test_tuple("doc:1#viewer", "user:alice"), Revision(1))]).await;
    let executor = QueryExecutor::with_config(engine, QueryConfig { slow_query_threshold_ms: 0 });
    collect(&executor, &TupleQuery::for_namespace("doc", Revision(1))).await;

    let snapshot = executor.metrics();
    assert_eq!(snapshot.query_count, 1);
    assert_eq!(snapshot.slow_queries, 0);
}

#[tokio::test]
#[should_panic(expected = "tuple iterator double closed")]
async fn test_double_close_panics() {
    let executor = QueryExecutor::new(MemoryEngine::new());
    let mut iter = executor.execute(&TupleQuery::for_namespace("doc", Revision(1))).await.unwrap();
    iter.close();
    iter.close();
}

#[tokio::test]
#[should_panic(expected = "tuple iterator dropped before close() was called")]
async fn test_abandoned_iterator_panics() {
    let executor = QueryExecutor::new(MemoryEngine::new());
    let iter = executor.execute(&TupleQuery::for_namespace("doc", Revision(1))).await.unwrap();
    drop(iter);
}
