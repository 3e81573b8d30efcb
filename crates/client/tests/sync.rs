mod common;

use std::time::Duration;

use api_types::{
    Money,
    transaction::{TransactionType, TransactionUpdate},
};
use cashbook_client::{
    ClientError,
    cache::QueryStatus,
    sync::{MutationKind, MutationState, TransactionsSync},
};
use common::{FakeService, new_transaction};

fn sync() -> (FakeService, TransactionsSync<FakeService>) {
    let service = FakeService::default();
    (service.clone(), TransactionsSync::new(service))
}

#[tokio::test(start_paused = true)]
async fn fresh_data_is_served_without_refetch() {
    let (service, sync) = sync();

    sync.transactions(None).await.unwrap();
    tokio::time::advance(Duration::from_secs(4 * 60)).await;
    sync.transactions(None).await.unwrap();
    assert_eq!(service.list_calls(), 1);

    tokio::time::advance(Duration::from_secs(60)).await;
    sync.transactions(None).await.unwrap();
    assert_eq!(service.list_calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn filters_are_cached_separately() {
    let (service, sync) = sync();

    sync.transactions(None).await.unwrap();
    sync.transactions(Some(TransactionType::Income)).await.unwrap();
    sync.transactions(Some(TransactionType::Income)).await.unwrap();

    assert_eq!(service.list_calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn failed_read_is_retried_once() {
    let (service, sync) = sync();
    service.fail_next(1);

    let started = tokio::time::Instant::now();
    let txs = sync.transactions(None).await.unwrap();

    assert!(txs.is_empty());
    assert_eq!(service.list_calls(), 2);
    assert!(started.elapsed() >= Duration::from_secs(1));
    assert_eq!(sync.snapshot(None).status, QueryStatus::Success);
}

#[tokio::test(start_paused = true)]
async fn second_read_failure_is_surfaced_and_keeps_old_data() {
    let (service, sync) = sync();
    sync.create(new_transaction(TransactionType::Income, "Salary", 5000))
        .await
        .unwrap();
    let cached = sync.transactions(None).await.unwrap();
    assert_eq!(cached.len(), 1);

    service.fail_next(2);
    let calls = service.list_calls();
    let err = sync.refetch(None).await.unwrap_err();

    assert!(matches!(err, ClientError::FetchFailed { status: 503, .. }));
    assert_eq!(service.list_calls(), calls + 2);

    let snapshot = sync.snapshot(None);
    assert!(matches!(snapshot.status, QueryStatus::Error(_)));
    assert_eq!(snapshot.data, Some(cached));

    // Manual refetch is the retry affordance.
    sync.refetch(None).await.unwrap();
    assert_eq!(sync.snapshot(None).status, QueryStatus::Success);
}

#[tokio::test(start_paused = true)]
async fn writes_are_never_retried() {
    let (service, sync) = sync();
    service.fail_next(1);

    let err = sync
        .create(new_transaction(TransactionType::Outcome, "Rent", 1500))
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::FetchFailed { .. }));
    assert_eq!(service.create_calls(), 1);
    assert_eq!(
        sync.mutation_state(MutationKind::Create),
        MutationState::Error(err.to_string())
    );
}

#[tokio::test(start_paused = true)]
async fn write_refetches_watched_queries_and_marks_the_rest_stale() {
    let (service, sync) = sync();
    sync.watch(Some(TransactionType::Income));
    sync.transactions(Some(TransactionType::Income)).await.unwrap();
    sync.transactions(Some(TransactionType::Outcome)).await.unwrap();
    assert_eq!(service.list_calls(), 2);

    let created = sync
        .create(new_transaction(TransactionType::Income, "Salary", 5000))
        .await
        .unwrap();
    assert_eq!(
        sync.mutation_state(MutationKind::Create),
        MutationState::Success
    );

    // Only the watched query was refetched by the write itself.
    assert_eq!(service.list_calls(), 3);
    let income = sync.snapshot(Some(TransactionType::Income));
    assert_eq!(income.data, Some(vec![created]));
    assert!(!income.is_stale);
    assert!(sync.snapshot(Some(TransactionType::Outcome)).is_stale);

    // The unwatched one refetches on its next read.
    sync.transactions(Some(TransactionType::Outcome)).await.unwrap();
    assert_eq!(service.list_calls(), 4);
    sync.transactions(Some(TransactionType::Income)).await.unwrap();
    assert_eq!(service.list_calls(), 4);
}

#[tokio::test(start_paused = true)]
async fn reads_reflect_completed_writes() {
    let (service, sync) = sync();
    sync.transactions(None).await.unwrap();

    let created = sync
        .create(new_transaction(TransactionType::Outcome, "Groceries", 400))
        .await
        .unwrap();
    assert_eq!(sync.transactions(None).await.unwrap(), vec![created.clone()]);

    let updated = sync
        .update(
            &created.id,
            TransactionUpdate {
                amount: Some(Money::new(45_000)),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(service.update_calls(), 1);
    assert_eq!(sync.transactions(None).await.unwrap(), vec![updated]);

    sync.delete(&created.id).await.unwrap();
    assert!(sync.transactions(None).await.unwrap().is_empty());

    let err = sync.delete(&created.id).await.unwrap_err();
    assert!(matches!(err, ClientError::NotFound(_)));
    assert!(matches!(
        sync.mutation_state(MutationKind::Delete),
        MutationState::Error(_)
    ));
}

#[tokio::test(start_paused = true)]
async fn idle_unwatched_queries_are_evicted_after_ten_minutes() {
    let (_service, sync) = sync();
    sync.transactions(None).await.unwrap();
    sync.watch(Some(TransactionType::Income));
    sync.transactions(Some(TransactionType::Income)).await.unwrap();

    tokio::time::advance(Duration::from_secs(9 * 60)).await;
    assert_eq!(sync.collect_garbage(), 0);

    tokio::time::advance(Duration::from_secs(60)).await;
    assert_eq!(sync.collect_garbage(), 1);
    assert!(!sync.is_cached(None));
    assert!(sync.is_cached(Some(TransactionType::Income)));
}

#[tokio::test(start_paused = true)]
async fn cancelled_read_is_not_left_loading() {
    let (service, sync) = sync();
    service.set_delay(Some(Duration::from_secs(10)));

    let timed_out = tokio::time::timeout(Duration::from_secs(1), sync.transactions(None)).await;
    assert!(timed_out.is_err());
    assert_eq!(sync.snapshot(None).status, QueryStatus::Idle);

    tokio::time::advance(Duration::from_secs(60 * 60)).await;
    assert_eq!(sync.collect_garbage(), 1);
    assert!(!sync.is_cached(None));
}

#[tokio::test(start_paused = true)]
async fn cancelled_write_is_not_left_pending() {
    let (service, sync) = sync();
    service.set_delay(Some(Duration::from_secs(10)));

    let timed_out = tokio::time::timeout(
        Duration::from_secs(1),
        sync.create(new_transaction(TransactionType::Outcome, "Rent", 1500)),
    )
    .await;
    assert!(timed_out.is_err());
    assert_eq!(sync.mutation_state(MutationKind::Create), MutationState::Idle);

    service.set_delay(None);
    sync.create(new_transaction(TransactionType::Outcome, "Rent", 1500))
        .await
        .unwrap();
    assert_eq!(sync.mutation_state(MutationKind::Create), MutationState::Success);
}
