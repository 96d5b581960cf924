use std::sync::Arc;

use uuid::Uuid;

use crate::helpers::{TestEngine, pool_id, test_prize};

#[tokio::test]
async fn should_pick_lowest_id_allocatable_prize() {
    let mut inactive = test_prize(1, 10);
    inactive.is_active = false;
    let engine = TestEngine::new(vec![test_prize(3, 1), inactive, test_prize(2, 0), test_prize(4, 5)]);

    let picked = engine
        .allocator()
        .pick_next(pool_id(), None)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(picked.id, Uuid::from_u128(3));
}

#[tokio::test]
async fn should_narrow_pick_by_type() {
    let type_id = Uuid::from_u128(0xBEEF);
    let mut typed = test_prize(9, 1);
    typed.type_id = Some(type_id);
    let engine = TestEngine::new(vec![test_prize(1, 1), typed]);

    let picked = engine
        .allocator()
        .pick_next(pool_id(), Some(type_id))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(picked.id, Uuid::from_u128(9));
}

#[tokio::test]
async fn should_return_none_for_exhausted_pool() {
    let engine = TestEngine::new(vec![test_prize(1, 0)]);

    let picked = engine.allocator().pick_next(pool_id(), None).await.unwrap();

    assert!(picked.is_none());
}

#[tokio::test]
async fn should_refuse_to_decrement_below_zero() {
    let engine = TestEngine::new(vec![test_prize(1, 1)]);
    let allocator = engine.allocator();
    let id = Uuid::from_u128(1);

    assert!(allocator.decrement(id).await.unwrap());
    assert!(!allocator.decrement(id).await.unwrap());
    assert_eq!(engine.prizes.remaining(id), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn should_let_exactly_stock_many_concurrent_decrements_succeed() {
    let stock = 5;
    let engine = TestEngine::new(vec![test_prize(1, stock)]);
    let allocator = Arc::new(engine.allocator());
    let id = Uuid::from_u128(1);

    let handles: Vec<_> = (0..stock + 1)
        .map(|_| {
            let allocator = Arc::clone(&allocator);
            tokio::spawn(async move { allocator.decrement(id).await.unwrap() })
        })
        .collect();
    let results = futures::future::join_all(handles).await;

    let succeeded = results.into_iter().filter(|r| *r.as_ref().unwrap()).count();
    assert_eq!(succeeded, stock as usize);
    assert_eq!(engine.prizes.remaining(id), 0);
}
