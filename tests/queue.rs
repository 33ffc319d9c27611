use std::time::Duration;

use tokio::time::timeout;
use workshop::{Category, OperatingState, Phase, PhaseQueue, QueueStats, Vehicle};

fn restricted(category: Category) -> OperatingState {
    OperatingState {
        restricted: Some(category),
        ..OperatingState::default()
    }
}

fn priority(category: Category) -> OperatingState {
    OperatingState {
        priority: Some(category),
        ..OperatingState::default()
    }
}

async fn wait_for(q: &PhaseQueue, pred: impl Fn(&QueueStats) -> bool) -> QueueStats {
    loop {
        let stats = q.stats().await.unwrap();
        if pred(&stats) {
            return stats;
        }
        tokio::task::yield_now().await;
    }
}

#[tokio::test(start_paused = true)]
async fn second_enqueue_waits_for_room() {
    let q = PhaseQueue::spawn(Phase::Mechanic, 1);
    q.enqueue(Vehicle::new(1, Category::A)).await.unwrap();

    let second = {
        let q = q.clone();
        tokio::spawn(async move { q.enqueue(Vehicle::new(2, Category::B)).await })
    };
    let stats = wait_for(&q, |s| s.parked_enqueues == 1).await;
    assert_eq!(stats.len(), 1);
    assert!(!second.is_finished());

    let first = q.dequeue(OperatingState::default()).await.unwrap();
    assert_eq!(first.id().0, 1);

    timeout(Duration::from_secs(1), second)
        .await
        .expect("parked enqueue admitted")
        .unwrap()
        .unwrap();
    let stats = q.stats().await.unwrap();
    assert_eq!(stats.len(), 1);
    assert_eq!(stats.held_of(Category::B), 1);
    assert_eq!(stats.parked_enqueues, 0);
}

#[tokio::test(start_paused = true)]
async fn restriction_keeps_other_categories_parked() {
    let q = PhaseQueue::spawn(Phase::Mechanic, 10);
    for (id, cat) in [(1, Category::A), (2, Category::B), (3, Category::A), (4, Category::B)] {
        q.enqueue(Vehicle::new(id, cat)).await.unwrap();
    }

    let only_b = restricted(Category::B);
    assert_eq!(q.dequeue(only_b).await.unwrap().id().0, 2);
    assert_eq!(q.dequeue(only_b).await.unwrap().id().0, 4);

    let parked = timeout(Duration::from_secs(5), q.dequeue(only_b)).await;
    assert!(parked.is_err(), "no A vehicle may leave while only B is served");

    let stats = q.stats().await.unwrap();
    assert_eq!(stats.held_of(Category::A), 2);
    assert_eq!(stats.held_of(Category::B), 0);

    assert_eq!(q.dequeue(restricted(Category::A)).await.unwrap().id().0, 1);
}

#[tokio::test(start_paused = true)]
async fn priority_beats_category_order() {
    let q = PhaseQueue::spawn(Phase::Cleaning, 10);
    q.enqueue(Vehicle::new(1, Category::A)).await.unwrap();
    q.enqueue(Vehicle::new(2, Category::C)).await.unwrap();
    q.enqueue(Vehicle::new(3, Category::B)).await.unwrap();
    q.enqueue(Vehicle::new(4, Category::C)).await.unwrap();

    let snap = priority(Category::C);
    assert_eq!(q.dequeue(snap).await.unwrap().id().0, 2);
    assert_eq!(q.dequeue(snap).await.unwrap().id().0, 4);
    // no C left: back to A, B, C order
    assert_eq!(q.dequeue(snap).await.unwrap().id().0, 1);
    assert_eq!(q.dequeue(snap).await.unwrap().id().0, 3);
}

#[tokio::test(start_paused = true)]
async fn restriction_wins_over_priority() {
    let q = PhaseQueue::spawn(Phase::Cleaning, 10);
    q.enqueue(Vehicle::new(1, Category::C)).await.unwrap();
    q.enqueue(Vehicle::new(2, Category::B)).await.unwrap();

    let snap = OperatingState {
        restricted: Some(Category::B),
        priority: Some(Category::C),
        ..OperatingState::default()
    };
    assert_eq!(q.dequeue(snap).await.unwrap().id().0, 2);
}

#[tokio::test(start_paused = true)]
async fn ineligible_waiter_does_not_block_younger_ones() {
    let q = PhaseQueue::spawn(Phase::Delivery, 4);

    let oldest = {
        let q = q.clone();
        tokio::spawn(async move { q.dequeue(restricted(Category::A)).await })
    };
    wait_for(&q, |s| s.parked_dequeues == 1).await;

    let younger = {
        let q = q.clone();
        tokio::spawn(async move { q.dequeue(OperatingState::default()).await })
    };
    wait_for(&q, |s| s.parked_dequeues == 2).await;

    q.enqueue(Vehicle::new(10, Category::B)).await.unwrap();
    let got = timeout(Duration::from_secs(1), younger).await.unwrap().unwrap().unwrap();
    assert_eq!(got.id().0, 10);
    assert!(!oldest.is_finished());

    q.enqueue(Vehicle::new(11, Category::A)).await.unwrap();
    let got = timeout(Duration::from_secs(1), oldest).await.unwrap().unwrap().unwrap();
    assert_eq!(got.id().0, 11);
}

#[tokio::test(start_paused = true)]
async fn waiters_are_served_in_arrival_order() {
    let q = PhaseQueue::spawn(Phase::Mechanic, 4);
    let mut waiters = Vec::new();
    for n in 1..=3 {
        let q2 = q.clone();
        waiters.push(tokio::spawn(async move { q2.dequeue(OperatingState::default()).await }));
        wait_for(&q, |s| s.parked_dequeues == n).await;
    }

    for id in [7, 8, 9] {
        q.enqueue(Vehicle::new(id, Category::C)).await.unwrap();
    }
    let mut got = Vec::new();
    for w in waiters {
        got.push(w.await.unwrap().unwrap().id().0);
    }
    assert_eq!(got, vec![7, 8, 9]);
}

#[tokio::test(start_paused = true)]
async fn requeue_goes_back_to_the_head() {
    let q = PhaseQueue::spawn(Phase::Mechanic, 2);
    q.enqueue(Vehicle::new(1, Category::B)).await.unwrap();
    q.enqueue(Vehicle::new(2, Category::B)).await.unwrap();

    let taken = q.dequeue(OperatingState::default()).await.unwrap();
    assert_eq!(taken.id().0, 1);

    // refill so the requeue has to park ahead of later enqueues
    q.enqueue(Vehicle::new(3, Category::B)).await.unwrap();
    let late = {
        let q = q.clone();
        tokio::spawn(async move { q.enqueue(Vehicle::new(4, Category::B)).await })
    };
    wait_for(&q, |s| s.parked_enqueues == 1).await;
    let back = {
        let q = q.clone();
        tokio::spawn(async move { q.requeue(taken).await })
    };
    wait_for(&q, |s| s.parked_enqueues == 2).await;

    let mut order = Vec::new();
    for _ in 0..4 {
        order.push(q.dequeue(OperatingState::default()).await.unwrap().id().0);
    }
    back.await.unwrap().unwrap();
    late.await.unwrap().unwrap();
    assert_eq!(order, vec![2, 1, 3, 4]);
}

#[tokio::test(start_paused = true)]
async fn abandoned_dequeue_keeps_the_vehicle() {
    let q = PhaseQueue::spawn(Phase::Mechanic, 2);

    let got = q
        .dequeue_until(OperatingState::default(), tokio::time::sleep(Duration::from_secs(1)))
        .await
        .unwrap();
    assert!(got.is_none());

    q.enqueue(Vehicle::new(5, Category::A)).await.unwrap();
    let stats = q.stats().await.unwrap();
    assert_eq!(stats.held_of(Category::A), 1);
    assert_eq!(stats.parked_dequeues, 0);
    assert_eq!(q.dequeue(OperatingState::default()).await.unwrap().id().0, 5);
}
