//! Updatable cursor tests
//!
//! Blocking hand-off between a producer and consumer threads

mod common;

use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use common::init_tracing;
use stitch::{Characteristics, Cursor, SizeHint, UpdatableConfig, UpdatableCursor, VecCursor};

#[test]
fn blocked_consumer_receives_transformed_first_element() {
    init_tracing();
    let cursor = UpdatableCursor::new().with_transform(|x: i32| x * 100);
    let (started_tx, started_rx) = mpsc::channel();

    let consumer = {
        let mut cursor = cursor.clone();
        thread::spawn(move || {
            started_tx.send(()).expect("test thread alive");
            let mut seen = Vec::new();
            let first = cursor.try_advance(&mut |x| seen.push(x));
            let second = cursor.try_advance(&mut |x| seen.push(x));
            (first, second, seen)
        })
    };

    started_rx.recv().expect("consumer started");
    thread::sleep(Duration::from_millis(20));
    assert!(!consumer.is_finished(), "consumer should block until an update");

    cursor.update(VecCursor::new(vec![1, 2, 3]));
    let (first, second, seen) = consumer.join().expect("consumer thread");

    assert!(first);
    assert!(second);
    assert_eq!(seen, vec![100, 2]);
}

#[test]
fn update_swaps_source_mid_stream() {
    let mut cursor = UpdatableCursor::new().with_transform(|x: i32| -x);
    cursor.update(VecCursor::new(vec![1, 2, 3]));

    let mut seen = Vec::new();
    assert!(cursor.try_advance(&mut |x| seen.push(x)));
    assert!(cursor.try_advance(&mut |x| seen.push(x)));

    cursor.update(VecCursor::new(vec![10, 20]));
    while cursor.try_advance(&mut |x| seen.push(x)) {}

    assert_eq!(seen, vec![-1, 2, -10, 20]);
    assert_eq!(cursor.update_count(), 2);
}

#[test]
fn cancel_releases_blocked_consumer() {
    init_tracing();
    let cursor = UpdatableCursor::<u64>::new();

    let consumer = {
        let mut cursor = cursor.clone();
        thread::spawn(move || cursor.try_advance(&mut |_| panic!("nothing was installed")))
    };

    thread::sleep(Duration::from_millis(20));
    cursor.cancel();

    let advanced = consumer.join().expect("consumer thread");
    assert!(!advanced);
    assert!(cursor.is_cancelled());
}

#[test]
fn many_consumers_all_wake() {
    let cursor = UpdatableCursor::new();

    let consumers: Vec<_> = (0..4)
        .map(|_| {
            let cursor = cursor.clone();
            thread::spawn(move || {
                let mut seen = Vec::new();
                cursor.advance(&mut |x: u32| seen.push(x));
                seen
            })
        })
        .collect();

    thread::sleep(Duration::from_millis(20));
    cursor.update(VecCursor::new((0..4).collect::<Vec<u32>>()));

    let mut all: Vec<u32> = consumers
        .into_iter()
        .flat_map(|consumer| consumer.join().expect("consumer thread"))
        .collect();
    all.sort_unstable();
    assert_eq!(all, vec![0, 1, 2, 3]);
}

#[test]
fn transform_lands_on_first_element_with_racing_consumers() {
    let holder = UpdatableCursor::new().with_transform(|x: u32| x * 100);
    let cursor = &holder;

    for round in 0..200 {
        cursor.update(VecCursor::new(vec![1, 2]));

        let mut taken: Vec<u32> = thread::scope(|scope| {
            let consumers: Vec<_> = (0..2)
                .map(|_| {
                    scope.spawn(move || {
                        let mut seen = Vec::new();
                        cursor.advance(&mut |x| seen.push(x));
                        seen
                    })
                })
                .collect();
            consumers
                .into_iter()
                .flat_map(|consumer| consumer.join().expect("consumer thread"))
                .collect()
        });
        taken.sort_unstable();
        assert_eq!(taken, vec![2, 100], "round {round}");
    }
}

#[test]
fn timed_wait_gives_up() -> anyhow::Result<()> {
    let mut cursor = UpdatableCursor::<i32>::new()
        .with_config(UpdatableConfig::default().with_wait_timeout(Duration::from_millis(5)))?;

    assert!(!cursor.try_advance(&mut |_| panic!("nothing was installed")));
    assert!(!cursor.is_cancelled());
    assert!(!cursor.has_cursor());
    Ok(())
}

#[test]
fn reports_unknown_ordered_unsplittable() {
    let mut cursor = UpdatableCursor::<i32>::new();
    cursor.update(VecCursor::new(vec![1, 2, 3, 4]));

    assert_eq!(cursor.estimate_size(), SizeHint::Unknown);
    assert_eq!(cursor.characteristics(), Characteristics::ORDERED);
    assert!(cursor.try_split().is_none());
}
