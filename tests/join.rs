use std::cell::Cell;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::rc::Rc;
use std::time::Instant;

use horus::future::{race, race_all, Either};
use horus::time::{sleep, timeout, Duration};

#[horus::test]
async fn join_returns_every_output() {
    let (a, b) = horus::join!(async { 1 }, async { 2 });
    assert_eq!((a, b), (1, 2));
}

// Joined sleeps run concurrently: four 50 ms sleeps take ~50 ms, not 200.
#[horus::test]
async fn joined_branches_run_concurrently() {
    let time = Instant::now();
    let dur = Duration::from_millis(50);

    horus::join!(sleep(dur), sleep(dur), sleep(dur), sleep(dur));

    let elapsed = time.elapsed().as_secs_f64() / dur.as_secs_f64();
    assert!(elapsed >= 1.0, "{elapsed}");
    assert!(elapsed < 1.8, "{elapsed}");
}

// A failing branch does not cut the join short: the combined result is
// only available once every branch has completed, and the first error in
// argument order wins.
#[horus::test]
async fn join_reports_failure_after_all_branches_finish() {
    let time = Instant::now();
    let (slow, failed) = horus::join!(
        async {
            sleep(Duration::from_millis(50)).await;
            Ok(7)
        },
        async { Err::<i32, _>("exploded") },
    );
    let first_error = slow.and(failed);
    assert_eq!(first_error, Err("exploded"));
    assert!(time.elapsed() >= Duration::from_millis(50));
}

// A branch that panics right away must not cut the join short: the sleep
// branch still reaches its deadline before the panic is re-raised.
#[test]
fn join_waits_for_all_branches_before_raising_a_panic() {
    let time = Instant::now();
    let result = catch_unwind(AssertUnwindSafe(|| {
        horus::block_on(async {
            horus::join!(sleep(Duration::from_millis(50)), async { panic!("boom") });
        })
        .unwrap()
    }));
    let payload = result.unwrap_err();
    assert_eq!(payload.downcast_ref::<&str>(), Some(&"boom"));
    assert!(time.elapsed() >= Duration::from_millis(50));
}

// Same shape with spawned tasks, the failing one polled first: its panic
// is re-raised by the join, but only after the sibling has run to
// completion. The sibling is completed, not cancelled.
#[test]
fn panicking_branch_does_not_cancel_siblings() {
    let completed = Rc::new(Cell::new(false));
    let time = Instant::now();
    let result = catch_unwind(AssertUnwindSafe(|| {
        let completed = completed.clone();
        horus::block_on(async move {
            let failing = horus::spawn(async {
                panic!("exploded");
            });
            let slow = horus::spawn({
                let completed = completed.clone();
                async move {
                    sleep(Duration::from_millis(50)).await;
                    completed.set(true);
                }
            });
            horus::join!(failing, slow);
        })
        .unwrap()
    }));
    let payload = result.unwrap_err();
    assert_eq!(payload.downcast_ref::<&str>(), Some(&"exploded"));
    assert!(time.elapsed() >= Duration::from_millis(50));
    assert!(completed.get());
}

#[horus::test]
async fn race_resolves_to_the_first_branch_done() {
    let winner = race(
        async {
            sleep(Duration::from_millis(100)).await;
            1
        },
        async {
            sleep(Duration::from_millis(20)).await;
            2
        },
    )
    .await;
    assert_eq!(winner, Either::Right(2));
}

#[horus::test]
async fn race_all_reports_the_winning_index() {
    let sleepers = vec![
        sleep(Duration::from_millis(500)),
        sleep(Duration::from_millis(20)),
        sleep(Duration::from_millis(700)),
    ];
    let (index, ()) = race_all(sleepers).await;
    assert_eq!(index, 1);
}

#[horus::test]
async fn timeout_cuts_off_a_slow_future() {
    let out = timeout(sleep(Duration::from_millis(50)), Duration::from_millis(100)).await;
    assert!(out.is_ok());

    let out = timeout(sleep(Duration::from_millis(100)), Duration::from_millis(10)).await;
    assert!(out.is_err());
}

// The losing branch of a race is dropped when the race resolves; its
// pending sleep must not keep the loop alive.
#[horus::test]
async fn race_drops_the_loser() {
    let time = Instant::now();
    race(sleep(Duration::from_millis(20)), sleep(Duration::from_secs(5))).await;
    sleep(Duration::from_millis(10)).await;
    assert!(time.elapsed() < Duration::from_millis(200));
}
