use std::cell::RefCell;
use std::rc::Rc;
use std::time::Instant;

use horus::time::{sleep, sleep_until, Duration};

#[test]
fn timer_smoke_test() {
    horus::block_on(async {
        let time = Instant::now();
        let dur = Duration::from_millis(80);
        sleep(dur).await;
        assert!(time.elapsed() >= dur);
    })
    .unwrap();
}

#[horus::test]
async fn elapsed_deadline_completes_immediately() {
    let time = Instant::now();
    sleep_until(Instant::now() - Duration::from_millis(50)).await;
    sleep(Duration::ZERO).await;
    assert!(time.elapsed() < Duration::from_millis(20));
}

// Three tasks sleeping 50, 20 and 100 ms complete in deadline order, and
// the whole batch takes about as long as the longest sleep.
#[horus::test]
async fn sleeps_complete_in_deadline_order() {
    let order = Rc::new(RefCell::new(Vec::new()));
    let time = Instant::now();

    let task = |ms: u64| {
        let order = order.clone();
        horus::spawn(async move {
            sleep(Duration::from_millis(ms)).await;
            order.borrow_mut().push(ms);
        })
    };
    let (a, b, c) = (task(50), task(20), task(100));
    horus::join!(a, b, c);

    assert_eq!(*order.borrow(), [20, 50, 100]);
    let elapsed = time.elapsed();
    assert!(elapsed >= Duration::from_millis(100), "{elapsed:?}");
    assert!(elapsed < Duration::from_millis(300), "{elapsed:?}");
}

#[horus::test]
async fn equal_deadlines_fire_in_spawn_order() {
    let order = Rc::new(RefCell::new(Vec::new()));
    let deadline = Instant::now() + Duration::from_millis(30);

    let task = |tag: u32| {
        let order = order.clone();
        horus::spawn(async move {
            sleep_until(deadline).await;
            order.borrow_mut().push(tag);
        })
    };
    let (a, b, c) = (task(1), task(2), task(3));
    horus::join!(a, b, c);

    assert_eq!(*order.borrow(), [1, 2, 3]);
}

// A cancelled sleeper must not fire: cancelling the task removes its
// deadline, so the remaining task wakes on its own schedule.
#[horus::test]
async fn dropping_a_task_cancels_its_sleep() {
    let fired = Rc::new(RefCell::new(false));
    let handle = horus::spawn({
        let fired = fired.clone();
        async move {
            sleep(Duration::from_millis(20)).await;
            *fired.borrow_mut() = true;
        }
    });
    drop(handle);
    sleep(Duration::from_millis(60)).await;
    assert!(!*fired.borrow());
}
