use std::cell::Cell;
use std::rc::Rc;

use horus::task::yield_now;
use horus::time::{sleep, Duration};

#[horus::test]
async fn spawn_and_join() {
    let join = horus::spawn(async { "hello world!" });
    assert_eq!(join.await, "hello world!");
}

#[horus::test]
async fn spawned_tasks_interleave() {
    let log = Rc::new(std::cell::RefCell::new(Vec::new()));
    let handle = horus::spawn({
        let log = log.clone();
        async move {
            log.borrow_mut().push("2.1");
            yield_now().await;
            log.borrow_mut().push("2.2");
        }
    });
    log.borrow_mut().push("1.1");
    yield_now().await;
    log.borrow_mut().push("1.2");
    handle.await;
    assert_eq!(*log.borrow(), ["1.1", "2.1", "1.2", "2.2"]);
}

#[horus::test]
async fn detached_tasks_run_to_completion() {
    let done = Rc::new(Cell::new(false));
    horus::detach({
        let done = done.clone();
        async move {
            yield_now().await;
            done.set(true);
        }
    });
    sleep(Duration::from_millis(10)).await;
    assert!(done.get());
}

// A completed task yields its result exactly once; an incomplete one
// reports nothing.
#[horus::test]
async fn try_result_is_none_until_completion() {
    let mut join = horus::spawn(async {
        yield_now().await;
        42
    });
    assert_eq!(join.try_result(), None);
    assert!(!join.is_finished());

    yield_now().await;
    yield_now().await;

    assert!(join.is_finished());
    assert_eq!(join.try_result(), Some(42));
}

#[horus::test]
#[should_panic(expected = "something bad happened")]
async fn joining_a_panicked_task_panics() {
    let join = horus::spawn(async {
        panic!("something bad happened");
    });
    join.await
}

// A panicked task that is never joined takes its payload with it: the
// runtime itself must not unwind.
#[horus::test]
async fn unobserved_panics_are_contained() {
    horus::detach(async {
        panic!("nobody is watching");
    });
    sleep(Duration::from_millis(10)).await;
}

#[horus::test]
async fn dropping_a_handle_cancels_the_task() {
    let ran = Rc::new(Cell::new(false));
    let handle = horus::spawn({
        let ran = ran.clone();
        async move {
            yield_now().await;
            ran.set(true);
        }
    });
    drop(handle);
    sleep(Duration::from_millis(10)).await;
    assert!(!ran.get());
}

#[test]
fn spawned_tasks_survive_across_block_on_calls() {
    let rt = horus::runtime::Runtime::new().unwrap();
    let done = Rc::new(Cell::new(false));
    rt.block_on({
        let done = done.clone();
        async move {
            horus::detach(async move {
                yield_now().await;
                yield_now().await;
                done.set(true);
            });
        }
    })
    .unwrap();
    rt.block_on(async { sleep(Duration::from_millis(5)).await })
        .unwrap();
    assert!(done.get());
}
