use std::cell::Cell;
use std::rc::Rc;

use horus::http::{Error, Method, Request, Response, Router};

/// Registers a handler that records its tag when called.
fn tagged(router_calls: &Rc<Cell<&'static str>>, tag: &'static str) -> impl Fn(Request) -> TagFut {
    let calls = router_calls.clone();
    move |_req| TagFut {
        calls: calls.clone(),
        tag,
    }
}

struct TagFut {
    calls: Rc<Cell<&'static str>>,
    tag: &'static str,
}

impl std::future::Future for TagFut {
    type Output = Result<Response, Error>;
    fn poll(
        self: std::pin::Pin<&mut Self>,
        _: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Self::Output> {
        self.calls.set(self.tag);
        std::task::Poll::Ready(Ok(Response::new(200)))
    }
}

async fn call(router: &Router, method: Method, target: &str) -> Option<&'static str> {
    let handler = router.find_route(method, target)?;
    handler(Request::new(method, target)).await.unwrap();
    Some("called")
}

#[horus::test]
async fn exact_routes_resolve_registered_handlers() {
    let called = Rc::new(Cell::new(""));
    let mut router = Router::new();
    router.route(Method::Get, "/a", tagged(&called, "a")).unwrap();
    router.route(Method::Post, "/a", tagged(&called, "a-post")).unwrap();
    router.route(Method::Get, "/a/b", tagged(&called, "ab")).unwrap();

    call(&router, Method::Get, "/a").await.unwrap();
    assert_eq!(called.get(), "a");
    call(&router, Method::Post, "/a").await.unwrap();
    assert_eq!(called.get(), "a-post");
    call(&router, Method::Get, "/a/b").await.unwrap();
    assert_eq!(called.get(), "ab");

    assert!(router.find_route(Method::Delete, "/a").is_none());
    assert!(router.find_route(Method::Get, "/missing").is_none());
}

#[horus::test]
async fn exact_match_beats_prefix_and_method_beats_any() {
    let called = Rc::new(Cell::new(""));
    let mut router = Router::new();
    router.route(Method::Get, "/a", tagged(&called, "exact")).unwrap();
    router.route_prefix(Method::Any, "/", tagged(&called, "root")).unwrap();
    router.route_prefix(Method::Get, "/a", tagged(&called, "prefix-get")).unwrap();

    // exact wins over any trie match.
    call(&router, Method::Get, "/a").await.unwrap();
    assert_eq!(called.get(), "exact");

    // no exact entry: the deepest trie node for the method wins.
    call(&router, Method::Get, "/a/x").await.unwrap();
    assert_eq!(called.get(), "prefix-get");

    // other methods fall back to the ANY entry at the root.
    call(&router, Method::Post, "/a/x").await.unwrap();
    assert_eq!(called.get(), "root");
}

#[horus::test]
async fn longest_prefix_wins() {
    let called = Rc::new(Cell::new(""));
    let mut router = Router::new();
    router.route_prefix(Method::Any, "/", tagged(&called, "root")).unwrap();
    router.route_prefix(Method::Any, "/api", tagged(&called, "api")).unwrap();
    router.route_prefix(Method::Any, "/api/v2", tagged(&called, "v2")).unwrap();

    call(&router, Method::Get, "/api/v2/users/7").await.unwrap();
    assert_eq!(called.get(), "v2");
    call(&router, Method::Get, "/api/other").await.unwrap();
    assert_eq!(called.get(), "api");
    call(&router, Method::Get, "/else").await.unwrap();
    assert_eq!(called.get(), "root");
}

#[horus::test]
async fn trailing_slash_falls_back_to_the_slashed_entry() {
    let called = Rc::new(Cell::new(""));
    let mut router = Router::new();
    router.route(Method::Get, "/home/", tagged(&called, "home")).unwrap();

    call(&router, Method::Get, "/home").await.unwrap();
    assert_eq!(called.get(), "home");
    call(&router, Method::Get, "/home/").await.unwrap();
    assert_eq!(called.get(), "home");
}

#[horus::test]
async fn paths_are_normalized_and_queries_stripped() {
    let called = Rc::new(Cell::new(""));
    let mut router = Router::new();
    router.route(Method::Get, "//a//b", tagged(&called, "ab")).unwrap();

    call(&router, Method::Get, "/a/b").await.unwrap();
    assert_eq!(called.get(), "ab");
    call(&router, Method::Get, "/a//b?q=1").await.unwrap();
    assert_eq!(called.get(), "ab");
}

#[test]
fn bad_registrations_are_rejected() {
    let mut router = Router::new();
    let handler = |_req: Request| async { Ok(Response::new(200)) };

    let err = router.route(Method::Get, "relative", handler).unwrap_err();
    assert!(matches!(err, Error::InvalidArgument(_)));

    let err = router
        .route_prefix(Method::Get, "/a?q=1", |_req: Request| async {
            Ok(Response::new(200))
        })
        .unwrap_err();
    assert!(matches!(err, Error::InvalidArgument(_)));

    let err = router
        .route_prefix(Method::Get, "nope", |_req: Request| async {
            Ok(Response::new(200))
        })
        .unwrap_err();
    assert!(matches!(err, Error::InvalidArgument(_)));
}
