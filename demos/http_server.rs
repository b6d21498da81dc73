//! A small HTTP server: redirects, a static page, and two routes that
//! exercise the runtime (an async sleep and a large generated body).
//!
//! The server scans ports 9000 through 9200 for a free one and serves until
//! killed. Try it with:
//!
//! ```sh
//! curl -i http://localhost:9000/
//! curl http://localhost:9000/sleep?ms=250
//! curl http://localhost:9000/repeat?count=10000 | wc -c
//! ```

use std::net::SocketAddr;
use std::process::exit;
use std::rc::Rc;

use horus::http::{serve_connection, Error, Request, Response, Router};
use horus::net::TcpListener;
use horus::time::{sleep, Duration};

fn create_router() -> Result<Router, Error> {
    let mut router = Router::new();
    router.route(horus::http::Method::Get, "/", |_req| async {
        let mut res = Response::new(302);
        res.headers.insert("Location", "/home");
        Ok(res)
    })?;
    router.route(horus::http::Method::Get, "/home", |_req| async {
        let mut res = Response::new(200);
        res.headers.insert("Content-Type", "text/html");
        res.body = b"<h1>Hello, World!</h1>".to_vec();
        Ok(res)
    })?;
    // Simulates a time-consuming request, e.g. /sleep?ms=1.5
    router.route(horus::http::Method::Get, "/sleep", sleep_route)?;
    // Simulates an output-heavy request, e.g. /repeat?count=10000
    router.route(horus::http::Method::Get, "/repeat", repeat_route)?;
    Ok(router)
}

async fn sleep_route(req: Request) -> Result<Response, Error> {
    let target = req.parse_target();
    let ms: f64 = target
        .param("ms")
        .and_then(|ms| ms.parse().ok())
        .ok_or_else(|| Error::InvalidArgument("missing or malformed `ms` parameter".into()))?;
    if ms < 0.0 {
        return Err(Error::InvalidArgument(
            "a negative sleep duration is not allowed".into(),
        ));
    }
    if ms > 0.0 {
        sleep(Duration::from_secs_f64(ms / 1000.0)).await;
    }
    let mut res = Response::new(200);
    res.headers.insert("Content-Type", "text/html");
    res.body = b"<h1>Hello, World!</h1>".to_vec();
    Ok(res)
}

async fn repeat_route(req: Request) -> Result<Response, Error> {
    let target = req.parse_target();
    let count: usize = target
        .param("count")
        .and_then(|count| count.parse().ok())
        .ok_or_else(|| Error::InvalidArgument("missing or malformed `count` parameter".into()))?;
    let mut res = Response::new(200);
    res.headers.insert("Content-Type", "text/html");
    res.body = vec![b'@'; count];
    Ok(res)
}

const MIN_PORT: u16 = 9000;
const MAX_PORT: u16 = 9200;

fn bind_free_port() -> TcpListener {
    for port in MIN_PORT..=MAX_PORT {
        let addr: SocketAddr = ([0, 0, 0, 0], port).into();
        if let Ok(listener) = TcpListener::bind(addr) {
            println!("Server is listening on port {port}...");
            return listener;
        }
    }
    eprintln!("Failed to bind a socket in port range {MIN_PORT}-{MAX_PORT}");
    exit(1);
}

#[horus::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt::init();

    let router = Rc::new(create_router().expect("the routes are well formed"));
    let listener = bind_free_port();

    loop {
        let (stream, _addr) = listener.accept().await?;
        horus::detach(serve_connection(stream, router.clone()));
    }
}
