use std::rc::Rc;

use crate::io::{BufReader, BufWriter};
use crate::net::TcpStream;

use super::{Error, Request, Response, Router};

/// Serves one request on an accepted connection: parse, route, respond,
/// and let the stream close on drop.
///
/// Every failure (a malformed request, a handler error, a peer that hangs
/// up mid-response) is reported through `tracing` and the connection is
/// dropped. Failures never reach the accept loop, and no automatic 500 is
/// produced; handlers that want one must build it themselves.
pub async fn serve_connection(stream: TcpStream, router: Rc<Router>) {
    let peer = stream.peer_addr().ok();
    if let Err(error) = handle(&stream, &router).await {
        tracing::warn!(?peer, %error, "dropping connection");
    }
}

async fn handle(stream: &TcpStream, router: &Router) -> Result<(), Error> {
    let mut reader = BufReader::new(stream);
    let mut writer = BufWriter::new(stream);

    let request = Request::read_from(&mut reader).await?;
    let response = match router.find_route(request.method, &request.target) {
        Some(handler) => handler(request).await?,
        None => not_found(),
    };
    response.write_to(&mut writer).await?;
    writer.flush().await?;
    Ok(())
}

/// The response served when no route matches.
pub fn not_found() -> Response {
    let mut response = Response::new(404);
    response.headers.insert("Content-Type", "application/json");
    response.body = br#"{"message":"Cannot find a route."}"#.to_vec();
    response
}
