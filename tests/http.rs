use horus::http::{Error, HeaderMap, Method, Request, RequestTarget, Response};
use horus::io::{AsyncRead, AsyncWrite, BufReader, BufWriter, IoStatus};

/// In-memory byte source: serves the bytes, then reports a hangup.
struct MemReader {
    data: Vec<u8>,
    pos: usize,
}

impl MemReader {
    fn new(data: impl Into<Vec<u8>>) -> MemReader {
        MemReader {
            data: data.into(),
            pos: 0,
        }
    }
}

impl AsyncRead for MemReader {
    async fn read(&mut self, buf: &mut [u8]) -> std::io::Result<IoStatus> {
        if self.pos == self.data.len() {
            return Ok(IoStatus { len: 0, hup: true });
        }
        let len = buf.len().min(self.data.len() - self.pos);
        buf[..len].copy_from_slice(&self.data[self.pos..self.pos + len]);
        self.pos += len;
        Ok(IoStatus { len, hup: false })
    }
}

struct MemWriter(Vec<u8>);

impl AsyncWrite for MemWriter {
    async fn write(&mut self, buf: &[u8]) -> std::io::Result<IoStatus> {
        self.0.extend_from_slice(buf);
        Ok(IoStatus {
            len: buf.len(),
            hup: false,
        })
    }
}

async fn parse_request(wire: &[u8]) -> Result<Request, Error> {
    let mut reader = BufReader::new(MemReader::new(wire));
    Request::read_from(&mut reader).await
}

async fn serialize_request(request: &Request) -> Vec<u8> {
    let mut writer = BufWriter::new(MemWriter(Vec::new()));
    request.write_to(&mut writer).await.unwrap();
    writer.flush().await.unwrap();
    writer.into_inner().0
}

#[horus::test]
async fn parses_a_simple_get() {
    let request = parse_request(b"GET /home HTTP/1.1\r\nHost: example.org\r\n\r\n")
        .await
        .unwrap();
    assert_eq!(request.method, Method::Get);
    assert_eq!(request.target, "/home");
    assert_eq!(request.headers.get("host"), Some("example.org"));
    assert_eq!(request.body, b"");
}

#[horus::test]
async fn parses_a_request_without_headers() {
    let request = parse_request(b"GET /nope HTTP/1.1\r\n\r\n").await.unwrap();
    assert_eq!(request.method, Method::Get);
    assert!(request.headers.is_empty());
}

#[horus::test]
async fn reads_exactly_content_length_bytes() {
    let request = parse_request(b"POST /submit HTTP/1.1\r\nContent-Length: 5\r\n\r\nhelloEXTRA")
        .await
        .unwrap();
    assert_eq!(request.body, b"hello");
}

#[horus::test]
async fn header_values_are_trimmed_and_last_write_wins() {
    let request = parse_request(
        b"GET / HTTP/1.1\r\nX-Tag:   spaced value  \r\nx-tag: second\r\n\r\n",
    )
    .await
    .unwrap();
    assert_eq!(request.headers.len(), 1);
    assert_eq!(request.headers.get("X-TAG"), Some("second"));
}

#[horus::test]
async fn malformed_requests_are_rejected() {
    let cases: &[&[u8]] = &[
        // unknown method
        b"BREW /pot HTTP/1.1\r\n\r\n",
        // missing protocol version
        b"GET /home\r\n\r\n",
        // wrong protocol version
        b"GET /home HTTP/1.0\r\n\r\n",
        // header without a colon
        b"GET / HTTP/1.1\r\nbroken header\r\n\r\n",
        // illegal header name
        b"GET / HTTP/1.1\r\nbad name: x\r\n\r\n",
        // empty header value
        b"GET / HTTP/1.1\r\nEmpty:\r\n\r\n",
        // body shorter than Content-Length
        b"POST / HTTP/1.1\r\nContent-Length: 10\r\n\r\nshort",
        // truncated mid-headers
        b"GET / HTTP/1.1\r\nHost: a",
    ];
    for case in cases {
        let result = parse_request(case).await;
        assert!(
            matches!(result, Err(Error::InvalidRequest(_))),
            "{:?}",
            String::from_utf8_lossy(case)
        );
    }
}

// Serializing and re-parsing a request yields the same request, up to
// header name case.
#[horus::test]
async fn request_round_trip() {
    let mut request = Request::new(Method::Post, "/submit?kind=test");
    request.headers.insert("Host", "example.org");
    request.headers.insert("X-Trace", "abc123");
    request.body = b"payload bytes".to_vec();

    let wire = serialize_request(&request).await;
    let parsed = parse_request(&wire).await.unwrap();

    // the serializer injects Content-Length for the non-empty body.
    let mut expected = request.clone();
    expected.headers.insert("content-length", "13");
    assert_eq!(parsed, expected);
}

#[horus::test]
async fn response_round_trip() {
    let mut response = Response::new(302);
    response.headers.insert("Location", "/home");

    let mut writer = BufWriter::new(MemWriter(Vec::new()));
    response.write_to(&mut writer).await.unwrap();
    writer.flush().await.unwrap();
    let wire = writer.into_inner().0;

    assert!(wire.starts_with(b"HTTP/1.1 302 Found\r\n"));
    // an empty body means no Content-Length at all.
    assert!(!wire.windows(14).any(|w| w.eq_ignore_ascii_case(b"content-length")));

    let mut reader = BufReader::new(MemReader::new(wire));
    let parsed = Response::read_from(&mut reader).await.unwrap();
    assert_eq!(parsed, response);
}

#[horus::test]
async fn serialization_drops_caller_supplied_content_length() {
    let mut response = Response::new(200);
    response.headers.insert("Content-Length", "999999");
    response.body = b"four".to_vec();

    let mut writer = BufWriter::new(MemWriter(Vec::new()));
    response.write_to(&mut writer).await.unwrap();
    writer.flush().await.unwrap();
    let wire = String::from_utf8(writer.into_inner().0).unwrap();

    assert!(wire.contains("Content-Length: 4\r\n"), "{wire}");
    assert!(!wire.contains("999999"), "{wire}");
}

#[horus::test]
async fn headers_serialize_in_sorted_order() {
    let mut response = Response::new(200);
    response.headers.insert("Zebra", "1");
    response.headers.insert("alpha", "2");
    response.headers.insert("Mango", "3");

    let mut writer = BufWriter::new(MemWriter(Vec::new()));
    response.write_to(&mut writer).await.unwrap();
    writer.flush().await.unwrap();
    let wire = String::from_utf8(writer.into_inner().0).unwrap();

    let alpha = wire.find("alpha").unwrap();
    let mango = wire.find("Mango").unwrap();
    let zebra = wire.find("Zebra").unwrap();
    assert!(alpha < mango && mango < zebra);
}

#[test]
fn methods_parse_case_insensitively() {
    assert_eq!(Method::parse("get"), Some(Method::Get));
    assert_eq!(Method::parse("DELETE"), Some(Method::Delete));
    assert_eq!(Method::parse("*"), Some(Method::Any));
    assert_eq!(Method::parse("BREW"), None);
    assert_eq!(Method::parse(""), None);
}

#[test]
fn header_map_is_case_insensitive() {
    let mut headers = HeaderMap::new();
    headers.insert("Content-Type", "text/html");
    assert_eq!(headers.get("content-type"), Some("text/html"));
    assert_eq!(headers.get("CONTENT-TYPE"), Some("text/html"));
    assert!(headers.get("content").is_none());
    headers.remove("CONTENT-type");
    assert!(headers.is_empty());
}

#[test]
fn classifies_request_targets() {
    let origin = RequestTarget::parse("/where?q=now&lang=en");
    let RequestTarget::Origin { path, params } = origin else {
        panic!("expected origin form");
    };
    assert_eq!(path, "/where");
    assert_eq!(params.len(), 2);
    assert_eq!(params["q"], "now");
    assert_eq!(params["lang"], "en");

    assert_eq!(
        RequestTarget::parse("http://www.example.org/pub/WWW/TheProject.html"),
        RequestTarget::Absolute {
            path: "http://www.example.org/pub/WWW/TheProject.html".to_string()
        }
    );
    assert_eq!(
        RequestTarget::parse("www.example.com:80"),
        RequestTarget::Authority {
            path: "www.example.com:80".to_string()
        }
    );
    assert_eq!(RequestTarget::parse("*"), RequestTarget::Asterisk);
    assert_eq!(RequestTarget::parse(""), RequestTarget::Invalid);
    // a '?' with no valid pairs poisons the whole target.
    assert_eq!(RequestTarget::parse("/where?"), RequestTarget::Invalid);
    assert_eq!(RequestTarget::parse("/where?flag"), RequestTarget::Invalid);
}

#[test]
fn reason_phrases_resolve_from_the_table() {
    assert_eq!(horus::http::reason_phrase(200), "OK");
    assert_eq!(horus::http::reason_phrase(302), "Found");
    assert_eq!(horus::http::reason_phrase(404), "Not Found");
    assert_eq!(horus::http::reason_phrase(599), "Unknown Status");
}
