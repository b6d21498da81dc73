use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;

use super::{Error, Method, Request, RequestTarget, Response};

/// A registered request handler: a callable turning a request into a
/// future producing a response.
pub type Handler = Rc<dyn Fn(Request) -> Pin<Box<dyn Future<Output = Result<Response, Error>>>>>;

/// Routes requests by method and path.
///
/// Two structures back the router: a table of exact paths and a trie of
/// path segments for longest-prefix matches. An exact match always beats a
/// prefix match, and at any node a method-specific handler beats the
/// [`Method::Any`] fallback.
#[derive(Default)]
pub struct Router {
    exact: HashMap<String, HashMap<Method, Handler>>,
    trie: Node,
}

#[derive(Default)]
struct Node {
    children: HashMap<String, Node>,
    handlers: HashMap<Method, Handler>,
}

impl Router {
    pub fn new() -> Router {
        Router::default()
    }

    /// Registers an exact-match route. The path is normalized (consecutive
    /// slashes collapse) and any query suffix is dropped.
    ///
    /// # Errors
    /// [`Error::InvalidArgument`] when the path does not start with `/`.
    pub fn route<H, Fut>(&mut self, method: Method, path: &str, handler: H) -> Result<(), Error>
    where
        H: Fn(Request) -> Fut + 'static,
        Fut: Future<Output = Result<Response, Error>> + 'static,
    {
        if !path.starts_with('/') {
            return Err(bad_path(path));
        }
        let path = normalize(strip_query(path));
        self.exact
            .entry(path)
            .or_default()
            .insert(method, wrap(handler));
        Ok(())
    }

    /// Registers a longest-prefix route: the handler serves every path the
    /// given one is a segment-wise prefix of, unless a deeper or exact
    /// match takes precedence.
    ///
    /// # Errors
    /// [`Error::InvalidArgument`] when the path does not start with `/`, is
    /// not an origin-form path, or carries query parameters.
    pub fn route_prefix<H, Fut>(
        &mut self,
        method: Method,
        path: &str,
        handler: H,
    ) -> Result<(), Error>
    where
        H: Fn(Request) -> Fut + 'static,
        Fut: Future<Output = Result<Response, Error>> + 'static,
    {
        if !path.starts_with('/') {
            return Err(bad_path(path));
        }
        match RequestTarget::parse(path) {
            RequestTarget::Origin { params, .. } if params.is_empty() => {}
            RequestTarget::Origin { .. } => {
                return Err(Error::InvalidArgument(format!(
                    "a route entry cannot carry query parameters: {path}"
                )))
            }
            _ => return Err(bad_path(path)),
        }
        let mut node = &mut self.trie;
        for segment in segments(path) {
            node = node.children.entry(segment.to_string()).or_default();
        }
        node.handlers.insert(method, wrap(handler));
        Ok(())
    }

    /// Looks up the handler for a request: query stripped, exact table
    /// first (retrying with a trailing slash), then the deepest trie node
    /// on the path that has a handler for the method or for
    /// [`Method::Any`]. Returns `None` when nothing matches.
    pub fn find_route(&self, method: Method, target: &str) -> Option<Handler> {
        if !target.starts_with('/') {
            return None;
        }
        let path = normalize(strip_query(target));
        if let Some(handler) = self.find_exact(method, &path) {
            return Some(handler);
        }
        if !path.ends_with('/') {
            if let Some(handler) = self.find_exact(method, &format!("{path}/")) {
                return Some(handler);
            }
        }

        let mut best = lookup(&self.trie.handlers, method);
        let mut node = &self.trie;
        for segment in segments(&path) {
            let Some(next) = node.children.get(segment) else {
                break;
            };
            node = next;
            if let Some(handler) = lookup(&node.handlers, method) {
                // the deepest handler on the walk wins.
                best = Some(handler);
            }
        }
        best.cloned()
    }

    fn find_exact(&self, method: Method, path: &str) -> Option<Handler> {
        lookup(self.exact.get(path)?, method).cloned()
    }
}

fn wrap<H, Fut>(handler: H) -> Handler
where
    H: Fn(Request) -> Fut + 'static,
    Fut: Future<Output = Result<Response, Error>> + 'static,
{
    Rc::new(move |request| {
        let future: Pin<Box<dyn Future<Output = Result<Response, Error>>>> =
            Box::pin(handler(request));
        future
    })
}

fn lookup(handlers: &HashMap<Method, Handler>, method: Method) -> Option<&Handler> {
    handlers.get(&method).or_else(|| handlers.get(&Method::Any))
}

fn bad_path(path: &str) -> Error {
    Error::InvalidArgument(format!("the path must start with '/': {path}"))
}

fn strip_query(target: &str) -> &str {
    match target.split_once('?') {
        Some((path, _)) => path,
        None => target,
    }
}

/// Collapses consecutive slashes: `//a/b//` becomes `/a/b/`.
fn normalize(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let mut last = '\0';
    for ch in path.chars() {
        if last == '/' && ch == '/' {
            continue;
        }
        out.push(ch);
        last = ch;
    }
    out
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|segment| !segment.is_empty())
}
