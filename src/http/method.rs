use std::fmt;

/// HTTP request method.
///
/// [`Method::Any`] is the wildcard used by the router as a fallback entry;
/// on the wire it never appears in a valid request line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Head,
    Options,
    Any,
}

impl Method {
    /// Parses a method token, case-insensitively. `"*"` parses as
    /// [`Method::Any`]; unknown tokens yield `None`.
    pub fn parse(token: &str) -> Option<Method> {
        let method = match token {
            "*" => Method::Any,
            _ if token.eq_ignore_ascii_case("GET") => Method::Get,
            _ if token.eq_ignore_ascii_case("POST") => Method::Post,
            _ if token.eq_ignore_ascii_case("PUT") => Method::Put,
            _ if token.eq_ignore_ascii_case("DELETE") => Method::Delete,
            _ if token.eq_ignore_ascii_case("PATCH") => Method::Patch,
            _ if token.eq_ignore_ascii_case("HEAD") => Method::Head,
            _ if token.eq_ignore_ascii_case("OPTIONS") => Method::Options,
            _ => return None,
        };
        Some(method)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
            Method::Patch => "PATCH",
            Method::Head => "HEAD",
            Method::Options => "OPTIONS",
            Method::Any => "*",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
