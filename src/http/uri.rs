use std::collections::HashMap;

/// A classified request target, per RFC 7230 §5.3.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestTarget {
    /// `path ["?" query]`, the form ordinary requests use. The query is
    /// split into `key=value` pairs; pairs without a `=` are ignored.
    Origin {
        path: String,
        params: HashMap<String, String>,
    },
    /// A full URI including a scheme, e.g.
    /// `http://www.example.org/pub/WWW/TheProject.html`.
    Absolute { path: String },
    /// `host:port`, only used by CONNECT.
    Authority { path: String },
    /// `*`, only used by server-wide OPTIONS.
    Asterisk,
    /// Anything else, including an empty target and a query with no valid
    /// pairs.
    Invalid,
}

impl RequestTarget {
    pub fn parse(target: &str) -> RequestTarget {
        if target.is_empty() {
            return RequestTarget::Invalid;
        }
        if target == "*" {
            return RequestTarget::Asterisk;
        }
        if !target.contains("://") && !target.contains('/') {
            return RequestTarget::Authority {
                path: target.to_string(),
            };
        }
        if target.contains("://") {
            return RequestTarget::Absolute {
                path: target.to_string(),
            };
        }

        let Some((path, query)) = target.split_once('?') else {
            return RequestTarget::Origin {
                path: target.to_string(),
                params: HashMap::new(),
            };
        };
        let params: HashMap<String, String> = query
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        // a '?' is a promise of parameters; none means the target is broken.
        if params.is_empty() {
            return RequestTarget::Invalid;
        }
        RequestTarget::Origin {
            path: path.to_string(),
            params,
        }
    }

    /// The path component, when the form has one.
    pub fn path(&self) -> Option<&str> {
        match self {
            RequestTarget::Origin { path, .. }
            | RequestTarget::Absolute { path }
            | RequestTarget::Authority { path } => Some(path),
            RequestTarget::Asterisk | RequestTarget::Invalid => None,
        }
    }

    /// A query parameter by name, for origin-form targets.
    pub fn param(&self, name: &str) -> Option<&str> {
        match self {
            RequestTarget::Origin { params, .. } => params.get(name).map(String::as_str),
            _ => None,
        }
    }
}
