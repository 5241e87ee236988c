//! Article representation: headers plus optional body

pub mod headers;

pub use headers::{HeaderParser, Headers, canonical_name};

use std::fmt;

/// A fully-owned news article.
///
/// Fetched articles hold the complete decoded body; articles built for
/// posting may omit the body entirely.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Article {
    /// Header fields in first-seen order
    pub headers: Headers,
    /// Decoded body text, one `\n`-terminated line per article line
    pub body: Option<String>,
}

impl Article {
    /// Create an article with the given headers and no body
    pub fn new(headers: Headers) -> Self {
        Self {
            headers,
            body: None,
        }
    }

    /// The Message-Id header value, if present
    pub fn message_id(&self) -> Option<&str> {
        self.headers.get("Message-Id")
    }

    /// Render the article as text suitable for posting: one header line
    /// per value, a blank separator if a body is present, then the body.
    /// Lines use bare `\n`; the wire encoder owns CRLF and dot-stuffing.
    pub fn serialize(&self) -> String {
        let mut out = String::new();
        for (name, values) in self.headers.iter() {
            for value in values {
                out.push_str(name);
                out.push_str(": ");
                out.push_str(value);
                out.push('\n');
            }
        }
        if let Some(body) = &self.body {
            out.push('\n');
            out.push_str(body);
        }
        out
    }
}

impl fmt::Display for Article {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[NNTP article {}]",
            self.message_id().unwrap_or("<unknown>")
        )
    }
}
