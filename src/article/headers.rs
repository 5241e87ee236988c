//! Article header parsing (RFC 5536 syntax, RFC 3977 framing)

use crate::error::{NntpError, Result};

/// An ordered multi-map of article header fields.
///
/// First-seen order of field names is preserved, and repeated fields
/// (References, Xref and friends on some servers, Received on gatewayed
/// messages) keep every value in arrival order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    fields: Vec<(String, Vec<String>)>,
}

impl Headers {
    /// Create an empty header set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a value under `name`, canonicalizing the field name.
    ///
    /// If a field with the same canonical name exists, the value is
    /// appended to it; otherwise a new field is created at the end.
    pub fn add(&mut self, name: &str, value: impl Into<String>) {
        let name = canonical_name(name);
        let value = value.into();
        if let Some((_, values)) = self.fields.iter_mut().find(|(n, _)| *n == name) {
            values.push(value);
        } else {
            self.fields.push((name, vec![value]));
        }
    }

    /// Get the first value of a field, if present
    pub fn get(&self, name: &str) -> Option<&str> {
        let name = canonical_name(name);
        self.fields
            .iter()
            .find(|(n, _)| *n == name)
            .and_then(|(_, values)| values.first())
            .map(String::as_str)
    }

    /// Get all values of a field, in arrival order
    pub fn get_all(&self, name: &str) -> &[String] {
        let name = canonical_name(name);
        self.fields
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, values)| values.as_slice())
            .unwrap_or(&[])
    }

    /// Iterate over (name, values) pairs in first-seen order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.fields
            .iter()
            .map(|(n, v)| (n.as_str(), v.as_slice()))
    }

    /// Number of distinct field names
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True if no fields are present
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Canonicalize a header field name: the first letter and every letter
/// following a hyphen is uppercased, the rest lowercased. `message-ID`
/// becomes `Message-Id`.
///
/// Names containing non-ASCII or control characters are left untouched.
pub fn canonical_name(name: &str) -> String {
    if !name.bytes().all(|b| b.is_ascii_graphic()) {
        return name.to_string();
    }
    let mut out = String::with_capacity(name.len());
    let mut upper = true;
    for c in name.chars() {
        if upper {
            out.extend(c.to_uppercase());
        } else {
            out.extend(c.to_lowercase());
        }
        upper = c == '-';
    }
    out
}

/// Incremental parser for a header block.
///
/// Feed it decoded lines one at a time; it handles folded continuation
/// lines and reports completion when the blank separator line arrives.
/// The caller owns the framing, so the same parser serves both full
/// articles (blank line separates headers from body) and HEAD replies
/// (the block just ends).
#[derive(Debug, Default)]
pub struct HeaderParser {
    headers: Headers,
    // (field index, value index) of the most recently added value,
    // the target for folded continuation lines
    current: Option<(usize, usize)>,
}

impl HeaderParser {
    /// Create a parser with no accumulated state
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume one decoded line. Returns `Ok(true)` when the blank
    /// separator line ends the block, `Ok(false)` while more lines are
    /// expected.
    pub fn feed_line(&mut self, line: &str) -> Result<bool> {
        if line.is_empty() {
            return Ok(true);
        }

        if line.starts_with(' ') || line.starts_with('\t') {
            // Folded continuation: logically part of the previous value,
            // joined with a single space
            let Some((field, value)) = self.current else {
                return Err(NntpError::MalformedHeader(line.to_string()));
            };
            let target = &mut self.headers.fields[field].1[value];
            target.push(' ');
            target.push_str(line.trim_start());
            return Ok(false);
        }

        let Some((name, value)) = line.split_once(':') else {
            return Err(NntpError::MalformedHeader(line.to_string()));
        };
        if name.is_empty() || name.contains(' ') || name.contains('\t') {
            return Err(NntpError::MalformedHeader(line.to_string()));
        }

        let name = canonical_name(name);
        let value = value.trim_start().to_string();
        if let Some(field) = self.headers.fields.iter().position(|(n, _)| *n == name) {
            self.headers.fields[field].1.push(value);
            self.current = Some((field, self.headers.fields[field].1.len() - 1));
        } else {
            self.headers.fields.push((name, vec![value]));
            self.current = Some((self.headers.fields.len() - 1, 0));
        }
        Ok(false)
    }

    /// Finish parsing and return the accumulated headers.
    ///
    /// Valid whether or not the blank terminator was seen; the caller
    /// decides if early end-of-input is an error.
    pub fn into_headers(self) -> Headers {
        self.headers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(lines: &[&str]) -> Headers {
        let mut parser = HeaderParser::new();
        for line in lines {
            parser.feed_line(line).unwrap();
        }
        parser.into_headers()
    }

    #[test]
    fn test_canonical_name() {
        assert_eq!(canonical_name("subject"), "Subject");
        assert_eq!(canonical_name("message-ID"), "Message-Id");
        assert_eq!(canonical_name("MIME-version"), "Mime-Version");
        assert_eq!(canonical_name("X-No-Archive"), "X-No-Archive");
    }

    #[test]
    fn test_simple_headers() {
        let headers = parse(&[
            "From: user@example.com",
            "Subject: hello",
            "Message-ID: <1@example.com>",
        ]);
        assert_eq!(headers.get("from"), Some("user@example.com"));
        assert_eq!(headers.get("Subject"), Some("hello"));
        assert_eq!(headers.get("MESSAGE-ID"), Some("<1@example.com>"));
        assert_eq!(headers.get("Path"), None);
    }

    #[test]
    fn test_folded_value() {
        let headers = parse(&[
            "References: <1@example.com>",
            "\t<2@example.com>",
            "  <3@example.com>",
        ]);
        assert_eq!(
            headers.get("References"),
            Some("<1@example.com> <2@example.com> <3@example.com>")
        );
    }

    #[test]
    fn test_duplicate_fields_keep_all_values() {
        let headers = parse(&[
            "Received: from a",
            "Subject: hi",
            "Received: from b",
        ]);
        assert_eq!(headers.get("Received"), Some("from a"));
        assert_eq!(headers.get_all("Received"), &["from a", "from b"]);
        assert_eq!(headers.len(), 2);
        // First-seen order of names is preserved
        let names: Vec<&str> = headers.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["Received", "Subject"]);
    }

    #[test]
    fn test_continuation_folds_into_latest_duplicate() {
        let headers = parse(&[
            "Received: from a",
            "Received: from b",
            " by relay",
        ]);
        assert_eq!(headers.get_all("Received"), &["from a", "from b by relay"]);
    }

    #[test]
    fn test_blank_line_ends_block() {
        let mut parser = HeaderParser::new();
        assert!(!parser.feed_line("Subject: hi").unwrap());
        assert!(parser.feed_line("").unwrap());
    }

    #[test]
    fn test_leading_continuation_is_malformed() {
        let mut parser = HeaderParser::new();
        assert!(matches!(
            parser.feed_line(" dangling"),
            Err(NntpError::MalformedHeader(_))
        ));
    }

    #[test]
    fn test_missing_colon_is_malformed() {
        let mut parser = HeaderParser::new();
        assert!(matches!(
            parser.feed_line("this is not a header"),
            Err(NntpError::MalformedHeader(_))
        ));
    }

    #[test]
    fn test_name_with_space_is_malformed() {
        let mut parser = HeaderParser::new();
        assert!(matches!(
            parser.feed_line("Bad Name: value"),
            Err(NntpError::MalformedHeader(_))
        ));
    }

    #[test]
    fn test_empty_value() {
        let headers = parse(&["X-Empty:"]);
        assert_eq!(headers.get("X-Empty"), Some(""));
    }
}
