//! OVER command and overview row decoding (RFC 3977 Section 8.3)

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::error::{NntpError, Result};

/// One row of an OVER reply: a tab-delimited summary of one article's
/// key header fields plus the `:bytes` and `:lines` metadata items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageOverview {
    /// Message number in the group
    pub number: u64,
    /// Subject header value; empty if the header is missing
    pub subject: String,
    /// From header value; empty if the header is missing
    pub from: String,
    /// Parsed Date header value; `None` if missing or unparseable
    pub date: Option<DateTime<Utc>>,
    /// Message-Id header value; empty if the header is missing
    pub message_id: String,
    /// Message-ids of referenced messages, in order
    pub references: Vec<String>,
    /// Message size in bytes (`:bytes` metadata item)
    pub bytes: u64,
    /// Message size in lines (`:lines` metadata item)
    pub lines: u64,
    /// Any additional fields returned by the server, verbatim and in order
    pub extra: Vec<String>,
}

/// Decode one overview line into its at most 9 tab-separated fields.
///
/// Fewer than 8 fields, or non-numeric number/bytes/lines fields, are
/// protocol errors. An unparseable date is not: the field in the message
/// may be broken or missing, so it degrades to `None`.
pub fn parse_overview_line(line: &str) -> Result<MessageOverview> {
    let fields: Vec<&str> = line.trim().splitn(9, '\t').collect();
    if fields.len() < 8 {
        return Err(NntpError::InvalidResponse(format!(
            "short overview line ({} fields): {line}",
            fields.len()
        )));
    }

    let number = fields[0]
        .parse()
        .map_err(|_| {
            NntpError::InvalidResponse(format!("bad message number '{}' in line: {line}", fields[0]))
        })?;
    let bytes = fields[6]
        .parse()
        .map_err(|_| {
            NntpError::InvalidResponse(format!("bad byte count '{}' in line: {line}", fields[6]))
        })?;
    let lines = fields[7]
        .parse()
        .map_err(|_| {
            NntpError::InvalidResponse(format!("bad line count '{}' in line: {line}", fields[7]))
        })?;

    // Message-ids contain no spaces, so splitting on single spaces is safe.
    let references = fields[5]
        .split(' ')
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect();

    Ok(MessageOverview {
        number,
        subject: fields[1].to_string(),
        from: fields[2].to_string(),
        date: parse_article_date(fields[3]),
        message_id: fields[4].to_string(),
        references,
        bytes,
        lines,
        extra: fields[8..].iter().map(|s| s.to_string()).collect(),
    })
}

/// Parse a Date header value, trying RFC 2822 first and then the common
/// zone-less variant. Returns `None` when nothing matches.
fn parse_article_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(t) = DateTime::parse_from_rfc2822(value) {
        return Some(t.with_timezone(&Utc));
    }
    // Some servers omit the zone; treat those timestamps as UTC.
    for format in ["%d %b %Y %H:%M:%S", "%a, %d %b %Y %H:%M:%S"] {
        if let Ok(t) = NaiveDateTime::parse_from_str(value, format) {
            return Some(t.and_utc());
        }
    }
    None
}
