//! NNTP command builders and response field decoders
//!
//! Builders return bare command lines; the connection appends the CRLF
//! terminator when sending.

pub mod group;
pub mod over;

pub use group::{Group, GroupStatus, parse_group_lines, parse_group_status};
pub use over::{MessageOverview, parse_overview_line};

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::error::{NntpError, Result};

/// NNTP time format for NEWGROUPS / NEWNEWS arguments
const TIME_FORMAT_NEW: &str = "%Y%m%d %H%M%S";

/// NNTP time format in replies to the DATE command
const TIME_FORMAT_DATE: &str = "%Y%m%d%H%M%S";

/// Append a message-id or article number to a command when one is given;
/// an empty id addresses the current article.
pub fn with_id(cmd: &str, id: &str) -> String {
    if id.is_empty() {
        cmd.to_string()
    } else {
        format!("{cmd} {id}")
    }
}

/// Build AUTHINFO USER command
pub fn authinfo_user(username: &str) -> String {
    format!("AUTHINFO USER {username}")
}

/// Build AUTHINFO PASS command
pub fn authinfo_pass(password: &str) -> String {
    format!("AUTHINFO PASS {password}")
}

/// Build MODE READER command (RFC 3977 Section 5.3)
pub fn mode_reader() -> &'static str {
    "MODE READER"
}

/// Build GROUP command
pub fn group(newsgroup: &str) -> String {
    format!("GROUP {newsgroup}")
}

/// Build NEWGROUPS command (RFC 3977 Section 7.3)
///
/// Format: `NEWGROUPS yyyymmdd hhmmss GMT`
pub fn newgroups(since: DateTime<Utc>) -> String {
    format!("NEWGROUPS {} GMT", since.format(TIME_FORMAT_NEW))
}

/// Build NEWNEWS command (RFC 3977 Section 7.4)
pub fn newnews(newsgroup: &str, since: DateTime<Utc>) -> String {
    format!("NEWNEWS {} {} GMT", newsgroup, since.format(TIME_FORMAT_NEW))
}

/// Build OVER command for a closed numeric range (RFC 3977 Section 8.3)
pub fn over(begin: u64, end: u64) -> String {
    format!("OVER {begin}-{end}")
}

/// Build CAPABILITIES command (RFC 3977 Section 5.2)
pub fn capabilities() -> &'static str {
    "CAPABILITIES"
}

/// Build DATE command (RFC 3977 Section 7.1)
///
/// Reply: `111 yyyymmddhhmmss`
pub fn date() -> &'static str {
    "DATE"
}

/// Build HELP command (RFC 3977 Section 7.2)
pub fn help() -> &'static str {
    "HELP"
}

/// Build ARTICLE command; an empty id means the current article
pub fn article(id: &str) -> String {
    with_id("ARTICLE", id)
}

/// Build HEAD command; an empty id means the current article
pub fn head(id: &str) -> String {
    with_id("HEAD", id)
}

/// Build BODY command; an empty id means the current article
pub fn body(id: &str) -> String {
    with_id("BODY", id)
}

/// Build STAT command; an empty id means the current article
pub fn stat(id: &str) -> String {
    with_id("STAT", id)
}

/// Build NEXT command (RFC 3977 Section 6.1.4)
pub fn next() -> &'static str {
    "NEXT"
}

/// Build LAST command (RFC 3977 Section 6.1.3)
pub fn last() -> &'static str {
    "LAST"
}

/// Build POST command (RFC 3977 Section 6.3.1)
pub fn post() -> &'static str {
    "POST"
}

/// Build QUIT command
pub fn quit() -> &'static str {
    "QUIT"
}

/// Parse the text of a DATE reply (`yyyymmddhhmmss`, UTC)
pub fn parse_date_reply(text: &str) -> Result<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(text.trim(), TIME_FORMAT_DATE)
        .map(|t| t.and_utc())
        .map_err(|_| NntpError::InvalidResponse(format!("invalid time: {text}")))
}
