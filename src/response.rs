//! NNTP status replies: parsing and expected-code matching

use crate::error::{NntpError, Result};

/// A single status reply: 3-digit code plus trailing text.
///
/// Produced once per command and not retained by the connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    /// 3-digit NNTP reply code
    pub code: u16,
    /// Free text after the code
    pub message: String,
}

impl Status {
    /// Check if the reply indicates success (2xx)
    pub fn is_success(&self) -> bool {
        self.code >= 200 && self.code < 300
    }

    /// Check if the reply indicates continuation (3xx)
    pub fn is_continuation(&self) -> bool {
        self.code >= 300 && self.code < 400
    }

    /// Check if the reply indicates an error (4xx or 5xx)
    pub fn is_error(&self) -> bool {
        self.code >= 400
    }
}

/// Parse a status line of the form `DDD text`.
///
/// The line must be at least 4 characters with a space as the 4th
/// character, and the first three characters must be ASCII digits.
pub fn parse_status_line(line: &str) -> Result<Status> {
    let bytes = line.as_bytes();
    if bytes.len() < 4 || bytes[3] != b' ' {
        return Err(NntpError::ShortStatusLine(line.to_string()));
    }
    if !bytes[..3].iter().all(u8::is_ascii_digit) {
        return Err(NntpError::InvalidStatusCode(line.to_string()));
    }

    // Safe to slice: the first three bytes are ASCII digits
    let code = line[..3]
        .parse::<u16>()
        .map_err(|_| NntpError::InvalidStatusCode(line.to_string()))?;

    Ok(Status {
        code,
        message: line[4..].to_string(),
    })
}

/// Magnitude-based wildcard matching for expected reply codes.
///
/// - `0` accepts any code
/// - `1..=9` matches the hundreds digit (`2` accepts 200-299)
/// - `10..=99` matches the tens-and-up digits (`20` accepts 200-209)
/// - `100..=999` requires an exact match
///
/// Server compatibility depends on these exact tri-level semantics.
pub fn code_matches(code: u16, expected: u16) -> bool {
    match expected {
        0 => true,
        1..=9 => code / 100 == expected,
        10..=99 => code / 10 == expected,
        _ => code == expected,
    }
}

/// NNTP reply codes (RFC 3977)
pub mod codes {
    /// Help text follows
    pub const HELP_TEXT_FOLLOWS: u16 = 100;
    /// Capability list follows (RFC 3977 Section 5.2)
    pub const CAPABILITY_LIST: u16 = 101;
    /// Server date/time (RFC 3977 Section 7.1)
    pub const SERVER_DATE: u16 = 111;

    /// Server ready, posting allowed
    pub const READY_POSTING_ALLOWED: u16 = 200;
    /// Server ready, no posting
    pub const READY_NO_POSTING: u16 = 201;
    /// Closing connection
    pub const CLOSING_CONNECTION: u16 = 205;
    /// Group selected
    pub const GROUP_SELECTED: u16 = 211;
    /// List of newsgroups follows (RFC 3977 Section 7.6)
    pub const LIST_INFORMATION_FOLLOWS: u16 = 215;
    /// Article follows
    pub const ARTICLE_FOLLOWS: u16 = 220;
    /// Head follows
    pub const HEAD_FOLLOWS: u16 = 221;
    /// Body follows
    pub const BODY_FOLLOWS: u16 = 222;
    /// Article stat
    pub const ARTICLE_STAT: u16 = 223;
    /// Overview information follows
    pub const OVERVIEW_INFO_FOLLOWS: u16 = 224;
    /// List of new articles follows (RFC 3977 Section 7.4)
    pub const NEW_ARTICLE_LIST_FOLLOWS: u16 = 230;
    /// List of new newsgroups follows (RFC 3977 Section 7.3)
    pub const NEW_NEWSGROUPS_FOLLOW: u16 = 231;
    /// Article posted successfully (RFC 3977 Section 6.3.1)
    pub const ARTICLE_POSTED: u16 = 240;
    /// Authentication accepted
    pub const AUTH_ACCEPTED: u16 = 281;

    /// Send article to be posted
    pub const SEND_ARTICLE: u16 = 340;
    /// Continue with authentication
    pub const AUTH_CONTINUE: u16 = 381;

    /// No such newsgroup
    pub const NO_SUCH_GROUP: u16 = 411;
    /// No newsgroup selected
    pub const NO_GROUP_SELECTED: u16 = 412;
    /// No current article
    pub const NO_CURRENT_ARTICLE: u16 = 420;
    /// No such article in this group
    pub const NO_SUCH_ARTICLE_NUMBER: u16 = 423;
    /// No such article by message-id
    pub const NO_SUCH_ARTICLE_ID: u16 = 430;
    /// Posting not permitted (RFC 3977 Section 6.3.1)
    pub const POSTING_NOT_PERMITTED: u16 = 440;
    /// Posting failed (RFC 3977 Section 6.3.1)
    pub const POSTING_FAILED: u16 = 441;
    /// Authentication rejected
    pub const AUTH_REJECTED: u16 = 481;
}
