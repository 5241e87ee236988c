//! Group selection and group listing decoders

use crate::error::{NntpError, Result};

/// Information about a single newsgroup on the server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    /// Newsgroup name
    pub name: String,
    /// Highest message number
    pub high: u64,
    /// Lowest message number
    pub low: u64,
    /// Posting status:
    /// - "y" = posting allowed
    /// - "n" = posting not allowed
    /// - "m" = moderated
    /// - "=group.name" = alias to another group (RFC 6048)
    pub status: String,
}

/// Summary returned when a group is selected: article count and the
/// low/high message-number bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupStatus {
    /// Estimated number of articles in the group
    pub count: u64,
    /// Number of the first article
    pub low: u64,
    /// Number of the last article
    pub high: u64,
}

/// Decode the lines of a group listing (NEWGROUPS, LIST ACTIVE).
///
/// Each line has the form `name high low status`.
pub fn parse_group_lines(lines: &[String]) -> Result<Vec<Group>> {
    let mut groups = Vec::with_capacity(lines.len());
    for line in lines {
        let fields: Vec<&str> = line.trim().splitn(4, ' ').collect();
        if fields.len() < 4 {
            return Err(NntpError::InvalidResponse(format!(
                "short group info line: {line}"
            )));
        }
        let high = fields[1]
            .parse()
            .map_err(|_| NntpError::InvalidResponse(format!("bad number in line: {line}")))?;
        let low = fields[2]
            .parse()
            .map_err(|_| NntpError::InvalidResponse(format!("bad number in line: {line}")))?;
        groups.push(Group {
            name: fields[0].to_string(),
            high,
            low,
            status: fields[3].to_string(),
        });
    }
    Ok(groups)
}

/// Decode the text of a GROUP reply: `count low high [group-name]`.
///
/// At most 4 whitespace-delimited tokens are considered; the trailing
/// free-text comment is ignored.
pub fn parse_group_status(message: &str) -> Result<GroupStatus> {
    let fields: Vec<&str> = message.splitn(4, ' ').collect();
    if fields.len() < 3 {
        return Err(NntpError::InvalidResponse(format!(
            "bad group response: {message}"
        )));
    }

    let mut n = [0u64; 3];
    for (i, field) in fields.iter().take(3).enumerate() {
        n[i] = field
            .parse()
            .map_err(|_| NntpError::InvalidResponse(format!("bad group response: {message}")))?;
    }

    Ok(GroupStatus {
        count: n[0],
        low: n[1],
        high: n[2],
    })
}
