//! Article overview retrieval (OVER)

use tokio::io::{AsyncRead, AsyncWrite};
use tracing::debug;

use crate::commands::{self, MessageOverview, parse_overview_line};
use crate::error::Result;
use crate::response::codes;

use super::Connection;

impl<S: AsyncRead + AsyncWrite + Unpin> Connection<S> {
    /// Fetch overview rows for the closed message-number range
    /// `begin..=end` in the current group (RFC 3977 Section 8.3).
    ///
    /// A row the server sends malformed fails the whole call; overview
    /// data drives retrieval decisions, so a silently dropped row would
    /// be worse than an error.
    pub async fn overview(&mut self, begin: u64, end: u64) -> Result<Vec<MessageOverview>> {
        self.command(codes::OVERVIEW_INFO_FOLLOWS, &commands::over(begin, end))
            .await?;
        let lines = self.read_data_lines().await?;
        let mut rows = Vec::with_capacity(lines.len());
        for line in &lines {
            rows.push(parse_overview_line(line)?);
        }
        debug!("fetched {} overview rows for {}-{}", rows.len(), begin, end);
        Ok(rows)
    }
}
