//! Server-level queries: MODE READER, CAPABILITIES, DATE, HELP

use chrono::{DateTime, Utc};
use tokio::io::{AsyncRead, AsyncWrite};
use tracing::debug;

use crate::commands;
use crate::error::Result;
use crate::response::codes;

use super::Connection;
use super::body::BodyReader;

impl<S: AsyncRead + AsyncWrite + Unpin> Connection<S> {
    /// Switch the server into reader mode (RFC 3977 Section 5.3).
    ///
    /// Accepts both 200 (posting allowed) and 201 (no posting);
    /// returns whether posting is allowed.
    pub async fn mode_reader(&mut self) -> Result<bool> {
        let status = self.command(20, commands::mode_reader()).await?;
        let posting_allowed = status.code == codes::READY_POSTING_ALLOWED;
        debug!("reader mode enabled, posting allowed: {}", posting_allowed);
        Ok(posting_allowed)
    }

    /// Fetch the server's capability list (RFC 3977 Section 5.2), one
    /// capability label per line
    pub async fn capabilities(&mut self) -> Result<Vec<String>> {
        self.command(codes::CAPABILITY_LIST, commands::capabilities())
            .await?;
        self.read_data_lines().await
    }

    /// Query the server's current UTC time (RFC 3977 Section 7.1)
    pub async fn date(&mut self) -> Result<DateTime<Utc>> {
        let status = self.command(codes::SERVER_DATE, commands::date()).await?;
        commands::parse_date_reply(&status.message)
    }

    /// Fetch the server's help text as a streaming reader
    /// (RFC 3977 Section 7.2)
    pub async fn help(&mut self) -> Result<BodyReader<'_, S>> {
        self.command(codes::HELP_TEXT_FOLLOWS, commands::help())
            .await?;
        Ok(self.body_reader())
    }
}
