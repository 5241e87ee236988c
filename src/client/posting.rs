//! Article posting and session shutdown

use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tracing::debug;

use crate::article::Article;
use crate::commands;
use crate::error::Result;
use crate::response::codes;

use super::Connection;

/// Encode article text for the wire: CRLF line endings and a doubled
/// leading dot on any line that starts with one. The terminating `.`
/// line is not included.
pub(crate) fn dot_stuffed(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    for line in text.lines() {
        if line.starts_with('.') {
            out.push('.');
        }
        out.push_str(line);
        out.push_str("\r\n");
    }
    out
}

impl<S: AsyncRead + AsyncWrite + Unpin> Connection<S> {
    /// Post an article (RFC 3977 Section 6.3.1)
    ///
    /// # Errors
    ///
    /// - [`NntpError::UnexpectedReply`](crate::NntpError::UnexpectedReply) -
    ///   posting not permitted (440) or posting failed (441)
    pub async fn post(&mut self, article: &Article) -> Result<()> {
        self.raw_post(&article.serialize()).await
    }

    /// Post pre-rendered article text: header lines, a blank line, then
    /// the body, with `\n` or `\r\n` line endings. Dot-stuffing and the
    /// block terminator are applied here.
    pub async fn raw_post(&mut self, text: &str) -> Result<()> {
        self.command(3, commands::post()).await?;

        let payload = dot_stuffed(text);
        self.write_wire(payload.as_bytes()).await?;
        self.flush_wire().await?;

        self.command(codes::ARTICLE_POSTED, ".").await?;
        debug!("article posted");
        Ok(())
    }

    /// End the session with QUIT and close the transport.
    ///
    /// The connection is unusable afterwards; any further command
    /// returns [`NntpError::ConnectionClosed`](crate::NntpError::ConnectionClosed).
    pub async fn quit(&mut self) -> Result<()> {
        self.command(0, commands::quit()).await?;
        self.closed = true;
        self.stream.get_mut().shutdown().await?;
        debug!("connection closed");
        Ok(())
    }
}
