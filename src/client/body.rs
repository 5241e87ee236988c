//! Lazy line-at-a-time access to multi-line data blocks

use std::fmt;

use tokio::io::{AsyncRead, AsyncWrite};

use crate::error::Result;

use super::Connection;

/// Streaming reader for one multi-line data block.
///
/// Yields decoded lines (dot-unstuffed, line endings stripped) until
/// the `.` terminator, which is consumed and never surfaced. Borrows
/// the connection mutably, so no command can be sent while a block is
/// being read; a reader dropped early leaves the remainder on the wire
/// and the connection drains it before the next command.
#[must_use]
pub struct BodyReader<'a, S> {
    conn: &'a mut Connection<S>,
    eof: bool,
}

impl<'a, S: AsyncRead + AsyncWrite + Unpin> BodyReader<'a, S> {
    pub(super) fn new(conn: &'a mut Connection<S>) -> Self {
        conn.body_pending = true;
        Self { conn, eof: false }
    }

    /// Read the next decoded line, or `None` at the end of the block
    pub async fn read_line(&mut self) -> Result<Option<String>> {
        if self.eof {
            return Ok(None);
        }
        let line = self.conn.read_wire_line().await?;
        if line == "." {
            self.eof = true;
            self.conn.body_pending = false;
            return Ok(None);
        }
        if let Some(unstuffed) = line.strip_prefix("..") {
            return Ok(Some(format!(".{unstuffed}")));
        }
        Ok(Some(line))
    }

    /// Collect all remaining lines of the block
    pub async fn collect_lines(&mut self) -> Result<Vec<String>> {
        let mut lines = Vec::new();
        while let Some(line) = self.read_line().await? {
            lines.push(line);
        }
        Ok(lines)
    }

    /// Collect the remaining block as one string, each line terminated
    /// with `\n`
    pub async fn read_to_string(&mut self) -> Result<String> {
        let mut text = String::new();
        while let Some(line) = self.read_line().await? {
            text.push_str(&line);
            text.push('\n');
        }
        Ok(text)
    }

    /// Read and discard the remainder of the block
    pub async fn discard(&mut self) -> Result<()> {
        while self.read_line().await?.is_some() {}
        Ok(())
    }
}

impl<S> fmt::Debug for BodyReader<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BodyReader")
            .field("eof", &self.eof)
            .finish_non_exhaustive()
    }
}

impl<S: AsyncRead + AsyncWrite + Unpin> Connection<S> {
    /// Start reading a data block that the server has announced
    pub(super) fn body_reader(&mut self) -> BodyReader<'_, S> {
        BodyReader::new(self)
    }
}
