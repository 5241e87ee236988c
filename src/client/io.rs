//! Low-level protocol I/O: command transmission, status-line reads,
//! and the pending-data-block drain that keeps the session in lockstep

use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt};
use tracing::trace;

use crate::error::{NntpError, Result};
use crate::response::{Status, code_matches, parse_status_line};

use super::Connection;

impl<S: AsyncRead + AsyncWrite + Unpin> Connection<S> {
    /// Send one command line and read the status reply, checking it
    /// against `expected` with magnitude wildcard matching (see
    /// [`code_matches`]).
    ///
    /// If a multi-line block from a previous command is still pending
    /// it is drained first, so a half-read article can never corrupt
    /// the framing of the next exchange.
    pub(super) async fn command(&mut self, expected: u16, line: &str) -> Result<Status> {
        if self.closed {
            return Err(NntpError::ConnectionClosed);
        }
        if self.body_pending {
            self.drain_pending_block().await?;
        }

        trace!("sending command: {}", line);
        self.write_wire(line.as_bytes()).await?;
        self.write_wire(b"\r\n").await?;
        self.flush_wire().await?;

        let status = self.read_status_line().await?;
        if !code_matches(status.code, expected) {
            return Err(NntpError::UnexpectedReply {
                code: status.code,
                message: status.message,
            });
        }
        Ok(status)
    }

    /// Write raw bytes to the transport. Any write failure is fatal
    /// and closes the connection, like the read path.
    pub(super) async fn write_wire(&mut self, bytes: &[u8]) -> Result<()> {
        if let Err(e) = self.stream.get_mut().write_all(bytes).await {
            self.closed = true;
            return Err(e.into());
        }
        Ok(())
    }

    /// Flush the transport, closing the connection on failure
    pub(super) async fn flush_wire(&mut self) -> Result<()> {
        if let Err(e) = self.stream.get_mut().flush().await {
            self.closed = true;
            return Err(e.into());
        }
        Ok(())
    }

    /// Read and parse one status line
    pub(super) async fn read_status_line(&mut self) -> Result<Status> {
        let line = self.read_wire_line().await?;
        trace!("received: {}", line);
        parse_status_line(&line)
    }

    /// Read one raw line off the wire, stripping the CRLF terminator.
    ///
    /// Only the trailing line ending is removed; other whitespace is
    /// significant (folded header lines start with it).
    pub(super) async fn read_wire_line(&mut self) -> Result<String> {
        let mut bytes = Vec::with_capacity(512);
        match self.stream.read_until(b'\n', &mut bytes).await {
            Ok(0) => {
                self.closed = true;
                return Err(NntpError::ConnectionClosed);
            }
            Ok(_) => {}
            Err(e) => {
                self.closed = true;
                return Err(e.into());
            }
        }

        let line = String::from_utf8_lossy(&bytes);
        let line = line
            .strip_suffix("\r\n")
            .or_else(|| line.strip_suffix('\n'))
            .unwrap_or(&line);
        Ok(line.to_string())
    }

    /// Read the decoded lines of a multi-line data block, eagerly, up
    /// to and including the `.` terminator.
    pub(super) async fn read_data_lines(&mut self) -> Result<Vec<String>> {
        let mut reader = self.body_reader();
        reader.collect_lines().await
    }

    /// Discard an unconsumed multi-line block so the stream is aligned
    /// on a reply boundary again.
    async fn drain_pending_block(&mut self) -> Result<()> {
        trace!("draining unconsumed data block");
        loop {
            let line = self.read_wire_line().await?;
            if line == "." {
                self.body_pending = false;
                return Ok(());
            }
        }
    }
}
