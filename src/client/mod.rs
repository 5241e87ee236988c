//! NNTP client connection and protocol engine

mod articles;
mod auth;
mod body;
mod connection;
mod group_ops;
mod io;
mod listing;
mod metadata;
mod posting;
mod server;

pub use articles::{ArticleStat, FetchedArticle};
pub use body::BodyReader;
pub use connection::MaybeTlsStream;

use std::fmt;

use tokio::io::{AsyncRead, AsyncWrite, BufReader};
use tracing::debug;

/// Async NNTP connection over plain TCP or TLS
///
/// Generic over the transport so the protocol engine can be driven by
/// any async byte stream; [`Connection::connect`] produces the usual
/// TCP/TLS flavor.
///
/// # Example
///
/// ```no_run
/// use newswire::{Connection, ServerConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = ServerConfig::tls("news.example.com", "user", "pass");
/// let mut conn = Connection::connect(&config).await?;
/// conn.authenticate(&config.username, &config.password).await?;
///
/// let status = conn.group("misc.test").await?;
/// println!("group has {} articles", status.count);
/// # Ok(())
/// # }
/// ```
#[must_use]
pub struct Connection<S> {
    /// Buffered transport (both reader and writer)
    stream: BufReader<S>,
    /// A multi-line data block from a previous command has not been
    /// fully consumed yet
    body_pending: bool,
    /// QUIT was sent or the peer closed the stream
    closed: bool,
}

impl<S: AsyncRead + AsyncWrite + Unpin> Connection<S> {
    /// Check if the connection has been closed (by QUIT or by the peer)
    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl<S> fmt::Debug for Connection<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("body_pending", &self.body_pending)
            .field("closed", &self.closed)
            .finish_non_exhaustive()
    }
}

impl<S> Drop for Connection<S> {
    fn drop(&mut self) {
        debug!("NNTP connection dropped");
    }
}
