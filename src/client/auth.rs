//! AUTHINFO USER/PASS authentication (RFC 4643)

use tokio::io::{AsyncRead, AsyncWrite};
use tracing::debug;

use crate::commands;
use crate::error::{NntpError, Result};

use super::Connection;

impl<S: AsyncRead + AsyncWrite + Unpin> Connection<S> {
    /// Authenticate with AUTHINFO USER/PASS.
    ///
    /// The password is sent only if the server answers the username
    /// with a 3xx continuation; a server that accepts the username
    /// alone never sees the password.
    ///
    /// # Errors
    ///
    /// - [`NntpError::UnexpectedReply`] - credentials rejected (481)
    ///   or the exchange took an unexpected turn
    pub async fn authenticate(&mut self, username: &str, password: &str) -> Result<()> {
        debug!("authenticating as {}", username);
        match self.command(2, &commands::authinfo_user(username)).await {
            Ok(_) => {
                // Accepted on the username alone
                Ok(())
            }
            Err(NntpError::UnexpectedReply { code, .. }) if code / 100 == 3 => {
                self.command(2, &commands::authinfo_pass(password)).await?;
                debug!("authentication successful");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }
}
