//! Group selection and group listing

use tokio::io::{AsyncRead, AsyncWrite};
use tracing::debug;

use crate::commands::{self, Group, GroupStatus, parse_group_lines, parse_group_status};
use crate::error::Result;
use crate::response::codes;

use super::Connection;

impl<S: AsyncRead + AsyncWrite + Unpin> Connection<S> {
    /// Select a newsgroup as the current group (RFC 3977 Section 6.1.1)
    ///
    /// # Errors
    ///
    /// - [`NntpError::UnexpectedReply`](crate::NntpError::UnexpectedReply) -
    ///   no such group (411)
    pub async fn group(&mut self, name: &str) -> Result<GroupStatus> {
        let status = self
            .command(codes::GROUP_SELECTED, &commands::group(name))
            .await?;
        let group = parse_group_status(&status.message)?;
        debug!(
            "selected group {} ({} articles, {}-{})",
            name, group.count, group.low, group.high
        );
        Ok(group)
    }

    /// List all newsgroups the server carries (`LIST`, RFC 3977
    /// Section 7.6.3). Can return a very large result on full-feed
    /// servers.
    pub async fn list(&mut self) -> Result<Vec<Group>> {
        self.command(codes::LIST_INFORMATION_FOLLOWS, "LIST").await?;
        let lines = self.read_data_lines().await?;
        parse_group_lines(&lines)
    }

    /// List newsgroups with an explicit LIST keyword and optional
    /// argument, e.g. `list_with("ACTIVE", Some("comp.lang.*"))`.
    ///
    /// Only keywords whose reply uses the `name high low status` form
    /// can be decoded here.
    pub async fn list_with(&mut self, keyword: &str, argument: Option<&str>) -> Result<Vec<Group>> {
        let line = match argument {
            Some(arg) => format!("LIST {keyword} {arg}"),
            None => format!("LIST {keyword}"),
        };
        self.command(codes::LIST_INFORMATION_FOLLOWS, &line).await?;
        let lines = self.read_data_lines().await?;
        parse_group_lines(&lines)
    }
}
