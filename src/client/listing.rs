//! Incremental feeds: new groups and new articles since a timestamp

use chrono::{DateTime, Utc};
use tokio::io::{AsyncRead, AsyncWrite};
use tracing::debug;

use crate::commands::{self, Group, parse_group_lines};
use crate::error::Result;
use crate::response::codes;

use super::Connection;

impl<S: AsyncRead + AsyncWrite + Unpin> Connection<S> {
    /// List newsgroups created after `since` (RFC 3977 Section 7.3)
    pub async fn new_groups(&mut self, since: DateTime<Utc>) -> Result<Vec<Group>> {
        self.command(codes::NEW_NEWSGROUPS_FOLLOW, &commands::newgroups(since))
            .await?;
        let lines = self.read_data_lines().await?;
        let groups = parse_group_lines(&lines)?;
        debug!("{} new groups since {}", groups.len(), since);
        Ok(groups)
    }

    /// List message-ids of articles posted to `group` after `since`
    /// (RFC 3977 Section 7.4). `group` may be a wildmat pattern.
    ///
    /// The result is sorted and deduplicated; servers report an article
    /// once per group it was crossposted to.
    pub async fn new_news(&mut self, group: &str, since: DateTime<Utc>) -> Result<Vec<String>> {
        self.command(
            codes::NEW_ARTICLE_LIST_FOLLOWS,
            &commands::newnews(group, since),
        )
        .await?;
        let mut ids = self.read_data_lines().await?;
        ids.sort_unstable();
        ids.dedup();
        debug!("{} new articles in {} since {}", ids.len(), group, since);
        Ok(ids)
    }
}
