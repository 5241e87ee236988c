//! Article retrieval: ARTICLE, HEAD, BODY, STAT, NEXT, LAST

use std::fmt;

use tokio::io::{AsyncRead, AsyncWrite};

use crate::article::{Article, HeaderParser, Headers};
use crate::commands;
use crate::error::{NntpError, Result};
use crate::response::codes;

use super::Connection;
use super::body::BodyReader;

/// Article identity from a STAT, NEXT or LAST reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleStat {
    /// Message number in the current group; 0 when addressed by
    /// message-id across groups
    pub number: u64,
    /// Message-id, angle brackets included
    pub message_id: String,
}

/// An article fetched with headers parsed and the body left on the
/// wire for streaming.
#[must_use]
pub struct FetchedArticle<'a, S> {
    /// Parsed header fields
    pub headers: Headers,
    /// The undelivered body lines
    pub body: BodyReader<'a, S>,
}

impl<S> fmt::Debug for FetchedArticle<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FetchedArticle")
            .field("headers", &self.headers)
            .field("body", &self.body)
            .finish()
    }
}

impl<S: AsyncRead + AsyncWrite + Unpin> FetchedArticle<'_, S> {
    /// Drain the body and convert into an owned [`Article`]
    pub async fn into_article(mut self) -> Result<Article> {
        let body = self.body.read_to_string().await?;
        Ok(Article {
            headers: self.headers,
            body: Some(body),
        })
    }
}

/// Decode the text of a 223 reply: `number <message-id> [comment]`
fn parse_stat_reply(message: &str) -> Result<ArticleStat> {
    let fields: Vec<&str> = message.splitn(3, ' ').collect();
    if fields.len() < 2 {
        return Err(NntpError::InvalidResponse(format!(
            "bad article status: {message}"
        )));
    }
    let number = fields[0]
        .parse()
        .map_err(|_| NntpError::InvalidResponse(format!("bad article status: {message}")))?;
    Ok(ArticleStat {
        number,
        message_id: fields[1].to_string(),
    })
}

impl<S: AsyncRead + AsyncWrite + Unpin> Connection<S> {
    /// Fetch an article, parsing the headers and leaving the body for
    /// streaming (RFC 3977 Section 6.2.1). An empty `id` addresses the
    /// current article.
    ///
    /// # Errors
    ///
    /// - [`NntpError::UnexpectedReply`] - no such article (420, 423, 430)
    /// - [`NntpError::UnexpectedHeaderEof`] - block ended before the
    ///   blank line separating headers from body
    pub async fn article(&mut self, id: &str) -> Result<FetchedArticle<'_, S>> {
        self.command(codes::ARTICLE_FOLLOWS, &commands::article(id))
            .await?;
        let mut body = self.body_reader();

        let mut parser = HeaderParser::new();
        loop {
            match body.read_line().await? {
                Some(line) => {
                    if parser.feed_line(&line)? {
                        break;
                    }
                }
                // The terminator arrived before the header/body separator
                None => return Err(NntpError::UnexpectedHeaderEof),
            }
        }

        Ok(FetchedArticle {
            headers: parser.into_headers(),
            body,
        })
    }

    /// Fetch only the headers of an article (RFC 3977 Section 6.2.2).
    ///
    /// A HEAD block carries no body, so the block simply ending is the
    /// normal termination; no blank line is required.
    pub async fn head(&mut self, id: &str) -> Result<Headers> {
        self.command(codes::HEAD_FOLLOWS, &commands::head(id)).await?;
        let mut reader = self.body_reader();

        let mut parser = HeaderParser::new();
        while let Some(line) = reader.read_line().await? {
            if parser.feed_line(&line)? {
                break;
            }
        }
        // Some servers append a blank line; drop whatever follows it
        reader.discard().await?;

        Ok(parser.into_headers())
    }

    /// Fetch only the body of an article as a streaming reader
    /// (RFC 3977 Section 6.2.3)
    pub async fn body(&mut self, id: &str) -> Result<BodyReader<'_, S>> {
        self.command(codes::BODY_FOLLOWS, &commands::body(id)).await?;
        Ok(self.body_reader())
    }

    /// Fetch a complete article as decoded text, headers and body
    pub async fn article_text(&mut self, id: &str) -> Result<String> {
        self.command(codes::ARTICLE_FOLLOWS, &commands::article(id))
            .await?;
        self.body_reader().read_to_string().await
    }

    /// Fetch the headers of an article as decoded text
    pub async fn head_text(&mut self, id: &str) -> Result<String> {
        self.command(codes::HEAD_FOLLOWS, &commands::head(id)).await?;
        self.body_reader().read_to_string().await
    }

    /// Check that an article exists without transferring it
    /// (RFC 3977 Section 6.2.4). An empty `id` addresses the current
    /// article.
    pub async fn stat(&mut self, id: &str) -> Result<ArticleStat> {
        let status = self
            .command(codes::ARTICLE_STAT, &commands::stat(id))
            .await?;
        parse_stat_reply(&status.message)
    }

    /// Advance the current article pointer (RFC 3977 Section 6.1.4)
    pub async fn next(&mut self) -> Result<ArticleStat> {
        let status = self.command(codes::ARTICLE_STAT, commands::next()).await?;
        parse_stat_reply(&status.message)
    }

    /// Move the current article pointer back (RFC 3977 Section 6.1.3)
    pub async fn last(&mut self) -> Result<ArticleStat> {
        let status = self.command(codes::ARTICLE_STAT, commands::last()).await?;
        parse_stat_reply(&status.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_stat_reply() {
        let stat = parse_stat_reply("3 <id3@example.com> article retrieved").unwrap();
        assert_eq!(stat.number, 3);
        assert_eq!(stat.message_id, "<id3@example.com>");

        let stat = parse_stat_reply("0 <id@example.com>").unwrap();
        assert_eq!(stat.number, 0);
    }

    #[test]
    fn test_parse_stat_reply_malformed() {
        assert!(matches!(
            parse_stat_reply("3"),
            Err(NntpError::InvalidResponse(_))
        ));
        assert!(matches!(
            parse_stat_reply("three <id@example.com>"),
            Err(NntpError::InvalidResponse(_))
        ));
    }
}
