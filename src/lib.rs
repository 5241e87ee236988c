#![doc = include_str!("../README.md")]

pub mod article;
pub mod commands;

mod client;
mod config;
mod error;
mod response;

pub use article::{Article, HeaderParser, Headers};
pub use client::{ArticleStat, BodyReader, Connection, FetchedArticle, MaybeTlsStream};
pub use commands::{Group, GroupStatus, MessageOverview};
pub use config::ServerConfig;
pub use error::{NntpError, Result};
pub use response::{Status, codes};
