pub mod draft;
pub mod source;

use chrono::DateTime;

use crate::{cms::Record, session::ANONYMOUS};

pub use draft::Draft;
pub use source::{LocalSource, PostSource, Published, RemoteSource, Source};

pub const EXCERPT_CHARS: usize = 120;

/// A blog entry as the dashboard shows it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub id: String,
    pub title: String,
    pub content: String,
    pub excerpt: String,
    pub author: String,
    /// `YYYY-MM-DD`
    pub created_at: String,
    pub likes: u32,
    pub comments: u32,
    pub tags: Vec<String>,
}

impl From<Record> for Post {
    fn from(record: Record) -> Self {
        let author = record
            .attributes
            .author_name()
            .unwrap_or_else(|| ANONYMOUS.to_string());
        let attributes = record.attributes;
        let content = attributes.content.unwrap_or_default();

        Self {
            id: record.id,
            title: attributes.title.unwrap_or_default(),
            excerpt: excerpt(&content),
            created_at: date_of(&attributes.created_at),
            content,
            author,
            likes: 0,
            comments: 0,
            tags: vec![],
        }
    }
}

/// First [`EXCERPT_CHARS`] characters of `content` followed by `...`.
pub fn excerpt(content: &str) -> String {
    let head: String = content.chars().take(EXCERPT_CHARS).collect();
    format!("{}...", head)
}

/// Date part of an RFC 3339 timestamp, in the timestamp's own offset.
pub fn date_of(timestamp: &str) -> String {
    match DateTime::parse_from_rfc3339(timestamp) {
        Ok(datetime) => datetime.date_naive().format("%Y-%m-%d").to_string(),
        Err(_) => timestamp.split('T').next().unwrap_or_default().to_string(),
    }
}
