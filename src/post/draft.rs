use crate::error::{BlogError, Result};

/// The composer's unsent input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Draft {
    pub title: String,
    pub content: String,
    /// Comma separated
    pub tags: String,
}

impl Draft {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            tags: String::new(),
        }
    }

    pub fn with_tags(mut self, tags: impl Into<String>) -> Self {
        self.tags = tags.into();
        self
    }

    /// Title and content are required.
    pub fn check(&self) -> Result<()> {
        if self.title.is_empty() {
            return Err(BlogError::MissingField("title"));
        }
        if self.content.is_empty() {
            return Err(BlogError::MissingField("content"));
        }
        Ok(())
    }

    pub fn tag_list(&self) -> Vec<String> {
        self.tags
            .split(',')
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
            .map(str::to_string)
            .collect()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
