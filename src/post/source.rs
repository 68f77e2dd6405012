use std::{future::Future, time::Duration};

use chrono::Utc;
use log::{debug, info};

use crate::{
    api::{ApiClient, ContentClient},
    config::{Config, DataSource},
    error::{BlogError, Result},
    session::Session,
};

use super::{excerpt, Draft, Post};

/// What a view should do after a successful publish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Published {
    /// The server owns the new post; fetch the list again
    Reload,
    /// Put this post on top of the current list
    Prepend(Post),
}

pub trait PostSource {
    fn load(&self) -> impl Future<Output = Result<Vec<Post>>> + Send;
    fn publish(&self, draft: &Draft, session: &Session) -> impl Future<Output = Result<Published>> + Send;
}

//==============================================================================
// Remote
//==============================================================================
#[derive(Debug, Clone)]
pub struct RemoteSource {
    client: ContentClient,
}

impl RemoteSource {
    pub fn new(client: ContentClient) -> Self {
        Self { client }
    }
}

impl PostSource for RemoteSource {
    fn load(&self) -> impl Future<Output = Result<Vec<Post>>> + Send {
        async move {
            let records = self.client.list_blogs().await?;
            Ok(records.into_iter().map(Post::from).collect())
        }
    }

    /// Tags stay in the draft; the collection has no field for them.
    fn publish(&self, draft: &Draft, session: &Session) -> impl Future<Output = Result<Published>> + Send {
        async move {
            let token = session.token.as_deref().ok_or(BlogError::NotAuthenticated)?;
            self.client
                .create_blog(token, &draft.title, &draft.content, session.author())
                .await?;
            Ok(Published::Reload)
        }
    }
}

//==============================================================================
// Local
//==============================================================================
#[derive(Debug, Clone)]
pub struct LocalSource {
    delay: Duration,
}

impl LocalSource {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Default for LocalSource {
    fn default() -> Self {
        Self::new(Duration::from_millis(1000))
    }
}

impl PostSource for LocalSource {
    fn load(&self) -> impl Future<Output = Result<Vec<Post>>> + Send {
        async { Ok(seed_posts()) }
    }

    fn publish(&self, draft: &Draft, session: &Session) -> impl Future<Output = Result<Published>> + Send {
        async move {
            tokio::time::sleep(self.delay).await;

            let now = Utc::now();
            let post = Post {
                id: now.timestamp_millis().to_string(),
                title: draft.title.clone(),
                content: draft.content.clone(),
                excerpt: excerpt(&draft.content),
                author: session.author().to_string(),
                created_at: now.date_naive().format("%Y-%m-%d").to_string(),
                likes: 0,
                comments: 0,
                tags: draft.tag_list(),
            };
            debug!("composed local post {}", post.id);
            Ok(Published::Prepend(post))
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn seed_post(
    id: &str,
    title: &str,
    content: &str,
    excerpt: &str,
    author: &str,
    created_at: &str,
    likes: u32,
    comments: u32,
    tags: &[&str],
) -> Post {
    Post {
        id: id.to_string(),
        title: title.to_string(),
        content: content.to_string(),
        excerpt: excerpt.to_string(),
        author: author.to_string(),
        created_at: created_at.to_string(),
        likes,
        comments,
        tags: tags.iter().map(|tag| tag.to_string()).collect(),
    }
}

pub fn seed_posts() -> Vec<Post> {
    vec![
        seed_post(
            "1",
            "Getting Started with React Development",
            "React is a powerful JavaScript library for building user interfaces. In this comprehensive guide, we'll explore the fundamentals of React development, including components, props, state management, and modern hooks. Whether you're a beginner or looking to refresh your knowledge, this post will provide valuable insights into building modern web applications with React.",
            "Learn the fundamentals of React development including components, props, and state management.",
            "Sarah Johnson",
            "2024-01-15",
            24,
            8,
            &["React", "JavaScript", "Frontend"],
        ),
        seed_post(
            "2",
            "The Future of Web Development",
            "The web development landscape is constantly evolving. From new frameworks to emerging technologies like WebAssembly and Progressive Web Apps, developers need to stay updated with the latest trends. This article explores what the future holds for web development and how you can prepare for the changes ahead.",
            "Exploring emerging technologies and trends shaping the future of web development.",
            "Mike Chen",
            "2024-01-12",
            18,
            12,
            &["Web Development", "Technology", "Trends"],
        ),
        seed_post(
            "3",
            "Building Scalable APIs with Node.js",
            "Creating robust and scalable APIs is crucial for modern applications. This guide covers best practices for building APIs with Node.js, including proper error handling, authentication, database optimization, and deployment strategies. Learn how to create APIs that can handle thousands of concurrent users.",
            "Best practices for creating robust and scalable APIs using Node.js.",
            "Emma Davis",
            "2024-01-10",
            31,
            6,
            &["Node.js", "API", "Backend"],
        ),
    ]
}

//==============================================================================
// Configured
//==============================================================================
/// The source picked by [`DataSource`].
#[derive(Debug, Clone)]
pub enum Source {
    Local(LocalSource),
    Remote(RemoteSource),
}

impl Source {
    pub fn from_config(config: &Config) -> Self {
        info!("Data source: {}", config.source());
        match config.source() {
            DataSource::Local => Self::Local(LocalSource::new(config.delay())),
            DataSource::Remote => {
                let client = ContentClient::new(config.base_url(), ApiClient::new(config.retries()));
                Self::Remote(RemoteSource::new(client))
            }
        }
    }
}

impl PostSource for Source {
    fn load(&self) -> impl Future<Output = Result<Vec<Post>>> + Send {
        async move {
            match self {
                Self::Local(source) => source.load().await,
                Self::Remote(source) => source.load().await,
            }
        }
    }

    fn publish(&self, draft: &Draft, session: &Session) -> impl Future<Output = Result<Published>> + Send {
        async move {
            match self {
                Self::Local(source) => source.publish(draft, session).await,
                Self::Remote(source) => source.publish(draft, session).await,
            }
        }
    }
}
