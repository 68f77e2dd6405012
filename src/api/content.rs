use log::{debug, log_enabled, trace};
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;

use crate::{
    cms::{Collection, CreateBlog, CreateBlogData, Record},
    error::{BlogError, Result},
};

use super::ApiClient;

/// Client of the `blogs` collection of the content API.
#[derive(Debug, Clone)]
pub struct ContentClient {
    inner: ApiClient,
    base_url: String,
}

impl ContentClient {
    pub fn new(base_url: &str, inner: ApiClient) -> Self {
        Self {
            inner,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn collection_url(&self) -> String {
        format!("{}/api/blogs", self.base_url)
    }

    /// `GET /api/blogs?populate=*`
    pub async fn list_blogs(&self) -> Result<Vec<Record>> {
        let url = self.collection_url();
        debug!("GET {}?populate=*", url);

        let response = self
            .inner
            .client()
            .get(&url)
            .query(&[("populate", "*")])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        trace_body(&body);
        if !status.is_success() {
            return Err(error_from_body(status, &body));
        }

        let collection: Collection = serde_json::from_str(&body)?;
        debug!("{} blogs received", collection.data.len());
        Ok(collection.data)
    }

    /// `POST /api/blogs` on behalf of the bearer of `token`.
    pub async fn create_blog(&self, token: &str, title: &str, content: &str, author: &str) -> Result<()> {
        let url = self.collection_url();
        debug!("POST {}", url);

        let body = CreateBlog {
            data: CreateBlogData {
                title,
                content,
                author,
            },
        };
        let response = self
            .inner
            .single_shot()
            .post(&url)
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        trace_body(&body);
        if !status.is_success() {
            return Err(error_from_body(status, &body));
        }

        if let Some(id) = serde_json::from_str::<Value>(&body)
            .ok()
            .and_then(|created| created.pointer("/data/id").cloned())
        {
            debug!("created blog {}", id);
        }
        Ok(())
    }
}

/// `{ "error": { "message": ... } }`
#[derive(Deserialize, Debug, Clone)]
pub struct ErrorEnvelope {
    pub error: ErrorBody,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}

fn error_from_body(status: StatusCode, body: &str) -> BlogError {
    let message = serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .and_then(|envelope| envelope.error.message);

    match message {
        Some(message) => BlogError::Api {
            status: status.as_u16(),
            message,
        },
        None => BlogError::Status(status.as_u16()),
    }
}

fn trace_body(body: &str) {
    if log_enabled!(log::Level::Trace) {
        match serde_json::from_str::<Value>(body) {
            Ok(value) => trace!("{}", serde_json::to_string_pretty(&value).unwrap_or_default()),
            Err(_) => trace!("{}", body),
        }
    }
}
