use async_trait::async_trait;
use chrono::Utc;
use log::{debug, info, warn};

use super::error::ApiError;
use super::types::{SubmitCommentRequest, parse_listing};
use crate::core::comment::Comment;

/// The remote side of the comment thread.
///
/// Implemented over HTTP by [`HttpBackend`]; tests swap in counting or
/// scripted doubles.
#[async_trait]
pub trait CommentBackend: Send + Sync {
    /// Post a reply. Returns the backend's JSON representation of the new
    /// comment, passed through untouched.
    async fn submit_comment(
        &self,
        request: SubmitCommentRequest<'_>,
        token: &str,
    ) -> Result<serde_json::Value, ApiError>;

    /// Fetch the ordered forest of comments for a post.
    async fn list_comments(&self, post_id: u64) -> Result<Vec<Comment>, ApiError>;
}

/// reqwest-backed implementation of [`CommentBackend`].
pub struct HttpBackend {
    base_url: String,
    client: reqwest::Client,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            client: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

/// Read the error body of a non-2xx response for logging.
async fn api_error(response: reqwest::Response) -> ApiError {
    let status = response.status().as_u16();
    let message = response
        .text()
        .await
        .unwrap_or_else(|_| "unknown error".to_string());
    warn!("Backend error: {} - {}", status, message);
    ApiError::Api { status, message }
}

#[async_trait]
impl CommentBackend for HttpBackend {
    async fn submit_comment(
        &self,
        request: SubmitCommentRequest<'_>,
        token: &str,
    ) -> Result<serde_json::Value, ApiError> {
        info!(
            "Submitting reply: parent_id={}, content_len={}",
            request.parent_id,
            request.content.len()
        );

        let response = self
            .client
            .post(format!("{}/api/SubmitComment", self.base_url))
            .header("Authorization", format!("Bearer {}", token))
            .json(&request)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        debug!("SubmitComment response status: {}", response.status());

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        response
            .json::<serde_json::Value>()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))
    }

    async fn list_comments(&self, post_id: u64) -> Result<Vec<Comment>, ApiError> {
        info!("Fetching comments for post {}", post_id);

        let response = self
            .client
            .get(format!("{}/posts/{}/comments", self.base_url, post_id))
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        let wire = parse_listing(&body).map_err(|e| ApiError::Parse(e.to_string()))?;

        let now = Utc::now();
        let comments: Vec<Comment> = wire.into_iter().map(|c| c.into_comment(now)).collect();
        debug!("Received {} root comments for post {}", comments.len(), post_id);
        Ok(comments)
    }
}
