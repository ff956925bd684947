//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::api::{ApiError, CommentBackend, SubmitCommentRequest};
use crate::core::comment::{Comment, CommentId, ReplyPlacement};
use crate::core::config::ResolvedConfig;
use crate::core::notify::Notifier;
use crate::core::session::MemorySessionStore;
use crate::core::state::App;

/// Notifier that remembers every message it was given.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    pub successes: Vec<String>,
    pub errors: Vec<String>,
}

impl Notifier for RecordingNotifier {
    fn notify_success(&mut self, message: &str) {
        self.successes.push(message.to_string());
    }

    fn notify_error(&mut self, message: &str) {
        self.errors.push(message.to_string());
    }
}

enum SubmitScript {
    Accept(serde_json::Value),
    Fail(ApiError),
    Hang,
}

/// Backend with canned answers that records what was submitted.
pub struct ScriptedBackend {
    submit: SubmitScript,
    listing: Vec<Comment>,
    submit_calls: AtomicUsize,
    last_submission: Mutex<Option<(CommentId, String, String)>>,
}

impl ScriptedBackend {
    fn with_script(submit: SubmitScript) -> Self {
        Self {
            submit,
            listing: Vec::new(),
            submit_calls: AtomicUsize::new(0),
            last_submission: Mutex::new(None),
        }
    }

    pub fn accepting(response: serde_json::Value) -> Self {
        Self::with_script(SubmitScript::Accept(response))
    }

    pub fn failing(error: ApiError) -> Self {
        Self::with_script(SubmitScript::Fail(error))
    }

    /// Never answers a submission.
    pub fn hanging() -> Self {
        Self::with_script(SubmitScript::Hang)
    }

    pub fn with_listing(mut self, comments: Vec<Comment>) -> Self {
        self.listing = comments;
        self
    }

    pub fn submit_calls(&self) -> usize {
        self.submit_calls.load(Ordering::SeqCst)
    }

    /// `(parent_id, content, token)` of the most recent submission.
    pub fn last_submission(&self) -> Option<(CommentId, String, String)> {
        self.last_submission.lock().ok().and_then(|last| last.clone())
    }
}

#[async_trait]
impl CommentBackend for ScriptedBackend {
    async fn submit_comment(
        &self,
        request: SubmitCommentRequest<'_>,
        token: &str,
    ) -> Result<serde_json::Value, ApiError> {
        self.submit_calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last_submission.lock() {
            *last = Some((request.parent_id, request.content.to_string(), token.to_string()));
        }

        match &self.submit {
            SubmitScript::Accept(value) => Ok(value.clone()),
            SubmitScript::Fail(error) => Err(error.clone()),
            SubmitScript::Hang => std::future::pending().await,
        }
    }

    async fn list_comments(&self, _post_id: u64) -> Result<Vec<Comment>, ApiError> {
        Ok(self.listing.clone())
    }
}

pub fn test_config() -> ResolvedConfig {
    ResolvedConfig {
        base_url: "http://localhost:8080".to_string(),
        request_timeout: Duration::from_secs(30),
        auth_token: Some("test-token".to_string()),
        session_dir: None,
        post_id: 1,
        post_author: None,
        reply_placement: ReplyPlacement::NewestLast,
    }
}

/// Creates a logged-in test App whose backend accepts every reply.
pub fn test_app() -> App {
    let config = test_config();
    App::new(
        Arc::new(ScriptedBackend::accepting(serde_json::json!({}))),
        Arc::new(MemorySessionStore::with_token(config.auth_token.clone())),
        &config,
    )
}

/// Same as [`test_app`] but with no bearer token.
pub fn test_app_logged_out() -> App {
    let config = test_config();
    App::new(
        Arc::new(ScriptedBackend::accepting(serde_json::json!({}))),
        Arc::new(MemorySessionStore::new()),
        &config,
    )
}
