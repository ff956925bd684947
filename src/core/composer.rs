//! # Reply Composer
//!
//! Captures reply text for one parent comment and submits it.
//!
//! Submission is split into two synchronous halves around the network
//! call so the event loop never blocks:
//!
//! ```text
//! begin_submit()  ──►  SubmitTicket  ──►  deliver() (async)  ──►  finish_submit()
//!   validate            parent + text        POST with timeout      notify, clear
//!   read token          + bearer token                               or keep text
//!   lock submit
//! ```
//!
//! [`ReplyComposer::submit`] chains the three for callers that can await.
//!
//! The composer never touches the thread tree. A successful post yields
//! [`ComposerEvent::Posted`] and the owner decides what to do with it.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use log::{debug, info, warn};

use crate::api::{ApiError, CommentBackend, SubmitCommentRequest};
use crate::core::comment::CommentId;
use crate::core::notify::Notifier;
use crate::core::session::SessionStore;

pub const MSG_EMPTY: &str = "Reply cannot be empty.";
pub const MSG_UNAUTHENTICATED: &str = "You must be logged in to reply.";
pub const MSG_POSTED: &str = "Reply posted!";
pub const MSG_FAILED: &str = "Failed to send reply. Please try again.";

/// What the composer reports to its owner.
#[derive(Debug, Clone, PartialEq)]
pub enum ComposerEvent {
    /// User dismissed the composer.
    Cancelled,
    /// Backend accepted the reply; payload is its JSON response, unparsed.
    Posted(serde_json::Value),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ComposerError {
    /// Content was empty after trimming. No request was made.
    EmptyContent,
    /// No bearer token in the session store. No request was made.
    Unauthenticated,
    /// A submission from this composer is still in flight.
    AlreadySubmitting,
    /// Network failure, timeout or non-2xx response.
    Transport(ApiError),
}

impl fmt::Display for ComposerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComposerError::EmptyContent => write!(f, "reply is empty"),
            ComposerError::Unauthenticated => write!(f, "not logged in"),
            ComposerError::AlreadySubmitting => write!(f, "submission already in flight"),
            ComposerError::Transport(e) => write!(f, "failed to post reply: {e}"),
        }
    }
}

impl std::error::Error for ComposerError {}

/// Identifies one submission. Unique for the life of the process, so a
/// result can never be mistaken for one from a later composer on the same
/// parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubmissionId(u64);

impl SubmissionId {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for SubmissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Everything the network half of a submission needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitTicket {
    pub submission: SubmissionId,
    pub parent_id: CommentId,
    pub content: String,
    pub token: String,
}

/// Send a ticket to the backend, bounded by `timeout`.
pub async fn deliver(
    backend: &dyn CommentBackend,
    ticket: &SubmitTicket,
    timeout: Duration,
) -> Result<serde_json::Value, ApiError> {
    let request = SubmitCommentRequest {
        parent_id: ticket.parent_id,
        content: &ticket.content,
    };
    match tokio::time::timeout(timeout, backend.submit_comment(request, &ticket.token)).await {
        Ok(result) => result,
        Err(_) => {
            warn!(
                "Reply to {} timed out after {}s",
                ticket.parent_id,
                timeout.as_secs()
            );
            Err(ApiError::Timeout {
                after_secs: timeout.as_secs(),
            })
        }
    }
}

/// Reply form bound to a single parent comment.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplyComposer {
    parent_id: CommentId,
    /// Text being typed. Edited in place by the input widget.
    pub content: String,
    in_flight: Option<SubmissionId>,
}

impl ReplyComposer {
    pub fn new(parent_id: CommentId) -> Self {
        Self {
            parent_id,
            content: String::new(),
            in_flight: None,
        }
    }

    pub fn parent_id(&self) -> CommentId {
        self.parent_id
    }

    pub fn is_submitting(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Whether `submission` is the request this composer is waiting on.
    pub fn awaits(&self, submission: SubmissionId) -> bool {
        self.in_flight == Some(submission)
    }

    /// Whether the submit control is enabled.
    pub fn can_submit(&self) -> bool {
        self.in_flight.is_none() && !self.content.trim().is_empty()
    }

    pub fn cancel(&self) -> ComposerEvent {
        debug!("Reply to {} cancelled", self.parent_id);
        ComposerEvent::Cancelled
    }

    /// Validate and lock the composer for a submission.
    ///
    /// Local rejections notify the user and leave the content untouched.
    pub fn begin_submit(
        &mut self,
        session: &dyn SessionStore,
        notifier: &mut dyn Notifier,
    ) -> Result<SubmitTicket, ComposerError> {
        if self.in_flight.is_some() {
            debug!("Ignoring submit for {}: already in flight", self.parent_id);
            return Err(ComposerError::AlreadySubmitting);
        }

        if self.content.trim().is_empty() {
            notifier.notify_error(MSG_EMPTY);
            return Err(ComposerError::EmptyContent);
        }

        let Some(token) = session.bearer_token() else {
            warn!("Reply to {} rejected: no auth token", self.parent_id);
            notifier.notify_error(MSG_UNAUTHENTICATED);
            return Err(ComposerError::Unauthenticated);
        };

        let submission = SubmissionId::next();
        debug!("Reply to {} locked for submission {}", self.parent_id, submission);
        self.in_flight = Some(submission);
        Ok(SubmitTicket {
            submission,
            parent_id: self.parent_id,
            content: self.content.clone(),
            token,
        })
    }

    /// Apply the backend's answer and unlock the composer.
    pub fn finish_submit(
        &mut self,
        result: Result<serde_json::Value, ApiError>,
        notifier: &mut dyn Notifier,
    ) -> Result<ComposerEvent, ComposerError> {
        self.in_flight = None;
        match result {
            Ok(new_comment) => {
                info!("Reply to {} posted", self.parent_id);
                notifier.notify_success(MSG_POSTED);
                self.content.clear();
                Ok(ComposerEvent::Posted(new_comment))
            }
            Err(e) => {
                warn!("Reply to {} failed: {}", self.parent_id, e);
                notifier.notify_error(MSG_FAILED);
                Err(ComposerError::Transport(e))
            }
        }
    }

    /// Full submission in one call.
    pub async fn submit(
        &mut self,
        session: &dyn SessionStore,
        backend: &dyn CommentBackend,
        timeout: Duration,
        notifier: &mut dyn Notifier,
    ) -> Result<ComposerEvent, ComposerError> {
        let ticket = self.begin_submit(session, notifier)?;
        let result = deliver(backend, &ticket, timeout).await;
        self.finish_submit(result, notifier)
    }
}
