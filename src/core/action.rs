//! # Actions
//!
//! Everything that can happen in Threadline becomes an `Action`.
//! User collapses a comment? That's `Action::Collapse(id)`.
//! Backend answers a reply? That's `Action::ReplyFinished { .. }`.
//!
//! The `update()` function applies an action to the state and returns an
//! `Effect` describing any I/O the adapter should start. No I/O happens
//! here, so every transition is testable without a network.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```

use chrono::Utc;
use log::{debug, info, warn};

use crate::api::{ApiError, WireComment};
use crate::core::comment::{Comment, CommentId, ThreadTree};
use crate::core::composer::{ComposerEvent, ReplyComposer, SubmissionId, SubmitTicket};
use crate::core::notify::Notifier;
use crate::core::state::{App, comment_count_label};
use crate::core::view_state::VoteDirection;

#[derive(Debug)]
pub enum Action {
    /// Fetch the thread for the current post.
    LoadThread,
    ThreadLoaded(Result<Vec<Comment>, ApiError>),
    Collapse(CommentId),
    Expand(CommentId),
    ToggleCollapse(CommentId),
    ToggleComposer(CommentId),
    CancelReply(CommentId),
    Vote(CommentId, VoteDirection),
    SubmitReply(CommentId),
    ReplyFinished {
        parent_id: CommentId,
        submission: SubmissionId,
        result: Result<serde_json::Value, ApiError>,
    },
    Quit,
}

impl Action {
    /// The action reporting the backend's answer to `ticket`.
    pub fn reply_finished(ticket: &SubmitTicket, result: Result<serde_json::Value, ApiError>) -> Self {
        Action::ReplyFinished {
            parent_id: ticket.parent_id,
            submission: ticket.submission,
            result,
        }
    }
}

/// I/O the adapter must perform after an update.
#[derive(Debug, PartialEq)]
pub enum Effect {
    None,
    Quit,
    FetchThread(u64),
    SpawnSubmit(SubmitTicket),
}

pub fn update(app: &mut App, action: Action) -> Effect {
    match action {
        Action::LoadThread => {
            app.is_loading = true;
            app.error = None;
            app.status_message = "Loading comments...".to_string();
            Effect::FetchThread(app.post_id)
        }
        Action::ThreadLoaded(result) => {
            app.is_loading = false;
            load_thread(app, result);
            Effect::None
        }
        Action::Collapse(id) => {
            app.view.collapse(&app.tree, id);
            Effect::None
        }
        Action::Expand(id) => {
            app.view.expand(&app.tree, id);
            Effect::None
        }
        Action::ToggleCollapse(id) => {
            app.view.toggle_collapse(&app.tree, id);
            Effect::None
        }
        Action::ToggleComposer(id) => {
            match app.view.toggle_composer(&app.tree, id) {
                Some(open) => debug!("Composer for {} open={}", id, open),
                None => debug!("Ignoring composer toggle for {}: collapsed or unknown", id),
            }
            Effect::None
        }
        Action::CancelReply(id) => {
            if let Some(event) = app.view.composer(id).map(|c| c.cancel()) {
                apply_composer_event(app, id, event, true);
            }
            Effect::None
        }
        Action::Vote(id, direction) => {
            if let Some(score) = app.view.vote(&app.tree, id, direction) {
                debug!("Local vote {:?} on {} -> {}", direction, id, score);
            }
            Effect::None
        }
        Action::SubmitReply(id) => {
            let Some(composer) = app.view.composer_mut(id) else {
                return Effect::None;
            };
            match composer.begin_submit(app.session.as_ref(), &mut app.toasts) {
                Ok(ticket) => {
                    app.status_message = "Posting reply...".to_string();
                    Effect::SpawnSubmit(ticket)
                }
                Err(e) => {
                    debug!("Submit for {} rejected locally: {}", id, e);
                    Effect::None
                }
            }
        }
        Action::ReplyFinished {
            parent_id,
            submission,
            result,
        } => {
            let live = app
                .view
                .composer_mut(parent_id)
                .filter(|c| c.awaits(submission));
            let is_live = live.is_some();
            let outcome = match live {
                Some(composer) => composer.finish_submit(result, &mut app.toasts),
                None => {
                    // composer closed (and maybe reopened) while the request was in flight
                    debug!(
                        "Result of submission {} for {} arrived after its composer closed",
                        submission, parent_id
                    );
                    ReplyComposer::new(parent_id).finish_submit(result, &mut app.toasts)
                }
            };
            match outcome {
                Ok(event) => apply_composer_event(app, parent_id, event, is_live),
                Err(e) => {
                    app.status_message = format!("Reply failed: {e}");
                }
            }
            Effect::None
        }
        Action::Quit => Effect::Quit,
    }
}

/// Act on what a composer reported. `live` is false for results that
/// belong to a composer that no longer exists; those never touch whatever
/// composer is open on the parent now.
fn apply_composer_event(app: &mut App, parent_id: CommentId, event: ComposerEvent, live: bool) {
    match event {
        ComposerEvent::Cancelled => {
            app.view.close_composer(parent_id);
        }
        ComposerEvent::Posted(new_comment) => {
            if live {
                app.view.close_composer(parent_id);
            }
            splice_reply(app, parent_id, new_comment);
            app.status_message = comment_count_label(app.tree.len());
        }
    }
}

fn load_thread(app: &mut App, result: Result<Vec<Comment>, ApiError>) {
    let comments = match result {
        Ok(comments) => comments,
        Err(e) => {
            warn!("Failed to load comments for post {}: {}", app.post_id, e);
            app.toasts.notify_error("Failed to load comments.");
            app.error = Some(format!("Failed to load comments: {e}"));
            app.status_message = "Load failed".to_string();
            return;
        }
    };

    match ThreadTree::new(comments) {
        Ok(mut tree) => {
            if let Some(author) = &app.post_author {
                tree.mark_original_poster(author);
            }
            info!("Loaded {} comments for post {}", tree.len(), app.post_id);
            app.status_message = comment_count_label(tree.len());
            app.tree = tree;
            app.view.clear();
            app.error = None;
        }
        Err(e) => {
            warn!("Rejecting thread for post {}: {}", app.post_id, e);
            app.error = Some(format!("Malformed thread: {e}"));
            app.status_message = "Load failed".to_string();
        }
    }
}

/// Insert the backend's new comment under its parent, if the response
/// carries enough to build one.
fn splice_reply(app: &mut App, parent_id: CommentId, new_comment: serde_json::Value) {
    let wire: WireComment = match serde_json::from_value(new_comment) {
        Ok(wire) => wire,
        Err(e) => {
            debug!("Not splicing reply under {}: response is not a comment ({})", parent_id, e);
            return;
        }
    };

    let mut reply = wire.into_comment(Utc::now());
    if let Some(author) = &app.post_author {
        reply.is_original_poster = reply.author_handle == *author;
    }
    let reply_id = reply.id;

    match app.tree.insert_reply(parent_id, reply, app.reply_placement) {
        Ok(()) => info!("Spliced reply {} under {}", reply_id, parent_id),
        Err(e) => warn!("Could not splice reply {} under {}: {}", reply_id, parent_id, e),
    }
}
