//! # Application State
//!
//! Core business state for Threadline. This module contains domain logic
//! only, no TUI-specific types. Presentation state lives in the `tui` module.
//!
//! ```text
//! App
//! ├── backend: Arc<dyn CommentBackend>   // remote comment API
//! ├── session: Arc<dyn SessionStore>     // read-only credential access
//! ├── tree: ThreadTree                   // comment content
//! ├── view: ThreadViewState              // per-node collapse/composer/score
//! ├── toasts: ToastQueue                 // user-facing notifications
//! ├── post_id / post_author              // which thread, who is OP
//! ├── reply_placement                    // where posted replies are spliced
//! ├── request_timeout                    // bound on every backend call
//! ├── status_message: String             // title bar text
//! ├── is_loading: bool                   // waiting for the comment listing
//! └── error: Option<String>              // fatal load error
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.

use std::sync::Arc;
use std::time::Duration;

use crate::api::CommentBackend;
use crate::core::comment::{ReplyPlacement, ThreadTree};
use crate::core::config::ResolvedConfig;
use crate::core::notify::ToastQueue;
use crate::core::session::SessionStore;
use crate::core::view_state::ThreadViewState;

pub struct App {
    pub backend: Arc<dyn CommentBackend>,
    pub session: Arc<dyn SessionStore>,
    pub tree: ThreadTree,
    pub view: ThreadViewState,
    pub toasts: ToastQueue,
    pub post_id: u64,
    pub post_author: Option<String>,
    pub reply_placement: ReplyPlacement,
    pub request_timeout: Duration,
    pub status_message: String,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl App {
    pub fn new(
        backend: Arc<dyn CommentBackend>,
        session: Arc<dyn SessionStore>,
        config: &ResolvedConfig,
    ) -> Self {
        Self {
            backend,
            session,
            tree: ThreadTree::default(),
            view: ThreadViewState::new(),
            toasts: ToastQueue::default(),
            post_id: config.post_id,
            post_author: config.post_author.clone(),
            reply_placement: config.reply_placement,
            request_timeout: config.request_timeout,
            status_message: String::new(),
            is_loading: false,
            error: None,
        }
    }

    /// Start from an already known thread instead of fetching one.
    pub fn with_tree(mut self, mut tree: ThreadTree) -> Self {
        if let Some(author) = &self.post_author {
            tree.mark_original_poster(author);
        }
        self.status_message = comment_count_label(tree.len());
        self.tree = tree;
        self.view.clear();
        self
    }
}

pub fn comment_count_label(count: usize) -> String {
    match count {
        1 => "1 comment".to_string(),
        n => format!("{n} comments"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::fixture;
    use crate::test_support::test_app;

    #[test]
    fn test_app_new_defaults() {
        let app = test_app();
        assert!(app.tree.is_empty());
        assert!(!app.is_loading);
        assert!(app.error.is_none());
        assert_eq!(app.post_id, 1);
    }

    #[test]
    fn test_with_tree_marks_op_and_counts() {
        let mut app = test_app();
        app.post_author = Some("coding_wizard".to_string());
        let app = app.with_tree(fixture::sample_thread());

        assert_eq!(app.status_message, "6 comments");
        let flagged: Vec<&str> = app
            .tree
            .iter()
            .filter(|(_, c)| c.is_original_poster)
            .map(|(_, c)| c.author_handle.as_str())
            .collect();
        assert_eq!(flagged, vec!["coding_wizard"]);
    }

    #[test]
    fn test_comment_count_label() {
        assert_eq!(comment_count_label(0), "0 comments");
        assert_eq!(comment_count_label(1), "1 comment");
    }
}
