//! # Per-Node View State
//!
//! Ephemeral UI state for each rendered comment, kept apart from the
//! comment data and keyed by [`CommentId`].
//!
//! Each node is a pair of independent flags (collapsed, composer open)
//! plus a locally held score:
//!
//! ```text
//!            toggle_composer()
//!   Expanded ◄──────────────► Expanded + composer
//!      │  ▲                        │
//!  collapse() expand()          collapse()
//!      ▼  │                        │
//!   Collapsed ◄───────────────────┘   (composer dropped)
//! ```
//!
//! Collapsing is destructive: the node's composer (typed text included)
//! and the state of every descendant are discarded, exactly as if those
//! nodes had been unmounted. Expanding always comes back with the
//! composer closed.
//!
//! Nodes are mounted lazily: a comment with no entry renders with the
//! defaults (expanded, composer closed, score as received).

use std::collections::HashMap;

use log::debug;

use crate::core::comment::{Comment, CommentId, ThreadTree};
use crate::core::composer::ReplyComposer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteDirection {
    Up,
    Down,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NodeViewState {
    id: CommentId,
    collapsed: bool,
    composer: Option<ReplyComposer>,
    score: i64,
}

impl NodeViewState {
    pub fn new(comment: &Comment) -> Self {
        Self {
            id: comment.id,
            collapsed: false,
            composer: None,
            score: comment.score,
        }
    }

    pub fn is_collapsed(&self) -> bool {
        self.collapsed
    }

    pub fn is_composer_open(&self) -> bool {
        self.composer.is_some()
    }

    pub fn composer(&self) -> Option<&ReplyComposer> {
        self.composer.as_ref()
    }

    pub fn composer_mut(&mut self) -> Option<&mut ReplyComposer> {
        self.composer.as_mut()
    }

    pub fn score(&self) -> i64 {
        self.score
    }

    pub fn collapse(&mut self) {
        self.collapsed = true;
        self.composer = None;
    }

    pub fn expand(&mut self) {
        if self.collapsed {
            self.collapsed = false;
            self.composer = None;
        }
    }

    /// Flip the composer. Ignored while collapsed (`None`); otherwise
    /// returns whether the composer is now open.
    pub fn toggle_composer(&mut self) -> Option<bool> {
        if self.collapsed {
            return None;
        }
        self.composer = match self.composer.take() {
            Some(_) => None,
            None => Some(ReplyComposer::new(self.id)),
        };
        Some(self.composer.is_some())
    }

    pub fn close_composer(&mut self) {
        self.composer = None;
    }

    /// Optimistic, client-local vote: exactly one point per call.
    pub fn vote(&mut self, direction: VoteDirection) -> i64 {
        match direction {
            VoteDirection::Up => self.score += 1,
            VoteDirection::Down => self.score -= 1,
        }
        self.score
    }
}

/// View state for every mounted node of one thread.
///
/// Dropping this value is the "unmount" of the whole comment section.
#[derive(Debug, Default)]
pub struct ThreadViewState {
    nodes: HashMap<CommentId, NodeViewState>,
}

impl ThreadViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node(&self, id: CommentId) -> Option<&NodeViewState> {
        self.nodes.get(&id)
    }

    /// Mount `id` if needed. `None` if the tree has no such comment.
    fn mount(&mut self, tree: &ThreadTree, id: CommentId) -> Option<&mut NodeViewState> {
        if !self.nodes.contains_key(&id) {
            let comment = tree.find(id)?;
            self.nodes.insert(id, NodeViewState::new(comment));
        }
        self.nodes.get_mut(&id)
    }

    pub fn is_collapsed(&self, id: CommentId) -> bool {
        self.nodes.get(&id).is_some_and(|n| n.is_collapsed())
    }

    pub fn score_of(&self, comment: &Comment) -> i64 {
        self.nodes
            .get(&comment.id)
            .map_or(comment.score, |n| n.score())
    }

    pub fn composer(&self, id: CommentId) -> Option<&ReplyComposer> {
        self.nodes.get(&id).and_then(|n| n.composer())
    }

    pub fn composer_mut(&mut self, id: CommentId) -> Option<&mut ReplyComposer> {
        self.nodes.get_mut(&id).and_then(|n| n.composer_mut())
    }

    /// Ids of nodes with an open composer.
    pub fn open_composers(&self) -> Vec<CommentId> {
        let mut ids: Vec<CommentId> = self
            .nodes
            .values()
            .filter(|n| n.is_composer_open())
            .map(|n| n.id)
            .collect();
        ids.sort();
        ids
    }

    /// Collapse `id` and unmount everything beneath it.
    /// Returns false if the comment does not exist.
    pub fn collapse(&mut self, tree: &ThreadTree, id: CommentId) -> bool {
        let Some(node) = self.mount(tree, id) else {
            return false;
        };
        node.collapse();
        let descendants = tree.descendant_ids(id);
        debug!("Collapsed {} (unmounting {} descendants)", id, descendants.len());
        for child in descendants {
            self.nodes.remove(&child);
        }
        true
    }

    pub fn expand(&mut self, tree: &ThreadTree, id: CommentId) -> bool {
        match self.mount(tree, id) {
            Some(node) => {
                node.expand();
                true
            }
            None => false,
        }
    }

    pub fn toggle_collapse(&mut self, tree: &ThreadTree, id: CommentId) -> bool {
        if self.is_collapsed(id) {
            self.expand(tree, id)
        } else {
            self.collapse(tree, id)
        }
    }

    pub fn toggle_composer(&mut self, tree: &ThreadTree, id: CommentId) -> Option<bool> {
        self.mount(tree, id)?.toggle_composer()
    }

    pub fn close_composer(&mut self, id: CommentId) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.close_composer();
        }
    }

    pub fn vote(&mut self, tree: &ThreadTree, id: CommentId, direction: VoteDirection) -> Option<i64> {
        Some(self.mount(tree, id)?.vote(direction))
    }

    /// Unmount everything (e.g. after the thread is reloaded).
    pub fn clear(&mut self) {
        self.nodes.clear();
    }

    pub fn mounted_len(&self) -> usize {
        self.nodes.len()
    }
}
