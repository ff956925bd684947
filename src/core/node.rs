//! # Comment Nodes
//!
//! Headless rendering of a thread: each [`CommentNode`] turns one comment
//! plus its view state into rows, then hands every child to a new node one
//! level deeper. Adapters (the TUI, tests) consume the flat row list.
//!
//! Row order for an expanded node:
//!
//! ```text
//! Full      header, body, action bar
//! Composer  only while the reply box is open
//! ...       each child's rows, depth + 1
//! ```
//!
//! A collapsed node yields a single `Hidden` row and nothing below it.

use crate::core::comment::{Comment, CommentId, ThreadTree};
use crate::core::view_state::ThreadViewState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    /// Author, label, body and action bar.
    Full,
    /// Author handle and a "hidden" marker.
    Hidden,
    /// The open reply box beneath a comment's action bar.
    Composer,
}

/// One rendered row, borrowed from the tree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderedRow<'a> {
    pub comment: &'a Comment,
    pub depth: usize,
    pub kind: RowKind,
    /// Locally held score (received score plus local votes).
    pub score: i64,
}

impl RenderedRow<'_> {
    pub fn id(&self) -> CommentId {
        self.comment.id
    }

    /// Comment rows, as opposed to composer rows.
    pub fn is_node(&self) -> bool {
        self.kind != RowKind::Composer
    }
}

/// One comment at a given depth.
#[derive(Debug, Clone, Copy)]
pub struct CommentNode<'a> {
    pub comment: &'a Comment,
    pub depth: usize,
}

impl<'a> CommentNode<'a> {
    pub fn root(comment: &'a Comment) -> Self {
        Self { comment, depth: 0 }
    }

    fn child(&self, comment: &'a Comment) -> Self {
        Self {
            comment,
            depth: self.depth + 1,
        }
    }

    /// Append this node's rows, and recursively its children's, to `out`.
    pub fn render(&self, view: &ThreadViewState, out: &mut Vec<RenderedRow<'a>>) {
        let score = view.score_of(self.comment);

        if view.is_collapsed(self.comment.id) {
            out.push(self.row(RowKind::Hidden, score));
            return;
        }

        out.push(self.row(RowKind::Full, score));
        if view.composer(self.comment.id).is_some() {
            out.push(self.row(RowKind::Composer, score));
        }
        for reply in &self.comment.children {
            self.child(reply).render(view, out);
        }
    }

    fn row(&self, kind: RowKind, score: i64) -> RenderedRow<'a> {
        RenderedRow {
            comment: self.comment,
            depth: self.depth,
            kind,
            score,
        }
    }
}

/// Render every root at depth 0, in input order.
pub fn render_thread<'a>(tree: &'a ThreadTree, view: &ThreadViewState) -> Vec<RenderedRow<'a>> {
    let mut rows = Vec::with_capacity(tree.roots().len());
    for root in tree.roots() {
        CommentNode::root(root).render(view, &mut rows);
    }
    rows
}
