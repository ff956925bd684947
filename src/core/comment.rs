//! # Thread Data Model
//!
//! Immutable comment content, owned top-down: a [`ThreadTree`] owns its
//! root comments, every [`Comment`] owns its replies. There are no parent
//! pointers; everything that needs ancestry walks down from the roots.
//!
//! ```text
//! ThreadTree
//! ├── Comment #1            depth 0
//! │   ├── Comment #11       depth 1
//! │   │   └── Comment #111  depth 2
//! │   └── Comment #12       depth 1
//! └── Comment #2            depth 0
//! ```
//!
//! Per-node UI state (collapsed, composer open, local score) is kept out
//! of here on purpose; see `view_state`.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a comment, unique across a whole thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommentId(pub u64);

impl fmt::Display for CommentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One node of a discussion thread.
#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    pub id: CommentId,
    pub author_handle: String,
    pub body_text: String,
    /// Relative age as shown to the user ("2 hours ago").
    pub created_at_label: String,
    /// Score as received; local votes live in the view state.
    pub score: i64,
    pub is_original_poster: bool,
    /// Replies in insertion order.
    pub children: Vec<Comment>,
}

impl Comment {
    /// A leaf comment with no score and no label.
    pub fn new(id: u64, author_handle: impl Into<String>, body_text: impl Into<String>) -> Self {
        Self {
            id: CommentId(id),
            author_handle: author_handle.into(),
            body_text: body_text.into(),
            created_at_label: String::new(),
            score: 0,
            is_original_poster: false,
            children: Vec::new(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.created_at_label = label.into();
        self
    }

    pub fn with_score(mut self, score: i64) -> Self {
        self.score = score;
        self
    }

    pub fn with_children(mut self, children: Vec<Comment>) -> Self {
        self.children = children;
        self
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of comments in this subtree, including `self`.
    pub fn subtree_len(&self) -> usize {
        DepthFirst::new(std::slice::from_ref(self)).count()
    }
}

/// Where a freshly posted reply goes among its siblings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplyPlacement {
    /// Append after existing replies (insertion order).
    #[default]
    NewestLast,
    /// Put the new reply before existing ones.
    NewestFirst,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    /// The id already exists somewhere in the thread.
    DuplicateId(CommentId),
    /// No comment with this id to attach a reply to.
    UnknownParent(CommentId),
}

impl fmt::Display for TreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TreeError::DuplicateId(id) => write!(f, "duplicate comment id {id}"),
            TreeError::UnknownParent(id) => write!(f, "no comment with id {id} to reply to"),
        }
    }
}

impl std::error::Error for TreeError {}

/// The ordered root comments of one post.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ThreadTree {
    roots: Vec<Comment>,
}

impl ThreadTree {
    /// Build a tree, rejecting any id that appears twice.
    pub fn new(roots: Vec<Comment>) -> Result<Self, TreeError> {
        let mut seen = HashSet::new();
        for (_, comment) in DepthFirst::new(&roots) {
            if !seen.insert(comment.id) {
                return Err(TreeError::DuplicateId(comment.id));
            }
        }
        Ok(Self { roots })
    }

    pub fn roots(&self) -> &[Comment] {
        &self.roots
    }

    /// Total number of comments at every depth.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Pre-order walk yielding `(depth, comment)`, roots at depth 0.
    pub fn iter(&self) -> DepthFirst<'_> {
        DepthFirst::new(&self.roots)
    }

    pub fn find(&self, id: CommentId) -> Option<&Comment> {
        self.iter().find(|(_, c)| c.id == id).map(|(_, c)| c)
    }

    pub fn contains(&self, id: CommentId) -> bool {
        self.find(id).is_some()
    }

    /// Edge count from the nearest root, or `None` if absent.
    pub fn depth_of(&self, id: CommentId) -> Option<usize> {
        self.iter().find(|(_, c)| c.id == id).map(|(depth, _)| depth)
    }

    /// Ids strictly below `id`, in pre-order.
    pub fn descendant_ids(&self, id: CommentId) -> Vec<CommentId> {
        self.find(id)
            .map(|comment| {
                DepthFirst::new(&comment.children)
                    .map(|(_, c)| c.id)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Splice a newly created reply under `parent_id`.
    ///
    /// Ids in `reply` (including its own replies, if any) must not already
    /// exist in the tree. On error the tree is unchanged.
    pub fn insert_reply(
        &mut self,
        parent_id: CommentId,
        reply: Comment,
        placement: ReplyPlacement,
    ) -> Result<(), TreeError> {
        let mut incoming = HashSet::new();
        for (_, c) in DepthFirst::new(std::slice::from_ref(&reply)) {
            if !incoming.insert(c.id) || self.contains(c.id) {
                return Err(TreeError::DuplicateId(c.id));
            }
        }

        let parent =
            find_in_mut(&mut self.roots, parent_id).ok_or(TreeError::UnknownParent(parent_id))?;
        match placement {
            ReplyPlacement::NewestLast => parent.children.push(reply),
            ReplyPlacement::NewestFirst => parent.children.insert(0, reply),
        }
        Ok(())
    }

    /// Recompute `is_original_poster` against the post author's handle.
    pub fn mark_original_poster(&mut self, post_author: &str) {
        let mut stack: Vec<&mut Comment> = self.roots.iter_mut().collect();
        while let Some(comment) = stack.pop() {
            comment.is_original_poster = comment.author_handle == post_author;
            stack.extend(comment.children.iter_mut());
        }
    }
}

fn find_in_mut(comments: &mut [Comment], id: CommentId) -> Option<&mut Comment> {
    let mut stack: Vec<&mut Comment> = comments.iter_mut().rev().collect();
    while let Some(comment) = stack.pop() {
        if comment.id == id {
            return Some(comment);
        }
        stack.extend(comment.children.iter_mut().rev());
    }
    None
}

/// Pre-order iterator over a forest with an explicit stack, so arbitrarily
/// deep chains do not grow the call stack.
pub struct DepthFirst<'a> {
    stack: Vec<(usize, &'a Comment)>,
}

impl<'a> DepthFirst<'a> {
    fn new(roots: &'a [Comment]) -> Self {
        Self {
            stack: roots.iter().rev().map(|c| (0, c)).collect(),
        }
    }
}

impl<'a> Iterator for DepthFirst<'a> {
    type Item = (usize, &'a Comment);

    fn next(&mut self) -> Option<Self::Item> {
        let (depth, comment) = self.stack.pop()?;
        self.stack
            .extend(comment.children.iter().rev().map(|c| (depth + 1, c)));
        Some((depth, comment))
    }
}
