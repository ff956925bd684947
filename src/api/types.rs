//! Wire types for the comment backend.
//!
//! The listing endpoint is not owned by this client, so [`WireComment`] is
//! deliberately forgiving: it accepts the camelCase names of the thread
//! model, the shorter names used by older fixtures (`author`, `content`,
//! `timeAgo`, `votes`, `isOp`, `replies`) and the backend's own shape
//! (`text`, `author: { username }`, `createdAt`).

use std::vec;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::comment::{Comment, CommentId};

/// Body of `POST /api/SubmitComment`.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SubmitCommentRequest<'a> {
    pub parent_id: CommentId,
    pub content: &'a str,
}

/// Author as sent by the backend: either a bare handle or a user object.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum WireAuthor {
    Handle(String),
    Profile { username: String },
}

impl WireAuthor {
    fn into_handle(self) -> String {
        match self {
            WireAuthor::Handle(handle) => handle,
            WireAuthor::Profile { username } => username,
        }
    }
}

/// One comment (and its replies) as it arrives over the wire.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WireComment {
    pub id: CommentId,
    #[serde(alias = "author")]
    pub author_handle: WireAuthor,
    #[serde(alias = "content", alias = "text")]
    pub body_text: String,
    #[serde(default, alias = "timeAgo")]
    pub created_at_label: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default, alias = "votes")]
    pub score: i64,
    #[serde(default, alias = "isOp")]
    pub is_original_poster: bool,
    #[serde(default, alias = "replies")]
    pub children: Vec<WireComment>,
}

/// Parse a comment listing body.
///
/// Threads have no depth limit, so serde_json's recursion guard is off and
/// the stack grows on demand while descending into replies.
pub fn parse_listing(body: &[u8]) -> Result<Vec<WireComment>, serde_json::Error> {
    let mut de = serde_json::Deserializer::from_slice(body);
    de.disable_recursion_limit();
    let listing = Vec::<WireComment>::deserialize(serde_stacker::Deserializer::new(&mut de))?;
    de.end()?;
    Ok(listing)
}

impl WireComment {
    /// Convert into the thread model, deriving a relative time label from
    /// `createdAt` when the backend did not send one.
    ///
    /// Walks the replies with an explicit stack rather than recursion.
    pub fn into_comment(self, now: DateTime<Utc>) -> Comment {
        let mut current = self.open(now);
        let mut ancestors: Vec<(Comment, vec::IntoIter<WireComment>)> = Vec::new();
        loop {
            match current.1.next() {
                Some(child) => {
                    ancestors.push(current);
                    current = child.open(now);
                }
                None => match ancestors.pop() {
                    Some(mut parent) => {
                        parent.0.children.push(current.0);
                        current = parent;
                    }
                    None => return current.0,
                },
            }
        }
    }

    /// This comment without its replies, plus the replies still to convert.
    fn open(self, now: DateTime<Utc>) -> (Comment, vec::IntoIter<WireComment>) {
        let created_at_label = match (self.created_at_label, self.created_at.as_deref()) {
            (Some(label), _) => label,
            (None, Some(raw)) => parse_timestamp(raw)
                .map(|then| relative_label(then, now))
                .unwrap_or_default(),
            (None, None) => String::new(),
        };

        let comment = Comment {
            id: self.id,
            author_handle: self.author_handle.into_handle(),
            body_text: self.body_text,
            created_at_label,
            score: self.score,
            is_original_poster: self.is_original_poster,
            children: Vec::with_capacity(self.children.len()),
        };
        (comment, self.children.into_iter())
    }
}

/// Parse an RFC 3339 timestamp, or a zone-less ISO-8601 one (read as UTC).
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Human-readable age of `then` as seen from `now` ("2 hours ago").
pub fn relative_label(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = (now - then).num_seconds();
    if secs < 60 {
        return "just now".to_string();
    }

    let (amount, unit) = match secs {
        s if s < 3_600 => (s / 60, "minute"),
        s if s < 86_400 => (s / 3_600, "hour"),
        s if s < 30 * 86_400 => (s / 86_400, "day"),
        _ => return then.format("%b %d, %Y").to_string(),
    };

    if amount == 1 {
        format!("1 {unit} ago")
    } else {
        format!("{amount} {unit}s ago")
    }
}
