//! # Backend API
//!
//! Everything that talks to the comment backend over HTTP lives here.
//! The rest of the crate only sees the [`CommentBackend`] trait, so tests
//! and the core reducer never need a live server.

pub mod client;
pub mod error;
pub mod types;

pub use client::{CommentBackend, HttpBackend};
pub use error::ApiError;
pub use types::{SubmitCommentRequest, WireComment};
