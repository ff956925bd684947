//! # Core Application Logic
//!
//! Threadline's business logic: the comment tree, per-node view state, the
//! reply composer and the reducer that ties them together. It knows nothing
//! about any specific UI technology.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • ThreadTree (data)    │
//!                    │  • ThreadViewState      │
//!                    │  • Action + update()    │
//!                    │                         │
//!                    │  No I/O. No UI.         │
//!                    └───────────┬─────────────┘
//!                                │
//!                 ┌──────────────┴──────────────┐
//!                 ▼                             ▼
//!          ┌────────────┐                ┌────────────┐
//!          │    TUI     │                │    API     │
//!          │  Adapter   │                │  (reqwest) │
//!          │ (ratatui)  │                │            │
//!          └────────────┘                └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`comment`]: `Comment`, `CommentId` and the owned `ThreadTree`
//! - [`node`]: recursive rendering of a tree into display rows
//! - [`view_state`]: collapse flags, open composers and local scores
//! - [`composer`]: reply validation and submission
//! - [`state`]: The `App` struct, all application state in one place
//! - [`action`]: The `Action` enum and the `update()` reducer
//! - [`session`]: read-only bearer token lookup
//! - [`notify`]: success/error toasts
//! - [`config`]: layered configuration

pub mod action;
pub mod comment;
pub mod composer;
pub mod config;
pub mod fixture;
pub mod node;
pub mod notify;
pub mod session;
pub mod state;
pub mod view_state;
