//! # TUI Components
//!
//! All UI components for the terminal interface.
//!
//! ## Component Architecture
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! Created each frame from the data they show:
//! - `TitleBar`: post id, comment count, status
//! - `CommentRow`: one comment (full or hidden) with its thread lines
//! - `ReplyBox`: an open reply form
//! - `ToastStack`: success/error notifications
//!
//! ### Stateful Components (Event-Driven)
//!
//! - `ThreadList`: scrollable thread with selection and hit testing, backed
//!   by a persistent `ThreadListState`
//! - `ReplyEditor`: edits a composer's text and emits `ReplyBoxEvent`s
//!
//! Components receive external data as props rather than reaching into
//! `App`, which keeps them testable against a `TestBackend`:
//!
//! ```rust,ignore
//! TitleBar::new(app.post_id, &app.status_message, app.is_loading, frame)
//!     .render(frame, title_area);
//! ```
//!
//! ## Module Structure
//!
//! ```text
//! components/
//! ├── mod.rs           (this file)
//! ├── title_bar.rs     (Top status bar)
//! ├── comment_row.rs   (Single comment renderer)
//! ├── thread_list.rs   (Scrollable thread container)
//! ├── toast_stack.rs   (Notifications overlay)
//! └── reply_box/       (Inline reply form and editor)
//! ```

pub mod comment_row;
pub mod reply_box;
pub mod thread_list;
mod title_bar;
mod toast_stack;

pub use reply_box::{ReplyBoxEvent, ReplyEditor};
pub use thread_list::{ThreadHit, ThreadList, ThreadListState};
pub use title_bar::TitleBar;
pub use toast_stack::ToastStack;
