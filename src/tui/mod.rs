//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the thread,
//! and translates keyboard and mouse events into core::Action values.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Input Modes
//!
//! - **Browse**: arrows select comments, Space collapses, `r` opens a reply.
//! - **Compose(id)**: keys edit the reply under comment `id`. Esc closes
//!   the composer, Tab goes back to browsing and leaves it open.
//!
//! ## Redraw Strategy
//!
//! While something is in flight (thread loading, a reply posting) or a
//! toast is showing, the loop redraws every ~80ms so the spinner moves and
//! toasts expire on time. Otherwise it sleeps up to 500ms and only redraws
//! on events.

mod component;
mod components;
mod event;
mod ui;

use std::collections::HashMap;
use std::io::stdout;
use std::sync::{Arc, mpsc};
use std::time::{Duration, Instant};

use crossterm::cursor::{Hide, SetCursorStyle, Show};
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;
use log::{debug, info, warn};

use crate::api::{ApiError, CommentBackend, HttpBackend};
use crate::core::action::{Action, Effect, update};
use crate::core::comment::CommentId;
use crate::core::composer::{SubmitTicket, deliver};
use crate::core::config::ResolvedConfig;
use crate::core::fixture;
use crate::core::session::{FileSessionStore, MemorySessionStore, SessionStore};
use crate::core::state::App;
use crate::core::view_state::VoteDirection;
use crate::tui::component::EventHandler;
use crate::tui::components::{ReplyBoxEvent, ReplyEditor, ThreadHit, ThreadListState};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

/// Modal input mode: determines how keyboard events are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Browse,
    /// Editing the reply under this comment.
    Compose(CommentId),
}

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    pub thread: ThreadListState,
    pub input_mode: InputMode,
    /// Caret byte offset per open composer
    pub reply_cursors: HashMap<CommentId, usize>,
}

impl Default for TuiState {
    fn default() -> Self {
        Self::new()
    }
}

impl TuiState {
    pub fn new() -> Self {
        Self {
            thread: ThreadListState::new(),
            input_mode: InputMode::Browse,
            reply_cursors: HashMap::new(),
        }
    }

    pub fn reply_cursor(&self, id: CommentId) -> usize {
        self.reply_cursors.get(&id).copied().unwrap_or(0)
    }

    /// Drop caret state for composers that are no longer open and leave
    /// compose mode if its composer went away (posted, or collapsed).
    pub fn sync_with(&mut self, app: &App) {
        self.reply_cursors
            .retain(|id, _| app.view.composer(*id).is_some());
        if let InputMode::Compose(id) = self.input_mode
            && app.view.composer(id).is_none()
        {
            debug!("Composer {} closed, back to browsing", id);
            self.input_mode = InputMode::Browse;
        }
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        // Kitty keyboard protocol is harmlessly ignored by terminals that don't support it
        execute!(
            stdout(),
            EnableMouseCapture,
            EnableBracketedPaste,
            Show,
            SetCursorStyle::SteadyBlock,
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
            )
        )?;
        info!("Terminal modes enabled (mouse, bracketed paste, keyboard enhancement)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(
            stdout(),
            PopKeyboardEnhancementFlags,
            DisableMouseCapture,
            DisableBracketedPaste,
            Hide
        );
    }
}

/// Inline token wins; otherwise read the session directory on each lookup.
pub fn build_session(config: &ResolvedConfig) -> Arc<dyn SessionStore> {
    if config.auth_token.is_some() {
        return Arc::new(MemorySessionStore::with_token(config.auth_token.clone()));
    }
    match config.session_dir.clone().or_else(FileSessionStore::default_dir) {
        Some(dir) => {
            info!("Reading session token from {}", dir.display());
            Arc::new(FileSessionStore::new(dir))
        }
        None => {
            warn!("No home directory and no token configured; replies will be rejected");
            Arc::new(MemorySessionStore::new())
        }
    }
}

pub fn run(config: ResolvedConfig, demo: bool) -> std::io::Result<()> {
    let backend: Arc<dyn CommentBackend> = Arc::new(HttpBackend::new(config.base_url.clone()));
    let session = build_session(&config);
    let mut app = App::new(backend, session, &config);
    let mut tui = TuiState::new();

    // Channel for actions from background tasks
    let (tx, rx) = mpsc::channel();

    if demo {
        info!("Demo mode: showing the built-in sample thread");
        app = app.with_tree(fixture::sample_thread());
    } else {
        let effect = update(&mut app, Action::LoadThread);
        apply_effect(&app, effect, &tx);
    }

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();

    let start_time = Instant::now();
    let mut needs_redraw = true; // Force first frame

    loop {
        tui.sync_with(&app);
        if app.toasts.expire(Instant::now()) {
            needs_redraw = true;
        }

        let animating = app.is_loading || !app.toasts.is_empty() || has_submission_in_flight(&app);
        if animating {
            needs_redraw = true;
        }

        if needs_redraw {
            let spinner_frame = (start_time.elapsed().as_secs_f32() * 12.0) as usize;
            terminal.draw(|f| ui::draw_ui(f, &app, &mut tui, spinner_frame))?;
            needs_redraw = false;
        }

        let timeout = if animating {
            Duration::from_millis(80)
        } else {
            Duration::from_millis(500)
        };
        let first_event = poll_event_timeout(timeout);
        if first_event.is_some() {
            needs_redraw = true;
        }

        // Process first event + drain ALL pending events before next draw
        let mut should_quit = false;
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            if handle_event(&mut app, &mut tui, event, &tx) {
                should_quit = true;
                break;
            }
        }

        if should_quit {
            break;
        }

        // Results from background tasks
        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received: {:?}", action);
            let effect = update(&mut app, action);
            apply_effect(&app, effect, &tx);
        }
    }

    ratatui::restore();
    info!("Threadline exiting");
    Ok(())
}

fn has_submission_in_flight(app: &App) -> bool {
    app.view
        .open_composers()
        .into_iter()
        .any(|id| app.view.composer(id).is_some_and(|c| c.is_submitting()))
}

/// Run an action through the reducer and start whatever I/O it asks for.
/// Returns true if the app should quit.
fn dispatch(app: &mut App, action: Action, tx: &mpsc::Sender<Action>) -> bool {
    let effect = update(app, action);
    apply_effect(app, effect, tx)
}

fn apply_effect(app: &App, effect: Effect, tx: &mpsc::Sender<Action>) -> bool {
    match effect {
        Effect::None => false,
        Effect::Quit => true,
        Effect::FetchThread(post_id) => {
            spawn_fetch(app.backend.clone(), post_id, app.request_timeout, tx.clone());
            false
        }
        Effect::SpawnSubmit(ticket) => {
            spawn_submit(app.backend.clone(), ticket, app.request_timeout, tx.clone());
            false
        }
    }
}

/// Returns true if the app should quit.
fn handle_event(
    app: &mut App,
    tui: &mut TuiState,
    event: TuiEvent,
    tx: &mpsc::Sender<Action>,
) -> bool {
    match event {
        TuiEvent::Resize => return false,
        TuiEvent::ForceQuit => return dispatch(app, Action::Quit, tx),
        TuiEvent::ScrollUp
        | TuiEvent::ScrollDown
        | TuiEvent::ScrollPageUp
        | TuiEvent::ScrollPageDown => {
            tui.thread.handle_event(&event);
            return false;
        }
        TuiEvent::MouseClick(column, row) => {
            return handle_click(app, tui, column, row, tx);
        }
        _ => {}
    }

    match tui.input_mode {
        InputMode::Compose(id) => handle_compose_event(app, tui, id, &event, tx),
        InputMode::Browse => handle_browse_event(app, tui, &event, tx),
    }
}

fn handle_click(
    app: &mut App,
    tui: &mut TuiState,
    column: u16,
    row: u16,
    tx: &mpsc::Sender<Action>,
) -> bool {
    let Some(hit) = tui.thread.hit_test(column, row) else {
        return false;
    };
    debug!("Click at ({}, {}) hit {:?}", column, row, hit);
    match hit {
        // Collapsing never moves the selection or the scroll position
        ThreadHit::ThreadLine(id) => dispatch(app, Action::Collapse(id), tx),
        ThreadHit::Expand(id) => {
            tui.thread.selected = Some(id);
            dispatch(app, Action::Expand(id), tx)
        }
        ThreadHit::Vote(id, direction) => dispatch(app, Action::Vote(id, direction), tx),
        ThreadHit::Reply(id) => {
            tui.thread.selected = Some(id);
            open_reply(app, tui, id, tx)
        }
        ThreadHit::Composer(id) => {
            tui.input_mode = InputMode::Compose(id);
            false
        }
        ThreadHit::Comment(id) => {
            tui.thread.selected = Some(id);
            false
        }
    }
}

/// Toggle the composer under `id`, focusing it if it opened.
fn open_reply(app: &mut App, tui: &mut TuiState, id: CommentId, tx: &mpsc::Sender<Action>) -> bool {
    let quit = dispatch(app, Action::ToggleComposer(id), tx);
    if app.view.composer(id).is_some() {
        tui.input_mode = InputMode::Compose(id);
    }
    quit
}

fn handle_browse_event(
    app: &mut App,
    tui: &mut TuiState,
    event: &TuiEvent,
    tx: &mpsc::Sender<Action>,
) -> bool {
    let selected = tui.thread.selected;
    match event {
        TuiEvent::CursorUp | TuiEvent::InputChar('k') => tui.thread.select_prev(),
        TuiEvent::CursorDown | TuiEvent::InputChar('j') => tui.thread.select_next(),
        TuiEvent::CursorHome => {
            tui.thread.selected = None;
            tui.thread.select_next();
        }
        TuiEvent::InputChar('q') => return dispatch(app, Action::Quit, tx),
        TuiEvent::InputChar(' ') | TuiEvent::Submit => {
            if let Some(id) = selected {
                return dispatch(app, Action::ToggleCollapse(id), tx);
            }
        }
        TuiEvent::InputChar('r') => {
            if let Some(id) = selected {
                return open_reply(app, tui, id, tx);
            }
        }
        TuiEvent::InputChar('+') => {
            if let Some(id) = selected {
                return dispatch(app, Action::Vote(id, VoteDirection::Up), tx);
            }
        }
        TuiEvent::InputChar('-') => {
            if let Some(id) = selected {
                return dispatch(app, Action::Vote(id, VoteDirection::Down), tx);
            }
        }
        TuiEvent::Tab => {
            if let Some(id) = selected
                && app.view.composer(id).is_some()
            {
                tui.input_mode = InputMode::Compose(id);
            }
        }
        _ => {}
    }
    false
}

fn handle_compose_event(
    app: &mut App,
    tui: &mut TuiState,
    id: CommentId,
    event: &TuiEvent,
    tx: &mpsc::Sender<Action>,
) -> bool {
    let Some(composer) = app.view.composer_mut(id) else {
        tui.input_mode = InputMode::Browse;
        return false;
    };

    let locked = composer.is_submitting();
    let cursor = tui.reply_cursors.entry(id).or_insert(composer.content.len());
    let reply_event = ReplyEditor::new(&mut composer.content, cursor, locked).handle_event(event);

    match reply_event {
        Some(ReplyBoxEvent::Submit) => dispatch(app, Action::SubmitReply(id), tx),
        Some(ReplyBoxEvent::Cancel) => {
            tui.input_mode = InputMode::Browse;
            tui.reply_cursors.remove(&id);
            dispatch(app, Action::CancelReply(id), tx)
        }
        Some(ReplyBoxEvent::Blur) => {
            tui.input_mode = InputMode::Browse;
            false
        }
        Some(ReplyBoxEvent::ContentChanged) | None => false,
    }
}

fn spawn_fetch(
    backend: Arc<dyn CommentBackend>,
    post_id: u64,
    timeout: Duration,
    tx: mpsc::Sender<Action>,
) {
    info!("Fetching comments for post {}", post_id);
    tokio::spawn(async move {
        let result = match tokio::time::timeout(timeout, backend.list_comments(post_id)).await {
            Ok(result) => result,
            Err(_) => {
                warn!("Comment listing timed out after {}s", timeout.as_secs());
                Err(ApiError::Timeout {
                    after_secs: timeout.as_secs(),
                })
            }
        };
        if tx.send(Action::ThreadLoaded(result)).is_err() {
            warn!("Failed to send ThreadLoaded: receiver dropped");
        }
    });
}

fn spawn_submit(
    backend: Arc<dyn CommentBackend>,
    ticket: SubmitTicket,
    timeout: Duration,
    tx: mpsc::Sender<Action>,
) {
    info!("Posting reply to {}", ticket.parent_id);
    tokio::spawn(async move {
        let result = deliver(backend.as_ref(), &ticket, timeout).await;
        let action = Action::reply_finished(&ticket, result);
        if tx.send(action).is_err() {
            warn!(
                "Failed to send reply result for {}: receiver dropped",
                ticket.parent_id
            );
        }
    });
}
