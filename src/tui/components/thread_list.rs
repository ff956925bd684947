//! # ThreadList Component
//!
//! Scrollable view of the whole comment thread.
//!
//! ## Responsibilities
//!
//! - Lay out the flat row list produced by `core::node::render_thread`
//! - Draw comment rows and open reply boxes into a `ScrollView`
//! - Track the selected comment and keep it in view
//! - Hit testing for mouse clicks (thread lines, `[+]`, votes, Reply)
//!
//! ## Architecture
//!
//! `ThreadList` is a transient component (created each frame) that wraps
//! `&'a mut ThreadListState` (persistent state) plus the rows and view
//! state as props. Layout is recomputed on every render and stored in the
//! state so hit testing and keyboard navigation between frames see exactly
//! what was drawn.

use ratatui::Frame;
use ratatui::layout::{Alignment, Position, Rect, Size};
use ratatui::style::{Color, Style};
use ratatui::widgets::Paragraph;
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::core::comment::CommentId;
use crate::core::node::{RenderedRow, RowKind};
use crate::core::view_state::{ThreadViewState, VoteDirection};
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::comment_row::{
    CommentRow, INDENT, ThreadLines, action_bar, shown_levels,
};
use crate::tui::components::reply_box::ReplyBox;
use crate::tui::event::TuiEvent;

/// Where one rendered row sits on the scroll canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowSlot {
    pub id: CommentId,
    pub kind: RowKind,
    pub depth: usize,
    pub top: u16,
    pub height: u16,
    pub score: i64,
}

impl RowSlot {
    fn bottom(&self) -> u16 {
        self.top + self.height
    }
}

/// What a mouse click landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThreadHit {
    /// A thread line; collapses the comment that owns it.
    ThreadLine(CommentId),
    /// The `[+]` row of a collapsed comment.
    Expand(CommentId),
    Vote(CommentId, VoteDirection),
    Reply(CommentId),
    /// Inside an open reply box.
    Composer(CommentId),
    /// Anywhere else on a comment.
    Comment(CommentId),
}

/// Layout, scroll and selection state for the thread view.
/// Must be persisted in the parent TuiState.
pub struct ThreadListState {
    pub scroll_state: ScrollViewState,
    pub selected: Option<CommentId>,
    /// Layout of the last render
    pub slots: Vec<RowSlot>,
    /// Screen area of the last render
    pub area: Rect,
    /// Screen position of the focused reply box caret, if visible
    pub cursor: Option<Position>,
}

impl Default for ThreadListState {
    fn default() -> Self {
        Self::new()
    }
}

impl ThreadListState {
    pub fn new() -> Self {
        Self {
            scroll_state: ScrollViewState::default(),
            selected: None,
            slots: Vec::new(),
            area: Rect::default(),
            cursor: None,
        }
    }

    pub fn total_height(&self) -> u16 {
        self.slots.last().map_or(0, |s| s.bottom())
    }

    fn node_slots(&self) -> impl DoubleEndedIterator<Item = &RowSlot> {
        self.slots.iter().filter(|s| s.kind != RowKind::Composer)
    }

    fn selected_slot(&self) -> Option<&RowSlot> {
        let id = self.selected?;
        self.node_slots().find(|s| s.id == id)
    }

    /// Keep the selection on a visible comment (it may have been hidden by
    /// collapsing an ancestor).
    pub fn ensure_selection(&mut self) {
        if self.selected_slot().is_none() {
            let first = self.node_slots().next().map(|s| s.id);
            self.selected = first;
        }
    }

    pub fn select_next(&mut self) {
        let next = match self.selected_slot().copied() {
            Some(current) => self
                .node_slots()
                .find(|s| s.top > current.top)
                .map(|s| s.id),
            None => self.node_slots().next().map(|s| s.id),
        };
        if next.is_some() {
            self.selected = next;
            self.scroll_to_selected();
        }
    }

    pub fn select_prev(&mut self) {
        let prev = match self.selected_slot().copied() {
            Some(current) => self
                .node_slots()
                .rev()
                .find(|s| s.top < current.top)
                .map(|s| s.id),
            None => self.node_slots().next().map(|s| s.id),
        };
        if prev.is_some() {
            self.selected = prev;
            self.scroll_to_selected();
        }
    }

    /// Scroll so the selected comment is visible, aligning its top edge if
    /// it is taller than the viewport.
    pub fn scroll_to_selected(&mut self) {
        let Some(slot) = self.selected_slot().copied() else {
            return;
        };
        let offset_y = self.scroll_state.offset().y;
        let viewport = self.area.height;

        if slot.top < offset_y {
            self.scroll_state.set_offset(Position { x: 0, y: slot.top });
        } else if slot.bottom() > offset_y + viewport {
            let y = slot.bottom().saturating_sub(viewport).min(slot.top);
            self.scroll_state.set_offset(Position { x: 0, y });
        }
    }

    /// Clamp scroll offset so it never exceeds the content bounds.
    pub fn clamp_scroll(&mut self) {
        let max_y = self.total_height().saturating_sub(self.area.height);
        let current = self.scroll_state.offset();
        if current.y > max_y {
            self.scroll_state.set_offset(Position { x: current.x, y: max_y });
        }
    }

    /// Map a screen position to what was drawn there.
    pub fn hit_test(&self, column: u16, row: u16) -> Option<ThreadHit> {
        let area = self.area;
        if !area.contains(Position { x: column, y: row }) {
            return None;
        }
        let content_width = area.width.saturating_sub(1);
        let y = row - area.y + self.scroll_state.offset().y;
        let x = column - area.x;

        let index = self.slots.partition_point(|s| s.bottom() <= y);
        let slot = *self.slots.get(index)?;
        if y < slot.top {
            return None;
        }

        let levels = shown_levels(slot.depth, content_width);
        let column_level = (x / INDENT) as usize;
        let line_row = y - slot.top;

        if column_level < levels {
            let level = slot.depth - levels + column_level;
            return self.owner_at(index, level).map(ThreadHit::ThreadLine);
        }

        match slot.kind {
            RowKind::Hidden => Some(ThreadHit::Expand(slot.id)),
            RowKind::Composer => {
                if column_level == levels {
                    Some(ThreadHit::ThreadLine(slot.id))
                } else {
                    Some(ThreadHit::Composer(slot.id))
                }
            }
            RowKind::Full => {
                if line_row == 0 {
                    return Some(ThreadHit::Comment(slot.id));
                }
                if column_level == levels {
                    return Some(ThreadHit::ThreadLine(slot.id));
                }
                if line_row == slot.height - 1 {
                    let bar_x = (levels as u16 + 1) * INDENT;
                    if let Some(hit) = action_bar_hit(slot, x.saturating_sub(bar_x)) {
                        return Some(hit);
                    }
                }
                Some(ThreadHit::Comment(slot.id))
            }
        }
    }

    /// The comment whose thread line at `level` runs through slot `index`.
    fn owner_at(&self, index: usize, level: usize) -> Option<CommentId> {
        self.slots[..=index]
            .iter()
            .rev()
            .find(|s| s.kind == RowKind::Full && s.depth == level)
            .map(|s| s.id)
    }
}

fn action_bar_hit(slot: RowSlot, offset: u16) -> Option<ThreadHit> {
    let (text, layout) = action_bar(slot.score);
    let width = unicode_width::UnicodeWidthStr::width(text.as_str()) as u16;
    match offset {
        o if o == layout.upvote => Some(ThreadHit::Vote(slot.id, VoteDirection::Up)),
        o if o == layout.downvote => Some(ThreadHit::Vote(slot.id, VoteDirection::Down)),
        o if o >= layout.reply && o < width => Some(ThreadHit::Reply(slot.id)),
        _ => None,
    }
}

/// Compute canvas slots for `rows` at `width` columns.
pub fn layout_rows(rows: &[RenderedRow<'_>], view: &ThreadViewState, width: u16) -> Vec<RowSlot> {
    let mut top = 0u16;
    rows.iter()
        .map(|row| {
            let height = match row.kind {
                RowKind::Composer => {
                    let content = view
                        .composer(row.id())
                        .map_or("", |c| c.content.as_str());
                    ReplyBox::calculate_height(content, composer_width(row, width))
                }
                _ => CommentRow::calculate_height(row, width),
            };
            let slot = RowSlot {
                id: row.id(),
                kind: row.kind,
                depth: row.depth,
                top,
                height,
                score: row.score,
            };
            top = top.saturating_add(height);
            slot
        })
        .collect()
}

fn composer_x(row: &RenderedRow<'_>, width: u16) -> u16 {
    (shown_levels(row.depth, width) as u16 + 1) * INDENT
}

fn composer_width(row: &RenderedRow<'_>, width: u16) -> u16 {
    width.saturating_sub(composer_x(row, width))
}

/// Scrollable thread component.
/// Created fresh each frame with references to state and data.
pub struct ThreadList<'a> {
    pub state: &'a mut ThreadListState,
    pub rows: &'a [RenderedRow<'a>],
    pub view: &'a ThreadViewState,
    /// Composer that has keyboard focus, with its caret byte offset
    pub focused_reply: Option<(CommentId, usize)>,
    pub is_loading: bool,
}

impl<'a> ThreadList<'a> {
    pub fn new(
        state: &'a mut ThreadListState,
        rows: &'a [RenderedRow<'a>],
        view: &'a ThreadViewState,
        focused_reply: Option<(CommentId, usize)>,
        is_loading: bool,
    ) -> Self {
        Self {
            state,
            rows,
            view,
            focused_reply,
            is_loading,
        }
    }

    fn render_empty(&self, frame: &mut Frame, area: Rect) {
        let text = if self.is_loading {
            "Loading comments..."
        } else {
            "No comments yet."
        };
        let placeholder = Paragraph::new(text)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray));
        let y = area.y + area.height / 2;
        frame.render_widget(placeholder, Rect { y, height: 1, ..area });
    }
}

impl<'a> Component for ThreadList<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let content_width = area.width.saturating_sub(1); // -1 for scrollbar
        self.state.area = area;
        self.state.slots = layout_rows(self.rows, self.view, content_width);
        self.state.cursor = None;
        self.state.ensure_selection();
        self.state.clamp_scroll();

        if self.rows.is_empty() {
            self.render_empty(frame, area);
            return;
        }

        let total_height = self.state.total_height();
        let mut scroll_view = ScrollView::new(Size::new(content_width, total_height))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Automatic)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);

        for (row, slot) in self.rows.iter().zip(self.state.slots.iter()) {
            let rect = Rect::new(0, slot.top, content_width, slot.height);
            match row.kind {
                RowKind::Full | RowKind::Hidden => {
                    let is_selected = self.state.selected == Some(slot.id);
                    scroll_view.render_widget(CommentRow::new(*row, is_selected), rect);
                }
                RowKind::Composer => {
                    let Some(composer) = self.view.composer(slot.id) else {
                        continue;
                    };
                    let box_x = composer_x(row, content_width);
                    scroll_view.render_widget(
                        ThreadLines {
                            levels: shown_levels(row.depth, content_width),
                            own_line: true,
                            own_style: Style::default().fg(Color::Gray),
                        },
                        Rect { width: box_x, ..rect },
                    );

                    let focused_cursor = self
                        .focused_reply
                        .filter(|(id, _)| *id == slot.id)
                        .map(|(_, cursor)| cursor);
                    let box_rect = Rect {
                        x: box_x,
                        width: content_width.saturating_sub(box_x),
                        ..rect
                    };
                    scroll_view.render_widget(
                        ReplyBox::new(composer, &row.comment.author_handle, focused_cursor.is_some()),
                        box_rect,
                    );

                    if let Some(cursor) = focused_cursor {
                        let (cx, cy) =
                            ReplyBox::cursor_position(&composer.content, cursor, box_rect.width);
                        let offset_y = self.state.scroll_state.offset().y;
                        let canvas_y = slot.top + cy;
                        if canvas_y >= offset_y && canvas_y < offset_y + area.height {
                            self.state.cursor = Some(Position {
                                x: area.x + box_x + cx,
                                y: area.y + canvas_y - offset_y,
                            });
                        }
                    }
                }
            }
        }

        frame.render_stateful_widget(scroll_view, area, &mut self.state.scroll_state);
    }
}

/// Scrolling is handled on the state: `ThreadList` is recreated every
/// frame and cannot hold the offset itself.
impl EventHandler for ThreadListState {
    type Event = ();

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::ScrollUp => self.scroll_state.scroll_up(),
            TuiEvent::ScrollDown => {
                self.scroll_state.scroll_down();
                self.clamp_scroll();
            }
            TuiEvent::ScrollPageUp => self.scroll_state.scroll_page_up(),
            TuiEvent::ScrollPageDown => {
                self.scroll_state.scroll_page_down();
                self.clamp_scroll();
            }
            _ => {}
        }
        None
    }
}
