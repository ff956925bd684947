//! # CommentRow Component
//!
//! Draws one comment of the thread: the full form (header, wrapped body,
//! action bar) or the one-line hidden form of a collapsed comment.
//!
//! ```text
//! │ │ u/coding_wizard · 3 hours ago [OP]
//! │ │ │ Body text, wrapped to the width left
//! │ │ │ after the thread lines.
//! │ │ │ ▲ 42 ▼  Reply
//! │ [+] u/melody_maker Comment hidden
//! ```
//!
//! Every row starts with one thread line per ancestor. A full comment adds
//! its own line beside the body; clicking it collapses the comment.
//!
//! Like `ReplyBox`, this is a transient widget: created per frame inside
//! the thread's scroll view, never stored.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Widget;

use crate::core::node::{RenderedRow, RowKind};

/// Columns taken by one thread line.
pub const INDENT: u16 = 2;
const THREAD_LINE: &str = "│";
pub const UPVOTE: &str = "▲";
pub const DOWNVOTE: &str = "▼";
pub const REPLY_LABEL: &str = "Reply";
pub const EXPAND_LABEL: &str = "[+]";

/// How many ancestor lines fit at `depth` in `width` columns.
///
/// Deep threads keep only the nearest ancestors so at least half the
/// width stays available for text.
pub fn shown_levels(depth: usize, width: u16) -> usize {
    let cap = (width / 2 / INDENT) as usize;
    depth.min(cap)
}

/// Ancestor thread lines plus, optionally, the comment's own line.
pub struct ThreadLines {
    pub levels: usize,
    pub own_line: bool,
    pub own_style: Style,
}

impl Widget for ThreadLines {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let ancestor_style = Style::default().fg(Color::DarkGray);
        for y in area.top()..area.bottom() {
            for level in 0..self.levels {
                let x = area.x + level as u16 * INDENT;
                if x < area.right() {
                    buf.set_string(x, y, THREAD_LINE, ancestor_style);
                }
            }
            let own_x = area.x + self.levels as u16 * INDENT;
            if self.own_line && own_x < area.right() {
                buf.set_string(own_x, y, THREAD_LINE, self.own_style);
            }
        }
    }
}

fn wrap_options(width: u16) -> textwrap::Options<'static> {
    textwrap::Options::new(width.max(1) as usize)
        .break_words(true)
        .word_separator(textwrap::WordSeparator::AsciiSpace)
}

/// The action bar text and the column offsets of its controls.
pub fn action_bar(score: i64) -> (String, ActionBarLayout) {
    let score_text = score.to_string();
    let downvote = 2 + score_text.chars().count() as u16 + 1;
    let reply = downvote + 3;
    let text = format!("{UPVOTE} {score_text} {DOWNVOTE}  {REPLY_LABEL}");
    (
        text,
        ActionBarLayout {
            upvote: 0,
            downvote,
            reply,
        },
    )
}

/// Column offsets within the action bar, relative to where it starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionBarLayout {
    pub upvote: u16,
    pub downvote: u16,
    pub reply: u16,
}

#[derive(Clone, Copy)]
pub struct CommentRow<'a> {
    pub row: RenderedRow<'a>,
    pub is_selected: bool,
}

impl<'a> CommentRow<'a> {
    pub fn new(row: RenderedRow<'a>, is_selected: bool) -> Self {
        Self { row, is_selected }
    }

    /// Rows needed for a comment at `depth` in `width` columns.
    ///
    /// The body is wrapped here with the same options `render` uses, so the
    /// list can lay out its scroll canvas before drawing anything.
    pub fn calculate_height(row: &RenderedRow<'_>, width: u16) -> u16 {
        match row.kind {
            RowKind::Hidden => 1,
            RowKind::Full | RowKind::Composer => {
                let body_lines = Self::body_lines(row, width).len() as u16;
                1 + body_lines + 1
            }
        }
    }

    fn text_x(row: &RenderedRow<'_>, width: u16) -> u16 {
        (shown_levels(row.depth, width) as u16 + 1) * INDENT
    }

    fn body_lines<'b>(row: &'b RenderedRow<'_>, width: u16) -> Vec<std::borrow::Cow<'b, str>> {
        let body_width = width.saturating_sub(Self::text_x(row, width));
        let body = row.comment.body_text.trim();
        if body.is_empty() {
            return vec![std::borrow::Cow::Borrowed("")];
        }
        textwrap::wrap(body, wrap_options(body_width))
    }

    fn header(&self) -> Line<'a> {
        let comment = self.row.comment;
        let author_style = if comment.is_original_poster {
            Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD)
        } else {
            Style::default().add_modifier(Modifier::BOLD)
        };

        let mut spans = vec![Span::styled(format!("u/{}", comment.author_handle), author_style)];
        if !comment.created_at_label.is_empty() {
            spans.push(Span::styled(
                format!(" · {}", comment.created_at_label),
                Style::default().fg(Color::DarkGray),
            ));
        }
        if comment.is_original_poster {
            spans.push(Span::styled(
                " [OP]",
                Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            ));
        }
        Line::from(spans)
    }

    fn render_hidden(&self, area: Rect, buf: &mut Buffer) {
        let levels = shown_levels(self.row.depth, area.width);
        ThreadLines {
            levels,
            own_line: false,
            own_style: Style::default(),
        }
        .render(area, buf);

        let x = area.x + levels as u16 * INDENT;
        let line = Line::from(vec![
            Span::styled(
                format!("{EXPAND_LABEL} "),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("u/{}", self.row.comment.author_handle),
                Style::default().fg(Color::DarkGray),
            ),
            Span::styled(
                " Comment hidden",
                Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
            ),
        ]);
        buf.set_line(x, area.y, &line, area.right().saturating_sub(x));
    }

    fn render_full(&self, area: Rect, buf: &mut Buffer) {
        let levels = shown_levels(self.row.depth, area.width);
        let own_style = if self.is_selected {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::Gray)
        };

        // Header: ancestors only, text starts where the own line would be
        ThreadLines {
            levels,
            own_line: false,
            own_style,
        }
        .render(Rect { height: 1, ..area }, buf);
        ThreadLines {
            levels,
            own_line: true,
            own_style,
        }
        .render(
            Rect {
                y: area.y + 1,
                height: area.height.saturating_sub(1),
                ..area
            },
            buf,
        );

        let header_x = area.x + levels as u16 * INDENT;
        buf.set_line(header_x, area.y, &self.header(), area.right().saturating_sub(header_x));

        let text_x = area.x + Self::text_x(&self.row, area.width);
        let text_width = area.right().saturating_sub(text_x);
        let body = Self::body_lines(&self.row, area.width);
        for (i, line) in body.iter().enumerate() {
            let y = area.y + 1 + i as u16;
            if y >= area.bottom() {
                break;
            }
            buf.set_stringn(text_x, y, line, text_width as usize, Style::default());
        }

        let bar_y = area.y + 1 + body.len() as u16;
        if bar_y < area.bottom() {
            let (bar, _) = action_bar(self.row.score);
            buf.set_stringn(
                text_x,
                bar_y,
                bar,
                text_width as usize,
                Style::default().fg(Color::Gray),
            );
        }

        if self.is_selected {
            let header_area = Rect {
                x: header_x,
                y: area.y,
                width: area.right().saturating_sub(header_x),
                height: 1,
            };
            buf.set_style(header_area, Style::default().bg(Color::DarkGray));
        }
    }
}

impl Widget for CommentRow<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match self.row.kind {
            RowKind::Hidden => self.render_hidden(area, buf),
            RowKind::Full => self.render_full(area, buf),
            // Composer rows are drawn by the reply box
            RowKind::Composer => {}
        }
    }
}
