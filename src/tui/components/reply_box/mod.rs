//! # ReplyBox Component
//!
//! Inline reply form rendered directly under the comment being answered.
//!
//! The text itself lives in the core [`ReplyComposer`]; this module only
//! draws it and edits it. Two pieces:
//!
//! - [`ReplyBox`]: transient widget drawn inside the thread's scroll view.
//! - [`ReplyEditor`]: event handler over `&mut String` + cursor offset,
//!   emitting [`ReplyBoxEvent`]s for the parent to turn into actions.

mod edit;

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, Paragraph, Widget, Wrap};

use crate::core::composer::ReplyComposer;
use crate::tui::component::EventHandler;
use crate::tui::event::TuiEvent;

use edit::{
    VERTICAL_OVERHEAD, cursor_offset, inner_width, line_count, line_end, line_start,
    next_char_boundary, prev_char_boundary,
};

/// High-level events emitted by the reply editor
#[derive(Debug, Clone, PartialEq)]
pub enum ReplyBoxEvent {
    /// Enter pressed
    Submit,
    /// Esc pressed: close the composer
    Cancel,
    /// Tab pressed: back to browsing, composer stays open
    Blur,
    ContentChanged,
}

/// Draws one open composer.
pub struct ReplyBox<'a> {
    pub composer: &'a ReplyComposer,
    /// Handle of the comment being replied to
    pub replying_to: &'a str,
    pub is_focused: bool,
}

impl<'a> ReplyBox<'a> {
    pub fn new(composer: &'a ReplyComposer, replying_to: &'a str, is_focused: bool) -> Self {
        Self {
            composer,
            replying_to,
            is_focused,
        }
    }

    pub fn calculate_height(content: &str, width: u16) -> u16 {
        line_count(content, inner_width(width)) + VERTICAL_OVERHEAD
    }

    /// Cursor position relative to the top-left corner of the box.
    pub fn cursor_position(content: &str, cursor: usize, width: u16) -> (u16, u16) {
        let (col, row) = cursor_offset(content, cursor, inner_width(width));
        (col + 1, row + 1)
    }

    fn hint(&self) -> &'static str {
        if self.composer.is_submitting() {
            " Posting... "
        } else if self.is_focused {
            " Enter post · Esc cancel · Tab browse "
        } else {
            " r to edit "
        }
    }
}

impl Widget for ReplyBox<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let accent = if self.is_focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::DIM)
        };
        let submit_style = if self.composer.can_submit() {
            accent.add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(accent)
            .title(Line::styled(format!(" Reply to u/{} ", self.replying_to), accent))
            .title_bottom(Line::styled(self.hint(), submit_style).right_aligned());

        let body = if self.composer.content.is_empty() {
            Paragraph::new("What are your thoughts?").style(Style::default().fg(Color::DarkGray))
        } else {
            Paragraph::new(self.composer.content.as_str())
        };

        body.block(block)
            .wrap(Wrap { trim: false })
            .render(area, buf);
    }
}

/// Edits a composer's text in place.
pub struct ReplyEditor<'a> {
    pub content: &'a mut String,
    /// Byte offset into `content`
    pub cursor: &'a mut usize,
    /// True while a submission is in flight; text is frozen.
    pub locked: bool,
}

impl<'a> ReplyEditor<'a> {
    pub fn new(content: &'a mut String, cursor: &'a mut usize, locked: bool) -> Self {
        *cursor = (*cursor).min(content.len());
        Self {
            content,
            cursor,
            locked,
        }
    }

    fn edit(&mut self, event: &TuiEvent) -> Option<ReplyBoxEvent> {
        let pos = *self.cursor;
        match event {
            TuiEvent::InputChar(c) => {
                self.content.insert(pos, *c);
                *self.cursor += c.len_utf8();
            }
            TuiEvent::Paste(text) => {
                self.content.insert_str(pos, text);
                *self.cursor += text.len();
            }
            TuiEvent::Backspace if pos > 0 => {
                let prev = prev_char_boundary(self.content.as_str(), pos);
                self.content.drain(prev..pos);
                *self.cursor = prev;
            }
            TuiEvent::Delete if pos < self.content.len() => {
                let next = next_char_boundary(self.content.as_str(), pos);
                self.content.drain(pos..next);
            }
            TuiEvent::CursorLeft if pos > 0 => {
                *self.cursor = prev_char_boundary(self.content.as_str(), pos);
            }
            TuiEvent::CursorRight if pos < self.content.len() => {
                *self.cursor = next_char_boundary(self.content.as_str(), pos);
            }
            TuiEvent::CursorHome => *self.cursor = line_start(self.content.as_str(), pos),
            TuiEvent::CursorEnd => *self.cursor = line_end(self.content.as_str(), pos),
            _ => return None,
        }
        Some(ReplyBoxEvent::ContentChanged)
    }
}

impl EventHandler for ReplyEditor<'_> {
    type Event = ReplyBoxEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::Submit => Some(ReplyBoxEvent::Submit),
            TuiEvent::Escape => Some(ReplyBoxEvent::Cancel),
            TuiEvent::Tab => Some(ReplyBoxEvent::Blur),
            _ if self.locked => None,
            _ => self.edit(event),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::comment::CommentId;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn type_str(editor: &mut ReplyEditor<'_>, text: &str) {
        for c in text.chars() {
            editor.handle_event(&TuiEvent::InputChar(c));
        }
    }

    #[test]
    fn test_typing_and_backspace() {
        let mut content = String::new();
        let mut cursor = 0;
        let mut editor = ReplyEditor::new(&mut content, &mut cursor, false);

        type_str(&mut editor, "héllo");
        assert_eq!(
            editor.handle_event(&TuiEvent::Backspace),
            Some(ReplyBoxEvent::ContentChanged)
        );
        editor.handle_event(&TuiEvent::CursorLeft);
        editor.handle_event(&TuiEvent::CursorLeft);
        editor.handle_event(&TuiEvent::Backspace);

        assert_eq!(content, "hll");
        assert_eq!(cursor, 1);
    }

    #[test]
    fn test_backspace_at_start_is_noop() {
        let mut content = "abc".to_string();
        let mut cursor = 0;
        let mut editor = ReplyEditor::new(&mut content, &mut cursor, false);
        assert_eq!(editor.handle_event(&TuiEvent::Backspace), None);
    }

    #[test]
    fn test_control_keys() {
        let mut content = String::new();
        let mut cursor = 0;
        let mut editor = ReplyEditor::new(&mut content, &mut cursor, false);
        assert_eq!(editor.handle_event(&TuiEvent::Submit), Some(ReplyBoxEvent::Submit));
        assert_eq!(editor.handle_event(&TuiEvent::Escape), Some(ReplyBoxEvent::Cancel));
        assert_eq!(editor.handle_event(&TuiEvent::Tab), Some(ReplyBoxEvent::Blur));
    }

    #[test]
    fn test_locked_editor_freezes_text() {
        let mut content = "sent".to_string();
        let mut cursor = 4;
        let mut editor = ReplyEditor::new(&mut content, &mut cursor, true);
        assert_eq!(editor.handle_event(&TuiEvent::InputChar('!')), None);
        assert_eq!(editor.handle_event(&TuiEvent::Escape), Some(ReplyBoxEvent::Cancel));
        assert_eq!(content, "sent");
    }

    #[test]
    fn test_stale_cursor_is_clamped() {
        let mut content = "ab".to_string();
        let mut cursor = 10;
        let mut editor = ReplyEditor::new(&mut content, &mut cursor, false);
        editor.handle_event(&TuiEvent::InputChar('c'));
        assert_eq!(content, "abc");
    }

    #[test]
    fn test_height_grows_with_content() {
        assert_eq!(ReplyBox::calculate_height("", 40), 3);
        assert_eq!(ReplyBox::calculate_height("one\ntwo\nthree", 40), 5);
    }

    #[test]
    fn test_render_shows_target_and_placeholder() {
        let backend = TestBackend::new(50, 3);
        let mut terminal = Terminal::new(backend).unwrap();
        let composer = ReplyComposer::new(CommentId(1));

        terminal
            .draw(|f| f.render_widget(ReplyBox::new(&composer, "coding_wizard", true), f.area()))
            .unwrap();

        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains("Reply to u/coding_wizard"));
        assert!(text.contains("What are your thoughts?"));
    }
}
