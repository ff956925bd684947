//! # TitleBar Component
//!
//! Top status bar: which post is open, how many comments it has and what
//! the app is doing.
//!
//! Stateless. All props come from the parent:
//!
//! - `post_id`: the thread being shown (core config)
//! - `status_message`: comment count, "Posting reply...", load errors
//! - `is_loading` / `spinner_frame`: spinner while the listing is fetched
//!
//! ```text
//! Threadline | post #42 | 6 comments
//! Threadline | post #42 | ⠹ Loading comments...
//! ```

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::tui::component::Component;

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

pub struct TitleBar<'a> {
    pub post_id: u64,
    pub status_message: &'a str,
    pub is_loading: bool,
    pub spinner_frame: usize,
}

impl<'a> TitleBar<'a> {
    pub fn new(post_id: u64, status_message: &'a str, is_loading: bool, spinner_frame: usize) -> Self {
        Self {
            post_id,
            status_message,
            is_loading,
            spinner_frame,
        }
    }

    fn line(&self) -> Line<'a> {
        let mut spans = vec![
            Span::styled(
                "Threadline",
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!(" | post #{}", self.post_id)),
        ];
        if self.is_loading {
            let frame = SPINNER[self.spinner_frame % SPINNER.len()];
            spans.push(Span::raw(format!(" | {frame} {}", self.status_message)));
        } else if !self.status_message.is_empty() {
            spans.push(Span::raw(format!(" | {}", self.status_message)));
        }
        Line::from(spans)
    }
}

impl Component for TitleBar<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        frame.render_widget(self.line(), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn rendered(mut bar: TitleBar<'_>) -> String {
        let backend = TestBackend::new(60, 1);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| bar.render(f, f.area())).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect::<String>()
    }

    #[test]
    fn test_status_shown() {
        let text = rendered(TitleBar::new(42, "6 comments", false, 0));
        assert!(text.starts_with("Threadline | post #42 | 6 comments"));
    }

    #[test]
    fn test_empty_status_omitted() {
        let text = rendered(TitleBar::new(1, "", false, 0));
        assert_eq!(text.trim_end(), "Threadline | post #1");
    }

    #[test]
    fn test_spinner_while_loading() {
        let text = rendered(TitleBar::new(1, "Loading comments...", true, 2));
        assert!(text.contains("⠹ Loading comments..."));
    }
}
