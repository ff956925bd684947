//! # ToastStack Component
//!
//! Success and error notifications, stacked in the bottom-right corner of
//! the thread area with the newest at the bottom. Expiry is handled by the
//! core `ToastQueue`; this only draws what is still queued.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, BorderType, Clear, Paragraph};

use crate::core::notify::{Toast, ToastLevel, ToastQueue};
use crate::tui::component::Component;

const MAX_WIDTH: u16 = 44;
const TOAST_HEIGHT: u16 = 3;

pub struct ToastStack<'a> {
    pub toasts: &'a ToastQueue,
}

impl<'a> ToastStack<'a> {
    pub fn new(toasts: &'a ToastQueue) -> Self {
        Self { toasts }
    }

    fn style(toast: &Toast) -> (Style, &'static str) {
        match toast.level {
            ToastLevel::Success => (Style::default().fg(Color::Green), " ✓ "),
            ToastLevel::Error => (Style::default().fg(Color::Red), " ✗ "),
        }
    }
}

impl Component for ToastStack<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let width = MAX_WIDTH.min(area.width);
        if width < 8 {
            return;
        }
        let x = area.right() - width;
        let mut bottom = area.bottom();

        // newest first, drawn upwards from the bottom edge
        for toast in self.toasts.iter().rev() {
            if bottom < area.y + TOAST_HEIGHT {
                break;
            }
            let rect = Rect::new(x, bottom - TOAST_HEIGHT, width, TOAST_HEIGHT);
            let (style, icon) = Self::style(toast);
            let block = Block::bordered()
                .border_type(BorderType::Rounded)
                .border_style(style)
                .title(icon);
            frame.render_widget(Clear, rect);
            frame.render_widget(Paragraph::new(toast.message.as_str()).block(block), rect);
            bottom -= TOAST_HEIGHT;
        }
    }
}
