use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Paragraph, Wrap};

use crate::core::node::render_thread;
use crate::core::state::App;
use crate::tui::component::Component;
use crate::tui::components::{ThreadList, TitleBar, ToastStack};
use crate::tui::{InputMode, TuiState};

const BROWSE_HELP: &str =
    "↑/↓ select · Space collapse · r reply · +/- vote · Tab edit reply · q quit";
const COMPOSE_HELP: &str = "Enter post · Esc cancel · Tab browse · Ctrl+J newline";

pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState, spinner_frame: usize) {
    use Constraint::{Length, Min};
    let layout = Layout::vertical([Length(1), Min(0), Length(1)]);
    let [title_area, main_area, help_area] = layout.areas(frame.area());

    TitleBar::new(app.post_id, &app.status_message, app.is_loading, spinner_frame)
        .render(frame, title_area);

    if let Some(error_msg) = &app.error {
        draw_error_view(frame, main_area, error_msg);
    } else {
        let rows = render_thread(&app.tree, &app.view);
        let focused_reply = match tui.input_mode {
            InputMode::Compose(id) => Some((id, tui.reply_cursor(id))),
            InputMode::Browse => None,
        };
        ThreadList::new(&mut tui.thread, &rows, &app.view, focused_reply, app.is_loading)
            .render(frame, main_area);

        if let Some(position) = tui.thread.cursor {
            frame.set_cursor_position(position);
        }
    }

    ToastStack::new(&app.toasts).render(frame, main_area);

    let help = match tui.input_mode {
        InputMode::Browse => BROWSE_HELP,
        InputMode::Compose(_) => COMPOSE_HELP,
    };
    frame.render_widget(
        Line::styled(help, Style::default().fg(Color::DarkGray)),
        help_area,
    );
}

fn draw_error_view(frame: &mut Frame, area: Rect, error_msg: &str) {
    let error_paragraph = Paragraph::new(error_msg)
        .block(Block::bordered().title("ERROR"))
        .style(Style::default().fg(Color::Red))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });

    frame.render_widget(error_paragraph, area);
}
