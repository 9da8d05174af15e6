//! src/view/components/status_bar.rs
//!
//! One line at the bottom: current route, selection count on list screens,
//! staged files on the form, and a help hint on the right.

use ratatui::{
    prelude::*,
    widgets::{Paragraph, Widget},
};
use stagr::format_size;

use crate::{
    model::{app_state::AppState, screens::Screen},
    view::theme,
};

pub struct StatusBar;

impl StatusBar {
    pub fn new() -> Self {
        Self
    }

    pub fn render_status(&self, frame: &mut Frame<'_>, app: &AppState, area: Rect) {
        let detail = match &app.screen {
            Screen::Documents(s) => format!("Выбрано: {}", s.filter.selected_count()),
            Screen::Counterparties(s) => format!(
                "{} · Выбрано: {}",
                s.section.label(),
                s.list.filter.selected_count()
            ),
            Screen::Invitations(_) => format!("Приглашений: {}", app.catalog.invitations().len()),
            Screen::Document(s) => format!("№ {}", s.id),
            Screen::AddDocument(form) => format!(
                "Файлов: {} · {}",
                form.files().len(),
                format_size(form.files().total_bytes())
            ),
        };

        let left_text = format!("{} | {} | {}", app.route.title(), app.route, detail);
        let right_text = if app.can_go_back() {
            "Esc назад · ? справка · q выход"
        } else {
            "? справка · q выход"
        };

        let [left, right] =
            Layout::horizontal([Constraint::Percentage(70), Constraint::Percentage(30)])
                .areas(area);

        Paragraph::new(left_text)
            .style(Style::default().fg(theme::FOREGROUND).bg(theme::CURRENT_LINE))
            .alignment(Alignment::Left)
            .render(left, frame.buffer_mut());

        Paragraph::new(right_text)
            .style(Style::default().fg(theme::COMMENT).bg(theme::CURRENT_LINE))
            .alignment(Alignment::Right)
            .render(right, frame.buffer_mut());
    }
}

impl Default for StatusBar {
    fn default() -> Self {
        Self::new()
    }
}
