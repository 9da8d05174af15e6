//! src/view/components/notification_overlay.rs

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style, Stylize},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};
use tracing::{debug, instrument};

use crate::{
    model::ui_state::{Notification, NotificationLevel},
    view::theme,
};

pub struct NotificationOverlay;

impl NotificationOverlay {
    pub fn new() -> Self {
        Self
    }

    #[instrument(
        level = "trace",
        skip_all,
        fields(level = ?notification.level, message_len = notification.message.len())
    )]
    pub fn render_notification(&self, frame: &mut Frame<'_>, notification: &Notification, area: Rect) {
        frame.render_widget(Clear, area);

        let border_style = Style::default().fg(theme::notification_color(notification.level));
        let (title, icon) = match notification.level {
            NotificationLevel::Info => ("Информация", "ℹ"),
            NotificationLevel::Warning => ("Внимание", "⚠"),
            NotificationLevel::Error => ("Ошибка", "✕"),
            NotificationLevel::Success => ("Готово", "✓"),
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" {icon} {title} "))
            .title_style(border_style.bold())
            .border_style(border_style)
            .style(Style::default().bg(theme::BACKGROUND));

        let inner = block.inner(area);
        frame.render_widget(block, area);

        // Errors stay until dismissed and get a hint line.
        if notification.auto_dismiss.is_some() {
            let message = Paragraph::new(notification.message.as_str())
                .style(Style::default().fg(theme::FOREGROUND))
                .wrap(Wrap { trim: true });
            frame.render_widget(message, inner);
            return;
        }

        let [message_area, dismiss_area] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(inner);

        let message = Paragraph::new(notification.message.as_str())
            .style(Style::default().fg(theme::FOREGROUND))
            .wrap(Wrap { trim: true })
            .alignment(Alignment::Left);
        frame.render_widget(message, message_area);

        let dismiss = Paragraph::new("Esc, чтобы закрыть")
            .style(
                Style::default()
                    .fg(theme::COMMENT)
                    .add_modifier(Modifier::ITALIC),
            )
            .alignment(Alignment::Center);
        frame.render_widget(dismiss, dismiss_area);

        debug!(message = %notification.message, "sticky notification shown");
    }
}

impl Default for NotificationOverlay {
    fn default() -> Self {
        Self::new()
    }
}
