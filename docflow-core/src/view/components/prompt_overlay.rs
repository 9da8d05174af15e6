//! src/view/components/prompt_overlay.rs
//! ============================================================================
//! # PromptOverlay: single-line input for search, go-to and file picking

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::Style,
    text::Line,
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::{model::ui_state::UIState, view::theme};

pub struct PromptOverlay;

impl PromptOverlay {
    pub fn new() -> Self {
        Self
    }

    #[allow(clippy::cast_possible_truncation)]
    pub fn render_prompt(&self, frame: &mut Frame<'_>, ui: &UIState, area: Rect) {
        let overlay_area = Self::input_rect(area);
        frame.render_widget(Clear, overlay_area);

        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} ", ui.get_overlay_title()))
            .title_alignment(Alignment::Center)
            .border_style(theme::focused_border_style())
            .style(Style::default().bg(theme::BACKGROUND));

        let inner = block.inner(overlay_area);
        let width = inner.width.max(1) as usize;

        // Keep the cursor in view when the input is wider than the box.
        let before_cursor = ui.input[..ui.input_cursor].chars().count();
        let skip = before_cursor.saturating_sub(width - 1);
        let shown: String = ui.input.chars().skip(skip).take(width).collect();

        frame.render_widget(
            Paragraph::new(shown)
                .block(block)
                .style(Style::default().fg(theme::FOREGROUND)),
            overlay_area,
        );

        frame.set_cursor_position((inner.x + (before_cursor - skip) as u16, inner.y));

        let help_text = vec![
            Line::raw(ui.prompt_hint()),
            Line::raw("Enter подтвердить · Esc отмена"),
        ];

        let help_area = Rect {
            x: overlay_area.x,
            y: overlay_area.y + overlay_area.height,
            width: overlay_area.width,
            height: 2,
        };
        if help_area.bottom() <= area.bottom() {
            frame.render_widget(
                Paragraph::new(help_text)
                    .style(theme::muted_style())
                    .alignment(Alignment::Center),
                help_area,
            );
        }
    }

    fn input_rect(area: Rect) -> Rect {
        let [_, row, _] = Layout::vertical([
            Constraint::Percentage(35),
            Constraint::Length(3),
            Constraint::Fill(1),
        ])
        .areas(area);
        let [_, col, _] = Layout::horizontal([
            Constraint::Percentage(20),
            Constraint::Percentage(60),
            Constraint::Percentage(20),
        ])
        .areas(row);
        col
    }
}

impl Default for PromptOverlay {
    fn default() -> Self {
        Self::new()
    }
}
