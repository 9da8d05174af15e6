//! src/view/components/sidebar.rs

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, Paragraph},
};

use crate::{
    model::{app_state::AppState, route::MenuSection},
    view::{icons, theme},
};

pub struct Sidebar;

impl Sidebar {
    pub fn new() -> Self {
        Self
    }

    pub fn render_sidebar(&self, frame: &mut Frame<'_>, app: &AppState, area: Rect) {
        let block = Block::default()
            .borders(Borders::RIGHT)
            .border_style(theme::border_style())
            .style(theme::base_style());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [profile, menu, hint] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Fill(1),
            Constraint::Length(2),
        ])
        .areas(inner);

        let who = Paragraph::new(vec![
            Line::styled(app.config.organization.as_str(), theme::title_style()),
            Line::styled(app.config.user_name.as_str(), theme::muted_style()),
        ]);
        frame.render_widget(who, profile);

        let active = app.menu_section();
        let items: Vec<ListItem> = MenuSection::ALL
            .iter()
            .enumerate()
            .map(|(i, section)| {
                let style = if *section == active {
                    Style::default().fg(theme::PURPLE).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(theme::FOREGROUND)
                };
                ListItem::new(Line::from(vec![
                    Span::styled(format!("{} ", i + 1), theme::muted_style()),
                    Span::styled(format!("{} {}", icons::menu_icon(*section), section.label()), style),
                ]))
            })
            .collect();
        frame.render_widget(List::new(items), menu);

        frame.render_widget(
            Paragraph::new(Line::styled(
                format!("{} n  Добавить документ", icons::UPLOAD_ICON),
                Style::default().fg(theme::GREEN),
            )),
            hint,
        );
    }
}

impl Default for Sidebar {
    fn default() -> Self {
        Self::new()
    }
}
