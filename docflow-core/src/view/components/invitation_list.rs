//! src/view/components/invitation_list.rs

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Cell, HighlightSpacing, Paragraph, Row, Table, TableState},
};

use crate::{
    model::{catalog::Invitation, screens::InvitationsScreen},
    view::theme,
};

pub struct InvitationList;

impl InvitationList {
    pub fn new() -> Self {
        Self
    }

    pub fn render_invitations(
        &self,
        frame: &mut Frame<'_>,
        screen: &InvitationsScreen,
        invitations: &[Invitation],
        area: Rect,
    ) {
        let visible = screen.filter.apply_filter(invitations);

        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" Приглашения ({}) ", invitations.len()))
            .title_style(theme::title_style())
            .border_style(theme::border_style())
            .style(theme::base_style());

        if visible.is_empty() {
            let text = if invitations.is_empty() {
                "Нет новых приглашений"
            } else {
                "Ничего не найдено"
            };
            frame.render_widget(
                Paragraph::new(text)
                    .alignment(Alignment::Center)
                    .style(theme::muted_style())
                    .block(block),
                area,
            );
            return;
        }

        let header = Row::new(vec!["Организация", "ИНН", "КПП", "Адрес", "Дата"])
            .style(theme::header_style())
            .bottom_margin(1);

        let rows: Vec<Row> = visible
            .iter()
            .map(|inv| {
                Row::new(vec![
                    Cell::from(inv.name.as_str()),
                    Cell::from(inv.inn.as_str()),
                    Cell::from(inv.kpp.as_str()),
                    Cell::from(inv.address.as_str()).style(theme::muted_style()),
                    Cell::from(inv.invited_at.format("%d.%m.%Y").to_string()),
                ])
                .style(Style::default().fg(theme::FOREGROUND))
            })
            .collect();

        let widths = [
            Constraint::Fill(2),
            Constraint::Length(13),
            Constraint::Length(10),
            Constraint::Fill(2),
            Constraint::Length(10),
        ];

        let mut table_state = TableState::default().with_selected(screen.cursor.selected);
        let table = Table::new(rows, widths)
            .header(header)
            .block(block.title_bottom(Line::styled(
                " y Принять · d Отклонить ",
                theme::muted_style(),
            )))
            .row_highlight_style(theme::highlight_style())
            .highlight_symbol("▶ ")
            .highlight_spacing(HighlightSpacing::Always);

        frame.render_stateful_widget(table, area, &mut table_state);
    }
}

impl Default for InvitationList {
    fn default() -> Self {
        Self::new()
    }
}
