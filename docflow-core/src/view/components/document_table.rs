//! src/view/components/document_table.rs

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Cell, HighlightSpacing, Paragraph, Row, Table, TableState},
};

use crate::{
    model::{catalog::Document, screens::DocumentsScreen},
    util::money::format_rubles,
    view::{icons, theme},
};

pub struct DocumentTable;

impl DocumentTable {
    pub fn new() -> Self {
        Self
    }

    pub fn render_documents(
        &self,
        frame: &mut Frame<'_>,
        screen: &DocumentsScreen,
        documents: &[Document],
        area: Rect,
    ) {
        let visible = screen.filter.apply_filter(documents);

        let title = format!(
            " Документы ({}/{}) · {} ",
            visible.len(),
            documents.len(),
            screen.filter.status_filter_label()
        );
        let block = Block::default()
            .borders(Borders::ALL)
            .title(title)
            .title_style(theme::title_style())
            .border_style(theme::border_style())
            .style(theme::base_style());

        if visible.is_empty() {
            let text = if documents.is_empty() {
                "Документов пока нет. Нажмите n, чтобы добавить."
            } else {
                "Ничего не найдено. x сбрасывает фильтры."
            };
            frame.render_widget(
                Paragraph::new(text).style(theme::muted_style()).block(block),
                area,
            );
            return;
        }

        let header = Row::new(vec!["", "Номер", "Документ", "Контрагент", "Дата", "Сумма", "Статус"])
            .style(theme::header_style())
            .bottom_margin(1);

        let rows: Vec<Row> = visible
            .iter()
            .map(|doc| {
                let selected = screen.filter.is_selected(&doc.id);
                let mut title = doc.title.clone();
                if doc.urgent {
                    title.push_str(" !");
                }

                Row::new(vec![
                    Cell::from(icons::checkbox(selected)),
                    Cell::from(doc.number.as_str()),
                    Cell::from(title),
                    Cell::from(doc.counterparty.as_str()),
                    Cell::from(doc.date.format("%d.%m.%Y").to_string()),
                    Cell::from(Text::from(format_rubles(doc.amount)).alignment(Alignment::Right)),
                    Cell::from(doc.status.label())
                        .style(Style::default().fg(theme::document_status_color(doc.status))),
                ])
                .style(Style::default().fg(theme::FOREGROUND))
            })
            .collect();

        let widths = [
            Constraint::Length(3),
            Constraint::Length(8),
            Constraint::Fill(2),
            Constraint::Fill(1),
            Constraint::Length(10),
            Constraint::Length(16),
            Constraint::Length(20),
        ];

        let mut table_state = TableState::default().with_selected(screen.cursor.selected);

        let table = Table::new(rows, widths)
            .header(header)
            .block(block)
            .row_highlight_style(theme::highlight_style())
            .highlight_symbol("▶ ")
            .highlight_spacing(HighlightSpacing::Always);

        frame.render_stateful_widget(table, area, &mut table_state);
    }
}

impl Default for DocumentTable {
    fn default() -> Self {
        Self::new()
    }
}
