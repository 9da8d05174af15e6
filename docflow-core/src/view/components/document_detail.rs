//! src/view/components/document_detail.rs
//! ============================================================================
//! # DocumentDetail: header, action bar, body and history timeline

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
};

use crate::{
    model::{catalog::Document, screens::DocumentScreen},
    util::money::format_rubles,
    view::{icons, theme},
};

const ACTIONS: [(&str, &str); 6] = [
    ("s", "Подписать"),
    ("r", "Отказать"),
    ("p", "Согласование"),
    ("d", "Скачать"),
    ("P", "Печать"),
    ("Del", "Удалить"),
];

pub struct DocumentDetail;

impl DocumentDetail {
    pub fn new() -> Self {
        Self
    }

    pub fn render_document(
        &self,
        frame: &mut Frame<'_>,
        screen: &DocumentScreen,
        document: &Document,
        area: Rect,
    ) {
        let [main, history] =
            Layout::horizontal([Constraint::Fill(2), Constraint::Fill(1)]).areas(area);
        let [header, actions, body] = Layout::vertical([
            Constraint::Length(6),
            Constraint::Length(3),
            Constraint::Fill(1),
        ])
        .areas(main);

        self.render_header(frame, document, header);
        self.render_actions(frame, actions);
        self.render_body(frame, document, body);
        self.render_history(frame, screen, document, history);
    }

    fn render_header(&self, frame: &mut Frame<'_>, doc: &Document, area: Rect) {
        let status = Span::styled(
            format!(" {} ", doc.status.label()),
            Style::default()
                .fg(theme::BACKGROUND)
                .bg(theme::document_status_color(doc.status)),
        );

        let lines = vec![
            Line::from(vec![
                Span::styled(doc.title.as_str(), theme::title_style()),
                Span::raw("  "),
                status,
            ]),
            Line::from(vec![
                Span::styled(format_rubles(doc.amount), Style::default().fg(theme::FOREGROUND).bold()),
                Span::styled(
                    format!("  НДС: {}", format_rubles(doc.vat)),
                    theme::muted_style(),
                ),
            ]),
            Line::from(format!(
                "Контрагент: {} · {}",
                doc.counterparty,
                doc.date.format("%d.%m.%Y")
            )),
            Line::styled(
                format!(
                    "Подразделение: {} · Документов в пакете: {}",
                    doc.department, doc.package_size
                ),
                theme::muted_style(),
            ),
        ];

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(theme::border_style())
            .style(theme::base_style());
        frame.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn render_actions(&self, frame: &mut Frame<'_>, area: Rect) {
        let spans: Vec<Span> = ACTIONS
            .iter()
            .flat_map(|(key, label)| {
                [
                    Span::styled(format!(" {key} "), Style::default().fg(theme::BACKGROUND).bg(theme::PURPLE)),
                    Span::styled(format!(" {label}  "), Style::default().fg(theme::FOREGROUND)),
                ]
            })
            .collect();

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(theme::border_style())
            .style(theme::base_style());
        frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
    }

    fn render_body(&self, frame: &mut Frame<'_>, doc: &Document, area: Rect) {
        let text = if doc.comment.is_empty() {
            "Предпросмотр содержимого недоступен".to_string()
        } else {
            doc.comment.clone()
        };
        let style = if doc.comment.is_empty() {
            theme::muted_style()
        } else {
            Style::default().fg(theme::FOREGROUND)
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Документ ")
            .title_style(theme::title_style())
            .border_style(theme::border_style())
            .style(theme::base_style());
        frame.render_widget(
            Paragraph::new(text)
                .style(style)
                .wrap(Wrap { trim: true })
                .block(block),
            area,
        );
    }

    fn render_history(
        &self,
        frame: &mut Frame<'_>,
        screen: &DocumentScreen,
        doc: &Document,
        area: Rect,
    ) {
        let skip = screen.history_scroll.min(doc.history.len().saturating_sub(1));

        let items: Vec<ListItem> = doc
            .history
            .iter()
            .skip(skip)
            .map(|entry| {
                let mut who = vec![
                    Span::styled(
                        format!("{} ", icons::history_icon(entry.kind)),
                        Style::default().fg(theme::CYAN),
                    ),
                    Span::styled(entry.person.as_str(), Style::default().fg(theme::FOREGROUND).bold()),
                ];
                if let Some(role) = &entry.role {
                    who.push(Span::styled(format!(" ({role})"), theme::muted_style()));
                }

                let mut lines = Vec::with_capacity(4);
                if let Some(company) = &entry.company {
                    lines.push(Line::styled(company.as_str(), theme::muted_style()));
                }
                lines.push(Line::from(who));
                lines.push(Line::from(entry.action.as_str()));
                lines.push(Line::styled(
                    entry.at.format("%d.%m.%Y %H:%M").to_string(),
                    theme::muted_style(),
                ));
                lines.push(Line::default());
                ListItem::new(lines)
            })
            .collect();

        let block = Block::default()
            .borders(Borders::ALL)
            .title(" История документа ")
            .title_style(theme::title_style())
            .border_style(theme::border_style())
            .style(theme::base_style());
        frame.render_widget(List::new(items).block(block), area);
    }
}

impl Default for DocumentDetail {
    fn default() -> Self {
        Self::new()
    }
}
