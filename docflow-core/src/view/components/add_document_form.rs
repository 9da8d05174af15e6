//! src/view/components/add_document_form.rs
//! ============================================================================
//! # AddDocumentFormView: the three cards of the upload form
//!
//! Left: document information. Right: drop zone with the staged file list,
//! then send settings. A button row sits under both columns.

use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, HighlightSpacing, List, ListItem, ListState, Paragraph},
};
use stagr::StagedFile;

use crate::{
    model::document_form::{AddDocumentForm, FormField},
    view::{icons, theme},
};

pub struct AddDocumentFormView;

impl AddDocumentFormView {
    pub fn new() -> Self {
        Self
    }

    pub fn render_form(&self, frame: &mut Frame<'_>, form: &AddDocumentForm, area: Rect) {
        let [body, buttons] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(area);
        let [left, right] =
            Layout::horizontal([Constraint::Fill(1), Constraint::Fill(1)]).areas(body);
        let [files, settings] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(8)]).areas(right);

        self.render_info(frame, form, left);
        self.render_files(frame, form, files);
        self.render_settings(frame, form, settings);
        self.render_buttons(frame, buttons);
    }

    fn card(title: &str, focused: bool) -> Block<'_> {
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .title(format!(" {title} "))
            .title_style(theme::title_style())
            .border_style(if focused {
                theme::focused_border_style()
            } else {
                theme::border_style()
            })
            .style(theme::base_style())
    }

    fn label_style(focused: bool) -> Style {
        if focused {
            Style::default().fg(theme::PURPLE).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme::FOREGROUND)
        }
    }

    /// Label, value (or placeholder) and an optional error line.
    fn field_lines<'a>(form: &'a AddDocumentForm, field: FormField, value: &'a str) -> Vec<Line<'a>> {
        let focused = form.focus == field;
        let marker = if focused { "▶ " } else { "  " };

        let value_line = if value.is_empty() {
            Line::styled(format!("  {}", field.hint()), theme::muted_style())
        } else {
            let mut spans = vec![Span::raw("  "), Span::styled(value, Style::default().fg(theme::FOREGROUND))];
            if focused && field.is_text() {
                spans.push(Span::styled("▏", Style::default().fg(theme::PURPLE)));
            }
            Line::from(spans)
        };

        let mut lines = vec![
            Line::from(vec![
                Span::styled(marker, Style::default().fg(theme::PURPLE)),
                Span::styled(field.label(), Self::label_style(focused)),
            ]),
            value_line,
        ];
        if let Some(error) = form.field_error(field) {
            lines.push(Line::styled(format!("  {error}"), theme::error_style()));
        }
        lines.push(Line::default());
        lines
    }

    fn render_info(&self, frame: &mut Frame<'_>, form: &AddDocumentForm, area: Rect) {
        let focused = matches!(
            form.focus,
            FormField::DocumentType
                | FormField::Number
                | FormField::Date
                | FormField::Amount
                | FormField::Counterparty
                | FormField::Comment
        );

        let doc_type = form.document_type.map_or("", |t| t.label());
        let doc_type = if doc_type.is_empty() { String::new() } else { format!("‹ {doc_type} ›") };
        let counterparty = form
            .counterparty_label()
            .map_or_else(String::new, |label| format!("‹ {label} ›"));

        let mut lines = Vec::with_capacity(24);
        lines.extend(Self::field_lines(form, FormField::DocumentType, &doc_type));
        lines.extend(Self::field_lines(form, FormField::Number, &form.number));
        lines.extend(Self::field_lines(form, FormField::Date, &form.date));
        lines.extend(Self::field_lines(form, FormField::Amount, &form.amount));
        lines.extend(Self::field_lines(form, FormField::Counterparty, &counterparty));
        lines.extend(Self::field_lines(form, FormField::Comment, &form.comment));

        frame.render_widget(
            Paragraph::new(lines).block(Self::card("Информация о документе", focused)),
            area,
        );
    }

    fn render_files(&self, frame: &mut Frame<'_>, form: &AddDocumentForm, area: Rect) {
        let focused = form.focus == FormField::Files;
        let block = Self::card("Загрузка файлов", focused);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let has_error = form.field_error(FormField::Files).is_some();
        let [zone, error, list] = Layout::vertical([
            Constraint::Length(6),
            Constraint::Length(u16::from(has_error)),
            Constraint::Fill(1),
        ])
        .areas(inner);

        self.render_drop_zone(frame, form, focused, zone);

        if let Some(message) = form.field_error(FormField::Files) {
            frame.render_widget(Paragraph::new(message).style(theme::error_style()), error);
        }

        self.render_file_list(frame, form, list);
    }

    fn render_drop_zone(&self, frame: &mut Frame<'_>, form: &AddDocumentForm, focused: bool, area: Rect) {
        let active = form.is_drag_active();
        let accent = if active {
            theme::GREEN
        } else if focused {
            theme::PURPLE
        } else {
            theme::COMMENT
        };

        let lines = vec![
            Line::styled(icons::UPLOAD_ICON, Style::default().fg(accent)),
            Line::styled(
                "Перетащите файлы сюда",
                Style::default().fg(theme::FOREGROUND).add_modifier(Modifier::BOLD),
            ),
            Line::styled("или нажмите кнопку ниже для выбора", theme::muted_style()),
            Line::styled(
                " Выбрать файлы (o) ",
                Style::default().fg(theme::BACKGROUND).bg(accent),
            ),
        ];

        let zone = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Double)
            .border_style(Style::default().fg(accent))
            .title_bottom(Line::styled(form.policy().describe(), theme::muted_style()).centered());
        let zone = if active { zone.style(Style::default().bg(theme::CURRENT_LINE)) } else { zone };

        frame.render_widget(
            Paragraph::new(lines).alignment(Alignment::Center).block(zone),
            area,
        );
    }

    fn file_item(file: &StagedFile) -> ListItem<'_> {
        let mut spans = vec![
            Span::styled(format!("{} ", icons::file_icon(file.kind)), Style::default().fg(theme::CYAN)),
            Span::styled(file.name.as_str(), Style::default().fg(theme::FOREGROUND)),
            Span::styled(format!("  {}", file.display_size()), theme::muted_style()),
        ];
        if file.has_preview() {
            spans.push(Span::styled(
                format!("  {}", icons::IMAGE_ICON),
                Style::default().fg(theme::PINK),
            ));
        }
        ListItem::new(Line::from(spans))
    }

    fn render_file_list(&self, frame: &mut Frame<'_>, form: &AddDocumentForm, area: Rect) {
        let files = form.files();
        let title = Line::styled(
            format!("Загруженные файлы ({})", files.len()),
            theme::header_style(),
        );

        if files.is_empty() {
            frame.render_widget(Paragraph::new(title), area);
            return;
        }

        let items: Vec<ListItem> = files.iter().map(Self::file_item).collect();
        let mut state = ListState::default().with_selected(form.file_cursor());

        let list = List::new(items)
            .block(Block::default().title(title))
            .highlight_style(theme::highlight_style())
            .highlight_symbol("▶ ")
            .highlight_spacing(HighlightSpacing::Always);
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn render_settings(&self, frame: &mut Frame<'_>, form: &AddDocumentForm, area: Rect) {
        let focused = form.focus.is_checkbox();

        let lines: Vec<Line> = [
            (FormField::RequireSignature, form.require_signature),
            (FormField::NotifyEmail, form.notify_email),
            (FormField::Urgent, form.urgent),
        ]
        .into_iter()
        .flat_map(|(field, checked)| {
            let is_focused = form.focus == field;
            [
                Line::from(vec![
                    Span::styled(
                        format!("{} ", icons::checkbox(checked)),
                        Style::default().fg(if checked { theme::GREEN } else { theme::COMMENT }),
                    ),
                    Span::styled(field.label(), Self::label_style(is_focused)),
                ]),
                Line::styled(format!("    {}", field.hint()), theme::muted_style()),
            ]
        })
        .collect();

        frame.render_widget(
            Paragraph::new(lines).block(Self::card("Настройки отправки", focused)),
            area,
        );
    }

    fn render_buttons(&self, frame: &mut Frame<'_>, area: Rect) {
        let line = Line::from(vec![
            Span::styled(" Esc ", Style::default().fg(theme::BACKGROUND).bg(theme::COMMENT)),
            Span::styled(" Отмена   ", Style::default().fg(theme::FOREGROUND)),
            Span::styled(" Ctrl+S ", Style::default().fg(theme::BACKGROUND).bg(theme::GREEN)),
            Span::styled(" Отправить документ ", Style::default().fg(theme::FOREGROUND)),
        ]);
        frame.render_widget(
            Paragraph::new(line).alignment(Alignment::Right).style(theme::base_style()),
            area,
        );
    }
}

impl Default for AddDocumentFormView {
    fn default() -> Self {
        Self::new()
    }
}
