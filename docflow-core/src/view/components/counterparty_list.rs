//! src/view/components/counterparty_list.rs
//! ============================================================================
//! # CounterpartyList: submenu tabs and the counterparty table

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Cell, HighlightSpacing, Paragraph, Row, Table, TableState, Tabs},
};

use crate::{
    model::{
        catalog::Counterparty,
        screens::{CounterpartiesScreen, CounterpartySection},
    },
    view::{icons, theme},
};

pub struct CounterpartyList;

impl CounterpartyList {
    pub fn new() -> Self {
        Self
    }

    pub fn render_counterparties(
        &self,
        frame: &mut Frame<'_>,
        screen: &CounterpartiesScreen,
        counterparties: &[Counterparty],
        invitations: usize,
        area: Rect,
    ) {
        let [tabs_area, body] =
            Layout::vertical([Constraint::Length(3), Constraint::Fill(1)]).areas(area);

        let titles: Vec<Line> = CounterpartySection::ALL
            .iter()
            .map(|section| match section {
                CounterpartySection::Invitations if invitations > 0 => {
                    Line::from(format!("{} ({invitations})", section.label()))
                }
                _ => Line::from(section.label()),
            })
            .collect();
        let selected = CounterpartySection::ALL
            .iter()
            .position(|s| *s == screen.section)
            .unwrap_or(0);

        let tabs = Tabs::new(titles)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Контрагенты ")
                    .title_style(theme::title_style())
                    .border_style(theme::border_style()),
            )
            .style(theme::base_style())
            .highlight_style(Style::default().fg(theme::YELLOW).add_modifier(Modifier::BOLD))
            .select(selected);
        frame.render_widget(tabs, tabs_area);

        match screen.section {
            CounterpartySection::Invitations => {
                let text = format!(
                    "Приглашений: {invitations}. Enter открывает список приглашений."
                );
                Self::render_message(frame, &text, body);
            }
            CounterpartySection::Blocked => {
                Self::render_message(frame, "Заблокированных контрагентов нет", body);
            }
            CounterpartySection::Invite | CounterpartySection::Yours => {
                self.render_table(frame, screen, counterparties, body);
            }
        }
    }

    fn render_message(frame: &mut Frame<'_>, text: &str, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(theme::border_style())
            .style(theme::base_style());
        frame.render_widget(
            Paragraph::new(text).style(theme::muted_style()).block(block),
            area,
        );
    }

    fn render_table(
        &self,
        frame: &mut Frame<'_>,
        screen: &CounterpartiesScreen,
        counterparties: &[Counterparty],
        area: Rect,
    ) {
        let filter = &screen.list.filter;
        let visible = filter.apply_filter(counterparties);

        let mut title = format!(" {} · {} ", visible.len(), filter.status_filter_label());
        if !filter.search_text().is_empty() {
            title.push_str(&format!("· «{}» ", filter.search_text()));
        }

        let block = Block::default()
            .borders(Borders::ALL)
            .title(title)
            .title_style(theme::title_style())
            .border_style(theme::border_style())
            .style(theme::base_style());

        if visible.is_empty() {
            Self::render_message(frame, "Контрагенты не найдены", area);
            return;
        }

        let header = Row::new(vec!["", "Название", "ИНН", "КПП", "Адрес", ""])
            .style(theme::header_style())
            .bottom_margin(1);

        let rows: Vec<Row> = visible
            .iter()
            .map(|cp| {
                Row::new(vec![
                    Cell::from(icons::checkbox(filter.is_selected(&cp.id))),
                    Cell::from(cp.name.as_str()),
                    Cell::from(cp.inn.as_str()),
                    Cell::from(cp.kpp.as_str()),
                    Cell::from(cp.address.as_str()).style(theme::muted_style()),
                    Cell::from(cp.status.action_label())
                        .style(Style::default().fg(theme::counterparty_status_color(cp.status))),
                ])
                .style(Style::default().fg(theme::FOREGROUND))
            })
            .collect();

        let widths = [
            Constraint::Length(3),
            Constraint::Fill(2),
            Constraint::Length(12),
            Constraint::Length(10),
            Constraint::Fill(2),
            Constraint::Length(28),
        ];

        let mut table_state = TableState::default().with_selected(screen.list.cursor.selected);
        let table = Table::new(rows, widths)
            .header(header)
            .block(block)
            .row_highlight_style(theme::highlight_style())
            .highlight_symbol("▶ ")
            .highlight_spacing(HighlightSpacing::Always);

        frame.render_stateful_widget(table, area, &mut table_state);
    }
}

impl Default for CounterpartyList {
    fn default() -> Self {
        Self::new()
    }
}
