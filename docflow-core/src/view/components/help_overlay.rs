//! Help overlay: key bindings grouped by screen, opened on the tab that
//! matches the current route. The footer names today's log file.

use std::path::PathBuf;

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph, Tabs, Wrap},
};

use crate::{model::route::Route, view::theme};

const TABS: [&str; 4] = ["Общие", "Списки", "Документ", "Добавление"];

const GLOBAL: &[(&str, &str)] = &[
    ("1-4", "Разделы меню"),
    ("n", "Добавить документ"),
    ("g", "Перейти по адресу"),
    ("Esc / Backspace", "Назад"),
    ("? / F1", "Справка"),
    ("q / Ctrl+C", "Выход"),
];

const LISTS: &[(&str, &str)] = &[
    ("↑↓ / j k", "Перемещение"),
    ("Home / End", "Первая / последняя строка"),
    ("Enter", "Открыть"),
    ("Space", "Отметить строку"),
    ("a", "Отметить все видимые"),
    ("f", "Фильтр по статусу"),
    ("/", "Поиск"),
    ("x", "Сбросить фильтры"),
    ("Tab", "Следующий подраздел контрагентов"),
    ("i", "Пригласить / принять контрагента"),
    ("y / d", "Принять / отклонить приглашение"),
];

const DETAIL: &[(&str, &str)] = &[
    ("s", "Подписать"),
    ("r", "Отказать"),
    ("p", "Отправить на согласование"),
    ("d", "Скачать"),
    ("P", "Печать"),
    ("Delete", "Удалить"),
    ("j / k", "Прокрутка истории"),
];

const FORM: &[(&str, &str)] = &[
    ("Tab / Shift+Tab", "Следующее / предыдущее поле"),
    ("← →", "Выбор типа и контрагента"),
    ("Space", "Переключить флажок"),
    ("Вставка пути", "Перетащить файлы в форму"),
    ("o / Ctrl+O", "Выбрать файлы"),
    ("↑↓ / Delete", "Список файлов, удалить файл"),
    ("Ctrl+S", "Отправить документ"),
    ("Esc", "Отмена"),
];

pub struct HelpOverlay {
    selected_tab: usize,
    log_file: PathBuf,
}

impl HelpOverlay {
    pub fn new(route: &Route, log_file: PathBuf) -> Self {
        let selected_tab = match route {
            Route::Documents | Route::Counterparties | Route::Invitations => 1,
            Route::Document(_) => 2,
            Route::AddDocument => 3,
        };
        Self {
            selected_tab,
            log_file,
        }
    }

    pub fn render_help(&self, frame: &mut Frame<'_>, area: Rect) {
        frame.render_widget(Clear, area);

        let [tabs_area, content] =
            Layout::vertical([Constraint::Length(3), Constraint::Min(0)]).areas(area);

        let tabs = Tabs::new(TABS)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Справка ")
                    .title_alignment(Alignment::Center)
                    .border_style(Style::default().fg(theme::CYAN)),
            )
            .style(theme::base_style())
            .highlight_style(Style::default().fg(theme::YELLOW).add_modifier(Modifier::BOLD))
            .select(self.selected_tab);
        frame.render_widget(tabs, tabs_area);

        let mut lines = Self::section(TABS[0], GLOBAL);
        if self.selected_tab > 0 {
            let bindings = match self.selected_tab {
                1 => LISTS,
                2 => DETAIL,
                _ => FORM,
            };
            lines.push(Line::default());
            lines.extend(Self::section(TABS[self.selected_tab], bindings));
        }

        lines.push(Line::default());
        lines.push(Line::from(vec![
            Span::styled("Журнал: ", theme::muted_style()),
            Span::raw(self.log_file.display().to_string()),
        ]));

        let paragraph = Paragraph::new(Text::from(lines))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(theme::PURPLE))
                    .style(Style::default().bg(theme::BACKGROUND)),
            )
            .style(Style::default().fg(theme::FOREGROUND))
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, content);
    }

    fn section(title: &'static str, bindings: &[(&'static str, &'static str)]) -> Vec<Line<'static>> {
        let mut lines = Vec::with_capacity(bindings.len() + 1);
        lines.push(Line::styled(title, theme::header_style()));
        lines.extend(bindings.iter().map(|(key, what)| {
            Line::from(vec![
                Span::styled(format!("  {key:<18}"), Style::default().fg(theme::CYAN)),
                Span::raw(*what),
            ])
        }));
        lines
    }
}
