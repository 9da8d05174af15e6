//! src/view/ui.rs
//! ============================================================
//! Frame renderer. Draws sidebar, current screen and status bar
//! from a shared borrow of [`AppState`], then the overlays.

use std::time::Instant;

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};
use tracing::{instrument, trace, warn};

use crate::{
    model::{
        app_state::AppState,
        screens::Screen,
        ui_state::{NotificationLevel, UIOverlay},
    },
    view::components::{
        add_document_form::AddDocumentFormView, counterparty_list::CounterpartyList,
        document_detail::DocumentDetail, document_table::DocumentTable,
        help_overlay::HelpOverlay, invitation_list::InvitationList,
        notification_overlay::NotificationOverlay, prompt_overlay::PromptOverlay,
        sidebar::Sidebar, status_bar::StatusBar,
    },
    view::theme,
    Logger,
};

/// Sidebar width in cells.
const SIDEBAR_WIDTH: u16 = 30;

#[derive(Debug, Default)]
pub struct RenderStats {
    pub frames: u64,
    pub slow: u64,
    pub total: std::time::Duration,
}

pub struct UIRenderer {
    stats: RenderStats,
}

impl UIRenderer {
    pub fn new() -> Self {
        Self {
            stats: RenderStats::default(),
        }
    }

    pub fn stats(&self) -> &RenderStats {
        &self.stats
    }

    #[instrument(level = "trace", skip_all)]
    pub fn render(&mut self, f: &mut Frame<'_>, app: &AppState) {
        let start = Instant::now();
        let screen = f.area();

        let [content, status] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(screen);
        let [side, main] =
            Layout::horizontal([Constraint::Length(SIDEBAR_WIDTH), Constraint::Fill(1)])
                .areas(content);

        f.render_widget(Block::default().style(theme::base_style()), screen);
        Sidebar::new().render_sidebar(f, app, side);
        self.draw_main(f, app, main);
        StatusBar::new().render_status(f, app, status);
        self.draw_overlays(f, app, screen);

        let dur = start.elapsed();
        self.stats.total += dur;
        self.stats.frames += 1;
        if dur.as_millis() > 16 {
            self.stats.slow += 1;
            warn!(elapsed_ms = dur.as_millis() as u64, "slow frame");
        }
    }
}

impl UIRenderer {
    fn draw_main(&self, f: &mut Frame<'_>, app: &AppState, area: Rect) {
        match &app.screen {
            Screen::Documents(screen) => {
                DocumentTable::new().render_documents(f, screen, app.catalog.documents(), area);
            }
            Screen::Document(screen) => match app.catalog.document(&screen.id) {
                Some(document) => DocumentDetail::new().render_document(f, screen, document, area),
                None => self.draw_missing(f, &format!("Документ {} не найден", screen.id), area),
            },
            Screen::Counterparties(screen) => CounterpartyList::new().render_counterparties(
                f,
                screen,
                app.catalog.counterparties(),
                app.catalog.invitations().len(),
                area,
            ),
            Screen::Invitations(screen) => {
                InvitationList::new().render_invitations(f, screen, app.catalog.invitations(), area);
            }
            Screen::AddDocument(form) => AddDocumentFormView::new().render_form(f, form, area),
        }
    }

    fn draw_missing(&self, f: &mut Frame<'_>, msg: &str, r: Rect) {
        let b = Block::default()
            .title(" Документ ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::RED));
        f.render_widget(Paragraph::new(msg).block(b), r);
    }

    fn draw_overlays(&self, f: &mut Frame<'_>, app: &AppState, scr: Rect) {
        match app.ui.overlay {
            UIOverlay::Help => {
                let r = self.centered(scr, 80, 80);
                let log_file = Logger::current_log_file(&app.config.logging.directory);
                HelpOverlay::new(&app.route, log_file).render_help(f, r);
            }
            UIOverlay::Prompt => PromptOverlay::new().render_prompt(f, &app.ui, scr),
            UIOverlay::None => {}
        }

        if let Some(n) = &app.ui.notification {
            let r = self.notification_rect(scr, n.level);
            trace!(level = ?n.level, "drawing notification");
            NotificationOverlay::new().render_notification(f, n, r);
        }
    }
}

impl UIRenderer {
    fn centered(&self, r: Rect, w_pct: u16, h_pct: u16) -> Rect {
        let w = (r.width * w_pct / 100).min(r.width);
        let h = (r.height * h_pct / 100).min(r.height);
        Rect {
            x: r.x + (r.width - w) / 2,
            y: r.y + (r.height - h) / 2,
            width: w,
            height: h,
        }
    }

    fn notification_rect(&self, scr: Rect, lvl: NotificationLevel) -> Rect {
        let h = if lvl == NotificationLevel::Error { 5 } else { 3 };
        let w = (scr.width * 60) / 100;
        Rect {
            x: (scr.width - w) / 2,
            y: 2,
            width: w,
            height: h,
        }
        .intersection(scr)
    }
}

impl Default for UIRenderer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use ratatui::{Terminal, backend::TestBackend};

    use super::*;
    use crate::{config::Config, controller::actions::InputPromptType, model::route::Route};

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    fn draw(app: &AppState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(140, 40)).unwrap();
        let mut renderer = UIRenderer::new();
        terminal.draw(|f| renderer.render(f, app)).unwrap();
        assert_eq!(renderer.stats().frames, 1);
        buffer_text(&terminal)
    }

    #[test]
    fn renders_every_screen() {
        let mut app = AppState::new(Arc::new(Config::default()));
        assert!(draw(&app).contains("Документы"));

        app.navigate(Route::Document("1".into())).unwrap();
        assert!(draw(&app).contains("История документа"));

        app.navigate(Route::Counterparties).unwrap();
        assert!(draw(&app).contains("Контрагенты"));

        app.navigate(Route::Invitations).unwrap();
        assert!(draw(&app).contains("Приглашения"));

        app.navigate(Route::AddDocument).unwrap();
        let text = draw(&app);
        assert!(text.contains("Перетащите файлы сюда"));
        assert!(text.contains("Загруженные файлы (0)"));
    }

    #[test]
    fn overlays_draw_on_top() {
        let mut app = AppState::new(Arc::new(Config::default()));
        app.ui.toggle_help();
        let text = draw(&app);
        assert!(text.contains("Справка"));
        assert!(text.contains("logs/docflow.log."));

        app.ui.toggle_help();
        app.ui.open_prompt(InputPromptType::GoTo, "/invitations");
        assert!(draw(&app).contains("/invitations"));

        app.ui.close_overlay();
        app.navigate(Route::AddDocument).unwrap();
        app.ui.open_prompt(InputPromptType::PickFiles, "");
        app.ui.set_prompt_hint(".pdf,.docx");
        let text = draw(&app);
        assert!(text.contains(".pdf,.docx"));
        assert!(text.contains("Esc отмена"));

        app.ui.close_overlay();
        app.ui.show_error("Не удалось прочитать файл");
        assert!(draw(&app).contains("Ошибка"));
    }

    #[test]
    fn tiny_terminal_does_not_panic() {
        let app = AppState::new(Arc::new(Config::default()));
        let mut terminal = Terminal::new(TestBackend::new(20, 6)).unwrap();
        terminal.draw(|f| UIRenderer::new().render(f, &app)).unwrap();
    }
}
