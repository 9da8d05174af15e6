//! src/model/app_state.rs
//! ============================================================================
//! # AppState: everything the event loop mutates
//!
//! One value, owned by the main task. Navigation replaces the current
//! [`Screen`]; the old screen's filter state and staged files go with it.

use std::sync::Arc;

use stagr::PreviewRegistry;
use tracing::{debug, info, instrument};

use crate::{
    config::Config,
    error::AppError,
    model::{
        catalog::Catalog,
        document_form::AddDocumentForm,
        route::{MenuSection, Route},
        screens::{CounterpartiesScreen, DocumentScreen, ListScreen, Screen},
        ui_state::{RedrawFlag, UIState},
    },
};

/// Maximum depth of the back stack.
const BACK_STACK_LIMIT: usize = 32;

#[derive(Debug)]
pub struct AppState {
    pub config: Arc<Config>,
    pub catalog: Catalog,
    pub previews: PreviewRegistry,

    pub route: Route,
    pub screen: Screen,
    back_stack: Vec<Route>,
    /// Bumped every time an add-document form is built
    form_generation: u64,

    pub ui: UIState,
}

impl AppState {
    pub fn new(config: Arc<Config>) -> Self {
        let catalog = Catalog::mock();
        let screen = Screen::Documents(ListScreen::new(catalog.documents()));
        let ui = UIState::new(config.notification_timeout);

        Self {
            config,
            catalog,
            previews: PreviewRegistry::new(),
            route: Route::Documents,
            screen,
            back_stack: Vec::new(),
            form_generation: 0,
            ui,
        }
    }

    pub fn menu_section(&self) -> MenuSection {
        self.route.menu_section()
    }

    pub fn can_go_back(&self) -> bool {
        !self.back_stack.is_empty()
    }

    /// Switch screens. The new screen is built first; only then is the
    /// previous one torn down, so a bad route leaves everything as it was.
    #[instrument(level = "info", skip_all, fields(from = %self.route, to = %route))]
    pub fn navigate(&mut self, route: Route) -> Result<(), AppError> {
        let screen = self.build_screen(&route)?;
        let previous = std::mem::replace(&mut self.route, route);

        Self::teardown(std::mem::replace(&mut self.screen, screen));

        if previous != self.route {
            self.back_stack.push(previous);
            if self.back_stack.len() > BACK_STACK_LIMIT {
                self.back_stack.remove(0);
            }
        }

        info!("navigated");
        self.ui.request_redraw(RedrawFlag::All);
        Ok(())
    }

    /// Return to the previous screen, falling back to the document list.
    pub fn go_back(&mut self) -> Result<(), AppError> {
        // skip entries that no longer resolve (e.g. a deleted document)
        while let Some(route) = self.back_stack.pop() {
            if let Ok(screen) = self.build_screen(&route) {
                debug!(%route, "back");
                self.route = route;
                Self::teardown(std::mem::replace(&mut self.screen, screen));
                self.ui.request_redraw(RedrawFlag::All);
                return Ok(());
            }
        }

        if self.route == Route::Documents {
            return Ok(());
        }
        let screen = self.build_screen(&Route::Documents)?;
        self.route = Route::Documents;
        Self::teardown(std::mem::replace(&mut self.screen, screen));
        self.ui.request_redraw(RedrawFlag::All);
        Ok(())
    }

    /// Replace the current screen without touching the back stack, e.g. after
    /// a submitted form.
    pub fn replace_route(&mut self, route: Route) -> Result<(), AppError> {
        let screen = self.build_screen(&route)?;
        self.route = route;
        Self::teardown(std::mem::replace(&mut self.screen, screen));
        self.ui.request_redraw(RedrawFlag::All);
        Ok(())
    }

    /// Leave the add-document form for `route`. A submitted form is
    /// finished, anything else is cancelled; both release its previews.
    /// The form is never pushed to the back stack.
    pub fn close_form(&mut self, route: Route, submitted: bool) -> Result<usize, AppError> {
        let screen = self.build_screen(&route)?;
        self.route = route;
        self.back_stack.retain(|r| *r != Route::AddDocument);

        let released = match std::mem::replace(&mut self.screen, screen) {
            Screen::AddDocument(form) if submitted => form.finish(),
            Screen::AddDocument(form) => form.cancel(),
            other => {
                Self::teardown(other);
                0
            }
        };
        self.ui.request_redraw(RedrawFlag::All);
        Ok(released)
    }

    fn build_screen(&mut self, route: &Route) -> Result<Screen, AppError> {
        Ok(match route {
            Route::Documents => Screen::Documents(ListScreen::new(self.catalog.documents())),
            Route::Document(id) => {
                if self.catalog.document(id).is_none() {
                    return Err(AppError::not_found("Document", id.as_str()));
                }
                Screen::Document(DocumentScreen {
                    id: id.clone(),
                    history_scroll: 0,
                })
            }
            Route::Counterparties => {
                let mut screen = CounterpartiesScreen::default();
                screen.list.refresh(self.catalog.counterparties());
                Screen::Counterparties(screen)
            }
            Route::Invitations => Screen::Invitations(ListScreen::new(self.catalog.invitations())),
            Route::AddDocument => {
                self.form_generation += 1;
                Screen::AddDocument(Box::new(AddDocumentForm::new(
                    self.previews.clone(),
                    &self.config.staging,
                    self.form_generation,
                )))
            }
        })
    }

    /// Called once the event loop has ended. Cancels an open form so its
    /// previews are released before the registry goes away.
    pub fn shutdown(&mut self) -> usize {
        let screen = Screen::Documents(ListScreen::new(self.catalog.documents()));
        match std::mem::replace(&mut self.screen, screen) {
            Screen::AddDocument(form) => form.cancel(),
            _ => 0,
        }
    }

    fn teardown(old: Screen) {
        if let Screen::AddDocument(form) = old {
            if !form.files().is_empty() {
                debug!(staged = form.files().len(), "discarding staged files on navigation");
            }
            form.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stagr::{IntakeSource, RawFile};

    fn state() -> AppState {
        AppState::new(Arc::new(Config::default()))
    }

    #[test]
    fn starts_on_document_list() {
        let app = state();
        assert_eq!(app.route, Route::Documents);
        assert!(matches!(app.screen, Screen::Documents(_)));
        assert!(!app.can_go_back());
    }

    #[test]
    fn leaving_the_form_releases_previews() {
        let mut app = state();
        app.navigate(Route::AddDocument).expect("route exists");

        let form = app.screen.form_mut().expect("form screen");
        form.stage(
            IntakeSource::Drop,
            vec![
                RawFile::new("a.png", 10, "image/png"),
                RawFile::new("b.jpg", 10, "image/jpeg"),
            ],
        )
        .expect("non-empty batch");
        assert_eq!(app.previews.live(), 2);

        app.navigate(Route::Counterparties).expect("route exists");
        assert_eq!(app.previews.live(), 0);
        assert_eq!(app.previews.released(), 2);
    }

    #[test]
    fn every_new_form_gets_a_fresh_generation() {
        let mut app = state();
        app.navigate(Route::AddDocument).expect("route exists");
        let first = app.screen.form().map(AddDocumentForm::generation);

        app.navigate(Route::Documents).expect("route exists");
        app.navigate(Route::AddDocument).expect("route exists");
        let second = app.screen.form().map(AddDocumentForm::generation);

        assert_eq!(first, Some(1));
        assert_eq!(second, Some(2));
    }

    #[test]
    fn shutdown_releases_open_form() {
        let mut app = state();
        app.navigate(Route::AddDocument).expect("route exists");
        if let Some(form) = app.screen.form_mut() {
            form.stage(IntakeSource::Drop, vec![RawFile::new("photo.png", 10, "image/png")])
                .expect("non-empty batch");
        }
        assert_eq!(app.shutdown(), 1);
        assert_eq!(app.previews.live(), 0);
        assert_eq!(app.shutdown(), 0);
    }

    #[test]
    fn submitted_form_is_not_in_history() {
        let mut app = state();
        app.navigate(Route::AddDocument).expect("route exists");
        if let Some(form) = app.screen.form_mut() {
            form.stage(IntakeSource::Picker, vec![RawFile::new("scan.png", 10, "image/png")])
                .expect("non-empty batch");
        }

        let released = app.close_form(Route::Document("1".into()), true).expect("exists");
        assert_eq!(released, 1);
        assert_eq!(app.route, Route::Document("1".into()));

        app.go_back().expect("back");
        assert_eq!(app.route, Route::Documents);
    }

    #[test]
    fn unknown_document_keeps_current_screen() {
        let mut app = state();
        let err = app.navigate(Route::Document("nope".into()));
        assert!(matches!(err, Err(AppError::NotFound { .. })));
        assert_eq!(app.route, Route::Documents);
    }

    #[test]
    fn back_returns_through_history() {
        let mut app = state();
        app.navigate(Route::Document("1".into())).expect("exists");
        app.navigate(Route::Invitations).expect("exists");

        app.go_back().expect("back");
        assert_eq!(app.route, Route::Document("1".into()));
        app.go_back().expect("back");
        assert_eq!(app.route, Route::Documents);
        app.go_back().expect("back at root is a no-op");
        assert_eq!(app.route, Route::Documents);
    }

    #[test]
    fn back_skips_deleted_documents() {
        let mut app = state();
        app.navigate(Route::Document("2".into())).expect("exists");
        app.navigate(Route::Counterparties).expect("exists");
        app.catalog.delete_document("2").expect("exists");

        app.go_back().expect("back");
        assert_eq!(app.route, Route::Documents);
    }
}
