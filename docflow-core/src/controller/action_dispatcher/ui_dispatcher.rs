//! Overlays, the input prompt and navigation.

use stagr::IntakeSource;
use tracing::debug;

use super::ActionDispatcher;
use crate::{
    controller::actions::InputPromptType,
    error::AppError,
    fs::intake::parse_paths,
    model::{
        app_state::AppState,
        route::{MenuSection, Route},
        screens::Screen,
    },
};

pub(super) fn navigate(app: &mut AppState, route: Route) -> Result<(), AppError> {
    if app.route == route {
        debug!(%route, "already there");
        return Ok(());
    }
    app.navigate(route)
}

pub(super) fn select_menu(app: &mut AppState, section: MenuSection) -> Result<(), AppError> {
    match section.route() {
        Some(route) => navigate(app, route),
        None => {
            app.ui
                .show_info(format!("Раздел «{}» пока недоступен", section.label()));
            Ok(())
        }
    }
}

pub(super) fn show_prompt(app: &mut AppState, kind: InputPromptType) -> Result<(), AppError> {
    let initial = match (kind, &app.screen) {
        (InputPromptType::Search, Screen::Documents(s)) => s.filter.search_text().to_string(),
        (InputPromptType::Search, Screen::Invitations(s)) => s.filter.search_text().to_string(),
        (InputPromptType::Search, Screen::Counterparties(s)) => {
            s.list.filter.search_text().to_string()
        }
        (InputPromptType::Search, _) => return Ok(()),
        (InputPromptType::GoTo, _) => app.route.to_string(),
        (InputPromptType::PickFiles, Screen::AddDocument(_)) => String::new(),
        (InputPromptType::PickFiles, _) => return Ok(()),
    };
    app.ui.open_prompt(kind, &initial);

    if let (InputPromptType::PickFiles, Some(form)) = (kind, app.screen.form()) {
        app.ui
            .set_prompt_hint(format!("{} ({})", kind.hint(), form.policy().accept_hint()));
    }
    Ok(())
}

/// Set the search text of whichever list is on screen.
fn apply_search(app: &mut AppState, text: &str) {
    let text = text.trim();
    match &mut app.screen {
        Screen::Documents(s) => {
            s.filter.set_search(text, app.catalog.documents());
            s.refresh(app.catalog.documents());
        }
        Screen::Counterparties(s) => {
            s.list.filter.set_search(text, app.catalog.counterparties());
            s.list.refresh(app.catalog.counterparties());
        }
        Screen::Invitations(s) => {
            s.filter.set_search(text, app.catalog.invitations());
            s.refresh(app.catalog.invitations());
        }
        Screen::Document(_) | Screen::AddDocument(_) => {}
    }
}

impl ActionDispatcher {
    pub(super) fn submit_prompt(&mut self, app: &mut AppState) -> Result<(), AppError> {
        let kind = app.ui.input_prompt_type;
        let input = app.ui.input.to_string();
        app.ui.close_overlay();

        match kind {
            Some(InputPromptType::Search) => {
                apply_search(app, &input);
                Ok(())
            }
            Some(InputPromptType::GoTo) => navigate(app, input.trim().parse()?),
            Some(InputPromptType::PickFiles) => {
                let paths = parse_paths(&input);
                if paths.is_empty() {
                    app.ui.show_info("Файлы не выбраны");
                    return Ok(());
                }
                self.intake_paths(app, IntakeSource::Picker, paths)
            }
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tokio::sync::mpsc;

    use super::*;
    use crate::{config::Config, controller::actions::Action, model::ui_state::UIOverlay};

    fn setup() -> (ActionDispatcher, AppState) {
        let (tx, _rx) = mpsc::unbounded_channel();
        (ActionDispatcher::new(tx), AppState::new(Arc::new(Config::default())))
    }

    fn type_text(d: &mut ActionDispatcher, app: &mut AppState, text: &str) {
        for ch in text.chars() {
            d.handle(app, Action::PromptInput(ch));
        }
    }

    #[test]
    fn search_prompt_narrows_the_list() {
        let (mut d, mut app) = setup();
        d.handle(&mut app, Action::SelectMenu(MenuSection::Counterparties));
        d.handle(&mut app, Action::ShowInputPrompt(InputPromptType::Search));
        assert_eq!(app.ui.overlay, UIOverlay::Prompt);

        type_text(&mut d, &mut app, "северный");
        d.handle(&mut app, Action::SubmitPrompt);

        assert_eq!(app.ui.overlay, UIOverlay::None);
        let Screen::Counterparties(screen) = &app.screen else {
            panic!("counterparties screen expected");
        };
        let list = app.catalog.counterparties();
        assert_eq!(screen.list.filter.search_text(), "северный");
        assert_eq!(screen.list.visible_len(list), 1);
    }

    #[test]
    fn goto_prompt_starts_with_current_route() {
        let (mut d, mut app) = setup();
        d.handle(&mut app, Action::ShowInputPrompt(InputPromptType::GoTo));
        assert_eq!(app.ui.input, "/");

        type_text(&mut d, &mut app, "document/1");
        d.handle(&mut app, Action::SubmitPrompt);
        assert_eq!(app.route, Route::Document("1".into()));
    }

    #[test]
    fn bad_route_is_reported() {
        let (mut d, mut app) = setup();
        d.handle(&mut app, Action::ShowInputPrompt(InputPromptType::GoTo));
        type_text(&mut d, &mut app, "nowhere");
        d.handle(&mut app, Action::SubmitPrompt);

        assert_eq!(app.route, Route::Documents);
        assert!(app.ui.notification.is_some());
    }

    #[test]
    fn picker_prompt_needs_the_form() {
        let (mut d, mut app) = setup();
        d.handle(&mut app, Action::ShowInputPrompt(InputPromptType::PickFiles));
        assert_eq!(app.ui.overlay, UIOverlay::None);
    }

    #[test]
    fn picker_prompt_lists_accepted_extensions() {
        let (mut d, mut app) = setup();
        d.handle(&mut app, Action::Navigate(Route::AddDocument));
        d.handle(&mut app, Action::ShowInputPrompt(InputPromptType::PickFiles));

        assert_eq!(app.ui.overlay, UIOverlay::Prompt);
        assert_eq!(
            app.ui.prompt_hint(),
            "Пути к файлам через пробел (.pdf,.doc,.docx,.xls,.xlsx,.jpg,.jpeg,.png)"
        );
    }

    #[test]
    fn menu_entries_without_screens_inform() {
        let (mut d, mut app) = setup();
        d.handle(&mut app, Action::SelectMenu(MenuSection::Tariffs));
        assert_eq!(app.route, Route::Documents);
        let note = app.ui.notification.as_ref().expect("notice");
        assert!(note.message.contains("Тарифы"));
    }
}
