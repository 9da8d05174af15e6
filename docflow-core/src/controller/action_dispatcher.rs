//! ``src/controller/action_dispatcher.rs``
//! ============================================================================
//! # ActionDispatcher: applies actions to [`AppState`]
//!
//! Split by concern, like the screens it serves:
//! - `ui_dispatcher`: overlays, the input prompt, notifications, navigation
//! - `list_dispatcher`: list cursor/filter/selection and catalogue actions
//! - `form_dispatcher`: the add-document form and file intake
//!
//! Handlers return `Result<(), AppError>`; failures become notifications
//! here, so a bad key press never ends the session.

mod form_dispatcher;
mod list_dispatcher;
mod ui_dispatcher;

use tokio::sync::mpsc::UnboundedSender;
use tracing::{error, info, trace, warn};

use crate::{
    controller::{actions::Action, event_loop::TaskResult},
    error::AppError,
    model::{app_state::AppState, ui_state::RedrawFlag},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchResult {
    Continue,
    Terminate,
}

pub struct ActionDispatcher {
    task_tx: UnboundedSender<TaskResult>,
}

impl ActionDispatcher {
    pub fn new(task_tx: UnboundedSender<TaskResult>) -> Self {
        Self { task_tx }
    }

    /// Apply one action. Returns [`DispatchResult::Terminate`] on quit.
    pub fn handle(&mut self, app: &mut AppState, action: Action) -> DispatchResult {
        if !matches!(action, Action::Tick) {
            trace!(?action, "dispatch");
        }

        let result = match action {
            Action::Quit => {
                info!("Quit requested");
                return DispatchResult::Terminate;
            }
            Action::NoOp => Ok(()),
            Action::Tick => {
                app.ui.update_notification();
                Ok(())
            }
            Action::Resize(..) => {
                app.ui.request_redraw(RedrawFlag::All);
                Ok(())
            }

            Action::Navigate(route) => ui_dispatcher::navigate(app, route),
            Action::SelectMenu(section) => ui_dispatcher::select_menu(app, section),
            Action::Back => app.go_back(),

            Action::ToggleHelp => {
                app.ui.toggle_help();
                Ok(())
            }
            Action::CloseOverlay => {
                app.ui.close_overlay();
                Ok(())
            }
            Action::DismissNotification => {
                app.ui.dismiss_notification();
                Ok(())
            }
            Action::ShowInputPrompt(kind) => ui_dispatcher::show_prompt(app, kind),
            Action::PromptInput(ch) => {
                app.ui.insert_char(ch);
                Ok(())
            }
            Action::PromptPaste(text) => {
                app.ui.insert_str(&text.replace(['\r', '\n'], " "));
                Ok(())
            }
            Action::PromptBackspace => {
                app.ui.delete_char_before();
                Ok(())
            }
            Action::PromptCursorLeft => {
                app.ui.move_cursor_left();
                app.ui.request_redraw(RedrawFlag::Overlay);
                Ok(())
            }
            Action::PromptCursorRight => {
                app.ui.move_cursor_right();
                app.ui.request_redraw(RedrawFlag::Overlay);
                Ok(())
            }
            Action::SubmitPrompt => self.submit_prompt(app),

            Action::MoveSelectionUp
            | Action::MoveSelectionDown
            | Action::SelectFirst
            | Action::SelectLast
            | Action::ToggleRowSelection
            | Action::ToggleSelectAll
            | Action::CycleStatusFilter
            | Action::ClearFilters => list_dispatcher::list_action(app, &action),
            Action::OpenSelected => list_dispatcher::open_selected(app),

            Action::SignDocument
            | Action::RejectDocument
            | Action::SendForApproval
            | Action::DownloadDocument
            | Action::PrintDocument
            | Action::DeleteDocument => list_dispatcher::document_action(app, &action),

            Action::CounterpartyAction => list_dispatcher::counterparty_action(app),
            Action::NextSection => list_dispatcher::next_section(app),
            Action::AcceptInvitation => list_dispatcher::answer_invitation(app, true),
            Action::DeclineInvitation => list_dispatcher::answer_invitation(app, false),

            Action::FormFocusNext
            | Action::FormFocusPrev
            | Action::FormInput(_)
            | Action::FormBackspace
            | Action::FormCycleChoice { .. }
            | Action::FormToggle
            | Action::FormMoveFile { .. } => form_dispatcher::edit(app, &action),
            Action::FormRemoveFile => form_dispatcher::remove_file(app),
            Action::SubmitForm => form_dispatcher::submit(app),
            Action::CancelForm => form_dispatcher::cancel(app),

            Action::DropText(text) => self.drop_text(app, text),
            Action::IntakePaths { source, paths } => self.intake_paths(app, source, paths),
            Action::TaskResult(result) => self.task_result(app, result),
        };

        if let Err(e) = result {
            Self::report(app, &e);
        }
        DispatchResult::Continue
    }

    /// Turn an error into a notification: recoverable ones warn, the rest
    /// stay on screen until dismissed.
    fn report(app: &mut AppState, e: &AppError) {
        let message = match e {
            AppError::InvalidInput { field, message } => format!("{field}: {message}"),
            other => other.to_string(),
        };

        if e.is_recoverable() {
            warn!("{e}");
            app.ui.show_warning(message);
        } else {
            error!("{e}");
            app.ui.show_error(message);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tokio::sync::mpsc;

    use super::*;
    use crate::{
        config::Config,
        model::{route::Route, ui_state::NotificationLevel},
    };

    fn setup() -> (ActionDispatcher, AppState, mpsc::UnboundedReceiver<TaskResult>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let app = AppState::new(Arc::new(Config::default()));
        (ActionDispatcher::new(tx), app, rx)
    }

    #[test]
    fn quit_terminates() {
        let (mut d, mut app, _rx) = setup();
        assert_eq!(d.handle(&mut app, Action::NoOp), DispatchResult::Continue);
        assert_eq!(d.handle(&mut app, Action::Quit), DispatchResult::Terminate);
    }

    #[test]
    fn unknown_document_becomes_a_warning() {
        let (mut d, mut app, _rx) = setup();
        d.handle(&mut app, Action::Navigate(Route::Document("404".into())));

        assert_eq!(app.route, Route::Documents);
        let note = app.ui.notification.as_ref().expect("notification shown");
        assert_eq!(note.level, NotificationLevel::Warning);
    }

    #[test]
    fn navigating_to_the_current_route_keeps_state() {
        let (mut d, mut app, _rx) = setup();
        d.handle(&mut app, Action::Navigate(Route::AddDocument));
        if let Some(form) = app.screen.form_mut() {
            form.number.push_str("42");
        }

        d.handle(&mut app, Action::Navigate(Route::AddDocument));
        assert_eq!(app.screen.form().map(|f| f.number.as_str()), Some("42"));
        assert!(app.can_go_back());
    }
}
