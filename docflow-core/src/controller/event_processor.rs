//! ``src/controller/event_processor.rs``
//! ============================================================================
//! # Event Processor: terminal events to actions
//!
//! Pure mapping from a crossterm [`Event`] and a read-only view of
//! [`AppState`] to one [`Action`]. Precedence, highest first:
//!
//! 1. `Ctrl+C` always quits.
//! 2. An open prompt takes every key and every paste.
//! 3. The help overlay swallows keys until closed.
//! 4. The add-document form, whose text fields take plain characters.
//! 5. Global bindings, then bindings of the current list/detail screen.
//!
//! A bracketed paste outside a prompt is how a terminal delivers dropped
//! files, so on the form it becomes [`Action::DropText`].

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::{
    controller::actions::{Action, InputPromptType},
    model::{
        app_state::AppState,
        document_form::{AddDocumentForm, FormField},
        route::{MenuSection, Route},
        screens::Screen,
        ui_state::UIOverlay,
    },
};

pub fn map_event(app: &AppState, event: Event) -> Action {
    match event {
        Event::Key(key) if key.kind != KeyEventKind::Release => map_key(app, key),
        Event::Paste(text) => map_paste(app, text),
        Event::Resize(w, h) => Action::Resize(w, h),
        _ => Action::NoOp,
    }
}

fn map_paste(app: &AppState, text: String) -> Action {
    if app.ui.overlay == UIOverlay::Prompt {
        return Action::PromptPaste(text);
    }
    match &app.screen {
        Screen::AddDocument(_) => Action::DropText(text),
        _ => Action::NoOp,
    }
}

pub fn map_key(app: &AppState, key: KeyEvent) -> Action {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Action::Quit;
    }

    match app.ui.overlay {
        UIOverlay::Prompt => return prompt_key(key),
        UIOverlay::Help => {
            return match key.code {
                KeyCode::Esc | KeyCode::Char('?' | 'q') | KeyCode::F(1) => Action::ToggleHelp,
                _ => Action::NoOp,
            };
        }
        UIOverlay::None => {}
    }

    if key.code == KeyCode::Esc && app.ui.notification.is_some() {
        return Action::DismissNotification;
    }

    if let Screen::AddDocument(form) = &app.screen {
        if let Some(action) = form_key(form, key) {
            return action;
        }
    }

    if let Some(action) = global_key(app, key) {
        return action;
    }

    match &app.screen {
        Screen::Documents(_) => list_key(key).unwrap_or(Action::NoOp),
        Screen::Document(_) => detail_key(key),
        Screen::Counterparties(_) => counterparty_key(key)
            .or_else(|| list_key(key))
            .unwrap_or(Action::NoOp),
        Screen::Invitations(_) => invitation_key(key)
            .or_else(|| list_key(key))
            .unwrap_or(Action::NoOp),
        Screen::AddDocument(_) => Action::NoOp,
    }
}

fn prompt_key(key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Esc => Action::CloseOverlay,
        KeyCode::Enter => Action::SubmitPrompt,
        KeyCode::Backspace => Action::PromptBackspace,
        KeyCode::Left => Action::PromptCursorLeft,
        KeyCode::Right => Action::PromptCursorRight,
        KeyCode::Char(c) => Action::PromptInput(c),
        _ => Action::NoOp,
    }
}

fn global_key(app: &AppState, key: KeyEvent) -> Option<Action> {
    let action = match (key.code, key.modifiers) {
        (KeyCode::Char('q'), KeyModifiers::NONE) => Action::Quit,
        (KeyCode::Char('?'), _) | (KeyCode::F(1), _) => Action::ToggleHelp,
        (KeyCode::Char(d @ '1'..='4'), KeyModifiers::NONE) => {
            let index = d as usize - '1' as usize;
            Action::SelectMenu(MenuSection::ALL[index])
        }
        (KeyCode::Char('g'), KeyModifiers::NONE) => {
            Action::ShowInputPrompt(InputPromptType::GoTo)
        }
        (KeyCode::Char('n'), KeyModifiers::NONE) => Action::Navigate(Route::AddDocument),
        (KeyCode::Esc, _) | (KeyCode::Backspace, _) if app.can_go_back() => Action::Back,
        _ => return None,
    };
    Some(action)
}

fn list_key(key: KeyEvent) -> Option<Action> {
    let action = match key.code {
        KeyCode::Up | KeyCode::Char('k') => Action::MoveSelectionUp,
        KeyCode::Down | KeyCode::Char('j') => Action::MoveSelectionDown,
        KeyCode::Home => Action::SelectFirst,
        KeyCode::End => Action::SelectLast,
        KeyCode::Enter => Action::OpenSelected,
        KeyCode::Char(' ') => Action::ToggleRowSelection,
        KeyCode::Char('a') => Action::ToggleSelectAll,
        KeyCode::Char('f') => Action::CycleStatusFilter,
        KeyCode::Char('/') => Action::ShowInputPrompt(InputPromptType::Search),
        KeyCode::Char('x') => Action::ClearFilters,
        _ => return None,
    };
    Some(action)
}

fn counterparty_key(key: KeyEvent) -> Option<Action> {
    match key.code {
        KeyCode::Tab => Some(Action::NextSection),
        KeyCode::Enter | KeyCode::Char('i') => Some(Action::CounterpartyAction),
        _ => None,
    }
}

fn invitation_key(key: KeyEvent) -> Option<Action> {
    match key.code {
        KeyCode::Enter | KeyCode::Char('y') => Some(Action::AcceptInvitation),
        KeyCode::Char('d') | KeyCode::Delete => Some(Action::DeclineInvitation),
        _ => None,
    }
}

fn detail_key(key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Char('s') => Action::SignDocument,
        KeyCode::Char('r') => Action::RejectDocument,
        KeyCode::Char('p') => Action::SendForApproval,
        KeyCode::Char('d') => Action::DownloadDocument,
        KeyCode::Char('P') => Action::PrintDocument,
        KeyCode::Delete => Action::DeleteDocument,
        KeyCode::Up | KeyCode::Char('k') => Action::MoveSelectionUp,
        KeyCode::Down | KeyCode::Char('j') => Action::MoveSelectionDown,
        _ => Action::NoOp,
    }
}

/// Form bindings. `None` lets the key fall through to the global ones.
fn form_key(form: &AddDocumentForm, key: KeyEvent) -> Option<Action> {
    let focus = form.focus;
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    let action = match key.code {
        KeyCode::Char('s') if ctrl => Action::SubmitForm,
        KeyCode::Char('o') if ctrl => Action::ShowInputPrompt(InputPromptType::PickFiles),
        KeyCode::Esc => Action::CancelForm,
        KeyCode::Tab => Action::FormFocusNext,
        KeyCode::BackTab => Action::FormFocusPrev,

        KeyCode::Up if focus == FormField::Files => Action::FormMoveFile { down: false },
        KeyCode::Down if focus == FormField::Files => Action::FormMoveFile { down: true },
        KeyCode::Up => Action::FormFocusPrev,
        KeyCode::Down => Action::FormFocusNext,

        KeyCode::Left if focus.is_choice() => Action::FormCycleChoice { forward: false },
        KeyCode::Right if focus.is_choice() => Action::FormCycleChoice { forward: true },

        KeyCode::Char(c) if focus.is_text() && !ctrl => Action::FormInput(c),
        KeyCode::Backspace if focus.is_text() => Action::FormBackspace,
        KeyCode::Enter if focus.is_text() => Action::FormFocusNext,

        KeyCode::Char(' ') | KeyCode::Enter if focus.is_checkbox() => Action::FormToggle,
        KeyCode::Char(' ') | KeyCode::Enter if focus.is_choice() => {
            Action::FormCycleChoice { forward: true }
        }

        KeyCode::Enter | KeyCode::Char('o') if focus == FormField::Files => {
            Action::ShowInputPrompt(InputPromptType::PickFiles)
        }
        KeyCode::Delete | KeyCode::Backspace | KeyCode::Char('x')
            if focus == FormField::Files =>
        {
            Action::FormRemoveFile
        }
        _ => return None,
    };
    Some(action)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use std::sync::Arc;

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn ctrl(c: char) -> Event {
        Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL))
    }

    fn state() -> AppState {
        AppState::new(Arc::new(Config::default()))
    }

    #[test]
    fn list_keys_on_document_list() {
        let app = state();
        assert!(matches!(map_event(&app, key(KeyCode::Char('j'))), Action::MoveSelectionDown));
        assert!(matches!(map_event(&app, key(KeyCode::Char(' '))), Action::ToggleRowSelection));
        assert!(matches!(
            map_event(&app, key(KeyCode::Char('/'))),
            Action::ShowInputPrompt(InputPromptType::Search)
        ));
        assert!(matches!(
            map_event(&app, key(KeyCode::Char('2'))),
            Action::SelectMenu(MenuSection::Counterparties)
        ));
        assert!(matches!(map_event(&app, key(KeyCode::Char('q'))), Action::Quit));
        // nothing to go back to at the root
        assert!(matches!(map_event(&app, key(KeyCode::Esc)), Action::NoOp));
    }

    #[test]
    fn prompt_swallows_keys_and_paste() {
        let mut app = state();
        app.ui.open_prompt(InputPromptType::Search, "");
        assert!(matches!(map_event(&app, key(KeyCode::Char('q'))), Action::PromptInput('q')));
        assert!(matches!(
            map_event(&app, Event::Paste("abc".into())),
            Action::PromptPaste(text) if text == "abc"
        ));
        assert!(matches!(map_event(&app, key(KeyCode::Esc)), Action::CloseOverlay));
        assert!(matches!(map_event(&app, ctrl('c')), Action::Quit));
    }

    #[test]
    fn form_text_fields_take_characters() {
        let mut app = state();
        app.navigate(Route::AddDocument).expect("route");

        // type selector has focus first; 'q' falls through to quit
        assert!(matches!(map_event(&app, key(KeyCode::Char('q'))), Action::Quit));
        assert!(matches!(
            map_event(&app, key(KeyCode::Right)),
            Action::FormCycleChoice { forward: true }
        ));

        if let Some(form) = app.screen.form_mut() {
            form.focus = FormField::Number;
        }
        assert!(matches!(map_event(&app, key(KeyCode::Char('q'))), Action::FormInput('q')));
        assert!(matches!(map_event(&app, key(KeyCode::Char('1'))), Action::FormInput('1')));
        assert!(matches!(map_event(&app, ctrl('s')), Action::SubmitForm));
        assert!(matches!(map_event(&app, key(KeyCode::Esc)), Action::CancelForm));
    }

    #[test]
    fn files_field_bindings() {
        let mut app = state();
        app.navigate(Route::AddDocument).expect("route");
        if let Some(form) = app.screen.form_mut() {
            form.focus = FormField::Files;
        }

        assert!(matches!(
            map_event(&app, key(KeyCode::Enter)),
            Action::ShowInputPrompt(InputPromptType::PickFiles)
        ));
        assert!(matches!(map_event(&app, key(KeyCode::Delete)), Action::FormRemoveFile));
        assert!(matches!(
            map_event(&app, key(KeyCode::Down)),
            Action::FormMoveFile { down: true }
        ));
    }

    #[test]
    fn paste_is_a_drop_only_on_the_form() {
        let mut app = state();
        assert!(matches!(map_event(&app, Event::Paste("/tmp/a.pdf".into())), Action::NoOp));

        app.navigate(Route::AddDocument).expect("route");
        assert!(matches!(
            map_event(&app, Event::Paste("/tmp/a.pdf".into())),
            Action::DropText(text) if text == "/tmp/a.pdf"
        ));
    }

    #[test]
    fn screen_specific_bindings() {
        let mut app = state();
        app.navigate(Route::Document("1".into())).expect("route");
        assert!(matches!(map_event(&app, key(KeyCode::Char('s'))), Action::SignDocument));
        assert!(matches!(map_event(&app, key(KeyCode::Esc)), Action::Back));

        app.navigate(Route::Counterparties).expect("route");
        assert!(matches!(map_event(&app, key(KeyCode::Tab)), Action::NextSection));
        assert!(matches!(map_event(&app, key(KeyCode::Enter)), Action::CounterpartyAction));

        app.navigate(Route::Invitations).expect("route");
        assert!(matches!(map_event(&app, key(KeyCode::Char('d'))), Action::DeclineInvitation));
        assert!(matches!(map_event(&app, key(KeyCode::Char('k'))), Action::MoveSelectionUp));
    }

    #[test]
    fn help_overlay_blocks_other_keys() {
        let mut app = state();
        app.ui.toggle_help();
        assert!(matches!(map_event(&app, key(KeyCode::Char('j'))), Action::NoOp));
        assert!(matches!(map_event(&app, key(KeyCode::Esc)), Action::ToggleHelp));
    }
}
