//! Add-document form: editing, file intake, submit and cancel.

use std::path::PathBuf;

use stagr::{IntakeSource, StageError};
use tracing::{debug, info};

use super::ActionDispatcher;
use crate::{
    controller::{actions::Action, event_loop::TaskResult},
    error::AppError,
    fs::intake::ReadOutcome,
    model::{app_state::AppState, document_form::StageReport, route::Route, ui_state::RedrawFlag},
    tasks::intake_task::{spawn_drop_intake, spawn_intake},
};

pub(super) fn edit(app: &mut AppState, action: &Action) -> Result<(), AppError> {
    let Some(form) = app.screen.form_mut() else {
        return Ok(());
    };

    match action {
        Action::FormFocusNext => form.focus_next(),
        Action::FormFocusPrev => form.focus_prev(),
        Action::FormInput(ch) => {
            form.insert_char(*ch);
        }
        Action::FormBackspace => {
            form.backspace();
        }
        Action::FormCycleChoice { forward } => {
            form.cycle_choice(*forward);
        }
        Action::FormToggle => {
            form.toggle_checkbox();
        }
        Action::FormMoveFile { down } => form.move_file_cursor(*down),
        _ => {}
    }

    app.ui.request_redraw(RedrawFlag::Main);
    Ok(())
}

pub(super) fn remove_file(app: &mut AppState) -> Result<(), AppError> {
    let Some(form) = app.screen.form_mut() else {
        return Ok(());
    };

    let removed = form.remove_selected_file()?;
    app.ui.show_info(format!("Файл удалён: {}", removed.name));
    app.ui.request_redraw(RedrawFlag::Main);
    Ok(())
}

pub(super) fn submit(app: &mut AppState) -> Result<(), AppError> {
    let Some(form) = app.screen.form_mut() else {
        return Ok(());
    };

    let draft = match form.validate() {
        Ok(draft) => draft,
        Err(e) => {
            app.ui.request_redraw(RedrawFlag::Main);
            return Err(e);
        }
    };
    let attachments = draft.attachments.len();

    let id = app
        .catalog
        .add_document(draft, &app.config.organization, &app.config.user_name);
    let released = app.close_form(Route::Document(id), true)?;

    debug!(attachments, released, "form submitted");
    app.ui
        .show_success(format!("Документ отправлен, файлов: {attachments}"));
    Ok(())
}

pub(super) fn cancel(app: &mut AppState) -> Result<(), AppError> {
    if app.screen.form().is_none() {
        return Ok(());
    }
    app.close_form(Route::Documents, false)?;
    Ok(())
}

impl ActionDispatcher {
    pub(super) fn drop_text(&mut self, app: &mut AppState, text: String) -> Result<(), AppError> {
        let Some(form) = app.screen.form_mut() else {
            return Ok(());
        };
        form.drag_enter();
        app.ui.request_redraw(RedrawFlag::Main);

        spawn_drop_intake(self.task_tx.clone(), form.generation(), text);
        Ok(())
    }

    pub(super) fn intake_paths(
        &mut self,
        app: &mut AppState,
        source: IntakeSource,
        paths: Vec<PathBuf>,
    ) -> Result<(), AppError> {
        let Some(form) = app.screen.form_mut() else {
            return Ok(());
        };
        if source == IntakeSource::Drop {
            form.drag_enter();
            app.ui.request_redraw(RedrawFlag::Main);
        }

        spawn_intake(self.task_tx.clone(), form.generation(), source, paths);
        Ok(())
    }

    pub(super) fn task_result(
        &mut self,
        app: &mut AppState,
        result: TaskResult,
    ) -> Result<(), AppError> {
        match result {
            TaskResult::FilesRead {
                generation,
                source,
                outcome,
            } => stage_outcome(app, generation, source, outcome),
        }
    }
}

/// Stage files read in the background and summarize the intake. Results
/// meant for a form that has since been closed are dropped.
fn stage_outcome(
    app: &mut AppState,
    generation: u64,
    source: IntakeSource,
    outcome: ReadOutcome,
) -> Result<(), AppError> {
    let Some(form) = app.screen.form_mut() else {
        info!(files = outcome.files.len(), "form closed before intake finished");
        return Ok(());
    };
    if form.generation() != generation {
        info!(
            files = outcome.files.len(),
            generation,
            current = form.generation(),
            "stale intake result dropped"
        );
        return Ok(());
    }

    let staged = form.stage(source, outcome.files);
    if source == IntakeSource::Drop {
        form.drag_leave();
    }
    app.ui.request_redraw(RedrawFlag::Main);

    let report = match staged {
        Ok(report) => report,
        Err(StageError::EmptyBatch) => StageReport::default(),
        Err(e) => return Err(e.into()),
    };

    if let Some(failure) = outcome.failures.first() {
        let name = failure
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| failure.path.display().to_string());
        let more = outcome.failures.len() - 1;
        let tail = if more > 0 {
            format!(" (и ещё {more})")
        } else {
            String::new()
        };
        app.ui
            .show_warning(format!("Не удалось прочитать {name}{tail}; добавлено: {}", report.added));
        return Ok(());
    }

    if let Some(first) = report.warnings.first() {
        let violations = report
            .warnings
            .iter()
            .filter(|w| w.is_policy_violation())
            .count();
        app.ui.show_warning(format!(
            "{first}; не соответствует требованиям: {violations}, добавлено: {}",
            report.added
        ));
        return Ok(());
    }

    if report.added == 0 {
        app.ui.show_info("Файлы не выбраны");
    } else {
        app.ui
            .show_success(format!("Добавлено файлов: {}", report.added));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use stagr::RawFile;
    use tokio::sync::mpsc;

    use super::*;
    use crate::{
        config::Config,
        controller::action_dispatcher::{ActionDispatcher, DispatchResult},
        fs::intake::IntakeFailure,
        model::{
            catalog::{DocumentStatus, FORM_COUNTERPARTIES},
            document_form::FormField,
            screens::Screen,
            ui_state::NotificationLevel,
        },
    };

    fn setup() -> (ActionDispatcher, AppState, mpsc::UnboundedReceiver<TaskResult>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut app = AppState::new(Arc::new(Config::default()));
        app.navigate(Route::AddDocument).expect("route");
        (ActionDispatcher::new(tx), app, rx)
    }

    /// Generation of the form opened by [`setup`].
    const FIRST_FORM: u64 = 1;

    fn files_read(files: Vec<RawFile>) -> Action {
        Action::TaskResult(TaskResult::FilesRead {
            generation: FIRST_FORM,
            source: IntakeSource::Picker,
            outcome: ReadOutcome {
                files,
                failures: Vec::new(),
            },
        })
    }

    fn fill_required(d: &mut ActionDispatcher, app: &mut AppState) {
        d.handle(app, Action::FormCycleChoice { forward: true });
        d.handle(app, Action::FormFocusNext);
        for ch in "A-17".chars() {
            d.handle(app, Action::FormInput(ch));
        }
        d.handle(app, Action::FormFocusNext);
        for ch in "01.03.2025".chars() {
            d.handle(app, Action::FormInput(ch));
        }
        if let Some(form) = app.screen.form_mut() {
            form.focus = FormField::Counterparty;
        }
        d.handle(app, Action::FormCycleChoice { forward: true });
    }

    #[test]
    fn staged_files_show_up_in_the_form() {
        let (mut d, mut app, _rx) = setup();
        d.handle(
            &mut app,
            files_read(vec![
                RawFile::new("a.txt", 500, "text/plain"),
                RawFile::new("b.png", 2048, "image/png"),
            ]),
        );

        let form = app.screen.form().expect("form");
        assert_eq!(form.files().len(), 2);
        assert_eq!(app.previews.live(), 1);
        // advisory policy: the .txt is kept but flagged
        let note = app.ui.notification.as_ref().expect("notice");
        assert_eq!(note.level, NotificationLevel::Warning);
        assert!(note.message.contains("не соответствует требованиям: 1, добавлено: 2"));
    }

    #[test]
    fn empty_intake_changes_nothing() {
        let (mut d, mut app, _rx) = setup();
        d.handle(&mut app, files_read(Vec::new()));

        let form = app.screen.form().expect("form");
        assert!(form.files().is_empty());
        assert!(form.file_cursor().is_none());
        let note = app.ui.notification.as_ref().expect("notice");
        assert_eq!(note.level, NotificationLevel::Info);
        assert_eq!(note.message, "Файлы не выбраны");
    }

    #[test]
    fn result_for_an_earlier_form_is_dropped() {
        let (mut d, mut app, _rx) = setup();
        d.handle(&mut app, Action::CancelForm);
        app.navigate(Route::AddDocument).expect("route");
        assert_eq!(app.screen.form().map(|f| f.generation()), Some(FIRST_FORM + 1));

        d.handle(&mut app, files_read(vec![RawFile::new("old.png", 10, "image/png")]));

        let form = app.screen.form().expect("form");
        assert!(form.files().is_empty());
        assert_eq!(app.previews.allocated(), 0);
    }

    #[test]
    fn removing_out_of_range_is_a_warning() {
        let (mut d, mut app, _rx) = setup();
        let result = d.handle(&mut app, Action::FormRemoveFile);

        assert_eq!(result, DispatchResult::Continue);
        let note = app.ui.notification.as_ref().expect("notice");
        assert_eq!(note.level, NotificationLevel::Warning);
    }

    #[test]
    fn read_failures_are_reported() {
        let (mut d, mut app, _rx) = setup();
        d.handle(
            &mut app,
            Action::TaskResult(TaskResult::FilesRead {
                generation: FIRST_FORM,
                source: IntakeSource::Drop,
                outcome: ReadOutcome {
                    files: vec![RawFile::new("ok.pdf", 10, "application/pdf")],
                    failures: vec![IntakeFailure {
                        path: "/tmp/gone.pdf".into(),
                        reason: "missing".into(),
                    }],
                },
            }),
        );

        let form = app.screen.form().expect("form");
        assert_eq!(form.files().len(), 1);
        assert!(!form.is_drag_active());
        let note = app.ui.notification.as_ref().expect("notice");
        assert!(note.message.contains("gone.pdf"));
    }

    #[test]
    fn invalid_submit_keeps_the_form() {
        let (mut d, mut app, _rx) = setup();
        d.handle(&mut app, Action::SubmitForm);

        assert_eq!(app.route, Route::AddDocument);
        let form = app.screen.form().expect("form");
        assert!(form.field_error(FormField::Number).is_some());
        assert!(app.ui.notification.is_some());
    }

    #[test]
    fn submit_creates_document_and_releases_previews() {
        let (mut d, mut app, _rx) = setup();
        d.handle(&mut app, files_read(vec![RawFile::new("scan.png", 2048, "image/png")]));
        fill_required(&mut d, &mut app);
        assert_eq!(app.previews.live(), 1);

        d.handle(&mut app, Action::SubmitForm);

        let Screen::Document(screen) = &app.screen else {
            panic!("document screen expected, got {:?}", app.route);
        };
        let doc = app.catalog.document(&screen.id).expect("created");
        assert_eq!(doc.number, "A-17");
        assert_eq!(doc.counterparty, FORM_COUNTERPARTIES[0].label);
        assert_eq!(doc.status, DocumentStatus::RequiresSignature);
        assert_eq!(app.previews.live(), 0);
        assert_eq!(app.previews.released(), 1);
    }

    #[test]
    fn cancel_returns_to_documents() {
        let (mut d, mut app, _rx) = setup();
        d.handle(&mut app, files_read(vec![RawFile::new("p.jpg", 1, "image/jpeg")]));
        d.handle(&mut app, Action::CancelForm);

        assert_eq!(app.route, Route::Documents);
        assert_eq!(app.previews.live(), 0);
    }

    #[tokio::test]
    async fn drop_into_a_reopened_form_is_not_staged() {
        let (mut d, mut app, mut rx) = setup();
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("scan.pdf");
        std::fs::write(&path, b"%PDF-1.4").expect("write");

        d.handle(&mut app, Action::DropText(path.display().to_string()));
        d.handle(&mut app, Action::CancelForm);
        app.navigate(Route::AddDocument).expect("route");

        let result = rx.recv().await.expect("task result");
        d.handle(&mut app, Action::TaskResult(result));

        let form = app.screen.form().expect("form");
        assert!(form.files().is_empty());
        assert!(!form.is_drag_active());
    }

    #[tokio::test]
    async fn drop_text_round_trips_through_the_task() {
        let (mut d, mut app, mut rx) = setup();
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("акт.pdf");
        std::fs::write(&path, b"%PDF-1.4").expect("write");

        d.handle(&mut app, Action::DropText(path.display().to_string()));
        assert!(app.screen.form().is_some_and(|f| f.is_drag_active()));

        let result = rx.recv().await.expect("task result");
        d.handle(&mut app, Action::TaskResult(result));

        let form = app.screen.form().expect("form");
        assert_eq!(form.files().len(), 1);
        assert!(!form.is_drag_active());
    }
}
