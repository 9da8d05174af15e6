//! List screens and the catalogue actions reachable from them.

use tracing::debug;

use crate::{
    controller::actions::Action,
    error::AppError,
    model::{
        app_state::AppState,
        catalog::CounterpartyStatus,
        filter_state::{Filterable, StatusFilter},
        route::Route,
        screens::{CounterpartySection, ListScreen, Screen},
        ui_state::RedrawFlag,
    },
};

/// Apply a cursor, selection or filter action to `screen`. Returns a line
/// for the status notification when the criteria changed.
fn apply<T: Filterable>(
    screen: &mut ListScreen<T>,
    list: &[T],
    action: &Action,
) -> Option<String> {
    let len = screen.visible_len(list);
    match action {
        Action::MoveSelectionUp => screen.cursor.move_up(len),
        Action::MoveSelectionDown => screen.cursor.move_down(len),
        Action::SelectFirst => screen.cursor.first(len),
        Action::SelectLast => screen.cursor.last(len),
        Action::ToggleRowSelection => {
            if let Some(row) = screen.current(list) {
                screen.filter.toggle(row.id());
            }
        }
        Action::ToggleSelectAll => {
            let visible = screen.filter.visible_ids(list);
            screen.filter.toggle_all(visible);
        }
        Action::CycleStatusFilter => {
            screen.filter.cycle_status(list);
            screen.refresh(list);
            return Some(format!("Статус: {}", screen.filter.status_filter_label()));
        }
        Action::ClearFilters => {
            screen.filter.set_search("", list);
            screen.filter.set_status_filter(StatusFilter::All, list);
            screen.filter.clear_selection();
            screen.refresh(list);
            return Some("Фильтры сброшены".to_string());
        }
        _ => {}
    }
    None
}

pub(super) fn list_action(app: &mut AppState, action: &Action) -> Result<(), AppError> {
    let notice = match &mut app.screen {
        Screen::Documents(s) => apply(s, app.catalog.documents(), action),
        Screen::Invitations(s) => apply(s, app.catalog.invitations(), action),
        Screen::Counterparties(s) => {
            let list = app.catalog.counterparties();
            let notice = apply(&mut s.list, list, action);
            if matches!(action, Action::ClearFilters) {
                s.list.filter.set_status_filter(s.section.status_filter(), list);
                s.list.refresh(list);
            }
            notice
        }
        Screen::Document(d) => {
            // the scroll offset never passes the last history entry
            let last = app
                .catalog
                .document(&d.id)
                .map_or(0, |doc| doc.history.len().saturating_sub(1));
            match action {
                Action::MoveSelectionUp => d.history_scroll = d.history_scroll.saturating_sub(1),
                Action::MoveSelectionDown => d.history_scroll = (d.history_scroll + 1).min(last),
                Action::SelectFirst => d.history_scroll = 0,
                Action::SelectLast => d.history_scroll = last,
                _ => {}
            }
            None
        }
        Screen::AddDocument(_) => None,
    };

    if let Some(notice) = notice {
        app.ui.show_info(notice);
    }
    app.ui.request_redraw(RedrawFlag::Main);
    Ok(())
}

pub(super) fn open_selected(app: &mut AppState) -> Result<(), AppError> {
    match &app.screen {
        Screen::Documents(s) => {
            let Some(doc) = s.current(app.catalog.documents()) else {
                return Ok(());
            };
            let route = Route::Document(doc.id.clone());
            app.navigate(route)
        }
        Screen::Counterparties(_) => counterparty_action(app),
        Screen::Invitations(_) => answer_invitation(app, true),
        Screen::Document(_) | Screen::AddDocument(_) => Ok(()),
    }
}

/// Sign, reject, approve, download, print or delete the open document.
pub(super) fn document_action(app: &mut AppState, action: &Action) -> Result<(), AppError> {
    let Screen::Document(screen) = &app.screen else {
        return Ok(());
    };
    let id = screen.id.clone();
    let person = app.config.user_name.as_str();

    match action {
        Action::SignDocument => {
            app.catalog.sign_document(&id, person)?;
            app.ui.show_success("Документ подписан");
        }
        Action::RejectDocument => {
            app.catalog.reject_document(&id)?;
            app.ui.show_info("Документ отклонён");
        }
        Action::SendForApproval => {
            app.catalog.send_for_approval(&id, person)?;
            app.ui.show_success("Документ отправлен на согласование");
        }
        Action::DownloadDocument | Action::PrintDocument => {
            let title = app
                .catalog
                .document(&id)
                .map(|d| d.title.clone())
                .unwrap_or_default();
            let verb = if matches!(action, Action::PrintDocument) {
                "Печать"
            } else {
                "Скачивание"
            };
            app.ui.show_info(format!("{verb}: {title}"));
        }
        Action::DeleteDocument => {
            let removed = app.catalog.delete_document(&id)?;
            app.replace_route(Route::Documents)?;
            app.ui.show_success(format!("Удалён: {}", removed.title));
        }
        _ => {}
    }
    app.ui.request_redraw(RedrawFlag::Main);
    Ok(())
}

/// The per-row button of the counterparties table.
pub(super) fn counterparty_action(app: &mut AppState) -> Result<(), AppError> {
    let Screen::Counterparties(screen) = &app.screen else {
        return Ok(());
    };

    match screen.section {
        CounterpartySection::Invitations => return app.navigate(Route::Invitations),
        CounterpartySection::Blocked => {
            app.ui.show_info("Заблокированных контрагентов нет");
            return Ok(());
        }
        CounterpartySection::Invite | CounterpartySection::Yours => {}
    }

    let Some(row) = screen.list.current(app.catalog.counterparties()) else {
        return Ok(());
    };
    let (id, name, status) = (row.id.clone(), row.name.clone(), row.status);

    let message = match status {
        CounterpartyStatus::InList => {
            app.ui.show_info(status.action_label());
            return Ok(());
        }
        CounterpartyStatus::Invite => format!("Приглашение отправлено: {name}"),
        CounterpartyStatus::Accept => format!("Приглашение принято: {name}"),
    };
    app.catalog.invite_counterparty(&id)?;

    if let Screen::Counterparties(screen) = &mut app.screen {
        screen.list.refresh(app.catalog.counterparties());
    }
    app.ui.show_success(message);
    app.ui.request_redraw(RedrawFlag::Main);
    Ok(())
}

pub(super) fn next_section(app: &mut AppState) -> Result<(), AppError> {
    let Screen::Counterparties(screen) = &mut app.screen else {
        return Ok(());
    };
    let list = app.catalog.counterparties();

    screen.section = screen.section.next();
    screen.list.filter.set_status_filter(screen.section.status_filter(), list);
    screen.list.refresh(list);
    debug!(section = ?screen.section, "counterparty section");

    app.ui.request_redraw(RedrawFlag::Main);
    Ok(())
}

pub(super) fn answer_invitation(app: &mut AppState, accept: bool) -> Result<(), AppError> {
    let Screen::Invitations(screen) = &app.screen else {
        return Ok(());
    };
    let Some(row) = screen.current(app.catalog.invitations()) else {
        return Ok(());
    };
    let id = row.id.clone();

    let invitation = app.catalog.answer_invitation(&id, accept)?;
    if let Screen::Invitations(screen) = &mut app.screen {
        screen.refresh(app.catalog.invitations());
    }

    if accept {
        app.ui
            .show_success(format!("Приглашение принято: {}", invitation.name));
    } else {
        app.ui
            .show_info(format!("Приглашение отклонено: {}", invitation.name));
    }
    app.ui.request_redraw(RedrawFlag::Main);
    Ok(())
}
