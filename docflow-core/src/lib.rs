pub mod error;

pub mod config;

pub mod controller {
    pub mod actions;
    pub use actions::{Action, InputPromptType};

    pub mod action_dispatcher;
    pub use action_dispatcher::{ActionDispatcher, DispatchResult};

    pub mod event_loop;
    pub use event_loop::{EventLoop, TaskResult};

    pub mod event_processor;
}

pub mod model {
    pub mod app_state;

    pub mod catalog;
    pub use catalog::{Catalog, Counterparty, Document, DocumentStatus, Invitation};

    pub mod document_form;
    pub use document_form::{AddDocumentForm, FormField};

    pub mod filter_state;
    pub use filter_state::{Filterable, ListFilterState, StatusFilter};

    pub mod route;
    pub use route::{MenuSection, Route};

    pub mod screens;

    pub mod ui_state;
    pub use ui_state::{Notification, NotificationLevel, RedrawFlag, UIOverlay, UIState};
}

pub mod view {
    pub mod icons;

    pub mod theme;

    pub mod ui;

    pub mod components {
        pub mod add_document_form;
        pub use add_document_form::AddDocumentFormView;
        pub mod counterparty_list;
        pub use counterparty_list::CounterpartyList;
        pub mod document_detail;
        pub use document_detail::DocumentDetail;
        pub mod document_table;
        pub use document_table::DocumentTable;
        pub mod help_overlay;
        pub use help_overlay::HelpOverlay;
        pub mod invitation_list;
        pub use invitation_list::InvitationList;
        pub mod notification_overlay;
        pub use notification_overlay::NotificationOverlay;
        pub mod prompt_overlay;
        pub use prompt_overlay::PromptOverlay;
        pub mod sidebar;
        pub use sidebar::Sidebar;
        pub mod status_bar;
        pub use status_bar::StatusBar;
    }
}

pub mod fs {
    pub mod intake;
}

pub mod tasks {
    pub mod intake_task;
}

pub mod util {
    pub mod money;
}

pub mod logging;
pub use logging::Logger;

pub use error::AppError;

pub use model::{app_state::AppState, ui_state::UIState};
