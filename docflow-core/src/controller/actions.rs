//! src/controller/actions.rs
//! ============================================================================
//! # Actions: Centralized Application Commands
//!
//! Every key press, paste and background result is mapped to one `Action`
//! before it touches state. The dispatcher is the only consumer.

use std::path::PathBuf;

use stagr::IntakeSource;

use crate::{
    controller::event_loop::TaskResult,
    model::route::{MenuSection, Route},
};

/// Type of input prompt to show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputPromptType {
    /// Search text of the current list
    Search,
    /// Paths for the add-document file picker
    PickFiles,
    /// Route path, e.g. `/document/3`
    GoTo,
}

impl InputPromptType {
    pub const fn title(&self) -> &'static str {
        match self {
            Self::Search => "Поиск",
            Self::PickFiles => "Выбрать файлы",
            Self::GoTo => "Перейти",
        }
    }

    pub const fn hint(&self) -> &'static str {
        match self {
            Self::Search => "Название, номер или ИНН",
            Self::PickFiles => "Пути к файлам через пробел",
            Self::GoTo => "/, /document/<id>, /counterparties, /invitations, /add-document",
        }
    }
}

#[derive(Debug)]
pub enum Action {
    /// Quit the application.
    Quit,

    /// Event consumed, nothing to change.
    NoOp,

    /// Periodic wake-up (notification expiry).
    Tick,

    /// A terminal resize event.
    Resize(u16, u16),

    // Navigation
    Navigate(Route),
    SelectMenu(MenuSection),
    Back,

    // Overlays and prompt
    ToggleHelp,
    CloseOverlay,
    ShowInputPrompt(InputPromptType),
    PromptInput(char),
    PromptPaste(String),
    PromptBackspace,
    PromptCursorLeft,
    PromptCursorRight,
    SubmitPrompt,
    DismissNotification,

    // Lists
    MoveSelectionUp,
    MoveSelectionDown,
    SelectFirst,
    SelectLast,
    OpenSelected,
    ToggleRowSelection,
    ToggleSelectAll,
    CycleStatusFilter,
    ClearFilters,

    // Document detail
    SignDocument,
    RejectDocument,
    SendForApproval,
    DownloadDocument,
    PrintDocument,
    DeleteDocument,

    // Counterparties and invitations
    CounterpartyAction,
    NextSection,
    AcceptInvitation,
    DeclineInvitation,

    // Add-document form
    FormFocusNext,
    FormFocusPrev,
    FormInput(char),
    FormBackspace,
    FormCycleChoice { forward: bool },
    FormToggle,
    FormMoveFile { down: bool },
    FormRemoveFile,
    SubmitForm,
    CancelForm,

    /// Raw text dropped onto the terminal while the form is open.
    DropText(String),

    /// Start reading files for the staging area.
    IntakePaths {
        source: IntakeSource,
        paths: Vec<PathBuf>,
    },

    /// A result from a background task.
    TaskResult(TaskResult),
}
