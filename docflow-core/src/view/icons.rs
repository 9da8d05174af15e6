//! src/view/icons.rs
//! ============================================================================
//! # Icons (Nerd Fonts)
//!
//! File kinds, history events and menu entries.

use stagr::FileKind;

use crate::model::{catalog::HistoryKind, route::MenuSection};

pub const DOCUMENT_ICON: &str = "\u{f15c}";
pub const SPREADSHEET_ICON: &str = "\u{f1c3}";
pub const IMAGE_ICON: &str = "\u{f1c5}";
pub const FILE_ICON: &str = "\u{f15b}";
pub const UPLOAD_ICON: &str = "\u{f093}";

pub const SIGNED_ICON: &str = "\u{f00c}";
pub const SENT_ICON: &str = "\u{f1d8}";
pub const AGREED_ICON: &str = "\u{f164}";
pub const APPROVED_ICON: &str = "\u{f058}";

pub const CHECKED: &str = "[x]";
pub const UNCHECKED: &str = "[ ]";

pub const fn file_icon(kind: FileKind) -> &'static str {
    match kind {
        FileKind::Document => DOCUMENT_ICON,
        FileKind::Spreadsheet => SPREADSHEET_ICON,
        FileKind::Image => IMAGE_ICON,
        FileKind::Generic => FILE_ICON,
    }
}

pub const fn history_icon(kind: HistoryKind) -> &'static str {
    match kind {
        HistoryKind::Signed => SIGNED_ICON,
        HistoryKind::Sent => SENT_ICON,
        HistoryKind::Agreed => AGREED_ICON,
        HistoryKind::Approved => APPROVED_ICON,
    }
}

pub const fn menu_icon(section: MenuSection) -> &'static str {
    match section {
        MenuSection::Documents => DOCUMENT_ICON,
        MenuSection::Counterparties => "\u{f0c0}",
        MenuSection::Profile => "\u{f1ad}",
        MenuSection::Tariffs => "\u{f09d}",
    }
}

pub const fn checkbox(checked: bool) -> &'static str {
    if checked { CHECKED } else { UNCHECKED }
}
