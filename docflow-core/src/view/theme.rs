//! src/view/theme.rs
//! ============================================================================
//! # Catppuccin Mocha Theme Color Palette
//!
//! Colour constants plus the named styles the screens share. Colors are
//! from the official Catppuccin palette:
//! https://github.com/catppuccin/catppuccin

use ratatui::style::{Color, Modifier, Style};
use tracing::{debug, instrument};

use crate::model::{
    catalog::{CounterpartyStatus, DocumentStatus},
    ui_state::NotificationLevel,
};

#[instrument(level = "debug")]
pub fn init_theme() {
    debug!("Initializing Catppuccin Mocha theme");
    debug!("Background: {:?}", BACKGROUND);
    debug!("Foreground: {:?}", FOREGROUND);
}

pub const BACKGROUND: Color = Color::Rgb(30, 30, 46); // Base
pub const CURRENT_LINE: Color = Color::Rgb(69, 71, 90); // Surface1
pub const FOREGROUND: Color = Color::Rgb(205, 214, 244); // Text
pub const COMMENT: Color = Color::Rgb(127, 132, 156); // Overlay1
pub const BLUE: Color = Color::Rgb(137, 180, 250); // Blue
pub const CYAN: Color = Color::Rgb(137, 220, 235); // Sky
pub const GREEN: Color = Color::Rgb(166, 227, 161); // Green
pub const ORANGE: Color = Color::Rgb(250, 179, 135); // Peach
pub const PINK: Color = Color::Rgb(245, 194, 231); // Pink
pub const PURPLE: Color = Color::Rgb(203, 166, 247); // Mauve
pub const RED: Color = Color::Rgb(243, 139, 168); // Red
pub const YELLOW: Color = Color::Rgb(249, 226, 175); // Yellow

pub fn base_style() -> Style {
    Style::default().bg(BACKGROUND).fg(FOREGROUND)
}

pub fn border_style() -> Style {
    Style::default().fg(COMMENT)
}

pub fn focused_border_style() -> Style {
    Style::default().fg(PURPLE)
}

pub fn title_style() -> Style {
    Style::default().fg(PURPLE).add_modifier(Modifier::BOLD)
}

pub fn header_style() -> Style {
    Style::default().fg(YELLOW).add_modifier(Modifier::BOLD)
}

pub fn highlight_style() -> Style {
    Style::default()
        .bg(CURRENT_LINE)
        .add_modifier(Modifier::BOLD)
}

pub fn muted_style() -> Style {
    Style::default().fg(COMMENT)
}

pub fn error_style() -> Style {
    Style::default().fg(RED)
}

pub fn document_status_color(status: DocumentStatus) -> Color {
    match status {
        DocumentStatus::RequiresSignature => ORANGE,
        DocumentStatus::Signed => GREEN,
        DocumentStatus::OnApproval => BLUE,
        DocumentStatus::Rejected => RED,
    }
}

pub fn counterparty_status_color(status: CounterpartyStatus) -> Color {
    match status {
        CounterpartyStatus::Invite => BLUE,
        CounterpartyStatus::Accept => YELLOW,
        CounterpartyStatus::InList => GREEN,
    }
}

pub fn notification_color(level: NotificationLevel) -> Color {
    match level {
        NotificationLevel::Info => CYAN,
        NotificationLevel::Success => GREEN,
        NotificationLevel::Warning => YELLOW,
        NotificationLevel::Error => RED,
    }
}
