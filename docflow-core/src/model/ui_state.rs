//! UI state: overlays, prompt input, notifications and redraw flags

use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{Duration, Instant};

use compact_str::CompactString;

use crate::controller::actions::InputPromptType;

/// Atomic redraw flags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum RedrawFlag {
    Main = 1,
    StatusBar = 2,
    Overlay = 4,
    Notification = 8,
    All = 15,
}

impl RedrawFlag {
    #[inline]
    pub const fn bits(self) -> u8 {
        self as u8
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[repr(u8)]
pub enum UIOverlay {
    #[default]
    None = 0,
    Help = 1,
    Prompt = 2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum NotificationLevel {
    Info = 0,
    Success = 1,
    Warning = 2,
    Error = 3,
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub message: CompactString,
    pub level: NotificationLevel,
    pub timestamp: Instant,
    pub auto_dismiss: Option<Duration>,
}

#[derive(Debug)]
pub struct UIState {
    pub redraw_flags: AtomicU32,

    pub overlay: UIOverlay,

    // Prompt input
    pub input: CompactString,
    pub input_cursor: usize,
    pub input_prompt_type: Option<InputPromptType>,
    /// Replaces the prompt type's fixed hint while the prompt is open
    pub prompt_hint: Option<String>,

    pub notification: Option<Notification>,
    /// Lifetime of info/success notifications
    pub notification_timeout: Duration,
}

impl Default for UIState {
    fn default() -> Self {
        Self::new(Duration::from_secs(3))
    }
}

impl UIState {
    pub fn new(notification_timeout: Duration) -> Self {
        Self {
            redraw_flags: AtomicU32::new(RedrawFlag::All.bits() as u32),
            overlay: UIOverlay::None,
            input: CompactString::new(""),
            input_cursor: 0,
            input_prompt_type: None,
            prompt_hint: None,
            notification: None,
            notification_timeout,
        }
    }

    #[inline]
    pub fn request_redraw(&self, flag: RedrawFlag) {
        self.redraw_flags
            .fetch_or(flag.bits() as u32, Ordering::Relaxed);
    }

    #[inline]
    pub fn needs_redraw(&self) -> bool {
        self.redraw_flags.load(Ordering::Relaxed) != 0
    }

    #[inline]
    pub fn clear_redraw(&self) {
        self.redraw_flags.store(0, Ordering::Relaxed);
    }

    pub fn show_notification(
        &mut self,
        message: impl Into<CompactString>,
        level: NotificationLevel,
        auto_dismiss: Option<Duration>,
    ) {
        self.notification = Some(Notification {
            message: message.into(),
            level,
            timestamp: Instant::now(),
            auto_dismiss,
        });
        self.request_redraw(RedrawFlag::Notification);
    }

    #[inline]
    pub fn show_info(&mut self, message: impl Into<CompactString>) {
        let timeout = self.notification_timeout;
        self.show_notification(message, NotificationLevel::Info, Some(timeout));
    }

    #[inline]
    pub fn show_success(&mut self, message: impl Into<CompactString>) {
        let timeout = self.notification_timeout;
        self.show_notification(message, NotificationLevel::Success, Some(timeout));
    }

    #[inline]
    pub fn show_warning(&mut self, message: impl Into<CompactString>) {
        let timeout = self.notification_timeout * 2;
        self.show_notification(message, NotificationLevel::Warning, Some(timeout));
    }

    #[inline]
    pub fn show_error(&mut self, message: impl Into<CompactString>) {
        self.show_notification(message, NotificationLevel::Error, None);
    }

    pub fn dismiss_notification(&mut self) {
        if self.notification.take().is_some() {
            self.request_redraw(RedrawFlag::All);
        }
    }

    /// Drop an expired notification. Returns `true` if one was removed.
    pub fn update_notification(&mut self) -> bool {
        let expired = self.notification.as_ref().is_some_and(|n| {
            n.auto_dismiss
                .is_some_and(|ttl| n.timestamp.elapsed() > ttl)
        });
        if expired {
            self.notification = None;
            self.request_redraw(RedrawFlag::All);
        }
        expired
    }

    // Prompt handling

    pub fn open_prompt(&mut self, prompt: InputPromptType, initial: &str) {
        self.overlay = UIOverlay::Prompt;
        self.input_prompt_type = Some(prompt);
        self.prompt_hint = None;
        self.set_input(initial);
        self.request_redraw(RedrawFlag::All);
    }

    pub fn set_prompt_hint(&mut self, hint: impl Into<String>) {
        self.prompt_hint = Some(hint.into());
        self.request_redraw(RedrawFlag::All);
    }

    /// Hint line under the prompt.
    pub fn prompt_hint(&self) -> &str {
        self.prompt_hint
            .as_deref()
            .or_else(|| self.input_prompt_type.map(|p| p.hint()))
            .unwrap_or_default()
    }

    pub fn close_overlay(&mut self) {
        self.overlay = UIOverlay::None;
        self.input_prompt_type = None;
        self.prompt_hint = None;
        self.clear_input();
        self.request_redraw(RedrawFlag::All);
    }

    pub fn toggle_help(&mut self) {
        self.overlay = if self.overlay == UIOverlay::Help {
            UIOverlay::None
        } else {
            UIOverlay::Help
        };
        self.request_redraw(RedrawFlag::All);
    }

    pub fn clear_input(&mut self) {
        self.input = CompactString::new("");
        self.input_cursor = 0;
    }

    pub fn set_input(&mut self, text: impl Into<CompactString>) {
        self.input = text.into();
        self.input_cursor = self.input.len();
    }

    pub fn insert_char(&mut self, ch: char) {
        self.input.insert(self.input_cursor, ch);
        self.input_cursor += ch.len_utf8();
        self.request_redraw(RedrawFlag::Overlay);
    }

    pub fn insert_str(&mut self, text: &str) {
        self.input.insert_str(self.input_cursor, text);
        self.input_cursor += text.len();
        self.request_redraw(RedrawFlag::Overlay);
    }

    pub fn delete_char_before(&mut self) -> bool {
        let Some((pos, _)) = self.input[..self.input_cursor].char_indices().next_back() else {
            return false;
        };
        self.input.remove(pos);
        self.input_cursor = pos;
        self.request_redraw(RedrawFlag::Overlay);
        true
    }

    pub fn move_cursor_left(&mut self) {
        if let Some((pos, _)) = self.input[..self.input_cursor].char_indices().next_back() {
            self.input_cursor = pos;
        }
    }

    pub fn move_cursor_right(&mut self) {
        if let Some(ch) = self.input[self.input_cursor..].chars().next() {
            self.input_cursor += ch.len_utf8();
        }
    }

    pub fn get_overlay_title(&self) -> &'static str {
        match self.overlay {
            UIOverlay::Help => "Справка",
            UIOverlay::Prompt => self
                .input_prompt_type
                .as_ref()
                .map_or("Ввод", InputPromptType::title),
            UIOverlay::None => "",
        }
    }

    pub fn overlay_accepts_input(&self) -> bool {
        self.overlay == UIOverlay::Prompt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn editing_handles_multibyte_input() {
        let mut ui = UIState::default();
        for ch in "Акт".chars() {
            ui.insert_char(ch);
        }
        ui.move_cursor_left();
        ui.insert_char('1');
        assert_eq!(ui.input, "Ак1т");

        assert!(ui.delete_char_before());
        assert!(ui.delete_char_before());
        assert_eq!(ui.input, "Ат");
        ui.move_cursor_left();
        assert!(!ui.delete_char_before());
    }

    #[test]
    fn timed_notifications_expire() {
        let mut ui = UIState::new(Duration::ZERO);
        ui.show_info("готово");
        std::thread::sleep(Duration::from_millis(2));
        assert!(ui.update_notification());
        assert!(ui.notification.is_none());

        ui.show_error("ошибка");
        std::thread::sleep(Duration::from_millis(2));
        assert!(!ui.update_notification());
    }

    #[test]
    fn prompt_open_and_close() {
        let mut ui = UIState::default();
        ui.clear_redraw();
        ui.open_prompt(InputPromptType::Search, "акт");
        assert!(ui.overlay_accepts_input());
        assert_eq!(ui.input_cursor, "акт".len());
        assert!(ui.needs_redraw());

        ui.close_overlay();
        assert_eq!(ui.overlay, UIOverlay::None);
        assert!(ui.input.is_empty());
    }

    #[test]
    fn prompt_hint_override_lasts_until_close() {
        let mut ui = UIState::default();
        ui.open_prompt(InputPromptType::PickFiles, "");
        assert_eq!(ui.prompt_hint(), InputPromptType::PickFiles.hint());

        ui.set_prompt_hint("только .pdf");
        assert_eq!(ui.prompt_hint(), "только .pdf");

        ui.close_overlay();
        assert_eq!(ui.prompt_hint(), "");
        ui.open_prompt(InputPromptType::Search, "");
        assert_eq!(ui.prompt_hint(), InputPromptType::Search.hint());
    }
}
