//! src/model/document_form.rs
//! ============================================================================
//! # AddDocumentForm: fields, send settings and the staged file area
//!
//! The form owns its [`StagedFileStore`]. Submitting or cancelling consumes
//! the form and tears the store down, so every preview handle is released
//! no matter how the screen is left.

use chrono::NaiveDate;
use compact_str::CompactString;
use smallvec::SmallVec;
use stagr::{
    DropZone, IntakeSource, PreviewRegistry, RawFile, StageError, StageResult, StagedFile,
    StagedFileStore, StagingConfig, UploadPolicy,
};
use tracing::{debug, info, instrument, warn};

use crate::{
    error::AppError,
    model::catalog::{DocumentDraft, DocumentType, FORM_COUNTERPARTIES},
    util::money::parse_rubles,
};

/// Accepted spellings of the document date.
pub const DATE_FORMATS: [&str; 2] = ["%d.%m.%Y", "%Y-%m-%d"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    DocumentType,
    Number,
    Date,
    Amount,
    Counterparty,
    Comment,
    Files,
    RequireSignature,
    NotifyEmail,
    Urgent,
}

impl FormField {
    /// Tab order.
    pub const ORDER: [Self; 10] = [
        Self::DocumentType,
        Self::Number,
        Self::Date,
        Self::Amount,
        Self::Counterparty,
        Self::Comment,
        Self::Files,
        Self::RequireSignature,
        Self::NotifyEmail,
        Self::Urgent,
    ];

    fn position(self) -> usize {
        Self::ORDER.iter().position(|f| *f == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ORDER[(self.position() + 1) % Self::ORDER.len()]
    }

    pub fn prev(self) -> Self {
        let len = Self::ORDER.len();
        Self::ORDER[(self.position() + len - 1) % len]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::DocumentType => "Тип документа *",
            Self::Number => "Номер документа *",
            Self::Date => "Дата документа *",
            Self::Amount => "Сумма (₽)",
            Self::Counterparty => "Контрагент *",
            Self::Comment => "Комментарий",
            Self::Files => "Загрузка файлов",
            Self::RequireSignature => "Требуется подпись контрагента",
            Self::NotifyEmail => "Уведомить по email",
            Self::Urgent => "Срочный документ",
        }
    }

    pub const fn hint(self) -> &'static str {
        match self {
            Self::DocumentType => "Выберите тип",
            Self::Number => "Введите номер",
            Self::Date => "ДД.ММ.ГГГГ",
            Self::Amount => "0.00",
            Self::Counterparty => "Выберите контрагента",
            Self::Comment => "Дополнительная информация о документе",
            Self::Files => "Перетащите файлы сюда или нажмите o для выбора",
            Self::RequireSignature => "Документ будет отправлен на подписание",
            Self::NotifyEmail => "Отправить уведомление контрагенту на электронную почту",
            Self::Urgent => "Пометить документ как требующий срочного рассмотрения",
        }
    }

    pub const fn is_text(self) -> bool {
        matches!(self, Self::Number | Self::Date | Self::Amount | Self::Comment)
    }

    pub const fn is_choice(self) -> bool {
        matches!(self, Self::DocumentType | Self::Counterparty)
    }

    pub const fn is_checkbox(self) -> bool {
        matches!(self, Self::RequireSignature | Self::NotifyEmail | Self::Urgent)
    }
}

/// Outcome of one intake, for the notification line.
#[derive(Debug, Default)]
pub struct StageReport {
    pub added: usize,
    pub warnings: Vec<StageError>,
}

#[derive(Debug)]
pub struct AddDocumentForm {
    pub document_type: Option<DocumentType>,
    pub number: String,
    pub date: String,
    pub amount: String,
    /// Index into [`FORM_COUNTERPARTIES`]
    pub counterparty: Option<usize>,
    pub comment: String,

    pub require_signature: bool,
    pub notify_email: bool,
    pub urgent: bool,

    pub focus: FormField,
    file_cursor: Option<usize>,
    errors: SmallVec<[(FormField, CompactString); 4]>,

    files: StagedFileStore,
    drop_zone: DropZone,
    registry: PreviewRegistry,
    policy: UploadPolicy,
    focus_new_files: bool,
    /// Tells this form's intake results apart from those of a form that
    /// was closed while its files were still being read.
    generation: u64,
}

impl AddDocumentForm {
    pub fn new(registry: PreviewRegistry, config: &StagingConfig, generation: u64) -> Self {
        Self {
            document_type: None,
            number: String::new(),
            date: String::new(),
            amount: String::new(),
            counterparty: None,
            comment: String::new(),
            require_signature: true,
            notify_email: false,
            urgent: false,
            focus: FormField::DocumentType,
            file_cursor: None,
            errors: SmallVec::new(),
            files: StagedFileStore::new(),
            drop_zone: DropZone::new(),
            registry,
            policy: config.policy.clone(),
            focus_new_files: config.focus_new_files,
            generation,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn files(&self) -> &StagedFileStore {
        &self.files
    }

    pub fn policy(&self) -> &UploadPolicy {
        &self.policy
    }

    pub fn file_cursor(&self) -> Option<usize> {
        self.file_cursor
    }

    pub fn is_drag_active(&self) -> bool {
        self.drop_zone.is_active()
    }

    pub fn counterparty_label(&self) -> Option<&'static str> {
        self.counterparty
            .and_then(|i| FORM_COUNTERPARTIES.get(i))
            .map(|o| o.label)
    }

    pub fn field_error(&self, field: FormField) -> Option<&str> {
        self.errors
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, msg)| msg.as_str())
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    // ---------------------------------------------------------------------
    // Focus and editing
    // ---------------------------------------------------------------------

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn focus_prev(&mut self) {
        self.focus = self.focus.prev();
    }

    fn focused_text_mut(&mut self) -> Option<&mut String> {
        match self.focus {
            FormField::Number => Some(&mut self.number),
            FormField::Date => Some(&mut self.date),
            FormField::Amount => Some(&mut self.amount),
            FormField::Comment => Some(&mut self.comment),
            _ => None,
        }
    }

    /// Type into the focused text field. Returns `false` when the focus is
    /// not on a text field.
    pub fn insert_char(&mut self, ch: char) -> bool {
        let field = self.focus;
        let Some(text) = self.focused_text_mut() else {
            return false;
        };
        text.push(ch);
        self.clear_error(field);
        true
    }

    pub fn backspace(&mut self) -> bool {
        let field = self.focus;
        let removed = self
            .focused_text_mut()
            .and_then(String::pop)
            .is_some();
        if removed {
            self.clear_error(field);
        }
        removed
    }

    /// Step the focused dropdown forwards or backwards.
    pub fn cycle_choice(&mut self, forward: bool) -> bool {
        fn step(current: Option<usize>, len: usize, forward: bool) -> Option<usize> {
            match (current, forward) {
                (None, true) => Some(0),
                (None, false) => Some(len - 1),
                (Some(i), true) => Some((i + 1) % len),
                (Some(i), false) => Some((i + len - 1) % len),
            }
        }

        match self.focus {
            FormField::DocumentType => {
                let current = self
                    .document_type
                    .and_then(|t| DocumentType::ALL.iter().position(|x| *x == t));
                self.document_type = step(current, DocumentType::ALL.len(), forward)
                    .and_then(|i| DocumentType::ALL.get(i).copied());
            }
            FormField::Counterparty => {
                self.counterparty = step(self.counterparty, FORM_COUNTERPARTIES.len(), forward);
            }
            _ => return false,
        }
        self.clear_error(self.focus);
        true
    }

    /// Flip the focused send-setting checkbox.
    pub fn toggle_checkbox(&mut self) -> bool {
        let flag = match self.focus {
            FormField::RequireSignature => &mut self.require_signature,
            FormField::NotifyEmail => &mut self.notify_email,
            FormField::Urgent => &mut self.urgent,
            _ => return false,
        };
        *flag = !*flag;
        true
    }

    fn clear_error(&mut self, field: FormField) {
        self.errors.retain(|(f, _)| *f != field);
    }

    // ---------------------------------------------------------------------
    // File staging
    // ---------------------------------------------------------------------

    pub fn drag_enter(&mut self) {
        self.drop_zone.drag_enter();
    }

    pub fn drag_leave(&mut self) {
        self.drop_zone.drag_leave();
    }

    /// Run a batch from either intake path through the upload policy and
    /// append what it lets through. An empty batch changes nothing and is
    /// reported as [`StageError::EmptyBatch`].
    #[instrument(level = "debug", skip(self, batch), fields(files = batch.len()))]
    pub fn stage(
        &mut self,
        source: IntakeSource,
        batch: Vec<RawFile>,
    ) -> StageResult<StageReport> {
        let batch = match source {
            IntakeSource::Drop => self.drop_zone.drop(batch),
            IntakeSource::Picker => stagr::non_empty(batch),
        }
        .inspect_err(|_| debug!(%source, "empty batch ignored"))?;

        let screened = self.policy.screen(batch);
        let added = self.files.intake(source, screened.accepted, &self.registry);

        if added > 0 {
            if self.focus_new_files {
                self.file_cursor = Some(self.files.len() - 1);
                self.focus = FormField::Files;
            } else if self.file_cursor.is_none() {
                self.file_cursor = Some(0);
            }
        }

        info!(
            %source,
            added,
            rejected = screened.warnings.len(),
            total = self.files.len(),
            "intake finished"
        );

        Ok(StageReport {
            added,
            warnings: screened.warnings,
        })
    }

    pub fn move_file_cursor(&mut self, down: bool) {
        let len = self.files.len();
        if len == 0 {
            self.file_cursor = None;
            return;
        }
        self.file_cursor = Some(match self.file_cursor {
            None => 0,
            Some(i) if down => (i + 1).min(len - 1),
            Some(i) => i.saturating_sub(1),
        });
    }

    /// Remove the staged file at `index`.
    pub fn remove_file(&mut self, index: usize) -> StageResult<StagedFile> {
        let removed = self.files.remove_at(index)?;

        let len = self.files.len();
        self.file_cursor = match self.file_cursor {
            _ if len == 0 => None,
            Some(c) if c >= len => Some(len - 1),
            other => other,
        };
        Ok(removed)
    }

    /// Remove whatever the file cursor points at.
    pub fn remove_selected_file(&mut self) -> StageResult<StagedFile> {
        let index = self.file_cursor.ok_or(StageError::IndexOutOfBounds {
            index: 0,
            len: self.files.len(),
        })?;
        self.remove_file(index)
    }

    // ---------------------------------------------------------------------
    // Submit / cancel
    // ---------------------------------------------------------------------

    /// Check required fields. On failure every problem is recorded for
    /// display and the first one is returned.
    pub fn validate(&mut self) -> Result<DocumentDraft, AppError> {
        self.errors.clear();

        let doc_type = self.document_type;
        if doc_type.is_none() {
            self.errors
                .push((FormField::DocumentType, "Выберите тип документа".into()));
        }

        let number = self.number.trim();
        if number.is_empty() {
            self.errors
                .push((FormField::Number, "Введите номер документа".into()));
        }

        let date = parse_form_date(&self.date);
        if date.is_err() {
            self.errors
                .push((FormField::Date, "Дата в формате ДД.ММ.ГГГГ".into()));
        }

        let amount = parse_rubles(&self.amount);
        if amount.is_err() {
            self.errors.push((FormField::Amount, "Некорректная сумма".into()));
        }

        let counterparty = self.counterparty_label();
        if counterparty.is_none() {
            self.errors
                .push((FormField::Counterparty, "Выберите контрагента".into()));
        }

        if let Some((field, message)) = self.errors.first() {
            warn!(errors = self.errors.len(), "add-document form rejected");
            return Err(AppError::invalid_input(field.label(), message.as_str()));
        }

        match (doc_type, date, amount, counterparty) {
            (Some(doc_type), Ok(date), Ok(amount), Some(counterparty)) => Ok(DocumentDraft {
                doc_type,
                number: number.into(),
                date,
                amount,
                counterparty: counterparty.into(),
                comment: self.comment.trim().to_string(),
                require_signature: self.require_signature,
                notify_email: self.notify_email,
                urgent: self.urgent,
                attachments: self.files.iter().map(|f| f.name.clone()).collect(),
            }),
            _ => Err(AppError::invalid_input("form", "incomplete")),
        }
    }

    /// Discard the form after a successful submit. Returns how many
    /// previews were released.
    pub fn finish(self) -> usize {
        self.discard("submitted")
    }

    pub fn cancel(self) -> usize {
        self.discard("cancelled")
    }

    fn discard(self, reason: &'static str) -> usize {
        let staged = self.files.len();
        let released = self.files.teardown();
        info!(reason, staged, released, "add-document form closed");
        released
    }
}

/// `31.12.2025` or `2025-12-31`.
pub fn parse_form_date(input: &str) -> Result<NaiveDate, AppError> {
    let input = input.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(input, fmt).ok())
        .ok_or_else(|| AppError::invalid_input("date", format!("'{input}' is not a date")))
}
