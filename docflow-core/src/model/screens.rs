//! Per-screen state. Each value lives exactly as long as its screen is shown.

use compact_str::CompactString;

use crate::model::{
    catalog::{Counterparty, CounterpartyStatus, Document, Invitation},
    document_form::AddDocumentForm,
    filter_state::{Filterable, ListFilterState, StatusFilter},
};

/// Row cursor of a filtered list; indexes into the *visible* rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListCursor {
    pub selected: Option<usize>,
}

impl ListCursor {
    pub fn move_up(&mut self, len: usize) {
        self.selected = match (self.selected, len) {
            (_, 0) => None,
            (None, _) => Some(0),
            (Some(i), _) => Some(i.saturating_sub(1)),
        };
    }

    pub fn move_down(&mut self, len: usize) {
        self.selected = match (self.selected, len) {
            (_, 0) => None,
            (None, _) => Some(0),
            (Some(i), len) => Some((i + 1).min(len - 1)),
        };
    }

    pub fn first(&mut self, len: usize) {
        self.selected = (len > 0).then_some(0);
    }

    pub fn last(&mut self, len: usize) {
        self.selected = len.checked_sub(1);
    }

    /// Keep the cursor inside a list that just changed length.
    pub fn clamp(&mut self, len: usize) {
        self.selected = match self.selected {
            _ if len == 0 => None,
            None => Some(0),
            Some(i) => Some(i.min(len - 1)),
        };
    }
}

/// A searchable, selectable list screen.
#[derive(Debug)]
pub struct ListScreen<T: Filterable> {
    pub filter: ListFilterState<T>,
    pub cursor: ListCursor,
}

impl<T: Filterable> Default for ListScreen<T> {
    fn default() -> Self {
        Self {
            filter: ListFilterState::new(),
            cursor: ListCursor::default(),
        }
    }
}

impl<T: Filterable> ListScreen<T> {
    pub fn new(list: &[T]) -> Self {
        let mut screen = Self::default();
        screen.cursor.clamp(list.len());
        screen
    }

    /// Row under the cursor, among the visible rows.
    pub fn current<'a>(&self, list: &'a [T]) -> Option<&'a T> {
        let index = self.cursor.selected?;
        self.filter.apply_filter(list).get(index).copied()
    }

    pub fn visible_len(&self, list: &[T]) -> usize {
        list.iter().filter(|item| self.filter.matches(item)).count()
    }

    /// Re-sync selection and cursor after the list or criteria changed.
    pub fn refresh(&mut self, list: &[T]) {
        self.filter.on_list_changed(list);
        let len = self.visible_len(list);
        self.cursor.clamp(len);
    }
}

pub type DocumentsScreen = ListScreen<Document>;
pub type InvitationsScreen = ListScreen<Invitation>;

/// Counterparty submenu sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CounterpartySection {
    #[default]
    Invite,
    Yours,
    Invitations,
    Blocked,
}

impl CounterpartySection {
    pub const ALL: [Self; 4] = [Self::Invite, Self::Yours, Self::Invitations, Self::Blocked];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Invite => "Пригласить контрагента",
            Self::Yours => "Ваши контрагенты",
            Self::Invitations => "Приглашения вас",
            Self::Blocked => "Заблокированные",
        }
    }

    pub fn next(self) -> Self {
        let i = Self::ALL.iter().position(|s| *s == self).unwrap_or(0);
        Self::ALL[(i + 1) % Self::ALL.len()]
    }

    /// Status filter a section implies on the counterparty list.
    pub fn status_filter(self) -> StatusFilter<CounterpartyStatus> {
        match self {
            Self::Yours => StatusFilter::Only(CounterpartyStatus::InList),
            Self::Invite | Self::Invitations | Self::Blocked => StatusFilter::All,
        }
    }
}

#[derive(Debug, Default)]
pub struct CounterpartiesScreen {
    pub list: ListScreen<Counterparty>,
    pub section: CounterpartySection,
}

#[derive(Debug)]
pub struct DocumentScreen {
    pub id: CompactString,
    pub history_scroll: usize,
}

#[derive(Debug)]
pub enum Screen {
    Documents(DocumentsScreen),
    Document(DocumentScreen),
    Counterparties(CounterpartiesScreen),
    Invitations(InvitationsScreen),
    AddDocument(Box<AddDocumentForm>),
}

impl Screen {
    pub fn form(&self) -> Option<&AddDocumentForm> {
        match self {
            Self::AddDocument(form) => Some(&**form),
            _ => None,
        }
    }

    pub fn form_mut(&mut self) -> Option<&mut AddDocumentForm> {
        match self {
            Self::AddDocument(form) => Some(&mut **form),
            _ => None,
        }
    }

    /// Whether typed characters belong to a form text field.
    pub fn captures_text(&self) -> bool {
        self.form().is_some_and(|f| f.focus.is_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::catalog::Catalog;

    #[test]
    fn cursor_stays_in_bounds() {
        let mut cursor = ListCursor::default();
        cursor.move_down(3);
        cursor.move_down(3);
        cursor.move_down(3);
        cursor.move_down(3);
        assert_eq!(cursor.selected, Some(2));

        cursor.clamp(1);
        assert_eq!(cursor.selected, Some(0));
        cursor.move_up(1);
        assert_eq!(cursor.selected, Some(0));

        cursor.clamp(0);
        assert_eq!(cursor.selected, None);
        cursor.last(4);
        assert_eq!(cursor.selected, Some(3));
    }

    #[test]
    fn current_row_follows_filter() {
        let catalog = Catalog::mock();
        let list = catalog.counterparties();
        let mut screen = CounterpartiesScreen::default();
        screen.list.refresh(list);
        assert_eq!(screen.list.current(list).map(|c| c.id.as_str()), Some("1"));

        screen.section = CounterpartySection::Yours;
        screen.list.filter.set_status_filter(screen.section.status_filter(), list);
        screen.list.refresh(list);
        assert_eq!(screen.list.visible_len(list), 1);
        assert_eq!(screen.list.current(list).map(|c| c.id.as_str()), Some("4"));
    }
}
