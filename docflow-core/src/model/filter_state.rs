//! src/model/filter_state.rs
//! ============================================================================
//! # ListFilterState: search, status filter and multi-select for a listing
//!
//! Screen-agnostic: any row type implementing [`Filterable`] gets the same
//! narrowing and selection rules. The state never owns the rows; every
//! operation that depends on visibility takes the current list.

use std::{fmt, hash::Hash};

use ahash::AHashSet;

use crate::model::catalog::{
    Counterparty, CounterpartyStatus, Document, DocumentStatus, Invitation,
};

/// A row that can be searched, filtered by status and selected.
pub trait Filterable {
    type Id: Clone + Eq + Hash + fmt::Debug;
    type Status: Copy + Eq + fmt::Debug + 'static;

    fn id(&self) -> Self::Id;

    /// Primary display text matched by search.
    fn name(&self) -> &str;

    /// Secondary identifier matched by search (document number, INN).
    fn code(&self) -> &str;

    fn status(&self) -> Self::Status;

    /// Every status value, in the order the filter cycles through them.
    fn statuses() -> &'static [Self::Status];

    fn status_label(status: Self::Status) -> &'static str;
}

/// `All` shows every row; `Only` keeps one status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter<S> {
    #[default]
    All,
    Only(S),
}

impl<S: Copy + Eq> StatusFilter<S> {
    #[inline]
    pub fn admits(&self, status: S) -> bool {
        match self {
            Self::All => true,
            Self::Only(s) => *s == status,
        }
    }
}

pub struct ListFilterState<T: Filterable> {
    search_text: String,
    /// Lowercased copy of `search_text`
    needle: String,
    status_filter: StatusFilter<T::Status>,
    selected_ids: AHashSet<T::Id>,
}

impl<T: Filterable> fmt::Debug for ListFilterState<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListFilterState")
            .field("search_text", &self.search_text)
            .field("status_filter", &self.status_filter)
            .field("selected", &self.selected_ids.len())
            .finish()
    }
}

impl<T: Filterable> Default for ListFilterState<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Filterable> ListFilterState<T> {
    pub fn new() -> Self {
        Self {
            search_text: String::new(),
            needle: String::new(),
            status_filter: StatusFilter::All,
            selected_ids: AHashSet::new(),
        }
    }

    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    pub fn status_filter(&self) -> StatusFilter<T::Status> {
        self.status_filter
    }

    pub fn status_filter_label(&self) -> &'static str {
        match self.status_filter {
            StatusFilter::All => "Все статусы",
            StatusFilter::Only(status) => T::status_label(status),
        }
    }

    pub fn is_selected(&self, id: &T::Id) -> bool {
        self.selected_ids.contains(id)
    }

    pub fn selected_count(&self) -> usize {
        self.selected_ids.len()
    }

    pub fn selected_ids(&self) -> impl Iterator<Item = &T::Id> {
        self.selected_ids.iter()
    }

    /// Flip membership of one id.
    pub fn toggle(&mut self, id: T::Id) {
        if !self.selected_ids.remove(&id) {
            self.selected_ids.insert(id);
        }
    }

    /// Clear the selection when every visible id is already selected (hidden
    /// ids do not count), otherwise select exactly the visible ids.
    pub fn toggle_all<I>(&mut self, visible: I)
    where
        I: IntoIterator<Item = T::Id>,
    {
        let visible: Vec<T::Id> = visible.into_iter().collect();
        let all_selected = visible.iter().all(|id| self.selected_ids.contains(id));

        if all_selected {
            self.selected_ids.clear();
        } else {
            self.selected_ids = visible.into_iter().collect();
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected_ids.clear();
    }

    /// Whether one row passes the current criteria.
    pub fn matches(&self, item: &T) -> bool {
        if !self.status_filter.admits(item.status()) {
            return false;
        }
        if self.needle.is_empty() {
            return true;
        }
        item.name().to_lowercase().contains(&self.needle)
            || item.code().to_lowercase().contains(&self.needle)
    }

    /// Order-preserving subsequence of `list` that passes the criteria.
    pub fn apply_filter<'a>(&self, list: &'a [T]) -> Vec<&'a T> {
        list.iter().filter(|item| self.matches(item)).collect()
    }

    pub fn visible_ids(&self, list: &[T]) -> Vec<T::Id> {
        list.iter()
            .filter(|item| self.matches(item))
            .map(T::id)
            .collect()
    }

    pub fn set_search(&mut self, text: impl Into<String>, list: &[T]) {
        self.search_text = text.into();
        self.needle = self.search_text.to_lowercase();
        self.on_list_changed(list);
    }

    pub fn set_status_filter(&mut self, filter: StatusFilter<T::Status>, list: &[T]) {
        self.status_filter = filter;
        self.on_list_changed(list);
    }

    /// Step `All -> first status -> ... -> last status -> All`.
    pub fn cycle_status(&mut self, list: &[T]) -> StatusFilter<T::Status> {
        let statuses = T::statuses();
        let next = match self.status_filter {
            StatusFilter::All => statuses.first().copied().map(StatusFilter::Only),
            StatusFilter::Only(current) => statuses
                .iter()
                .position(|s| *s == current)
                .and_then(|i| statuses.get(i + 1))
                .copied()
                .map(StatusFilter::Only),
        };
        self.set_status_filter(next.unwrap_or(StatusFilter::All), list);
        self.status_filter
    }

    /// Keep only selected ids that are still present and visible.
    pub fn on_list_changed(&mut self, list: &[T]) {
        if self.selected_ids.is_empty() {
            return;
        }
        let visible: AHashSet<T::Id> = self.visible_ids(list).into_iter().collect();
        self.selected_ids.retain(|id| visible.contains(id));
    }
}

impl Filterable for Document {
    type Id = compact_str::CompactString;
    type Status = DocumentStatus;

    fn id(&self) -> Self::Id {
        self.id.clone()
    }

    fn name(&self) -> &str {
        &self.title
    }

    fn code(&self) -> &str {
        &self.number
    }

    fn status(&self) -> Self::Status {
        self.status
    }

    fn statuses() -> &'static [Self::Status] {
        &DocumentStatus::ALL
    }

    fn status_label(status: Self::Status) -> &'static str {
        status.label()
    }
}

impl Filterable for Counterparty {
    type Id = compact_str::CompactString;
    type Status = CounterpartyStatus;

    fn id(&self) -> Self::Id {
        self.id.clone()
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn code(&self) -> &str {
        &self.inn
    }

    fn status(&self) -> Self::Status {
        self.status
    }

    fn statuses() -> &'static [Self::Status] {
        &CounterpartyStatus::ALL
    }

    fn status_label(status: Self::Status) -> &'static str {
        status.label()
    }
}

/// Invitations carry no status; the filter stays on `All`.
impl Filterable for Invitation {
    type Id = compact_str::CompactString;
    type Status = ();

    fn id(&self) -> Self::Id {
        self.id.clone()
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn code(&self) -> &str {
        &self.inn
    }

    fn status(&self) -> Self::Status {}

    fn statuses() -> &'static [Self::Status] {
        &[]
    }

    fn status_label(_status: Self::Status) -> &'static str {
        "Все"
    }
}
