//! Fetch-state machine for the article list view.
//!
//! # Responsibility
//! - Hold the filter inputs and the last committed article/category lists.
//! - Number every issued fetch and decide whether a settled fetch commits.
//!
//! # Invariants
//! - Sequence numbers are strictly increasing per state instance.
//! - A settled fetch commits only when its sequence number is the highest
//!   issued so far. Older results are dropped without touching the view.
//! - A failed fetch never clears committed data.
//! - `is_loading` is true exactly while the latest-issued fetch is
//!   outstanding, plus the initial window before the first fetch settles.

use crate::error::TransportError;
use inkwell_core::{ArticleFilter, ArticleWithDetails, Category};

/// Category selector value meaning "no category filter".
pub const ALL_CATEGORIES: &str = "all";

/// Lifecycle of the list with respect to outstanding fetches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchPhase {
    /// Nothing committed and nothing in flight.
    Idle,
    /// One fetch in flight.
    Loading,
    /// Last fetch settled; the view shows its results.
    Loaded,
    /// A fetch is in flight but filters changed again after it was issued.
    LoadingStale,
}

/// Snapshot of the list as a UI would render it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleListView {
    pub articles: Vec<ArticleWithDetails>,
    pub categories: Vec<Category>,
    pub is_loading: bool,
    pub search_text: String,
    /// Selected category name, or [`ALL_CATEGORIES`].
    pub selected_category: String,
    pub phase: FetchPhase,
}

/// One issued fetch: its sequence number and the filter it must run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub seq: u64,
    pub filter: ArticleFilter,
}

/// Data delivered by a successful fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchPayload {
    pub articles: Vec<ArticleWithDetails>,
    pub categories: Vec<Category>,
}

/// What [`ArticleListState::settle`] did with a result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettleOutcome {
    Committed,
    /// Latest fetch failed; committed data was kept.
    Failed(TransportError),
    /// A newer fetch was issued after this one; result dropped.
    Superseded,
}

#[derive(Debug, Clone)]
pub struct ArticleListState {
    view: ArticleListView,
    latest_seq: u64,
    has_committed: bool,
}

impl Default for ArticleListState {
    fn default() -> Self {
        Self::new()
    }
}

impl ArticleListState {
    pub fn new() -> Self {
        Self {
            view: ArticleListView {
                articles: Vec::new(),
                categories: Vec::new(),
                is_loading: true,
                search_text: String::new(),
                selected_category: ALL_CATEGORIES.to_string(),
                phase: FetchPhase::Idle,
            },
            latest_seq: 0,
            has_committed: false,
        }
    }

    pub fn view(&self) -> &ArticleListView {
        &self.view
    }

    /// Highest sequence number issued so far (0 before the first fetch).
    pub fn latest_seq(&self) -> u64 {
        self.latest_seq
    }

    /// Updates the search text. Issuing the fetch is the caller's decision.
    pub fn set_search_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        if text != self.view.search_text {
            self.view.search_text = text;
            self.mark_stale();
        }
    }

    /// Updates the selected category; blank input selects all categories.
    pub fn select_category(&mut self, name: impl Into<String>) {
        let name = name.into();
        let name = if name.trim().is_empty() {
            ALL_CATEGORIES.to_string()
        } else {
            name
        };
        if name != self.view.selected_category {
            self.view.selected_category = name;
            self.mark_stale();
        }
    }

    /// An outstanding fetch no longer matches the inputs once they change.
    fn mark_stale(&mut self) {
        if self.view.phase == FetchPhase::Loading {
            self.view.phase = FetchPhase::LoadingStale;
        }
    }

    /// Filter matching the current inputs.
    pub fn current_filter(&self) -> ArticleFilter {
        let mut filter = ArticleFilter::new().with_search(self.view.search_text.as_str());
        if self.view.selected_category != ALL_CATEGORIES {
            filter = filter.with_category(self.view.selected_category.as_str());
        }
        filter
    }

    /// Issues a new fetch for the current inputs and supersedes any
    /// outstanding one.
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.latest_seq += 1;
        self.view.phase = match self.view.phase {
            FetchPhase::Idle | FetchPhase::Loaded => FetchPhase::Loading,
            FetchPhase::Loading | FetchPhase::LoadingStale => FetchPhase::LoadingStale,
        };
        self.view.is_loading = true;
        FetchTicket {
            seq: self.latest_seq,
            filter: self.current_filter(),
        }
    }

    /// Applies the result of fetch `seq`.
    pub fn settle(
        &mut self,
        seq: u64,
        result: Result<FetchPayload, TransportError>,
    ) -> SettleOutcome {
        if seq != self.latest_seq {
            return SettleOutcome::Superseded;
        }

        self.view.is_loading = false;
        match result {
            Ok(payload) => {
                self.view.articles = payload.articles;
                self.view.categories = payload.categories;
                self.view.phase = FetchPhase::Loaded;
                self.has_committed = true;
                SettleOutcome::Committed
            }
            Err(err) => {
                self.view.phase = if self.has_committed {
                    FetchPhase::Loaded
                } else {
                    FetchPhase::Idle
                };
                SettleOutcome::Failed(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(name: &str) -> Category {
        Category {
            id: Default::default(),
            name: name.to_string(),
            description: None,
        }
    }

    fn payload(category_names: &[&str]) -> FetchPayload {
        FetchPayload {
            articles: Vec::new(),
            categories: category_names.iter().map(|name| category(name)).collect(),
        }
    }

    #[test]
    fn initial_state_is_idle_but_loading() {
        let state = ArticleListState::new();
        assert_eq!(state.view().phase, FetchPhase::Idle);
        assert!(state.view().is_loading);
        assert_eq!(state.view().selected_category, ALL_CATEGORIES);
        assert_eq!(state.latest_seq(), 0);
    }

    #[test]
    fn sequence_numbers_strictly_increase() {
        let mut state = ArticleListState::new();
        let first = state.begin_fetch();
        let second = state.begin_fetch();
        assert!(second.seq > first.seq);
    }

    #[test]
    fn fast_later_fetch_wins_over_slow_earlier_fetch() {
        let mut state = ArticleListState::new();
        state.set_search_text("ml");
        let a = state.begin_fetch();
        assert_eq!(state.view().phase, FetchPhase::Loading);
        state.set_search_text("nlp");
        let b = state.begin_fetch();
        assert_eq!(state.view().phase, FetchPhase::LoadingStale);
        assert_eq!(b.filter.search.as_deref(), Some("nlp"));

        assert_eq!(state.settle(b.seq, Ok(payload(&["b"]))), SettleOutcome::Committed);
        assert!(!state.view().is_loading);
        assert_eq!(state.view().phase, FetchPhase::Loaded);

        assert_eq!(state.settle(a.seq, Ok(payload(&["a"]))), SettleOutcome::Superseded);
        assert_eq!(state.view().categories[0].name, "b");
        assert!(!state.view().is_loading);
    }

    #[test]
    fn superseded_settle_keeps_loading_flag() {
        let mut state = ArticleListState::new();
        let a = state.begin_fetch();
        let _b = state.begin_fetch();
        assert_eq!(state.settle(a.seq, Ok(payload(&["a"]))), SettleOutcome::Superseded);
        assert!(state.view().is_loading);
        assert_eq!(state.view().phase, FetchPhase::LoadingStale);
        assert!(state.view().categories.is_empty());
    }

    #[test]
    fn failure_keeps_last_good_data() {
        let mut state = ArticleListState::new();
        let first = state.begin_fetch();
        state.settle(first.seq, Ok(payload(&["kept"])));

        let second = state.begin_fetch();
        let outcome = state.settle(second.seq, Err(TransportError::Timeout));
        assert_eq!(outcome, SettleOutcome::Failed(TransportError::Timeout));
        assert_eq!(state.view().categories[0].name, "kept");
        assert!(!state.view().is_loading);
        assert_eq!(state.view().phase, FetchPhase::Loaded);
    }

    #[test]
    fn failure_before_any_commit_returns_to_idle() {
        let mut state = ArticleListState::new();
        let ticket = state.begin_fetch();
        state.settle(ticket.seq, Err(TransportError::Request("refused".into())));
        assert_eq!(state.view().phase, FetchPhase::Idle);
        assert!(!state.view().is_loading);
    }

    #[test]
    fn filter_reflects_category_selection() {
        let mut state = ArticleListState::new();
        assert_eq!(state.current_filter().category, None);

        state.select_category("Machine Learning");
        state.set_search_text("  neural ");
        let filter = state.current_filter();
        assert_eq!(filter.category.as_deref(), Some("Machine Learning"));
        assert_eq!(filter.search.as_deref(), Some("  neural "));

        state.select_category(" ");
        assert_eq!(state.view().selected_category, ALL_CATEGORIES);
        assert_eq!(state.current_filter().category, None);
    }

    #[test]
    fn changing_inputs_during_fetch_marks_phase_stale() {
        let mut state = ArticleListState::new();
        state.begin_fetch();
        assert_eq!(state.view().phase, FetchPhase::Loading);

        state.set_search_text("");
        state.select_category("all");
        assert_eq!(state.view().phase, FetchPhase::Loading);

        state.set_search_text("ml");
        assert_eq!(state.view().phase, FetchPhase::LoadingStale);
        assert!(state.view().is_loading);
    }

    #[test]
    fn category_change_during_fetch_marks_phase_stale() {
        let mut state = ArticleListState::new();
        state.begin_fetch();
        state.select_category("Machine Learning");
        assert_eq!(state.view().phase, FetchPhase::LoadingStale);
    }

    #[test]
    fn changing_inputs_while_settled_keeps_phase() {
        let mut state = ArticleListState::new();
        let ticket = state.begin_fetch();
        state.settle(ticket.seq, Ok(payload(&["a"])));
        state.set_search_text("ml");
        assert_eq!(state.view().phase, FetchPhase::Loaded);
    }
}
