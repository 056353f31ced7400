//! The browser state machine.
//!
//! `BrowserState` owns the query, the result of the latest applied fetch and
//! the detail selection. It never performs I/O: a fetch is started with
//! [`BrowserState::begin_fetch`], which hands out a [`FetchTicket`], and
//! finished with [`BrowserState::complete`]. Only the ticket issued last can
//! change the result; completions for older tickets are discarded.

use log::{debug, info, warn};
use serde::Deserialize;

use crate::error::FetchError;
use crate::fetch::FetchRequest;
use crate::model::{Recipe, RecipeId, RecipePage};
use crate::query::{Features, QueryState, SortField, SortOrder};

/// What happens to the displayed recipes when a fetch fails
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorPolicy {
    /// Keep showing the last successfully fetched recipes
    #[default]
    Retain,
    /// Empty the list
    Clear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
    Loaded,
    Failed,
}

/// Outcome of the latest applied fetch
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultState {
    pub recipes: Vec<Recipe>,
    pub loading: bool,
    pub error: Option<String>,
    pub total: Option<u64>,
    pub skip: Option<u64>,
    pub limit: Option<u64>,
}

impl ResultState {
    /// Position one past the last shown recipe within the whole result set
    pub fn shown_to(&self) -> u64 {
        self.skip
            .unwrap_or(0)
            .saturating_add(self.recipes.len() as u64)
    }

    /// Whether the server reports more results after this page.
    ///
    /// `None` when the response carried no `total`.
    pub fn has_more(&self) -> Option<bool> {
        let total = self.total?;
        Some(self.shown_to() < total)
    }
}

/// Handle for one issued fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub seq: u64,
    pub request: FetchRequest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied,
    /// A newer fetch was issued after this one
    Discarded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BrowserSettings {
    pub features: Features,
    pub page_size: u32,
    pub error_policy: ErrorPolicy,
}

impl Default for BrowserSettings {
    fn default() -> Self {
        BrowserSettings {
            features: Features::all(),
            page_size: 10,
            error_policy: ErrorPolicy::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BrowserState {
    settings: BrowserSettings,
    query: QueryState,
    result: ResultState,
    selection: Option<Recipe>,
    phase: Phase,
    latest_seq: u64,
}

impl BrowserState {
    pub fn new(settings: BrowserSettings) -> Self {
        Self::with_query(settings, QueryState::new())
    }

    pub fn with_query(settings: BrowserSettings, query: QueryState) -> Self {
        BrowserState {
            settings,
            query,
            result: ResultState::default(),
            selection: None,
            phase: Phase::Idle,
            latest_seq: 0,
        }
    }

    pub fn settings(&self) -> &BrowserSettings {
        &self.settings
    }

    pub fn query(&self) -> &QueryState {
        &self.query
    }

    pub fn result(&self) -> &ResultState {
        &self.result
    }

    pub fn recipes(&self) -> &[Recipe] {
        &self.result.recipes
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_loading(&self) -> bool {
        self.result.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.result.error.as_deref()
    }

    pub fn selection(&self) -> Option<&Recipe> {
        self.selection.as_ref()
    }

    pub fn selected_id(&self) -> Option<RecipeId> {
        self.selection.as_ref().map(|recipe| recipe.id)
    }

    /// Sequence number of the most recently issued fetch, 0 before the first
    pub fn latest_seq(&self) -> u64 {
        self.latest_seq
    }

    /// Enter `Loading` and issue a ticket for the current query.
    ///
    /// Clears the error of a previous failure; recipes stay until the
    /// fetch completes.
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.latest_seq += 1;
        self.phase = Phase::Loading;
        self.result.loading = true;
        self.result.error = None;

        let request =
            FetchRequest::from_query(&self.query, &self.settings.features, self.settings.page_size);
        debug!("Issuing fetch #{} for {}", self.latest_seq, request.describe());

        FetchTicket {
            seq: self.latest_seq,
            request,
        }
    }

    /// Apply the outcome of fetch `seq` unless a newer fetch has been issued.
    pub fn complete(&mut self, seq: u64, outcome: Result<RecipePage, FetchError>) -> Completion {
        if seq != self.latest_seq {
            debug!(
                "Discarding stale response #{} (latest is #{})",
                seq, self.latest_seq
            );
            return Completion::Discarded;
        }

        self.result.loading = false;
        match outcome {
            Ok(page) => {
                info!("Fetch #{} loaded {} recipes", seq, page.recipes.len());
                self.phase = Phase::Loaded;
                self.result.error = None;
                self.result.recipes = page.recipes;
                self.result.total = page.total;
                self.result.skip = page.skip;
                self.result.limit = page.limit;
            }
            Err(err) => {
                warn!("Fetch #{} failed: {}", seq, err);
                self.phase = Phase::Failed;
                self.result.error = Some(err.user_message().to_string());
                if self.settings.error_policy == ErrorPolicy::Clear {
                    self.result.recipes.clear();
                    self.result.total = None;
                    self.result.skip = None;
                    self.result.limit = None;
                }
            }
        }
        Completion::Applied
    }

    /// Returns `true` when the query changed and a fetch is due.
    pub fn set_search(&mut self, text: impl Into<String>) -> bool {
        if !self.settings.features.search {
            debug!("Search is disabled, ignoring");
            return false;
        }
        self.query.set_search(text)
    }

    pub fn set_sort(&mut self, field: SortField, order: SortOrder) -> bool {
        if !self.settings.features.sort {
            debug!("Sorting is disabled, ignoring");
            return false;
        }
        self.query.set_sort(field, order)
    }

    pub fn set_sort_field(&mut self, field: SortField) -> bool {
        self.set_sort(field, self.query.sort_order())
    }

    pub fn set_sort_order(&mut self, order: SortOrder) -> bool {
        self.set_sort(self.query.sort_field(), order)
    }

    pub fn next_page(&mut self) -> bool {
        self.settings.features.pagination && self.query.next_page()
    }

    pub fn previous_page(&mut self) -> bool {
        self.settings.features.pagination && self.query.previous_page()
    }

    pub fn go_to_page(&mut self, page: u32) -> bool {
        self.settings.features.pagination && self.query.go_to_page(page)
    }

    /// Select a recipe from the current result set for detail display.
    ///
    /// Unknown ids leave the selection untouched.
    pub fn select(&mut self, id: RecipeId) -> Option<&Recipe> {
        let recipe = self.result.recipes.iter().find(|recipe| recipe.id == id)?;
        self.selection = Some(recipe.clone());
        self.selection.as_ref()
    }

    pub fn dismiss(&mut self) {
        self.selection = None;
    }
}
