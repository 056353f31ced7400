use log::debug;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};

use crate::builder::RecipeBrowserBuilder;
use crate::error::FetchError;
use crate::fetch::RecipeSource;
use crate::model::{Recipe, RecipeId, RecipePage};
use crate::query::{QueryState, SortField, SortOrder};
use crate::state::{BrowserSettings, BrowserState, Completion};

/// A finished fetch on its way back to the browser
#[derive(Debug)]
struct FetchDone {
    seq: u64,
    outcome: Result<RecipePage, FetchError>,
}

/// Drives a [`BrowserState`] against a [`RecipeSource`].
///
/// Every user action that changes the query spawns exactly one fetch task on
/// the current tokio runtime. Finished fetches come back through a channel
/// and are applied in [`RecipeBrowser::next_completion`], so the state is
/// only ever mutated by the owner of the browser. Actions that leave the
/// query unchanged do not fetch.
///
/// # Panics
///
/// [`mount`](Self::mount), [`refresh`](Self::refresh) and every mutator that
/// changes the query spawn onto the current tokio runtime and panic when
/// called outside of one.
pub struct RecipeBrowser {
    state: BrowserState,
    source: Arc<dyn RecipeSource>,
    done_tx: mpsc::UnboundedSender<FetchDone>,
    done_rx: mpsc::UnboundedReceiver<FetchDone>,
    snapshots: watch::Sender<BrowserState>,
}

impl RecipeBrowser {
    /// Creates a new builder for a recipe browser
    pub fn builder() -> RecipeBrowserBuilder {
        RecipeBrowserBuilder::default()
    }

    pub fn new(source: Arc<dyn RecipeSource>, settings: BrowserSettings) -> Self {
        Self::with_query(source, settings, QueryState::new())
    }

    pub fn with_query(
        source: Arc<dyn RecipeSource>,
        settings: BrowserSettings,
        query: QueryState,
    ) -> Self {
        let state = BrowserState::with_query(settings, query);
        let (done_tx, done_rx) = mpsc::unbounded_channel();
        let (snapshots, _) = watch::channel(state.clone());
        RecipeBrowser {
            state,
            source,
            done_tx,
            done_rx,
            snapshots,
        }
    }

    /// Read-only view of the current state
    pub fn state(&self) -> &BrowserState {
        &self.state
    }

    /// Receives a snapshot of the state after every transition
    pub fn subscribe(&self) -> watch::Receiver<BrowserState> {
        self.snapshots.subscribe()
    }

    /// Initial fetch
    ///
    /// # Panics
    ///
    /// Panics when called outside of a tokio runtime.
    pub fn mount(&mut self) {
        self.dispatch();
    }

    /// Fetch again with the current query
    pub fn refresh(&mut self) {
        self.dispatch();
    }

    pub fn set_search(&mut self, text: impl Into<String>) -> bool {
        let changed = self.state.set_search(text);
        self.fetch_if(changed)
    }

    pub fn set_sort(&mut self, field: SortField, order: SortOrder) -> bool {
        let changed = self.state.set_sort(field, order);
        self.fetch_if(changed)
    }

    pub fn set_sort_field(&mut self, field: SortField) -> bool {
        let changed = self.state.set_sort_field(field);
        self.fetch_if(changed)
    }

    pub fn set_sort_order(&mut self, order: SortOrder) -> bool {
        let changed = self.state.set_sort_order(order);
        self.fetch_if(changed)
    }

    pub fn next_page(&mut self) -> bool {
        let changed = self.state.next_page();
        self.fetch_if(changed)
    }

    pub fn previous_page(&mut self) -> bool {
        let changed = self.state.previous_page();
        self.fetch_if(changed)
    }

    pub fn go_to_page(&mut self, page: u32) -> bool {
        let changed = self.state.go_to_page(page);
        self.fetch_if(changed)
    }

    pub fn select(&mut self, id: RecipeId) -> Option<&Recipe> {
        if self.state.select(id).is_none() {
            debug!("Recipe {} is not in the current results", id);
            return None;
        }
        self.publish();
        self.state.selection()
    }

    pub fn dismiss(&mut self) {
        self.state.dismiss();
        self.publish();
    }

    /// Wait for the next finished fetch and apply it, or discard it if it
    /// has been superseded.
    pub async fn next_completion(&mut self) -> Completion {
        // The browser keeps a sender alive, so the channel never closes.
        let done = match self.done_rx.recv().await {
            Some(done) => done,
            None => return Completion::Discarded,
        };
        let completion = self.state.complete(done.seq, done.outcome);
        if completion == Completion::Applied {
            self.publish();
        }
        completion
    }

    /// Process finished fetches until the latest one has been applied.
    pub async fn settle(&mut self) {
        while self.state.is_loading() {
            self.next_completion().await;
        }
    }

    fn fetch_if(&mut self, changed: bool) -> bool {
        if changed {
            self.dispatch();
        }
        changed
    }

    fn dispatch(&mut self) {
        let ticket = self.state.begin_fetch();
        self.publish();

        let source = Arc::clone(&self.source);
        let done_tx = self.done_tx.clone();
        let request = ticket.request;
        tokio::spawn(async move {
            // A panicking source still has to end `Loading`.
            let outcome = tokio::spawn(async move { source.fetch(&request).await })
                .await
                .unwrap_or_else(|err| Err(FetchError::from(err)));
            // Fails only when the browser has been dropped.
            let _ = done_tx.send(FetchDone {
                seq: ticket.seq,
                outcome,
            });
        });
    }

    fn publish(&self) {
        self.snapshots.send_replace(self.state.clone());
    }
}
