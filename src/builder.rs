use std::sync::Arc;
use std::time::Duration;

use crate::browser::RecipeBrowser;
use crate::config::BrowserConfig;
use crate::error::BrowserError;
use crate::fetch::{HttpRecipeSource, RecipeSource, DEFAULT_BASE_URL};
use crate::query::{Features, QueryState, SortField, SortOrder};
use crate::state::{BrowserSettings, ErrorPolicy};

/// Builder for configuring a [`RecipeBrowser`]
#[derive(Default)]
pub struct RecipeBrowserBuilder {
    base_url: Option<String>,
    timeout: Option<Duration>,
    page_size: Option<u32>,
    features: Option<Features>,
    error_policy: Option<ErrorPolicy>,
    sort: Option<(SortField, SortOrder)>,
    search: Option<String>,
    page: u32,
    source: Option<Arc<dyn RecipeSource>>,
}

impl RecipeBrowserBuilder {
    /// Start from a loaded configuration.
    ///
    /// Values set on the builder afterwards take precedence.
    ///
    /// # Example
    /// ```
    /// use recipe_browser::{BrowserConfig, RecipeBrowser};
    ///
    /// let builder = RecipeBrowser::builder()
    ///     .config(&BrowserConfig::default())
    ///     .page_size(20);
    /// ```
    pub fn config(mut self, config: &BrowserConfig) -> Self {
        self.base_url = Some(config.base_url.clone());
        self.timeout = Some(config.timeout());
        self.page_size = Some(config.page_size);
        self.features = Some(config.features);
        self.error_policy = Some(config.on_error);
        self.sort = Some((config.default_sort, config.default_order));
        self
    }

    /// Set the base URL of the recipe API
    ///
    /// # Example
    /// ```
    /// use recipe_browser::RecipeBrowser;
    ///
    /// let builder = RecipeBrowser::builder()
    ///     .base_url("http://localhost:8080");
    /// ```
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set a timeout for HTTP requests
    pub fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = Some(duration);
        self
    }

    /// Number of recipes requested per page
    pub fn page_size(mut self, size: u32) -> Self {
        self.page_size = Some(size);
        self
    }

    pub fn features(mut self, features: Features) -> Self {
        self.features = Some(features);
        self
    }

    pub fn search(mut self, enabled: bool) -> Self {
        self.features.get_or_insert_with(Features::default).search = enabled;
        self
    }

    pub fn sort(mut self, enabled: bool) -> Self {
        self.features.get_or_insert_with(Features::default).sort = enabled;
        self
    }

    pub fn pagination(mut self, enabled: bool) -> Self {
        self.features.get_or_insert_with(Features::default).pagination = enabled;
        self
    }

    pub fn error_policy(mut self, policy: ErrorPolicy) -> Self {
        self.error_policy = Some(policy);
        self
    }

    /// Initial sort field and order
    pub fn initial_sort(mut self, field: SortField, order: SortOrder) -> Self {
        self.sort = Some((field, order));
        self
    }

    /// Search text for the first fetch
    pub fn initial_search(mut self, text: impl Into<String>) -> Self {
        self.search = Some(text.into());
        self
    }

    /// Zero-based page index for the first fetch
    pub fn initial_page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    /// Use a custom recipe source instead of the HTTP API.
    ///
    /// `base_url` and `timeout` are ignored when a source is given.
    pub fn source(mut self, source: Arc<dyn RecipeSource>) -> Self {
        self.source = Some(source);
        self
    }

    /// Build the browser
    ///
    /// The browser starts `Idle`; call [`RecipeBrowser::mount`] to issue the
    /// first fetch.
    ///
    /// # Errors
    /// Returns `BrowserError` if:
    /// - the page size is zero
    /// - the base URL is empty
    /// - the HTTP client cannot be created
    pub fn build(self) -> Result<RecipeBrowser, BrowserError> {
        let page_size = self.page_size.unwrap_or(10);
        if page_size == 0 {
            return Err(BrowserError::BuilderError(
                "Page size must be greater than zero".to_string(),
            ));
        }

        let source: Arc<dyn RecipeSource> = match self.source {
            Some(source) => source,
            None => {
                let base_url = self
                    .base_url
                    .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
                if base_url.trim().is_empty() {
                    return Err(BrowserError::BuilderError(
                        "Base URL cannot be empty".to_string(),
                    ));
                }
                Arc::new(HttpRecipeSource::new(base_url, self.timeout)?)
            }
        };

        let settings = BrowserSettings {
            features: self.features.unwrap_or_default(),
            page_size,
            error_policy: self.error_policy.unwrap_or_default(),
        };

        let (field, order) = self.sort.unwrap_or_default();
        let mut query = QueryState::new().with_sort(field, order);
        if settings.features.search {
            if let Some(search) = self.search {
                query = query.with_search(search);
            }
        }
        if settings.features.pagination {
            query = query.with_page(self.page);
        }

        Ok(RecipeBrowser::with_query(source, settings, query))
    }
}
