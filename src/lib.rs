//! Browse recipes from a remote recipe API.
//!
//! The crate is split in two layers:
//! - the fetch adapter ([`FetchRequest`], [`RecipeSource`], [`HttpRecipeSource`])
//!   turns a [`QueryState`] into one HTTP GET and decodes the response;
//! - the browser ([`BrowserState`], [`RecipeBrowser`]) owns query, results and
//!   selection, and makes sure a late response never overwrites a newer one.
//!
//! ```no_run
//! # use recipe_browser::RecipeBrowser;
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut browser = RecipeBrowser::builder().page_size(12).build()?;
//! browser.mount();
//! browser.set_search("pasta");
//! browser.settle().await;
//! for recipe in browser.state().recipes() {
//!     println!("{}", recipe.name);
//! }
//! # Ok(())
//! # }
//! ```

pub mod browser;
pub mod builder;
pub mod config;
pub mod error;
pub mod fetch;
pub mod format;
pub mod model;
pub mod query;
pub mod state;

pub use browser::RecipeBrowser;
pub use builder::RecipeBrowserBuilder;
pub use config::{load_config, BrowserConfig};
pub use error::{BrowserError, FetchError, QueryParseError, FETCH_FAILED_MESSAGE};
pub use fetch::{FetchRequest, HttpRecipeSource, RecipeSource, DEFAULT_BASE_URL};
pub use model::{Recipe, RecipeId, RecipePage};
pub use query::{Features, QueryState, SortField, SortOrder};
pub use state::{
    BrowserSettings, BrowserState, Completion, ErrorPolicy, FetchTicket, Phase, ResultState,
};

use log::debug;

/// Fetch one page of recipes with the loaded configuration.
///
/// Convenience for callers that only need the data, not the browser state.
pub async fn fetch_recipes(query: &QueryState) -> Result<RecipePage, BrowserError> {
    let config = BrowserConfig::load()?;
    fetch_recipes_with_config(query, &config).await
}

pub async fn fetch_recipes_with_config(
    query: &QueryState,
    config: &BrowserConfig,
) -> Result<RecipePage, BrowserError> {
    let source = HttpRecipeSource::new(config.base_url.clone(), Some(config.timeout()))?;
    let request = FetchRequest::from_query(query, &config.features, config.page_size);
    debug!("Fetching {}", request.describe());
    Ok(source.fetch(&request).await?)
}
