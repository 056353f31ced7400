use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use std::time::Duration;

use crate::error::{BrowserError, FetchError};
use crate::model::RecipePage;
use crate::query::{Features, QueryState};

pub const DEFAULT_BASE_URL: &str = "https://dummyjson.com";
const USER_AGENT: &str = concat!("recipe-browser/", env!("CARGO_PKG_VERSION"));

/// One outbound GET, already translated from a [`QueryState`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    /// Path relative to the API base URL, e.g. `/recipes/search`
    pub path: &'static str,
    /// Query parameters in the order they are sent
    pub params: Vec<(&'static str, String)>,
}

impl FetchRequest {
    /// Translate the query into a request.
    ///
    /// Controls that are disabled in `features` contribute nothing. Empty
    /// (or whitespace only) search text means no filter and uses the plain
    /// listing endpoint.
    pub fn from_query(query: &QueryState, features: &Features, page_size: u32) -> Self {
        let mut params = Vec::new();

        let search = query.search().trim();
        let path = if features.search && !search.is_empty() {
            params.push(("q", search.to_string()));
            "/recipes/search"
        } else {
            "/recipes"
        };

        if features.pagination {
            let skip = u64::from(query.page()) * u64::from(page_size);
            params.push(("limit", page_size.to_string()));
            params.push(("skip", skip.to_string()));
        }

        if features.sort {
            params.push(("sortBy", query.sort_field().as_str().to_string()));
            params.push(("order", query.sort_order().as_str().to_string()));
        }

        FetchRequest { path, params }
    }

    /// Path plus encoded query string, for logging
    pub fn describe(&self) -> String {
        if self.params.is_empty() {
            return self.path.to_string();
        }
        let query = self
            .params
            .iter()
            .map(|(key, value)| format!("{}={}", key, value))
            .collect::<Vec<_>>()
            .join("&");
        format!("{}?{}", self.path, query)
    }
}

/// Anything that can answer a [`FetchRequest`] with a page of recipes
#[async_trait]
pub trait RecipeSource: Send + Sync {
    async fn fetch(&self, request: &FetchRequest) -> Result<RecipePage, FetchError>;
}

/// Fetches recipes from the HTTP API
#[derive(Debug, Clone)]
pub struct HttpRecipeSource {
    client: Client,
    base_url: String,
}

impl HttpRecipeSource {
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> Result<Self, BrowserError> {
        let timeout = timeout.unwrap_or(Duration::from_secs(30));
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl RecipeSource for HttpRecipeSource {
    async fn fetch(&self, request: &FetchRequest) -> Result<RecipePage, FetchError> {
        let url = format!("{}{}", self.base_url, request.path);
        debug!("GET {}{}", self.base_url, request.describe());

        let response = self
            .client
            .get(&url)
            .query(&request.params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Http {
                status: status.as_u16(),
                url: response.url().to_string(),
            });
        }

        let body = response.text().await?;
        let page: RecipePage = serde_json::from_str(&body)?;
        debug!("Received {} recipes", page.recipes.len());
        Ok(page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{SortField, SortOrder};

    fn param<'a>(request: &'a FetchRequest, key: &str) -> Option<&'a str> {
        request
            .params
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn test_plain_listing_without_features() {
        let request = FetchRequest::from_query(&QueryState::new(), &Features::none(), 10);
        assert_eq!(request.path, "/recipes");
        assert!(request.params.is_empty());
        assert_eq!(request.describe(), "/recipes");
    }

    #[test]
    fn test_search_uses_search_endpoint() {
        let mut query = QueryState::new();
        query.set_search("  pasta ");
        let request = FetchRequest::from_query(&query, &Features::all(), 10);
        assert_eq!(request.path, "/recipes/search");
        assert_eq!(param(&request, "q"), Some("pasta"));
    }

    #[test]
    fn test_blank_search_means_no_filter() {
        let mut query = QueryState::new();
        query.set_search("   ");
        let request = FetchRequest::from_query(&query, &Features::all(), 10);
        assert_eq!(request.path, "/recipes");
        assert_eq!(param(&request, "q"), None);
    }

    #[test]
    fn test_search_ignored_when_disabled() {
        let mut query = QueryState::new();
        query.set_search("pasta");
        let features = Features {
            search: false,
            ..Features::all()
        };
        let request = FetchRequest::from_query(&query, &features, 10);
        assert_eq!(request.path, "/recipes");
        assert_eq!(param(&request, "q"), None);
    }

    #[test]
    fn test_pagination_params() {
        let mut query = QueryState::new();
        query.go_to_page(3);
        let request = FetchRequest::from_query(&query, &Features::all(), 12);
        assert_eq!(param(&request, "limit"), Some("12"));
        assert_eq!(param(&request, "skip"), Some("36"));
    }

    #[test]
    fn test_sort_params() {
        let query = QueryState::new().with_sort(SortField::CaloriesPerServing, SortOrder::Desc);
        let request = FetchRequest::from_query(&query, &Features::all(), 10);
        assert_eq!(param(&request, "sortBy"), Some("caloriesPerServing"));
        assert_eq!(param(&request, "order"), Some("desc"));
    }

    #[test]
    fn test_describe_full_request() {
        let mut query = QueryState::new().with_sort(SortField::Rating, SortOrder::Desc);
        query.set_search("soup");
        query.next_page();
        let request = FetchRequest::from_query(&query, &Features::all(), 5);
        assert_eq!(
            request.describe(),
            "/recipes/search?q=soup&limit=5&skip=5&sortBy=rating&order=desc"
        );
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let source = HttpRecipeSource::with_client(Client::new(), "http://localhost:1234/");
        assert_eq!(source.base_url(), "http://localhost:1234");
    }
}
