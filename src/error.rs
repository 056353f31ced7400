use thiserror::Error;

/// Message shown to the user whenever a fetch fails, whatever the cause.
pub const FETCH_FAILED_MESSAGE: &str = "Failed to load recipes. Please try again later.";

/// Errors that can occur while fetching a page of recipes
#[derive(Error, Debug)]
pub enum FetchError {
    /// Connectivity problem, timeout or request that could not be sent
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The API answered with a non-success status
    #[error("HTTP {status} from {url}")]
    Http { status: u16, url: String },

    /// The response body was not the expected JSON
    #[error("Malformed response body: {0}")]
    Parse(#[from] serde_json::Error),

    /// The fetch task panicked before producing a response
    #[error("Fetch task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl FetchError {
    /// The user facing message for this failure.
    ///
    /// All failure kinds collapse into the same generic message; the
    /// detailed error is only meant for logs.
    pub fn user_message(&self) -> &'static str {
        FETCH_FAILED_MESSAGE
    }
}

/// Errors that can occur while setting up or driving a recipe browser
#[derive(Error, Debug)]
pub enum BrowserError {
    /// A fetch failed
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Failed to build the HTTP client
    #[error("Failed to create HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(#[from] config::ConfigError),

    /// Builder configuration error
    #[error("Builder error: {0}")]
    BuilderError(String),
}

/// Errors produced when parsing sort options from user input
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryParseError {
    #[error("Unknown sort field '{0}'")]
    UnknownSortField(String),

    #[error("Unknown sort order '{0}' (expected 'asc' or 'desc')")]
    UnknownSortOrder(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_fetch_errors_share_user_message() {
        let http = FetchError::Http {
            status: 500,
            url: "https://dummyjson.com/recipes".to_string(),
        };
        let parse = FetchError::Parse(serde_json::from_str::<u32>("not json").unwrap_err());

        assert_eq!(http.user_message(), FETCH_FAILED_MESSAGE);
        assert_eq!(parse.user_message(), FETCH_FAILED_MESSAGE);
    }

    #[test]
    fn test_http_error_display() {
        let err = FetchError::Http {
            status: 404,
            url: "http://localhost/recipes".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP 404 from http://localhost/recipes");
    }

    #[test]
    fn test_browser_error_is_transparent_over_fetch() {
        let err: BrowserError = FetchError::Http {
            status: 503,
            url: "u".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "HTTP 503 from u");
    }
}
