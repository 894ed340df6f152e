//! `OmdbClient` - OMDb API client implementation.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use reqwest::Client;
use tokio::sync::Mutex;
use tracing::instrument;
use url::Url;

use super::api::LocalOmdbApi;
use super::error::OmdbError;
use super::rate_limiter::RequestPacer;
use super::types::{
    MOVIE_NOT_FOUND, MovieDetails, MovieSummary, OmdbDetailsResponse, OmdbSearchResponse,
    SearchPage,
};

/// Default base URL for the OMDb API.
pub const DEFAULT_BASE_URL: &str = "https://www.omdbapi.com/";

/// Maximum number of retries for HTTP 429 responses.
const MAX_RETRIES: u32 = 3;

/// Backoff unit between retries (multiplied by the attempt number).
const RETRY_BACKOFF: Duration = Duration::from_millis(500);

/// Longest body excerpt kept in error messages.
const BODY_PREVIEW_LEN: usize = 200;

/// OMDb API client.
///
/// Cheap to clone; clones share the connection pool and the pacer.
#[derive(Debug, Clone)]
#[allow(clippy::module_name_repetitions)]
pub struct OmdbClient {
    /// HTTP client.
    http_client: Client,
    /// Endpoint URL; every request is a GET on it with query parameters.
    base_url: Url,
    /// `apikey` query parameter.
    api_key: String,
    /// Request pacer.
    pacer: Arc<Mutex<RequestPacer>>,
}

/// Builder for `OmdbClient`.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct OmdbClientBuilder {
    base_url: Option<Url>,
    api_key: Option<String>,
    user_agent: Option<String>,
    min_interval: Option<Duration>,
    timeout: Option<Duration>,
}

impl OmdbClientBuilder {
    /// Creates a new builder.
    const fn new() -> Self {
        Self {
            base_url: None,
            api_key: None,
            user_agent: None,
            min_interval: None,
            timeout: None,
        }
    }

    /// Overrides the base URL (for wiremock in tests, or a proxy).
    #[must_use]
    pub fn base_url(mut self, url: Url) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Sets the OMDb API key (required).
    #[must_use]
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the User-Agent (required).
    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Sets the minimum request interval (default: 25ms).
    #[must_use]
    pub const fn min_interval(mut self, interval: Duration) -> Self {
        self.min_interval = Some(interval);
        self
    }

    /// Sets the per-request timeout (default: none).
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// - `api_key` is not set or blank.
    /// - `user_agent` is not set.
    /// - `reqwest::Client` build fails.
    pub fn build(self) -> Result<OmdbClient> {
        let api_key = self.api_key.context("api_key is required")?;
        if api_key.trim().is_empty() {
            bail!("api_key must not be empty");
        }
        let user_agent = self.user_agent.context("user_agent is required")?;

        let base_url = if let Some(url) = self.base_url {
            url
        } else {
            let result = Url::parse(DEFAULT_BASE_URL);
            result.context("invalid default base URL")?
        };

        let pacer = self
            .min_interval
            .map_or_else(RequestPacer::default_interval, RequestPacer::new);

        let mut http_builder = Client::builder().user_agent(&user_agent).gzip(true);
        if let Some(timeout) = self.timeout {
            http_builder = http_builder.timeout(timeout);
        }
        let http_client = http_builder
            .build()
            .context("failed to build HTTP client")?;

        Ok(OmdbClient {
            http_client,
            base_url,
            api_key,
            pacer: Arc::new(Mutex::new(pacer)),
        })
    }
}

impl OmdbClient {
    /// Creates a new builder.
    #[must_use]
    pub const fn builder() -> OmdbClientBuilder {
        OmdbClientBuilder::new()
    }

    /// Sends a paced GET with the API key plus `query`, decoding the JSON body.
    /// Retries up to `MAX_RETRIES` times on HTTP 429.
    #[instrument(skip_all)]
    async fn get_json<T: serde::de::DeserializeOwned>(&self, query: &[(&str, String)]) -> Result<T> {
        let slept = self.pacer.lock().await.acquire().await;
        if !slept.is_zero() {
            tracing::trace!(slept_ms = slept.as_millis(), "paced OMDb request");
        }

        let mut retries = 0u32;
        loop {
            let request = self
                .http_client
                .get(self.base_url.clone())
                .query(&[("apikey", self.api_key.as_str())])
                .query(query)
                .build()
                .context("failed to build OMDb request")?;

            tracing::debug!(params = ?query, "OMDb API request");

            let response = match self.http_client.execute(request).await {
                Ok(response) => response,
                Err(err) => {
                    return Err(OmdbError::NetworkFailure {
                        reason: err.to_string(),
                    }
                    .into());
                }
            };

            let status = response.status();

            if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                retries = retries.saturating_add(1);
                if retries > MAX_RETRIES {
                    return Err(OmdbError::NetworkFailure {
                        reason: format!("rate limit exceeded after {MAX_RETRIES} retries"),
                    }
                    .into());
                }
                tracing::warn!(
                    retry = retries,
                    max_retries = MAX_RETRIES,
                    "OMDb API rate limited (429). Retrying..."
                );
                tokio::time::sleep(RETRY_BACKOFF.saturating_mul(retries)).await;
                self.pacer.lock().await.acquire().await;
                continue;
            }

            let body = match response.text().await {
                Ok(body) => body,
                Err(err) => {
                    return Err(OmdbError::NetworkFailure {
                        reason: format!("failed to read response body: {err}"),
                    }
                    .into());
                }
            };

            if !status.is_success() {
                let preview: String = body.chars().take(BODY_PREVIEW_LEN).collect();
                return Err(OmdbError::NetworkFailure {
                    reason: format!("HTTP {status}: {preview}"),
                }
                .into());
            }

            return serde_json::from_str(&body).map_err(|err| {
                OmdbError::Decode {
                    reason: err.to_string(),
                }
                .into()
            });
        }
    }
}

impl LocalOmdbApi for OmdbClient {
    #[instrument(skip(self))]
    async fn search_by_title(&self, query: &str, page: u32) -> Result<SearchPage> {
        let params = [("s", String::from(query)), ("page", page.to_string())];
        let response: OmdbSearchResponse = self.get_json(&params).await?;

        if !response.is_success() {
            let message = response.error.unwrap_or_default();
            if message == MOVIE_NOT_FOUND {
                tracing::debug!(page, "OMDb search page is empty");
                return Ok(SearchPage::default());
            }
            return Err(OmdbError::Api { message }.into());
        }

        let total_results = response.total_results();
        let items = response
            .search
            .into_iter()
            .map(MovieSummary::from)
            .collect::<Vec<_>>();

        tracing::debug!(page, fetched = items.len(), total_results, "OMDb search page");
        Ok(SearchPage {
            items,
            total_results,
        })
    }

    #[instrument(skip(self))]
    async fn movie_details(&self, id: &str) -> Result<MovieDetails> {
        let params = [("i", String::from(id)), ("plot", String::from("full"))];
        let response: OmdbDetailsResponse = self.get_json(&params).await?;

        if !response.is_success() {
            tracing::debug!(error = ?response.error, "OMDb details lookup missed");
            return Err(OmdbError::NotFound {
                id: String::from(id),
            }
            .into());
        }

        Ok(MovieDetails::from_response(response, id))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]

    use wiremock::matchers::{method, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn client_for(server: &MockServer) -> OmdbClient {
        OmdbClient::builder()
            .base_url(format!("{}/", server.uri()).parse().unwrap())
            .api_key("test-key")
            .user_agent("test/0.0.0")
            .min_interval(Duration::from_millis(0))
            .build()
            .unwrap()
    }

    #[test]
    fn test_builder_requires_api_key() {
        // Arrange & Act
        let result = OmdbClient::builder().user_agent("test/0.0.0").build();

        // Assert
        assert!(result.unwrap_err().to_string().contains("api_key is required"));
    }

    #[test]
    fn test_builder_rejects_blank_api_key() {
        // Arrange & Act
        let result = OmdbClient::builder()
            .api_key("  ")
            .user_agent("test/0.0.0")
            .build();

        // Assert
        assert!(result.unwrap_err().to_string().contains("must not be empty"));
    }

    #[test]
    fn test_builder_requires_user_agent() {
        // Arrange & Act
        let result = OmdbClient::builder().api_key("test-key").build();

        // Assert
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("user_agent is required")
        );
    }

    #[test]
    fn test_builder_defaults_base_url() {
        // Arrange & Act
        let client = OmdbClient::builder()
            .api_key("test-key")
            .user_agent("test/0.0.0")
            .build()
            .unwrap();

        // Assert
        assert_eq!(client.base_url.as_str(), DEFAULT_BASE_URL);
    }

    #[tokio::test]
    async fn test_search_sends_key_query_and_page() {
        // Arrange
        let server = MockServer::start().await;
        let body = include_str!("../../../../fixtures/omdb/search_batman_page1.json");
        Mock::given(method("GET"))
            .and(query_param("apikey", "test-key"))
            .and(query_param("s", "batman"))
            .and(query_param("page", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .expect(1)
            .mount(&server)
            .await;
        let client = client_for(&server);

        // Act
        let page = client.search_by_title("batman", 1).await.unwrap();

        // Assert
        assert_eq!(page.items.len(), 10);
        assert_eq!(page.total_results, 47);
        assert_eq!(page.items[0].title, "Batman Begins");
        assert_eq!(page.items[3].poster, None);
    }

    #[tokio::test]
    async fn test_search_not_found_is_empty_page() {
        // Arrange
        let server = MockServer::start().await;
        let body = include_str!("../../../../fixtures/omdb/search_not_found.json");
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(&server)
            .await;
        let client = client_for(&server);

        // Act
        let page = client.search_by_title("zzzzqx", 1).await.unwrap();

        // Assert
        assert_eq!(page, SearchPage::default());
    }

    #[tokio::test]
    async fn test_search_other_false_response_is_api_error() {
        // Arrange
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"{"Response":"False","Error":"Too many results."}"#),
            )
            .mount(&server)
            .await;
        let client = client_for(&server);

        // Act
        let err = client.search_by_title("a", 1).await.unwrap_err();

        // Assert
        assert_eq!(
            OmdbError::find(&err),
            Some(&OmdbError::Api {
                message: String::from("Too many results.")
            })
        );
    }

    #[tokio::test]
    async fn test_http_error_is_network_failure() {
        // Arrange
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(401)
                    .set_body_string(r#"{"Response":"False","Error":"Invalid API key!"}"#),
            )
            .mount(&server)
            .await;
        let client = client_for(&server);

        // Act
        let err = client.search_by_title("batman", 1).await.unwrap_err();

        // Assert
        let omdb = OmdbError::find(&err).unwrap();
        assert!(matches!(omdb, OmdbError::NetworkFailure { .. }));
        assert!(err.to_string().contains("Invalid API key"));
    }

    #[tokio::test]
    async fn test_malformed_body_is_decode_error() {
        // Arrange
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;
        let client = client_for(&server);

        // Act
        let err = client.search_by_title("batman", 1).await.unwrap_err();

        // Assert
        assert!(matches!(
            OmdbError::find(&err),
            Some(OmdbError::Decode { .. })
        ));
    }

    #[tokio::test]
    async fn test_http_429_retries_then_fails() {
        // Arrange
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(429))
            .expect(u64::from(MAX_RETRIES) + 1)
            .mount(&server)
            .await;
        let client = client_for(&server);

        // Act
        let err = client.search_by_title("batman", 1).await.unwrap_err();

        // Assert
        assert!(err.to_string().contains("rate limit"));
    }

    #[tokio::test]
    async fn test_details_requests_full_plot() {
        // Arrange
        let server = MockServer::start().await;
        let body = include_str!("../../../../fixtures/omdb/details_tt0111161.json");
        Mock::given(method("GET"))
            .and(query_param("i", "tt0111161"))
            .and(query_param("plot", "full"))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .expect(1)
            .mount(&server)
            .await;
        let client = client_for(&server);

        // Act
        let details = client.movie_details("tt0111161").await.unwrap();

        // Assert
        assert_eq!(details.summary.id, "tt0111161");
        assert_eq!(details.director.as_deref(), Some("Frank Darabont"));
    }

    #[tokio::test]
    async fn test_details_false_response_is_not_found() {
        // Arrange
        let server = MockServer::start().await;
        let body = include_str!("../../../../fixtures/omdb/details_not_found.json");
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(&server)
            .await;
        let client = client_for(&server);

        // Act
        let err = client.movie_details("tt0000000").await.unwrap_err();

        // Assert
        assert!(OmdbError::find(&err).unwrap().is_not_found());
    }

    #[tokio::test]
    async fn test_unreachable_server_is_network_failure() {
        // Arrange
        let client = OmdbClient::builder()
            .base_url("http://127.0.0.1:9/".parse().unwrap())
            .api_key("test-key")
            .user_agent("test/0.0.0")
            .timeout(Duration::from_secs(2))
            .build()
            .unwrap();

        // Act
        let err = client.movie_details("tt0111161").await.unwrap_err();

        // Assert
        assert!(matches!(
            OmdbError::find(&err),
            Some(OmdbError::NetworkFailure { .. })
        ));
    }

    #[tokio::test]
    async fn test_ui_page_over_http_merges_three_external_pages() {
        // Arrange
        let server = MockServer::start().await;
        let pages = [
            include_str!("../../../../fixtures/omdb/search_batman_page1.json"),
            include_str!("../../../../fixtures/omdb/search_batman_page2.json"),
            include_str!("../../../../fixtures/omdb/search_batman_page3.json"),
        ];
        for (n, body) in (1..=3).zip(pages) {
            Mock::given(method("GET"))
                .and(query_param("s", "batman"))
                .and(query_param("page", n.to_string()))
                .respond_with(ResponseTemplate::new(200).set_body_string(body))
                .expect(1)
                .mount(&server)
                .await;
        }
        let client = client_for(&server);

        // Act
        let page = crate::omdb::fetch_ui_page(&client, "batman", 1)
            .await
            .unwrap();

        // Assert
        assert_eq!(page.items.len(), 15);
        assert_eq!(page.total_results, 47);
        assert_eq!(page.items[0].id, "tt0372784");
        assert_eq!(page.items[10].id, "tt2313197");
    }

    #[tokio::test]
    async fn test_details_for_two_ids() {
        // Arrange
        let server = MockServer::start().await;
        for (id, body) in [
            (
                "tt0111161",
                include_str!("../../../../fixtures/omdb/details_tt0111161.json"),
            ),
            (
                "tt0068646",
                include_str!("../../../../fixtures/omdb/details_tt0068646.json"),
            ),
        ] {
            Mock::given(method("GET"))
                .and(query_param("i", id))
                .respond_with(ResponseTemplate::new(200).set_body_string(body))
                .mount(&server)
                .await;
        }
        let client = client_for(&server);

        // Act
        let godfather = client.movie_details("tt0068646").await.unwrap();
        let shawshank = client.movie_details("tt0111161").await.unwrap();

        // Assert
        assert_eq!(godfather.summary.title, "The Godfather");
        assert_eq!(godfather.runtime.as_deref(), Some("175 min"));
        assert_eq!(godfather.genres, vec!["Crime", "Drama"]);
        assert_eq!(shawshank.summary.id, "tt0111161");
    }
}
