//! Retrieval of the feature matrix page.
//!
//! One GET, one timeout, no retries. Any transport failure or non-2xx status
//! is reported as [`FeatureMatrixError::Network`] and the caller aborts the run.

use std::time::Duration;

use featurematrix_shared::{FeatureMatrixError, Result, SourceConfig};
use reqwest::Client;
use tracing::{debug, info, instrument};
use url::Url;

/// Maximum number of redirects to follow.
const MAX_REDIRECTS: usize = 5;

/// Maximum response size we consider valid (10 MB).
const MAX_RESPONSE_SIZE: u64 = 10 * 1024 * 1024;

// ---------------------------------------------------------------------------
// Fetch options
// ---------------------------------------------------------------------------

/// Configuration for the page request.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// Page to fetch.
    pub url: Url,
    /// User-Agent header value.
    pub user_agent: String,
    /// Timeout for the whole request in seconds.
    pub timeout_secs: u64,
}

impl From<&SourceConfig> for FetchOptions {
    fn from(source: &SourceConfig) -> Self {
        Self {
            url: source.url.clone(),
            user_agent: source.user_agent.clone(),
            timeout_secs: source.timeout_secs,
        }
    }
}

// ---------------------------------------------------------------------------
// Main entry point
// ---------------------------------------------------------------------------

/// Fetch the matrix page and return its body as text.
#[instrument(skip_all, fields(url = %opts.url))]
pub async fn fetch_page(opts: &FetchOptions) -> Result<String> {
    info!("fetching feature matrix");

    let client = build_client(opts)?;
    let url = opts.url.as_str();

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| FeatureMatrixError::Network(format!("{url}: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        return Err(FeatureMatrixError::Network(format!("{url}: HTTP {status}")));
    }

    if let Some(len) = response.content_length() {
        if len > MAX_RESPONSE_SIZE {
            return Err(FeatureMatrixError::Network(format!(
                "{url}: response too large ({len} bytes, max {MAX_RESPONSE_SIZE})"
            )));
        }
    }

    let body = response
        .text()
        .await
        .map_err(|e| FeatureMatrixError::Network(format!("{url}: failed to read body: {e}")))?;

    debug!(bytes = body.len(), "matrix page fetched");
    Ok(body)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Build a reqwest client with the identifying user agent and fixed timeout.
fn build_client(opts: &FetchOptions) -> Result<Client> {
    Client::builder()
        .user_agent(opts.user_agent.as_str())
        .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
        .timeout(Duration::from_secs(opts.timeout_secs))
        .build()
        .map_err(|e| FeatureMatrixError::Network(format!("failed to build HTTP client: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn opts_for(server: &MockServer, page: &str) -> FetchOptions {
        FetchOptions {
            url: Url::parse(&format!("{}{page}", server.uri())).unwrap(),
            user_agent: "featurematrix-test/1.0".into(),
            timeout_secs: 5,
        }
    }

    #[tokio::test]
    async fn test_fetch_sends_user_agent() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/about/featurematrix/"))
            .and(header("user-agent", "featurematrix-test/1.0"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>ok</html>"))
            .expect(1)
            .mount(&server)
            .await;

        let body = fetch_page(&opts_for(&server, "/about/featurematrix/"))
            .await
            .unwrap();
        assert_eq!(body, "<html>ok</html>");
    }

    #[tokio::test]
    async fn test_fetch_fixture_page() {
        let server = MockServer::start().await;
        let html = std::fs::read_to_string("../../../fixtures/html/featurematrix.html")
            .expect("read html fixture");

        Mock::given(method("GET"))
            .and(path("/about/featurematrix/"))
            .respond_with(ResponseTemplate::new(200).set_body_string(&html))
            .mount(&server)
            .await;

        let body = fetch_page(&opts_for(&server, "/about/featurematrix/"))
            .await
            .unwrap();
        assert!(body.contains("class=\"matrix\""));
    }

    #[tokio::test]
    async fn test_fetch_not_found_is_network_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/about/featurematrix/"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = fetch_page(&opts_for(&server, "/about/featurematrix/"))
            .await
            .unwrap_err();
        assert!(matches!(err, FeatureMatrixError::Network(_)));
        assert!(err.to_string().contains("404"));
    }

    #[tokio::test]
    async fn test_fetch_server_error_is_not_retried() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(&server)
            .await;

        let result = fetch_page(&opts_for(&server, "/about/featurematrix/")).await;
        assert!(result.is_err());
    }

    #[test]
    fn options_from_source_config() {
        let source = SourceConfig::default();
        let opts = FetchOptions::from(&source);
        assert_eq!(opts.timeout_secs, 30);
        assert!(opts.user_agent.starts_with("featurematrix-scraper/"));
        assert_eq!(opts.url.host_str(), Some("www.postgresql.org"));
    }
}
