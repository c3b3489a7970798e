//! HTTP client with a politeness delay and a single retry.

use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::ScmResult;

/// HTTP client used for every remote call.
///
/// Requests made through [`PoliteClient::get_text`] and
/// [`PoliteClient::get_json`] wait a fixed delay first, retry once after the
/// same delay, and give up with `None` so a single bad fetch never aborts a run.
#[derive(Debug, Clone)]
pub struct PoliteClient {
    client: reqwest::Client,
    delay: Duration,
}

impl PoliteClient {
    /// Creates a new client waiting `delay` before every polite request.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(delay: Duration) -> ScmResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()?;

        Ok(Self { client, delay })
    }

    /// Fetches a URL once, without delay or retry.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a non-success status.
    pub async fn fetch(&self, url: &str) -> ScmResult<String> {
        debug!(url, "GET");
        let response = self.client.get(url).send().await?.error_for_status()?;
        Ok(response.text().await?)
    }

    /// Fetches a URL after the politeness delay, retrying once.
    ///
    /// Returns `None` if both attempts fail.
    pub async fn get_text(&self, url: &str) -> Option<String> {
        tokio::time::sleep(self.delay).await;
        match self.fetch(url).await {
            Ok(body) => Some(body),
            Err(err) => {
                tokio::time::sleep(self.delay).await;
                warn!(url, error = %err, "request failed, retrying");
                match self.fetch(url).await {
                    Ok(body) => Some(body),
                    Err(err) => {
                        warn!(url, error = %err, "request failed again, giving up");
                        None
                    }
                }
            }
        }
    }

    /// Fetches and decodes JSON, see [`PoliteClient::get_text`].
    ///
    /// Returns `None` if the fetch fails twice or the payload does not decode.
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Option<T> {
        let body = self.get_text(url).await?;
        match serde_json::from_str(&body) {
            Ok(value) => Some(value),
            Err(err) => {
                warn!(url, error = %err, "unexpected JSON payload");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client() -> PoliteClient {
        PoliteClient::new(Duration::ZERO).unwrap()
    }

    #[tokio::test]
    async fn test_get_text_success() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/hello"))
            .respond_with(ResponseTemplate::new(200).set_body_string("world"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let body = client()
            .get_text(&format!("{}/hello", mock_server.uri()))
            .await;
        assert_eq!(body.as_deref(), Some("world"));
    }

    #[tokio::test]
    async fn test_get_text_retries_once_then_succeeds() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/flaky"))
            .respond_with(ResponseTemplate::new(502))
            .up_to_n_times(1)
            .expect(1)
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/flaky"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let body = client()
            .get_text(&format!("{}/flaky", mock_server.uri()))
            .await;
        assert_eq!(body.as_deref(), Some("ok"));
    }

    #[tokio::test]
    async fn test_get_text_gives_up_after_two_failures() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/down"))
            .respond_with(ResponseTemplate::new(500))
            .expect(2)
            .mount(&mock_server)
            .await;

        let body = client()
            .get_text(&format!("{}/down", mock_server.uri()))
            .await;
        assert!(body.is_none());
    }

    #[tokio::test]
    async fn test_get_json_malformed_is_none() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/json"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&mock_server)
            .await;

        let value: Option<Vec<u32>> = client()
            .get_json(&format!("{}/json", mock_server.uri()))
            .await;
        assert!(value.is_none());
    }

    #[tokio::test]
    async fn test_fetch_reports_status_error() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let result = client()
            .fetch(&format!("{}/missing", mock_server.uri()))
            .await;
        assert!(result.is_err());
    }
}
