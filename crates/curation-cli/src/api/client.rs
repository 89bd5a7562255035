//! Authenticated HTTP plumbing shared by the Google API clients
//!
//! Wraps a `reqwest::Client` with the bearer token and turns non-2xx
//! responses into [`CliError::Api`] with the message from Google's error
//! envelope.

use crate::api::types::ErrorResponse;
use crate::config::Config;
use crate::error::{CliError, Result};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

/// HTTP client carrying credentials for every request
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    access_token: String,
}

impl ApiClient {
    /// Create a new API client
    pub fn new(config: &Config, access_token: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.api_timeout())
            .user_agent(concat!("curation/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            access_token: access_token.into(),
        })
    }

    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        debug!(%url, "GET");
        let response = self.send(self.client.get(url)).await?;
        Ok(response.json().await?)
    }

    pub async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<T> {
        debug!(%url, "POST");
        let response = self.send(self.client.post(url).json(body)).await?;
        Ok(response.json().await?)
    }

    pub async fn patch_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<T> {
        debug!(%url, "PATCH");
        let response = self.send(self.client.patch(url).json(body)).await?;
        Ok(response.json().await?)
    }

    /// Fetch at most `max_bytes` of a resource with a `Range` request
    pub async fn get_range(&self, url: &str, max_bytes: u64) -> Result<Vec<u8>> {
        debug!(%url, max_bytes, "GET range");
        let request = self
            .client
            .get(url)
            .header(reqwest::header::RANGE, format!("bytes=0-{}", max_bytes.saturating_sub(1)));
        let response = self.send(request).await?;
        Ok(response.bytes().await?.to_vec())
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = request.bearer_auth(&self.access_token).send().await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorResponse>(&body)
            .map(|e| e.error.message)
            .ok()
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| {
                if body.is_empty() {
                    status.canonical_reason().unwrap_or("request failed").to_string()
                } else {
                    body
                }
            });

        Err(CliError::api(status.as_u16(), message))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client() -> ApiClient {
        ApiClient::new(&Config::default(), "test-token").unwrap()
    }

    #[tokio::test]
    async fn test_sends_bearer_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/thing"))
            .and(header("authorization", "Bearer test-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
            .expect(1)
            .mount(&server)
            .await;

        let value: Value = client().get_json(&format!("{}/thing", server.uri())).await.unwrap();
        assert_eq!(value, json!({"ok": true}));
    }

    #[tokio::test]
    async fn test_maps_google_error_envelope() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "error": {"code": 404, "message": "Operation not found", "status": "NOT_FOUND"}
            })))
            .mount(&server)
            .await;

        let err = client()
            .get_json::<Value>(&format!("{}/missing", server.uri()))
            .await
            .unwrap_err();
        match err {
            CliError::Api { status, message } => {
                assert_eq!(status, 404);
                assert_eq!(message, "Operation not found");
            },
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_range_request_header() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/object"))
            .and(header("range", "bytes=0-1023"))
            .respond_with(ResponseTemplate::new(206).set_body_string("##fileformat=VCFv4.2\n"))
            .expect(1)
            .mount(&server)
            .await;

        let bytes = client()
            .get_range(&format!("{}/object", server.uri()), 1024)
            .await
            .unwrap();
        assert_eq!(bytes, b"##fileformat=VCFv4.2\n");
    }
}
