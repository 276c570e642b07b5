//! REST client for the `/api` backend

use crate::config::HttpConfig;
use crate::credentials::CredentialSource;
use crate::errors::HttpError;
use crate::types::HttpMethod;
use reqwest::{Client, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;
use std::sync::Arc;
use stockroom_config::StockroomConfig;
use tracing::{debug, warn};
use url::Url;

/// Fields checked, in order, for a human-readable error in a failed response
const MESSAGE_FIELDS: [&str; 3] = ["message", "errorMessage", "error"];

/// Client for the backend REST surface.
///
/// Cheap to clone; clones share the connection pool and credential source.
#[derive(Clone)]
pub struct ApiClient {
    base_url: Url,
    client: Client,
    credentials: Option<Arc<dyn CredentialSource>>,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url.as_str())
            .field("has_credentials", &self.credentials.is_some())
            .finish()
    }
}

impl ApiClient {
    /// Create a client for `base_url` with specific configuration
    pub fn new(base_url: &str, config: HttpConfig) -> Result<Self, HttpError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| HttpError::InvalidUrl(format!("{}: {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(HttpError::InvalidUrl(base_url.to_string()));
        }

        debug!(
            "Creating ApiClient for {} with timeout: {}s",
            base_url,
            config.timeout.as_secs()
        );
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .danger_accept_invalid_certs(!config.verify_ssl)
            .redirect(reqwest::redirect::Policy::limited(
                config.max_redirects as usize,
            ))
            .build()?;

        Ok(Self {
            base_url,
            client,
            credentials: None,
        })
    }

    /// Create a client from the `api` and `http` configuration domains
    pub fn from_config(config: &StockroomConfig) -> Result<Self, HttpError> {
        Self::new(&config.api.base_url, HttpConfig::from(&config.http))
    }

    /// Same client, attaching `credentials` to authenticated calls
    pub fn with_credentials(&self, credentials: Arc<dyn CredentialSource>) -> Self {
        Self {
            credentials: Some(credentials),
            ..self.clone()
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Join path segments onto the base URL. Segments are percent-encoded, so
    /// identifiers may contain `/` or spaces.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url, HttpError> {
        let mut url = self.base_url.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| HttpError::InvalidUrl(self.base_url.to_string()))?;
            path.pop_if_empty().extend(segments);
        }
        Ok(url)
    }

    pub async fn get<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, HttpError> {
        self.execute(HttpMethod::Get, segments, &[], None, true).await
    }

    pub async fn get_with_query<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&str, &str)],
    ) -> Result<T, HttpError> {
        self.execute(HttpMethod::Get, segments, query, None, true).await
    }

    /// GET without the bearer header
    pub async fn get_public<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, HttpError> {
        self.execute(HttpMethod::Get, segments, &[], None, false).await
    }

    pub async fn post<B, T>(&self, segments: &[&str], body: &B) -> Result<T, HttpError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = serde_json::to_value(body)?;
        self.execute(HttpMethod::Post, segments, &[], Some(body), true).await
    }

    /// POST without the bearer header
    pub async fn post_public<B, T>(&self, segments: &[&str], body: &B) -> Result<T, HttpError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = serde_json::to_value(body)?;
        self.execute(HttpMethod::Post, segments, &[], Some(body), false).await
    }

    /// POST with no request body
    pub async fn post_empty<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, HttpError> {
        self.execute(HttpMethod::Post, segments, &[], None, true).await
    }

    pub async fn put<B, T>(&self, segments: &[&str], body: &B) -> Result<T, HttpError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = serde_json::to_value(body)?;
        self.execute(HttpMethod::Put, segments, &[], Some(body), true).await
    }

    /// DELETE; any response body is ignored
    pub async fn delete(&self, segments: &[&str]) -> Result<(), HttpError> {
        self.send(HttpMethod::Delete, segments, &[], None, true)
            .await
            .map(|_| ())
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        method: HttpMethod,
        segments: &[&str],
        query: &[(&str, &str)],
        body: Option<JsonValue>,
        authenticated: bool,
    ) -> Result<T, HttpError> {
        let bytes = self
            .send(method, segments, query, body, authenticated)
            .await?;
        decode_body(&bytes)
    }

    async fn send(
        &self,
        method: HttpMethod,
        segments: &[&str],
        query: &[(&str, &str)],
        body: Option<JsonValue>,
        authenticated: bool,
    ) -> Result<Vec<u8>, HttpError> {
        let url = self.endpoint(segments)?;
        debug!("{} {}", method, url.path());

        let mut request = self.client.request(method.into(), url.clone());
        if !query.is_empty() {
            request = request.query(query);
        }
        if authenticated {
            if let Some(token) = self.credentials.as_ref().and_then(|c| c.bearer_token()) {
                request = request.bearer_auth(token);
            }
        }
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response.bytes().await?.to_vec());
        }

        let text = response.text().await.unwrap_or_default();
        let message = extract_message(&text).unwrap_or_else(|| status_text(status));

        if status == StatusCode::UNAUTHORIZED {
            warn!("{} {} rejected with 401, dropping credentials", method, url.path());
            if let Some(credentials) = &self.credentials {
                credentials.on_unauthorized();
            }
            return Err(HttpError::Unauthorized { message });
        }

        debug!("{} {} failed with {}", method, url.path(), status.as_u16());
        Err(HttpError::Status {
            status: status.as_u16(),
            message,
        })
    }
}

/// Backend-supplied error text from a failed response body
pub fn extract_message(body: &str) -> Option<String> {
    let value: JsonValue = serde_json::from_str(body).ok()?;
    let non_empty = |text: &str| {
        let text = text.trim();
        (!text.is_empty()).then(|| text.to_string())
    };

    if let Some(text) = value.as_str() {
        return non_empty(text);
    }
    MESSAGE_FIELDS
        .iter()
        .find_map(|field| value.get(field).and_then(JsonValue::as_str).and_then(non_empty))
}

fn status_text(status: StatusCode) -> String {
    status
        .canonical_reason()
        .map(str::to_string)
        .unwrap_or_else(|| format!("HTTP {}", status.as_u16()))
}

/// An empty body decodes as JSON `null`, so `Option<T>` and `()` targets accept it
fn decode_body<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, HttpError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(serde_json::from_value(JsonValue::Null)?);
    }
    Ok(serde_json::from_slice(bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_message_order() {
        assert_eq!(
            extract_message(r#"{"error":"Bad Request","message":"name is required"}"#).as_deref(),
            Some("name is required")
        );
        assert_eq!(
            extract_message(r#"{"errorMessage":"bad credentials"}"#).as_deref(),
            Some("bad credentials")
        );
        assert_eq!(extract_message(r#"{"message":"  "}"#), None);
        assert_eq!(extract_message(r#""plain""#).as_deref(), Some("plain"));
        assert_eq!(extract_message("<html>oops</html>"), None);
    }

    #[test]
    fn test_endpoint_joins_and_encodes() {
        let client = ApiClient::new("http://localhost:8080/api/", HttpConfig::default()).unwrap();
        let url = client
            .endpoint(&["product-batches", "P 1", "INV/7"])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8080/api/product-batches/P%201/INV%2F7"
        );
    }

    #[test]
    fn test_rejects_non_base_url() {
        let err = ApiClient::new("mailto:ops@example.com", HttpConfig::default()).unwrap_err();
        assert!(matches!(err, HttpError::InvalidUrl(_)));
    }

    #[test]
    fn test_decode_empty_body() {
        let value: Option<u32> = decode_body(b"").unwrap();
        assert_eq!(value, None);
        assert!(decode_body::<()>(b"  ").is_ok());
    }
}
