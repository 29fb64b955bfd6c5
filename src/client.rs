//! HTTP plumbing shared by the Product service accessors.

use crate::error::{ApiError, ApiResult};
use crate::products::{ProductsV1, ProductsV2, ProductsV3};
use reqwest::{Client as HttpClient, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

/// A client for the Product service API.
///
/// The versioned resource accessors are obtained from [`Client::products_v1`],
/// [`Client::products_v2`], and [`Client::products_v3`]; the accessor picked
/// at construction time decides how not-found and precondition failures
/// surface.
#[derive(Debug, Clone)]
pub struct Client {
    /// Base URL of the Product service.
    base_url: String,
    /// HTTP client.
    http: HttpClient,
}

impl Client {
    /// Create a client for the service at `base_url`.
    pub fn new(base_url: impl Into<String>) -> ApiResult<Self> {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            base_url: base_url.into(),
            http,
        })
    }

    /// Rebuild the client with a custom request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> ApiResult<Self> {
        self.http = HttpClient::builder().timeout(timeout).build()?;
        Ok(self)
    }

    /// Accessor for the legacy v1 product surface.
    pub fn products_v1(&self) -> ProductsV1<'_> {
        ProductsV1::new(self)
    }

    /// Accessor for the v2 product surface (sentinel returns).
    pub fn products_v2(&self) -> ProductsV2<'_> {
        ProductsV2::new(self)
    }

    /// Accessor for the v3 product surface (typed errors).
    pub fn products_v3(&self) -> ProductsV3<'_> {
        ProductsV3::new(self)
    }

    /// Build a full URL from a path.
    fn url(&self, path: &str) -> String {
        let path = path.strip_prefix('/').unwrap_or(path);
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }

    /// Execute a GET request with optional query parameters.
    pub(crate) async fn get(&self, path: &str, query: &[(&str, &str)]) -> ApiResult<Response> {
        let mut request: RequestBuilder = self.http.get(self.url(path));
        if !query.is_empty() {
            request = request.query(query);
        }
        request.send().await.map_err(ApiError::Http)
    }

    /// Execute a POST request with a JSON body.
    pub(crate) async fn post_json<T: Serialize>(&self, path: &str, body: &T) -> ApiResult<Response> {
        self.http
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(ApiError::Http)
    }

    /// Execute a DELETE request, with an optional `If-Match` precondition.
    pub(crate) async fn delete(&self, path: &str, etag: Option<&str>) -> ApiResult<Response> {
        let mut request = self.http.delete(self.url(path));
        if let Some(etag) = etag {
            request = request.header("If-Match", etag);
        }
        request.send().await.map_err(ApiError::Http)
    }

    /// Deserialize a successful JSON response.
    pub(crate) async fn parse_json<T: DeserializeOwned>(&self, response: Response) -> ApiResult<T> {
        response.json::<T>().await.map_err(ApiError::Http)
    }

    /// Map an error response to its typed error.
    pub(crate) async fn api_error(&self, response: Response) -> ApiError {
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        let message = extract_message(&body);

        match status {
            404 => ApiError::NotFound { message },
            428 => ApiError::PreconditionRequired { message },
            _ => ApiError::Unexpected { status, message },
        }
    }
}

/// Pull a human-readable message out of a JSON error body, falling back to
/// the raw body.
fn extract_message(body: &str) -> String {
    if let Ok(json) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["message", "error", "status"] {
            if let Some(text) = json[key].as_str() {
                return text.to_string();
            }
        }
    }
    body.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_building() {
        let client = Client::new("http://127.0.0.1:3000").unwrap();
        assert_eq!(
            client.url("/v2/products"),
            "http://127.0.0.1:3000/v2/products"
        );
        assert_eq!(
            client.url("v2/products"),
            "http://127.0.0.1:3000/v2/products"
        );
    }

    #[test]
    fn test_url_building_with_trailing_slash() {
        let client = Client::new("http://127.0.0.1:3000/").unwrap();
        assert_eq!(
            client.url("/v1/products/1"),
            "http://127.0.0.1:3000/v1/products/1"
        );
    }

    #[test]
    fn test_extract_message_prefers_json_fields() {
        assert_eq!(
            extract_message(r#"{"code": 404, "status": "Not Found"}"#),
            "Not Found"
        );
        assert_eq!(
            extract_message(r#"{"message": "missing", "status": "Not Found"}"#),
            "missing"
        );
        assert_eq!(extract_message("plain text"), "plain text");
    }
}
