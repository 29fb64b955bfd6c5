//! Versioned product resource accessors.
//!
//! Each API generation gets its own accessor type with the generation's own
//! mapping for not-found and precondition failures: v1 and v3 raise typed
//! errors, v2 returns `None`/`false` sentinels. Tests pick a generation when
//! they construct their fixture instead of branching mid-test.

use crate::client::Client;
use crate::error::{ApiError, ApiResult};
use crate::models::{LegacyProduct, NewProduct, Product};

/// Legacy v1 surface: denormalized product records under `/v1`.
#[derive(Debug)]
pub struct ProductsV1<'a> {
    client: &'a Client,
}

impl<'a> ProductsV1<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Fetch a product by id.
    pub async fn get(&self, id: i64) -> ApiResult<LegacyProduct> {
        let response = self
            .client
            .get(&format!("/v1/products/{}", id), &[])
            .await?;

        if response.status().is_success() {
            self.client.parse_json(response).await
        } else {
            Err(self.client.api_error(response).await)
        }
    }
}

/// v2 surface: sentinel returns for the mapped failure cases.
#[derive(Debug)]
pub struct ProductsV2<'a> {
    client: &'a Client,
}

impl<'a> ProductsV2<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Fetch a product by id. A 404 maps to `None`.
    pub async fn get(&self, id: i64) -> ApiResult<Option<Product>> {
        let response = self
            .client
            .get(&format!("/v2/products/{}", id), &[])
            .await?;

        match response.status().as_u16() {
            404 => Ok(None),
            s if (200..300).contains(&s) => Ok(Some(self.client.parse_json(response).await?)),
            _ => Err(self.client.api_error(response).await),
        }
    }

    /// List products, optionally filtered. An empty result is an empty list.
    pub async fn all(&self, query: &[(&str, &str)]) -> ApiResult<Vec<Product>> {
        let response = self.client.get("/v2/products", query).await?;

        if response.status().is_success() {
            self.client.parse_json(response).await
        } else {
            Err(self.client.api_error(response).await)
        }
    }

    /// Create a product from a field set.
    pub async fn create(&self, fields: &NewProduct) -> ApiResult<Product> {
        let response = self.client.post_json("/v2/products", fields).await?;

        if response.status().is_success() {
            self.client.parse_json(response).await
        } else {
            Err(self.client.api_error(response).await)
        }
    }

    /// Delete a product by id. A 404 or a 428 (missing `If-Match`) maps to
    /// `false`; a completed delete maps to `true`.
    pub async fn delete(&self, id: i64, etag: Option<&str>) -> ApiResult<bool> {
        let response = self
            .client
            .delete(&format!("/v2/products/{}", id), etag)
            .await?;

        match response.status().as_u16() {
            404 | 428 => Ok(false),
            s if (200..300).contains(&s) => Ok(true),
            _ => Err(self.client.api_error(response).await),
        }
    }
}

/// v3 surface: same routes as v2, typed errors instead of sentinels.
#[derive(Debug)]
pub struct ProductsV3<'a> {
    client: &'a Client,
}

impl<'a> ProductsV3<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Fetch a product by id. A 404 surfaces as [`ApiError::NotFound`].
    pub async fn get(&self, id: i64) -> ApiResult<Product> {
        let response = self
            .client
            .get(&format!("/v2/products/{}", id), &[])
            .await?;

        if response.status().is_success() {
            self.client.parse_json(response).await
        } else {
            Err(self.client.api_error(response).await)
        }
    }

    /// List products, optionally filtered. An empty result is an empty list.
    pub async fn all(&self, query: &[(&str, &str)]) -> ApiResult<Vec<Product>> {
        let response = self.client.get("/v2/products", query).await?;

        if response.status().is_success() {
            self.client.parse_json(response).await
        } else {
            Err(self.client.api_error(response).await)
        }
    }

    /// Create a product from a field set.
    pub async fn create(&self, fields: &NewProduct) -> ApiResult<Product> {
        let response = self.client.post_json("/v2/products", fields).await?;

        if response.status().is_success() {
            self.client.parse_json(response).await
        } else {
            Err(self.client.api_error(response).await)
        }
    }

    /// Delete a product by id. A 404 surfaces as [`ApiError::NotFound`], a
    /// missing `If-Match` as [`ApiError::PreconditionRequired`].
    pub async fn delete(&self, id: i64, etag: Option<&str>) -> ApiResult<()> {
        let response = self
            .client
            .delete(&format!("/v2/products/{}", id), etag)
            .await?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(self.client.api_error(response).await)
        }
    }
}
