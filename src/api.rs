//! HTTP client for the brand management REST API.
//!
//! [`BrandApi`] is the seam the list controller and the forms depend on;
//! [`HttpBrandApi`] is the reqwest-backed implementation. No operation is
//! retried: create is not idempotent, and retry decisions are left to the
//! operator.

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::config::AppConfig;
use crate::errors::{ErrorResponse, ResultExt, ServiceError};
use crate::models::{Brand, BrandId, ChainId, Company, CreateBrandRequest, UpdateBrandRequest};

/// Operations offered by the brand management API.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BrandApi: Send + Sync {
    /// Brands in server order, optionally restricted to one company.
    async fn list_brands(&self, chain_id: Option<ChainId>) -> Result<Vec<Brand>, ServiceError>;

    async fn get_brand(&self, brand_id: BrandId) -> Result<Brand, ServiceError>;

    async fn create_brand(&self, request: &CreateBrandRequest) -> Result<Brand, ServiceError>;

    async fn update_brand(
        &self,
        brand_id: BrandId,
        request: &UpdateBrandRequest,
    ) -> Result<Brand, ServiceError>;

    /// Succeeds on any 2xx; the response body is ignored.
    async fn delete_brand(&self, brand_id: BrandId) -> Result<(), ServiceError>;

    async fn list_companies(&self) -> Result<Vec<Company>, ServiceError>;
}

/// reqwest implementation of [`BrandApi`].
#[derive(Debug, Clone)]
pub struct HttpBrandApi {
    client: Client,
    base_url: String,
}

impl HttpBrandApi {
    /// Creates a client for `base_url` (e.g. `http://localhost:8080/api`).
    ///
    /// Without a `timeout` the transport default applies.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, ServiceError> {
        let parsed = Url::parse(base_url).map_err(|e| {
            ServiceError::InternalError(format!("invalid API base URL '{}': {}", base_url, e))
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ServiceError::InternalError(format!(
                "unsupported API base URL scheme '{}'",
                parsed.scheme()
            )));
        }

        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err_to_service()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, ServiceError> {
        Self::new(&config.api_base_url, config.request_timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Passes 2xx responses through and converts everything else into a
    /// [`ServiceError`], reading the `{message}` body when there is one.
    async fn check(response: Response) -> Result<Response, ServiceError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = match response.text().await {
            Ok(text) if !text.trim().is_empty() => serde_json::from_str::<ErrorResponse>(&text).ok(),
            _ => None,
        };
        let err = ServiceError::from_status(status, body);
        warn!(status = status.as_u16(), error = %err, "API request rejected");
        Err(err)
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ServiceError> {
        let response = Self::check(response).await?;
        response.json::<T>().await.map_err_to_service()
    }
}

#[async_trait]
impl BrandApi for HttpBrandApi {
    #[instrument(skip(self))]
    async fn list_brands(&self, chain_id: Option<ChainId>) -> Result<Vec<Brand>, ServiceError> {
        let mut request = self.client.get(self.url("brands"));
        if let Some(chain_id) = chain_id {
            request = request.query(&[("chainId", chain_id)]);
        }

        let brands: Vec<Brand> = Self::decode(request.send().await?).await?;
        debug!(count = brands.len(), "brands fetched");
        Ok(brands)
    }

    #[instrument(skip(self))]
    async fn get_brand(&self, brand_id: BrandId) -> Result<Brand, ServiceError> {
        let response = self
            .client
            .get(self.url(&format!("brands/{}", brand_id)))
            .send()
            .await?;
        Self::decode(response).await
    }

    #[instrument(skip(self, request), fields(brand_name = %request.brand_name, chain_id = request.chain_id))]
    async fn create_brand(&self, request: &CreateBrandRequest) -> Result<Brand, ServiceError> {
        let response = self
            .client
            .post(self.url("brands"))
            .json(request)
            .send()
            .await?;
        Self::decode(response).await
    }

    #[instrument(skip(self, request), fields(brand_name = %request.brand_name, chain_id = request.chain_id))]
    async fn update_brand(
        &self,
        brand_id: BrandId,
        request: &UpdateBrandRequest,
    ) -> Result<Brand, ServiceError> {
        let response = self
            .client
            .put(self.url(&format!("brands/{}", brand_id)))
            .json(request)
            .send()
            .await?;
        Self::decode(response).await
    }

    #[instrument(skip(self))]
    async fn delete_brand(&self, brand_id: BrandId) -> Result<(), ServiceError> {
        let response = self
            .client
            .delete(self.url(&format!("brands/{}", brand_id)))
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_companies(&self) -> Result<Vec<Company>, ServiceError> {
        let response = self.client.get(self.url("chains")).send().await?;
        Self::decode(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn rejects_relative_and_non_http_urls() {
        assert_matches!(
            HttpBrandApi::new("localhost/api", None),
            Err(ServiceError::InternalError(_))
        );
        assert_matches!(
            HttpBrandApi::new("ftp://example.com/api", None),
            Err(ServiceError::InternalError(_))
        );
    }

    #[test]
    fn joins_paths_without_double_slashes() {
        let api = HttpBrandApi::new("http://localhost:8080/api/", None).unwrap();
        assert_eq!(api.base_url(), "http://localhost:8080/api");
        assert_eq!(api.url("brands"), "http://localhost:8080/api/brands");
        assert_eq!(api.url("/chains"), "http://localhost:8080/api/chains");
    }
}
