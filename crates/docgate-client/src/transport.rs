//! HTTP transport for tenant-scoped collections.
//!
//! Every request carries the tenant header. Requests with a body are sent as
//! JSON. Non-2xx responses become `GatewayError::Transport` with the status;
//! the only exception is a 404 on a single-document read, which is absence.
//!
//! Requests are single-attempt. Nothing here retries.

use std::sync::Arc;
use std::time::Instant;

use reqwest::header::{HeaderName, HeaderValue};
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info_span, Instrument};

use crate::config::GatewayConfig;
use crate::error::{GatewayError, GatewayResult};
use crate::locator::{check_collection, check_document_id, TenantContext};
use crate::metrics::record_request;

/// Tenant-scoped HTTP transport.
#[derive(Clone)]
pub struct HttpTransport {
    http: Client,
    tenant: Arc<TenantContext>,
    tenant_header: HeaderName,
    tenant_value: HeaderValue,
}

impl HttpTransport {
    /// Create a transport from config.
    pub fn new(config: &GatewayConfig) -> GatewayResult<Self> {
        let tenant = TenantContext::new(&config.base_url, &config.tenant_id, &config.namespace)?;

        let tenant_header = HeaderName::from_bytes(config.tenant_header.as_bytes()).map_err(|e| {
            GatewayError::config(format!(
                "invalid tenant header name '{}': {}",
                config.tenant_header, e
            ))
        })?;
        let tenant_value = HeaderValue::from_str(tenant.tenant_id())
            .map_err(|e| GatewayError::config(format!("tenant id is not a valid header value: {}", e)))?;

        let http = Client::builder()
            .connect_timeout(config.connect_timeout)
            .user_agent(concat!("docgate-client/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(GatewayError::Network)?;

        Ok(Self {
            http,
            tenant: Arc::new(tenant),
            tenant_header,
            tenant_value,
        })
    }

    pub fn tenant(&self) -> &TenantContext {
        &self.tenant
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Read every document in a collection.
    pub async fn fetch_collection<D>(&self, collection: &str) -> GatewayResult<Vec<D>>
    where
        D: DeserializeOwned,
    {
        check_collection(collection)?;
        let url = self.tenant.address_for(collection, None);

        self.execute_request("fetch_collection", collection, None, async {
            let response = self.request(Method::GET, &url).send().await?;
            let status = response.status();

            if status.is_success() {
                let docs: Vec<D> = Self::read_json(response).await?;
                debug!(returned = docs.len(), "Fetched collection");
                Ok((docs, status))
            } else {
                Err(Self::handle_error_response(status, &url, response).await)
            }
        })
        .await
    }

    /// Read one document. A 404 resolves to `None`.
    pub async fn fetch_document<D>(&self, collection: &str, doc_id: &str) -> GatewayResult<Option<D>>
    where
        D: DeserializeOwned,
    {
        check_collection(collection)?;
        check_document_id(doc_id)?;
        let url = self.tenant.address_for(collection, Some(doc_id));

        self.execute_request("fetch_document", collection, Some(doc_id), async {
            let response = self.request(Method::GET, &url).send().await?;
            let status = response.status();

            match status {
                StatusCode::NOT_FOUND => {
                    debug!("Document {}/{} not found", collection, doc_id);
                    Ok((None, status))
                }
                s if s.is_success() => Ok((Some(Self::read_json(response).await?), status)),
                _ => Err(Self::handle_error_response(status, &url, response).await),
            }
        })
        .await
    }

    // =========================================================================
    // Writes
    // =========================================================================

    /// POST a document to the collection address. Any identifier stays in the body.
    pub async fn create_document<D>(&self, collection: &str, data: &D) -> GatewayResult<D>
    where
        D: Serialize + DeserializeOwned,
    {
        check_collection(collection)?;
        let url = self.tenant.address_for(collection, None);

        self.execute_request("create_document", collection, None, async {
            let response = self.request(Method::POST, &url).json(data).send().await?;
            let status = response.status();

            if status.is_success() {
                Ok((Self::read_json(response).await?, status))
            } else {
                Err(Self::handle_error_response(status, &url, response).await)
            }
        })
        .await
    }

    /// PUT a document to its own address.
    ///
    /// A missing target surfaces as a transport error with status 404, which
    /// `GatewayError::is_not_found` isolates.
    pub async fn replace_document<D>(&self, collection: &str, doc_id: &str, data: &D) -> GatewayResult<D>
    where
        D: Serialize + DeserializeOwned,
    {
        check_collection(collection)?;
        check_document_id(doc_id)?;
        let url = self.tenant.address_for(collection, Some(doc_id));

        self.execute_request("replace_document", collection, Some(doc_id), async {
            let response = self.request(Method::PUT, &url).json(data).send().await?;
            let status = response.status();

            if status.is_success() {
                Ok((Self::read_json(response).await?, status))
            } else {
                Err(Self::handle_error_response(status, &url, response).await)
            }
        })
        .await
    }

    /// DELETE a document. Returns the backend's confirmation payload, or
    /// `Value::Null` when the response has no body.
    pub async fn remove_document(&self, collection: &str, doc_id: &str) -> GatewayResult<serde_json::Value> {
        check_collection(collection)?;
        check_document_id(doc_id)?;
        let url = self.tenant.address_for(collection, Some(doc_id));

        self.execute_request("remove_document", collection, Some(doc_id), async {
            let response = self.request(Method::DELETE, &url).send().await?;
            let status = response.status();

            if !status.is_success() {
                return Err(Self::handle_error_response(status, &url, response).await);
            }

            let body = response.bytes().await?;
            if body.iter().all(u8::is_ascii_whitespace) {
                return Ok((serde_json::Value::Null, status));
            }
            Ok((serde_json::from_slice(&body)?, status))
        })
        .await
    }

    // =========================================================================
    // Internal Helpers
    // =========================================================================

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.http
            .request(method, url)
            .header(self.tenant_header.clone(), self.tenant_value.clone())
    }

    /// Execute a request with tracing and metrics. The future yields its
    /// value together with the response status so the real code is recorded.
    async fn execute_request<T, F>(
        &self,
        operation: &str,
        collection: &str,
        doc_id: Option<&str>,
        fut: F,
    ) -> GatewayResult<T>
    where
        F: std::future::Future<Output = GatewayResult<(T, StatusCode)>>,
    {
        let span = if let Some(id) = doc_id {
            info_span!("docgate_request", operation = %operation, collection = %collection, doc_id = %id)
        } else {
            info_span!("docgate_request", operation = %operation, collection = %collection)
        };

        let start = Instant::now();
        let result = fut.instrument(span).await;
        let latency_ms = start.elapsed().as_millis() as f64;

        record_request(operation, outcome_status(&result), latency_ms);

        result.map(|(value, _)| value)
    }

    async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> GatewayResult<T> {
        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| {
            let prefix = String::from_utf8_lossy(&body[..body.len().min(200)]).into_owned();
            GatewayError::InvalidResponse(format!("{} (body prefix: {})", e, prefix))
        })
    }

    async fn handle_error_response(status: StatusCode, url: &str, response: reqwest::Response) -> GatewayError {
        let body = response.text().await.unwrap_or_default();
        GatewayError::from_http_status(status.as_u16(), format!("{} failed: {}", url, body))
    }
}

/// Status label for a finished request: the response's own code on success,
/// the error's HTTP status on failure, `0` when the error carries none.
fn outcome_status<T>(result: &GatewayResult<(T, StatusCode)>) -> u16 {
    match result {
        Ok((_, status)) => status.as_u16(),
        Err(e) => e.http_status().unwrap_or(0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_status_keeps_success_code() {
        assert_eq!(outcome_status(&Ok(((), StatusCode::OK))), 200);
        assert_eq!(outcome_status(&Ok(((), StatusCode::CREATED))), 201);
        assert_eq!(outcome_status(&Ok(((), StatusCode::NO_CONTENT))), 204);
    }

    #[test]
    fn test_outcome_status_for_errors() {
        let missing: GatewayResult<((), StatusCode)> = Err(GatewayError::from_http_status(404, "gone"));
        assert_eq!(outcome_status(&missing), 404);

        let refused: GatewayResult<((), StatusCode)> = Err(GatewayError::invalid_argument("empty id"));
        assert_eq!(outcome_status(&refused), 0);
    }
}
