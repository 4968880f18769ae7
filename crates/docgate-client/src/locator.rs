//! Resource addressing for tenant-scoped collections.
//!
//! Collections live at `{base_url}/api/{namespace}_{collection}` and single
//! documents at `{base_url}/api/{namespace}_{collection}/{id}`. The scheme is
//! fixed; the backend must honor it.

use url::Url;

use crate::error::{GatewayError, GatewayResult};

/// Which backend and which tenant partition requests belong to.
///
/// Immutable once built. Address construction is pure string work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenantContext {
    base_url: String,
    tenant_id: String,
    namespace: String,
}

impl TenantContext {
    /// Validate and build a tenant context.
    ///
    /// The base URL must be an absolute http(s) URL; a trailing slash is
    /// dropped. Tenant id and namespace must be non-empty.
    pub fn new(
        base_url: &str,
        tenant_id: impl Into<String>,
        namespace: impl Into<String>,
    ) -> GatewayResult<Self> {
        let parsed = Url::parse(base_url)
            .map_err(|e| GatewayError::config(format!("invalid base URL '{}': {}", base_url, e)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(GatewayError::config(format!(
                "base URL must use http or https, got '{}'",
                parsed.scheme()
            )));
        }

        let tenant_id = tenant_id.into();
        if tenant_id.is_empty() {
            return Err(GatewayError::config("tenant id cannot be empty"));
        }

        let namespace = namespace.into();
        if namespace.is_empty() {
            return Err(GatewayError::config("namespace cannot be empty"));
        }

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            tenant_id,
            namespace,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn tenant_id(&self) -> &str {
        &self.tenant_id
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Physical collection name: `{namespace}_{collection}`.
    pub fn collection_segment(&self, collection: &str) -> String {
        format!("{}_{}", self.namespace, collection)
    }

    /// Build the address of a collection, or of one document in it.
    ///
    /// The document id is percent-encoded as a single path segment.
    pub fn address_for(&self, collection: &str, document_id: Option<&str>) -> String {
        let mut url = format!(
            "{}/api/{}",
            self.base_url,
            self.collection_segment(collection)
        );
        if let Some(id) = document_id {
            url.push('/');
            url.push_str(&urlencoding::encode(id));
        }
        url
    }
}

/// Reject empty collection names before any I/O.
pub(crate) fn check_collection(collection: &str) -> GatewayResult<()> {
    if collection.is_empty() {
        return Err(GatewayError::invalid_argument("collection name cannot be empty"));
    }
    Ok(())
}

/// Reject empty document ids on single-document operations.
pub(crate) fn check_document_id(document_id: &str) -> GatewayResult<()> {
    if document_id.is_empty() {
        return Err(GatewayError::invalid_argument("document id cannot be empty"));
    }
    Ok(())
}
