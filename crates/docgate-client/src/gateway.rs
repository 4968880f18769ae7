//! Document gateway.
//!
//! The application-facing API over `HttpTransport`:
//! - `list` / `get` read collections and documents
//! - `save` creates or updates depending on whether the document has an id
//! - `remove` deletes
//! - `create` / `read` / `update` / `delete` map 1:1 onto the transport
//!
//! Every successful mutation publishes exactly one `ChangeEvent`. Failed
//! calls publish nothing.
//!
//! # Save with fallback
//!
//! In `SaveMode::Upsert`, a document with an id is PUT to its address. If the
//! backend answers 404 the gateway POSTs the same body to the collection,
//! so callers can pick ids locally and save without checking existence
//! first. Any other failure is returned unchanged. `SaveMode::Direct` skips
//! the fallback and returns the 404.
//!
//! A 404 on PUT is always read as "document does not exist yet", including
//! when the collection address itself is wrong.

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::broadcast;
use tracing::debug;

use docgate_models::{ChangeEvent, ChangeKind, Document};

use crate::config::{GatewayConfig, SaveMode};
use crate::error::GatewayResult;
use crate::locator::{check_collection, TenantContext};
use crate::metrics::record_save_fallback;
use crate::notify::{ChangeNotifier, Subscription};
use crate::transport::HttpTransport;

/// Tenant-scoped document gateway. Cheap to clone; clones share the
/// connection pool and listeners.
#[derive(Clone)]
pub struct DocumentGateway {
    transport: HttpTransport,
    notifier: ChangeNotifier,
    save_mode: SaveMode,
}

impl DocumentGateway {
    /// Create a new gateway.
    pub fn new(config: GatewayConfig) -> GatewayResult<Self> {
        let transport = HttpTransport::new(&config)?;
        Ok(Self::with_transport(transport, config.save_mode))
    }

    /// Create from environment variables.
    pub fn from_env() -> GatewayResult<Self> {
        Self::new(GatewayConfig::from_env()?)
    }

    pub fn with_transport(transport: HttpTransport, save_mode: SaveMode) -> Self {
        Self {
            transport,
            notifier: ChangeNotifier::new(),
            save_mode,
        }
    }

    pub fn tenant(&self) -> &TenantContext {
        self.transport.tenant()
    }

    pub fn save_mode(&self) -> SaveMode {
        self.save_mode
    }

    pub fn notifier(&self) -> &ChangeNotifier {
        &self.notifier
    }

    /// Register a change observer. See `ChangeNotifier::on_change`.
    #[must_use = "dropping the subscription unregisters the observer"]
    pub fn on_change<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&ChangeEvent) + Send + Sync + 'static,
    {
        self.notifier.on_change(callback)
    }

    /// Receive change events through a channel.
    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.notifier.subscribe()
    }

    // =========================================================================
    // Collection API
    // =========================================================================

    /// Read every document in a collection.
    pub async fn list<D>(&self, collection: &str) -> GatewayResult<Vec<D>>
    where
        D: DeserializeOwned,
    {
        self.transport.fetch_collection(collection).await
    }

    /// Read one document. `Ok(None)` if it does not exist.
    pub async fn get<D>(&self, collection: &str, doc_id: &str) -> GatewayResult<Option<D>>
    where
        D: DeserializeOwned,
    {
        self.transport.fetch_document(collection, doc_id).await
    }

    /// Create or update a document and return the backend's version of it.
    pub async fn save<D>(&self, collection: &str, data: &D) -> GatewayResult<D>
    where
        D: Document,
    {
        let saved = match data.id() {
            Some(doc_id) => self.update_or_create(collection, &doc_id, data).await?,
            None => self.transport.create_document(collection, data).await?,
        };

        self.emit(collection, ChangeKind::Saved);
        Ok(saved)
    }

    /// Delete a document and return the backend's confirmation payload.
    pub async fn remove(&self, collection: &str, doc_id: &str) -> GatewayResult<serde_json::Value> {
        let confirmation = self.transport.remove_document(collection, doc_id).await?;
        self.emit(collection, ChangeKind::Removed);
        Ok(confirmation)
    }

    /// Ask listeners to re-read a collection. No request is made.
    pub fn refresh(&self, collection: &str) -> GatewayResult<()> {
        check_collection(collection)?;
        self.emit(collection, ChangeKind::Refreshed);
        Ok(())
    }

    // =========================================================================
    // Raw CRUD
    // =========================================================================

    /// POST to the collection, whatever the document's id.
    pub async fn create<D>(&self, collection: &str, data: &D) -> GatewayResult<D>
    where
        D: Serialize + DeserializeOwned,
    {
        let created = self.transport.create_document(collection, data).await?;
        self.emit(collection, ChangeKind::Saved);
        Ok(created)
    }

    pub async fn read<D>(&self, collection: &str, doc_id: &str) -> GatewayResult<Option<D>>
    where
        D: DeserializeOwned,
    {
        self.get(collection, doc_id).await
    }

    /// PUT to the document address. A missing document is an error.
    pub async fn update<D>(&self, collection: &str, doc_id: &str, data: &D) -> GatewayResult<D>
    where
        D: Serialize + DeserializeOwned,
    {
        let updated = self.transport.replace_document(collection, doc_id, data).await?;
        self.emit(collection, ChangeKind::Saved);
        Ok(updated)
    }

    pub async fn delete(&self, collection: &str, doc_id: &str) -> GatewayResult<serde_json::Value> {
        self.remove(collection, doc_id).await
    }

    // =========================================================================
    // Internal Helpers
    // =========================================================================

    async fn update_or_create<D>(&self, collection: &str, doc_id: &str, data: &D) -> GatewayResult<D>
    where
        D: Document,
    {
        match self.transport.replace_document(collection, doc_id, data).await {
            Err(e) if e.is_not_found() && self.save_mode == SaveMode::Upsert => {
                debug!(
                    collection = %collection,
                    doc_id = %doc_id,
                    "Update target missing, creating instead"
                );
                record_save_fallback(collection);
                self.transport.create_document(collection, data).await
            }
            result => result,
        }
    }

    fn emit(&self, collection: &str, kind: ChangeKind) {
        self.notifier.notify(ChangeEvent::new(collection, kind));
    }
}
