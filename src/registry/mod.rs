//! Service registry subsystem.
//!
//! # Data Flow
//! ```text
//! startup:
//!     registry cleared
//!     → discovery providers register instances
//!     → snapshot() freezes the map into a Dispatcher
//!     → Dispatcher handed to the transport for its lifetime
//! ```
//!
//! # Design Decisions
//! - Mutation happens only during discovery, under the controller lock
//! - The transport sees an immutable snapshot, never the live map
//! - Duplicate registration replaces the previous instance (logged)

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

/// Error raised by a service while handling an invocation.
///
/// Payload semantics are the service's business; this only distinguishes
/// "the method doesn't exist" from "the method failed".
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("unknown method: {0}")]
    UnknownMethod(String),
    #[error("service failure: {0}")]
    Failed(String),
}

/// A live service instance fulfilling RPC calls for one identifier.
///
/// Payloads are opaque bytes; encoding and method dispatch internals belong
/// to the service, not the control plane.
#[async_trait]
pub trait RpcService: Send + Sync {
    async fn invoke(&self, method: &str, payload: Bytes) -> Result<Bytes, ServiceError>;
}

/// Mutable mapping from service identifier to live instance.
///
/// Cleared and repopulated on every startup cycle.
#[derive(Default)]
pub struct ServiceRegistry {
    services: HashMap<String, Arc<dyn RpcService>>,
}

impl ServiceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove every entry. Called at the start of each startup cycle.
    pub fn clear(&mut self) {
        self.services.clear();
    }

    /// Register an instance under an identifier, replacing any previous one.
    pub fn register(&mut self, id: impl Into<String>, service: Arc<dyn RpcService>) {
        let id = id.into();
        if self.services.insert(id.clone(), service).is_some() {
            tracing::warn!(service = %id, "Replacing previously registered service");
        } else {
            tracing::debug!(service = %id, "Service registered");
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.services.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    /// Registered identifiers, sorted for stable output.
    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.services.keys().cloned().collect();
        ids.sort_unstable();
        ids
    }

    /// Freeze the current contents into an immutable dispatcher view.
    pub fn snapshot(&self) -> Dispatcher {
        Dispatcher {
            services: Arc::new(self.services.clone()),
        }
    }
}

/// Read-only view of the registry, held by a transport for its lifetime.
///
/// Cloning is cheap; all clones share the same frozen map. Later registry
/// mutations (the next start cycle) do not show through.
#[derive(Clone)]
pub struct Dispatcher {
    services: Arc<HashMap<String, Arc<dyn RpcService>>>,
}

impl Dispatcher {
    /// Resolve a service identifier to its instance.
    pub fn get(&self, id: &str) -> Option<Arc<dyn RpcService>> {
        self.services.get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    /// Service identifiers, sorted for stable output.
    pub fn service_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.services.keys().cloned().collect();
        ids.sort_unstable();
        ids
    }
}
