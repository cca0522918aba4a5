//! Network transport subsystem.
//!
//! # Data Flow
//! ```text
//! lifecycle controller
//!     → factory.rs (resolve http.server name → builder)
//!     → Transport::start (bind listener, serve)
//!     → requests dispatched into the registry snapshot
//!     → Transport::stop (graceful shutdown, idempotent)
//! ```
//!
//! # Design Decisions
//! - Transports are owned exclusively; at most one is live process-wide
//! - `start` is fallible; `stop` never fails and may be called repeatedly
//! - New implementations register with the factory, the controller is untouched

pub mod factory;
pub mod http;
pub mod request_id;

use std::net::SocketAddr;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::registry::Dispatcher;

pub use factory::{TransportFactory, UnknownTransport};
pub use http::HttpTransport;

/// Error raised while starting a transport.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Failed to bind the listener address.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },
    /// `start` called on a transport that is already serving.
    #[error("transport already started")]
    AlreadyStarted,
}

/// Everything a transport needs to come online.
#[derive(Clone)]
pub struct TransportBinding {
    pub host: String,
    pub port: u16,
    pub request_timeout: Duration,
    /// Read-only registry snapshot for the lifetime of the transport.
    pub dispatcher: Dispatcher,
}

impl TransportBinding {
    /// The `host:port` string to bind.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// The network listener accepting RPC requests and dispatching them into the
/// registry's services.
///
/// Constructed by name via [`TransportFactory`]; owned exclusively by the
/// lifecycle controller.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Implementation name, as registered with the factory.
    fn name(&self) -> &'static str;

    /// The bound address once started, `None` otherwise.
    fn local_addr(&self) -> Option<SocketAddr>;

    /// Bind and begin serving. Fails without leaving anything running.
    async fn start(&mut self) -> Result<(), TransportError>;

    /// Stop serving. Idempotent, never fails, safe when never started.
    async fn stop(&mut self);
}
