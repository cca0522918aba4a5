//! Startup and shutdown orchestration.
//!
//! # Responsibilities
//! - Serialize every start/stop call behind one lock
//! - Own the single live transport reference
//! - Sequence config merge, registry reset, discovery, transport creation
//!
//! # Design Decisions
//! - The lock is held for the entire start call, slow I/O included: discovery
//!   and transport binding are not safe against each other, so overlap is
//!   forbidden rather than fine-grained-locked
//! - A previously running transport is stopped before the new one binds; a
//!   failed restart therefore leaves no server running rather than silently
//!   keeping stale state alive
//! - Fatal errors are returned to the caller, not just logged

use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::Mutex;

use crate::config;
use crate::discovery::{DiscoveryContext, DiscoveryRunner};
use crate::observability::metrics;
use crate::registry::ServiceRegistry;
use crate::transport::{Transport, TransportBinding, TransportError, TransportFactory, UnknownTransport};

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: &str = "8801";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Error that aborted a start attempt. The controller is stopped afterwards.
#[derive(Debug, Error)]
pub enum StartError {
    #[error("invalid value for {key}: {value:?}")]
    InvalidConfigValue { key: &'static str, value: String },
    #[error(transparent)]
    UnknownTransport(#[from] UnknownTransport),
    #[error("transport start failed: {0}")]
    Transport(#[from] TransportError),
}

/// Shared mutable state, touched only while the controller lock is held.
struct ControllerState {
    current: Option<Box<dyn Transport>>,
    registry: ServiceRegistry,
}

/// Serializes start/stop and owns the single active transport.
///
/// Construct once and share (`Arc`) wherever lifecycle control is needed;
/// both operations may be called at any time, any number of times, from any
/// task.
pub struct LifecycleController {
    state: Mutex<ControllerState>,
    factory: TransportFactory,
    discovery: DiscoveryRunner,
}

impl LifecycleController {
    /// Controller with the built-in transport factory and every link-time
    /// registered discovery provider.
    pub fn new() -> Self {
        Self::with_parts(TransportFactory::new(), DiscoveryRunner::new())
    }

    /// Controller over a custom factory and provider set.
    pub fn with_parts(factory: TransportFactory, discovery: DiscoveryRunner) -> Self {
        Self {
            state: Mutex::new(ControllerState {
                current: None,
                registry: ServiceRegistry::new(),
            }),
            factory,
            discovery,
        }
    }

    /// Bring the server online, replacing any running instance.
    ///
    /// The lock is held for the whole call; concurrent start/stop callers
    /// block until this attempt finishes. On any error the controller is
    /// left stopped and the error is returned.
    pub async fn start(&self, config_path: Option<&Path>) -> Result<(), StartError> {
        let mut state = self.state.lock().await;

        // Stop any existing transport first; at most one is ever live.
        Self::shutdown_current(&mut state).await;

        // Merge configuration. A broken override file is recoverable: the
        // condition is reported and the embedded defaults apply.
        let settings = match config::load(config_path) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::error!(path = ?config_path, error = %e, "Error loading config, continuing with defaults");
                metrics::record_config_error();
                config::builtin()
            }
        };

        // Fresh registry for this attempt, then discovery.
        state.registry.clear();
        tracing::info!("Scanning services to expose");
        let ctx = DiscoveryContext::new(&settings);
        self.discovery.run(&ctx, &mut state.registry);

        let host = settings.get_or("http.host", DEFAULT_HOST).to_string();
        let raw_port = settings.get_or("http.port", DEFAULT_PORT);
        let port = match parse_port(raw_port) {
            Ok(port) => port,
            Err(e) => {
                tracing::error!(value = %raw_port, "Invalid http.port");
                metrics::record_start_failure("invalid_config");
                return Err(e);
            }
        };
        let name = settings
            .get("http.server")
            .map(str::trim)
            .filter(|s| !s.is_empty());
        let request_timeout = parse_request_timeout(&settings);

        let binding = TransportBinding {
            host: host.clone(),
            port,
            request_timeout,
            dispatcher: state.registry.snapshot(),
        };
        let mut transport = match self.factory.create(name, binding) {
            Ok(transport) => transport,
            Err(e) => {
                tracing::error!(error = %e, "No such transport");
                metrics::record_start_failure("unknown_transport");
                return Err(e.into());
            }
        };
        tracing::info!(transport = transport.name(), host = %host, port, "Using transport");

        // The previous transport is already down, so a failure here leaves
        // no server running and the caller observes the error.
        if let Err(e) = transport.start().await {
            tracing::error!(error = %e, "Error starting transport");
            metrics::record_start_failure("transport_start");
            // stop is idempotent; clears anything a partial start left behind
            transport.stop().await;
            return Err(e.into());
        }

        metrics::record_start(transport.name());
        tracing::info!(
            address = ?transport.local_addr(),
            services = state.registry.len(),
            "Bootstrap complete"
        );
        state.current = Some(transport);
        Ok(())
    }

    /// Take the server offline. No-op when nothing is running; idempotent.
    pub async fn stop(&self) {
        let mut state = self.state.lock().await;
        Self::shutdown_current(&mut state).await;
    }

    async fn shutdown_current(state: &mut ControllerState) {
        if let Some(mut transport) = state.current.take() {
            transport.stop().await;
            metrics::record_stop();
            tracing::info!(transport = transport.name(), "Transport stopped");
        }
    }

    /// True while a transport is live.
    pub async fn is_running(&self) -> bool {
        self.state.lock().await.current.is_some()
    }

    /// Bound address of the live transport, if any.
    pub async fn local_addr(&self) -> Option<SocketAddr> {
        self.state
            .lock()
            .await
            .current
            .as_ref()
            .and_then(|t| t.local_addr())
    }

    /// Identifiers discovery registered during the most recent start attempt.
    pub async fn service_ids(&self) -> Vec<String> {
        self.state.lock().await.registry.ids()
    }
}

impl Default for LifecycleController {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_port(raw: &str) -> Result<u16, StartError> {
    match raw.trim().parse::<u16>() {
        Ok(port) if port > 0 => Ok(port),
        _ => Err(StartError::InvalidConfigValue {
            key: "http.port",
            value: raw.to_string(),
        }),
    }
}

fn parse_request_timeout(settings: &config::Settings) -> Duration {
    let raw = settings.get_or("http.request_timeout_secs", "30");
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Duration::from_secs(secs),
        _ => {
            tracing::warn!(value = %raw, "Invalid http.request_timeout_secs, using default");
            Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS)
        }
    }
}
