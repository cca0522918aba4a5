//! Built-in HTTP transport.
//!
//! # Responsibilities
//! - Bind the configured address and serve until told to stop
//! - Dispatch `POST /rpc/{service}/{method}` into the registry snapshot
//! - Expose the registered service identifiers for introspection
//! - Wire up middleware (timeout, request ID, tracing) and request metrics
//!
//! # Design Decisions
//! - The serve loop runs on a spawned task; `stop` signals it and awaits exit
//! - Payloads pass through as opaque bytes; encoding belongs to the services

use std::net::SocketAddr;
use std::time::Instant;

use async_trait::async_trait;
use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::lifecycle::Shutdown;
use crate::observability::metrics;
use crate::registry::{Dispatcher, ServiceError};
use crate::transport::request_id::RequestIdLayer;
use crate::transport::{Transport, TransportBinding, TransportError};

/// Name this transport is registered under.
pub const TRANSPORT_NAME: &str = "axum";

/// State injected into handlers.
#[derive(Clone)]
struct AppState {
    dispatcher: Dispatcher,
}

/// HTTP transport built on axum.
pub struct HttpTransport {
    binding: TransportBinding,
    shutdown: Shutdown,
    handle: Option<JoinHandle<()>>,
    local_addr: Option<SocketAddr>,
}

impl HttpTransport {
    pub fn new(binding: TransportBinding) -> Self {
        Self {
            binding,
            shutdown: Shutdown::new(),
            handle: None,
            local_addr: None,
        }
    }

    /// Build the router with all middleware layers.
    fn build_router(&self) -> Router {
        let state = AppState {
            dispatcher: self.binding.dispatcher.clone(),
        };
        Router::new()
            .route("/services", get(list_services))
            .route("/rpc/{service}/{method}", post(invoke))
            .with_state(state)
            .layer(TimeoutLayer::new(self.binding.request_timeout))
            .layer(RequestIdLayer)
            .layer(TraceLayer::new_for_http())
    }
}

#[async_trait]
impl Transport for HttpTransport {
    fn name(&self) -> &'static str {
        TRANSPORT_NAME
    }

    fn local_addr(&self) -> Option<SocketAddr> {
        self.local_addr
    }

    async fn start(&mut self) -> Result<(), TransportError> {
        if self.handle.is_some() {
            return Err(TransportError::AlreadyStarted);
        }

        let addr = self.binding.addr();
        let listener = TcpListener::bind(addr.as_str())
            .await
            .map_err(|source| TransportError::Bind {
                addr: addr.clone(),
                source,
            })?;
        let local_addr = listener
            .local_addr()
            .map_err(|source| TransportError::Bind { addr, source })?;

        let app = self.build_router();
        let mut rx = self.shutdown.subscribe();
        let handle = tokio::spawn(async move {
            let served = axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = rx.recv().await;
                })
                .await;
            if let Err(e) = served {
                tracing::error!(error = %e, "HTTP transport exited with error");
            }
        });

        self.handle = Some(handle);
        self.local_addr = Some(local_addr);
        tracing::info!(
            address = %local_addr,
            services = self.binding.dispatcher.len(),
            "HTTP transport started"
        );
        Ok(())
    }

    async fn stop(&mut self) {
        self.shutdown.trigger();
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
            tracing::info!("HTTP transport stopped");
        }
        self.local_addr = None;
    }
}

#[derive(Serialize)]
struct ServiceList {
    count: usize,
    services: Vec<String>,
}

/// `GET /services`: identifiers the dispatcher can resolve.
async fn list_services(State(state): State<AppState>) -> Json<ServiceList> {
    let services = state.dispatcher.service_ids();
    Json(ServiceList {
        count: services.len(),
        services,
    })
}

/// `POST /rpc/{service}/{method}`: resolve the service and invoke it.
async fn invoke(
    State(state): State<AppState>,
    Path((service, method)): Path<(String, String)>,
    payload: Bytes,
) -> Response {
    let start_time = Instant::now();

    let Some(instance) = state.dispatcher.get(&service) else {
        tracing::warn!(service = %service, "No such service");
        metrics::record_rpc(&service, 404, start_time);
        return error_response(StatusCode::NOT_FOUND, format!("unknown service: {}", service));
    };

    match instance.invoke(&method, payload).await {
        Ok(body) => {
            metrics::record_rpc(&service, 200, start_time);
            (StatusCode::OK, body).into_response()
        }
        Err(ServiceError::UnknownMethod(m)) => {
            metrics::record_rpc(&service, 404, start_time);
            error_response(StatusCode::NOT_FOUND, format!("unknown method: {}", m))
        }
        Err(ServiceError::Failed(message)) => {
            tracing::error!(service = %service, method = %method, error = %message, "Service invocation failed");
            metrics::record_rpc(&service, 500, start_time);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, message)
        }
    }
}

fn error_response(status: StatusCode, message: String) -> Response {
    (status, Json(serde_json::json!({ "error": message }))).into_response()
}
