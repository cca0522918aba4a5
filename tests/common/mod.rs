//! Shared utilities for integration testing.
#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;

use rpc_server::{
    DiscoveryContext, DiscoveryError, DiscoveryProvider, RpcService, ServiceError,
    ServiceRegistry, Transport, TransportBinding, TransportError, TransportFactory,
};

/// Echo service: `say` returns the payload, anything else is unknown.
pub struct EchoService;

#[async_trait]
impl RpcService for EchoService {
    async fn invoke(&self, method: &str, payload: Bytes) -> Result<Bytes, ServiceError> {
        match method {
            "say" => Ok(payload),
            "explode" => Err(ServiceError::Failed("echo exploded".to_string())),
            other => Err(ServiceError::UnknownMethod(other.to_string())),
        }
    }
}

/// Provider registering an echo service under each given identifier.
pub struct ListProvider {
    pub name: &'static str,
    pub ids: Vec<&'static str>,
}

impl DiscoveryProvider for ListProvider {
    fn name(&self) -> &str {
        self.name
    }

    fn process(
        &self,
        _ctx: &DiscoveryContext<'_>,
        registry: &mut ServiceRegistry,
    ) -> Result<(), DiscoveryError> {
        for id in &self.ids {
            registry.register(*id, Arc::new(EchoService));
        }
        Ok(())
    }
}

/// Observed transport activity, shared between mocks and assertions.
#[derive(Default)]
pub struct TransportProbe {
    pub starts: AtomicUsize,
    pub stops: AtomicUsize,
    pub live: AtomicUsize,
    pub max_live: AtomicUsize,
    pub last_binding: Mutex<Option<(String, u16)>>,
}

impl TransportProbe {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn last_port(&self) -> Option<u16> {
        self.last_binding.lock().unwrap().as_ref().map(|(_, p)| *p)
    }
}

/// In-memory transport recording lifecycle events against a probe.
pub struct MockTransport {
    probe: Arc<TransportProbe>,
    fail_start: bool,
    running: bool,
}

#[async_trait]
impl Transport for MockTransport {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn local_addr(&self) -> Option<std::net::SocketAddr> {
        None
    }

    async fn start(&mut self) -> Result<(), TransportError> {
        if self.fail_start {
            return Err(TransportError::Bind {
                addr: "mock".to_string(),
                source: std::io::Error::new(std::io::ErrorKind::AddrInUse, "simulated bind failure"),
            });
        }
        self.probe.starts.fetch_add(1, Ordering::SeqCst);
        let live = self.probe.live.fetch_add(1, Ordering::SeqCst) + 1;
        self.probe.max_live.fetch_max(live, Ordering::SeqCst);
        self.running = true;
        Ok(())
    }

    async fn stop(&mut self) {
        if self.running {
            self.running = false;
            self.probe.live.fetch_sub(1, Ordering::SeqCst);
            self.probe.stops.fetch_add(1, Ordering::SeqCst);
        }
    }
}

/// Register a probe-backed mock transport under `name`.
pub fn register_mock(
    factory: &mut TransportFactory,
    name: &str,
    probe: &Arc<TransportProbe>,
    fail_start: bool,
) {
    let probe = probe.clone();
    factory.register(name, move |binding: TransportBinding| {
        *probe.last_binding.lock().unwrap() = Some((binding.host.clone(), binding.port));
        Box::new(MockTransport {
            probe: probe.clone(),
            fail_start,
            running: false,
        })
    });
}

/// Factory with a single working mock transport as the default.
pub fn mock_factory(probe: &Arc<TransportProbe>) -> TransportFactory {
    let mut factory = TransportFactory::empty();
    register_mock(&mut factory, "mock", probe, false);
    factory.set_default("mock");
    factory
}

/// Write a throwaway config file and return its path.
pub fn write_config(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!(
        "rpc-server-it-{}-{}.toml",
        std::process::id(),
        name
    ));
    std::fs::write(&path, contents).unwrap();
    path
}

/// Grab a currently free localhost port.
pub fn free_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}
