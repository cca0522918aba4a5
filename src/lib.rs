//! RPC Server Bootstrap Library
//!
//! Control plane that brings an RPC dispatcher online and takes it offline:
//! merges configuration, discovers services into a registry, selects a
//! transport by name, and serializes start/stop so at most one transport is
//! ever live. Wire protocol and payload encoding stay with the services and
//! transports themselves.

pub mod config;
pub mod discovery;
pub mod lifecycle;
pub mod observability;
pub mod registry;
pub mod transport;

pub use config::Settings;
pub use discovery::{
    DiscoveryContext, DiscoveryError, DiscoveryProvider, DiscoveryRunner, ProviderRegistration,
};
pub use lifecycle::{LifecycleController, Shutdown, StartError};
pub use registry::{Dispatcher, RpcService, ServiceError, ServiceRegistry};
pub use transport::{
    Transport, TransportBinding, TransportError, TransportFactory, UnknownTransport,
};
