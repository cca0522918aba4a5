//! Transport selection by configured name.

use std::collections::HashMap;

use thiserror::Error;

use crate::transport::http::{self, HttpTransport};
use crate::transport::{Transport, TransportBinding};

type BuilderFn = Box<dyn Fn(TransportBinding) -> Box<dyn Transport> + Send + Sync>;

/// `http.server` named a transport nobody registered.
#[derive(Debug, Error)]
#[error("unknown transport {name:?} (registered: {known:?})")]
pub struct UnknownTransport {
    pub name: String,
    pub known: Vec<String>,
}

/// Mapping from transport name to constructor.
///
/// The single extension point for adding transport implementations: register
/// a builder under a name and select it via the `http.server` key. An empty
/// or absent name selects the registered default.
pub struct TransportFactory {
    builders: HashMap<String, BuilderFn>,
    default_name: String,
}

impl TransportFactory {
    /// Factory with the built-in HTTP transport registered as the default.
    pub fn new() -> Self {
        let mut factory = Self::empty();
        factory.register(http::TRANSPORT_NAME, |binding| {
            Box::new(HttpTransport::new(binding))
        });
        factory.set_default(http::TRANSPORT_NAME);
        factory
    }

    /// Factory with nothing registered.
    pub fn empty() -> Self {
        Self {
            builders: HashMap::new(),
            default_name: String::new(),
        }
    }

    /// Register a builder under a name, replacing any previous registration.
    pub fn register<F>(&mut self, name: impl Into<String>, builder: F)
    where
        F: Fn(TransportBinding) -> Box<dyn Transport> + Send + Sync + 'static,
    {
        self.builders.insert(name.into(), Box::new(builder));
    }

    /// Name used when `create` is called without one.
    pub fn set_default(&mut self, name: impl Into<String>) {
        self.default_name = name.into();
    }

    /// Registered names, sorted for stable output.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.builders.keys().cloned().collect();
        names.sort_unstable();
        names
    }

    /// Produce a transport for the given name, bound to the binding.
    ///
    /// An empty or absent name resolves to the default implementation.
    pub fn create(
        &self,
        name: Option<&str>,
        binding: TransportBinding,
    ) -> Result<Box<dyn Transport>, UnknownTransport> {
        let effective = match name.map(str::trim) {
            Some(n) if !n.is_empty() => n,
            _ => self.default_name.as_str(),
        };
        match self.builders.get(effective) {
            Some(builder) => Ok(builder(binding)),
            None => Err(UnknownTransport {
                name: effective.to_string(),
                known: self.names(),
            }),
        }
    }
}

impl Default for TransportFactory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::ServiceRegistry;
    use crate::transport::TransportError;
    use async_trait::async_trait;
    use std::net::SocketAddr;
    use std::time::Duration;

    struct Nop;

    #[async_trait]
    impl Transport for Nop {
        fn name(&self) -> &'static str {
            "nop"
        }
        fn local_addr(&self) -> Option<SocketAddr> {
            None
        }
        async fn start(&mut self) -> Result<(), TransportError> {
            Ok(())
        }
        async fn stop(&mut self) {}
    }

    fn binding() -> TransportBinding {
        TransportBinding {
            host: "127.0.0.1".to_string(),
            port: 8801,
            request_timeout: Duration::from_secs(30),
            dispatcher: ServiceRegistry::new().snapshot(),
        }
    }

    #[test]
    fn test_default_factory_resolves_builtin() {
        let factory = TransportFactory::new();
        let transport = factory.create(None, binding()).unwrap();
        assert_eq!(transport.name(), http::TRANSPORT_NAME);
    }

    #[test]
    fn test_empty_and_whitespace_names_select_default() {
        let factory = TransportFactory::new();
        assert!(factory.create(Some(""), binding()).is_ok());
        assert!(factory.create(Some("  "), binding()).is_ok());
    }

    #[test]
    fn test_unknown_name_is_rejected_with_known_names() {
        let factory = TransportFactory::new();
        let err = factory.create(Some("doesnotexist"), binding()).err().unwrap();
        assert_eq!(err.name, "doesnotexist");
        assert_eq!(err.known, vec![http::TRANSPORT_NAME.to_string()]);
    }

    #[test]
    fn test_registered_transport_is_created_by_name() {
        let mut factory = TransportFactory::new();
        factory.register("nop", |_| Box::new(Nop));
        let transport = factory.create(Some("nop"), binding()).unwrap();
        assert_eq!(transport.name(), "nop");
    }
}
