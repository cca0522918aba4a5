//! Discovery provider contract and link-time registration.

use thiserror::Error;

use crate::config::Settings;
use crate::registry::ServiceRegistry;

/// Failure while instantiating or running a discovery provider.
///
/// Carries a message only; the runner isolates the failure regardless of cause.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct DiscoveryError {
    message: String,
}

impl DiscoveryError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Read-only environment handed to providers during a discovery run.
pub struct DiscoveryContext<'a> {
    settings: &'a Settings,
}

impl<'a> DiscoveryContext<'a> {
    pub fn new(settings: &'a Settings) -> Self {
        Self { settings }
    }

    /// The merged settings for this start cycle.
    pub fn settings(&self) -> &Settings {
        self.settings
    }
}

/// A pluggable unit that inspects the environment and registers service
/// instances into the registry.
///
/// Invoked once per startup cycle. Providers only add entries; they never
/// remove what other providers registered.
pub trait DiscoveryProvider: Send + Sync {
    fn name(&self) -> &str;

    fn process(
        &self,
        ctx: &DiscoveryContext<'_>,
        registry: &mut ServiceRegistry,
    ) -> Result<(), DiscoveryError>;
}

/// Link-time provider registration.
///
/// ```ignore
/// inventory::submit! {
///     ProviderRegistration { name: "static-services", construct: build_provider }
/// }
/// ```
pub struct ProviderRegistration {
    pub name: &'static str,
    pub construct: fn() -> Result<Box<dyn DiscoveryProvider>, DiscoveryError>,
}

inventory::collect!(ProviderRegistration);
