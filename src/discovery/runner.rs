//! Discovery runner: enumerate providers, isolate per-provider failures.

use crate::discovery::provider::{
    DiscoveryContext, DiscoveryError, DiscoveryProvider, ProviderRegistration,
};
use crate::registry::ServiceRegistry;

type BuildFn = Box<dyn Fn() -> Result<Box<dyn DiscoveryProvider>, DiscoveryError> + Send + Sync>;

struct ProviderFactory {
    label: String,
    build: BuildFn,
}

/// Summary of one discovery cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiscoveryReport {
    /// Providers the runner attempted (instantiated or not).
    pub attempted: usize,
    /// Providers that failed to instantiate or to process.
    pub failed: usize,
    /// Registry entries added during this cycle.
    pub registered: usize,
}

/// Runs every known discovery provider against a registry.
///
/// Providers come from link-time `inventory` registrations and from
/// programmatic factories. Each is instantiated fresh per cycle so a
/// provider cannot carry state between start attempts.
pub struct DiscoveryRunner {
    factories: Vec<ProviderFactory>,
}

impl DiscoveryRunner {
    /// Runner seeded with every link-time registered provider.
    pub fn new() -> Self {
        let mut runner = Self::empty();
        for reg in inventory::iter::<ProviderRegistration> {
            runner.factories.push(ProviderFactory {
                label: reg.name.to_string(),
                build: Box::new(reg.construct),
            });
        }
        runner
    }

    /// Runner with no providers. Useful when the host wires providers itself.
    pub fn empty() -> Self {
        Self {
            factories: Vec::new(),
        }
    }

    /// Add a programmatic provider factory.
    pub fn add_provider<F>(&mut self, label: impl Into<String>, build: F)
    where
        F: Fn() -> Result<Box<dyn DiscoveryProvider>, DiscoveryError> + Send + Sync + 'static,
    {
        self.factories.push(ProviderFactory {
            label: label.into(),
            build: Box::new(build),
        });
    }

    pub fn provider_count(&self) -> usize {
        self.factories.len()
    }

    /// Run all providers against the registry.
    ///
    /// A provider that fails to instantiate or to process is logged, counted,
    /// and skipped; the remaining providers still run. Entries a failing
    /// provider already added are kept.
    pub fn run(&self, ctx: &DiscoveryContext<'_>, registry: &mut ServiceRegistry) -> DiscoveryReport {
        let before = registry.len();
        let mut failed = 0;

        for factory in &self.factories {
            let provider = match (factory.build)() {
                Ok(p) => p,
                Err(e) => {
                    tracing::error!(
                        provider = %factory.label,
                        error = %e,
                        "Failed to instantiate discovery provider"
                    );
                    failed += 1;
                    continue;
                }
            };

            tracing::debug!(provider = %provider.name(), "Running discovery provider");
            if let Err(e) = provider.process(ctx, registry) {
                tracing::error!(
                    provider = %provider.name(),
                    error = %e,
                    "Discovery provider failed"
                );
                failed += 1;
            }
        }

        let report = DiscoveryReport {
            attempted: self.factories.len(),
            failed,
            registered: registry.len().saturating_sub(before),
        };
        tracing::info!(
            attempted = report.attempted,
            failed = report.failed,
            services = report.registered,
            "Discovery finished"
        );
        report
    }
}

impl Default for DiscoveryRunner {
    fn default() -> Self {
        Self::new()
    }
}
