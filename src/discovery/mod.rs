//! Service discovery subsystem.
//!
//! # Data Flow
//! ```text
//! link time:
//!     inventory::submit! { ProviderRegistration { .. } }
//!     → collected into the global registration list
//! startup:
//!     DiscoveryRunner::run
//!     → instantiate each provider (fallible)
//!     → provider.process(ctx, registry) populates the registry
//!     → DiscoveryReport summarizes the cycle
//! ```
//!
//! # Design Decisions
//! - Providers are enumerated at link time (inventory) or added programmatically
//! - Providers are instantiated fresh on every startup cycle
//! - One failing provider never aborts the others; failures are logged and counted
//! - Entries a failing provider already added stay in the registry

pub mod provider;
pub mod runner;

pub use provider::{DiscoveryContext, DiscoveryError, DiscoveryProvider, ProviderRegistration};
pub use runner::{DiscoveryReport, DiscoveryRunner};
