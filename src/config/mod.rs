//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! embedded defaults (TOML literal)
//!     → loader.rs (parse, flatten to dotted keys)
//! override file (TOML, optional)
//!     → loader.rs (read, parse, flatten)
//!     → Settings (defaults + overrides, immutable)
//!     → read by the lifecycle controller and discovery providers
//! ```
//!
//! # Design Decisions
//! - Settings are a flat `key.path → string` map; consumers parse values
//! - Override keys shadow defaults with the same name
//! - Unknown keys are kept; consumers ignore what they don't recognize
//! - A missing override path is not an error when no path was supplied;
//!   a supplied but unreadable one is

pub mod loader;
pub mod settings;

pub use loader::{builtin, load, ConfigError};
pub use settings::Settings;
