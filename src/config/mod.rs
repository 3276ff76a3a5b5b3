//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → command line overrides (cli.rs)
//!     → validation.rs (semantic checks)
//!     → NetworkTestConfig (validated, immutable)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; there is no reload
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::ConfigError;
pub use schema::NetworkTestConfig;
pub use schema::CheckConfig;
pub use schema::ServerConfig;
pub use schema::ObserversConfig;
pub use schema::ObservabilityConfig;
pub use schema::FileFormat;
pub use validation::ValidationError;
