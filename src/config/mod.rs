//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize, env overrides)
//!     → validation.rs (semantic checks)
//!     → ClientConfig (validated, immutable)
//!     → handed to HttpGateway, Coordinator, ChainClient
//! ```
//!
//! # Design Decisions
//! - All fields have defaults to allow minimal configs
//! - Credentials come from the environment when present
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_from_env, ConfigError};
pub use schema::{ApiConfig, ChainConfig, ClientConfig, ObservabilityConfig, PollingConfig};
