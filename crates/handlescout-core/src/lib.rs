//! Handlescout Core - Foundation crate for the handlescout prober.
//!
//! This crate provides shared types, error handling, and configuration
//! management that the probe engine and CLI depend on.
//!
//! # Modules
//!
//! - [`error`] - Central error types using thiserror
//! - [`config`] - TOML-based configuration with XDG paths
//! - [`types`] - Shared newtypes (`Candidate`)
//!
//! # Example
//!
//! ```rust
//! use handlescout_core::{AppConfig, Candidate};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::default();
//! config.validate()?;
//!
//! let candidate = Candidate::new("blue_falcon")?;
//! assert_eq!(candidate.as_str(), "blue_falcon");
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod config;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use config::{AppConfig, EndpointConfig, FilesConfig, NotificationConfig, ProbeConfig};
pub use error::{ConfigError, ConfigResult, CoreError, Result};
pub use types::Candidate;
