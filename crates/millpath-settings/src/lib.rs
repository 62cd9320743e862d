//! # Millpath Settings
//!
//! Solver, mesh and clearing configuration stored as JSON or TOML.
//! Sections deserialize with defaults and convert into the option structs
//! the numeric crates take.

pub mod config;
pub mod error;

pub use config::{ClearingSettings, Config, MeshSettings, SolverSettings};
pub use error::{ConfigError, ConfigResult, SettingsError, SettingsResult};
