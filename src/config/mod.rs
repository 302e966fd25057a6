//! Configuration loading for the wage ledger.
//!
//! This module provides the YAML seed configuration (settings defaults and an
//! initial rate history) and the server settings read from the environment.
//!
//! # Example
//!
//! ```no_run
//! use wage_ledger::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/default").unwrap();
//! println!("Seeded rates: {}", config.config().rates.len());
//! ```

mod loader;
mod server;
mod types;

pub use loader::ConfigLoader;
pub use server::{CONFIG_VAR, DATA_VAR, HOST_VAR, PORT_VAR, ServerConfig};
pub use types::{LedgerConfig, RateSeed, SettingsConfig};
