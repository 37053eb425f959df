//! Configuration loading and management for the payroll engine.
//!
//! This module provides the [`PayrollPolicy`] passed into every calculation
//! and the loader that reads it from YAML files, including the pay schedule,
//! government contribution tables and the withholding-tax bracket table.
//!
//! # Example
//!
//! ```no_run
//! use payroll_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/ph_2025").unwrap();
//! println!("Loaded policy: {}", config.policy().name);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    ContributionsConfig, PagIbigConfig, PayrollPolicy, PhilHealthConfig, PolicyFile,
    RoundingConfig, ScheduleConfig, SssConfig, TaxBracket, TaxTableConfig, TaxableBase,
};
