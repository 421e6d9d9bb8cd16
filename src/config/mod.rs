//! Configuration loading and management for the payroll engine.
//!
//! This module provides functionality to load the statutory rate table and
//! payroll policy from YAML files.
//!
//! # Example
//!
//! ```no_run
//! use payroll_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/motorph").unwrap();
//! println!("Tax brackets: {}", config.rates().withholding_tax.brackets.len());
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    AllowancePolicy, HealthInsuranceRate, HoursPolicy, HousingFundRate, InputFormat,
    PayrollConfig, PolicyConfig, RateTable, SocialInsuranceTable, TaxBracket, TaxSchedule,
};
