//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading payroll
//! configuration from YAML files.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{EngineError, EngineResult};

use super::types::{PayrollConfig, PolicyConfig, RateTable};

/// Loads and provides access to payroll configuration.
///
/// # Directory Structure
///
/// ```text
/// config/motorph/
/// ├── rates.yaml    # Statutory deduction tables
/// └── payroll.yaml  # Hours, allowance and input-format policy
/// ```
///
/// # Example
///
/// ```no_run
/// use payroll_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/motorph")?;
/// println!("Max monthly hours: {}", loader.config().hours.max_monthly_hours);
/// # Ok::<(), payroll_engine::error::EngineError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: PayrollConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - Any required file is missing (`ConfigNotFound`)
    /// - Any file contains invalid YAML (`ConfigParseError`)
    /// - The loaded tables fail validation (`InvalidConfig`)
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let rates = Self::load_yaml::<RateTable>(&path.join("rates.yaml"))?;
        let policy = Self::load_yaml::<PolicyConfig>(&path.join("payroll.yaml"))?;

        let config = PayrollConfig::new(rates, policy);
        config.validate()?;

        debug!(
            path = %path.display(),
            tax_brackets = config.rates.withholding_tax.brackets.len(),
            "Loaded payroll configuration"
        );

        Ok(Self { config })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the underlying payroll configuration.
    pub fn config(&self) -> &PayrollConfig {
        &self.config
    }

    /// Consumes the loader, returning the configuration.
    pub fn into_config(self) -> PayrollConfig {
        self.config
    }

    /// Returns the statutory rate table.
    pub fn rates(&self) -> &RateTable {
        &self.config.rates
    }
}
