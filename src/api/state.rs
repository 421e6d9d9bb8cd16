//! Application state for the payroll API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::calculation::PayrollCalculator;
use crate::config::ConfigLoader;
use crate::error::EngineResult;

/// Shared application state.
///
/// Holds the payroll calculator, which is immutable once built and shared
/// across all request handlers.
#[derive(Clone)]
pub struct AppState {
    calculator: Arc<PayrollCalculator>,
}

impl AppState {
    /// Creates a new application state around a calculator.
    pub fn new(calculator: PayrollCalculator) -> Self {
        Self {
            calculator: Arc::new(calculator),
        }
    }

    /// Builds the state from loaded configuration.
    pub fn from_config(loader: ConfigLoader) -> EngineResult<Self> {
        Ok(Self::new(PayrollCalculator::new(loader.into_config())?))
    }

    /// Returns the shared calculator.
    pub fn calculator(&self) -> &PayrollCalculator {
        &self.calculator
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_state_is_clone() {
        fn assert_clone<T: Clone>() {}
        assert_clone::<AppState>();
    }

    #[test]
    fn test_clones_share_the_calculator() {
        let state = AppState::new(PayrollCalculator::default());
        let clone = state.clone();
        assert!(std::ptr::eq(state.calculator(), clone.calculator()));
    }
}
