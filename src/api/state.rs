//! Application state for the payroll API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::config::ConfigLoader;
use crate::store::PayrollLedger;

/// Shared application state.
///
/// Holds the loaded policy for stateless calculations and the payroll
/// ledger that stored runs and workflows operate on.
#[derive(Clone)]
pub struct AppState {
    config: Arc<ConfigLoader>,
    ledger: Arc<RwLock<PayrollLedger>>,
}

impl AppState {
    /// Creates state with an empty ledger under the loaded policy.
    pub fn new(config: ConfigLoader) -> Self {
        let ledger = PayrollLedger::empty(config.policy().clone());
        Self::with_ledger(config, ledger)
    }

    /// Creates state around an already seeded ledger.
    pub fn with_ledger(config: ConfigLoader, ledger: PayrollLedger) -> Self {
        Self {
            config: Arc::new(config),
            ledger: Arc::new(RwLock::new(ledger)),
        }
    }

    /// Returns a reference to the configuration loader.
    pub fn config(&self) -> &ConfigLoader {
        &self.config
    }

    /// Returns the shared ledger.
    pub fn ledger(&self) -> &RwLock<PayrollLedger> {
        &self.ledger
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PayrollPolicy;

    #[test]
    fn test_app_state_is_clone() {
        fn assert_clone<T: Clone>() {}
        assert_clone::<AppState>();
    }

    #[tokio::test]
    async fn test_new_state_has_empty_ledger() {
        let config = ConfigLoader::from_policy(PayrollPolicy::default()).unwrap();
        let state = AppState::new(config);

        let ledger = state.ledger().read().await;
        assert!(ledger.employees().is_empty());
        assert_eq!(ledger.policy(), state.config().policy());
    }
}
