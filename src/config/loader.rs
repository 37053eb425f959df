//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading a payroll
//! policy from YAML files.

use std::fs;
use std::path::Path;

use tracing::info;

use crate::error::{EngineError, EngineResult};

use super::types::{ContributionsConfig, PayrollPolicy, PolicyFile, TaxTableConfig};

/// Loads and provides access to a payroll policy.
///
/// # Directory Structure
///
/// The configuration directory should have the following structure:
/// ```text
/// config/ph_2025/
/// ├── policy.yaml         # Pay schedule and rounding
/// ├── contributions.yaml  # SSS, PhilHealth and Pag-IBIG tables
/// └── tax_table.yaml      # Graduated withholding-tax brackets
/// ```
///
/// # Example
///
/// ```no_run
/// use payroll_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/ph_2025").unwrap();
/// println!("Loaded policy: {}", loader.policy().name);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    policy: PayrollPolicy,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - Any required file is missing (`ConfigNotFound`)
    /// - Any file contains invalid YAML or misses a field (`ConfigParseError`)
    /// - The combined policy is inconsistent (`InvalidPolicy`)
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let policy_file = Self::load_yaml::<PolicyFile>(&path.join("policy.yaml"))?;
        let contributions =
            Self::load_yaml::<ContributionsConfig>(&path.join("contributions.yaml"))?;
        let tax_table = Self::load_yaml::<TaxTableConfig>(&path.join("tax_table.yaml"))?;

        let policy = PayrollPolicy::from_parts(policy_file, contributions, tax_table);
        policy.validate()?;

        info!(
            policy = %policy.name,
            path = %path.display(),
            brackets = policy.withholding_tax.brackets.len(),
            "Loaded payroll policy"
        );

        Ok(Self { policy })
    }

    /// Wraps an in-memory policy after validating it.
    pub fn from_policy(policy: PayrollPolicy) -> EngineResult<Self> {
        policy.validate()?;
        Ok(Self { policy })
    }

    /// Loads and parses a YAML file.
    pub(crate) fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the loaded policy.
    pub fn policy(&self) -> &PayrollPolicy {
        &self.policy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TaxableBase;
    use crate::models::PayrollStatus;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn config_path() -> &'static str {
        "./config/ph_2025"
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn scratch_dir(name: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "payroll_engine_{}_{}",
            name,
            std::process::id()
        ));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_load_valid_configuration() {
        let result = ConfigLoader::load(config_path());
        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());

        let loader = result.unwrap();
        assert_eq!(loader.policy().name, "Philippines 2025 semi-monthly");
    }

    #[test]
    fn test_shipped_configuration_matches_builtin_policy() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        assert_eq!(loader.policy(), &PayrollPolicy::default());
    }

    #[test]
    fn test_schedule_loaded_correctly() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        let schedule = &loader.policy().schedule;

        assert_eq!(schedule.working_days_per_month, 22);
        assert_eq!(schedule.month_end_cutoff_day, 25);
        assert_eq!(schedule.initial_status, PayrollStatus::Draft);
        assert_eq!(schedule.taxable_base, TaxableBase::WithheldContributions);
    }

    #[test]
    fn test_contributions_loaded_correctly() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        let policy = loader.policy();

        assert_eq!(policy.sss.minimum_contribution, dec("180"));
        assert_eq!(policy.sss.maximum_contribution, dec("1350"));
        assert_eq!(policy.philhealth.salary_ceiling, dec("100000"));
        assert_eq!(policy.pagibig.max_contribution, dec("100"));
    }

    #[test]
    fn test_tax_table_loaded_correctly() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        let table = &loader.policy().withholding_tax;

        assert_eq!(table.periods_per_year, 24);
        assert_eq!(table.brackets.len(), 6);
        assert_eq!(table.brackets[3].base_tax, dec("130000"));
        assert!(table.brackets[5].up_to.is_none());
    }

    #[test]
    fn test_load_missing_directory_returns_error() {
        let result = ConfigLoader::load("/nonexistent/path");

        match result {
            Err(EngineError::ConfigNotFound { path }) => {
                assert!(path.contains("policy.yaml"));
            }
            _ => panic!("Expected ConfigNotFound error"),
        }
    }

    #[test]
    fn test_load_malformed_yaml_returns_parse_error() {
        let dir = scratch_dir("malformed");
        fs::write(dir.join("policy.yaml"), "name: [unclosed").unwrap();

        let result = ConfigLoader::load(&dir);

        match result {
            Err(EngineError::ConfigParseError { path, .. }) => {
                assert!(path.contains("policy.yaml"));
            }
            other => panic!("Expected ConfigParseError, got {:?}", other),
        }
    }

    #[test]
    fn test_load_inconsistent_policy_returns_invalid_policy() {
        let dir = scratch_dir("inconsistent");
        for file in ["policy.yaml", "contributions.yaml", "tax_table.yaml"] {
            fs::copy(Path::new(config_path()).join(file), dir.join(file)).unwrap();
        }
        let policy = fs::read_to_string(dir.join("policy.yaml"))
            .unwrap()
            .replace("hours_per_day: 8", "hours_per_day: 0");
        fs::write(dir.join("policy.yaml"), policy).unwrap();

        let result = ConfigLoader::load(&dir);

        assert!(matches!(result, Err(EngineError::InvalidPolicy { .. })));
    }

    #[test]
    fn test_from_policy_validates() {
        let mut policy = PayrollPolicy::default();
        policy.schedule.pay_periods_per_month = 0;
        assert!(ConfigLoader::from_policy(policy).is_err());
    }
}
