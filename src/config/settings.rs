//! Organization settings for lodge-dues
//!
//! Holds the organization-wide monthly fee and the names printed on receipts.
//! Settings are loaded once in `main` and passed explicitly to every service.

use serde::{Deserialize, Serialize};

use super::paths::LodgePaths;
use crate::error::LodgeError;
use crate::models::Money;

/// Organization settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Monthly dues owed by every member
    #[serde(default = "default_monthly_fee")]
    pub monthly_fee_base: Money,

    /// Lodge name printed on receipts
    #[serde(default = "default_institution_name")]
    pub institution_name: String,

    /// Treasurer name printed on receipts
    #[serde(default)]
    pub treasurer_name: String,

    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Date format preference (strftime format)
    #[serde(default = "default_date_format")]
    pub date_format: String,
}

fn default_schema_version() -> u32 {
    1
}

fn default_monthly_fee() -> Money {
    Money::from_units(50)
}

fn default_institution_name() -> String {
    "Lodge".to_string()
}

fn default_currency() -> String {
    "$".to_string()
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            monthly_fee_base: default_monthly_fee(),
            institution_name: default_institution_name(),
            treasurer_name: String::new(),
            currency_symbol: default_currency(),
            date_format: default_date_format(),
        }
    }
}

impl Settings {
    /// Format an amount with the configured currency symbol
    pub fn format_money(&self, amount: Money) -> String {
        amount.format_with_symbol(&self.currency_symbol)
    }

    /// Validate settings before saving
    pub fn validate(&self) -> Result<(), LodgeError> {
        if !self.monthly_fee_base.is_positive() {
            return Err(LodgeError::Validation(format!(
                "Monthly fee must be positive, got {}",
                self.monthly_fee_base
            )));
        }
        if self.institution_name.trim().is_empty() {
            return Err(LodgeError::Validation(
                "Institution name cannot be empty".into(),
            ));
        }
        Ok(())
    }

    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &LodgePaths) -> Result<Self, LodgeError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path)
                .map_err(|e| LodgeError::Io(format!("Failed to read settings file: {}", e)))?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                LodgeError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &LodgePaths) -> Result<(), LodgeError> {
        self.validate()?;
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| LodgeError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| LodgeError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.monthly_fee_base, Money::from_units(50));
        assert_eq!(settings.currency_symbol, "$");
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LodgePaths::with_base_dir(temp_dir.path().to_path_buf());

        let settings = Settings {
            monthly_fee_base: Money::from_units(75),
            institution_name: "Lodge Unity No. 12".into(),
            ..Settings::default()
        };
        settings.save(&paths).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded.monthly_fee_base, Money::from_units(75));
        assert_eq!(loaded.institution_name, "Lodge Unity No. 12");
    }

    #[test]
    fn test_rejects_zero_fee() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LodgePaths::with_base_dir(temp_dir.path().to_path_buf());

        let settings = Settings {
            monthly_fee_base: Money::zero(),
            ..Settings::default()
        };
        assert!(settings.save(&paths).unwrap_err().is_validation());
        assert!(!paths.settings_file().exists());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"monthly_fee_base": 2500}"#).unwrap();
        assert_eq!(settings.monthly_fee_base, Money::from_cents(2500));
        assert_eq!(settings.institution_name, "Lodge");
        assert_eq!(settings.date_format, "%Y-%m-%d");
    }
}
