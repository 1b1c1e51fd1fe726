//! # Catalog Configuration
//!
//! Pricing rules, default exchange rate and barcode settings.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     WAYRA_TASA_USD=3950.5                                              │
//! │     WAYRA_BARCODE_PREFIX=770                                           │
//! │     WAYRA_BARCODE_MAX_ATTEMPTS=20                                      │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/wayra/pricing.toml (Linux)                               │
//! │     ~/Library/Application Support/co.wayra.wayra/pricing.toml (macOS)  │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     built-in pricing lines, no prefix, no default rate                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # pricing.toml
//! [pricing]
//! tasa_usd = 3950.5   # used when a request carries no rate
//!
//! [barcode]
//! prefix = "770"
//! max_attempts = 20
//!
//! # Leave out every [[lines]] entry to use the built-in table
//! [[lines]]
//! tipo = "TORNILLERIA"
//! categoria = "TORNILLERIA"
//! margen_ganancia_bps = 10000
//! iva_obligatorio = true
//! porcentaje_iva_bps = 1900
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use wayra_core::validation::validate_tasa_usd;
use wayra_core::{BarcodeGenerator, PricingTable, ProductLineConfig};

use crate::error::{CatalogError, CatalogResult};

pub const ENV_TASA_USD: &str = "WAYRA_TASA_USD";
pub const ENV_BARCODE_PREFIX: &str = "WAYRA_BARCODE_PREFIX";
pub const ENV_BARCODE_MAX_ATTEMPTS: &str = "WAYRA_BARCODE_MAX_ATTEMPTS";

// =============================================================================
// Pricing Settings
// =============================================================================

/// Pricing behavior settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PricingSettings {
    /// COP per USD used when a request does not carry its own rate.
    #[serde(default)]
    pub tasa_usd: Option<f64>,
}

// =============================================================================
// Barcode Settings
// =============================================================================

/// Barcode generation settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BarcodeSettings {
    /// Leading digits of every generated code (e.g. a GS1 company prefix).
    #[serde(default)]
    pub prefix: String,

    /// Generation attempts before giving up on collisions.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

fn default_max_attempts() -> u32 {
    20
}

impl Default for BarcodeSettings {
    fn default() -> Self {
        BarcodeSettings {
            prefix: String::new(),
            max_attempts: default_max_attempts(),
        }
    }
}

// =============================================================================
// Main Configuration
// =============================================================================

/// Complete catalog configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default)]
    pub pricing: PricingSettings,

    #[serde(default)]
    pub barcode: BarcodeSettings,

    /// Pricing lines; empty means the built-in table.
    #[serde(default)]
    pub lines: Vec<ProductLineConfig>,
}

impl CatalogConfig {
    /// Loads configuration: defaults, then the file, then the environment.
    ///
    /// A missing file is not an error; a malformed or invalid one is.
    pub fn load(config_path: Option<PathBuf>) -> CatalogResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading catalog config from file");
                config = Self::from_file(&path)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Parses a config file without environment overrides or validation.
    pub fn from_file(path: &Path) -> CatalogResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Saves configuration as pretty TOML.
    pub fn save(&self, config_path: Option<PathBuf>) -> CatalogResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| CatalogError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| CatalogError::ConfigSaveFailed(e.to_string()))?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents).map_err(|e| CatalogError::ConfigSaveFailed(e.to_string()))?;

        info!(?path, "Catalog config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> CatalogResult<()> {
        self.pricing_table()?;
        self.barcode_generator()?;

        if self.barcode.max_attempts == 0 {
            return Err(CatalogError::InvalidConfig(
                "barcode.max_attempts must be greater than 0".into(),
            ));
        }

        if self.pricing.tasa_usd.is_some() {
            validate_tasa_usd(self.pricing.tasa_usd)
                .map_err(|e| CatalogError::InvalidConfig(format!("pricing.{}", e)))?;
        }

        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Applies overrides from a variable lookup (the process environment
    /// in [`CatalogConfig::load`]).
    ///
    /// Unparseable numbers are ignored with a warning.
    pub fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(tasa) = lookup(ENV_TASA_USD) {
            match tasa.trim().parse::<f64>() {
                Ok(value) => {
                    debug!(tasa_usd = value, "Overriding exchange rate from environment");
                    self.pricing.tasa_usd = Some(value);
                }
                Err(_) => warn!(value = %tasa, "Ignoring unparseable {}", ENV_TASA_USD),
            }
        }

        if let Some(prefix) = lookup(ENV_BARCODE_PREFIX) {
            debug!(prefix = %prefix, "Overriding barcode prefix from environment");
            self.barcode.prefix = prefix.trim().to_string();
        }

        if let Some(attempts) = lookup(ENV_BARCODE_MAX_ATTEMPTS) {
            match attempts.trim().parse::<u32>() {
                Ok(value) => self.barcode.max_attempts = value,
                Err(_) => warn!(value = %attempts, "Ignoring unparseable {}", ENV_BARCODE_MAX_ATTEMPTS),
            }
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("co", "wayra", "wayra")
            .map(|dirs| dirs.config_dir().join("pricing.toml"))
    }

    // =========================================================================
    // Derived Values
    // =========================================================================

    /// Builds the pricing table these settings describe.
    pub fn pricing_table(&self) -> CatalogResult<PricingTable> {
        if self.lines.is_empty() {
            return Ok(PricingTable::builtin());
        }

        Ok(PricingTable::from_entries(self.lines.iter().cloned())?)
    }

    /// Builds the barcode generator for the configured prefix.
    pub fn barcode_generator(&self) -> CatalogResult<BarcodeGenerator> {
        Ok(BarcodeGenerator::new(&self.barcode.prefix)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use wayra_core::TipoProducto;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = CatalogConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.barcode.max_attempts, 20);
        assert_eq!(config.pricing.tasa_usd, None);
        assert_eq!(config.pricing_table().unwrap(), PricingTable::builtin());
    }

    #[test]
    fn test_empty_file_means_defaults() {
        let config: CatalogConfig = toml::from_str("").unwrap();
        assert_eq!(config, CatalogConfig::default());
    }

    #[test]
    fn test_parse_custom_lines() {
        let config: CatalogConfig = toml::from_str(
            r#"
            [pricing]
            tasa_usd = 3950.5

            [barcode]
            prefix = "770"

            [[lines]]
            tipo = "TORNILLERIA"
            categoria = "tornilleria"
            margen_ganancia_bps = 8000
            iva_obligatorio = true
            porcentaje_iva_bps = 1900
            "#,
        )
        .unwrap();

        assert!(config.validate().is_ok());
        assert_eq!(config.pricing.tasa_usd, Some(3950.5));
        assert_eq!(config.barcode.max_attempts, 20);

        let table = config.pricing_table().unwrap();
        assert_eq!(table.len(), 1);
        let line = table.lookup(TipoProducto::Tornilleria, "TORNILLERIA").unwrap();
        assert_eq!(line.margen_ganancia_bps, 8_000);
        assert!(table.lookup(TipoProducto::WayraEni, "ENI").is_err());
    }

    #[test]
    fn test_config_validation() {
        let mut config = CatalogConfig::default();

        config.barcode.prefix = "77A".into();
        assert!(config.validate().unwrap_err().is_config_error());

        config.barcode.prefix = "770".into();
        config.barcode.max_attempts = 0;
        assert!(config.validate().is_err());

        config.barcode.max_attempts = 5;
        config.pricing.tasa_usd = Some(-1.0);
        assert!(config.validate().is_err());

        config.pricing.tasa_usd = Some(4_000.0);
        assert!(config.validate().is_ok());

        config.lines = wayra_core::pricing::builtin_lines();
        config.lines.push(config.lines[0].clone());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_env_overrides() {
        let mut config = CatalogConfig::default();
        config.apply_overrides_from(env(&[
            (ENV_TASA_USD, "4100.25"),
            (ENV_BARCODE_PREFIX, " 770 "),
            (ENV_BARCODE_MAX_ATTEMPTS, "7"),
        ]));

        assert_eq!(config.pricing.tasa_usd, Some(4100.25));
        assert_eq!(config.barcode.prefix, "770");
        assert_eq!(config.barcode.max_attempts, 7);
    }

    #[test]
    fn test_bad_env_values_are_ignored() {
        let mut config = CatalogConfig::default();
        config.pricing.tasa_usd = Some(4_000.0);
        config.apply_overrides_from(env(&[
            (ENV_TASA_USD, "cuatro mil"),
            (ENV_BARCODE_MAX_ATTEMPTS, "-3"),
        ]));

        assert_eq!(config.pricing.tasa_usd, Some(4_000.0));
        assert_eq!(config.barcode.max_attempts, 20);
    }

    #[test]
    fn test_toml_serialization() {
        let mut config = CatalogConfig::default();
        config.pricing.tasa_usd = Some(4_000.0);
        config.lines = wayra_core::pricing::builtin_lines();

        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[pricing]"));
        assert!(toml_str.contains("[barcode]"));
        assert!(toml_str.contains("[[lines]]"));
        assert!(toml_str.contains("tipo = \"WAYRA_CALAN\""));

        let parsed: CatalogConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_save_and_load_from_path() {
        let path = std::env::temp_dir()
            .join(format!("wayra-config-{}", uuid::Uuid::new_v4()))
            .join("pricing.toml");

        let mut config = CatalogConfig::default();
        config.barcode.prefix = "770".into();
        config.save(Some(path.clone())).unwrap();

        let loaded = CatalogConfig::from_file(&path).unwrap();
        assert_eq!(loaded, config);

        if let Some(dir) = path.parent() {
            let _ = std::fs::remove_dir_all(dir);
        }
    }

    #[test]
    fn test_unreadable_file_is_load_failure() {
        let path = std::env::temp_dir().join(format!("wayra-missing-{}.toml", uuid::Uuid::new_v4()));
        let err = CatalogConfig::from_file(&path).unwrap_err();
        assert!(matches!(err, CatalogError::ConfigLoadFailed(_)));
    }

    #[test]
    fn test_broken_file_fails_load() {
        let dir = std::env::temp_dir().join(format!("wayra-broken-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();

        let malformed = dir.join("malformed.toml");
        std::fs::write(&malformed, "[barcode\nprefix = 770").unwrap();
        let err = CatalogConfig::load(Some(malformed)).unwrap_err();
        assert!(matches!(err, CatalogError::ConfigLoadFailed(_)));

        let invalid = dir.join("invalid.toml");
        std::fs::write(&invalid, "[barcode]\nmax_attempts = 0\n").unwrap();
        let err = CatalogConfig::load(Some(invalid)).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidConfig(_)));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_missing_file_loads_defaults() {
        let path = std::env::temp_dir().join(format!("wayra-absent-{}.toml", uuid::Uuid::new_v4()));
        let config = CatalogConfig::load(Some(path)).unwrap();
        assert!(config.lines.is_empty());
    }
}
