//! # CLI Configuration
//!
//! Pricing policy and currency display settings.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     VOLTAJE_PRICING_MODE=per-line                                      │
//! │     VOLTAJE_COST_FALLBACK_RATIO=0.65                                   │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     --config <path>, or                                                │
//! │     ~/.config/voltaje-erp/voltaje.toml (Linux)                         │
//! │     ~/Library/Application Support/co.voltaje.voltaje-erp/ (macOS)      │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     quote-level mode, 70% cost fallback, COP formatting                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [pricing]
//! default_mode = "quote_level_aiu"   # quote_level_aiu | per_line_aiu
//! cost_fallback = true               # false: per-line lines need a supplier cost
//! cost_fallback_ratio = "0.70"
//!
//! [currency]
//! symbol = "$"
//! thousands_separator = "."
//! decimal_separator = ","
//! decimals = 0
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use voltaje_core::validation::validate_ratio;
use voltaje_core::{CostFallback, CurrencyFormat, PricingMode, PricingPolicy, DEFAULT_COST_FALLBACK_RATIO};

use crate::error::{CliError, CliResult};

/// Maximum fractional digits shown for money.
const MAX_DISPLAY_DECIMALS: u32 = 6;

// =============================================================================
// Pricing Settings
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingSettings {
    /// Mode used when neither the document nor `--mode` names one.
    #[serde(default)]
    pub default_mode: PricingMode,

    /// Whether per-line pricing may estimate a missing supplier cost.
    #[serde(default = "default_true")]
    pub cost_fallback: bool,

    /// Share of the sale price used as the estimated cost.
    #[serde(default = "default_fallback_ratio")]
    pub cost_fallback_ratio: Decimal,
}

fn default_true() -> bool {
    true
}

fn default_fallback_ratio() -> Decimal {
    DEFAULT_COST_FALLBACK_RATIO
}

impl Default for PricingSettings {
    fn default() -> Self {
        PricingSettings {
            default_mode: PricingMode::default(),
            cost_fallback: true,
            cost_fallback_ratio: default_fallback_ratio(),
        }
    }
}

impl PricingSettings {
    pub fn policy(&self) -> PricingPolicy {
        PricingPolicy {
            cost_fallback: if self.cost_fallback {
                CostFallback::SalePriceRatio(self.cost_fallback_ratio)
            } else {
                CostFallback::Disabled
            },
        }
    }
}

// =============================================================================
// Currency Settings
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrencySettings {
    #[serde(default = "default_symbol")]
    pub symbol: String,
    #[serde(default = "default_thousands")]
    pub thousands_separator: char,
    #[serde(default = "default_decimal_separator")]
    pub decimal_separator: char,
    #[serde(default)]
    pub decimals: u32,
}

fn default_symbol() -> String {
    "$".to_string()
}
fn default_thousands() -> char {
    '.'
}
fn default_decimal_separator() -> char {
    ','
}

impl Default for CurrencySettings {
    fn default() -> Self {
        CurrencySettings {
            symbol: default_symbol(),
            thousands_separator: default_thousands(),
            decimal_separator: default_decimal_separator(),
            decimals: 0,
        }
    }
}

impl CurrencySettings {
    pub fn format(&self) -> CurrencyFormat {
        CurrencyFormat::new(
            self.symbol.clone(),
            self.thousands_separator,
            self.decimal_separator,
            self.decimals,
        )
    }
}

// =============================================================================
// App Configuration
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub pricing: PricingSettings,
    #[serde(default)]
    pub currency: CurrencySettings,
}

impl AppConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (explicit path must exist; the default one may not)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> CliResult<Self> {
        let explicit = config_path.is_some();
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading config from file");
                config = Self::from_file(&path)?;
            } else if explicit {
                return Err(CliError::Config(format!(
                    "config file {} does not exist",
                    path.display()
                )));
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> CliResult<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| CliError::Config(format!("cannot read {}: {}", path.display(), e)))?;
        Ok(toml::from_str(&contents)?)
    }

    pub fn validate(&self) -> CliResult<()> {
        validate_ratio("cost_fallback_ratio", self.pricing.cost_fallback_ratio)?;

        if self.currency.decimals > MAX_DISPLAY_DECIMALS {
            return Err(CliError::Config(format!(
                "currency decimals must be at most {}, got {}",
                MAX_DISPLAY_DECIMALS, self.currency.decimals
            )));
        }
        if self.currency.thousands_separator == self.currency.decimal_separator {
            return Err(CliError::Config(
                "thousands and decimal separators must differ".into(),
            ));
        }
        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies `VOLTAJE_*` overrides read through `lookup`.
    ///
    /// Unparseable values are logged and ignored.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(mode) = lookup("VOLTAJE_PRICING_MODE") {
            match mode.parse::<PricingMode>() {
                Ok(parsed) => {
                    debug!(mode = %parsed, "Overriding pricing mode from environment");
                    self.pricing.default_mode = parsed;
                }
                Err(_) => warn!(mode = %mode, "Unknown pricing mode in environment"),
            }
        }

        if let Some(flag) = lookup("VOLTAJE_COST_FALLBACK") {
            match flag.to_lowercase().as_str() {
                "1" | "true" | "on" => self.pricing.cost_fallback = true,
                "0" | "false" | "off" | "disabled" => self.pricing.cost_fallback = false,
                _ => warn!(value = %flag, "Unknown VOLTAJE_COST_FALLBACK value"),
            }
        }

        if let Some(ratio) = lookup("VOLTAJE_COST_FALLBACK_RATIO") {
            match ratio.parse::<Decimal>() {
                Ok(parsed) => {
                    debug!(ratio = %parsed, "Overriding cost fallback ratio from environment");
                    self.pricing.cost_fallback_ratio = parsed;
                }
                Err(_) => warn!(ratio = %ratio, "Invalid VOLTAJE_COST_FALLBACK_RATIO"),
            }
        }

        if let Some(symbol) = lookup("VOLTAJE_CURRENCY_SYMBOL") {
            self.currency.symbol = symbol;
        }

        if let Some(decimals) = lookup("VOLTAJE_CURRENCY_DECIMALS") {
            match decimals.parse::<u32>() {
                Ok(parsed) => {
                    debug!(decimals = parsed, "Overriding currency decimals from environment");
                    self.currency.decimals = parsed;
                }
                Err(_) => warn!(decimals = %decimals, "Invalid VOLTAJE_CURRENCY_DECIMALS"),
            }
        }
    }

    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("co", "voltaje", "voltaje-erp")
            .map(|dirs| dirs.config_dir().join("voltaje.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    fn temp_config(contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("voltaje-{}.toml", uuid::Uuid::new_v4()));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.pricing.default_mode, PricingMode::QuoteLevelAiu);
        assert_eq!(config.pricing.policy(), PricingPolicy::default());
        assert_eq!(config.currency.format(), CurrencyFormat::cop());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [pricing]
            default_mode = "per_line_aiu"
            "#,
        )
        .unwrap();
        assert_eq!(config.pricing.default_mode, PricingMode::PerLineAiu);
        assert!(config.pricing.cost_fallback);
        assert_eq!(config.currency, CurrencySettings::default());
    }

    #[test]
    fn test_precedence_defaults_file_env() {
        let path = temp_config(
            r#"
            [pricing]
            cost_fallback_ratio = "0.60"

            [currency]
            symbol = "COP"
            "#,
        );

        let from_file = AppConfig::load(Some(path.clone())).unwrap();
        assert_eq!(from_file.pricing.cost_fallback_ratio, dec!(0.60));
        assert_eq!(from_file.currency.symbol, "COP");

        let mut overridden = AppConfig::from_file(&path).unwrap();
        let vars = env(&[
            ("VOLTAJE_COST_FALLBACK_RATIO", "0.5"),
            ("VOLTAJE_PRICING_MODE", "per-line"),
        ]);
        overridden.apply_overrides(|k| vars.get(k).cloned());
        assert_eq!(overridden.pricing.cost_fallback_ratio, dec!(0.5));
        assert_eq!(overridden.pricing.default_mode, PricingMode::PerLineAiu);
        // Untouched by the environment
        assert_eq!(overridden.currency.symbol, "COP");

        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_bad_env_values_are_ignored() {
        let mut config = AppConfig::default();
        let vars = env(&[
            ("VOLTAJE_PRICING_MODE", "whatever"),
            ("VOLTAJE_COST_FALLBACK_RATIO", "lots"),
            ("VOLTAJE_CURRENCY_DECIMALS", "two"),
        ]);
        config.apply_overrides(|k| vars.get(k).cloned());
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_currency_overrides() {
        let mut config = AppConfig::default();
        let vars = env(&[
            ("VOLTAJE_CURRENCY_SYMBOL", "COP"),
            ("VOLTAJE_CURRENCY_DECIMALS", "2"),
        ]);
        config.apply_overrides(|k| vars.get(k).cloned());
        assert_eq!(config.currency.symbol, "COP");
        assert_eq!(config.currency.decimals, 2);

        let vars = env(&[("VOLTAJE_CURRENCY_DECIMALS", "-1")]);
        config.apply_overrides(|k| vars.get(k).cloned());
        assert_eq!(config.currency.decimals, 2);
    }

    #[test]
    fn test_fallback_can_be_disabled() {
        let mut config = AppConfig::default();
        let vars = env(&[("VOLTAJE_COST_FALLBACK", "off")]);
        config.apply_overrides(|k| vars.get(k).cloned());
        assert_eq!(config.pricing.policy(), PricingPolicy::strict());
    }

    #[test]
    fn test_validation() {
        let mut config = AppConfig::default();
        config.pricing.cost_fallback_ratio = dec!(1.5);
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.currency.thousands_separator = ',';
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let path = std::env::temp_dir().join("voltaje-does-not-exist.toml");
        assert!(matches!(
            AppConfig::load(Some(path)),
            Err(CliError::Config(_))
        ));
    }
}
