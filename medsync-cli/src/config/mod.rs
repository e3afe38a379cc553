//! Import configuration
//!
//! Every section has defaults, so an empty file (or no file at all) is a
//! valid configuration.

mod loader;

pub use loader::{CONFIG_ENV_VAR, ConfigSource, LoadedConfig, default_config_path, load_config};

use std::collections::BTreeMap;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::ingest::coerce::NumericFallback;
use crate::ingest::header::HeaderStrategy;
use crate::ingest::identifier::{IdentifierPolicy, MAX_ID_LENGTH_LIMIT};
use crate::ingest::mapping::Concept;

/// Complete import configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub header: HeaderConfig,
    pub values: ValuesConfig,
    pub identifier: IdentifierPolicy,
    /// Extra exact header aliases per concept, checked before the built-in rules
    pub aliases: BTreeMap<Concept, Vec<String>>,
}

/// Header row detection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HeaderConfig {
    /// How many leading rows are considered
    pub scan_rows: usize,
    pub strategy: HeaderStrategy,
    /// Keyword hits needed for a row to count as the header
    pub min_keyword_matches: usize,
}

/// Value coercion
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ValuesConfig {
    pub numeric_fallback: NumericFallback,
}

impl Default for HeaderConfig {
    fn default() -> Self {
        Self {
            scan_rows: 20,
            strategy: HeaderStrategy::Auto,
            min_keyword_matches: 2,
        }
    }
}

impl Config {
    /// Parse a TOML document and validate it
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Render as TOML
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Reject values the engine cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.header.scan_rows == 0 {
            anyhow::bail!("header.scan_rows must be at least 1");
        }
        if self.header.min_keyword_matches == 0 {
            anyhow::bail!("header.min_keyword_matches must be at least 1");
        }
        let max_length = self.identifier.max_length;
        if !(1..=MAX_ID_LENGTH_LIMIT).contains(&max_length) {
            anyhow::bail!(
                "identifier.max_length must be between 1 and {}, got {}",
                MAX_ID_LENGTH_LIMIT,
                max_length
            );
        }
        for (concept, labels) in &self.aliases {
            if labels.iter().any(|label| label.trim().is_empty()) {
                anyhow::bail!("aliases.{} contains an empty label", concept.name());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_gives_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.header.scan_rows, 20);
        assert_eq!(config.identifier.max_length, 150);
        assert!(config.identifier.pmbi_prefer_code);
        assert_eq!(config.values.numeric_fallback, NumericFallback::Original);
    }

    #[test]
    fn test_full_document() {
        let config = Config::from_toml(
            r#"
            [header]
            scan_rows = 10
            strategy = "text-density"

            [values]
            numeric_fallback = "zero"

            [identifier]
            max_length = 200
            pmbi_prefer_code = false

            [aliases]
            quantity = ["Bal. Qty", "Closing"]
            expiry = ["Use Before"]
            "#,
        )
        .unwrap();

        assert_eq!(config.header.scan_rows, 10);
        assert_eq!(config.header.strategy, HeaderStrategy::TextDensity);
        assert_eq!(config.header.min_keyword_matches, 2);
        assert_eq!(config.values.numeric_fallback, NumericFallback::Zero);
        assert_eq!(config.identifier.max_length, 200);
        assert!(!config.identifier.pmbi_prefer_code);
        assert_eq!(config.aliases[&Concept::Quantity].len(), 2);
        assert_eq!(config.aliases[&Concept::Expiry], vec!["Use Before".to_string()]);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(Config::from_toml("[identifier]\nmax_length = 0").is_err());
        assert!(Config::from_toml("[identifier]\nmax_length = 201").is_err());
        assert!(Config::from_toml("[header]\nscan_rows = 0").is_err());
        assert!(Config::from_toml("[values]\nnumeric_fallback = \"nan\"").is_err());
        assert!(Config::from_toml("[aliases]\nvolume = [\"Vol\"]").is_err());
        assert!(Config::from_toml("[aliases]\nmoney = [\" \"]").is_err());
        assert!(Config::from_toml("[header]\nrows = 5").is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let mut config = Config::default();
        config
            .aliases
            .insert(Concept::Money, vec!["Selling Price".to_string()]);
        let rendered = config.to_toml().unwrap();
        assert_eq!(Config::from_toml(&rendered).unwrap(), config);
    }
}
