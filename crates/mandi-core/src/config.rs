//! YAML configuration: crop table plus model tuning.

use crate::catalog::{builtin_crops, CatalogError, CropCatalog};
use crate::{
    validate_negotiation_config, validate_pricing_config, CropRecord, NegotiationConfig,
    PricingConfig,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

/// Top-level configuration injected into the pricing and negotiation layers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MandiConfig {
    #[serde(default = "builtin_crops")]
    pub crops: Vec<CropRecord>,
    #[serde(default)]
    pub pricing: PricingConfig,
    #[serde(default)]
    pub negotiation: NegotiationConfig,
    /// Language code used when the caller does not pick one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_language: Option<String>,
}

impl Default for MandiConfig {
    fn default() -> Self {
        Self {
            crops: builtin_crops(),
            pricing: PricingConfig::default(),
            negotiation: NegotiationConfig::default(),
            default_language: None,
        }
    }
}

impl MandiConfig {
    /// Validate everything and build the catalog.
    pub fn catalog(&self) -> Result<CropCatalog, CatalogError> {
        validate_pricing_config(&self.pricing)?;
        validate_negotiation_config(&self.negotiation)?;
        Ok(CropCatalog::new(self.crops.clone())?)
    }
}

/// Parse and validate a YAML document.
pub fn parse_config(text: &str) -> Result<MandiConfig, CatalogError> {
    let cfg: MandiConfig = serde_yaml::from_str(text)?;
    cfg.catalog()?;
    Ok(cfg)
}

/// Read a YAML config file from disk.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<MandiConfig, CatalogError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    let cfg = parse_config(&text)?;
    info!(path = %path.display(), crops = cfg.crops.len(), "loaded config");
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DemandLevel, ValidationError};
    use rust_decimal::Decimal;
    use std::path::PathBuf;

    #[test]
    fn empty_document_uses_builtin_table() {
        let cfg = parse_config("{}").unwrap();
        assert_eq!(cfg, MandiConfig::default());
        assert_eq!(cfg.catalog().unwrap().len(), 15);
    }

    #[test]
    fn custom_crops_and_margin() {
        let yaml = r#"
crops:
  - name: Mango
    base_price: 90
    demand: high
  - name: Jackfruit
    base_price: 45
negotiation:
  margin: "0.05"
default_language: hi
"#;
        let cfg = parse_config(yaml).unwrap();
        assert_eq!(cfg.crops.len(), 2);
        assert_eq!(cfg.crops[0].demand, Some(DemandLevel::High));
        assert_eq!(cfg.crops[1].demand, None);
        assert_eq!(cfg.negotiation.margin, Decimal::new(5, 2));
        assert_eq!(cfg.pricing, PricingConfig::default());
        assert_eq!(cfg.default_language.as_deref(), Some("hi"));
    }

    #[test]
    fn invalid_documents_are_rejected() {
        let dup = "crops:\n  - {name: Rice, base_price: 28}\n  - {name: RICE, base_price: 29}\n";
        assert!(matches!(
            parse_config(dup),
            Err(CatalogError::Invalid(ValidationError::DuplicateCrop(_)))
        ));
        let margin = "negotiation:\n  margin: \"1.5\"\n";
        assert!(matches!(
            parse_config(margin),
            Err(CatalogError::Invalid(ValidationError::InvalidMargin(_)))
        ));
        assert!(matches!(
            parse_config("crops: 7"),
            Err(CatalogError::Parse(_))
        ));
    }

    #[test]
    fn yaml_roundtrip() {
        let cfg = MandiConfig::default();
        let text = serde_yaml::to_string(&cfg).unwrap();
        assert_eq!(parse_config(&text).unwrap(), cfg);
    }

    #[test]
    fn bundled_asset_matches_builtin() {
        let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../assets/crops.yaml");
        let cfg = load_config(&path).unwrap();
        assert_eq!(cfg.catalog().unwrap(), CropCatalog::builtin());
        assert_eq!(cfg.negotiation, NegotiationConfig::default());
    }

    #[test]
    fn missing_file_is_io_error() {
        assert!(matches!(
            load_config("/nonexistent/mandi.yaml"),
            Err(CatalogError::Io(_))
        ));
    }
}
