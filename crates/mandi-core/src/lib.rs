#![deny(warnings)]

//! Core domain models and invariants for the Mandi marketplace.
//!
//! This crate defines the serializable types shared by the pricing and
//! negotiation crates, plus validation helpers, the immutable crop catalog
//! and YAML configuration loading.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;
use thiserror::Error;

mod catalog;
mod config;

pub use catalog::{CatalogError, CropCatalog};
pub use config::{load_config, parse_config, MandiConfig};

/// Offer bounds enforced by callers before reaching the negotiation rule.
pub const OFFER_RANGE: RangeInclusive<i64> = 1..=200;

/// Buyer demand label shown next to a crop's price.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DemandLevel {
    High,
    Medium,
    Low,
}

impl fmt::Display for DemandLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DemandLevel::High => "HIGH",
            DemandLevel::Medium => "MEDIUM",
            DemandLevel::Low => "LOW",
        };
        f.write_str(s)
    }
}

/// Static reference data for one crop.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropRecord {
    /// Display name, unique within a catalog (case-insensitive).
    pub name: String,
    /// Reference price in currency units per kg (> 0).
    pub base_price: i64,
    /// Optional demand label; display only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub demand: Option<DemandLevel>,
}

impl CropRecord {
    pub fn new(name: impl Into<String>, base_price: i64) -> Self {
        Self {
            name: name.into(),
            base_price,
            demand: None,
        }
    }

    pub fn with_demand(mut self, demand: DemandLevel) -> Self {
        self.demand = Some(demand);
        self
    }
}

/// Direction of the current price relative to the base price.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Stable,
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Trend::Up => "UP",
            Trend::Down => "DOWN",
            Trend::Stable => "STABLE",
        };
        f.write_str(s)
    }
}

/// Derived price for a crop on a given day. Never stored.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyPriceSample {
    pub crop: String,
    pub date: NaiveDate,
    pub current_price: i64,
    pub trend: Trend,
}

/// A buyer's offer against the current market price.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Offer {
    pub crop: String,
    pub buyer_price: i64,
    pub market_price: i64,
}

/// Terminal outcome of a single negotiation step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Accept,
    Reject,
}

impl Decision {
    pub fn is_accepted(self) -> bool {
        matches!(self, Decision::Accept)
    }
}

/// Result of a negotiation: the decision, the settled price (on accept) or
/// the counter-offer (on reject), and an English message.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NegotiationOutcome {
    pub decision: Decision,
    pub settled_or_counter_price: i64,
    pub message: String,
}

/// Spreads and clamp ratios for the daily price model.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    /// Half-width of the seasonal factor around 1.0.
    pub seasonal_spread: f64,
    /// Half-width of the demand factor around 1.0.
    pub demand_spread: f64,
    /// Half-width of the weather factor around 1.0.
    pub weather_spread: f64,
    /// Lowest price as a fraction of base price.
    pub floor_ratio: Decimal,
    /// Highest price as a fraction of base price.
    pub ceil_ratio: Decimal,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            seasonal_spread: 0.15,
            demand_spread: 0.10,
            weather_spread: 0.125,
            floor_ratio: Decimal::new(6, 1),
            ceil_ratio: Decimal::new(14, 1),
        }
    }
}

/// Negotiation tolerance below market price.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NegotiationConfig {
    /// Fraction of market price a buyer may undercut, in [0, 1).
    pub margin: Decimal,
}

impl Default for NegotiationConfig {
    fn default() -> Self {
        Self {
            margin: Decimal::new(10, 2),
        }
    }
}

/// Validation errors for domain invariants.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    /// Crop name is blank.
    #[error("crop name must not be empty")]
    EmptyName,
    /// Base price must be strictly positive.
    #[error("base price for {name} must be > 0, got {price}")]
    NonPositivePrice { name: String, price: i64 },
    /// Two crops share a name (case-insensitive).
    #[error("duplicate crop: {0}")]
    DuplicateCrop(String),
    /// Factor spread must be finite and within [0, 1).
    #[error("factor spread must be within [0,1), got {0}")]
    InvalidSpread(f64),
    /// Clamp ratios must satisfy 0 < floor <= 1 <= ceil.
    #[error("invalid clamp ratios: floor {floor}, ceil {ceil}")]
    InvalidClampRatio { floor: Decimal, ceil: Decimal },
    /// Negotiation margin must be within [0, 1).
    #[error("negotiation margin must be within [0,1), got {0}")]
    InvalidMargin(Decimal),
    /// Offer outside the accepted input range.
    #[error("offer {0} is outside the accepted range [1, 200]")]
    OfferOutOfRange(i64),
}

/// Validate a single crop record.
pub fn validate_crop(c: &CropRecord) -> Result<(), ValidationError> {
    if c.name.trim().is_empty() {
        return Err(ValidationError::EmptyName);
    }
    if c.base_price <= 0 {
        return Err(ValidationError::NonPositivePrice {
            name: c.name.clone(),
            price: c.base_price,
        });
    }
    Ok(())
}

/// Validate pricing spreads and clamp ratios.
pub fn validate_pricing_config(p: &PricingConfig) -> Result<(), ValidationError> {
    for spread in [p.seasonal_spread, p.demand_spread, p.weather_spread] {
        if !spread.is_finite() || !(0.0..1.0).contains(&spread) {
            return Err(ValidationError::InvalidSpread(spread));
        }
    }
    if p.floor_ratio <= Decimal::ZERO || p.floor_ratio > Decimal::ONE || p.ceil_ratio < Decimal::ONE
    {
        return Err(ValidationError::InvalidClampRatio {
            floor: p.floor_ratio,
            ceil: p.ceil_ratio,
        });
    }
    Ok(())
}

/// Validate the negotiation margin.
pub fn validate_negotiation_config(n: &NegotiationConfig) -> Result<(), ValidationError> {
    if n.margin < Decimal::ZERO || n.margin >= Decimal::ONE {
        return Err(ValidationError::InvalidMargin(n.margin));
    }
    Ok(())
}

/// Check a user-entered offer against [`OFFER_RANGE`].
pub fn validate_offer_input(offer: i64) -> Result<i64, ValidationError> {
    if OFFER_RANGE.contains(&offer) {
        Ok(offer)
    } else {
        Err(ValidationError::OfferOutOfRange(offer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn serde_roundtrip_crop_record() {
        let c = CropRecord::new("Okra", 40).with_demand(DemandLevel::High);
        let s = serde_json::to_string(&c).unwrap();
        assert!(s.contains("\"demand\":\"high\""));
        let back: CropRecord = serde_json::from_str(&s).unwrap();
        assert_eq!(back, c);
    }

    #[test]
    fn crop_without_demand_omits_field() {
        let s = serde_json::to_string(&CropRecord::new("Okra", 40)).unwrap();
        assert!(!s.contains("demand"));
    }

    #[test]
    fn crop_validation() {
        assert!(validate_crop(&CropRecord::new("Rice", 28)).is_ok());
        assert_eq!(
            validate_crop(&CropRecord::new("  ", 28)),
            Err(ValidationError::EmptyName)
        );
        assert_eq!(
            validate_crop(&CropRecord::new("Rice", 0)),
            Err(ValidationError::NonPositivePrice {
                name: "Rice".into(),
                price: 0
            })
        );
    }

    #[test]
    fn default_configs_are_valid() {
        validate_pricing_config(&PricingConfig::default()).unwrap();
        validate_negotiation_config(&NegotiationConfig::default()).unwrap();
    }

    #[test]
    fn pricing_config_rejects_bad_values() {
        let mut p = PricingConfig {
            seasonal_spread: 1.0,
            ..PricingConfig::default()
        };
        assert_eq!(
            validate_pricing_config(&p),
            Err(ValidationError::InvalidSpread(1.0))
        );
        p.seasonal_spread = f64::NAN;
        assert!(validate_pricing_config(&p).is_err());
        p = PricingConfig {
            floor_ratio: Decimal::new(11, 1),
            ..PricingConfig::default()
        };
        assert!(matches!(
            validate_pricing_config(&p),
            Err(ValidationError::InvalidClampRatio { .. })
        ));
        p = PricingConfig {
            ceil_ratio: Decimal::new(9, 1),
            ..PricingConfig::default()
        };
        assert!(validate_pricing_config(&p).is_err());
    }

    #[test]
    fn margin_must_be_below_one() {
        let n = NegotiationConfig {
            margin: Decimal::ONE,
        };
        assert_eq!(
            validate_negotiation_config(&n),
            Err(ValidationError::InvalidMargin(Decimal::ONE))
        );
        let n = NegotiationConfig {
            margin: Decimal::new(-1, 2),
        };
        assert!(validate_negotiation_config(&n).is_err());
    }

    #[test]
    fn offer_range_edges() {
        assert_eq!(validate_offer_input(1), Ok(1));
        assert_eq!(validate_offer_input(200), Ok(200));
        assert_eq!(
            validate_offer_input(0),
            Err(ValidationError::OfferOutOfRange(0))
        );
        assert!(validate_offer_input(201).is_err());
    }

    #[test]
    fn labels_render_uppercase() {
        assert_eq!(Trend::Up.to_string(), "UP");
        assert_eq!(DemandLevel::Medium.to_string(), "MEDIUM");
        assert!(Decision::Accept.is_accepted());
        assert!(!Decision::Reject.is_accepted());
    }

    proptest! {
        #[test]
        fn positive_prices_validate(price in 1i64..1_000_000) {
            prop_assert!(validate_crop(&CropRecord::new("Garlic", price)).is_ok());
        }

        #[test]
        fn non_positive_prices_fail(price in -1_000_000i64..=0) {
            prop_assert!(validate_crop(&CropRecord::new("Garlic", price)).is_err());
        }
    }
}
