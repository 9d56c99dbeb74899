#![deny(warnings)]

//! Daily price model for Mandi crops.
//!
//! Prices are a pure function of (base price, crop key, date):
//! - the seed is FNV-1a 64 over the UTF-8 bytes of `YYYYMMDD` followed by the
//!   crop key, so it is stable across processes and platforms
//! - a `ChaCha8Rng` seeded from it draws seasonal, demand and weather factors,
//!   in that order, each uniform around 1.0
//! - the product is floored and clamped to `[floor(base*0.6), floor(base*1.4)]`
//!
//! Appending `_tomorrow` to the key yields an independent, equally
//! reproducible value that callers use as a next-day forecast.

use chrono::{Datelike, NaiveDate};
use mandi_core::{validate_pricing_config, CropRecord, DailyPriceSample, PricingConfig, Trend};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::debug;

/// FNV-1a 64-bit offset basis.
pub const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
/// FNV-1a 64-bit prime.
pub const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Suffix appended to a crop key to derive the next-day forecast.
pub const FORECAST_SUFFIX: &str = "_tomorrow";

/// Trend threshold in percent; strictly above/below flips the label.
const TREND_THRESHOLD_PCT: i64 = 5;

/// Errors produced by the price model.
#[derive(Debug, Error, PartialEq)]
pub enum PriceError {
    /// A price argument violated its positivity precondition.
    #[error("invalid input: {arg} must be > 0, got {value}")]
    InvalidInput { arg: &'static str, value: i64 },
    /// Model configuration is out of range.
    #[error("invalid pricing config: {0}")]
    InvalidConfig(#[from] mandi_core::ValidationError),
    /// Decimal arithmetic overflowed or failed to convert back.
    #[error("non-finite numeric conversion")]
    NonFinite,
    /// The forecast day does not exist in the calendar.
    #[error("date out of range: {0}")]
    DateOutOfRange(NaiveDate),
}

/// FNV-1a 64 over a byte stream.
pub fn fnv1a64<I: IntoIterator<Item = u8>>(bytes: I) -> u64 {
    bytes.into_iter().fold(FNV_OFFSET_BASIS, |h, b| {
        (h ^ u64::from(b)).wrapping_mul(FNV_PRIME)
    })
}

/// The date as an 8-digit `YYYYMMDD` integer.
pub fn date_key(date: NaiveDate) -> i64 {
    i64::from(date.year()) * 10_000 + i64::from(date.month()) * 100 + i64::from(date.day())
}

/// Seed for a (crop key, date) pair: FNV-1a 64 of `YYYYMMDD` + key.
pub fn seed_for(crop_key: &str, date: NaiveDate) -> u64 {
    let day = date_key(date).to_string();
    fnv1a64(day.bytes().chain(crop_key.bytes()))
}

fn require_positive(arg: &'static str, value: i64) -> Result<(), PriceError> {
    if value <= 0 {
        return Err(PriceError::InvalidInput { arg, value });
    }
    Ok(())
}

fn floor_scaled(base: i64, ratio: Decimal) -> Result<i64, PriceError> {
    Decimal::from(base)
        .checked_mul(ratio)
        .ok_or(PriceError::NonFinite)?
        .floor()
        .to_i64()
        .ok_or(PriceError::NonFinite)
}

fn draw_factor(rng: &mut ChaCha8Rng, spread: f64) -> f64 {
    rng.gen_range(1.0 - spread..=1.0 + spread)
}

/// Deterministic price model parameterized by a [`PricingConfig`].
#[derive(Clone, Debug, Default)]
pub struct PriceSimulator {
    config: PricingConfig,
}

impl PriceSimulator {
    pub fn new(config: PricingConfig) -> Result<Self, PriceError> {
        validate_pricing_config(&config)?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &PricingConfig {
        &self.config
    }

    /// Inclusive clamp bounds for `base_price`.
    pub fn bounds(&self, base_price: i64) -> Result<(i64, i64), PriceError> {
        require_positive("base_price", base_price)?;
        Ok((
            floor_scaled(base_price, self.config.floor_ratio)?,
            floor_scaled(base_price, self.config.ceil_ratio)?,
        ))
    }

    /// Current price for `crop_key` on `date`.
    pub fn daily_price(
        &self,
        base_price: i64,
        crop_key: &str,
        date: NaiveDate,
    ) -> Result<i64, PriceError> {
        let (lo, hi) = self.bounds(base_price)?;
        let seed = seed_for(crop_key, date);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let seasonal = draw_factor(&mut rng, self.config.seasonal_spread);
        let demand = draw_factor(&mut rng, self.config.demand_spread);
        let weather = draw_factor(&mut rng, self.config.weather_spread);
        let raw = (base_price as f64 * seasonal * demand * weather).floor();
        if !raw.is_finite() {
            return Err(PriceError::NonFinite);
        }
        // `as` saturates, and the clamp bounds are exact.
        let price = (raw as i64).clamp(lo, hi);
        debug!(crop = crop_key, %date, seed, base_price, price, "daily price");
        Ok(price)
    }

    /// Price and trend for a catalog crop.
    pub fn daily_sample(
        &self,
        crop: &CropRecord,
        date: NaiveDate,
    ) -> Result<DailyPriceSample, PriceError> {
        let current_price = self.daily_price(crop.base_price, &crop.name, date)?;
        Ok(DailyPriceSample {
            crop: crop.name.clone(),
            date,
            current_price,
            trend: classify_trend(crop.base_price, current_price)?,
        })
    }

    /// Next-day forecast for a crop, computed on `date` from the
    /// `_tomorrow` key and labeled with the following day.
    pub fn forecast_next(
        &self,
        crop: &CropRecord,
        date: NaiveDate,
    ) -> Result<DailyPriceSample, PriceError> {
        let next = date.succ_opt().ok_or(PriceError::DateOutOfRange(date))?;
        let key = format!("{}{}", crop.name, FORECAST_SUFFIX);
        let current_price = self.daily_price(crop.base_price, &key, date)?;
        Ok(DailyPriceSample {
            crop: crop.name.clone(),
            date: next,
            current_price,
            trend: classify_trend(crop.base_price, current_price)?,
        })
    }
}

/// Current price with the default model.
pub fn compute_daily_price(
    base_price: i64,
    crop_key: &str,
    date: NaiveDate,
) -> Result<i64, PriceError> {
    PriceSimulator::default().daily_price(base_price, crop_key, date)
}

/// Classify `current_price` against `base_price`. Exactly ±5% is Stable.
pub fn classify_trend(base_price: i64, current_price: i64) -> Result<Trend, PriceError> {
    require_positive("base_price", base_price)?;
    let base = Decimal::from(base_price);
    let pct = (Decimal::from(current_price) - base) / base * Decimal::ONE_HUNDRED;
    let threshold = Decimal::from(TREND_THRESHOLD_PCT);
    Ok(if pct > threshold {
        Trend::Up
    } else if pct < -threshold {
        Trend::Down
    } else {
        Trend::Stable
    })
}

/// Price and trend for a catalog crop with the default model.
pub fn daily_sample(crop: &CropRecord, date: NaiveDate) -> Result<DailyPriceSample, PriceError> {
    PriceSimulator::default().daily_sample(crop, date)
}

/// Next-day forecast with the default model.
pub fn forecast_next(crop: &CropRecord, date: NaiveDate) -> Result<DailyPriceSample, PriceError> {
    PriceSimulator::default().forecast_next(crop, date)
}
