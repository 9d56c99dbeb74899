#![deny(warnings)]

//! Single-shot price negotiation.
//!
//! An offer at or above market is locked in. An offer within the margin
//! below market is accepted for instant payment. Anything lower is rejected
//! with a counter-offer at the minimum acceptable price,
//! `floor(market * (1 - margin))`.

use mandi_core::{
    validate_negotiation_config, Decision, NegotiationConfig, NegotiationOutcome, Offer,
};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::debug;

/// Errors produced by the negotiation rule.
#[derive(Debug, Error, PartialEq)]
pub enum NegotiationError {
    /// A price argument violated its positivity precondition.
    #[error("invalid input: {arg} must be > 0, got {value}")]
    InvalidInput { arg: &'static str, value: i64 },
    #[error("invalid negotiation config: {0}")]
    InvalidConfig(#[from] mandi_core::ValidationError),
    #[error("non-finite numeric conversion")]
    NonFinite,
}

/// Accept/reject rule with a fixed margin below market.
#[derive(Clone, Debug)]
pub struct Negotiator {
    margin: Decimal,
}

impl Default for Negotiator {
    fn default() -> Self {
        Self {
            margin: NegotiationConfig::default().margin,
        }
    }
}

impl Negotiator {
    pub fn new(config: &NegotiationConfig) -> Result<Self, NegotiationError> {
        validate_negotiation_config(config)?;
        Ok(Self {
            margin: config.margin,
        })
    }

    pub fn margin(&self) -> Decimal {
        self.margin
    }

    /// Lowest price still accepted; also the counter-offer on rejection.
    pub fn min_acceptable(&self, market_price: i64) -> Result<i64, NegotiationError> {
        if market_price <= 0 {
            return Err(NegotiationError::InvalidInput {
                arg: "market_price",
                value: market_price,
            });
        }
        Decimal::from(market_price)
            .checked_mul(Decimal::ONE - self.margin)
            .ok_or(NegotiationError::NonFinite)?
            .floor()
            .to_i64()
            .ok_or(NegotiationError::NonFinite)
    }

    pub fn negotiate(
        &self,
        offer_price: i64,
        market_price: i64,
    ) -> Result<NegotiationOutcome, NegotiationError> {
        let min = self.min_acceptable(market_price)?;
        if offer_price <= 0 {
            return Err(NegotiationError::InvalidInput {
                arg: "offer_price",
                value: offer_price,
            });
        }
        let outcome = if offer_price >= market_price {
            NegotiationOutcome {
                decision: Decision::Accept,
                settled_or_counter_price: offer_price,
                message: format!(
                    "Great! Locking price at ₹{offer_price}. (Market avg: ₹{market_price})"
                ),
            }
        } else if offer_price >= min {
            NegotiationOutcome {
                decision: Decision::Accept,
                settled_or_counter_price: offer_price,
                message: format!(
                    "It's slightly below market, but we accept ₹{offer_price} for instant payment."
                ),
            }
        } else {
            NegotiationOutcome {
                decision: Decision::Reject,
                settled_or_counter_price: min,
                message: format!(
                    "Too low. Market is at ₹{market_price}. Best we can do is ₹{min}."
                ),
            }
        };
        debug!(
            offer_price,
            market_price,
            min_acceptable = min,
            decision = ?outcome.decision,
            "negotiated"
        );
        Ok(outcome)
    }

    /// Decide on a full [`Offer`].
    pub fn evaluate(&self, offer: &Offer) -> Result<NegotiationOutcome, NegotiationError> {
        debug!(crop = %offer.crop, "evaluating offer");
        self.negotiate(offer.buyer_price, offer.market_price)
    }
}

/// Negotiate with the default 10% margin.
pub fn negotiate(
    offer_price: i64,
    market_price: i64,
) -> Result<NegotiationOutcome, NegotiationError> {
    Negotiator::default().negotiate(offer_price, market_price)
}
