//! Free-text seller message parsing.
//!
//! Turns a raw seller message into the structured signals the decision
//! policy consumes: a candidate price, a final-offer flag, an urgency
//! score and a concession hint. Parsing is a narrow text-to-struct
//! adapter; swapping it for structured seller messages later must not
//! touch the decision component.

use once_cell::sync::Lazy;
use regex::Regex;

/// Currency-prefixed number (thousands separators allowed), or any bare
/// run of at least four digits. First match wins.
static PRICE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(?:₹|INR|Rs\.?)\s*([\d,]+)|\b(\d{4,})\b").unwrap());

static FINAL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:final|take it or leave it|last)\b").unwrap());

static URGENT_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:urgent|today|immediately)\b").unwrap());

static CONCESSION_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:come down|reduce|lower)\b").unwrap());

/// Structured signals extracted from one seller message.
///
/// Ephemeral: rebuilt from scratch each round, never persisted beyond
/// the round that produced it.
#[derive(Debug, Clone)]
pub struct Observation {
    /// Seller's quoted price, if one could be parsed.
    pub seller_price: Option<i64>,
    /// Seller declared the offer final.
    pub is_final: bool,
    /// Urgency score in [0, 1]. Two-valued (0.9 or 0.3) on purpose;
    /// keep it binary unless requirements change.
    pub urgency: f64,
    /// Seller asked the buyer to come down / reduce / lower.
    pub concession: bool,
    /// The raw message text.
    pub raw: String,
}

/// Extracts seller price, finality, urgency and concession hints from a
/// message.
#[derive(Debug, Clone, Default)]
pub struct ObservationComponent;

impl ObservationComponent {
    pub fn new() -> Self {
        Self
    }

    /// Parse a seller message into an [`Observation`].
    ///
    /// Pure function: no side effects, no dependency on prior rounds.
    /// A message with no parseable number is not an error; it simply
    /// yields an observation with no price.
    pub fn parse(&self, seller_message: &str) -> Observation {
        let seller_price = PRICE_PATTERN.captures(seller_message).and_then(|caps| {
            let num = caps.get(1).or_else(|| caps.get(2))?.as_str();
            num.replace(',', "").parse::<i64>().ok()
        });

        let is_final = FINAL_PATTERN.is_match(seller_message);
        let urgency = if is_final || URGENT_PATTERN.is_match(seller_message) {
            0.9
        } else {
            0.3
        };
        let concession = CONCESSION_PATTERN.is_match(seller_message);

        Observation {
            seller_price,
            is_final,
            urgency,
            concession,
            raw: seller_message.to_string(),
        }
    }
}
