//! Product record describing the goods under negotiation.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A lot of goods being negotiated over.
///
/// Created once per negotiation session and never mutated by the agent.
/// Prices are plain integers in a single implicit currency unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Display name, e.g. "Alphonso Mangoes".
    pub name: String,
    /// Product category, e.g. "Mangoes".
    pub category: String,
    /// Quantity in the lot.
    pub quantity: u32,
    /// Ordinal quality grade ("A" > "B" > ...).
    pub quality_grade: String,
    /// Region of origin.
    pub origin: String,
    /// Reference market price for the lot. Always positive.
    pub base_market_price: i64,
    /// Free-form attribute flags, e.g. `{"export_grade": true}`.
    #[serde(default)]
    pub attributes: HashMap<String, Value>,
}

impl Product {
    /// Whether the lot is flagged export grade.
    ///
    /// Any truthy `export_grade` attribute counts; a missing or false
    /// flag does not.
    pub fn is_export_grade(&self) -> bool {
        self.attributes
            .get("export_grade")
            .map(|v| v.as_bool().unwrap_or(false))
            .unwrap_or(false)
    }
}
