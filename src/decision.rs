//! Negotiation decision policy.
//!
//! The core of the agent: turns (product, budget, observation, round)
//! into an accept/counter decision. Deliberately a pure function of its
//! arguments; conversation memory is a side-log the policy never reads,
//! and only the round number carries history. An aggressive strategy:
//! low anchor, band-based concessions, larger jumps near the deadline.

use serde::{Deserialize, Serialize};

use crate::observation::Observation;
use crate::product::Product;

/// Outcome of a negotiation round.
///
/// `Rejected` and `Timeout` are reserved for future policy extensions;
/// the current policy never emits them, but callers must still handle
/// them defensively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DealStatus {
    Ongoing,
    Accepted,
    Rejected,
    Timeout,
}

/// Numeric strategy tunables, loaded once per session from the persona.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategyConfig {
    /// Opening-band concession, as a fraction of base market price.
    pub opening_pct: f64,
    /// Mid-band concession fraction (rounds 4-7).
    pub mid_pct: f64,
    /// Late-band concession fraction (rounds 8+).
    pub late_pct: f64,
    /// Round index from which deadline pressure applies.
    pub final_round: u32,
    /// Fraction of budget below which a declared final price is still
    /// acceptable.
    pub walkaway_threshold_pct: f64,
    /// Maximum rounds a match driver should run.
    pub max_rounds: u32,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            opening_pct: 0.65,
            mid_pct: 0.80,
            late_pct: 0.95,
            final_round: 9,
            walkaway_threshold_pct: 0.98,
            max_rounds: 10,
        }
    }
}

/// The decision policy with its tunables and persona flavor line.
#[derive(Debug, Clone)]
pub struct DecisionComponent {
    cfg: StrategyConfig,
    /// One-line persona rendering, folded into counter rationales.
    persona_line: String,
}

impl DecisionComponent {
    pub fn new(cfg: StrategyConfig, persona_line: impl Into<String>) -> Self {
        Self {
            cfg,
            persona_line: persona_line.into(),
        }
    }

    pub fn config(&self) -> &StrategyConfig {
        &self.cfg
    }

    /// The buyer's computed threshold price: base market price adjusted
    /// for quality grade, export flag and urgency, truncated to an
    /// integer and capped at budget. Any seller offer at or below it is
    /// auto-accepted.
    fn fair_price(&self, product: &Product, urgency: f64, budget: i64) -> i64 {
        let mut factor = 1.0_f64;
        let grade = product.quality_grade.to_lowercase();
        if grade.starts_with('a') {
            factor *= 1.05;
        } else if grade.starts_with('b') {
            factor *= 0.98;
        }
        if product.is_export_grade() {
            factor *= 1.05;
        }
        factor *= 1.0 + 0.10 * urgency;
        let fair = (product.base_market_price as f64 * factor) as i64;
        fair.min(budget)
    }

    /// Round-1 anchor: a fixed low fraction of market price.
    fn opening(&self, product: &Product, budget: i64) -> i64 {
        ((product.base_market_price as f64 * self.cfg.opening_pct) as i64).min(budget)
    }

    /// Concession counter for the round's band: rounds 1-3 use the
    /// opening fraction, 4-7 the mid fraction, 8+ the late fraction.
    fn concession(&self, product: &Product, budget: i64, round_num: u32) -> i64 {
        let pct = if round_num <= 3 {
            self.cfg.opening_pct
        } else if round_num <= 7 {
            self.cfg.mid_pct
        } else {
            self.cfg.late_pct
        };
        ((product.base_market_price as f64 * pct) as i64).min(budget)
    }

    /// Decide the round: returns status, proposed/accepted price and a
    /// non-empty rationale.
    ///
    /// Branches are evaluated in strict order: missing price, fair-price
    /// acceptance, final-offer walkaway check, deadline midpoint, then
    /// the normal concession path. Prices are always capped at budget.
    pub fn decide(
        &self,
        product: &Product,
        budget: i64,
        observation: &Observation,
        round_num: u32,
    ) -> (DealStatus, Option<i64>, String) {
        let fair = self.fair_price(product, observation.urgency, budget);
        log::debug!(
            "decide: round={}, seller_price={:?}, fair={}, budget={}",
            round_num,
            observation.seller_price,
            fair,
            budget,
        );

        // No clear number yet: open or ask for one.
        let seller_price = match observation.seller_price {
            Some(p) => p,
            None => {
                if round_num == 1 {
                    let opening = self.opening(product, budget);
                    return (
                        DealStatus::Ongoing,
                        Some(opening),
                        format!("My anchor is ₹{opening}. Put a solid number on the table."),
                    );
                }
                return (
                    DealStatus::Ongoing,
                    None,
                    "Quote a numeric price and we can move.".to_string(),
                );
            }
        };

        // Seller at or below our fair bound.
        if seller_price <= fair {
            return (
                DealStatus::Accepted,
                Some(seller_price),
                format!("Done at ₹{seller_price}. Seal it."),
            );
        }

        // Declared final and still under the walkaway threshold.
        if observation.is_final
            && seller_price <= budget
            && seller_price <= (budget as f64 * self.cfg.walkaway_threshold_pct) as i64
        {
            return (
                DealStatus::Accepted,
                Some(seller_price),
                format!("Fine, final at ₹{seller_price}. Close now."),
            );
        }

        // Near deadline: one last sharp move to the midpoint. The sum
        // can overflow on an absurd quote; the midpoint would exceed
        // budget then anyway, so saturate to budget.
        if round_num >= self.cfg.final_round {
            let counter = seller_price
                .checked_add(budget)
                .map_or(budget, |sum| sum / 2)
                .min(budget);
            if counter >= seller_price {
                return (
                    DealStatus::Accepted,
                    Some(seller_price),
                    format!("Alright, I'll take ₹{seller_price}."),
                );
            }
            return (
                DealStatus::Ongoing,
                Some(counter),
                format!("Last call: ₹{counter}. Take it or leave it."),
            );
        }

        // Normal concession path.
        let mut counter = self.concession(product, budget, round_num);
        if observation.concession {
            counter = ((counter as f64 * 1.08) as i64).min(budget);
        }

        if counter >= seller_price {
            return (
                DealStatus::Accepted,
                Some(seller_price),
                format!("Okay, I'll match ₹{seller_price}."),
            );
        }

        let pressure = if round_num >= 4 && !observation.concession {
            " If you can't move, I walk; plenty of options."
        } else {
            ""
        };
        (
            DealStatus::Ongoing,
            Some(counter),
            format!("{} I can do ₹{counter}.{pressure}", self.persona_line),
        )
    }
}
