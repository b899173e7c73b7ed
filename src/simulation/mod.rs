//! Scripted negotiation harness.
//!
//! A mock seller with a hidden minimum price plus a driver that plays
//! it against a [`BuyerAgent`] for up to ten rounds. Used by the
//! `run_match` binary and the integration-style tests to evaluate the
//! strategy locally.

use serde::{Deserialize, Serialize};

use crate::agent::BuyerAgent;
use crate::decision::DealStatus;
use crate::product::Product;

/// Scripted counterparty with a hidden minimum price.
#[derive(Debug, Clone)]
pub struct MockSeller {
    /// The seller's true minimum, hidden from the buyer.
    pub min_price: i64,
    pub personality: String,
}

impl MockSeller {
    pub fn new(min_price: i64) -> Self {
        Self {
            min_price,
            personality: "standard".to_string(),
        }
    }

    /// Opening ask: 150% of market price.
    pub fn get_opening_price(&self, product: &Product) -> (i64, String) {
        let price = (product.base_market_price as f64 * 1.5) as i64;
        let msg = format!(
            "These are premium {} grade {}. I'm asking ₹{price}.",
            product.quality_grade, product.name,
        );
        (price, msg)
    }

    /// React to the buyer's latest offer.
    ///
    /// Returns `(counter_price, message, accepted)`. Accepts any offer
    /// leaving at least a 10% margin over the minimum; from round 8 the
    /// seller softens sharply and declares finality.
    pub fn respond_to_buyer(&self, buyer_offer: Option<i64>, round_num: u32) -> (i64, String, bool) {
        if let Some(offer) = buyer_offer {
            if offer >= (self.min_price as f64 * 1.1) as i64 {
                return (offer, format!("You have a deal at ₹{offer}!"), true);
            }
        }
        if round_num >= 8 {
            let counter = match buyer_offer {
                Some(offer) => self.min_price.max((offer as f64 * 1.05) as i64),
                None => self.min_price,
            };
            return (
                counter,
                format!("Final offer: ₹{counter}. Take it or leave it."),
                false,
            );
        }
        let base = buyer_offer.unwrap_or(self.min_price);
        let counter = self.min_price.max((base as f64 * 1.15) as i64);
        (counter, format!("I can come down to ₹{counter}."), false)
    }
}

/// One turn of a simulated conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<i64>,
}

/// Outcome of one simulated match.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationResult {
    pub deal_made: bool,
    pub final_price: Option<i64>,
    pub rounds: u32,
    /// Budget left on the table when a deal was made.
    pub savings: i64,
    pub conversation: Vec<ConversationTurn>,
}

/// Play the agent against a mock seller for up to ten rounds.
///
/// Each round the buyer answers the latest seller message, then the
/// seller reacts to the buyer's counter; either side accepting ends the
/// match.
pub async fn run_single_simulation(
    agent: &mut BuyerAgent,
    product: &Product,
    buyer_budget: i64,
    seller_min: i64,
) -> SimulationResult {
    let seller = MockSeller::new(seller_min);

    let (_, mut seller_msg) = seller.get_opening_price(product);
    let mut conversation = vec![ConversationTurn {
        role: "seller".to_string(),
        message: seller_msg.clone(),
        price: None,
    }];

    let mut deal_made = false;
    let mut final_price = None;
    let mut buyer_offer = None;
    let mut rounds = 0;

    for round_num in 1..=10 {
        rounds = round_num;

        let response = agent
            .negotiate(product, buyer_budget, &seller_msg, round_num)
            .await;
        conversation.push(ConversationTurn {
            role: "buyer".to_string(),
            message: response.message.clone(),
            price: response.price,
        });
        if response.status == DealStatus::Accepted {
            deal_made = true;
            final_price = response.price;
            break;
        }
        buyer_offer = response.price;

        let (seller_price, msg, seller_accepts) = seller.respond_to_buyer(buyer_offer, round_num);
        seller_msg = msg;
        conversation.push(ConversationTurn {
            role: "seller".to_string(),
            message: seller_msg.clone(),
            price: Some(seller_price),
        });
        if seller_accepts {
            deal_made = true;
            final_price = buyer_offer;
            break;
        }
    }

    let savings = match (deal_made, final_price) {
        (true, Some(price)) => buyer_budget - price,
        _ => 0,
    };

    SimulationResult {
        deal_made,
        final_price,
        rounds,
        savings,
        conversation,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persona::Persona;
    use std::collections::HashMap;

    fn alphonso() -> Product {
        Product {
            name: "Alphonso Mangoes".to_string(),
            category: "Mangoes".to_string(),
            quantity: 100,
            quality_grade: "A".to_string(),
            origin: "Ratnagiri".to_string(),
            base_market_price: 180_000,
            attributes: HashMap::from([("export_grade".to_string(), serde_json::json!(true))]),
        }
    }

    #[test]
    fn test_seller_accepts_profitable_offer() {
        let seller = MockSeller::new(100_000);
        let (price, _, accepted) = seller.respond_to_buyer(Some(110_000), 2);
        assert!(accepted);
        assert_eq!(price, 110_000);
    }

    #[test]
    fn test_seller_counters_low_offer() {
        let seller = MockSeller::new(100_000);
        let (price, msg, accepted) = seller.respond_to_buyer(Some(80_000), 2);
        assert!(!accepted);
        // max(min_price, 80000 * 1.15)
        assert_eq!(price, 100_000);
        assert!(msg.contains("come down"));
    }

    #[test]
    fn test_seller_goes_final_late() {
        let seller = MockSeller::new(100_000);
        let (_, msg, accepted) = seller.respond_to_buyer(Some(80_000), 8);
        assert!(!accepted);
        assert!(msg.contains("Final offer"));
    }

    #[tokio::test]
    async fn test_easy_scenario_reaches_deal_under_budget() {
        let product = alphonso();
        let budget = (product.base_market_price as f64 * 1.2) as i64;
        let seller_min = (product.base_market_price as f64 * 0.8) as i64;

        let mut agent = BuyerAgent::from_persona(Persona::default());
        let result = run_single_simulation(&mut agent, &product, budget, seller_min).await;

        assert!(result.deal_made);
        let price = result.final_price.unwrap();
        assert!(price <= budget);
        assert!(result.rounds <= 10);
        // Transcript starts with the seller's opening ask.
        assert_eq!(result.conversation[0].role, "seller");
        assert_eq!(result.savings, budget - price);
    }
}
