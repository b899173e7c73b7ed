//! The buyer agent: composes persona, observation, decision and memory
//! into the per-round negotiation entry point.

use serde::{Deserialize, Serialize};

use crate::decision::{DealStatus, DecisionComponent};
use crate::error::PersonaError;
use crate::llms::{NoopGeneration, TextGeneration};
use crate::memory::{MemoryComponent, Role};
use crate::observation::ObservationComponent;
use crate::persona::{Persona, PersonaComponent};
use crate::product::Product;

/// Maximum length of a phrased buyer message, in characters.
const MAX_MESSAGE_CHARS: usize = 500;

/// The agent's answer for one round.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NegotiationResponse {
    pub status: DealStatus,
    pub price: Option<i64>,
    pub message: String,
}

/// Single-buyer negotiation agent.
///
/// Each agent owns an independent memory and decision component, so
/// concurrent sessions simply use separate agents; there is no shared
/// state. Rounds must be fed in strictly increasing order by the
/// caller.
#[derive(Debug)]
pub struct BuyerAgent {
    memory: MemoryComponent,
    persona: PersonaComponent,
    observer: ObservationComponent,
    decision: DecisionComponent,
    generator: Box<dyn TextGeneration>,
}

impl BuyerAgent {
    /// Create an agent from a persona config file, without phrasing.
    ///
    /// # Errors
    ///
    /// Fails when the persona file is missing or malformed; the session
    /// must not start in that case.
    pub fn new(persona_path: impl AsRef<std::path::Path>) -> Result<Self, PersonaError> {
        let persona = PersonaComponent::from_file(persona_path)?;
        Ok(Self::from_components(persona, Box::new(NoopGeneration)))
    }

    /// Create an agent from an in-memory persona, without phrasing.
    pub fn from_persona(persona: Persona) -> Self {
        Self::from_components(
            PersonaComponent::from_persona(persona),
            Box::new(NoopGeneration),
        )
    }

    /// Attach a text-generation collaborator for phrasing.
    pub fn with_generator(mut self, generator: Box<dyn TextGeneration>) -> Self {
        self.generator = generator;
        self
    }

    fn from_components(persona: PersonaComponent, generator: Box<dyn TextGeneration>) -> Self {
        let decision =
            DecisionComponent::new(persona.strategy_params().clone(), persona.make_prompt());
        Self {
            memory: MemoryComponent::default(),
            persona,
            observer: ObservationComponent::new(),
            decision,
            generator,
        }
    }

    pub fn persona(&self) -> &PersonaComponent {
        &self.persona
    }

    pub fn memory(&self) -> &MemoryComponent {
        &self.memory
    }

    /// Run one negotiation round. The sole required entry point for
    /// drivers.
    ///
    /// Parses the seller message, decides, clamps the price to budget,
    /// optionally rephrases the rationale, then logs the seller and
    /// buyer turns to memory under the same round number.
    pub async fn negotiate(
        &mut self,
        product: &Product,
        budget: i64,
        seller_message: &str,
        round_num: u32,
    ) -> NegotiationResponse {
        let obs = self.observer.parse(seller_message);
        let (status, mut price, message) = self.decision.decide(product, budget, &obs, round_num);

        // Hard safety clamp. The decision component already caps
        // internally; this is a second, independent enforcement point
        // and must never be removed.
        if let Some(p) = price {
            if p > budget {
                price = Some(budget);
            }
        }

        let phrased = self.phrase(&message).await;

        self.memory
            .add(round_num, Role::Seller, seller_message, obs.seller_price);
        self.memory.add(round_num, Role::Buyer, phrased.clone(), price);

        NegotiationResponse {
            status,
            price,
            message: phrased,
        }
    }

    /// Take a numeric seller offer and return
    /// `(counter_or_accept_price, accepted, message)`.
    ///
    /// Convenience wrapper for interactive drivers that work with bare
    /// numbers instead of free text.
    pub async fn respond_to_offer(
        &mut self,
        product: &Product,
        budget: i64,
        seller_offer: i64,
        round_num: u32,
    ) -> (i64, bool, String) {
        let seller_msg = format!("I can sell for ₹{seller_offer}");
        let response = self.negotiate(product, budget, &seller_msg, round_num).await;
        if response.status == DealStatus::Accepted {
            return (
                response.price.unwrap_or(seller_offer),
                true,
                response.message,
            );
        }
        (response.price.unwrap_or(0), false, response.message)
    }

    /// Rephrase a rationale through the generator, keeping numbers and
    /// meaning intact. Any failure or empty output keeps the raw text;
    /// phrasing failure is never fatal.
    async fn phrase(&self, raw_text: &str) -> String {
        let prompt = format!(
            "Rewrite as a concise, confident buyer line, same meaning, keep numbers intact:\n\
             ---\n{raw_text}\n---"
        );
        match self.generator.generate(&prompt, 80, 0.4).await {
            Ok(out) if !out.trim().is_empty() => out.trim().chars().take(MAX_MESSAGE_CHARS).collect(),
            Ok(_) => raw_text.to_string(),
            Err(e) => {
                log::warn!(
                    "text generation failed (model={}), using raw rationale: {}",
                    self.generator.model(),
                    e,
                );
                raw_text.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llms::text_generation::GenerationError;
    use async_trait::async_trait;
    use std::collections::HashMap;

    fn product() -> Product {
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

    fn agent() -> BuyerAgent {
        BuyerAgent::from_persona(Persona::default())
    }

    #[derive(Debug)]
    struct FailingGeneration;

    #[async_trait]
    impl TextGeneration for FailingGeneration {
        fn model(&self) -> &str {
            "failing"
        }
        async fn generate(
            &self,
            _prompt: &str,
            _max_tokens: u32,
            _temperature: f64,
        ) -> Result<String, GenerationError> {
            Err("quota exceeded".into())
        }
    }

    #[derive(Debug)]
    struct CannedGeneration(String);

    #[async_trait]
    impl TextGeneration for CannedGeneration {
        fn model(&self) -> &str {
            "canned"
        }
        async fn generate(
            &self,
            _prompt: &str,
            _max_tokens: u32,
            _temperature: f64,
        ) -> Result<String, GenerationError> {
            Ok(self.0.clone())
        }
    }

    #[tokio::test]
    async fn test_accepts_offer_below_fair_price() {
        let mut agent = agent();
        let budget = 216_000;
        let response = agent
            .negotiate(&product(), budget, "I can sell for ₹200000", 1)
            .await;
        assert_eq!(response.status, DealStatus::Accepted);
        assert_eq!(response.price, Some(200_000));
    }

    #[tokio::test]
    async fn test_round_one_anchor() {
        let mut agent = agent();
        let response = agent
            .negotiate(&product(), 216_000, "Premium mangoes, best in the market.", 1)
            .await;
        assert_eq!(response.status, DealStatus::Ongoing);
        assert_eq!(response.price, Some(117_000));
    }

    #[tokio::test]
    async fn test_price_never_exceeds_budget() {
        let mut agent = agent();
        let budget = 100_000;
        for round in 1..=10 {
            let response = agent
                .negotiate(&product(), budget, "Final, urgent: ₹400000 today", round)
                .await;
            if let Some(price) = response.price {
                assert!(price <= budget);
            }
            assert!(!response.message.is_empty());
        }
    }

    #[tokio::test]
    async fn test_memory_logs_seller_then_buyer() {
        let mut agent = agent();
        agent
            .negotiate(&product(), 216_000, "I'm asking ₹270000.", 1)
            .await;

        let entries: Vec<_> = agent.memory().entries().collect();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].role, Role::Seller);
        assert_eq!(entries[0].round, 1);
        assert_eq!(entries[0].price, Some(270_000));
        assert_eq!(entries[1].role, Role::Buyer);
        assert_eq!(entries[1].round, 1);
    }

    #[tokio::test]
    async fn test_generation_failure_keeps_rationale() {
        let mut agent = agent().with_generator(Box::new(FailingGeneration));
        let response = agent
            .negotiate(&product(), 216_000, "I'm asking ₹270000.", 2)
            .await;
        // The decision rationale survives untouched.
        assert!(response.message.contains("₹117000"));
    }

    #[tokio::test]
    async fn test_generation_output_replaces_rationale() {
        let mut agent =
            agent().with_generator(Box::new(CannedGeneration("117000, not a rupee more.".into())));
        let response = agent
            .negotiate(&product(), 216_000, "I'm asking ₹270000.", 2)
            .await;
        assert_eq!(response.message, "117000, not a rupee more.");
    }

    #[tokio::test]
    async fn test_empty_generation_keeps_rationale() {
        // NoopGeneration returns an empty string; raw rationale wins.
        let mut agent = agent();
        let response = agent
            .negotiate(&product(), 216_000, "I'm asking ₹270000.", 2)
            .await;
        assert!(response.message.contains("I can do ₹117000"));
    }

    #[tokio::test]
    async fn test_phrased_message_truncated() {
        let mut agent =
            agent().with_generator(Box::new(CannedGeneration("x".repeat(2_000))));
        let response = agent
            .negotiate(&product(), 216_000, "I'm asking ₹270000.", 2)
            .await;
        assert_eq!(response.message.chars().count(), 500);
    }

    #[tokio::test]
    async fn test_respond_to_offer_accepts() {
        let mut agent = agent();
        // 200000 is below the fair price for an A-grade export lot.
        let (price, accepted, message) =
            agent.respond_to_offer(&product(), 216_000, 200_000, 1).await;
        assert!(accepted);
        assert_eq!(price, 200_000);
        assert!(!message.is_empty());
    }

    #[tokio::test]
    async fn test_respond_to_offer_counters() {
        let mut agent = agent();
        let (price, accepted, _) =
            agent.respond_to_offer(&product(), 216_000, 270_000, 2).await;
        assert!(!accepted);
        assert_eq!(price, 117_000);
    }

    #[tokio::test]
    async fn test_walkaway_final_offer() {
        let mut agent = agent();
        let mut p = product();
        p.base_market_price = 150_000;
        p.quality_grade = "C".to_string();
        p.attributes.clear();
        let response = agent
            .negotiate(&p, 200_000, "Final offer ₹190000", 1)
            .await;
        assert_eq!(response.status, DealStatus::Accepted);
        assert_eq!(response.price, Some(190_000));
    }

    #[tokio::test]
    async fn test_deadline_midpoint_acceptance() {
        let mut agent = agent();
        let mut p = product();
        p.base_market_price = 150_000;
        p.quality_grade = "C".to_string();
        p.attributes.clear();
        let response = agent.negotiate(&p, 180_000, "₹170000", 9).await;
        assert_eq!(response.status, DealStatus::Accepted);
        assert_eq!(response.price, Some(170_000));
    }
}
