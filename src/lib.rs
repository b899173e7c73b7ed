//! # Mandi
//!
//! A single-buyer negotiation agent. Each round it parses the seller's
//! free-text message into structured signals, runs a deterministic,
//! persona-tuned pricing policy against the product and budget, and
//! answers with an accept or a counter-offer, optionally rephrased by a
//! hosted text-generation model. The policy is a pure function of
//! (product, budget, observation, round); conversation memory is a
//! bounded side-log used only for phrasing context and checkpointing.

pub mod agent;
pub mod decision;
pub mod error;
pub mod llms;
pub mod memory;
pub mod observation;
pub mod persona;
pub mod product;
pub mod simulation;

pub use agent::{BuyerAgent, NegotiationResponse};
pub use decision::{DealStatus, DecisionComponent, StrategyConfig};
pub use error::PersonaError;
pub use memory::{MemoryComponent, MemoryEntry, Role};
pub use observation::{Observation, ObservationComponent};
pub use persona::{Persona, PersonaComponent};
pub use product::Product;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
