//! Text-generation collaborators.
//!
//! Phrasing is cosmetic, never load-bearing: the agent works fully
//! without a configured provider, and any provider failure degrades to
//! the unphrased rationale.

pub mod providers;
pub mod text_generation;

pub use text_generation::{NoopGeneration, TextGeneration};
