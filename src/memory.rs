//! Bounded conversation memory.
//!
//! Keeps a short serialized history of (round, role, message, price)
//! tuples. The decision policy never reads it; it exists to provide
//! prompt context for the optional phrasing path and a transcript for
//! checkpointing.

use std::collections::VecDeque;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Default number of entries retained before FIFO eviction kicks in.
pub const DEFAULT_MEMORY_CAPACITY: usize = 200;

/// Who produced a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Seller,
    Buyer,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Seller => write!(f, "Seller"),
            Role::Buyer => write!(f, "Buyer"),
        }
    }
}

/// One recorded conversation turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryEntry {
    /// Round number; monotonically non-decreasing across a session.
    pub round: u32,
    pub role: Role,
    pub message: String,
    pub price: Option<i64>,
}

/// Append-only conversation log with strict FIFO eviction.
///
/// When the log exceeds its capacity the oldest entry is dropped first.
/// Eviction is O(1) amortized.
#[derive(Debug, Clone)]
pub struct MemoryComponent {
    max_len: usize,
    history: VecDeque<MemoryEntry>,
}

impl Default for MemoryComponent {
    fn default() -> Self {
        Self::new(DEFAULT_MEMORY_CAPACITY)
    }
}

impl MemoryComponent {
    /// Create a memory holding at most `max_len` entries.
    pub fn new(max_len: usize) -> Self {
        Self {
            max_len,
            history: VecDeque::new(),
        }
    }

    /// Append a turn, evicting the oldest entry once over capacity.
    pub fn add(&mut self, round: u32, role: Role, message: impl Into<String>, price: Option<i64>) {
        self.history.push_back(MemoryEntry {
            round,
            role,
            message: message.into(),
            price,
        });
        if self.history.len() > self.max_len {
            self.history.pop_front();
        }
    }

    /// Number of retained entries.
    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// Iterate over retained entries, oldest first.
    pub fn entries(&self) -> impl Iterator<Item = &MemoryEntry> {
        self.history.iter()
    }

    /// Format the last `last_n` entries for prompt context.
    ///
    /// One line per turn: `R{round} {role}: {message} (₹{price})`.
    pub fn summary(&self, last_n: usize) -> String {
        let skip = self.history.len().saturating_sub(last_n);
        self.history
            .iter()
            .skip(skip)
            .map(|e| {
                let price = e
                    .price
                    .map(|p| p.to_string())
                    .unwrap_or_else(|| "None".to_string());
                format!("R{} {}: {} (₹{})", e.round, e.role, e.message, price)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Export the history as a JSON mapping for checkpointing.
    pub fn get_state(&self) -> Value {
        serde_json::json!({ "history": self.history })
    }

    /// Restore history from a previously exported state.
    ///
    /// A missing or malformed `history` key resets to an empty log.
    pub fn set_state(&mut self, state: &Value) {
        self.history = state
            .get("history")
            .and_then(|h| serde_json::from_value(h.clone()).ok())
            .unwrap_or_default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fifo_eviction() {
        let mut mem = MemoryComponent::new(3);
        for round in 1..=5 {
            mem.add(round, Role::Seller, format!("msg {round}"), Some(round as i64));
        }
        assert_eq!(mem.len(), 3);
        let rounds: Vec<u32> = mem.entries().map(|e| e.round).collect();
        // Oldest entries (rounds 1 and 2) were evicted first.
        assert_eq!(rounds, vec![3, 4, 5]);
    }

    #[test]
    fn test_summary_last_n() {
        let mut mem = MemoryComponent::default();
        mem.add(1, Role::Seller, "asking ₹270000", Some(270_000));
        mem.add(1, Role::Buyer, "my anchor is ₹117000", Some(117_000));
        mem.add(2, Role::Seller, "no numbers yet", None);

        let summary = mem.summary(2);
        assert_eq!(
            summary,
            "R1 Buyer: my anchor is ₹117000 (₹117000)\nR2 Seller: no numbers yet (₹None)"
        );
    }

    #[test]
    fn test_summary_larger_than_history() {
        let mut mem = MemoryComponent::default();
        mem.add(1, Role::Seller, "hello", None);
        assert_eq!(mem.summary(8).lines().count(), 1);
    }

    #[test]
    fn test_state_round_trip() {
        let mut mem = MemoryComponent::new(10);
        mem.add(1, Role::Seller, "₹200000", Some(200_000));
        mem.add(1, Role::Buyer, "₹117000", Some(117_000));

        let state = mem.get_state();
        let mut restored = MemoryComponent::new(10);
        restored.set_state(&state);

        assert_eq!(restored.len(), 2);
        assert_eq!(restored.entries().next().unwrap().role, Role::Seller);
        assert_eq!(restored.entries().last().unwrap().price, Some(117_000));
    }

    #[test]
    fn test_set_state_bad_shape_resets() {
        let mut mem = MemoryComponent::default();
        mem.add(1, Role::Buyer, "hi", None);
        mem.set_state(&serde_json::json!({ "history": "not a list" }));
        assert!(mem.is_empty());
    }
}
