//! Provider-specific text-generation implementations.
//!
//! Each provider implements the
//! [`TextGeneration`](crate::llms::text_generation::TextGeneration)
//! trait and handles authentication, request formatting and error
//! handling for its hosted API.

pub mod huggingface;
