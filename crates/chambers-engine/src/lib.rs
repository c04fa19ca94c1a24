//! Chambers — Narrative Engine.
//!
//! A pure, deterministic transition function over validated narrative
//! graphs, plus the progress scorer it consults. No clock reads, no
//! randomness, no ambient lookups: identical inputs always produce
//! identical output.

pub mod engine;
pub mod scoring;

pub use engine::{NarrativeEngine, Transition};
pub use scoring::{ProgressScorer, ScoringConfig};
