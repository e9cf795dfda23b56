//! Heuristic AI opponent.
//!
//! - `config`: Difficulty tiers and scoring weights
//! - `strategist`: Candidate generation, scoring, and the final pick

pub mod config;
pub mod strategist;

pub use config::{Difficulty, ScoringWeights};
pub use strategist::{ActionPolicy, Candidate, Strategist};
