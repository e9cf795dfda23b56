//! Rules: the `RulesEngine` seam and the executor that implements it.
//!
//! `ActionExecutor` is the only component that mutates a game. Human input
//! handlers and the AI driver both go through it, so every move obeys the
//! same checks.

pub mod engine;
pub mod executor;

pub use engine::{ActionOutcome, GameResult, RulesEngine};
pub use executor::ActionExecutor;
