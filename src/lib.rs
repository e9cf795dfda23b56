//! # caravan-engine
//!
//! Rules engine and heuristic AI for Caravan, a two-player card game in
//! which each player builds three lanes of cards toward a total of 21 to 26.
//!
//! ## Design Principles
//!
//! 1. **One Mutation Path**: Human input and AI moves are the same `Action`
//!    requests, validated and applied by `ActionExecutor`. A rejected
//!    request leaves the game untouched.
//!
//! 2. **Read-Only AI**: The strategist scores moves with pure projections
//!    over a shared borrow of the state and never copies lanes.
//!
//! 3. **Deterministic**: Every shuffle draws from a seeded `GameRng`
//!    stream, so a seed and an action sequence always replay the same game.
//!
//! ## Architecture
//!
//! - **Persistent Data Structures**: History and the unseen-card pool use
//!   `im-rs`, so cloning a state for analysis is cheap.
//!
//! - **Memoized Totals**: Each lane refreshes its total whenever it changes.
//!
//! ## Modules
//!
//! - `core`: Players, state, actions, RNG, configuration, errors
//! - `cards`: Card values and the standard deck
//! - `caravan`: Lanes, their locks, and total projections
//! - `effects`: Face card effects
//! - `rules`: `RulesEngine` trait and the action executor
//! - `ai`: Difficulty tiers, scoring weights, and the strategist
//! - `trivia`: Bonus questions and the question order
//! - `games`: Builder and driver for a complete game

pub mod core;
pub mod cards;
pub mod caravan;
pub mod effects;
pub mod rules;
pub mod ai;
pub mod trivia;
pub mod games;

// Re-export commonly used types
pub use crate::core::{
    Action, ActionError, ActionRecord, ConfigError, GameConfig, GameRng, GameRngState, GameState,
    Interlude, Phase, Player, PlayerId, PlayerMap, RngStream, Seat, SeatConfig,
};

pub use crate::cards::{Card, FaceRank, Rank, Suit};

pub use crate::caravan::{Caravan, Direction};

pub use crate::effects::FaceEffect;

pub use crate::rules::{ActionExecutor, ActionOutcome, GameResult, RulesEngine};

pub use crate::ai::{ActionPolicy, Candidate, Difficulty, ScoringWeights, Strategist};

pub use crate::trivia::{Question, QuestionDeck, QuestionSource};

pub use crate::games::{AiTurn, CaravanGame, CaravanGameBuilder};
