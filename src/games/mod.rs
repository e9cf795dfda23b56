//! Playable game setups built on the engine.

pub mod caravan;

pub use caravan::{AiTurn, CaravanGame, CaravanGameBuilder};
