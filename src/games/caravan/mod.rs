//! Caravan, ready to play.
//!
//! `CaravanGameBuilder` creates a seeded game and its initial state;
//! `CaravanGame` routes human requests and AI turns through the same
//! executor:
//! - Seats are a human or an AI at a difficulty tier
//! - Bonus questions come from the caller's question list
//! - Decks may be stacked for scripted scenarios

mod game;

pub use game::{AiTurn, CaravanGame, CaravanGameBuilder};
