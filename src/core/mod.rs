//! Core engine types: players, state, actions, errors, RNG, configuration.
//!
//! Everything that describes a game in progress lives here. The rules that
//! change it live in `rules`.

pub mod action;
pub mod config;
pub mod error;
pub mod player;
pub mod rng;
pub mod state;

pub use action::{Action, ActionRecord};
pub use config::{ConfigError, GameConfig, SeatConfig};
pub use error::ActionError;
pub use player::{Player, PlayerId, PlayerMap, Seat};
pub use rng::{GameRng, GameRngState, RngStream};
pub use state::{GameState, Interlude, Phase};
