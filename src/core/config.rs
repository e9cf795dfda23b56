//! Rule constants and game configuration.
//!
//! The rules are fixed: lane count, hand sizes, and the winning range are
//! constants, not options. `GameConfig` only covers what differs between
//! sessions: the seed, who sits in each seat, and what they are called.

use log::warn;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::player::{PlayerId, Seat};
use crate::ai::Difficulty;

/// Number of players.
pub const PLAYER_COUNT: usize = 2;

/// Lanes (caravans) per player.
pub const LANE_COUNT: usize = 3;

/// Cards dealt to each player at game start.
pub const STARTING_HAND_SIZE: usize = 8;

/// Maximum cards a hand may hold after drawing.
pub const HAND_SIZE_LIMIT: usize = 8;

/// Lowest winning lane total (inclusive).
pub const WIN_MIN: u32 = 21;

/// Highest winning lane total (inclusive). Anything above is bust.
pub const WIN_MAX: u32 = 26;

/// Sold lanes needed to win outright.
pub const LANES_TO_WIN: usize = 2;

/// A bonus question is offered at the start of every round divisible by this.
pub const QUESTION_ROUND_INTERVAL: u32 = 3;

/// Flat value of a bonus-point card.
pub const BONUS_POINT_VALUE: u32 = 1;

/// Check whether a lane total lies in the winning range.
#[must_use]
pub const fn is_winning_total(total: u32) -> bool {
    total >= WIN_MIN && total <= WIN_MAX
}

/// Error returned for an unusable `GameConfig`.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{0} has an empty name")]
    EmptyName(PlayerId),
    #[error("difficulty tier {0} is above the maximum of {max}", max = Difficulty::MAX_TIER)]
    DifficultyOutOfRange(u8),
    #[error("{0} is not a seat in a two-player game")]
    UnknownSeat(PlayerId),
}

/// Configuration for one seat.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatConfig {
    /// Display name.
    pub name: String,

    /// Human or AI (with difficulty).
    pub seat: Seat,
}

impl SeatConfig {
    pub fn human(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            seat: Seat::Human,
        }
    }

    pub fn ai(name: impl Into<String>, difficulty: Difficulty) -> Self {
        Self {
            name: name.into(),
            seat: Seat::Ai(difficulty),
        }
    }
}

/// Complete game configuration.
///
/// Defaults to a human in seat 0 facing a tier-0 (strongest) AI in seat 1.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Seed for deck and question shuffles.
    pub seed: u64,

    /// Seat configurations, indexed by `PlayerId`.
    pub seats: [SeatConfig; PLAYER_COUNT],
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            seats: [
                SeatConfig::human("Player 1"),
                SeatConfig::ai("AI Player", Difficulty::default()),
            ],
        }
    }
}

impl GameConfig {
    /// Create a default configuration with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    /// Replace one seat. Ids past the seated players are ignored; see
    /// `try_with_seat` to have them reported.
    #[must_use]
    pub fn with_seat(self, player: PlayerId, seat: SeatConfig) -> Self {
        match self.clone().try_with_seat(player, seat) {
            Ok(config) => config,
            Err(err) => {
                warn!("seat ignored: {err}");
                self
            }
        }
    }

    /// Replace one seat, rejecting ids past the seated players.
    pub fn try_with_seat(mut self, player: PlayerId, seat: SeatConfig) -> Result<Self, ConfigError> {
        let slot = self
            .seats
            .get_mut(player.index())
            .ok_or(ConfigError::UnknownSeat(player))?;
        *slot = seat;
        Ok(self)
    }

    /// Check names and difficulty tiers.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for player in PlayerId::ALL {
            let seat = &self.seats[player.index()];
            if seat.name.trim().is_empty() {
                return Err(ConfigError::EmptyName(player));
            }
            if let Seat::Ai(difficulty) = seat.seat {
                if difficulty.tier() > Difficulty::MAX_TIER {
                    return Err(ConfigError::DifficultyOutOfRange(difficulty.tier()));
                }
            }
        }
        Ok(())
    }
}
