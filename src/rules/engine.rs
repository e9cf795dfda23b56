//! Rules engine trait and game results.
//!
//! `RulesEngine` is the seam between callers (input handlers, the AI
//! driver, tests) and the rules:
//! - What actions a player could request
//! - Whether a request is legal
//! - How an accepted action changes the state
//! - Whether the game is over

use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::core::action::Action;
use crate::core::error::ActionError;
use crate::core::player::PlayerId;
use crate::core::state::GameState;

/// Result of a completed game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameResult {
    /// Single winner.
    Winner(PlayerId),
    /// Equal sold-lane counts when both players ran out of cards.
    Draw,
}

impl GameResult {
    /// Check if a player won.
    #[must_use]
    pub fn is_winner(&self, player: PlayerId) -> bool {
        matches!(self, GameResult::Winner(p) if *p == player)
    }
}

/// What happened after an accepted action.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ActionOutcome {
    /// Replacement card drawn by the actor, if any.
    pub drew: Option<Card>,

    /// Cards taken off the table (jack targets, discarded lanes).
    pub removed: Vec<Card>,

    /// Players the engine passed for because they had nothing to do.
    pub auto_passed: Vec<PlayerId>,

    /// Set when this action ended the game.
    pub result: Option<GameResult>,
}

/// Rules engine trait.
///
/// ## Implementation Notes
///
/// - `candidate_actions`: Every well-formed request for the player's
///   situation; may include illegal ones
/// - `apply_action`: Must leave the state untouched on `Err`
/// - `is_terminal`: Return None if the game continues
pub trait RulesEngine {
    /// Well-formed action requests for a player, legal or not.
    ///
    /// Returns empty if the player cannot act right now.
    fn candidate_actions(&self, state: &GameState, player: PlayerId) -> Vec<Action>;

    /// Check an action without applying it.
    fn check_action(&self, state: &GameState, player: PlayerId, action: &Action) -> Result<(), ActionError>;

    /// Apply an action to the game state.
    ///
    /// Deterministic: the same state and action always produce the same
    /// result.
    fn apply_action(
        &self,
        state: &mut GameState,
        player: PlayerId,
        action: &Action,
    ) -> Result<ActionOutcome, ActionError>;

    /// Check if the game is over.
    ///
    /// Returns `Some(result)` if the game has ended, `None` if it continues.
    fn is_terminal(&self, state: &GameState) -> Option<GameResult>;

    // === Convenience Methods ===

    fn is_legal(&self, state: &GameState, player: PlayerId, action: &Action) -> bool {
        self.check_action(state, player, action).is_ok()
    }

    /// Enumerate all legal actions for a player.
    fn legal_actions(&self, state: &GameState, player: PlayerId) -> Vec<Action> {
        self.candidate_actions(state, player)
            .into_iter()
            .filter(|action| self.is_legal(state, player, action))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_result_is_winner() {
        let result = GameResult::Winner(PlayerId::new(1));
        assert!(!result.is_winner(PlayerId::new(0)));
        assert!(result.is_winner(PlayerId::new(1)));

        let draw = GameResult::Draw;
        assert!(!draw.is_winner(PlayerId::new(0)));
        assert!(!draw.is_winner(PlayerId::new(1)));
    }

    #[test]
    fn test_game_result_serde() {
        let json = serde_json::to_string(&GameResult::Winner(PlayerId::new(1))).unwrap();
        assert_eq!(json, r#"{"winner":1}"#);
        assert_eq!(serde_json::to_string(&GameResult::Draw).unwrap(), r#""draw""#);
    }
}
