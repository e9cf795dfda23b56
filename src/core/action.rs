//! Action requests and the action history.
//!
//! An `Action` is what a caller (human input handler or AI) asks the
//! executor to do. It is a closed, serde-tagged enum so the presentation
//! layer can ship it as JSON:
//!
//! ```
//! use caravan_engine::core::{Action, PlayerId};
//!
//! let action = Action::PlayCard { card_index: 2, target: PlayerId::new(1), lane: 0 };
//! let json = serde_json::to_string(&action).unwrap();
//! assert_eq!(json, r#"{"kind":"play_card","card_index":2,"target":1,"lane":0}"#);
//! ```

use serde::{Deserialize, Serialize};

use super::player::PlayerId;

/// A requested game action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Action {
    /// Seed an empty own lane with a numeric card (setup only).
    PlaceInitialCard { card_index: usize, lane: usize },

    /// Play a hand card onto a lane of `target` (play phase only).
    PlayCard {
        card_index: usize,
        target: PlayerId,
        lane: usize,
    },

    /// Throw away one hand card.
    DiscardCard { card_index: usize },

    /// Empty one of your own lanes.
    DiscardCaravan { lane: usize },

    /// Place an awarded bonus point on any lane.
    ApplyBonusPoint { target: PlayerId, lane: usize },

    /// Answer the pending bonus question with option `option`. Needs the
    /// question text, so only `CaravanGame` accepts it.
    AnswerQuestion { option: usize },

    /// Do nothing this turn.
    Pass,
}

impl Action {
    /// Stable snake_case name, matching the serialized `kind` tag.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Action::PlaceInitialCard { .. } => "place_initial_card",
            Action::PlayCard { .. } => "play_card",
            Action::DiscardCard { .. } => "discard_card",
            Action::DiscardCaravan { .. } => "discard_caravan",
            Action::ApplyBonusPoint { .. } => "apply_bonus_point",
            Action::AnswerQuestion { .. } => "answer_question",
            Action::Pass => "pass",
        }
    }

    /// Whether this action removes a card from the actor's hand.
    #[must_use]
    pub const fn spends_hand_card(&self) -> bool {
        matches!(
            self,
            Action::PlaceInitialCard { .. } | Action::PlayCard { .. } | Action::DiscardCard { .. }
        )
    }
}

/// An accepted action with metadata, appended to the game history.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    /// The player who took this action.
    pub player: PlayerId,

    /// The action taken.
    pub action: Action,

    /// Round number when the action was taken (0 during setup).
    pub round: u32,

    /// Global sequence number.
    pub sequence: u32,

    /// Whether the engine passed on the player's behalf.
    pub automatic: bool,
}
