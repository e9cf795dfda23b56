//! Rejection reasons for action requests.
//!
//! A rejected action never changes the game: validation runs against a
//! shared borrow of the state and finishes before anything is mutated.

use thiserror::Error;

use super::player::PlayerId;
use super::state::Phase;
use crate::cards::Card;

/// Why the executor refused an action.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("the game is over")]
    GameOver,

    #[error("{actor} acted out of turn; it is {current}'s turn")]
    OutOfTurn { actor: PlayerId, current: PlayerId },

    #[error("{action} is not allowed during {phase}")]
    WrongPhase { action: &'static str, phase: Phase },

    #[error("a bonus question must be answered first")]
    QuestionPending,

    #[error("the awarded bonus point must be placed first")]
    BonusPlacementPending,

    #[error("{0} has no bonus point to place")]
    BonusNotAwarded(PlayerId),

    #[error("there is no bonus question waiting for {0}")]
    NoPendingQuestion(PlayerId),

    #[error("question {0} is missing from the question source")]
    MissingQuestion(usize),

    #[error("answers need the question source; use answer_question")]
    AnswerWithoutQuestions,

    // === Malformed requests ===
    #[error("{0} is not seated in this game")]
    UnknownPlayer(PlayerId),

    #[error("card index {index} is out of range for a hand of {len}")]
    CardIndexOutOfRange { index: usize, len: usize },

    #[error("lane index {0} is out of range")]
    LaneIndexOutOfRange(usize),

    #[error("option {index} is out of range for a question with {len} options")]
    OptionOutOfRange { index: usize, len: usize },

    // === Move legality ===
    #[error("{0} is not a numeric card")]
    NotNumeric(Card),

    #[error("{0} cannot be played from hand")]
    Unplayable(Card),

    #[error("lane {0} already holds cards")]
    LaneOccupied(usize),

    #[error("lane {0} holds no cards")]
    LaneEmpty(usize),

    #[error("lane {0} holds no numeric card")]
    NoNumericCard(usize),

    #[error("{card} cannot extend lane {lane}")]
    IllegalPlacement { card: Card, lane: usize },

    #[error("lane {0} is already sold")]
    LaneSold(usize),

    #[error("numeric cards may only be played on your own lanes")]
    OpponentLane,

    #[error("{0} has no suit to lock")]
    SuitlessQueen(Card),

    #[error("passing during setup is only allowed without a numeric card in hand")]
    PassNotAllowed,
}

impl ActionError {
    /// Missing or out-of-range indices and unknown players.
    #[must_use]
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            ActionError::UnknownPlayer(_)
                | ActionError::CardIndexOutOfRange { .. }
                | ActionError::LaneIndexOutOfRange(_)
                | ActionError::OptionOutOfRange { .. }
        )
    }
}
