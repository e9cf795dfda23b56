//! The action executor: the only code that mutates a game.
//!
//! ## Validate, then apply
//!
//! `submit` first turns a request into a `Plan` by inspecting a shared
//! borrow of the state. Only a fully validated plan is applied, and
//! applying cannot fail, so a rejected request leaves the game exactly as
//! it was.
//!
//! ## Validation order
//!
//! 1. The game is not over and the actor is seated
//! 2. The actor is the current player (bonus placement instead requires
//!    the awarded player, who may act out of turn)
//! 3. No interlude stage is blocking the request
//! 4. The action is allowed in the current phase
//! 5. Indices and targets are in range
//! 6. Move-specific rules
//!
//! ## After an accepted action
//!
//! The actor draws if a hand card was spent in play, the action is
//! recorded, the game-over check runs, and the turn moves on. Players left
//! with nothing to do are passed automatically.

use log::debug;

use super::engine::{ActionOutcome, GameResult, RulesEngine};
use crate::cards::Card;
use crate::core::action::Action;
use crate::core::config::{LANE_COUNT, PLAYER_COUNT};
use crate::core::error::ActionError;
use crate::core::player::PlayerId;
use crate::core::state::{GameState, Phase};
use crate::effects::FaceEffect;
use crate::trivia::QuestionSource;

/// A validated action, ready to apply.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Plan {
    PlaceInitial { card_index: usize, lane: usize },
    Numeric { card_index: usize, lane: usize },
    Face {
        card_index: usize,
        target: PlayerId,
        lane: usize,
        effect: FaceEffect,
    },
    DiscardCard { card_index: usize },
    DiscardCaravan { lane: usize },
    BonusPoint { target: PlayerId, lane: usize },
    Mulligan,
    /// Setup pass with no numeric card left anywhere.
    StopSeeding,
    Pass,
}

impl Plan {
    /// Spends a hand card during play, so the actor draws afterwards.
    fn draws_replacement(self) -> bool {
        matches!(
            self,
            Plan::Numeric { .. } | Plan::Face { .. } | Plan::DiscardCard { .. }
        )
    }
}

/// Validates and applies actions.
///
/// Stateless; every method takes the game it works on.
///
/// ```
/// use caravan_engine::core::{Action, GameConfig, GameState, PlayerId};
/// use caravan_engine::rules::ActionExecutor;
///
/// let mut state = GameState::new(&GameConfig::new(7), 0);
/// let executor = ActionExecutor::new();
///
/// // Out-of-range indices are rejected without touching the game.
/// let bad = Action::PlaceInitialCard { card_index: 99, lane: 0 };
/// assert!(executor.submit(&mut state, PlayerId::new(0), bad).is_err());
/// assert!(state.history().is_empty());
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct ActionExecutor;

impl ActionExecutor {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Validate and apply one action for `player`.
    pub fn submit(
        &self,
        state: &mut GameState,
        player: PlayerId,
        action: Action,
    ) -> Result<ActionOutcome, ActionError> {
        let plan = self.validate(state, player, &action)?;
        let mut outcome = ActionOutcome {
            removed: self.apply(state, player, plan),
            ..ActionOutcome::default()
        };

        if plan.draws_replacement() {
            outcome.drew = state.player_mut(player).draw_card();
            if let Some(card) = outcome.drew {
                if state.player(player).is_ai() {
                    state.mark_seen(card);
                }
            }
        }

        debug!("{} played {:?}", player, action);
        state.record(player, action, false);

        if state.check_game_over().is_none() {
            match plan {
                Plan::PlaceInitial { .. } | Plan::StopSeeding => state.advance_setup(),
                Plan::BonusPoint { .. } => state.clear_interlude(),
                Plan::Mulligan => {}
                _ => state.advance_turn(),
            }
            // Completing setup can leave both players without cards.
            state.check_game_over();
        }

        outcome.result = state.result().copied();
        if outcome.result.is_none() {
            outcome.auto_passed = self.pass_stuck_players(state);
        }
        Ok(outcome)
    }

    /// Answer the pending bonus question.
    ///
    /// Returns whether the answer was correct. A correct answer awards a
    /// bonus point that `player` must place next; a wrong answer leaves the
    /// question pending. Either way the answer is recorded as
    /// `Action::AnswerQuestion`, so the history replays.
    pub fn answer_question<Q>(
        &self,
        state: &mut GameState,
        player: PlayerId,
        option: usize,
        source: &Q,
    ) -> Result<bool, ActionError>
    where
        Q: QuestionSource + ?Sized,
    {
        if state.is_game_over() {
            return Err(ActionError::GameOver);
        }
        let index = match state.pending_question() {
            Some((asked, index)) if asked == player => index,
            _ => return Err(ActionError::NoPendingQuestion(player)),
        };
        let question = source
            .question(index)
            .ok_or(ActionError::MissingQuestion(index))?;
        if option >= question.options.len() {
            return Err(ActionError::OptionOutOfRange {
                index: option,
                len: question.options.len(),
            });
        }

        let correct = question.is_correct(option);
        state.record(player, Action::AnswerQuestion { option }, false);
        if correct {
            debug!("{} answered question {} correctly", player, index);
            state.award_bonus(player);
        } else {
            debug!("{} answered question {} wrongly", player, index);
        }
        Ok(correct)
    }

    // === Validation ===

    fn validate(&self, state: &GameState, player: PlayerId, action: &Action) -> Result<Plan, ActionError> {
        if state.is_game_over() {
            return Err(ActionError::GameOver);
        }
        if !player.is_seated() {
            return Err(ActionError::UnknownPlayer(player));
        }
        if let Action::AnswerQuestion { .. } = action {
            return Err(ActionError::AnswerWithoutQuestions);
        }

        if let Action::ApplyBonusPoint { target, lane } = *action {
            if state.awaiting_bonus_for() != Some(player) {
                return Err(ActionError::BonusNotAwarded(player));
            }
            check_lane(state, target, lane)?;
            return Ok(Plan::BonusPoint { target, lane });
        }

        let current = state.current_player();
        if player != current {
            return Err(ActionError::OutOfTurn { actor: player, current });
        }
        if state.pending_question().is_some() {
            return Err(ActionError::QuestionPending);
        }
        if state.awaiting_bonus_for().is_some() {
            return Err(ActionError::BonusPlacementPending);
        }

        let phase = state.phase();
        match (phase, action) {
            (Phase::Setup, Action::PlaceInitialCard { card_index, lane }) => {
                self.validate_placement(state, player, *card_index, *lane)
            }
            (Phase::Setup, Action::Pass) => {
                let seat = state.player(player);
                if seat.has_numeric_in_hand() {
                    Err(ActionError::PassNotAllowed)
                } else if seat.holds_numeric() {
                    Ok(Plan::Mulligan)
                } else {
                    Ok(Plan::StopSeeding)
                }
            }
            (Phase::Playing, Action::PlayCard { card_index, target, lane }) => {
                self.validate_play(state, player, *card_index, *target, *lane)
            }
            (Phase::Playing, Action::DiscardCard { card_index }) => {
                hand_card(state, player, *card_index)?;
                Ok(Plan::DiscardCard { card_index: *card_index })
            }
            (Phase::Playing, Action::DiscardCaravan { lane }) => {
                let caravan = check_lane(state, player, *lane)?;
                if caravan.is_empty() {
                    return Err(ActionError::LaneEmpty(*lane));
                }
                if state.is_lane_sold_by_anyone(*lane) {
                    return Err(ActionError::LaneSold(*lane));
                }
                Ok(Plan::DiscardCaravan { lane: *lane })
            }
            (Phase::Playing, Action::Pass) => Ok(Plan::Pass),
            _ => Err(ActionError::WrongPhase {
                action: action.name(),
                phase,
            }),
        }
    }

    fn validate_placement(
        &self,
        state: &GameState,
        player: PlayerId,
        card_index: usize,
        lane: usize,
    ) -> Result<Plan, ActionError> {
        let card = hand_card(state, player, card_index)?;
        let caravan = check_lane(state, player, lane)?;
        if !card.is_numeric() {
            return Err(ActionError::NotNumeric(card));
        }
        if !caravan.is_empty() {
            return Err(ActionError::LaneOccupied(lane));
        }
        Ok(Plan::PlaceInitial { card_index, lane })
    }

    fn validate_play(
        &self,
        state: &GameState,
        player: PlayerId,
        card_index: usize,
        target: PlayerId,
        lane: usize,
    ) -> Result<Plan, ActionError> {
        let card = hand_card(state, player, card_index)?;
        let caravan = check_lane(state, target, lane)?;

        if !card.is_numeric() && !card.is_face() {
            return Err(ActionError::Unplayable(card));
        }
        if caravan.is_empty() && !card.is_numeric() {
            return Err(ActionError::LaneEmpty(lane));
        }
        if state.is_lane_sold_by(target, lane) {
            return Err(ActionError::LaneSold(lane));
        }

        if card.is_numeric() {
            if target != player {
                return Err(ActionError::OpponentLane);
            }
            if !caravan.can_add_numeric(card) {
                return Err(ActionError::IllegalPlacement { card, lane });
            }
            return Ok(Plan::Numeric { card_index, lane });
        }

        let effect = FaceEffect::for_card(card)?;
        effect.check(caravan, lane)?;
        Ok(Plan::Face {
            card_index,
            target,
            lane,
            effect,
        })
    }

    // === Application ===

    /// Apply a validated plan. Returns the cards taken off the table.
    fn apply(&self, state: &mut GameState, player: PlayerId, plan: Plan) -> Vec<Card> {
        match plan {
            Plan::PlaceInitial { card_index, lane } | Plan::Numeric { card_index, lane } => {
                let seat = state.player_mut(player);
                let card = seat.take_from_hand(card_index);
                let placed = seat.caravan_mut(lane).add_card(card);
                debug_assert!(placed, "validated placement of {card} was refused");
                state.mark_seen(card);
                Vec::new()
            }
            Plan::Face {
                card_index,
                target,
                lane,
                effect,
            } => {
                let card = state.player_mut(player).take_from_hand(card_index);
                let removed = effect.apply(card, state.player_mut(target).caravan_mut(lane));
                state.mark_seen(card);
                state.mark_all_seen(removed.iter().copied());
                removed
            }
            Plan::DiscardCard { card_index } => {
                let card = state.player_mut(player).take_from_hand(card_index);
                state.mark_seen(card);
                Vec::new()
            }
            Plan::DiscardCaravan { lane } => {
                let removed = state.player_mut(player).caravan_mut(lane).reset();
                state.mark_all_seen(removed.iter().copied());
                removed
            }
            Plan::BonusPoint { target, lane } => {
                let added = state
                    .player_mut(target)
                    .caravan_mut(lane)
                    .add_bonus_point(Card::bonus_point());
                debug_assert!(added);
                Vec::new()
            }
            Plan::Mulligan => {
                let dealt = state.mulligan(player);
                debug!("{} reshuffled and redrew {} cards", player, dealt);
                Vec::new()
            }
            Plan::StopSeeding => {
                debug!("{} has no numeric card left and stops seeding", player);
                Vec::new()
            }
            Plan::Pass => Vec::new(),
        }
    }

    /// Pass for every player the turn reaches who has nothing to do.
    fn pass_stuck_players(&self, state: &mut GameState) -> Vec<PlayerId> {
        let mut passed = Vec::new();
        while passed.len() < PLAYER_COUNT
            && state.phase() == Phase::Playing
            && state.is_stuck(state.current_player())
        {
            let stuck = state.current_player();
            debug!("{} has no move and is passed", stuck);
            state.record(stuck, Action::Pass, true);
            state.advance_turn();
            passed.push(stuck);
        }
        passed
    }

    // === Enumeration ===

    fn placement_candidates(&self, state: &GameState, player: PlayerId) -> Vec<Action> {
        let hand = state.player(player).hand().len();
        let mut actions: Vec<Action> = (0..hand)
            .flat_map(|card_index| {
                (0..LANE_COUNT).map(move |lane| Action::PlaceInitialCard { card_index, lane })
            })
            .collect();
        actions.push(Action::Pass);
        actions
    }

    fn play_candidates(&self, state: &GameState, player: PlayerId) -> Vec<Action> {
        let hand = state.player(player).hand().len();
        let mut actions = Vec::new();
        for card_index in 0..hand {
            for target in PlayerId::ALL {
                for lane in 0..LANE_COUNT {
                    actions.push(Action::PlayCard {
                        card_index,
                        target,
                        lane,
                    });
                }
            }
        }
        actions.extend((0..hand).map(|card_index| Action::DiscardCard { card_index }));
        actions.extend((0..LANE_COUNT).map(|lane| Action::DiscardCaravan { lane }));
        actions.push(Action::Pass);
        actions
    }
}

impl RulesEngine for ActionExecutor {
    fn candidate_actions(&self, state: &GameState, player: PlayerId) -> Vec<Action> {
        if !player.is_seated() {
            return Vec::new();
        }
        if state.awaiting_bonus_for() == Some(player) {
            return PlayerId::ALL
                .into_iter()
                .flat_map(|target| {
                    (0..LANE_COUNT).map(move |lane| Action::ApplyBonusPoint { target, lane })
                })
                .collect();
        }
        if player != state.current_player() {
            return Vec::new();
        }
        match state.phase() {
            Phase::Setup => self.placement_candidates(state, player),
            Phase::Playing => self.play_candidates(state, player),
            Phase::BonusInterlude | Phase::GameOver => Vec::new(),
        }
    }

    fn check_action(&self, state: &GameState, player: PlayerId, action: &Action) -> Result<(), ActionError> {
        self.validate(state, player, action).map(|_| ())
    }

    fn apply_action(
        &self,
        state: &mut GameState,
        player: PlayerId,
        action: &Action,
    ) -> Result<ActionOutcome, ActionError> {
        self.submit(state, player, *action)
    }

    fn is_terminal(&self, state: &GameState) -> Option<GameResult> {
        state.result().copied()
    }
}

// === Helpers ===

fn hand_card(state: &GameState, player: PlayerId, index: usize) -> Result<Card, ActionError> {
    let hand = state.player(player).hand();
    hand.get(index)
        .copied()
        .ok_or(ActionError::CardIndexOutOfRange {
            index,
            len: hand.len(),
        })
}

fn check_lane(
    state: &GameState,
    owner: PlayerId,
    lane: usize,
) -> Result<&crate::caravan::Caravan, ActionError> {
    if !owner.is_seated() {
        return Err(ActionError::UnknownPlayer(owner));
    }
    state
        .caravan(owner, lane)
        .ok_or(ActionError::LaneIndexOutOfRange(lane))
}
