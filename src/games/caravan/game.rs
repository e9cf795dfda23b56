//! Caravan game builder and driver.

use log::{debug, warn};

use crate::ai::{ActionPolicy, Difficulty, ScoringWeights, Strategist};
use crate::cards::Card;
use crate::core::{
    Action, ActionError, ConfigError, GameConfig, GameState, PlayerId, PlayerMap, SeatConfig,
};
use crate::core::config::WIN_MIN;
use crate::rules::{ActionExecutor, ActionOutcome, GameResult};
use crate::trivia::Question;

/// One move the driver made for an AI seat.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AiTurn {
    pub player: PlayerId,
    pub action: Action,
    pub outcome: ActionOutcome,
}

/// A configured game: executor, AI, and bonus questions.
#[derive(Clone, Debug)]
pub struct CaravanGame {
    config: GameConfig,
    executor: ActionExecutor,
    strategist: Strategist,
    questions: Vec<Question>,
}

/// Builder for creating a CaravanGame.
#[derive(Clone, Debug, Default)]
pub struct CaravanGameBuilder {
    config: GameConfig,
    questions: Vec<Question>,
    decks: Option<PlayerMap<Vec<Card>>>,
    weights: ScoringWeights,
    seat_error: Option<ConfigError>,
}

impl CaravanGameBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    /// Configure one seat. An unknown `player` is reported by `try_build`.
    pub fn seat(mut self, player: PlayerId, seat: SeatConfig) -> Self {
        match self.config.clone().try_with_seat(player, seat) {
            Ok(config) => self.config = config,
            Err(err) => {
                self.seat_error.get_or_insert(err);
            }
        }
        self
    }

    /// A human in seat 0 against an AI in seat 1.
    pub fn human_vs_ai(
        self,
        name: impl Into<String>,
        ai_name: impl Into<String>,
        difficulty: Difficulty,
    ) -> Self {
        self.seat(PlayerId::new(0), SeatConfig::human(name))
            .seat(PlayerId::new(1), SeatConfig::ai(ai_name, difficulty))
    }

    /// Bonus questions, asked in a seeded random order.
    pub fn questions(mut self, questions: Vec<Question>) -> Self {
        self.questions = questions;
        self
    }

    /// Use prepared decks instead of shuffled standard ones. The top of
    /// each deck is its last element.
    pub fn decks(mut self, decks: PlayerMap<Vec<Card>>) -> Self {
        self.decks = Some(decks);
        self
    }

    pub fn weights(mut self, weights: ScoringWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Build the game and initial state, rejecting an unusable
    /// configuration.
    pub fn try_build(self) -> Result<(CaravanGame, GameState), ConfigError> {
        if let Some(err) = self.seat_error {
            return Err(err);
        }
        self.config.validate()?;

        let state = match self.decks {
            Some(decks) => GameState::with_decks(&self.config, decks, self.questions.len()),
            None => GameState::new(&self.config, self.questions.len()),
        };
        let game = CaravanGame {
            config: self.config,
            executor: ActionExecutor::new(),
            strategist: Strategist::new(self.weights),
            questions: self.questions,
        };
        Ok((game, state))
    }

    /// Build the game and initial state.
    ///
    /// # Panics
    ///
    /// Panics if the configuration is invalid; see `try_build`.
    pub fn build(self) -> (CaravanGame, GameState) {
        match self.try_build() {
            Ok(built) => built,
            Err(err) => panic!("invalid game configuration: {err}"),
        }
    }
}

impl CaravanGame {
    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[must_use]
    pub fn executor(&self) -> &ActionExecutor {
        &self.executor
    }

    #[must_use]
    pub fn strategist(&self) -> &Strategist {
        &self.strategist
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// The question `player` must answer right now, if any.
    #[must_use]
    pub fn pending_question(&self, state: &GameState, player: PlayerId) -> Option<&Question> {
        match state.pending_question() {
            Some((asked, index)) if asked == player => self.questions.get(index),
            _ => None,
        }
    }

    /// Submit a request from any seat. Answers are checked against this
    /// game's questions.
    pub fn submit(
        &self,
        state: &mut GameState,
        player: PlayerId,
        action: Action,
    ) -> Result<ActionOutcome, ActionError> {
        match action {
            Action::AnswerQuestion { option } => {
                self.answer_question(state, player, option)?;
                Ok(ActionOutcome::default())
            }
            _ => self.executor.submit(state, player, action),
        }
    }

    /// Answer the pending bonus question. Returns whether it was correct.
    pub fn answer_question(
        &self,
        state: &mut GameState,
        player: PlayerId,
        option: usize,
    ) -> Result<bool, ActionError> {
        self.executor
            .answer_question(state, player, option, self.questions.as_slice())
    }

    /// Play one move for the current player if that player is an AI.
    ///
    /// Returns `Ok(None)` when the game is over or a human is on turn. A
    /// rejected AI choice falls back to passing; only a rejected pass is
    /// returned as an error.
    pub fn run_ai_turn(&self, state: &mut GameState) -> Result<Option<AiTurn>, ActionError> {
        let player = state.current_player();
        if state.is_game_over() || !state.player(player).is_ai() {
            return Ok(None);
        }
        self.play_for(state, player).map(Some)
    }

    /// Run AI turns until a human must act or the game ends.
    pub fn run_until_human(&self, state: &mut GameState) -> Result<Vec<AiTurn>, ActionError> {
        let mut turns = Vec::new();
        while let Some(turn) = self.run_ai_turn(state)? {
            turns.push(turn);
        }
        Ok(turns)
    }

    /// Let the strategist play every seat, humans included, for at most
    /// `max_actions` moves.
    ///
    /// Human seats play at tier 0, answer bonus questions correctly, and
    /// place bonus points on their lowest lane still short of the winning
    /// range. Returns the result if the game ended.
    pub fn play_out(
        &self,
        state: &mut GameState,
        max_actions: usize,
    ) -> Result<Option<GameResult>, ActionError> {
        for _ in 0..max_actions {
            if state.is_game_over() {
                break;
            }

            if let Some(player) = state.awaiting_bonus_for() {
                let lane = bonus_lane(state, player);
                self.executor.submit(
                    state,
                    player,
                    Action::ApplyBonusPoint { target: player, lane },
                )?;
                continue;
            }

            if let Some((player, index)) = state.pending_question() {
                let question = self
                    .questions
                    .get(index)
                    .ok_or(ActionError::MissingQuestion(index))?;
                self.answer_question(state, player, question.answer_index)?;
                continue;
            }

            let player = state.current_player();
            self.play_for(state, player)?;
        }
        Ok(state.result().copied())
    }

    fn play_for(&self, state: &mut GameState, player: PlayerId) -> Result<AiTurn, ActionError> {
        let action = self.strategist.choose(state, player);
        match self.executor.submit(state, player, action) {
            Ok(outcome) => Ok(AiTurn {
                player,
                action,
                outcome,
            }),
            Err(err) => {
                warn!("{} chose {:?} but it was rejected ({}); passing", player, action, err);
                let outcome = self.executor.submit(state, player, Action::Pass)?;
                debug!("{} passed after a rejected choice", player);
                Ok(AiTurn {
                    player,
                    action: Action::Pass,
                    outcome,
                })
            }
        }
    }
}

/// Lowest-total lane still below the winning range, else lane 0.
fn bonus_lane(state: &GameState, player: PlayerId) -> usize {
    state
        .player(player)
        .caravans()
        .iter()
        .enumerate()
        .filter(|(_, caravan)| caravan.total() < WIN_MIN)
        .min_by_key(|(_, caravan)| caravan.total())
        .map_or(0, |(lane, _)| lane)
}
