//! Game state: both players, turn bookkeeping, and the bonus interlude.
//!
//! ## Phases
//!
//! `Setup → Playing → GameOver`, with `BonusInterlude` entered from
//! `Playing` at the start of every third round for a human seat. Only the
//! `ActionExecutor` moves between phases; everything public here is a read.
//!
//! ## Information Tracking
//!
//! `unseen_cards` holds the distinct cards the AI has not yet observed:
//! cards on the table, discarded cards, and the AI's own hands are removed
//! as they appear.
//!
//! Uses `im` persistent collections for the history and unseen set so
//! cloning a state for analysis stays cheap.

use im::{OrdSet, Vector};
use log::{debug, info};
use serde::{Deserialize, Serialize};

use super::action::{Action, ActionRecord};
use super::config::{GameConfig, LANES_TO_WIN, LANE_COUNT, QUESTION_ROUND_INTERVAL};
use super::player::{Player, PlayerId, PlayerMap};
use super::rng::{GameRng, RngStream};
use crate::caravan::Caravan;
use crate::cards::{distinct_cards, standard_deck, Card};
use crate::rules::GameResult;
use crate::trivia::QuestionDeck;

/// Externally visible phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Setup,
    Playing,
    BonusInterlude,
    GameOver,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Phase::Setup => "setup",
            Phase::Playing => "play",
            Phase::BonusInterlude => "the bonus interlude",
            Phase::GameOver => "game over",
        })
    }
}

/// Stage of an active bonus interlude.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Interlude {
    /// `player` must answer question `question` of the question source.
    Question { player: PlayerId, question: usize },

    /// `player` answered correctly and must place a bonus point.
    AwaitingPlacement { player: PlayerId },
}

/// Complete game state.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameState {
    players: PlayerMap<Player>,

    // === Turn Bookkeeping ===
    current: PlayerId,
    round: u32,
    setup: bool,
    result: Option<GameResult>,

    // === Bonus Interlude ===
    questions: QuestionDeck,
    interlude: Option<Interlude>,

    // === Information Tracking ===
    unseen: OrdSet<Card>,
    history: Vector<ActionRecord>,
    sequence: u32,

    /// Stream for in-game reshuffles.
    rng: GameRng,
}

impl GameState {
    /// Create a game with freshly shuffled standard decks.
    ///
    /// Each deck and the question order use their own `RngStream`, so the
    /// same seed always yields the same game.
    #[must_use]
    pub fn new(config: &GameConfig, question_count: usize) -> Self {
        let rng = GameRng::new(config.seed);
        let decks = PlayerMap::new(|player| {
            let mut deck = standard_deck();
            rng.stream(RngStream::Deck(player)).shuffle(&mut deck);
            deck
        });
        Self::with_decks(config, decks, question_count)
    }

    /// Create a game from prepared decks (top = last element).
    ///
    /// Decks are used as given, which makes scripted scenarios possible.
    #[must_use]
    pub fn with_decks(config: &GameConfig, decks: PlayerMap<Vec<Card>>, question_count: usize) -> Self {
        let rng = GameRng::new(config.seed);
        let mut decks = decks;
        let players = PlayerMap::new(|id| {
            let seat = &config.seats[id.index()];
            let mut player = Player::new(seat.name.clone(), seat.seat, std::mem::take(&mut decks[id]));
            player.deal_starting_hand();
            player
        });

        let mut unseen = distinct_cards();
        for player in players.values().filter(|p| p.is_ai()) {
            for card in player.hand() {
                unseen.remove(card);
            }
        }

        let questions = QuestionDeck::shuffled(question_count, &mut rng.stream(RngStream::Questions));

        info!(
            "game started (seed {}): {} vs {}",
            config.seed,
            players[PlayerId::new(0)].name(),
            players[PlayerId::new(1)].name()
        );

        Self {
            players,
            current: PlayerId::new(0),
            round: 0,
            setup: true,
            result: None,
            questions,
            interlude: None,
            unseen,
            history: Vector::new(),
            sequence: 0,
            rng: rng.stream(RngStream::Reshuffle),
        }
    }

    // === Players ===

    #[must_use]
    pub fn player(&self, player: PlayerId) -> &Player {
        &self.players[player]
    }

    #[must_use]
    pub fn players(&self) -> &PlayerMap<Player> {
        &self.players
    }

    pub(crate) fn player_mut(&mut self, player: PlayerId) -> &mut Player {
        &mut self.players[player]
    }

    /// Whose turn it is.
    #[must_use]
    pub fn current_player(&self) -> PlayerId {
        self.current
    }

    #[must_use]
    pub fn opponent_of(&self, player: PlayerId) -> PlayerId {
        player.opponent()
    }

    /// A lane, or `None` if the owner or lane index is out of range.
    #[must_use]
    pub fn caravan(&self, owner: PlayerId, lane: usize) -> Option<&Caravan> {
        if !owner.is_seated() {
            return None;
        }
        self.players[owner].caravan(lane)
    }

    // === Phase ===

    #[must_use]
    pub fn phase(&self) -> Phase {
        if self.result.is_some() {
            Phase::GameOver
        } else if self.setup {
            Phase::Setup
        } else if self.interlude.is_some() {
            Phase::BonusInterlude
        } else {
            Phase::Playing
        }
    }

    #[must_use]
    pub fn is_setup_phase(&self) -> bool {
        self.setup
    }

    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.result.is_some()
    }

    #[must_use]
    pub fn result(&self) -> Option<&GameResult> {
        self.result.as_ref()
    }

    /// The winner, if the game ended with one.
    #[must_use]
    pub fn winner(&self) -> Option<PlayerId> {
        match self.result {
            Some(GameResult::Winner(player)) => Some(player),
            _ => None,
        }
    }

    /// Round counter. Zero during setup and the first round of play.
    #[must_use]
    pub fn round(&self) -> u32 {
        self.round
    }

    // === Lane Comparison ===

    /// Whether `owner` has sold `lane`.
    ///
    /// The owner's lane must be winning and either the mirrored lane is
    /// not winning or the owner's total is strictly higher. Ties sell to
    /// neither side.
    #[must_use]
    pub fn is_lane_sold_by(&self, owner: PlayerId, lane: usize) -> bool {
        let (Some(own), Some(mirrored)) = (
            self.caravan(owner, lane),
            self.caravan(owner.opponent(), lane),
        ) else {
            return false;
        };
        own.is_winning() && (!mirrored.is_winning() || own.total() > mirrored.total())
    }

    #[must_use]
    pub fn is_lane_sold_by_anyone(&self, lane: usize) -> bool {
        PlayerId::ALL
            .into_iter()
            .any(|player| self.is_lane_sold_by(player, lane))
    }

    #[must_use]
    pub fn sold_lane_count(&self, player: PlayerId) -> usize {
        (0..LANE_COUNT)
            .filter(|&lane| self.is_lane_sold_by(player, lane))
            .count()
    }

    /// Whether `player` has nothing to do on their turn: no cards in hand
    /// or deck, and no lane they could discard.
    #[must_use]
    pub fn is_stuck(&self, player: PlayerId) -> bool {
        let seat = &self.players[player];
        seat.is_out_of_cards()
            && seat
                .caravans()
                .iter()
                .enumerate()
                .all(|(lane, caravan)| caravan.is_empty() || self.is_lane_sold_by_anyone(lane))
    }

    // === Information ===

    /// Distinct cards the AI has not observed.
    #[must_use]
    pub fn unseen_cards(&self) -> &OrdSet<Card> {
        &self.unseen
    }

    #[must_use]
    pub fn history(&self) -> &Vector<ActionRecord> {
        &self.history
    }

    // === Interlude ===

    #[must_use]
    pub fn interlude(&self) -> Option<Interlude> {
        self.interlude
    }

    /// The player who must answer, and the question index they face.
    #[must_use]
    pub fn pending_question(&self) -> Option<(PlayerId, usize)> {
        match self.interlude {
            Some(Interlude::Question { player, question }) => Some((player, question)),
            _ => None,
        }
    }

    /// The player holding an unplaced bonus point.
    #[must_use]
    pub fn awaiting_bonus_for(&self) -> Option<PlayerId> {
        match self.interlude {
            Some(Interlude::AwaitingPlacement { player }) => Some(player),
            _ => None,
        }
    }

    #[must_use]
    pub fn questions(&self) -> &QuestionDeck {
        &self.questions
    }

    /// Serialize the full state with bincode.
    ///
    /// Two snapshots are equal exactly when the states are identical,
    /// which makes this handy for checking that nothing changed.
    pub fn snapshot(&self) -> Result<Vec<u8>, bincode::Error> {
        bincode::serialize(self)
    }

    // === Mutation (executor only) ===

    pub(crate) fn mark_seen(&mut self, card: Card) {
        self.unseen.remove(&card);
    }

    pub(crate) fn mark_all_seen(&mut self, cards: impl IntoIterator<Item = Card>) {
        for card in cards {
            self.mark_seen(card);
        }
    }

    /// Append an accepted action to the history.
    pub(crate) fn record(&mut self, player: PlayerId, action: Action, automatic: bool) {
        self.history.push_back(ActionRecord {
            player,
            action,
            round: self.round,
            sequence: self.sequence,
            automatic,
        });
        self.sequence += 1;
    }

    /// Return `player`'s hand to their deck, reshuffle, and redeal.
    pub(crate) fn mulligan(&mut self, player: PlayerId) -> usize {
        let dealt = self.players[player].mulligan(&mut self.rng);
        if self.players[player].is_ai() {
            let hand = self.players[player].hand().to_vec();
            self.mark_all_seen(hand);
        }
        dealt
    }

    /// End the game if a player has sold enough lanes or both players
    /// are out of cards. Never ends during setup.
    pub(crate) fn check_game_over(&mut self) -> Option<&GameResult> {
        if self.result.is_none() {
            self.result = self.evaluate_result();
            if let Some(result) = &self.result {
                self.interlude = None;
                info!("game over after round {}: {:?}", self.round, result);
            }
        }
        self.result.as_ref()
    }

    fn evaluate_result(&self) -> Option<GameResult> {
        if self.setup {
            return None;
        }
        let [first, second] = PlayerId::ALL.map(|player| self.sold_lane_count(player));
        if first >= LANES_TO_WIN {
            return Some(GameResult::Winner(PlayerId::new(0)));
        }
        if second >= LANES_TO_WIN {
            return Some(GameResult::Winner(PlayerId::new(1)));
        }
        if self.players.values().all(Player::is_out_of_cards) {
            return Some(match first.cmp(&second) {
                std::cmp::Ordering::Greater => GameResult::Winner(PlayerId::new(0)),
                std::cmp::Ordering::Less => GameResult::Winner(PlayerId::new(1)),
                std::cmp::Ordering::Equal => GameResult::Draw,
            });
        }
        None
    }

    /// Setup turn order: alternate, skipping a player who is done seeding.
    /// Ends setup once both players are done.
    pub(crate) fn advance_setup(&mut self) {
        if self.players.values().all(Player::setup_done) {
            self.setup = false;
            self.current = PlayerId::new(0);
            self.round = 0;
            debug!("setup complete, {} starts", self.current);
            return;
        }
        let next = self.current.opponent();
        if !self.players[next].setup_done() {
            self.current = next;
        }
    }

    /// Pass the turn. Wrapping back to player 0 starts a new round, and a
    /// human starting every third round faces a bonus question if any
    /// remain.
    pub(crate) fn advance_turn(&mut self) {
        self.current = self.current.opponent();
        if self.current != PlayerId::new(0) {
            return;
        }

        self.round += 1;
        debug!("round {} started", self.round);

        let question_round = self.round % QUESTION_ROUND_INTERVAL == 0;
        if question_round && !self.players[self.current].is_ai() {
            if let Some(question) = self.questions.draw() {
                debug!("{} faces bonus question {}", self.current, question);
                self.interlude = Some(Interlude::Question {
                    player: self.current,
                    question,
                });
            }
        }
    }

    pub(crate) fn award_bonus(&mut self, player: PlayerId) {
        self.interlude = Some(Interlude::AwaitingPlacement { player });
    }

    pub(crate) fn clear_interlude(&mut self) {
        self.interlude = None;
    }
}
