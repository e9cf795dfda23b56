//! Player identification, per-player storage, and the player entity.
//!
//! ## PlayerId
//!
//! Type-safe seat index. The game always has exactly two seats.
//!
//! ## PlayerMap
//!
//! Fixed-size per-player storage indexed by `PlayerId`.
//!
//! ## Player
//!
//! Owns a draw pile (top = end of the vec), a bounded hand, and one
//! `Caravan` per lane. Mutation beyond drawing is crate-internal: only the
//! action executor plays or discards cards.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

use super::config::{HAND_SIZE_LIMIT, LANE_COUNT, PLAYER_COUNT, STARTING_HAND_SIZE};
use super::rng::GameRng;
use crate::ai::Difficulty;
use crate::caravan::Caravan;
use crate::cards::Card;

/// Seat identifier. Player indices are 0-based.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u8);

impl PlayerId {
    /// Both seats, in turn order.
    pub const ALL: [PlayerId; PLAYER_COUNT] = [PlayerId(0), PlayerId(1)];

    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Raw seat index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Whether this id names a seat in the game.
    #[must_use]
    pub const fn is_seated(self) -> bool {
        self.index() < PLAYER_COUNT
    }

    /// The other seat.
    #[must_use]
    pub const fn opponent(self) -> Self {
        Self(1 - (self.0 & 1))
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.0)
    }
}

/// Per-player data storage with O(1) access.
///
/// ```
/// use caravan_engine::core::{PlayerId, PlayerMap};
///
/// let mut sold: PlayerMap<usize> = PlayerMap::new(|_| 0);
/// sold[PlayerId::new(1)] += 1;
/// assert_eq!(sold[PlayerId::new(0)], 0);
/// assert_eq!(sold[PlayerId::new(1)], 1);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerMap<T> {
    data: [T; PLAYER_COUNT],
}

impl<T> PlayerMap<T> {
    /// Create with values from a factory function.
    pub fn new(factory: impl FnMut(PlayerId) -> T) -> Self {
        Self {
            data: PlayerId::ALL.map(factory),
        }
    }

    #[must_use]
    pub fn get(&self, player: PlayerId) -> &T {
        &self.data[player.index()]
    }

    pub fn get_mut(&mut self, player: PlayerId) -> &mut T {
        &mut self.data[player.index()]
    }

    /// Iterate over (PlayerId, &T) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, &T)> {
        PlayerId::ALL.into_iter().zip(self.data.iter())
    }

    /// Iterate over values in seat order.
    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.data.iter()
    }
}

impl<T> Index<PlayerId> for PlayerMap<T> {
    type Output = T;

    fn index(&self, player: PlayerId) -> &Self::Output {
        self.get(player)
    }
}

impl<T> IndexMut<PlayerId> for PlayerMap<T> {
    fn index_mut(&mut self, player: PlayerId) -> &mut Self::Output {
        self.get_mut(player)
    }
}

/// Who controls a seat.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Seat {
    Human,
    Ai(Difficulty),
}

/// A player: deck, hand, and lanes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    name: String,
    seat: Seat,
    deck: Vec<Card>,
    hand: Vec<Card>,
    caravans: [Caravan; LANE_COUNT],
}

impl Player {
    /// Create a player with an already shuffled deck and an empty hand.
    pub fn new(name: impl Into<String>, seat: Seat, deck: Vec<Card>) -> Self {
        Self {
            name: name.into(),
            seat,
            deck,
            hand: Vec::new(),
            caravans: Default::default(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn seat(&self) -> Seat {
        self.seat
    }

    #[must_use]
    pub fn is_ai(&self) -> bool {
        matches!(self.seat, Seat::Ai(_))
    }

    /// Difficulty tier, for AI seats.
    #[must_use]
    pub fn difficulty(&self) -> Option<Difficulty> {
        match self.seat {
            Seat::Ai(difficulty) => Some(difficulty),
            Seat::Human => None,
        }
    }

    /// Draw pile; the top card is the last element.
    #[must_use]
    pub fn deck(&self) -> &[Card] {
        &self.deck
    }

    #[must_use]
    pub fn hand(&self) -> &[Card] {
        &self.hand
    }

    #[must_use]
    pub fn caravans(&self) -> &[Caravan; LANE_COUNT] {
        &self.caravans
    }

    #[must_use]
    pub fn caravan(&self, lane: usize) -> Option<&Caravan> {
        self.caravans.get(lane)
    }

    pub(crate) fn caravan_mut(&mut self, lane: usize) -> &mut Caravan {
        &mut self.caravans[lane]
    }

    // === Drawing ===

    /// Move the top deck card into the hand.
    ///
    /// Returns the drawn card, or `None` if the deck is empty or the hand
    /// is already at `HAND_SIZE_LIMIT`.
    pub fn draw_card(&mut self) -> Option<Card> {
        if self.hand.len() >= HAND_SIZE_LIMIT {
            return None;
        }
        let card = self.deck.pop()?;
        self.hand.push(card);
        Some(card)
    }

    /// Draw the opening hand. Returns how many cards were drawn.
    pub fn deal_starting_hand(&mut self) -> usize {
        (0..STARTING_HAND_SIZE)
            .map_while(|_| self.draw_card())
            .count()
    }

    /// Return the hand to the deck, reshuffle, and deal a fresh hand.
    pub(crate) fn mulligan(&mut self, rng: &mut GameRng) -> usize {
        self.deck.append(&mut self.hand);
        rng.shuffle(&mut self.deck);
        self.deal_starting_hand()
    }

    /// Remove a card from the hand. The index must be in bounds.
    pub(crate) fn take_from_hand(&mut self, index: usize) -> Card {
        self.hand.remove(index)
    }

    // === Queries ===

    /// Index of the highest-value numeric card in hand, first occurrence
    /// winning ties. Used by the AI to seed lanes during setup.
    #[must_use]
    pub fn choose_initial_card(&self) -> Option<usize> {
        self.hand
            .iter()
            .enumerate()
            .filter(|(_, card)| card.is_numeric())
            .fold(None, |best: Option<(usize, u32)>, (i, card)| match best {
                Some((_, value)) if value >= card.value() => best,
                _ => Some((i, card.value())),
            })
            .map(|(i, _)| i)
    }

    #[must_use]
    pub fn has_numeric_in_hand(&self) -> bool {
        self.hand.iter().any(|card| card.is_numeric())
    }

    /// A numeric card in the hand or the deck.
    #[must_use]
    pub fn holds_numeric(&self) -> bool {
        self.has_numeric_in_hand() || self.deck.iter().any(|card| card.is_numeric())
    }

    /// Empty hand and empty deck.
    #[must_use]
    pub fn is_out_of_cards(&self) -> bool {
        self.hand.is_empty() && self.deck.is_empty()
    }

    /// First lane holding no cards.
    #[must_use]
    pub fn first_empty_lane(&self) -> Option<usize> {
        self.caravans.iter().position(Caravan::is_empty)
    }

    /// Every lane holds at least one card.
    #[must_use]
    pub fn lanes_seeded(&self) -> bool {
        self.caravans.iter().all(|lane| !lane.is_empty())
    }

    /// Nothing left to do in setup: every lane is seeded, or no numeric
    /// card remains to seed one with.
    #[must_use]
    pub fn setup_done(&self) -> bool {
        self.lanes_seeded() || !self.holds_numeric()
    }
}
