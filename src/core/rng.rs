//! Seeded shuffling.
//!
//! A game owns one seed. Every shuffle draws from an `RngStream` derived
//! from it, so the two decks, the question order, and setup reshuffles
//! never share a sequence: reshuffling one player's deck cannot change
//! what the other player draws.
//!
//! ```
//! use caravan_engine::core::{GameRng, PlayerId, RngStream};
//!
//! let mut first = GameRng::new(42).stream(RngStream::Deck(PlayerId::new(0)));
//! let mut again = GameRng::new(42).stream(RngStream::Deck(PlayerId::new(0)));
//!
//! let (mut a, mut b) = (vec![1, 2, 3, 4, 5, 6], vec![1, 2, 3, 4, 5, 6]);
//! first.shuffle(&mut a);
//! again.shuffle(&mut b);
//! assert_eq!(a, b);
//! ```

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

use super::player::PlayerId;

/// What a derived stream is used for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RngStream {
    /// Initial shuffle of one player's deck.
    Deck(PlayerId),
    /// Order in which bonus questions are asked.
    Questions,
    /// Setup mulligans.
    Reshuffle,
}

impl RngStream {
    /// Stable label mixed into the stream seed.
    #[must_use]
    pub fn label(self) -> String {
        match self {
            RngStream::Deck(player) => format!("deck-{}", player.index()),
            RngStream::Questions => "questions".to_owned(),
            RngStream::Reshuffle => "reshuffle".to_owned(),
        }
    }
}

/// ChaCha8 generator that remembers its seed.
///
/// Serializes as a `GameRngState`, so a saved game resumes mid-stream.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(into = "GameRngState", from = "GameRngState")]
pub struct GameRng {
    seed: u64,
    chacha: ChaCha8Rng,
}

impl GameRng {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            chacha: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// A generator with a random seed, for games that need not replay.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::new(rand::random())
    }

    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// A fresh generator for `stream`. Depends only on this generator's
    /// seed, not on how much of it has been consumed.
    #[must_use]
    pub fn stream(&self, stream: RngStream) -> Self {
        let mut hasher = std::collections::hash_map::DefaultHasher::new();
        self.seed.hash(&mut hasher);
        stream.label().hash(&mut hasher);
        Self::new(hasher.finish())
    }

    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut self.chacha);
    }
}

impl From<GameRng> for GameRngState {
    fn from(rng: GameRng) -> Self {
        Self {
            seed: rng.seed,
            word_pos: rng.chacha.get_word_pos(),
        }
    }
}

impl From<GameRngState> for GameRng {
    fn from(state: GameRngState) -> Self {
        let mut rng = Self::new(state.seed);
        rng.chacha.set_word_pos(state.word_pos);
        rng
    }
}

/// Seed plus position in the ChaCha8 keystream.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRngState {
    pub seed: u64,
    pub word_pos: u128,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::standard_deck;

    fn deck_order(rng: &mut GameRng) -> Vec<crate::cards::Card> {
        let mut deck = standard_deck();
        rng.shuffle(&mut deck);
        deck
    }

    #[test]
    fn test_same_seed_same_order() {
        assert_eq!(
            deck_order(&mut GameRng::new(42)),
            deck_order(&mut GameRng::new(42))
        );
        assert_ne!(
            deck_order(&mut GameRng::new(1)),
            deck_order(&mut GameRng::new(2))
        );
    }

    #[test]
    fn test_player_decks_use_separate_streams() {
        let rng = GameRng::new(42);
        let mut first = rng.stream(RngStream::Deck(PlayerId::new(0)));
        let mut second = rng.stream(RngStream::Deck(PlayerId::new(1)));

        assert_ne!(first.seed(), second.seed());
        assert_ne!(deck_order(&mut first), deck_order(&mut second));
    }

    #[test]
    fn test_stream_ignores_consumption() {
        let fresh = GameRng::new(9);
        let mut used = GameRng::new(9);
        deck_order(&mut used);

        assert_eq!(
            fresh.stream(RngStream::Questions).seed(),
            used.stream(RngStream::Questions).seed()
        );
    }

    #[test]
    fn test_labels() {
        assert_eq!(RngStream::Deck(PlayerId::new(1)).label(), "deck-1");
        assert_eq!(RngStream::Reshuffle.label(), "reshuffle");
    }

    #[test]
    fn test_shuffle_is_a_permutation() {
        let mut shuffled = deck_order(&mut GameRng::new(42));
        assert_ne!(shuffled, standard_deck());

        let mut sorted = standard_deck();
        shuffled.sort_unstable();
        sorted.sort_unstable();
        assert_eq!(shuffled, sorted);
    }

    #[test]
    fn test_serde_resumes_mid_stream() {
        let mut rng = GameRng::new(7);
        deck_order(&mut rng);

        let json = serde_json::to_string(&rng).unwrap();
        let mut restored: GameRng = serde_json::from_str(&json).unwrap();

        assert_eq!(deck_order(&mut restored), deck_order(&mut rng));
    }
}
