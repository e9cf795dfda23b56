//! A single lane of cards and its derived state.
//!
//! ## Scoring
//!
//! Each numeric card scores `value × 2^k`, where `k` is the number of kings
//! immediately following it. Bonus points score their flat value. Kings that
//! do not trail a numeric card, and every other face card, score nothing.
//!
//! ## Locks
//!
//! - **Suit**: set by the first numeric card. A later numeric card of the
//!   locked suit ignores the direction lock.
//! - **Direction**: derived from the first two numeric cards. Stays unset if
//!   their values tie.
//!
//! The total is memoized and refreshed by every mutating method, so reads
//! never observe a stale value.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::cmp::Ordering;

use crate::cards::{Card, Suit};
use crate::core::config::{is_winning_total, WIN_MAX};

/// Inline storage for lane cards; lanes rarely exceed eight cards.
pub type LaneCards = SmallVec<[Card; 8]>;

/// Direction lock.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Ascending,
    Descending,
}

impl Direction {
    /// Direction implied by two consecutive numeric values. `None` on a tie.
    #[must_use]
    pub fn between(first: u32, second: u32) -> Option<Self> {
        match second.cmp(&first) {
            Ordering::Greater => Some(Direction::Ascending),
            Ordering::Less => Some(Direction::Descending),
            Ordering::Equal => None,
        }
    }

    /// Whether `next` continues this direction from `last`.
    #[must_use]
    pub fn permits(self, last: u32, next: u32) -> bool {
        match self {
            Direction::Ascending => next > last,
            Direction::Descending => next < last,
        }
    }

    #[must_use]
    pub fn flipped(self) -> Self {
        match self {
            Direction::Ascending => Direction::Descending,
            Direction::Descending => Direction::Ascending,
        }
    }
}

/// Total of a card sequence under the king-multiplier rule.
///
/// ```
/// use caravan_engine::caravan::lane_total;
/// use caravan_engine::cards::{Card, Rank, Suit};
///
/// let six = Card::suited(Rank::Six, Suit::Hearts);
/// let king = Card::suited(Rank::King, Suit::Clubs);
/// assert_eq!(lane_total(&[six]), 6);
/// assert_eq!(lane_total(&[six, king]), 12);
/// assert_eq!(lane_total(&[six, king, king]), 24);
/// ```
#[must_use]
pub fn lane_total(cards: &[Card]) -> u32 {
    let mut total = 0;
    let mut i = 0;
    while i < cards.len() {
        let card = cards[i];
        if card.is_numeric() {
            let kings = cards[i + 1..].iter().take_while(|c| c.is_king()).count();
            total += card.value() << kings;
            i += 1 + kings;
        } else {
            total += card.value();
            i += 1;
        }
    }
    total
}

/// One lane (caravan) owned by a single player.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Caravan {
    cards: LaneCards,
    suit: Option<Suit>,
    direction: Option<Direction>,
    total: u32,
}

impl Caravan {
    /// Create an empty lane.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // === Queries ===

    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    #[must_use]
    pub fn suit(&self) -> Option<Suit> {
        self.suit
    }

    #[must_use]
    pub fn direction(&self) -> Option<Direction> {
        self.direction
    }

    /// Current lane total.
    #[must_use]
    pub fn total(&self) -> u32 {
        self.total
    }

    /// Total within the winning range.
    #[must_use]
    pub fn is_winning(&self) -> bool {
        is_winning_total(self.total)
    }

    /// Total above the winning range.
    #[must_use]
    pub fn is_bust(&self) -> bool {
        self.total > WIN_MAX
    }

    /// Numeric cards in placement order.
    pub fn numeric_cards(&self) -> impl Iterator<Item = Card> + '_ {
        self.cards.iter().copied().filter(|card| card.is_numeric())
    }

    #[must_use]
    pub fn numeric_count(&self) -> usize {
        self.numeric_cards().count()
    }

    /// Most recent numeric card and its position.
    #[must_use]
    pub fn last_numeric(&self) -> Option<(usize, Card)> {
        self.cards
            .iter()
            .enumerate()
            .rev()
            .find(|(_, card)| card.is_numeric())
            .map(|(i, card)| (i, *card))
    }

    /// Kings immediately following the most recent numeric card.
    #[must_use]
    pub fn trailing_kings(&self) -> usize {
        self.last_numeric().map_or(0, |(i, _)| {
            self.cards[i + 1..].iter().take_while(|c| c.is_king()).count()
        })
    }

    /// Whether a numeric card may be appended.
    ///
    /// Lanes without a numeric card accept any numeric card. Otherwise the
    /// card must differ in value from the most recent numeric card, and then
    /// either match the suit lock or continue the direction lock (any value
    /// is fine while no direction is locked).
    #[must_use]
    pub fn can_add_numeric(&self, card: Card) -> bool {
        if !card.is_numeric() {
            return false;
        }
        let Some((_, last)) = self.last_numeric() else {
            return true;
        };
        if card.value() == last.value() {
            return false;
        }
        if self.suit.is_some() && card.suit() == self.suit {
            return true;
        }
        match self.direction {
            Some(direction) => direction.permits(last.value(), card.value()),
            None => true,
        }
    }

    // === Mutation ===

    /// Append a numeric card if `can_add_numeric` allows it.
    ///
    /// The first numeric card locks the suit; once two numeric cards exist
    /// and no direction is locked, the direction is derived from them.
    #[must_use]
    pub fn add_card(&mut self, card: Card) -> bool {
        if !self.can_add_numeric(card) {
            return false;
        }
        self.cards.push(card);

        let (first, second) = {
            let mut numerics = self.numeric_cards();
            (numerics.next(), numerics.next())
        };
        match (first, second) {
            (Some(first), None) => self.suit = first.suit(),
            (Some(first), Some(second)) if self.direction.is_none() => {
                self.direction = Direction::between(first.value(), second.value());
            }
            _ => {}
        }

        self.refresh();
        true
    }

    /// Append a bonus-point card. Bypasses every lock.
    #[must_use]
    pub fn add_bonus_point(&mut self, card: Card) -> bool {
        if !card.is_bonus() {
            return false;
        }
        self.cards.push(card);
        self.refresh();
        true
    }

    /// Insert a face card at `index`, or append if `index` is past the end.
    /// Locks are left alone; the caller re-derives them if needed.
    pub(crate) fn insert_face(&mut self, card: Card, index: usize) {
        debug_assert!(card.is_face(), "insert_face called with {card}");
        if index >= self.cards.len() {
            self.cards.push(card);
        } else {
            self.cards.insert(index, card);
        }
        self.refresh();
    }

    /// Remove every card from `index` onward and re-derive locks.
    pub(crate) fn truncate_from(&mut self, index: usize) -> Vec<Card> {
        let removed = self.cards.drain(index.min(self.cards.len())..).collect();
        self.rederive_locks();
        removed
    }

    /// Force the suit lock.
    pub(crate) fn lock_suit(&mut self, suit: Suit) {
        self.suit = Some(suit);
        self.refresh();
    }

    /// Reverse the direction lock, if one is set.
    pub(crate) fn flip_direction(&mut self) {
        self.direction = self.direction.map(Direction::flipped);
        self.refresh();
    }

    /// Empty the lane, returning its cards.
    pub fn reset(&mut self) -> Vec<Card> {
        let discarded = self.cards.drain(..).collect();
        self.suit = None;
        self.direction = None;
        self.refresh();
        discarded
    }

    /// Recompute suit and direction strictly from the remaining numeric
    /// cards, clearing both if none remain.
    pub fn rederive_locks(&mut self) {
        let (first, second) = {
            let mut numerics = self.numeric_cards();
            (numerics.next(), numerics.next())
        };
        self.suit = first.and_then(Card::suit);
        self.direction = match (first, second) {
            (Some(first), Some(second)) => Direction::between(first.value(), second.value()),
            _ => None,
        };
        self.refresh();
    }

    fn refresh(&mut self) {
        self.total = lane_total(&self.cards);
        debug_assert!(
            self.direction.is_none() || self.numeric_count() >= 2,
            "direction locked with fewer than two numeric cards: {:?}",
            self.cards
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::Rank;

    fn hearts(rank: Rank) -> Card {
        Card::suited(rank, Suit::Hearts)
    }

    fn spades(rank: Rank) -> Card {
        Card::suited(rank, Suit::Spades)
    }

    fn lane_of(cards: &[Card]) -> Caravan {
        let mut lane = Caravan::new();
        for &card in cards {
            assert!(lane.add_card(card), "could not add {card}");
        }
        lane
    }

    #[test]
    fn test_empty_lane() {
        let lane = Caravan::new();
        assert_eq!(lane.total(), 0);
        assert!(lane.is_empty());
        assert!(!lane.is_winning());
        assert_eq!(lane.suit(), None);
        assert_eq!(lane.direction(), None);
        assert!(lane.last_numeric().is_none());
    }

    #[test]
    fn test_winning_bounds() {
        let lane = lane_of(&[hearts(Rank::Ten), hearts(Rank::Six), hearts(Rank::Four)]);
        assert_eq!(lane.total(), 20);
        assert!(!lane.is_winning());

        let lane = lane_of(&[hearts(Rank::Ten), hearts(Rank::Nine), hearts(Rank::Two)]);
        assert_eq!(lane.total(), 21);
        assert!(lane.is_winning());

        let lane = lane_of(&[hearts(Rank::Ten), hearts(Rank::Nine), hearts(Rank::Seven)]);
        assert_eq!(lane.total(), 26);
        assert!(lane.is_winning());

        let lane = lane_of(&[
            hearts(Rank::Ten),
            hearts(Rank::Nine),
            hearts(Rank::Five),
            hearts(Rank::Three),
        ]);
        assert_eq!(lane.total(), 27);
        assert!(!lane.is_winning());
        assert!(lane.is_bust());
    }

    #[test]
    fn test_first_card_locks_suit() {
        let lane = lane_of(&[hearts(Rank::Five)]);
        assert_eq!(lane.suit(), Some(Suit::Hearts));
        assert_eq!(lane.direction(), None);
    }

    #[test]
    fn test_direction_lock_ascending() {
        let mut lane = lane_of(&[hearts(Rank::Five), spades(Rank::Nine)]);
        assert_eq!(lane.direction(), Some(Direction::Ascending));

        // Seven breaks the ascending run unless it matches the locked suit.
        assert!(!lane.can_add_numeric(spades(Rank::Seven)));
        assert!(lane.can_add_numeric(hearts(Rank::Seven)));
        assert!(lane.add_card(hearts(Rank::Seven)));
        assert_eq!(lane.total(), 21);
    }

    #[test]
    fn test_direction_lock_descending() {
        let lane = lane_of(&[spades(Rank::Nine), hearts(Rank::Four)]);
        assert_eq!(lane.direction(), Some(Direction::Descending));
        assert!(lane.can_add_numeric(hearts(Rank::Two)));
        assert!(!lane.can_add_numeric(hearts(Rank::Six)));
        // Locked suit overrides direction.
        assert!(lane.can_add_numeric(spades(Rank::Six)));
    }

    #[test]
    fn test_rejects_equal_value_any_suit() {
        let lane = lane_of(&[hearts(Rank::Five)]);
        assert!(!lane.can_add_numeric(spades(Rank::Five)));
        assert!(!lane.can_add_numeric(hearts(Rank::Five)));
    }

    #[test]
    fn test_rejects_non_numeric() {
        let mut lane = Caravan::new();
        assert!(!lane.can_add_numeric(hearts(Rank::King)));
        assert!(!lane.add_card(Card::bonus_point()));
        assert!(lane.is_empty());
    }

    #[test]
    fn test_king_doubles_contribution() {
        let mut lane = lane_of(&[hearts(Rank::Six)]);
        assert_eq!(lane.total(), 6);

        lane.insert_face(spades(Rank::King), 1);
        assert_eq!(lane.total(), 12);

        lane.insert_face(spades(Rank::King), 2);
        assert_eq!(lane.total(), 24);
    }

    #[test]
    fn test_king_multiplier_is_per_card() {
        let mut lane = lane_of(&[hearts(Rank::Four)]);
        lane.insert_face(spades(Rank::King), 1);
        assert!(lane.add_card(hearts(Rank::Nine)));
        // 4 * 2 + 9
        assert_eq!(lane.total(), 17);
    }

    #[test]
    fn test_bonus_point_bypasses_locks() {
        let mut lane = lane_of(&[hearts(Rank::Five), hearts(Rank::Nine)]);
        assert!(lane.add_bonus_point(Card::bonus_point()));
        assert_eq!(lane.total(), 15);
        assert!(!lane.add_bonus_point(hearts(Rank::Two)));
    }

    #[test]
    fn test_total_is_idempotent() {
        let lane = lane_of(&[hearts(Rank::Five), hearts(Rank::Nine)]);
        assert_eq!(lane.total(), lane.total());
        assert_eq!(lane.total(), lane_total(lane.cards()));
    }

    #[test]
    fn test_truncate_rederives_locks() {
        let mut lane = lane_of(&[hearts(Rank::Four)]);
        lane.insert_face(spades(Rank::King), 1);
        assert!(lane.add_card(spades(Rank::Nine)));
        assert_eq!(lane.direction(), Some(Direction::Ascending));

        let (index, _) = lane.last_numeric().unwrap();
        let removed = lane.truncate_from(index);

        assert_eq!(removed, vec![spades(Rank::Nine)]);
        assert_eq!(lane.cards(), &[hearts(Rank::Four), spades(Rank::King)]);
        assert_eq!(lane.suit(), Some(Suit::Hearts));
        assert_eq!(lane.direction(), None);
        assert_eq!(lane.total(), 8);
    }

    #[test]
    fn test_rederive_clears_without_numerics() {
        let mut lane = lane_of(&[hearts(Rank::Four)]);
        assert!(lane.add_bonus_point(Card::bonus_point()));
        lane.truncate_from(0);
        assert!(lane.is_empty());
        assert_eq!(lane.suit(), None);
        assert_eq!(lane.total(), 0);
    }

    #[test]
    fn test_flip_direction() {
        let mut lane = lane_of(&[hearts(Rank::Four), hearts(Rank::Eight)]);
        lane.lock_suit(Suit::Clubs);
        lane.flip_direction();
        assert_eq!(lane.suit(), Some(Suit::Clubs));
        assert_eq!(lane.direction(), Some(Direction::Descending));
        assert!(lane.can_add_numeric(spades(Rank::Two)));
        assert!(!lane.can_add_numeric(spades(Rank::Ten)));
        assert!(lane.can_add_numeric(Card::suited(Rank::Ten, Suit::Clubs)));
    }

    #[test]
    fn test_flip_without_direction_is_noop() {
        let mut lane = lane_of(&[hearts(Rank::Four)]);
        lane.flip_direction();
        assert_eq!(lane.direction(), None);
    }

    #[test]
    fn test_reset_returns_cards() {
        let mut lane = lane_of(&[hearts(Rank::Four), hearts(Rank::Eight)]);
        let discarded = lane.reset();
        assert_eq!(discarded, vec![hearts(Rank::Four), hearts(Rank::Eight)]);
        assert_eq!(lane, Caravan::new());
    }

    #[test]
    fn test_trailing_kings() {
        let mut lane = lane_of(&[hearts(Rank::Four)]);
        assert_eq!(lane.trailing_kings(), 0);
        lane.insert_face(spades(Rank::King), 1);
        lane.insert_face(spades(Rank::King), 2);
        assert_eq!(lane.trailing_kings(), 2);
    }
}
