//! Face-card effects.
//!
//! Each face rank maps to exactly one `FaceEffect` variant:
//!
//! - **Jack**: removes the most recent numeric card and everything after
//!   it, then re-derives the lane's locks.
//! - **Queen**: locks the lane to the queen's suit and reverses its
//!   direction. The queen is not placed in the lane.
//! - **King**: joins the multiplier run behind the most recent numeric
//!   card, doubling that card's contribution again.
//!
//! Legality (`check`) and application (`apply`) are split so the executor
//! can validate everything before it mutates anything.

use serde::{Deserialize, Serialize};

use crate::caravan::Caravan;
use crate::cards::{Card, FaceRank, Suit};
use crate::core::error::ActionError;

/// The effect of playing a face card onto a lane.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FaceEffect {
    Jack,
    Queen(Suit),
    King,
}

impl FaceEffect {
    /// Effect for a face card. Non-face cards and suitless queens have none.
    pub fn for_card(card: Card) -> Result<Self, ActionError> {
        match card.face() {
            Some(FaceRank::Jack) => Ok(FaceEffect::Jack),
            Some(FaceRank::Queen) => card
                .suit()
                .map(FaceEffect::Queen)
                .ok_or(ActionError::SuitlessQueen(card)),
            Some(FaceRank::King) => Ok(FaceEffect::King),
            None => Err(ActionError::Unplayable(card)),
        }
    }

    /// Whether this effect can target `caravan` (lane number `lane`).
    pub fn check(self, caravan: &Caravan, lane: usize) -> Result<(), ActionError> {
        if caravan.is_empty() {
            return Err(ActionError::LaneEmpty(lane));
        }
        match self {
            FaceEffect::Jack | FaceEffect::King if caravan.last_numeric().is_none() => {
                Err(ActionError::NoNumericCard(lane))
            }
            FaceEffect::Jack | FaceEffect::King | FaceEffect::Queen(_) => Ok(()),
        }
    }

    /// Apply to a lane that passed `check`. Returns the cards removed from
    /// the lane.
    pub fn apply(self, card: Card, caravan: &mut Caravan) -> Vec<Card> {
        match self {
            FaceEffect::Jack => match caravan.last_numeric() {
                Some((index, _)) => caravan.truncate_from(index),
                None => Vec::new(),
            },
            FaceEffect::Queen(suit) => {
                caravan.lock_suit(suit);
                caravan.flip_direction();
                Vec::new()
            }
            FaceEffect::King => {
                if let Some((index, _)) = caravan.last_numeric() {
                    caravan.insert_face(card, index + 1 + caravan.trailing_kings());
                }
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::caravan::Direction;
    use crate::cards::Rank;

    fn hearts(rank: Rank) -> Card {
        Card::suited(rank, Suit::Hearts)
    }

    fn spades(rank: Rank) -> Card {
        Card::suited(rank, Suit::Spades)
    }

    #[test]
    fn test_for_card() {
        assert_eq!(FaceEffect::for_card(hearts(Rank::Jack)), Ok(FaceEffect::Jack));
        assert_eq!(
            FaceEffect::for_card(spades(Rank::Queen)),
            Ok(FaceEffect::Queen(Suit::Spades))
        );
        assert_eq!(FaceEffect::for_card(hearts(Rank::King)), Ok(FaceEffect::King));
        assert_eq!(
            FaceEffect::for_card(hearts(Rank::Five)),
            Err(ActionError::Unplayable(hearts(Rank::Five)))
        );

        let suitless = Card::new(Rank::Queen, None);
        assert_eq!(
            FaceEffect::for_card(suitless),
            Err(ActionError::SuitlessQueen(suitless))
        );
    }

    #[test]
    fn test_check_requires_cards() {
        let empty = Caravan::new();
        assert_eq!(FaceEffect::King.check(&empty, 1), Err(ActionError::LaneEmpty(1)));
        assert_eq!(
            FaceEffect::Queen(Suit::Clubs).check(&empty, 0),
            Err(ActionError::LaneEmpty(0))
        );
    }

    #[test]
    fn test_check_requires_numeric_for_jack_and_king() {
        let mut lane = Caravan::new();
        assert!(lane.add_bonus_point(Card::bonus_point()));

        assert_eq!(FaceEffect::Jack.check(&lane, 2), Err(ActionError::NoNumericCard(2)));
        assert_eq!(FaceEffect::King.check(&lane, 2), Err(ActionError::NoNumericCard(2)));
        assert_eq!(FaceEffect::Queen(Suit::Clubs).check(&lane, 2), Ok(()));
    }

    #[test]
    fn test_jack_removes_last_numeric_and_after() {
        let mut lane = Caravan::new();
        assert!(lane.add_card(hearts(Rank::Four)));
        FaceEffect::King.apply(spades(Rank::King), &mut lane);
        assert!(lane.add_card(spades(Rank::Nine)));
        FaceEffect::King.apply(hearts(Rank::King), &mut lane);
        assert_eq!(lane.total(), 8 + 18);

        let removed = FaceEffect::Jack.apply(hearts(Rank::Jack), &mut lane);

        assert_eq!(removed, vec![spades(Rank::Nine), hearts(Rank::King)]);
        assert_eq!(lane.cards(), &[hearts(Rank::Four), spades(Rank::King)]);
        assert_eq!(lane.total(), 8);
        assert_eq!(lane.suit(), Some(Suit::Hearts));
        assert_eq!(lane.direction(), None);
    }

    #[test]
    fn test_queen_locks_suit_and_flips() {
        let mut lane = Caravan::new();
        assert!(lane.add_card(hearts(Rank::Three)));
        assert!(lane.add_card(hearts(Rank::Seven)));

        let removed = FaceEffect::Queen(Suit::Diamonds).apply(spades(Rank::Queen), &mut lane);

        assert!(removed.is_empty());
        assert_eq!(lane.len(), 2);
        assert_eq!(lane.suit(), Some(Suit::Diamonds));
        assert_eq!(lane.direction(), Some(Direction::Descending));
        assert_eq!(lane.total(), 10);
    }

    #[test]
    fn test_king_joins_trailing_run() {
        let mut lane = Caravan::new();
        assert!(lane.add_card(hearts(Rank::Six)));
        let king = spades(Rank::King);

        FaceEffect::King.apply(king, &mut lane);
        assert_eq!(lane.total(), 12);

        FaceEffect::King.apply(king, &mut lane);
        assert_eq!(lane.total(), 24);
        assert_eq!(lane.cards(), &[hearts(Rank::Six), king, king]);
    }

    #[test]
    fn test_king_inserted_before_later_bonus() {
        let mut lane = Caravan::new();
        assert!(lane.add_card(hearts(Rank::Six)));
        assert!(lane.add_bonus_point(Card::bonus_point()));

        FaceEffect::King.apply(spades(Rank::King), &mut lane);

        assert_eq!(
            lane.cards(),
            &[hearts(Rank::Six), spades(Rank::King), Card::bonus_point()]
        );
        assert_eq!(lane.total(), 13);
    }
}
