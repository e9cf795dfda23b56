//! Deck composition.

use im::OrdSet;

use super::card::{Card, Rank, Suit};

/// One player's 48-card deck in unshuffled order: every numeric and face
/// rank in every suit. Bonus points are never dealt.
#[must_use]
pub fn standard_deck() -> Vec<Card> {
    Suit::ALL
        .into_iter()
        .flat_map(|suit| {
            Rank::NUMERIC
                .into_iter()
                .chain(Rank::FACES)
                .map(move |rank| Card::suited(rank, suit))
        })
        .collect()
}

/// Every distinct card that can appear in either deck.
#[must_use]
pub fn distinct_cards() -> OrdSet<Card> {
    standard_deck().into_iter().collect()
}
