//! Side-effect-free "what if" queries over a lane.
//!
//! The AI scores hypothetical placements with these instead of copying
//! lanes and mutating the copies. Each function answers exactly what the
//! corresponding mutation would produce.

use super::lane::{lane_total, Caravan, Direction};
use crate::cards::{Card, Suit};

/// Lane state after a hypothetical numeric placement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Projection {
    pub total: u32,
    pub suit: Option<Suit>,
    pub direction: Option<Direction>,
}

/// Result of appending `card`, or `None` if the lane would refuse it.
#[must_use]
pub fn project_numeric(lane: &Caravan, card: Card) -> Option<Projection> {
    if !lane.can_add_numeric(card) {
        return None;
    }
    let mut numerics = lane.numeric_cards();
    let first = numerics.next();
    let has_second = numerics.next().is_some();

    let suit = match first {
        Some(_) => lane.suit(),
        None => card.suit(),
    };
    let direction = lane.direction().or_else(|| match (first, has_second) {
        (Some(first), false) => Direction::between(first.value(), card.value()),
        _ => None,
    });

    Some(Projection {
        total: lane.total() + card.value(),
        suit,
        direction,
    })
}

/// Total after a king joins the most recent numeric card's multiplier run.
#[must_use]
pub fn project_king(lane: &Caravan) -> Option<u32> {
    let (_, last) = lane.last_numeric()?;
    Some(lane.total() + (last.value() << lane.trailing_kings()))
}

/// Total after a jack strips the most recent numeric card and what
/// follows it.
#[must_use]
pub fn project_jack(lane: &Caravan) -> Option<u32> {
    let (index, _) = lane.last_numeric()?;
    Some(lane_total(&lane.cards()[..index]))
}
