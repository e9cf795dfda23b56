//! Property tests for lane arithmetic and placement rules.

use caravan_engine::caravan::{project_jack, project_king, project_numeric, Caravan};
use caravan_engine::cards::{Card, Rank, Suit};
use caravan_engine::effects::FaceEffect;
use proptest::prelude::*;

#[derive(Clone, Copy, Debug)]
enum Op {
    Numeric(Card),
    King,
    Queen(Suit),
    Bonus,
}

fn suit() -> impl Strategy<Value = Suit> {
    prop::sample::select(Suit::ALL.to_vec())
}

fn numeric_card() -> impl Strategy<Value = Card> {
    (prop::sample::select(Rank::NUMERIC.to_vec()), suit())
        .prop_map(|(rank, suit)| Card::suited(rank, suit))
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        6 => numeric_card().prop_map(Op::Numeric),
        2 => Just(Op::King),
        1 => suit().prop_map(Op::Queen),
        1 => Just(Op::Bonus),
    ]
}

/// Apply operations the way play would, skipping ones the lane refuses.
fn build(ops: &[Op]) -> Caravan {
    let mut lane = Caravan::new();
    for &op in ops {
        match op {
            Op::Numeric(card) => {
                let _ = lane.add_card(card);
            }
            Op::King => {
                if FaceEffect::King.check(&lane, 0).is_ok() {
                    FaceEffect::King.apply(Card::suited(Rank::King, Suit::Clubs), &mut lane);
                }
            }
            Op::Queen(suit) => {
                if FaceEffect::Queen(suit).check(&lane, 0).is_ok() {
                    FaceEffect::Queen(suit).apply(Card::suited(Rank::Queen, suit), &mut lane);
                }
            }
            Op::Bonus => {
                let _ = lane.add_bonus_point(Card::bonus_point());
            }
        }
    }
    lane
}

/// Each numeric card counts value × 2^(kings immediately after it).
fn expected_total(cards: &[Card]) -> u32 {
    cards
        .iter()
        .enumerate()
        .map(|(i, card)| {
            if card.is_numeric() {
                let kings = cards[i + 1..].iter().take_while(|next| next.is_king()).count();
                card.value() << kings
            } else if card.is_bonus() {
                card.value()
            } else {
                0
            }
        })
        .sum()
}

fn lane_ops() -> impl Strategy<Value = Vec<Op>> {
    prop::collection::vec(op(), 0..12)
}

proptest! {
    /// The memoized total always equals the king-multiplier sum, and
    /// reading it does not change it.
    #[test]
    fn prop_total_matches_king_rule(ops in lane_ops()) {
        let lane = build(&ops);
        prop_assert_eq!(lane.total(), expected_total(lane.cards()));
        prop_assert_eq!(lane.total(), lane.total());
        prop_assert_eq!(lane.is_winning(), (21..=26).contains(&lane.total()));
        prop_assert_eq!(lane.is_bust(), lane.total() > 26);
    }

    /// `add_card` accepts exactly what `can_add_numeric` allows, and a
    /// refused card leaves the lane untouched.
    #[test]
    fn prop_add_card_agrees_with_can_add(ops in lane_ops(), card in numeric_card()) {
        let mut lane = build(&ops);
        let before = lane.clone();
        let allowed = lane.can_add_numeric(card);

        prop_assert_eq!(lane.add_card(card), allowed);
        if allowed {
            prop_assert_eq!(lane.cards().last(), Some(&card));
        } else {
            prop_assert_eq!(lane, before);
        }
    }

    /// A card never follows a numeric card of the same value.
    #[test]
    fn prop_same_value_refused(ops in lane_ops(), suit in suit()) {
        let lane = build(&ops);
        if let Some((_, last)) = lane.last_numeric() {
            prop_assert!(!lane.can_add_numeric(Card::suited(last.rank(), suit)));
        }
    }

    /// Projections predict the lane after the real move.
    #[test]
    fn prop_projections_match_moves(ops in lane_ops(), card in numeric_card()) {
        let lane = build(&ops);

        let mut placed = lane.clone();
        match project_numeric(&lane, card) {
            Some(projection) => {
                prop_assert!(placed.add_card(card));
                prop_assert_eq!(projection.total, placed.total());
                prop_assert_eq!(projection.suit, placed.suit());
                prop_assert_eq!(projection.direction, placed.direction());
            }
            None => prop_assert!(!placed.add_card(card)),
        }

        if let Some(total) = project_king(&lane) {
            let mut kinged = lane.clone();
            FaceEffect::King.apply(Card::suited(Rank::King, Suit::Hearts), &mut kinged);
            prop_assert_eq!(total, kinged.total());
        }

        if let Some(total) = project_jack(&lane) {
            let mut jacked = lane.clone();
            FaceEffect::Jack.apply(Card::suited(Rank::Jack, Suit::Hearts), &mut jacked);
            prop_assert_eq!(total, jacked.total());
        }
    }

    /// A jack keeps exactly the cards before the most recent numeric card.
    #[test]
    fn prop_jack_truncates_at_last_numeric(ops in lane_ops()) {
        let lane = build(&ops);
        if let Some((index, _)) = lane.last_numeric() {
            let mut jacked = lane.clone();
            let removed = FaceEffect::Jack.apply(Card::suited(Rank::Jack, Suit::Spades), &mut jacked);

            prop_assert_eq!(jacked.cards(), &lane.cards()[..index]);
            prop_assert_eq!(removed.as_slice(), &lane.cards()[index..]);
            prop_assert_eq!(jacked.direction().is_some(), jacked.numeric_count() >= 2);
        }
    }
}
