//! Heuristic move selection.
//!
//! The strategist never mutates a game. It reads the state, scores each
//! move it considers worthwhile with `ScoringWeights`, and returns one
//! `Action` for the caller to submit through the executor like any other
//! request.
//!
//! ## Candidates
//!
//! - Numeric cards on the AI's own unsold lanes, skipping busts
//! - Kings on the AI's own lanes, jacks and queens on opposing lanes
//! - Discarding one of the AI's bust lanes
//! - A fallback card discard when the hand is full or nothing else scored
//!
//! Hypothetical placements use the pure projections in `caravan`, so no
//! lane is ever copied.

use log::trace;
use rustc_hash::FxHashSet;

use super::config::{Difficulty, ScoringWeights};
use crate::caravan::{project_jack, project_king, project_numeric, Caravan};
use crate::cards::{Card, FaceRank, Suit};
use crate::core::action::Action;
use crate::core::config::{is_winning_total, HAND_SIZE_LIMIT, WIN_MAX};
use crate::core::player::PlayerId;
use crate::core::state::GameState;

/// A scored move.
#[derive(Clone, Debug, PartialEq)]
pub struct Candidate {
    pub score: f64,
    pub action: Action,
}

/// Something that picks an action for a player.
pub trait ActionPolicy {
    fn choose(&self, state: &GameState, player: PlayerId) -> Action;
}

/// Heuristic AI opponent.
#[derive(Clone, Debug, Default)]
pub struct Strategist {
    weights: ScoringWeights,
}

impl Strategist {
    #[must_use]
    pub fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    #[must_use]
    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    /// Setup move: the highest numeric card into the first empty lane, or
    /// a pass (reshuffle) when no numeric card is held.
    #[must_use]
    pub fn choose_setup_action(&self, state: &GameState, player: PlayerId) -> Action {
        let seat = state.player(player);
        match (seat.choose_initial_card(), seat.first_empty_lane()) {
            (Some(card_index), Some(lane)) => Action::PlaceInitialCard { card_index, lane },
            _ => Action::Pass,
        }
    }

    /// Pick a move for `player` at the given difficulty.
    ///
    /// Candidates are ranked by score (ties keep generation order) and the
    /// one at `difficulty.rank_offset()` is returned, clamped to the list.
    /// Passes when nothing scored.
    #[must_use]
    pub fn choose_action(&self, state: &GameState, player: PlayerId, difficulty: Difficulty) -> Action {
        if state.is_setup_phase() {
            return self.choose_setup_action(state, player);
        }
        let mut candidates = self.ranked(state, player, difficulty);
        if candidates.is_empty() {
            return Action::Pass;
        }
        let pick = difficulty.rank_offset().min(candidates.len() - 1);
        candidates.swap_remove(pick).action
    }

    /// All positively scored moves for `player` at the seat's own
    /// difficulty, best first.
    #[must_use]
    pub fn candidates(&self, state: &GameState, player: PlayerId) -> Vec<Candidate> {
        let difficulty = state.player(player).difficulty().unwrap_or_default();
        self.ranked(state, player, difficulty)
    }

    /// All positively scored moves for `player` at `difficulty`, best
    /// first. Only tiers that read the unseen pool score queen denial.
    #[must_use]
    pub fn ranked(&self, state: &GameState, player: PlayerId, difficulty: Difficulty) -> Vec<Candidate> {
        let mut candidates = Vec::new();
        self.push_numeric_plays(state, player, &mut candidates);
        self.push_face_plays(state, player, difficulty, &mut candidates);
        self.push_lane_discards(state, player, &mut candidates);
        candidates.retain(|candidate| candidate.score > 0.0);
        self.push_fallback_discard(state, player, &mut candidates);

        candidates.retain(|candidate| candidate.score > 0.0);
        candidates.sort_by(|a, b| b.score.total_cmp(&a.score));
        trace!("{} candidates: {:?}", player, candidates);
        candidates
    }

    // === Numeric cards ===

    fn push_numeric_plays(&self, state: &GameState, player: PlayerId, out: &mut Vec<Candidate>) {
        let me = state.player(player);
        let opponent = state.player(player.opponent());

        for (card_index, &card) in me.hand().iter().enumerate() {
            if !card.is_numeric() {
                continue;
            }
            for (lane, caravan) in me.caravans().iter().enumerate() {
                if state.is_lane_sold_by(player, lane) {
                    continue;
                }
                let Some(projection) = project_numeric(caravan, card) else {
                    continue;
                };
                let total = projection.total;
                if total > WIN_MAX {
                    continue;
                }

                let opposing = opponent.caravans()[lane].total();
                let mut score = f64::from(total)
                    + if is_winning_total(total) && total > opposing {
                        self.weights.win_lane
                    } else if is_winning_total(total) {
                        self.weights.setup_win
                    } else {
                        self.weights.basic_progress
                    };
                if is_flexible(caravan, card) {
                    score += self.weights.flexibility_bonus;
                }

                out.push(Candidate {
                    score,
                    action: Action::PlayCard {
                        card_index,
                        target: player,
                        lane,
                    },
                });
            }
        }
    }

    // === Face cards ===

    fn push_face_plays(
        &self,
        state: &GameState,
        player: PlayerId,
        difficulty: Difficulty,
        out: &mut Vec<Candidate>,
    ) {
        let me = state.player(player);
        let opponent = player.opponent();

        for (card_index, &card) in me.hand().iter().enumerate() {
            let Some(face) = card.face() else {
                continue;
            };
            let target = match face {
                FaceRank::King => player,
                FaceRank::Jack | FaceRank::Queen => opponent,
            };

            for (lane, caravan) in state.player(target).caravans().iter().enumerate() {
                if caravan.is_empty() || state.is_lane_sold_by_anyone(lane) {
                    continue;
                }
                let score = match face {
                    FaceRank::King => self.score_king(state, opponent, lane, caravan),
                    FaceRank::Jack => self.score_jack(caravan),
                    FaceRank::Queen => card
                        .suit()
                        .map(|suit| self.score_queen(state, player, suit, caravan, difficulty)),
                };
                if let Some(score) = score {
                    out.push(Candidate {
                        score,
                        action: Action::PlayCard {
                            card_index,
                            target,
                            lane,
                        },
                    });
                }
            }
        }
    }

    fn score_king(&self, state: &GameState, opponent: PlayerId, lane: usize, caravan: &Caravan) -> Option<f64> {
        let total = project_king(caravan)?;
        if total > WIN_MAX {
            return None;
        }
        let opposing = state.player(opponent).caravans()[lane].total();
        Some(if is_winning_total(total) && total > opposing {
            self.weights.win_lane_with_king + f64::from(total)
        } else {
            self.weights.king_progress + f64::from(total - caravan.total())
        })
    }

    fn score_jack(&self, caravan: &Caravan) -> Option<f64> {
        let removed = f64::from(caravan.total() - project_jack(caravan)?);
        Some(if caravan.is_winning() {
            self.weights.break_winning_lane + removed
        } else {
            self.weights.major_disruption + removed
        })
    }

    /// Lane total, plus synergy with our own same-suit numeric cards, plus
    /// (for tiers that read the unseen pool) the expected number of
    /// opposing hand cards the new suit lock shuts out.
    fn score_queen(
        &self,
        state: &GameState,
        player: PlayerId,
        suit: Suit,
        caravan: &Caravan,
        difficulty: Difficulty,
    ) -> f64 {
        let synergy = state
            .player(player)
            .hand()
            .iter()
            .filter(|card| card.is_numeric() && card.suit() == Some(suit))
            .count();

        let unseen = state.unseen_cards();
        let denial = if unseen.is_empty() || !difficulty.reads_unseen_cards() {
            0.0
        } else {
            let off_suit = unseen
                .iter()
                .filter(|card| card.is_numeric() && card.suit() != Some(suit))
                .count();
            let opposing_hand = state.player(player.opponent()).hand().len();
            off_suit as f64 / unseen.len() as f64 * opposing_hand as f64
        };

        f64::from(caravan.total())
            + synergy as f64 * self.weights.queen_synergy_per_card
            + denial * self.weights.queen_denial_weight
    }

    // === Discards ===

    fn push_lane_discards(&self, state: &GameState, player: PlayerId, out: &mut Vec<Candidate>) {
        for (lane, caravan) in state.player(player).caravans().iter().enumerate() {
            if caravan.is_bust() && !state.is_lane_sold_by_anyone(lane) {
                out.push(Candidate {
                    score: self.weights.discard_lane,
                    action: Action::DiscardCaravan { lane },
                });
            }
        }
    }

    /// Discard the card with the lowest estimated future value. Only
    /// offered when the hand is full or nothing else scored.
    fn push_fallback_discard(&self, state: &GameState, player: PlayerId, out: &mut Vec<Candidate>) {
        let me = state.player(player);
        if me.hand().len() < HAND_SIZE_LIMIT && !out.is_empty() {
            return;
        }

        let suits_in_play: FxHashSet<Suit> = me.caravans().iter().filter_map(Caravan::suit).collect();
        let worst = me
            .hand()
            .iter()
            .enumerate()
            .fold(None, |worst: Option<(usize, f64)>, (index, &card)| {
                let potential = self.potential(card, &suits_in_play);
                match worst {
                    Some((_, lowest)) if lowest <= potential => worst,
                    _ => Some((index, potential)),
                }
            });

        if let Some((card_index, _)) = worst {
            let score = if out.is_empty() {
                self.weights.discard_fallback
            } else {
                self.weights.discard_crowded
            };
            out.push(Candidate {
                score,
                action: Action::DiscardCard { card_index },
            });
        }
    }

    fn potential(&self, card: Card, suits_in_play: &FxHashSet<Suit>) -> f64 {
        match card.face() {
            Some(FaceRank::Jack) => self.weights.jack_utility,
            Some(FaceRank::Queen) => self.weights.queen_utility,
            Some(FaceRank::King) => self.weights.king_utility,
            None if card.is_numeric() => {
                let in_play = card.suit().is_some_and(|suit| suits_in_play.contains(&suit));
                f64::from(card.value()) + if in_play { self.weights.suit_in_play_bonus } else { 0.0 }
            }
            None => 0.0,
        }
    }
}

impl ActionPolicy for Strategist {
    /// Uses the seat's own difficulty; human seats get tier 0.
    fn choose(&self, state: &GameState, player: PlayerId) -> Action {
        let difficulty = state.player(player).difficulty().unwrap_or_default();
        self.choose_action(state, player, difficulty)
    }
}

/// The card matches the lane's suit lock but the direction lock alone
/// would not let it in.
fn is_flexible(caravan: &Caravan, card: Card) -> bool {
    let Some((_, last)) = caravan.last_numeric() else {
        return false;
    };
    card.suit().is_some()
        && card.suit() == caravan.suit()
        && !caravan
            .direction()
            .is_some_and(|direction| direction.permits(last.value(), card.value()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::Rank;
    use crate::core::config::GameConfig;
    use crate::core::player::PlayerMap;
    use crate::rules::{ActionExecutor, RulesEngine};

    const HUMAN: PlayerId = PlayerId::new(0);
    const AI: PlayerId = PlayerId::new(1);

    fn c(rank: Rank, suit: Suit) -> Card {
        Card::suited(rank, suit)
    }

    /// Game from stacked decks listed in draw order, seeded through setup by
    /// the strategist itself.
    fn seeded(human: Vec<Card>, ai: Vec<Card>) -> GameState {
        let mut raw = [human, ai];
        for deck in &mut raw {
            deck.reverse();
        }
        let decks = PlayerMap::new(|player| std::mem::take(&mut raw[player.index()]));
        let mut state = GameState::with_decks(&GameConfig::new(1), decks, 0);

        let strategist = Strategist::default();
        let executor = ActionExecutor::new();
        while state.is_setup_phase() {
            let player = state.current_player();
            let action = strategist.choose_setup_action(&state, player);
            executor.submit(&mut state, player, action).unwrap();
        }
        state
    }

    /// Seeds lanes with Five, Four, Three and leaves the Two in hand.
    fn filler(suit: Suit) -> Vec<Card> {
        [Rank::Two, Rank::Three, Rank::Four, Rank::Five]
            .into_iter()
            .map(|rank| c(rank, suit))
            .collect()
    }

    #[test]
    fn test_setup_action_highest_first_empty() {
        let state = seeded(
            vec![c(Rank::Ten, Suit::Clubs), c(Rank::Nine, Suit::Clubs), c(Rank::Eight, Suit::Clubs)],
            vec![c(Rank::Ten, Suit::Spades), c(Rank::Nine, Suit::Spades), c(Rank::Eight, Suit::Spades)],
        );
        assert_eq!(state.caravan(AI, 0).unwrap().total(), 10);
        assert_eq!(state.caravan(AI, 1).unwrap().total(), 9);
        assert_eq!(state.caravan(AI, 2).unwrap().total(), 8);
    }

    #[test]
    fn test_setup_passes_without_numeric() {
        let config = GameConfig::new(1);
        let decks = PlayerMap::new(|_| vec![c(Rank::King, Suit::Hearts)]);
        let state = GameState::with_decks(&config, decks, 0);
        assert_eq!(Strategist::default().choose_setup_action(&state, HUMAN), Action::Pass);
    }

    #[test]
    fn test_prefers_winning_lane() {
        // AI lanes: [10], [9], [8] (spades). Hand after setup: Two of
        // Hearts, Six of Diamonds.
        let mut ai = vec![c(Rank::Ten, Suit::Spades), c(Rank::Nine, Suit::Spades), c(Rank::Eight, Suit::Spades)];
        ai.extend([c(Rank::Two, Suit::Hearts), c(Rank::Six, Suit::Diamonds)]);
        let mut state = seeded(filler(Suit::Clubs), ai);

        // Human passes so the AI is on turn.
        ActionExecutor::new().submit(&mut state, HUMAN, Action::Pass).unwrap();

        let candidates = Strategist::default().candidates(&state, AI);
        let best = &candidates[0];
        // Nothing reaches 21, so the best is basic progress on the highest
        // total: Ten + Six.
        assert_eq!(best.score, 10.0 + 16.0);
        assert_eq!(best.action, Action::PlayCard { card_index: 1, target: AI, lane: 0 });
        assert!(candidates.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn test_win_lane_outranks_progress() {
        let mut state = seeded(
            filler(Suit::Clubs),
            vec![
                c(Rank::Ten, Suit::Spades),
                c(Rank::Nine, Suit::Spades),
                c(Rank::Eight, Suit::Spades),
                c(Rank::Two, Suit::Hearts),
            ],
        );
        // Give the AI a lane at 19 so a Two of Hearts (off-suit, descending)
        // reaches 21.
        {
            let lane = state.player_mut(AI).caravan_mut(0);
            assert!(lane.add_card(c(Rank::Nine, Suit::Spades)));
        }
        ActionExecutor::new().submit(&mut state, HUMAN, Action::Pass).unwrap();

        let candidates = Strategist::default().candidates(&state, AI);
        assert_eq!(candidates[0].score, 100.0 + 21.0);
        assert!(matches!(
            candidates[0].action,
            Action::PlayCard { target: AI, lane: 0, .. }
        ));
    }

    #[test]
    fn test_jack_targets_opponent() {
        let mut ai = filler(Suit::Spades);
        ai.push(c(Rank::Jack, Suit::Spades));
        let mut state = seeded(filler(Suit::Clubs), ai);
        ActionExecutor::new().submit(&mut state, HUMAN, Action::Pass).unwrap();

        let candidates = Strategist::default().candidates(&state, AI);
        let jacks: Vec<_> = candidates
            .iter()
            .filter(|candidate| matches!(candidate.action, Action::PlayCard { target, .. } if target == HUMAN))
            .collect();
        assert_eq!(jacks.len(), 3);
        // Highest removal first: the Five.
        assert_eq!(jacks[0].score, 40.0 + 5.0);
    }

    #[test]
    fn test_bust_lane_discard() {
        let mut state = seeded(filler(Suit::Clubs), filler(Suit::Spades));
        {
            let lane = state.player_mut(AI).caravan_mut(1);
            assert!(lane.add_card(c(Rank::Ten, Suit::Spades)));
            assert!(lane.add_card(c(Rank::Nine, Suit::Spades)));
            assert!(lane.add_card(c(Rank::Eight, Suit::Spades)));
        }
        assert!(state.caravan(AI, 1).unwrap().is_bust());
        ActionExecutor::new().submit(&mut state, HUMAN, Action::Pass).unwrap();

        let candidates = Strategist::default().candidates(&state, AI);
        assert!(candidates.contains(&Candidate {
            score: 15.0,
            action: Action::DiscardCaravan { lane: 1 },
        }));
    }

    #[test]
    fn test_pass_when_nothing_scores() {
        let ai = vec![c(Rank::Two, Suit::Spades), c(Rank::Three, Suit::Spades), c(Rank::Four, Suit::Spades)];
        let mut state = seeded(filler(Suit::Clubs), ai);
        ActionExecutor::new().submit(&mut state, HUMAN, Action::Pass).unwrap();

        assert!(state.player(AI).hand().is_empty());
        assert_eq!(
            Strategist::default().choose_action(&state, AI, Difficulty::default()),
            Action::Pass
        );
    }

    #[test]
    fn test_fallback_discard_ignores_unscored_moves() {
        let mut state = seeded(filler(Suit::Clubs), filler(Suit::Spades));
        ActionExecutor::new().submit(&mut state, HUMAN, Action::Pass).unwrap();

        // The Two of Spades still fits every lane, but those plays now
        // score below zero.
        let strategist = Strategist::new(ScoringWeights {
            basic_progress: -100.0,
            ..ScoringWeights::default()
        });
        assert_eq!(
            strategist.candidates(&state, AI),
            vec![Candidate {
                score: ScoringWeights::default().discard_fallback,
                action: Action::DiscardCard { card_index: 0 },
            }]
        );
    }

    #[test]
    fn test_queen_denial_only_for_low_tiers() {
        let mut ai = filler(Suit::Spades);
        ai.push(c(Rank::Queen, Suit::Hearts));
        let mut state = seeded(filler(Suit::Clubs), ai);
        ActionExecutor::new().submit(&mut state, HUMAN, Action::Pass).unwrap();

        let queen = Action::PlayCard { card_index: 1, target: HUMAN, lane: 0 };
        let score = |tier| {
            Strategist::default()
                .ranked(&state, AI, Difficulty::new(tier))
                .into_iter()
                .find(|candidate| candidate.action == queen)
                .map(|candidate| candidate.score)
        };

        // Lane total only: no hearts held, no denial estimate.
        assert_eq!(score(2), Some(5.0));
        assert_eq!(score(3), Some(5.0));
        assert!(score(0).unwrap() > 5.0);
        assert_eq!(score(0), score(1));
    }

    #[test]
    fn test_difficulty_picks_lower_rank() {
        let mut ai = filler(Suit::Spades);
        ai.extend([c(Rank::Jack, Suit::Spades), c(Rank::Five, Suit::Hearts)]);
        let mut state = seeded(filler(Suit::Clubs), ai);
        ActionExecutor::new().submit(&mut state, HUMAN, Action::Pass).unwrap();

        let strategist = Strategist::default();
        let candidates = strategist.candidates(&state, AI);
        assert!(candidates.len() >= 2);

        assert_eq!(
            strategist.choose_action(&state, AI, Difficulty::new(0)),
            candidates[0].action
        );
        assert_eq!(
            strategist.choose_action(&state, AI, Difficulty::new(1)),
            candidates[1].action
        );
        assert_eq!(
            strategist.choose_action(&state, AI, Difficulty::new(3)),
            candidates[3.min(candidates.len() - 1)].action
        );
    }

    #[test]
    fn test_candidates_are_legal() {
        let executor = ActionExecutor::new();
        let strategist = Strategist::default();
        let mut state = GameState::new(&GameConfig::new(77), 0);
        while state.is_setup_phase() {
            let player = state.current_player();
            let action = strategist.choose_setup_action(&state, player);
            executor.submit(&mut state, player, action).unwrap();
        }
        executor.submit(&mut state, HUMAN, Action::Pass).unwrap();

        for candidate in strategist.candidates(&state, AI) {
            assert!(
                executor.is_legal(&state, AI, &candidate.action),
                "{:?}",
                candidate
            );
        }
    }

    #[test]
    fn test_flexibility() {
        let mut lane = Caravan::new();
        assert!(lane.add_card(c(Rank::Five, Suit::Hearts)));
        assert!(lane.add_card(c(Rank::Nine, Suit::Hearts)));

        assert!(is_flexible(&lane, c(Rank::Seven, Suit::Hearts)));
        assert!(!is_flexible(&lane, c(Rank::Ten, Suit::Hearts)));
        assert!(!is_flexible(&lane, c(Rank::Seven, Suit::Spades)));
    }
}
