//! AI difficulty tiers and scoring weights.

use serde::{Deserialize, Serialize};

/// AI difficulty tier.
///
/// Tier 0 always plays its best-scored candidate. Tier `n` plays the
/// candidate ranked `n` places lower (clamped to the list), so every tier
/// sees the same moves and only the final pick is weakened.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Difficulty(u8);

impl Difficulty {
    /// Highest supported tier.
    pub const MAX_TIER: u8 = 3;

    /// Create a tier. Values above `MAX_TIER` are kept as given and
    /// rejected by `GameConfig::validate`.
    #[must_use]
    pub const fn new(tier: u8) -> Self {
        Self(tier)
    }

    #[must_use]
    pub const fn tier(self) -> u8 {
        self.0
    }

    /// How far below the top of the ranked candidate list this tier picks.
    #[must_use]
    pub const fn rank_offset(self) -> usize {
        self.0 as usize
    }

    /// Tiers 0 and 1 estimate the opponent's hand from the unseen pool.
    #[must_use]
    pub const fn reads_unseen_cards(self) -> bool {
        self.0 <= 1
    }
}

/// Heuristic weights used by the strategist.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    /// King that wins a lane and beats the mirrored total.
    pub win_lane_with_king: f64,

    /// Numeric card that wins a lane and beats the mirrored total.
    pub win_lane: f64,

    /// Jack against an opposing lane that is currently winning.
    pub break_winning_lane: f64,

    /// Numeric card that lands in the winning range without beating the
    /// mirrored total.
    pub setup_win: f64,

    /// Jack against a lane that is not winning.
    pub major_disruption: f64,

    /// Card matching a lane's suit lock that the direction alone would not
    /// allow, keeping the lane's options open.
    pub flexibility_bonus: f64,

    pub king_progress: f64,
    pub basic_progress: f64,

    /// Per same-suit numeric card held when playing a queen.
    pub queen_synergy_per_card: f64,

    /// Multiplier for the estimated opposing cards a queen shuts out.
    pub queen_denial_weight: f64,

    // === Discard valuation ===
    pub jack_utility: f64,
    pub queen_utility: f64,
    pub king_utility: f64,

    /// Added to a numeric card's value when its suit is locked on one of
    /// the AI's lanes.
    pub suit_in_play_bonus: f64,

    /// Dumping a bust lane.
    pub discard_lane: f64,

    /// Fallback discard when nothing else scored.
    pub discard_fallback: f64,

    /// Fallback discard alongside other candidates (full hand).
    pub discard_crowded: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            win_lane_with_king: 120.0,
            win_lane: 100.0,
            break_winning_lane: 90.0,
            setup_win: 60.0,
            major_disruption: 40.0,
            flexibility_bonus: 10.0,
            king_progress: 20.0,
            basic_progress: 10.0,
            queen_synergy_per_card: 5.0,
            queen_denial_weight: 10.0,
            jack_utility: 15.0,
            queen_utility: 12.0,
            king_utility: 18.0,
            suit_in_play_bonus: 20.0,
            discard_lane: 15.0,
            discard_fallback: 5.0,
            discard_crowded: 25.0,
        }
    }
}
