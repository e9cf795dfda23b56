//! Card values: rank, suit, and the properties derived from them.
//!
//! Cards are plain `Copy` values with structural equality. Nothing in the
//! engine tracks card identity; two Sevens of Hearts are interchangeable.
//!
//! ## Normalization
//!
//! `Card::parse` accepts loosely formatted strings (any case, surrounding
//! whitespace). Unrecognized ranks become `Rank::Unknown` (value 0) and
//! unrecognized suits become "no suit". Bonus-point cards never carry a suit.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::core::config::BONUS_POINT_VALUE;

/// Error returned when a rank or suit string is not recognized.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ParseCardError {
    #[error("unknown rank `{0}`")]
    Rank(String),
    #[error("unknown suit `{0}`")]
    Suit(String),
}

/// One of the four suits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Suit {
    Clubs,
    Diamonds,
    Hearts,
    Spades,
}

impl Suit {
    /// All suits in deck order.
    pub const ALL: [Suit; 4] = [Suit::Clubs, Suit::Diamonds, Suit::Hearts, Suit::Spades];

    /// Lower-case name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Suit::Clubs => "clubs",
            Suit::Diamonds => "diamonds",
            Suit::Hearts => "hearts",
            Suit::Spades => "spades",
        }
    }
}

impl FromStr for Suit {
    type Err = ParseCardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let clean = s.trim().to_ascii_lowercase();
        Suit::ALL
            .into_iter()
            .find(|suit| suit.name() == clean)
            .ok_or(ParseCardError::Suit(clean))
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Suit::Clubs => "Clubs",
            Suit::Diamonds => "Diamonds",
            Suit::Hearts => "Hearts",
            Suit::Spades => "Spades",
        })
    }
}

/// Card rank.
///
/// Nine numeric ranks (two through ten), three face ranks, the special
/// bonus-point rank, and an `Unknown` sentinel for unparseable input.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rank {
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
    BonusPoint,
    Unknown,
}

impl Rank {
    /// Numeric ranks in ascending order.
    pub const NUMERIC: [Rank; 9] = [
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
    ];

    /// Face ranks.
    pub const FACES: [Rank; 3] = [Rank::Jack, Rank::Queen, Rank::King];

    /// Scoring value. Zero for face ranks and `Unknown`.
    #[must_use]
    pub const fn value(self) -> u32 {
        match self {
            Rank::Two => 2,
            Rank::Three => 3,
            Rank::Four => 4,
            Rank::Five => 5,
            Rank::Six => 6,
            Rank::Seven => 7,
            Rank::Eight => 8,
            Rank::Nine => 9,
            Rank::Ten => 10,
            Rank::BonusPoint => BONUS_POINT_VALUE,
            Rank::Jack | Rank::Queen | Rank::King | Rank::Unknown => 0,
        }
    }

    #[must_use]
    pub const fn is_numeric(self) -> bool {
        matches!(
            self,
            Rank::Two
                | Rank::Three
                | Rank::Four
                | Rank::Five
                | Rank::Six
                | Rank::Seven
                | Rank::Eight
                | Rank::Nine
                | Rank::Ten
        )
    }

    /// The face rank, if this is a jack, queen, or king.
    #[must_use]
    pub const fn face(self) -> Option<FaceRank> {
        match self {
            Rank::Jack => Some(FaceRank::Jack),
            Rank::Queen => Some(FaceRank::Queen),
            Rank::King => Some(FaceRank::King),
            _ => None,
        }
    }

    /// Lower-case name as accepted by `FromStr`.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Rank::Two => "two",
            Rank::Three => "three",
            Rank::Four => "four",
            Rank::Five => "five",
            Rank::Six => "six",
            Rank::Seven => "seven",
            Rank::Eight => "eight",
            Rank::Nine => "nine",
            Rank::Ten => "ten",
            Rank::Jack => "jack",
            Rank::Queen => "queen",
            Rank::King => "king",
            Rank::BonusPoint => "bonus_point",
            Rank::Unknown => "unknown",
        }
    }
}

impl FromStr for Rank {
    type Err = ParseCardError;

    /// Accepts rank names (`"seven"`, `"bonus_point"`) and pip digits (`"7"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let clean = s.trim().to_ascii_lowercase();
        if let Ok(pips) = clean.parse::<u32>() {
            return Rank::NUMERIC
                .into_iter()
                .find(|rank| rank.value() == pips)
                .ok_or(ParseCardError::Rank(clean));
        }
        Rank::NUMERIC
            .into_iter()
            .chain(Rank::FACES)
            .chain([Rank::BonusPoint])
            .find(|rank| rank.name() == clean)
            .ok_or(ParseCardError::Rank(clean))
    }
}

/// The closed set of face ranks. Each has exactly one lane effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FaceRank {
    Jack,
    Queen,
    King,
}

/// An immutable card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Card {
    rank: Rank,
    suit: Option<Suit>,
}

impl Card {
    /// Create a card. Bonus-point cards drop any suit.
    #[must_use]
    pub const fn new(rank: Rank, suit: Option<Suit>) -> Self {
        let suit = match rank {
            Rank::BonusPoint => None,
            _ => suit,
        };
        Self { rank, suit }
    }

    /// Create a suited card.
    #[must_use]
    pub const fn suited(rank: Rank, suit: Suit) -> Self {
        Self::new(rank, Some(suit))
    }

    /// The bonus-point pseudo-card awarded by the trivia interlude.
    #[must_use]
    pub const fn bonus_point() -> Self {
        Self::new(Rank::BonusPoint, None)
    }

    /// Build a card from loosely formatted strings, normalizing bad input.
    ///
    /// ```
    /// use caravan_engine::cards::{Card, Rank, Suit};
    ///
    /// assert_eq!(Card::parse(" Seven ", "HEARTS"), Card::suited(Rank::Seven, Suit::Hearts));
    /// assert_eq!(Card::parse("wizard", "hearts").rank(), Rank::Unknown);
    /// assert_eq!(Card::parse("seven", "cups").suit(), None);
    /// ```
    #[must_use]
    pub fn parse(rank: &str, suit: &str) -> Self {
        let rank = rank.parse().unwrap_or(Rank::Unknown);
        Self::new(rank, suit.parse().ok())
    }

    #[must_use]
    pub const fn rank(self) -> Rank {
        self.rank
    }

    #[must_use]
    pub const fn suit(self) -> Option<Suit> {
        self.suit
    }

    #[must_use]
    pub const fn value(self) -> u32 {
        self.rank.value()
    }

    #[must_use]
    pub const fn is_numeric(self) -> bool {
        self.rank.is_numeric()
    }

    #[must_use]
    pub const fn is_face(self) -> bool {
        self.rank.face().is_some()
    }

    #[must_use]
    pub const fn is_bonus(self) -> bool {
        matches!(self.rank, Rank::BonusPoint)
    }

    #[must_use]
    pub const fn face(self) -> Option<FaceRank> {
        self.rank.face()
    }

    #[must_use]
    pub const fn is_king(self) -> bool {
        matches!(self.rank, Rank::King)
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rank = match self.rank {
            Rank::Unknown => return f.write_str("Unknown Card"),
            Rank::BonusPoint => return f.write_str("Bonus Point"),
            Rank::Two => "Two",
            Rank::Three => "Three",
            Rank::Four => "Four",
            Rank::Five => "Five",
            Rank::Six => "Six",
            Rank::Seven => "Seven",
            Rank::Eight => "Eight",
            Rank::Nine => "Nine",
            Rank::Ten => "Ten",
            Rank::Jack => "Jack",
            Rank::Queen => "Queen",
            Rank::King => "King",
        };
        match self.suit {
            Some(suit) => write!(f, "{rank} of {suit}"),
            None => f.write_str(rank),
        }
    }
}
