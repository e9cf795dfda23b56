//! Card system: rank/suit values and deck composition.
//!
//! ## Key Types
//!
//! - `Card`: Immutable rank/suit value with derived value and category
//! - `Rank`, `Suit`: Parseable enums
//! - `FaceRank`: The closed {jack, queen, king} set driving lane effects

pub mod card;
pub mod deck;

pub use card::{Card, FaceRank, ParseCardError, Rank, Suit};
pub use deck::{distinct_cards, standard_deck};
