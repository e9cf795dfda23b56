//! Face-card effects.
//!
//! Face cards are the only cards with side effects beyond adding to a lane
//! total. `FaceEffect` is a closed enum, so the executor's match over it is
//! exhaustive and every face rank is guaranteed a handler.

mod face;

pub use face::FaceEffect;
