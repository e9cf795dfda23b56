//! Lanes (caravans): card sequences with a derived total and locks.
//!
//! - `lane`: the `Caravan` type and the king-multiplier total
//! - `projection`: pure hypothetical-placement queries for the AI

pub mod lane;
pub mod projection;

pub use lane::{lane_total, Caravan, Direction, LaneCards};
pub use projection::{project_jack, project_king, project_numeric, Projection};
