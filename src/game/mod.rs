//! Mahjong rule engine.
//!
//! This module is the synchronous core of the crate:
//! - [`entities`]: tiles, melds, hands, and the small value types they share
//! - [`wall`]: the shuffled tile wall and its pre-commitment digest
//! - [`functional`]: pure winning-shape search and scoring
//! - [`state_machine`]: the [`MatchState`] turn engine that validates and
//!   applies every draw, discard, call, and win
//!
//! Nothing here performs IO or touches a clock; the async session layer in
//! [`crate::table`] drives these types and serializes all mutation through
//! one task.

pub mod constants;
pub mod entities;
pub mod functional;
pub mod state_machine;
pub mod wall;

pub use state_machine::{
    ActionOption, Discarded, KanKind, MatchError, MatchOutcome, MatchState,
};
pub use wall::TileWall;
