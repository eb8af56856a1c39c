//! Session orchestration.
//!
//! This module implements:
//! - [`TableActor`]: async actor driving one session's lifecycle and turn
//!   loop, with bounded per-seat response windows and live countdowns
//! - [`arbiter`]: priority resolution among concurrently declared claims
//! - [`messages`]: the seat wire protocol and the actor control channel
//! - [`TableRegistry`]: the directory of live sessions
//!
//! ## Architecture
//!
//! Each table runs in its own tokio task with an mpsc control inbox. The
//! registry spawns actors, hands out [`TableHandle`]s, and supports
//! concurrent lookup while sessions are created and torn down. Within a
//! session, seat responses are collected concurrently (scatter/gather with
//! one bounded wait per seat) but applied strictly in sequence by the
//! actor's own loop.

pub mod actor;
pub mod arbiter;
pub mod config;
pub mod errors;
pub mod messages;
pub mod registry;
mod seat;

pub use actor::{TableActor, TableHandle, TablePhase};
pub use config::TableConfig;
pub use errors::TableError;
pub use messages::{
    MatchView, PublicSeat, SeatResponse, ServerMessage, TableId, TableMessage, TableSummary,
};
pub use registry::{TableDirectory, TableRegistry};
