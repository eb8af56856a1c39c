//! # Mahjong Parlor
//!
//! A mahjong game engine and table session library.
//!
//! The crate splits into a rule engine and a session orchestrator. The rule
//! engine ([`game`]) owns the tile wall, hand decomposition and scoring, and
//! the per-match turn state; it is purely synchronous and validates every
//! proposed action itself, regardless of what a remote client claimed. The
//! orchestrator ([`table`]) runs each session as an independent async actor
//! that drives the turn loop, collects seat responses under bounded waits
//! with live countdowns, arbitrates competing claims, and broadcasts state.
//!
//! ## Architecture
//!
//! - **[`game`]**: tiles, melds, hands, the tile wall with its content hash,
//!   winning-shape search and scoring, and the [`game::MatchState`] turn
//!   engine (draw, discard, chi, pon, kan, win).
//! - **[`table`]**: the [`table::TableActor`] lifecycle state machine
//!   (Waiting → ReadyCheck → Playing → Settling → Dismissed), claim
//!   arbitration, the seat message protocol, and the
//!   [`table::TableRegistry`] session directory.
//! - **[`account`]**: narrow async interfaces to the external collaborators
//!   (credential validation, profile lookup, score persistence) plus an
//!   in-memory implementation for tests and embedding.
//!
//! Each table runs in its own tokio task and owns its match exclusively;
//! seat responses are gathered concurrently but applied serially by the
//! table's loop, so no match state is ever touched from two tasks.
//!
//! ## Example
//!
//! ```
//! use mahjong_parlor::game::MatchState;
//!
//! // A reproducible two-seat match: same seed, same wall, same hash.
//! let m = MatchState::new(2, Some(42)).unwrap();
//! assert_eq!(m.remaining_tiles(), 108 - 2 * 13);
//! ```

/// External collaborator interfaces (credentials, profiles, scores).
pub mod account;

/// Core rule engine: tiles, wall, hand analysis, and the match turn state.
pub mod game;

/// Session orchestration: table actors, arbitration, protocol, registry.
pub mod table;

pub use account::{AccountError, MemoryAccounts, PlayerProfile};
pub use game::{
    MatchError, MatchOutcome, MatchState,
    constants::{self, DEFAULT_SEAT_COUNT, HAND_SIZE, WALL_SIZE},
    entities::{self, Meld, MeldKind, PlayerHand, SeatIndex, Suit, Tile, Username},
    functional, wall,
};
pub use table::{
    TableActor, TableConfig, TableError, TableHandle, TablePhase, TableRegistry, messages,
};
