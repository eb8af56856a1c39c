//! Seat message protocol and table control messages.
//!
//! [`ServerMessage`] and [`SeatResponse`] are the duplex wire protocol
//! between a table and one seat; both serialize as tagged JSON objects
//! (`{"type": "draw_self", "tile": "3m"}`). [`TableMessage`] is the
//! in-process control channel a [`super::TableHandle`] feeds.

use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, oneshot};

use crate::account::PlayerProfile;
use crate::game::entities::{PlayerHand, PublicHand, SeatIndex, Tile, Username};
use crate::game::state_machine::{ActionOption, KanKind, MatchOutcome};

use super::errors::TableError;

/// Table identifier handed out by the registry.
pub type TableId = i64;

/// A message from a table to one seat.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// A player joined the table.
    Join { seat: SeatIndex, name: Username },
    /// A player left the table.
    Exit { seat: SeatIndex, name: Username },
    /// The roster is full; answer with `ready`.
    CanReady,
    /// Seconds left in the receiving seat's current response window.
    Countdown { count: u64 },
    /// First full state snapshot, with the wall's pre-commitment digest.
    InitInfo { view: MatchView, wall_hash: String },
    /// Periodic full state snapshot.
    UpdateInfo { view: MatchView },
    /// The receiving seat drew this tile.
    DrawSelf { tile: Tile },
    /// Another seat drew a tile.
    DrawOther { seat: SeatIndex },
    /// Actions the receiving seat may take right now.
    ActionChoose { options: Vec<ActionOption> },
    /// A seat discarded a tile.
    Discard { seat: SeatIndex, tile: Tile },
    /// A seat claimed a run off `source`'s discard.
    Chi {
        seat: SeatIndex,
        source: SeatIndex,
        tiles: [Tile; 3],
    },
    /// A seat claimed a triplet off `source`'s discard.
    Pon {
        seat: SeatIndex,
        source: SeatIndex,
        tile: Tile,
    },
    /// A seat declared a kan.
    Kan {
        seat: SeatIndex,
        kind: KanKind,
        tile: Tile,
    },
    /// Terminal match outcome plus every seat's settled total.
    End {
        outcome: MatchOutcome,
        scores: Vec<i64>,
    },
    /// The table is gone.
    Dismiss { reason: String },
    Heartbeat,
}

/// One structured response per solicited cycle. Absence or timeout is
/// treated exactly like [`SeatResponse::Cancel`].
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SeatResponse {
    Ready,
    Discard {
        #[serde(default)]
        tile: Option<Tile>,
        #[serde(default = "default_from_draw")]
        from_draw: bool,
    },
    Chi {
        tile: Tile,
        using: [Tile; 2],
    },
    Pon {
        tile: Tile,
    },
    Kan {
        tile: Tile,
        kind: KanKind,
    },
    Win {
        tile: Tile,
    },
    Cancel,
}

fn default_from_draw() -> bool {
    true
}

/// Per-seat snapshot of the match: the receiver's full hand, the public
/// face of every seat, and the remaining wall size.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct MatchView {
    pub seat: SeatIndex,
    pub hand: PlayerHand,
    pub table: Vec<PublicSeat>,
    pub remaining_tiles: usize,
}

/// What every seat may know about a seat.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct PublicSeat {
    pub seat: SeatIndex,
    pub name: Username,
    pub score: i64,
    #[serde(flatten)]
    pub hand: PublicHand,
}

/// Control messages a table actor accepts through its handle.
#[derive(Debug)]
pub enum TableMessage {
    /// Seat a player, wiring up their duplex channel.
    Join {
        profile: PlayerProfile,
        outbound: mpsc::Sender<ServerMessage>,
        inbound: mpsc::Receiver<SeatResponse>,
        reply: oneshot::Sender<Result<SeatIndex, TableError>>,
    },

    /// Re-attach a disconnected seat's channels and resend current state.
    Reconnect {
        username: Username,
        outbound: mpsc::Sender<ServerMessage>,
        inbound: mpsc::Receiver<SeatResponse>,
        reply: oneshot::Sender<Result<(), TableError>>,
    },

    /// Leave the table. Only legal before the match starts.
    Exit {
        username: Username,
        reply: oneshot::Sender<Result<(), TableError>>,
    },

    /// Snapshot for directory listings.
    Summary {
        reply: oneshot::Sender<TableSummary>,
    },
}

/// Directory-listing view of one table.
#[derive(Clone, Debug, Serialize)]
pub struct TableSummary {
    pub code: TableId,
    pub phase: super::actor::TablePhase,
    pub seat_count: usize,
    pub seated: Vec<Username>,
    pub in_match: bool,
}
