//! Match turn engine.
//!
//! [`MatchState`] is the per-session rule state: one hand per seat, the
//! remaining wall, the turn pointer, and the write-once terminal result.
//! Every operation validates its preconditions here, server-side: a
//! proposed action from a seat is advisory, never trusted. No operation
//! mutates anything once [`MatchState::result`] is set.
//!
//! "Match ended" is an explicit value, not an unwind: wall exhaustion and a
//! confirmed win both surface as [`MatchError::Ended`] after setting the
//! result, and the orchestrator's loop branches on it.

use log::warn;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use super::constants::{HAND_SIZE, MAX_SEAT_COUNT, SELF_DRAW_MULTIPLIER};
use super::entities::{Discard, Meld, MeldKind, PlayerHand, SeatIndex, Tile};
use super::functional::{self, WinLabel};
use super::wall::TileWall;

/// Errors raised by match operations.
///
/// [`MatchError::Ended`] is the terminal-state signal: not a failure, but
/// the cue to stop the turn loop and settle. Everything else is a
/// validation rejection that leaves the match untouched.
#[derive(Clone, Debug, Deserialize, Eq, Error, PartialEq, Serialize)]
pub enum MatchError {
    #[error("match has ended")]
    Ended,
    #[error("seat {0} out of range")]
    InvalidSeat(SeatIndex),
    #[error("seat count must be 2..={MAX_SEAT_COUNT}")]
    InvalidSeatCount(usize),
    #[error("no tile named and no drawn tile to discard")]
    UnderspecifiedDiscard,
    #[error("chi may only take from the previous seat")]
    ChiWrongSource,
    #[error("claimed tile does not match the latest discard")]
    DiscardMismatch,
    #[error("cannot claim a tile from yourself")]
    SelfClaim,
    #[error("tile {0} is not held")]
    TileNotHeld(Tile),
    #[error("tiles do not form a consecutive same-suit run")]
    NotARun,
    #[error("pon needs two matching concealed tiles")]
    PonUnmet,
    #[error("concealed kan needs all four copies in hand")]
    ConcealedKanUnmet,
    #[error("exposed kan needs three matching concealed tiles")]
    ExposedKanUnmet,
    #[error("no open triplet to extend")]
    ExtendedKanUnmet,
    #[error("exposed kan needs a source seat")]
    MissingSource,
    #[error("hand does not form a winning shape")]
    NotAWin,
}

/// The three kan flavors.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum KanKind {
    Concealed,
    Exposed,
    Extended,
}

impl fmt::Display for KanKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Concealed => "concealed",
            Self::Exposed => "exposed",
            Self::Extended => "extended",
        };
        write!(f, "{repr}")
    }
}

/// Terminal result of a match. Set exactly once; the match rejects every
/// mutation afterwards.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(tag = "end_type", rename_all = "snake_case")]
pub enum MatchOutcome {
    /// Wall ran out with no win declared.
    ExhaustiveDraw,
    /// Winner drew the winning tile themselves.
    SelfDraw {
        winner: SeatIndex,
        points: u32,
        labels: Vec<WinLabel>,
    },
    /// Winner claimed another seat's discard.
    DirectWin {
        winner: SeatIndex,
        loser: SeatIndex,
        points: u32,
        labels: Vec<WinLabel>,
    },
}

impl MatchOutcome {
    /// Per-seat score movement this outcome causes. A self-draw collects
    /// the score from every other seat; a direct win moves it from the
    /// named loser only; an exhaustive draw moves nothing.
    #[must_use]
    pub fn score_deltas(&self, seat_count: usize) -> Vec<i64> {
        let mut deltas = vec![0i64; seat_count];
        match *self {
            Self::ExhaustiveDraw => {}
            Self::SelfDraw { winner, points, .. } => {
                for (seat, delta) in deltas.iter_mut().enumerate() {
                    *delta = if seat == winner {
                        SELF_DRAW_MULTIPLIER * i64::from(points)
                    } else {
                        -i64::from(points)
                    };
                }
            }
            Self::DirectWin {
                winner,
                loser,
                points,
                ..
            } => {
                if winner < seat_count && loser < seat_count {
                    deltas[winner] = i64::from(points);
                    deltas[loser] = -i64::from(points);
                }
            }
        }
        deltas
    }
}

/// Outcome of a discard resolution. `fallback` flags the defensive path
/// that cut the most recently concealed tile because the request could not
/// be honored as stated; callers must surface it, not treat it as an
/// ordinary success.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Discarded {
    pub seat: SeatIndex,
    pub tile: Tile,
    pub hand_cut: bool,
    pub fallback: bool,
}

/// An action a seat may currently take, offered in `action_choose`.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ActionOption {
    Discard {
        seat: SeatIndex,
    },
    Chi {
        seat: SeatIndex,
        source: SeatIndex,
        tile: Tile,
        using: [Tile; 2],
    },
    Pon {
        seat: SeatIndex,
        source: SeatIndex,
        tile: Tile,
    },
    Kan {
        seat: SeatIndex,
        kind: KanKind,
        tile: Tile,
        source: Option<SeatIndex>,
    },
    Win {
        seat: SeatIndex,
        tile: Tile,
        source: Option<SeatIndex>,
    },
}

/// Mutable rule state for one match.
#[derive(Debug)]
pub struct MatchState {
    hands: Vec<PlayerHand>,
    wall: TileWall,
    turn: SeatIndex,
    result: Option<MatchOutcome>,
}

impl MatchState {
    /// Build a wall (seeded or not) and deal thirteen tiles to each seat.
    /// The dealing draws never advance the turn; seat 0 draws first.
    pub fn new(seat_count: usize, seed: Option<u64>) -> Result<Self, MatchError> {
        if !(2..=MAX_SEAT_COUNT).contains(&seat_count) {
            return Err(MatchError::InvalidSeatCount(seat_count));
        }
        let mut state = Self {
            hands: (0..seat_count).map(|_| PlayerHand::default()).collect(),
            wall: TileWall::build(seed),
            turn: 0,
            result: None,
        };
        // three passes of four tiles, then one final tile each
        for _ in 0..3 {
            for seat in 0..seat_count {
                for _ in 0..4 {
                    state.draw(Some(seat), false, false)?;
                }
            }
        }
        for seat in 0..seat_count {
            state.draw(Some(seat), false, false)?;
        }
        for hand in &mut state.hands {
            hand.conceal_draw();
            debug_assert_eq!(hand.concealed.len(), HAND_SIZE);
        }
        Ok(state)
    }

    #[must_use]
    pub fn seat_count(&self) -> usize {
        self.hands.len()
    }

    #[must_use]
    pub fn turn(&self) -> SeatIndex {
        self.turn
    }

    #[must_use]
    pub fn result(&self) -> Option<&MatchOutcome> {
        self.result.as_ref()
    }

    #[must_use]
    pub fn hands(&self) -> &[PlayerHand] {
        &self.hands
    }

    #[must_use]
    pub fn wall_hash(&self) -> &str {
        self.wall.hash()
    }

    #[must_use]
    pub fn remaining_tiles(&self) -> usize {
        self.wall.len()
    }

    fn live(&self) -> Result<(), MatchError> {
        match self.result {
            Some(_) => Err(MatchError::Ended),
            None => Ok(()),
        }
    }

    fn seat(&self, seat: SeatIndex) -> Result<(), MatchError> {
        if seat < self.hands.len() {
            Ok(())
        } else {
            Err(MatchError::InvalidSeat(seat))
        }
    }

    fn predecessor(&self, seat: SeatIndex) -> SeatIndex {
        (seat + self.hands.len() - 1) % self.hands.len()
    }

    fn successor(&self, seat: SeatIndex) -> SeatIndex {
        (seat + 1) % self.hands.len()
    }

    /// Move one wall tile into a seat's draw slot, first folding any
    /// pending slot tile into the concealed hand. An empty wall finalizes
    /// the match as an exhaustive draw and returns [`MatchError::Ended`].
    pub fn draw(
        &mut self,
        seat: Option<SeatIndex>,
        advance_turn: bool,
        from_back: bool,
    ) -> Result<(SeatIndex, Tile), MatchError> {
        self.live()?;
        let seat = seat.unwrap_or(self.turn);
        self.seat(seat)?;
        self.hands[seat].conceal_draw();
        let tile = if from_back {
            self.wall.draw_back()
        } else {
            self.wall.draw_front()
        };
        let Some(tile) = tile else {
            self.result = Some(MatchOutcome::ExhaustiveDraw);
            return Err(MatchError::Ended);
        };
        self.hands[seat].draw = Some(tile);
        if advance_turn {
            self.turn = self.successor(seat);
        }
        Ok((seat, tile))
    }

    /// Resolve and record a discard. The drawn tile goes by default; a
    /// named concealed tile is cut from the hand (the drawn tile is then
    /// concealed); a named tile that is absent falls back to cutting the
    /// most recently concealed tile and is flagged, never silent.
    ///
    /// The turn moves to the discarder's successor, which also closes out
    /// the forced discard after a call.
    pub fn discard(
        &mut self,
        seat: SeatIndex,
        tile: Option<Tile>,
        from_draw: bool,
    ) -> Result<Discarded, MatchError> {
        self.live()?;
        self.seat(seat)?;
        let hand = &mut self.hands[seat];

        let discarded = if from_draw
            && hand.draw.is_some()
            && (tile.is_none() || tile == hand.draw)
        {
            let tile = hand.draw.take().ok_or(MatchError::UnderspecifiedDiscard)?;
            hand.discards.push(Discard {
                tile,
                hand_cut: false,
            });
            Discarded {
                seat,
                tile,
                hand_cut: false,
                fallback: false,
            }
        } else if let Some(tile) = tile {
            if hand.remove(tile) {
                hand.conceal_draw();
                hand.discards.push(Discard {
                    tile,
                    hand_cut: true,
                });
                Discarded {
                    seat,
                    tile,
                    hand_cut: true,
                    fallback: false,
                }
            } else {
                let cut = self.fallback_cut(seat)?;
                warn!("seat {seat} named absent tile {tile}; cut {cut} instead");
                Discarded {
                    seat,
                    tile: cut,
                    hand_cut: true,
                    fallback: true,
                }
            }
        } else if from_draw {
            // default discard requested but the slot is empty
            let cut = self.fallback_cut(seat)?;
            warn!("seat {seat} defaulted with an empty draw slot; cut {cut}");
            Discarded {
                seat,
                tile: cut,
                hand_cut: true,
                fallback: true,
            }
        } else {
            return Err(MatchError::UnderspecifiedDiscard);
        };

        self.turn = self.successor(seat);
        Ok(discarded)
    }

    fn fallback_cut(&mut self, seat: SeatIndex) -> Result<Tile, MatchError> {
        let hand = &mut self.hands[seat];
        hand.conceal_draw();
        let tile = hand
            .concealed
            .pop()
            .ok_or(MatchError::UnderspecifiedDiscard)?;
        hand.discards.push(Discard {
            tile,
            hand_cut: true,
        });
        Ok(tile)
    }

    /// Claim the source's latest discard to complete a run. Only the
    /// discarder's immediate successor may chi.
    pub fn chi(
        &mut self,
        caller: SeatIndex,
        source: SeatIndex,
        tile: Tile,
        using: [Tile; 2],
    ) -> Result<(), MatchError> {
        self.live()?;
        self.seat(caller)?;
        self.seat(source)?;
        if source != self.predecessor(caller) {
            return Err(MatchError::ChiWrongSource);
        }

        let mut run = [tile, using[0], using[1]];
        run.sort();
        let consecutive = run[0].suit() == run[1].suit()
            && run[1].suit() == run[2].suit()
            && run[0].rank() + 1 == run[1].rank()
            && run[1].rank() + 1 == run[2].rank();
        if !consecutive {
            return Err(MatchError::NotARun);
        }

        let needed = if using[0] == using[1] { 2 } else { 1 };
        for t in [using[0], using[1]] {
            if self.hands[caller].count(t) < needed {
                return Err(MatchError::TileNotHeld(t));
            }
        }
        self.take_latest_discard(source, tile)?;
        for t in using {
            self.hands[caller].remove(t);
        }
        self.hands[caller].melds.push(Meld::run(run));
        self.turn = caller;
        Ok(())
    }

    /// Claim the source's latest discard to complete an open triplet.
    pub fn pon(
        &mut self,
        caller: SeatIndex,
        source: SeatIndex,
        tile: Tile,
    ) -> Result<(), MatchError> {
        self.live()?;
        self.seat(caller)?;
        self.seat(source)?;
        if caller == source {
            return Err(MatchError::SelfClaim);
        }
        if self.hands[caller].count(tile) < 2 {
            return Err(MatchError::PonUnmet);
        }
        self.take_latest_discard(source, tile)?;
        self.hands[caller].remove(tile);
        self.hands[caller].remove(tile);
        self.hands[caller].melds.push(Meld::triplet(tile));
        self.turn = caller;
        Ok(())
    }

    /// Declare a kan. Concealed and exposed kans draw the replacement tile
    /// from the back of the wall and return it; the extended kan upgrades
    /// the stored pon meld in place and draws nothing; the redirected turn
    /// makes the main loop draw for the caller instead.
    pub fn kan(
        &mut self,
        caller: SeatIndex,
        tile: Tile,
        kind: KanKind,
        source: Option<SeatIndex>,
    ) -> Result<Option<Tile>, MatchError> {
        self.live()?;
        self.seat(caller)?;
        match kind {
            KanKind::Concealed => {
                let hand = &mut self.hands[caller];
                if hand.draw == Some(tile) && hand.count(tile) == 3 {
                    hand.draw = None;
                    for _ in 0..3 {
                        hand.remove(tile);
                    }
                } else if hand.count(tile) == 4 {
                    for _ in 0..4 {
                        hand.remove(tile);
                    }
                    hand.conceal_draw();
                } else {
                    return Err(MatchError::ConcealedKanUnmet);
                }
                hand.melds.push(Meld::quad(tile, MeldKind::ConcealedQuad));
                self.turn = caller;
                let (_, replacement) = self.draw(Some(caller), false, true)?;
                Ok(Some(replacement))
            }
            KanKind::Exposed => {
                let source = source.ok_or(MatchError::MissingSource)?;
                self.seat(source)?;
                if caller == source {
                    return Err(MatchError::SelfClaim);
                }
                if self.hands[caller].count(tile) != 3 {
                    return Err(MatchError::ExposedKanUnmet);
                }
                self.take_latest_discard(source, tile)?;
                for _ in 0..3 {
                    self.hands[caller].remove(tile);
                }
                self.hands[caller]
                    .melds
                    .push(Meld::quad(tile, MeldKind::ExposedQuad));
                self.turn = caller;
                let (_, replacement) = self.draw(Some(caller), false, true)?;
                Ok(Some(replacement))
            }
            KanKind::Extended => {
                let hand = &mut self.hands[caller];
                let meld_idx = hand
                    .melds
                    .iter()
                    .position(|m| m.kind == MeldKind::Triplet && m.tiles.first() == Some(&tile))
                    .ok_or(MatchError::ExtendedKanUnmet)?;
                if hand.draw == Some(tile) {
                    hand.draw = None;
                } else if !hand.remove(tile) {
                    return Err(MatchError::TileNotHeld(tile));
                }
                // the stored meld itself is upgraded, not a copy
                if let Some(meld) = hand.melds.get_mut(meld_idx) {
                    meld.upgrade(tile);
                }
                self.turn = caller;
                Ok(None)
            }
        }
    }

    /// Validate and finalize a win. Zero candidates rejects the claim with
    /// no mutation; otherwise the result is set exactly once and the
    /// best-scoring shape is recorded.
    pub fn win(
        &mut self,
        caller: SeatIndex,
        tile: Tile,
        source: Option<SeatIndex>,
    ) -> Result<MatchOutcome, MatchError> {
        self.live()?;
        self.seat(caller)?;
        match source {
            Some(source) => {
                self.seat(source)?;
                if source == caller {
                    return Err(MatchError::SelfClaim);
                }
                let latest = self.hands[source].discards.last().map(|d| d.tile);
                if latest != Some(tile) {
                    return Err(MatchError::DiscardMismatch);
                }
            }
            None => {
                if self.hands[caller].draw != Some(tile) {
                    return Err(MatchError::TileNotHeld(tile));
                }
            }
        }

        let hand = &self.hands[caller];
        let best =
            functional::evaluate(&hand.concealed, tile, &hand.melds).ok_or(MatchError::NotAWin)?;
        let outcome = match source {
            Some(loser) => MatchOutcome::DirectWin {
                winner: caller,
                loser,
                points: best.points,
                labels: best.labels,
            },
            None => MatchOutcome::SelfDraw {
                winner: caller,
                points: best.points,
                labels: best.labels,
            },
        };
        self.result = Some(outcome.clone());
        Ok(outcome)
    }

    /// Self-callable options for the seat currently holding a fresh tile:
    /// the forced discard, concealed/extended kans, and a self-drawn win.
    #[must_use]
    pub fn self_options(&self, seat: SeatIndex) -> Vec<ActionOption> {
        let mut options = vec![ActionOption::Discard { seat }];
        let Some(hand) = self.hands.get(seat) else {
            return options;
        };

        let mut held: Vec<Tile> = hand.concealed.clone();
        if let Some(drawn) = hand.draw {
            held.push(drawn);
        }
        held.sort();
        held.dedup();
        for &tile in &held {
            let copies = hand.count(tile) + usize::from(hand.draw == Some(tile));
            if copies == 4 {
                options.push(ActionOption::Kan {
                    seat,
                    kind: KanKind::Concealed,
                    tile,
                    source: None,
                });
            }
            if hand
                .melds
                .iter()
                .any(|m| m.kind == MeldKind::Triplet && m.tiles.first() == Some(&tile))
            {
                options.push(ActionOption::Kan {
                    seat,
                    kind: KanKind::Extended,
                    tile,
                    source: None,
                });
            }
        }

        if let Some(drawn) = hand.draw
            && functional::evaluate(&hand.concealed, drawn, &hand.melds).is_some()
        {
            options.push(ActionOption::Win {
                seat,
                tile: drawn,
                source: None,
            });
        }
        options
    }

    /// Claim options a seat holds against another seat's fresh discard:
    /// chi (successor seat only), pon, exposed kan, and a direct win.
    #[must_use]
    pub fn claim_options(&self, seat: SeatIndex, tile: Tile, source: SeatIndex) -> Vec<ActionOption> {
        let mut options = Vec::new();
        if seat == source {
            return options;
        }
        let Some(hand) = self.hands.get(seat) else {
            return options;
        };

        if source == self.predecessor(seat) {
            let pairs = [
                (tile.successor(), tile.successor().and_then(Tile::successor)),
                (tile.predecessor(), tile.successor()),
                (
                    tile.predecessor().and_then(Tile::predecessor),
                    tile.predecessor(),
                ),
            ];
            for (a, b) in pairs {
                if let (Some(a), Some(b)) = (a, b) {
                    let needed = if a == b { 2 } else { 1 };
                    if hand.count(a) >= needed && hand.count(b) >= needed {
                        options.push(ActionOption::Chi {
                            seat,
                            source,
                            tile,
                            using: [a, b],
                        });
                    }
                }
            }
        }

        match hand.count(tile) {
            2 => options.push(ActionOption::Pon { seat, source, tile }),
            3 => {
                options.push(ActionOption::Pon { seat, source, tile });
                options.push(ActionOption::Kan {
                    seat,
                    kind: KanKind::Exposed,
                    tile,
                    source: Some(source),
                });
            }
            _ => {}
        }

        if functional::evaluate(&hand.concealed, tile, &hand.melds).is_some() {
            options.push(ActionOption::Win {
                seat,
                tile,
                source: Some(source),
            });
        }
        options
    }

    /// Tiles accounted for across the wall and every hand zone. Constant
    /// for the whole life of a match.
    #[must_use]
    pub fn tile_census(&self) -> usize {
        self.wall.len() + self.hands.iter().map(PlayerHand::tile_total).sum::<usize>()
    }

    fn take_latest_discard(&mut self, source: SeatIndex, tile: Tile) -> Result<Tile, MatchError> {
        let river = &mut self.hands[source].discards;
        match river.last() {
            Some(latest) if latest.tile == tile => {
                let taken = river.pop().ok_or(MatchError::DiscardMismatch)?;
                Ok(taken.tile)
            }
            _ => Err(MatchError::DiscardMismatch),
        }
    }
}
