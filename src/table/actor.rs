//! Table actor: one session's lifecycle and turn loop.
//!
//! Each table runs as its own tokio task. The lifecycle is a monotonic
//! state machine (Waiting, ReadyCheck, Playing, Settling, Dismissed), and
//! the Playing phase is an explicit, iterative step loop rather than a
//! recursive cascade: a draw leads to the drawer's self-callable window, a
//! discard leads to a concurrent claim window across the other seats, and
//! an accepted claim leads to a forced discard or a replacement-tile
//! window. Seat responses are gathered in parallel but applied one at a
//! time by this loop, so the match state is never touched concurrently.
//!
//! A seat that answers late, malformed, or not at all simply contributes
//! "no action"; for the drawer that means the default discard. Nothing a
//! seat does (or fails to do) can abort the session.

use futures_util::future::join_all;
use log::{debug, error, info, warn};
use rand::seq::SliceRandom;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::time::{Duration, Instant, interval, sleep, sleep_until};

use crate::account::{PlayerProfile, ScoreStore};
use crate::game::constants::HEARTBEAT_INTERVAL_SECS;
use crate::game::entities::{SeatIndex, Tile, Username};
use crate::game::state_machine::{ActionOption, KanKind, MatchError, MatchOutcome, MatchState};

use super::arbiter;
use super::config::TableConfig;
use super::errors::TableError;
use super::messages::{
    MatchView, PublicSeat, SeatResponse, ServerMessage, TableId, TableMessage, TableSummary,
};
use super::registry::TableDirectory;
use super::seat::{SeatSession, WaitOutcome};

/// Session lifecycle phase. Strictly monotonic; there is no way back.
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TablePhase {
    Waiting,
    ReadyCheck,
    Playing,
    Settling,
    Dismissed,
}

impl fmt::Display for TablePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Waiting => "waiting",
            Self::ReadyCheck => "ready_check",
            Self::Playing => "playing",
            Self::Settling => "settling",
            Self::Dismissed => "dismissed",
        };
        write!(f, "{repr}")
    }
}

/// Where the Playing loop picks up next.
#[derive(Clone, Copy, Debug)]
enum TurnStep {
    /// Draw for the seat whose turn it is.
    Draw,
    /// The seat holds a fresh tile: solicit win / kan / discard.
    SelfAction { seat: SeatIndex },
    /// After a chi or pon: the caller must discard, nothing else.
    ForcedDiscard { seat: SeatIndex },
    /// A discard is on the table: solicit claims from the other seats.
    ClaimCheck { seat: SeatIndex, tile: Tile },
}

/// Table actor handle for sending control messages.
#[derive(Clone)]
pub struct TableHandle {
    sender: mpsc::Sender<TableMessage>,
    code: TableId,
}

impl TableHandle {
    pub fn new(sender: mpsc::Sender<TableMessage>, code: TableId) -> Self {
        Self { sender, code }
    }

    #[must_use]
    pub fn code(&self) -> TableId {
        self.code
    }

    pub async fn send(&self, message: TableMessage) -> Result<(), TableError> {
        self.sender
            .send(message)
            .await
            .map_err(|_| TableError::ChannelClosed)
    }
}

/// The actor owning one session end to end.
pub struct TableActor {
    code: TableId,
    config: TableConfig,
    phase: TablePhase,
    seats: Vec<SeatSession>,
    inbox: mpsc::Receiver<TableMessage>,
    match_state: Option<MatchState>,
    scores: Arc<dyn ScoreStore>,
    directory: TableDirectory,
}

impl TableActor {
    pub fn new(
        code: TableId,
        config: TableConfig,
        scores: Arc<dyn ScoreStore>,
        directory: TableDirectory,
    ) -> (Self, TableHandle) {
        let (sender, inbox) = mpsc::channel(100);
        let actor = Self {
            code,
            config,
            phase: TablePhase::Waiting,
            seats: Vec::new(),
            inbox,
            match_state: None,
            scores,
            directory,
        };
        (actor, TableHandle::new(sender, code))
    }

    /// Drive the session to completion and dismissal.
    pub async fn run(mut self) {
        info!(
            "table {} open, waiting for {} seats",
            self.code, self.config.seat_count
        );
        let reason = self.session().await;
        self.dismiss(&reason).await;
    }

    async fn session(&mut self) -> String {
        if !self.wait_for_roster().await {
            return "seats never filled in time".to_string();
        }
        self.set_phase(TablePhase::ReadyCheck);
        if !self.ready_check().await {
            return "a seat failed the ready check".to_string();
        }
        self.set_phase(TablePhase::Playing);
        match self.play().await {
            Ok(outcome) => {
                self.set_phase(TablePhase::Settling);
                self.settle(&outcome).await;
                "match complete".to_string()
            }
            Err(error) => {
                error!("table {}: session aborted: {error}", self.code);
                format!("session aborted: {error}")
            }
        }
    }

    fn set_phase(&mut self, phase: TablePhase) {
        debug_assert!(phase > self.phase);
        debug!("table {}: {} -> {phase}", self.code, self.phase);
        self.phase = phase;
    }

    /// Accept joins until the roster fills or the wait deadline passes.
    async fn wait_for_roster(&mut self) -> bool {
        let deadline = Instant::now() + self.config.wait_for_seats();
        let mut heartbeat = interval(Duration::from_secs(HEARTBEAT_INTERVAL_SECS));
        while self.seats.len() < self.config.seat_count {
            tokio::select! {
                message = self.inbox.recv() => match message {
                    Some(message) => self.handle_control(message),
                    None => return false,
                },
                _ = heartbeat.tick() => self.broadcast(ServerMessage::Heartbeat),
                () = sleep_until(deadline) => return false,
            }
        }
        true
    }

    /// Broadcast the ready request and gather one bounded ack per seat.
    async fn ready_check(&mut self) -> bool {
        sleep(self.config.connect_grace()).await;
        self.broadcast(ServerMessage::CanReady);
        let window = self.config.ready_timeout();
        let waits = self.seats.iter_mut().map(|seat| seat.await_response(window));
        join_all(waits)
            .await
            .into_iter()
            .all(|outcome| matches!(outcome, WaitOutcome::Answered(SeatResponse::Ready)))
    }

    /// The turn loop, from the deal to a terminal outcome.
    async fn play(&mut self) -> Result<MatchOutcome, TableError> {
        // rotate the starting position once per match
        self.seats.shuffle(&mut rand::rng());
        let state = MatchState::new(self.config.seat_count, self.config.wall_seed)?;
        let wall_hash = state.wall_hash().to_string();
        info!("table {}: match starting, wall hash {wall_hash}", self.code);
        self.match_state = Some(state);
        for (seat, view) in self.views().into_iter().enumerate() {
            self.seats[seat].send(ServerMessage::InitInfo {
                view,
                wall_hash: wall_hash.clone(),
            });
        }

        let mut step = TurnStep::Draw;
        loop {
            self.drain_control();
            let next = match step {
                TurnStep::Draw => self.draw_step()?,
                TurnStep::SelfAction { seat } => self.self_action(seat).await?,
                TurnStep::ForcedDiscard { seat } => self.forced_discard(seat).await?,
                TurnStep::ClaimCheck { seat, tile } => self.claim_check(seat, tile).await?,
            };
            match next {
                Some(next_step) => step = next_step,
                None => break,
            }
        }

        self.match_state
            .as_ref()
            .and_then(|state| state.result().cloned())
            .ok_or(TableError::MatchNotStarted)
    }

    fn draw_step(&mut self) -> Result<Option<TurnStep>, TableError> {
        self.broadcast_views();
        let state = self.state_mut()?;
        match state.draw(None, true, false) {
            Ok((seat, tile)) => {
                self.seats[seat].send(ServerMessage::DrawSelf { tile });
                self.broadcast_except(seat, ServerMessage::DrawOther { seat });
                Ok(Some(TurnStep::SelfAction { seat }))
            }
            Err(MatchError::Ended) => Ok(None),
            Err(error) => Err(error.into()),
        }
    }

    /// Offer the drawer their self-callable options and apply the pick.
    async fn self_action(&mut self, seat: SeatIndex) -> Result<Option<TurnStep>, TableError> {
        let options = self.state_ref()?.self_options(seat);
        let window = self.config.thinking_timeout();
        let response = self.seats[seat].solicit(options, window).await.response();

        match response {
            SeatResponse::Win { tile } => match self.state_mut()?.win(seat, tile, None) {
                Ok(_) => Ok(None),
                Err(error) => {
                    warn!("table {}: seat {seat} win claim rejected: {error}", self.code);
                    self.apply_discard(seat, None, true)
                }
            },
            SeatResponse::Kan {
                tile,
                kind: KanKind::Concealed,
            } => match self.state_mut()?.kan(seat, tile, KanKind::Concealed, None) {
                Ok(replacement) => {
                    self.broadcast(ServerMessage::Kan {
                        seat,
                        kind: KanKind::Concealed,
                        tile,
                    });
                    if let Some(replacement) = replacement {
                        self.seats[seat].send(ServerMessage::DrawSelf { tile: replacement });
                    }
                    Ok(Some(TurnStep::SelfAction { seat }))
                }
                Err(MatchError::Ended) => {
                    // the quad stands; the replacement draw emptied the wall
                    self.broadcast(ServerMessage::Kan {
                        seat,
                        kind: KanKind::Concealed,
                        tile,
                    });
                    Ok(None)
                }
                Err(error) => {
                    warn!("table {}: seat {seat} kan rejected: {error}", self.code);
                    self.apply_discard(seat, None, true)
                }
            },
            SeatResponse::Kan {
                tile,
                kind: KanKind::Extended,
            } => match self.state_mut()?.kan(seat, tile, KanKind::Extended, None) {
                Ok(_) => {
                    self.broadcast(ServerMessage::Kan {
                        seat,
                        kind: KanKind::Extended,
                        tile,
                    });
                    // turn points back at the caller; the loop draws for them
                    Ok(Some(TurnStep::Draw))
                }
                Err(error) => {
                    warn!("table {}: seat {seat} kan rejected: {error}", self.code);
                    self.apply_discard(seat, None, true)
                }
            },
            SeatResponse::Discard { tile, from_draw } => self.apply_discard(seat, tile, from_draw),
            other => {
                if other != SeatResponse::Cancel {
                    debug!(
                        "table {}: seat {seat} sent {other:?} during their own turn, ignoring",
                        self.code
                    );
                }
                self.apply_discard(seat, None, true)
            }
        }
    }

    /// After a chi or pon the caller may only discard.
    async fn forced_discard(&mut self, seat: SeatIndex) -> Result<Option<TurnStep>, TableError> {
        let options = vec![ActionOption::Discard { seat }];
        let window = self.config.thinking_timeout();
        let response = self.seats[seat].solicit(options, window).await.response();
        match response {
            SeatResponse::Discard { tile, from_draw } => self.apply_discard(seat, tile, from_draw),
            _ => self.apply_discard(seat, None, true),
        }
    }

    /// Run a discard through the match, falling back to the default cut if
    /// the request could not be honored, and hand the tile to the claim
    /// window.
    fn apply_discard(
        &mut self,
        seat: SeatIndex,
        tile: Option<Tile>,
        from_draw: bool,
    ) -> Result<Option<TurnStep>, TableError> {
        let code = self.code;
        let state = self.state_mut()?;
        let discarded = match state.discard(seat, tile, from_draw) {
            Ok(discarded) => discarded,
            Err(MatchError::Ended) => return Ok(None),
            Err(error) => {
                warn!("table {code}: seat {seat} discard rejected ({error}), cutting default");
                state.discard(seat, None, true)?
            }
        };
        self.broadcast(ServerMessage::Discard {
            seat,
            tile: discarded.tile,
        });
        Ok(Some(TurnStep::ClaimCheck {
            seat,
            tile: discarded.tile,
        }))
    }

    /// Concurrently solicit every seat holding a claim against the fresh
    /// discard, arbitrate, and apply the single winning intent.
    async fn claim_check(
        &mut self,
        discarder: SeatIndex,
        tile: Tile,
    ) -> Result<Option<TurnStep>, TableError> {
        let options: Vec<Vec<ActionOption>> = {
            let state = self.state_ref()?;
            (0..state.seat_count())
                .map(|seat| state.claim_options(seat, tile, discarder))
                .collect()
        };
        if options.iter().all(Vec::is_empty) {
            return Ok(Some(TurnStep::Draw));
        }

        let window = self.config.thinking_timeout();
        let waits = self
            .seats
            .iter_mut()
            .enumerate()
            .filter(|(seat, _)| !options[*seat].is_empty())
            .map(|(seat, session)| {
                let offer = options[seat].clone();
                async move { (seat, session.solicit(offer, window).await) }
            });
        let mut intents: Vec<Option<SeatResponse>> = vec![None; options.len()];
        for (seat, outcome) in join_all(waits).await {
            if let WaitOutcome::Answered(response) = outcome {
                intents[seat] = Some(response);
            }
        }

        let Some((claimer, intent)) = arbiter::arbitrate(&intents, discarder) else {
            return Ok(Some(TurnStep::Draw));
        };
        debug!(
            "table {}: seat {claimer} claims {tile} with {intent:?}",
            self.code
        );

        match intent {
            SeatResponse::Win { tile: claimed } => {
                match self.state_mut()?.win(claimer, claimed, Some(discarder)) {
                    Ok(_) => Ok(None),
                    Err(error) => {
                        warn!(
                            "table {}: seat {claimer} win claim rejected: {error}",
                            self.code
                        );
                        Ok(Some(TurnStep::Draw))
                    }
                }
            }
            SeatResponse::Kan { tile: claimed, .. } => {
                // only the exposed flavor claims a discard
                match self
                    .state_mut()?
                    .kan(claimer, claimed, KanKind::Exposed, Some(discarder))
                {
                    Ok(replacement) => {
                        self.broadcast(ServerMessage::Kan {
                            seat: claimer,
                            kind: KanKind::Exposed,
                            tile: claimed,
                        });
                        if let Some(replacement) = replacement {
                            self.seats[claimer].send(ServerMessage::DrawSelf { tile: replacement });
                        }
                        Ok(Some(TurnStep::SelfAction { seat: claimer }))
                    }
                    Err(MatchError::Ended) => {
                        self.broadcast(ServerMessage::Kan {
                            seat: claimer,
                            kind: KanKind::Exposed,
                            tile: claimed,
                        });
                        Ok(None)
                    }
                    Err(error) => {
                        warn!("table {}: seat {claimer} kan rejected: {error}", self.code);
                        Ok(Some(TurnStep::Draw))
                    }
                }
            }
            SeatResponse::Pon { tile: claimed } => {
                match self.state_mut()?.pon(claimer, discarder, claimed) {
                    Ok(()) => {
                        self.broadcast(ServerMessage::Pon {
                            seat: claimer,
                            source: discarder,
                            tile: claimed,
                        });
                        Ok(Some(TurnStep::ForcedDiscard { seat: claimer }))
                    }
                    Err(error) => {
                        warn!("table {}: seat {claimer} pon rejected: {error}", self.code);
                        Ok(Some(TurnStep::Draw))
                    }
                }
            }
            SeatResponse::Chi {
                tile: claimed,
                using,
            } => match self.state_mut()?.chi(claimer, discarder, claimed, using) {
                Ok(()) => {
                    let mut run = [claimed, using[0], using[1]];
                    run.sort();
                    self.broadcast(ServerMessage::Chi {
                        seat: claimer,
                        source: discarder,
                        tiles: run,
                    });
                    Ok(Some(TurnStep::ForcedDiscard { seat: claimer }))
                }
                Err(error) => {
                    warn!("table {}: seat {claimer} chi rejected: {error}", self.code);
                    Ok(Some(TurnStep::Draw))
                }
            },
            other => {
                debug!(
                    "table {}: seat {claimer} answered the claim window with {other:?}, ignoring",
                    self.code
                );
                Ok(Some(TurnStep::Draw))
            }
        }
    }

    /// Apply score movement, announce the outcome, persist new totals.
    async fn settle(&mut self, outcome: &MatchOutcome) {
        let deltas = outcome.score_deltas(self.seats.len());
        for (session, delta) in self.seats.iter_mut().zip(&deltas) {
            session.profile.total_score += delta;
        }
        let scores: Vec<i64> = self
            .seats
            .iter()
            .map(|session| session.profile.total_score)
            .collect();
        info!(
            "table {}: settled {outcome:?}, totals {scores:?}",
            self.code
        );
        self.broadcast(ServerMessage::End {
            outcome: outcome.clone(),
            scores,
        });

        let updates = self.seats.iter().map(|session| {
            let store = Arc::clone(&self.scores);
            let username = session.profile.username.clone();
            let total = session.profile.total_score;
            async move {
                if let Err(error) = store.update_score(&username, total).await {
                    error!("failed to persist score for {username}: {error}");
                }
            }
        });
        join_all(updates).await;
    }

    async fn dismiss(&mut self, reason: &str) {
        if self.phase < TablePhase::Dismissed {
            self.set_phase(TablePhase::Dismissed);
        }
        self.broadcast(ServerMessage::Dismiss {
            reason: reason.to_string(),
        });
        self.directory.write().await.remove(&self.code);
        info!("table {} dismissed: {reason}", self.code);
    }

    /// Non-blocking sweep of the control inbox between turn steps.
    fn drain_control(&mut self) {
        while let Ok(message) = self.inbox.try_recv() {
            self.handle_control(message);
        }
    }

    fn handle_control(&mut self, message: TableMessage) {
        match message {
            TableMessage::Join {
                profile,
                outbound,
                inbound,
                reply,
            } => {
                let _ = reply.send(self.seat_player(profile, outbound, inbound));
            }
            TableMessage::Reconnect {
                username,
                outbound,
                inbound,
                reply,
            } => {
                let _ = reply.send(self.reseat_player(&username, outbound, inbound));
            }
            TableMessage::Exit { username, reply } => {
                let _ = reply.send(self.unseat_player(&username));
            }
            TableMessage::Summary { reply } => {
                let _ = reply.send(self.summary());
            }
        }
    }

    fn seat_player(
        &mut self,
        profile: PlayerProfile,
        outbound: mpsc::Sender<ServerMessage>,
        inbound: mpsc::Receiver<SeatResponse>,
    ) -> Result<SeatIndex, TableError> {
        if self.phase != TablePhase::Waiting {
            return Err(TableError::MatchInProgress);
        }
        if self.seats.len() >= self.config.seat_count {
            return Err(TableError::RosterFull);
        }
        if self
            .seats
            .iter()
            .any(|session| session.profile.username == profile.username)
        {
            return Err(TableError::AlreadySeated(profile.username));
        }
        let seat = self.seats.len();
        let name = profile.username.clone();
        info!("table {}: {name} took seat {seat}", self.code);
        self.seats.push(SeatSession::new(profile, outbound, inbound));
        self.broadcast(ServerMessage::Join { seat, name });
        Ok(seat)
    }

    fn reseat_player(
        &mut self,
        username: &Username,
        outbound: mpsc::Sender<ServerMessage>,
        inbound: mpsc::Receiver<SeatResponse>,
    ) -> Result<(), TableError> {
        let seat = self
            .seats
            .iter()
            .position(|session| &session.profile.username == username)
            .ok_or_else(|| TableError::NotSeated(username.clone()))?;
        self.seats[seat].reattach(outbound, inbound);
        info!("table {}: {username} reconnected to seat {seat}", self.code);
        // replay full current state so the seat can resume
        if let Some(view) = self.views().into_iter().nth(seat) {
            self.seats[seat].send(ServerMessage::UpdateInfo { view });
        }
        Ok(())
    }

    fn unseat_player(&mut self, username: &Username) -> Result<(), TableError> {
        if self.phase != TablePhase::Waiting {
            return Err(TableError::MatchInProgress);
        }
        let seat = self
            .seats
            .iter()
            .position(|session| &session.profile.username == username)
            .ok_or_else(|| TableError::NotSeated(username.clone()))?;
        let session = self.seats.remove(seat);
        self.broadcast(ServerMessage::Exit {
            seat,
            name: session.profile.username,
        });
        Ok(())
    }

    fn summary(&self) -> TableSummary {
        TableSummary {
            code: self.code,
            phase: self.phase,
            seat_count: self.config.seat_count,
            seated: self
                .seats
                .iter()
                .map(|session| session.profile.username.clone())
                .collect(),
            in_match: self.match_state.is_some(),
        }
    }

    fn state_ref(&self) -> Result<&MatchState, TableError> {
        self.match_state.as_ref().ok_or(TableError::MatchNotStarted)
    }

    fn state_mut(&mut self) -> Result<&mut MatchState, TableError> {
        self.match_state.as_mut().ok_or(TableError::MatchNotStarted)
    }

    /// Per-seat snapshots of the running match; empty before the deal.
    fn views(&self) -> Vec<MatchView> {
        let Some(state) = self.match_state.as_ref() else {
            return Vec::new();
        };
        let table: Vec<PublicSeat> = state
            .hands()
            .iter()
            .enumerate()
            .map(|(seat, hand)| PublicSeat {
                seat,
                name: self.seats[seat].profile.username.clone(),
                score: self.seats[seat].profile.total_score,
                hand: hand.public(),
            })
            .collect();
        state
            .hands()
            .iter()
            .enumerate()
            .map(|(seat, hand)| MatchView {
                seat,
                hand: hand.clone(),
                table: table.clone(),
                remaining_tiles: state.remaining_tiles(),
            })
            .collect()
    }

    fn broadcast_views(&mut self) {
        for (seat, view) in self.views().into_iter().enumerate() {
            self.seats[seat].send(ServerMessage::UpdateInfo { view });
        }
    }

    fn broadcast(&mut self, message: ServerMessage) {
        for session in &mut self.seats {
            session.send(message.clone());
        }
    }

    fn broadcast_except(&mut self, skip: SeatIndex, message: ServerMessage) {
        for (seat, session) in self.seats.iter_mut().enumerate() {
            if seat != skip {
                session.send(message.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::{MemoryAccounts, PlayerProfile};
    use crate::game::constants::INITIAL_SCORE;
    use crate::game::entities::Username;
    use std::collections::HashMap;
    use tokio::sync::RwLock;

    fn actor(config: TableConfig) -> TableActor {
        let directory: TableDirectory = Arc::new(RwLock::new(HashMap::new()));
        let (actor, _handle) = TableActor::new(
            1,
            config,
            Arc::new(MemoryAccounts::new()),
            directory,
        );
        actor
    }

    fn profile(name: &str) -> PlayerProfile {
        PlayerProfile {
            username: Username::new(name),
            display_name: name.to_string(),
            total_score: INITIAL_SCORE,
        }
    }

    fn channels() -> (
        mpsc::Sender<ServerMessage>,
        mpsc::Receiver<SeatResponse>,
    ) {
        let (out_tx, _out_rx) = mpsc::channel(16);
        let (_in_tx, in_rx) = mpsc::channel(16);
        (out_tx, in_rx)
    }

    #[tokio::test]
    async fn test_roster_rejects_duplicates_and_overflow() {
        let mut actor = actor(TableConfig::default());
        let (tx, rx) = channels();
        actor.seat_player(profile("alice"), tx, rx).unwrap();

        let (tx, rx) = channels();
        assert!(matches!(
            actor.seat_player(profile("alice"), tx, rx),
            Err(TableError::AlreadySeated(_))
        ));

        let (tx, rx) = channels();
        actor.seat_player(profile("bob"), tx, rx).unwrap();
        let (tx, rx) = channels();
        assert!(matches!(
            actor.seat_player(profile("carol"), tx, rx),
            Err(TableError::RosterFull)
        ));
    }

    #[tokio::test]
    async fn test_exit_is_only_legal_while_waiting() {
        let mut actor = actor(TableConfig::default());
        let (tx, rx) = channels();
        actor.seat_player(profile("alice"), tx, rx).unwrap();
        actor.unseat_player(&Username::new("alice")).unwrap();
        assert!(actor.seats.is_empty());

        let (tx, rx) = channels();
        actor.seat_player(profile("alice"), tx, rx).unwrap();
        actor.set_phase(TablePhase::ReadyCheck);
        assert!(matches!(
            actor.unseat_player(&Username::new("alice")),
            Err(TableError::MatchInProgress)
        ));
    }

    #[tokio::test]
    async fn test_summary_reflects_roster() {
        let mut actor = actor(TableConfig::default());
        let (tx, rx) = channels();
        actor.seat_player(profile("alice"), tx, rx).unwrap();
        let summary = actor.summary();
        assert_eq!(summary.code, 1);
        assert_eq!(summary.phase, TablePhase::Waiting);
        assert_eq!(summary.seated, vec![Username::new("alice")]);
        assert!(!summary.in_match);
    }

    #[test]
    fn test_phase_order_is_monotonic() {
        assert!(TablePhase::Waiting < TablePhase::ReadyCheck);
        assert!(TablePhase::ReadyCheck < TablePhase::Playing);
        assert!(TablePhase::Playing < TablePhase::Settling);
        assert!(TablePhase::Settling < TablePhase::Dismissed);
    }
}
