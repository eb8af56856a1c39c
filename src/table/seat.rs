//! One seat's session state and bounded-wait machinery.

use log::{debug, warn};
use tokio::sync::mpsc;
use tokio::time::{Duration, interval};

use crate::account::PlayerProfile;
use crate::game::state_machine::ActionOption;

use super::messages::{SeatResponse, ServerMessage};

/// How a bounded wait on a seat ended.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(super) enum WaitOutcome {
    Answered(SeatResponse),
    TimedOut,
    Disconnected,
}

impl WaitOutcome {
    /// The response to act on; anything but an answer degrades to no
    /// action.
    pub fn response(self) -> SeatResponse {
        match self {
            Self::Answered(response) => response,
            Self::TimedOut | Self::Disconnected => SeatResponse::Cancel,
        }
    }
}

/// A seated player: profile, running total, and the duplex channel pair the
/// transport handed over at join time. A disconnected seat keeps its place;
/// its waits just resolve to [`WaitOutcome::Disconnected`] until the
/// transport reconnects it.
pub(super) struct SeatSession {
    pub profile: PlayerProfile,
    outbound: mpsc::Sender<ServerMessage>,
    inbound: mpsc::Receiver<SeatResponse>,
    pub connected: bool,
}

impl SeatSession {
    pub fn new(
        profile: PlayerProfile,
        outbound: mpsc::Sender<ServerMessage>,
        inbound: mpsc::Receiver<SeatResponse>,
    ) -> Self {
        Self {
            profile,
            outbound,
            inbound,
            connected: true,
        }
    }

    /// Swap in a fresh channel pair after a reconnect.
    pub fn reattach(
        &mut self,
        outbound: mpsc::Sender<ServerMessage>,
        inbound: mpsc::Receiver<SeatResponse>,
    ) {
        self.outbound = outbound;
        self.inbound = inbound;
        self.connected = true;
    }

    /// Fire-and-forget send. A full channel drops the message, a closed
    /// one marks the seat disconnected; neither blocks the session.
    pub fn send(&mut self, message: ServerMessage) {
        match self.outbound.try_send(message) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(_)) => {
                warn!("seat {} channel full, dropping message", self.profile.username);
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                if self.connected {
                    debug!("seat {} disconnected", self.profile.username);
                }
                self.connected = false;
            }
        }
    }

    /// Throw away responses left over from an earlier window, so a late
    /// answer can never be mistaken for the current one.
    fn drain_stale(&mut self) {
        while let Ok(stale) = self.inbound.try_recv() {
            debug!(
                "seat {} discarding stale response {stale:?}",
                self.profile.username
            );
        }
    }

    /// Wait up to `window` for one response, streaming a once-per-second
    /// countdown to the seat. The countdown dies with the wait: the
    /// moment a response lands, no further notices go out.
    pub async fn await_response(&mut self, window: Duration) -> WaitOutcome {
        if !self.connected {
            return WaitOutcome::Disconnected;
        }
        self.drain_stale();
        let mut remaining = window.as_secs();
        let mut tick = interval(Duration::from_secs(1));
        loop {
            tokio::select! {
                response = self.inbound.recv() => {
                    return match response {
                        Some(response) => WaitOutcome::Answered(response),
                        None => {
                            self.connected = false;
                            WaitOutcome::Disconnected
                        }
                    };
                }
                _ = tick.tick() => {
                    if remaining == 0 {
                        return WaitOutcome::TimedOut;
                    }
                    self.send(ServerMessage::Countdown { count: remaining });
                    remaining -= 1;
                }
            }
        }
    }

    /// Offer a set of actions and wait for the seat's pick.
    pub async fn solicit(&mut self, options: Vec<ActionOption>, window: Duration) -> WaitOutcome {
        self.send(ServerMessage::ActionChoose { options });
        self.await_response(window).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::constants::INITIAL_SCORE;
    use crate::game::entities::Username;

    fn profile(name: &str) -> PlayerProfile {
        PlayerProfile {
            username: Username::new(name),
            display_name: name.to_string(),
            total_score: INITIAL_SCORE,
        }
    }

    fn seat() -> (
        SeatSession,
        mpsc::Receiver<ServerMessage>,
        mpsc::Sender<SeatResponse>,
    ) {
        let (out_tx, out_rx) = mpsc::channel(16);
        let (in_tx, in_rx) = mpsc::channel(16);
        (SeatSession::new(profile("alice"), out_tx, in_rx), out_rx, in_tx)
    }

    #[tokio::test]
    async fn test_answer_cancels_the_countdown() {
        let (mut session, mut out_rx, in_tx) = seat();
        in_tx.send(SeatResponse::Ready).await.unwrap();
        let outcome = session.await_response(Duration::from_secs(5)).await;
        assert_eq!(outcome, WaitOutcome::Answered(SeatResponse::Ready));
        // at most the initial countdown notice made it out
        let mut countdowns = 0;
        while let Ok(msg) = out_rx.try_recv() {
            if matches!(msg, ServerMessage::Countdown { .. }) {
                countdowns += 1;
            }
        }
        assert!(countdowns <= 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_counts_down_to_zero() {
        let (mut session, mut out_rx, _in_tx) = seat();
        let outcome = session.await_response(Duration::from_secs(3)).await;
        assert_eq!(outcome, WaitOutcome::TimedOut);
        let mut counts = Vec::new();
        while let Ok(msg) = out_rx.try_recv() {
            if let ServerMessage::Countdown { count } = msg {
                counts.push(count);
            }
        }
        assert_eq!(counts, vec![3, 2, 1]);
    }

    #[tokio::test]
    async fn test_closed_channel_reads_as_disconnected() {
        let (mut session, _out_rx, in_tx) = seat();
        drop(in_tx);
        let outcome = session.await_response(Duration::from_secs(1)).await;
        assert_eq!(outcome, WaitOutcome::Disconnected);
        assert!(!session.connected);
        // later waits short-circuit
        let outcome = session.await_response(Duration::from_secs(1)).await;
        assert_eq!(outcome, WaitOutcome::Disconnected);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_responses_are_drained() {
        let (mut session, _out_rx, in_tx) = seat();
        in_tx.send(SeatResponse::Cancel).await.unwrap();
        in_tx.send(SeatResponse::Cancel).await.unwrap();
        // both stale messages predate this window's real answer
        in_tx.send(SeatResponse::Ready).await.unwrap();
        let outcome = session.await_response(Duration::from_secs(2)).await;
        // drain removes everything buffered before the wait began
        assert_eq!(outcome, WaitOutcome::TimedOut);
    }
}
