//! Claim arbitration.
//!
//! When a discard is on the table, several seats may answer the same
//! solicitation cycle at once. Exactly one intent proceeds, chosen by
//! strict priority; ties between different seats go to the seat closest to
//! the discarder in draw order, which keeps the outcome deterministic no
//! matter how the responses were gathered.

use crate::game::entities::SeatIndex;

use super::messages::SeatResponse;

/// Fixed priority of a response type. Higher wins.
#[must_use]
pub fn priority(response: &SeatResponse) -> u8 {
    match response {
        SeatResponse::Win { .. } => 10,
        SeatResponse::Discard { .. } => 9,
        SeatResponse::Kan { .. } => 8,
        SeatResponse::Pon { .. } => 7,
        SeatResponse::Chi { .. } => 6,
        SeatResponse::Ready | SeatResponse::Cancel => 0,
    }
}

/// Pick the single intent to execute out of up to one response per seat.
///
/// Seats are scanned starting just after `discarder`, and only a strictly
/// higher priority displaces the current pick, so among equal claims the
/// seat closest to the discarder wins. `None` means nobody acted.
#[must_use]
pub fn arbitrate(
    intents: &[Option<SeatResponse>],
    discarder: SeatIndex,
) -> Option<(SeatIndex, SeatResponse)> {
    let n = intents.len();
    if n == 0 {
        return None;
    }
    let mut best: Option<(SeatIndex, u8)> = None;
    for offset in 1..=n {
        let seat = (discarder + offset) % n;
        if let Some(response) = &intents[seat] {
            let p = priority(response);
            if p > 0 && best.is_none_or(|(_, bp)| p > bp) {
                best = Some((seat, p));
            }
        }
    }
    best.and_then(|(seat, _)| intents[seat].clone().map(|r| (seat, r)))
}
