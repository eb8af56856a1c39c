//! Game-wide constants.

/// Number of seats a table fills before starting a match.
pub const DEFAULT_SEAT_COUNT: usize = 2;

/// Largest seat count a table config may ask for.
pub const MAX_SEAT_COUNT: usize = 4;

/// Ranks per suit.
pub const RANKS_PER_SUIT: u8 = 9;

/// Copies of each tile in the wall.
pub const TILE_COPIES: usize = 4;

/// Total tiles in a fresh wall: 3 suits x 9 ranks x 4 copies.
pub const WALL_SIZE: usize = 108;

/// Nominal concealed hand size between a discard and the next draw.
pub const HAND_SIZE: usize = 13;

/// Seconds a table waits for its roster to fill before giving up.
pub const DEFAULT_WAIT_FOR_SEATS_SECS: u64 = 600;

/// Seconds each seat has to acknowledge the ready check.
pub const DEFAULT_READY_TIMEOUT_SECS: u64 = 10;

/// Seconds each seat has to answer an action solicitation.
pub const DEFAULT_THINKING_TIMEOUT_SECS: u64 = 60;

/// Grace period before the ready check, letting the last seat's
/// transport finish connecting.
pub const DEFAULT_CONNECT_GRACE_SECS: u64 = 3;

/// Interval between heartbeats while a table waits for seats.
pub const HEARTBEAT_INTERVAL_SECS: u64 = 10;

/// Score a newly registered player starts with.
pub const INITIAL_SCORE: i64 = 100;

/// Longest username accepted; longer names are truncated.
pub const MAX_USERNAME_LENGTH: usize = 16;

/// Base points for any regular winning hand.
pub const BASE_WIN_POINTS: u32 = 3;

/// Bonus when every group of the decomposition is a run.
pub const PURE_WIN_BONUS: u32 = 3;

/// Bonus when every group of the decomposition is a triplet or quad.
pub const ALL_TRIPLETS_BONUS: u32 = 5;

/// Bonus when the whole hand, melds included, is a single suit.
pub const SINGLE_SUIT_BONUS: u32 = 9;

/// Flat score for the seven-pairs special shape.
pub const SEVEN_PAIRS_POINTS: u32 = 12;

/// A self-drawn win collects the score from every other seat.
pub const SELF_DRAW_MULTIPLIER: i64 = 3;
