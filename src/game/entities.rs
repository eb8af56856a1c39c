use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::{fmt, str::FromStr};
use thiserror::Error;

use super::constants;

/// Tile rank, 1 through 9.
pub type Rank = u8;

/// Type alias for seat positions in draw order.
pub type SeatIndex = usize;

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum Suit {
    Character,
    Bamboo,
    Dot,
}

impl Suit {
    pub const ALL: [Self; 3] = [Self::Character, Self::Bamboo, Self::Dot];
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let repr = match self {
            Self::Character => "m",
            Self::Bamboo => "s",
            Self::Dot => "p",
        };
        write!(f, "{repr}")
    }
}

/// A tile is a rank paired with a suit, written like `3m`, `7s`, or `1p`.
/// Tiles are plain values; the wall holds four copies of each.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Tile(pub Rank, pub Suit);

impl Tile {
    /// Next rank up in the same suit, if any.
    #[must_use]
    pub fn successor(self) -> Option<Self> {
        (self.0 < constants::RANKS_PER_SUIT).then(|| Self(self.0 + 1, self.1))
    }

    /// Next rank down in the same suit, if any.
    #[must_use]
    pub fn predecessor(self) -> Option<Self> {
        (self.0 > 1).then(|| Self(self.0 - 1, self.1))
    }

    #[must_use]
    pub const fn rank(self) -> Rank {
        self.0
    }

    #[must_use]
    pub const fn suit(self) -> Suit {
        self.1
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.0, self.1)
    }
}

#[derive(Debug, Error, Eq, PartialEq)]
#[error("not a tile: {0:?}")]
pub struct InvalidTile(pub String);

impl FromStr for Tile {
    type Err = InvalidTile;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let (Some(rank), Some(suit), None) = (chars.next(), chars.next(), chars.next()) else {
            return Err(InvalidTile(s.to_string()));
        };
        let rank = rank
            .to_digit(10)
            .filter(|r| (1..=u32::from(constants::RANKS_PER_SUIT)).contains(r))
            .ok_or_else(|| InvalidTile(s.to_string()))? as Rank;
        let suit = match suit {
            'm' => Suit::Character,
            's' => Suit::Bamboo,
            'p' => Suit::Dot,
            _ => return Err(InvalidTile(s.to_string())),
        };
        Ok(Self(rank, suit))
    }
}

// Tiles cross the wire in their string form ("3m"), not as a struct.
impl Serialize for Tile {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Tile {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct Username(String);

impl Username {
    pub fn new(s: &str) -> Self {
        let mut username: String = s
            .chars()
            .map(|c| if c.is_ascii_whitespace() { '_' } else { c })
            .collect();
        username.truncate(constants::MAX_USERNAME_LENGTH);
        Self(username)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl<'de> Deserialize<'de> for Username {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Self::new(&s))
    }
}

impl From<&str> for Username {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Kind of a committed, face-up meld.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MeldKind {
    Run,
    Triplet,
    ConcealedQuad,
    ExposedQuad,
    UpgradedQuad,
}

impl fmt::Display for MeldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Run => "run",
            Self::Triplet => "triplet",
            Self::ConcealedQuad => "concealed quad",
            Self::ExposedQuad => "exposed quad",
            Self::UpgradedQuad => "upgraded quad",
        };
        write!(f, "{repr}")
    }
}

/// A meld keeps its tile identities once formed; the only legal mutation
/// afterwards is [`Meld::upgrade`], which turns an open triplet into an
/// upgraded quad with the fourth copy.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Meld {
    pub kind: MeldKind,
    pub tiles: Vec<Tile>,
}

impl Meld {
    #[must_use]
    pub fn run(mut tiles: [Tile; 3]) -> Self {
        tiles.sort();
        Self {
            kind: MeldKind::Run,
            tiles: tiles.to_vec(),
        }
    }

    #[must_use]
    pub fn triplet(tile: Tile) -> Self {
        Self {
            kind: MeldKind::Triplet,
            tiles: vec![tile; 3],
        }
    }

    #[must_use]
    pub fn quad(tile: Tile, kind: MeldKind) -> Self {
        Self {
            kind,
            tiles: vec![tile; 4],
        }
    }

    /// Turn an open triplet into an upgraded quad, in place.
    pub fn upgrade(&mut self, tile: Tile) {
        self.kind = MeldKind::UpgradedQuad;
        self.tiles.push(tile);
    }

    #[must_use]
    pub fn is_run(&self) -> bool {
        self.kind == MeldKind::Run
    }

    /// Triplets and all quad flavors count as triplet groups for scoring.
    #[must_use]
    pub fn is_triplet_like(&self) -> bool {
        !self.is_run()
    }
}

impl fmt::Display for Meld {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[", self.kind)?;
        for (i, tile) in self.tiles.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{tile}")?;
        }
        write!(f, "]")
    }
}

/// One entry of a seat's discard river. `hand_cut` distinguishes a tile cut
/// from the concealed hand from the fresh draw being discarded directly.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Discard {
    pub tile: Tile,
    pub hand_cut: bool,
}

/// A seat's hand: the concealed tiles in pickup order, committed melds, the
/// at-most-one just-drawn tile, and the discard river.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct PlayerHand {
    pub concealed: Vec<Tile>,
    pub melds: Vec<Meld>,
    pub draw: Option<Tile>,
    pub discards: Vec<Discard>,
}

impl PlayerHand {
    /// Fold any pending draw-slot tile into the concealed hand.
    pub fn conceal_draw(&mut self) {
        if let Some(tile) = self.draw.take() {
            self.concealed.push(tile);
        }
    }

    /// Copies of `tile` in the concealed hand (draw slot excluded).
    #[must_use]
    pub fn count(&self, tile: Tile) -> usize {
        self.concealed.iter().filter(|&&t| t == tile).count()
    }

    /// Remove one copy of `tile` from the concealed hand.
    pub fn remove(&mut self, tile: Tile) -> bool {
        match self.concealed.iter().position(|&t| t == tile) {
            Some(idx) => {
                self.concealed.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Tiles this hand accounts for: concealed, draw slot, melds, and river.
    #[must_use]
    pub fn tile_total(&self) -> usize {
        self.concealed.len()
            + usize::from(self.draw.is_some())
            + self.discards.len()
            + self.melds.iter().map(|m| m.tiles.len()).sum::<usize>()
    }

    /// Public face of the hand: everything except the concealed tiles and
    /// the identity of the draw-slot tile.
    #[must_use]
    pub fn public(&self) -> PublicHand {
        PublicHand {
            melds: self.melds.clone(),
            discards: self.discards.clone(),
            holds_draw: self.draw.is_some(),
            concealed_count: self.concealed.len(),
        }
    }
}

/// What the other seats are allowed to see of a hand.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct PublicHand {
    pub melds: Vec<Meld>,
    pub discards: Vec<Discard>,
    pub holds_draw: bool,
    pub concealed_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(s: &str) -> Tile {
        s.parse().unwrap()
    }

    #[test]
    fn test_tile_round_trips_through_display() {
        for s in ["1m", "9m", "5s", "3p"] {
            assert_eq!(t(s).to_string(), s);
        }
    }

    #[test]
    fn test_tile_rejects_garbage() {
        for s in ["0m", "10m", "5x", "", "m5", "55"] {
            assert!(s.parse::<Tile>().is_err(), "{s} should not parse");
        }
    }

    #[test]
    fn test_tile_serde_uses_string_form() {
        let json = serde_json::to_string(&t("4s")).unwrap();
        assert_eq!(json, "\"4s\"");
        let back: Tile = serde_json::from_str(&json).unwrap();
        assert_eq!(back, t("4s"));
    }

    #[test]
    fn test_tile_neighbors_stop_at_suit_edges() {
        assert_eq!(t("1m").predecessor(), None);
        assert_eq!(t("9m").successor(), None);
        assert_eq!(t("4p").successor(), Some(t("5p")));
        assert_eq!(t("4p").predecessor(), Some(t("3p")));
    }

    #[test]
    fn test_username_sanitizes_whitespace_and_length() {
        let name = Username::new("a very long name indeed");
        assert!(!name.as_str().contains(' '));
        assert!(name.as_str().len() <= 16);
    }

    #[test]
    fn test_meld_run_sorts_tiles() {
        let meld = Meld::run([t("3m"), t("1m"), t("2m")]);
        assert_eq!(meld.tiles, vec![t("1m"), t("2m"), t("3m")]);
        assert!(meld.is_run());
    }

    #[test]
    fn test_meld_upgrade_becomes_quad() {
        let mut meld = Meld::triplet(t("7p"));
        meld.upgrade(t("7p"));
        assert_eq!(meld.kind, MeldKind::UpgradedQuad);
        assert_eq!(meld.tiles.len(), 4);
        assert!(meld.is_triplet_like());
    }

    #[test]
    fn test_hand_conceal_draw_moves_slot_tile() {
        let mut hand = PlayerHand::default();
        hand.draw = Some(t("5s"));
        hand.conceal_draw();
        assert_eq!(hand.draw, None);
        assert_eq!(hand.concealed, vec![t("5s")]);
        // idempotent when the slot is empty
        hand.conceal_draw();
        assert_eq!(hand.concealed.len(), 1);
    }

    #[test]
    fn test_hand_tile_total_counts_every_zone() {
        let mut hand = PlayerHand::default();
        hand.concealed = vec![t("1m"), t("2m")];
        hand.draw = Some(t("3m"));
        hand.melds.push(Meld::triplet(t("9p")));
        hand.discards.push(Discard {
            tile: t("8s"),
            hand_cut: false,
        });
        assert_eq!(hand.tile_total(), 2 + 1 + 3 + 1);
    }
}
