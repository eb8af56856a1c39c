//! Winning-shape search and scoring.
//!
//! Everything here is a pure function over tile multisets: no match state,
//! no side effects. [`win_candidates`] enumerates every way a concealed hand
//! plus a candidate winning tile decomposes into groups and a pair (or the
//! seven-pairs special shape), [`score`] prices a single shape, and
//! [`evaluate`] combines them into the best achievable result. A hand that
//! does not win yields an empty candidate set, never an error: callers must
//! treat "no candidates" as an invalid win claim.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::constants::{
    ALL_TRIPLETS_BONUS, BASE_WIN_POINTS, PURE_WIN_BONUS, SEVEN_PAIRS_POINTS, SINGLE_SUIT_BONUS,
};
use super::entities::{Meld, Tile};

/// One group of a standard decomposition, identified by its anchor tile:
/// a run starts at `low`, a triplet repeats `tile`.
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub enum Group {
    Run { low: Tile },
    Triplet { tile: Tile },
}

impl Group {
    #[must_use]
    pub fn is_run(&self) -> bool {
        matches!(self, Self::Run { .. })
    }
}

/// A full cover of the concealed tiles plus the winning tile: some groups
/// and exactly one pair.
#[derive(Clone, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub struct Decomposition {
    pub groups: Vec<Group>,
    pub pair: Tile,
}

/// A candidate winning shape.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum WinShape {
    Standard(Decomposition),
    SevenPairs,
}

/// Labels attached to a scored win.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WinLabel {
    PlainWin,
    PureWin,
    AllTriplets,
    SevenPairs,
    SingleSuit,
}

impl fmt::Display for WinLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::PlainWin => "plain win",
            Self::PureWin => "pure win",
            Self::AllTriplets => "all triplets",
            Self::SevenPairs => "seven pairs",
            Self::SingleSuit => "single suit",
        };
        write!(f, "{repr}")
    }
}

/// Points and labels for one winning shape. Ordered by points first, then
/// labels, so `max` picks the best candidate deterministically.
#[derive(Clone, Debug, Deserialize, Eq, Ord, PartialEq, PartialOrd, Serialize)]
pub struct WinScore {
    pub points: u32,
    pub labels: Vec<WinLabel>,
}

/// Enumerate every winning shape covering `tiles` (the concealed multiset
/// plus the candidate winning tile) given the already-committed melds.
///
/// Standard shapes come from backtracking over a sorted tile counter,
/// always consuming the smallest remaining tile (as the pair, as a
/// triplet, or as the low end of a run), so each decomposition is produced
/// exactly once. Malformed or non-winning inputs simply produce no
/// candidates.
#[must_use]
pub fn win_candidates(tiles: &[Tile], melds: &[Meld]) -> Vec<WinShape> {
    let mut candidates = Vec::new();
    if tiles.len() % 3 != 2 {
        return candidates;
    }

    let mut counts: BTreeMap<Tile, u8> = BTreeMap::new();
    for &tile in tiles {
        *counts.entry(tile).or_insert(0) += 1;
    }

    if melds.is_empty() && counts.len() == 7 && counts.values().all(|&n| n == 2) {
        candidates.push(WinShape::SevenPairs);
    }

    let mut groups = Vec::with_capacity(tiles.len() / 3);
    decompose(&mut counts, None, &mut groups, &mut candidates);
    candidates
}

fn decompose(
    counts: &mut BTreeMap<Tile, u8>,
    pair: Option<Tile>,
    groups: &mut Vec<Group>,
    out: &mut Vec<WinShape>,
) {
    let Some((&tile, &n)) = counts.iter().find(|&(_, &n)| n > 0) else {
        if let Some(pair) = pair {
            out.push(WinShape::Standard(Decomposition {
                groups: groups.clone(),
                pair,
            }));
        }
        return;
    };

    if pair.is_none() && n >= 2 {
        take(counts, tile, 2);
        decompose(counts, Some(tile), groups, out);
        give(counts, tile, 2);
    }

    if n >= 3 {
        take(counts, tile, 3);
        groups.push(Group::Triplet { tile });
        decompose(counts, pair, groups, out);
        groups.pop();
        give(counts, tile, 3);
    }

    if let (Some(mid), Some(high)) = (tile.successor(), tile.successor().and_then(Tile::successor))
        && counts.get(&mid).is_some_and(|&n| n > 0)
        && counts.get(&high).is_some_and(|&n| n > 0)
    {
        for t in [tile, mid, high] {
            take(counts, t, 1);
        }
        groups.push(Group::Run { low: tile });
        decompose(counts, pair, groups, out);
        groups.pop();
        for t in [tile, mid, high] {
            give(counts, t, 1);
        }
    }
}

fn take(counts: &mut BTreeMap<Tile, u8>, tile: Tile, n: u8) {
    if let Some(count) = counts.get_mut(&tile) {
        *count -= n;
    }
}

fn give(counts: &mut BTreeMap<Tile, u8>, tile: Tile, n: u8) {
    if let Some(count) = counts.get_mut(&tile) {
        *count += n;
    }
}

/// Price a single shape. `tiles` is the same multiset handed to
/// [`win_candidates`]; it only feeds the single-suit check.
#[must_use]
pub fn score(shape: &WinShape, melds: &[Meld], tiles: &[Tile]) -> WinScore {
    let (mut points, mut labels) = match shape {
        WinShape::SevenPairs => (SEVEN_PAIRS_POINTS, vec![WinLabel::SevenPairs]),
        WinShape::Standard(decomposition) => {
            let mut points = BASE_WIN_POINTS;
            let mut labels = vec![WinLabel::PlainWin];
            let all_runs = decomposition.groups.iter().all(Group::is_run)
                && melds.iter().all(Meld::is_run);
            let all_triplets = decomposition.groups.iter().all(|g| !g.is_run())
                && melds.iter().all(Meld::is_triplet_like);
            if all_runs {
                points += PURE_WIN_BONUS;
                labels.push(WinLabel::PureWin);
            }
            if all_triplets {
                points += ALL_TRIPLETS_BONUS;
                labels.push(WinLabel::AllTriplets);
            }
            (points, labels)
        }
    };

    let mut suits = tiles
        .iter()
        .chain(melds.iter().flat_map(|m| m.tiles.iter()))
        .map(|t| t.suit());
    if let Some(first) = suits.next()
        && suits.all(|s| s == first)
    {
        points += SINGLE_SUIT_BONUS;
        labels.push(WinLabel::SingleSuit);
    }

    WinScore { points, labels }
}

/// Best-scoring candidate, by `(points, labels)`.
#[must_use]
pub fn best_result(candidates: &[WinShape], melds: &[Meld], tiles: &[Tile]) -> Option<WinScore> {
    candidates
        .iter()
        .map(|shape| score(shape, melds, tiles))
        .max()
}

/// Evaluate a win claim: concealed hand plus `winning` against the melds.
/// `None` means the claim is invalid and must be rejected.
#[must_use]
pub fn evaluate(concealed: &[Tile], winning: Tile, melds: &[Meld]) -> Option<WinScore> {
    let mut tiles = concealed.to_vec();
    tiles.push(winning);
    let candidates = win_candidates(&tiles, melds);
    best_result(&candidates, melds, &tiles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::entities::MeldKind;

    fn tiles(spec: &[&str]) -> Vec<Tile> {
        spec.iter().map(|s| s.parse().unwrap()).collect()
    }

    fn t(s: &str) -> Tile {
        s.parse().unwrap()
    }

    #[test]
    fn test_four_runs_and_pair_is_a_pure_win() {
        // 123m 456m 789m 123s + 9p9p
        let concealed = tiles(&[
            "1m", "2m", "3m", "4m", "5m", "6m", "7m", "8m", "9m", "1s", "2s", "9p", "9p",
        ]);
        let result = evaluate(&concealed, t("3s"), &[]).unwrap();
        assert!(result.labels.contains(&WinLabel::PureWin));
        assert!(!result.labels.contains(&WinLabel::AllTriplets));
        assert_eq!(result.points, 3 + 3);
    }

    #[test]
    fn test_four_triplets_and_pair_is_all_triplets() {
        let concealed = tiles(&[
            "1m", "1m", "1m", "3s", "3s", "3s", "5p", "5p", "5p", "7m", "7m", "9s", "9s",
        ]);
        let result = evaluate(&concealed, t("7m"), &[]).unwrap();
        assert!(result.labels.contains(&WinLabel::AllTriplets));
        assert!(!result.labels.contains(&WinLabel::PureWin));
        assert_eq!(result.points, 3 + 5);
    }

    #[test]
    fn test_pure_and_all_triplets_never_share_a_decomposition() {
        // 111m 123m-ish overlap: 1m1m1m 2m3m4m 555s 678p 9p9p has both run
        // and triplet groups, so neither bonus applies.
        let concealed = tiles(&[
            "1m", "1m", "1m", "2m", "3m", "4m", "5s", "5s", "5s", "6p", "7p", "9p", "9p",
        ]);
        let result = evaluate(&concealed, t("8p"), &[]).unwrap();
        assert!(!result.labels.contains(&WinLabel::PureWin));
        assert!(!result.labels.contains(&WinLabel::AllTriplets));
        assert_eq!(result.points, 3);
    }

    #[test]
    fn test_single_suit_bonus_counts_melds_too() {
        // 123m 456m 999m 888m(meld) + 7m7m
        let concealed = tiles(&["1m", "2m", "3m", "4m", "5m", "6m", "9m", "9m", "9m", "7m"]);
        let melds = vec![Meld::triplet(t("8m"))];
        let result = evaluate(&concealed, t("7m"), &melds).unwrap();
        assert!(result.labels.contains(&WinLabel::SingleSuit));
        assert_eq!(result.points, 3 + 9);
    }

    #[test]
    fn test_off_suit_meld_spoils_single_suit() {
        let concealed = tiles(&["1m", "2m", "3m", "4m", "5m", "6m", "9m", "9m", "9m", "7m"]);
        let melds = vec![Meld::triplet(t("8p"))];
        let result = evaluate(&concealed, t("7m"), &melds).unwrap();
        assert!(!result.labels.contains(&WinLabel::SingleSuit));
    }

    #[test]
    fn test_seven_pairs_scores_flat_value() {
        let concealed = tiles(&[
            "1m", "1m", "3m", "3m", "5s", "5s", "7s", "7s", "9p", "9p", "2p", "2p", "4m",
        ]);
        let result = evaluate(&concealed, t("4m"), &[]).unwrap();
        assert!(result.labels.contains(&WinLabel::SevenPairs));
        assert_eq!(result.points, 12);
    }

    #[test]
    fn test_seven_pairs_requires_zero_melds() {
        // same pairs, but with a committed meld the shape is refused
        let concealed = tiles(&["1m", "1m", "3m", "3m", "5s", "5s", "7s", "7s", "9p", "9p"]);
        let melds = vec![Meld::triplet(t("2s"))];
        let tiles_with_win: Vec<Tile> = {
            let mut v = concealed.clone();
            v.push(t("9p"));
            v
        };
        let candidates = win_candidates(&tiles_with_win, &melds);
        assert!(
            candidates
                .iter()
                .all(|c| !matches!(c, WinShape::SevenPairs))
        );
    }

    #[test]
    fn test_seven_pairs_rejects_four_of_a_kind() {
        // all counts even but only six distinct values
        let concealed = tiles(&[
            "1m", "1m", "1m", "1m", "3m", "3m", "5s", "5s", "7s", "7s", "9p", "9p", "2p",
        ]);
        let candidates = {
            let mut v = concealed.clone();
            v.push(t("2p"));
            win_candidates(&v, &[])
        };
        assert!(
            candidates
                .iter()
                .all(|c| !matches!(c, WinShape::SevenPairs))
        );
    }

    #[test]
    fn test_seven_pairs_single_suit_stacks() {
        let concealed = tiles(&[
            "1m", "1m", "2m", "2m", "3m", "3m", "4m", "4m", "5m", "5m", "6m", "6m", "7m",
        ]);
        let result = evaluate(&concealed, t("7m"), &[]).unwrap();
        assert!(result.labels.contains(&WinLabel::SevenPairs));
        assert!(result.labels.contains(&WinLabel::SingleSuit));
        assert_eq!(result.points, 12 + 9);
    }

    #[test]
    fn test_non_winning_hand_has_no_candidates() {
        let concealed = tiles(&[
            "1m", "2m", "4m", "5m", "7m", "8m", "1s", "2s", "4s", "5s", "7s", "8s", "1p",
        ]);
        assert_eq!(evaluate(&concealed, t("9p"), &[]), None);
    }

    #[test]
    fn test_malformed_input_sizes_yield_nothing() {
        assert!(win_candidates(&tiles(&["1m", "2m", "3m"]), &[]).is_empty());
        assert!(win_candidates(&[], &[]).is_empty());
    }

    #[test]
    fn test_candidates_are_stable_across_calls() {
        let mut all = tiles(&[
            "1m", "1m", "1m", "2m", "3m", "4m", "5s", "5s", "5s", "6p", "7p", "9p", "9p",
        ]);
        all.push(t("8p"));
        let first = win_candidates(&all, &[]);
        let second = win_candidates(&all, &[]);
        assert_eq!(first, second);
        assert!(!first.is_empty());
    }

    #[test]
    fn test_pair_anchored_at_smallest_tile_is_found() {
        // the pair uses the lowest tile, which forces the pair branch of
        // the search rather than the run branch
        let concealed = tiles(&[
            "1m", "1m", "2m", "3m", "4m", "5m", "6m", "7m", "1s", "2s", "3s", "5p", "5p",
        ]);
        let result = evaluate(&concealed, t("5p"), &[]);
        assert!(result.is_some());
    }

    #[test]
    fn test_meld_kinds_feed_bonus_checks() {
        // three concealed triplets + an upgraded quad meld + pair
        let concealed = tiles(&["2m", "2m", "2m", "4s", "4s", "4s", "6p", "6p", "6p", "8m"]);
        let mut meld = Meld::triplet(t("9s"));
        meld.upgrade(t("9s"));
        assert_eq!(meld.kind, MeldKind::UpgradedQuad);
        let result = evaluate(&concealed, t("8m"), &[meld]).unwrap();
        assert!(result.labels.contains(&WinLabel::AllTriplets));
    }
}
