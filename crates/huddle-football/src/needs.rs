// Roster need estimation: positional counts against fixed targets.
//
// A tracked position is a surplus once it holds two more than its target
// and a deficit while it holds fewer than its target. Untracked codes are
// counted as reported (DE, OL, ...) but never flagged. Only ids the
// directory cannot place land in UNKNOWN.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::player::PlayerDirectory;
use crate::position::Position;

/// Extra players over target before a position counts as surplus.
pub const SURPLUS_MARGIN: usize = 2;

/// Per-position-code tallies for one set of player ids.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PositionCounts {
    counts: BTreeMap<String, usize>,
    /// Ids the directory had no entry for (also tallied under `Unknown`).
    unresolved: usize,
}

impl PositionCounts {
    /// Tally `ids` by their directory position.
    pub fn tally<'a, I>(ids: I, directory: &PlayerDirectory) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut tally = Self::default();
        for id in ids {
            match directory.get(id) {
                Some(player) => tally.add(player.tally_code()),
                None => {
                    tally.add(Position::Unknown.code());
                    tally.unresolved += 1;
                }
            }
        }
        tally
    }

    fn add(&mut self, code: &str) {
        *self.counts.entry(code.to_string()).or_insert(0) += 1;
    }

    pub fn get(&self, position: Position) -> usize {
        self.get_code(position.code())
    }

    pub fn get_code(&self, code: &str) -> usize {
        self.counts.get(code).copied().unwrap_or(0)
    }

    /// Every tallied id.
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    /// Ids that resolved to a directory entry.
    pub fn resolved_total(&self) -> usize {
        self.total() - self.unresolved
    }

    pub fn unresolved(&self) -> usize {
        self.unresolved
    }

    /// Non-zero counts, ordered by code.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> + '_ {
        self.counts.iter().map(|(code, n)| (code.as_str(), *n))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NeedProfile {
    pub surplus: Vec<Position>,
    pub deficit: Vec<Position>,
}

impl NeedProfile {
    pub fn from_counts(counts: &PositionCounts) -> Self {
        let mut profile = Self::default();
        for position in Position::TRACKED {
            let Some(target) = position.target() else {
                continue;
            };
            let have = counts.get(position);
            if have >= target + SURPLUS_MARGIN {
                profile.surplus.push(position);
            }
            if have < target {
                profile.deficit.push(position);
            }
        }
        profile
    }

    pub fn is_balanced(&self) -> bool {
        self.surplus.is_empty() && self.deficit.is_empty()
    }
}

/// Counts plus the derived need profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RosterNeeds {
    pub counts: PositionCounts,
    pub profile: NeedProfile,
}

/// Estimate positional needs for a (possibly hypothetical) roster.
pub fn estimate_needs<'a, I>(ids: I, directory: &PlayerDirectory) -> RosterNeeds
where
    I: IntoIterator<Item = &'a str>,
{
    let counts = PositionCounts::tally(ids, directory);
    let profile = NeedProfile::from_counts(&counts);
    RosterNeeds { counts, profile }
}
