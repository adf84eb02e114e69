// Per-session memo of player stat reports.
//
// Each (player, season) is either being fetched or done. The event loop
// owns the cache outright, so there is no locking; a miss marks the key
// pending and tells the caller to start exactly one fetch.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use huddle_football::stats::{PlayerStatReport, StatLine};
use huddle_football::trade::StatsLookup;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StatsKey {
    pub player_id: String,
    pub season: u16,
}

impl StatsKey {
    pub fn new(player_id: impl Into<String>, season: u16) -> Self {
        Self {
            player_id: player_id.into(),
            season,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum CacheEntry {
    Pending,
    Ready(PlayerStatReport),
}

/// Result of `StatsCache::lookup`.
#[derive(Debug, PartialEq)]
pub enum Lookup<'a> {
    Hit(&'a PlayerStatReport),
    /// A fetch is already in flight.
    Pending,
    /// Nothing known; the key is now pending and the caller should fetch.
    Miss,
}

#[derive(Debug, Default)]
pub struct StatsCache {
    entries: HashMap<StatsKey, CacheEntry>,
}

impl StatsCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lookup(&mut self, key: &StatsKey) -> Lookup<'_> {
        match self.entries.entry(key.clone()) {
            Entry::Occupied(entry) => match entry.into_mut() {
                CacheEntry::Pending => Lookup::Pending,
                CacheEntry::Ready(report) => Lookup::Hit(report),
            },
            Entry::Vacant(entry) => {
                entry.insert(CacheEntry::Pending);
                Lookup::Miss
            }
        }
    }

    /// The finished report, if any. Never marks anything pending.
    pub fn get(&self, key: &StatsKey) -> Option<&PlayerStatReport> {
        match self.entries.get(key) {
            Some(CacheEntry::Ready(report)) => Some(report),
            _ => None,
        }
    }

    pub fn is_pending(&self, key: &StatsKey) -> bool {
        matches!(self.entries.get(key), Some(CacheEntry::Pending))
    }

    /// Store a result. Last write wins.
    pub fn complete(&mut self, key: StatsKey, report: PlayerStatReport) {
        self.entries.insert(key, CacheEntry::Ready(report));
    }

    /// Forget a pending key so the next lookup fetches again. Finished
    /// entries are left alone.
    pub fn fail(&mut self, key: &StatsKey) {
        if self.is_pending(key) {
            self.entries.remove(key);
        }
    }

    pub fn pending_count(&self) -> usize {
        self.entries
            .values()
            .filter(|e| matches!(e, CacheEntry::Pending))
            .count()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Season lines for one season, for trade valuation.
    pub fn season_lines(&self, season: u16) -> SeasonLines<'_> {
        SeasonLines {
            cache: self,
            season,
        }
    }
}

pub struct SeasonLines<'a> {
    cache: &'a StatsCache,
    season: u16,
}

impl StatsLookup for SeasonLines<'_> {
    fn season_line(&self, player_id: &str) -> Option<&StatLine> {
        self.cache
            .get(&StatsKey::new(player_id, self.season))
            .and_then(|r| r.season_line.as_ref())
    }
}
