// Team rosters and their record.

use serde::{Deserialize, Serialize};

/// Win/loss record and points, as kept by the league host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RosterRecord {
    pub wins: u32,
    pub losses: u32,
    pub ties: u32,
    pub points_for: f64,
    pub points_against: f64,
}

/// One team's players. `starters`, `reserve` and `taxi` are independent
/// tags over ids; the feed does not guarantee they are disjoint or that
/// they are subsets of `players`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Roster {
    pub roster_id: u32,
    pub owner_id: Option<String>,
    pub players: Vec<String>,
    pub starters: Vec<String>,
    pub reserve: Vec<String>,
    pub taxi: Vec<String>,
    pub record: RosterRecord,
}

/// Tags for one player on a roster.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SlotTags {
    pub starter: bool,
    pub reserve: bool,
    pub taxi: bool,
}

impl SlotTags {
    pub fn is_bench(&self) -> bool {
        !(self.starter || self.reserve || self.taxi)
    }
}

impl Roster {
    pub fn tags(&self, player_id: &str) -> SlotTags {
        let has = |list: &[String]| list.iter().any(|id| id == player_id);
        SlotTags {
            starter: has(&self.starters),
            reserve: has(&self.reserve),
            taxi: has(&self.taxi),
        }
    }

    pub fn contains(&self, player_id: &str) -> bool {
        self.players.iter().any(|id| id == player_id)
    }

    /// Players that are on the roster but carry no starter, reserve or
    /// taxi tag.
    pub fn bench(&self) -> Vec<&str> {
        self.players
            .iter()
            .filter(|id| self.tags(id).is_bench())
            .map(String::as_str)
            .collect()
    }

    /// Starters in lineup order. Empty lineup slots ("0") are skipped.
    pub fn active_starters(&self) -> Vec<&str> {
        self.starters
            .iter()
            .map(String::as_str)
            .filter(|id| !id.is_empty() && *id != "0")
            .collect()
    }
}
