// Player attributes and the id -> player directory.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::position::Position;

/// Rank given to players with neither an expert-consensus rank nor a
/// depth-chart order.
pub const UNRANKED: f64 = 999.0;

/// Read-only snapshot of one player from the league directory.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerInfo {
    pub player_id: String,
    pub full_name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub position: Position,
    /// Position code exactly as the directory reported it, uppercased.
    #[serde(default)]
    pub position_code: Option<String>,
    pub team: Option<String>,
    /// Expert-consensus rank; an average, so often fractional.
    pub rank_ecr: Option<f64>,
    pub depth_chart_order: Option<f64>,
    pub number: Option<u32>,
    pub age: Option<u32>,
    pub years_exp: Option<u32>,
    pub height: Option<String>,
    pub weight: Option<String>,
    pub college: Option<String>,
    pub status: Option<String>,
    pub injury_status: Option<String>,
}

impl PlayerInfo {
    /// Name suitable for matching against another data source: the full
    /// name, else "first last". `None` when neither is known.
    pub fn lookup_name(&self) -> Option<String> {
        if let Some(full) = self.full_name.as_deref().filter(|n| !n.trim().is_empty()) {
            return Some(full.trim().to_string());
        }
        match (self.first_name.as_deref(), self.last_name.as_deref()) {
            (Some(first), Some(last)) if !first.is_empty() && !last.is_empty() => {
                Some(format!("{first} {last}"))
            }
            _ => None,
        }
    }

    /// Name for display, falling back to the player id.
    pub fn display_name(&self) -> String {
        self.lookup_name().unwrap_or_else(|| self.player_id.clone())
    }

    /// Code this player is tallied under: the reported code when there is
    /// one, else the parsed position.
    pub fn tally_code(&self) -> &str {
        self.position_code
            .as_deref()
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| self.position.code())
    }

    /// Expert-consensus rank, else depth-chart order, else `UNRANKED`.
    /// A zero in either field counts as absent.
    pub fn rank(&self) -> f64 {
        self.rank_ecr
            .filter(|r| *r > 0.0)
            .or(self.depth_chart_order.filter(|r| *r > 0.0))
            .unwrap_or(UNRANKED)
    }

    /// `rank()` unless the player is unranked.
    pub fn known_rank(&self) -> Option<f64> {
        Some(self.rank()).filter(|r| *r < UNRANKED)
    }

    /// Case-insensitive substring match on name, position code, or team.
    /// `needle` must already be lowercase.
    fn matches(&self, needle: &str) -> bool {
        self.display_name().to_lowercase().contains(needle)
            || self.position.code().to_lowercase().contains(needle)
            || self
                .team
                .as_deref()
                .is_some_and(|t| t.to_lowercase().contains(needle))
    }
}

/// The externally supplied id -> player mapping.
#[derive(Debug, Clone, Default)]
pub struct PlayerDirectory {
    players: HashMap<String, PlayerInfo>,
}

impl PlayerDirectory {
    pub fn new(players: HashMap<String, PlayerInfo>) -> Self {
        Self { players }
    }

    pub fn get(&self, player_id: &str) -> Option<&PlayerInfo> {
        self.players.get(player_id)
    }

    /// Position for `player_id`, `Unknown` when the id is not in the
    /// directory.
    pub fn position_of(&self, player_id: &str) -> Position {
        self.get(player_id).map(|p| p.position).unwrap_or_default()
    }

    pub fn display_name(&self, player_id: &str) -> String {
        self.get(player_id)
            .map(PlayerInfo::display_name)
            .unwrap_or_else(|| player_id.to_string())
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Search `candidates` (in order, duplicates skipped) for players whose
    /// name, position, or team contains `query`. Ids missing from the
    /// directory never match. A blank query matches nothing.
    pub fn search<'a, I>(&self, query: &str, candidates: I, limit: usize) -> Vec<&PlayerInfo>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        let mut seen = std::collections::HashSet::new();
        candidates
            .into_iter()
            .filter(|id| seen.insert(*id))
            .filter_map(|id| self.get(id))
            .filter(|p| p.matches(&needle))
            .take(limit)
            .collect()
    }

    /// Resolve `ids` and sort best rank first. Unknown ids are dropped.
    pub fn ranked<'a, I>(&self, ids: I) -> Vec<&PlayerInfo>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut players: Vec<&PlayerInfo> = ids.into_iter().filter_map(|id| self.get(id)).collect();
        players.sort_by(|a, b| {
            a.rank()
                .total_cmp(&b.rank())
                .then_with(|| a.display_name().cmp(&b.display_name()))
        });
        players
    }
}

impl FromIterator<PlayerInfo> for PlayerDirectory {
    fn from_iter<T: IntoIterator<Item = PlayerInfo>>(iter: T) -> Self {
        Self::new(
            iter.into_iter()
                .map(|p| (p.player_id.clone(), p))
                .collect(),
        )
    }
}
