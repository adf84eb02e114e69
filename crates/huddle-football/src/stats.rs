// Normalized per-player statistics.
//
// Upstream payloads are loose; by the time numbers reach these types every
// missing field has already become 0.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PassingStats {
    pub completions: f64,
    pub attempts: f64,
    pub yards: f64,
    pub touchdowns: f64,
    pub interceptions: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RushingStats {
    pub attempts: f64,
    pub yards: f64,
    pub touchdowns: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ReceivingStats {
    pub targets: f64,
    pub receptions: f64,
    pub yards: f64,
    pub touchdowns: f64,
}

/// One season aggregate or one game's box score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StatLine {
    pub passing: PassingStats,
    pub rushing: RushingStats,
    pub receiving: ReceivingStats,
    pub fumbles_lost: f64,
    pub fantasy_points: f64,
    pub fantasy_points_ppr: f64,
    pub games_played: f64,
}

impl StatLine {
    /// True when every field is zero, i.e. the payload carried nothing.
    pub fn is_empty(&self) -> bool {
        *self == StatLine::default()
    }

    pub fn completion_pct(&self) -> Option<f64> {
        ratio(self.passing.completions, self.passing.attempts).map(|r| r * 100.0)
    }

    pub fn catch_rate(&self) -> Option<f64> {
        ratio(self.receiving.receptions, self.receiving.targets)
    }

    pub fn yards_per_carry(&self) -> Option<f64> {
        ratio(self.rushing.yards, self.rushing.attempts)
    }
}

fn ratio(num: f64, den: f64) -> Option<f64> {
    (den > 0.0).then(|| num / den)
}

/// One row of a player's game log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameLog {
    pub week: u32,
    pub opponent: Option<String>,
    pub home_or_away: Option<String>,
    pub is_game_over: bool,
    pub line: StatLine,
}

/// The stats-provider player a directory entry was matched to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchedPlayer {
    pub stats_player_id: i64,
    pub name: String,
    pub team: Option<String>,
    pub position: Option<String>,
}

/// Everything the stat sheet shows for one player and season.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerStatReport {
    pub season: u16,
    pub matched: Option<MatchedPlayer>,
    pub season_line: Option<StatLine>,
    pub game_logs: Vec<GameLog>,
}
