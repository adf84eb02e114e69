// Upstream payload shapes and their normalization into domain types.
//
// Every upstream field is optional here. Numbers that arrive as strings (or
// strings that arrive as numbers) are tolerated; anything unreadable turns
// into `None` and then into the domain default during normalization.

use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use huddle_football::league::{League, LeagueUser, MatchupEntry, NflState};
use huddle_football::player::{PlayerDirectory, PlayerInfo};
use huddle_football::position::Position;
use huddle_football::roster::{Roster, RosterRecord};
use huddle_football::stats::{
    GameLog, MatchedPlayer, PassingStats, ReceivingStats, RushingStats, StatLine,
};

// ---------------------------------------------------------------------------
// Lenient scalar readers
// ---------------------------------------------------------------------------

fn value_u32(v: &Value) -> Option<u32> {
    match v {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0 && f.fract() == 0.0).map(|f| f as u64))
            .and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn value_f64(v: &Value) -> Option<f64> {
    match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn value_string(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn lenient_u32<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u32>, D::Error> {
    Ok(Option::<Value>::deserialize(d)?.as_ref().and_then(value_u32))
}

fn lenient_f64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
    Ok(Option::<Value>::deserialize(d)?.as_ref().and_then(value_f64))
}

fn lenient_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(Option::<Value>::deserialize(d)?.as_ref().and_then(value_string))
}

/// A list of ids where the list itself or any entry may be null.
fn lenient_ids<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
    let items = Option::<Vec<Value>>::deserialize(d)?.unwrap_or_default();
    Ok(items.iter().filter_map(value_string).collect())
}

fn non_empty(s: Option<String>) -> Option<String> {
    s.filter(|s| !s.trim().is_empty())
}

// ---------------------------------------------------------------------------
// Sleeper
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SleeperLeague {
    #[serde(default, deserialize_with = "lenient_string")]
    pub league_id: Option<String>,
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub season: Option<String>,
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub total_rosters: Option<u32>,
}

impl SleeperLeague {
    pub fn normalize(self, requested_id: &str) -> League {
        League {
            league_id: self.league_id.unwrap_or_else(|| requested_id.to_string()),
            name: self.name.unwrap_or_default(),
            season: self.season.unwrap_or_default(),
            status: self.status.unwrap_or_default(),
            total_rosters: self.total_rosters.unwrap_or(0),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SleeperUserMetadata {
    pub team_name: Option<String>,
    pub team_name_update: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SleeperUser {
    #[serde(default, deserialize_with = "lenient_string")]
    pub user_id: Option<String>,
    pub display_name: Option<String>,
    pub username: Option<String>,
    pub metadata: Option<SleeperUserMetadata>,
}

impl SleeperUser {
    /// Users without an id cannot own a roster and are dropped.
    pub fn normalize(self) -> Option<LeagueUser> {
        let user_id = non_empty(self.user_id)?;
        let metadata = self.metadata.unwrap_or_default();
        Some(LeagueUser {
            user_id,
            display_name: non_empty(self.display_name),
            username: non_empty(self.username),
            team_name: non_empty(metadata.team_name).or(non_empty(metadata.team_name_update)),
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SleeperRosterSettings {
    #[serde(default, deserialize_with = "lenient_u32")]
    pub wins: Option<u32>,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub losses: Option<u32>,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub ties: Option<u32>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub fpts: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub fpts_decimal: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub fpts_against: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub fpts_against_decimal: Option<f64>,
}

/// Sleeper splits points into a whole part and hundredths.
fn points(whole: Option<f64>, hundredths: Option<f64>) -> f64 {
    whole.unwrap_or(0.0) + hundredths.unwrap_or(0.0) / 100.0
}

impl From<SleeperRosterSettings> for RosterRecord {
    fn from(s: SleeperRosterSettings) -> Self {
        RosterRecord {
            wins: s.wins.unwrap_or(0),
            losses: s.losses.unwrap_or(0),
            ties: s.ties.unwrap_or(0),
            points_for: points(s.fpts, s.fpts_decimal),
            points_against: points(s.fpts_against, s.fpts_against_decimal),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SleeperRoster {
    #[serde(default, deserialize_with = "lenient_u32")]
    pub roster_id: Option<u32>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub owner_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_ids")]
    pub players: Vec<String>,
    #[serde(default, deserialize_with = "lenient_ids")]
    pub starters: Vec<String>,
    #[serde(default, deserialize_with = "lenient_ids")]
    pub reserve: Vec<String>,
    #[serde(default, deserialize_with = "lenient_ids")]
    pub taxi: Vec<String>,
    pub settings: Option<SleeperRosterSettings>,
}

impl SleeperRoster {
    /// Rosters without an id are dropped.
    pub fn normalize(self) -> Option<Roster> {
        Some(Roster {
            roster_id: self.roster_id?,
            owner_id: non_empty(self.owner_id),
            players: self.players,
            starters: self.starters,
            reserve: self.reserve,
            taxi: self.taxi,
            record: self.settings.unwrap_or_default().into(),
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SleeperMatchup {
    #[serde(default, deserialize_with = "lenient_u32")]
    pub roster_id: Option<u32>,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub matchup_id: Option<u32>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub points: Option<f64>,
}

impl SleeperMatchup {
    pub fn normalize(self) -> Option<MatchupEntry> {
        Some(MatchupEntry {
            roster_id: self.roster_id?,
            matchup_id: self.matchup_id,
            points: self.points,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SleeperNflState {
    #[serde(default, deserialize_with = "lenient_string")]
    pub season: Option<String>,
    pub season_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub week: Option<u32>,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub display_week: Option<u32>,
}

impl From<SleeperNflState> for NflState {
    fn from(s: SleeperNflState) -> Self {
        let week = s.week.unwrap_or(0);
        NflState {
            season: s.season.unwrap_or_default(),
            season_type: s.season_type.unwrap_or_default(),
            week,
            display_week: s.display_week.unwrap_or(week),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SleeperPlayer {
    #[serde(default, deserialize_with = "lenient_string")]
    pub player_id: Option<String>,
    pub full_name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub position: Option<String>,
    pub team: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub rank_ecr: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub depth_chart_order: Option<f64>,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub number: Option<u32>,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub age: Option<u32>,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub years_exp: Option<u32>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub height: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub weight: Option<String>,
    pub college: Option<String>,
    pub status: Option<String>,
    pub injury_status: Option<String>,
}

impl SleeperPlayer {
    /// `key` is the directory key, used when the record has no id of its own.
    pub fn normalize(self, key: &str) -> PlayerInfo {
        PlayerInfo {
            player_id: non_empty(self.player_id).unwrap_or_else(|| key.to_string()),
            full_name: non_empty(self.full_name),
            first_name: non_empty(self.first_name),
            last_name: non_empty(self.last_name),
            position: self
                .position
                .as_deref()
                .map(Position::from_code)
                .unwrap_or_default(),
            position_code: non_empty(self.position.map(|c| c.trim().to_uppercase())),
            team: non_empty(self.team),
            rank_ecr: self.rank_ecr,
            depth_chart_order: self.depth_chart_order,
            number: self.number,
            age: self.age,
            years_exp: self.years_exp,
            height: non_empty(self.height),
            weight: non_empty(self.weight),
            college: non_empty(self.college),
            status: non_empty(self.status),
            injury_status: non_empty(self.injury_status),
        }
    }
}

/// Build the directory from Sleeper's id -> player map. Entries that are
/// not objects are skipped.
pub fn player_directory(raw: HashMap<String, Value>) -> PlayerDirectory {
    raw.into_iter()
        .filter_map(|(key, value)| {
            serde_json::from_value::<SleeperPlayer>(value)
                .ok()
                .map(|p| p.normalize(&key))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// SportsData
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SdPlayer {
    #[serde(rename = "PlayerID")]
    pub player_id: Option<i64>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub team: Option<String>,
    pub position: Option<String>,
}

impl SdPlayer {
    pub fn full_name(&self) -> String {
        format!(
            "{} {}",
            self.first_name.as_deref().unwrap_or(""),
            self.last_name.as_deref().unwrap_or("")
        )
    }

    pub fn to_matched(&self) -> Option<MatchedPlayer> {
        Some(MatchedPlayer {
            stats_player_id: self.player_id?,
            name: self.full_name().trim().to_string(),
            team: non_empty(self.team.clone()),
            position: non_empty(self.position.clone()),
        })
    }
}

/// A season aggregate or single-game row. Both endpoints share the field
/// names; the game fields are absent on season rows.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SdStatRow {
    pub passing_completions: Option<f64>,
    pub passing_attempts: Option<f64>,
    pub passing_yards: Option<f64>,
    pub passing_touchdowns: Option<f64>,
    pub passing_interceptions: Option<f64>,
    pub rushing_attempts: Option<f64>,
    pub rushing_yards: Option<f64>,
    pub rushing_touchdowns: Option<f64>,
    pub receiving_targets: Option<f64>,
    pub receptions: Option<f64>,
    pub receiving_yards: Option<f64>,
    pub receiving_touchdowns: Option<f64>,
    pub fumbles_lost: Option<f64>,
    pub fantasy_points: Option<f64>,
    #[serde(rename = "FantasyPointsPPR")]
    pub fantasy_points_ppr: Option<f64>,
    pub played: Option<f64>,
    pub week: Option<u32>,
    pub opponent: Option<String>,
    pub home_or_away: Option<String>,
    pub is_game_over: Option<bool>,
}

impl SdStatRow {
    pub fn line(&self) -> StatLine {
        let n = |v: Option<f64>| v.unwrap_or(0.0);
        StatLine {
            passing: PassingStats {
                completions: n(self.passing_completions),
                attempts: n(self.passing_attempts),
                yards: n(self.passing_yards),
                touchdowns: n(self.passing_touchdowns),
                interceptions: n(self.passing_interceptions),
            },
            rushing: RushingStats {
                attempts: n(self.rushing_attempts),
                yards: n(self.rushing_yards),
                touchdowns: n(self.rushing_touchdowns),
            },
            receiving: ReceivingStats {
                targets: n(self.receiving_targets),
                receptions: n(self.receptions),
                yards: n(self.receiving_yards),
                touchdowns: n(self.receiving_touchdowns),
            },
            fumbles_lost: n(self.fumbles_lost),
            fantasy_points: n(self.fantasy_points),
            fantasy_points_ppr: n(self.fantasy_points_ppr),
            games_played: n(self.played),
        }
    }

    pub fn game_log(self) -> GameLog {
        let line = self.line();
        GameLog {
            week: self.week.unwrap_or(0),
            opponent: non_empty(self.opponent),
            home_or_away: non_empty(self.home_or_away),
            is_game_over: self.is_game_over.unwrap_or(false),
            line,
        }
    }
}

/// The season endpoint answers with an object, an array of one, or nothing.
pub fn season_line(value: Value) -> Result<Option<StatLine>, serde_json::Error> {
    let row = match value {
        Value::Null => return Ok(None),
        Value::Array(mut rows) => {
            if rows.is_empty() {
                return Ok(None);
            }
            rows.swap_remove(0)
        }
        other => other,
    };
    let row: SdStatRow = serde_json::from_value(row)?;
    Ok(Some(row.line()))
}

/// Game rows sorted by week. A null body means no games.
pub fn game_logs(value: Value) -> Result<Vec<GameLog>, serde_json::Error> {
    if value.is_null() {
        return Ok(Vec::new());
    }
    let rows: Vec<SdStatRow> = serde_json::from_value(value)?;
    let mut logs: Vec<GameLog> = rows.into_iter().map(SdStatRow::game_log).collect();
    logs.sort_by_key(|g| g.week);
    Ok(logs)
}

// ---------------------------------------------------------------------------
// Proxy envelopes
// ---------------------------------------------------------------------------

/// Body of `/api/player/stats/:id`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsEnvelope {
    #[serde(default)]
    pub sleeper_player: Option<PlayerInfo>,
    #[serde(default)]
    pub matched: Option<MatchedPlayer>,
    #[serde(default)]
    pub season_stats: Option<StatLine>,
    pub season: u16,
}

/// Body of `/api/player/gamelogs/:id`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameLogsEnvelope {
    #[serde(default)]
    pub game_logs: Vec<GameLog>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn roster_points_combine_decimal_part() {
        let raw: SleeperRoster = serde_json::from_value(json!({
            "roster_id": 3,
            "owner_id": "u1",
            "players": ["4046", null, "6794"],
            "starters": ["4046", "0"],
            "reserve": null,
            "settings": { "wins": 7, "losses": "3", "fpts": 1234, "fpts_decimal": 56,
                          "fpts_against": 1100, "fpts_against_decimal": 7 }
        }))
        .unwrap();
        let roster = raw.normalize().unwrap();
        assert_eq!(roster.roster_id, 3);
        assert_eq!(roster.players, vec!["4046", "6794"]);
        assert!(roster.reserve.is_empty());
        assert_eq!(roster.record.wins, 7);
        assert_eq!(roster.record.losses, 3);
        assert_eq!(roster.record.ties, 0);
        assert!((roster.record.points_for - 1234.56).abs() < 1e-9);
        assert!((roster.record.points_against - 1100.07).abs() < 1e-9);
    }

    #[test]
    fn roster_without_id_or_settings() {
        let raw: SleeperRoster = serde_json::from_value(json!({ "owner_id": null })).unwrap();
        assert!(raw.normalize().is_none());

        let raw: SleeperRoster = serde_json::from_value(json!({ "roster_id": 1 })).unwrap();
        let roster = raw.normalize().unwrap();
        assert_eq!(roster.owner_id, None);
        assert_eq!(roster.record, RosterRecord::default());
    }

    #[test]
    fn user_team_name_falls_back_to_update_field() {
        let raw: SleeperUser = serde_json::from_value(json!({
            "user_id": "u1",
            "display_name": "Sam",
            "metadata": { "team_name": "", "team_name_update": "Sam's Squad" }
        }))
        .unwrap();
        let user = raw.normalize().unwrap();
        assert_eq!(user.team_name.as_deref(), Some("Sam's Squad"));
        assert_eq!(user.username, None);

        let anonymous: SleeperUser = serde_json::from_value(json!({ "display_name": "x" })).unwrap();
        assert!(anonymous.normalize().is_none());
    }

    #[test]
    fn player_directory_normalizes_loose_fields() {
        let mut raw = HashMap::new();
        raw.insert(
            "4046".to_string(),
            json!({
                "player_id": "4046",
                "first_name": "Patrick",
                "last_name": "Mahomes",
                "full_name": "Patrick Mahomes",
                "position": "QB",
                "team": "KC",
                "number": "15",
                "age": 29,
                "weight": 225,
                "depth_chart_order": 1,
                "rank_ecr": null
            }),
        );
        raw.insert("DEN".to_string(), json!({ "position": "DEF", "team": "DEN" }));
        raw.insert("junk".to_string(), json!("not a player"));

        let dir = player_directory(raw);
        assert_eq!(dir.len(), 2);
        let pm = dir.get("4046").unwrap();
        assert_eq!(pm.number, Some(15));
        assert_eq!(pm.weight.as_deref(), Some("225"));
        assert_eq!(pm.rank(), 1.0);
        assert_eq!(dir.get("DEN").unwrap().position, Position::DEF);
        assert_eq!(dir.get("DEN").unwrap().player_id, "DEN");
    }

    #[test]
    fn reported_position_code_is_kept() {
        let mut raw = HashMap::new();
        raw.insert("7".to_string(), json!({ "position": " de ", "team": "LAR" }));
        raw.insert("8".to_string(), json!({ "position": "OL" }));

        let dir = player_directory(raw);
        let de = dir.get("7").unwrap();
        assert_eq!(de.position, Position::DL);
        assert_eq!(de.tally_code(), "DE");
        let ol = dir.get("8").unwrap();
        assert_eq!(ol.position, Position::Unknown);
        assert_eq!(ol.tally_code(), "OL");
    }

    #[test]
    fn fractional_consensus_rank_survives_normalization() {
        let mut raw = HashMap::new();
        raw.insert("1".to_string(), json!({ "position": "RB", "rank_ecr": 12.5 }));
        raw.insert("2".to_string(), json!({ "position": "WR", "rank_ecr": "40.25" }));

        let dir = player_directory(raw);
        assert_eq!(dir.get("1").unwrap().rank(), 12.5);
        assert_eq!(dir.get("2").unwrap().rank(), 40.25);
        let value = huddle_football::value::player_value(dir.get("1"), None);
        assert!((value - 592.5).abs() < 1e-9);
    }

    #[test]
    fn matchup_entries_keep_missing_pairing() {
        let raw: Vec<SleeperMatchup> = serde_json::from_value(json!([
            { "roster_id": 1, "matchup_id": 4, "points": 101.5 },
            { "roster_id": 2, "matchup_id": null, "points": null },
            { "matchup_id": 4 }
        ]))
        .unwrap();
        let entries: Vec<_> = raw.into_iter().filter_map(SleeperMatchup::normalize).collect();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].points, Some(101.5));
        assert_eq!(entries[1].matchup_id, None);
    }

    #[test]
    fn season_line_accepts_object_array_or_null() {
        let row = json!({ "PassingYards": 4000, "PassingTouchdowns": 30.0, "FumblesLost": 2,
                          "FantasyPointsPPR": 350.2, "Played": 17 });
        let line = season_line(row.clone()).unwrap().unwrap();
        assert_eq!(line.passing.yards, 4000.0);
        assert_eq!(line.fumbles_lost, 2.0);
        assert_eq!(line.fantasy_points_ppr, 350.2);
        assert_eq!(line.games_played, 17.0);
        assert_eq!(line.rushing.yards, 0.0);

        assert_eq!(season_line(json!([row])).unwrap(), Some(line));
        assert_eq!(season_line(json!([])).unwrap(), None);
        assert_eq!(season_line(Value::Null).unwrap(), None);
    }

    #[test]
    fn game_logs_sorted_by_week() {
        let logs = game_logs(json!([
            { "Week": 3, "Opponent": "LV", "HomeOrAway": "HOME", "IsGameOver": true, "RushingYards": 88 },
            { "Week": 1, "Opponent": "BAL", "HomeOrAway": "AWAY", "IsGameOver": true },
        ]))
        .unwrap();
        assert_eq!(logs.iter().map(|g| g.week).collect::<Vec<_>>(), vec![1, 3]);
        assert_eq!(logs[1].line.rushing.yards, 88.0);
        assert_eq!(logs[0].opponent.as_deref(), Some("BAL"));
        assert!(game_logs(Value::Null).unwrap().is_empty());
    }

    #[test]
    fn stats_envelope_uses_camel_case_keys() {
        let env = StatsEnvelope {
            season: 2024,
            ..StatsEnvelope::default()
        };
        let json = serde_json::to_value(&env).unwrap();
        assert_eq!(json["season"], 2024);
        assert!(json.get("seasonStats").is_some());
        assert!(json.get("sleeperPlayer").is_some());
    }
}
