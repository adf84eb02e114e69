// League metadata, team naming, standings and the weekly schedule.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::roster::Roster;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct League {
    pub league_id: String,
    pub name: String,
    pub season: String,
    pub status: String,
    pub total_rosters: u32,
}

/// A league member as reported by the host.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LeagueUser {
    pub user_id: String,
    pub display_name: Option<String>,
    pub username: Option<String>,
    /// Custom team name, if the member set one.
    pub team_name: Option<String>,
}

/// Where the NFL season currently stands.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NflState {
    pub season: String,
    pub season_type: String,
    pub week: u32,
    pub display_week: u32,
}

impl NflState {
    /// The reported season, but only while its games are being played.
    /// Off-season and preseason states already name the upcoming year,
    /// which has no stats yet.
    pub fn active_season(&self) -> Option<u16> {
        match self.season_type.trim().to_lowercase().as_str() {
            "regular" | "post" => self.season.trim().parse().ok(),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Team naming
// ---------------------------------------------------------------------------

/// A roster joined with its owner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamInfo {
    pub roster_id: u32,
    pub owner_id: Option<String>,
    pub display_name: Option<String>,
    pub username: Option<String>,
    pub team_name: Option<String>,
}

impl TeamInfo {
    /// Owner name as shown in trade suggestions.
    pub fn owner_name(&self) -> String {
        if self.owner_id.is_none() {
            return format!("Team {}", self.roster_id);
        }
        self.display_name
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or("Unknown")
            .to_string()
    }

    /// Team label: custom team name, else "<owner>'s Team", else
    /// "Team <roster id>" for an ownerless roster.
    pub fn label(&self) -> String {
        if let Some(name) = self.team_name.as_deref().filter(|n| !n.trim().is_empty()) {
            return name.to_string();
        }
        if self.owner_id.is_none() {
            return format!("Team {}", self.roster_id);
        }
        let owner = self.display_name.as_deref().unwrap_or("Unknown");
        format!("{owner}'s Team")
    }

    /// Shorter name for schedule opponents: team name, else the owner's
    /// display name, else "Team <roster id>".
    pub fn short_name(&self) -> String {
        [self.team_name.as_deref(), self.display_name.as_deref()]
            .into_iter()
            .flatten()
            .find(|n| !n.trim().is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("Team {}", self.roster_id))
    }
}

/// Roster id -> team, built from the league's users and rosters.
#[derive(Debug, Clone, Default)]
pub struct TeamDirectory {
    teams: BTreeMap<u32, TeamInfo>,
}

impl TeamDirectory {
    pub fn build(users: &[LeagueUser], rosters: &[Roster]) -> Self {
        let teams = rosters
            .iter()
            .map(|roster| {
                let owner = roster
                    .owner_id
                    .as_deref()
                    .and_then(|owner| users.iter().find(|u| u.user_id == owner));
                let info = TeamInfo {
                    roster_id: roster.roster_id,
                    owner_id: owner.map(|u| u.user_id.clone()),
                    display_name: owner.and_then(|u| u.display_name.clone()),
                    username: owner.and_then(|u| u.username.clone()),
                    team_name: owner.and_then(|u| u.team_name.clone()),
                };
                (roster.roster_id, info)
            })
            .collect();
        Self { teams }
    }

    pub fn get(&self, roster_id: u32) -> Option<&TeamInfo> {
        self.teams.get(&roster_id)
    }

    pub fn label(&self, roster_id: u32) -> String {
        self.get(roster_id)
            .map(TeamInfo::label)
            .unwrap_or_else(|| format!("Team {roster_id}"))
    }

    pub fn short_name(&self, roster_id: u32) -> String {
        self.get(roster_id)
            .map(TeamInfo::short_name)
            .unwrap_or_else(|| format!("Team {roster_id}"))
    }

    /// Teams in roster id order.
    pub fn teams(&self) -> impl Iterator<Item = &TeamInfo> {
        self.teams.values()
    }

    pub fn len(&self) -> usize {
        self.teams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Standings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandingRow {
    pub roster_id: u32,
    pub team: String,
    pub wins: u32,
    pub losses: u32,
    pub ties: u32,
    pub points_for: f64,
    pub points_against: f64,
}

/// Rosters ordered by wins, then points for, both descending.
pub fn standings(rosters: &[Roster], teams: &TeamDirectory) -> Vec<StandingRow> {
    let mut rows: Vec<StandingRow> = rosters
        .iter()
        .map(|r| StandingRow {
            roster_id: r.roster_id,
            team: teams.label(r.roster_id),
            wins: r.record.wins,
            losses: r.record.losses,
            ties: r.record.ties,
            points_for: r.record.points_for,
            points_against: r.record.points_against,
        })
        .collect();
    rows.sort_by(|a, b| {
        b.wins
            .cmp(&a.wins)
            .then_with(|| b.points_for.total_cmp(&a.points_for))
    });
    rows
}

// ---------------------------------------------------------------------------
// Schedule
// ---------------------------------------------------------------------------

/// One roster's entry in a week's matchups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchupEntry {
    pub roster_id: u32,
    pub matchup_id: Option<u32>,
    pub points: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Win,
    Loss,
    Tie,
}

impl Outcome {
    pub fn letter(&self) -> &'static str {
        match self {
            Outcome::Win => "W",
            Outcome::Loss => "L",
            Outcome::Tie => "T",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Opponent {
    /// My roster has no entry this week.
    Bye,
    /// Entry exists but no paired roster yet.
    Tbd,
    Team { roster_id: u32, label: String },
}

impl Opponent {
    pub fn label(&self) -> &str {
        match self {
            Opponent::Bye => "BYE",
            Opponent::Tbd => "TBD",
            Opponent::Team { label, .. } => label,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRow {
    pub week: u32,
    pub opponent: Opponent,
    pub my_points: Option<f64>,
    pub opponent_points: Option<f64>,
    pub outcome: Option<Outcome>,
}

/// Weeks to show: at least `min_weeks`, more once the season runs past it.
pub fn schedule_weeks(current_week: u32, min_weeks: u32) -> std::ops::RangeInclusive<u32> {
    1..=current_week.max(min_weeks)
}

/// Build one schedule row from a week's matchup entries.
pub fn schedule_row(
    week: u32,
    my_roster_id: u32,
    entries: &[MatchupEntry],
    teams: &TeamDirectory,
) -> ScheduleRow {
    let Some(mine) = entries.iter().find(|e| e.roster_id == my_roster_id) else {
        return ScheduleRow {
            week,
            opponent: Opponent::Bye,
            my_points: None,
            opponent_points: None,
            outcome: None,
        };
    };

    let theirs = mine.matchup_id.and_then(|matchup| {
        entries
            .iter()
            .find(|e| e.roster_id != my_roster_id && e.matchup_id == Some(matchup))
    });

    let opponent = match theirs {
        Some(e) => Opponent::Team {
            roster_id: e.roster_id,
            label: teams.short_name(e.roster_id),
        },
        None => Opponent::Tbd,
    };
    let opponent_points = theirs.and_then(|e| e.points);
    let outcome = match (mine.points, opponent_points) {
        (Some(a), Some(b)) if a > b => Some(Outcome::Win),
        (Some(a), Some(b)) if a < b => Some(Outcome::Loss),
        (Some(_), Some(_)) => Some(Outcome::Tie),
        _ => None,
    };

    ScheduleRow {
        week,
        opponent,
        my_points: mine.points,
        opponent_points,
        outcome,
    }
}

/// Build the full schedule for `my_roster_id` from per-week entries.
/// Weeks with no fetched data come out as byes.
pub fn schedule(
    weeks: &BTreeMap<u32, Vec<MatchupEntry>>,
    my_roster_id: u32,
    teams: &TeamDirectory,
) -> Vec<ScheduleRow> {
    weeks
        .iter()
        .map(|(week, entries)| schedule_row(*week, my_roster_id, entries, teams))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::RosterRecord;

    fn user(id: &str, display: &str, team_name: Option<&str>) -> LeagueUser {
        LeagueUser {
            user_id: id.into(),
            display_name: Some(display.into()),
            username: Some(display.to_lowercase()),
            team_name: team_name.map(str::to_string),
        }
    }

    fn roster(id: u32, owner: Option<&str>, wins: u32, pf: f64) -> Roster {
        Roster {
            roster_id: id,
            owner_id: owner.map(str::to_string),
            record: RosterRecord {
                wins,
                points_for: pf,
                ..RosterRecord::default()
            },
            ..Roster::default()
        }
    }

    fn league() -> (Vec<LeagueUser>, Vec<Roster>, TeamDirectory) {
        let users = vec![
            user("u1", "Sam", Some("Gridiron Gang")),
            user("u2", "Alex", None),
        ];
        let rosters = vec![
            roster(1, Some("u1"), 5, 1200.5),
            roster(2, Some("u2"), 7, 1100.0),
            roster(3, None, 5, 1300.0),
        ];
        let teams = TeamDirectory::build(&users, &rosters);
        (users, rosters, teams)
    }

    fn entry(roster_id: u32, matchup_id: Option<u32>, points: Option<f64>) -> MatchupEntry {
        MatchupEntry {
            roster_id,
            matchup_id,
            points,
        }
    }

    #[test]
    fn team_labels_follow_fallbacks() {
        let (_, _, teams) = league();
        assert_eq!(teams.label(1), "Gridiron Gang");
        assert_eq!(teams.label(2), "Alex's Team");
        assert_eq!(teams.label(3), "Team 3");
        assert_eq!(teams.label(99), "Team 99");
    }

    #[test]
    fn opponent_names_skip_the_team_suffix() {
        let (_, _, teams) = league();
        assert_eq!(teams.short_name(1), "Gridiron Gang");
        assert_eq!(teams.short_name(2), "Alex");
        assert_eq!(teams.short_name(3), "Team 3");
        assert_eq!(teams.short_name(99), "Team 99");

        let entries = [entry(1, Some(2), None), entry(2, Some(2), None)];
        let row = schedule_row(5, 1, &entries, &teams);
        assert_eq!(row.opponent.label(), "Alex");
    }

    #[test]
    fn nfl_state_season_only_counts_in_season() {
        let mut state = NflState {
            season: "2025".into(),
            season_type: "regular".into(),
            week: 3,
            display_week: 3,
        };
        assert_eq!(state.active_season(), Some(2025));
        state.season_type = "post".into();
        assert_eq!(state.active_season(), Some(2025));
        state.season_type = "off".into();
        assert_eq!(state.active_season(), None);
        state.season_type = "pre".into();
        assert_eq!(state.active_season(), None);
    }

    #[test]
    fn owner_names_for_suggestions() {
        let (_, _, teams) = league();
        assert_eq!(teams.get(1).unwrap().owner_name(), "Sam");
        assert_eq!(teams.get(3).unwrap().owner_name(), "Team 3");

        let nameless = TeamInfo {
            roster_id: 4,
            owner_id: Some("u9".into()),
            display_name: None,
            username: None,
            team_name: None,
        };
        assert_eq!(nameless.owner_name(), "Unknown");
    }

    #[test]
    fn standings_sort_by_wins_then_points() {
        let (_, rosters, teams) = league();
        let order: Vec<u32> = standings(&rosters, &teams).iter().map(|r| r.roster_id).collect();
        assert_eq!(order, vec![2, 3, 1]);
    }

    #[test]
    fn schedule_weeks_extend_past_minimum() {
        assert_eq!(schedule_weeks(3, 18), 1..=18);
        assert_eq!(schedule_weeks(19, 18), 1..=19);
    }

    #[test]
    fn missing_entry_is_a_bye() {
        let (_, _, teams) = league();
        let row = schedule_row(4, 1, &[entry(2, Some(1), None)], &teams);
        assert_eq!(row.opponent, Opponent::Bye);
        assert_eq!(row.opponent.label(), "BYE");
        assert_eq!(row.outcome, None);
    }

    #[test]
    fn unpaired_entry_is_tbd() {
        let (_, _, teams) = league();
        let row = schedule_row(
            1,
            1,
            &[entry(1, Some(1), Some(90.0)), entry(2, Some(2), Some(80.0))],
            &teams,
        );
        assert_eq!(row.opponent, Opponent::Tbd);
        assert_eq!(row.my_points, Some(90.0));
        assert_eq!(row.outcome, None);

        let no_matchup = schedule_row(
            1,
            1,
            &[entry(1, None, None), entry(2, None, None)],
            &teams,
        );
        assert_eq!(no_matchup.opponent, Opponent::Tbd);
    }

    #[test]
    fn outcome_needs_both_scores() {
        let (_, _, teams) = league();
        let win = schedule_row(
            1,
            1,
            &[entry(1, Some(3), Some(101.2)), entry(2, Some(3), Some(99.0))],
            &teams,
        );
        assert_eq!(win.opponent.label(), "Alex");
        assert_eq!(win.outcome, Some(Outcome::Win));

        let tie = schedule_row(
            2,
            1,
            &[entry(1, Some(3), Some(80.0)), entry(3, Some(3), Some(80.0))],
            &teams,
        );
        assert_eq!(tie.outcome, Some(Outcome::Tie));

        let pending = schedule_row(
            3,
            1,
            &[entry(1, Some(3), Some(80.0)), entry(3, Some(3), None)],
            &teams,
        );
        assert_eq!(pending.outcome, None);
    }

    #[test]
    fn schedule_walks_every_week() {
        let (_, _, teams) = league();
        let mut weeks = BTreeMap::new();
        weeks.insert(1, vec![entry(1, Some(1), Some(70.0)), entry(2, Some(1), Some(75.0))]);
        weeks.insert(2, vec![]);
        let rows = schedule(&weeks, 1, &teams);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].outcome, Some(Outcome::Loss));
        assert_eq!(rows[1].opponent, Opponent::Bye);
    }
}
