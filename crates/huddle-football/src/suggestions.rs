// League-wide trade suggestions: pair every team short at a position with
// every team holding a surplus there.

use serde::{Deserialize, Serialize};

use crate::league::TeamDirectory;
use crate::needs::{estimate_needs, NeedProfile};
use crate::player::PlayerDirectory;
use crate::position::Position;
use crate::roster::Roster;

pub const MAX_SUGGESTIONS: usize = 25;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeSuggestion {
    /// Owner with the surplus.
    pub from_team: String,
    /// Owner with the deficit.
    pub to_team: String,
    pub position: Position,
    pub note: String,
}

impl TradeSuggestion {
    fn new(from: &str, to: &str, position: Position) -> Self {
        Self {
            from_team: from.to_string(),
            to_team: to.to_string(),
            position,
            note: format!("{to} needs {position}; {from} has surplus {position}."),
        }
    }
}

/// Pairwise suggestions in roster order, at most `MAX_SUGGESTIONS`.
///
/// For each pair (a, b) with a before b, positions a lacks and b has spare
/// come first, then the reverse direction.
pub fn suggest_trades(
    rosters: &[Roster],
    teams: &TeamDirectory,
    directory: &PlayerDirectory,
) -> Vec<TradeSuggestion> {
    let profiled: Vec<(String, NeedProfile)> = rosters
        .iter()
        .map(|roster| {
            let name = teams
                .get(roster.roster_id)
                .map(|t| t.owner_name())
                .unwrap_or_else(|| format!("Team {}", roster.roster_id));
            let needs = estimate_needs(roster.players.iter().map(String::as_str), directory);
            (name, needs.profile)
        })
        .collect();

    let mut out = Vec::new();
    for (i, (a_name, a)) in profiled.iter().enumerate() {
        for (b_name, b) in &profiled[i + 1..] {
            for position in a.deficit.iter().filter(|p| b.surplus.contains(p)) {
                out.push(TradeSuggestion::new(b_name, a_name, *position));
            }
            for position in b.deficit.iter().filter(|p| a.surplus.contains(p)) {
                out.push(TradeSuggestion::new(a_name, b_name, *position));
            }
            if out.len() >= MAX_SUGGESTIONS {
                out.truncate(MAX_SUGGESTIONS);
                return out;
            }
        }
    }
    out
}
