// Per-player trade value.
//
// value = max(0, rank component + stats component)
//
// The rank component is (1000 - rank) * 0.6 for ranked players. The stats
// component is a position-specific fantasy-point approximation of the
// season line, scaled by 0.4. Missing players and missing stats both
// degrade to 0 for their part; the computation never fails.

use crate::player::{PlayerInfo, UNRANKED};
use crate::position::Position;
use crate::stats::StatLine;

pub const RANK_WEIGHT: f64 = 0.6;
pub const STATS_WEIGHT: f64 = 0.4;

/// Rank component. Zero for unranked (or nonsensical) ranks.
pub fn rank_value(rank: f64) -> f64 {
    if rank > 0.0 && rank < UNRANKED {
        (1000.0 - rank) * RANK_WEIGHT
    } else {
        0.0
    }
}

/// Stats component, already scaled by `STATS_WEIGHT`.
pub fn stats_value(position: Position, line: &StatLine) -> f64 {
    let pass = &line.passing;
    let rush = &line.rushing;
    let rec = &line.receiving;

    let raw = match position {
        Position::QB => {
            let completion_bonus = if pass.attempts > 0.0 {
                2.0 * (pass.completions / pass.attempts)
            } else {
                0.0
            };
            0.04 * pass.yards + 0.1 * rush.yards + 4.0 * (pass.touchdowns + rush.touchdowns)
                - 2.0 * pass.interceptions
                + completion_bonus
        }
        Position::RB => {
            0.1 * rush.yards + 0.1 * rec.yards + rec.receptions
                + 6.0 * (rush.touchdowns + rec.touchdowns)
                - 2.0 * line.fumbles_lost
        }
        Position::WR | Position::TE => {
            let catch_bonus = if rec.targets > 0.0 {
                3.0 * (rec.receptions / rec.targets)
            } else {
                0.0
            };
            rec.receptions + 0.1 * rec.yards + 6.0 * rec.touchdowns - 2.0 * line.fumbles_lost
                + catch_bonus
        }
        _ => {
            0.05 * (rush.yards + pass.yards) + 5.0 * (rush.touchdowns + pass.touchdowns)
        }
    };
    raw * STATS_WEIGHT
}

/// Total value for one player. `player` is `None` for ids missing from the
/// directory; `stats` is `None` when no season line was found.
pub fn player_value(player: Option<&PlayerInfo>, stats: Option<&StatLine>) -> f64 {
    let rank = player.map(PlayerInfo::rank).unwrap_or(UNRANKED);
    let position = player.map(|p| p.position).unwrap_or_default();

    let mut value = rank_value(rank);
    if let Some(line) = stats.filter(|l| !l.is_empty()) {
        value += stats_value(position, line);
    }
    value.max(0.0)
}
