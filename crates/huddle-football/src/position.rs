// NFL positions as reported by the Sleeper player directory.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Fantasy-relevant NFL positions. Anything the directory reports that is
/// not listed here (OL, LS, missing) lands in `Unknown`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Position {
    QB,
    RB,
    WR,
    TE,
    K,
    DEF,
    DL,
    LB,
    DB,
    #[default]
    #[serde(rename = "UNKNOWN")]
    Unknown,
}

impl Position {
    /// Positions with a roster target, in display order.
    pub const TRACKED: [Position; 4] = [Position::QB, Position::RB, Position::WR, Position::TE];

    /// Parse a position code. Case-insensitive; unrecognized codes map to
    /// `Unknown`.
    pub fn from_code(code: &str) -> Self {
        match code.trim().to_uppercase().as_str() {
            "QB" => Position::QB,
            "RB" => Position::RB,
            "WR" => Position::WR,
            "TE" => Position::TE,
            "K" => Position::K,
            "DEF" | "DST" => Position::DEF,
            "DL" | "DE" | "DT" => Position::DL,
            "LB" | "ILB" | "OLB" => Position::LB,
            "DB" | "CB" | "S" | "SS" | "FS" => Position::DB,
            _ => Position::Unknown,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Position::QB => "QB",
            Position::RB => "RB",
            Position::WR => "WR",
            Position::TE => "TE",
            Position::K => "K",
            Position::DEF => "DEF",
            Position::DL => "DL",
            Position::LB => "LB",
            Position::DB => "DB",
            Position::Unknown => "UNKNOWN",
        }
    }

    /// Roster target count for tracked positions, `None` otherwise.
    pub fn target(&self) -> Option<usize> {
        match self {
            Position::QB => Some(2),
            Position::RB => Some(4),
            Position::WR => Some(5),
            Position::TE => Some(2),
            _ => None,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
