// Trade proposals and their evaluation.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::needs::{estimate_needs, RosterNeeds};
use crate::player::PlayerDirectory;
use crate::position::Position;
use crate::stats::StatLine;
use crate::value::player_value;

/// Most players that may be requested in one trade.
pub const MAX_INCOMING: usize = 2;

/// Net value beyond which a trade is judged one way or the other.
pub const VERDICT_THRESHOLD: f64 = 50.0;

// ---------------------------------------------------------------------------
// Proposal
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProposalError {
    #[error("player {0} is already on the incoming side")]
    AlreadyIncoming(String),

    #[error("player {0} is already on the outgoing side")]
    AlreadyOutgoing(String),

    #[error("at most {max} incoming players per trade")]
    IncomingFull { max: usize },
}

/// Two disjoint, ordered sets of player ids. Outgoing players leave my
/// roster; incoming players join it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeProposal {
    outgoing: Vec<String>,
    incoming: Vec<String>,
}

impl TradeProposal {
    pub fn outgoing(&self) -> &[String] {
        &self.outgoing
    }

    pub fn incoming(&self) -> &[String] {
        &self.incoming
    }

    pub fn is_empty(&self) -> bool {
        self.outgoing.is_empty() && self.incoming.is_empty()
    }

    /// Add a player I would give up. Adding one twice is a no-op.
    pub fn add_outgoing(&mut self, player_id: &str) -> Result<(), ProposalError> {
        if self.incoming.iter().any(|id| id == player_id) {
            return Err(ProposalError::AlreadyIncoming(player_id.to_string()));
        }
        if !self.outgoing.iter().any(|id| id == player_id) {
            self.outgoing.push(player_id.to_string());
        }
        Ok(())
    }

    /// Add a player I would receive. Adding one twice is a no-op.
    pub fn add_incoming(&mut self, player_id: &str) -> Result<(), ProposalError> {
        if self.outgoing.iter().any(|id| id == player_id) {
            return Err(ProposalError::AlreadyOutgoing(player_id.to_string()));
        }
        if self.incoming.iter().any(|id| id == player_id) {
            return Ok(());
        }
        if self.incoming.len() >= MAX_INCOMING {
            return Err(ProposalError::IncomingFull { max: MAX_INCOMING });
        }
        self.incoming.push(player_id.to_string());
        Ok(())
    }

    pub fn remove_outgoing(&mut self, player_id: &str) -> bool {
        let before = self.outgoing.len();
        self.outgoing.retain(|id| id != player_id);
        self.outgoing.len() != before
    }

    pub fn remove_incoming(&mut self, player_id: &str) -> bool {
        let before = self.incoming.len();
        self.incoming.retain(|id| id != player_id);
        self.incoming.len() != before
    }

    pub fn clear(&mut self) {
        self.outgoing.clear();
        self.incoming.clear();
    }

    /// Every id on either side, outgoing first.
    pub fn player_ids(&self) -> impl Iterator<Item = &str> {
        self.outgoing
            .iter()
            .chain(self.incoming.iter())
            .map(String::as_str)
    }

    /// `roster` with outgoing players removed and incoming players added.
    pub fn apply_to<'a>(&'a self, roster: &'a [String]) -> Vec<&'a str> {
        roster
            .iter()
            .map(String::as_str)
            .filter(|id| !self.outgoing.iter().any(|out| out == id))
            .chain(self.incoming.iter().map(String::as_str))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Evaluation
// ---------------------------------------------------------------------------

/// Source of season stat lines keyed by player id.
pub trait StatsLookup {
    fn season_line(&self, player_id: &str) -> Option<&StatLine>;
}

impl StatsLookup for HashMap<String, StatLine> {
    fn season_line(&self, player_id: &str) -> Option<&StatLine> {
        self.get(player_id)
    }
}

/// A lookup with no stats at all; every player is valued on rank alone.
pub struct NoStats;

impl StatsLookup for NoStats {
    fn season_line(&self, _player_id: &str) -> Option<&StatLine> {
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Beneficial,
    Neutral,
    Hurts,
}

impl Verdict {
    pub fn from_net(net_value: f64) -> Self {
        if net_value > VERDICT_THRESHOLD {
            Verdict::Beneficial
        } else if net_value < -VERDICT_THRESHOLD {
            Verdict::Hurts
        } else {
            Verdict::Neutral
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Verdict::Beneficial => "Good Trade ✓",
            Verdict::Neutral => "Neutral Trade",
            Verdict::Hurts => "Bad Trade ✗",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerValue {
    pub player_id: String,
    pub name: String,
    pub position: Position,
    pub value: f64,
    /// Whether a season line contributed to `value`.
    pub has_stats: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeAnalysis {
    pub outgoing: Vec<PlayerValue>,
    pub incoming: Vec<PlayerValue>,
    pub my_value: f64,
    pub target_value: f64,
    pub net_value: f64,
    pub verdict: Verdict,
    /// Positional balance of my roster after the trade.
    pub needs_after: RosterNeeds,
}

fn value_side(
    ids: &[String],
    directory: &PlayerDirectory,
    stats: &dyn StatsLookup,
) -> Vec<PlayerValue> {
    ids.iter()
        .map(|id| {
            let player = directory.get(id);
            let line = stats.season_line(id);
            PlayerValue {
                player_id: id.clone(),
                name: directory.display_name(id),
                position: directory.position_of(id),
                value: player_value(player, line),
                has_stats: line.is_some_and(|l| !l.is_empty()),
            }
        })
        .collect()
}

/// Evaluate `proposal` against my current roster. Returns `None` until
/// both sides hold at least one player.
pub fn evaluate_trade(
    proposal: &TradeProposal,
    my_roster: &[String],
    directory: &PlayerDirectory,
    stats: &dyn StatsLookup,
) -> Option<TradeAnalysis> {
    if proposal.outgoing.is_empty() || proposal.incoming.is_empty() {
        return None;
    }

    let outgoing = value_side(&proposal.outgoing, directory, stats);
    let incoming = value_side(&proposal.incoming, directory, stats);
    let my_value: f64 = outgoing.iter().map(|p| p.value).sum();
    let target_value: f64 = incoming.iter().map(|p| p.value).sum();
    let net_value = target_value - my_value;
    let needs_after = estimate_needs(proposal.apply_to(my_roster), directory);

    Some(TradeAnalysis {
        outgoing,
        incoming,
        my_value,
        target_value,
        net_value,
        verdict: Verdict::from_net(net_value),
        needs_after,
    })
}
