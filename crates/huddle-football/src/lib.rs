// Football domain logic: players, rosters, stat lines, roster needs and
// trade valuation. Everything here is pure; fetching lives in huddle-api.

pub mod league;
pub mod needs;
pub mod player;
pub mod position;
pub mod roster;
pub mod season;
pub mod stats;
pub mod suggestions;
pub mod trade;
pub mod value;
