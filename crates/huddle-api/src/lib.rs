// Upstream access: the Sleeper league API, the SportsData stats API and the
// huddle proxy, behind the `LeagueSource` and `StatsSource` traits.

pub mod error;
mod http;
pub mod proxy;
pub mod sleeper;
pub mod source;
pub mod sportsdata;
pub mod wire;

pub use error::ApiError;
pub use proxy::ProxyClient;
pub use sleeper::SleeperClient;
pub use source::{LeagueEndpoint, LeagueSource, PlayerLookup, StatsSource};
pub use sportsdata::{SportsDataClient, StatsClient};
