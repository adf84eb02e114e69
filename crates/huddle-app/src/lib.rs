// The application orchestrator: session-scoped state, the stats cache and
// the event loop the terminal UI talks to.

pub mod app;
pub mod protocol;
pub mod stats_cache;
