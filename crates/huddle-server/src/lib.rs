// HTTP proxy in front of the league host and the stats provider, so the
// terminal client (or anything else) can reach both through one origin.

pub mod error;
pub mod routes;
