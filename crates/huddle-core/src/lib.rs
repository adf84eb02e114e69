// Shared infrastructure: configuration, the SQLite store, the signed-in
// session and tracing setup that the app and server build on.

pub mod config;
pub mod db;
pub mod logging;
pub mod session;
