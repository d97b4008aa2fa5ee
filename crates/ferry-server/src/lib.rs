//! HTTP host for the ferry file streamer: routing, configuration, and the
//! bridge from [`ferry_streamer::FileStreamer`] onto axum responses.

pub mod config;
pub mod routes;

pub use config::ServerConfig;
pub use routes::{AppState, router};
