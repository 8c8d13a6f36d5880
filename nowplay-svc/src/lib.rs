//! # Nowplay Service Library (nowplay-svc)
//!
//! The in-process "now playing" state service.
//!
//! **Purpose:** Hold the single latest track observation under concurrent
//! access, accept updates over a loopback HTTP endpoint or from the Last.fm
//! poller, and render the state for display on demand.

pub mod api;
pub mod config;
pub mod error;
pub mod poller;
pub mod state;

pub use error::{Error, Result};
pub use state::NowPlayingStore;
