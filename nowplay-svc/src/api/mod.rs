//! Local HTTP API over the now-playing store
//!
//! A loopback-only push/pull surface for other local processes (for
//! example a browser-extension bridge):
//!   - `POST /nowplaying` with JSON `{"title":"...","artist":"...","source":"..."}`
//!   - `GET  /nowplaying` returns JSON of the current state
//!   - `POST /clear`      resets the current state

pub mod handlers;
pub mod server;

pub use server::{create_router, AppContext, LocalServer};
