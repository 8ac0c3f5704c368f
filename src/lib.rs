//! lore_radio: core library for the lore radio simulator.
//!
//! Station catalog, broadcast clock, session persistence and tuning logic
//! live here. The interactive binary in `main.rs` consumes this crate.

pub mod app;
pub mod catalog;
pub mod clock;
pub mod config;
pub mod error;
pub mod menu;
pub mod player;
pub mod session;
pub mod tuner;

pub use error::{RadioError, Result};
