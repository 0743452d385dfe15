//! # Adzanr Library
//!
//! Internal library for the adzanr binary application.
//!
//! This library exists to enable testing of the engine internals and provide
//! clean separation between CLI dispatch (main.rs) and application logic.
//!
//! ## Architecture
//!
//! - **Entry Point**: `Adzanr` struct owns the application lifecycle
//! - **Engine**: `engine` module runs the 1 Hz state machine on a thread
//! - **Prayer Domain**: `prayer` module with the solar calculator, the daily
//!   catalog, and the adzan/iqomah/prayer phase chain
//! - **Configuration**: `config` module for TOML-based settings
//! - **Geographic**: `geo` module for coordinate-to-timezone resolution
//! - **Infrastructure**: Signal handling, logging, and the swappable time
//!   source used by the simulate command

// Import macros from logger module for use in all submodules
#[macro_use]
pub mod logger;

// Public API modules
pub mod args;
pub mod commands;
pub mod config;
pub mod constants;
pub mod engine;
pub mod geo;
pub mod prayer;
pub mod signals;
pub mod state;
pub mod time_source;

pub mod adzanr;

// Re-export for binary
pub use adzanr::Adzanr;
