//! Command-line command handlers for adzanr.
//!
//! One-shot commands live here; each in its own submodule.

pub mod simulate;
pub mod timetable;
