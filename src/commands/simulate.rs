//! Implementation of the `simulate` command.
//!
//! Installs a simulated time source so the whole day of phase transitions
//! can be watched in seconds, then runs the application normally. The
//! simulated clock advances with real elapsed time scaled by the
//! multiplier, so the engine thread and main loop stay in agreement.

use std::sync::Arc;

use anyhow::{Result, bail};

use crate::adzanr::Adzanr;
use crate::time_source::{self, SimulatedTimeSource};

/// Handle the `simulate` command: set up simulated time, then run.
pub fn handle_simulate_command(
    start_time: String,
    end_time: String,
    multiplier: f64,
    debug_enabled: bool,
    config_dir: Option<String>,
) -> Result<()> {
    let start = time_source::parse_datetime(&start_time)
        .map_err(|e| anyhow::anyhow!("Invalid start time: {e}"))?;
    let end = time_source::parse_datetime(&end_time)
        .map_err(|e| anyhow::anyhow!("Invalid end time: {e}"))?;

    if end <= start {
        bail!("End time must be after start time");
    }

    // Install the clock before any logging so timestamp prefixes are
    // simulated-time from the first line
    let sim_source = Arc::new(SimulatedTimeSource::new(start, end, multiplier));
    time_source::init_time_source(sim_source);

    log_version!();
    log_block_start!("Simulation Mode");
    log_decorated!(
        "Simulating from {} to {}",
        start.format("%Y-%m-%d %H:%M:%S"),
        end.format("%Y-%m-%d %H:%M:%S")
    );

    let duration = end.signed_duration_since(start);
    log_indented!(
        "Total simulated time: {} hours {} minutes",
        duration.num_hours(),
        duration.num_minutes() % 60
    );
    log_indented!(
        "Time acceleration: {}x (will complete in ~{:.1} seconds)",
        multiplier as u64,
        duration.num_seconds() as f64 / multiplier
    );

    Adzanr::new(debug_enabled)
        .with_config_dir(config_dir)
        .without_headers()
        .run()
}
