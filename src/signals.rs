//! Shutdown signal handling.

use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use anyhow::{Context, Result};
use signal_hook::consts::{SIGINT, SIGTERM};
use signal_hook::flag;

/// Register SIGINT and SIGTERM to raise a shutdown flag.
///
/// The main loop polls the flag; the engine itself is stopped by the
/// coordinator once the flag is seen, so shutdown is always a clean join.
pub fn install_shutdown_flag() -> Result<Arc<AtomicBool>> {
    let shutdown = Arc::new(AtomicBool::new(false));
    flag::register(SIGTERM, Arc::clone(&shutdown))
        .context("failed to register SIGTERM handler")?;
    flag::register(SIGINT, Arc::clone(&shutdown))
        .context("failed to register SIGINT handler")?;
    Ok(shutdown)
}
