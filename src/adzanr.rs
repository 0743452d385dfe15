//! Application coordinator that manages the complete lifecycle of adzanr.
//!
//! Owns the startup sequence: version header, configuration loading,
//! timezone resolution, signal handler setup, engine startup with the
//! logging renderer, the main wait loop, and graceful shutdown.
//!
//! The `Adzanr` struct uses a builder pattern to support different startup
//! contexts:
//! - Normal startup: `Adzanr::new(debug_enabled).run()`
//! - Simulation mode: `Adzanr::new(debug_enabled).without_headers().run()`
//!   after the simulated time source is installed

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::{
    config,
    engine::{EngineConfig, PrayerEngine},
    geo,
    logger::Log,
    signals::install_shutdown_flag,
    state::{DisplayPhase, Snapshot},
    time_source::{self, RealTimeSource},
};

/// Builder for configuring and running the adzanr application.
pub struct Adzanr {
    debug_enabled: bool,
    show_headers: bool,
    config_dir: Option<String>,
}

impl Adzanr {
    /// Create a new runner with defaults matching a normal run.
    pub fn new(debug_enabled: bool) -> Self {
        Self {
            debug_enabled,
            show_headers: true,
            config_dir: None,
        }
    }

    /// Use a custom configuration directory.
    pub fn with_config_dir(mut self, config_dir: Option<String>) -> Self {
        self.config_dir = config_dir;
        self
    }

    /// Skip the version header (the simulate command prints its own).
    pub fn without_headers(mut self) -> Self {
        self.show_headers = false;
        self
    }

    /// Execute the application with the configured settings.
    ///
    /// Loads and validates configuration, starts the engine with the
    /// logging renderer as subscriber, then waits for a shutdown signal
    /// (or the end of a simulation) before stopping the engine cleanly.
    pub fn run(self) -> Result<()> {
        if self.show_headers {
            log_version!();
        }

        let config = match config::loading::load(self.config_dir.as_deref().map(Path::new)) {
            Ok(config) => config,
            Err(e) => {
                log_error_exit!("Configuration failed");
                eprintln!("{e:?}");
                std::process::exit(1);
            }
        };

        let timezone = geo::determine_timezone_from_coordinates(config.latitude, config.longitude);
        Log::set_coordinate_timezone(Some(timezone));

        config.log_config();
        log_indented!("Timezone: {}", timezone.name());

        if !time_source::is_initialized() {
            time_source::init_time_source(Arc::new(RealTimeSource));
        }

        let shutdown = install_shutdown_flag()?;

        let engine_config = EngineConfig::from_config(&config)?;
        let mut engine =
            PrayerEngine::new(engine_config).context("failed to create prayer engine")?;

        let mut renderer = StateRenderer::new(self.debug_enabled);
        engine
            .start(move |snapshot| renderer.render(&snapshot))
            .context("failed to start prayer engine")?;

        while !shutdown.load(Ordering::SeqCst) {
            if time_source::is_simulated() && time_source::simulation_ended() {
                break;
            }
            // Real-time poll even under simulation; the engine thread does
            // its own scaled sleeping
            std::thread::sleep(Duration::from_millis(100));
        }

        log_pipe!();
        log_info!("Shutting down");
        engine.stop();
        log_end!();
        Ok(())
    }
}

/// The binary's display-state subscriber: announces phase changes on the
/// logger, with per-minute countdown lines in debug mode.
struct StateRenderer {
    debug_enabled: bool,
    last_key: Option<RenderKey>,
    last_minute: Option<u64>,
}

type RenderKey = (
    DisplayPhase,
    Option<crate::prayer::PrayerName>,
    Option<crate::prayer::PrayerName>,
);

impl StateRenderer {
    fn new(debug_enabled: bool) -> Self {
        Self {
            debug_enabled,
            last_key: None,
            last_minute: None,
        }
    }

    fn render(&mut self, snapshot: &Snapshot) {
        let key = (snapshot.display_state, snapshot.current_prayer, snapshot.next_prayer);
        if self.last_key != Some(key) {
            self.announce(snapshot);
            self.last_key = Some(key);
            self.last_minute = Some(snapshot.countdown_seconds / 60);
            return;
        }

        if self.debug_enabled {
            let minute = snapshot.countdown_seconds / 60;
            let ticking = matches!(
                snapshot.display_state,
                DisplayPhase::Approaching | DisplayPhase::Iqomah
            );
            if ticking && self.last_minute != Some(minute) {
                log_indented!("{} remaining", format_countdown(snapshot.countdown_seconds));
                self.last_minute = Some(minute);
            }
        }
    }

    fn announce(&self, snapshot: &Snapshot) {
        let next_label = snapshot
            .next_prayer
            .map(|p| p.label())
            .unwrap_or("the next prayer");

        match snapshot.display_state {
            DisplayPhase::Idle => {
                log_block_start!(
                    "Waiting for {}, {} remaining",
                    next_label,
                    format_countdown(snapshot.countdown_seconds)
                );
            }
            DisplayPhase::Approaching => {
                log_block_start!(
                    "{} in {}",
                    next_label,
                    format_countdown(snapshot.countdown_seconds)
                );
            }
            DisplayPhase::Adzan => {
                let label = snapshot
                    .current_prayer
                    .map(|p| p.label())
                    .unwrap_or("prayer");
                log_block_start!("Commencing adzan for {}", label);
            }
            DisplayPhase::Iqomah => {
                let label = snapshot
                    .current_prayer
                    .map(|p| p.label())
                    .unwrap_or("prayer");
                log_block_start!(
                    "Iqomah for {}, prayer in {}",
                    label,
                    format_countdown(snapshot.countdown_seconds)
                );
            }
            DisplayPhase::Prayer => {
                let label = snapshot
                    .current_prayer
                    .map(|p| p.label())
                    .unwrap_or("prayer");
                log_block_start!("{} prayer in progress", label);
            }
        }
    }
}

fn format_countdown(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    if hours > 0 {
        format!("{hours}h {minutes:02}m {secs:02}s")
    } else if minutes > 0 {
        format!("{minutes}m {secs:02}s")
    } else {
        format!("{secs}s")
    }
}
