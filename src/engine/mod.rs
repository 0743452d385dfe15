//! Prayer display engine: the 1 Hz tick loop and its pure core.
//!
//! `EngineCore` holds all state-machine logic as a pure function of an
//! explicit clock reading, which keeps it unit-testable without threads.
//! `PrayerEngine` wraps the core in a background thread driven by the
//! global time source and publishes a [`Snapshot`] to the subscriber on
//! every tick.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Local, NaiveDate};

use crate::config::Config;
use crate::constants::{APPROACHING_THRESHOLD_SECS, TICK_INTERVAL};
use crate::prayer::phase::{detect_adzan_window, seconds_until};
use crate::prayer::{CalculationMethod, IqomahDelays, PhaseInfo, PrayerCatalog};
use crate::state::{DisplayPhase, Snapshot};
use crate::time_source;

/// Everything the engine needs to know, resolved and validated up front.
#[derive(Debug, Clone, Copy)]
pub struct EngineConfig {
    pub latitude: f64,
    pub longitude: f64,
    pub method: CalculationMethod,
    pub iqomah_delays: IqomahDelays,
}

impl EngineConfig {
    /// Resolve a loaded configuration into engine parameters.
    ///
    /// An unrecognized method tag falls back to the default with a warning
    /// rather than refusing to start; bad coordinates or delays fail here.
    pub fn from_config(config: &Config) -> Result<Self> {
        let method = config.resolved_method();
        let iqomah_delays = config.resolved_iqomah_delays();

        let engine_config = Self {
            latitude: config.latitude,
            longitude: config.longitude,
            method,
            iqomah_delays,
        };
        engine_config.validate()?;
        Ok(engine_config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(-90.0..=90.0).contains(&self.latitude) {
            bail!(
                "latitude must be between -90 and 90 degrees, got {}",
                self.latitude
            );
        }
        if !(-180.0..=180.0).contains(&self.longitude) {
            bail!(
                "longitude must be between -180 and 180 degrees, got {}",
                self.longitude
            );
        }
        self.iqomah_delays.validate()
    }
}

/// The state machine, decoupled from threads and the global clock.
pub struct EngineCore {
    config: EngineConfig,
    catalog: Option<PrayerCatalog>,
    phase: Option<PhaseInfo>,
    /// Date whose failed recalculation has already been warned about.
    /// Keeps the degraded-mode warning to one line per day instead of one
    /// per tick while every retry fails.
    warned_date: Option<NaiveDate>,
}

impl EngineCore {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            catalog: None,
            phase: None,
            warned_date: None,
        }
    }

    /// Build a core preloaded with a catalog, bypassing the calculator.
    #[cfg(any(test, feature = "testing-support"))]
    pub fn with_catalog(config: EngineConfig, catalog: PrayerCatalog) -> Self {
        Self {
            config,
            catalog: Some(catalog),
            phase: None,
            warned_date: None,
        }
    }

    /// Make sure the catalog matches `today`, recalculating across the day
    /// rollover.
    ///
    /// When recalculation fails but a previous catalog exists, the stale
    /// catalog is kept and its date key left unchanged, so the next tick
    /// retries. Only the very first calculation is allowed to fail the tick.
    fn ensure_catalog(&mut self, today: NaiveDate) -> Result<&PrayerCatalog> {
        let up_to_date = self
            .catalog
            .as_ref()
            .map(|c| c.calculated_date() == today)
            .unwrap_or(false);

        if !up_to_date {
            match PrayerCatalog::calculate(
                self.config.latitude,
                self.config.longitude,
                self.config.method,
                today,
            ) {
                Ok(catalog) => {
                    self.catalog = Some(catalog);
                    self.warned_date = None;
                }
                Err(e) => {
                    if self.catalog.is_none() {
                        return Err(e).context("initial prayer time calculation failed");
                    }
                    if self.warned_date != Some(today) {
                        log_warning!(
                            "Prayer time recalculation failed, serving yesterday's timetable: {e:#}"
                        );
                        self.warned_date = Some(today);
                    }
                }
            }
        }

        // Unreachable None: either replaced above or the error returned
        self.catalog
            .as_ref()
            .context("no prayer catalog available")
    }

    /// Advance the state machine to `now` and describe the display state.
    ///
    /// At most one phase transition happens per tick; when one does, the
    /// returned snapshot already reflects the post-transition phase.
    pub fn tick(&mut self, now: DateTime<Local>) -> Result<Snapshot> {
        self.ensure_catalog(now.date_naive())?;
        let catalog = self
            .catalog
            .as_ref()
            .context("no prayer catalog available")?;

        if let Some(active) = self.phase {
            if now < active.phase_end {
                return Ok(build_snapshot(active_display(active), Some(active), catalog, now));
            }
            match active.advance(&self.config.iqomah_delays) {
                Some(next) => {
                    self.phase = Some(next);
                    return Ok(build_snapshot(active_display(next), Some(next), catalog, now));
                }
                None => self.phase = None,
            }
            // Chain ended: fall through so a newly opened adzan window or
            // the idle countdown is reported in this same tick
        }

        if let Some(adzan) = detect_adzan_window(catalog.entries(), now) {
            self.phase = Some(adzan);
            return Ok(build_snapshot(DisplayPhase::Adzan, Some(adzan), catalog, now));
        }

        Ok(build_snapshot(DisplayPhase::Idle, None, catalog, now))
    }
}

fn active_display(info: PhaseInfo) -> DisplayPhase {
    match info.phase {
        crate::prayer::Phase::Adzan => DisplayPhase::Adzan,
        crate::prayer::Phase::Iqomah => DisplayPhase::Iqomah,
        crate::prayer::Phase::Prayer => DisplayPhase::Prayer,
    }
}

fn build_snapshot(
    phase: DisplayPhase,
    active: Option<PhaseInfo>,
    catalog: &PrayerCatalog,
    now: DateTime<Local>,
) -> Snapshot {
    let next_entry = catalog.next_after(now);

    let (phase, countdown_seconds) = match active {
        Some(info) => (phase, seconds_until(info.phase_end, now)),
        None => {
            // Idle resolves to approaching once the next adzan is close
            match next_entry {
                Some(next) => {
                    let countdown = seconds_until(next.time, now);
                    let phase = if countdown <= APPROACHING_THRESHOLD_SECS as u64 {
                        DisplayPhase::Approaching
                    } else {
                        DisplayPhase::Idle
                    };
                    (phase, countdown)
                }
                None => (DisplayPhase::Idle, 0),
            }
        }
    };

    Snapshot {
        display_state: phase,
        current_prayer: active.map(|info| info.prayer),
        next_prayer: next_entry.map(|e| e.name),
        countdown_seconds,
        prayers: catalog.entries().to_vec(),
        now,
    }
}

/// Background engine owning the tick thread.
///
/// `stop` is idempotent and joins the thread, so no snapshot is published
/// after it returns. Dropping the engine stops it.
pub struct PrayerEngine {
    config: EngineConfig,
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl PrayerEngine {
    /// Validate the configuration and build a stopped engine.
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            running: Arc::new(AtomicBool::new(false)),
            handle: None,
        })
    }

    /// Start ticking, replacing any previous run.
    ///
    /// `on_state` is called once per tick with the fresh snapshot. A panic
    /// inside it is caught and logged; the engine keeps ticking.
    pub fn start<F>(&mut self, on_state: F) -> Result<()>
    where
        F: FnMut(Snapshot) + Send + 'static,
    {
        self.stop();

        let running = Arc::new(AtomicBool::new(true));
        self.running = Arc::clone(&running);

        let core = EngineCore::new(self.config);
        let handle = std::thread::Builder::new()
            .name("prayer-engine".into())
            .spawn(move || run_loop(core, running, on_state))
            .context("failed to spawn prayer engine thread")?;
        self.handle = Some(handle);
        Ok(())
    }

    /// Stop the tick thread and wait for it to finish.
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }

    /// Whether the tick thread is still alive.
    pub fn is_running(&self) -> bool {
        self.handle.is_some() && self.running.load(Ordering::SeqCst)
    }
}

impl Drop for PrayerEngine {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run_loop<F>(mut core: EngineCore, running: Arc<AtomicBool>, mut on_state: F)
where
    F: FnMut(Snapshot) + Send + 'static,
{
    while running.load(Ordering::SeqCst) {
        let now = time_source::now();
        match core.tick(now) {
            Ok(snapshot) => {
                let published = catch_unwind(AssertUnwindSafe(|| on_state(snapshot)));
                if published.is_err() {
                    log_warning!("State subscriber panicked, continuing ticks");
                }
            }
            Err(e) => {
                log_warning!("Engine tick failed: {e:#}");
            }
        }

        if time_source::is_simulated() && time_source::simulation_ended() {
            break;
        }
        time_source::sleep(TICK_INTERVAL);
    }
}
