//! Tuner: the playback controller.
//!
//! Owns the audio output. A tune stops the current track, plays a burst of
//! static with a short blocking pause, then starts the new station looping
//! from its broadcast offset.

use crate::catalog::Catalog;
use crate::clock::{broadcast_offset, now_epoch_secs};
use crate::config::Config;
use crate::error::{RadioError, Result};
use crate::player::AudioOutput;
use crate::session::Selection;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};

pub struct Tuner<O: AudioOutput> {
    output: O,
    static_sound: PathBuf,
    pause_min: Duration,
    pause_max: Duration,
    current: Selection,
}

impl<O: AudioOutput> Tuner<O> {
    pub fn new(output: O, static_sound: impl Into<PathBuf>, pause: (Duration, Duration)) -> Self {
        let (a, b) = pause;
        Tuner {
            output,
            static_sound: static_sound.into(),
            pause_min: a.min(b),
            pause_max: a.max(b),
            current: Selection::default(),
        }
    }

    pub fn from_config(output: O, config: &Config) -> Self {
        Self::new(output, &config.static_sound, config.static_pause())
    }

    /// Tune to `(game, station)` at the current wall-clock time.
    /// Returns the offset playback started from.
    pub fn tune(
        &mut self,
        catalog: &Catalog,
        global_start: f64,
        game: &str,
        station: &str,
    ) -> Result<Duration> {
        self.tune_with(catalog, global_start, game, station, now_epoch_secs)
    }

    /// Same as [`Tuner::tune`] with an explicit clock reading.
    pub fn tune_at(
        &mut self,
        catalog: &Catalog,
        global_start: f64,
        game: &str,
        station: &str,
        now: f64,
    ) -> Result<Duration> {
        self.tune_with(catalog, global_start, game, station, move || now)
    }

    fn tune_with(
        &mut self,
        catalog: &Catalog,
        global_start: f64,
        game: &str,
        station: &str,
        now: impl FnOnce() -> f64,
    ) -> Result<Duration> {
        self.stop();
        self.static_burst();

        let entry = catalog
            .get(game, station)
            .ok_or_else(|| RadioError::UnknownStation {
                game: game.to_string(),
                station: station.to_string(),
            })?;

        // Read the clock after the pause so the offset matches what is audible.
        let offset = broadcast_offset(global_start, entry.duration, now());
        self.output.play_looped(&entry.path, offset)?;

        debug!(offset_secs = offset.as_secs_f64(), "broadcast offset");
        info!(game, station, "tuned");
        self.current = Selection::new(game, station);
        Ok(offset)
    }

    /// Play the static resource and block for a random pause.
    fn static_burst(&mut self) {
        if let Err(e) = self.output.play_once(&self.static_sound) {
            warn!("static effect unavailable: {}", e);
        }
        let pause = random_pause(self.pause_min, self.pause_max);
        if !pause.is_zero() {
            std::thread::sleep(pause);
        }
    }

    /// Stop the station track and clear the current selection.
    pub fn stop(&mut self) {
        self.output.stop();
        self.current = Selection::default();
    }

    /// What is currently audible.
    pub fn current(&self) -> &Selection {
        &self.current
    }

    pub fn output(&self) -> &O {
        &self.output
    }
}

/// Uniformly random duration in `[min, max]`, millisecond resolution.
pub fn random_pause(min: Duration, max: Duration) -> Duration {
    let lo = min.as_millis() as u64;
    let hi = max.as_millis() as u64;
    if hi <= lo {
        return Duration::from_millis(lo);
    }
    Duration::from_millis(fastrand::u64(lo..=hi))
}
