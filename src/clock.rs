//! Broadcast clock: maps wall-clock time onto a position inside a looping track.
//!
//! Every station is modelled as an endless broadcast that started at the
//! session epoch (`global_start`). Tuning in at `now` lands at
//! `(now - global_start) mod duration`. Wall-clock seconds are used on purpose
//! so the position keeps advancing across restarts and downtime.

use chrono::Utc;
use std::time::Duration;

/// Current wall-clock time as fractional seconds since the Unix epoch.
pub fn now_epoch_secs() -> f64 {
    Utc::now().timestamp_micros() as f64 / 1_000_000.0
}

/// Position within a track of length `duration` for a broadcast that began at
/// `global_start`, observed at `now` (both epoch seconds).
///
/// The result always lies in `[0, duration)`, including when the clock was
/// set back before `global_start`. A zero duration yields a zero offset.
pub fn broadcast_offset(global_start: f64, duration: Duration, now: f64) -> Duration {
    let len = duration.as_secs_f64();
    if len <= 0.0 {
        return Duration::ZERO;
    }
    let elapsed = now - global_start;
    if !elapsed.is_finite() {
        return Duration::ZERO;
    }
    let offset = elapsed.rem_euclid(len);
    // rem_euclid may round up to exactly `len` for tiny negative inputs
    if offset >= len {
        return Duration::ZERO;
    }
    Duration::from_secs_f64(offset)
}
