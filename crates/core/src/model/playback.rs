use serde::Deserialize;

use crate::progress::percent_remaining;

//
// ─── PLAYBACK STATE ───────────────────────────────────────────────────────────
//

/// Transient, lesson-scoped playback position.
///
/// `percent_remaining` is always derived from position and duration; there is no
/// setter for it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackState {
    position_secs: f64,
    duration_secs: f64,
    percent_remaining: f64,
    is_completed: bool,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self::new()
    }
}

fn non_negative(value: f64) -> f64 {
    if value.is_finite() { value.max(0.0) } else { 0.0 }
}

impl PlaybackState {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            position_secs: 0.0,
            duration_secs: 0.0,
            percent_remaining: 100.0,
            is_completed: false,
        }
    }

    #[must_use]
    pub fn position_secs(&self) -> f64 {
        self.position_secs
    }

    #[must_use]
    pub fn duration_secs(&self) -> f64 {
        self.duration_secs
    }

    #[must_use]
    pub fn percent_remaining(&self) -> f64 {
        self.percent_remaining
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.is_completed
    }

    /// Record the media duration once the backing player knows it.
    pub fn set_duration(&mut self, duration: f64) {
        self.duration_secs = non_negative(duration);
        self.set_position(self.position_secs);
    }

    /// Record a playback position. Clamped into `[0, duration]` once duration is known.
    pub fn set_position(&mut self, position: f64) {
        let mut position = non_negative(position);
        if self.duration_secs > 0.0 {
            position = position.min(self.duration_secs);
        }
        self.position_secs = position;
        self.percent_remaining = percent_remaining(self.position_secs, self.duration_secs);
    }

    /// Natural end of the media: position jumps to the end and the state is completed.
    pub fn finish(&mut self) {
        self.set_position(self.duration_secs);
        self.is_completed = true;
    }

    /// Completion signalled out of band (SCORM status) without a position change.
    pub fn mark_completed(&mut self) {
        self.is_completed = true;
    }
}

//
// ─── MEDIA EVENTS ─────────────────────────────────────────────────────────────
//

/// Callbacks forwarded by a backing player, as JSON sent from the page script.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MediaEvent {
    Duration { seconds: f64 },
    Progress { position: f64 },
    Ended,
}
