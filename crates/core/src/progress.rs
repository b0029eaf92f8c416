//! Display helpers for playback position and completion.
//!
//! Inputs are never rejected: negative, NaN, or infinite seconds are coerced to
//! zero, and percentages are clamped into `[0, 100]`.

fn sanitize(seconds: f64) -> f64 {
    if seconds.is_finite() { seconds.max(0.0) } else { 0.0 }
}

/// Formats seconds as `MM:SS`. Minutes are unbounded; seconds are zero-padded.
#[must_use]
pub fn format_clock(seconds: f64) -> String {
    // Truncation is intended: the clock shows whole elapsed seconds.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let total = sanitize(seconds).floor() as u64;
    let minutes = total / 60;
    let remainder = total % 60;
    format!("{minutes:02}:{remainder:02}")
}

/// Percentage of the media not yet played, clamped to `[0, 100]`.
///
/// Returns 100 while the duration is still unknown (zero).
#[must_use]
pub fn percent_remaining(position: f64, duration: f64) -> f64 {
    let duration = sanitize(duration);
    if duration <= 0.0 {
        return 100.0;
    }
    let position = sanitize(position);
    (100.0 * (duration - position) / duration).clamp(0.0, 100.0)
}

/// Percentage of the media played, clamped to `[0, 100]`.
#[must_use]
pub fn percent_watched(position: f64, duration: f64) -> f64 {
    100.0 - percent_remaining(position, duration)
}

/// Seconds left to play; zero when the duration is unknown.
#[must_use]
pub fn remaining_secs(position: f64, duration: f64) -> f64 {
    (sanitize(duration) - sanitize(position)).max(0.0)
}

/// Elapsed label for the player chrome. Shows `00:00` until the duration is known.
#[must_use]
pub fn elapsed_label(position: f64, duration: f64) -> String {
    if sanitize(duration) <= 0.0 {
        return format_clock(0.0);
    }
    format_clock(position.min(duration))
}
