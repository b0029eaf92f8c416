use lms_core::gate::COMPLETION_THRESHOLD_PERCENT;
use lms_core::model::{ContentKind, TrackingMode};
use lms_core::progress::{elapsed_label, format_clock, percent_watched, remaining_secs};
use services::TrackerSnapshot;

/// Display-ready state of the player chrome.
#[derive(Clone, Debug, PartialEq)]
pub struct PlayerVm {
    pub show_progress: bool,
    pub elapsed: String,
    pub remaining: String,
    pub percent_watched: u8,
    pub status: String,
    pub can_advance: bool,
}

impl PlayerVm {
    #[must_use]
    pub fn from_snapshot(snapshot: &TrackerSnapshot, kind: ContentKind, tracking: TrackingMode) -> Self {
        let playback = &snapshot.playback;
        let position = playback.position_secs();
        let duration = playback.duration_secs();
        let can_advance = snapshot.can_advance();

        // Rounded for the progress bar only; the gate uses the exact ratio.
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let watched = percent_watched(position, duration).round() as u8;

        Self {
            show_progress: kind == ContentKind::Video,
            elapsed: elapsed_label(position, duration),
            remaining: format!("{} left", format_clock(remaining_secs(position, duration))),
            percent_watched: watched,
            status: status_text(snapshot, kind, tracking),
            can_advance,
        }
    }
}

fn status_text(snapshot: &TrackerSnapshot, kind: ContentKind, tracking: TrackingMode) -> String {
    if tracking == TrackingMode::Untracked {
        return "Review the material, then continue.".to_owned();
    }
    if snapshot.can_advance() {
        return match snapshot.scorm_status.as_deref() {
            Some(status) => format!("Course package {status}. You can continue."),
            None => "You can continue.".to_owned(),
        };
    }
    match kind {
        ContentKind::Scorm => "Complete the course package to continue.".to_owned(),
        _ => format!("Watch at least {COMPLETION_THRESHOLD_PERCENT:.0}% of the video to continue."),
    }
}
