//! Completion gate: decides whether the learner may advance past a lesson.

/// Percentage of the media that must be watched before the gate opens.
pub const COMPLETION_THRESHOLD_PERCENT: f64 = 95.0;

/// Two-state gate. `Locked -> Unlocked` is the only transition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PlaybackGate {
    #[default]
    Locked,
    Unlocked,
}

impl PlaybackGate {
    /// Gate for content without a watch-through requirement.
    #[must_use]
    pub const fn open() -> Self {
        Self::Unlocked
    }

    /// Pure threshold check; false while the duration is unknown.
    #[must_use]
    pub fn threshold_reached(position: f64, duration: f64) -> bool {
        if duration.is_nan() || duration <= 0.0 || !position.is_finite() {
            return false;
        }
        (position / duration) * 100.0 >= COMPLETION_THRESHOLD_PERCENT
    }

    /// Feed a playback position. Returns true when this call opened the gate.
    pub fn observe(&mut self, position: f64, duration: f64) -> bool {
        if self.can_advance() || !Self::threshold_reached(position, duration) {
            return false;
        }
        *self = Self::Unlocked;
        true
    }

    /// Open the gate on a terminal completion event. Returns true if it was locked.
    pub fn unlock(&mut self) -> bool {
        let was_locked = !self.can_advance();
        *self = Self::Unlocked;
        was_locked
    }

    #[must_use]
    pub const fn can_advance(self) -> bool {
        matches!(self, Self::Unlocked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stays_locked_below_threshold() {
        let mut gate = PlaybackGate::default();
        assert!(!gate.observe(569.9, 600.0));
        assert!(!gate.can_advance());
    }

    #[test]
    fn opens_at_threshold() {
        let mut gate = PlaybackGate::default();
        assert!(gate.observe(570.0, 600.0));
        assert!(gate.can_advance());
    }

    #[test]
    fn unknown_duration_never_opens() {
        let mut gate = PlaybackGate::default();
        assert!(!gate.observe(570.0, 0.0));
        assert!(!PlaybackGate::threshold_reached(1.0, f64::NAN));
        assert!(!gate.can_advance());
    }

    #[test]
    fn never_relocks_after_seeking_back() {
        let mut gate = PlaybackGate::default();
        gate.observe(599.0, 600.0);
        for position in [0.0, 10.0, 300.0] {
            gate.observe(position, 600.0);
            assert!(gate.can_advance());
        }
    }

    #[test]
    fn threshold_matches_ratio_grid() {
        let duration = 200.0;
        for tenth in 0..=2000 {
            let position = f64::from(tenth) / 10.0;
            let expected = position / duration >= 0.95;
            assert_eq!(
                PlaybackGate::threshold_reached(position, duration),
                expected,
                "position {position}"
            );
        }
    }

    #[test]
    fn terminal_unlock_reports_prior_state() {
        let mut gate = PlaybackGate::default();
        assert!(gate.unlock());
        assert!(!gate.unlock());
        assert!(PlaybackGate::open().can_advance());
    }
}
