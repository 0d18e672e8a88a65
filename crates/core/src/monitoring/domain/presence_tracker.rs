use std::time::Duration;

use crate::monitoring::domain::candidate::Candidate;
use crate::monitoring::domain::event_key::EventKey;
use crate::shared::constants::{CENTER_THRESHOLD_RATIO, LOOKING_AWAY_SECONDS, NO_FACE_SECONDS};
use crate::shared::region::BoundingBox;

/// No-face sub-machine state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AbsenceState {
    Present,
    Timing { since: Duration },
    Confirmed { since: Duration },
}

/// Gaze sub-machine state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GazeState {
    Centered,
    Timing { since: Duration },
    Confirmed { since: Duration },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PresenceConfig {
    pub no_face_after: Duration,
    pub looking_away_after: Duration,
    /// Normalized per-axis offset beyond which the face counts as off-center.
    pub center_threshold: f64,
}

impl Default for PresenceConfig {
    fn default() -> Self {
        Self {
            no_face_after: Duration::from_secs(NO_FACE_SECONDS),
            looking_away_after: Duration::from_secs(LOOKING_AWAY_SECONDS),
            center_threshold: CENTER_THRESHOLD_RATIO,
        }
    }
}

/// Turns per-frame face presence and position into sustained-condition
/// candidates.
///
/// Two sub-machines run in a fixed order on every face frame: absence first,
/// then gaze. A frame without faces clears the gaze timer. Once a condition
/// is confirmed the candidate is re-offered on every qualifying frame;
/// de-duplication belongs to the cooldown gate.
#[derive(Clone, Debug)]
pub struct PresenceTracker {
    config: PresenceConfig,
    absence: AbsenceState,
    gaze: GazeState,
}

impl PresenceTracker {
    pub fn new(config: PresenceConfig) -> Self {
        Self {
            config,
            absence: AbsenceState::Present,
            gaze: GazeState::Centered,
        }
    }

    pub fn absence_state(&self) -> AbsenceState {
        self.absence
    }

    pub fn gaze_state(&self) -> GazeState {
        self.gaze
    }

    /// Evaluates one face frame.
    ///
    /// `face_count` is every face the detector reported, boxed or not.
    /// `primary` is the normalized box of the first reported face; when it is
    /// `None` (missing box or unknown frame size) gaze is left as it was.
    pub fn evaluate(
        &mut self,
        face_count: usize,
        primary: Option<&BoundingBox>,
        now: Duration,
    ) -> Vec<Candidate> {
        let mut candidates = Vec::new();

        if face_count == 0 {
            if let Some(c) = self.track_absence(now) {
                candidates.push(c);
            }
            self.gaze = GazeState::Centered;
            return candidates;
        }

        self.absence = AbsenceState::Present;
        if let Some(c) = primary.and_then(|face| self.track_gaze(face, now)) {
            candidates.push(c);
        }
        candidates
    }

    pub fn reset(&mut self) {
        self.absence = AbsenceState::Present;
        self.gaze = GazeState::Centered;
    }

    fn track_absence(&mut self, now: Duration) -> Option<Candidate> {
        let since = match self.absence {
            AbsenceState::Present => {
                self.absence = AbsenceState::Timing { since: now };
                return None;
            }
            AbsenceState::Timing { since } | AbsenceState::Confirmed { since } => since,
        };

        if now.saturating_sub(since) < self.config.no_face_after {
            return None;
        }
        self.absence = AbsenceState::Confirmed { since };
        Some(Candidate::new(
            EventKey::NoFace,
            format!(
                "No face detected for more than {} seconds",
                self.config.no_face_after.as_secs()
            ),
        ))
    }

    fn track_gaze(&mut self, face: &BoundingBox, now: Duration) -> Option<Candidate> {
        if !self.is_off_center(face) {
            self.gaze = GazeState::Centered;
            return None;
        }

        let since = match self.gaze {
            GazeState::Centered => {
                self.gaze = GazeState::Timing { since: now };
                return None;
            }
            GazeState::Timing { since } | GazeState::Confirmed { since } => since,
        };

        if now.saturating_sub(since) < self.config.looking_away_after {
            return None;
        }
        self.gaze = GazeState::Confirmed { since };
        Some(Candidate::new(
            EventKey::LookingAway,
            format!(
                "Candidate is not looking at the screen for more than {} seconds",
                self.config.looking_away_after.as_secs()
            ),
        ))
    }

    fn is_off_center(&self, face: &BoundingBox) -> bool {
        let (dx, dy) = face.center_offset();
        dx.abs() > self.config.center_threshold || dy.abs() > self.config.center_threshold
    }
}

impl Default for PresenceTracker {
    fn default() -> Self {
        Self::new(PresenceConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn centered() -> BoundingBox {
        BoundingBox::new(0.5, 0.5, 0.3, 0.4)
    }

    fn at(x: f64, y: f64) -> BoundingBox {
        BoundingBox::new(x, y, 0.3, 0.4)
    }

    fn keys(candidates: &[Candidate]) -> Vec<EventKey> {
        candidates.iter().map(|c| c.key).collect()
    }

    // ── Absence ──────────────────────────────────────────────────────

    #[test]
    fn test_starts_present_and_centered() {
        let t = PresenceTracker::default();
        assert_eq!(t.absence_state(), AbsenceState::Present);
        assert_eq!(t.gaze_state(), GazeState::Centered);
    }

    #[test]
    fn test_first_empty_frame_starts_timing() {
        let mut t = PresenceTracker::default();
        assert!(t.evaluate(0, None, ms(1_000)).is_empty());
        assert_eq!(t.absence_state(), AbsenceState::Timing { since: ms(1_000) });
    }

    #[test]
    fn test_absence_shorter_than_threshold_never_offers() {
        let mut t = PresenceTracker::default();
        let offered: usize = (0..100).map(|i| t.evaluate(0, None, ms(i * 99)).len()).sum();
        // 0..9801ms
        assert_eq!(offered, 0);
    }

    #[test]
    fn test_absence_at_threshold_offers_no_face() {
        let mut t = PresenceTracker::default();
        t.evaluate(0, None, ms(0));
        let c = t.evaluate(0, None, ms(10_000));
        assert_eq!(keys(&c), vec![EventKey::NoFace]);
        assert_eq!(c[0].message, "No face detected for more than 10 seconds");
        assert_eq!(t.absence_state(), AbsenceState::Confirmed { since: ms(0) });
    }

    #[test]
    fn test_confirmed_absence_reoffers_every_frame() {
        let mut t = PresenceTracker::default();
        t.evaluate(0, None, ms(0));
        for i in 0..50 {
            let c = t.evaluate(0, None, ms(10_000 + i * 33));
            assert_eq!(keys(&c), vec![EventKey::NoFace]);
        }
    }

    #[test]
    fn test_single_face_frame_resets_absence_clock() {
        let mut t = PresenceTracker::default();
        t.evaluate(0, None, ms(0));
        t.evaluate(0, None, ms(8_000));
        t.evaluate(1, Some(&centered()), ms(8_100));
        assert_eq!(t.absence_state(), AbsenceState::Present);

        // new run restarts from zero at 8.2s
        assert!(t.evaluate(0, None, ms(8_200)).is_empty());
        assert!(t.evaluate(0, None, ms(12_000)).is_empty());
        assert!(t.evaluate(0, None, ms(18_100)).is_empty());
        assert_eq!(keys(&t.evaluate(0, None, ms(18_200))), vec![EventKey::NoFace]);
    }

    #[test]
    fn test_face_clears_confirmed_absence() {
        let mut t = PresenceTracker::default();
        t.evaluate(0, None, ms(0));
        t.evaluate(0, None, ms(11_000));
        t.evaluate(1, Some(&centered()), ms(11_100));
        assert_eq!(t.absence_state(), AbsenceState::Present);
    }

    // ── Gaze ─────────────────────────────────────────────────────────

    #[rstest]
    #[case::centered(0.5, 0.5, false)]
    #[case::right_boundary(0.75, 0.5, false)]
    #[case::left_boundary(0.25, 0.5, false)]
    #[case::bottom_boundary(0.5, 0.75, false)]
    #[case::right_past_boundary(0.7501, 0.5, true)]
    #[case::left_past_boundary(0.2499, 0.5, true)]
    #[case::top_past_boundary(0.5, 0.1, true)]
    #[case::corner(0.9, 0.9, true)]
    fn test_off_center_is_strict(#[case] x: f64, #[case] y: f64, #[case] away: bool) {
        let t = PresenceTracker::default();
        assert_eq!(t.is_off_center(&at(x, y)), away);
    }

    #[test]
    fn test_boundary_gaze_never_starts_timing() {
        let mut t = PresenceTracker::default();
        for i in 0..20 {
            assert!(t.evaluate(1, Some(&at(0.75, 0.5)), ms(i * 1_000)).is_empty());
        }
        assert_eq!(t.gaze_state(), GazeState::Centered);
    }

    #[test]
    fn test_sustained_off_center_offers_looking_away() {
        let mut t = PresenceTracker::default();
        assert!(t.evaluate(1, Some(&at(0.7501, 0.5)), ms(0)).is_empty());
        assert!(t.evaluate(1, Some(&at(0.7501, 0.5)), ms(4_999)).is_empty());
        let c = t.evaluate(1, Some(&at(0.7501, 0.5)), ms(5_000));
        assert_eq!(keys(&c), vec![EventKey::LookingAway]);
        assert_eq!(
            c[0].message,
            "Candidate is not looking at the screen for more than 5 seconds"
        );
    }

    #[test]
    fn test_returning_to_center_resets_gaze() {
        let mut t = PresenceTracker::default();
        t.evaluate(1, Some(&at(0.9, 0.5)), ms(0));
        t.evaluate(1, Some(&at(0.9, 0.5)), ms(4_000));
        t.evaluate(1, Some(&centered()), ms(4_100));
        assert_eq!(t.gaze_state(), GazeState::Centered);

        t.evaluate(1, Some(&at(0.9, 0.5)), ms(4_200));
        assert!(t.evaluate(1, Some(&at(0.9, 0.5)), ms(9_000)).is_empty());
        assert_eq!(keys(&t.evaluate(1, Some(&at(0.9, 0.5)), ms(9_200))), vec![EventKey::LookingAway]);
    }

    #[test]
    fn test_absence_clears_gaze_timer() {
        let mut t = PresenceTracker::default();
        t.evaluate(1, Some(&at(0.9, 0.5)), ms(0));
        t.evaluate(1, Some(&at(0.9, 0.5)), ms(4_000));
        t.evaluate(0, None, ms(4_500));
        assert_eq!(t.gaze_state(), GazeState::Centered);

        // off-center again: timer restarts instead of resuming from 0
        assert!(t.evaluate(1, Some(&at(0.9, 0.5)), ms(5_000)).is_empty());
        assert!(t.evaluate(1, Some(&at(0.9, 0.5)), ms(6_000)).is_empty());
    }

    #[test]
    fn test_gaze_follows_primary_face_regardless_of_count() {
        let mut t = PresenceTracker::default();
        t.evaluate(2, Some(&centered()), ms(0));
        assert!(t.evaluate(2, Some(&centered()), ms(6_000)).is_empty());
        assert_eq!(t.gaze_state(), GazeState::Centered);

        t.evaluate(3, Some(&at(0.95, 0.95)), ms(7_000));
        assert_eq!(t.gaze_state(), GazeState::Timing { since: ms(7_000) });
    }

    #[test]
    fn test_face_without_box_counts_as_present_and_keeps_gaze() {
        let mut t = PresenceTracker::default();
        t.evaluate(1, Some(&at(0.9, 0.5)), ms(0));
        t.evaluate(0, None, ms(100));
        t.evaluate(0, None, ms(20_000));
        t.evaluate(1, Some(&at(0.9, 0.5)), ms(20_100));

        for i in 0..60 {
            assert!(t.evaluate(1, None, ms(20_200 + i * 200)).is_empty());
        }
        assert_eq!(t.absence_state(), AbsenceState::Present);
        assert_eq!(t.gaze_state(), GazeState::Timing { since: ms(20_100) });

        // timer kept running through the boxless frames
        assert_eq!(
            keys(&t.evaluate(1, Some(&at(0.9, 0.5)), ms(32_400))),
            vec![EventKey::LookingAway]
        );
    }

    #[test]
    fn test_custom_thresholds_in_messages() {
        let mut t = PresenceTracker::new(PresenceConfig {
            no_face_after: Duration::from_secs(3),
            looking_away_after: Duration::from_secs(2),
            center_threshold: 0.1,
        });
        t.evaluate(0, None, ms(0));
        let c = t.evaluate(0, None, ms(3_000));
        assert_eq!(c[0].message, "No face detected for more than 3 seconds");

        t.evaluate(1, Some(&at(0.65, 0.5)), ms(4_000));
        let c = t.evaluate(1, Some(&at(0.65, 0.5)), ms(6_000));
        assert_eq!(
            c[0].message,
            "Candidate is not looking at the screen for more than 2 seconds"
        );
    }

    #[test]
    fn test_reset_clears_both_machines() {
        let mut t = PresenceTracker::default();
        t.evaluate(0, None, ms(0));
        t.reset();
        assert_eq!(t.absence_state(), AbsenceState::Present);

        t.evaluate(1, Some(&at(0.9, 0.5)), ms(100));
        t.reset();
        assert_eq!(t.gaze_state(), GazeState::Centered);
    }
}
