use crate::config::{DEBOUNCE_MS, DURATION_MS};
use crate::game::judgment::{ScoredTap, map_points};
use crate::game::timing::{build_beat_grid, nearest_dt};

/// What happened to a tap the player just made.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TapOutcome {
    /// Accepted and scored; the running total already includes it.
    Scored(ScoredTap),
    /// Arrived inside the debounce window of the previous accepted tap.
    Debounced,
    /// The round is over; input is ignored.
    Finished,
}

/// One round of the tapper, client side. Holds the origin timestamp, the
/// beat grid and the taps accepted so far, and feeds the live score display.
/// Single-threaded by design: an animation-frame loop and input events
/// interleave on one logical thread, so no locking is needed here.
///
/// The scoring path is the same `nearest_dt`/`map_points` pair the server
/// uses for the authoritative recomputation.
#[derive(Debug, Clone)]
pub struct Session {
    t0: f64,
    beats: Vec<f64>,
    taps: Vec<ScoredTap>,
    total: u32,
    done: bool,
}

impl Session {
    pub fn start(t0: f64) -> Self {
        Self {
            t0,
            beats: build_beat_grid(t0),
            taps: Vec::new(),
            total: 0,
            done: false,
        }
    }

    /// Discards the finished round and begins a new one. Replay keeps
    /// nothing: the grid, taps and total are rebuilt from the new origin.
    pub fn restart(&mut self, t0: f64) {
        *self = Session::start(t0);
    }

    /// Registers a player tap at `now`. Applies the same debounce rule as
    /// the batch scorer: rejected taps do not reset the window.
    pub fn register_tap(&mut self, now: f64) -> TapOutcome {
        if self.done {
            return TapOutcome::Finished;
        }
        if let Some(last) = self.taps.last() {
            if now - last.t < DEBOUNCE_MS {
                return TapOutcome::Debounced;
            }
        }
        let dt = nearest_dt(now, &self.beats);
        let points = map_points(dt);
        let tap = ScoredTap { t: now, dt, points };
        self.total += points;
        self.taps.push(tap);
        TapOutcome::Scored(tap)
    }

    /// Advances the completion flag. Call from the frame loop.
    pub fn tick(&mut self, now: f64) {
        if now - self.t0 >= DURATION_MS {
            self.done = true;
        }
    }

    /// Round progress in `[0, 1]` for the progress bar.
    pub fn progress(&self, now: f64) -> f64 {
        ((now - self.t0) / DURATION_MS).clamp(0.0, 1.0)
    }

    pub fn t0(&self) -> f64 {
        self.t0
    }

    pub fn score(&self) -> u32 {
        self.total
    }

    pub fn taps(&self) -> &[ScoredTap] {
        &self.taps
    }

    /// Raw tap timestamps, in the shape the submission endpoints expect.
    pub fn raw_taps(&self) -> Vec<f64> {
        self.taps.iter().map(|tap| tap.t).collect()
    }

    pub fn is_done(&self) -> bool {
        self.done
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::judgment::score_taps;

    #[test]
    fn live_total_matches_batch_recomputation() {
        let mut session = Session::start(1_000.0);
        for t in [1_000.0, 1_240.0, 1_300.0, 1_700.0, 12_345.0] {
            session.register_tap(t);
        }
        let (server_total, _) = score_taps(&session.raw_taps(), &build_beat_grid(1_000.0));
        assert_eq!(session.score(), server_total);
    }

    #[test]
    fn debounced_tap_earns_nothing() {
        let mut session = Session::start(0.0);
        assert!(matches!(session.register_tap(240.0), TapOutcome::Scored(_)));
        let before = session.score();
        assert_eq!(session.register_tap(300.0), TapOutcome::Debounced);
        assert_eq!(session.score(), before);
        assert_eq!(session.taps().len(), 1);
    }

    #[test]
    fn input_after_completion_is_ignored() {
        let mut session = Session::start(0.0);
        session.tick(DURATION_MS);
        assert!(session.is_done());
        assert_eq!(session.register_tap(DURATION_MS + 1.0), TapOutcome::Finished);
        assert_eq!(session.score(), 0);
    }

    #[test]
    fn progress_is_clamped() {
        let session = Session::start(100.0);
        assert_eq!(session.progress(50.0), 0.0);
        assert_eq!(session.progress(100.0 + DURATION_MS / 2.0), 0.5);
        assert_eq!(session.progress(100.0 + DURATION_MS * 3.0), 1.0);
    }

    #[test]
    fn restart_discards_the_previous_round() {
        let mut session = Session::start(0.0);
        session.register_tap(240.0);
        session.tick(DURATION_MS);
        session.restart(50_000.0);
        assert!(!session.is_done());
        assert_eq!(session.score(), 0);
        assert!(session.taps().is_empty());
        assert_eq!(session.t0(), 50_000.0);
    }
}
