use crate::config::{BEAT_MS, DURATION_MS};

/// Builds the beat grid for a session starting at `t0` (milliseconds on the
/// caller's clock): `t0, t0+BEAT_MS, ...` up to one beat past the session
/// duration. Pure function of `t0`; every tap in the session is judged
/// against this grid, so it is the single source of truth for both the live
/// preview and the authoritative recomputation.
pub fn build_beat_grid(t0: f64) -> Vec<f64> {
    let mut beats = Vec::with_capacity((DURATION_MS / BEAT_MS) as usize + 2);
    let mut t = t0;
    while t <= t0 + DURATION_MS + 1.0 {
        beats.push(t);
        t += BEAT_MS;
    }
    beats
}

/// Distance from `t` to the nearest beat. Linear scan: the grid is ~41
/// entries for a 20-second session and is rebuilt fresh each round.
pub fn nearest_dt(t: f64, beats: &[f64]) -> f64 {
    beats
        .iter()
        .fold(f64::INFINITY, |best, b| best.min((t - b).abs()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DURATION_MS;

    #[test]
    fn grid_starts_at_t0_and_covers_the_session() {
        for t0 in [0.0, 1234.5, 8_000_000.25] {
            let beats = build_beat_grid(t0);
            assert_eq!(beats[0], t0);
            assert!(*beats.last().unwrap() >= t0 + DURATION_MS);
        }
    }

    #[test]
    fn grid_is_strictly_increasing_with_fixed_gaps() {
        let beats = build_beat_grid(42.0);
        for pair in beats.windows(2) {
            assert!(pair[1] > pair[0]);
            assert!((pair[1] - pair[0] - BEAT_MS).abs() < 1e-6);
        }
    }

    #[test]
    fn grid_is_deterministic() {
        assert_eq!(build_beat_grid(777.0), build_beat_grid(777.0));
    }

    #[test]
    fn twenty_seconds_at_120_bpm_is_41_beats() {
        assert_eq!(build_beat_grid(0.0).len(), 41);
    }

    #[test]
    fn nearest_dt_picks_the_closest_beat() {
        let beats = build_beat_grid(0.0);
        assert_eq!(nearest_dt(0.0, &beats), 0.0);
        assert_eq!(nearest_dt(260.0, &beats), 240.0);
        assert_eq!(nearest_dt(740.0, &beats), 240.0);
        // Past the end of the grid the distance keeps growing.
        assert!(nearest_dt(30_000.0, &beats) > 9_000.0);
    }
}
