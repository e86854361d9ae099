use crate::config::{DEBOUNCE_MS, MAX_DT_MS, MAX_TAP_POINTS, MIN_DT_MS};
use crate::game::timing::nearest_dt;

/// A tap that survived the debounce filter, enriched with its distance to
/// the nearest beat and the points it earned. Derived once, never mutated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredTap {
    pub t: f64,
    pub dt: f64,
    pub points: u32,
}

/// Maps a nearest-beat distance to points. This is an inverted-accuracy
/// curve: `dt` is clamped to `[MIN_DT_MS, MAX_DT_MS]` and normalised, so a
/// tap dead on a beat earns 0 and a tap 220 ms or more off earns the full
/// 100. Saturates at both clamp boundaries.
pub fn map_points(dt: f64) -> u32 {
    let clamped = dt.clamp(MIN_DT_MS, MAX_DT_MS);
    let norm = (clamped - MIN_DT_MS) / (MAX_DT_MS - MIN_DT_MS);
    (MAX_TAP_POINTS as f64 * norm).round() as u32
}

/// Scores a raw tap stream against a beat grid, in arrival order.
///
/// A tap landing less than `DEBOUNCE_MS` after the previously *accepted* tap
/// is dropped; the first tap is always accepted and a rejected tap does not
/// reset the window. Pure function of its inputs.
pub fn score_taps(raw_taps: &[f64], beats: &[f64]) -> (u32, Vec<ScoredTap>) {
    let mut total = 0u32;
    let mut scored = Vec::with_capacity(raw_taps.len());
    let mut last_accepted: Option<f64> = None;

    for &t in raw_taps {
        if let Some(last) = last_accepted {
            if t - last < DEBOUNCE_MS {
                continue;
            }
        }
        let dt = nearest_dt(t, beats);
        let points = map_points(dt);
        total += points;
        scored.push(ScoredTap { t, dt, points });
        last_accepted = Some(t);
    }

    (total, scored)
}
