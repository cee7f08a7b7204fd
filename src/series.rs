// src/series.rs
// Builds the client-side angle-over-time series plotted under the simulation results.
// The curve is the small-angle solution theta(t) = theta0 * cos(omega * t), sampled on a fixed grid.
// theta0 comes from the submitted form, omega from the service response; the service's own angle is not used.
// The window is always WINDOW_SECS long, independent of the duration the user submitted.

use crate::model::ChartPoint;
use std::f64::consts::PI;

/// Number of intervals in the sampling grid (SAMPLE_INTERVALS + 1 points).
pub const SAMPLE_INTERVALS: usize = 100;

/// Length of the plotted window in seconds.
pub const WINDOW_SECS: f64 = 10.0;

/// Samples theta(t) over [0, WINDOW_SECS] and returns the angles in degrees.
pub fn derive_series(theta0_deg: f64, omega: f64) -> Vec<ChartPoint> {
    let theta0 = (theta0_deg * PI) / 180.0; // Degrees to radians.
    (0..=SAMPLE_INTERVALS)
        .map(|i| {
            let t = (i as f64 / SAMPLE_INTERVALS as f64) * WINDOW_SECS;
            let theta_t = theta0 * (omega * t).cos();
            ChartPoint {
                time: format!("{t:.2}"),
                theta_deg: (theta_t * 180.0) / PI,
            }
        })
        .collect()
}
