//! Score color scale
//!
//! One continuous red-to-green scale shared by the self-assessment fills and
//! the per-artifact authenticity bar: score 1 maps to hue 0 (red), score 5
//! to hue 120 (green), fixed 70% saturation and 45% lightness.

/// Hue in degrees for a 1..=5 score, linear, clamped.
pub fn score_hue(score: f64) -> f64 {
    (score.clamp(1.0, 5.0) - 1.0) / 4.0 * 120.0
}

/// CSS color string for a 1..=5 score.
pub fn score_color(score: f64) -> String {
    format!("hsl({:.0}, 70%, 45%)", score_hue(score))
}

/// Proportional fill width (0..=100) for a 1..=5 score.
pub fn fill_percent(score: f64) -> f64 {
    (score.clamp(1.0, 5.0) - 1.0) / 4.0 * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_endpoints_and_midpoint() {
        assert_eq!(score_color(1.0), "hsl(0, 70%, 45%)");
        assert_eq!(score_color(3.0), "hsl(60, 70%, 45%)");
        assert_eq!(score_color(5.0), "hsl(120, 70%, 45%)");
    }

    #[test]
    fn test_out_of_band_scores_clamp() {
        assert_eq!(score_hue(0.0), 0.0);
        assert_eq!(score_hue(9.5), 120.0);
        assert_eq!(fill_percent(0.0), 0.0);
        assert_eq!(fill_percent(6.0), 100.0);
    }

    #[test]
    fn test_scale_is_continuous_not_bucketed() {
        assert!((score_hue(2.5) - 45.0).abs() < 1e-9);
        assert!((fill_percent(1.5) - 12.5).abs() < 1e-9);
    }
}
