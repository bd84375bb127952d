// Rate classification over recent samples (the device-side analysis)

use crate::models::RateCode;

/// Samples considered by each rule.
pub const RECENT: usize = 5;
pub const HIGH_HEARTBEAT: f64 = 200.0;
pub const LOW_HEARTBEAT: f64 = 40.0;
pub const RAPID_RISE: f64 = 16.0;
pub const RAPID_FALL: f64 = -16.0;

pub fn average(samples: &[f64]) -> Option<f64> {
    if samples.is_empty() {
        return None;
    }
    Some(samples.iter().sum::<f64>() / samples.len() as f64)
}

/// Least-squares slope of sample value against its index (beats per sample).
pub fn slope(samples: &[f64]) -> Option<f64> {
    let n = samples.len();
    if n < 2 {
        return None;
    }
    let n_f = n as f64;
    let mean_x = (n_f - 1.0) / 2.0;
    let mean_y = samples.iter().sum::<f64>() / n_f;
    let (num, den) = samples
        .iter()
        .enumerate()
        .fold((0.0, 0.0), |(num, den), (i, y)| {
            let dx = i as f64 - mean_x;
            (num + dx * (y - mean_y), den + dx * dx)
        });
    Some(num / den)
}

/// Classifies the trend of `history` (oldest first) using its last
/// [`RECENT`] entries. Level rules take precedence over trend rules.
pub fn detect(history: &[f64]) -> RateCode {
    let recent = &history[history.len().saturating_sub(RECENT)..];
    let Some(avg) = average(recent) else {
        return RateCode::Normal;
    };
    if avg >= HIGH_HEARTBEAT {
        return RateCode::High;
    }
    if avg <= LOW_HEARTBEAT {
        return RateCode::Low;
    }
    match slope(recent) {
        Some(s) if s >= RAPID_RISE => RateCode::Rising,
        Some(s) if s <= RAPID_FALL => RateCode::Falling,
        _ => RateCode::Normal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_history_is_normal() {
        assert_eq!(detect(&[]), RateCode::Normal);
    }

    #[test]
    fn slope_of_line() {
        assert_eq!(slope(&[1.0, 3.0, 5.0, 7.0]), Some(2.0));
        assert_eq!(slope(&[5.0]), None);
        assert_eq!(slope(&[70.0, 70.0, 70.0]), Some(0.0));
    }

    #[test]
    fn level_rules() {
        assert_eq!(detect(&[205.0, 200.0, 201.0]), RateCode::High);
        assert_eq!(detect(&[40.0, 40.0, 41.0, 39.0]), RateCode::Low);
        assert_eq!(detect(&[72.0, 74.0, 73.0]), RateCode::Normal);
    }

    #[test]
    fn trend_rules() {
        assert_eq!(detect(&[60.0, 80.0, 100.0, 120.0]), RateCode::Rising);
        assert_eq!(detect(&[150.0, 130.0, 110.0, 90.0]), RateCode::Falling);
    }

    #[test]
    fn only_last_five_samples_count() {
        // Old spike is outside the window.
        let history = [210.0, 210.0, 210.0, 70.0, 71.0, 70.0, 72.0, 71.0];
        assert_eq!(detect(&history), RateCode::Normal);
    }

    #[test]
    fn level_wins_over_trend() {
        assert_eq!(detect(&[190.0, 200.0, 210.0, 210.0, 210.0]), RateCode::High);
    }
}
