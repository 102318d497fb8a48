use super::ewma::Ewma;

/// Weight given to each new throughput sample.
const EWMA_ALPHA: f32 = 0.3;

/// Part of the smoothed throughput we actually rely on.
const SAFETY_FACTOR: f32 = 0.8;

/// Normalized slope above which (or under which, negated) bandwidth is considered to be trending.
const TREND_THRESHOLD: f32 = 0.1;

/// Direction the measured throughput is taking.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BandwidthTrend {
    Falling = -1,
    Stable = 0,
    Rising = 1,
}

impl BandwidthTrend {
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

/// Predict the bandwidth, in kbps, available for the next segment request.
///
/// This is an EWMA of all samples in `history` (oldest first), on which a safety margin is
/// applied.
///
/// Returns `0.` for an empty history.
pub fn predict_bandwidth(history: &[f32]) -> f32 {
    let mut ewma = Ewma::new(EWMA_ALPHA);
    history.iter().for_each(|sample| ewma.add_sample(*sample));
    ewma.get_estimate() * SAFETY_FACTOR
}

/// Harmonic mean of the strictly positive samples of `history`.
///
/// Low samples dominate a harmonic mean, which makes this a more conservative estimate than
/// [`predict_bandwidth`] when throughput drops matter more than peaks. No safety margin is
/// applied here.
///
/// Returns `0.` if there's no strictly positive sample.
pub fn predict_bandwidth_harmonic(history: &[f32]) -> f32 {
    let (sum_reciprocal, valid_count) = history
        .iter()
        .filter(|sample| **sample > 0.)
        .fold((0f32, 0u32), |(sum, count), sample| {
            (sum + 1. / *sample, count + 1)
        });
    if valid_count == 0 {
        0.
    } else {
        valid_count as f32 / sum_reciprocal
    }
}

/// Classify the direction taken by `history` from the least-squares slope of the samples
/// against their index, normalized by the mean sample.
///
/// At least 3 samples are needed, the trend is `Stable` otherwise.
pub fn detect_trend(history: &[f32]) -> BandwidthTrend {
    if history.len() < 3 {
        return BandwidthTrend::Stable;
    }

    let mut sum_x = 0f32;
    let mut sum_y = 0f32;
    let mut sum_xy = 0f32;
    let mut sum_xx = 0f32;
    for (i, y) in history.iter().enumerate() {
        let x = i as f32;
        sum_x += x;
        sum_y += y;
        sum_xy += x * y;
        sum_xx += x * x;
    }

    let n = history.len() as f32;
    let denominator = n * sum_xx - sum_x * sum_x;
    let avg = sum_y / n;
    if denominator == 0. || avg == 0. {
        return BandwidthTrend::Stable;
    }

    let slope = (n * sum_xy - sum_x * sum_y) / denominator;
    let norm_slope = slope / avg;
    if norm_slope > TREND_THRESHOLD {
        BandwidthTrend::Rising
    } else if norm_slope < -TREND_THRESHOLD {
        BandwidthTrend::Falling
    } else {
        BandwidthTrend::Stable
    }
}

/// Sample variance (with an `N - 1` denominator) of `history`.
///
/// Returns `0.` with less than 2 samples.
pub fn variance_of(history: &[f32]) -> f32 {
    if history.len() < 2 {
        return 0.;
    }
    let n = history.len() as f32;
    let mean = history.iter().sum::<f32>() / n;
    let sum_sq = history
        .iter()
        .map(|sample| {
            let diff = sample - mean;
            diff * diff
        })
        .sum::<f32>();
    sum_sq / (n - 1.)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn assert_close(actual: f32, expected: f32) {
        assert!(
            (actual - expected).abs() <= expected.abs() * 1e-5 + 1e-5,
            "expected {expected}, got {actual}"
        );
    }

    #[rstest]
    #[case(vec![5000.], 4000.)]
    #[case(vec![5000., 5000., 5000.], 4000.)]
    #[case(vec![1250.; 40], 1000.)]
    fn test_predict_constant_history(#[case] history: Vec<f32>, #[case] expected: f32) {
        assert_close(predict_bandwidth(&history), expected);
    }

    #[test]
    fn test_predict_empty_history() {
        assert_eq!(predict_bandwidth(&[]), 0.);
    }

    #[test]
    fn test_predict_favors_recent_samples() {
        // (0.3 * 2000 + 0.7 * 1000) * 0.8
        assert_close(predict_bandwidth(&[1000., 2000.]), 1040.);
        // 1000 -> 1900 -> 1330
        assert_close(predict_bandwidth(&[1000., 4000., 0.]), 1064.);
    }

    #[test]
    fn test_harmonic() {
        assert_eq!(predict_bandwidth_harmonic(&[10., 10., 10.]), 10.);
        assert_close(predict_bandwidth_harmonic(&[1000., 4000.]), 1600.);
        assert_close(predict_bandwidth_harmonic(&[1000., -5., 0., 4000.]), 1600.);
        assert_eq!(predict_bandwidth_harmonic(&[]), 0.);
        assert_eq!(predict_bandwidth_harmonic(&[0., -1.]), 0.);
    }

    #[rstest]
    #[case(vec![1., 2., 3., 4., 5.], BandwidthTrend::Rising)]
    #[case(vec![5., 4., 3., 2., 1.], BandwidthTrend::Falling)]
    #[case(vec![3., 3., 3., 3.], BandwidthTrend::Stable)]
    #[case(vec![1000., 1010., 1005., 1000.], BandwidthTrend::Stable)]
    #[case(vec![1., 100.], BandwidthTrend::Stable)]
    #[case(vec![], BandwidthTrend::Stable)]
    #[case(vec![0., 0., 0.], BandwidthTrend::Stable)]
    fn test_detect_trend(#[case] history: Vec<f32>, #[case] expected: BandwidthTrend) {
        assert_eq!(detect_trend(&history), expected);
    }

    #[test]
    fn test_trend_as_i32() {
        assert_eq!(BandwidthTrend::Rising.as_i32(), 1);
        assert_eq!(BandwidthTrend::Stable.as_i32(), 0);
        assert_eq!(BandwidthTrend::Falling.as_i32(), -1);
    }

    #[test]
    fn test_variance() {
        assert_eq!(variance_of(&[]), 0.);
        assert_eq!(variance_of(&[42.]), 0.);
        assert_eq!(variance_of(&[7., 7., 7.]), 0.);
        assert_close(variance_of(&[2., 4., 4., 4., 5., 5., 7., 9.]), 32. / 7.);
        assert_close(variance_of(&[1000., 2000.]), 500_000.);
    }
}
