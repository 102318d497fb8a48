use super::{
    bandwidth_estimator::{detect_trend, predict_bandwidth, variance_of, BandwidthTrend},
    ladder::RenditionLadder,
    qoe::{evaluate_level, select_quality_maximizing_qoe},
};

/// Factor applied to the predicted bandwidth when it is falling.
const FALLING_TREND_FACTOR: f32 = 0.85;

/// Factor applied to the predicted bandwidth when it is rising.
const RISING_TREND_FACTOR: f32 = 1.1;

/// Quality level advised for the next segment request, with what led to it.
#[derive(Clone, Debug, PartialEq)]
pub struct Recommendation {
    /// Index of the advised rendition in the ladder.
    pub quality: usize,

    /// How stable throughput has been, from `0.` (erratic or unknown) to `1.`.
    pub confidence: f32,

    /// Probability, from `0.` to `1.`, of rebuffering while loading a segment of `quality`.
    pub rebuffer_risk: f32,

    /// Estimated Quality of Experience, from `0.` to `1.`, of switching to `quality`.
    pub qoe: f32,
}

/// What a throughput history tells about the bandwidth we can expect next.
#[derive(Clone, Debug, PartialEq)]
pub struct BandwidthOutlook {
    /// EWMA-based prediction, in kbps.
    pub predicted: f32,

    /// `predicted` corrected according to `trend`, in kbps.
    pub adjusted: f32,

    pub variance: f32,

    pub trend: BandwidthTrend,

    /// From `0.` to `1.`, `0.` when there's no usable bandwidth.
    pub confidence: f32,
}

impl BandwidthOutlook {
    pub fn from_history(history: &[f32]) -> Self {
        let predicted = predict_bandwidth(history);
        let variance = variance_of(history);
        let trend = detect_trend(history);
        let adjusted = match trend {
            BandwidthTrend::Falling => predicted * FALLING_TREND_FACTOR,
            BandwidthTrend::Rising => predicted * RISING_TREND_FACTOR,
            BandwidthTrend::Stable => predicted,
        };
        let confidence = if adjusted > 0. {
            (1. - (variance.sqrt() / adjusted).min(1.)).max(0.).min(1.)
        } else {
            0.
        };
        Self {
            predicted,
            adjusted,
            variance,
            trend,
            confidence,
        }
    }

    /// Recommendation for switching from `current_quality` to `level` given that outlook.
    pub fn evaluate(
        &self,
        ladder: &RenditionLadder,
        level: usize,
        buffer_seconds: f32,
        segment_duration: f32,
        current_quality: usize,
    ) -> Recommendation {
        let (rebuffer_risk, qoe) = evaluate_level(
            ladder,
            level,
            self.adjusted,
            buffer_seconds,
            segment_duration,
            current_quality,
        );
        Recommendation {
            quality: level,
            confidence: self.confidence,
            rebuffer_risk,
            qoe,
        }
    }

    /// The level maximizing QoE under that outlook, with its rebuffer risk and QoE.
    pub fn recommend(
        &self,
        ladder: &RenditionLadder,
        buffer_seconds: f32,
        segment_duration: f32,
        current_quality: usize,
        max_quality: usize,
    ) -> Recommendation {
        let quality = select_quality_maximizing_qoe(
            ladder,
            self.adjusted,
            buffer_seconds,
            segment_duration,
            current_quality,
            max_quality,
        );
        self.evaluate(ladder, quality, buffer_seconds, segment_duration, current_quality)
    }
}

/// Combine bandwidth prediction, trend and variance detection and QoE maximization into a
/// single recommendation for the next segment request.
///
/// `history` lists the measured throughputs in kbps, oldest first.
pub fn get_comprehensive_recommendation(
    ladder: &RenditionLadder,
    history: &[f32],
    buffer_seconds: f32,
    segment_duration: f32,
    current_quality: usize,
    max_quality: usize,
) -> Recommendation {
    BandwidthOutlook::from_history(history).recommend(
        ladder,
        buffer_seconds,
        segment_duration,
        current_quality,
        max_quality,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outlook_of_stable_history() {
        let outlook = BandwidthOutlook::from_history(&[5000., 5000., 5000.]);
        assert!((outlook.predicted - 4000.).abs() < 1e-2);
        assert_eq!(outlook.adjusted, outlook.predicted);
        assert_eq!(outlook.variance, 0.);
        assert_eq!(outlook.trend, BandwidthTrend::Stable);
        assert_eq!(outlook.confidence, 1.);
    }

    #[test]
    fn test_outlook_adjusts_to_trend() {
        let falling = BandwidthOutlook::from_history(&[5000., 4000., 3000., 2000.]);
        assert_eq!(falling.trend, BandwidthTrend::Falling);
        assert!((falling.adjusted - falling.predicted * 0.85).abs() < 1e-3);

        let rising = BandwidthOutlook::from_history(&[2000., 3000., 4000., 5000.]);
        assert_eq!(rising.trend, BandwidthTrend::Rising);
        assert!((rising.adjusted - rising.predicted * 1.1).abs() < 1e-3);
    }

    #[test]
    fn test_confidence_drops_with_variance() {
        let steady = BandwidthOutlook::from_history(&[3000., 3100., 2900., 3000.]);
        let erratic = BandwidthOutlook::from_history(&[500., 9000., 300., 8000.]);
        assert!(steady.confidence > 0.9);
        assert!(erratic.confidence < steady.confidence);
        assert!((0. ..=1.).contains(&erratic.confidence));
    }

    #[test]
    fn test_no_bandwidth() {
        let ladder = RenditionLadder::reference();
        for history in [&[][..], &[0., 0., 0.][..], &[-10.][..]] {
            let reco = get_comprehensive_recommendation(&ladder, history, 12., 4., 3, 5);
            assert_eq!(reco.quality, 0);
            assert_eq!(reco.confidence, 0.);
            assert_eq!(reco.rebuffer_risk, 1.);
            assert_eq!(reco.qoe, 0.);
        }
    }

    #[test]
    fn test_recommendation() {
        let ladder = RenditionLadder::reference();
        let reco = get_comprehensive_recommendation(&ladder, &[5000., 5000., 5000.], 20., 6., 2, 5);
        assert_eq!(reco.quality, 3);
        assert_eq!(reco.confidence, 1.);
        assert_eq!(reco.rebuffer_risk, 0.);
        assert!((reco.qoe - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_evaluate_other_level() {
        let ladder = RenditionLadder::reference();
        let outlook = BandwidthOutlook::from_history(&[5000., 5000., 5000.]);
        let held = outlook.evaluate(&ladder, 2, 20., 6., 2);
        assert_eq!(held.quality, 2);
        assert_eq!(held.rebuffer_risk, 0.);
        assert!((held.qoe - 0.4).abs() < 1e-6);
    }
}
