use crate::adaptive::Recommendation;

/// Lay out a `Recommendation` the way the JavaScript-side reads it:
/// `[quality, confidence, rebuffer_risk, qoe]`.
pub(crate) fn format_recommendation_for_js(recommendation: &Recommendation) -> Vec<f32> {
    vec![
        recommendation.quality as f32,
        recommendation.confidence,
        recommendation.rebuffer_risk,
        recommendation.qoe,
    ]
}

/// Convert switch history levels communicated by the JavaScript-side.
pub(crate) fn parse_levels_from_js(levels: &[u32]) -> Vec<usize> {
    levels.iter().map(|level| *level as usize).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_recommendation_for_js() {
        let recommendation = Recommendation {
            quality: 3,
            confidence: 0.75,
            rebuffer_risk: 0.25,
            qoe: 0.5,
        };
        assert_eq!(
            format_recommendation_for_js(&recommendation),
            vec![3., 0.75, 0.25, 0.5]
        );
    }

    #[test]
    fn test_parse_levels_from_js() {
        assert_eq!(parse_levels_from_js(&[0, 4, 2]), vec![0, 4, 2]);
        assert!(parse_levels_from_js(&[]).is_empty());
    }
}
