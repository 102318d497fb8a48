use super::{buffer_health::rebuffer_probability, ladder::RenditionLadder};

/// Weight of the rebuffer probability in the QoE utility.
const REBUFFER_WEIGHT: f32 = 0.5;

/// Weight of a quality switch in the QoE utility.
const SWITCH_WEIGHT: f32 = 0.1;

/// Estimated Quality of Experience, from `0.` to `1.`, of playing the `quality_level` rendition
/// out of a ladder of `levels` renditions.
///
/// Higher renditions score higher, while the probability of rebuffering and having to switch
/// quality (`switch_penalty`, generally `0.` or `1.`) are both penalized.
///
/// Returns `0.` for a `quality_level` outside the ladder.
pub fn estimate_qoe(
    levels: usize,
    quality_level: usize,
    rebuffer_prob: f32,
    switch_penalty: f32,
) -> f32 {
    if quality_level >= levels {
        return 0.;
    }
    let quality_score = if levels > 1 {
        quality_level as f32 / (levels - 1) as f32
    } else {
        0.
    };
    let qoe = quality_score - rebuffer_prob * REBUFFER_WEIGHT - switch_penalty * SWITCH_WEIGHT;
    // `clamp` would let a NaN through
    qoe.max(0.).min(1.)
}

/// Time in seconds it would take to load a segment of the `level` rendition.
///
/// `None` if either that level does not exist or `bandwidth` is not strictly positive.
pub(crate) fn download_time(
    ladder: &RenditionLadder,
    level: usize,
    bandwidth: f32,
    segment_duration: f32,
) -> Option<f32> {
    if !(bandwidth > 0.) {
        return None;
    }
    ladder
        .bitrate(level)
        .map(|bitrate| bitrate * segment_duration / bandwidth)
}

/// Rebuffer probability and QoE of choosing `level` when currently at `current_quality`.
pub(crate) fn evaluate_level(
    ladder: &RenditionLadder,
    level: usize,
    bandwidth: f32,
    buffer_seconds: f32,
    segment_duration: f32,
    current_quality: usize,
) -> (f32, f32) {
    let rebuffer_prob = match download_time(ladder, level, bandwidth, segment_duration) {
        Some(download_time) => rebuffer_probability(buffer_seconds, download_time, segment_duration),
        None => 1.,
    };
    let switch_penalty = if level != current_quality { 1. } else { 0. };
    let qoe = estimate_qoe(ladder.len(), level, rebuffer_prob, switch_penalty);
    (rebuffer_prob, qoe)
}

/// Go through every rendition up to `max_quality` and return the one with the best estimated
/// QoE.
///
/// Ties are won by the lowest level.
///
/// Returns `0` if `bandwidth` is not strictly positive.
pub fn select_quality_maximizing_qoe(
    ladder: &RenditionLadder,
    bandwidth: f32,
    buffer_seconds: f32,
    segment_duration: f32,
    current_quality: usize,
    max_quality: usize,
) -> usize {
    if !(bandwidth > 0.) {
        return 0;
    }
    let max_quality = max_quality.min(ladder.top_level());
    let mut best_quality = 0;
    let mut best_qoe = -1.;
    for level in 0..=max_quality {
        let (_, qoe) = evaluate_level(
            ladder,
            level,
            bandwidth,
            buffer_seconds,
            segment_duration,
            current_quality,
        );
        if qoe > best_qoe {
            best_qoe = qoe;
            best_quality = level;
        }
    }
    best_quality
}
