/// Amount of segments we aim to have in the buffer.
const TARGET_BUFFER_SEGMENTS: f32 = 5.;

/// Above that amount of seconds before the buffer empties, rebuffering is considered improbable.
const SAFE_RUNWAY: f32 = 30.;

/// Under that amount of seconds before the buffer empties, rebuffering is considered very
/// probable.
const CRITICAL_RUNWAY: f32 = 5.;

/// Rebuffer probability given when the runway is under `CRITICAL_RUNWAY`.
const CRITICAL_RUNWAY_PROBABILITY: f32 = 0.9;

/// Score from `0.` to `1.` of how comfortable the current buffer is.
///
/// It grows linearly from an empty buffer to a buffer of `5 * segment_duration` seconds, after
/// which it stays at `1.`.
pub fn health_score(buffer_seconds: f32, segment_duration: f32) -> f32 {
    if segment_duration <= 0. || buffer_seconds <= 0. {
        return 0.;
    }
    let target_buffer = segment_duration * TARGET_BUFFER_SEGMENTS;
    if buffer_seconds >= target_buffer {
        1.
    } else {
        buffer_seconds / target_buffer
    }
}

/// Probability, from `0.` to `1.`, that playback stalls while a segment taking
/// `download_time` seconds to load is being downloaded.
///
/// This models a race between the segment arriving and the buffer emptying: while downloading,
/// the buffer only depletes at a rate of `1 - download_time / segment_duration`.
pub fn rebuffer_probability(buffer_seconds: f32, download_time: f32, segment_duration: f32) -> f32 {
    if buffer_seconds <= 0. {
        return 1.;
    }
    if download_time <= 0. || segment_duration <= 0. {
        return 0.;
    }

    let download_rate = download_time / segment_duration;
    if download_rate >= 1. {
        // loading slower than playing
        return 1.;
    }

    let time_to_rebuffer = buffer_seconds / (1. - download_rate);
    if time_to_rebuffer > SAFE_RUNWAY {
        0.
    } else if time_to_rebuffer < CRITICAL_RUNWAY {
        CRITICAL_RUNWAY_PROBABILITY
    } else {
        1. - time_to_rebuffer / SAFE_RUNWAY
    }
}
