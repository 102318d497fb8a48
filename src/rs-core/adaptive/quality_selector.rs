use super::ladder::RenditionLadder;

/// Under that buffer level, in seconds, we go straight to the lowest quality.
const CRITICAL_BUFFER: f32 = 2.;

/// Under that buffer level, in seconds, we step down one quality at a time.
const LOW_BUFFER: f32 = 5.;

/// Above that buffer level, in seconds, we step up one quality at a time.
const HIGH_BUFFER: f32 = 30.;

/// Factor by which the bandwidth has to exceed the next rendition's bitrate before stepping up
/// from a medium-sized buffer.
const UP_SWITCH_MARGIN: f32 = 1.2;

/// The buffer regimes between which buffer-based adaptation switches.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BufferRegime {
    Critical,
    Low,
    Medium,
    High,
}

impl BufferRegime {
    pub fn from_buffer(buffer_seconds: f32) -> Self {
        if buffer_seconds < CRITICAL_BUFFER {
            BufferRegime::Critical
        } else if buffer_seconds < LOW_BUFFER {
            BufferRegime::Low
        } else if buffer_seconds > HIGH_BUFFER {
            BufferRegime::High
        } else {
            BufferRegime::Medium
        }
    }
}

/// Choose the next quality level through a Buffer-Based Adaptation (BBA) rule set, also
/// considering which renditions the `bandwidth` (in kbps) can afford.
///
/// Stepping down is done as soon as the bandwidth can't sustain the current level, whereas
/// stepping up from a medium buffer asks for a 20% bandwidth margin over the next rendition.
pub fn select_quality_level(
    ladder: &RenditionLadder,
    bandwidth: f32,
    buffer_seconds: f32,
    current_quality: usize,
    max_quality: usize,
) -> usize {
    // Also catches NaN bandwidths
    if !(bandwidth > 0.) {
        return 0;
    }

    let max_quality = max_quality.min(ladder.top_level());
    let regime = BufferRegime::from_buffer(buffer_seconds);
    let affordable = ladder.affordable_level(bandwidth, max_quality);
    let target = match regime {
        BufferRegime::Critical => 0,
        BufferRegime::Low => current_quality.saturating_sub(1).min(affordable),
        BufferRegime::High => {
            let stepped_up = if current_quality < max_quality {
                current_quality + 1
            } else {
                current_quality
            };
            stepped_up.min(affordable)
        }
        BufferRegime::Medium => {
            let can_step_up = affordable > current_quality
                && ladder
                    .bitrate(current_quality + 1)
                    .is_some_and(|next| bandwidth > next * UP_SWITCH_MARGIN);
            if can_step_up {
                current_quality + 1
            } else if affordable < current_quality {
                affordable
            } else {
                current_quality
            }
        }
    };
    target.min(max_quality)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0., BufferRegime::Critical)]
    #[case(1.99, BufferRegime::Critical)]
    #[case(2., BufferRegime::Low)]
    #[case(4.9, BufferRegime::Low)]
    #[case(5., BufferRegime::Medium)]
    #[case(30., BufferRegime::Medium)]
    #[case(30.1, BufferRegime::High)]
    fn test_buffer_regime(#[case] buffer_seconds: f32, #[case] expected: BufferRegime) {
        assert_eq!(BufferRegime::from_buffer(buffer_seconds), expected);
    }

    #[test]
    fn test_critical_buffer_forces_lowest() {
        let ladder = RenditionLadder::reference();
        for bandwidth in [0., 1., 500., 20_000., 1_000_000.] {
            assert_eq!(select_quality_level(&ladder, bandwidth, 1., 5, 5), 0);
        }
        assert_eq!(select_quality_level(&ladder, 20_000., 1.5, 5, 5), 0);
    }

    #[test]
    fn test_no_bandwidth_forces_lowest() {
        let ladder = RenditionLadder::reference();
        assert_eq!(select_quality_level(&ladder, 0., 60., 3, 5), 0);
        assert_eq!(select_quality_level(&ladder, -100., 20., 3, 5), 0);
        assert_eq!(select_quality_level(&ladder, f32::NAN, 20., 3, 5), 0);
    }

    #[rstest]
    // low: one step down, further down if unaffordable
    #[case(20_000., 3., 3, 5, 2)]
    #[case(20_000., 3., 0, 5, 0)]
    #[case(1_000., 3., 4, 5, 1)]
    // high: one step up, capped by what is affordable and by max_quality
    #[case(20_000., 40., 2, 5, 3)]
    #[case(20_000., 40., 5, 5, 5)]
    #[case(20_000., 40., 3, 3, 3)]
    #[case(2_000., 40., 2, 5, 2)]
    #[case(1_000., 40., 3, 5, 1)]
    // medium: up only with a 20% margin over the next rendition
    #[case(3_700., 10., 2, 5, 3)]
    #[case(3_500., 10., 2, 5, 2)]
    #[case(20_000., 10., 1, 5, 2)]
    #[case(1_000., 10., 4, 5, 1)]
    #[case(2_000., 10., 2, 5, 2)]
    #[case(100_000., 10., 5, 5, 5)]
    // current quality above max_quality is brought back into bounds
    #[case(100_000., 10., 5, 3, 3)]
    fn test_select_quality_level(
        #[case] bandwidth: f32,
        #[case] buffer_seconds: f32,
        #[case] current_quality: usize,
        #[case] max_quality: usize,
        #[case] expected: usize,
    ) {
        let ladder = RenditionLadder::reference();
        assert_eq!(
            select_quality_level(&ladder, bandwidth, buffer_seconds, current_quality, max_quality),
            expected
        );
    }

    #[test]
    fn test_top_of_ladder_with_medium_buffer() {
        let ladder = RenditionLadder::new(&[100, 200]).unwrap();
        assert_eq!(select_quality_level(&ladder, 1_000_000., 10., 1, 1), 1);
        assert_eq!(select_quality_level(&ladder, 1_000_000., 10., 1, 7), 1);
    }
}
