const DEFAULT_BANDWIDTH_HISTORY_SIZE: usize = 20;
const DEFAULT_SEGMENT_DURATION: f32 = 4.;
const DEFAULT_MAX_QUALITY: i32 = 4;
const DEFAULT_INITIAL_QUALITY: usize = 2;

/// Inner configuration on which an `AbrSession` relies.
#[derive(Clone, Debug, PartialEq)]
pub struct AbrConfiguration {
    /// Maximum amount of throughput samples kept to predict the bandwidth. Once reached, the
    /// oldest sample is discarded each time a new one is recorded.
    pub bandwidth_history_size: usize,

    /// Duration of a media segment, in seconds. Assumed constant for the whole content.
    pub segment_duration: f32,

    /// Index of the highest rendition adaptive streaming may select.
    ///
    /// Values above the top rendition select up to the top rendition, negative values are
    /// refused.
    pub max_quality: i32,

    /// Quality level assumed to be loaded before any decision is taken.
    pub initial_quality: usize,
}

impl Default for AbrConfiguration {
    fn default() -> Self {
        Self {
            bandwidth_history_size: DEFAULT_BANDWIDTH_HISTORY_SIZE,
            segment_duration: DEFAULT_SEGMENT_DURATION,
            max_quality: DEFAULT_MAX_QUALITY,
            initial_quality: DEFAULT_INITIAL_QUALITY,
        }
    }
}
