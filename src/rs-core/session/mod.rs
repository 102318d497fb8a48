use std::collections::VecDeque;

use crate::{
    adaptive::{
        apply_oscillation_guard, health_score, AbrConfiguration, BandwidthOutlook, BandwidthTrend,
        LadderError, Recommendation, Rendition, RenditionLadder, SwitchHistory,
    },
    Logger,
};

/// Amount of throughput samples needed before the `AbrSession` starts switching qualities.
const MIN_SAMPLES_FOR_DECISION: usize = 3;

/// Keeps track of the throughput measured and of the quality levels selected for a single
/// playback session, so that the adaptive logic can be called on each segment request with a
/// snapshot of both.
///
/// This is the only stateful part of adaptive streaming: the decisions themselves are all taken
/// by the pure functions of the `adaptive` module.
#[derive(Clone, Debug)]
pub struct AbrSession {
    ladder: RenditionLadder,

    config: AbrConfiguration,

    /// `config.max_quality`, once validated against `ladder`.
    max_quality: usize,

    /// Throughput measured for the last loaded segments in kbps, oldest first.
    bandwidth_history: VecDeque<f32>,

    /// Quality level retained at the end of each of the last decisions.
    switch_history: SwitchHistory,

    /// Quality level of the segments currently being loaded.
    current_quality: usize,

    /// If `false`, a quality has been forced through `set_quality` and recommendations are
    /// only informative.
    is_auto: bool,
}

impl AbrSession {
    /// Creates a new `AbrSession` switching between the renditions of `ladder`.
    ///
    /// Fails if `config.max_quality` is negative.
    pub fn new(ladder: RenditionLadder, config: AbrConfiguration) -> Result<Self, LadderError> {
        let max_quality = ladder.max_quality(config.max_quality)?;
        let current_quality = config.initial_quality.min(max_quality);
        let history_capacity = config.bandwidth_history_size.max(1);
        Ok(Self {
            ladder,
            config,
            max_quality,
            bandwidth_history: VecDeque::with_capacity(history_capacity),
            switch_history: SwitchHistory::new(),
            current_quality,
            is_auto: true,
        })
    }

    /// Adds a throughput sample, in kbps, measured for the last segment loaded.
    pub fn record_bandwidth(&mut self, bandwidth_kbps: f32) {
        if !bandwidth_kbps.is_finite() || bandwidth_kbps <= 0. {
            Logger::lazy_warn(&|| format!("ABR: ignoring invalid bandwidth sample: {bandwidth_kbps}"));
            return;
        }
        if self.bandwidth_history.len() >= self.config.bandwidth_history_size.max(1) {
            self.bandwidth_history.pop_front();
        }
        self.bandwidth_history.push_back(bandwidth_kbps);
    }

    /// Adds metric allowing the `AbrSession` to provide more educated guesses.
    /// Here, `duration_ms` should correspond to the time taken to make a request and `size_bytes`
    /// should be the corresponding size of loaded data.
    pub fn record_download(&mut self, duration_ms: f64, size_bytes: u32) {
        if duration_ms <= 0. || size_bytes == 0 {
            Logger::debug("ABR: ignoring empty or instantaneous download");
            return;
        }
        // bits per millisecond are kilobits per second
        let bandwidth_kbps = (f64::from(size_bytes) * 8. / duration_ms) as f32;
        self.record_bandwidth(bandwidth_kbps);
    }

    /// Produce a recommendation for the next segment request, considering that `buffer_seconds`
    /// of media are currently buffered.
    ///
    /// In auto mode, the recommended quality also becomes the current one.
    ///
    /// Until `MIN_SAMPLES_FOR_DECISION` samples are recorded, the current quality is held and
    /// no decision is recorded.
    pub fn update(&mut self, buffer_seconds: f32) -> Recommendation {
        let history = self.history_snapshot();
        let outlook = BandwidthOutlook::from_history(&history);
        if history.len() < MIN_SAMPLES_FOR_DECISION {
            Logger::lazy_debug(&|| {
                format!(
                    "ABR: holding quality {} until enough samples are recorded ({}/{})",
                    self.current_quality,
                    history.len(),
                    MIN_SAMPLES_FOR_DECISION
                )
            });
            return outlook.evaluate(
                &self.ladder,
                self.current_quality,
                buffer_seconds,
                self.config.segment_duration,
                self.current_quality,
            );
        }
        let candidate = outlook.recommend(
            &self.ladder,
            buffer_seconds,
            self.config.segment_duration,
            self.current_quality,
            self.max_quality,
        );

        let quality =
            apply_oscillation_guard(candidate.quality, self.current_quality, &self.switch_history);
        let recommendation = if quality == candidate.quality {
            candidate
        } else {
            Logger::lazy_debug(&|| {
                format!(
                    "ABR: holding quality {} instead of {} as it oscillated recently",
                    quality, candidate.quality
                )
            });
            outlook.evaluate(
                &self.ladder,
                quality,
                buffer_seconds,
                self.config.segment_duration,
                self.current_quality,
            )
        };

        if self.is_auto && recommendation.quality != self.current_quality {
            Logger::lazy_info(&|| {
                format!(
                    "ABR: switching quality {} -> {} (bandwidth: {:.0}kbps, trend: {:?}, buffer: {:.1}s)",
                    self.current_quality,
                    recommendation.quality,
                    outlook.adjusted,
                    outlook.trend,
                    buffer_seconds
                )
            });
            self.current_quality = recommendation.quality;
        }
        self.switch_history.push(self.current_quality);
        recommendation
    }

    /// Force a quality level, disabling automatic switches until `set_auto_mode(true)` is
    /// called.
    pub fn set_quality(&mut self, level: usize) {
        let level = level.min(self.max_quality);
        Logger::lazy_info(&|| format!("ABR: quality manually set to {level}"));
        self.current_quality = level;
        self.is_auto = false;
    }

    pub fn set_auto_mode(&mut self, is_auto: bool) {
        self.is_auto = is_auto;
    }

    pub fn is_auto_mode(&self) -> bool {
        self.is_auto
    }

    pub fn current_quality(&self) -> usize {
        self.current_quality
    }

    pub fn max_quality(&self) -> usize {
        self.max_quality
    }

    /// Update the highest quality level which may be selected, bringing the current quality
    /// down to it if needed.
    pub fn set_max_quality(&mut self, max_quality: i32) -> Result<(), LadderError> {
        self.max_quality = self.ladder.max_quality(max_quality)?;
        self.config.max_quality = max_quality;
        self.current_quality = self.current_quality.min(self.max_quality);
        Ok(())
    }

    pub fn segment_duration(&self) -> f32 {
        self.config.segment_duration
    }

    pub fn set_segment_duration(&mut self, segment_duration: f32) {
        if !(segment_duration > 0.) {
            Logger::lazy_warn(&|| format!("ABR: ignoring invalid segment duration: {segment_duration}"));
            return;
        }
        self.config.segment_duration = segment_duration;
    }

    /// Bandwidth, in kbps, currently predicted from the recorded samples.
    pub fn predicted_bandwidth(&self) -> f32 {
        BandwidthOutlook::from_history(&self.history_snapshot()).predicted
    }

    pub fn trend(&self) -> BandwidthTrend {
        BandwidthOutlook::from_history(&self.history_snapshot()).trend
    }

    pub fn buffer_health(&self, buffer_seconds: f32) -> f32 {
        health_score(buffer_seconds, self.config.segment_duration)
    }

    pub fn ladder(&self) -> &RenditionLadder {
        &self.ladder
    }

    pub fn rendition(&self, level: usize) -> Option<&Rendition> {
        self.ladder.rendition(level)
    }

    /// Bitrates in kbps of the renditions which may be selected, up to `max_quality`.
    pub fn available_bitrates(&self) -> Vec<u32> {
        self.ladder
            .renditions()
            .iter()
            .take(self.max_quality + 1)
            .map(|r| r.bitrate_kbps())
            .collect()
    }

    /// Amount of throughput samples currently considered.
    pub fn sample_count(&self) -> usize {
        self.bandwidth_history.len()
    }

    /// Reset the `AbrSession` as if no sample had been recorded and no decision taken yet.
    pub fn reset(&mut self) {
        self.bandwidth_history.clear();
        self.switch_history.clear();
        self.current_quality = self.config.initial_quality.min(self.max_quality);
        self.is_auto = true;
    }

    fn history_snapshot(&self) -> Vec<f32> {
        self.bandwidth_history.iter().copied().collect()
    }
}
