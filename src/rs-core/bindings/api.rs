use crate::{
    adaptive::{
        detect_trend, estimate_qoe, get_comprehensive_recommendation, health_score,
        predict_bandwidth, predict_bandwidth_harmonic, rebuffer_probability,
        select_quality_level, select_quality_maximizing_qoe, select_quality_stable, variance_of,
        AbrConfiguration, LadderError, RenditionLadder, SwitchHistory,
    },
    session::AbrSession,
    utils::logger::Logger,
    wasm_bindgen,
};
use ::wasm_bindgen::JsError;

use super::{
    formatters::{format_recommendation_for_js, parse_levels_from_js},
    LogLevel,
};

fn to_js_error(err: LadderError) -> JsError {
    Logger::lazy_error(&|| format!("ABR: invalid configuration: {err}"));
    JsError::new(&err.to_string())
}

/// Update the maximum level of logs forwarded to the JavaScript console.
#[wasm_bindgen(js_name = setLoggerLevel)]
pub fn set_logger_level(level: LogLevel) {
    Logger::set_logger_level(level.into());
}

#[wasm_bindgen(js_name = predictBandwidth)]
pub fn js_predict_bandwidth(history: &[f32]) -> f32 {
    predict_bandwidth(history)
}

#[wasm_bindgen(js_name = predictBandwidthHarmonic)]
pub fn js_predict_bandwidth_harmonic(history: &[f32]) -> f32 {
    predict_bandwidth_harmonic(history)
}

/// Returns `1` for a rising bandwidth, `-1` for a falling one and `0` otherwise.
#[wasm_bindgen(js_name = detectBandwidthTrend)]
pub fn js_detect_bandwidth_trend(history: &[f32]) -> i32 {
    detect_trend(history).as_i32()
}

#[wasm_bindgen(js_name = bandwidthVariance)]
pub fn js_bandwidth_variance(history: &[f32]) -> f32 {
    variance_of(history)
}

#[wasm_bindgen(js_name = bufferHealth)]
pub fn js_buffer_health(buffer_seconds: f32, segment_duration: f32) -> f32 {
    health_score(buffer_seconds, segment_duration)
}

#[wasm_bindgen(js_name = rebufferProbability)]
pub fn js_rebuffer_probability(
    buffer_seconds: f32,
    download_time: f32,
    segment_duration: f32,
) -> f32 {
    rebuffer_probability(buffer_seconds, download_time, segment_duration)
}

/// Stateless quality selection over a given rendition ladder.
///
/// Only the ladder is kept between calls: throughput and switch histories are given by the
/// JavaScript-side on each call.
#[wasm_bindgen]
pub struct AbrEngine {
    ladder: RenditionLadder,
}

#[wasm_bindgen]
impl AbrEngine {
    /// Create a new `AbrEngine` from the bitrates in kbps of the renditions, from the lowest
    /// quality to the highest.
    ///
    /// Throws if that list is empty or not strictly increasing.
    #[wasm_bindgen(constructor)]
    pub fn new(bitrates_kbps: &[u32]) -> Result<AbrEngine, JsError> {
        let ladder = RenditionLadder::new(bitrates_kbps).map_err(to_js_error)?;
        Ok(Self { ladder })
    }

    /// Create a new `AbrEngine` relying on the 400 to 12000 kbps reference ladder.
    pub fn reference() -> AbrEngine {
        Self {
            ladder: RenditionLadder::reference(),
        }
    }

    #[wasm_bindgen(js_name = selectQualityLevel)]
    pub fn select_quality_level(
        &self,
        bandwidth: f32,
        buffer_seconds: f32,
        current_quality: u32,
        max_quality: i32,
    ) -> Result<u32, JsError> {
        let max_quality = self.ladder.max_quality(max_quality).map_err(to_js_error)?;
        let level = select_quality_level(
            &self.ladder,
            bandwidth,
            buffer_seconds,
            current_quality as usize,
            max_quality,
        );
        Ok(level as u32)
    }

    #[wasm_bindgen(js_name = selectQualityStable)]
    pub fn select_quality_stable(
        &self,
        bandwidth: f32,
        buffer_seconds: f32,
        current_quality: u32,
        max_quality: i32,
        switch_history: &[u32],
    ) -> Result<u32, JsError> {
        let max_quality = self.ladder.max_quality(max_quality).map_err(to_js_error)?;
        let history = SwitchHistory::from_selections(&parse_levels_from_js(switch_history));
        let level = select_quality_stable(
            &self.ladder,
            bandwidth,
            buffer_seconds,
            current_quality as usize,
            max_quality,
            &history,
        );
        Ok(level as u32)
    }

    #[wasm_bindgen(js_name = estimateQoE)]
    pub fn estimate_qoe(&self, quality_index: u32, rebuffer_prob: f32, switch_penalty: f32) -> f32 {
        estimate_qoe(
            self.ladder.len(),
            quality_index as usize,
            rebuffer_prob,
            switch_penalty,
        )
    }

    #[wasm_bindgen(js_name = selectQualityMaximizingQoE)]
    pub fn select_quality_maximizing_qoe(
        &self,
        bandwidth: f32,
        buffer_seconds: f32,
        segment_duration: f32,
        current_quality: u32,
        max_quality: i32,
    ) -> Result<u32, JsError> {
        let max_quality = self.ladder.max_quality(max_quality).map_err(to_js_error)?;
        let level = select_quality_maximizing_qoe(
            &self.ladder,
            bandwidth,
            buffer_seconds,
            segment_duration,
            current_quality as usize,
            max_quality,
        );
        Ok(level as u32)
    }

    /// Returns `[quality, confidence, rebuffer_risk, qoe]`.
    #[wasm_bindgen(js_name = getComprehensiveRecommendation)]
    pub fn get_comprehensive_recommendation(
        &self,
        history: &[f32],
        buffer_seconds: f32,
        segment_duration: f32,
        current_quality: u32,
        max_quality: i32,
    ) -> Result<Vec<f32>, JsError> {
        let max_quality = self.ladder.max_quality(max_quality).map_err(to_js_error)?;
        let recommendation = get_comprehensive_recommendation(
            &self.ladder,
            history,
            buffer_seconds,
            segment_duration,
            current_quality as usize,
            max_quality,
        );
        Ok(format_recommendation_for_js(&recommendation))
    }
}

/// `AbrSession` as seen by the JavaScript-side.
#[wasm_bindgen(js_name = AbrSession)]
pub struct JsAbrSession {
    inner: AbrSession,
}

#[wasm_bindgen(js_class = AbrSession)]
impl JsAbrSession {
    /// Create a new session switching between renditions of the given bitrates in kbps, or of
    /// the reference ladder if that list is empty.
    #[wasm_bindgen(constructor)]
    pub fn new(
        bitrates_kbps: &[u32],
        max_quality: i32,
        segment_duration: f32,
    ) -> Result<JsAbrSession, JsError> {
        let ladder = if bitrates_kbps.is_empty() {
            RenditionLadder::reference()
        } else {
            RenditionLadder::new(bitrates_kbps).map_err(to_js_error)?
        };
        let mut config = AbrConfiguration {
            max_quality,
            ..AbrConfiguration::default()
        };
        if segment_duration > 0. {
            config.segment_duration = segment_duration;
        }
        let inner = AbrSession::new(ladder, config).map_err(to_js_error)?;
        Ok(Self { inner })
    }

    #[wasm_bindgen(js_name = recordBandwidth)]
    pub fn record_bandwidth(&mut self, bandwidth_kbps: f32) {
        self.inner.record_bandwidth(bandwidth_kbps);
    }

    #[wasm_bindgen(js_name = recordDownload)]
    pub fn record_download(&mut self, duration_ms: f64, size_bytes: u32) {
        self.inner.record_download(duration_ms, size_bytes);
    }

    /// Returns `[quality, confidence, rebuffer_risk, qoe]`.
    pub fn update(&mut self, buffer_seconds: f32) -> Vec<f32> {
        format_recommendation_for_js(&self.inner.update(buffer_seconds))
    }

    #[wasm_bindgen(js_name = setQuality)]
    pub fn set_quality(&mut self, level: u32) {
        self.inner.set_quality(level as usize);
    }

    #[wasm_bindgen(js_name = setAutoMode)]
    pub fn set_auto_mode(&mut self, is_auto: bool) {
        self.inner.set_auto_mode(is_auto);
    }

    #[wasm_bindgen(js_name = isAutoMode)]
    pub fn is_auto_mode(&self) -> bool {
        self.inner.is_auto_mode()
    }

    #[wasm_bindgen(js_name = currentQuality)]
    pub fn current_quality(&self) -> u32 {
        self.inner.current_quality() as u32
    }

    #[wasm_bindgen(js_name = setMaxQuality)]
    pub fn set_max_quality(&mut self, max_quality: i32) -> Result<(), JsError> {
        self.inner.set_max_quality(max_quality).map_err(to_js_error)
    }

    #[wasm_bindgen(js_name = setSegmentDuration)]
    pub fn set_segment_duration(&mut self, segment_duration: f32) {
        self.inner.set_segment_duration(segment_duration);
    }

    #[wasm_bindgen(js_name = predictedBandwidth)]
    pub fn predicted_bandwidth(&self) -> f32 {
        self.inner.predicted_bandwidth()
    }

    pub fn trend(&self) -> i32 {
        self.inner.trend().as_i32()
    }

    #[wasm_bindgen(js_name = bufferHealth)]
    pub fn buffer_health(&self, buffer_seconds: f32) -> f32 {
        self.inner.buffer_health(buffer_seconds)
    }

    /// Video height of the rendition at `level`, if known.
    #[wasm_bindgen(js_name = renditionHeight)]
    pub fn rendition_height(&self, level: u32) -> Option<u32> {
        self.inner.rendition(level as usize).and_then(|r| r.height())
    }

    /// Bitrates in kbps of the qualities which may currently be selected, lowest first.
    #[wasm_bindgen(js_name = availableQualities)]
    pub fn available_qualities(&self) -> Vec<u32> {
        self.inner.available_bitrates()
    }

    pub fn reset(&mut self) {
        self.inner.reset();
    }
}
