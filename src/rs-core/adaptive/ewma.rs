/// Exponentially-weighted moving average over throughput samples.
///
/// Unlike a time-weighted average, every sample here carries the same weight: each new value
/// contributes `alpha` of the new estimate and the previous estimate the remaining `1 - alpha`.
/// The average is seeded with the first sample added, so a constant series estimates to that
/// constant whatever its length.
#[derive(Clone, Debug)]
pub struct Ewma {
    alpha: f32,
    last_estimate: Option<f32>,
}

impl Ewma {
    /// Creates a new `Ewma` where `alpha` is the weight given to each new sample.
    pub fn new(alpha: f32) -> Self {
        Self {
            alpha,
            last_estimate: None,
        }
    }

    /// Adds a new sample to the `Ewma`.
    pub fn add_sample(&mut self, val: f32) {
        let new_estimate = match self.last_estimate {
            None => val,
            Some(prev) => self.alpha * val + (1. - self.alpha) * prev,
        };
        self.last_estimate = Some(new_estimate);
    }

    /// Get the current estimate produced by the `Ewma`.
    ///
    /// Returns `0.` if no sample has been added yet.
    pub fn get_estimate(&self) -> f32 {
        self.last_estimate.unwrap_or(0.)
    }
}
