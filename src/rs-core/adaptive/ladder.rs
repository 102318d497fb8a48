/// Bitrates, in kbps, of the reference rendition ladder.
const REFERENCE_BITRATES: [u32; 6] = [400, 800, 1500, 3000, 6000, 12000];

/// Video heights, in pixels, of the reference rendition ladder (from 240p to 4K).
const REFERENCE_HEIGHTS: [u32; 6] = [240, 360, 480, 720, 1080, 2160];

/// Part of the predicted bandwidth a rendition's bitrate may take to be considered affordable.
const AFFORDABILITY_FACTOR: f32 = 0.9;

/// A single fixed-bitrate tier of the rendition ladder.
#[derive(Clone, Debug, PartialEq)]
pub struct Rendition {
    index: usize,
    bitrate_kbps: u32,
    height: Option<u32>,
}

impl Rendition {
    /// Position of this `Rendition` in its ladder, `0` being the lowest quality.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn bitrate_kbps(&self) -> u32 {
        self.bitrate_kbps
    }

    /// Video height in pixels, if known. Never considered when taking decisions.
    pub fn height(&self) -> Option<u32> {
        self.height
    }
}

/// Ordered list of the renditions between which adaptive streaming can switch.
///
/// Renditions are strictly increasing in bitrate with their index, which every
/// "highest affordable rendition" scan relies on.
#[derive(Clone, Debug, PartialEq)]
pub struct RenditionLadder {
    renditions: Vec<Rendition>,
}

impl RenditionLadder {
    /// Creates a new `RenditionLadder` from the bitrates, in kbps, of each of its renditions,
    /// sorted from the lowest quality to the highest.
    pub fn new(bitrates_kbps: &[u32]) -> Result<Self, LadderError> {
        Self::with_heights(bitrates_kbps, &[])
    }

    /// Same as `new` but also associates a video height to each rendition.
    ///
    /// Renditions for which no height is found in `heights` have none.
    pub fn with_heights(bitrates_kbps: &[u32], heights: &[u32]) -> Result<Self, LadderError> {
        if bitrates_kbps.is_empty() {
            return Err(LadderError::Empty);
        }
        let mut renditions: Vec<Rendition> = Vec::with_capacity(bitrates_kbps.len());
        for (index, bitrate_kbps) in bitrates_kbps.iter().copied().enumerate() {
            if bitrate_kbps == 0 {
                return Err(LadderError::ZeroBitrate { index });
            }
            if let Some(prev) = renditions.last() {
                if bitrate_kbps <= prev.bitrate_kbps {
                    return Err(LadderError::NonMonotonic {
                        index,
                        previous_kbps: prev.bitrate_kbps,
                        bitrate_kbps,
                    });
                }
            }
            renditions.push(Rendition {
                index,
                bitrate_kbps,
                height: heights.get(index).copied(),
            });
        }
        Ok(Self { renditions })
    }

    /// The reference ladder: 400, 800, 1500, 3000, 6000 and 12000 kbps.
    pub fn reference() -> Self {
        let renditions = REFERENCE_BITRATES
            .iter()
            .zip(REFERENCE_HEIGHTS.iter())
            .enumerate()
            .map(|(index, (bitrate_kbps, height))| Rendition {
                index,
                bitrate_kbps: *bitrate_kbps,
                height: Some(*height),
            })
            .collect();
        Self { renditions }
    }

    /// Number of renditions in this ladder. Never `0`.
    pub fn len(&self) -> usize {
        self.renditions.len()
    }

    /// Index of the highest-quality rendition.
    pub fn top_level(&self) -> usize {
        self.renditions.len() - 1
    }

    pub fn renditions(&self) -> &[Rendition] {
        &self.renditions
    }

    pub fn rendition(&self, level: usize) -> Option<&Rendition> {
        self.renditions.get(level)
    }

    /// Bitrate in kbps of the rendition at `level`, `None` if there's no such rendition.
    pub fn bitrate(&self, level: usize) -> Option<f32> {
        self.renditions.get(level).map(|r| r.bitrate_kbps as f32)
    }

    /// Validate a maximum quality index asked for by a caller.
    ///
    /// A `max_quality` above the top rendition is brought back to it, a negative one is refused.
    pub fn max_quality(&self, max_quality: i32) -> Result<usize, LadderError> {
        if max_quality < 0 {
            Err(LadderError::NegativeMaxQuality(max_quality))
        } else {
            Ok((max_quality as usize).min(self.top_level()))
        }
    }

    /// Highest level, up to `max_quality`, whose bitrate fits in 90% of `bandwidth`.
    ///
    /// Returns `0` if even the lowest rendition does not fit.
    pub fn affordable_level(&self, bandwidth: f32, max_quality: usize) -> usize {
        let budget = bandwidth * AFFORDABILITY_FACTOR;
        self.renditions
            .iter()
            .take(max_quality.min(self.top_level()) + 1)
            .take_while(|r| r.bitrate_kbps as f32 <= budget)
            .last()
            .map(|r| r.index)
            .unwrap_or(0)
    }
}

impl Default for RenditionLadder {
    fn default() -> Self {
        Self::reference()
    }
}

use thiserror::Error;

/// Error encountered when configuring the rendition ladder or its bounds.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LadderError {
    #[error("The rendition ladder contains no rendition")]
    Empty,
    #[error("Rendition {index} has a bitrate of 0 kbps")]
    ZeroBitrate { index: usize },
    #[error(
        "Rendition {index} ({bitrate_kbps} kbps) is not above the previous one ({previous_kbps} kbps)"
    )]
    NonMonotonic {
        index: usize,
        previous_kbps: u32,
        bitrate_kbps: u32,
    },
    #[error("Invalid negative maximum quality: {0}")]
    NegativeMaxQuality(i32),
}
