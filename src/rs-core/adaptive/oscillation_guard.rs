use std::collections::VecDeque;

use super::{ladder::RenditionLadder, quality_selector::select_quality_level};

/// Amount of previous selections considered when looking for oscillations.
pub const SWITCH_HISTORY_LOOKBACK: usize = 5;

/// From that amount of recent selections differing from the current quality, single-step quality
/// changes are suppressed.
const OSCILLATION_THRESHOLD: usize = 3;

/// The last `SWITCH_HISTORY_LOOKBACK` quality levels selected, oldest first.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SwitchHistory {
    selections: VecDeque<usize>,
}

impl SwitchHistory {
    pub fn new() -> Self {
        Self {
            selections: VecDeque::with_capacity(SWITCH_HISTORY_LOOKBACK),
        }
    }

    /// Build a `SwitchHistory` from a list of selected levels, oldest first.
    ///
    /// Only the last `SWITCH_HISTORY_LOOKBACK` levels are kept.
    pub fn from_selections(selections: &[usize]) -> Self {
        let mut history = Self::new();
        let skipped = selections.len().saturating_sub(SWITCH_HISTORY_LOOKBACK);
        selections
            .iter()
            .skip(skipped)
            .for_each(|level| history.push(*level));
        history
    }

    /// Record a newly selected level, evicting the oldest one if the history is full.
    pub fn push(&mut self, level: usize) {
        if self.selections.len() == SWITCH_HISTORY_LOOKBACK {
            self.selections.pop_front();
        }
        self.selections.push_back(level);
    }

    pub fn len(&self) -> usize {
        self.selections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selections.is_empty()
    }

    pub fn clear(&mut self) {
        self.selections.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &usize> {
        self.selections.iter()
    }

    /// Amount of recorded selections which are not `current_quality`.
    ///
    /// Always `0` until `SWITCH_HISTORY_LOOKBACK` selections have been recorded.
    pub fn recent_switches(&self, current_quality: usize) -> usize {
        if self.selections.len() < SWITCH_HISTORY_LOOKBACK {
            return 0;
        }
        self.selections
            .iter()
            .filter(|level| **level != current_quality)
            .count()
    }
}

/// Hold `current_quality` instead of moving to `recommended` when the latter is only one level
/// away and the quality has been switching a lot recently.
///
/// Jumps of more than one level always go through.
pub fn apply_oscillation_guard(
    recommended: usize,
    current_quality: usize,
    history: &SwitchHistory,
) -> usize {
    if history.recent_switches(current_quality) >= OSCILLATION_THRESHOLD
        && recommended.abs_diff(current_quality) == 1
    {
        current_quality
    } else {
        recommended
    }
}

/// Same as `select_quality_level`, but avoids oscillating between neighboring levels.
pub fn select_quality_stable(
    ladder: &RenditionLadder,
    bandwidth: f32,
    buffer_seconds: f32,
    current_quality: usize,
    max_quality: usize,
    history: &SwitchHistory,
) -> usize {
    let recommended =
        select_quality_level(ladder, bandwidth, buffer_seconds, current_quality, max_quality);
    apply_oscillation_guard(recommended, current_quality, history)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_is_bounded() {
        let mut history = SwitchHistory::new();
        assert!(history.is_empty());
        for level in 0..8 {
            history.push(level);
        }
        assert_eq!(history.len(), SWITCH_HISTORY_LOOKBACK);
        assert_eq!(history.iter().copied().collect::<Vec<_>>(), vec![3, 4, 5, 6, 7]);
        history.clear();
        assert!(history.is_empty());
    }

    #[test]
    fn test_from_selections_keeps_the_last_ones() {
        let history = SwitchHistory::from_selections(&[9, 9, 9, 1, 2, 3, 4, 5]);
        assert_eq!(history, SwitchHistory::from_selections(&[1, 2, 3, 4, 5]));
        assert_eq!(SwitchHistory::from_selections(&[2, 3]).len(), 2);
        assert!(SwitchHistory::from_selections(&[]).is_empty());
    }

    #[test]
    fn test_recent_switches() {
        let history = SwitchHistory::from_selections(&[2, 3, 2, 3, 2]);
        assert_eq!(history.recent_switches(2), 2);
        assert_eq!(history.recent_switches(3), 3);
        assert_eq!(history.recent_switches(0), 5);
        // older selections are not considered
        let history = SwitchHistory::from_selections(&[0, 0, 0, 2, 2, 2, 2, 2]);
        assert_eq!(history.recent_switches(2), 0);
    }

    #[test]
    fn test_guard_suppresses_single_steps_when_oscillating() {
        let history = SwitchHistory::from_selections(&[3, 2, 3, 2, 3]);
        assert_eq!(apply_oscillation_guard(3, 2, &history), 2);
        assert_eq!(apply_oscillation_guard(1, 2, &history), 2);
        assert_eq!(apply_oscillation_guard(4, 2, &history), 4);
        assert_eq!(apply_oscillation_guard(0, 2, &history), 0);
        assert_eq!(apply_oscillation_guard(2, 2, &history), 2);
    }

    #[test]
    fn test_partial_history_never_suppresses() {
        let history = SwitchHistory::from_selections(&[1, 1, 1]);
        assert_eq!(history.recent_switches(2), 0);
        assert_eq!(apply_oscillation_guard(3, 2, &history), 3);
        let history = SwitchHistory::from_selections(&[1, 3, 1, 3]);
        assert_eq!(apply_oscillation_guard(1, 2, &history), 1);
        let mut history = history;
        history.push(1);
        assert_eq!(apply_oscillation_guard(1, 2, &history), 2);
    }

    #[test]
    fn test_guard_lets_changes_through_when_stable() {
        let history = SwitchHistory::from_selections(&[2, 2, 2, 3, 3]);
        assert_eq!(apply_oscillation_guard(3, 2, &history), 3);
        assert_eq!(apply_oscillation_guard(1, 2, &SwitchHistory::new()), 1);
    }

    #[test]
    fn test_select_quality_stable() {
        let ladder = RenditionLadder::reference();
        let oscillating = SwitchHistory::from_selections(&[2, 1, 2, 1, 2]);
        // a high buffer would step up from 1 to 2
        assert_eq!(select_quality_level(&ladder, 20_000., 40., 1, 5), 2);
        assert_eq!(select_quality_stable(&ladder, 20_000., 40., 1, 5, &oscillating), 1);
        // a critical buffer drops of more than one level, which is never suppressed
        let oscillating = SwitchHistory::from_selections(&[4, 3, 4, 3, 4]);
        assert_eq!(select_quality_stable(&ladder, 20_000., 1., 3, 5, &oscillating), 0);
        // without recent switches, the step is taken
        let stable = SwitchHistory::from_selections(&[1, 1, 1, 1, 1]);
        assert_eq!(select_quality_stable(&ladder, 20_000., 40., 1, 5, &stable), 2);
    }
}
