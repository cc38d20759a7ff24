use log::debug;
use serde::{Deserialize, Serialize};

/// Opening moves (full-move number) searched at the minimum depth.
const OPENING_FULLMOVES: u16 = 2;

/// Search depth for one decision: either fixed, or tuned between calls from
/// the number of evaluator invocations the previous decision needed.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DepthPolicy {
    Fixed(u8),
    Adaptive(AdaptiveDepth),
}

impl DepthPolicy {
    /// Depth to use for the next search.
    pub fn prepare(&mut self, fullmove_number: u16) -> u8 {
        match self {
            DepthPolicy::Fixed(depth) => *depth,
            DepthPolicy::Adaptive(adaptive) => adaptive.prepare(fullmove_number),
        }
    }

    /// Feeds back the scoring count of the search that just finished.
    pub fn record(&mut self, scorings: usize) {
        if let DepthPolicy::Adaptive(adaptive) = self {
            adaptive.record(scorings);
        }
    }

    pub fn current_depth(&self) -> u8 {
        match self {
            DepthPolicy::Fixed(depth) => *depth,
            DepthPolicy::Adaptive(adaptive) => adaptive.depth,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AdaptiveDepth {
    pub depth: u8,
    pub min_depth: u8,
    #[serde(default = "default_max_depth")]
    pub max_depth: u8,
    pub scoring_threshold: usize,
}

fn default_max_depth() -> u8 {
    8
}

impl AdaptiveDepth {
    pub fn new(min_depth: u8, scoring_threshold: usize) -> Self {
        let min_depth = min_depth.max(1);
        Self {
            depth: min_depth,
            min_depth,
            max_depth: default_max_depth().max(min_depth),
            scoring_threshold,
        }
    }

    pub fn prepare(&mut self, fullmove_number: u16) -> u8 {
        if fullmove_number <= OPENING_FULLMOVES {
            self.depth = self.min_depth;
        }
        self.depth = self.depth.max(self.min_depth).max(1);
        self.depth
    }

    /// Shrinks the depth when the last search went over the threshold, and
    /// grows it when the projected count one ply deeper, `n^((d+2)/d)`, stays
    /// under it.
    pub fn record(&mut self, scorings: usize) {
        if scorings > self.scoring_threshold {
            if self.depth > self.min_depth {
                self.depth -= 1;
                debug!("{} scorings, reducing depth to {}", scorings, self.depth);
            }
            return;
        }

        let depth = f64::from(self.depth.max(1));
        let projected = (scorings as f64).powf((depth + 2.0) / depth);
        debug!("{} scorings, projecting {:.0} one ply deeper", scorings, projected);
        if projected < self.scoring_threshold as f64 && self.depth < self.max_depth {
            self.depth += 1;
            debug!("increasing depth to {}", self.depth);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_depth_resets_during_opening() {
        let mut adaptive = AdaptiveDepth::new(2, 10_000);
        adaptive.depth = 4;
        assert_eq!(adaptive.prepare(1), 2);

        adaptive.depth = 4;
        assert_eq!(adaptive.prepare(3), 4);
    }

    #[test]
    fn test_depth_drops_over_threshold() {
        let mut adaptive = AdaptiveDepth::new(2, 10_000);
        adaptive.depth = 3;
        adaptive.record(20_000);
        assert_eq!(adaptive.depth, 2);

        // never below the minimum
        adaptive.record(20_000);
        assert_eq!(adaptive.depth, 2);
    }

    #[test]
    fn test_depth_grows_when_projection_fits() {
        let mut adaptive = AdaptiveDepth::new(2, 10_000);
        // 50^2 = 2500 < 10000
        adaptive.record(50);
        assert_eq!(adaptive.depth, 3);

        // 500^(5/3) is roughly 31500 > 10000
        adaptive.record(500);
        assert_eq!(adaptive.depth, 3);
    }

    #[test]
    fn test_depth_is_capped() {
        let mut adaptive = AdaptiveDepth::new(2, 10_000);
        adaptive.max_depth = 3;
        adaptive.record(1);
        adaptive.record(1);
        adaptive.record(1);
        assert_eq!(adaptive.depth, 3);
    }

    #[test]
    fn test_fixed_policy_ignores_feedback() {
        let mut policy = DepthPolicy::Fixed(3);
        policy.record(1);
        assert_eq!(policy.prepare(1), 3);
        assert_eq!(policy.current_depth(), 3);
    }
}
