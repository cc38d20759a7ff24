/// Number of evaluator invocations made while choosing one move.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScoringCounter {
    scorings: usize,
}

impl ScoringCounter {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline(always)]
    pub fn increment(&mut self) {
        self.scorings += 1;
    }

    pub fn reset(&mut self) {
        self.scorings = 0;
    }

    pub fn get(&self) -> usize {
        self.scorings
    }
}
