use crate::config::Config;
use crate::image_classifier::interface::Classification;

/// What the filter reports after each classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StableState {
    Found,
    Clear,
    Pending,
}

/// What a single classification result says about the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Target,
    NonTarget,
    Inconclusive,
}

/// Accumulated evidence that the target is present, always within `0..=max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebounceCounter {
    value: u8,
    max: u8,
}

impl DebounceCounter {
    /// A `max` of zero would make found and clear indistinguishable, so it is raised to one.
    pub fn new(max: u8) -> Self {
        Self {
            value: 0,
            max: max.max(1),
        }
    }

    pub fn value(&self) -> u8 {
        self.value
    }

    pub fn max(&self) -> u8 {
        self.max
    }

    pub fn increment(&mut self) {
        self.value = self.value.saturating_add(1).min(self.max);
    }

    pub fn decrement(&mut self) {
        self.value = self.value.saturating_sub(1);
    }

    pub fn reset(&mut self) {
        self.value = 0;
    }

    pub fn state(&self) -> StableState {
        if self.value == self.max {
            StableState::Found
        } else if self.value == 0 {
            StableState::Clear
        } else {
            StableState::Pending
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StabilityFilter {
    counter: DebounceCounter,
    target_label: String,
    min_confidence: f32,
}

impl StabilityFilter {
    pub fn new(config: &Config) -> Self {
        Self {
            counter: DebounceCounter::new(config.debounce_max),
            target_label: config.target_label.clone(),
            min_confidence: config.min_confidence,
        }
    }

    pub fn verdict(&self, result: &[Classification]) -> Verdict {
        let mut confident = result
            .iter()
            .filter(|c| c.confidence > self.min_confidence)
            .peekable();

        if confident.peek().is_none() {
            return Verdict::Inconclusive;
        }

        if confident.any(|c| c.label == self.target_label) {
            Verdict::Target
        } else {
            Verdict::NonTarget
        }
    }

    /// Confident sightings of the target push towards found, confident sightings of
    /// anything else push towards clear, and results with nothing confident leave the
    /// counter where it is.
    pub fn apply(&mut self, result: &[Classification]) -> StableState {
        match self.verdict(result) {
            Verdict::Target => self.counter.increment(),
            Verdict::NonTarget => self.counter.decrement(),
            Verdict::Inconclusive => {}
        }
        self.counter.state()
    }

    pub fn state(&self) -> StableState {
        self.counter.state()
    }

    pub fn counter(&self) -> u8 {
        self.counter.value()
    }

    pub fn max(&self) -> u8 {
        self.counter.max()
    }

    pub fn reset(&mut self) {
        self.counter.reset();
    }
}
