use chrono::Offset;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub tick_rate: Duration,
    pub logger_timezone: chrono::FixedOffset,
    /// Label the classifier reports for the object we are looking for.
    pub target_label: String,
    /// Entries at or below this confidence are inconclusive.
    pub min_confidence: f32,
    /// Consecutive confident sightings needed before reporting the target as found.
    pub debounce_max: u8,
    /// Abandon a classification that takes longer than this. `None` waits forever.
    pub classify_timeout: Option<Duration>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tick_rate: Duration::from_millis(250),
            logger_timezone: utc(),
            target_label: "rock".to_string(),
            min_confidence: 0.80,
            debounce_max: 3,
            classify_timeout: None,
        }
    }
}

fn utc() -> chrono::FixedOffset {
    chrono::Utc.fix()
}
