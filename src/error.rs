#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PipelineError {
    #[error("frame source unavailable: {0}")]
    SourceUnavailable(String),
    #[error("frame source failed to stop: {0}")]
    SourceStop(String),
    #[error("presentation failed: {0}")]
    Presentation(String),
    #[error("event queue closed")]
    QueueClosed,
    #[error("pipeline state lock poisoned")]
    StatePoisoned,
}
