use crate::stability_filter::core::StableState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: StableState,
    pub to: StableState,
}

/// Receives every change of the reported stable state.
pub trait PresentationSink: Send + Sync {
    fn on_transition(
        &mut self,
        transition: Transition,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}
