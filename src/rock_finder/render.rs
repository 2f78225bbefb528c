use super::main::RockFinder;
use crate::error::PipelineError;
use crate::presentation::interface::Transition;
use crate::rock_finder::core::Model;

impl RockFinder {
    /// Tells the presentation sink about a change of the stable state. The displayed
    /// state only advances once the sink has accepted it.
    pub fn render(&self, model: &Model) -> Result<(), PipelineError> {
        let Some(state) = model.stable_state() else {
            return Ok(());
        };

        let mut displayed = self
            .displayed
            .lock()
            .map_err(|_| PipelineError::StatePoisoned)?;

        if *displayed == state {
            return Ok(());
        }

        let transition = Transition {
            from: *displayed,
            to: state,
        };

        let _ = self.logger.info(&format!(
            "{:?} -> {:?} (counter {}/{})",
            transition.from,
            transition.to,
            model.filter.counter(),
            model.filter.max()
        ));

        self.presentation
            .lock()
            .map_err(|_| PipelineError::StatePoisoned)?
            .on_transition(transition)
            .map_err(|e| PipelineError::Presentation(e.to_string()))?;

        *displayed = state;
        Ok(())
    }
}
