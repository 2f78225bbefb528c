use super::main::RockFinder;
use crate::error::PipelineError;
use crate::rock_finder::core::{init, transition, Model, Msg};
use std::sync::mpsc::TryRecvError;

impl RockFinder {
    /// Drives the pipeline on the calling thread. Only returns if the queue or the
    /// shared state become unusable; presentation failures are logged and retried on
    /// the next change.
    pub fn run(&self) -> Result<(), PipelineError> {
        let (_, effects) = init(&self.config);
        self.execute_effects(effects);

        loop {
            match self.process_next() {
                Ok(()) => {}
                Err(PipelineError::Presentation(e)) => {
                    let _ = self.logger.warn(&format!("Presentation failed: {}", e));
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Blocks for the next message and handles it.
    pub fn process_next(&self) -> Result<(), PipelineError> {
        let msg = self
            .event_receiver
            .lock()
            .map_err(|_| PipelineError::StatePoisoned)?
            .recv()
            .map_err(|_| PipelineError::QueueClosed)?;

        self.handle(msg)
    }

    /// Handles every message already queued without waiting for more.
    #[allow(dead_code)]
    pub fn process_pending(&self) -> Result<usize, PipelineError> {
        let mut handled = 0;
        loop {
            let next = self
                .event_receiver
                .lock()
                .map_err(|_| PipelineError::StatePoisoned)?
                .try_recv();

            match next {
                Ok(msg) => {
                    self.handle(msg)?;
                    handled += 1;
                }
                Err(TryRecvError::Empty) => return Ok(handled),
                Err(TryRecvError::Disconnected) => return Err(PipelineError::QueueClosed),
            }
        }
    }

    fn handle(&self, msg: Msg) -> Result<(), PipelineError> {
        let mut model = self
            .model
            .lock()
            .map_err(|_| PipelineError::StatePoisoned)?;

        self.log_msg(&model, &msg);

        let was_in_flight = model.in_flight.clone();
        let is_tick = matches!(msg, Msg::Tick(_));

        let (new_model, effects) = transition(&self.config, model.clone(), msg);

        if is_tick && was_in_flight.is_some() && new_model.in_flight.is_none() {
            let _ = self
                .logger
                .warn("Classification timed out, skipping frame");
        }

        *model = new_model.clone();
        drop(model);

        self.execute_effects(effects);
        self.render(&new_model)
    }

    fn log_msg(&self, model: &Model, msg: &Msg) {
        match msg {
            Msg::Tick(_) | Msg::FrameDelivered { .. } => {}
            Msg::FrameClassifyDone { request_id, result } => {
                if !model.is_current(*request_id) {
                    let _ = self.logger.info(&format!(
                        "Discarding result of request {} ({:?})",
                        request_id, model.lifecycle
                    ));
                } else {
                    match result {
                        Err(e) => {
                            let _ = self
                                .logger
                                .warn(&format!("Classification failed, skipping frame: {}", e));
                        }
                        Ok(classifications) => {
                            let _ = self.logger.info(&format!(
                                "Request {}: {:?} from {} entries",
                                request_id,
                                model.filter.verdict(classifications),
                                classifications.len()
                            ));
                        }
                    }
                }
            }
            msg => {
                let _ = self
                    .logger
                    .info(&format!("Processing message: {}", msg.to_display_string()));
            }
        }
    }
}
