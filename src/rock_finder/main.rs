use crate::config::Config;
use crate::device_camera::interface::{DeviceCamera, Frame, FrameDelivery};
use crate::error::PipelineError;
use crate::image_classifier::interface::ImageClassifier;
use crate::library::logger::interface::Logger;
use crate::orientation::resolver::resolve;
use crate::presentation::interface::PresentationSink;
use crate::rock_finder::core::{init, transition, Model, Msg};
use crate::stability_filter::core::StableState;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::{Arc, Mutex};

/// Classifies camera frames and reports whether a rock is in view.
///
/// Frames arrive on the camera's thread through [`RockFinder::on_frame`]. Everything
/// that touches the model, including the debounce counter, happens on whichever
/// thread drives [`RockFinder::run`] (or `process_next`); classification runs on
/// worker threads and reports back through the same queue.
#[derive(Clone)]
pub struct RockFinder {
    pub model: Arc<Mutex<Model>>,
    pub displayed: Arc<Mutex<StableState>>,
    pub event_sender: Sender<Msg>,
    pub event_receiver: Arc<Mutex<Receiver<Msg>>>,
    pub config: Config,
    pub logger: Arc<dyn Logger + Send + Sync>,
    pub device_camera: Arc<dyn DeviceCamera + Send + Sync>,
    pub image_classifier: Arc<dyn ImageClassifier + Send + Sync>,
    pub presentation: Arc<Mutex<dyn PresentationSink + Send + Sync>>,
}

impl RockFinder {
    pub fn new(
        config: Config,
        logger: Arc<dyn Logger + Send + Sync>,
        device_camera: Arc<dyn DeviceCamera + Send + Sync>,
        image_classifier: Arc<dyn ImageClassifier + Send + Sync>,
        presentation: Arc<Mutex<dyn PresentationSink + Send + Sync>>,
    ) -> Self {
        let (event_sender, event_receiver) = channel();
        let (model, _) = init(&config);

        Self {
            model: Arc::new(Mutex::new(model)),
            displayed: Arc::new(Mutex::new(StableState::Clear)),
            event_sender,
            event_receiver: Arc::new(Mutex::new(event_receiver)),
            config,
            logger: logger.with_namespace("rock_finder"),
            device_camera,
            image_classifier,
            presentation,
        }
    }

    /// Never blocks and never fails; frames the pipeline can't use are dropped later.
    pub fn on_frame(&self, frame: Frame) {
        deliver(&self.event_sender, frame);
    }

    pub fn start(&self) -> Result<(), PipelineError> {
        self.send(Msg::StartRequested)?;

        let sender = self.event_sender.clone();
        let delivery: FrameDelivery = Arc::new(move |frame: Frame| deliver(&sender, frame));

        let started = self
            .device_camera
            .start(delivery)
            .map_err(|e| PipelineError::SourceUnavailable(e.to_string()));

        match &started {
            Ok(()) => {
                let _ = self.logger.info("Camera started");
            }
            Err(e) => {
                let _ = self.logger.warn(&format!("Failed to start: {}", e));
            }
        }

        self.send(Msg::SourceStartDone(started.clone()))?;
        started
    }

    /// Takes effect before returning: results still running or already queued are
    /// thrown away. The pipeline is Stopped even when the camera fails to stop.
    pub fn stop(&self) -> Result<(), PipelineError> {
        {
            let mut model = self
                .model
                .lock()
                .map_err(|_| PipelineError::StatePoisoned)?;
            let (stopped, _) = transition(&self.config, model.clone(), Msg::StopRequested);
            *model = stopped;
        }

        // Queued too, so a start still waiting in the queue can't bring the pipeline back.
        self.send(Msg::StopRequested)?;

        let stopped = self
            .device_camera
            .stop()
            .map_err(|e| PipelineError::SourceStop(e.to_string()));

        match &stopped {
            Ok(()) => {
                let _ = self.logger.info("Camera stopped");
            }
            Err(e) => {
                let _ = self.logger.warn(&format!("Failed to stop: {}", e));
            }
        }

        stopped
    }

    pub fn snapshot(&self) -> Result<Model, PipelineError> {
        let model = self
            .model
            .lock()
            .map_err(|_| PipelineError::StatePoisoned)?;
        Ok(model.clone())
    }

    pub fn send(&self, msg: Msg) -> Result<(), PipelineError> {
        self.event_sender
            .send(msg)
            .map_err(|_| PipelineError::QueueClosed)
    }
}

fn deliver(sender: &Sender<Msg>, frame: Frame) {
    let orientation = resolve(frame.device_orientation);
    let _ = sender.send(Msg::FrameDelivered { frame, orientation });
}
