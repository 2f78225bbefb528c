use crate::config::Config;
use crate::device_camera::interface::Frame;
use crate::error::PipelineError;
use crate::image_classifier::interface::Classification;
use crate::orientation::resolver::OrientationTag;
use crate::stability_filter::core::{StabilityFilter, StableState};
use std::time::Instant;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Lifecycle {
    Stopped,
    Starting,
    Running,
}

/// The one classification currently allowed to update the filter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InFlight {
    pub request_id: u64,
    pub started_at: Instant,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Model {
    pub lifecycle: Lifecycle,
    pub filter: StabilityFilter,
    pub in_flight: Option<InFlight>,
    /// Never reused, so a result from before a restart can't match a new request.
    pub next_request_id: u64,
}

impl Model {
    pub fn new(config: &Config) -> Self {
        Self {
            lifecycle: Lifecycle::Stopped,
            filter: StabilityFilter::new(config),
            in_flight: None,
            next_request_id: 0,
        }
    }

    /// The state to show, or `None` while the pipeline isn't running.
    pub fn stable_state(&self) -> Option<StableState> {
        match self.lifecycle {
            Lifecycle::Running => Some(self.filter.state()),
            Lifecycle::Stopped | Lifecycle::Starting => None,
        }
    }

    pub fn is_current(&self, request_id: u64) -> bool {
        self.lifecycle == Lifecycle::Running
            && self
                .in_flight
                .as_ref()
                .is_some_and(|in_flight| in_flight.request_id == request_id)
    }
}

#[derive(Debug)]
pub enum Msg {
    Tick(Instant),
    StartRequested,
    SourceStartDone(Result<(), PipelineError>),
    StopRequested,
    FrameDelivered {
        frame: Frame,
        orientation: OrientationTag,
    },
    FrameClassifyDone {
        request_id: u64,
        result: Result<Vec<Classification>, Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl Msg {
    pub fn to_display_string(&self) -> String {
        match self {
            Msg::FrameDelivered { frame, orientation } => format!(
                "FrameDelivered {{ {}x{}, {:?} }}",
                frame.pixels.width(),
                frame.pixels.height(),
                orientation
            ),
            msg => format!("{:?}", msg),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    SubscribeTick,
    ClassifyFrame {
        request_id: u64,
        frame: Frame,
        orientation: OrientationTag,
    },
}

pub fn init(config: &Config) -> (Model, Vec<Effect>) {
    (Model::new(config), vec![Effect::SubscribeTick])
}

pub fn transition(config: &Config, model: Model, msg: Msg) -> (Model, Vec<Effect>) {
    match (model.lifecycle.clone(), msg) {
        (_, Msg::StopRequested) => (
            Model {
                lifecycle: Lifecycle::Stopped,
                in_flight: None,
                ..model
            },
            vec![],
        ),

        (Lifecycle::Stopped, Msg::StartRequested) => (
            Model {
                lifecycle: Lifecycle::Starting,
                in_flight: None,
                ..model
            },
            vec![],
        ),

        (Lifecycle::Starting, Msg::SourceStartDone(Ok(()))) => {
            let mut filter = model.filter;
            filter.reset();
            (
                Model {
                    lifecycle: Lifecycle::Running,
                    filter,
                    in_flight: None,
                    ..model
                },
                vec![],
            )
        }

        (Lifecycle::Starting, Msg::SourceStartDone(Err(_))) => (
            Model {
                lifecycle: Lifecycle::Stopped,
                ..model
            },
            vec![],
        ),

        (Lifecycle::Running, Msg::FrameDelivered { frame, orientation }) => {
            if model.in_flight.is_some() {
                return (model, vec![]);
            }

            let request_id = model.next_request_id;
            (
                Model {
                    in_flight: Some(InFlight {
                        request_id,
                        started_at: Instant::now(),
                    }),
                    next_request_id: request_id + 1,
                    ..model
                },
                vec![Effect::ClassifyFrame {
                    request_id,
                    frame,
                    orientation,
                }],
            )
        }

        (Lifecycle::Running, Msg::FrameClassifyDone { request_id, result }) => {
            if !model.is_current(request_id) {
                return (model, vec![]);
            }

            let mut filter = model.filter;
            match result {
                Ok(classifications) => filter.apply(&classifications),
                Err(_) => filter.apply(&[]),
            };

            (
                Model {
                    filter,
                    in_flight: None,
                    ..model
                },
                vec![],
            )
        }

        (Lifecycle::Running, Msg::Tick(now)) => {
            let timed_out = match (&model.in_flight, config.classify_timeout) {
                (Some(in_flight), Some(timeout)) => {
                    now.duration_since(in_flight.started_at) >= timeout
                }
                _ => false,
            };

            if timed_out {
                (
                    Model {
                        in_flight: None,
                        ..model
                    },
                    vec![],
                )
            } else {
                (model, vec![])
            }
        }

        // Frames outside Running and stale results end up here and are dropped.
        _ => (model, vec![]),
    }
}
