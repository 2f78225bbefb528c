use crate::presentation::interface::{PresentationSink, Transition};
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex};

#[derive(Clone, Default)]
pub struct PresentationFake {
    transitions: Arc<Mutex<Vec<Transition>>>,
    notify: Option<Sender<Transition>>,
    fail: bool,
}

impl PresentationFake {
    #[allow(dead_code)]
    pub fn new() -> Self {
        Self::default()
    }

    #[allow(dead_code)]
    pub fn with_notify(notify: Sender<Transition>) -> Self {
        Self {
            notify: Some(notify),
            ..Self::default()
        }
    }

    #[allow(dead_code)]
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    #[allow(dead_code)]
    pub fn transitions(&self) -> Vec<Transition> {
        match self.transitions.lock() {
            Ok(transitions) => transitions.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl PresentationSink for PresentationFake {
    fn on_transition(
        &mut self,
        transition: Transition,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        if self.fail {
            return Err("display unplugged".into());
        }
        self.transitions
            .lock()
            .map_err(|e| e.to_string())?
            .push(transition);
        if let Some(notify) = &self.notify {
            let _ = notify.send(transition);
        }
        Ok(())
    }
}
