use super::main::RockFinder;
use crate::rock_finder::core::{Effect, Msg};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;

impl RockFinder {
    pub fn execute_effect(&self, effect: Effect) {
        match effect {
            Effect::SubscribeTick => self.subscribe_tick(),
            Effect::ClassifyFrame {
                request_id,
                frame,
                orientation,
            } => {
                let result = catch_unwind(AssertUnwindSafe(|| {
                    self.image_classifier.classify(&frame.pixels, orientation)
                }))
                .unwrap_or_else(|_| Err("classifier panicked".into()));

                // The frame must not outlive the classification call.
                drop(frame);

                let _ = self.send(Msg::FrameClassifyDone { request_id, result });
            }
        }
    }

    pub fn execute_effects(&self, effects: Vec<Effect>) {
        for effect in effects {
            let self_clone = self.clone();
            std::thread::spawn(move || self_clone.execute_effect(effect));
        }
    }

    /// Ticks until every handle to this pipeline has been dropped. The tick thread
    /// only holds the sender and a weak reference to the queue.
    fn subscribe_tick(&self) {
        let sender = self.event_sender.clone();
        let queue = Arc::downgrade(&self.event_receiver);
        let tick_rate = self.config.tick_rate;

        std::thread::spawn(move || loop {
            std::thread::sleep(tick_rate);
            if queue.strong_count() == 0 || sender.send(Msg::Tick(Instant::now())).is_err() {
                break;
            }
        });
    }
}
