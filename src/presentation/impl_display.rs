use crate::device_display::interface::DeviceDisplay;
use crate::presentation::interface::{PresentationSink, Transition};
use crate::stability_filter::core::StableState;

pub const FOUND_TEXT: &str = "Rock found!";
pub const CLEAR_TEXT: &str = "Good to go!";
pub const PENDING_TEXT: &str = "Checking...";

/// Shows the stable state on a character display. While pending, the headline
/// keeps whatever it said last and only the status line changes.
pub struct PresentationDisplay<D: DeviceDisplay> {
    device_display: D,
}

impl<D: DeviceDisplay> PresentationDisplay<D> {
    pub fn new(
        mut device_display: D,
    ) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        device_display.init()?;
        device_display.clear()?;
        device_display.write_line(0, CLEAR_TEXT)?;
        Ok(Self { device_display })
    }

    #[allow(dead_code)]
    pub fn device_display(&self) -> &D {
        &self.device_display
    }
}

impl<D: DeviceDisplay> PresentationSink for PresentationDisplay<D> {
    fn on_transition(
        &mut self,
        transition: Transition,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        match transition.to {
            StableState::Found => {
                self.device_display.write_line(0, FOUND_TEXT)?;
                self.device_display.write_line(1, "")?;
            }
            StableState::Clear => {
                self.device_display.write_line(0, CLEAR_TEXT)?;
                self.device_display.write_line(1, "")?;
            }
            StableState::Pending => {
                self.device_display.write_line(1, PENDING_TEXT)?;
            }
        }
        Ok(())
    }
}
