use crate::device_display::interface::{blank_buffer, write_into, DeviceDisplay, DisplayBuffer};
use std::error::Error;

pub struct DeviceDisplayConsole {
    display_buffer: DisplayBuffer,
}

impl DeviceDisplayConsole {
    pub fn new() -> Self {
        Self {
            display_buffer: blank_buffer(),
        }
    }

    fn render_display(&self) {
        println!("┌────────────────┐");
        for row in &self.display_buffer {
            let text: String = row.iter().collect();
            println!("│{}│", text);
        }
        println!("└────────────────┘");
    }
}

impl DeviceDisplay for DeviceDisplayConsole {
    fn init(&mut self) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.render_display();
        Ok(())
    }

    fn clear(&mut self) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.display_buffer = blank_buffer();
        Ok(())
    }

    fn write_line(&mut self, line: u8, text: &str) -> Result<(), Box<dyn Error + Send + Sync>> {
        write_into(&mut self.display_buffer, line, text)?;
        self.render_display();
        Ok(())
    }
}
