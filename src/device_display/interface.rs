use std::error::Error;

pub const NUM_LINES: usize = 2;
pub const CHARS_PER_LINE: usize = 16;

/// A two line character display the detection status is shown on.
pub trait DeviceDisplay: Send + Sync {
    fn init(&mut self) -> Result<(), Box<dyn Error + Send + Sync>>;

    fn clear(&mut self) -> Result<(), Box<dyn Error + Send + Sync>>;

    /// Write text to a line (0-based), truncating to the line width.
    /// Returns an error if the line number is out of range.
    fn write_line(&mut self, line: u8, text: &str) -> Result<(), Box<dyn Error + Send + Sync>>;
}

pub type DisplayBuffer = [[char; CHARS_PER_LINE]; NUM_LINES];

pub fn blank_buffer() -> DisplayBuffer {
    [[' '; CHARS_PER_LINE]; NUM_LINES]
}

pub fn write_into(
    buffer: &mut DisplayBuffer,
    line: u8,
    text: &str,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let row = buffer
        .get_mut(line as usize)
        .ok_or_else(|| format!("Invalid line number {}", line))?;

    *row = [' '; CHARS_PER_LINE];
    for (i, c) in text.chars().take(CHARS_PER_LINE).enumerate() {
        row[i] = c;
    }
    Ok(())
}
