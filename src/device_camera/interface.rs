use crate::orientation::resolver::DeviceOrientation;
use std::sync::Arc;
use std::time::Instant;

/// Pixel layout agreed with the camera when it is configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    /// Full-range 8-bit luma plane followed by an interleaved, half-resolution CbCr plane.
    Yuv420BiPlanarFullRange,
    Bgra8,
}

impl PixelFormat {
    pub fn expected_len(&self, width: u32, height: u32) -> usize {
        let width = width as usize;
        let height = height as usize;
        match self {
            PixelFormat::Yuv420BiPlanarFullRange => {
                let chroma = width.div_ceil(2) * height.div_ceil(2) * 2;
                width * height + chroma
            }
            PixelFormat::Bgra8 => width * height * 4,
        }
    }
}

/// Immutable, cheaply cloned pixel data for one frame.
#[derive(Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    bytes: Arc<[u8]>,
    width: u32,
    height: u32,
    format: PixelFormat,
}

impl PixelBuffer {
    pub fn new(
        bytes: impl Into<Arc<[u8]>>,
        width: u32,
        height: u32,
        format: PixelFormat,
    ) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let bytes = bytes.into();
        let expected = format.expected_len(width, height);
        if bytes.len() != expected {
            return Err(format!(
                "{:?} buffer of {}x{} needs {} bytes, got {}",
                format,
                width,
                height,
                expected,
                bytes.len()
            )
            .into());
        }

        Ok(Self {
            bytes,
            width,
            height,
            format,
        })
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// The luma plane of a bi-planar buffer.
    pub fn luma_plane(&self) -> Option<&[u8]> {
        match self.format {
            PixelFormat::Yuv420BiPlanarFullRange => {
                Some(&self.bytes[..(self.width * self.height) as usize])
            }
            PixelFormat::Bgra8 => None,
        }
    }
}

impl std::fmt::Debug for PixelBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixelBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("format", &self.format)
            .field("len", &self.bytes.len())
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub pixels: PixelBuffer,
    pub captured_at: Instant,
    pub device_orientation: DeviceOrientation,
}

/// Called by the camera once per captured frame, on the camera's own thread.
pub type FrameDelivery = Arc<dyn Fn(Frame) + Send + Sync>;

pub trait DeviceCamera {
    /// Starts pushing frames into `delivery`. Fails when the device cannot deliver frames.
    fn start(&self, delivery: FrameDelivery) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
    fn stop(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}
