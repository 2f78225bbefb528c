use crate::device_camera::interface::{DeviceCamera, Frame, FrameDelivery, PixelBuffer, PixelFormat};
use crate::library::logger::interface::Logger;
use crate::orientation::resolver::DeviceOrientation;
use rand::Rng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct DeviceCameraFakeConfig {
    pub resolution_width: u32,
    pub resolution_height: u32,
    pub pixel_format: PixelFormat,
    pub frame_interval: Duration,
    /// Chance per frame that the device is turned to a random orientation.
    pub rotate_probability: f64,
}

impl Default for DeviceCameraFakeConfig {
    fn default() -> Self {
        Self {
            resolution_width: 640,
            resolution_height: 480,
            pixel_format: PixelFormat::Yuv420BiPlanarFullRange,
            frame_interval: Duration::from_millis(33),
            rotate_probability: 0.02,
        }
    }
}

pub struct DeviceCameraFake {
    config: DeviceCameraFakeConfig,
    logger: Arc<dyn Logger + Send + Sync>,
    running: Arc<AtomicBool>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl DeviceCameraFake {
    pub fn new(config: DeviceCameraFakeConfig, logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            config,
            logger: logger.with_namespace("camera").with_namespace("fake"),
            running: Arc::new(AtomicBool::new(false)),
            worker: Mutex::new(None),
        }
    }

    /// One noisy image, shared by every frame of a session.
    fn capture_pixels(&self) -> Result<PixelBuffer, Box<dyn std::error::Error + Send + Sync>> {
        let config = &self.config;
        let mut bytes =
            vec![0u8; config.pixel_format.expected_len(config.resolution_width, config.resolution_height)];
        rand::rng().fill(&mut bytes[..]);

        PixelBuffer::new(
            bytes,
            config.resolution_width,
            config.resolution_height,
            config.pixel_format,
        )
    }

    fn spawn_worker(&self, delivery: FrameDelivery) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.logger.info(&format!(
            "Starting camera at {}x{} ({:?})",
            self.config.resolution_width, self.config.resolution_height, self.config.pixel_format
        ))?;

        let pixels = self.capture_pixels()?;
        let config = self.config.clone();
        let running = self.running.clone();
        let handle = std::thread::spawn(move || {
            let mut rng = rand::rng();
            let mut device_orientation = DeviceOrientation::Portrait;

            while running.load(Ordering::SeqCst) {
                if rng.random_bool(config.rotate_probability) {
                    device_orientation = DeviceOrientation::from_raw(rng.random_range(0..=6));
                }

                delivery(Frame {
                    pixels: pixels.clone(),
                    captured_at: Instant::now(),
                    device_orientation,
                });

                std::thread::sleep(config.frame_interval);
            }
        });

        *self.worker.lock().map_err(|e| e.to_string())? = Some(handle);
        Ok(())
    }
}

impl DeviceCamera for DeviceCameraFake {
    fn start(&self, delivery: FrameDelivery) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        if self.running.swap(true, Ordering::SeqCst) {
            return Err("camera is busy".into());
        }

        let started = self.spawn_worker(delivery);
        if started.is_err() {
            self.running.store(false, Ordering::SeqCst);
        }
        started
    }

    fn stop(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.running.store(false, Ordering::SeqCst);
        self.logger.info("Stopping camera...")?;

        let handle = self.worker.lock().map_err(|e| e.to_string())?.take();
        if let Some(handle) = handle {
            if handle.join().is_err() {
                return Err("camera thread panicked".into());
            }
        }

        self.logger.info("Camera stopped")?;
        Ok(())
    }
}
