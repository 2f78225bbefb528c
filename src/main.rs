use config::Config;
use device_camera::impl_fake::{DeviceCameraFake, DeviceCameraFakeConfig};
use device_camera::interface::PixelFormat;
use device_display::impl_console::DeviceDisplayConsole;
use device_display::impl_gui::DeviceDisplayGui;
use image_classifier::impl_fake::ImageClassifierFake;
use library::logger::impl_console::LoggerConsole;
use presentation::impl_display::PresentationDisplay;
use presentation::interface::PresentationSink;
use rock_finder::main::RockFinder;
use std::sync::{Arc, Mutex};

mod config;
mod device_camera;
mod device_display;
mod error;
mod image_classifier;
mod library;
mod orientation;
mod presentation;
mod rock_finder;
mod stability_filter;

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config = Config::default();

    let args: Vec<String> = std::env::args().collect();
    let has_flag = |flag: &str| args.iter().any(|arg| arg == flag);

    let logger = Arc::new(LoggerConsole::new(config.logger_timezone));

    let camera_config = DeviceCameraFakeConfig {
        pixel_format: if has_flag("--bgra") {
            PixelFormat::Bgra8
        } else {
            PixelFormat::Yuv420BiPlanarFullRange
        },
        ..DeviceCameraFakeConfig::default()
    };

    let device_camera = Arc::new(DeviceCameraFake::new(camera_config, logger.clone()));

    let image_classifier = Arc::new(ImageClassifierFake::new(
        &config.target_label,
        logger.clone(),
    ));

    let presentation: Arc<Mutex<dyn PresentationSink + Send + Sync>> =
        if has_flag("--gui") {
            Arc::new(Mutex::new(PresentationDisplay::new(DeviceDisplayGui::new())?))
        } else {
            Arc::new(Mutex::new(PresentationDisplay::new(
                DeviceDisplayConsole::new(),
            )?))
        };

    let rock_finder = RockFinder::new(
        config,
        logger,
        device_camera,
        image_classifier,
        presentation,
    );

    rock_finder.start()?;

    let result = rock_finder.run();

    rock_finder.stop()?;
    result?;

    Ok(())
}
