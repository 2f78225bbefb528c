use crate::device_display::interface::{blank_buffer, write_into, DeviceDisplay, DisplayBuffer};
use eframe::egui;
use std::error::Error;
use std::sync::{Arc, Mutex};
use std::thread;

#[derive(Clone)]
struct DisplayWindow {
    display_buffer: Arc<Mutex<DisplayBuffer>>,
}

impl eframe::App for DisplayWindow {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let rows: Vec<String> = match self.display_buffer.lock() {
            Ok(buffer) => buffer.iter().map(|row| row.iter().collect()).collect(),
            Err(_) => return,
        };

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(20.0);

                let rect = ui.available_rect_before_wrap();
                ui.painter()
                    .rect_filled(rect, 0.0, egui::Color32::from_rgb(20, 20, 60));
                ui.painter().rect_stroke(
                    rect,
                    0.0,
                    egui::Stroke::new(2.0, egui::Color32::from_rgb(100, 100, 100)),
                );

                for text in rows {
                    ui.label(
                        egui::RichText::new(text)
                            .monospace()
                            .color(egui::Color32::YELLOW)
                            .size(24.0),
                    );
                }
            });
        });

        ctx.request_repaint_after(std::time::Duration::from_millis(100));
    }
}

pub struct DeviceDisplayGui {
    display_buffer: Arc<Mutex<DisplayBuffer>>,
}

impl DeviceDisplayGui {
    pub fn new() -> Self {
        Self {
            display_buffer: Arc::new(Mutex::new(blank_buffer())),
        }
    }
}

impl DeviceDisplay for DeviceDisplayGui {
    fn init(&mut self) -> Result<(), Box<dyn Error + Send + Sync>> {
        let display_buffer = self.display_buffer.clone();

        // Spawn the window in a separate thread
        thread::spawn(move || {
            let options = eframe::NativeOptions {
                viewport: egui::ViewportBuilder::default()
                    .with_inner_size([400.0, 200.0])
                    .with_resizable(false),
                ..Default::default()
            };

            let window = DisplayWindow { display_buffer };

            // This will block in the new thread until the window is closed
            let _ = eframe::run_native("Rock Finder", options, Box::new(|_cc| Box::new(window)));
        });

        Ok(())
    }

    fn clear(&mut self) -> Result<(), Box<dyn Error + Send + Sync>> {
        let mut buffer = self.display_buffer.lock().map_err(|e| e.to_string())?;
        *buffer = blank_buffer();
        Ok(())
    }

    fn write_line(&mut self, line: u8, text: &str) -> Result<(), Box<dyn Error + Send + Sync>> {
        let mut buffer = self.display_buffer.lock().map_err(|e| e.to_string())?;
        write_into(&mut buffer, line, text)
    }
}
