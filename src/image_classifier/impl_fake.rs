use crate::device_camera::interface::{PixelBuffer, PixelFormat};
use crate::image_classifier::interface::{Classification, ImageClassifier};
use crate::library::logger::interface::Logger;
use crate::orientation::resolver::OrientationTag;
use rand::distr::{Distribution, Uniform};
use std::sync::Arc;
use std::time::Duration;

/// Pretends to run a model: a random label with a random confidence after a short delay.
pub struct ImageClassifierFake {
    labels: Vec<String>,
    inference_time: Duration,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl ImageClassifierFake {
    pub fn new(target_label: &str, logger: Arc<dyn Logger + Send + Sync>) -> Self {
        let mut labels = vec![target_label.to_string()];
        labels.extend(
            ["sand", "grass", "water", "sky", "road"]
                .iter()
                .map(|label| label.to_string()),
        );

        Self {
            labels,
            inference_time: Duration::from_millis(80),
            logger: logger.with_namespace("image_classifier").with_namespace("fake"),
        }
    }
}

impl ImageClassifier for ImageClassifierFake {
    fn classify(
        &self,
        image: &PixelBuffer,
        orientation: OrientationTag,
    ) -> Result<Vec<Classification>, Box<dyn std::error::Error + Send + Sync>> {
        if image.bytes().is_empty() {
            return Err("empty image".into());
        }

        std::thread::sleep(self.inference_time);

        let mut rng = rand::rng();
        let index_dist = Uniform::new(0, self.labels.len())?;
        let confidence_dist = Uniform::new(0.0f32, 1.0)?;

        let classification = Classification {
            label: self.labels[index_dist.sample(&mut rng)].clone(),
            confidence: confidence_dist.sample(&mut rng),
        };

        self.logger.info(&format!(
            "{} ({:.2}) from {:?} image, exif orientation {}, brightness {:.0}",
            classification.label,
            classification.confidence,
            image.format(),
            orientation.exif_value(),
            brightness(image)
        ))?;

        Ok(vec![classification])
    }
}

/// Mean brightness in 0..=255, from the luma plane when there is one.
pub fn brightness(image: &PixelBuffer) -> f32 {
    let (sum, count) = match (image.format(), image.luma_plane()) {
        (_, Some(luma)) => (luma.iter().map(|&y| u64::from(y)).sum::<u64>(), luma.len()),
        (PixelFormat::Bgra8, None) => {
            let pixels = image.bytes().chunks_exact(4);
            let count = pixels.len();
            let sum = pixels
                .map(|bgra| (u64::from(bgra[0]) + u64::from(bgra[1]) + u64::from(bgra[2])) / 3)
                .sum::<u64>();
            (sum, count)
        }
        (PixelFormat::Yuv420BiPlanarFullRange, None) => (0, 0),
    };

    if count == 0 {
        return 0.0;
    }
    sum as f32 / count as f32
}
