use crate::device_camera::interface::PixelBuffer;
use crate::orientation::resolver::OrientationTag;

#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub label: String,
    pub confidence: f32,
}

impl Classification {
    pub fn new(label: &str, confidence: f32) -> Self {
        Self {
            label: label.to_string(),
            confidence,
        }
    }
}

pub trait ImageClassifier {
    fn classify(
        &self,
        image: &PixelBuffer,
        orientation: OrientationTag,
    ) -> Result<Vec<Classification>, Box<dyn std::error::Error + Send + Sync>>;
}
