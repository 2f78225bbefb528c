/// Physical orientation of the capture device when a frame was taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeviceOrientation {
    #[default]
    Unknown,
    /// Vertical, home button at the bottom.
    Portrait,
    /// Vertical, home button at the top.
    PortraitUpsideDown,
    /// Horizontal, home button on the right.
    LandscapeLeft,
    /// Horizontal, home button on the left.
    LandscapeRight,
    FaceUp,
    FaceDown,
}

impl DeviceOrientation {
    /// Maps the platform's raw orientation reading. Out-of-range readings are `Unknown`.
    pub fn from_raw(raw: i64) -> Self {
        match raw {
            1 => DeviceOrientation::Portrait,
            2 => DeviceOrientation::PortraitUpsideDown,
            3 => DeviceOrientation::LandscapeLeft,
            4 => DeviceOrientation::LandscapeRight,
            5 => DeviceOrientation::FaceUp,
            6 => DeviceOrientation::FaceDown,
            _ => DeviceOrientation::Unknown,
        }
    }
}

/// Image orientation tag handed to the classifier alongside the pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrientationTag {
    #[default]
    Up,
    UpMirrored,
    Down,
    Left,
}

impl OrientationTag {
    pub fn exif_value(&self) -> u8 {
        match self {
            OrientationTag::Up => 1,
            OrientationTag::UpMirrored => 2,
            OrientationTag::Down => 3,
            OrientationTag::Left => 8,
        }
    }
}

pub fn resolve(device_orientation: DeviceOrientation) -> OrientationTag {
    match device_orientation {
        DeviceOrientation::PortraitUpsideDown => OrientationTag::Left,
        DeviceOrientation::LandscapeLeft => OrientationTag::UpMirrored,
        DeviceOrientation::LandscapeRight => OrientationTag::Down,
        DeviceOrientation::Portrait => OrientationTag::Up,
        DeviceOrientation::Unknown | DeviceOrientation::FaceUp | DeviceOrientation::FaceDown => {
            OrientationTag::Up
        }
    }
}
