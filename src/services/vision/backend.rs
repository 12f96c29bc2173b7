use crate::error::AgentError;
use crate::models::recognition::{RecognitionOutcome, RecognitionRequest};
use image::DynamicImage;

/// A captured frame of the game client
pub type Screenshot = DynamicImage;

/// A capture with no pixels is treated as a failed capture
pub fn is_valid_screenshot(image: &Screenshot) -> bool {
    image.width() > 0 && image.height() > 0
}

/// Vision backend - template matching and OCR live behind this.
///
/// A returned `Ok` means the pass ran; whether it matched is in the outcome.
pub trait VisionBackend: Send + Sync {
    fn recognize(
        &self,
        request: &RecognitionRequest,
        image: &Screenshot,
    ) -> Result<RecognitionOutcome, AgentError>;
}

/// Device layer. Every call blocks until the device acknowledges it.
pub trait Controller: Send + Sync {
    fn capture_screen(&self) -> Result<Screenshot, AgentError>;

    fn click(&self, x: i32, y: i32) -> Result<(), AgentError>;

    fn swipe(&self, from: (i32, i32), to: (i32, i32), duration_ms: u64) -> Result<(), AgentError>;
}

/// Host pipeline hook for switching nodes on and off
pub trait PipelineOverride: Send + Sync {
    fn override_node(&self, node: &str, enabled: bool) -> Result<(), AgentError>;
}
