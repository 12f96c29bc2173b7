pub mod backend;
pub mod http_backend;
pub mod parser;

// Re-export main types
pub use backend::{is_valid_screenshot, Controller, PipelineOverride, Screenshot, VisionBackend};
pub use http_backend::HttpVisionBackend;
