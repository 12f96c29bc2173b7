pub mod commands;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;

#[cfg(test)]
mod testing;

pub use commands::{
    run_action, run_recognition, AgentContext, AnalyzeArg, CustomAction, CustomRecognition, RunArg,
};
pub use error::AgentError;
pub use models::config::AgentConfig;
pub use models::recognition::{AnalyzeResult, RunResult};
pub use models::region::Region;
pub use services::config::ConfigManager;
pub use services::pipeline::NodeOverrides;
pub use services::vision::{Controller, HttpVisionBackend, PipelineOverride, Screenshot, VisionBackend};

/// Load the saved config, install logging and build a context around the
/// HTTP vision backend.
pub fn init(
    controller: std::sync::Arc<dyn Controller>,
    pipeline: std::sync::Arc<dyn PipelineOverride>,
) -> Result<AgentContext, AgentError> {
    let config = ConfigManager::new()?.load()?;
    utils::logger::init(&config.logging)?;
    tracing::info!(
        backend = %config.backend.base_url,
        recognitions = CustomRecognition::ALL.len(),
        actions = CustomAction::ALL.len(),
        "agent initialized"
    );
    AgentContext::from_config(config, controller, pipeline)
}
