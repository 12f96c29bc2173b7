use crate::error::AgentError;
use crate::models::catalog::BountyCatalog;
use crate::models::config::AgentConfig;
use crate::services::clock::{Clock, SystemClock};
use crate::services::vision::{Controller, HttpVisionBackend, PipelineOverride, VisionBackend};
use std::sync::Arc;

/// Everything a custom recognition or action needs for one session.
///
/// Collaborators are shared handles; the config and catalog are fixed once
/// the context is built.
#[derive(Clone)]
pub struct AgentContext {
    pub vision: Arc<dyn VisionBackend>,
    pub controller: Arc<dyn Controller>,
    pub pipeline: Arc<dyn PipelineOverride>,
    pub clock: Arc<dyn Clock>,
    pub config: AgentConfig,
    pub catalog: BountyCatalog,
}

impl AgentContext {
    /// Context with default config, the built-in catalog and the system clock
    pub fn new(
        vision: Arc<dyn VisionBackend>,
        controller: Arc<dyn Controller>,
        pipeline: Arc<dyn PipelineOverride>,
    ) -> Self {
        Self {
            vision,
            controller,
            pipeline,
            clock: Arc::new(SystemClock),
            config: AgentConfig::default(),
            catalog: BountyCatalog::builtin(),
        }
    }

    /// Context talking to the HTTP vision server named in `config`
    pub fn from_config(
        config: AgentConfig,
        controller: Arc<dyn Controller>,
        pipeline: Arc<dyn PipelineOverride>,
    ) -> Result<Self, AgentError> {
        let vision = Arc::new(HttpVisionBackend::new(&config.backend)?);
        Self::new(vision, controller, pipeline).with_config(config)
    }

    /// Replace the config; bounty entries in it are merged into the catalog
    pub fn with_config(mut self, config: AgentConfig) -> Result<Self, AgentError> {
        self.catalog = BountyCatalog::with_overrides(&config.bounties)?;
        self.config = config;
        Ok(self)
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }
}
