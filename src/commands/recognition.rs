use crate::commands::context::AgentContext;
use crate::error::AgentError;
use crate::models::recognition::AnalyzeResult;
use crate::models::region::Region;
use crate::services::bounty::BountySelector;
use crate::services::rift::RiftChecker;
use crate::services::shop::ShopChecker;
use crate::services::vision::Screenshot;
use crate::services::wish_selector::WishSelector;
use base64::{engine::general_purpose, Engine as _};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Input handed over by the host pipeline for one custom recognition
#[derive(Debug, Clone)]
pub struct AnalyzeArg {
    /// Invoking node; sub-query node names are derived from it
    pub node_name: String,
    pub param: String,
    /// Node roi. The host sends `[0, 0, 0, 0]` for "whole screen", which
    /// arrives here as `None`.
    pub roi: Option<Region>,
    pub image: Screenshot,
}

impl AnalyzeArg {
    pub fn new(node_name: impl Into<String>, param: impl Into<String>, image: Screenshot) -> Self {
        Self {
            node_name: node_name.into(),
            param: param.into(),
            roi: None,
            image,
        }
    }

    pub fn with_roi(mut self, roi: Region) -> Self {
        self.roi = roi.is_valid().then_some(roi);
        self
    }

    /// Roi in the host's `[x, y, w, h]` array form
    pub fn with_roi_array(self, roi: &[i64]) -> Result<Self, AgentError> {
        let roi = Region::from_array(roi).map_err(AgentError::MalformedParam)?;
        Ok(self.with_roi(roi))
    }

    /// Build from a base64 encoded PNG/JPEG screenshot
    pub fn from_base64(
        node_name: impl Into<String>,
        param: impl Into<String>,
        image_base64: &str,
    ) -> Result<Self, AgentError> {
        let bytes = general_purpose::STANDARD
            .decode(image_base64.trim())
            .map_err(|e| AgentError::MalformedParam(format!("invalid base64 image: {}", e)))?;
        let image = image::load_from_memory(&bytes)?;
        Ok(Self::new(node_name, param, image))
    }

    fn require_roi(&self) -> Result<Region, AgentError> {
        self.roi
            .ok_or_else(|| AgentError::MissingRoi(self.node_name.clone()))
    }
}

/// Custom recognitions the agent registers with the host, by name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CustomRecognition {
    SelectBounty,
    CheckShopItem,
    SelectHighestLevelWish,
    RiftCleared,
    AllRiftCleared,
}

impl CustomRecognition {
    pub const ALL: [CustomRecognition; 5] = [
        Self::SelectBounty,
        Self::CheckShopItem,
        Self::SelectHighestLevelWish,
        Self::RiftCleared,
        Self::AllRiftCleared,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::SelectBounty => "SelectBounty",
            Self::CheckShopItem => "CheckShopItem",
            Self::SelectHighestLevelWish => "SelectHighestLevelWish",
            Self::RiftCleared => "RiftCleared",
            Self::AllRiftCleared => "AllRiftCleared",
        }
    }

    pub fn analyze(&self, ctx: &AgentContext, arg: &AnalyzeArg) -> Result<AnalyzeResult, AgentError> {
        debug!(recognition = self.name(), node = %arg.node_name, param = %arg.param, "analyze");
        let node = arg.node_name.as_str();
        let vision = ctx.vision.as_ref();

        match self {
            Self::SelectBounty => BountySelector {
                vision,
                controller: ctx.controller.as_ref(),
                clock: ctx.clock.as_ref(),
                catalog: &ctx.catalog,
                bounty: &ctx.config.bounty,
                search: &ctx.config.search,
            }
            .select(node, &arg.param, arg.roi, &arg.image),
            Self::CheckShopItem => {
                ShopChecker::new(vision, ctx.pipeline.as_ref(), &ctx.config.shop)
                    .check(node, &arg.param, arg.roi, &arg.image)
            }
            Self::SelectHighestLevelWish => {
                WishSelector::new(vision, ctx.pipeline.as_ref(), &ctx.config.wish)
                    .select(node, &arg.param, &arg.image)
                    .map(|outcome| outcome.to_result())
            }
            Self::RiftCleared => {
                let roi = arg.require_roi()?;
                RiftChecker::new(vision, &ctx.config.rift)
                    .progress(node, roi, &arg.image)
                    .map(|progress| progress.to_result())
            }
            Self::AllRiftCleared => {
                let roi = arg.require_roi()?;
                RiftChecker::new(vision, &ctx.config.rift).all_cleared(node, roi, &arg.image)
            }
        }
    }
}

impl FromStr for CustomRecognition {
    type Err = AgentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|r| r.name() == s)
            .ok_or_else(|| AgentError::UnknownHandler(s.to_string()))
    }
}

impl fmt::Display for CustomRecognition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Resolve a recognition by its registered name and run it
pub fn run_recognition(
    ctx: &AgentContext,
    name: &str,
    arg: &AnalyzeArg,
) -> Result<AnalyzeResult, AgentError> {
    let recognition: CustomRecognition = name.parse()?;
    let result = recognition.analyze(ctx, arg)?;
    debug!(recognition = name, hit = result.is_hit(), detail = %result.detail, "analyze done");
    Ok(result)
}
