use crate::error::AgentError;
use crate::models::catalog::BountyCatalog;
use crate::models::config::{BountyConfig, SearchConfig};
use crate::models::recognition::{AnalyzeResult, RecognitionRequest};
use crate::models::region::Region;
use crate::services::clock::Clock;
use crate::services::floor::FloorPrioritizer;
use crate::services::search::{SearchController, SearchOutcome};
use crate::services::vision::parser::{sub_node, unquote};
use crate::services::vision::{Controller, Screenshot, VisionBackend};
use tracing::info;

pub const BOSS_SELECTED: &str = "Boss selected";
pub const FLOOR_NOT_FOUND: &str = "Floor not found";
pub const BOUNTY_NOT_FOUND: &str = "Bounty not found";
pub const SCREENCAP_FAILED: &str = "Screencap failed";

/// Picks a bounty boss: best floor first, then scroll the boss list for it
pub struct BountySelector<'a> {
    pub vision: &'a dyn VisionBackend,
    pub controller: &'a dyn Controller,
    pub clock: &'a dyn Clock,
    pub catalog: &'a BountyCatalog,
    pub bounty: &'a BountyConfig,
    pub search: &'a SearchConfig,
}

impl<'a> BountySelector<'a> {
    /// `param` is the boss name, possibly quoted. `roi` limits the boss list
    /// search; the whole screen is searched without it.
    pub fn select(
        &self,
        prefix: &str,
        param: &str,
        roi: Option<Region>,
        image: &Screenshot,
    ) -> Result<AnalyzeResult, AgentError> {
        let name = unquote(param.trim());
        let profile = self.catalog.get(name)?;
        info!(bounty = name, floors = profile.floors.len(), "selecting bounty");

        // Floor and boss queries all hang off `prefix_<boss>`
        let node = sub_node(prefix, name);

        let prioritizer = FloorPrioritizer::new(self.vision, self.controller, self.bounty);
        if prioritizer.commit(&node, &profile.floors, image)?.is_none() {
            return Ok(AnalyzeResult::miss(FLOOR_NOT_FOUND));
        }

        // The floor click changed the screen, so the boss list starts from a fresh capture
        let request = RecognitionRequest::ocr(node, roi, profile.recognition.clone());
        let outcome = SearchController::new(self.vision, self.controller, self.clock, self.search)
            .run(&request, None)?;

        Ok(match outcome {
            SearchOutcome::Found { region, .. } => AnalyzeResult::hit(region, BOSS_SELECTED),
            SearchOutcome::TimedOut { .. } => AnalyzeResult::miss(BOUNTY_NOT_FOUND),
            SearchOutcome::CaptureUnavailable { .. } => AnalyzeResult::miss(SCREENCAP_FAILED),
        })
    }
}
