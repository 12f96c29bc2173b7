//! Floor prioritizer for bounty bosses.
//!
//! Every candidate floor is template-matched in list order and the LAST one
//! that matches is kept. Floors are listed ascending, so this picks the
//! highest floor on offer. Do not turn this into first-match.

use crate::error::AgentError;
use crate::models::catalog::Floor;
use crate::models::config::BountyConfig;
use crate::models::recognition::RecognitionRequest;
use crate::models::region::Region;
use crate::services::vision::parser::sub_node;
use crate::services::vision::{Controller, Screenshot, VisionBackend};
use tracing::{debug, info};

/// A floor chosen on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FloorPick {
    pub floor: Floor,
    pub region: Region,
}

pub struct FloorPrioritizer<'a> {
    vision: &'a dyn VisionBackend,
    controller: &'a dyn Controller,
    config: &'a BountyConfig,
}

impl<'a> FloorPrioritizer<'a> {
    pub fn new(
        vision: &'a dyn VisionBackend,
        controller: &'a dyn Controller,
        config: &'a BountyConfig,
    ) -> Self {
        Self {
            vision,
            controller,
            config,
        }
    }

    /// Template-match each floor and return the last one found
    pub fn select(
        &self,
        prefix: &str,
        floors: &[Floor],
        image: &Screenshot,
    ) -> Result<Option<FloorPick>, AgentError> {
        let mut picked = None;

        for &floor in floors {
            let request = RecognitionRequest::template(
                sub_node(prefix, floor.value()),
                Some(self.config.floor_roi),
                vec![self.config.template_for(floor.value())],
            );
            let outcome = self.vision.recognize(&request, image)?;

            match outcome.region() {
                Some(region) => {
                    debug!(%floor, %region, "floor available");
                    picked = Some(FloorPick { floor, region });
                }
                None => debug!(%floor, "floor not available"),
            }
        }

        Ok(picked)
    }

    /// Select a floor and click it. `None` when no floor is on screen.
    pub fn commit(
        &self,
        prefix: &str,
        floors: &[Floor],
        image: &Screenshot,
    ) -> Result<Option<FloorPick>, AgentError> {
        let Some(pick) = self.select(prefix, floors, image)? else {
            info!(prefix, "no floor found");
            return Ok(None);
        };

        let (x, y) = pick.region.center();
        self.controller.click(x, y)?;
        info!(floor = %pick.floor, x, y, "floor selected");

        Ok(Some(pick))
    }
}
