//! Rift progress checks.
//!
//! A rift card shows the best floor reached ("Floor 28") and, once rewards
//! were collected, the floor claimed through ("Claimed 25F"). Rewards are
//! pending while claimed < best. Both markers are read from the same roi.

use crate::error::AgentError;
use crate::models::config::RiftConfig;
use crate::models::recognition::{AnalyzeResult, RecognitionRequest};
use crate::models::region::Region;
use crate::services::vision::parser::{parse_best_floor, parse_claimed_floor, sub_node};
use crate::services::vision::{Screenshot, VisionBackend};
use tracing::info;

/// Progress of a single rift
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiftProgress {
    BestFloorMissing,
    BestFloorUnreadable,
    /// Nothing claimed yet
    Unclaimed { best: u32, region: Region },
    ClaimedUnreadable { best: u32 },
    Pending { best: u32, claimed: u32, region: Region },
    Cleared { best: u32, claimed: u32 },
}

impl RiftProgress {
    pub fn to_result(&self) -> AnalyzeResult {
        match self {
            Self::BestFloorMissing => AnalyzeResult::miss("Best floor not found"),
            Self::BestFloorUnreadable => AnalyzeResult::miss("Could not parse best floor number"),
            Self::Unclaimed { region, .. } => AnalyzeResult::hit(*region, "Rift not cleared"),
            Self::ClaimedUnreadable { .. } => {
                AnalyzeResult::miss("Could not parse claimed floor number")
            }
            Self::Pending { region, .. } => {
                AnalyzeResult::hit(*region, "Rift not cleared - has unclaimed rewards")
            }
            Self::Cleared { .. } => AnalyzeResult::miss("Rift is cleared"),
        }
    }
}

pub struct RiftChecker<'a> {
    vision: &'a dyn VisionBackend,
    config: &'a RiftConfig,
}

impl<'a> RiftChecker<'a> {
    pub fn new(vision: &'a dyn VisionBackend, config: &'a RiftConfig) -> Self {
        Self { vision, config }
    }

    /// Compare best floor against claimed floor on one rift card
    pub fn progress(
        &self,
        prefix: &str,
        roi: Region,
        image: &Screenshot,
    ) -> Result<RiftProgress, AgentError> {
        let best_request = RecognitionRequest::ocr(
            sub_node(prefix, "BestFloor"),
            Some(roi),
            vec![self.config.best_floor_token.clone()],
        );
        let best_outcome = self.vision.recognize(&best_request, image)?;
        let Some(best_hit) = best_outcome.best_text() else {
            info!(node = prefix, "best floor not found");
            return Ok(RiftProgress::BestFloorMissing);
        };
        let Ok(best) = parse_best_floor(&best_hit.text) else {
            info!(node = prefix, text = %best_hit.text, "could not parse best floor");
            return Ok(RiftProgress::BestFloorUnreadable);
        };
        let region = best_hit.region;

        let claimed_request = RecognitionRequest::ocr(
            sub_node(prefix, "ClaimedFloor"),
            Some(roi),
            vec![self.config.claimed_token.clone()],
        );
        let claimed_outcome = self.vision.recognize(&claimed_request, image)?;
        let Some(claimed_hit) = claimed_outcome.best_text() else {
            info!(node = prefix, best, "no claimed floor, rewards pending");
            return Ok(RiftProgress::Unclaimed { best, region });
        };
        let Ok(claimed) = parse_claimed_floor(&claimed_hit.text) else {
            info!(node = prefix, text = %claimed_hit.text, "could not parse claimed floor");
            return Ok(RiftProgress::ClaimedUnreadable { best });
        };

        if claimed < best {
            info!(node = prefix, claimed, best, "rift not cleared, claimed {}F < best {}F", claimed, best);
            return Ok(RiftProgress::Pending {
                best,
                claimed,
                region,
            });
        }

        info!(node = prefix, claimed, best, "rift is cleared");
        Ok(RiftProgress::Cleared { best, claimed })
    }

    /// Whole-board check: every rift carries a claimed marker
    pub fn all_cleared(
        &self,
        prefix: &str,
        roi: Region,
        image: &Screenshot,
    ) -> Result<AnalyzeResult, AgentError> {
        let node = sub_node(prefix, "ClaimedFloor");
        let request = RecognitionRequest::ocr(
            node.clone(),
            Some(roi),
            vec![self.config.claimed_token.clone()],
        );
        let outcome = self.vision.recognize(&request, image)?;
        let claimed = outcome.hit_count();

        match outcome.region() {
            Some(region) if claimed >= self.config.expected_cleared => {
                info!(node = %node, claimed, "all rifts are cleared");
                Ok(AnalyzeResult::hit(region, "All rifts are cleared"))
            }
            _ => {
                info!(node = %node, claimed, expected = self.config.expected_cleared, "not all rifts are cleared");
                Ok(AnalyzeResult::miss("All rifts are not cleared"))
            }
        }
    }
}
