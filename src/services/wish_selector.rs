//! Wish dungeon selection.
//!
//! The board shows several tiles of the same wish type at different levels.
//! Each tile goes through three recognition passes: the type label locates
//! it, a level label above it gives its level, and a stamp beside it tells
//! whether the wish is already fulfilled. The highest unfulfilled level wins.
//!
//! Ties go to the LATER tile in scan order (`>=`). Lower rows are the most
//! recently scrolled-in ones; keep it that way.

use crate::error::AgentError;
use crate::models::config::WishConfig;
use crate::models::recognition::{AnalyzeResult, RecognitionRequest, TextHit};
use crate::models::region::Region;
use crate::services::vision::parser::{parse_wish_level, parse_wish_param, sub_node, ticket_marker};
use crate::services::vision::{PipelineOverride, Screenshot, VisionBackend};
use tracing::{debug, info};

/// Why a tile was or was not taken
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CandidateVerdict {
    Eligible { level: u32, region: Region },
    /// The type label box was empty
    InvalidRegion,
    NoLevelText,
    UnparsableLevel { text: String },
    Fulfilled { level: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateReport {
    pub index: usize,
    /// Box of the wish-type label this tile was found by
    pub source: Region,
    pub verdict: CandidateVerdict,
}

/// Every tile looked at during one pass, and the winner
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionReport {
    pub candidates: Vec<CandidateReport>,
    pub best: Option<(u32, Region)>,
}

impl SelectionReport {
    pub fn eligible_count(&self) -> usize {
        self.candidates
            .iter()
            .filter(|c| matches!(c.verdict, CandidateVerdict::Eligible { .. }))
            .count()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WishOutcome {
    NoWishType,
    TicketUsedUp { slot: String },
    TypeNotFound { wish_type: String },
    Selected(SelectionReport),
}

impl WishOutcome {
    pub fn to_result(&self) -> AnalyzeResult {
        match self {
            Self::NoWishType => AnalyzeResult::miss("No wish type specified"),
            Self::TicketUsedUp { slot } => {
                AnalyzeResult::miss(format!("Ticket number '{}' already used up", slot))
            }
            Self::TypeNotFound { wish_type } => {
                AnalyzeResult::miss(format!("Wish type '{}' not found", wish_type))
            }
            Self::Selected(SelectionReport {
                best: Some((level, region)),
                ..
            }) => AnalyzeResult::hit(*region, format!("Highest level dungeon found: {}", level)),
            Self::Selected(_) => AnalyzeResult::miss("No available dungeons found for stage type"),
        }
    }
}

pub struct WishSelector<'a> {
    vision: &'a dyn VisionBackend,
    pipeline: &'a dyn PipelineOverride,
    config: &'a WishConfig,
}

impl<'a> WishSelector<'a> {
    pub fn new(
        vision: &'a dyn VisionBackend,
        pipeline: &'a dyn PipelineOverride,
        config: &'a WishConfig,
    ) -> Self {
        Self {
            vision,
            pipeline,
            config,
        }
    }

    /// Resolve `Type,slot` on the wish board.
    ///
    /// A used-up ticket slot switches the `prefix` node off so the pipeline
    /// stops coming back to it.
    pub fn select(
        &self,
        prefix: &str,
        param: &str,
        image: &Screenshot,
    ) -> Result<WishOutcome, AgentError> {
        let Some((wish_type, slot)) = parse_wish_param(param)? else {
            debug!("no wish type specified");
            return Ok(WishOutcome::NoWishType);
        };
        let marker = ticket_marker(&slot)?;

        let ticket = RecognitionRequest::ocr(
            sub_node(prefix, &slot),
            Some(self.config.ticket_roi),
            vec![marker.to_string()],
        );
        if self.vision.recognize(&ticket, image)?.best_text().is_none() {
            info!(slot = %slot, "ticket already used up, disabling {}", prefix);
            self.pipeline.override_node(prefix, false)?;
            return Ok(WishOutcome::TicketUsedUp { slot });
        }

        let board = RecognitionRequest::ocr(
            sub_node(prefix, &wish_type),
            Some(self.config.board_roi),
            vec![wish_type.clone()],
        );
        let outcome = self.vision.recognize(&board, image)?;
        if outcome.text_hits().is_empty() {
            info!(wish_type = %wish_type, "wish type not found on board");
            return Ok(WishOutcome::TypeNotFound { wish_type });
        }

        debug!(wish_type = %wish_type, count = outcome.text_hits().len(), "wish tiles found");
        let report = self.rank(prefix, outcome.text_hits(), image)?;

        match report.best {
            Some((level, region)) => info!(level, %region, "highest level wish selected"),
            None => info!(wish_type = %wish_type, "no available wish"),
        }
        Ok(WishOutcome::Selected(report))
    }

    /// Judge every tile and keep a running maximum over the eligible ones
    pub fn rank(
        &self,
        prefix: &str,
        tiles: &[TextHit],
        image: &Screenshot,
    ) -> Result<SelectionReport, AgentError> {
        let mut report = SelectionReport::default();

        for (index, tile) in tiles.iter().enumerate() {
            let verdict = self.judge(prefix, index, &tile.region, image)?;
            debug!(index, source = %tile.region, ?verdict, "wish candidate");

            if let CandidateVerdict::Eligible { level, region } = verdict {
                let replaces = match report.best {
                    Some((best, _)) => level >= best,
                    None => true,
                };
                if replaces {
                    report.best = Some((level, region));
                }
            }

            report.candidates.push(CandidateReport {
                index,
                source: tile.region,
                verdict,
            });
        }

        Ok(report)
    }

    fn judge(
        &self,
        prefix: &str,
        index: usize,
        source: &Region,
        image: &Screenshot,
    ) -> Result<CandidateVerdict, AgentError> {
        if !source.is_valid() {
            return Ok(CandidateVerdict::InvalidRegion);
        }

        let level_node = sub_node(prefix, &format!("Level_{}", index));
        let (dx, dy, dw, dh) = self.config.level_offset;
        let level_request = RecognitionRequest::ocr(
            level_node.clone(),
            Some(source.offset(dx, dy, dw, dh)),
            vec![self.config.level_pattern.clone()],
        );
        let level_outcome = self.vision.recognize(&level_request, image)?;
        let Some(label) = level_outcome.best_text() else {
            return Ok(CandidateVerdict::NoLevelText);
        };

        let level = match parse_wish_level(&label.text) {
            Ok(level) => level,
            Err(e) => {
                debug!(index, error = %e, "skipping wish with unreadable level");
                return Ok(CandidateVerdict::UnparsableLevel {
                    text: label.text.clone(),
                });
            }
        };
        let region = label.region;

        let (dx, dy, dw, dh) = self.config.fulfilled_offset;
        let stamp_request = RecognitionRequest::ocr(
            sub_node(&level_node, "Fulfilled"),
            Some(source.offset(dx, dy, dw, dh)),
            self.config.fulfilled_tokens.clone(),
        );
        if self.vision.recognize(&stamp_request, image)?.is_hit() {
            return Ok(CandidateVerdict::Fulfilled { level });
        }

        Ok(CandidateVerdict::Eligible { level, region })
    }
}
