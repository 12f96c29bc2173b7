//! Scan-and-scroll search.
//!
//! Looks for a text target in a scrolling list: recognize the current frame,
//! swipe on a miss, let the list settle, capture again. The loop is bounded by
//! a wall-clock deadline checked between steps; a failed capture costs time
//! but never a swipe.

use crate::error::AgentError;
use crate::models::config::SearchConfig;
use crate::models::recognition::RecognitionRequest;
use crate::models::region::Region;
use crate::services::clock::Clock;
use crate::services::vision::{is_valid_screenshot, Controller, Screenshot, VisionBackend};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Counters for one search run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchState {
    pub elapsed: Duration,
    /// Recognition passes run
    pub iterations: u32,
    pub swipes: u32,
    pub transient_failures: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    Found { region: Region, state: SearchState },
    /// Frames were recognized but the target never showed up
    TimedOut { state: SearchState },
    /// Every capture failed; nothing was ever recognized
    CaptureUnavailable { state: SearchState },
}

impl SearchOutcome {
    pub fn region(&self) -> Option<Region> {
        match self {
            Self::Found { region, .. } => Some(*region),
            _ => None,
        }
    }

    pub fn state(&self) -> &SearchState {
        match self {
            Self::Found { state, .. }
            | Self::TimedOut { state }
            | Self::CaptureUnavailable { state } => state,
        }
    }
}

enum Step {
    Recognize(Screenshot),
    Settle,
    Capture,
}

pub struct SearchController<'a> {
    vision: &'a dyn VisionBackend,
    controller: &'a dyn Controller,
    clock: &'a dyn Clock,
    config: &'a SearchConfig,
}

impl<'a> SearchController<'a> {
    pub fn new(
        vision: &'a dyn VisionBackend,
        controller: &'a dyn Controller,
        clock: &'a dyn Clock,
        config: &'a SearchConfig,
    ) -> Self {
        Self {
            vision,
            controller,
            clock,
            config,
        }
    }

    /// Search until `request` hits or the deadline passes.
    ///
    /// With an `initial` frame the first pass runs on it right away; without
    /// one the loop starts by settling and capturing.
    pub fn run(
        &self,
        request: &RecognitionRequest,
        initial: Option<Screenshot>,
    ) -> Result<SearchOutcome, AgentError> {
        let started = self.clock.now();
        let deadline = started + Duration::from_millis(self.config.timeout_ms);
        // A zero interval would never move a polling clock forward
        let interval = Duration::from_millis(self.config.interval_ms.max(1));
        let swipe = self.config.swipe;

        let mut state = SearchState::default();
        let mut step = match initial {
            Some(image) if is_valid_screenshot(&image) => Step::Recognize(image),
            _ => Step::Settle,
        };

        loop {
            step = match step {
                Step::Recognize(image) => {
                    state.iterations += 1;
                    let outcome = self.vision.recognize(request, &image)?;

                    if let Some(region) = outcome.region() {
                        state.elapsed = self.clock.now().duration_since(started);
                        info!(node = %request.node, %region, iterations = state.iterations, "target found");
                        return Ok(SearchOutcome::Found { region, state });
                    }

                    debug!(node = %request.node, iteration = state.iterations, "target not found, swiping to next");
                    self.controller
                        .swipe(swipe.from, swipe.to, swipe.duration_ms)?;
                    state.swipes += 1;
                    Step::Settle
                }
                Step::Settle => {
                    let now = self.clock.now();
                    if now >= deadline {
                        break;
                    }
                    self.clock.sleep(interval.min(deadline - now));
                    if self.clock.now() >= deadline {
                        break;
                    }
                    Step::Capture
                }
                Step::Capture => match self.controller.capture_screen() {
                    Ok(image) if is_valid_screenshot(&image) => Step::Recognize(image),
                    Ok(_) => {
                        state.transient_failures += 1;
                        warn!(node = %request.node, "screencap returned an empty frame, retrying");
                        Step::Settle
                    }
                    Err(e) => {
                        state.transient_failures += 1;
                        warn!(node = %request.node, error = %e, "screencap failed, retrying");
                        Step::Settle
                    }
                },
            };
        }

        state.elapsed = self.clock.now().duration_since(started);
        if state.iterations == 0 {
            info!(node = %request.node, failures = state.transient_failures, "no usable frame before timeout");
            return Ok(SearchOutcome::CaptureUnavailable { state });
        }

        info!(node = %request.node, swipes = state.swipes, "target not found after timeout");
        Ok(SearchOutcome::TimedOut { state })
    }
}
