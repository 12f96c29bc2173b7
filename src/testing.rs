//! Scripted collaborators for unit tests.

use crate::error::AgentError;
use crate::models::recognition::{
    RecognitionOutcome, RecognitionRequest, TemplateHit, TextHit,
};
use crate::models::region::Region;
use crate::services::clock::Clock;
use crate::services::vision::{Controller, Screenshot, VisionBackend};
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::time::{Duration, Instant};

pub fn text_hit(text: &str, region: Region) -> TextHit {
    TextHit {
        text: text.to_string(),
        region,
        score: 0.9,
    }
}

/// OCR outcome with a single hit
pub fn ocr_hit(text: &str, region: Region) -> RecognitionOutcome {
    RecognitionOutcome::ocr(vec![text_hit(text, region)])
}

pub fn ocr_hits(hits: Vec<TextHit>) -> RecognitionOutcome {
    RecognitionOutcome::ocr(hits)
}

pub fn template_hit(region: Region) -> RecognitionOutcome {
    RecognitionOutcome::template(vec![TemplateHit {
        template: "template.png".to_string(),
        region,
        score: 0.9,
    }])
}

pub fn frame() -> Screenshot {
    Screenshot::new_rgba8(4, 4)
}

enum Reply {
    Outcome(RecognitionOutcome),
    Fail(String),
}

/// Vision backend answering per node name.
/// A node with a sequence replays it in order and then repeats the last reply;
/// an unscripted node misses.
#[derive(Default)]
pub struct ScriptedVision {
    scripts: Mutex<HashMap<String, VecDeque<Reply>>>,
    calls: Mutex<Vec<RecognitionRequest>>,
}

impl ScriptedVision {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(self, node: &str, outcome: RecognitionOutcome) -> Self {
        self.on_seq(node, vec![outcome])
    }

    pub fn on_seq(self, node: &str, outcomes: Vec<RecognitionOutcome>) -> Self {
        self.scripts.lock().insert(
            node.to_string(),
            outcomes.into_iter().map(Reply::Outcome).collect(),
        );
        self
    }

    pub fn failing(self, node: &str, message: &str) -> Self {
        self.scripts.lock().insert(
            node.to_string(),
            VecDeque::from([Reply::Fail(message.to_string())]),
        );
        self
    }

    pub fn calls(&self) -> Vec<RecognitionRequest> {
        self.calls.lock().clone()
    }

    pub fn call_nodes(&self) -> Vec<String> {
        self.calls.lock().iter().map(|c| c.node.clone()).collect()
    }

    pub fn calls_for(&self, node: &str) -> Vec<RecognitionRequest> {
        self.calls
            .lock()
            .iter()
            .filter(|c| c.node == node)
            .cloned()
            .collect()
    }
}

impl VisionBackend for ScriptedVision {
    fn recognize(
        &self,
        request: &RecognitionRequest,
        _image: &Screenshot,
    ) -> Result<RecognitionOutcome, AgentError> {
        self.calls.lock().push(request.clone());

        let mut scripts = self.scripts.lock();
        let Some(queue) = scripts.get_mut(&request.node) else {
            return Ok(RecognitionOutcome::miss_for(request));
        };

        let reply = if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().map(|r| match r {
                Reply::Outcome(o) => Reply::Outcome(o.clone()),
                Reply::Fail(m) => Reply::Fail(m.clone()),
            })
        };

        match reply {
            Some(Reply::Outcome(outcome)) => Ok(outcome),
            Some(Reply::Fail(message)) => Err(AgentError::Backend(message)),
            None => Ok(RecognitionOutcome::miss_for(request)),
        }
    }
}

/// Device double: records clicks and swipes, hands out frames
#[derive(Default)]
pub struct ScriptedController {
    /// `false` entries are failed captures; once drained every capture succeeds
    captures: Mutex<VecDeque<bool>>,
    always_fail_capture: bool,
    pub clicks: Mutex<Vec<(i32, i32)>>,
    pub swipes: Mutex<Vec<((i32, i32), (i32, i32), u64)>>,
    pub capture_count: Mutex<u32>,
}

impl ScriptedController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Capture results in order: `true` succeeds, `false` yields an empty frame
    pub fn with_captures(captures: Vec<bool>) -> Self {
        Self {
            captures: Mutex::new(captures.into()),
            ..Self::default()
        }
    }

    pub fn broken_capture() -> Self {
        Self {
            always_fail_capture: true,
            ..Self::default()
        }
    }

    pub fn clicks(&self) -> Vec<(i32, i32)> {
        self.clicks.lock().clone()
    }

    pub fn swipe_count(&self) -> usize {
        self.swipes.lock().len()
    }
}

impl Controller for ScriptedController {
    fn capture_screen(&self) -> Result<Screenshot, AgentError> {
        *self.capture_count.lock() += 1;
        if self.always_fail_capture {
            return Err(AgentError::Device("screencap failed".to_string()));
        }
        match self.captures.lock().pop_front() {
            Some(false) => Ok(Screenshot::new_rgba8(0, 0)),
            _ => Ok(frame()),
        }
    }

    fn click(&self, x: i32, y: i32) -> Result<(), AgentError> {
        self.clicks.lock().push((x, y));
        Ok(())
    }

    fn swipe(&self, from: (i32, i32), to: (i32, i32), duration_ms: u64) -> Result<(), AgentError> {
        self.swipes.lock().push((from, to, duration_ms));
        Ok(())
    }
}

/// Clock that only moves when slept on
pub struct FakeClock {
    start: Instant,
    elapsed: Mutex<Duration>,
}

impl FakeClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            elapsed: Mutex::new(Duration::ZERO),
        }
    }

    pub fn elapsed(&self) -> Duration {
        *self.elapsed.lock()
    }
}

impl Clock for FakeClock {
    fn now(&self) -> Instant {
        self.start + *self.elapsed.lock()
    }

    fn sleep(&self, duration: Duration) {
        *self.elapsed.lock() += duration;
    }
}
