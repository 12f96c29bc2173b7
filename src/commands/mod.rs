pub mod action;
pub mod context;
pub mod recognition;

pub use action::{run_action, CustomAction, RunArg};
pub use context::AgentContext;
pub use recognition::{run_recognition, AnalyzeArg, CustomRecognition};
