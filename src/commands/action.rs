use crate::commands::context::AgentContext;
use crate::error::AgentError;
use crate::models::recognition::RunResult;
use crate::services::vision::parser::unquote;
use std::str::FromStr;
use tracing::info;

/// Input handed over by the host pipeline for one custom action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunArg {
    pub node_name: String,
    pub param: String,
}

impl RunArg {
    pub fn new(node_name: impl Into<String>, param: impl Into<String>) -> Self {
        Self {
            node_name: node_name.into(),
            param: param.into(),
        }
    }
}

/// Custom actions the agent registers with the host, by name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CustomAction {
    /// Switch off the node named in the param
    DisableNode,
}

impl CustomAction {
    pub const ALL: [CustomAction; 1] = [Self::DisableNode];

    pub fn name(&self) -> &'static str {
        match self {
            Self::DisableNode => "DisableNode",
        }
    }

    pub fn run(&self, ctx: &AgentContext, arg: &RunArg) -> Result<RunResult, AgentError> {
        match self {
            Self::DisableNode => {
                let node = unquote(arg.param.trim());
                if node.is_empty() {
                    return Err(AgentError::MalformedParam(
                        "DisableNode needs a node name".to_string(),
                    ));
                }

                info!(node, from = %arg.node_name, "disabling node");
                ctx.pipeline.override_node(node, false)?;
                Ok(RunResult { success: true })
            }
        }
    }
}

impl FromStr for CustomAction {
    type Err = AgentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|a| a.name() == s)
            .ok_or_else(|| AgentError::UnknownHandler(s.to_string()))
    }
}

/// Resolve an action by its registered name and run it
pub fn run_action(ctx: &AgentContext, name: &str, arg: &RunArg) -> Result<RunResult, AgentError> {
    name.parse::<CustomAction>()?.run(ctx, arg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::pipeline::NodeOverrides;
    use crate::testing::{ScriptedController, ScriptedVision};
    use std::sync::Arc;

    fn context(overrides: Arc<NodeOverrides>) -> AgentContext {
        AgentContext::new(
            Arc::new(ScriptedVision::new()),
            Arc::new(ScriptedController::new()),
            overrides,
        )
    }

    #[test]
    fn test_disable_node_unquotes_param() {
        let overrides = Arc::new(NodeOverrides::new());
        let ctx = context(overrides.clone());

        let result = run_action(&ctx, "DisableNode", &RunArg::new("Cleanup", "'BuyPotion'")).unwrap();

        assert!(result.success);
        assert!(!overrides.is_enabled("BuyPotion"));
        assert!(overrides.is_enabled("Cleanup"));
    }

    #[test]
    fn test_disable_node_without_name() {
        let ctx = context(Arc::new(NodeOverrides::new()));

        let err = run_action(&ctx, "DisableNode", &RunArg::new("Cleanup", "\"\"")).unwrap_err();

        assert!(matches!(err, AgentError::MalformedParam(_)));
    }

    #[test]
    fn test_unknown_action() {
        let ctx = context(Arc::new(NodeOverrides::new()));

        let err = run_action(&ctx, "EnableNode", &RunArg::new("Cleanup", "X")).unwrap_err();

        assert!(matches!(err, AgentError::UnknownHandler(_)));
    }
}
