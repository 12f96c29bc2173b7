use crate::error::AgentError;
use crate::services::vision::PipelineOverride;
use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::info;

/// In-memory node enable state.
///
/// Stands in for the host pipeline's override sink when there is none; nodes
/// never overridden count as enabled.
#[derive(Debug, Default)]
pub struct NodeOverrides {
    nodes: RwLock<HashMap<String, bool>>,
}

impl NodeOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_enabled(&self, node: &str) -> bool {
        self.nodes.read().get(node).copied().unwrap_or(true)
    }

    /// Nodes currently switched off, sorted
    pub fn disabled(&self) -> Vec<String> {
        let mut nodes: Vec<String> = self
            .nodes
            .read()
            .iter()
            .filter(|(_, enabled)| !**enabled)
            .map(|(node, _)| node.clone())
            .collect();
        nodes.sort();
        nodes
    }

    pub fn reset(&self) {
        self.nodes.write().clear();
    }
}

impl PipelineOverride for NodeOverrides {
    fn override_node(&self, node: &str, enabled: bool) -> Result<(), AgentError> {
        if node.is_empty() {
            return Err(AgentError::MalformedParam("empty node name".to_string()));
        }
        info!(node, enabled, "node override");
        self.nodes.write().insert(node.to_string(), enabled);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_node_is_enabled() {
        let overrides = NodeOverrides::new();
        assert!(overrides.is_enabled("Shop_Potion"));
        assert!(overrides.disabled().is_empty());
    }

    #[test]
    fn test_disable_and_reenable() {
        let overrides = NodeOverrides::new();
        overrides.override_node("Shop_Potion", false).unwrap();
        overrides.override_node("Wish_Credit", false).unwrap();
        assert!(!overrides.is_enabled("Shop_Potion"));
        assert_eq!(overrides.disabled(), vec!["Shop_Potion", "Wish_Credit"]);

        overrides.override_node("Shop_Potion", true).unwrap();
        assert!(overrides.is_enabled("Shop_Potion"));
        assert_eq!(overrides.disabled(), vec!["Wish_Credit"]);

        overrides.reset();
        assert!(overrides.disabled().is_empty());
    }

    #[test]
    fn test_empty_node_name_rejected() {
        let overrides = NodeOverrides::new();
        let err = overrides.override_node("", false).unwrap_err();
        assert!(matches!(err, AgentError::MalformedParam(_)));
    }
}
