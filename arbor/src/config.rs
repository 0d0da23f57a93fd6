//! Tree configuration

use serde::{Deserialize, Serialize};

/// Behavioural settings for a [`Tree`](crate::Tree).
///
/// # Example
///
/// ```
/// use arbor::TreeConfig;
///
/// let config = TreeConfig::default().with_max_depth(2);
/// assert_eq!(config.max_depth, Some(2));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeConfig {
    /// Deepest level whose children are rendered from level configuration.
    ///
    /// Nodes below this depth still expand through the expand handler.
    /// Default: unlimited
    pub max_depth: Option<usize>,
}

impl TreeConfig {
    /// Creates a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum level-driven depth.
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Whether level-driven children may be rendered at `depth`.
    pub(crate) fn allows_depth(&self, depth: usize) -> bool {
        self.max_depth.is_none_or(|max| depth <= max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_unlimited() {
        let config = TreeConfig::default();
        assert!(config.allows_depth(100));
    }

    #[test]
    fn test_max_depth_is_inclusive() {
        let config = TreeConfig::new().with_max_depth(2);
        assert!(config.allows_depth(2));
        assert!(!config.allows_depth(3));
    }

    #[test]
    fn test_deserialize_missing_fields() {
        let config: TreeConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, TreeConfig::default());
        let config: TreeConfig = serde_json::from_str(r#"{"max_depth":1}"#).unwrap();
        assert_eq!(config.max_depth, Some(1));
    }
}
