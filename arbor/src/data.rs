//! Capability trait for raw data shown in a tree.
//!
//! Levels and expand settings can address fields of a data item by name
//! (`text_property`, `children_property`). Rather than reflecting over
//! arbitrary objects, each data shape states which named fields it exposes.

use serde_json::Value;

/// Raw data backing a tree node.
///
/// The value of a node is its data item; equality decides whether the
/// externally bound value matches a node and which nodes survive a re-render.
pub trait NodeData: Clone + PartialEq + Send + Sync + 'static {
    /// Look up a named text field.
    fn text_field(&self, _name: &str) -> Option<String> {
        None
    }

    /// Look up a named field holding child items.
    fn children_field(&self, _name: &str) -> Option<Vec<Self>> {
        None
    }

    /// Text of the item itself when no accessor or property is configured.
    fn as_text(&self) -> Option<String> {
        None
    }
}

impl NodeData for String {
    fn as_text(&self) -> Option<String> {
        Some(self.clone())
    }
}

impl NodeData for Value {
    fn text_field(&self, name: &str) -> Option<String> {
        match self.get(name)? {
            Value::String(s) => Some(s.clone()),
            Value::Null => None,
            other => Some(other.to_string()),
        }
    }

    fn children_field(&self, name: &str) -> Option<Vec<Self>> {
        self.get(name)?.as_array().cloned()
    }

    fn as_text(&self) -> Option<String> {
        self.as_str().map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_json_text_field() {
        let item = json!({ "name": "item1", "size": 3 });
        assert_eq!(item.text_field("name").as_deref(), Some("item1"));
        assert_eq!(item.text_field("size").as_deref(), Some("3"));
        assert_eq!(item.text_field("missing"), None);
    }

    #[test]
    fn test_json_children_field_requires_array() {
        let item = json!({ "children": [{ "name": "a" }], "name": "x" });
        assert_eq!(item.children_field("children").map(|c| c.len()), Some(1));
        assert_eq!(item.children_field("name"), None);
    }

    #[test]
    fn test_string_is_its_own_text() {
        assert_eq!("leaf".to_string().as_text().as_deref(), Some("leaf"));
        assert_eq!(json!("leaf").as_text().as_deref(), Some("leaf"));
        assert_eq!(json!({}).as_text(), None);
    }
}
