//! The item model served by data providers.

use arbor::NodeData;
use serde::{Deserialize, Serialize};

/// A named item with nested children.
///
/// Deserializes from `{ "name": ..., "type": ..., "children": [...] }`;
/// `type` and `children` are optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default)]
    pub children: Vec<Item>,
}

impl Item {
    /// Creates a leaf item.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: None,
            children: Vec::new(),
        }
    }

    /// Sets the children.
    pub fn with_children(mut self, children: Vec<Item>) -> Self {
        self.children = children;
        self
    }

    /// Sets the item type.
    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    /// Returns `true` if the item has no children.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Depth-first search for an item by name, including `self`.
    pub fn find(&self, name: &str) -> Option<&Item> {
        if self.name == name {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(name))
    }
}

impl NodeData for Item {
    fn text_field(&self, name: &str) -> Option<String> {
        match name {
            "name" | "Name" => Some(self.name.clone()),
            "type" | "Type" => self.kind.clone(),
            _ => None,
        }
    }

    fn children_field(&self, name: &str) -> Option<Vec<Self>> {
        match name {
            "children" | "Children" => Some(self.children.clone()),
            _ => None,
        }
    }

    fn as_text(&self) -> Option<String> {
        Some(self.name.clone())
    }
}

/// The demo hierarchy: `item1` holds a four-deep chain and two leaves,
/// followed by three root leaves.
pub fn sample_items() -> Vec<Item> {
    let chain = Item::new("item2").with_children(vec![
        Item::new("item3").with_children(vec![
            Item::new("item4").with_children(vec![Item::new("item5")]),
        ]),
    ]);

    vec![
        Item::new("item1").with_children(vec![chain, Item::new("item6"), Item::new("item7")]),
        Item::new("item8"),
        Item::new("item9"),
        Item::new("item10"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_optional_fields() {
        let item: Item = serde_json::from_str(r#"{ "name": "root" }"#).unwrap();
        assert_eq!(item, Item::new("root"));

        let item: Item =
            serde_json::from_str(r#"{ "name": "dir", "type": "folder", "children": [{ "name": "a" }] }"#)
                .unwrap();
        assert_eq!(item.kind.as_deref(), Some("folder"));
        assert_eq!(item.children, vec![Item::new("a")]);
    }

    #[test]
    fn test_serialize_skips_missing_type() {
        let json = serde_json::to_value(Item::new("a")).unwrap();
        assert_eq!(json, serde_json::json!({ "name": "a", "children": [] }));
    }

    #[test]
    fn test_named_fields() {
        let item = Item::new("a").with_kind("file");
        assert_eq!(item.text_field("name").as_deref(), Some("a"));
        assert_eq!(item.text_field("type").as_deref(), Some("file"));
        assert_eq!(item.text_field("size"), None);
        assert_eq!(item.children_field("children"), Some(vec![]));
        assert_eq!(item.children_field("name"), None);
    }

    #[test]
    fn test_sample_shape() {
        let items = sample_items();
        let names: Vec<_> = items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, ["item1", "item8", "item9", "item10"]);
        assert_eq!(items[0].children.len(), 3);
        assert!(items[0].find("item5").is_some_and(Item::is_leaf));
    }
}
