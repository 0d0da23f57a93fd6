//! Per-depth rules for turning raw data into tree nodes.

use std::fmt;
use std::sync::Arc;

use crate::data::NodeData;
use crate::node::{NodeParams, TreeNode};

/// Derives display text from a data item.
pub type TextFn<D> = Arc<dyn Fn(&D) -> String + Send + Sync>;

/// Answers a yes/no question about a data item.
pub type Predicate<D> = Arc<dyn Fn(&D) -> bool + Send + Sync>;

/// Custom row rendering for a node.
pub type Template<D> = Arc<dyn Fn(&TreeNode<D>) -> String + Send + Sync>;

pub(crate) fn constant<D>(value: bool) -> Predicate<D> {
    Arc::new(move |_| value)
}

/// Configuration for one depth of the tree.
///
/// Levels are registered on the tree in order: the first describes the root
/// items, the second their children, and so on. The last registered level is
/// reused for every depth beyond it.
///
/// # Example
///
/// ```
/// use arbor::LevelConfig;
/// use serde_json::Value;
///
/// let level: LevelConfig<Value> = LevelConfig::new()
///     .with_text_property("name")
///     .with_children_property("children");
/// ```
pub struct LevelConfig<D> {
    /// Explicit text accessor. Takes precedence over `text_property`.
    pub text: Option<TextFn<D>>,
    /// Named field providing the text.
    pub text_property: Option<String>,
    /// Named field providing child items.
    pub children_property: Option<String>,
    /// Whether an item has children. Defaults to `true`.
    pub has_children: Predicate<D>,
    /// Whether an item starts expanded. Defaults to `false`.
    pub expanded: Predicate<D>,
    /// Whether an item starts selected. Defaults to `false`.
    pub selected: Predicate<D>,
    /// Custom row template.
    pub template: Option<Template<D>>,
}

impl<D: NodeData> Default for LevelConfig<D> {
    fn default() -> Self {
        Self {
            text: None,
            text_property: None,
            children_property: None,
            has_children: constant(true),
            expanded: constant(false),
            selected: constant(false),
            template: None,
        }
    }
}

impl<D> fmt::Debug for LevelConfig<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LevelConfig")
            .field("text", &self.text.is_some())
            .field("text_property", &self.text_property)
            .field("children_property", &self.children_property)
            .field("template", &self.template.is_some())
            .finish_non_exhaustive()
    }
}

impl<D: NodeData> LevelConfig<D> {
    /// Creates a level with default predicates and no accessors.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the text accessor.
    pub fn with_text(mut self, text: impl Fn(&D) -> String + Send + Sync + 'static) -> Self {
        self.text = Some(Arc::new(text));
        self
    }

    /// Sets the named text field.
    pub fn with_text_property(mut self, name: impl Into<String>) -> Self {
        self.text_property = Some(name.into());
        self
    }

    /// Sets the named children field.
    pub fn with_children_property(mut self, name: impl Into<String>) -> Self {
        self.children_property = Some(name.into());
        self
    }

    /// Sets the has-children predicate.
    pub fn with_has_children(mut self, f: impl Fn(&D) -> bool + Send + Sync + 'static) -> Self {
        self.has_children = Arc::new(f);
        self
    }

    /// Sets the initially-expanded predicate.
    pub fn with_expanded(mut self, f: impl Fn(&D) -> bool + Send + Sync + 'static) -> Self {
        self.expanded = Arc::new(f);
        self
    }

    /// Sets the initially-selected predicate.
    pub fn with_selected(mut self, f: impl Fn(&D) -> bool + Send + Sync + 'static) -> Self {
        self.selected = Arc::new(f);
        self
    }

    /// Sets the row template.
    pub fn with_template(
        mut self,
        template: impl Fn(&TreeNode<D>) -> String + Send + Sync + 'static,
    ) -> Self {
        self.template = Some(Arc::new(template));
        self
    }

    /// Resolves the accessors used for every item rendered at this level.
    ///
    /// Text precedence: explicit function, then named field, then empty.
    pub(crate) fn accessors(&self) -> Accessors<D> {
        let text: TextFn<D> = match (&self.text, &self.text_property) {
            (Some(text), _) => text.clone(),
            (None, Some(name)) if !name.is_empty() => {
                let name = name.clone();
                Arc::new(move |data: &D| data.text_field(&name).unwrap_or_default())
            }
            _ => Arc::new(|_| String::new()),
        };

        Accessors {
            text,
            has_children: self.has_children.clone(),
            expanded: self.expanded.clone(),
            selected: self.selected.clone(),
            template: self.template.clone(),
        }
    }

    /// Children of `data` according to this level.
    ///
    /// Nothing is attached unless a children field is configured, the item
    /// reports children, and the field actually yields a sequence.
    pub(crate) fn children_of(&self, data: &D) -> Option<Vec<D>> {
        let name = self.children_property.as_deref().filter(|n| !n.is_empty())?;
        if !(self.has_children)(data) {
            return None;
        }
        data.children_field(name)
    }
}

/// Accessors resolved once for a batch of sibling items.
pub(crate) struct Accessors<D> {
    pub text: TextFn<D>,
    pub has_children: Predicate<D>,
    pub expanded: Predicate<D>,
    pub selected: Predicate<D>,
    pub template: Option<Template<D>>,
}

impl<D> Clone for Accessors<D> {
    fn clone(&self) -> Self {
        Self {
            text: self.text.clone(),
            has_children: self.has_children.clone(),
            expanded: self.expanded.clone(),
            selected: self.selected.clone(),
            template: self.template.clone(),
        }
    }
}

/// Where the grandchildren of a rendered batch come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ChildSource {
    /// Items derive their own children from the level configuration.
    Level,
    /// Items were supplied by an expand callback; their children only ever
    /// come from further expand callbacks.
    Expand,
}

/// Child data of a node together with the rules to render it.
pub(crate) struct ChildContent<D> {
    pub data: Vec<D>,
    pub accessors: Accessors<D>,
    pub source: ChildSource,
}

impl<D> Clone for ChildContent<D>
where
    D: Clone,
{
    fn clone(&self) -> Self {
        Self {
            data: self.data.clone(),
            accessors: self.accessors.clone(),
            source: self.source,
        }
    }
}

impl<D: NodeData> ChildContent<D> {
    /// External parameters for one item of this batch.
    ///
    /// An item starts selected when it equals the tree's bound value or the
    /// selected predicate says so.
    pub fn params_for(&self, data: &D, bound: Option<&D>) -> NodeParams<D> {
        let accessors = &self.accessors;
        NodeParams {
            text: (accessors.text)(data),
            value: data.clone(),
            has_children: (accessors.has_children)(data),
            expanded: (accessors.expanded)(data),
            selected: bound == Some(data) || (accessors.selected)(data),
            data: None,
            template: accessors.template.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::*;

    #[test]
    fn test_default_predicates() {
        let level: LevelConfig<Value> = LevelConfig::new();
        let item = json!({});
        assert!((level.has_children)(&item));
        assert!(!(level.expanded)(&item));
        assert!(!(level.selected)(&item));
    }

    #[test]
    fn test_text_precedence() {
        let item = json!({ "name": "from-field" });

        let by_fn: LevelConfig<Value> = LevelConfig::new()
            .with_text(|_| "from-fn".to_string())
            .with_text_property("name");
        assert_eq!((by_fn.accessors().text)(&item), "from-fn");

        let by_field: LevelConfig<Value> = LevelConfig::new().with_text_property("name");
        assert_eq!((by_field.accessors().text)(&item), "from-field");

        let empty: LevelConfig<Value> = LevelConfig::new();
        assert_eq!((empty.accessors().text)(&item), "");
    }

    #[test]
    fn test_children_need_property_and_predicate() {
        let item = json!({ "children": [{ "name": "a" }] });

        let no_property: LevelConfig<Value> = LevelConfig::new();
        assert!(no_property.children_of(&item).is_none());

        let with_property: LevelConfig<Value> =
            LevelConfig::new().with_children_property("children");
        assert_eq!(with_property.children_of(&item).map(|c| c.len()), Some(1));

        let leaf: LevelConfig<Value> = LevelConfig::new()
            .with_children_property("children")
            .with_has_children(|_| false);
        assert!(leaf.children_of(&item).is_none());
    }

    #[test]
    fn test_missing_children_field_yields_none() {
        let level: LevelConfig<Value> = LevelConfig::new().with_children_property("kids");
        assert!(level.children_of(&json!({ "kids": "nope" })).is_none());
        assert!(level.children_of(&json!({})).is_none());
    }

    #[test]
    fn test_params_for_bound_value() {
        let level: LevelConfig<Value> = LevelConfig::new().with_text_property("name");
        let content = ChildContent {
            data: vec![],
            accessors: level.accessors(),
            source: ChildSource::Level,
        };
        let item = json!({ "name": "x" });
        assert!(content.params_for(&item, Some(&item)).selected);
        assert!(!content.params_for(&item, None).selected);
        assert_eq!(content.params_for(&item, None).text, "x");
    }
}
