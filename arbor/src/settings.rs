//! Children supplied in answer to an expand request.

use std::fmt;
use std::sync::Arc;

use crate::data::NodeData;
use crate::level::{Accessors, ChildContent, ChildSource, Predicate, Template, TextFn, constant};
use crate::node::TreeNode;

/// Describes the children to render under an expanded node.
///
/// A fresh instance with empty defaults is handed to the expand handler on
/// every expansion. Leaving `data` as `None` means there is nothing new to
/// render.
pub struct ExpandSettings<D> {
    /// Child items.
    pub data: Option<Vec<D>>,
    /// Text accessor for the children.
    pub text: Option<TextFn<D>>,
    /// Named field providing the children's text.
    pub text_property: Option<String>,
    /// Whether a child has children of its own. Defaults to `true`.
    pub has_children: Predicate<D>,
    /// Whether a child starts expanded. Defaults to `false`.
    pub expanded: Predicate<D>,
    /// Whether a child starts selected. Defaults to `false`.
    pub selected: Predicate<D>,
    /// Row template for the children.
    pub template: Option<Template<D>>,
}

impl<D: NodeData> Default for ExpandSettings<D> {
    fn default() -> Self {
        Self {
            data: None,
            text: None,
            text_property: None,
            has_children: constant(true),
            expanded: constant(false),
            selected: constant(false),
            template: None,
        }
    }
}

impl<D> fmt::Debug for ExpandSettings<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExpandSettings")
            .field("data", &self.data.as_ref().map(Vec::len))
            .field("text_property", &self.text_property)
            .finish_non_exhaustive()
    }
}

impl<D: NodeData> ExpandSettings<D> {
    /// Sets the child items.
    pub fn with_data(mut self, data: Vec<D>) -> Self {
        self.data = Some(data);
        self
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

    /// Turns populated settings into renderable child content.
    ///
    /// Text precedence: explicit function, then named field, then the item's
    /// own text, then empty.
    pub(crate) fn into_content(self) -> Option<ChildContent<D>> {
        let data = self.data?;

        let text: TextFn<D> = match (self.text, self.text_property) {
            (Some(text), _) => text,
            (None, Some(name)) if !name.is_empty() => {
                Arc::new(move |item: &D| item.text_field(&name).unwrap_or_default())
            }
            _ => Arc::new(|item: &D| item.as_text().unwrap_or_default()),
        };

        Some(ChildContent {
            data,
            accessors: Accessors {
                text,
                has_children: self.has_children,
                expanded: self.expanded,
                selected: self.selected,
                template: self.template,
            },
            source: ChildSource::Expand,
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::*;

    #[test]
    fn test_untouched_settings_have_no_content() {
        let settings: ExpandSettings<Value> = ExpandSettings::default();
        assert!(settings.into_content().is_none());
    }

    #[test]
    fn test_text_falls_back_to_item_text() {
        let settings: ExpandSettings<Value> =
            ExpandSettings::default().with_data(vec![json!("plain")]);
        let content = settings.into_content().unwrap();
        assert_eq!((content.accessors.text)(&json!("plain")), "plain");
        assert_eq!(content.source, ChildSource::Expand);
    }

    #[test]
    fn test_text_property_lookup() {
        let settings: ExpandSettings<Value> = ExpandSettings::default()
            .with_data(vec![json!({ "name": "a" })])
            .with_text_property("name")
            .with_has_children(|_| false);
        let content = settings.into_content().unwrap();
        let item = json!({ "name": "a" });
        assert_eq!((content.accessors.text)(&item), "a");
        assert!(!(content.accessors.has_children)(&item));
    }
}
