//! Keyboard handling for the Tree.

use log::debug;

use crate::data::NodeData;
use crate::error::Result;
use crate::events::EventResult;
use crate::keybinds::{Key, KeyCombo};

use super::state::Tree;

impl<D: NodeData> Tree<D> {
    /// Handle a key press while the tree has focus.
    ///
    /// - Up/Down move the focus, clamped to the visible list
    /// - Left/Right collapse/expand the focused node
    /// - Enter/Space select the focused node
    ///
    /// Every other key is returned as [`EventResult::Ignored`] so the host can
    /// apply its default handling.
    pub async fn on_key(&mut self, key: &KeyCombo) -> Result<EventResult> {
        match key.key {
            Key::Up | Key::Down => {
                self.move_focus(key.key == Key::Down);
                Ok(EventResult::Consumed)
            }
            Key::Left | Key::Right => {
                if let Some(id) = self.focused_node() {
                    let node = self.node(id)?;
                    if node.content.is_some() || node.has_children {
                        self.expand_collapse(id, key.key == Key::Right).await?;
                    }
                }
                Ok(EventResult::Consumed)
            }
            Key::Enter | Key::Space => {
                if let Some(id) = self.focused_node() {
                    self.select_item(id).await?;
                }
                Ok(EventResult::Consumed)
            }
            _ => Ok(EventResult::Ignored),
        }
    }

    /// Move the focus one row, staying inside the visible list.
    fn move_focus(&mut self, down: bool) {
        let len = self.current_items().len();
        if len == 0 {
            return;
        }
        let next = match (self.focused, down) {
            (None, _) => 0,
            (Some(i), true) => i + 1,
            (Some(i), false) => i.saturating_sub(1),
        };
        self.focused = Some(next.min(len - 1));
        self.dirty = true;
        debug!("Focus moved to {:?}", self.focused);
    }
}
