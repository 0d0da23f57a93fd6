//! Key codes understood by the tree's keyboard dispatch.

/// Modifier key state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Modifiers {
    /// Control key held
    pub ctrl: bool,
    /// Shift key held
    pub shift: bool,
    /// Alt key held
    pub alt: bool,
}

impl Modifiers {
    /// No modifiers
    pub const NONE: Self = Self {
        ctrl: false,
        shift: false,
        alt: false,
    };

    /// Check if any modifier is active
    pub fn any(&self) -> bool {
        self.ctrl || self.shift || self.alt
    }
}

/// A key combination (key + modifiers)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyCombo {
    /// The key code
    pub key: Key,
    /// Modifier keys
    pub modifiers: Modifiers,
}

impl KeyCombo {
    /// Create a new key combo
    pub const fn new(key: Key, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }

    /// Create a key combo without modifiers
    pub const fn key(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers::NONE,
        }
    }

    /// Add ctrl modifier
    pub const fn ctrl(mut self) -> Self {
        self.modifiers.ctrl = true;
        self
    }
}

impl From<Key> for KeyCombo {
    fn from(key: Key) -> Self {
        Self::key(key)
    }
}

/// Key codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// Character key
    Char(char),
    /// Function keys F1-F12
    F(u8),
    /// Enter/Return
    Enter,
    /// Escape
    Escape,
    /// Backspace
    Backspace,
    /// Tab
    Tab,
    /// Space
    Space,
    /// Arrow up
    Up,
    /// Arrow down
    Down,
    /// Arrow left
    Left,
    /// Arrow right
    Right,
    /// Home
    Home,
    /// End
    End,
    /// Page up
    PageUp,
    /// Page down
    PageDown,
    /// Insert
    Insert,
    /// Delete
    Delete,
}

impl Key {
    /// Parse a DOM-style key code such as `ArrowUp` or `Space`.
    ///
    /// Hosts that receive browser keyboard events can feed the `code` (or
    /// `key`) string through this before dispatching to the tree.
    pub fn from_code(code: &str) -> Option<Self> {
        let key = match code {
            "ArrowUp" => Key::Up,
            "ArrowDown" => Key::Down,
            "ArrowLeft" => Key::Left,
            "ArrowRight" => Key::Right,
            "Enter" | "NumpadEnter" => Key::Enter,
            "Space" | " " => Key::Space,
            "Escape" => Key::Escape,
            "Backspace" => Key::Backspace,
            "Tab" => Key::Tab,
            "Home" => Key::Home,
            "End" => Key::End,
            "PageUp" => Key::PageUp,
            "PageDown" => Key::PageDown,
            "Insert" => Key::Insert,
            "Delete" => Key::Delete,
            other => {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Key::Char(c),
                    _ => return None,
                }
            }
        };
        Some(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_code_arrows() {
        assert_eq!(Key::from_code("ArrowUp"), Some(Key::Up));
        assert_eq!(Key::from_code("ArrowRight"), Some(Key::Right));
    }

    #[test]
    fn test_from_code_space_and_chars() {
        assert_eq!(Key::from_code("Space"), Some(Key::Space));
        assert_eq!(Key::from_code(" "), Some(Key::Space));
        assert_eq!(Key::from_code("q"), Some(Key::Char('q')));
        assert_eq!(Key::from_code("MetaLeft"), None);
    }

    #[test]
    fn test_combo_builders() {
        let combo = KeyCombo::key(Key::Char('c')).ctrl();
        assert!(combo.modifiers.ctrl);
        assert!(combo.modifiers.any());
        assert!(!KeyCombo::from(Key::Up).modifiers.any());
    }
}
