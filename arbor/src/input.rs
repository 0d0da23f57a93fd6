//! Convert crossterm key events into tree key combos.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use log::trace;

use crate::keybinds::{Key, KeyCombo, Modifiers};

/// Convert crossterm KeyModifiers to arbor Modifiers
fn convert_modifiers(mods: KeyModifiers) -> Modifiers {
    Modifiers {
        ctrl: mods.contains(KeyModifiers::CONTROL),
        shift: mods.contains(KeyModifiers::SHIFT),
        alt: mods.contains(KeyModifiers::ALT),
    }
}

/// Convert crossterm KeyCode to arbor Key
fn convert_key(code: KeyCode) -> Option<Key> {
    match code {
        KeyCode::Char(' ') => Some(Key::Space),
        KeyCode::Char(c) => Some(Key::Char(c)),
        KeyCode::F(n) => Some(Key::F(n)),
        KeyCode::Enter => Some(Key::Enter),
        KeyCode::Esc => Some(Key::Escape),
        KeyCode::Backspace => Some(Key::Backspace),
        KeyCode::Tab => Some(Key::Tab),
        KeyCode::Up => Some(Key::Up),
        KeyCode::Down => Some(Key::Down),
        KeyCode::Left => Some(Key::Left),
        KeyCode::Right => Some(Key::Right),
        KeyCode::Home => Some(Key::Home),
        KeyCode::End => Some(Key::End),
        KeyCode::PageUp => Some(Key::PageUp),
        KeyCode::PageDown => Some(Key::PageDown),
        KeyCode::Insert => Some(Key::Insert),
        KeyCode::Delete => Some(Key::Delete),
        _ => None,
    }
}

/// Convert a crossterm KeyEvent to a KeyCombo.
///
/// Release and repeat events are dropped so a held key is dispatched once.
pub fn convert_key_event(event: KeyEvent) -> Option<KeyCombo> {
    trace!(
        "Key event: code={:?}, modifiers={:?}, kind={:?}",
        event.code, event.modifiers, event.kind
    );

    if event.kind != KeyEventKind::Press {
        return None;
    }

    let key = convert_key(event.code)?;
    Some(KeyCombo::new(key, convert_modifiers(event.modifiers)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_space_becomes_space_key() {
        let event = KeyEvent::new(KeyCode::Char(' '), KeyModifiers::NONE);
        assert_eq!(convert_key_event(event), Some(KeyCombo::key(Key::Space)));
    }

    #[test]
    fn test_modifiers_are_carried() {
        let event = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        let combo = convert_key_event(event).unwrap();
        assert_eq!(combo.key, Key::Char('c'));
        assert!(combo.modifiers.ctrl);
        assert!(!combo.modifiers.alt);
    }

    #[test]
    fn test_release_is_dropped() {
        let mut event = KeyEvent::new(KeyCode::Up, KeyModifiers::NONE);
        event.kind = KeyEventKind::Release;
        assert_eq!(convert_key_event(event), None);
    }

    #[test]
    fn test_unknown_code_is_dropped() {
        let event = KeyEvent::new(KeyCode::CapsLock, KeyModifiers::NONE);
        assert_eq!(convert_key_event(event), None);
    }
}
