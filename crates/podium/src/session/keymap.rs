use std::collections::HashMap;

use super::action::Command;
use super::timer::{MINUTE, TEN_MINUTES};

/// Keys the session understands, independent of the windowing toolkit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    Space,
    Escape,
}

impl Key {
    pub fn label(self) -> String {
        match self {
            Self::Char(c) => c.to_string(),
            Self::Up => "Up".into(),
            Self::Down => "Down".into(),
            Self::Left => "Left".into(),
            Self::Right => "Right".into(),
            Self::Home => "Home".into(),
            Self::End => "End".into(),
            Self::PageUp => "PgUp".into(),
            Self::PageDown => "PgDn".into(),
            Self::Space => "Space".into(),
            Self::Escape => "Esc".into(),
        }
    }
}

/// Fixed key -> command table, built once.
#[derive(Debug, Clone)]
pub struct KeyMap {
    bindings: HashMap<Key, Command>,
    /// Help overlay order.
    order: Vec<Key>,
}

impl Default for KeyMap {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyMap {
    pub fn new() -> Self {
        let table = [
            (Key::Char('h'), Command::ToggleHelp),
            (Key::Char('q'), Command::Quit),
            (Key::Char('w'), Command::ToggleWeb),
            (Key::Char('v'), Command::ToggleVideo),
            (Key::Char('f'), Command::ToggleFullscreen),
            (Key::Up, Command::Prev),
            (Key::Left, Command::Prev),
            (Key::Down, Command::Next),
            (Key::Right, Command::Next),
            (Key::Space, Command::Next),
            (Key::Home, Command::Home),
            (Key::End, Command::End),
            (Key::PageUp, Command::Back),
            (Key::PageDown, Command::Forward),
            (Key::Char('t'), Command::ToggleClock),
            (Key::Char('z'), Command::ResetTimer),
            (Key::Char(']'), Command::AdjustPlanned(MINUTE)),
            (Key::Char('['), Command::AdjustPlanned(-MINUTE)),
            (Key::Char('}'), Command::AdjustPlanned(TEN_MINUTES)),
            (Key::Char('{'), Command::AdjustPlanned(-TEN_MINUTES)),
            (Key::Char('c'), Command::ResetCalibration),
        ];
        Self {
            order: table.iter().map(|(key, _)| *key).collect(),
            bindings: table.into_iter().collect(),
        }
    }

    /// Unbound keys resolve to `Command::None`.
    pub fn lookup(&self, key: Key) -> Command {
        match self.bindings.get(&key) {
            Some(command) => command.clone(),
            None => Command::None,
        }
    }

    /// Bindings in display order, for the help overlay.
    pub fn entries(&self) -> impl Iterator<Item = (Key, &Command)> {
        self.order
            .iter()
            .filter_map(|key| self.bindings.get(key).map(|c| (*key, c)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_navigation_bindings() {
        let keys = KeyMap::new();
        assert_eq!(keys.lookup(Key::Right), Command::Next);
        assert_eq!(keys.lookup(Key::Space), Command::Next);
        assert_eq!(keys.lookup(Key::Left), Command::Prev);
        assert_eq!(keys.lookup(Key::PageUp), Command::Back);
        assert_eq!(keys.lookup(Key::PageDown), Command::Forward);
        assert_eq!(keys.lookup(Key::Char('}')), Command::AdjustPlanned(600));
        assert_eq!(keys.lookup(Key::Char('[')), Command::AdjustPlanned(-60));
    }

    #[test]
    fn test_unbound_key_is_noop() {
        let keys = KeyMap::new();
        assert_eq!(keys.lookup(Key::Char('x')), Command::None);
        assert_eq!(keys.lookup(Key::Escape), Command::None);
        assert_eq!(keys.lookup(Key::Char('H')), Command::None);
    }

    #[test]
    fn test_entries_follow_table_order() {
        let keys = KeyMap::new();
        let first: Vec<Key> = keys.entries().take(2).map(|(k, _)| k).collect();
        assert_eq!(first, vec![Key::Char('h'), Key::Char('q')]);
        assert_eq!(keys.entries().count(), 21);
    }
}
