//! Keyboard and touch input
//!
//! Input is level-triggered: the simulation reads which logical keys are held
//! right now, once per tick. The writer side (`KeyTracker`) follows raw DOM key
//! names as they are pressed and released; the reader side gets a `KeySet`,
//! an immutable copy that cannot change underneath a running tick.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Logical movement keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Left,
    Right,
    /// Jump
    Up,
    /// Squat
    Down,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value (or a virtual button name)
    pub fn from_dom(name: &str) -> Option<Self> {
        match name {
            "ArrowLeft" | "a" | "A" => Some(Key::Left),
            "ArrowRight" | "d" | "D" => Some(Key::Right),
            "ArrowUp" | "w" | "W" | " " => Some(Key::Up),
            "ArrowDown" | "s" | "S" => Some(Key::Down),
            _ => None,
        }
    }

    fn bit(self) -> u8 {
        match self {
            Key::Left => 1 << 0,
            Key::Right => 1 << 1,
            Key::Up => 1 << 2,
            Key::Down => 1 << 3,
        }
    }
}

/// Point-in-time set of held logical keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct KeySet(u8);

impl KeySet {
    pub const EMPTY: KeySet = KeySet(0);

    pub fn from_keys(keys: &[Key]) -> Self {
        keys.iter().fold(Self::EMPTY, |set, &k| set.with(k))
    }

    #[must_use]
    pub fn with(self, key: Key) -> Self {
        KeySet(self.0 | key.bit())
    }

    pub fn contains(self, key: Key) -> bool {
        self.0 & key.bit() != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn left(self) -> bool {
        self.contains(Key::Left)
    }

    pub fn right(self) -> bool {
        self.contains(Key::Right)
    }

    pub fn jump(self) -> bool {
        self.contains(Key::Up)
    }

    pub fn squat(self) -> bool {
        self.contains(Key::Down)
    }
}

/// Writer side of the input pipeline
///
/// Holds raw key names, so releasing `a` while `ArrowLeft` is still down keeps
/// `Key::Left` held.
#[derive(Debug, Default)]
pub struct KeyTracker {
    pressed: HashSet<String>,
}

impl KeyTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, name: &str) {
        self.pressed.insert(name.to_owned());
    }

    pub fn release(&mut self, name: &str) {
        self.pressed.remove(name);
    }

    /// Forget everything held (game start, focus loss)
    pub fn clear(&mut self) {
        self.pressed.clear();
    }

    pub fn snapshot(&self) -> KeySet {
        self.pressed
            .iter()
            .filter_map(|name| Key::from_dom(name))
            .fold(KeySet::EMPTY, KeySet::with)
    }

    /// Whether the browser default for this key should be suppressed
    pub fn is_game_key(name: &str) -> bool {
        Key::from_dom(name).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dom_aliases() {
        assert_eq!(Key::from_dom("a"), Some(Key::Left));
        assert_eq!(Key::from_dom("D"), Some(Key::Right));
        assert_eq!(Key::from_dom(" "), Some(Key::Up));
        assert_eq!(Key::from_dom("ArrowDown"), Some(Key::Down));
        assert_eq!(Key::from_dom("Enter"), None);
    }

    #[test]
    fn test_overlapping_aliases_stay_held() {
        let mut tracker = KeyTracker::new();
        tracker.press("ArrowLeft");
        tracker.press("a");
        tracker.release("a");
        assert!(tracker.snapshot().left());

        tracker.release("ArrowLeft");
        assert!(tracker.snapshot().is_empty());
    }

    #[test]
    fn test_snapshot_is_detached() {
        let mut tracker = KeyTracker::new();
        tracker.press("w");
        let snap = tracker.snapshot();
        tracker.clear();
        assert!(snap.jump());
        assert!(tracker.snapshot().is_empty());
    }

    #[test]
    fn test_from_keys() {
        let set = KeySet::from_keys(&[Key::Down, Key::Right]);
        assert!(set.squat() && set.right());
        assert!(!set.left() && !set.jump());
    }
}
