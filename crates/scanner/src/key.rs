//! Raw key events and decoded scans.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Modifier keys held during a key event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
    pub shift: bool,
}

impl Modifiers {
    pub fn ctrl() -> Self {
        Self {
            ctrl: true,
            ..Self::default()
        }
    }

    /// Ctrl/Alt/Meta turn a keypress into a shortcut. Shift does not; scanners
    /// send it for upper-case characters.
    pub fn is_chord(&self) -> bool {
        self.ctrl || self.alt || self.meta
    }
}

/// Raw keydown event.
///
/// `key` follows the DOM `KeyboardEvent.key` convention: printable keys are a
/// single character, named keys are words such as `Enter` or `Backspace`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEvent {
    pub key: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub modifiers: Modifiers,
}

impl KeyEvent {
    pub fn new(key: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            key: key.into(),
            timestamp,
            modifiers: Modifiers::default(),
        }
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// The character carried by a printable key.
    pub fn printable(&self) -> Option<char> {
        let mut chars = self.key.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if !c.is_control() => Some(c),
            _ => None,
        }
    }
}

/// A decoded scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanEvent {
    pub code: String,
    /// Timestamp of the terminating Enter.
    pub scanned_at: DateTime<Utc>,
}
