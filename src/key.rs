//! Minimal key bindings for the page host.

use bubbletea_rs::KeyMsg;
use crossterm::event::{KeyCode, KeyModifiers};

/// A key paired with the modifiers that must be held.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress {
    /// The key.
    pub code: KeyCode,
    /// Required modifiers. `NONE` matches only an unmodified press.
    pub modifiers: KeyModifiers,
}

impl From<KeyCode> for KeyPress {
    fn from(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::NONE,
        }
    }
}

impl From<(KeyCode, KeyModifiers)> for KeyPress {
    fn from((code, modifiers): (KeyCode, KeyModifiers)) -> Self {
        Self { code, modifiers }
    }
}

/// A named set of key presses that trigger the same action.
#[derive(Debug, Clone)]
pub struct Binding {
    /// Presses that trigger the binding.
    pub keys: Vec<KeyPress>,
    /// Short key label, e.g. `"q"`.
    pub help: String,
    /// What the binding does.
    pub description: String,
}

impl Binding {
    /// Creates a binding from anything convertible into [`KeyPress`].
    pub fn new<K: Into<KeyPress>>(keys: Vec<K>) -> Self {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
            help: String::new(),
            description: String::new(),
        }
    }

    /// Sets the help label and description.
    pub fn with_help(mut self, help: impl Into<String>, description: impl Into<String>) -> Self {
        self.help = help.into();
        self.description = description.into();
        self
    }

    /// Whether `msg` is one of this binding's presses.
    pub fn matches(&self, msg: &KeyMsg) -> bool {
        self.keys
            .iter()
            .any(|k| k.code == msg.key && k.modifiers == msg.modifiers)
    }
}

/// Default quit binding: `q`, `esc` or `ctrl+c`.
pub fn quit_binding() -> Binding {
    Binding::new(vec![
        KeyPress::from(KeyCode::Char('q')),
        KeyPress::from(KeyCode::Esc),
        KeyPress::from((KeyCode::Char('c'), KeyModifiers::CONTROL)),
    ])
    .with_help("q/esc", "quit")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyMsg {
        KeyMsg {
            key: code,
            modifiers,
        }
    }

    #[test]
    fn test_quit_binding_matches() {
        let quit = quit_binding();
        assert!(quit.matches(&key(KeyCode::Char('q'), KeyModifiers::NONE)));
        assert!(quit.matches(&key(KeyCode::Esc, KeyModifiers::NONE)));
        assert!(quit.matches(&key(KeyCode::Char('c'), KeyModifiers::CONTROL)));
        assert_eq!(quit.help, "q/esc");
    }

    #[test]
    fn test_modifiers_must_match() {
        let quit = quit_binding();
        assert!(!quit.matches(&key(KeyCode::Char('c'), KeyModifiers::NONE)));
        assert!(!quit.matches(&key(KeyCode::Char('q'), KeyModifiers::CONTROL)));
    }
}
