use std::collections::HashMap;
use std::fmt;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TabAction {
    // Container navigation
    SelectNext,
    SelectPrevious,
    ShowMore,
    // Demo host
    Quit,
    NewTab,
    CloseTab,
    ToggleHidden,
    RevealHidden,
    ToggleAttraction,
    ToggleLayout,
    CyclePosition,
    ToggleHideTabs,
}

impl TabAction {
    /// Actions the tab container handles itself.
    pub fn is_navigation(self) -> bool {
        matches!(
            self,
            TabAction::SelectNext | TabAction::SelectPrevious | TabAction::ShowMore
        )
    }
}

impl fmt::Display for TabAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TabAction::SelectNext => "Select next tab",
            TabAction::SelectPrevious => "Select previous tab",
            TabAction::ShowMore => "List all tabs",
            TabAction::Quit => "Quit",
            TabAction::NewTab => "New tab",
            TabAction::CloseTab => "Close tab",
            TabAction::ToggleHidden => "Hide tab",
            TabAction::RevealHidden => "Reveal hidden tabs",
            TabAction::ToggleAttraction => "Toggle attention blink",
            TabAction::ToggleLayout => "Toggle single row / table",
            TabAction::CyclePosition => "Move tab strip",
            TabAction::ToggleHideTabs => "Show / hide tab strip",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyCombo {
    pub code: KeyCode,
    pub mods: KeyModifiers,
}

impl KeyCombo {
    pub fn new(code: KeyCode, mods: KeyModifiers) -> Self {
        Self { code, mods }
    }

    pub fn matches(&self, key: &KeyEvent) -> bool {
        key.code == self.code && key.modifiers == self.mods
    }

    pub fn display(&self) -> String {
        let mut parts = Vec::new();
        if self.mods.contains(KeyModifiers::CONTROL) {
            parts.push("Ctrl".to_string());
        }
        if self.mods.contains(KeyModifiers::SHIFT) {
            parts.push("Shift".to_string());
        }
        if self.mods.contains(KeyModifiers::ALT) {
            parts.push("Alt".to_string());
        }
        let code = match self.code {
            KeyCode::Char(c) => c.to_ascii_uppercase().to_string(),
            KeyCode::Esc => "Esc".to_string(),
            KeyCode::Enter => "Enter".to_string(),
            KeyCode::Tab => "Tab".to_string(),
            KeyCode::Left => "Left".to_string(),
            KeyCode::Right => "Right".to_string(),
            KeyCode::Up => "Up".to_string(),
            KeyCode::Down => "Down".to_string(),
            KeyCode::PageUp => "PageUp".to_string(),
            KeyCode::PageDown => "PageDown".to_string(),
            KeyCode::F(n) => format!("F{}", n),
            _ => format!("{:?}", self.code),
        };
        parts.push(code);
        parts.join("+")
    }
}

impl fmt::Display for KeyCombo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

#[derive(Debug, Clone, Default)]
pub struct KeyBindings {
    map: HashMap<TabAction, Vec<KeyCombo>>,
}

impl KeyBindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Navigation keys understood by the tab container.
    pub fn navigation() -> Self {
        use TabAction::*;
        let mut kb = Self::new();
        kb.add(
            SelectNext,
            KeyCombo::new(KeyCode::PageDown, KeyModifiers::CONTROL),
        );
        kb.add(SelectNext, KeyCombo::new(KeyCode::Right, KeyModifiers::ALT));
        kb.add(
            SelectPrevious,
            KeyCombo::new(KeyCode::PageUp, KeyModifiers::CONTROL),
        );
        kb.add(
            SelectPrevious,
            KeyCombo::new(KeyCode::Left, KeyModifiers::ALT),
        );
        kb.add(ShowMore, KeyCombo::new(KeyCode::Down, KeyModifiers::ALT));
        kb
    }

    /// Navigation plus the demo host's own commands.
    pub fn demo() -> Self {
        use TabAction::*;
        let mut kb = Self::navigation();
        kb.add(
            Quit,
            KeyCombo::new(KeyCode::Char('q'), KeyModifiers::CONTROL),
        );
        kb.add(Quit, KeyCombo::new(KeyCode::Char('q'), KeyModifiers::NONE));
        kb.add(
            NewTab,
            KeyCombo::new(KeyCode::Char('n'), KeyModifiers::NONE),
        );
        kb.add(
            CloseTab,
            KeyCombo::new(KeyCode::Char('w'), KeyModifiers::NONE),
        );
        kb.add(
            ToggleHidden,
            KeyCombo::new(KeyCode::Char('h'), KeyModifiers::NONE),
        );
        kb.add(
            RevealHidden,
            KeyCombo::new(KeyCode::Char('u'), KeyModifiers::NONE),
        );
        kb.add(
            ToggleAttraction,
            KeyCombo::new(KeyCode::Char('a'), KeyModifiers::NONE),
        );
        kb.add(
            ToggleLayout,
            KeyCombo::new(KeyCode::Char('t'), KeyModifiers::NONE),
        );
        kb.add(
            CyclePosition,
            KeyCombo::new(KeyCode::Char('p'), KeyModifiers::NONE),
        );
        kb.add(
            ToggleHideTabs,
            KeyCombo::new(KeyCode::Char('s'), KeyModifiers::NONE),
        );
        kb
    }

    pub fn add(&mut self, action: TabAction, combo: KeyCombo) {
        self.map.entry(action).or_default().push(combo);
    }

    pub fn matches(&self, action: TabAction, key: &KeyEvent) -> bool {
        if let Some(list) = self.map.get(&action) {
            list.iter().any(|c| c.matches(key))
        } else {
            false
        }
    }

    pub fn action_for_key(&self, key: &KeyEvent) -> Option<TabAction> {
        for (act, list) in &self.map {
            if list.iter().any(|c| c.matches(key)) {
                return Some(*act);
            }
        }
        None
    }

    pub fn help_entries(&self) -> Vec<(TabAction, Vec<String>)> {
        let mut v: Vec<(TabAction, Vec<String>)> = self
            .map
            .iter()
            .map(|(act, list)| (*act, list.iter().map(|c| c.display()).collect()))
            .collect();
        v.sort_by_key(|(act, _)| act.to_string());
        v
    }

    /// Return the first `KeyCombo` mapped to `action`, if any.
    pub fn first_combo(&self, action: TabAction) -> Option<KeyCombo> {
        self.map.get(&action).and_then(|list| list.first().cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEvent;

    #[test]
    fn navigation_keys_resolve() {
        let kb = KeyBindings::navigation();
        let ev = KeyEvent::new(KeyCode::PageDown, KeyModifiers::CONTROL);
        assert!(kb.matches(TabAction::SelectNext, &ev));
        let ev = KeyEvent::new(KeyCode::Left, KeyModifiers::ALT);
        assert_eq!(kb.action_for_key(&ev), Some(TabAction::SelectPrevious));
        let ev = KeyEvent::new(KeyCode::Char('n'), KeyModifiers::NONE);
        assert_eq!(kb.action_for_key(&ev), None);
    }

    #[test]
    fn demo_adds_host_commands() {
        let kb = KeyBindings::demo();
        let ev = KeyEvent::new(KeyCode::Char('w'), KeyModifiers::NONE);
        assert_eq!(kb.action_for_key(&ev), Some(TabAction::CloseTab));
        assert!(!TabAction::CloseTab.is_navigation());
        assert!(TabAction::ShowMore.is_navigation());
        assert_eq!(
            kb.first_combo(TabAction::SelectNext).map(|c| c.display()),
            Some("Ctrl+PageDown".to_string())
        );
        assert!(kb.help_entries().len() >= 10);
    }
}
