//! Keyboard shortcuts of the stepper demo.
//!
//! The registry is the single source for both key dispatch
//! ([`action_for`]) and the help overlay.

use crossterm::event::KeyCode;

/// What a key press asks the demo to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    ToggleHelp,
    NextStep,
    PreviousStep,
    /// 0-indexed target
    JumpTo(usize),
    /// Pop the route stack, as a system back button would
    Back,
    TogglePause,
    FasterFleets,
    SlowerFleets,
}

/// A keyboard shortcut definition
#[derive(Debug, Clone)]
pub struct Shortcut {
    pub key: KeyCode,
    /// Alternative key (e.g., vim key or arrow key)
    pub alt_key: Option<KeyCode>,
    pub description: &'static str,
    pub category: ShortcutCategory,
    pub action: Action,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShortcutCategory {
    General,
    Navigation,
    Fleets,
}

impl ShortcutCategory {
    pub fn display_name(&self) -> &'static str {
        match self {
            ShortcutCategory::General => "General",
            ShortcutCategory::Navigation => "Navigation",
            ShortcutCategory::Fleets => "Fleets",
        }
    }

    /// All categories in display order
    pub fn all() -> &'static [ShortcutCategory] {
        &[
            ShortcutCategory::General,
            ShortcutCategory::Navigation,
            ShortcutCategory::Fleets,
        ]
    }
}

impl Shortcut {
    /// Format key for display (e.g., "q", "l/→")
    pub fn key_display(&self) -> String {
        let primary = format_keycode(&self.key);
        match &self.alt_key {
            Some(alt) => format!("{}/{}", primary, format_keycode(alt)),
            None => primary,
        }
    }

    /// Format key for the help overlay (left-padded to 7 chars)
    pub fn key_display_padded(&self) -> String {
        format!("{:<7}", self.key_display())
    }

    fn matches(&self, key: KeyCode) -> bool {
        self.key == key || self.alt_key == Some(key)
    }
}

fn format_keycode(key: &KeyCode) -> String {
    match key {
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Esc => "Esc".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::BackTab => "Shift+Tab".to_string(),
        KeyCode::Up => "↑".to_string(),
        KeyCode::Down => "↓".to_string(),
        KeyCode::Left => "←".to_string(),
        KeyCode::Right => "→".to_string(),
        KeyCode::Home => "Home".to_string(),
        KeyCode::End => "End".to_string(),
        KeyCode::Backspace => "Backspace".to_string(),
        KeyCode::F(n) => format!("F{}", n),
        _ => format!("{:?}", key),
    }
}

/// Static registry of all keyboard shortcuts
pub static SHORTCUTS: &[Shortcut] = &[
    // General
    Shortcut {
        key: KeyCode::Char('q'),
        alt_key: Some(KeyCode::Esc),
        description: "Quit",
        category: ShortcutCategory::General,
        action: Action::Quit,
    },
    Shortcut {
        key: KeyCode::Char('?'),
        alt_key: None,
        description: "Toggle help",
        category: ShortcutCategory::General,
        action: Action::ToggleHelp,
    },
    // Navigation
    Shortcut {
        key: KeyCode::Char('l'),
        alt_key: Some(KeyCode::Right),
        description: "Next step",
        category: ShortcutCategory::Navigation,
        action: Action::NextStep,
    },
    Shortcut {
        key: KeyCode::Char('h'),
        alt_key: Some(KeyCode::Left),
        description: "Previous step",
        category: ShortcutCategory::Navigation,
        action: Action::PreviousStep,
    },
    Shortcut {
        key: KeyCode::Enter,
        alt_key: None,
        description: "Continue (completes on the last step)",
        category: ShortcutCategory::Navigation,
        action: Action::NextStep,
    },
    Shortcut {
        key: KeyCode::Backspace,
        alt_key: None,
        description: "Back through the route history",
        category: ShortcutCategory::Navigation,
        action: Action::Back,
    },
    // Fleets
    Shortcut {
        key: KeyCode::Char(' '),
        alt_key: Some(KeyCode::Char('p')),
        description: "Pause/resume the running fleet",
        category: ShortcutCategory::Fleets,
        action: Action::TogglePause,
    },
    Shortcut {
        key: KeyCode::Char('+'),
        alt_key: None,
        description: "Shorter fleets (from the next fleet on)",
        category: ShortcutCategory::Fleets,
        action: Action::FasterFleets,
    },
    Shortcut {
        key: KeyCode::Char('-'),
        alt_key: None,
        description: "Longer fleets (from the next fleet on)",
        category: ShortcutCategory::Fleets,
        action: Action::SlowerFleets,
    },
];

/// Resolve a key press. Digits 1-9 jump straight to that step.
pub fn action_for(key: KeyCode) -> Option<Action> {
    if let KeyCode::Char(c @ '1'..='9') = key {
        let digit = c.to_digit(10)? as usize;
        return Some(Action::JumpTo(digit - 1));
    }
    SHORTCUTS
        .iter()
        .find(|shortcut| shortcut.matches(key))
        .map(|shortcut| shortcut.action)
}

/// Grouped shortcuts by category
pub type GroupedByCategory = Vec<(ShortcutCategory, Vec<&'static Shortcut>)>;

/// Shortcuts grouped by category, in display order
pub fn shortcuts_by_category() -> GroupedByCategory {
    let mut result = Vec::new();
    for category in ShortcutCategory::all() {
        let shortcuts: Vec<&Shortcut> = SHORTCUTS
            .iter()
            .filter(|s| s.category == *category)
            .collect();
        if !shortcuts.is_empty() {
            result.push((*category, shortcuts));
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_shortcuts_have_descriptions() {
        for shortcut in SHORTCUTS {
            assert!(
                !shortcut.description.is_empty(),
                "Shortcut {:?} has empty description",
                shortcut.key
            );
        }
    }

    #[test]
    fn test_key_display_with_alt() {
        let shortcut = Shortcut {
            key: KeyCode::Char('l'),
            alt_key: Some(KeyCode::Right),
            description: "Test",
            category: ShortcutCategory::Navigation,
            action: Action::NextStep,
        };
        assert_eq!(shortcut.key_display(), "l/→");
        assert_eq!(shortcut.key_display_padded(), "l/→    ");
    }

    #[test]
    fn test_key_display_special_keys() {
        assert_eq!(format_keycode(&KeyCode::Enter), "Enter");
        assert_eq!(format_keycode(&KeyCode::Esc), "Esc");
        assert_eq!(format_keycode(&KeyCode::Backspace), "Backspace");
    }

    #[test]
    fn test_action_for_primary_and_alt_keys() {
        assert_eq!(action_for(KeyCode::Char('q')), Some(Action::Quit));
        assert_eq!(action_for(KeyCode::Esc), Some(Action::Quit));
        assert_eq!(action_for(KeyCode::Right), Some(Action::NextStep));
        assert_eq!(action_for(KeyCode::Enter), Some(Action::NextStep));
        assert_eq!(action_for(KeyCode::Left), Some(Action::PreviousStep));
        assert_eq!(action_for(KeyCode::Backspace), Some(Action::Back));
        assert_eq!(action_for(KeyCode::Char('z')), None);
    }

    #[test]
    fn test_digits_jump_to_steps() {
        assert_eq!(action_for(KeyCode::Char('1')), Some(Action::JumpTo(0)));
        assert_eq!(action_for(KeyCode::Char('9')), Some(Action::JumpTo(8)));
        assert_eq!(action_for(KeyCode::Char('0')), None);
    }

    #[test]
    fn test_no_key_is_bound_twice() {
        let mut keys = Vec::new();
        for shortcut in SHORTCUTS {
            keys.push(shortcut.key);
            keys.extend(shortcut.alt_key);
        }
        let unique: std::collections::HashSet<_> = keys.iter().collect();
        assert_eq!(unique.len(), keys.len());
    }

    #[test]
    fn test_shortcuts_by_category_in_display_order() {
        let grouped = shortcuts_by_category();
        let categories: Vec<_> = grouped.iter().map(|(cat, _)| *cat).collect();
        assert_eq!(categories, ShortcutCategory::all());
    }
}
