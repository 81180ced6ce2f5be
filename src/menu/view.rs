//! Display state pushed to the presentation layer on every `update_ui` pass

use super::item::ItemId;
use super::style::MenuStyle;

/// Emphasis of a tab relative to the current step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepState {
    Completed,
    Active,
    Pending,
}

impl StepState {
    pub fn for_index(index: usize, current_step: usize) -> Self {
        match index.cmp(&current_step) {
            std::cmp::Ordering::Less => StepState::Completed,
            std::cmp::Ordering::Equal => StepState::Active,
            std::cmp::Ordering::Greater => StepState::Pending,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabStep {
    pub item_id: ItemId,
    pub title: String,
    /// 1-based position, only shown by the numbered variant
    pub number: Option<usize>,
    pub state: StepState,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FleetSegment {
    pub item_id: ItemId,
    /// Fill fraction in `[0, 1]`
    pub progress: f32,
    pub running: bool,
}

/// Variant-specific part of a [`MenuView`]
#[derive(Debug, Clone, PartialEq)]
pub enum MenuLayout {
    Tabs { steps: Vec<TabStep> },
    Progress { percent: f32 },
    Fleets { segments: Vec<FleetSegment> },
}

/// Snapshot of everything a renderer needs to draw the menu
#[derive(Debug, Clone, PartialEq)]
pub struct MenuView {
    pub current_step: usize,
    pub style: MenuStyle,
    pub layout: MenuLayout,
}

/// Receives a fresh [`MenuView`] after every state mutation.
///
/// The core never reads anything back from the renderer.
pub trait MenuRenderer {
    fn render(&mut self, view: &MenuView);
}

impl<F> MenuRenderer for F
where
    F: FnMut(&MenuView),
{
    fn render(&mut self, view: &MenuView) {
        self(view);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_state_relative_to_current() {
        assert_eq!(StepState::for_index(0, 2), StepState::Completed);
        assert_eq!(StepState::for_index(2, 2), StepState::Active);
        assert_eq!(StepState::for_index(3, 2), StepState::Pending);
    }
}
