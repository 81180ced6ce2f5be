//! Step menus: the ordered item collection, the selected step and the
//! per-variant display behavior.
//!
//! All four variants share one collection and one selection model. They only
//! differ in what `update_ui` derives for the presentation layer, and the
//! fleets variant additionally owns one timer per item.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::StepperError;

pub mod fleets;
pub mod item;
pub mod style;
pub mod view;

pub use fleets::{FleetTimer, FleetTimers, TimerStatus, DEFAULT_FLEET_DURATION};
pub use item::{GroupId, ItemId, StepItem};
pub use style::{MenuStyle, Rgb, TextStyle};
pub use view::{FleetSegment, MenuLayout, MenuRenderer, MenuView, StepState, TabStep};

/// Stepper variants selectable from configuration
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(try_from = "String", into = "String")]
pub enum StepperType {
    /// Simple tabbed stepper
    #[default]
    Tab,
    /// Tabbed stepper with step numbers
    TabNumbered,
    /// Single progress bar
    Progress,
    /// Story-style segments that advance on their own
    Fleets,
}

impl StepperType {
    pub fn all() -> &'static [StepperType] {
        &[
            StepperType::Tab,
            StepperType::TabNumbered,
            StepperType::Progress,
            StepperType::Fleets,
        ]
    }

    /// Stable numeric identifier used by attribute-style declarations
    pub fn identifier(self) -> u8 {
        match self {
            StepperType::Tab => 0x01,
            StepperType::TabNumbered => 0x02,
            StepperType::Progress => 0x03,
            StepperType::Fleets => 0x04,
        }
    }

    pub fn from_identifier(identifier: u8) -> Result<Self, StepperError> {
        Self::all()
            .iter()
            .copied()
            .find(|kind| kind.identifier() == identifier)
            .ok_or_else(|| StepperError::InvalidStepperType(format!("{identifier:#04x}")))
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StepperType::Tab => "tab",
            StepperType::TabNumbered => "tab-numbered",
            StepperType::Progress => "progress",
            StepperType::Fleets => "fleets",
        }
    }
}

impl fmt::Display for StepperType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for StepperType {
    type Error = StepperError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<StepperType> for String {
    fn from(value: StepperType) -> Self {
        value.as_str().to_string()
    }
}

impl FromStr for StepperType {
    type Err = StepperError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s.trim())
            .ok_or_else(|| StepperError::InvalidStepperType(s.to_string()))
    }
}

/// Variant tag plus the state only that variant carries
#[derive(Debug, Clone, PartialEq)]
pub enum MenuKind {
    Tab,
    TabNumbered,
    Progress,
    Fleets(FleetTimers),
}

impl MenuKind {
    pub fn new(kind: StepperType, fleet_duration: Duration) -> Self {
        match kind {
            StepperType::Tab => MenuKind::Tab,
            StepperType::TabNumbered => MenuKind::TabNumbered,
            StepperType::Progress => MenuKind::Progress,
            StepperType::Fleets => MenuKind::Fleets(FleetTimers::new(fleet_duration)),
        }
    }

    pub fn stepper_type(&self) -> StepperType {
        match self {
            MenuKind::Tab => StepperType::Tab,
            MenuKind::TabNumbered => StepperType::TabNumbered,
            MenuKind::Progress => StepperType::Progress,
            MenuKind::Fleets(_) => StepperType::Fleets,
        }
    }
}

/// Ordered steps plus the selected index.
///
/// `current_step` may equal `size()` only transiently while a completion is
/// being signalled. Removing items does not re-clamp it.
pub struct StepperMenu {
    kind: MenuKind,
    items: Vec<StepItem>,
    current_step: usize,
    style: MenuStyle,
    renderer: Option<Box<dyn MenuRenderer>>,
}

impl fmt::Debug for StepperMenu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepperMenu")
            .field("kind", &self.kind)
            .field("items", &self.items)
            .field("current_step", &self.current_step)
            .field("style", &self.style)
            .field("renderer", &self.renderer.is_some())
            .finish()
    }
}

impl StepperMenu {
    pub fn new(kind: StepperType, style: MenuStyle) -> Self {
        Self::with_fleet_duration(kind, style, DEFAULT_FLEET_DURATION)
    }

    pub fn with_fleet_duration(
        kind: StepperType,
        style: MenuStyle,
        fleet_duration: Duration,
    ) -> Self {
        Self {
            kind: MenuKind::new(kind, fleet_duration),
            items: Vec::new(),
            current_step: 0,
            style,
            renderer: None,
        }
    }

    pub fn kind(&self) -> &MenuKind {
        &self.kind
    }

    pub fn stepper_type(&self) -> StepperType {
        self.kind.stepper_type()
    }

    // ─── Item Collection ────────────────────────────────────────────────────────

    /// Insert a step and keep the collection sorted by `order`. Equal orders
    /// keep insertion order. Duplicate ids are accepted.
    pub fn add(
        &mut self,
        group_id: GroupId,
        item_id: ItemId,
        order: i32,
        title: impl Into<String>,
    ) -> StepItem {
        let item = StepItem::new(group_id, item_id, order, title);
        self.items.push(item.clone());
        self.items.sort_by_key(|i| i.order);
        tracing::trace!(item_id, order, size = self.items.len(), "step added");
        self.update_ui();
        item
    }

    /// Add a step from a title alone: group 0, id 0, order 0.
    pub fn add_title(&mut self, title: impl Into<String>) -> StepItem {
        self.add(0, 0, 0, title)
    }

    /// Remove every step with this id
    pub fn remove_item(&mut self, item_id: ItemId) {
        self.items.retain(|item| item.id != item_id);
        self.update_ui();
    }

    /// Remove every step in the group
    pub fn remove_group(&mut self, group_id: GroupId) {
        self.items.retain(|item| item.group_id != group_id);
        self.update_ui();
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.update_ui();
    }

    /// First step with this id
    pub fn find_item(&self, item_id: ItemId) -> Option<&StepItem> {
        self.items.iter().find(|item| item.id == item_id)
    }

    pub fn get_item(&self, index: usize) -> Result<&StepItem, StepperError> {
        self.items.get(index).ok_or(StepperError::IndexOutOfRange {
            index,
            len: self.items.len(),
        })
    }

    /// Sorted position of the first step with this id
    pub fn position_of(&self, item_id: ItemId) -> Option<usize> {
        self.items.iter().position(|item| item.id == item_id)
    }

    pub fn size(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn has_visible_items(&self) -> bool {
        !self.items.is_empty()
    }

    pub fn items(&self) -> &[StepItem] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, StepItem> {
        self.items.iter()
    }

    // ─── Selection ──────────────────────────────────────────────────────────────

    pub fn current_step(&self) -> usize {
        self.current_step
    }

    /// Write the selected index without refreshing the display
    pub fn set_current_step(&mut self, step: usize) {
        self.current_step = step;
    }

    /// Select the first step with this id. Returns false and changes nothing
    /// when no step has it.
    pub fn select_menu_item(&mut self, item_id: ItemId) -> bool {
        match self.position_of(item_id) {
            Some(index) => {
                self.current_step = index;
                self.update_ui();
                true
            }
            None => false,
        }
    }

    // ─── Presentation ───────────────────────────────────────────────────────────

    pub fn style(&self) -> &MenuStyle {
        &self.style
    }

    /// Mutable style access; call [`StepperMenu::update_ui`] afterwards
    pub fn style_mut(&mut self) -> &mut MenuStyle {
        &mut self.style
    }

    pub fn set_renderer(&mut self, renderer: impl MenuRenderer + 'static) {
        self.renderer = Some(Box::new(renderer));
        self.update_ui();
    }

    pub fn clear_renderer(&mut self) {
        self.renderer = None;
    }

    /// Recompute the variant's display state and push it to the renderer.
    ///
    /// For fleets this is the only place timers are (re)started or cancelled.
    pub fn update_ui(&mut self) {
        if let MenuKind::Fleets(timers) = &mut self.kind {
            timers.rebuild(&self.items, self.current_step);
        }
        tracing::trace!(
            kind = %self.stepper_type(),
            current_step = self.current_step,
            size = self.items.len(),
            "menu updated"
        );
        if self.renderer.is_some() {
            let view = self.view();
            if let Some(renderer) = self.renderer.as_mut() {
                renderer.render(&view);
            }
        }
    }

    /// Completed percentage shown by the progress variant
    pub fn percent_complete(&self) -> f32 {
        if self.items.is_empty() {
            return 0.0;
        }
        ((self.current_step as f32 + 1.0) / self.items.len() as f32 * 100.0).min(100.0)
    }

    pub fn view(&self) -> MenuView {
        let layout = match &self.kind {
            MenuKind::Tab | MenuKind::TabNumbered => {
                let numbered = matches!(self.kind, MenuKind::TabNumbered);
                MenuLayout::Tabs {
                    steps: self
                        .items
                        .iter()
                        .enumerate()
                        .map(|(index, item)| TabStep {
                            item_id: item.id,
                            title: item.title.clone(),
                            number: numbered.then_some(index + 1),
                            state: StepState::for_index(index, self.current_step),
                        })
                        .collect(),
                }
            }
            MenuKind::Progress => MenuLayout::Progress {
                percent: self.percent_complete(),
            },
            MenuKind::Fleets(timers) => MenuLayout::Fleets {
                segments: timers
                    .timers()
                    .iter()
                    .map(|timer| FleetSegment {
                        item_id: timer.item_id,
                        progress: timer.progress(),
                        running: timer.is_running(),
                    })
                    .collect(),
            },
        };
        MenuView {
            current_step: self.current_step,
            style: self.style,
            layout,
        }
    }

    // ─── Fleets ─────────────────────────────────────────────────────────────────

    /// Fleet duration, or `None` for variants without timers
    pub fn fleet_duration(&self) -> Option<Duration> {
        match &self.kind {
            MenuKind::Fleets(timers) => Some(timers.duration()),
            _ => None,
        }
    }

    /// Store the duration used by fleets started from now on. Returns false
    /// for variants without timers.
    pub fn set_fleet_duration(&mut self, duration: Duration) -> bool {
        match &mut self.kind {
            MenuKind::Fleets(timers) => {
                timers.set_duration(duration);
                true
            }
            _ => false,
        }
    }

    pub fn fleet_timer(&self, index: usize) -> Option<&FleetTimer> {
        match &self.kind {
            MenuKind::Fleets(timers) => timers.get(index),
            _ => None,
        }
    }

    pub fn pause(&mut self) {
        if let MenuKind::Fleets(timers) = &mut self.kind {
            timers.pause();
        }
    }

    pub fn resume(&mut self) {
        if let MenuKind::Fleets(timers) = &mut self.kind {
            timers.resume();
        }
    }

    /// Advance fleet timers. Returns true when the current fleet just filled up
    /// and the stepper should move on.
    pub fn tick(&mut self, delta: Duration) -> bool {
        let finished = match &mut self.kind {
            MenuKind::Fleets(timers) => timers.advance(delta),
            _ => false,
        };
        if finished && self.renderer.is_some() {
            let view = self.view();
            if let Some(renderer) = self.renderer.as_mut() {
                renderer.render(&view);
            }
        }
        finished
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn menu(kind: StepperType) -> StepperMenu {
        StepperMenu::new(kind, MenuStyle::defaults_for(kind))
    }

    #[test]
    fn test_stepper_type_parsing() {
        assert_eq!("tab".parse::<StepperType>().unwrap(), StepperType::Tab);
        assert_eq!(
            "tab-numbered".parse::<StepperType>().unwrap(),
            StepperType::TabNumbered
        );
        assert_eq!("fleets".parse::<StepperType>().unwrap(), StepperType::Fleets);
        assert!(matches!(
            "carousel".parse::<StepperType>(),
            Err(StepperError::InvalidStepperType(_))
        ));
    }

    #[test]
    fn test_stepper_type_identifiers() {
        for kind in StepperType::all() {
            assert_eq!(StepperType::from_identifier(kind.identifier()).unwrap(), *kind);
        }
        assert!(StepperType::from_identifier(0x09).is_err());
    }

    #[test]
    fn test_add_keeps_stable_order() {
        let mut menu = menu(StepperType::Tab);
        menu.add(0, 10, 2, "A");
        menu.add(0, 11, 0, "B");
        menu.add(0, 12, 1, "C");
        menu.add(0, 13, 1, "D");

        let titles: Vec<&str> = menu.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["B", "C", "D", "A"]);
    }

    #[test]
    fn test_duplicate_ids_first_match_wins() {
        let mut menu = menu(StepperType::Tab);
        menu.add(0, 5, 0, "first");
        menu.add(0, 5, 1, "second");

        assert_eq!(menu.size(), 2);
        assert_eq!(menu.find_item(5).unwrap().title, "first");
        assert!(menu.select_menu_item(5));
        assert_eq!(menu.current_step(), 0);
    }

    #[test]
    fn test_get_item_out_of_range() {
        let mut menu = menu(StepperType::Progress);
        menu.add(0, 1, 0, "Only");
        assert!(menu.get_item(0).is_ok());
        assert!(matches!(
            menu.get_item(1),
            Err(StepperError::IndexOutOfRange { index: 1, len: 1 })
        ));
    }

    #[test]
    fn test_select_missing_item_leaves_state() {
        let mut menu = menu(StepperType::Tab);
        menu.add(0, 1, 0, "One");
        menu.add(0, 2, 1, "Two");
        menu.set_current_step(1);

        assert!(!menu.select_menu_item(99));
        assert_eq!(menu.current_step(), 1);
    }

    #[test]
    fn test_remove_group_and_item() {
        let mut menu = menu(StepperType::Tab);
        menu.add(1, 1, 0, "One");
        menu.add(2, 2, 1, "Two");
        menu.add(1, 3, 2, "Three");
        menu.add(2, 4, 3, "Four");

        menu.remove_group(1);
        assert_eq!(menu.size(), 2);
        assert!(menu.find_item(1).is_none());

        menu.remove_item(4);
        assert_eq!(menu.size(), 1);
        assert_eq!(menu.get_item(0).unwrap().id, 2);

        menu.clear();
        assert!(!menu.has_visible_items());
    }

    #[test]
    fn test_remove_does_not_reclamp_current_step() {
        let mut menu = menu(StepperType::Tab);
        menu.add(0, 1, 0, "One");
        menu.add(0, 2, 1, "Two");
        menu.add(0, 3, 2, "Three");
        menu.set_current_step(2);

        menu.remove_item(3);
        assert_eq!(menu.current_step(), 2);
        assert_eq!(menu.size(), 2);
    }

    #[test]
    fn test_progress_percent() {
        let mut menu = menu(StepperType::Progress);
        assert!(menu.percent_complete().abs() < f32::EPSILON);
        for id in 1..=4 {
            menu.add(0, id, id, format!("Step {id}"));
        }
        assert!((menu.percent_complete() - 25.0).abs() < 1e-4);
        menu.set_current_step(3);
        assert!((menu.percent_complete() - 100.0).abs() < 1e-4);
        assert_eq!(
            menu.view().layout,
            MenuLayout::Progress { percent: 100.0 }
        );
    }

    #[test]
    fn test_numbered_tabs_view() {
        let mut menu = menu(StepperType::TabNumbered);
        menu.add(0, 1, 0, "Account");
        menu.add(0, 2, 1, "Profile");
        menu.add(0, 3, 2, "Done");
        menu.select_menu_item(2);

        let MenuLayout::Tabs { steps } = menu.view().layout else {
            panic!("expected tab layout");
        };
        let states: Vec<StepState> = steps.iter().map(|s| s.state).collect();
        assert_eq!(
            states,
            vec![StepState::Completed, StepState::Active, StepState::Pending]
        );
        assert_eq!(steps[2].number, Some(3));
    }

    #[test]
    fn test_plain_tabs_have_no_numbers() {
        let mut menu = menu(StepperType::Tab);
        menu.add(0, 1, 0, "Account");
        let MenuLayout::Tabs { steps } = menu.view().layout else {
            panic!("expected tab layout");
        };
        assert_eq!(steps[0].number, None);
    }

    #[test]
    fn test_renderer_receives_every_update() {
        let views: Arc<Mutex<Vec<MenuView>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&views);

        let mut menu = menu(StepperType::Tab);
        menu.set_renderer(move |view: &MenuView| sink.lock().unwrap().push(view.clone()));
        menu.add(0, 1, 0, "One");
        menu.add(0, 2, 1, "Two");
        menu.select_menu_item(2);

        let views = views.lock().unwrap();
        // set_renderer, two adds, one select
        assert_eq!(views.len(), 4);
        assert_eq!(views.last().unwrap().current_step, 1);
    }

    #[test]
    fn test_fleet_accessors_on_other_kinds() {
        let mut menu = menu(StepperType::Tab);
        assert_eq!(menu.fleet_duration(), None);
        assert!(!menu.set_fleet_duration(Duration::from_millis(10)));
        menu.add(0, 1, 0, "One");
        assert!(!menu.tick(Duration::from_secs(60)));
        assert!(menu.fleet_timer(0).is_none());
    }

    #[test]
    fn test_fleets_restart_current_on_update() {
        let mut menu = StepperMenu::with_fleet_duration(
            StepperType::Fleets,
            MenuStyle::defaults_for(StepperType::Fleets),
            Duration::from_millis(1000),
        );
        menu.add(0, 1, 0, "One");
        menu.add(0, 2, 1, "Two");
        menu.tick(Duration::from_millis(600));
        assert!((menu.fleet_timer(0).unwrap().progress() - 0.6).abs() < 1e-6);

        menu.update_ui();
        assert!(menu.fleet_timer(0).unwrap().progress().abs() < f32::EPSILON);
        assert!(menu.fleet_timer(0).unwrap().is_running());
    }

    #[test]
    fn test_removed_fleet_item_drops_its_timer() {
        let mut menu = menu(StepperType::Fleets);
        menu.add(0, 1, 0, "One");
        menu.add(0, 2, 1, "Two");
        menu.remove_item(2);
        assert!(menu.fleet_timer(1).is_none());
        assert_eq!(menu.fleet_timer(0).unwrap().item_id, 1);
    }
}
