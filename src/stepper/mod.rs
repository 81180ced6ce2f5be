//! The step state machine.
//!
//! [`Stepper`] keeps no step counter of its own: the menu's `current_step` is
//! the single source of truth, and every transition goes through
//! [`Stepper::request_step`], which clamps the target, refreshes the menu,
//! drives the navigation host when one is bound and notifies the listener.
//!
//! Everything here is synchronous. A transition, its display refresh and its
//! outbound navigation have all happened by the time the call returns.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::StepperConfig;
use crate::error::StepperError;
use crate::menu::{
    GroupId, ItemId, MenuStyle, MenuView, Rgb, StepItem, StepperMenu, StepperType, TextStyle,
    DEFAULT_FLEET_DURATION,
};
use crate::navigation::{DestinationId, NavAnimations, NavigationBinding, NavigationHost};

mod listener;


pub use listener::{CallbackListener, RecordingListener, StepEvent, StepperNavListener};

/// How `go_to_step` treats a request for the step that is already current
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransitionMode {
    /// Re-selecting the current step is a no-op
    #[default]
    Strict,
    /// Re-selecting the current step notifies the listener again
    Lenient,
}

/// What a transition request did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// The current step is now this index and the listener was told
    Changed(usize),
    /// The request went past the last step; the completion event fired
    Completed,
    /// Nothing happened (strict re-selection)
    Unchanged,
}

/// The style values a host usually round-trips through its own state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepperSettings {
    pub widget_color: Rgb,
    pub text_color: Rgb,
    pub text_size: u16,
    pub icon_size: u16,
}

/// Wizard controller over one [`StepperMenu`]
pub struct Stepper {
    menu: StepperMenu,
    mode: TransitionMode,
    listener: Option<Box<dyn StepperNavListener>>,
    navigation: Option<NavigationBinding>,
}

impl fmt::Debug for Stepper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stepper")
            .field("menu", &self.menu)
            .field("mode", &self.mode)
            .field("listener", &self.listener.is_some())
            .field("navigation", &self.navigation.is_some())
            .finish()
    }
}

impl Stepper {
    /// An empty stepper of the given type with default styling
    pub fn new(kind: StepperType) -> Self {
        Self::with_menu(
            StepperMenu::new(kind, MenuStyle::defaults_for(kind)),
            TransitionMode::default(),
        )
    }

    pub fn with_menu(menu: StepperMenu, mode: TransitionMode) -> Self {
        Self {
            menu,
            mode,
            listener: None,
            navigation: None,
        }
    }

    /// Build a stepper from configuration. Fails when no items are declared.
    pub fn from_config(config: &StepperConfig) -> Result<Self, StepperError> {
        if config.items.is_empty() {
            return Err(StepperError::MissingItems);
        }

        let mut menu =
            StepperMenu::with_fleet_duration(config.kind, config.style(), config.fleet_duration());
        for item in &config.items {
            menu.add(item.group_id, item.id, item.order, item.title.clone());
        }

        tracing::debug!(
            kind = %config.kind,
            items = menu.size(),
            mode = ?config.mode,
            "stepper built from config"
        );

        Ok(Self::with_menu(menu, config.mode))
    }

    pub fn with_mode(mut self, mode: TransitionMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn mode(&self) -> TransitionMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: TransitionMode) {
        self.mode = mode;
    }

    pub fn stepper_type(&self) -> StepperType {
        self.menu.stepper_type()
    }

    pub fn menu(&self) -> &StepperMenu {
        &self.menu
    }

    pub fn menu_mut(&mut self) -> &mut StepperMenu {
        &mut self.menu
    }

    pub fn view(&self) -> MenuView {
        self.menu.view()
    }

    /// 0-indexed current step
    pub fn current_step(&self) -> usize {
        self.menu.current_step()
    }

    // ─── Items ──────────────────────────────────────────────────────────────────

    pub fn add_item(
        &mut self,
        group_id: GroupId,
        item_id: ItemId,
        order: i32,
        title: impl Into<String>,
    ) -> StepItem {
        self.menu.add(group_id, item_id, order, title)
    }

    pub fn add_title(&mut self, title: impl Into<String>) -> StepItem {
        self.menu.add_title(title)
    }

    pub fn remove_item(&mut self, item_id: ItemId) {
        self.menu.remove_item(item_id);
    }

    pub fn remove_group(&mut self, group_id: GroupId) {
        self.menu.remove_group(group_id);
    }

    pub fn clear(&mut self) {
        self.menu.clear();
    }

    /// Select a step by id without notifying the listener
    pub fn select_menu_item(&mut self, item_id: ItemId) -> bool {
        self.menu.select_menu_item(item_id)
    }

    pub fn find_item(&self, item_id: ItemId) -> Option<&StepItem> {
        self.menu.find_item(item_id)
    }

    pub fn get_item(&self, index: usize) -> Result<&StepItem, StepperError> {
        self.menu.get_item(index)
    }

    pub fn size(&self) -> usize {
        self.menu.size()
    }

    // ─── Listener ───────────────────────────────────────────────────────────────

    /// Replace the listener
    pub fn set_listener(&mut self, listener: impl StepperNavListener + 'static) {
        self.listener = Some(Box::new(listener));
    }

    /// Replace the listener with one built from two closures
    pub fn on_events<S, C>(&mut self, step_changed: S, completed: C)
    where
        S: FnMut(usize) + 'static,
        C: FnMut() + 'static,
    {
        self.set_listener(CallbackListener::new(step_changed, completed));
    }

    pub fn clear_listener(&mut self) {
        self.listener = None;
    }

    fn notify_step_changed(&mut self, step: usize) {
        if let Some(listener) = self.listener.as_mut() {
            listener.on_step_changed(step);
        }
    }

    fn notify_completed(&mut self) {
        if let Some(listener) = self.listener.as_mut() {
            listener.on_completed();
        }
    }

    // ─── Transitions ────────────────────────────────────────────────────────────

    pub fn go_to_next_step(&mut self) -> Result<StepOutcome, StepperError> {
        self.request_step(as_target(self.current_step()).saturating_add(1))
    }

    /// Step back one. A current index left past the end by removals counts
    /// from the last step.
    pub fn go_to_previous_step(&mut self) -> Result<StepOutcome, StepperError> {
        let base = self.current_step().min(self.size().saturating_sub(1));
        self.request_step(as_target(base) - 1)
    }

    /// Jump to `index`. In strict mode asking for the current step does nothing.
    pub fn go_to_step(&mut self, index: usize) -> Result<StepOutcome, StepperError> {
        if !self.menu.is_empty()
            && self.mode == TransitionMode::Strict
            && index == self.current_step()
        {
            tracing::trace!(index, "step already current");
            return Ok(StepOutcome::Unchanged);
        }
        self.request_step(as_target(index))
    }

    /// The one transition function.
    ///
    /// Negative targets re-affirm step 0. Targets past the last step clamp to
    /// it and fire the completion event instead of a step change; completion
    /// is an edge event and never leaves the index past the end.
    pub fn request_step(&mut self, target: isize) -> Result<StepOutcome, StepperError> {
        let size = self.menu.size();
        if size == 0 {
            tracing::warn!(target, "step requested on an empty menu");
            return Err(StepperError::EmptyMenu);
        }

        let step = usize::try_from(target).unwrap_or(0);
        if step >= size {
            return Ok(self.complete());
        }

        self.menu.set_current_step(step);
        self.menu.update_ui();

        if let Some(binding) = self.navigation.as_mut() {
            let destination = self.menu.items()[step].id;
            binding.navigate(destination);
        }

        tracing::debug!(step, size, "step changed");
        self.notify_step_changed(step);
        Ok(StepOutcome::Changed(step))
    }

    fn complete(&mut self) -> StepOutcome {
        let last = self.menu.size() - 1;
        let previous = self.menu.current_step();
        self.menu.set_current_step(last);
        // A finished last fleet stays full instead of restarting
        if previous != last {
            self.menu.update_ui();
        }

        tracing::debug!(last, "stepper completed");
        self.notify_completed();
        StepOutcome::Completed
    }

    // ─── Navigation ─────────────────────────────────────────────────────────────

    /// Bind a navigation host with the default slide animations
    pub fn setup_with_navigation(&mut self, host: impl NavigationHost + 'static) {
        self.bind_navigation(host, NavAnimations::default());
    }

    /// Bind a navigation host, discarding any previous binding and whatever
    /// destination changes it had not delivered yet.
    pub fn bind_navigation(
        &mut self,
        host: impl NavigationHost + 'static,
        animations: NavAnimations,
    ) {
        if self.navigation.take().is_some() {
            tracing::debug!("replacing navigation binding");
        }
        self.navigation = Some(NavigationBinding::attach(Box::new(host), animations));
        tracing::debug!("navigation bound");
    }

    /// Drop the binding and hand the host back
    pub fn unbind_navigation(&mut self) -> Option<Box<dyn NavigationHost>> {
        let binding = self.navigation.take()?;
        tracing::debug!("navigation unbound");
        Some(binding.into_host())
    }

    pub fn is_navigation_bound(&self) -> bool {
        self.navigation.is_some()
    }

    pub fn navigation_animations(&self) -> Option<&NavAnimations> {
        self.navigation.as_ref().map(NavigationBinding::animations)
    }

    /// Apply every destination change the host has reported since the last
    /// call. Echoes of navigations made since the previous drain are
    /// skipped. Returns how many changes selected a step.
    pub fn dispatch_navigation(&mut self) -> usize {
        let mut selected = 0;
        while let Some(destination) = self
            .navigation
            .as_mut()
            .and_then(NavigationBinding::next_inbound)
        {
            let is_echo = self
                .navigation
                .as_mut()
                .is_some_and(|binding| binding.consume_echo(destination));
            if is_echo {
                tracing::trace!(destination, "navigation echo");
                continue;
            }
            if self.handle_destination_changed(destination) {
                selected += 1;
            }
        }
        if let Some(binding) = self.navigation.as_mut() {
            binding.clear_pending_echoes();
        }
        selected
    }

    /// Select the step that owns `destination` and notify the listener.
    ///
    /// Never navigates: the host is already showing the destination.
    pub fn handle_destination_changed(&mut self, destination: DestinationId) -> bool {
        if !self.menu.select_menu_item(destination) {
            tracing::warn!(destination, "destination has no matching step");
            return false;
        }
        let step = self.menu.current_step();
        tracing::debug!(destination, step, "destination changed");
        self.notify_step_changed(step);
        true
    }

    // ─── Fleets ─────────────────────────────────────────────────────────────────

    /// Feed elapsed time to the fleet timers. When the current fleet fills up
    /// the stepper advances exactly as if `go_to_next_step` had been called.
    pub fn tick(&mut self, delta: Duration) -> Result<Option<StepOutcome>, StepperError> {
        if !self.menu.tick(delta) {
            return Ok(None);
        }
        let next = as_target(self.current_step()).saturating_add(1);
        tracing::debug!(next, "fleet elapsed");
        self.request_step(next).map(Some)
    }

    /// Freeze running fleets. No-op for other types.
    pub fn pause(&mut self) {
        self.menu.pause();
    }

    pub fn resume(&mut self) {
        self.menu.resume();
    }

    /// Fleet duration; other types report the default
    pub fn fleet_duration(&self) -> Duration {
        self.menu.fleet_duration().unwrap_or(DEFAULT_FLEET_DURATION)
    }

    /// Change the duration of fleets started from now on. No-op for other types.
    pub fn set_fleet_duration(&mut self, duration: Duration) {
        if !self.menu.set_fleet_duration(duration) {
            tracing::trace!(kind = %self.stepper_type(), "fleet duration ignored");
        }
    }

    // ─── Style ──────────────────────────────────────────────────────────────────

    fn restyle(&mut self, apply: impl FnOnce(&mut MenuStyle)) {
        apply(self.menu.style_mut());
        self.menu.update_ui();
    }

    pub fn widget_color(&self) -> Rgb {
        self.menu.style().widget_color
    }

    pub fn set_widget_color(&mut self, color: Rgb) {
        self.restyle(|style| style.widget_color = color);
    }

    pub fn text_color(&self) -> Rgb {
        self.menu.style().text_color
    }

    pub fn set_text_color(&mut self, color: Rgb) {
        self.restyle(|style| style.text_color = color);
    }

    pub fn text_style(&self) -> TextStyle {
        self.menu.style().text_style
    }

    pub fn set_text_style(&mut self, text_style: TextStyle) {
        self.restyle(|style| style.text_style = text_style);
    }

    /// Label size, falling back to the default of the stepper type
    pub fn text_size(&self) -> u16 {
        self.menu
            .style()
            .text_size
            .unwrap_or_else(|| MenuStyle::default_text_size(self.stepper_type()))
    }

    pub fn set_text_size(&mut self, size: u16) {
        self.restyle(|style| style.text_size = Some(size));
    }

    pub fn icon_size(&self) -> u16 {
        self.menu.style().icon_size
    }

    pub fn set_icon_size(&mut self, size: u16) {
        self.restyle(|style| style.icon_size = size);
    }

    pub fn settings(&self) -> StepperSettings {
        StepperSettings {
            widget_color: self.widget_color(),
            text_color: self.text_color(),
            text_size: self.text_size(),
            icon_size: self.icon_size(),
        }
    }

    /// Apply all settings with a single display refresh
    pub fn apply_settings(&mut self, settings: StepperSettings) {
        self.restyle(|style| {
            style.widget_color = settings.widget_color;
            style.text_color = settings.text_color;
            style.text_size = Some(settings.text_size);
            style.icon_size = settings.icon_size;
        });
    }
}

/// Requested index as a signed target. Indices past `isize::MAX` still land
/// beyond the end.
fn as_target(index: usize) -> isize {
    isize::try_from(index).unwrap_or(isize::MAX)
}
