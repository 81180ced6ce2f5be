//! Two-way bridge between a [`Stepper`](crate::Stepper) and an external
//! navigation host.
//!
//! Outbound, every in-range step transition asks the host to show the
//! destination owned by that step. Inbound, the host reports destination
//! changes through a [`DestinationListener`]; the stepper drains them and
//! selects the owning step without navigating again.
//!
//! Destination ids are step item ids.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::menu::ItemId;

/// Identifier of a host destination; equal to the id of the step that owns it
pub type DestinationId = ItemId;

/// Outbound navigations remembered while waiting for the host to echo them
const MAX_PENDING_ECHOES: usize = 16;

/// Transition animation names, passed through to the host untouched
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavAnimations {
    pub enter: String,
    pub exit: String,
    pub pop_enter: String,
    pub pop_exit: String,
}

impl Default for NavAnimations {
    fn default() -> Self {
        Self {
            enter: "slide_left_enter".to_string(),
            exit: "slide_left_exit".to_string(),
            pop_enter: "slide_right_enter".to_string(),
            pop_exit: "slide_right_exit".to_string(),
        }
    }
}

impl NavAnimations {
    pub fn new(
        enter: impl Into<String>,
        exit: impl Into<String>,
        pop_enter: impl Into<String>,
        pop_exit: impl Into<String>,
    ) -> Self {
        Self {
            enter: enter.into(),
            exit: exit.into(),
            pop_enter: pop_enter.into(),
            pop_exit: pop_exit.into(),
        }
    }

    /// Cross-fade in both directions
    pub fn fade() -> Self {
        Self::new("fade_in", "fade_out", "fade_in", "fade_out")
    }
}

/// Handle a host uses to report destination changes back to the stepper.
///
/// A listener from a discarded binding stays valid to call but its
/// notifications go nowhere.
#[derive(Debug, Clone)]
pub struct DestinationListener {
    tx: mpsc::UnboundedSender<DestinationId>,
}

impl DestinationListener {
    /// Report that the host now shows `destination`. Returns false when the
    /// binding this listener belonged to has been discarded.
    pub fn notify(&self, destination: DestinationId) -> bool {
        self.tx.send(destination).is_ok()
    }

    pub fn is_bound(&self) -> bool {
        !self.tx.is_closed()
    }
}

/// External routing component a stepper can stay synchronized with
pub trait NavigationHost {
    /// Show the destination, animating with the given transition names
    fn navigate_to(&mut self, destination: DestinationId, animations: &NavAnimations);

    /// Register the single listener for destination changes, replacing any
    /// previous one
    fn on_destination_changed(&mut self, listener: DestinationListener);

    /// Whether `navigate_to` is followed by a destination-changed
    /// notification for the same destination before it returns
    fn reports_own_navigations(&self) -> bool {
        true
    }
}

/// One live host binding. Replaced wholesale on rebind.
///
/// Echoes are only expected from hosts that report their own navigations,
/// and only until the next drain of the inbound queue.
pub(crate) struct NavigationBinding {
    host: Box<dyn NavigationHost>,
    animations: NavAnimations,
    inbound: mpsc::UnboundedReceiver<DestinationId>,
    expects_echoes: bool,
    pending_echoes: VecDeque<DestinationId>,
}

impl NavigationBinding {
    pub(crate) fn attach(mut host: Box<dyn NavigationHost>, animations: NavAnimations) -> Self {
        let (tx, inbound) = mpsc::unbounded_channel();
        host.on_destination_changed(DestinationListener { tx });
        let expects_echoes = host.reports_own_navigations();
        Self {
            host,
            animations,
            inbound,
            expects_echoes,
            pending_echoes: VecDeque::new(),
        }
    }

    pub(crate) fn animations(&self) -> &NavAnimations {
        &self.animations
    }

    pub(crate) fn navigate(&mut self, destination: DestinationId) {
        if self.expects_echoes {
            self.pending_echoes.push_back(destination);
            if self.pending_echoes.len() > MAX_PENDING_ECHOES {
                self.pending_echoes.pop_front();
            }
        }
        tracing::debug!(destination, "navigating host");
        self.host.navigate_to(destination, &self.animations);
    }

    pub(crate) fn next_inbound(&mut self) -> Option<DestinationId> {
        self.inbound.try_recv().ok()
    }

    /// True when `destination` answers one of our own outbound navigations.
    /// Older pending echoes are dropped along with it.
    pub(crate) fn consume_echo(&mut self, destination: DestinationId) -> bool {
        match self.pending_echoes.iter().position(|d| *d == destination) {
            Some(pos) => {
                self.pending_echoes.drain(..=pos);
                true
            }
            None => false,
        }
    }

    /// Forget echoes that never arrived. Called once the inbound queue is
    /// drained so a late real change is never mistaken for one.
    pub(crate) fn clear_pending_echoes(&mut self) {
        if !self.pending_echoes.is_empty() {
            tracing::trace!(count = self.pending_echoes.len(), "dropping unanswered echoes");
            self.pending_echoes.clear();
        }
    }

    pub(crate) fn into_host(self) -> Box<dyn NavigationHost> {
        self.host
    }
}

// ─── Mock Host ──────────────────────────────────────────────────────────────

/// A navigation recorded by [`MockNavigationHost`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedNavigation {
    pub destination: DestinationId,
    pub animations: NavAnimations,
}

#[derive(Debug, Default)]
struct MockHostState {
    navigations: Vec<RecordedNavigation>,
    listener: Option<DestinationListener>,
    current: Option<DestinationId>,
    echo: bool,
}

/// In-memory host for tests. Clones share state.
///
/// By default it behaves like a real router: every `navigate_to` is followed
/// by a destination-changed notification for the same destination.
#[derive(Debug, Clone)]
pub struct MockNavigationHost {
    state: Arc<Mutex<MockHostState>>,
}

impl Default for MockNavigationHost {
    fn default() -> Self {
        Self::new()
    }
}

impl MockNavigationHost {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(MockHostState {
                echo: true,
                ..MockHostState::default()
            })),
        }
    }

    /// A host that navigates without reporting the change back
    pub fn without_echo() -> Self {
        let mock = Self::new();
        mock.state.lock().unwrap().echo = false;
        mock
    }

    /// Simulate a destination change the stepper did not ask for (back
    /// button, deep link). Returns false when no live listener is registered.
    pub fn emit(&self, destination: DestinationId) -> bool {
        let mut state = self.state.lock().unwrap();
        state.current = Some(destination);
        state
            .listener
            .as_ref()
            .is_some_and(|listener| listener.notify(destination))
    }

    pub fn navigations(&self) -> Vec<RecordedNavigation> {
        self.state.lock().unwrap().navigations.clone()
    }

    pub fn destinations(&self) -> Vec<DestinationId> {
        self.navigations().iter().map(|n| n.destination).collect()
    }

    pub fn current(&self) -> Option<DestinationId> {
        self.state.lock().unwrap().current
    }

    pub fn has_live_listener(&self) -> bool {
        self.state
            .lock()
            .unwrap()
            .listener
            .as_ref()
            .is_some_and(DestinationListener::is_bound)
    }
}

impl NavigationHost for MockNavigationHost {
    fn navigate_to(&mut self, destination: DestinationId, animations: &NavAnimations) {
        let mut state = self.state.lock().unwrap();
        state.navigations.push(RecordedNavigation {
            destination,
            animations: animations.clone(),
        });
        state.current = Some(destination);
        if state.echo {
            if let Some(listener) = &state.listener {
                listener.notify(destination);
            }
        }
    }

    fn on_destination_changed(&mut self, listener: DestinationListener) {
        self.state.lock().unwrap().listener = Some(listener);
    }

    fn reports_own_navigations(&self) -> bool {
        self.state.lock().unwrap().echo
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attach_registers_listener() {
        let host = MockNavigationHost::new();
        let mut binding = NavigationBinding::attach(Box::new(host.clone()), NavAnimations::default());
        assert!(host.has_live_listener());

        assert!(host.emit(7));
        assert_eq!(binding.next_inbound(), Some(7));
        assert_eq!(binding.next_inbound(), None);
    }

    #[test]
    fn test_dropped_binding_silences_listener() {
        let host = MockNavigationHost::new();
        let binding = NavigationBinding::attach(Box::new(host.clone()), NavAnimations::default());
        drop(binding);

        assert!(!host.has_live_listener());
        assert!(!host.emit(3));
    }

    #[test]
    fn test_navigate_records_animations() {
        let host = MockNavigationHost::without_echo();
        let mut binding = NavigationBinding::attach(Box::new(host.clone()), NavAnimations::fade());
        binding.navigate(4);

        let navigations = host.navigations();
        assert_eq!(navigations.len(), 1);
        assert_eq!(navigations[0].destination, 4);
        assert_eq!(navigations[0].animations, NavAnimations::fade());
        assert_eq!(binding.animations(), &NavAnimations::fade());
        assert_eq!(binding.next_inbound(), None);
    }

    #[test]
    fn test_echo_is_consumed_once() {
        let host = MockNavigationHost::new();
        let mut binding = NavigationBinding::attach(Box::new(host.clone()), NavAnimations::default());
        binding.navigate(1);
        binding.navigate(2);

        assert_eq!(binding.next_inbound(), Some(1));
        assert!(binding.consume_echo(1));
        assert_eq!(binding.next_inbound(), Some(2));
        assert!(binding.consume_echo(2));
        assert!(!binding.consume_echo(2));
    }

    #[test]
    fn test_late_echo_drops_older_pending() {
        let host = MockNavigationHost::new();
        let mut binding = NavigationBinding::attach(Box::new(host), NavAnimations::default());
        binding.navigate(1);
        binding.navigate(2);
        binding.navigate(3);

        assert!(binding.consume_echo(2));
        assert!(!binding.consume_echo(1));
        assert!(binding.consume_echo(3));
    }

    #[test]
    fn test_pending_echoes_are_bounded() {
        let host = MockNavigationHost::new();
        let mut binding = NavigationBinding::attach(Box::new(host), NavAnimations::default());
        for destination in 0..=(MAX_PENDING_ECHOES as i32) {
            binding.navigate(destination);
        }
        assert!(!binding.consume_echo(0));
        assert!(binding.consume_echo(MAX_PENDING_ECHOES as i32));
    }

    #[test]
    fn test_silent_host_expects_no_echoes() {
        let host = MockNavigationHost::without_echo();
        let mut binding = NavigationBinding::attach(Box::new(host.clone()), NavAnimations::default());
        binding.navigate(1);
        binding.navigate(2);

        assert!(host.emit(1));
        assert_eq!(binding.next_inbound(), Some(1));
        assert!(!binding.consume_echo(1));
    }

    #[test]
    fn test_cleared_echoes_no_longer_match() {
        let host = MockNavigationHost::new();
        let mut binding = NavigationBinding::attach(Box::new(host), NavAnimations::default());
        binding.navigate(5);
        binding.clear_pending_echoes();

        assert_eq!(binding.next_inbound(), Some(5));
        assert!(!binding.consume_echo(5));
    }
}
