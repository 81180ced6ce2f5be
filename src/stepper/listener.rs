//! Step event listeners

use std::sync::{Arc, Mutex};

/// Receives the two events a stepper emits.
///
/// A stepper holds at most one listener; setting another replaces it.
pub trait StepperNavListener {
    /// The current step changed to `step` (0-indexed)
    fn on_step_changed(&mut self, step: usize);

    /// A transition tried to move past the last step
    fn on_completed(&mut self);
}

/// Listener built from two closures
pub struct CallbackListener<S, C> {
    step_changed: S,
    completed: C,
}

impl<S, C> CallbackListener<S, C>
where
    S: FnMut(usize),
    C: FnMut(),
{
    pub fn new(step_changed: S, completed: C) -> Self {
        Self {
            step_changed,
            completed,
        }
    }
}

impl<S, C> StepperNavListener for CallbackListener<S, C>
where
    S: FnMut(usize),
    C: FnMut(),
{
    fn on_step_changed(&mut self, step: usize) {
        (self.step_changed)(step);
    }

    fn on_completed(&mut self) {
        (self.completed)();
    }
}

/// Event captured by [`RecordingListener`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepEvent {
    StepChanged(usize),
    Completed,
}

/// Listener that records every event. Clones share the log.
#[derive(Debug, Clone, Default)]
pub struct RecordingListener {
    events: Arc<Mutex<Vec<StepEvent>>>,
}

impl RecordingListener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<StepEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Steps reported through `on_step_changed`, in order
    pub fn steps(&self) -> Vec<usize> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                StepEvent::StepChanged(step) => Some(step),
                StepEvent::Completed => None,
            })
            .collect()
    }

    pub fn completions(&self) -> usize {
        self.events()
            .iter()
            .filter(|event| **event == StepEvent::Completed)
            .count()
    }

    pub fn clear(&self) {
        self.events.lock().unwrap().clear();
    }
}

impl StepperNavListener for RecordingListener {
    fn on_step_changed(&mut self, step: usize) {
        self.events.lock().unwrap().push(StepEvent::StepChanged(step));
    }

    fn on_completed(&mut self) {
        self.events.lock().unwrap().push(StepEvent::Completed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_callback_listener_routes_events() {
        let mut steps = Vec::new();
        let mut completed = 0;
        {
            let mut listener = CallbackListener::new(|step| steps.push(step), || completed += 1);
            listener.on_step_changed(2);
            listener.on_completed();
            listener.on_step_changed(0);
        }
        assert_eq!(steps, vec![2, 0]);
        assert_eq!(completed, 1);
    }

    #[test]
    fn test_recording_listener_clones_share_log() {
        let recorder = RecordingListener::new();
        let mut handle = recorder.clone();
        handle.on_step_changed(1);
        handle.on_completed();

        assert_eq!(
            recorder.events(),
            vec![StepEvent::StepChanged(1), StepEvent::Completed]
        );
        assert_eq!(recorder.steps(), vec![1]);
        assert_eq!(recorder.completions(), 1);

        recorder.clear();
        assert!(recorder.events().is_empty());
    }
}
