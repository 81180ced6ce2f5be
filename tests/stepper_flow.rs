//! End-to-end flows through the public API: config file to stepper, with a
//! navigation host and a renderer attached.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use stepper::config::Config;
use stepper::menu::{MenuLayout, MenuView, StepState};
use stepper::{
    MockNavigationHost, NavAnimations, RecordingListener, StepEvent, StepOutcome, Stepper,
    StepperError, StepperType, TransitionMode,
};
use tempfile::TempDir;

const WIZARD: &str = r##"
[stepper]
type = "tab-numbered"
widget_color = "#00AA00"

[[stepper.items]]
group = 1
id = 30
order = 2
title = "Confirm"

[[stepper.items]]
group = 1
id = 10
order = 0
title = "Details"

[[stepper.items]]
group = 2
id = 20
order = 1
title = "Payment"
"##;

fn load(contents: &str) -> Config {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("wizard.toml");
    std::fs::write(&path, contents).unwrap();
    Config::load_from(None, Some(&path)).unwrap()
}

#[test]
fn wizard_from_config_walks_to_completion() {
    let config = load(WIZARD);
    let mut stepper = Stepper::from_config(&config.stepper).unwrap();
    let recorder = RecordingListener::new();
    stepper.set_listener(recorder.clone());

    let titles: Vec<_> = stepper.menu().iter().map(|i| i.title.clone()).collect();
    assert_eq!(titles, vec!["Details", "Payment", "Confirm"]);

    while stepper.go_to_next_step().unwrap() != StepOutcome::Completed {}

    assert_eq!(
        recorder.events(),
        vec![
            StepEvent::StepChanged(1),
            StepEvent::StepChanged(2),
            StepEvent::Completed,
        ]
    );
}

#[test]
fn renderer_sees_every_transition() {
    let config = load(WIZARD);
    let mut stepper = Stepper::from_config(&config.stepper).unwrap();

    let views: Rc<RefCell<Vec<MenuView>>> = Rc::default();
    let sink = Rc::clone(&views);
    stepper
        .menu_mut()
        .set_renderer(move |view: &MenuView| sink.borrow_mut().push(view.clone()));

    stepper.go_to_step(2).unwrap();

    let views = views.borrow();
    let last = views.last().unwrap();
    assert_eq!(last.current_step, 2);
    let MenuLayout::Tabs { steps } = &last.layout else {
        panic!("expected tabs, got {:?}", last.layout);
    };
    let states: Vec<_> = steps.iter().map(|s| s.state).collect();
    assert_eq!(
        states,
        vec![StepState::Completed, StepState::Completed, StepState::Active]
    );
    assert_eq!(steps[2].number, Some(3));
}

#[test]
fn navigation_stays_in_sync_both_ways() {
    let config = load(WIZARD);
    let mut stepper = Stepper::from_config(&config.stepper).unwrap();
    let recorder = RecordingListener::new();
    stepper.set_listener(recorder.clone());

    let host = MockNavigationHost::new();
    stepper.bind_navigation(host.clone(), NavAnimations::fade());

    stepper.go_to_next_step().unwrap();
    assert_eq!(host.current(), Some(20));

    // Host-initiated change, e.g. a deep link to the last screen
    host.emit(30);
    stepper.dispatch_navigation();

    assert_eq!(stepper.current_step(), 2);
    assert_eq!(recorder.steps(), vec![1, 2]);
    assert_eq!(host.destinations(), vec![20]);
}

#[test]
fn lenient_mode_from_config() {
    let config = load(
        r#"
[stepper]
type = "progress"
mode = "lenient"

[[stepper.items]]
id = 1
title = "Only"
"#,
    );
    let mut stepper = Stepper::from_config(&config.stepper).unwrap();
    assert_eq!(stepper.mode(), TransitionMode::Lenient);

    let recorder = RecordingListener::new();
    stepper.set_listener(recorder.clone());
    stepper.go_to_step(0).unwrap();
    stepper.go_to_step(0).unwrap();
    assert_eq!(recorder.steps(), vec![0, 0]);
    assert!((stepper.menu().percent_complete() - 100.0).abs() < f32::EPSILON);
}

#[test]
fn fleets_run_to_completion_on_ticks() {
    let config = load(
        r#"
[stepper]
type = "fleets"
fleet_duration_ms = 200

[[stepper.items]]
id = 1
order = 0

[[stepper.items]]
id = 2
order = 1

[[stepper.items]]
id = 3
order = 2
"#,
    );
    let mut stepper = Stepper::from_config(&config.stepper).unwrap();
    assert_eq!(stepper.stepper_type(), StepperType::Fleets);
    let recorder = RecordingListener::new();
    stepper.set_listener(recorder.clone());

    for _ in 0..20 {
        stepper.tick(Duration::from_millis(50)).unwrap();
    }

    assert_eq!(recorder.steps(), vec![1, 2]);
    assert_eq!(recorder.completions(), 1);
    assert_eq!(stepper.current_step(), 2);
}

#[test]
fn config_without_items_cannot_build_a_stepper() {
    let config = load("[stepper]\ntype = \"tab\"\n");
    let err = Stepper::from_config(&config.stepper).unwrap_err();
    assert!(matches!(err, StepperError::MissingItems));
    assert!(err.is_configuration_error());
}

#[test]
fn cleared_menu_rejects_transitions() {
    let config = load(WIZARD);
    let mut stepper = Stepper::from_config(&config.stepper).unwrap();
    stepper.clear();
    assert!(matches!(
        stepper.go_to_next_step(),
        Err(StepperError::EmptyMenu)
    ));
}
