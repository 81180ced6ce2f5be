//! Stepper - wizard step indicators with optional navigation sync
//!
//! A [`Stepper`] owns an ordered menu of steps and one current index. It
//! draws as tabs, numbered tabs, a progress bar or auto-advancing fleets,
//! and can keep an external navigation host in step with it.

pub mod config;
pub mod error;
pub mod logging;
pub mod menu;
pub mod navigation;
pub mod stepper;
pub mod ui;

pub use error::StepperError;
pub use menu::{MenuStyle, Rgb, StepItem, StepperMenu, StepperType, TextStyle};
pub use navigation::{DestinationListener, MockNavigationHost, NavAnimations, NavigationHost};
pub use stepper::{
    RecordingListener, StepEvent, StepOutcome, Stepper, StepperNavListener, StepperSettings,
    TransitionMode,
};
