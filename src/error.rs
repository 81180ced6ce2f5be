//! Error types for the stepper core

use thiserror::Error;

/// Errors raised by menu construction and step transitions.
///
/// Lookups that simply find nothing (`select_menu_item`, `find_item`) are not
/// errors; they report absence through their return value.
#[derive(Error, Debug)]
pub enum StepperError {
    #[error("invalid stepper type provided: {0}")]
    InvalidStepperType(String),

    #[error("items are required to build a stepper")]
    MissingItems,

    #[error("configuration error: {0}")]
    Configuration(#[from] config::ConfigError),

    #[error("step index {index} is out of range for a menu of {len} items")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("the stepper menu has no items")]
    EmptyMenu,
}

impl StepperError {
    /// Whether the error was raised while building the stepper rather than
    /// while operating on it.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            StepperError::InvalidStepperType(_)
                | StepperError::MissingItems
                | StepperError::Configuration(_)
        )
    }
}
