pub mod help_dialog;
pub mod keybindings;
pub mod stepper_panel;
pub mod terminal_guard;

use ratatui::layout::{Constraint, Direction, Layout, Rect};

pub use help_dialog::HelpDialog;
pub use keybindings::{action_for, Action};
pub use stepper_panel::{rgb_color, StepperPanel};
pub use terminal_guard::{install_panic_hook, TerminalGuard, Tui};

/// Helper function to create a centered rect
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
