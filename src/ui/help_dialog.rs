use ratatui::{
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use super::centered_rect;
use super::keybindings::shortcuts_by_category;

#[derive(Debug, Default)]
pub struct HelpDialog {
    pub visible: bool,
}

impl HelpDialog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
    }

    fn lines() -> Vec<Line<'static>> {
        let mut help_text = vec![
            Line::from(Span::styled(
                "Keyboard Shortcuts",
                Style::default()
                    .add_modifier(Modifier::BOLD)
                    .fg(Color::Cyan),
            )),
            Line::from(""),
        ];

        for (category, shortcuts) in shortcuts_by_category() {
            help_text.push(Line::from(Span::styled(
                category.display_name(),
                Style::default().add_modifier(Modifier::BOLD),
            )));
            for shortcut in shortcuts {
                help_text.push(Line::from(vec![
                    Span::styled(
                        shortcut.key_display_padded(),
                        Style::default().fg(Color::Yellow),
                    ),
                    Span::raw(shortcut.description),
                ]));
            }
            help_text.push(Line::from(""));
        }

        help_text.push(Line::from(vec![
            Span::styled("1-9    ", Style::default().fg(Color::Yellow)),
            Span::raw("Jump to step"),
        ]));
        help_text.push(Line::from(""));
        help_text.push(Line::from(Span::styled(
            "Press ? or q to close",
            Style::default().fg(Color::Gray),
        )));
        help_text
    }

    pub fn render(&self, frame: &mut Frame) {
        if !self.visible {
            return;
        }

        let area = centered_rect(70, 80, frame.area());
        frame.render_widget(Clear, area);

        let help = Paragraph::new(Self::lines())
            .block(
                Block::default()
                    .title(" Help ")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Cyan)),
            )
            .alignment(Alignment::Left);

        frame.render_widget(help, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_help_dialog_toggle() {
        let mut dialog = HelpDialog::new();
        assert!(!dialog.visible);

        dialog.toggle();
        assert!(dialog.visible);

        dialog.toggle();
        assert!(!dialog.visible);
    }

    #[test]
    fn test_help_lists_every_category() {
        let text: Vec<String> = HelpDialog::lines()
            .iter()
            .map(ToString::to_string)
            .collect();
        assert!(text.iter().any(|l| l == "Navigation"));
        assert!(text.iter().any(|l| l == "Fleets"));
        assert!(text.iter().any(|l| l.contains("Next step")));
    }
}
