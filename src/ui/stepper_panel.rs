//! Terminal rendering of a [`MenuView`].
//!
//! Terminal cells have no point size, so `icon_size` and `text_size` are not
//! drawn. Colors and text style are.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

use crate::menu::{FleetSegment, MenuLayout, MenuStyle, MenuView, Rgb, StepState, TabStep, TextStyle};

pub fn rgb_color(rgb: Rgb) -> Color {
    let (r, g, b) = rgb.components();
    Color::Rgb(r, g, b)
}

fn text_modifier(style: TextStyle) -> Modifier {
    match style {
        TextStyle::Normal => Modifier::empty(),
        TextStyle::Bold => Modifier::BOLD,
        TextStyle::Italic => Modifier::ITALIC,
    }
}

fn step_glyph(step: &TabStep) -> String {
    match (step.number, step.state) {
        (_, StepState::Completed) => "✓".to_string(),
        (Some(number), _) => number.to_string(),
        (None, StepState::Active) => "●".to_string(),
        (None, StepState::Pending) => "○".to_string(),
    }
}

/// Spans for the tab row: completed steps in the widget color, the active
/// step highlighted, pending steps dimmed.
pub fn tab_spans(steps: &[TabStep], style: &MenuStyle) -> Vec<Span<'static>> {
    let widget = rgb_color(style.widget_color);
    let modifier = text_modifier(style.text_style);

    let mut spans = Vec::with_capacity(steps.len() * 2);
    for (index, step) in steps.iter().enumerate() {
        if index > 0 {
            spans.push(Span::styled(" ─ ", Style::default().fg(Color::DarkGray)));
        }
        let label = format!(" {} {} ", step_glyph(step), step.title);
        let span_style = match step.state {
            StepState::Active => Style::default()
                .fg(rgb_color(style.text_color))
                .bg(widget)
                .add_modifier(modifier | Modifier::BOLD),
            StepState::Completed => Style::default().fg(widget).add_modifier(modifier),
            StepState::Pending => Style::default().fg(Color::DarkGray).add_modifier(modifier),
        };
        spans.push(Span::styled(label, span_style));
    }
    spans
}

/// Draws the step menu inside a bordered block
pub struct StepperPanel {
    pub title: String,
}

impl StepperPanel {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, view: &MenuView) {
        let block = Block::default()
            .title(self.title.clone())
            .borders(Borders::ALL)
            .border_style(Style::default().fg(rgb_color(view.style.widget_color)));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        match &view.layout {
            MenuLayout::Tabs { steps } => {
                let line = Line::from(tab_spans(steps, &view.style));
                frame.render_widget(Paragraph::new(line), inner);
            }
            MenuLayout::Progress { percent } => {
                frame.render_widget(progress_gauge(*percent, &view.style), inner);
            }
            MenuLayout::Fleets { segments } => {
                render_fleets(frame, inner, segments, &view.style);
            }
        }
    }
}

fn progress_gauge(percent: f32, style: &MenuStyle) -> Gauge<'static> {
    let ratio = f64::from(percent / 100.0).clamp(0.0, 1.0);
    Gauge::default()
        .gauge_style(
            Style::default()
                .fg(rgb_color(style.widget_color))
                .add_modifier(text_modifier(style.text_style)),
        )
        .ratio(ratio)
        .label(format!("{percent:.0}%"))
}

fn render_fleets(frame: &mut Frame, area: Rect, segments: &[FleetSegment], style: &MenuStyle) {
    if segments.is_empty() {
        return;
    }
    let count = u32::try_from(segments.len()).unwrap_or(u32::MAX);
    let constraints: Vec<Constraint> = segments
        .iter()
        .map(|_| Constraint::Ratio(1, count))
        .collect();
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(area);

    let widget = rgb_color(style.widget_color);
    for (segment, chunk) in segments.iter().zip(chunks.iter()) {
        // One-cell gap between fleets
        let cell = Rect {
            width: chunk.width.saturating_sub(1),
            ..*chunk
        };
        let fill = if segment.running {
            Style::default().fg(widget).bg(Color::DarkGray)
        } else {
            Style::default().fg(widget).bg(Color::Black)
        };
        let gauge = Gauge::default()
            .gauge_style(fill)
            .ratio(f64::from(segment.progress).clamp(0.0, 1.0))
            .label("");
        frame.render_widget(gauge, cell);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::menu::{StepperMenu, StepperType};
    use ratatui::{backend::TestBackend, buffer::Buffer, Terminal};

    fn buffer_text(buffer: &Buffer) -> String {
        let width = buffer.area.width as usize;
        buffer
            .content
            .chunks(width)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn draw(view: &MenuView) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 3)).unwrap();
        let mut panel = StepperPanel::new("Checkout");
        terminal
            .draw(|frame| panel.render(frame, frame.area(), view))
            .unwrap();
        buffer_text(terminal.backend().buffer())
    }

    fn menu(kind: StepperType) -> StepperMenu {
        let mut menu = StepperMenu::new(kind, MenuStyle::defaults_for(kind));
        menu.add(0, 1, 0, "Cart");
        menu.add(0, 2, 1, "Pay");
        menu.add(0, 3, 2, "Done");
        menu
    }

    #[test]
    fn test_rgb_color_conversion() {
        assert_eq!(rgb_color(Rgb(0x29_62_FF)), Color::Rgb(0x29, 0x62, 0xFF));
    }

    #[test]
    fn test_tabs_render_titles_and_glyphs() {
        let mut menu = menu(StepperType::Tab);
        menu.select_menu_item(2);
        let text = draw(&menu.view());

        assert!(text.contains("Checkout"));
        assert!(text.contains("✓ Cart"));
        assert!(text.contains("● Pay"));
        assert!(text.contains("○ Done"));
    }

    #[test]
    fn test_numbered_tabs_show_positions() {
        let menu = menu(StepperType::TabNumbered);
        let text = draw(&menu.view());

        assert!(text.contains("1 Cart"));
        assert!(text.contains("2 Pay"));
        assert!(text.contains("3 Done"));
    }

    #[test]
    fn test_active_tab_uses_widget_background() {
        let menu = menu(StepperType::Tab);
        let view = menu.view();
        let MenuLayout::Tabs { steps } = &view.layout else {
            panic!("expected tabs");
        };
        let spans = tab_spans(steps, &view.style);

        assert_eq!(spans.len(), 5);
        assert_eq!(spans[0].style.bg, Some(Color::Rgb(0x29, 0x62, 0xFF)));
        assert_eq!(spans[2].style.fg, Some(Color::DarkGray));
    }

    #[test]
    fn test_progress_renders_percent() {
        let mut menu = menu(StepperType::Progress);
        menu.add(0, 4, 3, "Extra");
        menu.select_menu_item(2);
        let text = draw(&menu.view());

        assert!(text.contains("50%"));
    }

    #[test]
    fn test_fleets_render_without_labels() {
        let menu = menu(StepperType::Fleets);
        let text = draw(&menu.view());

        assert!(text.contains("Checkout"));
        assert!(!text.contains('%'));
    }

    #[test]
    fn test_empty_fleets_draw_only_the_block() {
        let menu = StepperMenu::new(
            StepperType::Fleets,
            MenuStyle::defaults_for(StepperType::Fleets),
        );
        let text = draw(&menu.view());
        assert!(text.contains("Checkout"));
    }
}
