use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::{Duration, Instant};

use stepper::config::{Config, StepperConfig};
use stepper::menu::{StepItem, StepperType};
use stepper::navigation::{DestinationId, DestinationListener, NavAnimations, NavigationHost};
use stepper::ui::{action_for, Action, HelpDialog, StepperPanel, TerminalGuard};
use stepper::Stepper;

const MIN_FLEET_DURATION: Duration = Duration::from_millis(250);
const MAX_FLEET_DURATION: Duration = Duration::from_secs(60);
const EVENT_LOG_LEN: usize = 4;

/// Command-line overrides applied on top of the loaded config
#[derive(Debug, Clone, Default)]
pub struct DemoOptions {
    pub kind: Option<StepperType>,
    pub fleet_duration_ms: Option<u64>,
    pub navigation: bool,
}

/// Steps shown when the config declares none
fn demo_items() -> Vec<StepItem> {
    vec![
        StepItem::new(1, 101, 0, "Account"),
        StepItem::new(1, 102, 1, "Shipping"),
        StepItem::new(2, 201, 2, "Payment"),
        StepItem::new(2, 202, 3, "Review"),
    ]
}

// ─── Route Stack ────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct RouteState {
    /// Destination plus the animation to play when it is popped
    stack: Vec<(DestinationId, String)>,
    listener: Option<DestinationListener>,
    last_animation: Option<String>,
}

/// In-memory router with a back stack, standing in for a screen host
#[derive(Debug, Clone, Default)]
pub struct RouteStack {
    state: Rc<RefCell<RouteState>>,
}

impl RouteStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Go back one destination and report it, as a system back button would.
    /// The root destination is never popped.
    pub fn pop(&self) -> Option<DestinationId> {
        let mut state = self.state.borrow_mut();
        if state.stack.len() < 2 {
            return None;
        }
        let (_, pop_animation) = state.stack.pop()?;
        let top = state.stack.last()?.0;
        state.last_animation = Some(pop_animation);
        if let Some(listener) = &state.listener {
            listener.notify(top);
        }
        tracing::debug!(destination = top, depth = state.stack.len(), "route popped");
        Some(top)
    }

    pub fn current(&self) -> Option<DestinationId> {
        self.state.borrow().stack.last().map(|(destination, _)| *destination)
    }

    pub fn depth(&self) -> usize {
        self.state.borrow().stack.len()
    }

    pub fn last_animation(&self) -> Option<String> {
        self.state.borrow().last_animation.clone()
    }
}

impl NavigationHost for RouteStack {
    fn navigate_to(&mut self, destination: DestinationId, animations: &NavAnimations) {
        let mut state = self.state.borrow_mut();
        if state.stack.last().map(|(top, _)| *top) != Some(destination) {
            state.stack.push((destination, animations.pop_enter.clone()));
        }
        state.last_animation = Some(animations.enter.clone());
        if let Some(listener) = &state.listener {
            listener.notify(destination);
        }
    }

    fn on_destination_changed(&mut self, listener: DestinationListener) {
        self.state.borrow_mut().listener = Some(listener);
    }
}

// ─── Event Log ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
struct EventLog(Rc<RefCell<VecDeque<String>>>);

impl EventLog {
    fn push(&self, message: String) {
        let mut log = self.0.borrow_mut();
        log.push_back(message);
        while log.len() > EVENT_LOG_LEN {
            log.pop_front();
        }
    }

    fn lines(&self) -> Vec<String> {
        self.0.borrow().iter().cloned().collect()
    }
}

// ─── App ────────────────────────────────────────────────────────────────────

pub struct App {
    config: Config,
    stepper: Stepper,
    routes: Option<RouteStack>,
    panel: StepperPanel,
    help_dialog: HelpDialog,
    events: EventLog,
    paused: bool,
    should_quit: bool,
}

impl App {
    pub fn new(config: Config, options: &DemoOptions) -> Result<Self> {
        let stepper_config = Self::stepper_config(&config, options);
        let mut stepper = Stepper::from_config(&stepper_config)?;

        let events = EventLog::default();
        let on_step = events.clone();
        let on_done = events.clone();
        stepper.on_events(
            move |step| on_step.push(format!("step changed to {}", step + 1)),
            move || on_done.push("all steps complete".to_string()),
        );

        let routes = if options.navigation {
            let routes = RouteStack::new();
            stepper.setup_with_navigation(routes.clone());
            // Seed the route stack with the first destination
            stepper.request_step(0)?;
            Some(routes)
        } else {
            None
        };

        tracing::info!(
            kind = %stepper.stepper_type(),
            steps = stepper.size(),
            navigation = routes.is_some(),
            "stepper demo ready"
        );

        Ok(Self {
            config,
            panel: StepperPanel::new(format!(" {} ", stepper.stepper_type())),
            stepper,
            routes,
            help_dialog: HelpDialog::new(),
            events,
            paused: false,
            should_quit: false,
        })
    }

    fn stepper_config(config: &Config, options: &DemoOptions) -> StepperConfig {
        let mut stepper_config = config.stepper.clone();
        if let Some(kind) = options.kind {
            stepper_config.kind = kind;
        }
        if let Some(ms) = options.fleet_duration_ms {
            stepper_config.fleet_duration_ms = ms;
        }
        if stepper_config.items.is_empty() {
            stepper_config.items = demo_items();
        }
        stepper_config
    }

    pub fn run(&mut self) -> Result<()> {
        let mut guard = TerminalGuard::new()?;
        let tick_rate = self.config.tick_rate();
        let mut last_tick = Instant::now();

        while !self.should_quit {
            let Some(terminal) = guard.terminal() else {
                break;
            };
            terminal.draw(|frame| self.render(frame))?;

            if event::poll(tick_rate)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code)?;
                    }
                }
            }

            let now = Instant::now();
            self.on_tick(now.duration_since(last_tick))?;
            last_tick = now;
        }

        guard.restore();
        Ok(())
    }

    fn on_tick(&mut self, elapsed: Duration) -> Result<()> {
        self.stepper.tick(elapsed)?;
        self.stepper.dispatch_navigation();
        Ok(())
    }

    fn handle_key(&mut self, key: KeyCode) -> Result<()> {
        let Some(action) = action_for(key) else {
            return Ok(());
        };
        if self.help_dialog.visible {
            if matches!(action, Action::ToggleHelp | Action::Quit) {
                self.help_dialog.toggle();
            }
            return Ok(());
        }
        self.apply(action)
    }

    fn apply(&mut self, action: Action) -> Result<()> {
        match action {
            Action::Quit => self.should_quit = true,
            Action::ToggleHelp => self.help_dialog.toggle(),
            Action::NextStep => {
                self.stepper.go_to_next_step()?;
            }
            Action::PreviousStep => {
                self.stepper.go_to_previous_step()?;
            }
            Action::JumpTo(index) => {
                if index < self.stepper.size() {
                    self.stepper.go_to_step(index)?;
                } else {
                    tracing::debug!(index, "no step at jump target");
                }
            }
            Action::Back => {
                if let Some(routes) = &self.routes {
                    routes.pop();
                }
                self.stepper.dispatch_navigation();
            }
            Action::TogglePause => {
                self.paused = !self.paused;
                if self.paused {
                    self.stepper.pause();
                } else {
                    self.stepper.resume();
                }
            }
            Action::FasterFleets => self.scale_fleet_duration(false),
            Action::SlowerFleets => self.scale_fleet_duration(true),
        }
        Ok(())
    }

    fn scale_fleet_duration(&mut self, longer: bool) {
        if self.stepper.stepper_type() != StepperType::Fleets {
            return;
        }
        let current = self.stepper.fleet_duration();
        let next = if longer { current * 2 } else { current / 2 };
        let next = next.clamp(MIN_FLEET_DURATION, MAX_FLEET_DURATION);
        self.stepper.set_fleet_duration(next);
        self.events
            .push(format!("next fleets last {} ms", next.as_millis()));
    }

    // ─── Rendering ──────────────────────────────────────────────────────────────

    fn render(&mut self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(5),
                Constraint::Length(EVENT_LOG_LEN as u16 + 2),
                Constraint::Length(1),
            ])
            .split(frame.area());

        let view = self.stepper.view();
        self.panel.render(frame, chunks[0], &view);
        self.render_content(frame, chunks[1]);
        self.render_events(frame, chunks[2]);
        self.render_footer(frame, chunks[3]);
        self.help_dialog.render(frame);
    }

    fn content_lines(&self) -> Vec<Line<'static>> {
        let step = self.stepper.current_step();
        let title = self
            .stepper
            .get_item(step)
            .map(|item| item.title.clone())
            .unwrap_or_default();

        let mut lines = vec![
            Line::from(Span::styled(
                title,
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(format!("Step {} of {}", step + 1, self.stepper.size())),
            Line::from(""),
        ];

        if self.stepper.stepper_type() == StepperType::Fleets {
            let state = if self.paused { "paused" } else { "running" };
            lines.push(Line::from(format!(
                "Fleets {state}, {} ms each",
                self.stepper.fleet_duration().as_millis()
            )));
        }

        if let Some(routes) = &self.routes {
            let animation = routes.last_animation().unwrap_or_default();
            lines.push(Line::from(format!(
                "Route depth {} ({animation})",
                routes.depth()
            )));
        }
        lines
    }

    fn render_content(&self, frame: &mut Frame, area: Rect) {
        let content = Paragraph::new(self.content_lines())
            .block(Block::default().borders(Borders::ALL))
            .wrap(Wrap { trim: true });
        frame.render_widget(content, area);
    }

    fn render_events(&self, frame: &mut Frame, area: Rect) {
        let lines: Vec<Line> = self.events.lines().into_iter().map(Line::from).collect();
        let log = Paragraph::new(lines).block(
            Block::default()
                .title(" Events ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Gray)),
        );
        frame.render_widget(log, area);
    }

    fn render_footer(&self, frame: &mut Frame, area: Rect) {
        let footer = Paragraph::new(Line::from(vec![
            Span::styled("←/→", Style::default().fg(Color::Yellow)),
            Span::raw(" step  "),
            Span::styled("?", Style::default().fg(Color::Yellow)),
            Span::raw(" help  "),
            Span::styled("q", Style::default().fg(Color::Yellow)),
            Span::raw(" quit"),
        ]));
        frame.render_widget(footer, area);
    }
}
