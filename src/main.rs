use std::collections::BTreeMap;
use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::{Parser, ValueEnum};
use crossterm::event::{Event, KeyEventKind, MouseButton, MouseEventKind};
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::Paragraph;

use term_tabs::components::{Component, ComponentContext, TextPane};
use term_tabs::drivers::OutputDriver;
use term_tabs::drivers::console::{ConsoleInputDriver, ConsoleOutputDriver};
use term_tabs::event_loop::{ControlFlow, EventLoop};
use term_tabs::keybindings::{KeyBindings, TabAction};
use term_tabs::tabs::{
    ActionGroup, ComponentId, TabContainer, TabEntry, TabsEvent, TabsPosition, TextActionService,
};
use term_tabs::ui::UiFrame;

const CLOSE_ACTION: &str = "Close";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum PositionArg {
    Top,
    Bottom,
    Left,
    Right,
}

impl From<PositionArg> for TabsPosition {
    fn from(value: PositionArg) -> Self {
        match value {
            PositionArg::Top => TabsPosition::Top,
            PositionArg::Bottom => TabsPosition::Bottom,
            PositionArg::Left => TabsPosition::Left,
            PositionArg::Right => TabsPosition::Right,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "term-tabs",
    version = env!("CARGO_PKG_VERSION"),
    about = "Interactive demo of the terminal tab container"
)]
struct Cli {
    /// Wrap labels into table rows instead of one row with an overflow popup.
    #[arg(long)]
    table: bool,

    /// Edge the tab strip is attached to.
    #[arg(short = 'p', long, value_enum, default_value_t = PositionArg::Top)]
    position: PositionArg,

    /// Number of tabs to open at startup.
    #[arg(short = 'n', long = "tabs", value_name = "COUNT", default_value_t = 6)]
    tabs: usize,

    /// Always show the leading and trailing ghost slots.
    #[arg(long)]
    ghosts: bool,

    /// Drop the strip when a single tab is left.
    #[arg(long)]
    stealth: bool,

    /// Write tracing output to this file.
    #[arg(long = "log-file", value_name = "PATH")]
    log_file: Option<PathBuf>,
}

struct DemoConfig {
    table: bool,
    position: TabsPosition,
    tabs: usize,
    ghosts: bool,
    stealth: bool,
    log_file: Option<PathBuf>,
}

impl TryFrom<&Cli> for DemoConfig {
    type Error = String;

    fn try_from(cli: &Cli) -> Result<Self, Self::Error> {
        if !(1..=64).contains(&cli.tabs) {
            return Err("tabs must be between 1 and 64".to_string());
        }
        Ok(Self {
            table: cli.table,
            position: cli.position.into(),
            tabs: cli.tabs,
            ghosts: cli.ghosts,
            stealth: cli.stealth,
            log_file: cli.log_file.clone(),
        })
    }
}

fn main() -> io::Result<()> {
    let cli = Cli::parse();
    let config = DemoConfig::try_from(&cli)
        .map_err(|msg| io::Error::new(io::ErrorKind::InvalidInput, msg))?;
    term_tabs::tracing_sub::init_default(config.log_file.as_deref())?;

    let mut app = DemoApp::new(&config);
    let mut output = ConsoleOutputDriver::new()?;
    output.enter()?;

    let mut event_loop = EventLoop::new(ConsoleInputDriver::new(), Duration::from_millis(16));
    let result = event_loop.run(|_, event| {
        let flow = match event {
            Some(event) => app.handle_event(&event),
            None => {
                app.tabs.tick(Instant::now());
                ControlFlow::Continue
            }
        };
        app.drain_tab_events();
        output.draw(|mut frame| app.render(&mut frame))?;
        Ok(flow)
    });

    output.exit()?;
    result
}

struct DemoApp {
    tabs: TabContainer,
    panes: BTreeMap<ComponentId, TextPane>,
    bindings: KeyBindings,
    next_tab: u64,
    status: String,
}

impl DemoApp {
    fn new(config: &DemoConfig) -> Self {
        let mut tabs =
            TabContainer::default().with_action_service(Box::new(TextActionService::new()));
        tabs.set_single_row(!config.table)
            .set_tabs_position(config.position)
            .set_ghosts_always_visible(config.ghosts)
            .set_stealth_tab_mode(config.stealth)
            .set_side_component_vertical(config.stealth)
            .set_tab_label_actions_auto_hide(true)
            .set_popup_group(
                ActionGroup::new("tab-context", vec![CLOSE_ACTION.to_string()]),
                "demo",
                true,
            );
        tabs.set_showing(true);
        tabs.set_focused(true);

        let mut app = Self {
            tabs,
            panes: BTreeMap::new(),
            bindings: KeyBindings::demo(),
            next_tab: 1,
            status: String::new(),
        };
        for _ in 0..config.tabs {
            app.open_tab();
        }
        if let Some(first) = app.tabs.tab_at(0) {
            app.tabs.select(first, true);
        }
        app.status = app.key_summary();
        app
    }

    fn open_tab(&mut self) {
        let number = self.next_tab;
        self.next_tab += 1;
        let component = ComponentId(number);
        let pane = if number == 1 {
            TextPane::new(self.welcome_text().lines().map(str::to_string))
        } else {
            TextPane::new((1..=40).map(|line| format!("tab {number}, line {line}")))
        };
        self.panes.insert(component, pane);

        let mut entry = TabEntry::new(format!("Tab {number}"))
            .with_component(component)
            .with_preferred_focus(component)
            .with_tooltip(format!("Content pane {number}"))
            .with_object(number)
            .with_tab_label_actions(ActionGroup::new(
                "label",
                vec![CLOSE_ACTION.to_string()],
            ));
        if number % 3 == 0 {
            entry = entry.with_group(
                ActionGroup::new(
                    format!("tools-{number}"),
                    vec!["Run".to_string(), "Stop".to_string()],
                ),
                Some("demo".to_string()),
            );
        }
        let id = self.tabs.add_tab(entry);
        tracing::debug!(tab = %id, number, "demo tab opened");
    }

    fn welcome_text(&self) -> String {
        let keys = self
            .bindings
            .help_entries()
            .into_iter()
            .map(|(action, combos)| format!("  {:<28}{}", action.to_string(), combos.join(", ")))
            .collect::<Vec<_>>()
            .join("\n");
        indoc::formatdoc!(
            r#"
            term-tabs demo

            Click a label to select it, click » for the full tab list and
            right-click a label to target it. Hovering a label reveals its
            close action.

            Keys:
            {keys}
            "#
        )
    }

    fn key_summary(&self) -> String {
        [
            TabAction::NewTab,
            TabAction::CloseTab,
            TabAction::ToggleHidden,
            TabAction::RevealHidden,
            TabAction::ToggleAttraction,
            TabAction::ToggleLayout,
            TabAction::CyclePosition,
            TabAction::Quit,
        ]
        .into_iter()
        .filter_map(|action| {
            self.bindings
                .first_combo(action)
                .map(|combo| format!("{combo} {action}"))
        })
        .collect::<Vec<_>>()
        .join(" | ")
    }

    fn handle_event(&mut self, event: &Event) -> ControlFlow {
        if let Event::Key(key) = event
            && key.kind == KeyEventKind::Press
            && let Some(action) = self.bindings.action_for_key(key)
            && !action.is_navigation()
        {
            return self.run_action(action);
        }

        if let Event::Mouse(mouse) = event
            && mouse.kind == MouseEventKind::Moved
            && let Some(tip) = self.tabs.tooltip_at(mouse.column, mouse.row)
        {
            self.status = tip.to_string();
        }

        if self.tabs.handle_event(event) {
            if let Event::Mouse(mouse) = event
                && mouse.kind == MouseEventKind::Down(MouseButton::Right)
            {
                self.report_context_target();
            }
            return ControlFlow::Continue;
        }

        if let Event::Key(_) = event
            && let Some(component) = self.selected_component()
            && let Some(pane) = self.panes.get_mut(&component)
        {
            let ctx = ComponentContext::new(self.tabs.is_focused()).with_selected(true);
            pane.handle_event(event, &ctx);
        }
        ControlFlow::Continue
    }

    fn run_action(&mut self, action: TabAction) -> ControlFlow {
        match action {
            TabAction::Quit => return ControlFlow::Quit,
            TabAction::NewTab => self.open_tab(),
            TabAction::CloseTab => {
                if let Some(id) = self.tabs.selected() {
                    self.tabs.remove_tab(id);
                }
            }
            TabAction::ToggleHidden => {
                if let Some(id) = self.tabs.selected() {
                    let _ = self.tabs.update_tab(id, |entry| entry.set_hidden(true));
                }
            }
            TabAction::RevealHidden => {
                let hidden: Vec<_> = self.tabs.hidden_tabs().collect();
                for id in hidden {
                    let _ = self.tabs.update_tab(id, |entry| entry.set_hidden(false));
                }
            }
            TabAction::ToggleAttraction => self.toggle_attraction(),
            TabAction::ToggleLayout => {
                let single_row = self.tabs.is_single_row();
                self.tabs.set_single_row(!single_row);
            }
            TabAction::CyclePosition => {
                let next = match self.tabs.presentation().position {
                    TabsPosition::Top => TabsPosition::Right,
                    TabsPosition::Right => TabsPosition::Bottom,
                    TabsPosition::Bottom => TabsPosition::Left,
                    TabsPosition::Left => TabsPosition::Top,
                };
                self.tabs.set_tabs_position(next);
            }
            TabAction::ToggleHideTabs => {
                let hidden = self.tabs.presentation().hide_tabs;
                self.tabs.set_hide_tabs(!hidden);
            }
            TabAction::SelectNext | TabAction::SelectPrevious | TabAction::ShowMore => {}
        }
        self.status = format!("{action}");
        ControlFlow::Continue
    }

    /// Blink the tab after the selection, or the selection itself when it is
    /// the last one.
    fn toggle_attraction(&mut self) {
        let visible = self.tabs.visible_tabs();
        let target = self.tabs.selected().and_then(|selected| {
            let index = visible.iter().position(|id| *id == selected)?;
            visible.get(index + 1).or(visible.get(index)).copied()
        });
        let Some(id) = target else {
            return;
        };
        let _ = self.tabs.update_tab(id, |entry| {
            if entry.is_attracting() {
                entry.stop_attraction();
            } else {
                entry.fire_attraction();
            }
        });
    }

    fn report_context_target(&mut self) {
        if let Some(entry) = self.tabs.target_info().and_then(|id| self.tabs.entry(id)) {
            self.status = format!("context menu for {}", entry.plain_text());
        }
        self.tabs.popup_closed();
    }

    fn drain_tab_events(&mut self) {
        for event in self.tabs.take_events() {
            match event {
                TabsEvent::LabelAction { tab, action } if action == CLOSE_ACTION => {
                    self.tabs.remove_tab(tab);
                }
                TabsEvent::LabelAction { tab, action } => {
                    self.status = format!("{action} on tab {tab}");
                }
                TabsEvent::Detached(component) => {
                    self.forget_pane(component);
                }
                TabsEvent::DeferredSweep(components) => {
                    for component in components {
                        self.forget_pane(component);
                    }
                }
                TabsEvent::Attached(_) => {}
            }
        }
    }

    /// Drop a detached pane once its tab is gone for good.
    fn forget_pane(&mut self, component: ComponentId) {
        if self.tabs.find_by_component(component).is_none() {
            self.panes.remove(&component);
        }
    }

    fn selected_component(&self) -> Option<ComponentId> {
        self.tabs
            .selected()
            .and_then(|id| self.tabs.entry(id))
            .and_then(TabEntry::component)
    }

    fn render(&mut self, frame: &mut UiFrame<'_>) {
        let area = frame.area();
        if area.width == 0 || area.height < 2 {
            return;
        }
        let tabs_area = Rect {
            height: area.height - 1,
            ..area
        };
        let status_area = Rect {
            y: area.y + area.height - 1,
            height: 1,
            ..area
        };

        self.tabs.render(frame, tabs_area);
        if !self.tabs.is_paint_blocked()
            && let Some(content) = self.tabs.content_area()
            && let Some(component) = self.selected_component()
            && let Some(pane) = self.panes.get_mut(&component)
        {
            let ctx = ComponentContext::new(self.tabs.is_focused()).with_selected(true);
            pane.resize(content, &ctx);
            pane.render(frame, content, &ctx);
        }

        let status = if self.tabs.tab_count() == 0 {
            format!("no tabs open | {}", self.key_summary())
        } else {
            self.status.clone()
        };
        frame.render_widget(
            Paragraph::new(status).style(Style::default().add_modifier(Modifier::REVERSED)),
            status_area,
        );
    }
}
