use crossterm::event::{Event, KeyCode, KeyEventKind};
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Text};
use ratatui::widgets::{Clear, Paragraph, Wrap};

use super::{Component, ComponentContext};
use crate::ui::UiFrame;

/// Scrollable block of text used as tab content in the demo.
#[derive(Debug, Clone, Default)]
pub struct TextPane {
    lines: Vec<Line<'static>>,
    scroll: u16,
    viewport_height: u16,
}

impl TextPane {
    pub fn new<I, T>(lines: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Line<'static>>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
            scroll: 0,
            viewport_height: 0,
        }
    }

    pub fn scroll(&self) -> u16 {
        self.scroll
    }

    fn max_scroll(&self) -> u16 {
        (self.lines.len() as u16).saturating_sub(self.viewport_height.max(1))
    }
}

impl Component for TextPane {
    fn resize(&mut self, area: Rect, _ctx: &ComponentContext) {
        self.viewport_height = area.height;
        self.scroll = self.scroll.min(self.max_scroll());
    }

    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, ctx: &ComponentContext) {
        self.viewport_height = area.height;
        let style = if ctx.focused() && ctx.selected() {
            Style::default()
        } else {
            Style::default().add_modifier(Modifier::DIM)
        };
        let paragraph = Paragraph::new(Text::from(self.lines.clone()))
            .style(style)
            .wrap(Wrap { trim: false })
            .scroll((self.scroll, 0));
        frame.render_widget(Clear, area);
        frame.render_widget(paragraph, area);
    }

    fn handle_event(&mut self, event: &Event, _ctx: &ComponentContext) -> bool {
        let Event::Key(key) = event else {
            return false;
        };
        if key.kind != KeyEventKind::Press {
            return false;
        }
        match key.code {
            KeyCode::Up => {
                self.scroll = self.scroll.saturating_sub(1);
                true
            }
            KeyCode::Down => {
                self.scroll = (self.scroll + 1).min(self.max_scroll());
                true
            }
            _ => false,
        }
    }
}
