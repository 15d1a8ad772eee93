use crossterm::event::Event;
use ratatui::layout::Rect;

use crate::ui::UiFrame;

pub mod text_pane;

pub use text_pane::TextPane;

pub use crate::component_context::ComponentContext;

/// Something that can paint itself into a rectangle of the frame.
///
/// Hosts implement this for tab content; the container implements nothing of
/// it and only reports where content belongs.
pub trait Component {
    fn resize(&mut self, _area: Rect, _ctx: &ComponentContext) {}

    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, ctx: &ComponentContext);

    fn handle_event(&mut self, _event: &Event, _ctx: &ComponentContext) -> bool {
        false
    }
}
