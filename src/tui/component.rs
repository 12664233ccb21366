use ratatui::layout::Rect;
use ratatui::Frame;

use super::event::TuiEvent;

/// A piece of the composer screen that can draw itself.
///
/// Form components are thin wrappers: borrowed draft values come in as
/// props and the persistent `*State` (query text, highlighted row, cursor)
/// is borrowed from `TuiState`. The wrapper is rebuilt for every frame.
///
/// `render` takes `&mut self` so a component can record layout while
/// drawing, such as the editor's wrap width or the drop zone's rect used
/// for drag hover.
pub trait Component {
    fn render(&mut self, frame: &mut Frame, area: Rect);
}

/// A component that turns terminal input into form events.
///
/// Returning `None` means the event was not for this component. Returned
/// events carry new draft values; the event loop maps them to actions.
pub trait EventHandler {
    type Event;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event>;
}
