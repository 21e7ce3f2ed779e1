//! Component trait implemented by every screen and overlay.

use color_eyre::eyre::Result;
use crossterm::event::{KeyEvent, MouseEvent};
use ratatui::{Frame, layout::Rect};
use tokio::sync::mpsc::UnboundedSender;

use crate::action::Action;

/// A focusable, renderable piece of the UI.
///
/// Lifecycle: `init` once at mount, then any interleaving of
/// `handle_key_event` / `handle_mouse_event` / `update` / `render`.
pub trait Component: Send {
    /// Runs once at mount. The action sender lets the component dispatch
    /// into the app loop later.
    fn init(&mut self, _action_tx: UnboundedSender<Action>) -> Result<()> {
        Ok(())
    }

    /// React to a keystroke. `Ok(Some(..))` feeds back into the app loop.
    fn handle_key_event(&mut self, _key: KeyEvent) -> Result<Option<Action>> {
        Ok(None)
    }

    /// React to a mouse event, same contract as `handle_key_event`.
    fn handle_mouse_event(&mut self, _mouse: MouseEvent) -> Result<Option<Action>> {
        Ok(None)
    }

    /// Observe a dispatched action; optionally emit a follow-up.
    fn update(&mut self, _action: &Action) -> Result<Option<Action>> {
        Ok(None)
    }

    /// Whether the component is capturing raw text input (an open prompt).
    /// While true, global keybindings other than Ctrl+C are suspended.
    fn captures_input(&self) -> bool {
        false
    }

    /// Render into the provided frame area.
    fn render(&self, frame: &mut Frame, area: Rect);

    /// Does this component hold input focus right now?
    #[allow(dead_code)]
    fn focused(&self) -> bool {
        false
    }

    /// Give or take input focus.
    fn set_focused(&mut self, _focused: bool) {}

    /// Stable identifier, used in log lines.
    #[allow(dead_code)]
    fn id(&self) -> &str;
}
