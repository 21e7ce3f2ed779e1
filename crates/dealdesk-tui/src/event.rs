//! Terminal event pump: merges crossterm input with tick and render
//! intervals into a single channel the app loop drains.

use std::time::Duration;

use crossterm::event::{Event as CrosstermEvent, EventStream, KeyEvent, KeyEventKind, MouseEvent};
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

#[derive(Debug)]
pub enum Event {
    /// A key was pressed.
    Key(KeyEvent),
    /// A mouse action occurred.
    Mouse(MouseEvent),
    /// Terminal was resized to (cols, rows).
    Resize(u16, u16),
    /// Periodic tick, used for toast expiry and animation.
    Tick,
    /// Frame tick, capping the redraw rate.
    Render,
}

/// Translate a raw crossterm event into ours. Key release/repeat and
/// focus/paste events carry nothing the app reacts to.
fn translate(raw: CrosstermEvent) -> Option<Event> {
    match raw {
        CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => Some(Event::Key(key)),
        CrosstermEvent::Mouse(mouse) => Some(Event::Mouse(mouse)),
        CrosstermEvent::Resize(cols, rows) => Some(Event::Resize(cols, rows)),
        _ => None,
    }
}

async fn pump(
    tx: mpsc::UnboundedSender<Event>,
    cancel: CancellationToken,
    tick_rate: Duration,
    render_rate: Duration,
) {
    let mut input = EventStream::new();

    let mut ticker = tokio::time::interval(tick_rate);
    let mut frames = tokio::time::interval(render_rate);
    // No catch-up bursts after a stall
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    frames.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        let event = tokio::select! {
            () = cancel.cancelled() => return,
            _ = ticker.tick() => Some(Event::Tick),
            _ = frames.tick() => Some(Event::Render),
            read = input.next() => match read {
                Some(Ok(raw)) => translate(raw),
                // Read error or closed stream: the terminal is gone.
                Some(Err(_)) | None => return,
            },
        };

        if let Some(event) = event {
            if tx.send(event).is_err() {
                return;
            }
        }
    }
}

/// Owns the background pump task; events arrive through [`next`].
///
/// [`next`]: EventReader::next
pub struct EventReader {
    rx: mpsc::UnboundedReceiver<Event>,
    cancel: CancellationToken,
}

impl EventReader {
    /// Spawn the pump. `tick_rate` drives [`Event::Tick`], `render_rate`
    /// drives [`Event::Render`].
    pub fn new(tick_rate: Duration, render_rate: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();

        tokio::spawn(pump(tx, cancel.clone(), tick_rate, render_rate));

        Self { rx, cancel }
    }

    /// Next event, or `None` once the pump has stopped.
    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }

    /// Ask the pump to stop.
    pub fn stop(&self) {
        self.cancel.cancel();
    }
}

impl Drop for EventReader {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
