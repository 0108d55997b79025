use std::io::{self, Stderr};
use std::ops::ControlFlow;
use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyEvent, KeyEventKind, MouseEvent},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use futures_util::StreamExt;
use tokio::sync::mpsc;

use crate::client::{ChatReply, TransportError};
use crate::widget::RequestId;

pub type Tui = Terminal<CrosstermBackend<Stderr>>;

/// Everything the main loop reacts to, terminal input and request outcomes alike
#[derive(Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Resize(u16, u16),
    Resolved {
        id: RequestId,
        outcome: Result<ChatReply, TransportError>,
    },
}

pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<AppEvent>,
    tx: mpsc::UnboundedSender<AppEvent>,
}

impl EventHandler {
    /// Channel fed by a task reading crossterm events.
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();

        let tx_events = tx.clone();
        tokio::spawn(async move {
            let mut reader = event::EventStream::new();
            while let Some(evt) = reader.next().await {
                match translate(evt) {
                    ControlFlow::Continue(Some(event)) => {
                        if tx_events.send(event).is_err() {
                            break;
                        }
                    }
                    ControlFlow::Continue(None) => {}
                    ControlFlow::Break(()) => break,
                }
            }
        });

        Self { rx, tx }
    }

    /// Sender for request tasks to report back on
    pub fn sender(&self) -> mpsc::UnboundedSender<AppEvent> {
        self.tx.clone()
    }

    pub async fn next(&mut self) -> Option<AppEvent> {
        self.rx.recv().await
    }
}

/// Map a raw terminal event. A read error ends the stream instead of being retried.
fn translate(evt: io::Result<Event>) -> ControlFlow<(), Option<AppEvent>> {
    match evt {
        // Only handle key press events, not release
        Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
            ControlFlow::Continue(Some(AppEvent::Key(key)))
        }
        Ok(Event::Mouse(mouse)) => ControlFlow::Continue(Some(AppEvent::Mouse(mouse))),
        Ok(Event::Resize(w, h)) => ControlFlow::Continue(Some(AppEvent::Resize(w, h))),
        Ok(_) => ControlFlow::Continue(None),
        Err(e) => {
            tracing::error!(error = %e, "terminal event stream failed, no more input");
            ControlFlow::Break(())
        }
    }
}

pub fn init() -> Result<Tui> {
    enable_raw_mode()?;
    execute!(io::stderr(), EnterAlternateScreen)?;

    // Mouse capture for the send control and wheel scrolling
    execute!(io::stderr(), crossterm::event::EnableMouseCapture)?;

    let backend = CrosstermBackend::new(io::stderr());
    let terminal = Terminal::new(backend)?;

    Ok(terminal)
}

pub fn restore() -> Result<()> {
    execute!(io::stderr(), crossterm::event::DisableMouseCapture)?;
    execute!(io::stderr(), LeaveAlternateScreen)?;
    disable_raw_mode()?;
    Ok(())
}

/// Install panic hook to restore terminal on panic
pub fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = restore();
        original_hook(panic_info);
    }));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};

    #[test]
    fn test_translate_keeps_presses_and_stops_on_error() {
        let press = KeyEvent::new(KeyCode::Char('a'), KeyModifiers::NONE);
        assert!(matches!(
            translate(Ok(Event::Key(press))),
            ControlFlow::Continue(Some(AppEvent::Key(_)))
        ));

        let mut release = press;
        release.kind = KeyEventKind::Release;
        assert!(matches!(
            translate(Ok(Event::Key(release))),
            ControlFlow::Continue(None)
        ));

        assert!(matches!(
            translate(Ok(Event::Resize(80, 24))),
            ControlFlow::Continue(Some(AppEvent::Resize(80, 24)))
        ));

        let err = io::Error::new(io::ErrorKind::Other, "tty gone");
        assert!(matches!(translate(Err(err)), ControlFlow::Break(())));
    }
}
