use std::time::Duration;

use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::StreamExt;
use tokio::sync::mpsc;

use super::actions::*;
use super::*;

/// Redraw rate, so that progress keeps moving while no key is pressed
const TICK_RATE: Duration = Duration::from_millis(100);

impl App {
    pub fn handle_events(&self, tx: mpsc::UnboundedSender<Action>) -> tokio::task::JoinHandle<()> {
        let token = self.token.clone();
        tokio::spawn(async move {
            let mut reader = EventStream::new();
            let mut tick = tokio::time::interval(TICK_RATE);
            loop {
                let action = tokio::select! {
                    _ = token.cancelled() => break,
                    _ = tick.tick() => Action::Tick,
                    event = reader.next() => match event {
                        Some(Ok(Event::Key(key))) => match handle_key_event(key) {
                            Some(action) => action,
                            None => continue,
                        },
                        Some(Ok(_)) => continue,
                        Some(Err(err)) => {
                            log::error!("reading terminal events failed: {err}");
                            Action::Exit
                        }
                        None => Action::Exit,
                    },
                };
                if tx.send(action).is_err() {
                    break;
                }
            }
        })
    }
}

fn handle_key_event(key: KeyEvent) -> Option<Action> {
    // it's important to check that the event is a key press event as
    // crossterm also emits key release and repeat events on Windows.
    if key.kind != KeyEventKind::Press {
        return None;
    }
    if key
        .modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT | KeyModifiers::META)
    {
        return match key.code {
            KeyCode::Char('c') => Some(Action::Exit),
            _ => None,
        };
    }
    let action = match key.code {
        KeyCode::Esc => Action::Exit,
        KeyCode::Enter => Action::Submit,
        KeyCode::Backspace => Action::DeleteChar,
        KeyCode::Char(x) if x.is_ascii_alphabetic() => Action::EnterChar(x),
        _ => return None,
    };
    Some(action)
}
