use std::io::{self, stdout, Stdout};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use crossterm::{execute, terminal::*};
use ratatui::prelude::*;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use wordle_advisor::advisor::{Advisor, AdvisorConfig, AdvisorError, TurnState};
use wordle_advisor::game::Wordle;

use actions::Action;

mod actions;
mod events;
mod ui;

/// A type alias for the terminal type used in this application
pub type Tui = Terminal<CrosstermBackend<Stdout>>;

pub fn initialize_panic_handler() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = restore();
        original_hook(panic_info);
    }));
}

/// Initialize the terminal
pub fn init() -> io::Result<Tui> {
    execute!(stdout(), EnterAlternateScreen)?;
    enable_raw_mode()?;
    Terminal::new(CrosstermBackend::new(stdout()))
}

/// Restore the terminal to its original state
pub fn restore() -> io::Result<()> {
    execute!(stdout(), LeaveAlternateScreen)?;
    disable_raw_mode()?;
    Ok(())
}

pub struct App {
    exit: bool,
    game: Arc<Mutex<Wordle>>,
    advisor: Advisor,
    top_k: usize,
    letters: Vec<char>,
    banner: Option<(&'static str, Instant)>,
    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,
    token: CancellationToken,
}

impl App {
    pub fn init(game: Wordle, config: AdvisorConfig) -> Result<Self, AdvisorError> {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let game = Arc::new(Mutex::new(game));
        let top_k = config.top_k;
        let turn_state: Arc<dyn TurnState> = game.clone();
        let advisor = Advisor::spawn(turn_state, config)?;

        Ok(App {
            exit: false,
            game,
            advisor,
            top_k,
            letters: Vec::new(),
            banner: None,
            action_tx,
            action_rx,
            token: CancellationToken::new(),
        })
    }

    /// runs the application's main loop until the user quits
    pub async fn run(&mut self, terminal: &mut Tui) -> io::Result<()> {
        let task = self.handle_events(self.action_tx.clone());
        self.advisor.request_computation_for_current_state();

        while !self.exit {
            terminal.draw(|frame| self.render_frame(frame))?;

            if let Some(action) = self.action_rx.recv().await {
                self.update(action).await;
            }
        }

        self.token.cancel();
        self.advisor.cancel_all().await;
        if let Err(err) = task.await {
            log::error!("input task ended abnormally: {err}");
        }
        Ok(())
    }

    fn render_frame(&self, frame: &mut Frame) {
        frame.render_widget(self, frame.size());
    }

    fn game(&self) -> MutexGuard<'_, Wordle> {
        self.game.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
