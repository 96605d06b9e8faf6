use std::time::{Duration, Instant};

use wordle_advisor::game::GameError;
use wordle_advisor::wordle::{Word, NLETTER};

use super::*;

const BANNER_DURATION: Duration = Duration::from_secs(2);

#[derive(Debug)]
pub enum Action {
    Exit,
    Tick,
    EnterChar(char),
    DeleteChar,
    Submit,
}

impl App {
    pub async fn update(&mut self, action: Action) {
        match action {
            Action::Exit => {
                self.exit = true;
            }
            Action::Tick => {
                if let Some((_, until)) = self.banner {
                    if Instant::now() >= until {
                        self.banner = None;
                    }
                }
            }
            Action::EnterChar(x) => {
                if self.game().is_active() && self.letters.len() < NLETTER {
                    self.letters.push(x.to_ascii_uppercase());
                }
            }
            Action::DeleteChar => {
                self.letters.pop();
            }
            Action::Submit => {
                self.submit().await;
            }
        }
    }

    async fn submit(&mut self) {
        if !self.game().is_active() {
            return;
        }
        if self.letters.len() < NLETTER {
            self.show_banner("Not enough letters.");
            return;
        }

        let text: String = self.letters.iter().collect();
        let Ok(word) = text.parse::<Word>() else {
            self.show_banner("Not in word list.");
            return;
        };

        let (result, active) = {
            let mut game = self.game();
            let result = game.guess_word(word).map(|_| ());
            (result, game.is_active())
        };
        match result {
            Ok(()) => {
                self.letters.clear();
                if active {
                    self.advisor.request_computation_for_current_state();
                } else {
                    // no more suggestions are needed
                    self.advisor.cancel_all().await;
                }
            }
            Err(GameError::NotInWordList(_)) => self.show_banner("Not in word list."),
            Err(err) => log::warn!("guess {word} refused: {err}"),
        }
    }

    fn show_banner(&mut self, message: &'static str) {
        self.banner = Some((message, Instant::now() + BANNER_DURATION));
    }
}
