use ratatui::{
    prelude::*,
    widgets::{block::*, *},
};

use super::App;
use wordle_advisor::wordle::{LetterStatus, MAX_GUESSES, NLETTER};

/// What a grid cell shows.
#[derive(Clone, Copy)]
enum GridCell {
    Empty,
    Typed(char),
    Scored(char, LetterStatus),
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border = self.create_border();

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![Constraint::Length(45), Constraint::Fill(1)])
            .split(border.inner(area));

        self.render_grid(columns[0], buf);
        if self.game().is_active() {
            self.render_advice(columns[1], buf);
        } else {
            self.render_result(columns[1], buf);
        }

        border.render(area, buf);
    }
}

impl App {
    fn create_border(&self) -> Block<'_> {
        let title = Title::from(" Wordle advisor ".bold());
        let instructions = Title::from(Line::from(vec![
            " Quit ".into(),
            "<Esc> ".blue().bold(),
            " Guess ".into(),
            "<Enter> ".blue().bold(),
        ]));
        Block::default()
            .title(title.alignment(Alignment::Center))
            .title(
                instructions
                    .alignment(Alignment::Center)
                    .position(Position::Bottom),
            )
            .borders(Borders::ALL)
            .border_set(symbols::border::PLAIN)
    }

    fn grid_cells(&self) -> [[GridCell; NLETTER]; MAX_GUESSES] {
        let game = self.game();
        let mut cells = [[GridCell::Empty; NLETTER]; MAX_GUESSES];
        for (row, guess) in cells.iter_mut().zip(game.history().guesses()) {
            for (i, cell) in row.iter_mut().enumerate() {
                *cell = GridCell::Scored(guess.word.letters()[i] as char, guess.coloring[i]);
            }
        }
        if game.is_active() {
            for (cell, &c) in cells[game.guesses_made()].iter_mut().zip(&self.letters) {
                *cell = GridCell::Typed(c);
            }
        }
        cells
    }

    fn render_grid(&self, area: Rect, buf: &mut Buffer) {
        let block = Block::new()
            .title(Title::from(" Your guesses ".bold()).alignment(Alignment::Center))
            .padding(Padding::new(0, 0, 1, 0));

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints(vec![Constraint::Length(3); MAX_GUESSES])
            .split(block.inner(area));

        for (cells, row_area) in self.grid_cells().iter().zip(rows.iter()) {
            let row_layout = Layout::default()
                .direction(Direction::Horizontal)
                .constraints(vec![Constraint::Length(7); NLETTER])
                .flex(layout::Flex::Center)
                .split(*row_area);
            for (cell, cell_area) in cells.iter().zip(row_layout.iter()) {
                render_cell(*cell, *cell_area, buf);
            }
        }
        block.render(area, buf);
    }

    fn render_advice(&self, area: Rect, buf: &mut Buffer) {
        let block = Block::new().title(Title::from(" Suggestions ".bold()).alignment(Alignment::Center));

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints(vec![
                Constraint::Length(suggestions_height(self.top_k)),
                Constraint::Length(3),
                Constraint::Length(2),
                Constraint::Fill(1),
            ])
            .split(block.inner(area));

        self.render_suggestions(rows[0], buf);

        let progress = self.advisor.snapshot_progress();
        Gauge::default()
            .block(Block::new().borders(Borders::ALL).border_type(BorderType::Rounded))
            .gauge_style(Style::default().fg(Color::LightBlue))
            .ratio(progress.clamp(0.0, 1.0))
            .label(format!("{:.0}%", progress * 100.0))
            .render(rows[1], buf);

        if let Some((message, _)) = self.banner {
            Paragraph::new(message.red().bold())
                .centered()
                .render(rows[2], buf);
        }

        block.render(area, buf);
    }

    fn render_suggestions(&self, area: Rect, buf: &mut Buffer) {
        let suggestions = self.advisor.snapshot_suggestions().display_list(self.top_k);
        if suggestions.is_empty() {
            Paragraph::new("Loading...")
                .centered()
                .block(Block::new().padding(Padding::new(0, 0, 1, 0)))
                .render(area, buf);
            return;
        }

        let rows: Vec<_> = suggestions
            .iter()
            .map(|s| {
                // words that can win right away are highlighted
                let style = if s.is_valid_answer {
                    Style::default().light_blue().bold()
                } else {
                    Style::default()
                };
                Row::new(vec![
                    Text::from(s.word.to_string()).alignment(Alignment::Left),
                    Text::from(format!("{:.2}", s.entropy)).alignment(Alignment::Center),
                ])
                .style(style)
            })
            .collect();
        let widths = [Constraint::Length(10), Constraint::Length(9)];
        let table = Table::new(rows, widths)
            .column_spacing(1)
            .header(Row::new(vec![
                Cell::from("Suggestion").underlined(),
                Cell::from("Exp. Bits").underlined(),
            ]))
            .block(Block::new().padding(Padding::new(0, 0, 1, 0)));
        ratatui::widgets::Widget::render(table, area, buf);
    }

    fn render_result(&self, area: Rect, buf: &mut Buffer) {
        let game = self.game();
        let lines = if game.won() {
            vec![
                Line::from("You won!".bold().green()),
                Line::from(""),
                Line::from(format!("It only took you {} guesses!", game.guesses_made())),
            ]
        } else {
            vec![
                Line::from("You lost!".bold().red()),
                Line::from(""),
                Line::from(vec![
                    "The correct answer was ".into(),
                    game.answer().to_string().bold().green(),
                ]),
            ]
        };
        Paragraph::new(lines)
            .centered()
            .block(Block::new().padding(Padding::new(0, 0, 3, 0)))
            .render(area, buf);
    }
}

/// Rows taken by the suggestion table: padding, header and one row per entry.
fn suggestions_height(top_k: usize) -> u16 {
    u16::try_from(top_k).unwrap_or(u16::MAX).saturating_add(3)
}

fn render_cell(cell: GridCell, area: Rect, buf: &mut Buffer) {
    let (letter, border_style, text_style) = match cell {
        GridCell::Empty => (' ', Style::default().dark_gray(), Style::default()),
        GridCell::Typed(c) => (c, Style::default().white(), Style::default().bold()),
        GridCell::Scored(c, LetterStatus::Absent) => (
            c,
            Style::default().dark_gray(),
            Style::default().dark_gray(),
        ),
        GridCell::Scored(c, LetterStatus::Present) => (
            c,
            Style::default().light_yellow(),
            Style::default().fg(Color::LightYellow).bold(),
        ),
        GridCell::Scored(c, LetterStatus::Correct) => (
            c,
            Style::default().light_green(),
            Style::default().fg(Color::LightGreen).bold(),
        ),
    };

    let block = Block::new()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(border_style);
    Paragraph::new(Text::styled(letter.to_string(), text_style))
        .centered()
        .block(block)
        .render(area, buf);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suggestion_rows_never_overflow() {
        assert_eq!(suggestions_height(6), 9);
        assert_eq!(suggestions_height(u16::MAX as usize - 1), u16::MAX);
        assert_eq!(suggestions_height(usize::MAX), u16::MAX);
    }
}
