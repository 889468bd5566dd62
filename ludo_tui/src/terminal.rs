use std::collections::VecDeque;
use std::io::{self, stdout, Stdout};
use std::time::Duration;

use ludo::{Point, Snapshot, CELL_SIZE, DICE_BOX, GRID_CELLS};
use ludo_match::{InputSource, MatchResult, Renderer};
use ratatui::{
    crossterm::{
        event::{
            self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind,
            MouseButton, MouseEventKind,
        },
        terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
        ExecutableCommand,
    },
    prelude::*,
};
use tracing::{error, trace};

use crate::widgets::{
    BoardWidget, DiceWidget, ResultWidget, StatusWidget, BOARD_WIDGET_HEIGHT, BOARD_WIDGET_WIDTH,
    CELL_WIDTH,
};

const SIDE_PANEL_WIDTH: u16 = 28;
const DICE_WIDGET_HEIGHT: u16 = 3;

pub fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    stdout().execute(EnableMouseCapture)?;
    Terminal::new(CrosstermBackend::new(stdout()))
}

pub fn restore_terminal() -> io::Result<()> {
    stdout().execute(DisableMouseCapture)?;
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}

/// Maps a terminal position inside the board widget to the centre of the
/// board cell underneath it.
pub fn board_point(board_area: Rect, column: u16, row: u16) -> Option<Point> {
    let x = column.checked_sub(board_area.x + 1)? / CELL_WIDTH;
    let y = row.checked_sub(board_area.y + 1)?;
    if x as usize >= GRID_CELLS || y as usize >= GRID_CELLS {
        return None;
    }
    Some(Point::new(
        x as i32 * CELL_SIZE + CELL_SIZE / 2,
        y as i32 * CELL_SIZE + CELL_SIZE / 2,
    ))
}

fn contains(area: Rect, column: u16, row: u16) -> bool {
    column >= area.x && column < area.x + area.width && row >= area.y && row < area.y + area.height
}

/// Draws the match into the terminal and turns mouse and key events into clicks.
pub struct TerminalFrontend {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    board_area: Rect,
    dice_area: Rect,
    clicks: VecDeque<Point>,
    pointer: Point,
    quit: bool,
}

impl TerminalFrontend {
    pub fn new(terminal: Terminal<CrosstermBackend<Stdout>>) -> Self {
        Self {
            terminal,
            board_area: Rect::default(),
            dice_area: Rect::default(),
            clicks: VecDeque::new(),
            pointer: Point::new(0, 0),
            quit: false,
        }
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                KeyCode::Char('q') | KeyCode::Esc => self.quit = true,
                KeyCode::Char(' ') | KeyCode::Char('r') => self.clicks.push_back(DICE_BOX.center()),
                _ => {}
            },
            Event::Mouse(mouse) if mouse.kind == MouseEventKind::Down(MouseButton::Left) => {
                let (column, row) = (mouse.column, mouse.row);
                if contains(self.dice_area, column, row) {
                    self.clicks.push_back(DICE_BOX.center());
                } else if let Some(point) = board_point(self.board_area, column, row) {
                    self.clicks.push_back(point);
                } else {
                    trace!(column, row, "Click outside the board");
                }
            }
            _ => {}
        }
    }

    /// Reads all pending terminal events without blocking.
    fn read_events(&mut self) -> io::Result<()> {
        while event::poll(Duration::ZERO)? {
            let event = event::read()?;
            self.handle_event(event);
        }
        Ok(())
    }

    fn pump_events(&mut self) {
        if let Err(err) = self.read_events() {
            error!(%err, "Could not read terminal events");
            self.quit = true;
        }
    }

    /// Shows the final board next to the standings until a key is pressed.
    pub fn show_result(&mut self, snapshot: &Snapshot, result: &MatchResult) -> io::Result<()> {
        // Input sent while the match was still running doesn't count
        self.read_events()?;
        self.draw(snapshot, Some(result))?;
        loop {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    return Ok(());
                }
            }
        }
    }

    /// Draws the board, and either the dice and status panels or the result.
    fn draw(&mut self, snapshot: &Snapshot, result: Option<&MatchResult>) -> io::Result<()> {
        let mut board_area = self.board_area;
        let mut dice_area = self.dice_area;
        self.terminal.draw(|frame| {
            let columns = Layout::new(
                Direction::Horizontal,
                [
                    Constraint::Length(BOARD_WIDGET_WIDTH),
                    Constraint::Length(SIDE_PANEL_WIDTH),
                    Constraint::Min(0),
                ],
            )
            .split(frame.size());
            let board_column = Layout::new(
                Direction::Vertical,
                [Constraint::Length(BOARD_WIDGET_HEIGHT), Constraint::Min(0)],
            )
            .split(columns[0]);
            board_area = board_column[0];
            frame.render_widget(BoardWidget { snapshot }, board_area);

            if let Some(result) = result {
                let panel = Layout::new(
                    Direction::Vertical,
                    [Constraint::Length(BOARD_WIDGET_HEIGHT), Constraint::Min(0)],
                )
                .split(columns[1]);
                frame.render_widget(ResultWidget { result }, panel[0]);
                return;
            }
            let side_panel = Layout::new(
                Direction::Vertical,
                [Constraint::Length(DICE_WIDGET_HEIGHT), Constraint::Min(0)],
            )
            .split(columns[1]);
            dice_area = side_panel[0];
            frame.render_widget(DiceWidget { snapshot }, dice_area);
            frame.render_widget(StatusWidget { snapshot }, side_panel[1]);
        })?;
        self.board_area = board_area;
        self.dice_area = dice_area;
        Ok(())
    }
}

impl InputSource for TerminalFrontend {
    fn pointer_position(&mut self) -> Point {
        self.pointer
    }

    fn was_clicked(&mut self) -> bool {
        self.pump_events();
        match self.clicks.pop_front() {
            Some(point) => {
                self.pointer = point;
                true
            }
            None => false,
        }
    }

    fn should_close(&mut self) -> bool {
        self.pump_events();
        self.quit
    }
}

impl Renderer for TerminalFrontend {
    fn render(&mut self, snapshot: &Snapshot) -> anyhow::Result<()> {
        self.draw(snapshot, None)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_cells_map_to_cell_centres() {
        let area = Rect::new(2, 1, BOARD_WIDGET_WIDTH, BOARD_WIDGET_HEIGHT);
        // Top-left board cell, inside the border
        assert_eq!(board_point(area, 3, 2), Some(Point::new(30, 30)));
        assert_eq!(board_point(area, 4, 2), Some(Point::new(30, 30)));
        assert_eq!(board_point(area, 5, 3), Some(Point::new(90, 90)));
        // The border and anything right of the board
        assert_eq!(board_point(area, 2, 2), None);
        assert_eq!(board_point(area, 3 + 30, 2), None);
        assert_eq!(board_point(area, 3, 1 + 16), None);
    }

    #[test]
    fn yard_clicks_hit_yard_pieces() {
        let area = Rect::new(0, 0, BOARD_WIDGET_WIDTH, BOARD_WIDGET_HEIGHT);
        let yard = ludo::yard_pixel(ludo::PlayerId::ALL[0], 0);
        let hit_box = ludo::piece_hit_box(ludo::PlayerId::ALL[0], 0, ludo::Position::AtHome);
        // The slot's top-left pixel lies in grid cell (1, 1)
        let column = 1 + (yard.x / CELL_SIZE) as u16 * CELL_WIDTH;
        let row = 1 + (yard.y / CELL_SIZE) as u16;
        let point = board_point(area, column, row).unwrap();
        assert!(hit_box.contains(point));
    }
}
