//! Lights Out: a 5x5 board of lights. Pressing a square's letter flips it
//! and its orthogonal neighbours; the board is solved when every light is
//! off.

use log::{debug, info};

use crate::console::Console;
use crate::constants::game::{FIRST_LABEL, GRID_SIZE, LAST_LABEL, SCRAMBLE_DEPTH};
use crate::cursor::CursorPort;
use crate::error::ConsoleError;
use crate::paint;
use crate::ticks::GameClock;
use crate::vga_buffer::CellStore;

/// Key label of square `(row, col)`.
pub fn label(row: usize, col: usize) -> char {
    (FIRST_LABEL as u8 + (row * GRID_SIZE + col) as u8) as char
}

/// Square labelled `ch`, if any.
pub fn square_for(ch: char) -> Option<(usize, usize)> {
    if !(FIRST_LABEL..=LAST_LABEL).contains(&ch) {
        return None;
    }
    let index = (ch as u8 - FIRST_LABEL as u8) as usize;
    Some((index / GRID_SIZE, index % GRID_SIZE))
}

/// Simple xorshift32 for board scrambling
struct XorShift(u32);

impl XorShift {
    fn seeded(seed: u32) -> XorShift {
        // xorshift never leaves zero
        XorShift(if seed == 0 { 0x9E37_79B9 } else { seed })
    }

    fn next(&mut self) -> u32 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.0 = x;
        x
    }
}

/// `(row, col)` plus its orthogonal neighbours that lie on the board.
pub fn neighbourhood(row: usize, col: usize) -> impl Iterator<Item = (usize, usize)> {
    let mut squares = [None; 5];
    squares[0] = Some((row, col));
    if row > 0 {
        squares[1] = Some((row - 1, col));
    }
    if row + 1 < GRID_SIZE {
        squares[2] = Some((row + 1, col));
    }
    if col > 0 {
        squares[3] = Some((row, col - 1));
    }
    if col + 1 < GRID_SIZE {
        squares[4] = Some((row, col + 1));
    }
    squares.into_iter().flatten()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Board {
    lights: [[bool; GRID_SIZE]; GRID_SIZE],
}

impl Board {
    pub const fn dark() -> Board {
        Board { lights: [[false; GRID_SIZE]; GRID_SIZE] }
    }

    /// A solvable board: random presses applied to a dark one.
    pub fn scrambled(seed: u32) -> Board {
        let mut rng = XorShift::seeded(seed);
        let mut board = Board::dark();
        for _ in 0..SCRAMBLE_DEPTH {
            let square = rng.next() as usize % (GRID_SIZE * GRID_SIZE);
            board.press(square / GRID_SIZE, square % GRID_SIZE);
        }
        board
    }

    pub fn is_lit(&self, row: usize, col: usize) -> bool {
        self.lights[row][col]
    }

    /// Flip `(row, col)` and its neighbours.
    pub fn press(&mut self, row: usize, col: usize) {
        for (r, c) in neighbourhood(row, col) {
            self.lights[r][c] = !self.lights[r][c];
        }
    }

    pub fn is_solved(&self) -> bool {
        self.lights.iter().flatten().all(|lit| !lit)
    }

    pub fn lit_count(&self) -> usize {
        self.lights.iter().flatten().filter(|&&lit| lit).count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Stats {
    pub moves: u32,
    pub wins: u32,
    pub losses: u32,
}

/// What the player is looking at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// Title card; any key starts a fresh session.
    Title,
    /// A board in play.
    Playing,
    /// Win message; any key deals a new board.
    Won,
    /// Help text; any key returns to the board.
    Instructions,
}

pub struct Game {
    board: Board,
    stats: Stats,
    screen: Screen,
}

impl Game {
    pub const fn new() -> Game {
        Game {
            board: Board::dark(),
            stats: Stats { moves: 0, wins: 0, losses: 0 },
            screen: Screen::Title,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    /// Hide the cursor and show the title screen.
    pub fn start<S: CellStore, P: CursorPort>(
        &mut self,
        con: &mut Console<S, P>,
        clock: &GameClock,
    ) -> Result<(), ConsoleError> {
        con.hide_cursor();
        self.show_title(con, clock)
    }

    /// React to one key press.
    pub fn handle_key<S: CellStore, P: CursorPort>(
        &mut self,
        ch: char,
        con: &mut Console<S, P>,
        clock: &GameClock,
    ) -> Result<(), ConsoleError> {
        match self.screen {
            Screen::Title => {
                self.stats = Stats::default();
                clock.reset();
                self.new_board(con, clock)
            }
            Screen::Won => self.new_board(con, clock),
            Screen::Instructions => {
                paint::game_screen(con, &self.board, &self.stats)?;
                self.enter_play(clock);
                Ok(())
            }
            Screen::Playing => self.handle_play_key(ch, con, clock),
        }
    }

    fn handle_play_key<S: CellStore, P: CursorPort>(
        &mut self,
        ch: char,
        con: &mut Console<S, P>,
        clock: &GameClock,
    ) -> Result<(), ConsoleError> {
        if let Some((row, col)) = square_for(ch) {
            self.board.press(row, col);
            for (r, c) in neighbourhood(row, col) {
                paint::paint_square(con, r, c, self.board.is_lit(r, c))?;
            }
            self.stats.moves += 1;
            paint::paint_stats(con, &self.stats)?;
            if self.board.is_solved() {
                self.win(con, clock)?;
            }
            return Ok(());
        }

        match ch {
            'N' => {
                clock.pause();
                self.stats.losses += 1;
                info!("game: forfeit after {} moves", self.stats.moves);
                self.new_board(con, clock)
            }
            'I' => {
                clock.pause();
                self.screen = Screen::Instructions;
                paint::ins_screen(con)
            }
            'Q' => self.show_title(con, clock),
            _ => Ok(()),
        }
    }

    fn win<S: CellStore, P: CursorPort>(
        &mut self,
        con: &mut Console<S, P>,
        clock: &GameClock,
    ) -> Result<(), ConsoleError> {
        clock.pause();
        info!("game: solved in {} moves, {}s", self.stats.moves, clock.seconds());
        self.stats.wins += 1;
        self.screen = Screen::Won;
        paint::win_screen(con)
    }

    fn show_title<S: CellStore, P: CursorPort>(
        &mut self,
        con: &mut Console<S, P>,
        clock: &GameClock,
    ) -> Result<(), ConsoleError> {
        clock.pause();
        self.screen = Screen::Title;
        paint::title_screen(con)
    }

    /// Deal a fresh board, reset the move count and start the clock.
    fn new_board<S: CellStore, P: CursorPort>(
        &mut self,
        con: &mut Console<S, P>,
        clock: &GameClock,
    ) -> Result<(), ConsoleError> {
        clock.reset();
        self.stats.moves = 0;
        self.board = Board::scrambled(clock.total_ticks());
        debug!("game: new board with {} lights on", self.board.lit_count());
        paint::game_screen(con, &self.board, &self.stats)?;
        self.enter_play(clock);
        Ok(())
    }

    fn enter_play(&mut self, clock: &GameClock) {
        self.screen = Screen::Playing;
        clock.resume();
    }
}

impl Default for Game {
    fn default() -> Self {
        Game::new()
    }
}
