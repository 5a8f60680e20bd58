//! Screen layouts for the Lights Out game.

use crate::console::Console;
use crate::constants::game::GRID_SIZE;
use crate::constants::vga::{BUFFER_HEIGHT, BUFFER_WIDTH};
use crate::cursor::CursorPort;
use crate::error::ConsoleError;
use crate::game::{label, Board, Stats};
use crate::vga_buffer::{CellStore, Color, ColorCode};

pub const DEFAULT_COLOR: ColorCode = ColorCode::new(Color::White, Color::Black);
pub const TOOL_COLOR: ColorCode = ColorCode::new(Color::Black, Color::LightGray);
pub const BOUND_COLOR: ColorCode = ColorCode::new(Color::White, Color::Blue);
pub const TITLE_COLOR: ColorCode = ColorCode::new(Color::Yellow, Color::Black);
pub const ON_COLOR: ColorCode = TOOL_COLOR;
pub const OFF_COLOR: ColorCode = DEFAULT_COLOR;

/// Top-left corner of the grid frame
pub const GRID_ROW: usize = 2;
pub const GRID_COL: usize = BUFFER_WIDTH / 2;
/// Width and height of one square, not counting its border
pub const SQUARE_WIDTH: usize = 3;
/// First row of the statistics column
pub const STATS_ROW: usize = BUFFER_HEIGHT / 2 - 3;
/// Row holding the elapsed-time value
pub const TIME_ROW: usize = STATS_ROW + 3;

const TOOLBAR_ROW: usize = BUFFER_HEIGHT - 1;
const FRAME_SPAN: usize = SQUARE_WIDTH * GRID_SIZE + GRID_SIZE + 1;

pub const PLAYING_TOOLBAR: &str =
    "Press <a-y> to toggle square <I> Instructions <N> New game <Q> Quit";

const INSTRUCTIONS: &str = "\
Use the following keys at any point in the game:\n\n\
<a-y> to toggle the light at this grid location\n\
<N> to end the current game (and lose) and begin a new one\n\
<I> to access these instructions\n\
<Q> to quit to the title screen\n\n\
The goal of this game is to turn out all the lights on the grid.\n\
Pressing a character a-y will flip the light at that respective\n\
grid location and also flip the lights at the locations above,\n\
below, and to the left and right of this character location.\n";

type Result<T = ()> = core::result::Result<T, ConsoleError>;

/// Default colors on a blank screen.
pub fn init_screen<S: CellStore, P: CursorPort>(con: &mut Console<S, P>) -> Result {
    con.set_term_color(DEFAULT_COLOR)?;
    con.clear_console();
    Ok(())
}

pub fn title_screen<S: CellStore, P: CursorPort>(con: &mut Console<S, P>) -> Result {
    init_screen(con)?;
    con.set_term_color(TITLE_COLOR)?;
    con.set_cursor(BUFFER_HEIGHT / 2, BUFFER_WIDTH / 2 - 5)?;
    con.print_fmt(format_args!("LIGHTS OUT!"));
    con.set_cursor(BUFFER_HEIGHT / 2 + 1, BUFFER_WIDTH / 2 - 10)?;
    con.print_fmt(format_args!("turn every light off"));
    paint_toolbar(con, "Press any key to continue")
}

pub fn game_screen<S: CellStore, P: CursorPort>(
    con: &mut Console<S, P>,
    board: &Board,
    stats: &Stats,
) -> Result {
    init_screen(con)?;
    paint_toolbar(con, PLAYING_TOOLBAR)?;
    paint_grid(con, board)?;
    paint_stats(con, stats)?;
    paint_title(con)
}

pub fn win_screen<S: CellStore, P: CursorPort>(con: &mut Console<S, P>) -> Result {
    init_screen(con)?;
    con.set_cursor(BUFFER_HEIGHT / 2, BUFFER_WIDTH / 2 - 8)?;
    con.print_fmt(format_args!("CONGRATULATIONS!"));
    con.set_cursor(BUFFER_HEIGHT / 2 + 1, BUFFER_WIDTH / 2 - 3)?;
    con.print_fmt(format_args!("You won"));
    paint_toolbar(con, "Press any key to start a new game")
}

pub fn ins_screen<S: CellStore, P: CursorPort>(con: &mut Console<S, P>) -> Result {
    init_screen(con)?;
    con.putbytes(INSTRUCTIONS.as_bytes())?;
    paint_toolbar(con, "Press any key to resume game")
}

/// Fill the bottom row in the tool color and write `message` on it.
pub fn paint_toolbar<S: CellStore, P: CursorPort>(
    con: &mut Console<S, P>,
    message: &str,
) -> Result {
    con.set_term_color(TOOL_COLOR)?;
    paint_row(con, TOOLBAR_ROW)?;
    con.print_fmt(format_args!("{}", message));
    Ok(())
}

pub fn paint_grid<S: CellStore, P: CursorPort>(con: &mut Console<S, P>, board: &Board) -> Result {
    paint_frame(con)?;
    for row in 0..GRID_SIZE {
        for col in 0..GRID_SIZE {
            paint_square(con, row, col, board.is_lit(row, col))?;
        }
    }
    Ok(())
}

/// Overwrite the statistics column.
pub fn paint_stats<S: CellStore, P: CursorPort>(con: &mut Console<S, P>, stats: &Stats) -> Result {
    con.set_term_color(DEFAULT_COLOR)?;
    con.set_cursor(STATS_ROW, 0)?;
    con.print_fmt(format_args!("moves made:\n{}   \n", stats.moves));
    con.print_fmt(format_args!("time elapsed:\n\n"));
    con.print_fmt(format_args!("wins:\n{}   \n", stats.wins));
    con.print_fmt(format_args!("losses:\n{}   \n", stats.losses));
    con.print_fmt(format_args!(
        "record:\n{}/{}   \n",
        stats.wins,
        stats.wins + stats.losses
    ));
    Ok(())
}

pub fn paint_title<S: CellStore, P: CursorPort>(con: &mut Console<S, P>) -> Result {
    con.set_cursor(BUFFER_HEIGHT / 4, BUFFER_WIDTH / 4)?;
    con.set_term_color(TITLE_COLOR)?;
    con.print_fmt(format_args!("LIGHTS OUT!"));
    Ok(())
}

/// Repaint the elapsed seconds. Runs from the timer path, so the
/// foreground's cursor and color are put back afterwards.
pub fn update_time<S: CellStore, P: CursorPort>(con: &mut Console<S, P>, seconds: u32) -> Result {
    let saved_cursor = con.get_cursor();
    let saved_color = con.get_term_color();

    con.set_term_color(DEFAULT_COLOR)?;
    con.set_cursor(TIME_ROW, 0)?;
    con.print_fmt(format_args!("{}   ", seconds));

    con.set_term_color(saved_color)?;
    con.set_cursor(saved_cursor.row, saved_cursor.col)
}

/// Paint one light: a solid block with its label in the middle.
pub fn paint_square<S: CellStore, P: CursorPort>(
    con: &mut Console<S, P>,
    row: usize,
    col: usize,
    on: bool,
) -> Result {
    let color = if on { ON_COLOR } else { OFF_COLOR };
    let (start_row, start_col) = square_origin(row, col);
    for i in 0..SQUARE_WIDTH {
        for j in 0..SQUARE_WIDTH {
            con.draw_char(start_row + i, start_col + j, b' ', color)?;
        }
    }

    let center = SQUARE_WIDTH / 2;
    con.draw_char(start_row + center, start_col + center, label(row, col) as u8, color)
}

/// Fill `row` with spaces in the current color and leave the cursor at
/// its start. The last cell is drawn directly so the write does not wrap.
pub fn paint_row<S: CellStore, P: CursorPort>(con: &mut Console<S, P>, row: usize) -> Result {
    con.set_cursor(row, 0)?;
    for _ in 0..BUFFER_WIDTH - 1 {
        con.putbyte(b' ');
    }
    let color = con.get_term_color();
    con.draw_char(row, BUFFER_WIDTH - 1, b' ', color)?;
    con.putbyte(b'\r');
    Ok(())
}

/// Draw the borders between squares.
pub fn paint_frame<S: CellStore, P: CursorPort>(con: &mut Console<S, P>) -> Result {
    let pitch = SQUARE_WIDTH + 1;
    for line in 0..=GRID_SIZE {
        for offset in 0..FRAME_SPAN {
            // vertical bar
            con.draw_char(GRID_ROW + offset, GRID_COL + line * pitch, b' ', BOUND_COLOR)?;
            // horizontal bar
            con.draw_char(GRID_ROW + line * pitch, GRID_COL + offset, b' ', BOUND_COLOR)?;
        }
    }
    Ok(())
}

/// Screen cell of the top-left corner inside square `(row, col)`.
pub fn square_origin(row: usize, col: usize) -> (usize, usize) {
    let pitch = SQUARE_WIDTH + 1;
    (GRID_ROW + 1 + row * pitch, GRID_COL + 1 + col * pitch)
}
