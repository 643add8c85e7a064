/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// The renderer is the game's `Canvas`: render ops from the controller are
/// applied to an internal `BoardMirror`, and each frame is composed from
/// that mirror plus the HUD.
///
/// How a frame is produced:
///   1. Compose the next frame into the `front` buffer
///   2. Compare each cell with `back` (the previous frame)
///   3. Queue terminal commands only for changed cells, flush once
///   4. Swap front/back

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::domain::coin::Denomination;
use crate::domain::grid::{Coord, Grid};
use crate::domain::player::Cosmetic;
use crate::sim::render::{BoardMirror, Canvas, VisualKey};

// ── Cell: the unit of the frame buffer ──

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
struct Cell {
    ch: char,
    fg: Color,
    bg: Color,
}

impl Cell {
    const BASE_BG: Color = Color::Rgb { r: 18, g: 18, b: 28 };

    const BLANK: Cell = Cell { ch: ' ', fg: Color::White, bg: Cell::BASE_BG };

    /// Never equal to a composed cell; forces a full repaint.
    const INVALID: Cell = Cell { ch: '?', fg: Color::Magenta, bg: Color::Magenta };

    fn new(ch: char, fg: Color, bg: Color) -> Self {
        Cell { ch, fg, bg }
    }
}

// ── FrameBuffer: a 2D grid of Cells ──

struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    fn new(w: usize, h: usize) -> Self {
        FrameBuffer { width: w, height: h, cells: vec![Cell::BLANK; w * h] }
    }

    fn resize(&mut self, w: usize, h: usize) {
        if self.width != w || self.height != h {
            *self = FrameBuffer::new(w, h);
        }
    }

    fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    fn set(&mut self, x: usize, y: usize, cell: Cell) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = cell;
        }
    }

    fn get(&self, x: usize, y: usize) -> Cell {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x]
        } else {
            Cell::BLANK
        }
    }

    fn put_str(&mut self, x: usize, y: usize, s: &str, fg: Color, bg: Color) {
        for (i, ch) in s.chars().enumerate() {
            self.set(x + i, y, Cell::new(ch, fg, bg));
        }
    }

    fn fill_row(&mut self, y: usize, bg: Color) {
        for x in 0..self.width {
            self.set(x, y, Cell::new(' ', Color::White, bg));
        }
    }
}

// ── Sprites ──

/// Glyph and colour for each visual key.
pub fn sprite(key: VisualKey) -> (char, Color) {
    match key {
        VisualKey::Coin(Denomination::Copper) => ('•', Color::Rgb { r: 196, g: 120, b: 60 }),
        VisualKey::Coin(Denomination::Silver) => ('●', Color::Rgb { r: 200, g: 205, b: 215 }),
        VisualKey::Coin(Denomination::Gold) => ('$', Color::Rgb { r: 255, g: 210, b: 40 }),
        VisualKey::Player(Cosmetic::Default) => ('@', Color::Rgb { r: 90, g: 230, b: 255 }),
        VisualKey::Player(Cosmetic::Alternate) => ('☻', Color::Rgb { r: 255, g: 80, b: 220 }),
    }
}

/// Everything besides the board that a frame shows.
#[derive(Clone, Copy, Debug, Default)]
pub struct View<'a> {
    pub name: &'a str,
    pub score: u32,
    /// Valid moves until the next coin shuffle; `None` before a game starts.
    pub moves_to_shuffle: Option<u32>,
    pub message: &'a str,
    /// `(label, text)` of the open prompt.
    pub prompt: Option<(&'a str, &'a str)>,
    pub pad_connected: bool,
}

// ── Layout ──

/// Terminal columns per board cell: " X ".
const CELL_W: usize = 3;
const TITLE_ROW: usize = 0;
const HUD_ROW: usize = 1;
const BOARD_ROW: usize = 3;
const BOARD_COL: usize = 2;

const HUD_BG: Color = Color::Rgb { r: 24, g: 40, b: 70 };
const MSG_BG: Color = Color::Rgb { r: 200, g: 180, b: 50 };
const TILE_LIGHT: Color = Color::Rgb { r: 44, g: 52, b: 44 };
const TILE_DARK: Color = Color::Rgb { r: 34, g: 40, b: 34 };

fn compose(buf: &mut FrameBuffer, view: &View, board: Option<&BoardMirror>) {
    buf.put_str(BOARD_COL, TITLE_ROW, "C O I N   G R I D", Color::Rgb { r: 255, g: 200, b: 50 }, Cell::BASE_BG);

    let mut row = BOARD_ROW;
    if let Some(board) = board {
        let n = board.grid().size();
        let shuffle = view.moves_to_shuffle.map_or_else(String::new, |k| format!("   Shuffle in: {k}"));
        let hud = format!(" {}   Score: {}   Grid: {n}x{n}{shuffle} ", view.name, view.score);
        buf.fill_row(HUD_ROW, HUD_BG);
        buf.put_str(0, HUD_ROW, &hud, Color::White, HUD_BG);

        compose_board(buf, board);
        row += n + 1;
    }

    if !view.message.is_empty() {
        buf.fill_row(row, MSG_BG);
        buf.put_str(0, row, &format!(" ◈ {} ", view.message), Color::Black, MSG_BG);
    }
    row += 1;

    if let Some((label, text)) = view.prompt {
        let line = format!("{label} {text}");
        buf.put_str(BOARD_COL, row, &line, Color::White, Cell::BASE_BG);
        buf.set(BOARD_COL + line.chars().count(), row, Cell::new('▏', Color::Rgb { r: 80, g: 255, b: 80 }, Cell::BASE_BG));
    }
    row += 2;

    let help = match (view.prompt.is_some(), board.is_some()) {
        (true, _) => " Enter:OK  Backspace:Delete  Esc:Cancel",
        (false, true) if view.pad_connected => " ←↑↓→/WASD:Move  N:Name  Q:Quit  │  Pad: D-pad move, Y name",
        (false, true) => " ←↑↓→/WASD:Move  N:Name  Q/Esc:Quit",
        (false, false) => "",
    };
    buf.put_str(0, row, help, Color::DarkGrey, Cell::BASE_BG);
}

fn compose_board(buf: &mut FrameBuffer, board: &BoardMirror) {
    for c in board.grid().cells() {
        let (x, y) = (c.x as usize, c.y as usize);
        let bg = if (x + y) % 2 == 0 { TILE_LIGHT } else { TILE_DARK };
        let (ch, fg) = board.at(c).map_or((' ', Color::White), sprite);
        let col = BOARD_COL + y * CELL_W;
        let row = BOARD_ROW + x;
        buf.set(col, row, Cell::new(' ', fg, bg));
        buf.set(col + 1, row, Cell::new(ch, fg, bg));
        buf.set(col + 2, row, Cell::new(' ', fg, bg));
    }
}

// ── Renderer ──

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
    board: Option<BoardMirror>,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            writer: BufWriter::with_capacity(8192, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
            board: None,
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            SetBackgroundColor(Cell::BASE_BG),
            Clear(ClearType::All)
        )?;
        self.sync_size(terminal::size().unwrap_or((80, 24)));
        Ok(())
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(self.writer, ResetColor, cursor::Show, terminal::LeaveAlternateScreen)?;
        terminal::disable_raw_mode()
    }

    /// Start drawing a fresh, empty board.
    pub fn reset_board(&mut self, grid: Grid) {
        match self.board.as_mut() {
            Some(board) if board.grid() == grid => board.clear(),
            _ => self.board = Some(BoardMirror::new(grid)),
        }
    }

    pub fn render(&mut self, view: &View) -> io::Result<()> {
        let size = terminal::size().unwrap_or((80, 24));
        if (size.0 as usize, size.1 as usize) != (self.term_w, self.term_h) {
            self.sync_size(size);
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
        }

        self.front.clear();
        compose(&mut self.front, view, self.board.as_ref());
        self.flush_diff()?;
        std::mem::swap(&mut self.front, &mut self.back);
        Ok(())
    }

    fn sync_size(&mut self, (w, h): (u16, u16)) {
        self.term_w = w as usize;
        self.term_h = h as usize;
        self.front.resize(self.term_w, self.term_h);
        self.back.resize(self.term_w, self.term_h);
        self.back.cells.fill(Cell::INVALID);
    }

    // ── Diff flush: only write changed cells ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = Color::White;
        let mut last_bg = Cell::BASE_BG;
        let mut cursor_at: Option<(usize, usize)> = None;

        queue!(self.writer, SetForegroundColor(last_fg), SetBackgroundColor(last_bg))?;

        for y in 0..self.front.height {
            for x in 0..self.front.width {
                let cell = self.front.get(x, y);
                if cell == self.back.get(x, y) {
                    continue;
                }
                if cursor_at != Some((x, y)) {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                }
                if cell.fg != last_fg {
                    queue!(self.writer, SetForegroundColor(cell.fg))?;
                    last_fg = cell.fg;
                }
                if cell.bg != last_bg {
                    queue!(self.writer, SetBackgroundColor(cell.bg))?;
                    last_bg = cell.bg;
                }
                queue!(self.writer, Print(cell.ch))?;
                cursor_at = Some((x + 1, y));
            }
        }

        self.writer.flush()
    }
}

impl Canvas for Renderer {
    fn draw(&mut self, key: VisualKey, at: Coord) {
        if let Some(board) = self.board.as_mut() {
            board.draw(key, at);
        }
    }

    fn erase(&mut self, at: Coord) {
        if let Some(board) = self.board.as_mut() {
            board.erase(at);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::render::{apply, RenderOp};

    fn row_text(buf: &FrameBuffer, y: usize) -> String {
        (0..buf.width).map(|x| buf.get(x, y).ch).collect()
    }

    fn glyph_at(buf: &FrameBuffer, c: Coord) -> char {
        buf.get(BOARD_COL + c.y as usize * CELL_W + 1, BOARD_ROW + c.x as usize).ch
    }

    #[test]
    fn board_cells_follow_row_column_layout() {
        let mut board = BoardMirror::new(Grid::new(3));
        apply(&mut board, &[
            RenderOp::Draw { key: VisualKey::Player(Cosmetic::Default), at: Coord::new(1, 1) },
            RenderOp::Draw { key: VisualKey::Coin(Denomination::Gold), at: Coord::new(0, 2) },
            RenderOp::Draw { key: VisualKey::Coin(Denomination::Copper), at: Coord::new(2, 0) },
        ]);
        let mut buf = FrameBuffer::new(80, 16);
        let view = View { name: "Ann", score: 1500, moves_to_shuffle: Some(4), ..View::default() };
        compose(&mut buf, &view, Some(&board));

        assert_eq!(glyph_at(&buf, Coord::new(1, 1)), '@');
        assert_eq!(glyph_at(&buf, Coord::new(0, 2)), '$');
        assert_eq!(glyph_at(&buf, Coord::new(2, 0)), '•');
        assert_eq!(glyph_at(&buf, Coord::new(0, 0)), ' ');

        let hud = row_text(&buf, HUD_ROW);
        assert!(hud.contains("Ann"));
        assert!(hud.contains("Score: 1500"));
        assert!(hud.contains("Grid: 3x3"));
        assert!(hud.contains("Shuffle in: 4"));
    }

    #[test]
    fn prompt_without_board() {
        let mut buf = FrameBuffer::new(60, 10);
        let view = View { prompt: Some(("Enter grid size (2-10):", "3")), ..View::default() };
        compose(&mut buf, &view, None);
        assert!(row_text(&buf, BOARD_ROW + 1).contains("Enter grid size (2-10): 3▏"));
        assert!(row_text(&buf, HUD_ROW).trim().is_empty());
    }

    #[test]
    fn alternate_skin_sprite_differs() {
        let (a, _) = sprite(VisualKey::Player(Cosmetic::Default));
        let (b, _) = sprite(VisualKey::Player(Cosmetic::Alternate));
        assert_ne!(a, b);
        let coins: Vec<char> = Denomination::ALL.iter().map(|d| sprite(VisualKey::Coin(*d)).0).collect();
        assert_eq!(coins.len(), 3);
        assert!(coins[0] != coins[1] && coins[1] != coins[2] && coins[0] != coins[2]);
    }

    #[test]
    fn out_of_frame_writes_are_dropped() {
        let mut buf = FrameBuffer::new(4, 2);
        buf.put_str(2, 1, "abcdef", Color::White, Cell::BASE_BG);
        assert_eq!(row_text(&buf, 1), "  ab");
        assert_eq!(buf.get(10, 10), Cell::BLANK);
    }
}
