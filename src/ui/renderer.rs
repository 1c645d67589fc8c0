/// Presentation layer: draws one panel per running session.
///
/// The renderer is a pure consumer of session state — it never mutates
/// the simulation. Each frame is composed into a cell buffer and written
/// with batched `queue!` commands, flushed once at the end.

use std::io::{self, BufWriter, Stdout, Write};

use crossterm::{
    cursor::{Hide, MoveTo, Show},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};

use crate::domain::boss::{POS_MAX, POS_MIN};
use crate::domain::collision::{BAND_TOP, FIELD_BOTTOM};
use crate::domain::item::ItemKind;
use crate::sim::session::{GameSession, Phase};

const PANEL_W: usize = 30;
const PANEL_GAP: usize = 4;
const FIELD_ROWS: usize = 18;
const HEADER_ROWS: usize = 4;
/// Lane center columns inside a panel.
const LANE_COLS: [usize; 3] = [6, 15, 24];

#[derive(Clone, Copy, PartialEq)]
struct Cell {
    ch: char,
    fg: Color,
}

const BLANK: Cell = Cell { ch: ' ', fg: Color::White };

pub struct Renderer {
    out: BufWriter<Stdout>,
    buf: Vec<Vec<Cell>>,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            out: BufWriter::new(io::stdout()),
            buf: Vec::new(),
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(self.out, EnterAlternateScreen, Hide, Clear(ClearType::All))?;
        Ok(())
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(self.out, Show, LeaveAlternateScreen)?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    pub fn render(&mut self, player: &GameSession, rival: Option<&GameSession>) -> io::Result<()> {
        let rows = HEADER_ROWS + FIELD_ROWS + 3;
        let cols = if rival.is_some() {
            PANEL_W * 2 + PANEL_GAP
        } else {
            PANEL_W
        };
        self.buf = vec![vec![BLANK; cols]; rows];

        self.compose_panel(0, "YOU", player);
        if let Some(rival) = rival {
            self.compose_panel(PANEL_W + PANEL_GAP, "RIVAL", rival);
        }

        self.flush_buffer(rows, cols)
    }

    // ── Panel composition ──

    fn compose_panel(&mut self, x0: usize, title: &str, s: &GameSession) {
        self.put_str(x0 + (PANEL_W - title.len()) / 2, 0, title, Color::Cyan);

        let hud = format!("Score {:06}  Lv {:<2}", s.score, s.level);
        self.put_str(x0, 1, &hud, Color::White);
        let hud2 = format!(
            "Time {:<3} Lives {}",
            s.time_left,
            "#".repeat(s.lives_remaining() as usize)
        );
        self.put_str(x0, 2, &hud2, Color::White);

        if let Some(boss) = &s.boss {
            let filled = (boss.hp as usize * 10) / boss.max_hp as usize;
            let bar = format!("BOSS [{}{}]", "=".repeat(filled), " ".repeat(10 - filled));
            self.put_str(x0, 3, &bar, Color::Red);
            // Horizontal marker over the lanes
            let span = (PANEL_W - 4) as f32;
            let col = ((boss.pos - POS_MIN) / (POS_MAX - POS_MIN) * span) as usize + 2;
            self.put(x0 + col.min(PANEL_W - 1), HEADER_ROWS, 'V', Color::Red);
        } else if s.gun.owned {
            self.put_str(x0, 3, "[gun ready]", Color::Yellow);
        }

        // Field: lane guides, catch band, items
        let band_row = HEADER_ROWS + scale_y(BAND_TOP);
        for row in 0..FIELD_ROWS {
            for col in LANE_COLS {
                self.put(x0 + col, HEADER_ROWS + row, '.', Color::DarkGrey);
            }
        }
        for item in &s.items {
            if item.y < 0.0 {
                continue;
            }
            let row = HEADER_ROWS + scale_y(item.y);
            let (ch, fg) = glyph(item.kind, item.claimed);
            self.put(x0 + LANE_COLS[item.lane.index()], row, ch, fg);
        }

        // Player basket under its lane
        let basket = x0 + LANE_COLS[s.player_lane.index()];
        self.put(basket - 1, band_row + 1, '\\', Color::Green);
        self.put(basket, band_row + 1, '_', Color::Green);
        self.put(basket + 1, band_row + 1, '/', Color::Green);

        // Footer: feedback or end banner
        let footer_row = HEADER_ROWS + FIELD_ROWS + 1;
        if s.phase == Phase::Ended {
            if let Some(end) = &s.outcome {
                let text = if end.victory {
                    "VICTORY!".to_string()
                } else {
                    format!("GAME OVER ({})", end.reason.label())
                };
                self.put_str(x0, footer_row, &text, Color::Magenta);
                self.put_str(x0, footer_row + 1, "press R to restart", Color::DarkGrey);
            }
        } else if !s.message.is_empty() {
            self.put_str(x0, footer_row, &s.message, Color::Yellow);
        }
    }

    fn put(&mut self, x: usize, y: usize, ch: char, fg: Color) {
        if y < self.buf.len() && x < self.buf[y].len() {
            self.buf[y][x] = Cell { ch, fg };
        }
    }

    fn put_str(&mut self, x: usize, y: usize, text: &str, fg: Color) {
        for (i, ch) in text.chars().enumerate() {
            self.put(x + i, y, ch, fg);
        }
    }

    // ── Terminal output ──

    fn flush_buffer(&mut self, rows: usize, cols: usize) -> io::Result<()> {
        let mut current_fg = Color::White;
        queue!(self.out, SetForegroundColor(current_fg))?;
        for y in 0..rows {
            queue!(self.out, MoveTo(0, y as u16))?;
            for x in 0..cols {
                let cell = self.buf[y][x];
                if cell.fg != current_fg {
                    current_fg = cell.fg;
                    queue!(self.out, SetForegroundColor(current_fg))?;
                }
                queue!(self.out, Print(cell.ch))?;
            }
        }
        queue!(self.out, ResetColor)?;
        self.out.flush()
    }
}

/// Map a field-unit y to a field row.
fn scale_y(y: f32) -> usize {
    let row = (y / FIELD_BOTTOM * FIELD_ROWS as f32) as usize;
    row.min(FIELD_ROWS - 1)
}

fn glyph(kind: ItemKind, claimed: bool) -> (char, Color) {
    if claimed {
        return ('+', Color::DarkGrey); // zap in flight
    }
    match kind {
        ItemKind::Cherry => ('o', Color::Red),
        ItemKind::Apple => ('O', Color::Green),
        ItemKind::Melon => ('@', Color::Magenta),
        ItemKind::Bomb => ('*', Color::DarkRed),
        ItemKind::Rocket => ('^', Color::Yellow),
    }
}
