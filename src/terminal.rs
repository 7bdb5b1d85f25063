use crate::canvas::{Color, Point};
use crate::graphics::FrameBuffer;
use crate::mapper::CANVAS_SIZE;
use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{
    DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture,
};
use crossterm::style::{Print, ResetColor, SetBackgroundColor, SetForegroundColor};
use crossterm::terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{execute, queue};
use std::io::{self, Write};

/// Upper half block: foreground paints the top pixel, background the bottom
const HALF_BLOCK: char = '▀';

/// The square region of the terminal the canvas is drawn into. Each cell
/// holds two pixels stacked vertically.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TerminalViewport {
    /// Side of the square in pixels; always even
    pub side: u16,
    pub left: u16,
    pub top: u16,
}

impl TerminalViewport {
    /// Largest centred square that fits a `columns`×`rows` terminal
    pub fn fit(columns: u16, rows: u16) -> Self {
        let side = columns.min(rows.saturating_mul(2)) & !1;
        Self {
            side,
            left: (columns - side) / 2,
            top: (rows - side / 2) / 2,
        }
    }

    /// Canvas position of the centre of a terminal cell, `None` outside the
    /// square
    pub fn to_canvas(&self, column: u16, row: u16) -> Option<Point> {
        if self.side == 0 {
            return None;
        }
        let x = column.checked_sub(self.left)?;
        let y = row.checked_sub(self.top)?;
        if x >= self.side || y >= self.side / 2 {
            return None;
        }

        let units_per_pixel = CANVAS_SIZE / f64::from(self.side);
        Some(Point::new(
            (f64::from(x) + 0.5) * units_per_pixel,
            (f64::from(y) * 2.0 + 1.0) * units_per_pixel,
        ))
    }
}

/// Current terminal size in columns and rows
pub fn size() -> (u16, u16) {
    termsize::get()
        .map(|size| (size.cols, size.rows))
        .or_else(|| terminal::size().ok())
        .unwrap_or((80, 24))
}

/// Switches the terminal into full-screen raw mode with mouse reporting
pub fn enter(out: &mut impl Write) -> io::Result<()> {
    terminal::enable_raw_mode()?;
    execute!(
        out,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableFocusChange,
        Hide,
        Clear(ClearType::All)
    )
}

/// Undoes [`enter`]
pub fn leave(out: &mut impl Write) -> io::Result<()> {
    execute!(
        out,
        ResetColor,
        Show,
        DisableFocusChange,
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    terminal::disable_raw_mode()
}

fn to_terminal(color: Color) -> crossterm::style::Color {
    crossterm::style::Color::Rgb {
        r: color.r,
        g: color.g,
        b: color.b,
    }
}

/// Writes `frame` into the viewport, then its labels on top
pub fn present(
    out: &mut impl Write,
    frame: &FrameBuffer,
    viewport: &TerminalViewport,
) -> io::Result<()> {
    let side = frame.side().min(usize::from(viewport.side));
    let mut colors: Option<(Color, Color)> = None;

    for row in 0..side / 2 {
        queue!(out, MoveTo(viewport.left, viewport.top + row as u16))?;
        for column in 0..side {
            let cell = (frame.pixel(column, row * 2), frame.pixel(column, row * 2 + 1));
            if colors != Some(cell) {
                queue!(
                    out,
                    SetForegroundColor(to_terminal(cell.0)),
                    SetBackgroundColor(to_terminal(cell.1))
                )?;
                colors = Some(cell);
            }
            queue!(out, Print(HALF_BLOCK))?;
        }
    }

    for label in frame.labels() {
        if label.y / 2 >= side / 2 || label.x >= side {
            continue;
        }
        let room = side - label.x;
        let text: String = label.text.chars().take(room).collect();
        let background = frame.pixel(label.x, label.y);
        queue!(
            out,
            MoveTo(viewport.left + label.x as u16, viewport.top + (label.y / 2) as u16),
            SetForegroundColor(to_terminal(label.color)),
            SetBackgroundColor(to_terminal(background)),
            Print(text)
        )?;
    }

    queue!(out, ResetColor)?;
    out.flush()
}
