// SPDX-License-Identifier: MIT
//
// ANSI escape sequence generation.
//
// Pure functions that write escape sequences to any `impl Write`. No state,
// no decisions about when to emit; the engine makes those. This module
// just knows the byte-level encoding of every terminal command the spinner
// block needs: relative cursor motion, line erasure, cursor visibility and
// foreground colour.
//
// Everything is relative. The spinner block lives inline in the scroll-back,
// not on an alternate screen, so absolute CUP addressing is useless here:
// we never know which screen row the block started on.
//
// All functions return `io::Result` propagated from the underlying writer.
// In practice they never fail when writing to `OutputBuffer` (backed by a Vec).
use std::io::{self, Write};

use crate::color::Color;

// ─── Cursor ──────────────────────────────────────────────────────────────────

/// Move the cursor up `n` rows (CUU). Does nothing for `n == 0`.
///
/// CUU with a zero parameter means "one row" to the terminal, so the zero
/// case must be filtered here rather than emitted.
#[inline]
pub fn cursor_up(w: &mut impl Write, n: usize) -> io::Result<()> {
    if n == 0 {
        return Ok(());
    }
    write!(w, "\x1b[{n}A")
}

/// Move the cursor down `n` rows (CUD). Does nothing for `n == 0`.
#[inline]
pub fn cursor_down(w: &mut impl Write, n: usize) -> io::Result<()> {
    if n == 0 {
        return Ok(());
    }
    write!(w, "\x1b[{n}B")
}

/// Move the cursor to column `x` of the current row (CHA).
///
/// Our columns are 0-indexed; ANSI CHA is 1-indexed.
#[inline]
pub fn cursor_to_column(w: &mut impl Write, x: usize) -> io::Result<()> {
    write!(w, "\x1b[{}G", x + 1)
}

/// Return the cursor to column 0 of the current row.
#[inline]
pub fn carriage_return(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\r")
}

/// Hide the cursor (DECTCEM reset).
#[inline]
pub fn cursor_hide(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?25l")
}

/// Show the cursor (DECTCEM set).
#[inline]
pub fn cursor_show(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?25h")
}

// ─── Erase ───────────────────────────────────────────────────────────────────

/// Erase from the cursor to the end of the line (EL 0).
#[inline]
pub fn erase_line_right(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[K")
}

/// Erase from the cursor to the end of the screen (ED 0).
///
/// Used when the block shrinks: rows below the new last row may still hold
/// the tail of the previous frame.
#[inline]
pub fn erase_down(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[J")
}

// ─── Colour ──────────────────────────────────────────────────────────────────

/// Set the foreground (text) colour using the compact 16-colour SGR codes
/// (30-37 for normal, 90-97 for bright).
pub fn fg(w: &mut impl Write, color: Color) -> io::Result<()> {
    write!(w, "\x1b[{}m", color.sgr())
}

/// Reset only the foreground colour (SGR 39), leaving other attributes alone.
#[inline]
pub fn fg_default(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[39m")
}

// ─── Tests ───────────────────────────────────────────────────────────────────
