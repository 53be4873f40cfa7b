//! TerminalRenderer: flushes a framebuffer to a real terminal.
//!
//! The first frame (and any frame after a resize or `invalidate`) is a full
//! redraw; every other frame only rewrites the runs of cells that changed.
//! Style escapes are emitted only for the parts of the style that differ
//! from the previous cell.

use std::io::{self, Write};

use anyhow::Result;

use crossterm::{
    cursor, event,
    style::{
        Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
    },
    terminal, QueueableCommand,
};

use crate::fb::{Cell, CellStyle, FrameBuffer, Rgb};

const TITLE: &str = "TUI Arcade";

/// Unchanged cells bridged inside one run; a `MoveTo` costs about as much
const RUN_GAP: usize = 3;

pub struct TerminalRenderer {
    stdout: io::Stdout,
    last: Option<FrameBuffer>,
    buf: Vec<u8>,
}

impl TerminalRenderer {
    pub fn new() -> Self {
        Self {
            stdout: io::stdout(),
            last: None,
            buf: Vec::with_capacity(64 * 1024),
        }
    }

    /// Raw mode, alternate screen and mouse reporting
    pub fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        self.buf.clear();
        self.buf.queue(terminal::SetTitle(TITLE))?;
        self.buf.queue(terminal::EnterAlternateScreen)?;
        self.buf.queue(cursor::Hide)?;
        self.buf.queue(terminal::DisableLineWrap)?;
        self.buf.queue(event::EnableMouseCapture)?;
        self.flush_buf()
    }

    pub fn exit(&mut self) -> Result<()> {
        self.buf.clear();
        self.buf.queue(event::DisableMouseCapture)?;
        self.buf.queue(ResetColor)?;
        self.buf.queue(SetAttribute(Attribute::Reset))?;
        self.buf.queue(terminal::EnableLineWrap)?;
        self.buf.queue(cursor::Show)?;
        self.buf.queue(terminal::LeaveAlternateScreen)?;
        self.flush_buf()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    /// Force the next draw to be a full redraw (terminal resize).
    pub fn invalidate(&mut self) {
        self.last = None;
    }

    /// Draw a framebuffer, swapping it into internal state.
    ///
    /// Keep one `FrameBuffer` and pass it every frame: after the draw it
    /// holds the previous frame, which views clear before drawing anyway.
    pub fn draw_swap(&mut self, fb: &mut FrameBuffer) -> Result<()> {
        self.buf.clear();
        match self.last.take() {
            Some(prev) if prev.width() == fb.width() && prev.height() == fb.height() => {
                encode_diff_into(&prev, fb, &mut self.buf)?;
                self.last = Some(prev);
            }
            stale => {
                encode_full_into(fb, &mut self.buf)?;
                let mut prev = stale.unwrap_or_else(|| FrameBuffer::new(fb.width(), fb.height()));
                prev.resize(fb.width(), fb.height());
                self.last = Some(prev);
            }
        }
        self.flush_buf()?;

        if let Some(prev) = self.last.as_mut() {
            std::mem::swap(prev, fb);
        }
        Ok(())
    }

    fn flush_buf(&mut self) -> Result<()> {
        self.stdout.write_all(&self.buf)?;
        self.stdout.flush()?;
        Ok(())
    }
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Queues cells and tracks the terminal's current style
struct StyleWriter<'a> {
    out: &'a mut Vec<u8>,
    fg: Option<Rgb>,
    bg: Option<Rgb>,
    attrs: Option<(bool, bool)>,
}

impl<'a> StyleWriter<'a> {
    fn new(out: &'a mut Vec<u8>) -> Self {
        Self {
            out,
            fg: None,
            bg: None,
            attrs: None,
        }
    }

    fn cell(&mut self, cell: Cell) -> Result<()> {
        self.style(cell.style)?;
        self.out.queue(Print(cell.ch))?;
        Ok(())
    }

    fn style(&mut self, style: CellStyle) -> Result<()> {
        let attrs = (style.bold, style.dim);
        if self.attrs != Some(attrs) {
            // Attribute reset also drops colors on most terminals.
            self.out.queue(SetAttribute(Attribute::Reset))?;
            if style.bold {
                self.out.queue(SetAttribute(Attribute::Bold))?;
            }
            if style.dim {
                self.out.queue(SetAttribute(Attribute::Dim))?;
            }
            self.attrs = Some(attrs);
            self.fg = None;
            self.bg = None;
        }
        if self.fg != Some(style.fg) {
            self.out.queue(SetForegroundColor(rgb_to_color(style.fg)))?;
            self.fg = Some(style.fg);
        }
        if self.bg != Some(style.bg) {
            self.out.queue(SetBackgroundColor(rgb_to_color(style.bg)))?;
            self.bg = Some(style.bg);
        }
        Ok(())
    }

    fn finish(self) -> Result<()> {
        self.out.queue(ResetColor)?;
        self.out.queue(SetAttribute(Attribute::Reset))?;
        Ok(())
    }
}

/// Encode a full-frame redraw into `out` without touching stdout.
pub fn encode_full_into(fb: &FrameBuffer, out: &mut Vec<u8>) -> Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;
    let mut writer = StyleWriter::new(out);
    for y in 0..fb.height() {
        writer.out.queue(cursor::MoveTo(0, y))?;
        for &cell in fb.row(y) {
            writer.cell(cell)?;
        }
    }
    writer.finish()
}

/// Encode only the changed runs between two same-sized frames into `out`.
pub fn encode_diff_into(prev: &FrameBuffer, next: &FrameBuffer, out: &mut Vec<u8>) -> Result<()> {
    let mut writer = StyleWriter::new(out);
    for y in 0..next.height() {
        let row = next.row(y);
        for (start, end) in changed_runs(prev.row(y), row) {
            writer.out.queue(cursor::MoveTo(start as u16, y))?;
            for &cell in &row[start..end] {
                writer.cell(cell)?;
            }
        }
    }
    writer.finish()
}

fn rgb_to_color(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb.r,
        g: rgb.g,
        b: rgb.b,
    }
}

/// Half-open column ranges where `next` differs from `prev`
///
/// Runs separated by at most `RUN_GAP` unchanged cells are merged. A
/// shorter `prev` row counts as changed past its end.
fn changed_runs(prev: &[Cell], next: &[Cell]) -> Vec<(usize, usize)> {
    let mut runs: Vec<(usize, usize)> = Vec::new();
    let mut x = 0;
    while x < next.len() {
        if prev.get(x) == Some(&next[x]) {
            x += 1;
            continue;
        }
        let start = x;
        while x < next.len() && prev.get(x) != Some(&next[x]) {
            x += 1;
        }
        match runs.last_mut() {
            Some(last) if start - last.1 <= RUN_GAP => last.1 = x,
            _ => runs.push((start, x)),
        }
    }
    runs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::GemColor;

    fn count(haystack: &[u8], needle: &[u8]) -> usize {
        haystack.windows(needle.len()).filter(|w| *w == needle).count()
    }

    #[test]
    fn full_encode_contains_every_glyph() {
        let mut fb = FrameBuffer::new(3, 2);
        let gem = CellStyle::new(Rgb::gem(GemColor::Red), Rgb::new(0, 0, 0));
        fb.put_str(0, 0, "ab", gem);
        fb.put_str(0, 1, "cd", CellStyle::default());

        let mut out = Vec::new();
        encode_full_into(&fb, &mut out).unwrap();
        let text = String::from_utf8_lossy(&out);
        for ch in ["a", "b", "c", "d"] {
            assert!(text.contains(ch));
        }
        assert_eq!(rgb_to_color(gem.fg), Color::Rgb { r: 230, g: 70, b: 70 });
    }

    #[test]
    fn identical_frames_encode_no_glyphs() {
        let mut a = FrameBuffer::new(4, 2);
        a.put_str(0, 0, "zz", CellStyle::default());
        let b = a.clone();
        let mut out = Vec::new();
        encode_diff_into(&a, &b, &mut out).unwrap();
        assert!(!String::from_utf8_lossy(&out).contains('z'));
    }

    #[test]
    fn same_style_is_set_once_per_frame() {
        let mut fb = FrameBuffer::new(6, 2);
        let style = CellStyle::new(Rgb::gem(GemColor::Blue), Rgb::new(1, 2, 3)).bold();
        fb.fill_rect(0, 0, 6, 2, '●', style);

        let mut out = Vec::new();
        encode_full_into(&fb, &mut out).unwrap();
        let mut bg = Vec::new();
        bg.queue(SetBackgroundColor(rgb_to_color(style.bg))).unwrap();
        assert_eq!(count(&out, &bg), 1);
    }

    #[test]
    fn nearby_changes_share_one_run() {
        let a = FrameBuffer::new(12, 1);
        let mut b = a.clone();
        let style = CellStyle::default();
        b.put_char(1, 0, 'x', style);
        b.put_char(3, 0, 'x', style);
        b.put_char(10, 0, 'x', style);
        assert_eq!(changed_runs(a.row(0), b.row(0)), vec![(1, 4), (10, 11)]);
    }

    #[test]
    fn shorter_previous_row_is_redrawn_past_its_end() {
        let a = FrameBuffer::new(2, 1);
        let b = FrameBuffer::new(5, 1);
        assert_eq!(changed_runs(a.row(0), b.row(0)), vec![(2, 5)]);
    }
}
