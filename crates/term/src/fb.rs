//! Framebuffer and style types for terminal rendering.
//!
//! Every write is clipped to the buffer, so views can draw at computed
//! offsets without checking the viewport first.

use crate::types::GemColor;

/// 24-bit color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb { r, g, b }
    }

    /// Display color of a gem or bubble
    pub const fn gem(color: GemColor) -> Self {
        match color {
            GemColor::Red => Rgb::new(230, 70, 70),
            GemColor::Orange => Rgb::new(255, 160, 40),
            GemColor::Yellow => Rgb::new(240, 220, 80),
            GemColor::Green => Rgb::new(90, 210, 110),
            GemColor::Blue => Rgb::new(80, 130, 235),
            GemColor::Purple => Rgb::new(190, 110, 220),
        }
    }
}

/// Colors plus the two attributes the views use
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellStyle {
    pub fg: Rgb,
    pub bg: Rgb,
    pub bold: bool,
    pub dim: bool,
}

impl CellStyle {
    pub const fn new(fg: Rgb, bg: Rgb) -> Self {
        CellStyle { fg, bg, bold: false, dim: false }
    }

    pub const fn bold(self) -> Self {
        CellStyle { bold: true, ..self }
    }

    pub const fn dim(self) -> Self {
        CellStyle { dim: true, ..self }
    }

    pub const fn into_cell(self, ch: char) -> Cell {
        Cell { ch, style: self }
    }
}

impl Default for CellStyle {
    fn default() -> Self {
        CellStyle::new(Rgb::new(220, 220, 220), Rgb::BLACK)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub style: CellStyle,
}

impl Default for Cell {
    fn default() -> Self {
        CellStyle::default().into_cell(' ')
    }
}

/// Row-major grid of styled cells, one per terminal column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    pub fn new(width: u16, height: u16) -> Self {
        FrameBuffer {
            width,
            height,
            cells: vec![Cell::default(); area(width, height)],
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    /// Change dimensions in place. Cell contents are unspecified afterwards;
    /// views clear before drawing.
    pub fn resize(&mut self, width: u16, height: u16) {
        if (self.width, self.height) != (width, height) {
            self.width = width;
            self.height = height;
            self.cells.resize(area(width, height), Cell::default());
        }
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// One row of cells; empty when `y` is out of range
    pub fn row(&self, y: u16) -> &[Cell] {
        match self.row_range(y) {
            Some(range) => &self.cells[range],
            None => &[],
        }
    }

    fn row_mut(&mut self, y: u16) -> &mut [Cell] {
        match self.row_range(y) {
            Some(range) => &mut self.cells[range],
            None => &mut [],
        }
    }

    fn row_range(&self, y: u16) -> Option<std::ops::Range<usize>> {
        (y < self.height).then(|| {
            let start = y as usize * self.width as usize;
            start..start + self.width as usize
        })
    }

    pub fn get(&self, x: u16, y: u16) -> Option<Cell> {
        self.row(y).get(x as usize).copied()
    }

    pub fn set(&mut self, x: u16, y: u16, cell: Cell) {
        if let Some(slot) = self.row_mut(y).get_mut(x as usize) {
            *slot = cell;
        }
    }

    pub fn clear(&mut self, cell: Cell) {
        self.cells.fill(cell);
    }

    pub fn put_char(&mut self, x: u16, y: u16, ch: char, style: CellStyle) {
        self.set(x, y, style.into_cell(ch));
    }

    /// Write `s` from column `x`, clipped at the right edge.
    ///
    /// Returns the column after the last character written.
    pub fn put_str(&mut self, x: u16, y: u16, s: &str, style: CellStyle) -> u16 {
        let row = self.row_mut(y);
        let tail = row.get_mut(x as usize..).unwrap_or_default();
        let mut written = 0u16;
        for (slot, ch) in tail.iter_mut().zip(s.chars()) {
            *slot = style.into_cell(ch);
            written += 1;
        }
        x + written
    }

    /// Decimal `value` without allocating
    pub fn put_u32(&mut self, x: u16, y: u16, value: u32, style: CellStyle) -> u16 {
        let mut buf = [0u8; 10];
        let mut start = buf.len();
        let mut n = value;
        loop {
            start -= 1;
            buf[start] = b'0' + (n % 10) as u8;
            n /= 10;
            if n == 0 {
                break;
            }
        }
        let digits = std::str::from_utf8(&buf[start..]).unwrap_or("0");
        let end = x.saturating_add(digits.len() as u16);
        self.put_str(x, y, digits, style);
        end
    }

    pub fn fill_rect(&mut self, x: u16, y: u16, w: u16, h: u16, ch: char, style: CellStyle) {
        let cell = style.into_cell(ch);
        let x0 = x as usize;
        let x1 = (x0 + w as usize).min(self.width as usize);
        for row_y in y..y.saturating_add(h).min(self.height) {
            if let Some(span) = self.row_mut(row_y).get_mut(x0..x1) {
                span.fill(cell);
            }
        }
    }

    /// Characters of one row (tests and debug dumps)
    pub fn row_text(&self, y: u16) -> String {
        self.row(y).iter().map(|c| c.ch).collect()
    }

    /// Whether any row contains `needle`
    pub fn contains_text(&self, needle: &str) -> bool {
        (0..self.height).any(|y| self.row_text(y).contains(needle))
    }
}

fn area(width: u16, height: u16) -> usize {
    width as usize * height as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_u32_writes_digits() {
        let mut fb = FrameBuffer::new(12, 1);
        let end = fb.put_u32(1, 0, u32::MAX, CellStyle::default());
        assert_eq!(end, 11);
        assert_eq!(fb.row_text(0), " 4294967295 ");

        fb.put_u32(0, 0, 0, CellStyle::default());
        assert_eq!(fb.get(0, 0).unwrap().ch, '0');
    }

    #[test]
    fn put_str_clips_at_the_edge() {
        let mut fb = FrameBuffer::new(4, 1);
        assert_eq!(fb.put_str(2, 0, "abcdef", CellStyle::default()), 4);
        assert_eq!(fb.row_text(0), "  ab");
        assert!(fb.contains_text("ab"));
        assert_eq!(fb.put_str(9, 0, "zz", CellStyle::default()), 9);
        assert_eq!(fb.put_str(0, 3, "zz", CellStyle::default()), 0);
    }

    #[test]
    fn fill_rect_is_clipped() {
        let mut fb = FrameBuffer::new(4, 3);
        fb.fill_rect(2, 1, 10, 10, '#', CellStyle::default());
        assert_eq!(fb.row_text(0), "    ");
        assert_eq!(fb.row_text(1), "  ##");
        assert_eq!(fb.row_text(2), "  ##");
    }

    #[test]
    fn resize_keeps_cells_addressable() {
        let mut fb = FrameBuffer::new(2, 2);
        fb.resize(5, 3);
        fb.put_char(4, 2, 'x', CellStyle::default());
        assert_eq!(fb.get(4, 2).unwrap().ch, 'x');
        assert_eq!(fb.get(5, 2), None);
        assert!(fb.row(3).is_empty());
    }
}
