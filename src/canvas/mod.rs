//! Raster canvas for the drawing language
//!
//! This module provides the core drawing abstractions:
//! - [`ColorName`]: the fixed nine-color palette
//! - [`Canvas`]: a square grid of palette colors with an undo journal
//! - [`brush`]: the drawing cursor (position, color, size)
//! - [`drawing`]: rasterisation of lines, circles, rectangles and flood fill
//!
//! # Coordinates
//!
//! `x` is the column and `y` the row, both starting at 0 in the top-left corner.
//! Writes outside the canvas are silently dropped.
//!
//! # Undo Journal
//!
//! While a journal is open, every write records the cell's previous color the first
//! time the cell is touched. [`Canvas::rollback`] restores those cells, which lets the
//! interpreter undo a partially executed instruction.

pub mod brush;
pub mod drawing;

use std::fmt;
use std::str::FromStr;

/// Palette colors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorName {
    Red,
    Blue,
    Green,
    Yellow,
    Orange,
    Purple,
    Black,
    White,
    Transparent,
}

impl ColorName {
    pub const ALL: [ColorName; 9] = [
        ColorName::Red,
        ColorName::Blue,
        ColorName::Green,
        ColorName::Yellow,
        ColorName::Orange,
        ColorName::Purple,
        ColorName::Black,
        ColorName::White,
        ColorName::Transparent,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ColorName::Red => "Red",
            ColorName::Blue => "Blue",
            ColorName::Green => "Green",
            ColorName::Yellow => "Yellow",
            ColorName::Orange => "Orange",
            ColorName::Purple => "Purple",
            ColorName::Black => "Black",
            ColorName::White => "White",
            ColorName::Transparent => "Transparent",
        }
    }

    /// Match a color name ignoring ASCII case (runtime string comparison)
    pub fn parse_ignore_case(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(s))
    }

    /// One-character rendering used by the text canvas dump
    pub fn to_char(self) -> char {
        match self {
            ColorName::Red => 'R',
            ColorName::Blue => 'B',
            ColorName::Green => 'G',
            ColorName::Yellow => 'Y',
            ColorName::Orange => 'O',
            ColorName::Purple => 'P',
            ColorName::Black => 'K',
            ColorName::White => '.',
            ColorName::Transparent => ' ',
        }
    }
}

impl fmt::Display for ColorName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a string is not an exact palette color name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownColor(pub String);

impl fmt::Display for UnknownColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown color '{}'", self.0)
    }
}

impl std::error::Error for UnknownColor {}

impl FromStr for ColorName {
    type Err = UnknownColor;

    /// Exact, case-sensitive match as written in source code
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.name() == s)
            .ok_or_else(|| UnknownColor(s.to_string()))
    }
}

/// Square grid of palette colors
#[derive(Debug, Clone, PartialEq)]
pub struct Canvas {
    size: usize,
    cells: Vec<ColorName>,
    journal: Option<Vec<(usize, ColorName)>>,
}

impl Canvas {
    /// Create a `size`×`size` canvas filled with White
    pub fn new(size: usize) -> Self {
        Canvas {
            size,
            cells: vec![ColorName::White; size * size],
            journal: None,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        self.index(x, y).is_some()
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        let x = usize::try_from(x).ok()?;
        let y = usize::try_from(y).ok()?;
        (x < self.size && y < self.size).then(|| y * self.size + x)
    }

    /// Color at `(x, y)`, or `None` outside the canvas
    pub fn get(&self, x: i32, y: i32) -> Option<ColorName> {
        self.index(x, y).map(|i| self.cells[i])
    }

    /// Paint one cell. Returns false if the cell is outside the canvas.
    pub fn set(&mut self, x: i32, y: i32, color: ColorName) -> bool {
        let Some(i) = self.index(x, y) else {
            return false;
        };
        let previous = self.cells[i];
        if previous == color {
            return true;
        }
        if let Some(journal) = self.journal.as_mut() {
            journal.push((i, previous));
        }
        self.cells[i] = color;
        true
    }

    /// Start recording writes for a possible rollback
    pub fn begin_journal(&mut self) {
        self.journal = Some(Vec::new());
    }

    /// Keep all writes since [`Canvas::begin_journal`] and stop recording
    pub fn commit(&mut self) {
        self.journal = None;
    }

    /// Undo all writes since [`Canvas::begin_journal`] and stop recording.
    /// Returns the number of cells restored.
    pub fn rollback(&mut self) -> usize {
        let Some(journal) = self.journal.take() else {
            return 0;
        };
        let restored = journal.len();
        // Reverse order so the oldest recorded value wins
        for (i, color) in journal.into_iter().rev() {
            self.cells[i] = color;
        }
        restored
    }

    /// Count cells of `color` in the rectangle spanned by the two corners, inclusive,
    /// clipped to the canvas. Returns 0 if the rectangle misses the canvas entirely.
    pub fn count_color(&self, color: ColorName, x1: i32, y1: i32, x2: i32, y2: i32) -> usize {
        let last = i32::try_from(self.size).unwrap_or(i32::MAX) - 1;
        let (min_x, max_x) = (x1.min(x2).max(0), x1.max(x2).min(last));
        let (min_y, max_y) = (y1.min(y2).max(0), y1.max(y2).min(last));
        if min_x > max_x || min_y > max_y {
            return 0;
        }

        (min_y..=max_y)
            .flat_map(|y| (min_x..=max_x).map(move |x| (x, y)))
            .filter(|&(x, y)| self.get(x, y) == Some(color))
            .count()
    }

    /// Iterate over rows, top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[ColorName]> {
        // `max(1)` keeps `chunks` valid for an empty canvas
        self.cells.chunks(self.size.max(1))
    }

    /// Render one character per cell, one line per row
    pub fn to_text(&self) -> String {
        let mut out = String::with_capacity(self.cells.len() + self.size);
        for row in self.rows() {
            out.extend(row.iter().map(|c| c.to_char()));
            out.push('\n');
        }
        out
    }

    /// Approximate heap footprint in bytes
    pub fn estimated_size(&self) -> usize {
        std::mem::size_of::<Self>() + self.cells.len() * std::mem::size_of::<ColorName>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_canvas_is_white() {
        let canvas = Canvas::new(4);
        assert_eq!(canvas.size(), 4);
        assert_eq!(canvas.count_color(ColorName::White, 0, 0, 3, 3), 16);
    }

    #[test]
    fn test_color_parsing() {
        assert_eq!("Red".parse::<ColorName>(), Ok(ColorName::Red));
        assert!("red".parse::<ColorName>().is_err());
        assert!("Pink".parse::<ColorName>().is_err());
        assert_eq!(ColorName::parse_ignore_case("rEd"), Some(ColorName::Red));
    }

    #[test]
    fn test_set_outside_is_ignored() {
        let mut canvas = Canvas::new(3);
        assert!(!canvas.set(-1, 0, ColorName::Red));
        assert!(!canvas.set(0, 3, ColorName::Red));
        assert!(canvas.set(2, 2, ColorName::Red));
        assert_eq!(canvas.get(2, 2), Some(ColorName::Red));
        assert_eq!(canvas.get(3, 0), None);
    }

    #[test]
    fn test_rollback_restores_touched_cells() {
        let mut canvas = Canvas::new(3);
        canvas.set(0, 0, ColorName::Blue);

        canvas.begin_journal();
        canvas.set(0, 0, ColorName::Red);
        canvas.set(0, 0, ColorName::Green);
        canvas.set(1, 1, ColorName::Red);
        assert_eq!(canvas.rollback(), 3);

        assert_eq!(canvas.get(0, 0), Some(ColorName::Blue));
        assert_eq!(canvas.get(1, 1), Some(ColorName::White));
    }

    #[test]
    fn test_commit_keeps_writes() {
        let mut canvas = Canvas::new(2);
        canvas.begin_journal();
        canvas.set(1, 0, ColorName::Black);
        canvas.commit();

        assert_eq!(canvas.rollback(), 0);
        assert_eq!(canvas.get(1, 0), Some(ColorName::Black));
    }

    #[test]
    fn test_count_color_inclusive_and_normalised() {
        let mut canvas = Canvas::new(5);
        canvas.set(1, 1, ColorName::Red);
        canvas.set(3, 3, ColorName::Red);

        assert_eq!(canvas.count_color(ColorName::Red, 1, 1, 3, 3), 2);
        assert_eq!(canvas.count_color(ColorName::Red, 3, 3, 1, 1), 2);
        assert_eq!(canvas.count_color(ColorName::Red, 0, 0, 2, 2), 1);
        assert_eq!(canvas.count_color(ColorName::Red, 0, 0, 5, 5), 2);
    }

    #[test]
    fn test_count_color_clips_to_canvas() {
        let mut canvas = Canvas::new(5);
        canvas.set(0, 0, ColorName::Red);
        canvas.set(4, 4, ColorName::Red);

        assert_eq!(canvas.count_color(ColorName::Red, -3, -3, 9, 9), 2);
        assert_eq!(canvas.count_color(ColorName::Red, 4, 4, i32::MAX, i32::MAX), 1);
        assert_eq!(canvas.count_color(ColorName::Red, i32::MIN, 0, 0, 0), 1);
        // Entirely outside
        assert_eq!(canvas.count_color(ColorName::Red, 5, 0, 9, 4), 0);
        assert_eq!(canvas.count_color(ColorName::Red, -4, -4, -1, -1), 0);
    }

    #[test]
    fn test_to_text() {
        let mut canvas = Canvas::new(2);
        canvas.set(1, 0, ColorName::Red);
        canvas.set(0, 1, ColorName::Black);
        assert_eq!(canvas.to_text(), ".R\nK.\n");
    }
}
