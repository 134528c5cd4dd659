//! Editor-facing line/column positions.
//!
//! [`LineCol`](super::LineCol) is the compact form used while indexing;
//! [`Position`] and [`Span`] are what IDE results hand back to callers.

use super::span::LineCol;

/// A zero-based position in a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl From<LineCol> for Position {
    fn from(line_col: LineCol) -> Self {
        Self::new(line_col.line as usize, line_col.col as usize)
    }
}

/// A range between two positions; both ends are inclusive for `contains`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    pub fn from_coords(start_line: usize, start_col: usize, end_line: usize, end_col: usize) -> Self {
        Self::new(
            Position::new(start_line, start_col),
            Position::new(end_line, end_col),
        )
    }

    pub fn contains(&self, position: Position) -> bool {
        // Position orders by line, then column
        self.start <= position && position <= self.end
    }

    pub fn is_single_line(&self) -> bool {
        self.start.line == self.end.line
    }
}
