use serde::{Deserialize, Serialize};
use std::fmt;

/// A half-open range `[start, end)` of UTF-8 byte offsets within one source file.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
pub struct Span {
  pub start: usize,
  pub end: usize,
}

impl Span {
  pub const fn new(start: usize, end: usize) -> Self {
    Self { start, end }
  }

  pub fn len(&self) -> usize {
    self.end.saturating_sub(self.start)
  }

  pub fn is_empty(&self) -> bool {
    self.start >= self.end
  }

  /// Whether `other` lies entirely within this span.
  pub fn covers(&self, other: Span) -> bool {
    self.start <= other.start && other.end <= self.end
  }

  /// Whether the two spans share at least one byte, or one is empty and sits strictly inside the other.
  pub fn overlaps(&self, other: Span) -> bool {
    self.start < other.end && other.start < self.end
  }

  /// Slices `source`, returning `None` if the span is out of bounds or splits a character.
  pub fn slice<'a>(&self, source: &'a str) -> Option<&'a str> {
    if self.start > self.end {
      return None;
    }
    source.get(self.start..self.end)
  }
}

impl fmt::Display for Span {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "[{}:{}]", self.start, self.end)
  }
}

/// Maps byte offsets to 1-based line and column numbers.
pub struct LineIndex {
  line_starts: Vec<usize>,
}

impl LineIndex {
  pub fn new(source: &str) -> Self {
    let mut line_starts = vec![0];
    line_starts.extend(memchr::memchr_iter(b'\n', source.as_bytes()).map(|i| i + 1));
    Self { line_starts }
  }

  /// Columns count bytes, matching the offsets stored in [`Span`].
  pub fn line_col(&self, offset: usize) -> (usize, usize) {
    let line = match self.line_starts.binary_search(&offset) {
      Ok(line) => line,
      Err(next) => next - 1,
    };
    (line + 1, offset - self.line_starts[line] + 1)
  }
}
