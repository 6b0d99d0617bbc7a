//! Non-fatal findings of an annotation pass.
//!
//! Codes are stable (prefix `XR`):
//! - `XR0001`: a symbol has more than one local declaration; links go to the first.

use crate::loc::LineIndex;
use crate::loc::Span;
use serde::Serialize;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Write;

pub const AMBIGUOUS_DECLARATION: &str = "XR0001";

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
  Error,
  Warning,
  Note,
}

impl Severity {
  pub const fn as_str(&self) -> &'static str {
    match self {
      Severity::Error => "error",
      Severity::Warning => "warning",
      Severity::Note => "note",
    }
  }
}

impl Display for Severity {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Label {
  pub span: Span,
  pub message: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
  pub code: &'static str,
  pub severity: Severity,
  pub message: String,
  pub primary: Span,
  pub labels: Vec<Label>,
}

impl Diagnostic {
  pub fn note(code: &'static str, message: impl Into<String>, primary: Span) -> Self {
    Self {
      code,
      severity: Severity::Note,
      message: message.into(),
      primary,
      labels: Vec::new(),
    }
  }

  pub fn with_label(mut self, span: Span, message: impl Into<String>) -> Self {
    self.labels.push(Label {
      span,
      message: message.into(),
    });
    self
  }

  /// Renders as
  ///
  /// ```text
  /// note[XR0001]: message
  ///   --> file.ts:3:10
  ///   = file.ts:7:1: label message
  /// ```
  pub fn render(&self, file_name: &str, source: &str) -> String {
    let index = LineIndex::new(source);
    let (line, col) = index.line_col(self.primary.start);
    let mut out = format!(
      "{}[{}]: {}\n  --> {}:{}:{}",
      self.severity, self.code, self.message, file_name, line, col
    );
    for label in &self.labels {
      let (line, col) = index.line_col(label.span.start);
      let _ = write!(out, "\n  = {}:{}:{}: {}", file_name, line, col, label.message);
    }
    out
  }
}
