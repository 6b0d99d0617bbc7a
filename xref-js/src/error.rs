use crate::loc::Span;
use crate::syntax::NodeId;
use std::error::Error;
use std::fmt;
use std::fmt::Display;
use std::fmt::Formatter;

/// Malformed syntax tree input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TreeError {
  Empty,
  // The first record is not a parentless SourceFile.
  MissingRoot,
  OrphanNode {
    node: NodeId,
  },
  ForwardParent {
    node: NodeId,
    parent: NodeId,
  },
  InvertedSpan {
    node: NodeId,
    span: Span,
  },
  SpanOutsideParent {
    node: NodeId,
    span: Span,
    parent_span: Span,
  },
  SpanOutOfSource {
    node: NodeId,
    span: Span,
    source_len: usize,
  },
}

impl Display for TreeError {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    match self {
      TreeError::Empty => write!(f, "syntax tree has no nodes"),
      TreeError::MissingRoot => write!(f, "first node must be a SourceFile without a parent"),
      TreeError::OrphanNode { node } => write!(f, "node {} has no parent", node.0),
      TreeError::ForwardParent { node, parent } => write!(
        f,
        "node {} refers to parent {} which does not precede it",
        node.0, parent.0
      ),
      TreeError::InvertedSpan { node, span } => {
        write!(f, "node {} has inverted span {}", node.0, span)
      }
      TreeError::SpanOutsideParent {
        node,
        span,
        parent_span,
      } => write!(
        f,
        "node {} span {} is not within its parent's span {}",
        node.0, span, parent_span
      ),
      TreeError::SpanOutOfSource {
        node,
        span,
        source_len,
      } => write!(
        f,
        "node {} span {} does not fit on character boundaries of the {}-byte source",
        node.0, span, source_len
      ),
    }
  }
}

impl Error for TreeError {}

/// A failed annotation pass. No partial output is produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AnnotateError {
  Tree(TreeError),
  // Two replacements claim the same text. This is a defect in replacement collection, never
  // something the input can legitimately cause.
  OverlappingReplacements { previous: Span, next: Span },
  ReplacementOutOfBounds { span: Span, source_len: usize },
  // Symbol resolution refers to a declaration node the tree doesn't have.
  UnknownNode { node: NodeId },
}

impl Display for AnnotateError {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    match self {
      AnnotateError::Tree(err) => write!(f, "invalid syntax tree: {}", err),
      AnnotateError::OverlappingReplacements { previous, next } => write!(
        f,
        "replacement {} overlaps preceding replacement {}",
        next, previous
      ),
      AnnotateError::ReplacementOutOfBounds { span, source_len } => write!(
        f,
        "replacement {} is outside the {}-byte source",
        span, source_len
      ),
      AnnotateError::UnknownNode { node } => write!(
        f,
        "symbol resolution refers to node {} which is not in the syntax tree",
        node.0
      ),
    }
  }
}

impl Error for AnnotateError {
  fn source(&self) -> Option<&(dyn Error + 'static)> {
    match self {
      AnnotateError::Tree(err) => Some(err),
      _ => None,
    }
  }
}

impl From<TreeError> for AnnotateError {
  fn from(value: TreeError) -> Self {
    AnnotateError::Tree(value)
  }
}
