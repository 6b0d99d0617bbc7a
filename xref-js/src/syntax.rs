//! The read-only syntax tree consumed by the annotator.
//!
//! Parsing happens elsewhere; a host lowers its AST into flat pre-order [`NodeRecord`]s (or drives a
//! [`TreeBuilder`]) and gets back a [`SyntaxTree`] with parent and child links. Only the node
//! categories that affect cross-referencing are distinguished; everything else is
//! [`SyntaxKind::Other`].

use crate::error::TreeError;
use crate::loc::Span;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u32);

impl NodeId {
  pub fn index(self) -> usize {
    self.0 as usize
  }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum SyntaxKind {
  SourceFile,
  Block,
  // Body of `namespace N { ... }` or `declare module "m" { ... }`.
  ModuleBlock,
  CaseClause,
  DefaultClause,
  Identifier,
  StringLiteral,
  // `import d, { a as b } from "m"`
  ImportDeclaration,
  // `d, { a as b }`; its Name child is the default binding.
  ImportClause,
  // `* as ns`
  NamespaceImport,
  NamedImports,
  ImportSpecifier,
  // `export { a as b } from "m"`, `export * as ns from "m"`
  ExportDeclaration,
  NamespaceExport,
  NamedExports,
  ExportSpecifier,
  // `import x = require("m")`
  ImportEqualsDeclaration,
  ExternalModuleReference,
  Parameter,
  // Any function-like node: declarations, expressions, arrows, methods, accessors, constructors.
  Function,
  Other,
}

impl SyntaxKind {
  /// Nodes whose direct children are statements.
  pub fn is_statement_container(self) -> bool {
    matches!(
      self,
      SyntaxKind::SourceFile
        | SyntaxKind::Block
        | SyntaxKind::ModuleBlock
        | SyntaxKind::CaseClause
        | SyntaxKind::DefaultClause
    )
  }

  pub fn is_namespace_binding(self) -> bool {
    matches!(self, SyntaxKind::NamespaceImport | SyntaxKind::NamespaceExport)
  }
}

/// The field of its parent that a node occupies, where that matters for classification.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
pub enum Role {
  #[default]
  None,
  // The binding or declared name: `b` in `{ a as b }`, `f` in `function f() {}`.
  Name,
  // The renamed-from name: `a` in `{ a as b }`.
  PropertyName,
  // The string literal after `from`, or inside `require(...)`.
  ModuleSpecifier,
}

/// One node in pre-order, referring to an earlier record as its parent.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeRecord {
  pub kind: SyntaxKind,
  #[serde(default)]
  pub role: Role,
  #[serde(flatten)]
  pub span: Span,
  #[serde(default)]
  pub parent: Option<NodeId>,
}

#[derive(Clone, Debug)]
struct NodeData {
  kind: SyntaxKind,
  role: Role,
  span: Span,
  parent: Option<NodeId>,
  children: Vec<NodeId>,
}

#[derive(Clone, Debug)]
pub struct SyntaxTree {
  nodes: Vec<NodeData>,
}

impl SyntaxTree {
  /// Builds a tree from pre-order records. The first record must be the [`SyntaxKind::SourceFile`]
  /// root; every other record names an earlier record as its parent, and lies within its span.
  pub fn from_records(records: Vec<NodeRecord>) -> Result<SyntaxTree, TreeError> {
    let Some(first) = records.first() else {
      return Err(TreeError::Empty);
    };
    if first.kind != SyntaxKind::SourceFile || first.parent.is_some() {
      return Err(TreeError::MissingRoot);
    }
    let mut nodes: Vec<NodeData> = Vec::with_capacity(records.len());
    for (i, record) in records.into_iter().enumerate() {
      let id = NodeId(i as u32);
      if record.span.start > record.span.end {
        return Err(TreeError::InvertedSpan {
          node: id,
          span: record.span,
        });
      }
      if i > 0 {
        let parent = record.parent.ok_or(TreeError::OrphanNode { node: id })?;
        let Some(parent_data) = nodes.get_mut(parent.index()) else {
          return Err(TreeError::ForwardParent { node: id, parent });
        };
        if !parent_data.span.covers(record.span) {
          return Err(TreeError::SpanOutsideParent {
            node: id,
            span: record.span,
            parent_span: parent_data.span,
          });
        }
        parent_data.children.push(id);
      }
      nodes.push(NodeData {
        kind: record.kind,
        role: record.role,
        span: record.span,
        parent: record.parent,
        children: Vec::new(),
      });
    }
    Ok(SyntaxTree { nodes })
  }

  /// Checks every span against the text the tree was parsed from.
  pub fn check_source(&self, source: &str) -> Result<(), TreeError> {
    for (i, node) in self.nodes.iter().enumerate() {
      if node.span.slice(source).is_none() {
        return Err(TreeError::SpanOutOfSource {
          node: NodeId(i as u32),
          span: node.span,
          source_len: source.len(),
        });
      }
    }
    Ok(())
  }

  pub fn root(&self) -> NodeId {
    NodeId(0)
  }

  pub fn len(&self) -> usize {
    self.nodes.len()
  }

  pub fn is_empty(&self) -> bool {
    self.nodes.is_empty()
  }

  /// Whether `node` names a node of this tree. Other accessors panic on ids that don't.
  pub fn contains(&self, node: NodeId) -> bool {
    node.index() < self.nodes.len()
  }

  pub fn kind(&self, node: NodeId) -> SyntaxKind {
    self.nodes[node.index()].kind
  }

  pub fn role(&self, node: NodeId) -> Role {
    self.nodes[node.index()].role
  }

  pub fn span(&self, node: NodeId) -> Span {
    self.nodes[node.index()].span
  }

  pub fn parent(&self, node: NodeId) -> Option<NodeId> {
    self.nodes[node.index()].parent
  }

  pub fn children(&self, node: NodeId) -> &[NodeId] {
    &self.nodes[node.index()].children
  }

  pub fn child_with_role(&self, node: NodeId, role: Role) -> Option<NodeId> {
    self
      .children(node)
      .iter()
      .copied()
      .find(|&c| self.role(c) == role)
  }

  /// Strict ancestors, nearest first.
  pub fn ancestors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
    std::iter::successors(self.parent(node), move |&n| self.parent(n))
  }

  /// Every node exactly once, parents before children, siblings in source order.
  pub fn preorder(&self) -> Preorder<'_> {
    Preorder {
      tree: self,
      stack: if self.nodes.is_empty() {
        Vec::new()
      } else {
        vec![self.root()]
      },
    }
  }
}

pub struct Preorder<'a> {
  tree: &'a SyntaxTree,
  stack: Vec<NodeId>,
}

impl<'a> Iterator for Preorder<'a> {
  type Item = NodeId;

  fn next(&mut self) -> Option<NodeId> {
    let node = self.stack.pop()?;
    self
      .stack
      .extend(self.tree.children(node).iter().rev().copied());
    Some(node)
  }
}

/// Incrementally produces the records of a [`SyntaxTree`] by opening and closing nodes.
pub struct TreeBuilder {
  records: Vec<NodeRecord>,
  open: Vec<NodeId>,
}

impl TreeBuilder {
  /// Starts a tree whose [`SyntaxKind::SourceFile`] root covers `span`.
  pub fn new(span: Span) -> Self {
    TreeBuilder {
      records: vec![NodeRecord {
        kind: SyntaxKind::SourceFile,
        role: Role::None,
        span,
        parent: None,
      }],
      open: vec![NodeId(0)],
    }
  }

  /// Adds a node under the innermost open node and opens it.
  pub fn start(&mut self, kind: SyntaxKind, role: Role, span: Span) -> NodeId {
    let id = self.leaf(kind, role, span);
    self.open.push(id);
    id
  }

  /// Closes the innermost open node.
  pub fn finish(&mut self) {
    self.open.pop();
  }

  /// Adds a node under the innermost open node without opening it.
  pub fn leaf(&mut self, kind: SyntaxKind, role: Role, span: Span) -> NodeId {
    let id = NodeId(self.records.len() as u32);
    self.records.push(NodeRecord {
      kind,
      role,
      span,
      parent: self.open.last().copied(),
    });
    id
  }

  pub fn build(self) -> Result<SyntaxTree, TreeError> {
    SyntaxTree::from_records(self.records)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn record(kind: SyntaxKind, start: usize, end: usize, parent: Option<u32>) -> NodeRecord {
    NodeRecord {
      kind,
      role: Role::None,
      span: Span::new(start, end),
      parent: parent.map(NodeId),
    }
  }

  #[test]
  fn preorder_visits_parents_before_children_in_source_order() {
    let mut b = TreeBuilder::new(Span::new(0, 20));
    let block = b.start(SyntaxKind::Block, Role::None, Span::new(0, 10));
    let a = b.leaf(SyntaxKind::Identifier, Role::None, Span::new(1, 2));
    let c = b.leaf(SyntaxKind::Identifier, Role::None, Span::new(3, 4));
    b.finish();
    let d = b.leaf(SyntaxKind::Identifier, Role::None, Span::new(12, 13));
    let tree = b.build().unwrap();

    let order: Vec<_> = tree.preorder().collect();
    assert_eq!(order, vec![tree.root(), block, a, c, d]);
    assert_eq!(tree.children(block), &[a, c]);
    assert_eq!(tree.ancestors(c).collect::<Vec<_>>(), vec![block, tree.root()]);
  }

  #[test]
  fn rejects_malformed_records() {
    assert_eq!(SyntaxTree::from_records(vec![]).unwrap_err(), TreeError::Empty);
    assert_eq!(
      SyntaxTree::from_records(vec![record(SyntaxKind::Block, 0, 1, None)]).unwrap_err(),
      TreeError::MissingRoot
    );
    assert_eq!(
      SyntaxTree::from_records(vec![
        record(SyntaxKind::SourceFile, 0, 5, None),
        record(SyntaxKind::Identifier, 0, 1, Some(3)),
      ])
      .unwrap_err(),
      TreeError::ForwardParent {
        node: NodeId(1),
        parent: NodeId(3)
      }
    );
    assert!(matches!(
      SyntaxTree::from_records(vec![
        record(SyntaxKind::SourceFile, 0, 5, None),
        record(SyntaxKind::Identifier, 4, 9, Some(0)),
      ]),
      Err(TreeError::SpanOutsideParent { .. })
    ));
    assert_eq!(
      SyntaxTree::from_records(vec![
        record(SyntaxKind::SourceFile, 0, 5, None),
        record(SyntaxKind::Identifier, 0, 1, None),
      ])
      .unwrap_err(),
      TreeError::OrphanNode { node: NodeId(1) }
    );
  }

  #[test]
  fn records_deserialize_with_flattened_span() {
    let records: Vec<NodeRecord> = serde_json::from_str(
      r#"[
        {"kind": "SourceFile", "start": 0, "end": 3},
        {"kind": "Identifier", "role": "Name", "start": 0, "end": 1, "parent": 0}
      ]"#,
    )
    .unwrap();
    let tree = SyntaxTree::from_records(records).unwrap();
    assert_eq!(tree.role(NodeId(1)), Role::Name);
    assert_eq!(tree.child_with_role(tree.root(), Role::Name), Some(NodeId(1)));
    assert!(tree.check_source("abc").is_ok());
    assert!(tree.check_source("").is_err());
  }
}
