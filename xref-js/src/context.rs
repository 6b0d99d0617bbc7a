//! Syntactic context of a node: its statement, the module it belongs to, and the import or export
//! clause it may sit in.

use crate::oracle::SymbolOracle;
use crate::syntax::NodeId;
use crate::syntax::Role;
use crate::syntax::SyntaxKind;
use crate::syntax::SyntaxTree;

/// One source file with its tree and resolution, as seen by a single annotation pass.
#[derive(Clone, Copy)]
pub struct FileContext<'a> {
  pub source: &'a str,
  pub tree: &'a SyntaxTree,
  pub oracle: &'a dyn SymbolOracle,
}

impl<'a> FileContext<'a> {
  pub fn new(source: &'a str, tree: &'a SyntaxTree, oracle: &'a dyn SymbolOracle) -> Self {
    FileContext {
      source,
      tree,
      oracle,
    }
  }

  /// Source text of `node`; empty if the tree was never checked against this source.
  pub fn text(&self, node: NodeId) -> &'a str {
    self.tree.span(node).slice(self.source).unwrap_or("")
  }

  /// The nearest ancestor-or-self whose parent is a file root, block, module block, or case
  /// clause. The root is its own statement.
  pub fn statement_of(&self, node: NodeId) -> NodeId {
    let mut current = node;
    while let Some(parent) = self.tree.parent(current) {
      if self.tree.kind(parent).is_statement_container() {
        break;
      }
      current = parent;
    }
    current
  }

  pub fn is_top_level_statement(&self, statement: NodeId) -> bool {
    self.tree.parent(statement) == Some(self.tree.root())
  }

  /// The module specifier literal of an import or export declaration with a `from` clause.
  pub fn module_specifier(&self, statement: NodeId) -> Option<NodeId> {
    match self.tree.kind(statement) {
      SyntaxKind::ImportDeclaration | SyntaxKind::ExportDeclaration => self
        .tree
        .child_with_role(statement, Role::ModuleSpecifier)
        .filter(|&s| self.tree.kind(s) == SyntaxKind::StringLiteral),
      _ => None,
    }
  }

  /// The module specifier literal of any declaration that names another module, including
  /// `import x = require("m")`.
  pub fn specifier_literal(&self, declaration: NodeId) -> Option<NodeId> {
    match self.tree.kind(declaration) {
      SyntaxKind::ImportEqualsDeclaration => self
        .tree
        .children(declaration)
        .iter()
        .copied()
        .find(|&c| self.tree.kind(c) == SyntaxKind::ExternalModuleReference)
        .and_then(|r| self.tree.child_with_role(r, Role::ModuleSpecifier))
        .filter(|&s| self.tree.kind(s) == SyntaxKind::StringLiteral),
      _ => self.module_specifier(declaration),
    }
  }

  /// The file root or module block whose export list covers `node`.
  pub fn enclosing_module(&self, node: NodeId) -> NodeId {
    self
      .tree
      .ancestors(node)
      .find(|&a| matches!(self.tree.kind(a), SyntaxKind::SourceFile | SyntaxKind::ModuleBlock))
      .unwrap_or_else(|| self.tree.root())
  }

  /// The parameter `node` is or sits in, unless a function boundary comes first.
  pub fn enclosing_parameter(&self, node: NodeId) -> Option<NodeId> {
    std::iter::once(node)
      .chain(self.tree.ancestors(node))
      .take_while(|&n| self.tree.kind(n) != SyntaxKind::Function)
      .find(|&n| self.tree.kind(n) == SyntaxKind::Parameter)
  }

  /// The identifier a declaration introduces: the declaration itself if it is an identifier,
  /// otherwise its name child.
  pub fn declaration_name(&self, declaration: NodeId) -> Option<NodeId> {
    if self.tree.kind(declaration) == SyntaxKind::Identifier {
      return Some(declaration);
    }
    self
      .tree
      .child_with_role(declaration, Role::Name)
      .filter(|&n| self.tree.kind(n) == SyntaxKind::Identifier)
  }
}
