//! The boundary with symbol resolution.
//!
//! Resolution is done by a type checker or binder outside this crate. The annotator only asks the
//! questions in [`SymbolOracle`]; [`ResolutionTable`] answers them from precomputed data.

use crate::error::AnnotateError;
use crate::syntax::NodeId;
use crate::syntax::SyntaxKind;
use crate::syntax::SyntaxTree;
use ahash::HashMap;
use ahash::HashMapExt;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SymbolId(pub u32);

/// Where one declaration of a symbol lives.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum Declaration {
  /// A declaration node in the file being annotated.
  Local(NodeId),
  /// Another user source of the same program.
  Foreign,
  /// A built-in or standard library source, e.g. `lib.dom.d.ts`.
  Builtin,
}

impl Declaration {
  pub fn is_builtin(self) -> bool {
    matches!(self, Declaration::Builtin)
  }
}

/// A name exported by a module, and the node that declares or re-exports it.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Export {
  pub name: String,
  pub declaration: NodeId,
}

pub trait SymbolOracle {
  /// The symbol an identifier resolves to, if any.
  fn symbol_at(&self, node: NodeId) -> Option<SymbolId>;

  /// Declarations of `symbol` in declaration order.
  fn declarations(&self, symbol: SymbolId) -> &[Declaration];

  /// The export list of a module node (a source file root or module block). Empty if the module
  /// exports nothing.
  fn exports(&self, module: NodeId) -> &[Export];
}

#[derive(Deserialize)]
struct RawSymbol {
  declarations: Vec<Declaration>,
}

#[derive(Deserialize)]
struct RawOccurrence {
  node: NodeId,
  symbol: SymbolId,
}

#[derive(Deserialize)]
struct RawModuleExports {
  module: NodeId,
  exports: Vec<Export>,
}

#[derive(Deserialize)]
struct RawTable {
  #[serde(default)]
  symbols: Vec<RawSymbol>,
  #[serde(default)]
  occurrences: Vec<RawOccurrence>,
  #[serde(default)]
  exports: Vec<RawModuleExports>,
}

/// A [`SymbolOracle`] over precomputed resolution results.
///
/// Symbols are numbered in insertion order. The serialized form is
/// `{"symbols": [{"declarations": [...]}], "occurrences": [{"node", "symbol"}], "exports": [{"module", "exports": [{"name", "declaration"}]}]}`.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(from = "RawTable")]
pub struct ResolutionTable {
  symbols: Vec<Vec<Declaration>>,
  occurrences: HashMap<NodeId, SymbolId>,
  exports: HashMap<NodeId, Vec<Export>>,
}

impl ResolutionTable {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn add_symbol(&mut self, declarations: Vec<Declaration>) -> SymbolId {
    let id = SymbolId(self.symbols.len() as u32);
    self.symbols.push(declarations);
    id
  }

  /// Records that the identifier `node` resolves to `symbol`.
  pub fn bind(&mut self, node: NodeId, symbol: SymbolId) {
    self.occurrences.insert(node, symbol);
  }

  /// Adds a symbol declared solely by `node` and binds `node` to it.
  pub fn declare(&mut self, node: NodeId) -> SymbolId {
    let symbol = self.add_symbol(vec![Declaration::Local(node)]);
    self.bind(node, symbol);
    symbol
  }

  pub fn add_export(&mut self, module: NodeId, name: impl Into<String>, declaration: NodeId) {
    self.exports.entry(module).or_default().push(Export {
      name: name.into(),
      declaration,
    });
  }
}

impl From<RawTable> for ResolutionTable {
  fn from(raw: RawTable) -> Self {
    let mut occurrences = HashMap::with_capacity(raw.occurrences.len());
    for o in raw.occurrences {
      occurrences.insert(o.node, o.symbol);
    }
    let mut exports: HashMap<NodeId, Vec<Export>> = HashMap::new();
    for m in raw.exports {
      exports.entry(m.module).or_default().extend(m.exports);
    }
    ResolutionTable {
      symbols: raw.symbols.into_iter().map(|s| s.declarations).collect(),
      occurrences,
      exports,
    }
  }
}

impl SymbolOracle for ResolutionTable {
  fn symbol_at(&self, node: NodeId) -> Option<SymbolId> {
    self.occurrences.get(&node).copied()
  }

  fn declarations(&self, symbol: SymbolId) -> &[Declaration] {
    self
      .symbols
      .get(symbol.0 as usize)
      .map(|d| d.as_slice())
      .unwrap_or(&[])
  }

  fn exports(&self, module: NodeId) -> &[Export] {
    self
      .exports
      .get(&module)
      .map(|e| e.as_slice())
      .unwrap_or(&[])
  }
}

/// Checks that every node the oracle can hand out while annotating `tree` exists in it: the local
/// declarations of symbols bound to the tree's nodes, and the exports of its modules.
pub fn check_oracle(tree: &SyntaxTree, oracle: &dyn SymbolOracle) -> Result<(), AnnotateError> {
  let known = |node: NodeId| {
    if tree.contains(node) {
      Ok(())
    } else {
      Err(AnnotateError::UnknownNode { node })
    }
  };
  for node in tree.preorder() {
    if let Some(symbol) = oracle.symbol_at(node) {
      for declaration in oracle.declarations(symbol) {
        if let Declaration::Local(declaration) = *declaration {
          known(declaration)?;
        }
      }
    }
    if matches!(tree.kind(node), SyntaxKind::SourceFile | SyntaxKind::ModuleBlock) {
      for export in oracle.exports(node) {
        known(export.declaration)?;
      }
    }
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn deserializes_table_and_answers_queries() {
    let table: ResolutionTable = serde_json::from_str(
      r#"{
        "symbols": [
          {"declarations": [{"Local": 2}]},
          {"declarations": ["Builtin", "Foreign"]}
        ],
        "occurrences": [{"node": 2, "symbol": 0}, {"node": 5, "symbol": 1}],
        "exports": [{"module": 0, "exports": [{"name": "main", "declaration": 1}]}]
      }"#,
    )
    .unwrap();

    assert_eq!(table.symbol_at(NodeId(2)), Some(SymbolId(0)));
    assert_eq!(table.symbol_at(NodeId(3)), None);
    assert_eq!(
      table.declarations(SymbolId(1)),
      &[Declaration::Builtin, Declaration::Foreign]
    );
    assert!(table.declarations(SymbolId(9)).is_empty());
    assert_eq!(table.exports(NodeId(0))[0].name, "main");
    assert!(table.exports(NodeId(1)).is_empty());
  }

  #[test]
  fn declare_binds_the_declaring_node() {
    let mut table = ResolutionTable::new();
    let a = table.declare(NodeId(4));
    let b = table.declare(NodeId(7));
    assert_ne!(a, b);
    assert_eq!(table.symbol_at(NodeId(7)), Some(b));
    assert_eq!(table.declarations(a), &[Declaration::Local(NodeId(4))]);
  }

  #[test]
  fn check_rejects_nodes_outside_the_tree() {
    use crate::loc::Span;
    use crate::syntax::Role;
    use crate::syntax::TreeBuilder;

    let mut b = TreeBuilder::new(Span::new(0, 5));
    let name = b.leaf(SyntaxKind::Identifier, Role::Name, Span::new(0, 1));
    let tree = b.build().unwrap();

    let mut table = ResolutionTable::new();
    table.declare(name);
    // Unbound symbols are never consulted.
    table.add_symbol(vec![Declaration::Local(NodeId(77))]);
    assert_eq!(check_oracle(&tree, &table), Ok(()));

    let mut bad_declaration = ResolutionTable::new();
    let symbol = bad_declaration.add_symbol(vec![Declaration::Builtin, Declaration::Local(NodeId(99))]);
    bad_declaration.bind(name, symbol);
    assert_eq!(
      check_oracle(&tree, &bad_declaration),
      Err(AnnotateError::UnknownNode { node: NodeId(99) })
    );

    let mut bad_export = ResolutionTable::new();
    bad_export.add_export(tree.root(), "e", NodeId(42));
    assert_eq!(
      check_oracle(&tree, &bad_export),
      Err(AnnotateError::UnknownNode { node: NodeId(42) })
    );
  }
}
