//! Anchor ids for declaring identifiers.
//!
//! Ids are chosen so other pages can address them:
//! 1. a name the enclosing module exports the symbol under, e.g. `c` for `export { b as c }`;
//! 2. `symbol-<name>-<offset>` for anything declared below the top level, where names repeat;
//! 3. `<function id>-<name>` for parameters of top-level functions;
//! 4. `symbol-<name>` otherwise.
//!
//! Steps 2 to 4 can produce the same id for different nodes (e.g. two top-level `var x`). Such
//! duplicates are emitted as-is.

use crate::context::FileContext;
use crate::syntax::NodeId;
use crate::syntax::Role;
use crate::syntax::SyntaxKind;
use ahash::HashMap;
use std::ops::Deref;
use std::ops::DerefMut;

/// Memoizes ids for the duration of one pass. Entries are only meaningful for the file they were
/// computed from; [`ScopedIds`] clears them when the pass ends.
#[derive(Default, Debug)]
pub struct IdAllocator {
  cache: HashMap<NodeId, String>,
}

impl IdAllocator {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn len(&self) -> usize {
    self.cache.len()
  }

  pub fn is_empty(&self) -> bool {
    self.cache.is_empty()
  }

  pub fn clear(&mut self) {
    self.cache.clear();
  }

  pub fn id_for(&mut self, cx: &FileContext<'_>, node: NodeId) -> String {
    if let Some(id) = self.cache.get(&node) {
      return id.clone();
    }
    let id = self.compute(cx, node);
    self.cache.insert(node, id.clone());
    id
  }

  fn compute(&mut self, cx: &FileContext<'_>, node: NodeId) -> String {
    if let Some(name) = exported_name(cx, node) {
      return name.to_string();
    }
    let text = cx.text(node);
    let statement = cx.statement_of(node);
    if !cx.is_top_level_statement(statement) {
      return positional_id(cx, node);
    }
    if let Some(parameter) = cx.enclosing_parameter(node) {
      let function_name = cx
        .tree
        .parent(parameter)
        .filter(|&f| cx.tree.kind(f) == SyntaxKind::Function)
        .and_then(|f| cx.tree.child_with_role(f, Role::Name));
      return match function_name {
        Some(function_name) => format!("{}-{}", self.id_for(cx, function_name), text),
        // Anonymous functions have nothing stable to hang parameters off.
        None => positional_id(cx, node),
      };
    }
    format!("symbol-{}", text)
  }
}

/// Clears the allocator when dropped, so a pass can't leave ids behind on any exit path.
pub struct ScopedIds<'a>(&'a mut IdAllocator);

impl<'a> ScopedIds<'a> {
  pub fn new(ids: &'a mut IdAllocator) -> Self {
    ScopedIds(ids)
  }
}

impl Deref for ScopedIds<'_> {
  type Target = IdAllocator;

  fn deref(&self) -> &IdAllocator {
    self.0
  }
}

impl DerefMut for ScopedIds<'_> {
  fn deref_mut(&mut self) -> &mut IdAllocator {
    self.0
  }
}

impl Drop for ScopedIds<'_> {
  fn drop(&mut self) {
    self.0.clear();
  }
}

/// Identifier text in the form symbol tables key it by: names starting with `__` gain a leading
/// underscore so they can't collide with internal names.
pub fn escaped_name(text: &str) -> String {
  if text.starts_with("__") {
    format!("_{}", text)
  } else {
    text.to_string()
  }
}

fn positional_id(cx: &FileContext<'_>, node: NodeId) -> String {
  format!(
    "symbol-{}-{}",
    escaped_name(cx.text(node)),
    cx.tree.span(node).start
  )
}

fn exported_name<'a>(cx: &FileContext<'a>, node: NodeId) -> Option<&'a str> {
  let symbol = cx.oracle.symbol_at(node)?;
  let module = cx.enclosing_module(node);
  cx.oracle
    .exports(module)
    .iter()
    .find(|export| {
      let declaration = export.declaration;
      let own = (cx.tree.kind(declaration) == SyntaxKind::Identifier).then_some(declaration);
      let local = cx.tree.child_with_role(declaration, Role::Name);
      let renamed_from = cx.tree.child_with_role(declaration, Role::PropertyName);
      [own, local, renamed_from]
        .into_iter()
        .flatten()
        .any(|n| cx.oracle.symbol_at(n) == Some(symbol))
    })
    .map(|export| export.name.as_str())
}
