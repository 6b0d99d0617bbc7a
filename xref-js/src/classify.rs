use crate::context::FileContext;
use crate::oracle::Declaration;
use crate::oracle::SymbolId;
use crate::remote::remote_href;
use crate::syntax::NodeId;
use crate::syntax::Role;
use crate::syntax::SyntaxKind;

/// What an identifier occurrence turns into.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Classification {
  /// The local binding of `import { x } from "m"`: an anchor around a link to `m#x`.
  ImportedLinkedDefinition { href: String },
  /// A local binding that can't name a single remote export, e.g. `import * as ns from "m"`.
  ImportedDefinition,
  /// The `a` of `{ a as b }` in a clause with a module specifier, when nothing local declares it.
  RemoteReference { href: String },
  LocalDefinition,
  LocalReference { declaration: NodeId },
  Untouched,
}

/// A symbol with more than one non-built-in declaration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ambiguity {
  pub symbol: SymbolId,
  pub chosen: NodeId,
  pub others: Vec<Declaration>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Classified {
  pub classification: Classification,
  pub ambiguity: Option<Ambiguity>,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum ClausePosition {
  // The name an import or export clause binds.
  Binding { linkable: bool },
  // The original name in `{ a as b }`.
  RenamedFrom,
  Elsewhere,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Resolution {
  Unresolved,
  Builtin,
  // Declared in another file, or by a declaration with no name to anchor.
  Unanchorable,
  Declared { name: NodeId },
}

fn clause_position(cx: &FileContext<'_>, node: NodeId) -> ClausePosition {
  let Some(parent) = cx.tree.parent(node) else {
    return ClausePosition::Elsewhere;
  };
  let parent_kind = cx.tree.kind(parent);
  if !matches!(
    parent_kind,
    SyntaxKind::ImportClause
      | SyntaxKind::NamespaceImport
      | SyntaxKind::ImportSpecifier
      | SyntaxKind::NamespaceExport
      | SyntaxKind::ExportSpecifier
  ) {
    return ClausePosition::Elsewhere;
  }
  match cx.tree.role(node) {
    Role::Name => {
      let renamed_from = cx.tree.child_with_role(parent, Role::PropertyName);
      ClausePosition::Binding {
        linkable: !parent_kind.is_namespace_binding() && renamed_from.map_or(true, |r| r == node),
      }
    }
    Role::PropertyName => ClausePosition::RenamedFrom,
    _ => ClausePosition::Elsewhere,
  }
}

/// The declaration links should point to, and the other non-built-in declarations it was chosen
/// over. `None` if every declaration is built in.
pub fn canonical_declaration(declarations: &[Declaration]) -> Option<(Declaration, Vec<Declaration>)> {
  if let [only] = declarations {
    return (!only.is_builtin()).then(|| (*only, Vec::new()));
  }
  let mut candidates = declarations.iter().copied().filter(|d| !d.is_builtin());
  let first = candidates.next()?;
  Some((first, candidates.collect()))
}

fn resolve(cx: &FileContext<'_>, node: NodeId) -> (Resolution, Option<Ambiguity>) {
  let Some(symbol) = cx.oracle.symbol_at(node) else {
    return (Resolution::Unresolved, None);
  };
  let Some((chosen, others)) = canonical_declaration(cx.oracle.declarations(symbol)) else {
    return (Resolution::Builtin, None);
  };
  let Declaration::Local(declaration) = chosen else {
    return (Resolution::Unanchorable, None);
  };
  let Some(name) = cx.declaration_name(declaration) else {
    return (Resolution::Unanchorable, None);
  };
  let ambiguity = (!others.is_empty()).then(|| Ambiguity {
    symbol,
    chosen: name,
    others,
  });
  (Resolution::Declared { name }, ambiguity)
}

/// Classifies an identifier. Rules are tried in order and the first match wins.
pub fn classify(cx: &FileContext<'_>, node: NodeId) -> Classified {
  let specifier = cx.module_specifier(cx.statement_of(node));
  let position = clause_position(cx, node);
  let (resolution, ambiguity) = resolve(cx, node);
  let classification = match (specifier, position, resolution) {
    (Some(specifier), ClausePosition::Binding { linkable: true }, _) => {
      Classification::ImportedLinkedDefinition {
        href: remote_href(cx, node, specifier),
      }
    }
    (Some(_), ClausePosition::Binding { linkable: false }, _) => Classification::ImportedDefinition,
    (Some(specifier), ClausePosition::RenamedFrom, Resolution::Unresolved) => {
      Classification::RemoteReference {
        href: remote_href(cx, node, specifier),
      }
    }
    (_, _, Resolution::Unresolved) => Classification::Untouched,
    (_, _, Resolution::Builtin | Resolution::Unanchorable) => Classification::Untouched,
    (_, _, Resolution::Declared { name }) if name == node => Classification::LocalDefinition,
    (_, _, Resolution::Declared { name }) => Classification::LocalReference { declaration: name },
  };
  // Ambiguity only matters where the chosen declaration is used.
  let ambiguity = ambiguity.filter(|_| {
    matches!(
      classification,
      Classification::LocalDefinition | Classification::LocalReference { .. }
    )
  });
  Classified {
    classification,
    ambiguity,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn canonical_skips_builtins_and_reports_the_rest() {
    let a = Declaration::Local(NodeId(1));
    let b = Declaration::Local(NodeId(2));
    assert_eq!(canonical_declaration(&[]), None);
    assert_eq!(canonical_declaration(&[Declaration::Builtin]), None);
    assert_eq!(
      canonical_declaration(&[Declaration::Builtin, Declaration::Builtin]),
      None
    );
    assert_eq!(canonical_declaration(&[a]), Some((a, vec![])));
    assert_eq!(
      canonical_declaration(&[Declaration::Builtin, a]),
      Some((a, vec![]))
    );
    assert_eq!(
      canonical_declaration(&[a, Declaration::Builtin, b]),
      Some((a, vec![b]))
    );
    assert_eq!(
      canonical_declaration(&[Declaration::Foreign, a]),
      Some((Declaration::Foreign, vec![a]))
    );
  }
}
