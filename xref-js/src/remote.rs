use crate::context::FileContext;
use crate::syntax::NodeId;
use crate::syntax::Role;
use crate::syntax::SyntaxKind;

/// The value of a string literal, without its quotes. Escape sequences are kept as written.
pub fn unquote(literal: &str) -> &str {
  let bytes = literal.as_bytes();
  match (bytes.first(), bytes.last()) {
    (Some(&q @ (b'"' | b'\'')), Some(&last)) if bytes.len() >= 2 && q == last => {
      &literal[1..literal.len() - 1]
    }
    _ => literal,
  }
}

/// The name `node` is exported under by the module its clause names.
///
/// `{ a as b }` names `a`; `{ a }` names `a`; the default binding of `import d from "m"` names
/// `default`.
pub fn remote_export_name<'a>(cx: &FileContext<'a>, node: NodeId) -> &'a str {
  let Some(parent) = cx.tree.parent(node) else {
    return "default";
  };
  if let Some(renamed_from) = cx.tree.child_with_role(parent, Role::PropertyName) {
    return cx.text(renamed_from);
  }
  match cx.tree.kind(parent) {
    SyntaxKind::ImportSpecifier | SyntaxKind::ExportSpecifier => cx.text(node),
    _ => "default",
  }
}

/// `<module>#<export>` for an identifier in the clause of an import or export declaration whose
/// module specifier literal is `specifier`.
pub fn remote_href(cx: &FileContext<'_>, node: NodeId, specifier: NodeId) -> String {
  format!(
    "{}#{}",
    unquote(cx.text(specifier)),
    remote_export_name(cx, node)
  )
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn unquote_strips_matching_quotes_only() {
    assert_eq!(unquote("\"./m\""), "./m");
    assert_eq!(unquote("'m'"), "m");
    assert_eq!(unquote("\"m'"), "\"m'");
    assert_eq!(unquote("\""), "\"");
    assert_eq!(unquote(""), "");
  }
}
