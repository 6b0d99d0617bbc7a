use crate::classify::classify;
use crate::classify::Ambiguity;
use crate::classify::Classification;
use crate::context::FileContext;
use crate::diagnostic::Diagnostic;
use crate::diagnostic::AMBIGUOUS_DECLARATION;
use crate::ident::IdAllocator;
use crate::ident::ScopedIds;
use crate::oracle::Declaration;
use crate::oracle::SymbolId;
use crate::syntax::NodeId;
use crate::syntax::SyntaxKind;
use crate::token::definition;
use crate::token::reference;
use crate::token::styled_literal;
use crate::token::Replacement;
use crate::token::Token;
use ahash::HashSet;
use ahash::HashSetExt;
use tracing::debug;
use tracing::trace;

/// Replacements for one file, sorted by start offset, plus findings that didn't stop the pass.
#[derive(Clone, Debug, Default)]
pub struct Collected {
  pub replacements: Vec<Replacement>,
  pub diagnostics: Vec<Diagnostic>,
}

struct Collector<'a, 'i> {
  cx: FileContext<'a>,
  ids: ScopedIds<'i>,
  specifier_class: &'a str,
  replacements: Vec<Replacement>,
  diagnostics: Vec<Diagnostic>,
  reported: HashSet<SymbolId>,
}

impl<'a, 'i> Collector<'a, 'i> {
  fn visit(&mut self, node: NodeId) {
    match self.cx.tree.kind(node) {
      SyntaxKind::Identifier => self.visit_identifier(node),
      SyntaxKind::ImportDeclaration
      | SyntaxKind::ExportDeclaration
      | SyntaxKind::ImportEqualsDeclaration => self.visit_module_reference(node),
      _ => {}
    }
  }

  fn visit_identifier(&mut self, node: NodeId) {
    let classified = classify(&self.cx, node);
    trace!(node = node.0, classification = ?classified.classification, "classified identifier");
    if let Some(ambiguity) = classified.ambiguity {
      self.report_ambiguity(ambiguity);
    }
    let span = self.cx.tree.span(node);
    let text = self.cx.text(node);
    let fragment = match classified.classification {
      Classification::ImportedLinkedDefinition { href } => {
        let id = self.ids.id_for(&self.cx, node);
        definition(span.start, &id, reference(span.start, &href, text))
      }
      Classification::ImportedDefinition | Classification::LocalDefinition => {
        let id = self.ids.id_for(&self.cx, node);
        definition(span.start, &id, Token::raw(span.start, text))
      }
      Classification::RemoteReference { href } => reference(span.start, &href, text),
      Classification::LocalReference { declaration } => {
        let id = self.ids.id_for(&self.cx, declaration);
        reference(span.start, &format!("#{}", id), text)
      }
      Classification::Untouched => return,
    };
    self.replacements.push(Replacement {
      span,
      fragments: vec![fragment],
    });
  }

  fn visit_module_reference(&mut self, declaration: NodeId) {
    let Some(literal) = self.cx.specifier_literal(declaration) else {
      return;
    };
    let span = self.cx.tree.span(literal);
    self.replacements.push(Replacement {
      span,
      fragments: vec![styled_literal(
        span.start,
        self.specifier_class,
        self.cx.text(literal),
      )],
    });
  }

  fn report_ambiguity(&mut self, ambiguity: Ambiguity) {
    if !self.reported.insert(ambiguity.symbol) {
      return;
    }
    let name = self.cx.text(ambiguity.chosen);
    debug!(
      symbol = ambiguity.symbol.0,
      name,
      declarations = ambiguity.others.len() + 1,
      "symbol has several local declarations"
    );
    let mut diagnostic = Diagnostic::note(
      AMBIGUOUS_DECLARATION,
      format!(
        "`{}` has {} non-built-in declarations; links go to the first",
        name,
        ambiguity.others.len() + 1
      ),
      self.cx.tree.span(ambiguity.chosen),
    );
    for other in ambiguity.others {
      if let Declaration::Local(other) = other {
        diagnostic = diagnostic.with_label(self.cx.tree.span(other), "also declared here");
      }
    }
    self.diagnostics.push(diagnostic);
  }
}

/// Classifies every node of the file once and builds its replacements.
///
/// `ids` is empty again when this returns.
pub fn collect(cx: FileContext<'_>, ids: &mut IdAllocator, specifier_class: &str) -> Collected {
  let mut collector = Collector {
    cx,
    ids: ScopedIds::new(ids),
    specifier_class,
    replacements: Vec::new(),
    diagnostics: Vec::new(),
    reported: HashSet::new(),
  };
  for node in cx.tree.preorder() {
    collector.visit(node);
  }
  let mut replacements = collector.replacements;
  // Specifier literals are visited with their declaration, ahead of the clause before them.
  replacements.sort_by_key(|r| r.span.start);
  Collected {
    replacements,
    diagnostics: collector.diagnostics,
  }
}
