//! Cross-referenced HTML for JavaScript and TypeScript sources.
//!
//! Given source text, its [`syntax::SyntaxTree`] and a [`oracle::SymbolOracle`] that resolves
//! identifiers, [`annotate`] produces the source as escaped HTML where every declaring identifier
//! is wrapped in `<span class="definition" id="ID">` and every use is an
//! `<a class="ref" href="#ID">`. Bindings introduced by `import`/`export ... from "m"` also link to
//! `m#name`, so pages generated for several modules can reference each other.
//!
//! ```
//! use xref_js::loc::Span;
//! use xref_js::oracle::ResolutionTable;
//! use xref_js::syntax::{Role, SyntaxKind, TreeBuilder};
//!
//! let source = "let n = 1; n < 2";
//! let mut b = TreeBuilder::new(Span::new(0, source.len()));
//! b.start(SyntaxKind::Other, Role::None, Span::new(0, 10));
//! let decl = b.leaf(SyntaxKind::Identifier, Role::Name, Span::new(4, 5));
//! b.finish();
//! b.start(SyntaxKind::Other, Role::None, Span::new(11, 16));
//! let use_site = b.leaf(SyntaxKind::Identifier, Role::None, Span::new(11, 12));
//! let tree = b.build().unwrap();
//!
//! let mut oracle = ResolutionTable::new();
//! let symbol = oracle.declare(decl);
//! oracle.bind(use_site, symbol);
//!
//! let annotated = xref_js::annotate(source, &tree, &oracle).unwrap();
//! assert_eq!(
//!   annotated.html,
//!   "let <span class=\"definition\" id=\"symbol-n\">n</span> = 1; <a class=\"ref\" href=\"#symbol-n\">n</a> &lt; 2"
//! );
//! ```

use collect::collect;
use collect::Collected;
use context::FileContext;
use diagnostic::Diagnostic;
use error::AnnotateError;
use escape::HtmlFilter;
use ident::IdAllocator;
use oracle::check_oracle;
use oracle::SymbolOracle;
use render::render;
use syntax::SyntaxTree;
use tracing::debug;
use tracing::debug_span;

pub mod classify;
pub mod collect;
pub mod context;
pub mod diagnostic;
pub mod error;
pub mod escape;
pub mod ident;
pub mod loc;
pub mod oracle;
pub mod remote;
pub mod render;
pub mod syntax;
pub mod token;

pub const DEFAULT_SPECIFIER_CLASS: &str = "module-specifier";

#[derive(Clone, Debug)]
pub struct AnnotateOptions {
  /// Turn `http(s)://` URLs in comments and other plain text into links.
  pub linkify: bool,
  /// Class of the span wrapping module specifier literals.
  pub specifier_class: String,
}

impl AnnotateOptions {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_linkify(mut self, linkify: bool) -> Self {
    self.linkify = linkify;
    self
  }

  pub fn with_specifier_class(mut self, class: impl Into<String>) -> Self {
    self.specifier_class = class.into();
    self
  }
}

impl Default for AnnotateOptions {
  fn default() -> Self {
    AnnotateOptions {
      linkify: true,
      specifier_class: DEFAULT_SPECIFIER_CLASS.to_string(),
    }
  }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Annotated {
  pub html: String,
  pub diagnostics: Vec<Diagnostic>,
}

/// Annotates files one at a time.
///
/// Passes take `&mut self`, so one annotator never runs two passes at once; use one annotator per
/// thread to annotate in parallel.
#[derive(Debug, Default)]
pub struct Annotator {
  options: AnnotateOptions,
  ids: IdAllocator,
}

impl Annotator {
  pub fn new(options: AnnotateOptions) -> Self {
    Annotator {
      options,
      ids: IdAllocator::new(),
    }
  }

  /// Ids memoized by an unfinished pass. Always zero between passes.
  pub fn cached_ids(&self) -> usize {
    self.ids.len()
  }

  /// Computes the replacements for one file without rendering them.
  pub fn collect(
    &mut self,
    source: &str,
    tree: &SyntaxTree,
    oracle: &dyn SymbolOracle,
  ) -> Result<Collected, AnnotateError> {
    tree.check_source(source)?;
    check_oracle(tree, oracle)?;
    let cx = FileContext::new(source, tree, oracle);
    Ok(collect(cx, &mut self.ids, &self.options.specifier_class))
  }

  pub fn annotate(
    &mut self,
    source: &str,
    tree: &SyntaxTree,
    oracle: &dyn SymbolOracle,
  ) -> Result<Annotated, AnnotateError> {
    let span = debug_span!("annotate", nodes = tree.len(), bytes = source.len());
    let _entered = span.enter();
    let Collected {
      replacements,
      diagnostics,
    } = self.collect(source, tree, oracle)?;
    debug!(
      replacements = replacements.len(),
      diagnostics = diagnostics.len(),
      "collected replacements"
    );
    let filter = HtmlFilter {
      linkify: self.options.linkify,
    };
    let html = render(source, replacements, &filter)?;
    Ok(Annotated { html, diagnostics })
  }
}

/// Annotates one file with default options.
pub fn annotate(
  source: &str,
  tree: &SyntaxTree,
  oracle: &dyn SymbolOracle,
) -> Result<Annotated, AnnotateError> {
  Annotator::new(AnnotateOptions::default()).annotate(source, tree, oracle)
}
