use crate::error::AnnotateError;
use crate::escape::TextFilter;
use crate::loc::Span;
use crate::token::Replacement;
use crate::token::Token;
use crate::token::TokenContent;

fn write_token(out: &mut String, filter: &dyn TextFilter, token: &Token, force_filter: bool) {
  let filtered = force_filter || !token.safe;
  match &token.content {
    TokenContent::Text(text) if filtered => filter.write(out, text),
    TokenContent::Text(markup) => out.push_str(markup),
    TokenContent::Tokens(children) => {
      for child in children {
        write_token(out, filter, child, filtered);
      }
    }
  }
}

/// Splices `replacements` into `source`. Text outside the replacements, and unsafe fragments
/// inside them, go through `filter`.
///
/// Replacements may arrive in any order but must not overlap; adjacent and empty spans are fine.
pub fn render(
  source: &str,
  mut replacements: Vec<Replacement>,
  filter: &dyn TextFilter,
) -> Result<String, AnnotateError> {
  replacements.sort_by_key(|r| (r.span.start, r.span.end));
  let mut out = String::with_capacity(source.len() * 2);
  let mut cursor = 0;
  let mut previous: Option<Span> = None;
  for replacement in &replacements {
    let span = replacement.span;
    if span.slice(source).is_none() {
      return Err(AnnotateError::ReplacementOutOfBounds {
        span,
        source_len: source.len(),
      });
    }
    if let Some(previous) = previous {
      if previous.overlaps(span) {
        return Err(AnnotateError::OverlappingReplacements {
          previous,
          next: span,
        });
      }
    }
    filter.write(&mut out, &source[cursor..span.start]);
    for fragment in &replacement.fragments {
      write_token(&mut out, filter, fragment, false);
    }
    cursor = span.end;
    previous = Some(span);
  }
  filter.write(&mut out, &source[cursor..]);
  Ok(out)
}
