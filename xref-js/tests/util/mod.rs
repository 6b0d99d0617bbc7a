#![allow(dead_code)]

use xref_js::loc::Span;

/// Span of the `nth` (0-based) occurrence of `needle` in `source`.
pub fn span(source: &str, needle: &str, nth: usize) -> Span {
  let (start, _) = source
    .match_indices(needle)
    .nth(nth)
    .unwrap_or_else(|| panic!("occurrence {} of {:?} in {:?}", nth, needle, source));
  Span::new(start, start + needle.len())
}

/// Span from the `nth` occurrence of `from` to the end of the first `to` after it.
pub fn span_between(source: &str, from: &str, nth: usize, to: &str) -> Span {
  let start = span(source, from, nth).start;
  let end = source[start..].find(to).expect("closing text present") + start + to.len();
  Span::new(start, end)
}

/// Removes tags and undoes escaping, recovering the text a browser would display.
pub fn strip_markup(html: &str) -> String {
  let mut text = String::new();
  let mut in_tag = false;
  for ch in html.chars() {
    match ch {
      '<' => in_tag = true,
      '>' if in_tag => in_tag = false,
      ch if !in_tag => text.push(ch),
      _ => {}
    }
  }
  text
    .replace("&lt;", "<")
    .replace("&gt;", ">")
    .replace("&quot;", "\"")
    .replace("&#39;", "'")
    .replace("&amp;", "&")
}
