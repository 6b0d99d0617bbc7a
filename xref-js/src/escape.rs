//! HTML escaping and URL linkification for text that is not yet markup.

use once_cell::sync::Lazy;
use regex::Regex;

static URL: Lazy<Regex> =
  Lazy::new(|| Regex::new(r#"\bhttps?://[^\s<>"'`]+"#).expect("URL pattern is valid"));

/// Escapes `&`, `<` and `>` so `text` can appear as HTML element content.
pub fn escape_text(out: &mut String, text: &str) {
  let bytes = text.as_bytes();
  let mut last = 0;
  for i in memchr::memchr3_iter(b'&', b'<', b'>', bytes) {
    out.push_str(&text[last..i]);
    out.push_str(match bytes[i] {
      b'&' => "&amp;",
      b'<' => "&lt;",
      _ => "&gt;",
    });
    last = i + 1;
  }
  out.push_str(&text[last..]);
}

/// Escapes `text` for use inside a double- or single-quoted attribute value.
pub fn escape_attr(out: &mut String, text: &str) {
  for ch in text.chars() {
    match ch {
      '&' => out.push_str("&amp;"),
      '<' => out.push_str("&lt;"),
      '>' => out.push_str("&gt;"),
      '"' => out.push_str("&quot;"),
      '\'' => out.push_str("&#39;"),
      ch => out.push(ch),
    }
  }
}

// Trailing punctuation is far more often prose than part of the URL.
fn trim_url(url: &str) -> &str {
  url.trim_end_matches(|c| matches!(c, '.' | ',' | ';' | ':' | '!' | '?' | ')' | ']' | '}'))
}

/// Escapes `text`, turning bare `http(s)://` URLs into links.
pub fn linkify(out: &mut String, text: &str) {
  let mut last = 0;
  for m in URL.find_iter(text) {
    let url = trim_url(m.as_str());
    if url.ends_with("://") {
      continue;
    }
    escape_text(out, &text[last..m.start()]);
    out.push_str("<a href=\"");
    escape_attr(out, url);
    out.push_str("\">");
    escape_text(out, url);
    out.push_str("</a>");
    last = m.start() + url.len();
  }
  escape_text(out, &text[last..]);
}

/// Converts raw source text into markup. Invoked for every piece of text that is not already
/// rendered, and only for those.
pub trait TextFilter {
  fn write(&self, out: &mut String, text: &str);
}

#[derive(Clone, Copy, Debug)]
pub struct HtmlFilter {
  pub linkify: bool,
}

impl TextFilter for HtmlFilter {
  fn write(&self, out: &mut String, text: &str) {
    if self.linkify {
      linkify(out, text);
    } else {
      escape_text(out, text);
    }
  }
}
