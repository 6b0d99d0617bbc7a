use crate::escape::escape_attr;
use crate::escape::escape_text;
use crate::loc::Span;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum TokenContent {
  Text(String),
  Tokens(Vec<Token>),
}

/// A fragment of output. Safe tokens are rendered markup and are emitted verbatim; unsafe tokens
/// are source text that still has to pass through the text filter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Token {
  pub offset: usize,
  pub safe: bool,
  pub content: TokenContent,
}

impl Token {
  pub fn safe(offset: usize, markup: impl Into<String>) -> Token {
    Token {
      offset,
      safe: true,
      content: TokenContent::Text(markup.into()),
    }
  }

  pub fn raw(offset: usize, text: impl Into<String>) -> Token {
    Token {
      offset,
      safe: false,
      content: TokenContent::Text(text.into()),
    }
  }

  /// A safe group renders each child by its own flag; an unsafe group filters all text beneath it.
  pub fn group(offset: usize, safe: bool, tokens: Vec<Token>) -> Token {
    Token {
      offset,
      safe,
      content: TokenContent::Tokens(tokens),
    }
  }
}

/// Output fragments that take the place of `span` in the source text.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Replacement {
  pub span: Span,
  pub fragments: Vec<Token>,
}

/// `<span class="definition" id="ID">inner</span>`
pub fn definition(offset: usize, id: &str, inner: Token) -> Token {
  let mut open = String::from("<span class=\"definition\" id=\"");
  escape_attr(&mut open, id);
  open.push_str("\">");
  Token::group(offset, true, vec![
    Token::safe(offset, open),
    inner,
    Token::safe(offset, "</span>"),
  ])
}

/// `<a class="ref" href="TARGET">text</a>`
pub fn reference(offset: usize, href: &str, text: &str) -> Token {
  let mut open = String::from("<a class=\"ref\" href=\"");
  escape_attr(&mut open, href);
  open.push_str("\">");
  Token::group(offset, true, vec![
    Token::safe(offset, open),
    Token::raw(offset, text),
    Token::safe(offset, "</a>"),
  ])
}

/// A string literal wrapped in a styled span, escaped but never linked.
pub fn styled_literal(offset: usize, class: &str, literal: &str) -> Token {
  let mut markup = String::from("<span class=\"");
  escape_attr(&mut markup, class);
  markup.push_str("\">");
  escape_text(&mut markup, literal);
  markup.push_str("</span>");
  Token::safe(offset, markup)
}
