//! Tokenization for template engine
//!
//! Splits a template into text runs and delimited tags in a single forward
//! pass. Delimiters come from [`Syntax`], so nothing here assumes a
//! particular bracket style.

use crate::config::Syntax;
use crate::template::error::TemplateError;

/// Token classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TokenKind<'a> {
    /// Literal text between tags
    Text(&'a str),

    /// `((( expr )))` - trimmed inner content
    Variable(&'a str),

    /// `((* for x in items *))` - trimmed inner content
    Block(&'a str),

    /// `((= ... =))`
    Comment,
}

/// A single token with position metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Token<'a> {
    pub kind: TokenKind<'a>,
    /// Line number where token starts (for error messages)
    pub line: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TagKind {
    Variable,
    Block,
    Comment,
}

impl TagKind {
    fn describe(self) -> &'static str {
        match self {
            TagKind::Variable => "variable",
            TagKind::Block => "block",
            TagKind::Comment => "comment",
        }
    }
}

/// Iterator over tokens in a template string
///
/// Yields `Err` once on the first unclosed tag and then stops.
pub(crate) struct TokenStream<'a> {
    text: &'a str,
    syntax: &'a Syntax,
    /// Current byte position
    pos: usize,
    /// Current line number (for error messages)
    line: usize,
    done: bool,
}

impl<'a> TokenStream<'a> {
    pub fn new(text: &'a str, syntax: &'a Syntax) -> Self {
        Self {
            text,
            syntax,
            pos: 0,
            line: 1,
            done: false,
        }
    }

    /// Find the earliest opening delimiter at or after the current position
    ///
    /// When two openers match at the same offset the longer one wins.
    fn next_opener(&self) -> Option<(usize, TagKind, &'a str, &'a str)> {
        let text: &'a str = self.text;
        let syntax: &'a Syntax = self.syntax;
        let rest = &text[self.pos..];
        let candidates = [
            (TagKind::Variable, &syntax.variable_start, &syntax.variable_end),
            (TagKind::Block, &syntax.block_start, &syntax.block_end),
            (TagKind::Comment, &syntax.comment_start, &syntax.comment_end),
        ];

        let mut best: Option<(usize, TagKind, &'a str, &'a str)> = None;
        for (kind, open, close) in candidates {
            let Some(offset) = rest.find(open.as_str()) else {
                continue;
            };
            let better = match best {
                None => true,
                Some((best_offset, _, best_open, _)) => {
                    offset < best_offset
                        || (offset == best_offset && open.len() > best_open.len())
                }
            };
            if better {
                best = Some((offset, kind, open.as_str(), close.as_str()));
            }
        }
        best
    }

    /// Consume `len` bytes and return the token covering them
    fn advance(&mut self, kind: TokenKind<'a>, len: usize) -> Token<'a> {
        let token = Token {
            kind,
            line: self.line,
        };
        let text: &'a str = self.text;
        self.line += count_newlines(&text[self.pos..self.pos + len]);
        self.pos += len;
        token
    }

    fn read_tag(
        &mut self,
        kind: TagKind,
        open: &'a str,
        close: &'a str,
    ) -> Result<Token<'a>, TemplateError> {
        let text: &'a str = self.text;
        let content_start = self.pos + open.len();
        let Some(close_offset) = text[content_start..].find(close) else {
            return Err(TemplateError::MalformedSyntax {
                message: format!("Unclosed {} tag: missing '{}'", kind.describe(), close),
                line: self.line,
            });
        };

        let content = text[content_start..content_start + close_offset].trim();
        let token_kind = match kind {
            TagKind::Variable => TokenKind::Variable(content),
            TagKind::Block => TokenKind::Block(content),
            TagKind::Comment => TokenKind::Comment,
        };
        Ok(self.advance(token_kind, open.len() + close_offset + close.len()))
    }
}

impl<'a> Iterator for TokenStream<'a> {
    type Item = Result<Token<'a>, TemplateError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.pos >= self.text.len() {
            return None;
        }

        let text: &'a str = self.text;
        let item = match self.next_opener() {
            None => {
                let len = text.len() - self.pos;
                Ok(self.advance(TokenKind::Text(&text[self.pos..]), len))
            }
            Some((0, kind, open, close)) => self.read_tag(kind, open, close),
            Some((offset, ..)) => {
                let run = &text[self.pos..self.pos + offset];
                Ok(self.advance(TokenKind::Text(run), offset))
            }
        };

        if item.is_err() {
            self.done = true;
        }
        Some(item)
    }
}

/// Count newlines in text
pub(crate) fn count_newlines(text: &str) -> usize {
    text.bytes().filter(|&b| b == b'\n').count()
}
