//! Block structure: turns the token stream into a tree of nodes
//!
//! `for`/`endfor` and `if`/`else`/`endif` are matched here, respecting
//! nesting. Everything downstream works on [`Node`]s and never re-scans text.

use super::tokenize::{TokenKind, TokenStream};
use crate::config::Syntax;
use crate::template::error::TemplateError;

/// `path | filter | filter`
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Expression<'a> {
    pub path: &'a str,
    pub filters: Vec<&'a str>,
}

/// `path` or `not path`
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Condition<'a> {
    pub path: &'a str,
    pub negated: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Node<'a> {
    Text(&'a str),
    Output {
        expr: Expression<'a>,
        line: usize,
    },
    For {
        var: &'a str,
        iterable: &'a str,
        body: Vec<Node<'a>>,
        line: usize,
    },
    If {
        condition: Condition<'a>,
        then_branch: Vec<Node<'a>>,
        else_branch: Vec<Node<'a>>,
        line: usize,
    },
}

/// Tag that closes or splits an enclosing block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Terminator {
    Else,
    EndFor,
    EndIf,
}

impl Terminator {
    fn keyword(self) -> &'static str {
        match self {
            Terminator::Else => "else",
            Terminator::EndFor => "endfor",
            Terminator::EndIf => "endif",
        }
    }
}

enum BlockTag<'a> {
    For { var: &'a str, iterable: &'a str },
    If(Condition<'a>),
    End(Terminator),
}

/// Parse a template into its node tree
pub(crate) fn parse<'a>(template: &'a str, syntax: &'a Syntax) -> Result<Vec<Node<'a>>, TemplateError> {
    let mut tokens = TokenStream::new(template, syntax);
    let (nodes, end) = parse_until(&mut tokens)?;

    match end {
        None => Ok(nodes),
        Some((terminator, line)) => Err(unexpected(terminator, line, "outside of any block")),
    }
}

/// Collect nodes until the stream ends or a terminator tag is reached
fn parse_until<'a>(
    tokens: &mut TokenStream<'a>,
) -> Result<(Vec<Node<'a>>, Option<(Terminator, usize)>), TemplateError> {
    let mut nodes = Vec::new();

    while let Some(token) = tokens.next() {
        let token = token?;
        match token.kind {
            TokenKind::Text(text) => nodes.push(Node::Text(text)),
            TokenKind::Comment => {}
            TokenKind::Variable(content) => nodes.push(Node::Output {
                expr: parse_expression(content, token.line)?,
                line: token.line,
            }),
            TokenKind::Block(content) => match classify_block(content, token.line)? {
                BlockTag::End(terminator) => return Ok((nodes, Some((terminator, token.line)))),
                BlockTag::For { var, iterable } => {
                    let (body, end) = parse_until(tokens)?;
                    match end {
                        Some((Terminator::EndFor, _)) => {}
                        Some((other, line)) => {
                            return Err(unexpected(other, line, "inside a for loop"));
                        }
                        None => {
                            return Err(TemplateError::MalformedSyntax {
                                message: format!("Unclosed for loop over '{}'", iterable),
                                line: token.line,
                            });
                        }
                    }
                    nodes.push(Node::For {
                        var,
                        iterable,
                        body,
                        line: token.line,
                    });
                }
                BlockTag::If(condition) => {
                    let (then_branch, end) = parse_until(tokens)?;
                    let else_branch = match end {
                        Some((Terminator::EndIf, _)) => Vec::new(),
                        Some((Terminator::Else, _)) => {
                            let (else_branch, end) = parse_until(tokens)?;
                            match end {
                                Some((Terminator::EndIf, _)) => else_branch,
                                Some((other, line)) => {
                                    return Err(unexpected(other, line, "inside an else branch"));
                                }
                                None => return Err(unclosed_if(&condition, token.line)),
                            }
                        }
                        Some((other, line)) => {
                            return Err(unexpected(other, line, "inside an if block"));
                        }
                        None => return Err(unclosed_if(&condition, token.line)),
                    };
                    nodes.push(Node::If {
                        condition,
                        then_branch,
                        else_branch,
                        line: token.line,
                    });
                }
            },
        }
    }

    Ok((nodes, None))
}

fn classify_block(content: &str, line: usize) -> Result<BlockTag<'_>, TemplateError> {
    let parts: Vec<&str> = content.split_whitespace().collect();

    match parts[..] {
        ["for", var, "in", iterable] => {
            check_identifier(var, line)?;
            check_path(iterable, line)?;
            Ok(BlockTag::For { var, iterable })
        }
        ["for", ..] => Err(TemplateError::MalformedSyntax {
            message: format!("Invalid for syntax: expected 'for item in items', got '{}'", content),
            line,
        }),
        ["if", "not", path] => {
            check_path(path, line)?;
            Ok(BlockTag::If(Condition {
                path,
                negated: true,
            }))
        }
        ["if", path] => {
            check_path(path, line)?;
            Ok(BlockTag::If(Condition {
                path,
                negated: false,
            }))
        }
        ["if", ..] => Err(TemplateError::MalformedSyntax {
            message: format!("Invalid if syntax: expected 'if key' or 'if not key', got '{}'", content),
            line,
        }),
        ["else"] => Ok(BlockTag::End(Terminator::Else)),
        ["endfor"] => Ok(BlockTag::End(Terminator::EndFor)),
        ["endif"] => Ok(BlockTag::End(Terminator::EndIf)),
        _ => Err(TemplateError::MalformedSyntax {
            message: format!("Unknown block tag '{}'", content),
            line,
        }),
    }
}

fn parse_expression(content: &str, line: usize) -> Result<Expression<'_>, TemplateError> {
    let mut parts = content.split('|').map(str::trim);
    let path = parts.next().unwrap_or_default();
    check_path(path, line)?;

    let filters = parts
        .map(|name| check_identifier(name, line).map(|_| name))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Expression { path, filters })
}

fn is_identifier(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '-')
}

fn check_identifier(s: &str, line: usize) -> Result<(), TemplateError> {
    if is_identifier(s) {
        Ok(())
    } else {
        Err(TemplateError::MalformedSyntax {
            message: format!("Invalid name '{}'", s),
            line,
        })
    }
}

fn check_path(s: &str, line: usize) -> Result<(), TemplateError> {
    if s.split('.').all(is_identifier) {
        Ok(())
    } else {
        Err(TemplateError::MalformedSyntax {
            message: format!("Invalid key '{}'", s),
            line,
        })
    }
}

fn unexpected(terminator: Terminator, line: usize, context: &str) -> TemplateError {
    TemplateError::MalformedSyntax {
        message: format!("Unexpected '{}' {}", terminator.keyword(), context),
        line,
    }
}

fn unclosed_if(condition: &Condition<'_>, line: usize) -> TemplateError {
    TemplateError::MalformedSyntax {
        message: format!("Unclosed if block on '{}'", condition.path),
        line,
    }
}
