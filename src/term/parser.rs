//! Term grammar
//!
//! ```text
//! term     ::= constant | variable | compound
//! constant ::= 'c' index
//! variable ::= 'x' index
//! compound ::= 'f' index '(' term (',' term)* ')'
//! index    ::= [A-Za-z0-9]*
//! ```
//!
//! Whitespace between tokens is ignored. Parsing builds directly into a
//! [`GraphBuilder`] so everything parsed in one session is hash-consed.

use std::{fmt, iter::Peekable, str::CharIndices};

use super::{
    Term,
    graph::{GraphBuilder, NodeId},
};

/// Malformed term text
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[allow(missing_docs)]
    #[error("Unexpected end of input")]
    UnexpectedEnd,
    #[allow(missing_docs)]
    #[error("Invalid character {character:?} at position {position}")]
    InvalidCharacter { character: char, position: usize },
    #[allow(missing_docs)]
    #[error("Expected {expected} at position {position}, found {found}")]
    UnexpectedToken {
        expected: &'static str,
        found: String,
        position: usize,
    },
    #[allow(missing_docs)]
    #[error("Functional symbol at position {position} has no arguments")]
    EmptyArguments { position: usize },
    #[allow(missing_docs)]
    #[error("Unexpected input after the term at position {position}")]
    TrailingInput { position: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum TokenKind {
    Leaf(Term),
    Function(String),
    LeftParen,
    RightParen,
    Comma,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Leaf(leaf) => fmt::Display::fmt(leaf, f),
            TokenKind::Function(name) => f.write_str(name),
            TokenKind::LeftParen => f.write_str("'('"),
            TokenKind::RightParen => f.write_str("')'"),
            TokenKind::Comma => f.write_str("','"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Token {
    kind: TokenKind,
    position: usize,
}

struct Lexer<'a> {
    input: &'a str,
    chars: Peekable<CharIndices<'a>>,
}

impl<'a> Lexer<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.char_indices().peekable(),
        }
    }

    // Consume the index following a symbol prefix and return the whole name
    fn name(&mut self, start: usize) -> String {
        let mut end = start + 1;
        while let Some(&(position, character)) = self.chars.peek() {
            if !character.is_ascii_alphanumeric() {
                break;
            }
            end = position + character.len_utf8();
            let _ = self.chars.next();
        }
        self.input[start..end].to_owned()
    }
}

impl Iterator for Lexer<'_> {
    type Item = Result<Token, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        let (position, character) =
            self.chars.find(|(_, character)| !character.is_whitespace())?;
        let kind = match character {
            '(' => TokenKind::LeftParen,
            ')' => TokenKind::RightParen,
            ',' => TokenKind::Comma,
            'c' | 'x' => match Term::from_token(&self.name(position)) {
                Some(leaf) => TokenKind::Leaf(leaf),
                None => {
                    return Some(Err(ParseError::InvalidCharacter {
                        character,
                        position,
                    }));
                }
            },
            'f' => TokenKind::Function(self.name(position)),
            character => {
                return Some(Err(ParseError::InvalidCharacter {
                    character,
                    position,
                }));
            }
        };
        Some(Ok(Token { kind, position }))
    }
}

struct Parser<'a, 'b> {
    tokens: Peekable<Lexer<'a>>,
    builder: &'b mut GraphBuilder,
}

impl Parser<'_, '_> {
    fn next(&mut self) -> Result<Token, ParseError> {
        self.tokens.next().unwrap_or(Err(ParseError::UnexpectedEnd))
    }

    fn term(&mut self) -> Result<NodeId, ParseError> {
        let Token { kind, position } = self.next()?;
        match kind {
            TokenKind::Leaf(leaf) => Ok(self.builder.intern(&leaf)),
            TokenKind::Function(name) => self.arguments(name, position),
            found => Err(ParseError::UnexpectedToken {
                expected: "a term",
                found: found.to_string(),
                position,
            }),
        }
    }

    fn arguments(
        &mut self,
        name: String,
        position: usize,
    ) -> Result<NodeId, ParseError> {
        match self.next()? {
            Token {
                kind: TokenKind::LeftParen,
                ..
            } => {}
            Token { kind, position } => {
                return Err(ParseError::UnexpectedToken {
                    expected: "'('",
                    found: kind.to_string(),
                    position,
                });
            }
        }
        if let Some(Ok(Token {
            kind: TokenKind::RightParen,
            ..
        })) = self.tokens.peek()
        {
            return Err(ParseError::EmptyArguments { position });
        }

        let mut children = Vec::new();
        loop {
            children.push(self.term()?);
            let Token { kind, position } = self.next()?;
            match kind {
                TokenKind::Comma => {}
                TokenKind::RightParen => break,
                found => {
                    return Err(ParseError::UnexpectedToken {
                        expected: "',' or ')'",
                        found: found.to_string(),
                        position,
                    });
                }
            }
        }
        self.builder
            .compound(name, children)
            .ok_or(ParseError::EmptyArguments { position })
    }

    fn end(&mut self) -> Result<(), ParseError> {
        match self.tokens.next() {
            None => Ok(()),
            Some(Err(err)) => Err(err),
            Some(Ok(Token { position, .. })) => {
                Err(ParseError::TrailingInput { position })
            }
        }
    }
}

/// Parse a single term into `builder`, returning its root
pub(crate) fn parse(
    builder: &mut GraphBuilder,
    input: &str,
) -> Result<NodeId, ParseError> {
    let mut parser = Parser {
        tokens: Lexer::new(input).peekable(),
        builder,
    };
    let root = parser.term()?;
    parser.end()?;
    Ok(root)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{Lexer, ParseError, Token, TokenKind};
    use crate::term::Term;

    fn kinds(input: &str) -> Result<Vec<TokenKind>, ParseError> {
        Lexer::new(input)
            .map(|token| token.map(|Token { kind, .. }| kind))
            .collect()
    }

    #[test]
    fn lexer() -> Result<(), ParseError> {
        assert_eq!(
            vec![
                TokenKind::Function("f12".into()),
                TokenKind::LeftParen,
                TokenKind::Leaf(Term::variable("xVar")),
                TokenKind::Comma,
                TokenKind::Leaf(Term::constant("c3")),
                TokenKind::RightParen,
            ],
            kinds(" f12 ( xVar ,c3 ) ")?
        );
        Ok(())
    }

    #[test]
    fn whitespace_is_ignored() -> Result<(), ParseError> {
        let term = " f1 ( x1 , f2( c1 ) ) ".parse::<Term>()?;
        assert_eq!("f1(x1,f2(c1))", term.to_string());
        Ok(())
    }

    #[test]
    fn invalid_character() {
        assert_eq!(
            Err(ParseError::InvalidCharacter {
                character: 'y',
                position: 3
            }),
            "f1(y1)".parse::<Term>()
        );
    }

    #[test]
    fn missing_parenthesis() {
        assert_eq!(
            Err(ParseError::UnexpectedToken {
                expected: "'('",
                found: "x1".into(),
                position: 3,
            }),
            "f1 x1".parse::<Term>()
        );
        assert_eq!(Err(ParseError::UnexpectedEnd), "f1(x1".parse::<Term>());
    }

    #[test]
    fn missing_comma() {
        assert_eq!(
            Err(ParseError::UnexpectedToken {
                expected: "',' or ')'",
                found: "c1".into(),
                position: 6,
            }),
            "f1(x1 c1)".parse::<Term>()
        );
    }

    #[test]
    fn empty_arguments() {
        assert_eq!(
            Err(ParseError::EmptyArguments { position: 0 }),
            "f1()".parse::<Term>()
        );
    }

    #[test]
    fn trailing_input() {
        assert_eq!(
            Err(ParseError::TrailingInput { position: 3 }),
            "x1 c1".parse::<Term>()
        );
        assert_eq!(Err(ParseError::UnexpectedEnd), "".parse::<Term>());
    }

    #[test]
    fn misplaced_punctuation() {
        assert_eq!(
            Err(ParseError::UnexpectedToken {
                expected: "a term",
                found: "','".into(),
                position: 3,
            }),
            "f1(,x1)".parse::<Term>()
        );
    }
}
