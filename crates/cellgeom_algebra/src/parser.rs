//! Parser for MCNP-style cell expressions.
//!
//! Grammar: optionally signed nonzero integers are surface literals, `:`
//! is union, adjacency (whitespace or abutting parentheses) is
//! intersection, `(` `)` group explicitly. Intersection binds tighter than
//! union, so `1 2:3` reads as `(1 2):3`.

use cellgeom_foundation::{Error, Result};

use crate::expr::Expr;

/// A lexical token with its byte position in the source.
#[derive(Clone, Debug, PartialEq, Eq)]
enum TokenKind {
    /// A signed surface literal.
    Literal(i32),
    /// `:`
    Colon,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// End of input.
    Eof,
}

#[derive(Clone, Debug)]
struct Token {
    kind: TokenKind,
    position: usize,
    text: String,
}

/// Single-pass tokenizer over the expression source.
struct Lexer<'src> {
    source: &'src str,
    position: usize,
}

impl<'src> Lexer<'src> {
    fn new(source: &'src str) -> Self {
        Self {
            source,
            position: 0,
        }
    }

    fn rest(&self) -> &'src str {
        &self.source[self.position..]
    }

    fn next_token(&mut self) -> Result<Token> {
        while let Some(c) = self.rest().chars().next() {
            if !c.is_whitespace() {
                break;
            }
            self.position += c.len_utf8();
        }
        let start = self.position;
        let Some(c) = self.rest().chars().next() else {
            return Ok(Token {
                kind: TokenKind::Eof,
                position: start,
                text: String::new(),
            });
        };
        match c {
            ':' => {
                self.position += 1;
                Ok(self.token(TokenKind::Colon, start))
            }
            '(' => {
                self.position += 1;
                Ok(self.token(TokenKind::LParen, start))
            }
            ')' => {
                self.position += 1;
                Ok(self.token(TokenKind::RParen, start))
            }
            '+' | '-' | '0'..='9' => self.scan_literal(start, c),
            other => Err(Error::parse(
                "illegal character",
                start,
                other.to_string(),
            )),
        }
    }

    fn token(&self, kind: TokenKind, start: usize) -> Token {
        Token {
            kind,
            position: start,
            text: self.source[start..self.position].to_string(),
        }
    }

    fn scan_literal(&mut self, start: usize, first: char) -> Result<Token> {
        self.position += 1;
        if (first == '+' || first == '-')
            && !self
                .rest()
                .chars()
                .next()
                .is_some_and(|c| c.is_ascii_digit())
        {
            return Err(Error::parse(
                "sign without digits",
                start,
                first.to_string(),
            ));
        }
        while self
            .rest()
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_digit())
        {
            self.position += 1;
        }
        let text = &self.source[start..self.position];
        let value: i32 = text
            .parse()
            .map_err(|_| Error::parse("integer out of range", start, text))?;
        if value == 0 {
            return Err(Error::parse("surface number 0 is not valid", start, text));
        }
        Ok(self.token(TokenKind::Literal(value), start))
    }
}

/// Recursive-descent parser with one token of lookahead.
struct Parser<'src> {
    lexer: Lexer<'src>,
    current: Token,
}

impl<'src> Parser<'src> {
    fn new(source: &'src str) -> Result<Self> {
        let mut lexer = Lexer::new(source);
        let current = lexer.next_token()?;
        Ok(Self { lexer, current })
    }

    fn advance(&mut self) -> Result<()> {
        self.current = self.lexer.next_token()?;
        Ok(())
    }

    /// union := intersection (":" intersection)*
    fn parse_union(&mut self) -> Result<Expr> {
        let mut terms = vec![self.parse_intersection()?];
        while self.current.kind == TokenKind::Colon {
            self.advance()?;
            terms.push(self.parse_intersection()?);
        }
        Ok(Expr::or(terms))
    }

    /// intersection := primary+
    fn parse_intersection(&mut self) -> Result<Expr> {
        let mut factors = vec![self.parse_primary()?];
        loop {
            match self.current.kind {
                TokenKind::Literal(_) | TokenKind::LParen => {
                    factors.push(self.parse_primary()?);
                }
                _ => break,
            }
        }
        Ok(Expr::and(factors))
    }

    /// primary := literal | "(" union ")"
    fn parse_primary(&mut self) -> Result<Expr> {
        match self.current.kind {
            TokenKind::Literal(n) => {
                self.advance()?;
                Ok(Expr::Lit(n))
            }
            TokenKind::LParen => {
                let open = self.current.clone();
                self.advance()?;
                if self.current.kind == TokenKind::RParen {
                    return Err(Error::parse("empty group", open.position, "()"));
                }
                let inner = self.parse_union()?;
                if self.current.kind != TokenKind::RParen {
                    return Err(Error::parse(
                        "unbalanced parenthesis",
                        open.position,
                        open.text,
                    ));
                }
                self.advance()?;
                Ok(inner)
            }
            TokenKind::Colon => Err(Error::parse(
                "union operator without left term",
                self.current.position,
                self.current.text.clone(),
            )),
            TokenKind::RParen => Err(Error::parse(
                "unbalanced parenthesis",
                self.current.position,
                self.current.text.clone(),
            )),
            TokenKind::Eof => Err(Error::parse(
                "unexpected end of expression",
                self.current.position,
                "",
            )),
        }
    }
}

/// Parses a complete MCNP cell expression into a normalized [`Expr`].
///
/// # Errors
/// Returns a parse error with position and offending text for malformed
/// input, including empty input.
pub fn parse(source: &str) -> Result<Expr> {
    if source.trim().is_empty() {
        return Err(Error::parse("empty expression", 0, source.trim()));
    }
    let mut parser = Parser::new(source)?;
    let expr = parser.parse_union()?;
    if parser.current.kind != TokenKind::Eof {
        return Err(Error::parse(
            "trailing input after expression",
            parser.current.position,
            parser.current.text.clone(),
        ));
    }
    Ok(expr)
}
