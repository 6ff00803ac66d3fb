//! Tokenizer for the filter-expression grammar.
//!
//! A single ordered rule table is tried at each scan position; rule order is
//! the tie-break. The reserved logical-operator words are matched as whole
//! words *before* the generic identifier rule, since `AND`/`OR`/`NOT` are
//! lexically a subset of identifier spellings. Whitespace is consumed and
//! discarded between tokens.
//!
//! Characters no rule matches are skipped with a diagnostic by [`tokenize`]
//! (the historical behavior) or rejected by [`tokenize_strict`].

use std::fmt;

use nom::{
    branch::alt,
    bytes::complete::{tag, take_while1},
    character::complete::{digit1, satisfy},
    combinator::{map, not},
    sequence::terminated,
    IResult,
};

use crate::error::{FilterError, FilterResult};

/// Kind of a lexed token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `,`
    Comma,
    /// Reserved logical-operator word: `AND`, `OR`, `NOT`.
    Operator,
    /// Comparison symbol: `==`, `!=`, `>=`, `<=`, `>`, `<`.
    Comparison,
    /// Identifier: a run of `[A-Z_]`.
    Ident,
    /// Number: a run of digits.
    Number,
    /// Enum-like value sharing the identifier shape. Kept for parity with
    /// the rule table; the identifier rule always wins the tie.
    Str,
    /// End of the token stream.
    Eof,
}

impl TokenKind {
    /// Rule-table name of this kind, as used in syntax errors.
    pub fn name(&self) -> &'static str {
        match self {
            TokenKind::LParen => "LPAREN",
            TokenKind::RParen => "RPAREN",
            TokenKind::Comma => "COMMA",
            TokenKind::Operator => "OPERATOR",
            TokenKind::Comparison => "COMPARISON",
            TokenKind::Ident => "IDENT",
            TokenKind::Number => "NUMBER",
            TokenKind::Str => "STRING",
            TokenKind::Eof => "EOF",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A lexed token: kind plus the literal text it matched.
///
/// Tokens carry no source position beyond their order in the stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    /// Token kind.
    pub kind: TokenKind,
    /// Literal matched text.
    pub text: &'a str,
}

impl Token<'_> {
    /// The synthetic end-of-stream token.
    pub const EOF: Token<'static> = Token {
        kind: TokenKind::Eof,
        text: "",
    };
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_uppercase() || c == '_'
}

fn symbol<'a>(
    kind: TokenKind,
    pattern: &'static str,
) -> impl FnMut(&'a str) -> IResult<&'a str, Token<'a>> {
    map(tag(pattern), move |text| Token { kind, text })
}

/// `AND`/`OR`/`NOT` matched as whole words: the next character must not
/// extend the word, otherwise the identifier rule gets it.
fn logical_word(input: &str) -> IResult<&str, Token<'_>> {
    map(
        terminated(
            alt((tag("AND"), tag("OR"), tag("NOT"))),
            not(satisfy(is_word_char)),
        ),
        |text| Token {
            kind: TokenKind::Operator,
            text,
        },
    )(input)
}

fn comparison(input: &str) -> IResult<&str, Token<'_>> {
    map(
        alt((
            tag("=="),
            tag("!="),
            tag(">="),
            tag("<="),
            tag(">"),
            tag("<"),
        )),
        |text| Token {
            kind: TokenKind::Comparison,
            text,
        },
    )(input)
}

fn ident(input: &str) -> IResult<&str, Token<'_>> {
    map(take_while1(is_word_char), |text| Token {
        kind: TokenKind::Ident,
        text,
    })(input)
}

fn number(input: &str) -> IResult<&str, Token<'_>> {
    map(digit1, |text| Token {
        kind: TokenKind::Number,
        text,
    })(input)
}

// Shares the identifier shape and is therefore unreachable behind `ident`;
// present so the rule table mirrors the grammar it implements.
fn string_value(input: &str) -> IResult<&str, Token<'_>> {
    map(take_while1(is_word_char), |text| Token {
        kind: TokenKind::Str,
        text,
    })(input)
}

/// One token, first matching rule wins.
fn token(input: &str) -> IResult<&str, Token<'_>> {
    alt((
        symbol(TokenKind::LParen, "("),
        symbol(TokenKind::RParen, ")"),
        symbol(TokenKind::Comma, ","),
        logical_word,
        comparison,
        ident,
        number,
        string_value,
    ))(input)
}

/// Scans the whole input, recording the first unmatched character.
fn scan(input: &str) -> (Vec<Token<'_>>, Option<FilterError>) {
    let mut tokens = Vec::new();
    let mut first_gap = None;
    let mut rest = input.trim_start();

    while !rest.is_empty() {
        match token(rest) {
            Ok((remaining, tok)) => {
                tokens.push(tok);
                rest = remaining;
            }
            Err(_) => {
                let position = input.len() - rest.len();
                // rest is non-empty here, so a character exists
                let mut chars = rest.chars();
                let character = match chars.next() {
                    Some(c) => c,
                    None => break,
                };
                tracing::debug!(%character, position, "lexer skipping unrecognized character");
                if first_gap.is_none() {
                    first_gap = Some(FilterError::LexicalGap {
                        character,
                        position,
                    });
                }
                rest = chars.as_str();
            }
        }
        rest = rest.trim_start();
    }

    (tokens, first_gap)
}

/// Tokenizes the input, silently dropping unrecognized characters.
///
/// Total: any input produces a token list. Dropped characters are reported
/// through a `tracing` debug event only; use [`tokenize_strict`] when a
/// dropped character should be an error.
pub fn tokenize(input: &str) -> Vec<Token<'_>> {
    scan(input).0
}

/// Tokenizes the input, failing with [`FilterError::LexicalGap`] on the
/// first character no rule matches.
pub fn tokenize_strict(input: &str) -> FilterResult<Vec<Token<'_>>> {
    let (tokens, gap) = scan(input);
    match gap {
        Some(err) => Err(err),
        None => Ok(tokens),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        tokenize(input).iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_tokenize_condition() {
        let tokens = tokenize("AGE>=50");
        assert_eq!(
            tokens,
            vec![
                Token { kind: TokenKind::Ident, text: "AGE" },
                Token { kind: TokenKind::Comparison, text: ">=" },
                Token { kind: TokenKind::Number, text: "50" },
            ]
        );
    }

    #[test]
    fn test_tokenize_filter_expression() {
        assert_eq!(
            kinds("AND(AGE>=50, SEX==MALE)"),
            vec![
                TokenKind::Operator,
                TokenKind::LParen,
                TokenKind::Ident,
                TokenKind::Comparison,
                TokenKind::Number,
                TokenKind::Comma,
                TokenKind::Ident,
                TokenKind::Comparison,
                TokenKind::Ident,
                TokenKind::RParen,
            ]
        );
    }

    #[test]
    fn test_operator_words_match_whole_words_only() {
        // A word merely starting with a reserved spelling is an identifier.
        let tokens = tokenize("NOTABLE");
        assert_eq!(
            tokens,
            vec![Token { kind: TokenKind::Ident, text: "NOTABLE" }]
        );

        let tokens = tokenize("OR(");
        assert_eq!(tokens[0].kind, TokenKind::Operator);
    }

    #[test]
    fn test_whitespace_is_discarded() {
        assert_eq!(
            kinds("  AND ( AGE >= 50 )  "),
            vec![
                TokenKind::Operator,
                TokenKind::LParen,
                TokenKind::Ident,
                TokenKind::Comparison,
                TokenKind::Number,
                TokenKind::RParen,
            ]
        );
    }

    #[test]
    fn test_lenient_tokenize_skips_unrecognized_characters() {
        // '-' has no rule; the lenient scanner drops it and keeps going.
        let tokens = tokenize("AGE>=5-0");
        assert_eq!(
            tokens,
            vec![
                Token { kind: TokenKind::Ident, text: "AGE" },
                Token { kind: TokenKind::Comparison, text: ">=" },
                Token { kind: TokenKind::Number, text: "5" },
                Token { kind: TokenKind::Number, text: "0" },
            ]
        );
    }

    #[test]
    fn test_strict_tokenize_reports_gap() {
        let err = tokenize_strict("AGE >= 5-0").unwrap_err();
        assert_eq!(
            err,
            crate::error::FilterError::LexicalGap {
                character: '-',
                position: 8,
            }
        );
    }

    #[test]
    fn test_strict_tokenize_accepts_clean_input() {
        assert!(tokenize_strict("AND(AGE>=50, SEX==MALE)").is_ok());
    }

    #[test]
    fn test_empty_input_yields_no_tokens() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("   ").is_empty());
    }
}
