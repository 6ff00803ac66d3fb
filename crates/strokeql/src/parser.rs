//! Recursive-descent parser for filter expressions.
//!
//! Grammar:
//!
//! ```text
//! filter      := OPERATOR '(' expr_list ')'
//! expr_list   := expr (',' expr)*
//! expr        := filter | condition
//! condition   := IDENT COMPARISON value
//! ```
//!
//! Condition dispatch is asymmetric and deliberately so: `AGE`, `NIHSS` and
//! `DISCHARGEDATE` are keyed by the identifier, the sex and stroke leaves are
//! keyed by the *value* token (the identifier is syntactically required but
//! semantically ignored), and boolean properties are keyed by the identifier
//! again. Changing this order changes which inputs are accepted.

use chrono::NaiveDate;

use crate::ast::FilterNode;
use crate::error::{FilterError, FilterResult};
use crate::lexer::{tokenize, tokenize_strict, Token, TokenKind};
use crate::vocab::{BooleanProperty, Comparison, LogicalOp, SexType, StrokeType};

/// Recursive-descent parser over a lexed token stream.
pub struct FilterParser<'a> {
    tokens: Vec<Token<'a>>,
    pos: usize,
}

impl<'a> FilterParser<'a> {
    /// Creates a parser over the given token stream.
    pub fn new(tokens: Vec<Token<'a>>) -> Self {
        Self { tokens, pos: 0 }
    }

    fn peek(&self) -> Token<'a> {
        self.tokens.get(self.pos).copied().unwrap_or(Token::EOF)
    }

    fn consume(&mut self, expected: TokenKind) -> FilterResult<Token<'a>> {
        let token = self.peek();
        if token.kind != expected {
            return Err(FilterError::SyntaxError {
                expected: expected.name(),
                found: token.text.to_string(),
                position: self.pos,
            });
        }
        self.pos += 1;
        Ok(token)
    }

    /// Consumes the next token whatever its kind, failing only when the
    /// stream is exhausted mid-production.
    fn consume_value(&mut self) -> FilterResult<Token<'a>> {
        let token = self.peek();
        if token.kind == TokenKind::Eof {
            return Err(FilterError::SyntaxError {
                expected: "value",
                found: token.text.to_string(),
                position: self.pos,
            });
        }
        self.pos += 1;
        Ok(token)
    }

    /// Parses a complete `filter` production.
    pub fn parse(&mut self) -> FilterResult<FilterNode> {
        self.filter()
    }

    fn filter(&mut self) -> FilterResult<FilterNode> {
        let op_token = self.consume(TokenKind::Operator)?;
        let operator = LogicalOp::resolve(op_token.text)?;
        self.consume(TokenKind::LParen)?;
        let children = self.expr_list()?;
        self.consume(TokenKind::RParen)?;
        FilterNode::logical(operator, children)
    }

    fn expr_list(&mut self) -> FilterResult<Vec<FilterNode>> {
        let mut children = vec![self.expr()?];
        while self.peek().kind == TokenKind::Comma {
            self.consume(TokenKind::Comma)?;
            children.push(self.expr()?);
        }
        Ok(children)
    }

    fn expr(&mut self) -> FilterResult<FilterNode> {
        if self.peek().kind == TokenKind::Operator {
            self.filter()
        } else {
            self.condition()
        }
    }

    fn condition(&mut self) -> FilterResult<FilterNode> {
        let ident_token = self.consume(TokenKind::Ident)?;
        let ident = ident_token.text.to_ascii_uppercase();

        let comp_token = self.consume(TokenKind::Comparison)?;
        let operator = Comparison::resolve(comp_token.text)?;

        let value = self.consume_value()?.text;

        match ident.as_str() {
            // Integer conditions, keyed by identifier.
            "AGE" => Ok(FilterNode::Age {
                operator,
                value: parse_int(value)?,
            }),
            "NIHSS" => Ok(FilterNode::Nihss {
                operator,
                value: parse_int(value)?,
            }),

            // Date condition; only this one date field name is recognized.
            "DISCHARGEDATE" => Ok(FilterNode::Date {
                operator,
                value: parse_date(value)?,
            }),

            _ => {
                // Enum conditions, keyed by the value token. The identifier
                // and comparison are consumed but not interpreted.
                if let Ok(sex) = SexType::resolve(value) {
                    return Ok(FilterNode::Sex { value: sex });
                }
                if let Ok(stroke) = StrokeType::resolve(value) {
                    return Ok(FilterNode::Stroke { value: stroke });
                }

                // Boolean conditions, keyed by the identifier again.
                if let Ok(property) = BooleanProperty::resolve(&ident) {
                    return Ok(FilterNode::Boolean {
                        property,
                        value: value.eq_ignore_ascii_case("true"),
                    });
                }

                Err(FilterError::UnknownIdentifier(ident))
            }
        }
    }
}

fn parse_int(text: &str) -> FilterResult<i64> {
    text.parse()
        .map_err(|_| FilterError::InvalidNumber(text.to_string()))
}

fn parse_date(text: &str) -> FilterResult<NaiveDate> {
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .map_err(|_| FilterError::InvalidDate(text.to_string()))
}

/// Parses a filter-expression string into a [`FilterNode`].
///
/// Uses the lenient lexer: characters no token rule matches are dropped
/// with a diagnostic. See [`parse_filter_string_strict`] for the variant
/// that rejects them.
pub fn parse_filter_string(input: &str) -> FilterResult<FilterNode> {
    FilterParser::new(tokenize(input)).parse()
}

/// Parses a filter-expression string, failing on unrecognized characters.
pub fn parse_filter_string_strict(input: &str) -> FilterResult<FilterNode> {
    FilterParser::new(tokenize_strict(input)?).parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_conjunction() {
        let node = parse_filter_string("AND(AGE>=50, SEX==MALE)").unwrap();
        assert_eq!(
            node,
            FilterNode::Logical {
                operator: LogicalOp::And,
                children: vec![
                    FilterNode::Age {
                        operator: Comparison::Ge,
                        value: 50,
                    },
                    FilterNode::Sex { value: SexType::Male },
                ],
            }
        );
    }

    #[test]
    fn test_age_dispatch_wins_over_enum_resolution() {
        // AGE is keyed by identifier; the value is parsed as an integer and
        // never tried against the enum families.
        let node = parse_filter_string("AND(AGE>=50)").unwrap();
        match node {
            FilterNode::Logical { children, .. } => {
                assert_eq!(
                    children[0],
                    FilterNode::Age {
                        operator: Comparison::Ge,
                        value: 50,
                    }
                );
            }
            _ => panic!("expected logical root"),
        }
    }

    #[test]
    fn test_nested_filters() {
        let node = parse_filter_string("AND(NIHSS<=4, OR(SEX==MALE, SEX==FEMALE))").unwrap();
        assert_eq!(node.logical_count(), 2);
        assert_eq!(node.leaf_count(), 3);
    }

    #[test]
    fn test_enum_leaf_keyed_by_value_token_not_identifier() {
        // The identifier is irrelevant for sex/stroke leaves.
        let node = parse_filter_string("AND(GENDER==FEMALE)").unwrap();
        match node {
            FilterNode::Logical { children, .. } => {
                assert_eq!(children[0], FilterNode::Sex { value: SexType::Female });
            }
            _ => panic!("expected logical root"),
        }

        let node = parse_filter_string("AND(DIAGNOSIS==TIA)").unwrap();
        match node {
            FilterNode::Logical { children, .. } => {
                assert_eq!(
                    children[0],
                    FilterNode::Stroke {
                        value: StrokeType::TransientIschemic,
                    }
                );
            }
            _ => panic!("expected logical root"),
        }
    }

    #[test]
    fn test_boolean_leaf_keyed_by_identifier() {
        let node = parse_filter_string("AND(THROMBECTOMY==TRUE, THROMBOLYSIS==FALSE)").unwrap();
        match node {
            FilterNode::Logical { children, .. } => {
                assert_eq!(
                    children[0],
                    FilterNode::Boolean {
                        property: BooleanProperty::Thrombectomy,
                        value: true,
                    }
                );
                assert_eq!(
                    children[1],
                    FilterNode::Boolean {
                        property: BooleanProperty::Thrombolysis,
                        value: false,
                    }
                );
            }
            _ => panic!("expected logical root"),
        }
    }

    #[test]
    fn test_not_with_single_child() {
        let node = parse_filter_string("NOT(STROKE==UNDETERMINED)").unwrap();
        assert_eq!(
            node,
            FilterNode::negate(FilterNode::Stroke {
                value: StrokeType::Undetermined,
            })
        );
    }

    #[test]
    fn test_not_with_two_children_violates_arity() {
        let err = parse_filter_string("NOT(SEX==MALE, SEX==FEMALE)").unwrap_err();
        assert!(matches!(err, FilterError::InvariantViolation(_)));
    }

    #[test]
    fn test_empty_argument_list_is_a_syntax_error() {
        // expr_list requires at least one expr; the parser trips on ')'
        // where a condition identifier was expected.
        let err = parse_filter_string("AND()").unwrap_err();
        assert_eq!(
            err,
            FilterError::SyntaxError {
                expected: "IDENT",
                found: ")".to_string(),
                position: 2,
            }
        );
    }

    #[test]
    fn test_unknown_identifier_never_silently_produces_a_leaf() {
        let err = parse_filter_string("AND(FOO==BAR)").unwrap_err();
        assert_eq!(err, FilterError::UnknownIdentifier("FOO".to_string()));
    }

    #[test]
    fn test_exhausted_stream_mid_production() {
        let err = parse_filter_string("AND(AGE>=").unwrap_err();
        assert!(matches!(err, FilterError::SyntaxError { expected: "value", .. }));

        let err = parse_filter_string("AND(AGE>=50").unwrap_err();
        assert!(matches!(err, FilterError::SyntaxError { expected: "RPAREN", .. }));
    }

    #[test]
    fn test_date_condition() {
        let node = parse_filter_string_strict("AND(DISCHARGEDATE>=20230101)");
        // A bare number is not an ISO date.
        assert!(matches!(node, Err(FilterError::InvalidDate(_))));
    }

    #[test]
    fn test_non_numeric_age_value() {
        let err = parse_filter_string("AND(AGE>=MALE)").unwrap_err();
        assert_eq!(err, FilterError::InvalidNumber("MALE".to_string()));
    }

    #[test]
    fn test_strict_parse_rejects_date_punctuation() {
        // ISO dates are not lexable: '-' has no token rule. Strict mode
        // surfaces that instead of silently splitting the number.
        let err = parse_filter_string_strict("AND(DISCHARGEDATE>=2023-01-01)").unwrap_err();
        assert!(matches!(err, FilterError::LexicalGap { character: '-', .. }));
    }
}
