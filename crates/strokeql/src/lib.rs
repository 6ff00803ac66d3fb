//! # strokeql
//!
//! A filter-expression language and metric-request model for stroke-registry
//! analytics.
//!
//! This crate provides:
//! - **Filter parser**: Lex and parse boolean filter expressions like
//!   `AND(AGE>=50, SEX==MALE)` into a validated [`FilterNode`] tree
//! - **Vocabulary registry**: Closed enums for every domain concept (KPIs,
//!   sex, stroke subtype, boolean clinical properties, grouping dimensions),
//!   each resolving from a canonical spelling plus free-text aliases
//! - **Metric model**: [`MetricSpec`] / [`MetricsCollection`] describing
//!   which KPIs to compute, with optional statistics and histogram requests,
//!   plus the `/query` command front end that builds them
//! - **Entity adapter**: A lenient front end mapping extracted
//!   `(type, value, role)` entity lists onto the same filter and metric model
//!
//! ## Filter expressions
//!
//! ```rust
//! use strokeql::parse_filter_string;
//!
//! let filter = parse_filter_string("AND(AGE>=50, SEX==MALE)").unwrap();
//! assert_eq!(filter.leaf_count(), 2);
//! ```
//!
//! ## Command parsing
//!
//! ```rust
//! use strokeql::QueryCommand;
//!
//! let cmd = QueryCommand::parse("/query DTN -stats -distribution DTN:12:0:120");
//! let metrics = cmd.metrics_collection().unwrap();
//! assert!(metrics.metrics[0].stats);
//! ```
//!
//! ## Grammar quick reference
//!
//! ```text
//! filter      := OPERATOR '(' expr_list ')'
//! expr_list   := expr (',' expr)*
//! expr        := filter | condition
//! condition   := IDENT COMPARISON value
//! ```
//!
//! | Condition | Keyed by | Example |
//! |-----------|----------|---------|
//! | Age | identifier `AGE` | `AGE>=50` |
//! | NIHSS | identifier `NIHSS` | `NIHSS<=4` |
//! | Discharge date | identifier `DISCHARGEDATE` | `DISCHARGEDATE>=DATE` |
//! | Sex | value token | `SEX==MALE` |
//! | Stroke subtype | value token | `STROKE==TIA` |
//! | Boolean property | identifier | `THROMBECTOMY==TRUE` |

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod ast;
mod entities;
mod error;
mod lexer;
mod metrics;
mod parser;
pub mod vocab;

pub use ast::FilterNode;
pub use entities::{from_entities, has_exclusion_context, ExtractedEntity};
pub use error::{FilterError, FilterResult};
pub use lexer::{tokenize, tokenize_strict, Token, TokenKind};
pub use metrics::{
    build_metrics_collection, parse_metrics, DistributionSpec, MetricSpec, MetricsCollection,
    QueryCommand,
};
pub use parser::{parse_filter_string, parse_filter_string_strict, FilterParser};
pub use vocab::{
    BooleanProperty, Comparison, GroupBy, Kpi, LogicalOp, SexType, StrokeType,
};
