//! # strokeql-graphql
//!
//! Compiles [`strokeql`] filter trees and metric collections into the
//! stroke-registry backend's `getMetrics` query-document text.
//!
//! The compiler is deterministic and side-effect-free: the same inputs
//! always produce byte-identical output, and rendering never fails on trees
//! built through [`strokeql`]'s checked constructors.
//!
//! ```rust
//! use strokeql::{parse_filter_string, QueryCommand};
//! use strokeql_graphql::compile;
//!
//! let cmd = QueryCommand::parse("/query DTN -filter AND(AGE>=50, SEX==MALE) -stats");
//! let metrics = cmd.metrics_collection().unwrap();
//! let filter = parse_filter_string(cmd.filter.as_deref().unwrap()).unwrap();
//!
//! let query = compile(&metrics, Some(&filter));
//! assert!(query.starts_with("query { getMetrics("));
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod filter;
mod metric;
mod query;

pub use filter::render_filter;
pub use metric::MetricField;
pub use query::{clean_query, DataOrigin, QueryRequest, TimePeriod};

use strokeql::{parse_filter_string, FilterNode, FilterResult, MetricsCollection, QueryCommand};

/// Compiles a metric collection and an optional case filter into query text
/// over the default time period and data origin.
pub fn compile(metrics: &MetricsCollection, filter: Option<&FilterNode>) -> String {
    let mut request = QueryRequest::new().metrics(metrics.metrics.iter().map(MetricField::from_spec));
    if let Some(filter) = filter {
        request = request.filter(filter.clone());
    }
    if let Some(group_by) = metrics.group_by {
        request = request.group_by(group_by);
    }
    request.render()
}

/// Parses a `/query`-style command string and compiles it in one step.
pub fn compile_command(command: &str) -> FilterResult<String> {
    let command = QueryCommand::parse(command);
    let metrics = command.metrics_collection()?;
    let filter = match command.filter.as_deref() {
        Some(text) => Some(parse_filter_string(text)?),
        None => None,
    };
    Ok(compile(&metrics, filter.as_ref()))
}
