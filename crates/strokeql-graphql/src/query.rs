//! Query document assembly.
//!
//! [`QueryRequest`] collects metric fields, an optional case filter, and the
//! query-level arguments, then renders the single-line `getMetrics` document
//! the backend expects. Every render ends with [`clean_query`], so the
//! output is stable under exact-text comparison regardless of how the
//! intermediate pieces were spaced.

use strokeql::{FilterNode, GroupBy};

use crate::filter::render_filter;
use crate::metric::MetricField;

/// Reporting window of a query. The defaults are the open interval the
/// backend treats as "all time".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimePeriod {
    /// Inclusive ISO start date.
    pub start_date: String,
    /// Inclusive ISO end date.
    pub end_date: String,
}

impl Default for TimePeriod {
    fn default() -> Self {
        Self {
            start_date: "1000-01-01".to_string(),
            end_date: "9999-12-31".to_string(),
        }
    }
}

/// Which provider groups to read cases from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataOrigin {
    /// Provider group identifiers.
    pub provider_group_ids: Vec<i64>,
}

impl Default for DataOrigin {
    fn default() -> Self {
        Self {
            provider_group_ids: vec![1],
        }
    }
}

/// Builder for a complete `getMetrics` query document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryRequest {
    metrics: Vec<MetricField>,
    case_filter: Option<FilterNode>,
    group_by: Option<GroupBy>,
    time_period: TimePeriod,
    data_origin: DataOrigin,
    general_stats: bool,
}

impl QueryRequest {
    /// An empty request over the default time period and data origin.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one metric field.
    pub fn metric(mut self, metric: MetricField) -> Self {
        self.metrics.push(metric);
        self
    }

    /// Adds several metric fields.
    pub fn metrics(mut self, metrics: impl IntoIterator<Item = MetricField>) -> Self {
        self.metrics.extend(metrics);
        self
    }

    /// Sets the case filter.
    pub fn filter(mut self, filter: FilterNode) -> Self {
        self.case_filter = Some(filter);
        self
    }

    /// Sets the grouping dimension. Rendering then also selects `groupedBy`
    /// on every metric field.
    pub fn group_by(mut self, group_by: GroupBy) -> Self {
        self.group_by = Some(group_by);
        self
    }

    /// Overrides the default time period.
    pub fn time_period(mut self, time_period: TimePeriod) -> Self {
        self.time_period = time_period;
        self
    }

    /// Overrides the default data origin.
    pub fn data_origin(mut self, data_origin: DataOrigin) -> Self {
        self.data_origin = data_origin;
        self
    }

    /// Also selects the general-statistics block (total and filtered case
    /// counts over the period).
    pub fn with_general_stats(mut self) -> Self {
        self.general_stats = true;
        self
    }

    /// Renders the normalized single-line query document.
    pub fn render(&self) -> String {
        let mut filter_args = vec![
            format!(
                "timePeriod: {{ startDate: \"{}\", endDate: \"{}\" }}",
                self.time_period.start_date, self.time_period.end_date
            ),
            format!(
                "dataOrigin: {{providerGroupId: [{}]}}",
                self.data_origin
                    .provider_group_ids
                    .iter()
                    .map(i64::to_string)
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        ];
        if let Some(filter) = &self.case_filter {
            filter_args.push(format!("caseFilter: {}", render_filter(filter)));
        }

        let mut query_args = vec![format!("filter: {{{}}}", filter_args.join(", "))];
        if let Some(group_by) = self.group_by {
            // groupBy is an enum argument; rendered without quotes.
            query_args.push(format!("groupBy: {}", group_by.as_str()));
        }

        let mut fields: Vec<String> = self
            .metrics
            .iter()
            .map(|metric| {
                if self.group_by.is_some() {
                    metric.clone().with_group().render()
                } else {
                    metric.render()
                }
            })
            .collect();
        if self.general_stats {
            fields.push(
                "generalStatsGroup { generalStatistics { casesInPeriod filteredCasesInPeriod } }"
                    .to_string(),
            );
        }

        let document = format!(
            "query {{ getMetrics({}) {{ {} }} }}",
            query_args.join(", "),
            fields.join(" ")
        );
        clean_query(&document)
    }
}

/// Normalizes a query document to its canonical single-line form: runs of
/// whitespace collapse to one space and every brace gets exactly one space
/// on each side, then the ends are trimmed.
pub fn clean_query(query: &str) -> String {
    let mut out = String::with_capacity(query.len());
    let mut pending_space = false;

    for c in query.chars() {
        if c.is_whitespace() {
            pending_space = true;
            continue;
        }
        if c == '{' || c == '}' {
            if !out.is_empty() && !out.ends_with(' ') {
                out.push(' ');
            }
            out.push(c);
            out.push(' ');
            pending_space = false;
            continue;
        }
        if pending_space && !out.is_empty() && !out.ends_with(' ') {
            out.push(' ');
        }
        pending_space = false;
        out.push(c);
    }

    out.trim().to_string()
}
