//! Metric requests: KPIs, statistics flags, distributions, grouping.
//!
//! Two things live here: the metric data model ([`MetricSpec`],
//! [`DistributionSpec`], [`MetricsCollection`]) and the command-style front
//! end that builds it from a `/query`-shaped token list
//! (`KPI words... -filter ... -group ... -distribution ... -stats`).

use std::collections::HashMap;

use crate::error::{FilterError, FilterResult};
use crate::vocab::{GroupBy, Kpi};

/// Histogram request over a metric's numeric range.
///
/// Construction validates `bin_count > 0` and `lower < upper`; a violated
/// bound is an error, never a silent clamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DistributionSpec {
    bin_count: u32,
    lower: i64,
    upper: i64,
}

impl DistributionSpec {
    /// Creates a distribution spec, rejecting degenerate ranges.
    pub fn new(bin_count: u32, lower: i64, upper: i64) -> FilterResult<Self> {
        if bin_count == 0 {
            return Err(FilterError::InvariantViolation(
                "bin count must be an integer greater than 0".to_string(),
            ));
        }
        if lower >= upper {
            return Err(FilterError::InvariantViolation(format!(
                "lower bound {lower} must be less than upper bound {upper}"
            )));
        }
        Ok(Self {
            bin_count,
            lower,
            upper,
        })
    }

    /// Number of histogram bins.
    pub fn bin_count(&self) -> u32 {
        self.bin_count
    }

    /// Lower bound of the range.
    pub fn lower(&self) -> i64 {
        self.lower
    }

    /// Upper bound of the range.
    pub fn upper(&self) -> i64 {
        self.upper
    }
}

/// One requested metric: the KPI, whether to include descriptive statistics,
/// and an optional histogram request.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct MetricSpec {
    /// The KPI to compute.
    pub kpi: Kpi,
    /// Include min/max/mean/median/quartile statistics.
    pub stats: bool,
    /// Optional histogram request.
    pub distribution: Option<DistributionSpec>,
}

impl MetricSpec {
    /// A plain metric request with no stats and no distribution.
    pub fn new(kpi: Kpi) -> Self {
        Self {
            kpi,
            stats: false,
            distribution: None,
        }
    }
}

/// The full metric side of a query: requested metrics plus an optional
/// grouping dimension.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct MetricsCollection {
    /// Requested metrics, in request order.
    pub metrics: Vec<MetricSpec>,
    /// Optional server-side grouping dimension.
    pub group_by: Option<GroupBy>,
}

/// Parses `KPI:bins:lower:upper` distribution specs into a lookup keyed by
/// the upper-cased KPI field.
///
/// The key is matched textually against each metric's canonical KPI
/// spelling later; a spec whose key matches no requested metric is simply
/// ignored.
fn parse_distribution_specs(specs: &[String]) -> FilterResult<HashMap<String, DistributionSpec>> {
    let mut map = HashMap::new();
    for spec in specs {
        let fields: Vec<&str> = spec.split(':').collect();
        if fields.len() != 4 {
            return Err(FilterError::InvalidDistributionSpec {
                spec: spec.clone(),
                reason: format!("expected 4 colon-separated fields, got {}", fields.len()),
            });
        }
        let bin_count = parse_field(spec, fields[1], "bin count")?;
        let bin_count =
            u32::try_from(bin_count).map_err(|_| FilterError::InvalidDistributionSpec {
                spec: spec.clone(),
                reason: format!("bin count '{}' is out of range", fields[1]),
            })?;
        let lower = parse_field(spec, fields[2], "lower bound")?;
        let upper = parse_field(spec, fields[3], "upper bound")?;
        let distribution = DistributionSpec::new(bin_count, lower, upper).map_err(|e| {
            FilterError::InvalidDistributionSpec {
                spec: spec.clone(),
                reason: e.to_string(),
            }
        })?;
        map.insert(fields[0].to_ascii_uppercase(), distribution);
    }
    Ok(map)
}

fn parse_field(spec: &str, field: &str, what: &str) -> FilterResult<i64> {
    field
        .trim()
        .parse()
        .map_err(|_| FilterError::InvalidDistributionSpec {
            spec: spec.to_string(),
            reason: format!("{what} '{field}' is not an integer"),
        })
}

/// Resolves bare metric words against the KPI family and attaches matching
/// distribution specs and the stats flag.
pub fn parse_metrics(
    metrics: &[String],
    distribution: &[String],
    stats: bool,
) -> FilterResult<Vec<MetricSpec>> {
    let dist_map = parse_distribution_specs(distribution)?;

    let mut result = Vec::with_capacity(metrics.len());
    for name in metrics {
        let kpi = Kpi::resolve(name).map_err(|_| FilterError::UnknownKpi(name.clone()))?;
        result.push(MetricSpec {
            kpi,
            stats,
            distribution: dist_map.get(kpi.as_str()).copied(),
        });
    }
    Ok(result)
}

/// Builds a [`MetricsCollection`] from the raw command pieces.
pub fn build_metrics_collection(
    metrics: &[String],
    distribution: &[String],
    stats: bool,
    group: Option<&str>,
) -> FilterResult<MetricsCollection> {
    let parsed = parse_metrics(metrics, distribution, stats)?;

    let group_by = match group {
        Some(text) => Some(
            GroupBy::resolve(text).map_err(|_| FilterError::UnknownGroupBy(text.to_string()))?,
        ),
        None => None,
    };

    Ok(MetricsCollection {
        metrics: parsed,
        group_by,
    })
}

/// A `/query`-style command split into its parts, before any resolution.
///
/// Shape: bare KPI words first, then flags, each introduced by ` -`:
///
/// ```text
/// /query AGE DTN -filter AND(AGE>=50, SEX==MALE) -stats
///        -distribution DTN:10:0:120 -group FIRST_CONTACT_PLACE
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QueryCommand {
    /// Bare metric words preceding the first flag.
    pub metrics: Vec<String>,
    /// `-filter` payload: a filter-expression string.
    pub filter: Option<String>,
    /// `-group` payload: a group-by name.
    pub group: Option<String>,
    /// `-distribution` payload: whitespace-separated `KPI:bins:lower:upper`
    /// specs.
    pub distribution: Vec<String>,
    /// `-stats` flag.
    pub stats: bool,
}

impl QueryCommand {
    /// Splits a raw command string into its flag segments.
    ///
    /// An optional leading `/query` is stripped. Flags are recognized at
    /// ` -` boundaries, so filter expressions containing spaces survive
    /// intact.
    pub fn parse(command: &str) -> Self {
        let mut command = command.trim();
        if let Some(stripped) = command.strip_prefix("/query") {
            command = stripped.trim();
        }

        let mut segments = Vec::new();
        let mut start = 0;
        for (idx, _) in command.match_indices(" -") {
            if idx > start {
                segments.push(&command[start..idx]);
                start = idx;
            }
        }
        segments.push(&command[start..]);

        let mut parsed = QueryCommand {
            metrics: segments[0].split_whitespace().map(str::to_string).collect(),
            ..QueryCommand::default()
        };

        for segment in &segments[1..] {
            let segment = segment.trim();
            if let Some(rest) = segment.strip_prefix("-filter") {
                parsed.filter = Some(rest.trim().to_string());
            } else if let Some(rest) = segment.strip_prefix("-group") {
                parsed.group = Some(rest.trim().to_string());
            } else if let Some(rest) = segment.strip_prefix("-distribution") {
                parsed.distribution = rest.split_whitespace().map(str::to_string).collect();
            } else if segment.starts_with("-stats") {
                parsed.stats = true;
            }
        }

        parsed
    }

    /// Resolves this command's metric side into a [`MetricsCollection`].
    pub fn metrics_collection(&self) -> FilterResult<MetricsCollection> {
        build_metrics_collection(
            &self.metrics,
            &self.distribution,
            self.stats,
            self.group.as_deref(),
        )
    }
}
