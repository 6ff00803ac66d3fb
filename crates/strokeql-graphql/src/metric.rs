//! Metric field generation.
//!
//! One [`MetricField`] renders as one aliased `metric(metricId: ...)` field
//! with its `kpiGroup`/`kpi1` selection set. Statistics and distribution
//! blocks are opt-in; a distribution request also carries its range into
//! `kpiOptions`, since the backend requires explicit boundaries to bin over.

use strokeql::{DistributionSpec, Kpi, MetricSpec};

/// Statistics selection appended to a metric's `kpi1` field when requested.
const STATS_FIELDS: &[&str] = &[
    "percents",
    "normalizedPercents",
    "cohortSize",
    "normalizedCohortSize",
    "median",
    "mean",
    "variance",
    "confidenceIntervalMean",
    "confidenceIntervalMedian",
    "interquartileRange",
    "quartiles",
];

/// Builder for one metric field of a query document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricField {
    kpi: Kpi,
    alias: Option<String>,
    stats: bool,
    distribution: Option<DistributionSpec>,
    grouped: bool,
}

impl MetricField {
    /// A plain metric field: case count only, default alias.
    pub fn new(kpi: Kpi) -> Self {
        Self {
            kpi,
            alias: None,
            stats: false,
            distribution: None,
            grouped: false,
        }
    }

    /// Builds a field from a resolved metric request.
    pub fn from_spec(spec: &MetricSpec) -> Self {
        Self {
            kpi: spec.kpi,
            alias: None,
            stats: spec.stats,
            distribution: spec.distribution,
            grouped: false,
        }
    }

    /// Overrides the default `metric_<KPI>` alias.
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Includes the descriptive-statistics selection.
    pub fn with_stats(mut self) -> Self {
        self.stats = true;
        self
    }

    /// Includes a histogram selection over the given range.
    pub fn with_distribution(mut self, distribution: DistributionSpec) -> Self {
        self.distribution = Some(distribution);
        self
    }

    /// Includes the `groupedBy` selection. Set on every field of a query
    /// that carries a `groupBy` argument.
    pub fn with_group(mut self) -> Self {
        self.grouped = true;
        self
    }

    /// The KPI this field computes.
    pub fn kpi(&self) -> Kpi {
        self.kpi
    }

    /// Renders the field. Whitespace is normalized at the document level.
    pub fn render(&self) -> String {
        let alias = match &self.alias {
            Some(alias) => alias.clone(),
            None => format!("metric_{}", self.kpi.as_str()),
        };

        let mut kpi_fields = vec!["caseCount".to_string()];
        if self.stats {
            kpi_fields.extend(STATS_FIELDS.iter().map(|f| f.to_string()));
        }
        if let Some(dist) = &self.distribution {
            kpi_fields.push(format!(
                "d1: distribution(binCount: {}) {{ edges caseCount percents normalizedPercents }}",
                dist.bin_count()
            ));
        }

        // A distribution range doubles as the kpiOptions boundaries.
        let kpi_call = match &self.distribution {
            Some(dist) => format!(
                "kpi(kpiOptions: {{lowerBoundary: {}, upperBoundary: {}}})",
                dist.lower(),
                dist.upper()
            ),
            None => "kpi".to_string(),
        };

        let mut group_fields = vec![format!("kpi1: {} {{ {} }}", kpi_call, kpi_fields.join(" "))];
        if self.grouped {
            group_fields.push("groupedBy { groupItemName }".to_string());
        }

        format!(
            "{}: metric(metricId: {}) {{ kpiGroup {{ {} }} }}",
            alias,
            self.kpi.as_str(),
            group_fields.join(" ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_metric_field() {
        let text = MetricField::new(Kpi::Age).render();
        assert_eq!(
            text,
            "metric_AGE: metric(metricId: AGE) { kpiGroup { kpi1: kpi { caseCount } } }"
        );
    }

    #[test]
    fn test_stats_selection_is_appended_in_order() {
        let text = MetricField::new(Kpi::Dtn).with_stats().render();
        assert!(text.contains(
            "caseCount percents normalizedPercents cohortSize normalizedCohortSize median mean \
             variance confidenceIntervalMean confidenceIntervalMedian interquartileRange quartiles"
        ));
    }

    #[test]
    fn test_distribution_carries_bounds_into_kpi_options() {
        let dist = DistributionSpec::new(12, 0, 120).unwrap();
        let text = MetricField::new(Kpi::Dtn).with_distribution(dist).render();
        assert!(text.contains("kpi1: kpi(kpiOptions: {lowerBoundary: 0, upperBoundary: 120})"));
        assert!(text.contains(
            "d1: distribution(binCount: 12) { edges caseCount percents normalizedPercents }"
        ));
    }

    #[test]
    fn test_grouped_field_selects_group_item_name() {
        let text = MetricField::new(Kpi::Age).with_group().render();
        assert!(text.ends_with("groupedBy { groupItemName } } }"));
    }

    #[test]
    fn test_alias_override() {
        let text = MetricField::new(Kpi::Age).with_alias("m1").render();
        assert!(text.starts_with("m1: metric(metricId: AGE)"));
    }

    #[test]
    fn test_from_spec_carries_stats_and_distribution() {
        let spec = MetricSpec {
            kpi: Kpi::Dtn,
            stats: true,
            distribution: Some(DistributionSpec::new(12, 0, 120).unwrap()),
        };
        let field = MetricField::from_spec(&spec);
        let text = field.render();
        assert!(text.contains("median"));
        assert!(text.contains("binCount: 12"));
    }
}
