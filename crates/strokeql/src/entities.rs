//! Entity-list front end.
//!
//! Maps a flat list of extracted `(type, value, role)` entities straight
//! into the canonical [`FilterNode`] / [`MetricsCollection`] pair, bypassing
//! the lexer and parser. Unlike the text parser, this path is lenient: a
//! value that fails alias resolution is dropped with a diagnostic rather
//! than failing the whole request, since extraction upstream is noisy.

use chrono::NaiveDate;

use crate::ast::FilterNode;
use crate::metrics::{DistributionSpec, MetricSpec, MetricsCollection};
use crate::vocab::{BooleanProperty, Comparison, GroupBy, Kpi, SexType, StrokeType};

/// One extracted entity: a declared type, a raw value, and an optional role
/// qualifier (`lower`/`upper` for range-valued types).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExtractedEntity {
    /// Entity type: `kpi`, `sex`, `stroke_type`, `boolean_type`,
    /// `group_by`, `age`, `nihss`, or `date`.
    pub entity: String,
    /// Raw extracted value.
    pub value: String,
    /// Range role for `age`/`nihss`/`date` entities.
    #[cfg_attr(feature = "serde", serde(default))]
    pub role: Option<String>,
}

impl ExtractedEntity {
    /// A role-less entity.
    pub fn new(entity: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            value: value.into(),
            role: None,
        }
    }

    /// An entity with a range role.
    pub fn with_role(
        entity: impl Into<String>,
        value: impl Into<String>,
        role: impl Into<String>,
    ) -> Self {
        Self {
            entity: entity.into(),
            value: value.into(),
            role: Some(role.into()),
        }
    }
}

/// Words whose presence in a user message indicate that categorical values
/// were named to be excluded rather than selected.
const EXCLUSION_KEYWORDS: &[&str] = &[
    "exclude",
    "excluding",
    "but not",
    "except",
    "without",
    "not",
    "dont",
    "don't",
    "remove",
    "skip",
];

/// Heuristic: does the message ask for exclusion of the named values?
pub fn has_exclusion_context(message: &str) -> bool {
    let message = message.to_lowercase();
    EXCLUSION_KEYWORDS
        .iter()
        .any(|keyword| message.contains(keyword))
}

#[derive(Default)]
struct IntRange {
    lower: Option<i64>,
    upper: Option<i64>,
}

#[derive(Default)]
struct DateRange {
    lower: Option<NaiveDate>,
    upper: Option<NaiveDate>,
}

#[derive(Default)]
struct Organized {
    kpis: Vec<String>,
    sexes: Vec<String>,
    strokes: Vec<String>,
    booleans: Vec<String>,
    group_by: Option<String>,
    age: IntRange,
    nihss: IntRange,
    date: DateRange,
}

fn organize(entities: &[ExtractedEntity]) -> Organized {
    let mut organized = Organized::default();

    for entity in entities {
        match entity.entity.as_str() {
            "kpi" => organized.kpis.push(entity.value.clone()),
            "sex" => organized.sexes.push(entity.value.clone()),
            "stroke_type" => organized.strokes.push(entity.value.clone()),
            "boolean_type" => organized.booleans.push(entity.value.clone()),
            "group_by" => organized.group_by = Some(entity.value.clone()),
            "age" => set_int_bound(&mut organized.age, entity),
            "nihss" => set_int_bound(&mut organized.nihss, entity),
            "date" => set_date_bound(&mut organized.date, entity),
            other => {
                tracing::debug!(entity = other, value = %entity.value, "ignoring entity type");
            }
        }
    }

    organized
}

fn set_int_bound(range: &mut IntRange, entity: &ExtractedEntity) {
    let value = match entity.value.trim().parse::<i64>() {
        Ok(v) => v,
        Err(_) => {
            tracing::warn!(entity = %entity.entity, value = %entity.value, "dropping non-integer range value");
            return;
        }
    };
    match entity.role.as_deref() {
        Some("lower") => range.lower = Some(value),
        Some("upper") => range.upper = Some(value),
        _ => {
            tracing::warn!(entity = %entity.entity, value = %entity.value, "dropping range value without lower/upper role");
        }
    }
}

fn set_date_bound(range: &mut DateRange, entity: &ExtractedEntity) {
    let value = match NaiveDate::parse_from_str(entity.value.trim(), "%Y-%m-%d") {
        Ok(v) => v,
        Err(_) => {
            tracing::warn!(value = %entity.value, "dropping non-ISO date value");
            return;
        }
    };
    match entity.role.as_deref() {
        Some("lower") => range.lower = Some(value),
        Some("upper") => range.upper = Some(value),
        _ => {
            tracing::warn!(value = %entity.value, "dropping date value without lower/upper role");
        }
    }
}

/// A group of same-family categorical leaves: absent, a single leaf, or an
/// `OR` over several.
fn categorical_group(leaves: Vec<FilterNode>) -> Option<FilterNode> {
    match leaves.len() {
        0 => None,
        1 => leaves.into_iter().next(),
        _ => FilterNode::or(leaves).ok(),
    }
}

fn build_filter(organized: &Organized, exclusion_context: bool) -> Option<FilterNode> {
    let mut filters = Vec::new();

    // Integer and date ranges: lower bound becomes GE, upper becomes LE.
    if let Some(lower) = organized.age.lower {
        filters.push(FilterNode::Age {
            operator: Comparison::Ge,
            value: lower,
        });
    }
    if let Some(upper) = organized.age.upper {
        filters.push(FilterNode::Age {
            operator: Comparison::Le,
            value: upper,
        });
    }
    if let Some(lower) = organized.nihss.lower {
        filters.push(FilterNode::Nihss {
            operator: Comparison::Ge,
            value: lower,
        });
    }
    if let Some(upper) = organized.nihss.upper {
        filters.push(FilterNode::Nihss {
            operator: Comparison::Le,
            value: upper,
        });
    }
    if let Some(lower) = organized.date.lower {
        filters.push(FilterNode::Date {
            operator: Comparison::Ge,
            value: lower,
        });
    }
    if let Some(upper) = organized.date.upper {
        filters.push(FilterNode::Date {
            operator: Comparison::Le,
            value: upper,
        });
    }

    // Sex values: one leaf passes through, several combine with OR.
    let sex_leaves: Vec<FilterNode> = organized
        .sexes
        .iter()
        .filter_map(|text| match SexType::resolve(text) {
            Ok(value) => Some(FilterNode::Sex { value }),
            Err(_) => {
                tracing::warn!(value = %text, "dropping unknown sex value");
                None
            }
        })
        .collect();
    filters.extend(categorical_group(sex_leaves));

    // Stroke subtypes: under an exclusion context each leaf is negated
    // individually, not the group as a whole.
    let stroke_leaves: Vec<FilterNode> = organized
        .strokes
        .iter()
        .filter_map(|text| match StrokeType::resolve(text) {
            Ok(value) => Some(FilterNode::Stroke { value }),
            Err(_) => {
                tracing::warn!(value = %text, "dropping unknown stroke type");
                None
            }
        })
        .collect();
    if exclusion_context {
        filters.extend(stroke_leaves.into_iter().map(FilterNode::negate));
    } else {
        filters.extend(categorical_group(stroke_leaves));
    }

    // Boolean properties: presence means the property must hold.
    for text in &organized.booleans {
        match BooleanProperty::resolve(text) {
            Ok(property) => filters.push(FilterNode::Boolean {
                property,
                value: true,
            }),
            Err(_) => {
                tracing::warn!(value = %text, "dropping unknown boolean property");
            }
        }
    }

    if filters.is_empty() {
        None
    } else {
        // Always a top-level AND, even over a single leaf.
        FilterNode::and(filters).ok()
    }
}

/// Default enrichment for numeric KPIs: requesting one of these through the
/// entity path implies stats plus a sensible histogram.
fn default_enrichment(kpi: Kpi) -> (bool, Option<DistributionSpec>) {
    let distribution = match kpi {
        Kpi::Age => DistributionSpec::new(10, 0, 100),
        Kpi::Dtn => DistributionSpec::new(12, 0, 120),
        Kpi::Dido => DistributionSpec::new(20, 0, 200),
        Kpi::AdmissionNihss => DistributionSpec::new(21, 0, 21),
        Kpi::Dti => DistributionSpec::new(10, 0, 100),
        _ => return (false, None),
    };
    (true, distribution.ok())
}

fn build_metrics(organized: &Organized) -> MetricsCollection {
    let mut metrics = Vec::new();
    for name in &organized.kpis {
        match Kpi::resolve(name) {
            Ok(kpi) => {
                let (stats, distribution) = default_enrichment(kpi);
                metrics.push(MetricSpec {
                    kpi,
                    stats,
                    distribution,
                });
            }
            Err(_) => {
                tracing::warn!(value = %name, "dropping unknown KPI");
            }
        }
    }

    let group_by = organized.group_by.as_deref().and_then(|text| {
        GroupBy::resolve(text)
            .map_err(|_| {
                tracing::warn!(value = %text, "dropping unknown group-by");
            })
            .ok()
    });

    MetricsCollection { metrics, group_by }
}

/// Builds the filter tree and metric collection from an extracted entity
/// list.
///
/// Range-typed entities (`age`, `nihss`, `date`) use their `lower`/`upper`
/// role to pick the comparison; all collected leaves are combined under a
/// top-level `AND`. When `exclusion_context` is set, stroke-type leaves are
/// each wrapped in their own `NOT`.
pub fn from_entities(
    entities: &[ExtractedEntity],
    exclusion_context: bool,
) -> (Option<FilterNode>, MetricsCollection) {
    let organized = organize(entities);
    let filter = build_filter(&organized, exclusion_context);
    let metrics = build_metrics(&organized);
    (filter, metrics)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocab::LogicalOp;

    #[test]
    fn test_age_range_becomes_ge_and_le() {
        let entities = vec![
            ExtractedEntity::with_role("age", "40", "lower"),
            ExtractedEntity::with_role("age", "60", "upper"),
        ];
        let (filter, _) = from_entities(&entities, false);
        assert_eq!(
            filter.unwrap(),
            FilterNode::Logical {
                operator: LogicalOp::And,
                children: vec![
                    FilterNode::Age {
                        operator: Comparison::Ge,
                        value: 40,
                    },
                    FilterNode::Age {
                        operator: Comparison::Le,
                        value: 60,
                    },
                ],
            }
        );
    }

    #[test]
    fn test_single_categorical_value_passes_through_unwrapped() {
        let entities = vec![ExtractedEntity::new("sex", "MALE")];
        let (filter, _) = from_entities(&entities, false);
        match filter.unwrap() {
            FilterNode::Logical { children, .. } => {
                assert_eq!(children, vec![FilterNode::Sex { value: SexType::Male }]);
            }
            _ => panic!("expected AND root"),
        }
    }

    #[test]
    fn test_multiple_sex_values_combine_with_or() {
        let entities = vec![
            ExtractedEntity::new("sex", "MALE"),
            ExtractedEntity::new("sex", "FEMALE"),
        ];
        let (filter, _) = from_entities(&entities, false);
        match filter.unwrap() {
            FilterNode::Logical { children, .. } => {
                assert_eq!(
                    children[0],
                    FilterNode::Logical {
                        operator: LogicalOp::Or,
                        children: vec![
                            FilterNode::Sex { value: SexType::Male },
                            FilterNode::Sex { value: SexType::Female },
                        ],
                    }
                );
            }
            _ => panic!("expected AND root"),
        }
    }

    #[test]
    fn test_exclusion_negates_each_stroke_leaf_individually() {
        let entities = vec![
            ExtractedEntity::new("stroke_type", "ISCHEMIC"),
            ExtractedEntity::new("stroke_type", "TIA"),
        ];
        let (filter, _) = from_entities(&entities, true);
        match filter.unwrap() {
            FilterNode::Logical { children, .. } => {
                assert_eq!(children.len(), 2);
                assert_eq!(
                    children[0],
                    FilterNode::negate(FilterNode::Stroke {
                        value: StrokeType::Ischemic,
                    })
                );
                assert_eq!(
                    children[1],
                    FilterNode::negate(FilterNode::Stroke {
                        value: StrokeType::TransientIschemic,
                    })
                );
            }
            _ => panic!("expected AND root"),
        }
    }

    #[test]
    fn test_unresolvable_values_are_dropped_not_fatal() {
        let entities = vec![
            ExtractedEntity::new("sex", "MARTIAN"),
            ExtractedEntity::new("stroke_type", "HEADACHE"),
            ExtractedEntity::new("kpi", "NOT_A_KPI"),
            ExtractedEntity::with_role("age", "old", "lower"),
        ];
        let (filter, metrics) = from_entities(&entities, false);
        assert!(filter.is_none());
        assert!(metrics.metrics.is_empty());
    }

    #[test]
    fn test_numeric_kpis_get_default_stats_and_distribution() {
        let entities = vec![ExtractedEntity::new("kpi", "DTN")];
        let (_, metrics) = from_entities(&entities, false);
        let metric = &metrics.metrics[0];
        assert_eq!(metric.kpi, Kpi::Dtn);
        assert!(metric.stats);
        let dist = metric.distribution.unwrap();
        assert_eq!(dist.bin_count(), 12);
        assert_eq!(dist.upper(), 120);
    }

    #[test]
    fn test_categorical_kpis_get_no_enrichment() {
        let entities = vec![ExtractedEntity::new("kpi", "SEX")];
        let (_, metrics) = from_entities(&entities, false);
        assert!(!metrics.metrics[0].stats);
        assert!(metrics.metrics[0].distribution.is_none());
    }

    #[test]
    fn test_group_by_resolution() {
        let entities = vec![
            ExtractedEntity::new("kpi", "AGE"),
            ExtractedEntity::new("group_by", "first contact place"),
        ];
        let (_, metrics) = from_entities(&entities, false);
        assert_eq!(metrics.group_by, Some(GroupBy::FirstContactPlace));
    }

    #[test]
    fn test_date_range() {
        let entities = vec![
            ExtractedEntity::with_role("date", "2023-01-01", "lower"),
            ExtractedEntity::with_role("date", "2023-12-31", "upper"),
        ];
        let (filter, _) = from_entities(&entities, false);
        match filter.unwrap() {
            FilterNode::Logical { children, .. } => {
                assert!(matches!(
                    children[0],
                    FilterNode::Date {
                        operator: Comparison::Ge,
                        ..
                    }
                ));
                assert!(matches!(
                    children[1],
                    FilterNode::Date {
                        operator: Comparison::Le,
                        ..
                    }
                ));
            }
            _ => panic!("expected AND root"),
        }
    }

    #[test]
    fn test_exclusion_context_heuristic() {
        assert!(has_exclusion_context("show DTN but not stroke mimics"));
        assert!(has_exclusion_context("DTN excluding TIA"));
        assert!(!has_exclusion_context("show me DTN by sex"));
    }
}
