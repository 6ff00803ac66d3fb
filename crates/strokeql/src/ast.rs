//! Canonical filter AST.
//!
//! Both front ends (the text parser and the entity-list adapter) produce this
//! one tagged union, and the query compiler consumes it directly. Nodes are
//! built once, validated at construction, and never mutated afterwards.

use chrono::NaiveDate;

use crate::error::{FilterError, FilterResult};
use crate::vocab::{BooleanProperty, Comparison, LogicalOp, SexType, StrokeType};

/// A boolean case-filter tree.
///
/// `Logical` nodes combine children with `AND`/`OR`/`NOT`; every other
/// variant is a non-decomposable leaf condition. The checked constructors
/// ([`logical`](Self::logical) and friends) enforce the arity invariants
/// (`AND`/`OR` need at least one child, `NOT` exactly one), so a tree built
/// through them is always compilable.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FilterNode {
    /// `AND`/`OR`/`NOT` combinator over child filters.
    Logical {
        /// The combinator.
        operator: LogicalOp,
        /// Child filters. Non-empty; exactly one for `NOT`.
        children: Vec<FilterNode>,
    },
    /// Patient age in years, compared against an integer threshold.
    Age {
        /// Comparison operator.
        operator: Comparison,
        /// Age in years.
        value: i64,
    },
    /// Admission NIHSS score (stroke severity, conventionally 0-42).
    Nihss {
        /// Comparison operator.
        operator: Comparison,
        /// NIHSS score.
        value: i64,
    },
    /// Discharge date compared against a calendar date.
    Date {
        /// Comparison operator.
        operator: Comparison,
        /// ISO-8601 calendar date.
        value: NaiveDate,
    },
    /// Patient sex.
    Sex {
        /// The sex to match.
        value: SexType,
    },
    /// Stroke subtype.
    Stroke {
        /// The subtype to match.
        value: StrokeType,
    },
    /// Named yes/no clinical property.
    Boolean {
        /// Which property.
        property: BooleanProperty,
        /// Required value of the property.
        value: bool,
    },
}

impl FilterNode {
    /// Builds a `Logical` node, enforcing the arity invariants.
    pub fn logical(operator: LogicalOp, children: Vec<FilterNode>) -> FilterResult<Self> {
        if children.is_empty() {
            return Err(FilterError::InvariantViolation(format!(
                "{operator} node requires at least one child"
            )));
        }
        if operator == LogicalOp::Not && children.len() != 1 {
            return Err(FilterError::InvariantViolation(format!(
                "NOT node requires exactly one child, got {}",
                children.len()
            )));
        }
        Ok(FilterNode::Logical { operator, children })
    }

    /// Builds an `AND` node over the given children.
    pub fn and(children: Vec<FilterNode>) -> FilterResult<Self> {
        Self::logical(LogicalOp::And, children)
    }

    /// Builds an `OR` node over the given children.
    pub fn or(children: Vec<FilterNode>) -> FilterResult<Self> {
        Self::logical(LogicalOp::Or, children)
    }

    /// Wraps a single child in a `NOT` node.
    pub fn negate(child: FilterNode) -> Self {
        FilterNode::Logical {
            operator: LogicalOp::Not,
            children: vec![child],
        }
    }

    /// Number of `Logical` nodes in this tree.
    pub fn logical_count(&self) -> usize {
        match self {
            FilterNode::Logical { children, .. } => {
                1 + children.iter().map(FilterNode::logical_count).sum::<usize>()
            }
            _ => 0,
        }
    }

    /// Number of leaf conditions in this tree.
    pub fn leaf_count(&self) -> usize {
        match self {
            FilterNode::Logical { children, .. } => {
                children.iter().map(FilterNode::leaf_count).sum()
            }
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logical_rejects_empty_children() {
        let err = FilterNode::and(vec![]).unwrap_err();
        assert!(matches!(err, FilterError::InvariantViolation(_)));
    }

    #[test]
    fn test_not_requires_exactly_one_child() {
        let leaf = FilterNode::Sex { value: SexType::Male };
        let err = FilterNode::logical(LogicalOp::Not, vec![leaf.clone(), leaf]).unwrap_err();
        assert!(matches!(err, FilterError::InvariantViolation(_)));
    }

    #[test]
    fn test_negate_wraps_one_child() {
        let node = FilterNode::negate(FilterNode::Stroke {
            value: StrokeType::Undetermined,
        });
        match node {
            FilterNode::Logical { operator, children } => {
                assert_eq!(operator, LogicalOp::Not);
                assert_eq!(children.len(), 1);
            }
            _ => panic!("expected logical node"),
        }
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_filter_node_serde_round_trip() {
        let tree = FilterNode::and(vec![
            FilterNode::Age {
                operator: Comparison::Ge,
                value: 50,
            },
            FilterNode::Sex { value: SexType::Male },
        ])
        .unwrap();

        let json = serde_json::to_string(&tree).unwrap();
        let back: FilterNode = serde_json::from_str(&json).unwrap();
        assert_eq!(back, tree);
    }

    #[test]
    fn test_node_counts() {
        let tree = FilterNode::and(vec![
            FilterNode::Age {
                operator: Comparison::Ge,
                value: 50,
            },
            FilterNode::negate(FilterNode::Sex { value: SexType::Male }),
        ])
        .unwrap();

        assert_eq!(tree.logical_count(), 2);
        assert_eq!(tree.leaf_count(), 2);
    }
}
