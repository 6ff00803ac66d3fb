//! Case-filter text generation.
//!
//! Renders a [`FilterNode`] tree as the backend's `caseFilter` argument
//! text. Quoting follows the backend's input schema exactly: logical
//! operators and enum values are bare identifiers, integer-filter and
//! date-filter properties and operators are quoted strings, and date values
//! are quoted while integers are not.

use strokeql::FilterNode;

/// Renders a filter tree as `caseFilter` argument text.
///
/// Output is not whitespace-normalized; the document-level clean pass in
/// [`clean_query`](crate::clean_query) takes care of that.
pub fn render_filter(node: &FilterNode) -> String {
    match node {
        FilterNode::Logical { operator, children } => {
            let children: Vec<String> = children.iter().map(render_filter).collect();
            format!(
                "{{ node: {{ logicalOperator: {}, children: [{}] }} }}",
                operator.as_str(),
                children.join(", ")
            )
        }
        FilterNode::Age { operator, value } => format!(
            "{{ leaf: {{ integerCaseFilter: {{ property: \"AGE\", operator: \"{}\", value: {} }} }} }}",
            operator.as_str(),
            value
        ),
        FilterNode::Nihss { operator, value } => format!(
            "{{ leaf: {{ integerCaseFilter: {{ property: \"ADMISSION_NIHSS\", operator: \"{}\", value: {} }} }} }}",
            operator.as_str(),
            value
        ),
        FilterNode::Date { operator, value } => format!(
            "{{ leaf: {{ dateCaseFilter: {{ property: \"DISCHARGE_DATE\", operator: \"{}\", value: \"{}\" }} }} }}",
            operator.as_str(),
            value.format("%Y-%m-%d")
        ),
        FilterNode::Sex { value } => format!(
            "{{ leaf: {{ enumCaseFilter: {{ sexType: {{ values: [{}], contains: true }} }} }} }}",
            value.as_str()
        ),
        FilterNode::Stroke { value } => format!(
            "{{ leaf: {{ enumCaseFilter: {{ strokeType: {{ values: [{}], contains: true }} }} }} }}",
            value.as_str()
        ),
        FilterNode::Boolean { property, value } => format!(
            "{{ leaf: {{ booleanCaseFilter: {{ property: \"{}\", value: {} }} }} }}",
            property.as_str(),
            value
        ),
    }
}
