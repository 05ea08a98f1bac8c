//! Filter tree type definitions
//!
//! A grid filter is a tree: leaves carry one `field operator value`
//! condition, branches combine their children with `and`/`or`.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Operator tag of a leaf condition
///
/// Tags are matched exactly and case-sensitively. Anything else is kept
/// verbatim in `Unrecognized` and translates to the pass-through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterOperator {
    IsNull,
    IsNotNull,
    Eq,
    Neq,
    Lt,
    Lte,
    Gt,
    Gte,
    StartsWith,
    DoesNotStartWith,
    Contains,
    DoesNotContain,
    IsEmpty,
    IsNotEmpty,
    Unrecognized(String),
}

impl FilterOperator {
    pub fn parse(tag: &str) -> Self {
        match tag {
            "isnull" => Self::IsNull,
            "isnotnull" => Self::IsNotNull,
            "eq" => Self::Eq,
            "neq" => Self::Neq,
            "lt" => Self::Lt,
            "lte" => Self::Lte,
            "gt" => Self::Gt,
            "gte" => Self::Gte,
            "startswith" => Self::StartsWith,
            "doesnotstartwith" => Self::DoesNotStartWith,
            "contains" => Self::Contains,
            "doesnotcontain" => Self::DoesNotContain,
            "isempty" => Self::IsEmpty,
            "isnotempty" => Self::IsNotEmpty,
            other => Self::Unrecognized(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::IsNull => "isnull",
            Self::IsNotNull => "isnotnull",
            Self::Eq => "eq",
            Self::Neq => "neq",
            Self::Lt => "lt",
            Self::Lte => "lte",
            Self::Gt => "gt",
            Self::Gte => "gte",
            Self::StartsWith => "startswith",
            Self::DoesNotStartWith => "doesnotstartwith",
            Self::Contains => "contains",
            Self::DoesNotContain => "doesnotcontain",
            Self::IsEmpty => "isempty",
            Self::IsNotEmpty => "isnotempty",
            Self::Unrecognized(tag) => tag,
        }
    }

    /// Operators that only make sense against a string value
    pub fn is_string_only(&self) -> bool {
        matches!(
            self,
            Self::StartsWith
                | Self::DoesNotStartWith
                | Self::Contains
                | Self::DoesNotContain
                | Self::IsEmpty
                | Self::IsNotEmpty
        )
    }
}

impl Default for FilterOperator {
    fn default() -> Self {
        Self::Unrecognized(String::new())
    }
}

impl From<String> for FilterOperator {
    fn from(tag: String) -> Self {
        Self::parse(&tag)
    }
}

impl From<FilterOperator> for String {
    fn from(op: FilterOperator) -> Self {
        op.as_str().to_string()
    }
}

impl fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How a branch combines its children
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Logic {
    And,
    Or,
    #[default]
    Unset,
}

impl Logic {
    /// Parse a logic tag; anything but `and`/`or` is `Unset`
    pub fn parse(tag: &str) -> Self {
        match tag {
            "and" => Self::And,
            "or" => Self::Or,
            _ => Self::Unset,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::And => "and",
            Self::Or => "or",
            Self::Unset => "",
        }
    }
}

impl fmt::Display for Logic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Single `field operator value` condition
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterLeaf {
    pub field: String,
    pub operator: FilterOperator,
    pub value: Value,
}

impl FilterLeaf {
    pub fn new(field: impl Into<String>, operator: &str, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            operator: FilterOperator::parse(operator),
            value: value.into(),
        }
    }
}

/// Children combined by a logic tag
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterBranch {
    pub logic: Logic,
    pub filters: Vec<FilterNode>,
}

/// Node of a grid filter tree
///
/// Deserializes from the grid wire shape: a node whose `filters` list is
/// missing or empty is a leaf, any other node is a branch.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(from = "WireFilter", into = "WireFilter")]
pub enum FilterNode {
    Leaf(FilterLeaf),
    Branch(FilterBranch),
}

impl Default for FilterNode {
    fn default() -> Self {
        Self::Leaf(FilterLeaf::default())
    }
}

impl FilterNode {
    pub fn leaf(field: impl Into<String>, operator: &str, value: impl Into<Value>) -> Self {
        Self::Leaf(FilterLeaf::new(field, operator, value))
    }

    pub fn branch(logic: Logic, filters: Vec<FilterNode>) -> Self {
        Self::Branch(FilterBranch { logic, filters })
    }

    pub fn and(filters: Vec<FilterNode>) -> Self {
        Self::branch(Logic::And, filters)
    }

    pub fn or(filters: Vec<FilterNode>) -> Self {
        Self::branch(Logic::Or, filters)
    }

    /// Rewrite every leaf in place
    ///
    /// The handler receives each leaf by value and returns its replacement,
    /// which may be a new branch (e.g. one equality expanded into a range).
    /// Replacements are not visited again.
    pub fn handle<F>(&mut self, mut handler: F)
    where
        F: FnMut(FilterLeaf) -> FilterNode,
    {
        self.handle_with(&mut handler);
    }

    fn handle_with<F>(&mut self, handler: &mut F)
    where
        F: FnMut(FilterLeaf) -> FilterNode,
    {
        match self {
            Self::Branch(branch) => {
                for child in &mut branch.filters {
                    child.handle_with(handler);
                }
            }
            Self::Leaf(leaf) => {
                let leaf = std::mem::take(leaf);
                *self = handler(leaf);
            }
        }
    }

    /// Rewrite only the field name of every leaf
    pub fn handle_field<F>(&mut self, mut mapper: F)
    where
        F: FnMut(&str) -> String,
    {
        self.handle(|mut leaf| {
            leaf.field = mapper(&leaf.field);
            FilterNode::Leaf(leaf)
        });
    }

    /// Copy this tree into `dest`, sharing no storage with the source
    pub fn deep_copy_into(&self, dest: &mut FilterNode) {
        dest.clone_from(self);
    }

    /// Visit every leaf without modifying the tree
    pub fn leaves(&self) -> Vec<&FilterLeaf> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a FilterLeaf>) {
        match self {
            Self::Leaf(leaf) => out.push(leaf),
            Self::Branch(branch) => {
                for child in &branch.filters {
                    child.collect_leaves(out);
                }
            }
        }
    }

    /// Depth of the tree (a lone leaf has depth 1)
    pub fn depth(&self) -> usize {
        match self {
            Self::Leaf(_) => 1,
            Self::Branch(branch) => 1 + branch.filters.iter().map(Self::depth).max().unwrap_or(0),
        }
    }

    /// Total number of nodes, branches included
    pub fn node_count(&self) -> usize {
        match self {
            Self::Leaf(_) => 1,
            Self::Branch(branch) => 1 + branch.filters.iter().map(Self::node_count).sum::<usize>(),
        }
    }
}

/// Grid wire shape of a filter node
///
/// Tags are optional so that an explicit `null` degrades like an unknown
/// tag instead of failing the whole request.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
struct WireFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    operator: Option<String>,
    #[serde(skip_serializing_if = "Value::is_null")]
    value: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    filters: Option<Vec<FilterNode>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    logic: Option<String>,
}

impl From<WireFilter> for FilterNode {
    fn from(wire: WireFilter) -> Self {
        match wire.filters {
            Some(filters) if !filters.is_empty() => Self::Branch(FilterBranch {
                logic: Logic::parse(wire.logic.as_deref().unwrap_or_default()),
                filters,
            }),
            _ => Self::Leaf(FilterLeaf {
                field: wire.field.unwrap_or_default(),
                operator: FilterOperator::from(wire.operator.unwrap_or_default()),
                value: wire.value,
            }),
        }
    }
}

impl From<FilterNode> for WireFilter {
    fn from(node: FilterNode) -> Self {
        match node {
            FilterNode::Leaf(leaf) => Self {
                field: Some(leaf.field),
                operator: Some(leaf.operator.into()),
                value: leaf.value,
                ..Self::default()
            },
            FilterNode::Branch(branch) => Self {
                logic: Some(branch.logic.as_str().to_string()),
                filters: Some(branch.filters),
                ..Self::default()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> FilterNode {
        FilterNode::and(vec![
            FilterNode::leaf("Name", "eq", "Hari"),
            FilterNode::leaf("Age", "eq", 25),
        ])
    }

    #[test]
    fn operator_tags_round_trip() {
        for tag in [
            "isnull",
            "isnotnull",
            "eq",
            "neq",
            "lt",
            "lte",
            "gt",
            "gte",
            "startswith",
            "doesnotstartwith",
            "contains",
            "doesnotcontain",
            "isempty",
            "isnotempty",
        ] {
            let op = FilterOperator::parse(tag);
            assert!(!matches!(op, FilterOperator::Unrecognized(_)), "{tag}");
            assert_eq!(op.as_str(), tag);
        }
    }

    #[test]
    fn operator_tags_are_case_sensitive() {
        assert_eq!(
            FilterOperator::parse("EQ"),
            FilterOperator::Unrecognized("EQ".to_string())
        );
        assert_eq!(
            FilterOperator::parse("ne"),
            FilterOperator::Unrecognized("ne".to_string())
        );
    }

    #[test]
    fn logic_parse_defaults_to_unset() {
        assert_eq!(Logic::parse("and"), Logic::And);
        assert_eq!(Logic::parse("or"), Logic::Or);
        assert_eq!(Logic::parse("AND"), Logic::Unset);
        assert_eq!(Logic::parse(""), Logic::Unset);
    }

    #[test]
    fn handle_field_lower_case() {
        let mut filter = sample();
        filter.handle_field(|f| f.to_lowercase());
        assert_eq!(
            filter,
            FilterNode::and(vec![
                FilterNode::leaf("name", "eq", "Hari"),
                FilterNode::leaf("age", "eq", 25),
            ])
        );
    }

    #[test]
    fn handle_field_aliasing() {
        let mut filter = FilterNode::and(vec![
            FilterNode::leaf("ID", "eq", "Hari"),
            FilterNode::leaf("Name", "eq", "Hari"),
        ]);
        filter.handle_field(|f| if f == "ID" { "_id".to_string() } else { f.to_string() });
        assert_eq!(
            filter,
            FilterNode::and(vec![
                FilterNode::leaf("_id", "eq", "Hari"),
                FilterNode::leaf("Name", "eq", "Hari"),
            ])
        );
    }

    #[test]
    fn handle_changes_operator() {
        let mut filter = sample();
        filter.handle(|mut leaf| {
            if leaf.field == "Name" {
                leaf.operator = FilterOperator::Neq;
            }
            FilterNode::Leaf(leaf)
        });
        assert_eq!(
            filter,
            FilterNode::and(vec![
                FilterNode::leaf("Name", "neq", "Hari"),
                FilterNode::leaf("Age", "eq", 25),
            ])
        );
    }

    #[test]
    fn handle_expansion_is_not_revisited() {
        let mut filter = FilterNode::and(vec![FilterNode::leaf("Age", "eq", 25)]);
        let mut calls = 0;
        filter.handle(|leaf| {
            calls += 1;
            FilterNode::and(vec![
                FilterNode::Leaf(FilterLeaf {
                    operator: FilterOperator::Gte,
                    ..leaf.clone()
                }),
                FilterNode::Leaf(FilterLeaf {
                    operator: FilterOperator::Lt,
                    ..leaf
                }),
            ])
        });
        assert_eq!(calls, 1);
        assert_eq!(filter.depth(), 3);
        assert_eq!(filter.leaves().len(), 2);
    }

    #[test]
    fn handle_on_root_leaf() {
        let mut filter = FilterNode::leaf("Name", "eq", "Hari");
        filter.handle_field(|f| f.to_uppercase());
        assert_eq!(filter, FilterNode::leaf("NAME", "eq", "Hari"));
    }

    #[test]
    fn deep_copy_is_independent() {
        let source = FilterNode::and(vec![
            FilterNode::leaf("Name", "eq", "Hari"),
            FilterNode::or(vec![FilterNode::leaf("Age", "gt", 25)]),
        ]);
        let mut copy = FilterNode::default();
        source.deep_copy_into(&mut copy);
        assert_eq!(copy, source);

        copy.handle_field(|f| f.to_lowercase());
        assert_ne!(copy, source);
        let fields: Vec<&str> = source.leaves().iter().map(|l| l.field.as_str()).collect();
        assert_eq!(fields, vec!["Name", "Age"]);
    }

    #[test]
    fn deserialize_wire_shape() {
        let filter: FilterNode = serde_json::from_value(json!({
            "logic": "and",
            "filters": [
                {"field": "Name", "operator": "eq", "value": "Hari"},
                {"logic": "or", "filters": [
                    {"field": "Age", "operator": "lt", "value": 25}
                ]}
            ]
        }))
        .unwrap();
        assert_eq!(
            filter,
            FilterNode::and(vec![
                FilterNode::leaf("Name", "eq", "Hari"),
                FilterNode::or(vec![FilterNode::leaf("Age", "lt", 25)]),
            ])
        );
    }

    #[test]
    fn deserialize_empty_filters_is_leaf() {
        let filter: FilterNode = serde_json::from_value(json!({
            "field": "Name", "operator": "isnull", "filters": [], "logic": "and"
        }))
        .unwrap();
        assert_eq!(filter, FilterNode::leaf("Name", "isnull", Value::Null));
    }

    #[test]
    fn deserialize_null_tags_degrade() {
        let filter: FilterNode = serde_json::from_value(json!({
            "logic": null,
            "filters": [
                {"field": null, "operator": null, "value": "Hari"},
                {"field": "Age", "operator": "gt", "value": 25}
            ]
        }))
        .unwrap();
        assert_eq!(
            filter,
            FilterNode::branch(
                Logic::Unset,
                vec![
                    FilterNode::Leaf(FilterLeaf {
                        field: String::new(),
                        operator: FilterOperator::Unrecognized(String::new()),
                        value: json!("Hari"),
                    }),
                    FilterNode::leaf("Age", "gt", 25),
                ]
            )
        );
    }

    #[test]
    fn deserialize_null_filters_is_leaf() {
        let filter: FilterNode = serde_json::from_value(json!({
            "field": "Name", "operator": "eq", "value": "Hari", "filters": null
        }))
        .unwrap();
        assert_eq!(filter, FilterNode::leaf("Name", "eq", "Hari"));
    }

    #[test]
    fn serialize_wire_shape() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(
            value,
            json!({
                "filters": [
                    {"field": "Name", "operator": "eq", "value": "Hari"},
                    {"field": "Age", "operator": "eq", "value": 25}
                ],
                "logic": "and"
            })
        );
    }
}
