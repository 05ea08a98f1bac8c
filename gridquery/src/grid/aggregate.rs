//! Filter tree translation to aggregation `$match` documents
//!
//! The native document is rendered from the generic translation, so a node
//! is rejected here exactly when [`FilterNode::to_query_filter`] rejects it.
//! Agreement between the two translators on accept/reject holds by
//! construction; the tests here pin the rendered document for every
//! operator instead. Rejection is `None` rather than a document.

use bson::{Document, doc};

use super::filter::FilterNode;

impl FilterNode {
    /// Translate the tree into a `$match` body
    ///
    /// Querying a string is case-insensitive for every operator except
    /// `eq`/`neq`.
    pub fn to_aggregate_match(&self) -> Option<Document> {
        self.to_query_filter().map(|filter| filter.to_match_document())
    }

    /// Full `$match` pipeline stage, if the tree carries anything usable
    pub fn to_match_stage(&self) -> Option<Document> {
        self.to_aggregate_match()
            .map(|body| doc! { "$match": body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Logic;
    use bson::Bson;
    use chrono::{TimeZone, Utc};
    use serde_json::Value;

    fn wrapped(leaf: FilterNode) -> Option<Document> {
        FilterNode::and(vec![leaf]).to_aggregate_match()
    }

    #[test]
    fn operator_unrecognized() {
        assert_eq!(wrapped(FilterNode::leaf("Name", "ne", "Hari")), None);
    }

    #[test]
    fn no_logic_declared() {
        let filter = FilterNode::branch(Logic::Unset, vec![FilterNode::leaf("Name", "eq", "Hari")]);
        assert_eq!(filter.to_aggregate_match(), None);
    }

    #[test]
    fn string_operator_on_number() {
        assert_eq!(wrapped(FilterNode::leaf("Age", "startswith", 25)), None);
    }

    #[test]
    fn lt_or_gt() {
        let filter = FilterNode::or(vec![
            FilterNode::leaf("Age", "lt", 25),
            FilterNode::leaf("Age", "gt", 25),
        ]);
        assert_eq!(
            filter.to_aggregate_match(),
            Some(doc! {"$or": [{"Age": {"$lt": 25}}, {"Age": {"$gt": 25}}]})
        );
    }

    #[test]
    fn null_checks() {
        assert_eq!(
            wrapped(FilterNode::leaf("Name", "isnull", Value::Null)),
            Some(doc! {"$and": [{"Name": Bson::Null}]})
        );
        assert_eq!(
            wrapped(FilterNode::leaf("Name", "isnotnull", Value::Null)),
            Some(doc! {"$and": [{"Name": {"$ne": Bson::Null}}]})
        );
    }

    #[test]
    fn equality_and_comparisons() {
        assert_eq!(
            wrapped(FilterNode::leaf("Name", "eq", "Hari")),
            Some(doc! {"$and": [{"Name": "Hari"}]})
        );
        assert_eq!(
            wrapped(FilterNode::leaf("Name", "neq", "Hari")),
            Some(doc! {"$and": [{"Name": {"$ne": "Hari"}}]})
        );
        assert_eq!(
            wrapped(FilterNode::leaf("Age", "lte", 25)),
            Some(doc! {"$and": [{"Age": {"$lte": 25}}]})
        );
        assert_eq!(
            wrapped(FilterNode::leaf("Age", "gte", 25)),
            Some(doc! {"$and": [{"Age": {"$gte": 25}}]})
        );
    }

    #[test]
    fn string_operators() {
        assert_eq!(
            wrapped(FilterNode::leaf("Name", "startswith", "H")),
            Some(doc! {"$and": [{"Name": {"$regex": "^H", "$options": "i"}}]})
        );
        assert_eq!(
            wrapped(FilterNode::leaf("Name", "doesnotstartwith", "H")),
            Some(doc! {"$and": [{"Name": {"$regex": r"^(?!H)\w+", "$options": "i"}}]})
        );
        assert_eq!(
            wrapped(FilterNode::leaf("Name", "contains", "H")),
            Some(doc! {"$and": [{"Name": {"$regex": ".*H.*", "$options": "i"}}]})
        );
        assert_eq!(
            wrapped(FilterNode::leaf("Name", "doesnotcontain", "H")),
            Some(doc! {"$and": [{"Name": {"$regex": r"^((?!H).)*$", "$options": "i"}}]})
        );
        assert_eq!(
            wrapped(FilterNode::leaf("Name", "isempty", "")),
            Some(doc! {"$and": [{"Name": ""}]})
        );
        assert_eq!(
            wrapped(FilterNode::leaf("Name", "isnotempty", "")),
            Some(doc! {"$and": [{"Name": {"$ne": ""}}]})
        );
    }

    #[test]
    fn working_with_date() {
        let filter = FilterNode::and(vec![FilterNode::and(vec![
            FilterNode::leaf("created_at", "gte", "2019-01-01T00:00:00Z"),
            FilterNode::leaf("created_at", "lt", "2019-01-02T00:00:00Z"),
        ])]);
        let from = bson::DateTime::from_millis(
            Utc.with_ymd_and_hms(2019, 1, 1, 0, 0, 0).unwrap().timestamp_millis(),
        );
        let to = bson::DateTime::from_millis(
            Utc.with_ymd_and_hms(2019, 1, 2, 0, 0, 0).unwrap().timestamp_millis(),
        );
        assert_eq!(
            filter.to_aggregate_match(),
            Some(doc! {"$and": [{"$and": [
                {"created_at": {"$gte": from}},
                {"created_at": {"$lt": to}}
            ]}]})
        );
    }

    #[test]
    fn match_stage_wraps_body() {
        let filter = FilterNode::leaf("Name", "eq", "Hari");
        assert_eq!(
            filter.to_match_stage(),
            Some(doc! {"$match": {"Name": "Hari"}})
        );
        assert_eq!(FilterNode::and(vec![]).to_match_stage(), None);
    }
}
