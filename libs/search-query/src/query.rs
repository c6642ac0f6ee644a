//! Query AST.
//!
//! A [`Query`] is an immutable tree of predicates:
//! - [`FieldQuery`]: exact `field:value` match
//! - [`ContainFieldQuery`]: substring match on a field
//! - [`NoFieldQuery`]: free text against the index's default field
//! - [`CompositeQuery`]: AND/OR over a set of child queries
//!
//! Every constructor validates its input, so a `Query` that exists is well formed.
//! The AST knows nothing about any backend syntax; rendering lives in
//! [`crate::compiler`].

use std::collections::BTreeSet;
use std::fmt;

use crate::{Error, Result};

/// Boolean operator of a [`CompositeQuery`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Operator {
    And,
    Or,
}

impl Operator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::And => "AND",
            Operator::Or => "OR",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Exact match of `value` in `field`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FieldQuery {
    field: String,
    value: String,
}

impl FieldQuery {
    pub fn new(field: impl Into<String>, value: impl Into<String>) -> Result<Self> {
        Ok(Self {
            field: require_text("field", field.into())?,
            value: require_text("value", value.into())?,
        })
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

/// Substring match of `value` anywhere in `field`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ContainFieldQuery {
    field: String,
    value: String,
}

impl ContainFieldQuery {
    pub fn new(field: impl Into<String>, value: impl Into<String>) -> Result<Self> {
        Ok(Self {
            field: require_text("field", field.into())?,
            value: require_text("value", value.into())?,
        })
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

/// Free-text match against the index's default search field.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NoFieldQuery {
    value: String,
}

impl NoFieldQuery {
    pub fn new(value: impl Into<String>) -> Result<Self> {
        Ok(Self {
            value: require_text("value", value.into())?,
        })
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

/// Boolean combination of child queries.
///
/// Children have set semantics: their order is irrelevant and duplicates collapse.
/// They are kept sorted so that rendering is deterministic.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CompositeQuery {
    operator: Operator,
    children: BTreeSet<Query>,
}

impl CompositeQuery {
    /// Build a group from at least one child.
    pub fn new(operator: Operator, children: impl IntoIterator<Item = Query>) -> Result<Self> {
        let children: BTreeSet<Query> = children.into_iter().collect();
        if children.is_empty() {
            return Err(Error::invalid(format!(
                "{operator} query requires at least one operand"
            )));
        }
        Ok(Self { operator, children })
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }

    pub fn children(&self) -> impl ExactSizeIterator<Item = &Query> {
        self.children.iter()
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

/// A node of the query AST.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Query {
    Field(FieldQuery),
    ContainField(ContainFieldQuery),
    NoField(NoFieldQuery),
    Composite(CompositeQuery),
}

impl Query {
    /// `field:value` exact match.
    pub fn field(field: impl Into<String>, value: impl Into<String>) -> Result<Self> {
        FieldQuery::new(field, value).map(Self::Field)
    }

    /// Substring match on `field`.
    pub fn contains(field: impl Into<String>, value: impl Into<String>) -> Result<Self> {
        ContainFieldQuery::new(field, value).map(Self::ContainField)
    }

    /// Free-text match on the default field.
    pub fn text(value: impl Into<String>) -> Result<Self> {
        NoFieldQuery::new(value).map(Self::NoField)
    }

    /// Conjunction of `operands`.
    ///
    /// A single distinct operand is returned unchanged; zero operands is an error.
    pub fn and(operands: impl IntoIterator<Item = Query>) -> Result<Self> {
        combine(Operator::And, operands)
    }

    /// Disjunction of `operands`.
    ///
    /// A single distinct operand is returned unchanged; zero operands is an error.
    pub fn or(operands: impl IntoIterator<Item = Query>) -> Result<Self> {
        combine(Operator::Or, operands)
    }

    /// `self AND other`.
    pub fn and_with(self, other: Query) -> Self {
        combine_pair(Operator::And, self, other)
    }

    /// `self OR other`.
    pub fn or_with(self, other: Query) -> Self {
        combine_pair(Operator::Or, self, other)
    }

    pub fn is_composite(&self) -> bool {
        matches!(self, Query::Composite(_))
    }
}

impl From<FieldQuery> for Query {
    fn from(query: FieldQuery) -> Self {
        Query::Field(query)
    }
}

impl From<ContainFieldQuery> for Query {
    fn from(query: ContainFieldQuery) -> Self {
        Query::ContainField(query)
    }
}

impl From<NoFieldQuery> for Query {
    fn from(query: NoFieldQuery) -> Self {
        Query::NoField(query)
    }
}

impl From<CompositeQuery> for Query {
    fn from(query: CompositeQuery) -> Self {
        Query::Composite(query)
    }
}

fn combine(operator: Operator, operands: impl IntoIterator<Item = Query>) -> Result<Query> {
    let mut group = CompositeQuery::new(operator, operands)?;
    if group.children.len() == 1 {
        if let Some(only) = group.children.pop_first() {
            return Ok(only);
        }
    }
    Ok(Query::Composite(group))
}

fn combine_pair(operator: Operator, left: Query, right: Query) -> Query {
    if left == right {
        return left;
    }
    Query::Composite(CompositeQuery {
        operator,
        children: BTreeSet::from([left, right]),
    })
}

fn require_text(what: &str, value: String) -> Result<String> {
    if value.trim().is_empty() {
        return Err(Error::invalid(format!("{what} must not be empty")));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fq(field: &str, value: &str) -> Query {
        Query::field(field, value).unwrap()
    }

    #[test]
    fn rejects_blank_field_and_value() {
        assert!(matches!(
            Query::field("", "x"),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            Query::field("db", "  "),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            Query::contains("", "x"),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(Query::text(""), Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn empty_group_is_rejected() {
        let err = Query::and(Vec::new()).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(msg) if msg.contains("AND")));
        assert!(Query::or(std::iter::empty()).is_err());
        assert!(CompositeQuery::new(Operator::Or, Vec::new()).is_err());
    }

    #[test]
    fn single_operand_is_returned_unchanged() {
        let q = Query::or([fq("db", "UniProtKB")]).unwrap();
        assert_eq!(q, fq("db", "UniProtKB"));
    }

    #[test]
    fn duplicates_collapse() {
        let q = Query::or([fq("db", "a"), fq("db", "a")]).unwrap();
        assert_eq!(q, fq("db", "a"));

        let Query::Composite(group) =
            Query::or([fq("db", "a"), fq("db", "b"), fq("db", "a")]).unwrap()
        else {
            panic!("expected composite");
        };
        assert_eq!(group.len(), 2);
        assert_eq!(group.operator(), Operator::Or);
    }

    #[test]
    fn operand_order_is_irrelevant() {
        let left = Query::and([fq("a", "1"), fq("b", "2")]).unwrap();
        let right = Query::and([fq("b", "2"), fq("a", "1")]).unwrap();
        assert_eq!(left, right);
    }

    #[test]
    fn pair_combinators() {
        let q = fq("a", "1").and_with(fq("b", "2"));
        assert!(q.is_composite());
        assert_eq!(fq("a", "1").or_with(fq("a", "1")), fq("a", "1"));
    }

    #[test]
    fn queries_are_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Query>();
    }
}
