//! JSON request descriptions.
//!
//! ```json
//! {
//!   "query": {"and": [{"field": "goId", "value": "GO:0005524"}, {"text": "kinase"}]},
//!   "page": {"number": 1, "size": 25},
//!   "facets": ["aspect"],
//!   "filters": [
//!     {"field": "taxonId", "value": "9606"},
//!     {"signature": ["geneProductType"], "properties": {"geneProductType": ["protein"]}}
//!   ]
//! }
//! ```
//!
//! Everything is validated through the `quarry_query` constructors.

use quarry_query::{FilterConverter, FilterRequest, Query, QueryRequest};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum QueryExpr {
    Field { field: String, value: String },
    Contains { contains: String, value: String },
    Text { text: String },
    And { and: Vec<QueryExpr> },
    Or { or: Vec<QueryExpr> },
}

impl QueryExpr {
    pub fn into_query(self) -> quarry_query::Result<Query> {
        match self {
            QueryExpr::Field { field, value } => Query::field(field, value),
            QueryExpr::Contains { contains, value } => Query::contains(contains, value),
            QueryExpr::Text { text } => Query::text(text),
            QueryExpr::And { and } => Query::and(collect(and)?),
            QueryExpr::Or { or } => Query::or(collect(or)?),
        }
    }
}

fn collect(exprs: Vec<QueryExpr>) -> quarry_query::Result<Vec<Query>> {
    exprs.into_iter().map(QueryExpr::into_query).collect()
}

/// A filter is either a ready query or a client filter request to convert.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum FilterExpr {
    Query(QueryExpr),
    Request(FilterRequest),
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PageSpec {
    pub number: i64,
    pub size: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RequestFile {
    pub query: QueryExpr,
    #[serde(default)]
    pub page: Option<PageSpec>,
    #[serde(default)]
    pub facets: Vec<String>,
    #[serde(default)]
    pub filters: Vec<FilterExpr>,
}

impl RequestFile {
    pub fn into_request<C>(self, converter: &C) -> quarry_query::Result<QueryRequest>
    where
        C: FilterConverter<Output = Query>,
    {
        let mut builder = QueryRequest::builder(self.query.into_query()?);
        if let Some(page) = self.page {
            builder = builder.set_page(page.number, page.size)?;
        }
        for facet in self.facets {
            builder = builder.add_facet_field(facet)?;
        }
        for filter in self.filters {
            let query = match filter {
                FilterExpr::Query(expr) => expr.into_query()?,
                FilterExpr::Request(request) => converter.convert(&request)?.into_value(),
            };
            builder = builder.add_query_filter(query);
        }
        Ok(builder.build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quarry_query::{QueryCompiler, QueryFilterConverter, SolrQueryCompiler};

    fn parse(json: &str) -> RequestFile {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn parses_every_expression_shape() {
        let expr: QueryExpr = serde_json::from_str(
            r#"{"or": [
                {"field": "db", "value": "UniProtKB"},
                {"contains": "symbol", "value": "kin"},
                {"and": [{"text": "heat"}, {"text": "shock"}]}
            ]}"#,
        )
        .unwrap();
        let rendered = SolrQueryCompiler::new().render(&expr.into_query().unwrap());
        assert_eq!(
            rendered,
            "((db:UniProtKB) OR (symbol:*kin*) OR ((heat) AND (shock)))"
        );
    }

    #[test]
    fn builds_full_request() {
        let file = parse(
            r#"{
                "query": {"field": "goId", "value": "GO:0005524"},
                "page": {"number": 2, "size": 25},
                "facets": ["aspect"],
                "filters": [
                    {"field": "taxonId", "value": "9606"},
                    {"signature": ["db"], "properties": {"db": ["UniProtKB"]}}
                ]
            }"#,
        );
        let request = file.into_request(&QueryFilterConverter::new()).unwrap();
        let native = SolrQueryCompiler::new().compile(&request);

        assert_eq!(native.query, "(goId:GO\\:0005524)");
        assert_eq!(native.offset, Some(25));
        assert_eq!(native.limit, Some(25));
        assert_eq!(native.filter_queries, vec!["(taxonId:9606)", "(db:UniProtKB)"]);
        assert_eq!(native.facet_fields, vec!["aspect"]);
    }

    #[test]
    fn invalid_values_surface_as_errors() {
        let file = parse(r#"{"query": {"field": "goId", "value": ""}}"#);
        assert!(file.into_request(&QueryFilterConverter::new()).is_err());

        let file = parse(r#"{"query": {"text": "x"}, "page": {"number": -1, "size": 2}}"#);
        assert!(matches!(
            file.into_request(&QueryFilterConverter::new()),
            Err(quarry_query::Error::InvalidArgument(_))
        ));

        let file = parse(r#"{"query": {"and": []}}"#);
        assert!(file.into_request(&QueryFilterConverter::new()).is_err());
    }
}
