//! Query request envelope.
//!
//! A [`QueryRequest`] bundles the primary [`Query`] with optional paging, the
//! facet fields to aggregate, and filter queries. Filters are ANDed with the
//! primary query by the index but kept as separate clauses so the index can
//! cache them independently of relevance scoring.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::query::Query;
use crate::{Error, Result};

/// 1-based page cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Page {
    number: u32,
    size: u32,
}

impl Page {
    /// `number` starts at 1; `size` may be 0 (facet-only requests).
    pub fn new(number: i64, size: i64) -> Result<Self> {
        let number = u32::try_from(number)
            .ok()
            .filter(|n| *n >= 1)
            .ok_or_else(|| {
                Error::invalid(format!("page number must be at least 1, got {number}"))
            })?;
        let size = u32::try_from(size).map_err(|_| {
            Error::invalid(format!("page size must not be negative, got {size}"))
        })?;
        Ok(Self { number, size })
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    /// Index of the first result on this page.
    pub fn offset(&self) -> u64 {
        u64::from(self.number - 1) * u64::from(self.size)
    }
}

/// A field whose distinct values should be counted alongside the results.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Facet {
    field: String,
}

impl Facet {
    pub fn new(field: impl Into<String>) -> Result<Self> {
        let field = field.into();
        if field.trim().is_empty() {
            return Err(Error::invalid("facet field must not be empty"));
        }
        Ok(Self { field })
    }

    pub fn field(&self) -> &str {
        &self.field
    }
}

/// Validated search request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryRequest {
    query: Query,
    page: Option<Page>,
    facets: BTreeSet<Facet>,
    filters: Vec<Query>,
}

impl QueryRequest {
    pub fn builder(query: Query) -> QueryRequestBuilder {
        QueryRequestBuilder::new(query)
    }

    pub fn query(&self) -> &Query {
        &self.query
    }

    pub fn page(&self) -> Option<&Page> {
        self.page.as_ref()
    }

    pub fn facets(&self) -> &BTreeSet<Facet> {
        &self.facets
    }

    /// Filter queries in insertion order.
    pub fn filters(&self) -> &[Query] {
        &self.filters
    }

    /// Append a filter discovered after the request was built.
    pub fn add_filter(&mut self, filter: Query) {
        self.filters.push(filter);
    }
}

/// Builder for [`QueryRequest`]; each step validates its input.
#[derive(Debug, Clone)]
pub struct QueryRequestBuilder {
    query: Query,
    page: Option<Page>,
    facets: BTreeSet<Facet>,
    filters: Vec<Query>,
}

impl QueryRequestBuilder {
    pub fn new(query: Query) -> Self {
        Self {
            query,
            page: None,
            facets: BTreeSet::new(),
            filters: Vec::new(),
        }
    }

    /// Replace the page.
    pub fn set_page(mut self, number: i64, size: i64) -> Result<Self> {
        self.page = Some(Page::new(number, size)?);
        Ok(self)
    }

    pub fn with_page(mut self, page: Page) -> Self {
        self.page = Some(page);
        self
    }

    pub fn add_facet_field(mut self, field: impl Into<String>) -> Result<Self> {
        self.facets.insert(Facet::new(field)?);
        Ok(self)
    }

    pub fn add_query_filter(mut self, filter: Query) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn build(self) -> QueryRequest {
        QueryRequest {
            query: self.query,
            page: self.page,
            facets: self.facets,
            filters: self.filters,
        }
    }
}
