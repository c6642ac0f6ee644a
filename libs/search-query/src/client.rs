//! Search index client seam and search orchestration.
//!
//! The index itself (storage, ranking, transport) lives behind
//! [`SearchIndexClient`]. [`SearchService`] compiles a [`QueryRequest`], hands
//! the result to the client and assembles a [`QueryResult`] with paging info.

use async_trait::async_trait;
use serde::Serialize;

use crate::compiler::{NativeQuery, QueryCompiler, SolrQueryCompiler, FACET_MIN_COUNT};
use crate::request::{Page, QueryRequest};
use crate::Result;

/// Count of documents for one facet value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FacetCategory {
    pub value: String,
    pub count: u64,
}

/// Facet counts of one field, in the order the index reported them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FacetField {
    pub field: String,
    pub categories: Vec<FacetCategory>,
}

/// Raw response of a search index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexResponse<D> {
    /// Hits for the requested page, ranked.
    pub hits: Vec<D>,
    /// Total hits across all pages.
    pub total_hits: u64,
    pub facets: Vec<FacetField>,
}

/// Executes compiled queries against a search index.
#[async_trait]
pub trait SearchIndexClient: Send + Sync {
    type Document: Send;

    async fn execute(&self, query: &NativeQuery) -> Result<IndexResponse<Self::Document>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    pub current_page: u32,
    pub total_pages: u64,
    pub results_per_page: u32,
}

impl PageInfo {
    pub fn new(page: &Page, total_hits: u64) -> Self {
        let total_pages = match page.size() {
            0 => 0,
            size => total_hits.div_ceil(u64::from(size)),
        };
        Self {
            current_page: page.number(),
            total_pages,
            results_per_page: page.size(),
        }
    }
}

/// Search results handed back to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryResult<D> {
    pub number_of_hits: u64,
    pub results: Vec<D>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_info: Option<PageInfo>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub facets: Vec<FacetField>,
}

/// Compiles requests and runs them through a [`SearchIndexClient`].
pub struct SearchService<C> {
    client: C,
    compiler: SolrQueryCompiler,
}

impl<C: SearchIndexClient> SearchService<C> {
    pub fn new(client: C) -> Self {
        Self {
            client,
            compiler: SolrQueryCompiler::new(),
        }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub async fn search(&self, request: &QueryRequest) -> Result<QueryResult<C::Document>> {
        let native = self.compiler.compile(request);
        let response = self.client.execute(&native).await?;

        tracing::debug!(
            total_hits = response.total_hits,
            returned = response.hits.len(),
            "Search executed"
        );

        let facets = response
            .facets
            .into_iter()
            .map(|mut facet| {
                facet
                    .categories
                    .retain(|c| c.count >= u64::from(FACET_MIN_COUNT));
                facet
            })
            .collect();

        Ok(QueryResult {
            number_of_hits: response.total_hits,
            results: response.hits,
            page_info: request
                .page()
                .map(|page| PageInfo::new(page, response.total_hits)),
            facets,
        })
    }
}
