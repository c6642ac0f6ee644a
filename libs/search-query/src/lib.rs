//! Query model and compiler for biological data search.
//!
//! Client filters and search intents are expressed as a backend-neutral
//! [`Query`] tree, bundled into a validated [`QueryRequest`], and compiled into
//! a [`NativeQuery`] for the search index:
//!
//! ```text
//! FilterRequest ──► QueryFilterConverter ──► Query ─┐
//!                                                   ├─► QueryRequest ──► SolrQueryCompiler ──► NativeQuery
//!                               primary Query ──────┘
//! ```
//!
//! ```
//! use quarry_query::{Query, QueryRequest, QueryCompiler, SolrQueryCompiler};
//!
//! let request = QueryRequest::builder(Query::field("goId", "GO:0005524")?)
//!     .set_page(2, 25)?
//!     .add_facet_field("aspect")?
//!     .add_query_filter(Query::field("taxonId", "9606")?)
//!     .build();
//!
//! let native = SolrQueryCompiler::new().compile(&request);
//! assert_eq!(native.query, "(goId:GO\\:0005524)");
//! assert_eq!(native.offset, Some(25));
//! assert_eq!(native.filter_queries, vec!["(taxonId:9606)".to_string()]);
//! # Ok::<(), quarry_query::Error>(())
//! ```

#![forbid(unsafe_code)]

pub mod client;
pub mod compiler;
mod error;
pub mod escape;
pub mod filter;
pub mod query;
pub mod request;

pub use client::{
    FacetCategory, FacetField, IndexResponse, PageInfo, QueryResult, SearchIndexClient,
    SearchService,
};
pub use compiler::{NativeQuery, QueryCompiler, SolrQueryCompiler, FACET_MIN_COUNT};
pub use error::{Error, Result};
pub use filter::{
    ConvertedFilter, FilterConverter, FilterRequest, QueryFilterConverter, ValuesFilterConverter,
};
pub use query::{CompositeQuery, ContainFieldQuery, FieldQuery, NoFieldQuery, Operator, Query};
pub use request::{Facet, Page, QueryRequest, QueryRequestBuilder};
