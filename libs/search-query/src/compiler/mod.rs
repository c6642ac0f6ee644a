//! Query compilation.
//!
//! Renders a [`QueryRequest`] into the request understood by the search index:
//! - primary query string (Solr standard query syntax)
//! - paging as offset/limit
//! - filter queries, each rendered on its own
//! - facet fields with a minimum count of 1
//!
//! Compilers hold no per-call state; one instance can serve concurrent callers.

mod native;

pub use native::{NativeQuery, FACET_MIN_COUNT};

use crate::escape::escape_query_chars;
use crate::query::Query;
use crate::request::QueryRequest;

/// Compiles a validated request into a backend-native representation.
pub trait QueryCompiler: Send + Sync {
    type Native;

    fn compile(&self, request: &QueryRequest) -> Self::Native;
}

/// Compiler for the Solr standard query parser.
///
/// | node | rendering |
/// |------|-----------|
/// | field | `(field:value)` |
/// | contains | `(field:*value*)` |
/// | free text | `(value)` |
/// | group | `(a AND b AND ...)` / `(a OR b OR ...)` |
///
/// Values are escaped once, at the leaf.
#[derive(Debug, Clone, Copy, Default)]
pub struct SolrQueryCompiler;

impl SolrQueryCompiler {
    pub fn new() -> Self {
        Self
    }

    /// Render a single query node.
    pub fn render(&self, query: &Query) -> String {
        let mut out = String::new();
        render_into(query, &mut out);
        out
    }
}

impl QueryCompiler for SolrQueryCompiler {
    type Native = NativeQuery;

    fn compile(&self, request: &QueryRequest) -> NativeQuery {
        let query = self.render(request.query());
        let filter_queries: Vec<String> = request
            .filters()
            .iter()
            .map(|filter| self.render(filter))
            .collect();
        let facet_fields: Vec<String> = request
            .facets()
            .iter()
            .map(|facet| facet.field().to_string())
            .collect();

        let (offset, limit) = match request.page() {
            Some(page) => (Some(page.offset()), Some(page.size())),
            None => (None, None),
        };

        tracing::debug!(
            query_len = query.len(),
            filters = filter_queries.len(),
            facets = facet_fields.len(),
            ?offset,
            ?limit,
            "Compiled query request"
        );

        NativeQuery {
            query,
            offset,
            limit,
            filter_queries,
            facet_fields,
            facet_min_count: FACET_MIN_COUNT,
        }
    }
}

fn render_into(query: &Query, out: &mut String) {
    match query {
        Query::Field(q) => {
            out.push('(');
            out.push_str(q.field());
            out.push(':');
            out.push_str(&escape_query_chars(q.value()));
            out.push(')');
        }
        Query::ContainField(q) => {
            out.push('(');
            out.push_str(q.field());
            out.push_str(":*");
            out.push_str(&escape_query_chars(q.value()));
            out.push_str("*)");
        }
        Query::NoField(q) => {
            out.push('(');
            out.push_str(&escape_query_chars(q.value()));
            out.push(')');
        }
        Query::Composite(group) => {
            let separator = format!(" {} ", group.operator());
            out.push('(');
            for (i, child) in group.children().enumerate() {
                if i > 0 {
                    out.push_str(&separator);
                }
                render_into(child, out);
            }
            out.push(')');
        }
    }
}
