use serde::Serialize;

/// Facet values with fewer matching documents are not reported.
pub const FACET_MIN_COUNT: u32 = 1;

/// Compiled request, ready for a search index client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NativeQuery {
    /// Rendered primary query.
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    /// Rendered filter queries, one clause each.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub filter_queries: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub facet_fields: Vec<String>,
    pub facet_min_count: u32,
}

impl NativeQuery {
    /// Solr request parameters in a stable order.
    ///
    /// `q`, then `start`/`rows` when paged, one `fq` per filter, and the facet
    /// parameters when any facet field is requested.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("q", self.query.clone())];
        if let Some(offset) = self.offset {
            params.push(("start", offset.to_string()));
        }
        if let Some(limit) = self.limit {
            params.push(("rows", limit.to_string()));
        }
        for fq in &self.filter_queries {
            params.push(("fq", fq.clone()));
        }
        if !self.facet_fields.is_empty() {
            params.push(("facet", "true".to_string()));
            for field in &self.facet_fields {
                params.push(("facet.field", field.clone()));
            }
            params.push(("facet.mincount", self.facet_min_count.to_string()));
        }
        params
    }

    /// URL-encoded `key=value&...` form of [`Self::to_params`].
    pub fn to_query_string(&self) -> String {
        self.to_params()
            .iter()
            .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
            .collect::<Vec<_>>()
            .join("&")
    }
}
