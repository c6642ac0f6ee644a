use std::sync::Mutex;

use async_trait::async_trait;
use quarry_query::{
    Error, FacetCategory, FacetField, IndexResponse, NativeQuery, Query, QueryRequest, Result,
    SearchIndexClient, SearchService,
};

/// In-memory index that records every query it receives.
struct FakeIndex {
    response: Result<IndexResponse<String>>,
    seen: Mutex<Vec<NativeQuery>>,
}

impl FakeIndex {
    fn answering(response: Result<IndexResponse<String>>) -> Self {
        Self {
            response,
            seen: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl SearchIndexClient for FakeIndex {
    type Document = String;

    async fn execute(&self, query: &NativeQuery) -> Result<IndexResponse<String>> {
        self.seen.lock().unwrap().push(query.clone());
        self.response.clone()
    }
}

fn hits(total_hits: u64) -> IndexResponse<String> {
    IndexResponse {
        hits: vec!["P12345".to_string(), "Q67890".to_string()],
        total_hits,
        facets: vec![FacetField {
            field: "aspect".to_string(),
            categories: vec![
                FacetCategory {
                    value: "F".to_string(),
                    count: 7,
                },
                FacetCategory {
                    value: "C".to_string(),
                    count: 0,
                },
            ],
        }],
    }
}

#[tokio::test]
async fn search_passes_compiled_query_to_index() {
    let service = SearchService::new(FakeIndex::answering(Ok(hits(42))));
    let request = QueryRequest::builder(Query::field("goId", "GO:0005524").unwrap())
        .set_page(3, 2)
        .unwrap()
        .add_facet_field("aspect")
        .unwrap()
        .add_query_filter(Query::field("taxonId", "9606").unwrap())
        .build();

    let result = service.search(&request).await.unwrap();

    let seen = service.client().seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].query, "(goId:GO\\:0005524)");
    assert_eq!(seen[0].offset, Some(4));
    assert_eq!(seen[0].limit, Some(2));
    assert_eq!(seen[0].filter_queries, vec!["(taxonId:9606)"]);
    assert_eq!(seen[0].facet_fields, vec!["aspect"]);

    assert_eq!(result.number_of_hits, 42);
    assert_eq!(result.results, vec!["P12345", "Q67890"]);
    let page_info = result.page_info.unwrap();
    assert_eq!(page_info.current_page, 3);
    assert_eq!(page_info.total_pages, 21);
    assert_eq!(page_info.results_per_page, 2);
}

#[tokio::test]
async fn facet_values_below_minimum_count_are_dropped() {
    let service = SearchService::new(FakeIndex::answering(Ok(hits(2))));
    let request = QueryRequest::builder(Query::text("kinase").unwrap())
        .add_facet_field("aspect")
        .unwrap()
        .build();

    let result = service.search(&request).await.unwrap();
    assert_eq!(result.facets.len(), 1);
    assert_eq!(
        result.facets[0].categories,
        vec![FacetCategory {
            value: "F".to_string(),
            count: 7
        }]
    );
}

#[tokio::test]
async fn unpaged_search_has_no_page_info() {
    let service = SearchService::new(FakeIndex::answering(Ok(hits(2))));
    let request = QueryRequest::builder(Query::text("kinase").unwrap()).build();

    let result = service.search(&request).await.unwrap();
    assert!(result.page_info.is_none());
}

#[tokio::test]
async fn index_errors_propagate() {
    let service = SearchService::new(FakeIndex::answering(Err(Error::Index(
        "connection refused".to_string(),
    ))));
    let request = QueryRequest::builder(Query::text("kinase").unwrap()).build();

    let err = service.search(&request).await.unwrap_err();
    assert_eq!(err, Error::Index("connection refused".to_string()));
}

#[tokio::test]
async fn result_serializes() {
    let service = SearchService::new(FakeIndex::answering(Ok(hits(2))));
    let request = QueryRequest::builder(Query::text("kinase").unwrap())
        .set_page(1, 2)
        .unwrap()
        .build();

    let result = service.search(&request).await.unwrap();
    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["number_of_hits"], 2);
    assert_eq!(json["page_info"]["total_pages"], 1);
}
