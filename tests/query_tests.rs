//! Integration tests for query parameter generation.
//!
//! Expected parameters are written the way they appear in a URL, and compared
//! without regard to order.

use folio_client::query::{DEFAULT_PAGE_SIZE, ERM_MAX_PERPAGE, HIGHEST_ID, LOWEST_ID};
use folio_client::{QueryError, QueryParameters, QueryParams, QueryType};

const LAST_ID: &str = "a88e5d82-96f7-4d9f-b7d6-1504c3b26a3d";

/// Parses `a=1&b=2` into parameters, splitting each pair on its first `=`.
fn params(query_string: &str) -> QueryParameters {
    query_string
        .split('&')
        .map(|pair| pair.split_once('=').unwrap())
        .collect()
}

fn uut(query: Option<QueryType>, limit: Option<u32>) -> QueryParams {
    match limit {
        Some(limit) => QueryParams::with_limit(query, limit),
        None => QueryParams::new(query),
    }
}

// === normalized ===

#[test]
fn test_normalized_default() {
    let actual = QueryParams::new(None).normalized();

    assert_eq!(actual.get("query"), Some("cql.allRecords=1"));
    assert_eq!(actual.get("filters"), None);
    assert_eq!(actual.get("limit"), Some("100"));
    assert_eq!(actual.get("perPage"), Some("100"));
    assert_eq!(actual.get("stats"), Some("true"));
}

#[test]
fn test_normalized_large_page_is_not_capped() {
    let actual = QueryParams::with_limit(None, 10_000).normalized();

    assert_eq!(actual.get("query"), Some("cql.allRecords=1"));
    assert_eq!(actual.get("limit"), Some("10000"));
    assert_eq!(actual.get("perPage"), Some("10000"));
}

#[test]
fn test_normalized_simple_query() {
    let actual = QueryParams::new(Some("simple query".into())).normalized();

    assert_eq!(
        actual,
        params("query=simple query&filters=simple query&limit=100&perPage=100&stats=true")
    );
}

#[test]
fn test_normalized_explicit_dialects() {
    let cql = QueryParams::new(Some(QueryType::cql("name=A"))).normalized();
    assert_eq!(cql, params("query=name=A&limit=100"));

    let erm = QueryParams::new(Some(QueryType::erm_sorted("name=~A", "name;asc"))).normalized();
    assert_eq!(
        erm,
        params("filters=name=~A&perPage=100&stats=true&sort=name;asc")
    );
}

// === stats ===

#[test]
fn test_stats_default() {
    let actual = QueryParams::with_limit(None, 1000).stats();

    assert_eq!(
        actual,
        params("query=cql.allRecords=1 sortBy id&sort=id;asc&limit=1&perPage=1&stats=true")
    );
}

#[test]
fn test_stats_keeps_existing_cql_sort() {
    let actual = QueryParams::new(Some("name=A sortBy name".into())).stats();

    assert_eq!(actual, params("query=name=A sortBy name&limit=1"));
}

// === offset paging ===

struct OffsetPagingCase {
    query: Option<QueryType>,
    limit: Option<u32>,
    expected: String,
    expected_fifteenth_page: String,
}

fn offset_paging_cases() -> Vec<OffsetPagingCase> {
    let page = DEFAULT_PAGE_SIZE;
    let mut cases = vec![
        // default
        OffsetPagingCase {
            query: None,
            limit: None,
            expected: format!(
                "query=cql.allRecords=1 sortBy id&limit={page}&perPage={page}&stats=true&sort=id;asc&offset=0"
            ),
            expected_fifteenth_page: format!(
                "query=cql.allRecords=1 sortBy id&limit={page}&perPage={page}&stats=true&sort=id;asc&offset={}",
                page * 15
            ),
        },
        // simple query
        OffsetPagingCase {
            query: Some("simple query".into()),
            limit: None,
            expected: format!(
                "query=simple query sortBy id&filters=simple query&limit={page}&perPage={page}&stats=true&sort=id;asc&offset=0"
            ),
            expected_fifteenth_page: format!(
                "query=simple query sortBy id&filters=simple query&limit={page}&perPage={page}&stats=true&sort=id;asc&offset={}",
                page * 15
            ),
        },
        // bigger page than ERM allows
        OffsetPagingCase {
            query: None,
            limit: Some(1000),
            expected: "query=cql.allRecords=1 sortBy id&limit=1000&stats=true&offset=0".to_string(),
            expected_fifteenth_page:
                "query=cql.allRecords=1 sortBy id&limit=1000&stats=true&offset=15000".to_string(),
        },
        // smaller page
        OffsetPagingCase {
            query: None,
            limit: Some(50),
            expected:
                "query=cql.allRecords=1 sortBy id&limit=50&perPage=50&stats=true&sort=id;asc&offset=0"
                    .to_string(),
            expected_fifteenth_page:
                "query=cql.allRecords=1 sortBy id&limit=50&perPage=50&stats=true&sort=id;asc&offset=750"
                    .to_string(),
        },
        // unsorted CQL
        OffsetPagingCase {
            query: Some(QueryType::from_pairs([("query", "simple query")]).unwrap()),
            limit: None,
            expected: format!("query=simple query sortBy id&limit={page}&offset=0"),
            expected_fifteenth_page: format!(
                "query=simple query sortBy id&limit={page}&offset={}",
                page * 15
            ),
        },
        // unsorted ERM
        OffsetPagingCase {
            query: Some(QueryType::from_pairs([("filters", "simple query")]).unwrap()),
            limit: None,
            expected: format!("filters=simple query&perPage={page}&stats=true&sort=id;asc&offset=0"),
            expected_fifteenth_page: format!(
                "filters=simple query&perPage={page}&stats=true&sort=id;asc&offset={}",
                page * 15
            ),
        },
        // sorted ERM
        OffsetPagingCase {
            query: Some(
                QueryType::from_pairs([("filters", "simple query"), ("sort", "index;desc")])
                    .unwrap(),
            ),
            limit: None,
            expected: format!(
                "filters=simple query&perPage={page}&stats=true&sort=index;desc&offset=0"
            ),
            expected_fifteenth_page: format!(
                "filters=simple query&perPage={page}&stats=true&sort=index;desc&offset={}",
                page * 15
            ),
        },
        // ERM caps the page size
        OffsetPagingCase {
            query: Some(QueryType::erm("simple query")),
            limit: Some(1000),
            expected: format!(
                "filters=simple query&perPage={ERM_MAX_PERPAGE}&stats=true&sort=id;asc&offset=0"
            ),
            expected_fifteenth_page: format!(
                "filters=simple query&perPage={ERM_MAX_PERPAGE}&stats=true&sort=id;asc&offset={}",
                ERM_MAX_PERPAGE * 15
            ),
        },
    ];

    // sorted CQL keeps its own sort, whatever the keyword's case
    for query in [
        "simple query sortby index",
        "simple query sortBy index",
        "simple query SORTBY index",
    ] {
        cases.push(OffsetPagingCase {
            query: Some(query.into()),
            limit: None,
            expected: format!("query={query}&limit={page}&offset=0"),
            expected_fifteenth_page: format!("query={query}&limit={page}&offset={}", page * 15),
        });
    }

    cases
}

#[test]
fn test_offset_paging() {
    for case in offset_paging_cases() {
        let uut = uut(case.query.clone(), case.limit);

        assert_eq!(
            uut.offset_paging(0),
            params(&case.expected),
            "first page of {:?}",
            case.query
        );
        assert_eq!(
            uut.offset_paging(15),
            params(&case.expected_fifteenth_page),
            "fifteenth page of {:?}",
            case.query
        );
    }
}

// === id paging ===

#[test]
fn test_id_paging_default() {
    let uut = QueryParams::new(None);

    assert_eq!(
        uut.id_paging(None).unwrap(),
        params(&format!(
            "query=id>{LOWEST_ID} sortBy id&limit=100&perPage=100&stats=true&sort=id;asc&filters=id>{LOWEST_ID}"
        ))
    );
    assert_eq!(
        uut.id_paging(Some(LAST_ID)).unwrap(),
        params(&format!(
            "query=id>{LAST_ID} sortBy id&limit=100&perPage=100&stats=true&sort=id;asc&filters=id>{LAST_ID}"
        ))
    );
}

#[test]
fn test_id_paging_simple_query() {
    let uut = QueryParams::new(Some("simple query".into()));

    assert_eq!(
        uut.id_paging(None).unwrap(),
        params(&format!(
            "query=id>{LOWEST_ID} and (simple query) sortBy id&limit=100&perPage=100&stats=true&sort=id;asc&filters=simple query&filters=id>{LOWEST_ID}"
        ))
    );
    assert_eq!(
        uut.id_paging(Some(LAST_ID)).unwrap(),
        params(&format!(
            "query=id>{LAST_ID} and (simple query) sortBy id&limit=100&perPage=100&stats=true&sort=id;asc&filters=simple query&filters=id>{LAST_ID}"
        ))
    );
}

#[test]
fn test_id_paging_ascending_cql() {
    let mut queries = vec![QueryType::from_pairs([("query", "cql.allRecords=1")]).unwrap()];
    for query in [
        "cql.allRecords=1 sortBy id asc",
        "cql.allRecords=1 sortBy id ASC",
        "cql.allRecords=1 sortby id asc",
        "cql.allRecords=1 sortby id ASC",
        "cql.allRecords=1 SORTBY id asc",
        "cql.allRecords=1 SORTBY id ASC",
        "cql.allRecords=1 sortBy id/sort.ascending",
        "cql.allRecords=1 sortBy id/sort.asc",
        "cql.allRecords=1 sortby id/sort.ascending",
        "cql.allRecords=1 sortby id/sort.asc",
        "cql.allRecords=1 SORTBY id/sort.ascending",
    ] {
        queries.push(query.into());
    }

    for query in queries {
        let uut = QueryParams::new(Some(query.clone()));

        assert_eq!(
            uut.id_paging(None).unwrap(),
            params(&format!("query=id>{LOWEST_ID} sortBy id&limit=100")),
            "first page of {query:?}"
        );
        assert_eq!(
            uut.id_paging(Some(LAST_ID)).unwrap(),
            params(&format!("query=id>{LAST_ID} sortBy id&limit=100")),
            "next page of {query:?}"
        );
    }
}

#[test]
fn test_id_paging_descending_cql() {
    for query in [
        "cql.allRecords=1 sortBy id desc",
        "cql.allRecords=1 sortBy id DESC",
        "cql.allRecords=1 sortby id desc",
        "cql.allRecords=1 sortby id DESC",
        "cql.allRecords=1 SORTBY id desc",
        "cql.allRecords=1 SORTBY id DESC",
        "cql.allRecords=1 sortBy id/sort.descending",
        "cql.allRecords=1 sortBy id/sort.desc",
        "cql.allRecords=1 sortby id/sort.descending",
        "cql.allRecords=1 sortby id/sort.desc",
        "cql.allRecords=1 SORTBY id/sort.descending",
    ] {
        let uut = QueryParams::new(Some(query.into()));

        assert_eq!(
            uut.id_paging(None).unwrap(),
            params(&format!(
                "query=id<{HIGHEST_ID} sortBy id/sort.descending&limit=100"
            )),
            "first page of {query}"
        );
        assert_eq!(
            uut.id_paging(Some(LAST_ID)).unwrap(),
            params(&format!(
                "query=id<{LAST_ID} sortBy id/sort.descending&limit=100"
            )),
            "next page of {query}"
        );
    }
}

#[test]
fn test_id_paging_keeps_cql_filter() {
    let uut = QueryParams::new(Some("active==true sortBy id".into()));

    assert_eq!(
        uut.id_paging(None).unwrap(),
        params(&format!(
            "query=id>{LOWEST_ID} and (active==true) sortBy id&limit=100"
        ))
    );
}

#[test]
fn test_id_paging_rejects_non_id_sort() {
    let uut = QueryParams::new(Some("simple query sortBy index".into()));

    assert_eq!(
        uut.id_paging(None),
        Err(QueryError::UnsupportedIdPagingSort {
            sort: "index".to_string()
        })
    );
}
