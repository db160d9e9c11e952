//! Walking every page of a FOLIO collection.
//!
//! These helpers drive the parameters produced by [`QueryParams`] against a
//! [`FolioClient`] and collect the records.
//!
//! # Example
//!
//! ```rust,ignore
//! use folio_client::{paging, QueryParams};
//!
//! let params = QueryParams::with_limit(Some("active==true".into()), 500);
//! let total = paging::count(&client, "/users", &params).await?;
//! let users = paging::fetch_all_by_id(&client, "/users", &params).await?;
//! assert_eq!(users.len() as u64, total);
//! ```

use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::clients::{FolioClient, HttpError};
use crate::query::{QueryError, QueryParams};

/// Errors produced while paging through a collection.
#[derive(Debug, Error)]
pub enum PagingError {
    /// A page request failed.
    #[error(transparent)]
    Http(#[from] HttpError),

    /// The query cannot be paged this way.
    #[error(transparent)]
    Query(#[from] QueryError),

    /// Id paging received a record without a string `id`.
    #[error("Record {index} of the page has no 'id', cannot request the next page.")]
    MissingId {
        /// Position of the record within its page.
        index: usize,
    },

    /// A count was requested but the response had no `totalRecords`.
    #[error("The response did not include 'totalRecords'.")]
    MissingTotalRecords,

    /// A walk over pages of zero records would never advance.
    #[error("Cannot page with a page size of 0.")]
    ZeroPageSize,
}

/// Returns the page size of `params`, rejecting zero.
fn checked_page_size(params: &QueryParams) -> Result<usize, PagingError> {
    match params.page_size() {
        0 => Err(PagingError::ZeroPageSize),
        size => Ok(usize::try_from(size).unwrap_or(usize::MAX)),
    }
}

/// Fetches every matching record with offset paging.
///
/// Stops at the first page holding fewer records than the page size.
///
/// # Errors
///
/// - [`PagingError::ZeroPageSize`] if `params` asks for empty pages
/// - [`PagingError::Http`] if any page request fails
pub async fn fetch_all_offset(
    client: &FolioClient,
    path: &str,
    params: &QueryParams,
) -> Result<Vec<Value>, PagingError> {
    let page_size = checked_page_size(params)?;
    let mut records = Vec::new();

    for page in 0.. {
        let response = client.get(path, &params.offset_paging(page)).await?;
        let batch = response.records();
        debug!(path, page, received = batch.len(), "Fetched offset page");

        records.extend_from_slice(batch);
        if batch.len() < page_size {
            break;
        }
    }

    Ok(records)
}

/// Fetches every matching record with id paging.
///
/// Each page asks for records past the last `id` of the previous one. Stops
/// at the first page holding fewer records than the page size.
///
/// # Errors
///
/// - [`PagingError::ZeroPageSize`] if `params` asks for empty pages
/// - [`PagingError::Query`] if the query sorts by something other than `id`
/// - [`PagingError::MissingId`] if a page's last record has no `id`
/// - [`PagingError::Http`] if any page request fails
pub async fn fetch_all_by_id(
    client: &FolioClient,
    path: &str,
    params: &QueryParams,
) -> Result<Vec<Value>, PagingError> {
    let page_size = checked_page_size(params)?;
    let mut records = Vec::new();
    let mut last_id: Option<String> = None;

    loop {
        let query = params.id_paging(last_id.as_deref())?;
        let response = client.get(path, &query).await?;
        let batch = response.records();
        debug!(path, after = ?last_id, received = batch.len(), "Fetched id page");

        if batch.len() < page_size {
            records.extend_from_slice(batch);
            break;
        }

        let index = batch.len() - 1;
        let id = batch[index]
            .get("id")
            .and_then(Value::as_str)
            .ok_or(PagingError::MissingId { index })?;
        last_id = Some(id.to_string());
        records.extend_from_slice(batch);
    }

    Ok(records)
}

/// Counts matching records without fetching them.
///
/// # Errors
///
/// - [`PagingError::Http`] if the request fails
/// - [`PagingError::MissingTotalRecords`] if the endpoint reports no count
pub async fn count(
    client: &FolioClient,
    path: &str,
    params: &QueryParams,
) -> Result<u64, PagingError> {
    let response = client.get(path, &params.stats()).await?;
    response
        .total_records()
        .ok_or(PagingError::MissingTotalRecords)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::clients::RetryPolicy;
    use crate::config::{BaseUrl, Tenant};
    use crate::query::QueryType;

    fn unreachable_client() -> FolioClient {
        FolioClient::new(
            BaseUrl::new("http://127.0.0.1:9").unwrap(),
            &Tenant::new("diku").unwrap(),
            None,
            RetryPolicy::disabled(),
            Duration::from_secs(1),
        )
        .unwrap()
    }

    #[test]
    fn test_zero_page_size_is_rejected_before_any_request() {
        let client = unreachable_client();
        let cql = QueryParams::with_limit(Some(QueryType::cql("active==true")), 0);
        let erm = QueryParams::with_limit(Some(QueryType::erm("name=~A")), 0);

        let offset = tokio_test::block_on(fetch_all_offset(&client, "/users", &cql));
        assert!(matches!(offset, Err(PagingError::ZeroPageSize)));

        let by_id = tokio_test::block_on(fetch_all_by_id(&client, "/erm/sas", &erm));
        assert!(matches!(by_id, Err(PagingError::ZeroPageSize)));
    }

    #[test]
    fn test_paging_error_messages() {
        assert_eq!(
            PagingError::MissingId { index: 9 }.to_string(),
            "Record 9 of the page has no 'id', cannot request the next page."
        );

        let query: PagingError = QueryError::UnsupportedIdPagingSort {
            sort: "index".to_string(),
        }
        .into();
        assert!(query.to_string().contains("index"));
    }
}
