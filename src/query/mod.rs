//! A compatibility layer over FOLIO query parameters.
//!
//! FOLIO modules disagree on how lists are filtered, sorted and paged. Most
//! endpoints take CQL (`query`, `limit`, `offset`), while ERM endpoints
//! (`/erm/...`) take `filters`, `sort`, `perPage`, `offset` and only report
//! `totalRecords` when `stats=true` is passed. [`QueryParams`] produces
//! parameters that work on both kinds of endpoint where possible, and on the
//! intended kind when the query says which it is.
//!
//! # Example
//!
//! ```rust
//! use folio_client::query::{QueryParams, DEFAULT_PAGE_SIZE};
//!
//! let params = QueryParams::new(Some("name=~A".into())).offset_paging(2);
//!
//! assert_eq!(params.get("query"), Some("name=~A sortBy id"));
//! assert_eq!(params.get("filters"), Some("name=~A"));
//! assert_eq!(params.get("offset"), Some("200"));
//! assert_eq!(DEFAULT_PAGE_SIZE, 100);
//! ```

mod cql;
mod parameters;

pub use cql::IdSort;
pub use parameters::QueryParameters;

use thiserror::Error;

use cql::{matches_all, parse_erm_id_sort, parse_id_sort, split_sort};

/// Page size used when none is given.
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Largest `perPage` ERM endpoints honour.
pub const ERM_MAX_PERPAGE: u32 = 100;

/// CQL query matching every record.
pub const ALL_RECORDS: &str = "cql.allRecords=1";

/// Lower bound for ascending id paging.
pub const LOWEST_ID: &str = "00000000-0000-0000-0000-000000000000";

/// Upper bound for descending id paging.
pub const HIGHEST_ID: &str = "99999999-9999-9999-9999-999999999999";

const DEFAULT_ERM_SORT: &str = "id;asc";

/// Errors produced while building query parameters.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// A query map used a key other than `query`, `filters` or `sort`.
    #[error("Unsupported query key '{key}'. Expected 'query', 'filters' or 'sort'.")]
    UnknownKey {
        /// The unsupported key.
        key: String,
    },

    /// A query map set both a CQL `query` and ERM `filters`.
    #[error("A query cannot set both 'query' and 'filters'.")]
    ConflictingKeys,

    /// A query map set neither `query` nor `filters`.
    #[error("A query needs either 'query' or 'filters'.")]
    MissingQuery,

    /// Id paging was requested for a query sorted by something other than id.
    #[error("Id paging requires sorting by id, but the query sorts by '{sort}'.")]
    UnsupportedIdPagingSort {
        /// The sort clause that was found.
        sort: String,
    },
}

/// A query, optionally tied to one endpoint family.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QueryType {
    /// A bare query string.
    ///
    /// Sent as both CQL `query` and ERM `filters`, unless it carries a
    /// `sortBy` clause, which only CQL endpoints understand.
    Ambiguous(String),
    /// A CQL query for non-ERM endpoints.
    Cql {
        /// The CQL query, optionally with a `sortBy` clause.
        query: String,
    },
    /// An ERM filter for `/erm` endpoints.
    Erm {
        /// The ERM `filters` expression.
        filters: String,
        /// The ERM `sort` expression (e.g. `name;desc`).
        sort: Option<String>,
    },
}

impl QueryType {
    /// Creates a CQL-only query.
    #[must_use]
    pub fn cql(query: impl Into<String>) -> Self {
        Self::Cql {
            query: query.into(),
        }
    }

    /// Creates an ERM-only query.
    #[must_use]
    pub fn erm(filters: impl Into<String>) -> Self {
        Self::Erm {
            filters: filters.into(),
            sort: None,
        }
    }

    /// Creates an ERM-only query with an explicit sort.
    #[must_use]
    pub fn erm_sorted(filters: impl Into<String>, sort: impl Into<String>) -> Self {
        Self::Erm {
            filters: filters.into(),
            sort: Some(sort.into()),
        }
    }

    /// Creates a query from named parts, as they would appear in a request.
    ///
    /// A `query` key makes a CQL query; a `filters` key (with an optional
    /// `sort`) makes an ERM query.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError`] for unknown keys, for both `query` and
    /// `filters`, or for neither.
    ///
    /// # Example
    ///
    /// ```rust
    /// use folio_client::query::QueryType;
    ///
    /// let query = QueryType::from_pairs([("filters", "name=~A"), ("sort", "name;asc")]).unwrap();
    /// assert_eq!(query, QueryType::erm_sorted("name=~A", "name;asc"));
    /// ```
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self, QueryError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut query = None;
        let mut filters = None;
        let mut sort = None;

        for (key, value) in pairs {
            match key.as_ref() {
                "query" => query = Some(value.into()),
                "filters" => filters = Some(value.into()),
                "sort" => sort = Some(value.into()),
                other => {
                    return Err(QueryError::UnknownKey {
                        key: other.to_string(),
                    })
                }
            }
        }

        match (query, filters) {
            (Some(_), Some(_)) => Err(QueryError::ConflictingKeys),
            (Some(query), None) if sort.is_none() => Ok(Self::Cql { query }),
            (Some(_), None) => Err(QueryError::UnknownKey {
                key: "sort".to_string(),
            }),
            (None, Some(filters)) => Ok(Self::Erm { filters, sort }),
            (None, None) => Err(QueryError::MissingQuery),
        }
    }
}

impl From<&str> for QueryType {
    fn from(query: &str) -> Self {
        Self::Ambiguous(query.to_string())
    }
}

impl From<String> for QueryType {
    fn from(query: String) -> Self {
        Self::Ambiguous(query)
    }
}

/// The CQL half of a request.
struct CqlPlan<'a> {
    original: Option<&'a str>,
    filter: Option<&'a str>,
    sort: Option<&'a str>,
}

/// The ERM half of a request.
struct ErmPlan<'a> {
    filters: Option<&'a str>,
    sort: Option<&'a str>,
    per_page: u32,
}

struct Plan<'a> {
    cql: Option<CqlPlan<'a>>,
    erm: Option<ErmPlan<'a>>,
    stats: bool,
}

/// A container for generating FOLIO query parameters.
///
/// One `QueryParams` can produce the parameters for a plain listing
/// ([`normalized`](Self::normalized)), a record count ([`stats`](Self::stats)),
/// or each page of an offset or id based walk over the results.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueryParams {
    query: Option<QueryType>,
    limit: u32,
}

impl QueryParams {
    /// Creates parameters with the default page size.
    #[must_use]
    pub const fn new(query: Option<QueryType>) -> Self {
        Self::with_limit(query, DEFAULT_PAGE_SIZE)
    }

    /// Creates parameters with an explicit page size.
    #[must_use]
    pub const fn with_limit(query: Option<QueryType>, limit: u32) -> Self {
        Self { query, limit }
    }

    /// Returns the query, if any.
    #[must_use]
    pub const fn query(&self) -> Option<&QueryType> {
        self.query.as_ref()
    }

    /// Returns the requested page size.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Returns the number of records a page actually holds.
    ///
    /// This is the requested limit, except for ERM-only queries, which are
    /// capped at [`ERM_MAX_PERPAGE`].
    #[must_use]
    pub fn page_size(&self) -> u32 {
        let plan = self.plan(self.limit);
        match (plan.cql, plan.erm) {
            (None, Some(erm)) => erm.per_page,
            _ => self.limit,
        }
    }

    /// Parameters compatible with all FOLIO endpoints, without paging.
    ///
    /// The query is sent as CQL `query` (defaulting to `cql.allRecords=1`) and
    /// as ERM `filters`, the page size as both `limit` and `perPage`, and
    /// `stats=true` makes ERM endpoints report `totalRecords` like the others.
    #[must_use]
    pub fn normalized(&self) -> QueryParameters {
        let mut params = QueryParameters::new();

        let query = match &self.query {
            Some(QueryType::Cql { query }) => {
                params.push("query", query);
                params.push("limit", self.limit);
                return params;
            }
            Some(QueryType::Erm { filters, sort }) => {
                params.push("filters", filters);
                params.push("perPage", self.limit);
                params.push("stats", true);
                if let Some(sort) = sort {
                    params.push("sort", sort);
                }
                return params;
            }
            Some(QueryType::Ambiguous(query)) if split_sort(query).1.is_some() => {
                params.push("query", query);
                params.push("limit", self.limit);
                return params;
            }
            Some(QueryType::Ambiguous(query)) => Some(query.as_str()),
            None => None,
        };

        params.push("query", query.unwrap_or(ALL_RECORDS));
        params.push("limit", self.limit);
        params.push("perPage", self.limit);
        params.push("stats", true);
        if let Some(query) = query.filter(|q| !matches_all(q)) {
            params.push("filters", query);
        }

        params
    }

    /// Parameters that only count matching records.
    ///
    /// The request asks for a single record; read `totalRecords` from the
    /// response.
    #[must_use]
    pub fn stats(&self) -> QueryParameters {
        let plan = self.plan(1);
        let mut params = QueryParameters::new();
        Self::push_sorted(&plan, 1, &mut params);
        params
    }

    /// Parameters for page `page` (zero-based) of an offset walk.
    ///
    /// Results are sorted by id unless the query already sorts, so pages stay
    /// stable between requests.
    #[must_use]
    pub fn offset_paging(&self, page: u32) -> QueryParameters {
        let plan = self.plan(self.limit);
        let mut params = QueryParameters::new();
        Self::push_sorted(&plan, self.limit, &mut params);

        let page_size = match (&plan.cql, &plan.erm) {
            (None, Some(erm)) => erm.per_page,
            _ => self.limit,
        };
        params.push("offset", u64::from(page) * u64::from(page_size));
        params
    }

    /// Parameters for the page after `last_id` of an id (keyset) walk.
    ///
    /// Pass `None` for the first page, then the `id` of the last record
    /// received. Unlike offset paging, this stays fast and consistent for
    /// very large result sets.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::UnsupportedIdPagingSort`] if the query sorts by
    /// anything other than `id`.
    pub fn id_paging(&self, last_id: Option<&str>) -> Result<QueryParameters, QueryError> {
        let plan = self.plan(self.limit);
        let mut params = QueryParameters::new();

        if let Some(cql) = &plan.cql {
            let direction = match cql.sort {
                None => IdSort::Ascending,
                Some(sort) => {
                    parse_id_sort(sort).ok_or_else(|| QueryError::UnsupportedIdPagingSort {
                        sort: sort.to_string(),
                    })?
                }
            };

            let bound = id_bound(direction, last_id);
            let clause = cql
                .filter
                .map_or_else(|| bound.clone(), |filter| format!("{bound} and ({filter})"));
            let sort = match direction {
                IdSort::Ascending => "sortBy id",
                IdSort::Descending => "sortBy id/sort.descending",
            };

            params.push("query", format!("{clause} {sort}"));
            params.push("limit", self.limit);
        }

        if let Some(erm) = &plan.erm {
            let direction = match erm.sort {
                None => IdSort::Ascending,
                Some(sort) => {
                    parse_erm_id_sort(sort).ok_or_else(|| QueryError::UnsupportedIdPagingSort {
                        sort: sort.to_string(),
                    })?
                }
            };

            if let Some(filters) = erm.filters {
                params.push("filters", filters);
            }
            params.push("filters", id_bound(direction, last_id));
            params.push("perPage", erm.per_page);
            params.push(
                "sort",
                match direction {
                    IdSort::Ascending => "id;asc",
                    IdSort::Descending => "id;desc",
                },
            );
        }

        if plan.stats {
            params.push("stats", true);
        }

        Ok(params)
    }

    /// Pushes the query, sort, page size and stats parameters shared by
    /// offset paging and stats.
    fn push_sorted(plan: &Plan<'_>, limit: u32, params: &mut QueryParameters) {
        if let Some(cql) = &plan.cql {
            let query = match (cql.sort, cql.original) {
                (Some(_), Some(original)) => original.to_string(),
                _ => format!("{} sortBy id", cql.filter.unwrap_or(ALL_RECORDS)),
            };
            params.push("query", query);
            params.push("limit", limit);
        }

        if let Some(erm) = &plan.erm {
            if let Some(filters) = erm.filters {
                params.push("filters", filters);
            }
            params.push("perPage", erm.per_page);
            params.push("sort", erm.sort.unwrap_or(DEFAULT_ERM_SORT));
        }

        if plan.stats {
            params.push("stats", true);
        }
    }

    /// Decides which endpoint families a request targets.
    ///
    /// An unspecified or ambiguous query targets both, as long as the page
    /// fits into an ERM page; a larger page only works on CQL endpoints.
    fn plan(&self, limit: u32) -> Plan<'_> {
        let erm_capable = limit <= ERM_MAX_PERPAGE;

        match &self.query {
            None => Plan {
                cql: Some(CqlPlan {
                    original: None,
                    filter: None,
                    sort: None,
                }),
                erm: erm_capable.then_some(ErmPlan {
                    filters: None,
                    sort: None,
                    per_page: limit,
                }),
                stats: true,
            },
            Some(QueryType::Ambiguous(query)) => {
                let (filter, sort) = split_sort(query);
                let filter = Some(filter).filter(|f| !matches_all(f));

                if sort.is_some() {
                    return Plan {
                        cql: Some(CqlPlan {
                            original: Some(query.as_str()),
                            filter,
                            sort,
                        }),
                        erm: None,
                        stats: false,
                    };
                }

                Plan {
                    cql: Some(CqlPlan {
                        original: Some(query.as_str()),
                        filter,
                        sort: None,
                    }),
                    erm: erm_capable.then_some(ErmPlan {
                        filters: filter,
                        sort: None,
                        per_page: limit,
                    }),
                    stats: true,
                }
            }
            Some(QueryType::Cql { query }) => {
                let (filter, sort) = split_sort(query);
                Plan {
                    cql: Some(CqlPlan {
                        original: Some(query.as_str()),
                        filter: Some(filter).filter(|f| !matches_all(f)),
                        sort,
                    }),
                    erm: None,
                    stats: false,
                }
            }
            Some(QueryType::Erm { filters, sort }) => Plan {
                cql: None,
                erm: Some(ErmPlan {
                    filters: Some(filters.as_str()).filter(|f| !f.trim().is_empty()),
                    sort: sort.as_deref(),
                    per_page: limit.min(ERM_MAX_PERPAGE),
                }),
                stats: true,
            },
        }
    }
}

fn id_bound(direction: IdSort, last_id: Option<&str>) -> String {
    match direction {
        IdSort::Ascending => format!("id>{}", last_id.unwrap_or(LOWEST_ID)),
        IdSort::Descending => format!("id<{}", last_id.unwrap_or(HIGHEST_ID)),
    }
}

impl Default for QueryParams {
    fn default() -> Self {
        Self::new(None)
    }
}
