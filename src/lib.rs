//! # FOLIO Client
//!
//! An async client for the HTTP APIs of FOLIO, the open source library
//! services platform.
//!
//! ## Overview
//!
//! This crate provides:
//! - Validated connection parameters via [`FolioParams`] and [`FolioParamsBuilder`]
//! - Refresh Token Auth: login with expiring tokens, transparent refresh,
//!   and one re-login when a token is rejected ([`RefreshTokenAuth`])
//! - A factory for resilient clients with retries and timeouts
//!   ([`default_client_factory`], [`ClientFactory`])
//! - Query parameters that work for both CQL and ERM endpoints ([`QueryParams`])
//! - Offset and id paging over whole collections ([`paging`])
//!
//! ## Quick Start
//!
//! ```rust
//! use folio_client::{FolioParams, BaseUrl, Tenant, Username, Password};
//!
//! let params = FolioParams::builder()
//!     .base_url(BaseUrl::new("https://folio-snapshot-okapi.dev.folio.org/").unwrap())
//!     .tenant(Tenant::new("diku").unwrap())
//!     .username(Username::new("diku_admin").unwrap())
//!     .password(Password::new("admin").unwrap())
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(params.base_url().as_ref(), "https://folio-snapshot-okapi.dev.folio.org");
//! ```
//!
//! ## Making API Requests
//!
//! ```rust,ignore
//! use folio_client::{default_client_factory, QueryParams, QueryType};
//!
//! let factory = default_client_factory(params).await?;
//! let client = factory.create(None)?;
//!
//! let query = QueryParams::new(Some(QueryType::cql("personal.lastName==\"Smith\"")));
//! let response = client.get("/users", &query.normalized()).await?;
//! for user in response.records() {
//!     println!("{}", user["username"]);
//! }
//! ```
//!
//! ## Query Parameters
//!
//! FOLIO has two query dialects: CQL (`query`, `limit`, `offset`) and the ERM
//! modules' own (`filters`, `perPage`, `offset`, `stats`). [`QueryParams`]
//! emits parameters accepted by both unless the query is tied to one of them:
//!
//! ```rust
//! use folio_client::{QueryParams, QueryParameters};
//!
//! let params = QueryParams::with_limit(Some("name=~A".into()), 10);
//! let expected: QueryParameters = [
//!     ("query", "name=~A"),
//!     ("limit", "10"),
//!     ("filters", "name=~A"),
//!     ("perPage", "10"),
//!     ("stats", "true"),
//! ]
//! .into_iter()
//! .collect();
//!
//! assert_eq!(params.normalized(), expected);
//! ```
//!
//! ## Design Principles
//!
//! - **No global state**: Parameters and clients are instance-based and passed explicitly
//! - **Fail-fast validation**: All newtypes validate on construction, logins happen eagerly
//! - **Thread-safe**: All types are `Send + Sync`; clients share one token pair
//! - **Async-first**: Designed for use with Tokio async runtime

pub mod auth;
pub mod clients;
pub mod config;
pub mod error;
pub mod factories;
pub mod paging;
pub mod query;

// Re-export public types at crate root for convenience
pub use auth::{AuthError, FolioTokens, RefreshTokenAuth};
pub use config::{BaseUrl, FolioParams, FolioParamsBuilder, Password, Tenant, Username};
pub use error::ConfigError;

// Re-export HTTP client types
pub use clients::{
    DataType, FolioClient, HttpError, HttpMethod, HttpRequest, HttpRequestBuilder, HttpResponse,
    HttpResponseError, InvalidHttpRequestError, MaxHttpRetriesExceededError, RetryPolicy,
};

pub use factories::{default_client_factory, ClientFactory, ClientOptions};
pub use paging::PagingError;
pub use query::{QueryError, QueryParameters, QueryParams, QueryType};
