//! Connection parameters for a FOLIO tenant.
//!
//! # Overview
//!
//! - [`FolioParams`]: everything needed to authenticate against one tenant
//! - [`FolioParamsBuilder`]: a builder for constructing [`FolioParams`]
//! - [`BaseUrl`], [`Tenant`], [`Username`], [`Password`]: validated newtypes
//!
//! # Example
//!
//! ```rust
//! use folio_client::FolioParams;
//!
//! let params = FolioParams::new(
//!     "https://folio-etesting-snapshot-kong.ci.folio.org/",
//!     "diku",
//!     "diku_admin",
//!     "admin",
//! )
//! .unwrap();
//!
//! assert_eq!(params.base_url().as_ref(), "https://folio-etesting-snapshot-kong.ci.folio.org");
//! assert_eq!(params.auth_tenant().as_ref(), "diku");
//! ```

mod newtypes;

pub use newtypes::{BaseUrl, Password, Tenant, Username};

use crate::error::ConfigError;

/// Connection parameters for a single FOLIO tenant.
///
/// `FolioParams` is `Clone`, `Send`, and `Sync`. The password is masked in
/// `Debug` output.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FolioParams {
    base_url: BaseUrl,
    tenant: Tenant,
    username: Username,
    password: Password,
}

impl FolioParams {
    /// Creates validated parameters from raw strings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if any of the values fails validation.
    pub fn new(
        base_url: impl Into<String>,
        tenant: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: BaseUrl::new(base_url)?,
            tenant: Tenant::new(tenant)?,
            username: Username::new(username)?,
            password: Password::new(password)?,
        })
    }

    /// Creates a new builder for constructing `FolioParams`.
    #[must_use]
    pub fn builder() -> FolioParamsBuilder {
        FolioParamsBuilder::new()
    }

    /// Returns the gateway URL, without a trailing slash.
    #[must_use]
    pub const fn base_url(&self) -> &BaseUrl {
        &self.base_url
    }

    /// Returns the tenant the client works in.
    #[must_use]
    pub const fn tenant(&self) -> &Tenant {
        &self.tenant
    }

    /// Returns the tenant used to authenticate and sent as `x-okapi-tenant`.
    ///
    /// For a single-tenant connection this is the same as [`tenant`](Self::tenant).
    #[must_use]
    pub const fn auth_tenant(&self) -> &Tenant {
        &self.tenant
    }

    /// Returns the username.
    #[must_use]
    pub const fn username(&self) -> &Username {
        &self.username
    }

    /// Returns the password.
    #[must_use]
    pub const fn password(&self) -> &Password {
        &self.password
    }
}

// Verify FolioParams is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<FolioParams>();
};

/// Builder for constructing [`FolioParams`] instances.
///
/// All four fields are required.
///
/// # Example
///
/// ```rust
/// use folio_client::{BaseUrl, FolioParams, Password, Tenant, Username};
///
/// let params = FolioParams::builder()
///     .base_url(BaseUrl::new("https://folio.example.org").unwrap())
///     .tenant(Tenant::new("diku").unwrap())
///     .username(Username::new("diku_admin").unwrap())
///     .password(Password::new("admin").unwrap())
///     .build()
///     .unwrap();
///
/// assert_eq!(params.username().as_ref(), "diku_admin");
/// ```
#[derive(Debug, Default)]
pub struct FolioParamsBuilder {
    base_url: Option<BaseUrl>,
    tenant: Option<Tenant>,
    username: Option<Username>,
    password: Option<Password>,
}

impl FolioParamsBuilder {
    /// Creates a new, empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the gateway URL (required).
    #[must_use]
    pub fn base_url(mut self, base_url: BaseUrl) -> Self {
        self.base_url = Some(base_url);
        self
    }

    /// Sets the tenant (required).
    #[must_use]
    pub fn tenant(mut self, tenant: Tenant) -> Self {
        self.tenant = Some(tenant);
        self
    }

    /// Sets the username (required).
    #[must_use]
    pub fn username(mut self, username: Username) -> Self {
        self.username = Some(username);
        self
    }

    /// Sets the password (required).
    #[must_use]
    pub fn password(mut self, password: Password) -> Self {
        self.password = Some(password);
        self
    }

    /// Builds the [`FolioParams`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequiredField`] naming the first unset field.
    pub fn build(self) -> Result<FolioParams, ConfigError> {
        let base_url = self
            .base_url
            .ok_or(ConfigError::MissingRequiredField { field: "base_url" })?;
        let tenant = self
            .tenant
            .ok_or(ConfigError::MissingRequiredField { field: "tenant" })?;
        let username = self
            .username
            .ok_or(ConfigError::MissingRequiredField { field: "username" })?;
        let password = self
            .password
            .ok_or(ConfigError::MissingRequiredField { field: "password" })?;

        Ok(FolioParams {
            base_url,
            tenant,
            username,
            password,
        })
    }
}
