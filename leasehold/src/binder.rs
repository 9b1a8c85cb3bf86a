//! Injection of materialized secrets into a per-request environment.

use crate::error::{Error, Result};
use crate::manager::LeaseManager;
use crate::store::SecretStore;
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use tracing::{info, instrument};
use zeroize::Zeroizing;

/// Where the platform identity token comes from.
///
/// Kubernetes rotates projected service account tokens on disk, so the
/// file variant is re-read on every bind rather than cached.
pub enum TokenSource {
    /// The token itself, held zeroized in memory.
    Literal(Zeroizing<String>),
    /// Path to a file containing the token.
    File(PathBuf),
}

impl TokenSource {
    /// Use the given token directly.
    #[must_use]
    pub fn literal(token: impl Into<String>) -> Self {
        Self::Literal(Zeroizing::new(token.into()))
    }

    /// Read the token from `path` on every bind.
    #[must_use]
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::File(path.into())
    }

    /// Interpret a configured value the way operators supply it: a path to
    /// an existing file is read from disk, anything else is the token
    /// itself.
    #[must_use]
    pub fn detect(value: impl Into<String>) -> Self {
        let value = value.into();
        let path = PathBuf::from(&value);
        if path.is_file() {
            Self::File(path)
        } else {
            Self::Literal(Zeroizing::new(value))
        }
    }

    /// Produce the token value.
    ///
    /// # Errors
    ///
    /// An unreadable token file surfaces as an authentication error, since
    /// nothing can be fetched without it.
    pub async fn resolve(&self) -> Result<Zeroizing<String>> {
        match self {
            Self::Literal(token) => Ok(token.clone()),
            Self::File(path) => {
                let contents = tokio::fs::read_to_string(path).await.map_err(|e| {
                    Error::auth_failed(format!("cannot read token file {}: {e}", path.display()))
                })?;
                Ok(Zeroizing::new(contents.trim().to_string()))
            }
        }
    }
}

impl fmt::Debug for TokenSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(_) => f.write_str("TokenSource::Literal([REDACTED])"),
            Self::File(path) => f.debug_tuple("TokenSource::File").field(path).finish(),
        }
    }
}

/// Binds materialized secrets into an ambient environment before each unit
/// of work.
pub struct RequestBinder<S> {
    manager: LeaseManager<S>,
    token: TokenSource,
    role: String,
}

impl<S: SecretStore> RequestBinder<S> {
    /// Create a binder that authenticates as `role`.
    #[must_use]
    pub fn new(manager: LeaseManager<S>, token: TokenSource, role: impl Into<String>) -> Self {
        Self {
            manager,
            token,
            role: role.into(),
        }
    }

    /// The managed request set behind this binder.
    #[must_use]
    pub const fn manager(&self) -> &LeaseManager<S> {
        &self.manager
    }

    /// Materialize every declared secret and write it into `env`.
    ///
    /// A value replacing a different one under the same key is logged and
    /// overwritten; rotation is expected, not an error.
    ///
    /// # Errors
    ///
    /// Any materialization failure propagates unchanged and `env` keeps its
    /// previous contents.
    #[instrument(skip_all, fields(role = %self.role))]
    pub async fn bind(&self, env: &mut HashMap<String, String>) -> Result<()> {
        let token = self.token.resolve().await?;
        let pairs = self.manager.materialize(&token, &self.role).await?;

        for (key, value) in pairs {
            if let Some(previous) = env.get(&key) {
                if *previous != value {
                    info!(%key, "secret value changed since last injection");
                }
            }
            env.insert(key, value);
        }
        Ok(())
    }
}
