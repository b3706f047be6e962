//! Session credential storage
//!
//! Holds the API key for one session together with the provider built from
//! it. A provider handle only exists once a key has successfully produced
//! one, which is what gates every remote call.

use crate::error::{ChatflowError, Result};
use crate::providers::{Provider, ProviderFactory};
use std::fmt;
use std::sync::Arc;

/// Opaque secret string
///
/// `Debug` is redacted and there is no `Display`, so the secret cannot end up
/// in logs or rendered output by accident.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Wrap a secret
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// Borrow the secret for handing to a provider
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// Outcome of a successful [`CredentialHolder::set`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialStatus {
    /// A new provider was built and bound
    Configured,
    /// The same secret was already bound; nothing was rebuilt
    Unchanged,
}

/// Credential gate for one session
pub struct CredentialHolder {
    factory: ProviderFactory,
    bound: Option<(Credential, Arc<dyn Provider>)>,
}

impl CredentialHolder {
    /// Create an empty holder that builds providers with `factory`
    pub fn new(factory: ProviderFactory) -> Self {
        Self {
            factory,
            bound: None,
        }
    }

    /// Bind a secret, building a provider for it
    ///
    /// # Errors
    ///
    /// Returns a credential error for an empty secret, or whatever the factory
    /// returns when it cannot build a provider. On any error the previously
    /// bound secret and provider are kept.
    ///
    /// # Examples
    ///
    /// ```
    /// use chatflow::config::Config;
    /// use chatflow::providers::factory_from_config;
    /// use chatflow::session::{CredentialHolder, CredentialStatus};
    ///
    /// let mut holder = CredentialHolder::new(factory_from_config(&Config::default().provider));
    /// assert!(!holder.is_ready());
    /// assert_eq!(holder.set("sk-ant-test").unwrap(), CredentialStatus::Configured);
    /// assert_eq!(holder.set("sk-ant-test").unwrap(), CredentialStatus::Unchanged);
    /// assert!(holder.is_ready());
    /// ```
    pub fn set(&mut self, secret: &str) -> Result<CredentialStatus> {
        if secret.trim().is_empty() {
            return Err(ChatflowError::Credential("API key cannot be empty".to_string()).into());
        }

        if let Some((current, _)) = &self.bound {
            if current.expose() == secret {
                tracing::debug!("Credential unchanged, keeping existing provider");
                return Ok(CredentialStatus::Unchanged);
            }
        }

        let provider = (self.factory)(secret).map_err(|e| {
            tracing::warn!("Failed to initialize provider from credential: {}", e);
            e
        })?;

        self.bound = Some((Credential::new(secret), provider));
        tracing::info!("Credential configured");
        Ok(CredentialStatus::Configured)
    }

    /// Whether a provider is bound
    pub fn is_ready(&self) -> bool {
        self.bound.is_some()
    }

    /// The bound provider
    ///
    /// # Errors
    ///
    /// Returns a credential error when no key has been configured
    pub fn provider(&self) -> Result<Arc<dyn Provider>> {
        self.bound
            .as_ref()
            .map(|(_, provider)| Arc::clone(provider))
            .ok_or_else(|| {
                ChatflowError::Credential("Please configure your API key first".to_string()).into()
            })
    }
}

impl fmt::Debug for CredentialHolder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialHolder")
            .field("ready", &self.is_ready())
            .finish()
    }
}
