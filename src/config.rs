//! Provider configuration supplied by the caller.
//!
//! [`ProviderConfig`] is immutable once built; [`ProviderConfigBuilder::build`] validates the
//! issuer URL, client identifier, and extra scopes so the factory only ever sees usable input.

// std
use std::time::Duration as StdDuration;
// self
use crate::{_prelude::*, tls::CertificatePool, transport::ProxyResolution};

/// Errors raised while validating a provider configuration.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum ProviderConfigError {
	/// Issuer URL cannot be parsed.
	#[error("Issuer URL is invalid: {reason}.")]
	InvalidIssuer {
		/// Why the issuer was rejected.
		reason: String,
	},
	/// Client identifier is empty.
	#[error("Client ID cannot be empty.")]
	MissingClientId,
	/// Empty scope entries are not allowed.
	#[error("Scope entries cannot be empty.")]
	EmptyScope,
	/// Scopes cannot contain embedded whitespace characters.
	#[error("Scope contains whitespace: {scope}.")]
	ScopeContainsWhitespace {
		/// The offending scope string.
		scope: String,
	},
}

/// Immutable provider configuration consumed by the client factory.
#[derive(Clone)]
pub struct ProviderConfig {
	issuer_url: String,
	client_id: String,
	client_secret: Option<String>,
	extra_scopes: Vec<String>,
	skip_tls_verify: bool,
	certificate_pool: Option<CertificatePool>,
	request_timeout: Option<StdDuration>,
	proxy: ProxyResolution,
}
impl ProviderConfig {
	/// Creates a new builder for the provided issuer URL.
	pub fn builder(issuer_url: impl Into<String>) -> ProviderConfigBuilder {
		ProviderConfigBuilder::new(issuer_url)
	}

	/// Issuer URL exactly as configured.
	pub fn issuer_url(&self) -> &str {
		&self.issuer_url
	}

	/// OAuth 2.0 client identifier.
	pub fn client_id(&self) -> &str {
		&self.client_id
	}

	/// Client secret, or `None` for public clients.
	pub fn client_secret(&self) -> Option<&str> {
		self.client_secret.as_deref()
	}

	/// Scopes requested in addition to `openid`, in caller order.
	pub fn extra_scopes(&self) -> &[String] {
		&self.extra_scopes
	}

	/// Whether TLS verification is disabled.
	pub fn skip_tls_verify(&self) -> bool {
		self.skip_tls_verify
	}

	/// Trusted root certificates replacing the system store, if any.
	pub fn certificate_pool(&self) -> Option<&CertificatePool> {
		self.certificate_pool.as_ref()
	}

	/// Per-request deadline applied by the transport.
	pub fn request_timeout(&self) -> Option<StdDuration> {
		self.request_timeout
	}

	/// Proxy resolution mode.
	pub fn proxy(&self) -> ProxyResolution {
		self.proxy
	}
}
impl Debug for ProviderConfig {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ProviderConfig")
			.field("issuer_url", &self.issuer_url)
			.field("client_id", &self.client_id)
			.field("client_secret_set", &self.client_secret.is_some())
			.field("extra_scopes", &self.extra_scopes)
			.field("skip_tls_verify", &self.skip_tls_verify)
			.field("certificate_pool", &self.certificate_pool)
			.field("request_timeout", &self.request_timeout)
			.field("proxy", &self.proxy)
			.finish()
	}
}

/// Builder for [`ProviderConfig`] values.
pub struct ProviderConfigBuilder {
	/// Issuer URL used for discovery.
	pub issuer_url: String,
	/// OAuth 2.0 client identifier.
	pub client_id: String,
	/// Optional client secret; empty strings are treated as absent.
	pub client_secret: Option<String>,
	/// Scopes requested in addition to `openid`.
	pub extra_scopes: Vec<String>,
	/// Disables TLS verification when true.
	pub skip_tls_verify: bool,
	/// Trusted root certificates replacing the system store.
	pub certificate_pool: Option<CertificatePool>,
	/// Per-request deadline.
	pub request_timeout: Option<StdDuration>,
	/// Proxy resolution mode.
	pub proxy: ProxyResolution,
}
impl ProviderConfigBuilder {
	/// Creates a new builder seeded with the provided issuer URL.
	pub fn new(issuer_url: impl Into<String>) -> Self {
		Self {
			issuer_url: issuer_url.into(),
			client_id: String::new(),
			client_secret: None,
			extra_scopes: Vec::new(),
			skip_tls_verify: false,
			certificate_pool: None,
			request_timeout: None,
			proxy: ProxyResolution::default(),
		}
	}

	/// Sets the client identifier.
	pub fn client_id(mut self, client_id: impl Into<String>) -> Self {
		self.client_id = client_id.into();

		self
	}

	/// Sets the client secret.
	pub fn client_secret(mut self, secret: impl Into<String>) -> Self {
		self.client_secret = Some(secret.into());

		self
	}

	/// Appends a single extra scope.
	pub fn extra_scope(mut self, scope: impl Into<String>) -> Self {
		self.extra_scopes.push(scope.into());

		self
	}

	/// Appends multiple extra scopes, preserving order.
	pub fn extra_scopes<I, S>(mut self, scopes: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.extra_scopes.extend(scopes.into_iter().map(Into::into));

		self
	}

	/// Disables (or re-enables) TLS verification.
	pub fn skip_tls_verify(mut self, skip: bool) -> Self {
		self.skip_tls_verify = skip;

		self
	}

	/// Replaces the system trust store with the provided pool.
	pub fn certificate_pool(mut self, pool: CertificatePool) -> Self {
		self.certificate_pool = Some(pool);

		self
	}

	/// Sets a per-request deadline.
	pub fn request_timeout(mut self, timeout: StdDuration) -> Self {
		self.request_timeout = Some(timeout);

		self
	}

	/// Overrides proxy resolution.
	pub fn proxy(mut self, proxy: ProxyResolution) -> Self {
		self.proxy = proxy;

		self
	}

	/// Consumes the builder and validates the resulting configuration.
	pub fn build(self) -> Result<ProviderConfig, ProviderConfigError> {
		validate_issuer(&self.issuer_url)?;

		if self.client_id.trim().is_empty() {
			return Err(ProviderConfigError::MissingClientId);
		}

		for scope in &self.extra_scopes {
			validate_scope(scope)?;
		}

		Ok(ProviderConfig {
			issuer_url: self.issuer_url,
			client_id: self.client_id,
			client_secret: self.client_secret.filter(|secret| !secret.is_empty()),
			extra_scopes: self.extra_scopes,
			skip_tls_verify: self.skip_tls_verify,
			certificate_pool: self.certificate_pool,
			request_timeout: self.request_timeout,
			proxy: self.proxy,
		})
	}
}

impl Debug for ProviderConfigBuilder {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ProviderConfigBuilder")
			.field("issuer_url", &self.issuer_url)
			.field("client_id", &self.client_id)
			.field("client_secret_set", &self.client_secret.is_some())
			.field("extra_scopes", &self.extra_scopes)
			.finish_non_exhaustive()
	}
}

fn validate_issuer(issuer: &str) -> Result<(), ProviderConfigError> {
	let url = Url::parse(issuer)
		.map_err(|e| ProviderConfigError::InvalidIssuer { reason: e.to_string() })?;

	if !matches!(url.scheme(), "https" | "http") {
		return Err(ProviderConfigError::InvalidIssuer {
			reason: format!("unsupported scheme `{}`", url.scheme()),
		});
	}
	if url.query().is_some() {
		return Err(ProviderConfigError::InvalidIssuer { reason: "query string present".into() });
	}
	if url.fragment().is_some() {
		return Err(ProviderConfigError::InvalidIssuer { reason: "fragment present".into() });
	}

	Ok(())
}

fn validate_scope(scope: &str) -> Result<(), ProviderConfigError> {
	if scope.is_empty() {
		return Err(ProviderConfigError::EmptyScope);
	}
	if scope.chars().any(char::is_whitespace) {
		return Err(ProviderConfigError::ScopeContainsWhitespace { scope: scope.to_owned() });
	}

	Ok(())
}
