//! Immutable provider client produced by the factory.

// self
use crate::{
	_prelude::*,
	clock::Clock,
	discovery::ProviderMetadata,
	http::OidcHttpClient,
	logger::Logger,
	oauth::OAuth2Config,
	pkce::{self, PkceMethod},
};

/// Authenticated-session handle bundling everything flow implementations need.
///
/// Every field is fixed at construction. Cloning is cheap enough for per-flow copies; the
/// HTTP client shares its connection pool across clones.
#[derive(Clone)]
pub struct Client {
	http_client: OidcHttpClient,
	metadata: ProviderMetadata,
	oauth2_config: OAuth2Config,
	supported_pkce_methods: Vec<String>,
	clock: Arc<dyn Clock>,
	logger: Arc<dyn Logger>,
}
impl Client {
	pub(crate) fn new(
		http_client: OidcHttpClient,
		metadata: ProviderMetadata,
		oauth2_config: OAuth2Config,
		supported_pkce_methods: Vec<String>,
		clock: Arc<dyn Clock>,
		logger: Arc<dyn Logger>,
	) -> Self {
		Self { http_client, metadata, oauth2_config, supported_pkce_methods, clock, logger }
	}

	/// Instrumented HTTP client; pass it to `oauth2` request builders.
	pub fn http_client(&self) -> &OidcHttpClient {
		&self.http_client
	}

	/// Discovery metadata.
	pub fn metadata(&self) -> &ProviderMetadata {
		&self.metadata
	}

	/// OAuth 2.0 configuration (endpoints, credentials, scopes).
	pub fn oauth2_config(&self) -> &OAuth2Config {
		&self.oauth2_config
	}

	/// PKCE methods advertised by the provider, in document order; empty when none declared.
	pub fn supported_pkce_methods(&self) -> &[String] {
		&self.supported_pkce_methods
	}

	/// Returns true when the provider advertises `method`.
	pub fn supports_pkce_method(&self, method: &str) -> bool {
		self.supported_pkce_methods.iter().any(|value| value == method)
	}

	/// Strongest advertised PKCE method, if any.
	pub fn preferred_pkce_method(&self) -> Option<PkceMethod> {
		pkce::preferred_method(&self.supported_pkce_methods)
	}

	/// Current time according to the injected clock.
	pub fn now(&self) -> OffsetDateTime {
		self.clock.now()
	}

	/// Injected clock.
	pub fn clock(&self) -> &Arc<dyn Clock> {
		&self.clock
	}

	/// Injected logger.
	pub fn logger(&self) -> &Arc<dyn Logger> {
		&self.logger
	}
}
impl Debug for Client {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Client")
			.field("issuer", &self.metadata.issuer)
			.field("client_id", &self.oauth2_config.client_id.as_str())
			.field("client_secret_set", &self.oauth2_config.client_secret.is_some())
			.field("scopes", &self.oauth2_config.scope_names())
			.field("supported_pkce_methods", &self.supported_pkce_methods)
			.finish()
	}
}
