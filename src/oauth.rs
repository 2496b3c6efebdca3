//! OAuth 2.0 configuration assembled from discovery metadata.

pub use oauth2;

// crates.io
use oauth2::{
	AuthUrl, ClientId, ClientSecret, EndpointNotSet, EndpointSet, Scope, TokenUrl,
	basic::BasicClient,
};
// self
use crate::{_prelude::*, config::ProviderConfig, discovery::ProviderMetadata};

/// Scope every OpenID Connect request must carry.
pub const SCOPE_OPENID: &str = "openid";

/// `oauth2` basic client with authorization and token endpoints configured.
pub type ConfiguredBasicClient =
	BasicClient<EndpointSet, EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointSet>;

/// Authorization and token endpoints copied verbatim from discovery metadata.
#[derive(Clone, Debug)]
pub struct Endpoint {
	/// Authorization endpoint.
	pub auth_url: AuthUrl,
	/// Token endpoint.
	pub token_url: TokenUrl,
}

/// OAuth 2.0 settings used by authorization-code and device flows.
#[derive(Clone, Debug)]
pub struct OAuth2Config {
	/// Provider endpoints.
	pub endpoint: Endpoint,
	/// Client identifier.
	pub client_id: ClientId,
	/// Client secret; `None` for public clients.
	pub client_secret: Option<ClientSecret>,
	/// Requested scopes: caller extras in order, then `openid` exactly once.
	pub scopes: Vec<Scope>,
}
impl OAuth2Config {
	/// Assembles the configuration for `config` against the discovered `metadata`.
	pub fn new(config: &ProviderConfig, metadata: &ProviderMetadata) -> Self {
		Self {
			endpoint: Endpoint {
				auth_url: AuthUrl::from_url(metadata.authorization_endpoint.clone()),
				token_url: TokenUrl::from_url(metadata.token_endpoint.clone()),
			},
			client_id: ClientId::new(config.client_id().to_owned()),
			client_secret: config
				.client_secret()
				.map(|secret| ClientSecret::new(secret.to_owned())),
			scopes: scopes_with_openid(config.extra_scopes()),
		}
	}

	/// Scope names in request order.
	pub fn scope_names(&self) -> Vec<&str> {
		self.scopes.iter().map(|scope| scope.as_str()).collect()
	}

	/// Builds an `oauth2` client ready for authorization and token requests.
	pub fn basic_client(&self) -> ConfiguredBasicClient {
		let client = BasicClient::new(self.client_id.clone())
			.set_auth_uri(self.endpoint.auth_url.clone())
			.set_token_uri(self.endpoint.token_url.clone());

		match &self.client_secret {
			Some(secret) => client.set_client_secret(secret.clone()),
			None => client,
		}
	}
}

/// Returns `extra` (minus any `openid` entries) followed by a single `openid` scope.
pub fn scopes_with_openid<S>(extra: &[S]) -> Vec<Scope>
where
	S: AsRef<str>,
{
	extra
		.iter()
		.map(|scope| AsRef::<str>::as_ref(scope))
		.filter(|scope| *scope != SCOPE_OPENID)
		.chain([SCOPE_OPENID])
		.map(|scope| Scope::new(scope.to_owned()))
		.collect()
}
