//! OpenID Connect discovery.
//!
//! [`discover`] fetches `{issuer}/.well-known/openid-configuration` through a caller-supplied
//! HTTP client, so the TLS policy and logging of that client apply to the request. The
//! document is decoded into typed [`ProviderMetadata`] while the raw claim map is kept for
//! non-standard fields such as `code_challenge_methods_supported`.

// crates.io
use oauth2::{
	AsyncHttpClient, HttpRequest,
	http::{Method, Request, header::ACCEPT},
};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
// self
use crate::{_prelude::*, error::DiscoveryError};

/// Path appended to the issuer to locate the discovery document.
pub const WELL_KNOWN_PATH: &str = "/.well-known/openid-configuration";

const BODY_PREVIEW_LIMIT: usize = 512;

/// Provider metadata obtained once during client construction; read-only afterwards.
#[derive(Clone, Debug, PartialEq)]
pub struct ProviderMetadata {
	/// Issuer identifier returned by the provider.
	pub issuer: String,
	/// Authorization endpoint.
	pub authorization_endpoint: Url,
	/// Token endpoint.
	pub token_endpoint: Url,
	/// UserInfo endpoint, when published.
	pub userinfo_endpoint: Option<Url>,
	/// JWKS document location, when published.
	pub jwks_uri: Option<Url>,
	/// Scopes the provider advertises.
	pub scopes_supported: Vec<String>,
	/// ID token signing algorithms the provider advertises.
	pub id_token_signing_alg_values_supported: Vec<String>,
	raw: Map<String, Value>,
}
impl ProviderMetadata {
	/// Parses a discovery document body.
	pub fn from_json(body: &[u8]) -> Result<Self, serde_path_to_error::Error<serde_json::Error>> {
		let raw: Map<String, Value> =
			serde_path_to_error::deserialize(&mut serde_json::Deserializer::from_slice(body))?;
		let document: DiscoveryDocument =
			serde_path_to_error::deserialize(Value::Object(raw.clone()))?;

		Ok(Self {
			issuer: document.issuer,
			authorization_endpoint: document.authorization_endpoint,
			token_endpoint: document.token_endpoint,
			userinfo_endpoint: document.userinfo_endpoint,
			jwks_uri: document.jwks_uri,
			scopes_supported: document.scopes_supported.unwrap_or_default(),
			id_token_signing_alg_values_supported: document
				.id_token_signing_alg_values_supported
				.unwrap_or_default(),
			raw,
		})
	}

	/// Raw claims of the discovery document, including non-standard fields.
	pub fn raw_claims(&self) -> &Map<String, Value> {
		&self.raw
	}

	/// Decodes the raw claims into `T`, reporting the JSON path on failure.
	pub fn claims<T>(&self) -> Result<T, serde_path_to_error::Error<serde_json::Error>>
	where
		T: DeserializeOwned,
	{
		serde_path_to_error::deserialize(Value::Object(self.raw.clone()))
	}
}

#[derive(Deserialize)]
struct DiscoveryDocument {
	issuer: String,
	authorization_endpoint: Url,
	token_endpoint: Url,
	#[serde(default)]
	userinfo_endpoint: Option<Url>,
	#[serde(default)]
	jwks_uri: Option<Url>,
	#[serde(default)]
	scopes_supported: Option<Vec<String>>,
	#[serde(default)]
	id_token_signing_alg_values_supported: Option<Vec<String>>,
}

/// Returns the discovery document URL for `issuer`.
pub fn well_known_url(issuer: &str) -> String {
	format!("{}{WELL_KNOWN_PATH}", issuer.trim_end_matches('/'))
}

/// Performs one discovery request against `issuer` using `http_client`.
///
/// No retries happen here. Dropping the returned future cancels the request; deadlines come
/// from the HTTP client.
pub async fn discover<C>(http_client: &C, issuer: &str) -> Result<ProviderMetadata, DiscoveryError>
where
	C: ?Sized + for<'c> AsyncHttpClient<'c, Error: Send + Sync>,
{
	let url = well_known_url(issuer);
	let request: HttpRequest = Request::builder()
		.method(Method::GET)
		.uri(&url)
		.header(ACCEPT, "application/json")
		.body(Vec::new())
		.map_err(|e| DiscoveryError::request(&url, e))?;
	let response =
		http_client.call(request).await.map_err(|e| DiscoveryError::request(&url, e))?;
	let status = response.status();

	if !status.is_success() {
		return Err(DiscoveryError::Status {
			url,
			status: status.as_u16(),
			body_preview: body_preview(response.body()),
		});
	}

	let metadata = ProviderMetadata::from_json(response.body())
		.map_err(|source| DiscoveryError::Document { url: url.clone(), source })?;

	if metadata.issuer.trim_end_matches('/') != issuer.trim_end_matches('/') {
		return Err(DiscoveryError::IssuerMismatch {
			expected: issuer.to_owned(),
			actual: metadata.issuer,
		});
	}

	Ok(metadata)
}

fn body_preview(body: &[u8]) -> String {
	let text = String::from_utf8_lossy(body);
	let trimmed = text.trim();

	match trimmed.char_indices().nth(BODY_PREVIEW_LIMIT) {
		Some((idx, _)) => format!("{}…", &trimmed[..idx]),
		None => trimmed.to_owned(),
	}
}
