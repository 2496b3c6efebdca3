//! Crate-level error types shared by the transport builder, discovery, and the client factory.

// self
use crate::{
	_prelude::*,
	config::ProviderConfigError,
	tls::CertificatePoolError,
};

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

pub(crate) type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
///
/// Construction is all-or-nothing: every variant means no client was produced.
/// Nothing here is retried internally.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Provider metadata could not be retrieved.
	#[error(transparent)]
	Discovery(#[from] DiscoveryError),
	/// Provider metadata was retrieved but the PKCE capability field is malformed.
	#[error(transparent)]
	MetadataParse(#[from] MetadataParseError),
}

/// Configuration and validation failures raised before any network traffic.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Provider configuration failed validation.
	#[error(transparent)]
	Provider(#[from] ProviderConfigError),
	/// Certificate authority material could not be loaded.
	#[error(transparent)]
	CertificatePool(#[from] CertificatePoolError),
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// OIDC discovery failures (network, non-success response, malformed document).
#[derive(Debug, ThisError)]
pub enum DiscoveryError {
	/// The discovery request could not be completed (DNS, TCP, TLS, timeout).
	#[error("OIDC discovery request to {url} failed: {message}.")]
	Request {
		/// Discovery document URL.
		url: String,
		/// Rendered cause chain of the transport failure.
		message: String,
		/// Underlying transport failure.
		#[source]
		source: BoxError,
	},
	/// The provider answered with a non-success status.
	#[error("OIDC discovery at {url} returned HTTP {status}: {body_preview}.")]
	Status {
		/// Discovery document URL.
		url: String,
		/// HTTP status code.
		status: u16,
		/// Leading part of the response body.
		body_preview: String,
	},
	/// The discovery document is not a valid provider configuration.
	#[error("OIDC discovery document from {url} is malformed.")]
	Document {
		/// Discovery document URL.
		url: String,
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// The document names a different issuer than the one requested.
	#[error("OIDC discovery issuer mismatch: expected {expected}, got {actual}.")]
	IssuerMismatch {
		/// Issuer configured by the caller.
		expected: String,
		/// Issuer returned in the document.
		actual: String,
	},
}
impl DiscoveryError {
	/// Wraps a transport failure, rendering its full cause chain into the message.
	pub fn request(url: impl Into<String>, src: impl Into<BoxError>) -> Self {
		let source = src.into();
		let message = render_chain(source.as_ref());

		Self::Request { url: url.into(), message, source }
	}

	/// Returns true when the request failed because a deadline elapsed.
	pub fn is_timeout(&self) -> bool {
		let Self::Request { source, .. } = self else {
			return false;
		};
		let mut current: Option<&(dyn StdError + 'static)> = Some(source.as_ref());

		while let Some(err) = current {
			if let Some(reqwest_err) = err.downcast_ref::<ReqwestError>()
				&& reqwest_err.is_timeout()
			{
				return true;
			}
			if let Some(reqwest_err) = err.downcast_ref::<Box<ReqwestError>>()
				&& reqwest_err.is_timeout()
			{
				return true;
			}
			if let Some(io_err) = err.downcast_ref::<std::io::Error>()
				&& io_err.kind() == std::io::ErrorKind::TimedOut
			{
				return true;
			}

			current = err.source();
		}

		false
	}
}

/// The discovery document's `code_challenge_methods_supported` claim has the wrong shape.
#[derive(Debug, ThisError)]
#[error("Could not determine supported PKCE methods: invalid discovery document.")]
pub struct MetadataParseError {
	/// Structured parsing failure, including the JSON path that failed.
	#[source]
	pub source: serde_path_to_error::Error<serde_json::Error>,
}

fn render_chain(err: &(dyn StdError + 'static)) -> String {
	let mut rendered = err.to_string();
	let mut current = err.source();

	while let Some(cause) = current {
		let next = cause.to_string();

		if !rendered.contains(&next) {
			rendered.push_str(": ");
			rendered.push_str(&next);
		}

		current = cause.source();
	}

	rendered
}
