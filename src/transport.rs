//! Transport builder: TLS policy + proxy resolution + round-trip logging.
//!
//! [`build`] assembles a fresh reqwest client for every call; nothing is cached or shared
//! between clients, so concurrent factories with different policies never interfere.

// std
use std::time::Duration as StdDuration;
// self
use crate::{
	_prelude::*,
	config::ProviderConfig,
	error::ConfigError,
	http::{LoggingTransport, OidcHttpClient, ReqwestTransport},
	logger::Logger,
	tls::{Renegotiation, TlsPolicy},
};

/// How outbound requests pick a proxy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProxyResolution {
	/// Honor `HTTP_PROXY`, `HTTPS_PROXY`, `ALL_PROXY`, and `NO_PROXY` from the process
	/// environment.
	#[default]
	Environment,
	/// Connect directly, ignoring proxy environment variables.
	Direct,
}

/// Transport settings derived from a provider configuration.
#[derive(Clone, Debug, Default)]
pub struct TransportPolicy {
	/// TLS verification, trust roots, and renegotiation.
	pub tls: TlsPolicy,
	/// Proxy resolution mode.
	pub proxy: ProxyResolution,
	/// Per-request deadline, if any.
	pub timeout: Option<StdDuration>,
}
impl TransportPolicy {
	/// Derives a policy from the caller's configuration.
	pub fn from_config(config: &ProviderConfig) -> Self {
		Self {
			tls: TlsPolicy {
				skip_verify: config.skip_tls_verify(),
				root_certificates: config.certificate_pool().cloned(),
				renegotiation: Renegotiation::FreelyAsClient,
			},
			proxy: config.proxy(),
			timeout: config.request_timeout(),
		}
	}
}

/// Builds the instrumented HTTP transport described by `policy`.
///
/// Assembly performs no I/O. Errors only surface when reqwest cannot initialize its TLS
/// backend; connection and certificate failures appear at request time.
pub fn build(policy: &TransportPolicy, logger: Arc<dyn Logger>) -> Result<OidcHttpClient> {
	let mut builder = ReqwestClient::builder();

	builder = select_backend(builder, policy.tls.renegotiation, logger.as_ref());

	if policy.tls.skip_verify {
		builder = builder.danger_accept_invalid_certs(true).danger_accept_invalid_hostnames(true);
	}
	if let Some(pool) = &policy.tls.root_certificates {
		builder = builder.tls_built_in_root_certs(false);

		for certificate in pool.iter() {
			builder = builder.add_root_certificate(certificate.clone());
		}
	}
	if matches!(policy.proxy, ProxyResolution::Direct) {
		builder = builder.no_proxy();
	}
	if let Some(timeout) = policy.timeout {
		builder = builder.timeout(timeout);
	}

	let client = builder.build().map_err(ConfigError::from)?;

	Ok(LoggingTransport::new(ReqwestTransport::with_client(client), logger))
}

/// TLS implementation backing the reqwest client.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TlsBackend {
	/// Platform TLS (OpenSSL, Secure Transport, SChannel); permits client renegotiation.
	#[cfg(feature = "native-tls")]
	Native,
	/// rustls; never renegotiates.
	Rustls,
}
impl TlsBackend {
	/// Backend able to honor `renegotiation` in this build.
	///
	/// Builds without the `native-tls` feature always get rustls.
	pub fn for_renegotiation(renegotiation: Renegotiation) -> Self {
		#[cfg(feature = "native-tls")]
		if matches!(renegotiation, Renegotiation::FreelyAsClient) {
			return Self::Native;
		}
		#[cfg(not(feature = "native-tls"))]
		let _ = renegotiation;

		Self::Rustls
	}
}

fn select_backend(
	builder: reqwest::ClientBuilder,
	renegotiation: Renegotiation,
	logger: &dyn Logger,
) -> reqwest::ClientBuilder {
	match TlsBackend::for_renegotiation(renegotiation) {
		#[cfg(feature = "native-tls")]
		TlsBackend::Native => builder.use_native_tls(),
		TlsBackend::Rustls => {
			if matches!(renegotiation, Renegotiation::FreelyAsClient) {
				logger.notice(
					crate::logger::NoticeLevel::Debug,
					"TLS renegotiation requested but the rustls backend does not support it; \
					 enable the `native-tls` feature for providers that renegotiate.",
				);
			}

			builder.use_rustls_tls()
		},
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::{logger::NoopLogger, tls::CertificatePool};

	#[test]
	fn policy_mirrors_configuration() {
		let config = ProviderConfig::builder("https://idp.example.com")
			.client_id("cli")
			.skip_tls_verify(true)
			.certificate_pool(CertificatePool::new())
			.request_timeout(StdDuration::from_secs(7))
			.proxy(ProxyResolution::Direct)
			.build()
			.expect("Configuration should be valid.");
		let policy = TransportPolicy::from_config(&config);

		assert!(policy.tls.skip_verify);
		assert!(policy.tls.root_certificates.is_some());
		assert_eq!(policy.tls.renegotiation, Renegotiation::FreelyAsClient);
		assert_eq!(policy.proxy, ProxyResolution::Direct);
		assert_eq!(policy.timeout, Some(StdDuration::from_secs(7)));
	}

	#[test]
	fn renegotiation_is_independent_of_verification() {
		let config = ProviderConfig::builder("https://idp.example.com")
			.client_id("cli")
			.build()
			.expect("Configuration should be valid.");
		let policy = TransportPolicy::from_config(&config);

		assert!(!policy.tls.skip_verify);
		assert_eq!(policy.tls.renegotiation, Renegotiation::FreelyAsClient);
	}

	#[cfg(feature = "native-tls")]
	#[test]
	fn renegotiating_policy_selects_native_backend() {
		assert_eq!(TlsBackend::for_renegotiation(Renegotiation::FreelyAsClient), TlsBackend::Native);
		assert_eq!(TlsBackend::for_renegotiation(Renegotiation::Never), TlsBackend::Rustls);
	}

	#[cfg(not(feature = "native-tls"))]
	#[test]
	fn rustls_only_builds_fall_back_with_a_notice() {
		let logger = Arc::new(crate::logger::MemoryLogger::default());

		assert_eq!(TlsBackend::for_renegotiation(Renegotiation::FreelyAsClient), TlsBackend::Rustls);
		assert!(build(&TransportPolicy::default(), logger.clone()).is_ok());
		assert!(logger.notices().iter().any(|notice| notice.message.contains("renegotiation")));
	}

	#[test]
	fn build_assembles_without_io() {
		let policy = TransportPolicy::default();

		assert!(build(&policy, Arc::new(NoopLogger)).is_ok());

		let insecure = TransportPolicy {
			tls: TlsPolicy { skip_verify: true, ..TlsPolicy::default() },
			proxy: ProxyResolution::Direct,
			timeout: Some(StdDuration::from_secs(1)),
		};

		assert!(build(&insecure, Arc::new(NoopLogger)).is_ok());
	}
}
