//! TLS trust material and policy applied to provider transports.

// std
use std::{fs, path::Path};
// crates.io
use base64::{Engine as _, engine::general_purpose::STANDARD};
use reqwest::Certificate;
// self
use crate::_prelude::*;

/// Errors emitted while loading certificate authority material.
#[derive(Debug, ThisError)]
pub enum CertificatePoolError {
	/// The certificate file could not be read.
	#[error("Could not read certificate file {path}.")]
	Read {
		/// Path that failed.
		path: String,
		/// Underlying IO failure.
		#[source]
		source: std::io::Error,
	},
	/// The base64 payload could not be decoded.
	#[error("Could not decode base64 certificate data.")]
	Base64(#[from] base64::DecodeError),
	/// The PEM payload could not be parsed.
	#[error("Could not parse PEM certificate data from {origin}.")]
	Pem {
		/// Human-readable origin of the data (file path or `inline`).
		origin: String,
		/// Underlying parsing failure.
		#[source]
		source: ReqwestError,
	},
	/// The PEM payload parsed but contained no certificates.
	#[error("No certificates found in {origin}.")]
	Empty {
		/// Human-readable origin of the data.
		origin: String,
	},
}

/// Caller-supplied set of trusted root certificates.
///
/// When attached to a [`TlsPolicy`], the pool replaces the system trust store rather than
/// extending it.
#[derive(Clone, Default)]
pub struct CertificatePool {
	certificates: Vec<Certificate>,
}
impl CertificatePool {
	/// Creates an empty pool.
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds every certificate from a PEM bundle.
	pub fn add_pem(&mut self, pem: &[u8]) -> Result<(), CertificatePoolError> {
		self.push_bundle(pem, "inline")
	}

	/// Adds every certificate from a PEM file.
	pub fn add_pem_file(&mut self, path: impl AsRef<Path>) -> Result<(), CertificatePoolError> {
		let path = path.as_ref();
		let origin = path.display().to_string();
		let pem = fs::read(path)
			.map_err(|source| CertificatePoolError::Read { path: origin.clone(), source })?;

		self.push_bundle(&pem, &origin)
	}

	/// Adds every certificate from a base64-encoded PEM bundle.
	pub fn add_base64_encoded(&mut self, encoded: &str) -> Result<(), CertificatePoolError> {
		let pem = STANDARD.decode(encoded.trim())?;

		self.push_bundle(&pem, "base64")
	}

	/// Number of certificates in the pool.
	pub fn len(&self) -> usize {
		self.certificates.len()
	}

	/// Returns true if no certificates were added.
	pub fn is_empty(&self) -> bool {
		self.certificates.is_empty()
	}

	/// Iterator over the loaded certificates.
	pub fn iter(&self) -> impl Iterator<Item = &Certificate> {
		self.certificates.iter()
	}

	fn push_bundle(&mut self, pem: &[u8], origin: &str) -> Result<(), CertificatePoolError> {
		let bundle = Certificate::from_pem_bundle(pem)
			.map_err(|source| CertificatePoolError::Pem { origin: origin.to_owned(), source })?;

		if bundle.is_empty() {
			return Err(CertificatePoolError::Empty { origin: origin.to_owned() });
		}

		self.certificates.extend(bundle);

		Ok(())
	}
}
impl Debug for CertificatePool {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("CertificatePool").field("len", &self.certificates.len()).finish()
	}
}

/// TLS renegotiation behavior requested from the transport.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Renegotiation {
	/// Refuse server-initiated renegotiation.
	Never,
	/// Accept renegotiation requests from the server any number of times.
	#[default]
	FreelyAsClient,
}

/// TLS settings derived from a provider configuration.
#[derive(Clone, Debug, Default)]
pub struct TlsPolicy {
	/// Disables certificate and hostname verification entirely.
	///
	/// Only meant for internal or test providers; any certificate is accepted.
	pub skip_verify: bool,
	/// Replaces the system trust store when present.
	pub root_certificates: Option<CertificatePool>,
	/// Renegotiation behavior; independent of `skip_verify`.
	pub renegotiation: Renegotiation,
}
