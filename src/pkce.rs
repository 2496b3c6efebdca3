//! PKCE capability negotiation from provider metadata.
//!
//! `code_challenge_methods_supported` is optional in the discovery document. An absent (or
//! `null`) field means the provider declared nothing and yields an empty list; a field with
//! the wrong shape is a [`MetadataParseError`]. The two cases must stay distinct.

// self
use crate::{_prelude::*, discovery::ProviderMetadata, error::MetadataParseError};

/// PKCE code challenge methods defined by RFC 7636.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PkceMethod {
	/// SHA-256 challenge.
	#[serde(rename = "S256")]
	S256,
	/// Verifier sent as-is.
	#[serde(rename = "plain")]
	Plain,
}
impl PkceMethod {
	/// Returns the identifier used on the wire.
	pub const fn as_str(self) -> &'static str {
		match self {
			PkceMethod::S256 => "S256",
			PkceMethod::Plain => "plain",
		}
	}
}
impl Display for PkceMethod {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
impl FromStr for PkceMethod {
	type Err = UnknownPkceMethod;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"S256" => Ok(PkceMethod::S256),
			"plain" => Ok(PkceMethod::Plain),
			other => Err(UnknownPkceMethod { method: other.to_owned() }),
		}
	}
}

/// Error returned when parsing an unrecognized PKCE method name.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
#[error("Unknown PKCE method: {method}.")]
pub struct UnknownPkceMethod {
	/// The unrecognized method name.
	pub method: String,
}

#[derive(Deserialize)]
struct PkceClaims {
	#[serde(default)]
	code_challenge_methods_supported: Option<Vec<String>>,
}

/// Extracts the advertised PKCE methods in document order.
pub fn supported_methods(metadata: &ProviderMetadata) -> Result<Vec<String>, MetadataParseError> {
	let claims: PkceClaims = metadata.claims().map_err(|source| MetadataParseError { source })?;

	Ok(claims.code_challenge_methods_supported.unwrap_or_default())
}

/// Picks the strongest method from an advertised list: `S256`, then `plain`.
pub fn preferred_method<S>(supported: &[S]) -> Option<PkceMethod>
where
	S: AsRef<str>,
{
	[PkceMethod::S256, PkceMethod::Plain].into_iter().find(|method| {
		supported.iter().any(|value| AsRef::<str>::as_ref(value) == method.as_str())
	})
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn metadata(extra: &str) -> ProviderMetadata {
		let body = format!(
			r#"{{"issuer":"https://idp.example.com","authorization_endpoint":"https://idp.example.com/auth","token_endpoint":"https://idp.example.com/token"{extra}}}"#
		);

		ProviderMetadata::from_json(body.as_bytes()).expect("Fixture document should parse.")
	}

	#[test]
	fn methods_keep_document_order() {
		let methods = supported_methods(&metadata(
			r#","code_challenge_methods_supported":["S256","plain"]"#,
		))
		.expect("Methods should parse.");

		assert_eq!(methods, vec!["S256".to_string(), "plain".to_string()]);
	}

	#[test]
	fn absent_or_null_field_is_empty() {
		assert!(supported_methods(&metadata("")).expect("Absent field is valid.").is_empty());
		assert!(
			supported_methods(&metadata(r#","code_challenge_methods_supported":null"#))
				.expect("Null field is treated as absent.")
				.is_empty()
		);
	}

	#[test]
	fn wrong_shape_is_a_parse_error() {
		let err = supported_methods(&metadata(r#","code_challenge_methods_supported":"S256""#))
			.expect_err("A string instead of an array must be rejected.");

		assert!(err.source.path().to_string().contains("code_challenge_methods_supported"));
		assert!(
			supported_methods(&metadata(r#","code_challenge_methods_supported":[256]"#)).is_err()
		);
	}

	#[test]
	fn preferred_method_prefers_s256() {
		assert_eq!(preferred_method(&["plain", "S256"]), Some(PkceMethod::S256));
		assert_eq!(preferred_method(&["plain"]), Some(PkceMethod::Plain));
		assert_eq!(preferred_method::<&str>(&[]), None);
		assert_eq!(preferred_method(&["s256"]), None);
	}

	#[test]
	fn method_names_round_trip() {
		assert_eq!("S256".parse::<PkceMethod>(), Ok(PkceMethod::S256));
		assert_eq!(PkceMethod::Plain.to_string(), "plain");
		assert!("S512".parse::<PkceMethod>().is_err());
	}
}
