//! Builds a provider client against a mock identity provider and prints what discovery
//! negotiated: endpoints, scopes, and PKCE support.

// std
use std::{sync::Arc, time::Duration};
// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use serde_json::json;
// self
use oidc_connector::{
	Factory, ProviderConfig, clock::SystemClock, discovery::WELL_KNOWN_PATH, logger::MemoryLogger,
	transport::ProxyResolution,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let issuer = format!("http://{}", server.address());
	let discovery_mock = server
		.mock_async(|when, then| {
			when.method(GET).path(WELL_KNOWN_PATH);
			then.status(200).header("content-type", "application/json").json_body(json!({
				"issuer": issuer,
				"authorization_endpoint": format!("{issuer}/oauth2/auth"),
				"token_endpoint": format!("{issuer}/oauth2/token"),
				"code_challenge_methods_supported": ["S256", "plain"],
			}));
		})
		.await;
	let logger = Arc::new(MemoryLogger::default());
	let factory = Factory::new(Arc::new(SystemClock), logger.clone());
	let config = ProviderConfig::builder(&issuer)
		.client_id("demo-cli")
		.extra_scopes(["groups", "email"])
		.request_timeout(Duration::from_secs(5))
		.proxy(ProxyResolution::Direct)
		.build()?;
	let client = factory.new_client(&config).await?;
	let oauth2 = client.oauth2_config();

	println!("Issuer: {}", client.metadata().issuer);
	println!("Authorization endpoint: {}", oauth2.endpoint.auth_url.as_str());
	println!("Token endpoint: {}", oauth2.endpoint.token_url.as_str());
	println!("Scopes: {}", oauth2.scope_names().join(" "));
	println!("PKCE methods: {:?}", client.supported_pkce_methods());
	println!("Preferred PKCE method: {:?}", client.preferred_pkce_method());

	for round_trip in logger.round_trips() {
		println!("Round trip: {} {} -> {:?}", round_trip.method, round_trip.url, round_trip.status);
	}

	discovery_mock.assert_calls_async(1).await;

	Ok(())
}
