// std
use std::{net::TcpListener, sync::Arc, time::Duration};
// crates.io
use httpmock::prelude::*;
use serde_json::{Value, json};
// self
use oidc_connector::{
	Error, Factory, ProviderConfig,
	clock::SystemClock,
	discovery::WELL_KNOWN_PATH,
	error::DiscoveryError,
	logger::MemoryLogger,
	pkce::PkceMethod,
	transport::ProxyResolution,
};

const CLIENT_ID: &str = "kubernetes";
const CLIENT_SECRET: &str = "kubernetes-secret";

fn document(issuer: &str, extra: Value) -> Value {
	let mut document = json!({
		"issuer": issuer,
		"authorization_endpoint": format!("{issuer}/oauth2/auth"),
		"token_endpoint": format!("{issuer}/oauth2/token"),
		"jwks_uri": format!("{issuer}/oauth2/keys"),
		"scopes_supported": ["openid", "email", "groups"],
	});

	if let (Some(base), Value::Object(extra)) = (document.as_object_mut(), extra) {
		base.extend(extra);
	}

	document
}

fn config(issuer: &str, extra_scopes: &[&str]) -> ProviderConfig {
	ProviderConfig::builder(issuer)
		.client_id(CLIENT_ID)
		.client_secret(CLIENT_SECRET)
		.extra_scopes(extra_scopes.iter().copied())
		.proxy(ProxyResolution::Direct)
		.build()
		.expect("Test provider configuration should be valid.")
}

fn factory() -> (Factory, Arc<MemoryLogger>) {
	let logger = Arc::new(MemoryLogger::default());

	(Factory::new(Arc::new(SystemClock), logger.clone()), logger)
}

async fn serve_document(server: &MockServer, status: u16, body: Value) -> httpmock::Mock<'_> {
	server
		.mock_async(|when, then| {
			when.method(GET).path(WELL_KNOWN_PATH);
			then.status(status).header("content-type", "application/json").json_body(body);
		})
		.await
}

#[tokio::test]
async fn discovery_builds_client_with_methods_and_scopes() {
	let server = MockServer::start_async().await;
	let issuer = format!("http://{}", server.address());
	let mock = serve_document(
		&server,
		200,
		document(&issuer, json!({ "code_challenge_methods_supported": ["S256", "plain"] })),
	)
	.await;
	let (factory, logger) = factory();
	let client = factory
		.new_client(&config(&issuer, &["groups", "email"]))
		.await
		.expect("Client construction should succeed against a valid provider.");

	mock.assert_calls_async(1).await;

	assert_eq!(client.supported_pkce_methods(), ["S256".to_string(), "plain".to_string()]);
	assert_eq!(client.preferred_pkce_method(), Some(PkceMethod::S256));
	assert_eq!(client.oauth2_config().scope_names(), vec!["groups", "email", "openid"]);
	assert_eq!(
		client.oauth2_config().endpoint.auth_url.as_str(),
		format!("{issuer}/oauth2/auth")
	);
	assert_eq!(
		client.oauth2_config().endpoint.token_url.as_str(),
		format!("{issuer}/oauth2/token")
	);
	assert_eq!(client.oauth2_config().client_id.as_str(), CLIENT_ID);
	assert_eq!(client.metadata().issuer, issuer);
	assert_eq!(client.metadata().scopes_supported, vec!["openid", "email", "groups"]);

	let round_trips = logger.round_trips();

	assert_eq!(round_trips.len(), 1);
	assert_eq!(round_trips[0].method, "GET");
	assert_eq!(round_trips[0].status, Some(200));
	assert!(round_trips[0].url.ends_with(WELL_KNOWN_PATH));
}

#[tokio::test]
async fn absent_pkce_field_yields_empty_method_list() {
	let server = MockServer::start_async().await;
	let issuer = format!("http://{}", server.address());
	let _mock = serve_document(&server, 200, document(&issuer, json!({}))).await;
	let (factory, _) = factory();
	let client = factory
		.new_client(&config(&issuer, &[]))
		.await
		.expect("A provider without PKCE metadata is still valid.");

	assert!(client.supported_pkce_methods().is_empty());
	assert_eq!(client.preferred_pkce_method(), None);
	assert_eq!(client.oauth2_config().scope_names(), vec!["openid"]);
}

#[tokio::test]
async fn malformed_pkce_field_fails_with_metadata_parse_error() {
	let server = MockServer::start_async().await;
	let issuer = format!("http://{}", server.address());
	let _mock = serve_document(
		&server,
		200,
		document(&issuer, json!({ "code_challenge_methods_supported": "S256" })),
	)
	.await;
	let (factory, _) = factory();
	let err = factory
		.new_client(&config(&issuer, &[]))
		.await
		.expect_err("A scalar PKCE field must be rejected.");

	assert!(matches!(err, Error::MetadataParse(_)), "Unexpected error: {err:?}.");
}

#[tokio::test]
async fn non_success_status_fails_with_discovery_error() {
	let server = MockServer::start_async().await;
	let issuer = format!("http://{}", server.address());
	let _mock = serve_document(&server, 404, json!({ "error": "not_found" })).await;
	let (factory, logger) = factory();
	let err = factory
		.new_client(&config(&issuer, &[]))
		.await
		.expect_err("A 404 discovery response must fail.");

	match err {
		Error::Discovery(DiscoveryError::Status { status, body_preview, .. }) => {
			assert_eq!(status, 404);
			assert!(body_preview.contains("not_found"));
		},
		other => panic!("Unexpected error: {other:?}."),
	}

	let round_trips = logger.round_trips();

	assert_eq!(round_trips.len(), 1);
	assert_eq!(round_trips[0].status, Some(404));
	assert_eq!(round_trips[0].error, None);
}

#[tokio::test]
async fn malformed_document_fails_with_discovery_error() {
	let server = MockServer::start_async().await;
	let issuer = format!("http://{}", server.address());
	let _mock = serve_document(&server, 200, json!({ "issuer": issuer })).await;
	let (factory, _) = factory();
	let err = factory
		.new_client(&config(&issuer, &[]))
		.await
		.expect_err("A document without endpoints must fail.");

	assert!(
		matches!(err, Error::Discovery(DiscoveryError::Document { .. })),
		"Unexpected error: {err:?}."
	);
}

#[tokio::test]
async fn issuer_mismatch_fails_with_discovery_error() {
	let server = MockServer::start_async().await;
	let issuer = format!("http://{}", server.address());
	let _mock =
		serve_document(&server, 200, document("https://impostor.example.com", json!({}))).await;
	let (factory, _) = factory();
	let err = factory
		.new_client(&config(&issuer, &[]))
		.await
		.expect_err("A document naming another issuer must fail.");

	match err {
		Error::Discovery(DiscoveryError::IssuerMismatch { expected, actual }) => {
			assert_eq!(expected, issuer);
			assert_eq!(actual, "https://impostor.example.com");
		},
		other => panic!("Unexpected error: {other:?}."),
	}
}

#[tokio::test]
async fn unreachable_issuer_reports_the_network_cause() {
	let port = {
		let listener = TcpListener::bind("127.0.0.1:0").expect("Ephemeral port should bind.");

		listener.local_addr().expect("Bound listener should expose its address.").port()
	};
	let issuer = format!("http://127.0.0.1:{port}");
	let (factory, logger) = factory();
	let err = factory
		.new_client(&config(&issuer, &[]))
		.await
		.expect_err("Discovery against a closed port must fail.");
	let rendered = err.to_string();

	assert!(
		matches!(err, Error::Discovery(DiscoveryError::Request { .. })),
		"Unexpected error: {err:?}."
	);
	assert!(rendered.contains(&issuer));
	assert!(rendered.to_lowercase().contains("connect"), "Cause missing from: {rendered}.");

	let round_trips = logger.round_trips();

	assert_eq!(round_trips.len(), 1);
	assert_eq!(round_trips[0].status, None);
	assert!(round_trips[0].error.is_some());
}

#[tokio::test]
async fn request_timeout_bounds_discovery() {
	let server = MockServer::start_async().await;
	let issuer = format!("http://{}", server.address());
	let _mock = server
		.mock_async(|when, then| {
			when.method(GET).path(WELL_KNOWN_PATH);
			then.status(200).delay(Duration::from_secs(5)).json_body(document(&issuer, json!({})));
		})
		.await;
	let config = ProviderConfig::builder(&issuer)
		.client_id(CLIENT_ID)
		.proxy(ProxyResolution::Direct)
		.request_timeout(Duration::from_millis(200))
		.build()
		.expect("Test provider configuration should be valid.");
	let (factory, _) = factory();
	let err = factory.new_client(&config).await.expect_err("A stalled provider must time out.");

	match err {
		Error::Discovery(e) => assert!(e.is_timeout(), "Expected a timeout, got {e:?}."),
		other => panic!("Unexpected error: {other:?}."),
	}
}

#[tokio::test]
async fn concurrent_constructions_stay_independent() {
	let first_server = MockServer::start_async().await;
	let second_server = MockServer::start_async().await;
	let first_issuer = format!("http://{}", first_server.address());
	let second_issuer = format!("http://{}", second_server.address());
	let _first = serve_document(
		&first_server,
		200,
		document(&first_issuer, json!({ "code_challenge_methods_supported": ["S256"] })),
	)
	.await;
	let _second = serve_document(
		&second_server,
		200,
		document(&second_issuer, json!({ "code_challenge_methods_supported": ["plain"] })),
	)
	.await;
	let (factory, logger) = factory();
	let first_config = config(&first_issuer, &["email"]);
	let second_config = config(&second_issuer, &["groups"]);
	let (first, second) =
		tokio::join!(factory.new_client(&first_config), factory.new_client(&second_config));
	let first = first.expect("First construction should succeed.");
	let second = second.expect("Second construction should succeed.");

	assert_eq!(first.supported_pkce_methods(), ["S256".to_string()]);
	assert_eq!(second.supported_pkce_methods(), ["plain".to_string()]);
	assert_eq!(first.oauth2_config().scope_names(), vec!["email", "openid"]);
	assert_eq!(second.oauth2_config().scope_names(), vec!["groups", "openid"]);
	assert_eq!(logger.round_trips().len(), 2);
}
