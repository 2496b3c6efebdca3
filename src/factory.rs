//! Provider client factory.
//!
//! [`Factory::new_client`] is a single-shot, all-or-nothing construction:
//!
//! 1. build a fresh instrumented transport from the configuration's TLS and proxy policy;
//! 2. run OIDC discovery once through that transport;
//! 3. read `code_challenge_methods_supported` from the discovery claims;
//! 4. assemble the OAuth 2.0 configuration;
//! 5. return the immutable [`Client`].
//!
//! Failures in step 2 surface as [`DiscoveryError`](crate::error::DiscoveryError), failures in
//! step 3 as [`MetadataParseError`](crate::error::MetadataParseError). Nothing is retried.

// self
use crate::{
	_prelude::*,
	client::Client,
	clock::{Clock, SystemClock},
	config::ProviderConfig,
	discovery,
	logger::{Logger, NoticeLevel},
	oauth::OAuth2Config,
	obs::{self, ConstructionSpan, Operation, Outcome},
	pkce,
	transport::{self, TransportPolicy},
};

type FactoryFuture<'a> = Pin<Box<dyn Future<Output = Result<Client>> + 'a + Send>>;

/// Object-safe construction seam so callers can substitute fake factories.
pub trait ClientFactory
where
	Self: Send + Sync,
{
	/// Builds a client for `config`.
	fn new_client<'a>(&'a self, config: &'a ProviderConfig) -> FactoryFuture<'a>;
}

/// Default factory holding the shared clock and logger collaborators.
#[derive(Clone)]
pub struct Factory {
	clock: Arc<dyn Clock>,
	logger: Arc<dyn Logger>,
}
impl Factory {
	/// Creates a factory that forwards `clock` and `logger` to every client it builds.
	pub fn new(clock: Arc<dyn Clock>, logger: Arc<dyn Logger>) -> Self {
		Self { clock, logger }
	}

	/// Injected clock.
	pub fn clock(&self) -> &Arc<dyn Clock> {
		&self.clock
	}

	/// Injected logger.
	pub fn logger(&self) -> &Arc<dyn Logger> {
		&self.logger
	}

	/// Performs discovery against `config`'s issuer and assembles a [`Client`].
	pub async fn new_client(&self, config: &ProviderConfig) -> Result<Client> {
		let span = ConstructionSpan::new(config.issuer_url());

		obs::record_outcome(Operation::ClientConstruction, Outcome::Attempt);

		let result = span.instrument(self.construct(config)).await;

		obs::record_outcome(Operation::ClientConstruction, Outcome::of(&result));

		if let Err(e) = &result {
			self.logger.notice(
				NoticeLevel::Debug,
				&format!("Client construction for {} failed: {e}", config.issuer_url()),
			);
		}

		result
	}

	async fn construct(&self, config: &ProviderConfig) -> Result<Client> {
		let policy = TransportPolicy::from_config(config);
		let http_client = transport::build(&policy, self.logger.clone())?;

		self.logger.notice(
			NoticeLevel::Debug,
			&format!("Discovering OpenID Connect provider at {}.", config.issuer_url()),
		);

		let metadata = discovery::discover(&http_client, config.issuer_url()).await?;
		let supported_pkce_methods = pkce::supported_methods(&metadata)?;

		self.logger.notice(
			NoticeLevel::Debug,
			&format!(
				"Provider {} supports PKCE methods {:?}.",
				metadata.issuer, supported_pkce_methods
			),
		);

		let oauth2_config = OAuth2Config::new(config, &metadata);

		Ok(Client::new(
			http_client,
			metadata,
			oauth2_config,
			supported_pkce_methods,
			self.clock.clone(),
			self.logger.clone(),
		))
	}
}
impl Default for Factory {
	fn default() -> Self {
		#[cfg(feature = "tracing")]
		let logger: Arc<dyn Logger> = Arc::new(crate::logger::TracingLogger);
		#[cfg(not(feature = "tracing"))]
		let logger: Arc<dyn Logger> = Arc::new(crate::logger::NoopLogger);

		Self::new(Arc::new(SystemClock), logger)
	}
}
impl ClientFactory for Factory {
	fn new_client<'a>(&'a self, config: &'a ProviderConfig) -> FactoryFuture<'a> {
		Box::pin(Factory::new_client(self, config))
	}
}
impl Debug for Factory {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("Factory(..)")
	}
}
