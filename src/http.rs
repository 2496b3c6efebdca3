//! HTTP round-trip capability and the pass-through logging decorator.
//!
//! Everything speaks `oauth2`'s [`AsyncHttpClient`] so the produced transport plugs straight
//! into `oauth2` request builders used by flow implementations. [`ReqwestTransport`] is the
//! base transport; [`LoggingTransport`] wraps any transport and reports each round trip to a
//! [`Logger`] without touching the request, the response, or the error.
//!
//! The request is not logged before it is sent. Its method and URL are captured up front and
//! reported together with the outcome in a single entry once the wrapped transport resolves.

// std
use std::{ops::Deref, time::Instant};
// crates.io
use oauth2::{AsyncHttpClient, HttpClientError, HttpRequest, HttpResponse};
// self
use crate::{
	_prelude::*,
	logger::{Logger, RoundTrip, RoundTripOutcome},
	obs::{self, Outcome},
};

/// Transport type produced by the transport builder and carried by every client.
pub type OidcHttpClient = LoggingTransport<ReqwestTransport>;

type RoundTripFuture<'c, E> =
	Pin<Box<dyn Future<Output = Result<HttpResponse, HttpClientError<E>>> + 'c + Send>>;

/// Thin wrapper around [`ReqwestClient`] that performs one HTTP round trip per call.
#[derive(Clone, Default)]
pub struct ReqwestTransport(pub ReqwestClient);
impl ReqwestTransport {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
impl AsRef<ReqwestClient> for ReqwestTransport {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
impl Deref for ReqwestTransport {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
impl Debug for ReqwestTransport {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("ReqwestTransport(..)")
	}
}
impl<'c> AsyncHttpClient<'c> for ReqwestTransport {
	type Error = HttpClientError<ReqwestError>;
	type Future = RoundTripFuture<'c, ReqwestError>;

	fn call(&'c self, request: HttpRequest) -> Self::Future {
		Box::pin(async move {
			let response =
				self.0.execute(request.try_into().map_err(Box::new)?).await.map_err(Box::new)?;
			let status = response.status();
			let headers = response.headers().to_owned();
			let mut response_new =
				HttpResponse::new(response.bytes().await.map_err(Box::new)?.to_vec());

			*response_new.status_mut() = status;
			*response_new.headers_mut() = headers;

			Ok(response_new)
		})
	}
}

/// Pass-through decorator that reports every round trip of the wrapped transport.
///
/// Exactly one [`Logger::round_trip`] call happens per request, after the wrapped transport
/// resolves. Transport errors are returned to the caller unchanged.
#[derive(Clone)]
pub struct LoggingTransport<T> {
	base: T,
	logger: Arc<dyn Logger>,
}
impl<T> LoggingTransport<T> {
	/// Wraps `base`, reporting to `logger`.
	pub fn new(base: T, logger: Arc<dyn Logger>) -> Self {
		Self { base, logger }
	}

	/// Wrapped transport.
	pub fn base(&self) -> &T {
		&self.base
	}

	/// Logger receiving round-trip observations.
	pub fn logger(&self) -> &Arc<dyn Logger> {
		&self.logger
	}
}
impl<T> Debug for LoggingTransport<T>
where
	T: Debug,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("LoggingTransport").field("base", &self.base).finish_non_exhaustive()
	}
}
impl<'c, T, E> AsyncHttpClient<'c> for LoggingTransport<T>
where
	T: for<'a> AsyncHttpClient<'a, Error = HttpClientError<E>, Future: Send> + Sync,
	E: 'static + Send + Sync + StdError,
{
	type Error = HttpClientError<E>;
	type Future = RoundTripFuture<'c, E>;

	fn call(&'c self, request: HttpRequest) -> Self::Future {
		let method = request.method().clone();
		let url = request.uri().to_string();
		let started = Instant::now();
		let pending = self.base.call(request);

		Box::pin(async move {
			let result = pending.await;
			let elapsed = started.elapsed();
			let outcome = match &result {
				Ok(response) => RoundTripOutcome::Response { status: response.status() },
				Err(HttpClientError::Reqwest(inner)) => RoundTripOutcome::Failed { error: &**inner },
				Err(other) => RoundTripOutcome::Failed { error: other },
			};

			self.logger.round_trip(&RoundTrip { method: &method, url: &url, outcome, elapsed });
			obs::record_round_trip(Outcome::of(&result), elapsed);

			result
		})
	}
}
