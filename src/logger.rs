//! Logger collaborator receiving round-trip observations and factory lifecycle notices.
//!
//! The crate never decides where log output goes. Callers inject an `Arc<dyn Logger>`; the
//! instrumented transport reports each HTTP round trip exactly once, after it completes,
//! whether it succeeded or failed.
//!
//! # Feature Flags
//!
//! - Enable `tracing` (default) for [`TracingLogger`], which emits events under the
//!   `oidc_connector` target.

// std
use std::time::Duration as StdDuration;
// crates.io
use oauth2::http::{Method, StatusCode};
// self
use crate::_prelude::*;

/// Severity of a lifecycle notice.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NoticeLevel {
	/// Verbose diagnostics.
	Debug,
	/// Regular progress information.
	Info,
}
impl NoticeLevel {
	/// Returns a stable label suitable for log fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			NoticeLevel::Debug => "debug",
			NoticeLevel::Info => "info",
		}
	}
}
impl Display for NoticeLevel {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Result of a single HTTP round trip.
#[derive(Clone, Copy, Debug)]
pub enum RoundTripOutcome<'a> {
	/// The server answered; the status may still be an error status.
	Response {
		/// HTTP status returned by the server.
		status: StatusCode,
	},
	/// The transport failed before a response was received.
	Failed {
		/// Transport error, passed through unchanged to the caller afterwards.
		error: &'a (dyn StdError + 'static),
	},
}

/// Observation of one outbound request and its outcome.
#[derive(Clone, Copy, Debug)]
pub struct RoundTrip<'a> {
	/// Request method.
	pub method: &'a Method,
	/// Request URL.
	pub url: &'a str,
	/// Response status or transport error.
	pub outcome: RoundTripOutcome<'a>,
	/// Time spent in the wrapped transport.
	pub elapsed: StdDuration,
}
impl RoundTrip<'_> {
	/// Returns the status code when the server answered.
	pub fn status(&self) -> Option<StatusCode> {
		match self.outcome {
			RoundTripOutcome::Response { status } => Some(status),
			RoundTripOutcome::Failed { .. } => None,
		}
	}
}

/// Sink for transport observations and lifecycle notices.
pub trait Logger
where
	Self: 'static + Send + Sync,
{
	/// Records one completed round trip.
	fn round_trip(&self, observation: &RoundTrip<'_>);

	/// Records a high-level lifecycle notice.
	fn notice(&self, level: NoticeLevel, message: &str);
}

/// Logger that discards everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopLogger;
impl Logger for NoopLogger {
	fn round_trip(&self, _observation: &RoundTrip<'_>) {}

	fn notice(&self, _level: NoticeLevel, _message: &str) {}
}

/// Owned copy of a [`RoundTrip`] kept by [`MemoryLogger`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordedRoundTrip {
	/// Request method.
	pub method: String,
	/// Request URL.
	pub url: String,
	/// Response status, when the server answered.
	pub status: Option<u16>,
	/// Rendered transport error, when the round trip failed.
	pub error: Option<String>,
}

/// Owned copy of a lifecycle notice kept by [`MemoryLogger`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordedNotice {
	/// Notice severity.
	pub level: NoticeLevel,
	/// Notice text.
	pub message: String,
}

/// Logger that keeps every observation in memory; handy for tests and diagnostics dumps.
#[derive(Debug, Default)]
pub struct MemoryLogger {
	round_trips: Mutex<Vec<RecordedRoundTrip>>,
	notices: Mutex<Vec<RecordedNotice>>,
}
impl MemoryLogger {
	/// Snapshot of the recorded round trips, oldest first.
	pub fn round_trips(&self) -> Vec<RecordedRoundTrip> {
		self.round_trips.lock().clone()
	}

	/// Snapshot of the recorded notices, oldest first.
	pub fn notices(&self) -> Vec<RecordedNotice> {
		self.notices.lock().clone()
	}
}
impl Logger for MemoryLogger {
	fn round_trip(&self, observation: &RoundTrip<'_>) {
		let (status, error) = match observation.outcome {
			RoundTripOutcome::Response { status } => (Some(status.as_u16()), None),
			RoundTripOutcome::Failed { error } => (None, Some(error.to_string())),
		};

		self.round_trips.lock().push(RecordedRoundTrip {
			method: observation.method.to_string(),
			url: observation.url.to_owned(),
			status,
			error,
		});
	}

	fn notice(&self, level: NoticeLevel, message: &str) {
		self.notices.lock().push(RecordedNotice { level, message: message.to_owned() });
	}
}

/// Logger that forwards to the `tracing` ecosystem.
#[cfg(feature = "tracing")]
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingLogger;
#[cfg(feature = "tracing")]
impl Logger for TracingLogger {
	fn round_trip(&self, observation: &RoundTrip<'_>) {
		let elapsed_ms = observation.elapsed.as_millis() as u64;

		match observation.outcome {
			RoundTripOutcome::Response { status } => tracing::debug!(
				target: "oidc_connector",
				method = %observation.method,
				url = observation.url,
				status = status.as_u16(),
				elapsed_ms,
				"HTTP round trip completed."
			),
			RoundTripOutcome::Failed { error } => tracing::debug!(
				target: "oidc_connector",
				method = %observation.method,
				url = observation.url,
				error = %error,
				elapsed_ms,
				"HTTP round trip failed."
			),
		}
	}

	fn notice(&self, level: NoticeLevel, message: &str) {
		match level {
			NoticeLevel::Debug => tracing::debug!(target: "oidc_connector", "{message}"),
			NoticeLevel::Info => tracing::info!(target: "oidc_connector", "{message}"),
		}
	}
}
