//! Optional observability hooks.
//!
//! With `tracing` enabled, client construction runs inside an `oidc_connector.construct` span
//! carrying the issuer. With `metrics` enabled, the crate publishes:
//!
//! - `oidc_connector_op_total{op, outcome}` counter;
//! - `oidc_connector_round_trip_seconds{outcome}` histogram.
//!
//! Without either feature every hook compiles to nothing.

// std
use std::time::Duration as StdDuration;
// self
use crate::_prelude::*;

#[cfg(feature = "tracing")]
pub(crate) type InstrumentedOp<F> = tracing::instrument::Instrumented<F>;
#[cfg(not(feature = "tracing"))]
pub(crate) type InstrumentedOp<F> = F;

/// Operations observed by the crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
	/// Provider client construction (discovery + configuration assembly).
	ClientConstruction,
	/// A single HTTP round trip through the instrumented transport.
	RoundTrip,
}
impl Operation {
	/// Metric label.
	pub const fn as_str(self) -> &'static str {
		match self {
			Operation::ClientConstruction => "client_construction",
			Operation::RoundTrip => "round_trip",
		}
	}
}
impl Display for Operation {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome label attached to every recorded operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Outcome {
	/// Entry to an operation.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl Outcome {
	/// Metric label.
	pub const fn as_str(self) -> &'static str {
		match self {
			Outcome::Attempt => "attempt",
			Outcome::Success => "success",
			Outcome::Failure => "failure",
		}
	}

	/// Maps a result onto [`Outcome::Success`] or [`Outcome::Failure`].
	pub fn of<T, E>(result: &Result<T, E>) -> Self {
		if result.is_ok() { Outcome::Success } else { Outcome::Failure }
	}
}
impl Display for Outcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Span wrapped around one client construction.
#[derive(Clone, Debug)]
pub(crate) struct ConstructionSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl ConstructionSpan {
	pub(crate) fn new(issuer: &str) -> Self {
		#[cfg(feature = "tracing")]
		{
			Self { span: tracing::info_span!("oidc_connector.construct", issuer) }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = issuer;

			Self {}
		}
	}

	/// Instruments `fut` without holding a guard across `.await` points.
	pub(crate) fn instrument<Fut>(&self, fut: Fut) -> InstrumentedOp<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

/// Increments the operation counter (when `metrics` is enabled).
pub fn record_outcome(op: Operation, outcome: Outcome) {
	#[cfg(feature = "metrics")]
	metrics::counter!(
		"oidc_connector_op_total",
		"op" => op.as_str(),
		"outcome" => outcome.as_str()
	)
	.increment(1);
	#[cfg(not(feature = "metrics"))]
	let _ = (op, outcome);
}

/// Records one transport round trip: outcome counter plus latency histogram.
pub fn record_round_trip(outcome: Outcome, elapsed: StdDuration) {
	record_outcome(Operation::RoundTrip, outcome);

	#[cfg(feature = "metrics")]
	metrics::histogram!("oidc_connector_round_trip_seconds", "outcome" => outcome.as_str())
		.record(elapsed.as_secs_f64());
	#[cfg(not(feature = "metrics"))]
	let _ = elapsed;
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn outcome_follows_result() {
		assert_eq!(Outcome::of(&Ok::<_, ()>(1)), Outcome::Success);
		assert_eq!(Outcome::of(&Err::<(), _>("boom")), Outcome::Failure);
	}

	#[test]
	fn recording_without_a_recorder_is_harmless() {
		record_outcome(Operation::ClientConstruction, Outcome::Attempt);
		record_round_trip(Outcome::Failure, StdDuration::from_millis(3));
	}

	#[tokio::test]
	async fn construction_span_passes_output_through() {
		let span = ConstructionSpan::new("https://idp.example.com");

		assert_eq!(span.instrument(async { 42 }).await, 42);
	}
}
