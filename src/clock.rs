//! Time source forwarded to clients for token expiry checks in flow implementations.

// self
use crate::_prelude::*;

/// Supplies the current time.
pub trait Clock
where
	Self: 'static + Send + Sync,
{
	/// Returns the current instant in UTC.
	fn now(&self) -> OffsetDateTime;
}

/// Wall clock backed by the operating system.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;
impl Clock for SystemClock {
	fn now(&self) -> OffsetDateTime {
		OffsetDateTime::now_utc()
	}
}

/// Clock frozen at a fixed instant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FixedClock(pub OffsetDateTime);
impl Clock for FixedClock {
	fn now(&self) -> OffsetDateTime {
		self.0
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros::datetime;
	// self
	use super::*;

	#[test]
	fn fixed_clock_never_moves() {
		let clock = FixedClock(datetime!(2024-05-01 12:00 UTC));

		assert_eq!(clock.now(), clock.now());
		assert_eq!(clock.now(), datetime!(2024-05-01 12:00 UTC));
	}

	#[test]
	fn system_clock_is_monotonic_enough() {
		let clock = SystemClock;
		let first = clock.now();

		assert!(clock.now() >= first);
	}
}
