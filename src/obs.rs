//! Optional observability helpers for token exchanges and GraphQL calls.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `commerce_client.call` with the `operation`
//!   (call kind) and `stage` (call site) fields.
//! - Enable `metrics` to increment the `commerce_client_call_total` counter for every
//!   attempt/success/failure, labeled by `operation` + `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Provider call kinds observed by the client.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperationKind {
	/// Client-credentials exchange against the token endpoint.
	TokenExchange,
	/// Bearer-authenticated admin GraphQL call.
	AdminExecute,
	/// API-key-authenticated storefront GraphQL call.
	StorefrontExecute,
}
impl OperationKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			OperationKind::TokenExchange => "token_exchange",
			OperationKind::AdminExecute => "admin_execute",
			OperationKind::StorefrontExecute => "storefront_execute",
		}
	}
}
impl Display for OperationKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CallOutcome {
	/// Entry to a client call.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl CallOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			CallOutcome::Attempt => "attempt",
			CallOutcome::Success => "success",
			CallOutcome::Failure => "failure",
		}
	}

	/// Maps a call result to its terminal outcome.
	pub fn of<T, E>(result: &std::result::Result<T, E>) -> Self {
		if result.is_ok() { CallOutcome::Success } else { CallOutcome::Failure }
	}
}
impl Display for CallOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn labels_are_stable() {
		assert_eq!(OperationKind::StorefrontExecute.to_string(), "storefront_execute");
		assert_eq!(CallOutcome::of::<(), ()>(&Ok(())), CallOutcome::Success);
		assert_eq!(CallOutcome::of::<(), ()>(&Err(())).as_str(), "failure");
	}
}
