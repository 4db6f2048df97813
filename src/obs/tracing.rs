// self
use crate::{_prelude::*, obs::OperationKind};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedCall<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedCall<F> = F;

/// A span builder used by client calls.
#[derive(Clone, Debug)]
pub struct CallSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl CallSpan {
	/// Creates a new span tagged with the provided operation kind + stage.
	pub fn new(kind: OperationKind, stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span =
				tracing::info_span!("commerce_client.call", operation = kind.as_str(), stage);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (kind, stage);

			Self {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedCall<Fut>
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

/// Logs a failed call at `warn` level (when tracing is enabled).
pub fn warn_failure(kind: OperationKind, error: &Error) {
	#[cfg(feature = "tracing")]
	{
		tracing::warn!(
			operation = kind.as_str(),
			error_kind = error.kind().as_str(),
			error = %error,
			"Provider call failed."
		);
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (kind, error);
	}
}

/// Logs a freshly minted token's expiry at `debug` level (when tracing is enabled).
pub fn debug_token_refreshed(expires_at: OffsetDateTime) {
	#[cfg(feature = "tracing")]
	{
		tracing::debug!(%expires_at, "Access token refreshed.");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = expires_at;
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[tokio::test]
	async fn instrument_wraps_future() {
		let span = CallSpan::new(OperationKind::TokenExchange, "instrument_wraps_future");
		let value = span.instrument(async { 42 }).await;

		assert_eq!(value, 42);
	}
}
