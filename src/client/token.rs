//! Token acquisition with cache reuse and single-flight refresh.

// self
use crate::{
	_prelude::*,
	client::CommerceClient,
	error::AuthError,
	http::{self, ProviderHttpClient, TransportErrorMapper},
	oauth,
	obs::{self, CallOutcome, CallSpan, OperationKind},
	token::AccessToken,
};

impl<C, M> CommerceClient<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Returns a usable bearer token, exchanging client credentials when the cache is empty or
	/// the cached token has expired.
	///
	/// Concurrent callers serialize on the cache's refresh guard and re-check the cache once they
	/// hold it, so a burst of callers triggers a single exchange. A failed exchange leaves the
	/// cache untouched and is not retried.
	pub async fn access_token(&self) -> Result<AccessToken> {
		if let Some(token) = self.cache.usable_at(OffsetDateTime::now_utc()) {
			return Ok(token);
		}

		const KIND: OperationKind = OperationKind::TokenExchange;

		let span = CallSpan::new(KIND, "access_token");

		span.instrument(async move {
			let _singleflight = self.cache.refresh_lock().await;

			if let Some(token) = self.cache.usable_at(OffsetDateTime::now_utc()) {
				return Ok(token);
			}

			obs::record_call_outcome(KIND, CallOutcome::Attempt);

			let result = self.exchange_client_credentials().await;

			obs::record_call_outcome(KIND, CallOutcome::of(&result));

			match result {
				Ok(token) => {
					obs::debug_token_refreshed(token.expires_at);
					self.cache.store(token.clone());

					Ok(token)
				},
				Err(e) => {
					obs::warn_failure(KIND, &e);

					Err(e)
				},
			}
		})
		.await
	}

	async fn exchange_client_credentials(&self) -> Result<AccessToken> {
		let request = oauth::build_token_request(
			&self.descriptor.endpoints.token,
			&self.credentials,
			self.descriptor.client_auth_method,
		)?;
		let issued_at = OffsetDateTime::now_utc();
		let response =
			http::dispatch(self.http_client.as_ref(), self.transport_mapper.as_ref(), request)
				.await
				.map_err(unreachable_token_endpoint)?;

		Ok(oauth::parse_token_response(&response, issued_at, self.token_ttl)?)
	}
}

fn unreachable_token_endpoint(error: Error) -> Error {
	match error {
		Error::Transport(source) => AuthError::Unreachable { source }.into(),
		other => other,
	}
}
