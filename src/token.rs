//! Access token model: a redacted secret plus the instants bounding its validity.

// self
use crate::_prelude::*;

/// Redacted token secret wrapper keeping sensitive material out of logs.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct TokenSecret(String);
impl TokenSecret {
	/// Wraps a new secret string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the inner token value. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}

	/// Formats the `Authorization` header value for bearer authentication.
	pub fn bearer_header(&self) -> String {
		format!("Bearer {}", self.0)
	}
}
impl AsRef<str> for TokenSecret {
	fn as_ref(&self) -> &str {
		self.expose()
	}
}
impl Debug for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("TokenSecret").field(&"<redacted>").finish()
	}
}
impl Display for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

/// Lifecycle status for a cached access token.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenStatus {
	/// Token may still be attached to requests.
	Active,
	/// Token reached its expiry instant and must be replaced.
	Expired,
}

/// Errors produced by [`AccessTokenBuilder`].
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum AccessTokenBuilderError {
	/// Issued when no (or an empty) token value was provided.
	#[error("Access token is required.")]
	MissingAccessToken,
	/// Issued when no expiry (absolute or relative) was configured.
	#[error("Expiry must be supplied via expires_at or expires_in.")]
	MissingExpiry,
	/// Issued when the relative expiry lands outside the representable date range.
	#[error("Expiry is out of range.")]
	ExpiryOutOfRange,
}

/// Bearer token minted by the provider's token endpoint. Never persisted.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken {
	/// Opaque bearer secret.
	pub secret: TokenSecret,
	/// Instant the token was obtained.
	pub issued_at: OffsetDateTime,
	/// Instant from which the token must no longer be used.
	pub expires_at: OffsetDateTime,
}
impl AccessToken {
	/// Returns a builder for constructing tokens.
	pub fn builder() -> AccessTokenBuilder {
		AccessTokenBuilder::default()
	}

	/// Returns the raw bearer value. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		self.secret.expose()
	}

	/// Computes the lifecycle status at a given instant.
	///
	/// A token is active only while `instant` is strictly before `expires_at`.
	pub fn status_at(&self, instant: OffsetDateTime) -> TokenStatus {
		if instant < self.expires_at { TokenStatus::Active } else { TokenStatus::Expired }
	}

	/// Returns `true` if the token can be used at the provided instant.
	pub fn is_active_at(&self, instant: OffsetDateTime) -> bool {
		matches!(self.status_at(instant), TokenStatus::Active)
	}

	/// Returns `true` if the token has expired at the provided instant.
	pub fn is_expired_at(&self, instant: OffsetDateTime) -> bool {
		matches!(self.status_at(instant), TokenStatus::Expired)
	}

	/// Returns `true` if the token is expired relative to the current clock.
	pub fn is_expired(&self) -> bool {
		self.is_expired_at(OffsetDateTime::now_utc())
	}

	/// Time left before expiry at the provided instant, clamped at zero.
	pub fn remaining_at(&self, instant: OffsetDateTime) -> Duration {
		let remaining = self.expires_at - instant;

		if remaining.is_negative() { Duration::ZERO } else { remaining }
	}
}
impl Debug for AccessToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AccessToken")
			.field("secret", &"<redacted>")
			.field("issued_at", &self.issued_at)
			.field("expires_at", &self.expires_at)
			.finish()
	}
}

/// Builder for [`AccessToken`].
#[derive(Clone, Debug, Default)]
pub struct AccessTokenBuilder {
	secret: Option<TokenSecret>,
	issued_at: Option<OffsetDateTime>,
	expires_at: Option<OffsetDateTime>,
	expires_in: Option<Duration>,
}
impl AccessTokenBuilder {
	/// Provides the bearer value.
	pub fn secret(mut self, token: impl Into<String>) -> Self {
		self.secret = Some(TokenSecret::new(token));

		self
	}

	/// Sets the issued-at instant.
	pub fn issued_at(mut self, instant: OffsetDateTime) -> Self {
		self.issued_at = Some(instant);

		self
	}

	/// Sets an absolute expiry instant.
	pub fn expires_at(mut self, instant: OffsetDateTime) -> Self {
		self.expires_at = Some(instant);

		self
	}

	/// Sets a relative expiry duration from the issued instant.
	pub fn expires_in(mut self, duration: Duration) -> Self {
		self.expires_in = Some(duration);

		self
	}

	/// Consumes the builder and produces an [`AccessToken`].
	pub fn build(self) -> Result<AccessToken, AccessTokenBuilderError> {
		let secret = self
			.secret
			.filter(|secret| !secret.expose().is_empty())
			.ok_or(AccessTokenBuilderError::MissingAccessToken)?;
		let issued_at = self.issued_at.unwrap_or_else(OffsetDateTime::now_utc);
		let expires_at = match (self.expires_at, self.expires_in) {
			(Some(instant), _) => instant,
			(None, Some(delta)) =>
				issued_at.checked_add(delta).ok_or(AccessTokenBuilderError::ExpiryOutOfRange)?,
			(None, None) => return Err(AccessTokenBuilderError::MissingExpiry),
		};

		Ok(AccessToken { secret, issued_at, expires_at })
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros;
	// self
	use super::*;

	#[test]
	fn secret_formatters_redact() {
		let secret = TokenSecret::new("super-secret");

		assert_eq!(format!("{secret:?}"), "TokenSecret(\"<redacted>\")");
		assert_eq!(format!("{secret}"), "<redacted>");
		assert_eq!(secret.bearer_header(), "Bearer super-secret");
	}

	#[test]
	fn expiry_boundary_is_exclusive() {
		let token = AccessToken::builder()
			.secret("tok123")
			.issued_at(macros::datetime!(2025-01-01 00:00 UTC))
			.expires_in(Duration::hours(1))
			.build()
			.expect("Token builder should support relative expiry.");

		assert_eq!(token.expires_at, macros::datetime!(2025-01-01 01:00 UTC));
		assert_eq!(
			token.status_at(macros::datetime!(2025-01-01 00:59:59 UTC)),
			TokenStatus::Active
		);
		assert_eq!(token.status_at(macros::datetime!(2025-01-01 01:00 UTC)), TokenStatus::Expired);
		assert_eq!(
			token.remaining_at(macros::datetime!(2025-01-01 00:30 UTC)),
			Duration::minutes(30)
		);
		assert_eq!(token.remaining_at(macros::datetime!(2025-01-01 02:00 UTC)), Duration::ZERO);
	}

	#[test]
	fn builder_rejects_missing_parts() {
		assert_eq!(
			AccessToken::builder().expires_in(Duration::hours(1)).build(),
			Err(AccessTokenBuilderError::MissingAccessToken)
		);
		assert_eq!(
			AccessToken::builder().secret("").expires_in(Duration::hours(1)).build(),
			Err(AccessTokenBuilderError::MissingAccessToken)
		);
		assert_eq!(
			AccessToken::builder().secret("tok").build(),
			Err(AccessTokenBuilderError::MissingExpiry)
		);
	}

	#[test]
	fn overflowing_expiry_is_an_error() {
		assert_eq!(
			AccessToken::builder()
				.secret("tok")
				.issued_at(macros::datetime!(2025-01-01 00:00 UTC))
				.expires_in(Duration::MAX)
				.build(),
			Err(AccessTokenBuilderError::ExpiryOutOfRange)
		);
	}

	#[test]
	fn debug_output_hides_secret() {
		let token = AccessToken::builder()
			.secret("hidden-value")
			.expires_in(Duration::minutes(5))
			.build()
			.expect("Token builder should succeed.");

		assert!(!format!("{token:?}").contains("hidden-value"));
	}
}
