//! Commerce API client: owns the cached access token and executes GraphQL operations.

mod execute;
mod token;

// self
use crate::{
	_prelude::*,
	cache::TokenCache,
	http::{ProviderHttpClient, TransportErrorMapper},
	oauth::{Credentials, DEFAULT_TOKEN_TTL, MAX_TOKEN_TTL},
	provider::ProviderDescriptor,
};
#[cfg(feature = "reqwest")]
use crate::{
	config::CommerceConfig,
	http::{DEFAULT_TIMEOUT, ReqwestHttpClient, ReqwestTransportErrorMapper},
};

#[cfg(feature = "reqwest")]
/// Client specialized for the crate's default reqwest transport stack.
pub type ReqwestCommerceClient = CommerceClient<ReqwestHttpClient, ReqwestTransportErrorMapper>;

/// Executes provider operations against a single store.
///
/// The client owns the HTTP transport, the provider descriptor, the client credentials, and a
/// single-slot token cache. Bearer tokens are minted on demand through the client-credentials
/// grant and reused until they expire; concurrent callers that find the cache empty share one
/// exchange. Clones share the same cache, so they behave as one logical client.
pub struct CommerceClient<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// HTTP client wrapper used for every outbound provider request.
	pub http_client: Arc<C>,
	/// Mapper applied to transport-layer errors before surfacing them to callers.
	pub transport_mapper: Arc<M>,
	/// Provider descriptor that defines the token and GraphQL endpoints.
	pub descriptor: ProviderDescriptor,
	credentials: Credentials,
	token_ttl: Duration,
	cache: Arc<TokenCache>,
}
impl<C, M> CommerceClient<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Creates a client that reuses the caller-provided transport + mapper pair.
	pub fn with_http_client(
		descriptor: ProviderDescriptor,
		client_id: impl Into<String>,
		client_secret: impl Into<String>,
		http_client: impl Into<Arc<C>>,
		mapper: impl Into<Arc<M>>,
	) -> Self {
		Self {
			http_client: http_client.into(),
			transport_mapper: mapper.into(),
			descriptor,
			credentials: Credentials::new(client_id, client_secret),
			token_ttl: DEFAULT_TOKEN_TTL,
			cache: Default::default(),
		}
	}

	/// Sets the lifetime assumed for tokens whose response omits `expires_in`.
	///
	/// Values that are non-positive or longer than [`MAX_TOKEN_TTL`] are ignored.
	pub fn with_token_ttl(mut self, ttl: Duration) -> Self {
		if ttl.is_positive() && ttl <= MAX_TOKEN_TTL {
			self.token_ttl = ttl;
		}

		self
	}

	/// Treats cached tokens as expired `leeway` before their expiry instant.
	///
	/// Replaces the token cache, so call it before the client is first used.
	pub fn with_expiry_leeway(mut self, leeway: Duration) -> Self {
		self.cache = Arc::new(TokenCache::with_leeway(leeway));

		self
	}

	/// Returns the token cache backing this client.
	pub fn cache(&self) -> &TokenCache {
		&self.cache
	}

	/// Returns the lifetime assumed for tokens without `expires_in`.
	pub fn token_ttl(&self) -> Duration {
		self.token_ttl
	}

	/// Returns the configured client identifier.
	pub fn client_id(&self) -> &str {
		self.credentials.client_id.as_str()
	}

	/// Drops the cached token so the next call performs a fresh exchange.
	///
	/// The client never does this on its own; callers use it after the provider reports an
	/// authentication failure for a token that had not yet expired.
	pub fn invalidate_token(&self) {
		self.cache.invalidate();
	}
}
#[cfg(feature = "reqwest")]
impl CommerceClient<ReqwestHttpClient, ReqwestTransportErrorMapper> {
	/// Creates a client backed by its own reqwest transport with the default timeout.
	pub fn new(
		descriptor: ProviderDescriptor,
		client_id: impl Into<String>,
		client_secret: impl Into<String>,
	) -> Result<Self> {
		Ok(Self::with_http_client(
			descriptor,
			client_id,
			client_secret,
			ReqwestHttpClient::with_timeout(DEFAULT_TIMEOUT)?,
			Arc::new(ReqwestTransportErrorMapper),
		))
	}

	/// Creates a client from resolved configuration.
	pub fn from_config(config: &CommerceConfig) -> Result<Self> {
		let descriptor = config.descriptor()?;
		let http_client = ReqwestHttpClient::with_timeout(config.timeout())?;
		let client = Self::with_http_client(
			descriptor,
			config.client_id.as_str(),
			config.client_secret.expose(),
			http_client,
			Arc::new(ReqwestTransportErrorMapper),
		);

		Ok(client.with_token_ttl(config.token_ttl()))
	}
}
impl<C, M> Clone for CommerceClient<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn clone(&self) -> Self {
		Self {
			http_client: self.http_client.clone(),
			transport_mapper: self.transport_mapper.clone(),
			descriptor: self.descriptor.clone(),
			credentials: self.credentials.clone(),
			token_ttl: self.token_ttl,
			cache: self.cache.clone(),
		}
	}
}
impl<C, M> Debug for CommerceClient<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("CommerceClient")
			.field("descriptor", &self.descriptor)
			.field("client_id", &self.credentials.client_id.as_str())
			.field("client_secret", &"<redacted>")
			.field("token_ttl", &self.token_ttl)
			.field("cache", &self.cache)
			.finish()
	}
}
