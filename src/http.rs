//! Transport primitives shared by token exchanges and GraphQL calls.
//!
//! The module exposes [`ProviderHttpClient`] and [`TransportErrorMapper`] so downstream crates
//! can plug in custom HTTP stacks (or fakes in tests) without touching the client logic. Handles
//! speak the `oauth2` crate's [`AsyncHttpClient`] contract, which keeps requests and responses
//! as plain `http` types.

// crates.io
use oauth2::{
	AsyncHttpClient, HttpClientError, HttpRequest, HttpResponse,
	http::{HeaderMap, header::RETRY_AFTER},
};
use time::format_description::well_known::Rfc2822;
// self
use crate::{
	_prelude::*,
	error::{ConfigError, TransportError},
};

/// Default request timeout applied to the reqwest transport.
pub const DEFAULT_TIMEOUT: StdDuration = StdDuration::from_secs(30);

const BODY_PREVIEW_LIMIT: usize = 256;

/// Abstraction over HTTP transports capable of reaching the provider's endpoints.
///
/// The trait is the client's only dependency on an HTTP stack. Implementations must be
/// `Send + Sync + 'static` so they can be shared across client instances, and the handles they
/// return must own whatever state is required so their request futures remain `Send` for the
/// lifetime of the in-flight call.
pub trait ProviderHttpClient
where
	Self: 'static + Send + Sync,
{
	/// Concrete error emitted by the underlying transport.
	type TransportError: 'static + Send + Sync + StdError;

	/// [`AsyncHttpClient`] handle used for a single request.
	type Handle: for<'c> AsyncHttpClient<
			'c,
			Error = HttpClientError<Self::TransportError>,
			Future: 'c + Send,
		>
		+ 'static
		+ Send
		+ Sync;

	/// Builds a handle for the next request.
	fn handle(&self) -> Self::Handle;
}

/// Maps HTTP transport failures into client [`Error`] values.
pub trait TransportErrorMapper<E>
where
	Self: 'static + Send + Sync,
	E: 'static + Send + Sync + StdError,
{
	/// Converts an [`HttpClientError`] emitted by the transport into a client error.
	///
	/// Request construction problems map to [`ConfigError`]; everything else should map to
	/// [`TransportError`].
	fn map_transport_error(&self, error: HttpClientError<E>) -> Error;
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// Provider endpoints answer directly, so redirects are never followed. Configure any custom
/// [`ReqwestClient`] passed to [`ReqwestHttpClient::with_client`] the same way.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Builds a client with the provided overall request timeout.
	pub fn with_timeout(timeout: StdDuration) -> Result<Self, ConfigError> {
		let client = ReqwestClient::builder()
			.timeout(timeout)
			.redirect(reqwest::redirect::Policy::none())
			.build()?;

		Ok(Self(client))
	}

	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl ProviderHttpClient for ReqwestHttpClient {
	type Handle = ReqwestHandle;
	type TransportError = ReqwestError;

	fn handle(&self) -> Self::Handle {
		ReqwestHandle(self.0.clone())
	}
}

/// Per-request handle returned by [`ReqwestHttpClient`].
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug)]
pub struct ReqwestHandle(ReqwestClient);
#[cfg(feature = "reqwest")]
impl<'c> AsyncHttpClient<'c> for ReqwestHandle {
	type Error = HttpClientError<ReqwestError>;
	type Future =
		Pin<Box<dyn Future<Output = Result<HttpResponse, Self::Error>> + 'c + Send + Sync>>;

	fn call(&'c self, request: HttpRequest) -> Self::Future {
		let client = self.0.clone();

		Box::pin(async move {
			let response =
				client.execute(request.try_into().map_err(Box::new)?).await.map_err(Box::new)?;
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

/// Default mapper for reqwest-backed transports.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransportErrorMapper;
#[cfg(feature = "reqwest")]
impl TransportErrorMapper<ReqwestError> for ReqwestTransportErrorMapper {
	fn map_transport_error(&self, err: HttpClientError<ReqwestError>) -> Error {
		match err {
			HttpClientError::Reqwest(inner) => map_reqwest_error(*inner),
			HttpClientError::Http(inner) => ConfigError::from(inner).into(),
			HttpClientError::Io(inner) => TransportError::Io(inner).into(),
			HttpClientError::Other(message) =>
				TransportError::Io(std::io::Error::other(message)).into(),
			_ => TransportError::Io(std::io::Error::other("unrecognized HTTP client error")).into(),
		}
	}
}

#[cfg(feature = "reqwest")]
fn map_reqwest_error(err: ReqwestError) -> Error {
	if err.is_builder() {
		return ConfigError::from(err).into();
	}
	if err.is_timeout() {
		return TransportError::Timeout.into();
	}

	TransportError::from(err).into()
}

/// Dispatches `request` through a fresh handle and maps transport failures.
pub(crate) async fn dispatch<C, M>(
	http_client: &C,
	mapper: &M,
	request: HttpRequest,
) -> Result<HttpResponse>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	let handle = http_client.handle();

	handle.call(request).await.map_err(|err| mapper.map_transport_error(err))
}

/// Renders a bounded, lossy UTF-8 preview of a response body for diagnostics.
pub(crate) fn body_preview(body: &[u8]) -> Option<String> {
	if body.is_empty() {
		return None;
	}

	let text = String::from_utf8_lossy(body);

	if text.chars().count() <= BODY_PREVIEW_LIMIT {
		return Some(text.into_owned());
	}

	let mut buf = text.chars().take(BODY_PREVIEW_LIMIT).collect::<String>();

	buf.push('…');

	Some(buf)
}

/// Reads a Retry-After hint (delta seconds or HTTP date) as a relative duration.
pub(crate) fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
	let value = headers.get(RETRY_AFTER)?;
	let raw = value.to_str().ok()?.trim();

	if let Ok(secs) = raw.parse::<u32>() {
		return Some(Duration::seconds(i64::from(secs)));
	}
	if let Ok(moment) = OffsetDateTime::parse(raw, &Rfc2822) {
		let delta = moment - OffsetDateTime::now_utc();

		if delta.is_positive() {
			return Some(delta);
		}
	}

	None
}

#[cfg(test)]
mod tests {
	// crates.io
	use oauth2::http::HeaderValue;
	// self
	use super::*;

	#[test]
	fn retry_after_accepts_delta_seconds() {
		let mut headers = HeaderMap::new();

		assert_eq!(parse_retry_after(&headers), None);

		headers.insert(RETRY_AFTER, HeaderValue::from_static("12"));

		assert_eq!(parse_retry_after(&headers), Some(Duration::seconds(12)));

		headers.insert(RETRY_AFTER, HeaderValue::from_static("Wed, 21 Oct 2015 07:28:00 GMT"));

		assert_eq!(parse_retry_after(&headers), None, "Past dates carry no useful hint.");
	}

	#[test]
	fn body_preview_truncates_long_bodies() {
		assert_eq!(body_preview(b""), None);
		assert_eq!(body_preview(b"upstream down").as_deref(), Some("upstream down"));

		let long = "x".repeat(BODY_PREVIEW_LIMIT + 10);
		let preview = body_preview(long.as_bytes()).expect("Long bodies should yield a preview.");

		assert_eq!(preview.chars().count(), BODY_PREVIEW_LIMIT + 1);
		assert!(preview.ends_with('…'));
	}

	#[cfg(feature = "reqwest")]
	#[test]
	fn reqwest_mapper_routes_other_errors_to_transport() {
		let err = ReqwestTransportErrorMapper
			.map_transport_error(HttpClientError::Other("connection reset".into()));

		assert!(matches!(err, Error::Transport(TransportError::Io(_))));
	}

	#[cfg(feature = "reqwest")]
	#[test]
	fn timeout_client_builds() {
		assert!(ReqwestHttpClient::with_timeout(DEFAULT_TIMEOUT).is_ok());
	}
}
