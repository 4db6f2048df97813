//! Client-level error types shared across token exchanges, GraphQL execution, and configuration.
//!
//! Callers branch on [`Error::kind`] to tell "the provider saw the operation and rejected it"
//! ([`ErrorKind::Provider`]) apart from "the operation never completed" ([`ErrorKind::Auth`],
//! [`ErrorKind::Transport`]).

// self
use crate::_prelude::*;

/// Client-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;
type JsonPathError = serde_path_to_error::Error<serde_json::Error>;

/// Canonical client error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration or request validation problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Access token could not be obtained from the token endpoint.
	#[error(transparent)]
	Auth(#[from] AuthError),
	/// Request never completed (network, timeout, unreadable body).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Provider received the operation and rejected it.
	#[error(transparent)]
	Provider(#[from] ProviderError),
}
impl Error {
	/// Returns the coarse category of the failure.
	pub fn kind(&self) -> ErrorKind {
		match self {
			Self::Config(_) => ErrorKind::Config,
			Self::Auth(_) => ErrorKind::Auth,
			Self::Transport(_) => ErrorKind::Transport,
			Self::Provider(_) => ErrorKind::Provider,
		}
	}

	/// Returns `true` when the provider processed the operation and answered with errors.
	pub fn reached_provider(&self) -> bool {
		matches!(self, Self::Provider(_))
	}

	/// Returns the provider error payload, if this is a provider rejection.
	pub fn as_provider(&self) -> Option<&ProviderError> {
		match self {
			Self::Provider(err) => Some(err),
			_ => None,
		}
	}
}

/// Coarse failure categories used for user-facing messaging and metrics labels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
	/// Local configuration or validation failure.
	Config,
	/// Token exchange failure.
	Auth,
	/// Transport-layer failure.
	Transport,
	/// GraphQL-level rejection by the provider.
	Provider,
}
impl ErrorKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			ErrorKind::Config => "config",
			ErrorKind::Auth => "auth",
			ErrorKind::Transport => "transport",
			ErrorKind::Provider => "provider",
		}
	}
}
impl Display for ErrorKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Configuration and validation failures raised before any request leaves the process.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// HTTP request construction failed.
	#[error(transparent)]
	HttpRequest(#[from] oauth2::http::Error),
	/// A configured URL cannot be parsed or joined.
	#[error("Configured `{field}` URL is invalid.")]
	InvalidUrl {
		/// Configuration field holding the URL.
		field: &'static str,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Provider descriptor failed validation.
	#[error(transparent)]
	Descriptor(#[from] crate::provider::ProviderDescriptorError),
	/// A required configuration value is absent.
	#[error("Missing required configuration value `{key}`.")]
	MissingValue {
		/// Configuration key (environment variable or JSON field).
		key: String,
	},
	/// A configuration value is present but cannot be used.
	#[error("Configuration value `{key}` is invalid: {reason}.")]
	InvalidValue {
		/// Configuration key (environment variable or JSON field).
		key: String,
		/// Human-readable reason.
		reason: String,
	},
	/// JSON configuration document could not be decoded.
	#[error("Configuration document is malformed.")]
	MalformedDocument {
		/// Path-aware decoding failure.
		#[source]
		source: JsonPathError,
	},
	/// GraphQL document is empty.
	#[error("GraphQL operation document must not be empty.")]
	EmptyDocument,
	/// GraphQL variables could not be serialized.
	#[error("GraphQL variable `{name}` could not be serialized.")]
	InvalidVariable {
		/// Variable name.
		name: String,
		/// Serialization failure.
		#[source]
		source: serde_json::Error,
	},
	/// Storefront operations need a storefront endpoint and API key.
	#[error("Storefront endpoint or API key is not configured.")]
	MissingStorefront,
	/// A feature operation request failed local validation.
	#[error("Request is invalid: {reason}.")]
	InvalidRequest {
		/// Human-readable reason.
		reason: String,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}

	/// Shorthand for [`ConfigError::InvalidRequest`].
	pub fn invalid_request(reason: impl Into<String>) -> Self {
		Self::InvalidRequest { reason: reason.into() }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Token exchange failures; the cached token (if any) is left untouched.
#[derive(Debug, ThisError)]
pub enum AuthError {
	/// Token endpoint could not be reached or the exchange did not complete.
	#[error("Token endpoint could not be reached.")]
	Unreachable {
		/// Transport failure that interrupted the exchange.
		#[source]
		source: TransportError,
	},
	/// Token endpoint answered with a non-success status.
	#[error("Token endpoint rejected the credential grant with HTTP {status}.")]
	Rejected {
		/// HTTP status code.
		status: u16,
		/// OAuth `error` code, when the body carried one.
		error: Option<String>,
		/// OAuth `error_description`, when the body carried one.
		description: Option<String>,
		/// Truncated response body for diagnostics.
		body_preview: Option<String>,
		/// Retry-After hint from upstream, if supplied.
		retry_after: Option<Duration>,
	},
	/// Token endpoint responded with a body that is not the expected JSON.
	#[error("Token endpoint returned malformed JSON.")]
	MalformedResponse {
		/// Path-aware decoding failure.
		#[source]
		source: JsonPathError,
		/// HTTP status code.
		status: u16,
	},
	/// Token endpoint response omitted the access token.
	#[error("Token endpoint response is missing access_token.")]
	MissingAccessToken,
	/// Token lifetime could not be turned into an expiry instant.
	#[error("Token expiry is out of range.")]
	ExpiryOutOfRange,
}
impl AuthError {
	/// Returns the HTTP status the token endpoint answered with, when one was received.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::Rejected { status, .. } | Self::MalformedResponse { status, .. } => Some(*status),
			Self::Unreachable { source } => source.status(),
			Self::MissingAccessToken | Self::ExpiryOutOfRange => None,
		}
	}
}

/// Transport-level failures: the request never produced a usable provider answer.
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the provider.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the provider.")]
	Io(#[from] std::io::Error),
	/// Request exceeded the configured timeout.
	#[error("Request timed out while calling the provider.")]
	Timeout,
	/// Provider answered with a non-success status and no GraphQL errors.
	#[error("Provider answered with unexpected HTTP status {status}.")]
	UnexpectedStatus {
		/// HTTP status code.
		status: u16,
		/// Truncated response body for diagnostics.
		body_preview: Option<String>,
		/// Retry-After hint from upstream, if supplied.
		retry_after: Option<Duration>,
	},
	/// Response body could not be decoded.
	#[error("Provider returned a body that could not be decoded.")]
	MalformedBody {
		/// Path-aware decoding failure.
		#[source]
		source: JsonPathError,
		/// HTTP status code, when available.
		status: Option<u16>,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}

	/// Returns the HTTP status associated with the failure, when one was received.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::UnexpectedStatus { status, .. } => Some(*status),
			Self::MalformedBody { status, .. } => *status,
			_ => None,
		}
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}

/// GraphQL-level rejection, built from the first entry of the response's `errors` array.
#[derive(Clone, Debug, PartialEq, ThisError)]
#[error("Provider rejected the operation: {message}.")]
pub struct ProviderError {
	/// Message of the representative (first) error entry.
	pub message: String,
	/// Extension data of the representative error entry.
	pub extensions: Option<Value>,
	/// Machine-readable code taken from `extensions.code`, when present.
	pub code: Option<String>,
	/// HTTP status of the response carrying the errors.
	pub status: Option<u16>,
	/// Total number of error entries in the response.
	pub error_count: usize,
}
