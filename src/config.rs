//! Client configuration resolved once at startup.
//!
//! Values come from environment variables ([`CommerceConfig::from_env`]) or a JSON document
//! ([`CommerceConfig::from_json_str`]). Secrets are only ever read from these sources.
//!
//! | Variable | Required | Meaning |
//! | --- | --- | --- |
//! | `COMMERCE_CLIENT_ID` | yes | OAuth client identifier |
//! | `COMMERCE_CLIENT_SECRET` | yes | OAuth client secret |
//! | `COMMERCE_STORE_URL` | yes | Store base URL hosting the token endpoint |
//! | `COMMERCE_API_URL` | yes | API base URL hosting the GraphQL endpoints |
//! | `COMMERCE_STOREFRONT_API_KEY` | no | Enables storefront operations |
//! | `COMMERCE_CLIENT_AUTH_METHOD` | no | `client_secret_post` (default) or `client_secret_basic` |
//! | `COMMERCE_TIMEOUT_SECS` | no | Request timeout, default 30 |
//! | `COMMERCE_TOKEN_TTL_SECS` | no | Token lifetime when `expires_in` is absent, default 3600 |

// self
use crate::{
	_prelude::*,
	error::ConfigError,
	http::DEFAULT_TIMEOUT,
	oauth::{DEFAULT_TOKEN_TTL, MAX_TOKEN_TTL},
	provider::{
		ADMIN_GRAPHQL_PATH, ClientAuthMethod, ProviderDescriptor, STOREFRONT_GRAPHQL_PATH,
		TOKEN_PATH,
	},
	token::TokenSecret,
};

/// Environment variable holding the client identifier.
pub const ENV_CLIENT_ID: &str = "COMMERCE_CLIENT_ID";
/// Environment variable holding the client secret.
pub const ENV_CLIENT_SECRET: &str = "COMMERCE_CLIENT_SECRET";
/// Environment variable holding the store base URL.
pub const ENV_STORE_URL: &str = "COMMERCE_STORE_URL";
/// Environment variable holding the API base URL.
pub const ENV_API_URL: &str = "COMMERCE_API_URL";
/// Environment variable holding the optional storefront API key.
pub const ENV_STOREFRONT_API_KEY: &str = "COMMERCE_STOREFRONT_API_KEY";
/// Environment variable selecting the token endpoint authentication method.
pub const ENV_CLIENT_AUTH_METHOD: &str = "COMMERCE_CLIENT_AUTH_METHOD";
/// Environment variable holding the request timeout in seconds.
pub const ENV_TIMEOUT_SECS: &str = "COMMERCE_TIMEOUT_SECS";
/// Environment variable holding the fallback token lifetime in seconds.
pub const ENV_TOKEN_TTL_SECS: &str = "COMMERCE_TOKEN_TTL_SECS";

/// Resolved client configuration.
#[derive(Clone, Deserialize)]
pub struct CommerceConfig {
	/// OAuth client identifier.
	pub client_id: String,
	/// OAuth client secret.
	pub client_secret: TokenSecret,
	/// Store base URL; the token endpoint lives under it.
	pub store_url: Url,
	/// API base URL; the admin and storefront GraphQL endpoints live under it.
	pub api_url: Url,
	/// Storefront API key; storefront operations are unavailable without it.
	#[serde(default)]
	pub storefront_api_key: Option<TokenSecret>,
	/// Token endpoint authentication method.
	#[serde(default)]
	pub client_auth_method: ClientAuthMethod,
	/// Overall request timeout in seconds.
	#[serde(default = "default_timeout_secs")]
	pub timeout_secs: u64,
	/// Token lifetime in seconds applied when the token endpoint omits `expires_in`.
	#[serde(default = "default_token_ttl_secs")]
	pub token_ttl_secs: i64,
}
impl CommerceConfig {
	/// Reads configuration from the process environment.
	pub fn from_env() -> Result<Self, ConfigError> {
		Self::from_lookup(|key| std::env::var(key).ok())
	}

	/// Reads configuration through an arbitrary key lookup (environment-shaped keys).
	///
	/// Blank values count as absent.
	pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
	where
		F: Fn(&str) -> Option<String>,
	{
		let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
		let require =
			|key: &str| get(key).ok_or_else(|| ConfigError::MissingValue { key: key.into() });
		let url = |key: &'static str| {
			let raw = require(key)?;

			Url::parse(raw.trim()).map_err(|source| ConfigError::InvalidUrl { field: key, source })
		};
		let client_auth_method = match get(ENV_CLIENT_AUTH_METHOD).as_deref().map(str::trim) {
			None | Some("client_secret_post") => ClientAuthMethod::ClientSecretPost,
			Some("client_secret_basic") => ClientAuthMethod::ClientSecretBasic,
			Some(other) =>
				return Err(ConfigError::InvalidValue {
					key: ENV_CLIENT_AUTH_METHOD.into(),
					reason: format!("unsupported method `{other}`"),
				}),
		};
		let config = Self {
			client_id: require(ENV_CLIENT_ID)?,
			client_secret: TokenSecret::new(require(ENV_CLIENT_SECRET)?),
			store_url: url(ENV_STORE_URL)?,
			api_url: url(ENV_API_URL)?,
			storefront_api_key: get(ENV_STOREFRONT_API_KEY).map(TokenSecret::new),
			client_auth_method,
			timeout_secs: parse_number(ENV_TIMEOUT_SECS, get(ENV_TIMEOUT_SECS))?
				.unwrap_or_else(default_timeout_secs),
			token_ttl_secs: parse_number(ENV_TOKEN_TTL_SECS, get(ENV_TOKEN_TTL_SECS))?
				.unwrap_or_else(default_token_ttl_secs),
		};

		config.validate()?;

		Ok(config)
	}

	/// Decodes configuration from a JSON document with snake_case field names.
	pub fn from_json_str(document: &str) -> Result<Self, ConfigError> {
		let mut deserializer = serde_json::Deserializer::from_str(document);
		let config: Self = serde_path_to_error::deserialize(&mut deserializer)
			.map_err(|source| ConfigError::MalformedDocument { source })?;

		config.validate()?;

		Ok(config)
	}

	/// Checks value ranges that serde cannot express.
	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.client_id.trim().is_empty() {
			return Err(ConfigError::MissingValue { key: "client_id".into() });
		}
		if self.client_secret.expose().is_empty() {
			return Err(ConfigError::MissingValue { key: "client_secret".into() });
		}
		if self.timeout_secs == 0 {
			return Err(ConfigError::InvalidValue {
				key: "timeout_secs".into(),
				reason: "must be positive".into(),
			});
		}
		if self.token_ttl_secs <= 0 {
			return Err(ConfigError::InvalidValue {
				key: "token_ttl_secs".into(),
				reason: "must be positive".into(),
			});
		}
		if self.token_ttl_secs > MAX_TOKEN_TTL.whole_seconds() {
			return Err(ConfigError::InvalidValue {
				key: "token_ttl_secs".into(),
				reason: format!("must not exceed {}", MAX_TOKEN_TTL.whole_seconds()),
			});
		}

		Ok(())
	}

	/// Returns the request timeout.
	pub fn timeout(&self) -> StdDuration {
		StdDuration::from_secs(self.timeout_secs)
	}

	/// Returns the fallback token lifetime.
	pub fn token_ttl(&self) -> Duration {
		Duration::seconds(self.token_ttl_secs)
	}

	/// Builds the validated endpoint set.
	///
	/// Endpoint paths are absolute, so any path component of the base URLs is replaced.
	pub fn descriptor(&self) -> Result<ProviderDescriptor, ConfigError> {
		let join = |base: &Url, field: &'static str, path: &str| {
			base.join(path).map_err(|source| ConfigError::InvalidUrl { field, source })
		};
		let mut builder = ProviderDescriptor::builder()
			.token_endpoint(join(&self.store_url, "store_url", TOKEN_PATH)?)
			.admin_endpoint(join(&self.api_url, "api_url", ADMIN_GRAPHQL_PATH)?)
			.client_auth_method(self.client_auth_method);

		if let Some(key) = &self.storefront_api_key {
			builder = builder.storefront_endpoint(
				join(&self.api_url, "api_url", STOREFRONT_GRAPHQL_PATH)?,
				key.expose(),
			);
		}

		Ok(builder.build()?)
	}
}
impl Debug for CommerceConfig {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("CommerceConfig")
			.field("client_id", &self.client_id)
			.field("client_secret", &"<redacted>")
			.field("store_url", &self.store_url.as_str())
			.field("api_url", &self.api_url.as_str())
			.field("storefront_api_key_set", &self.storefront_api_key.is_some())
			.field("client_auth_method", &self.client_auth_method)
			.field("timeout_secs", &self.timeout_secs)
			.field("token_ttl_secs", &self.token_ttl_secs)
			.finish()
	}
}

fn default_timeout_secs() -> u64 {
	DEFAULT_TIMEOUT.as_secs()
}

fn default_token_ttl_secs() -> i64 {
	DEFAULT_TOKEN_TTL.whole_seconds()
}

fn parse_number<T>(key: &str, raw: Option<String>) -> Result<Option<T>, ConfigError>
where
	T: FromStr,
	T::Err: Display,
{
	raw.map(|value| {
		value.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
			key: key.into(),
			reason: e.to_string(),
		})
	})
	.transpose()
}
