//! Client-credentials token exchange: request construction and response interpretation.
//!
//! The exchange posts `grant_type=client_credentials` as form data and reads `access_token`
//! plus an optional `expires_in` from the JSON answer. Providers that omit `expires_in`, or send
//! one that is non-positive, unreadable, or longer than [`MAX_TOKEN_TTL`], get the configured
//! default lifetime.

// crates.io
use base64::{Engine, engine::general_purpose::STANDARD};
use oauth2::{
	ClientId, ClientSecret, HttpRequest, HttpResponse,
	http::{
		Method, Request,
		header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
	},
};
use url::form_urlencoded;
// self
use crate::{
	_prelude::*,
	error::{AuthError, ConfigError},
	http,
	provider::ClientAuthMethod,
	token::{AccessToken, AccessTokenBuilderError},
};

/// Token lifetime assumed when the token endpoint does not state one.
pub const DEFAULT_TOKEN_TTL: Duration = Duration::hours(1);

/// Longest token lifetime accepted from the token endpoint or from configuration.
pub const MAX_TOKEN_TTL: Duration = Duration::days(365);

/// Grant identifier sent to the token endpoint.
pub const CLIENT_CREDENTIALS_GRANT: &str = "client_credentials";

/// Client identifier and secret for the credential grant. The secret is redacted in `Debug`.
#[derive(Clone, Debug)]
pub struct Credentials {
	/// OAuth 2.0 client identifier.
	pub client_id: ClientId,
	/// OAuth 2.0 client secret.
	pub client_secret: ClientSecret,
}
impl Credentials {
	/// Wraps raw credential strings.
	pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
		Self {
			client_id: ClientId::new(client_id.into()),
			client_secret: ClientSecret::new(client_secret.into()),
		}
	}
}

#[derive(Debug, Deserialize)]
struct TokenEndpointResponse {
	#[serde(default)]
	access_token: Option<String>,
	#[serde(default)]
	expires_in: Option<Value>,
}

// Accepts integers, fractions, and numeric strings; anything else is treated as absent.
fn stated_lifetime(expires_in: &Value) -> Option<Duration> {
	let seconds = match expires_in {
		Value::Number(number) =>
			number.as_i64().or_else(|| number.as_f64().and_then(whole_seconds))?,
		Value::String(text) => {
			let text = text.trim();

			text.parse::<i64>().ok().or_else(|| text.parse().ok().and_then(whole_seconds))?
		},
		_ => return None,
	};

	(1..=MAX_TOKEN_TTL.whole_seconds()).contains(&seconds).then_some(Duration::seconds(seconds))
}

// Saturating cast; the range check rejects whatever saturates.
fn whole_seconds(value: f64) -> Option<i64> {
	if value.is_finite() { Some(value.trunc() as i64) } else { None }
}

#[derive(Debug, Default, Deserialize)]
struct TokenEndpointErrorBody {
	#[serde(default)]
	error: Option<String>,
	#[serde(default)]
	error_description: Option<String>,
}

/// Builds the form-encoded credential grant request.
pub(crate) fn build_token_request(
	endpoint: &Url,
	credentials: &Credentials,
	method: ClientAuthMethod,
) -> Result<HttpRequest, ConfigError> {
	let mut form = form_urlencoded::Serializer::new(String::new());
	let mut builder = Request::builder()
		.method(Method::POST)
		.uri(endpoint.as_str())
		.header(CONTENT_TYPE, "application/x-www-form-urlencoded")
		.header(ACCEPT, "application/json");

	form.append_pair("grant_type", CLIENT_CREDENTIALS_GRANT);

	match method {
		ClientAuthMethod::ClientSecretPost => {
			form.append_pair("client_id", credentials.client_id.as_str());
			form.append_pair("client_secret", credentials.client_secret.secret());
		},
		ClientAuthMethod::ClientSecretBasic => {
			let id = form_urlencoded::byte_serialize(credentials.client_id.as_bytes())
				.collect::<String>();
			let secret =
				form_urlencoded::byte_serialize(credentials.client_secret.secret().as_bytes())
					.collect::<String>();
			let encoded = STANDARD.encode(format!("{id}:{secret}"));

			builder = builder.header(AUTHORIZATION, format!("Basic {encoded}"));
		},
	}

	Ok(builder.body(form.finish().into_bytes())?)
}

/// Interprets the token endpoint answer, stamping the token as issued at `issued_at`.
pub(crate) fn parse_token_response(
	response: &HttpResponse,
	issued_at: OffsetDateTime,
	default_ttl: Duration,
) -> Result<AccessToken, AuthError> {
	let status = response.status();
	let body = response.body();

	if !status.is_success() {
		let details: TokenEndpointErrorBody = serde_json::from_slice(body).unwrap_or_default();

		return Err(AuthError::Rejected {
			status: status.as_u16(),
			error: details.error,
			description: details.error_description,
			body_preview: http::body_preview(body),
			retry_after: http::parse_retry_after(response.headers()),
		});
	}

	let mut deserializer = serde_json::Deserializer::from_slice(body);
	let parsed: TokenEndpointResponse = serde_path_to_error::deserialize(&mut deserializer)
		.map_err(|source| AuthError::MalformedResponse { source, status: status.as_u16() })?;
	let secret = parsed
		.access_token
		.filter(|value| !value.is_empty())
		.ok_or(AuthError::MissingAccessToken)?;
	let ttl = parsed.expires_in.as_ref().and_then(stated_lifetime).unwrap_or(default_ttl);

	AccessToken::builder().secret(secret).issued_at(issued_at).expires_in(ttl).build().map_err(
		|e| match e {
			AccessTokenBuilderError::MissingAccessToken => AuthError::MissingAccessToken,
			AccessTokenBuilderError::MissingExpiry | AccessTokenBuilderError::ExpiryOutOfRange =>
				AuthError::ExpiryOutOfRange,
		},
	)
}

#[cfg(test)]
mod tests {
	// crates.io
	use oauth2::http::{HeaderValue, StatusCode, header::RETRY_AFTER};
	use time::macros;
	// self
	use super::*;

	const ISSUED: OffsetDateTime = macros::datetime!(2025-01-01 00:00 UTC);

	fn response(status: StatusCode, body: &str) -> HttpResponse {
		let mut response = HttpResponse::new(body.as_bytes().to_vec());

		*response.status_mut() = status;

		response
	}

	fn endpoint() -> Url {
		Url::parse("https://demo.example.com/api/admin/oauth/token")
			.expect("Token endpoint fixture should parse.")
	}

	#[test]
	fn post_method_sends_credentials_in_form_body() {
		let request = build_token_request(
			&endpoint(),
			&Credentials::new("abc", "x y&z"),
			ClientAuthMethod::ClientSecretPost,
		)
		.expect("Token request should build.");
		let body = String::from_utf8(request.body().clone()).expect("Form body should be UTF-8.");

		assert_eq!(body, "grant_type=client_credentials&client_id=abc&client_secret=x+y%26z");
		assert_eq!(
			request.headers().get(CONTENT_TYPE).and_then(|value| value.to_str().ok()),
			Some("application/x-www-form-urlencoded")
		);
		assert!(request.headers().get(AUTHORIZATION).is_none());
	}

	#[test]
	fn basic_method_moves_credentials_to_header() {
		let request = build_token_request(
			&endpoint(),
			&Credentials::new("abc", "xyz"),
			ClientAuthMethod::ClientSecretBasic,
		)
		.expect("Token request should build.");

		assert_eq!(request.body().as_slice(), b"grant_type=client_credentials");
		assert_eq!(
			request.headers().get(AUTHORIZATION).and_then(|value| value.to_str().ok()),
			Some("Basic YWJjOnh5eg==")
		);
	}

	#[test]
	fn missing_expires_in_falls_back_to_default_ttl() {
		let token = parse_token_response(
			&response(StatusCode::OK, "{\"access_token\":\"tok123\"}"),
			ISSUED,
			DEFAULT_TOKEN_TTL,
		)
		.expect("Token should parse.");

		assert_eq!(token.expose(), "tok123");
		assert_eq!(token.expires_at, ISSUED + Duration::hours(1));
	}

	#[test]
	fn stated_expiry_is_honored() {
		for body in [
			"{\"access_token\":\"t\",\"expires_in\":900}",
			"{\"access_token\":\"t\",\"expires_in\":\"900\"}",
		] {
			let token = parse_token_response(
				&response(StatusCode::OK, body),
				ISSUED,
				DEFAULT_TOKEN_TTL,
			)
			.expect("Token should parse.");

			assert_eq!(token.expires_at, ISSUED + Duration::seconds(900), "{body}");
		}

		let token = parse_token_response(
			&response(StatusCode::OK, "{\"access_token\":\"t\",\"expires_in\":0}"),
			ISSUED,
			DEFAULT_TOKEN_TTL,
		)
		.expect("Token should parse.");

		assert_eq!(token.expires_at, ISSUED + DEFAULT_TOKEN_TTL);
	}

	#[test]
	fn fractional_expiry_is_truncated() {
		for body in [
			"{\"access_token\":\"t\",\"expires_in\":3599.5}",
			"{\"access_token\":\"t\",\"expires_in\":\"3599.5\"}",
		] {
			let token = parse_token_response(
				&response(StatusCode::OK, body),
				ISSUED,
				DEFAULT_TOKEN_TTL,
			)
			.expect("Token should parse.");

			assert_eq!(token.expires_at, ISSUED + Duration::seconds(3599), "{body}");
		}
	}

	#[test]
	fn unusable_expiry_falls_back_to_default_ttl() {
		for body in [
			"{\"access_token\":\"t\",\"expires_in\":9223372036854775807}",
			"{\"access_token\":\"t\",\"expires_in\":18446744073709551615}",
			"{\"access_token\":\"t\",\"expires_in\":1e300}",
			"{\"access_token\":\"t\",\"expires_in\":\"soon\"}",
			"{\"access_token\":\"t\",\"expires_in\":true}",
			"{\"access_token\":\"t\",\"expires_in\":0.4}",
		] {
			let token = parse_token_response(
				&response(StatusCode::OK, body),
				ISSUED,
				DEFAULT_TOKEN_TTL,
			)
			.expect("Token should parse.");

			assert_eq!(token.expires_at, ISSUED + DEFAULT_TOKEN_TTL, "{body}");
		}

		let token = parse_token_response(
			&response(StatusCode::OK, "{\"access_token\":\"t\",\"expires_in\":31536000}"),
			ISSUED,
			DEFAULT_TOKEN_TTL,
		)
		.expect("Token should parse.");

		assert_eq!(token.expires_at, ISSUED + MAX_TOKEN_TTL);
	}

	#[test]
	fn overflowing_default_ttl_is_an_error() {
		let err = parse_token_response(
			&response(StatusCode::OK, "{\"access_token\":\"t\"}"),
			ISSUED,
			Duration::MAX,
		)
		.expect_err("Overflowing expiry should fail.");

		assert!(matches!(err, AuthError::ExpiryOutOfRange));
	}

	#[test]
	fn missing_or_empty_token_is_rejected() {
		for body in ["{\"token_type\":\"bearer\"}", "{\"access_token\":\"\"}"] {
			let err = parse_token_response(
				&response(StatusCode::OK, body),
				ISSUED,
				DEFAULT_TOKEN_TTL,
			)
			.expect_err("Missing tokens should fail.");

			assert!(matches!(err, AuthError::MissingAccessToken), "{body}");
		}
	}

	#[test]
	fn non_success_status_captures_oauth_details() {
		let mut rejected = response(
			StatusCode::UNAUTHORIZED,
			"{\"error\":\"invalid_client\",\"error_description\":\"Unknown client\"}",
		);

		rejected.headers_mut().insert(RETRY_AFTER, HeaderValue::from_static("30"));

		match parse_token_response(&rejected, ISSUED, DEFAULT_TOKEN_TTL) {
			Err(AuthError::Rejected { status, error, description, retry_after, .. }) => {
				assert_eq!(status, 401);
				assert_eq!(error.as_deref(), Some("invalid_client"));
				assert_eq!(description.as_deref(), Some("Unknown client"));
				assert_eq!(retry_after, Some(Duration::seconds(30)));
			},
			other => panic!("Unexpected result: {other:?}."),
		}
	}

	#[test]
	fn non_json_success_body_is_malformed() {
		let err = parse_token_response(
			&response(StatusCode::OK, "<html></html>"),
			ISSUED,
			DEFAULT_TOKEN_TTL,
		)
		.expect_err("HTML should fail.");

		assert!(matches!(err, AuthError::MalformedResponse { status: 200, .. }));
	}
}
