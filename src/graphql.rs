//! GraphQL wire model: operations sent to the provider and the `{data, errors}` envelope it
//! answers with.

pub mod operation;
pub mod response;

pub use operation::*;
pub use response::*;

// crates.io
use oauth2::{
	HttpRequest, HttpResponse,
	http::{
		Method, Request,
		header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
	},
};
// self
use crate::{
	_prelude::*,
	error::{ConfigError, TransportError},
	http,
	token::TokenSecret,
};

/// Header carrying the storefront API key.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Credential attached to an outgoing GraphQL request.
#[derive(Clone, Copy, Debug)]
pub(crate) enum RequestAuth<'a> {
	/// `Authorization: Bearer <token>` for admin operations.
	Bearer(&'a TokenSecret),
	/// `x-api-key: <key>` for storefront operations.
	ApiKey(&'a TokenSecret),
}

/// Builds the JSON POST carrying `operation` to `endpoint`.
pub(crate) fn build_request(
	endpoint: &Url,
	operation: &GraphqlOperation,
	auth: RequestAuth<'_>,
) -> Result<HttpRequest, ConfigError> {
	let body = operation.to_body()?;
	let builder = Request::builder()
		.method(Method::POST)
		.uri(endpoint.as_str())
		.header(CONTENT_TYPE, "application/json")
		.header(ACCEPT, "application/json");
	let builder = match auth {
		RequestAuth::Bearer(token) => builder.header(AUTHORIZATION, token.bearer_header()),
		RequestAuth::ApiKey(key) => builder.header(API_KEY_HEADER, key.expose()),
	};

	Ok(builder.body(body)?)
}

/// Normalizes a provider answer into `data` or a structured failure.
///
/// The body is parsed regardless of status so GraphQL errors delivered with 4xx/5xx codes still
/// surface as [`ProviderError`](crate::error::ProviderError).
pub(crate) fn decode_response(response: &HttpResponse) -> Result<Value> {
	let status = response.status();
	let body = response.body();
	let mut deserializer = serde_json::Deserializer::from_slice(body);
	let parsed: Result<GraphqlResponse, _> = serde_path_to_error::deserialize(&mut deserializer);
	let unexpected_status = || TransportError::UnexpectedStatus {
		status: status.as_u16(),
		body_preview: http::body_preview(body),
		retry_after: http::parse_retry_after(response.headers()),
	};

	match parsed {
		Ok(envelope) => {
			let data = envelope.into_result(Some(status.as_u16()))?;

			if !status.is_success() {
				return Err(unexpected_status().into());
			}

			Ok(data)
		},
		Err(_) if !status.is_success() => Err(unexpected_status().into()),
		Err(source) =>
			Err(TransportError::MalformedBody { source, status: Some(status.as_u16()) }.into()),
	}
}

/// Decodes a `data` tree into a caller type, keeping the JSON path of any mismatch.
pub(crate) fn decode_data<T>(data: Value) -> Result<T>
where
	T: DeserializeOwned,
{
	serde_path_to_error::deserialize(data)
		.map_err(|source| TransportError::MalformedBody { source, status: None }.into())
}

#[cfg(test)]
mod tests {
	// crates.io
	use oauth2::http::StatusCode;
	use serde_json::json;
	// self
	use super::*;

	fn response(status: StatusCode, body: &str) -> HttpResponse {
		let mut response = HttpResponse::new(body.as_bytes().to_vec());

		*response.status_mut() = status;

		response
	}

	#[test]
	fn request_carries_bearer_and_json_body() {
		let endpoint = Url::parse("https://api.example.com/api/v1/admin/graphql")
			.expect("Endpoint fixture should parse.");
		let operation = GraphqlOperation::new("query { me { id } }")
			.expect("Operation fixture should be valid.");
		let token = TokenSecret::new("tok123");
		let request = build_request(&endpoint, &operation, RequestAuth::Bearer(&token))
			.expect("Request should build.");

		assert_eq!(request.method(), &Method::POST);
		assert_eq!(request.uri().to_string(), endpoint.as_str());
		assert_eq!(
			request.headers().get(AUTHORIZATION).and_then(|value| value.to_str().ok()),
			Some("Bearer tok123")
		);
		assert!(request.headers().get(API_KEY_HEADER).is_none());

		let body: Value =
			serde_json::from_slice(request.body()).expect("Request body should be JSON.");

		assert_eq!(body, json!({ "query": "query { me { id } }", "variables": {} }));
	}

	#[test]
	fn storefront_request_uses_api_key() {
		let endpoint =
			Url::parse("https://api.example.com/api/sf/graphql").expect("Endpoint should parse.");
		let operation = GraphqlOperation::new("query { listCountry { id } }")
			.expect("Operation fixture should be valid.");
		let key = TokenSecret::new("sf-key");
		let request = build_request(&endpoint, &operation, RequestAuth::ApiKey(&key))
			.expect("Request should build.");

		assert!(request.headers().get(AUTHORIZATION).is_none());
		assert_eq!(
			request.headers().get(API_KEY_HEADER).and_then(|value| value.to_str().ok()),
			Some("sf-key")
		);
	}

	#[test]
	fn data_is_returned_verbatim() {
		let data = json!({ "listOrder": { "data": [{ "id": "o-1", "totalPrice": 10.5 }] } });
		let body = json!({ "data": data }).to_string();
		let decoded =
			decode_response(&response(StatusCode::OK, &body)).expect("Data should decode.");

		assert_eq!(decoded, data);
	}

	#[test]
	fn missing_data_decodes_as_null() {
		let decoded = decode_response(&response(StatusCode::OK, "{\"errors\":[]}"))
			.expect("Empty errors should count as success.");

		assert_eq!(decoded, Value::Null);
	}

	#[test]
	fn errors_win_over_data_and_status() {
		let body = json!({
			"data": { "createOrderWithTransactions": null },
			"errors": [
				{ "message": "X", "extensions": { "code": "VARIANT_NOT_FOUND" } },
				{ "message": "Y" }
			]
		})
		.to_string();

		for status in [StatusCode::OK, StatusCode::BAD_REQUEST] {
			let err = decode_response(&response(status, &body))
				.expect_err("GraphQL errors should fail the call.");

			match err {
				Error::Provider(provider) => {
					assert_eq!(provider.message, "X");
					assert_eq!(provider.code.as_deref(), Some("VARIANT_NOT_FOUND"));
					assert_eq!(provider.error_count, 2);
					assert_eq!(provider.status, Some(status.as_u16()));
				},
				other => panic!("Unexpected error variant: {other:?}."),
			}
		}
	}

	#[test]
	fn non_json_bodies_are_transport_failures() {
		let err = decode_response(&response(StatusCode::OK, "<html>gateway</html>"))
			.expect_err("HTML bodies should fail.");

		assert!(matches!(
			err,
			Error::Transport(TransportError::MalformedBody { status: Some(200), .. })
		));

		let err = decode_response(&response(StatusCode::BAD_GATEWAY, "<html>gateway</html>"))
			.expect_err("Gateway errors should fail.");

		match err {
			Error::Transport(TransportError::UnexpectedStatus { status, body_preview, .. }) => {
				assert_eq!(status, 502);
				assert_eq!(body_preview.as_deref(), Some("<html>gateway</html>"));
			},
			other => panic!("Unexpected error variant: {other:?}."),
		}
	}

	#[test]
	fn typed_decode_reports_path() {
		#[derive(Debug, Deserialize)]
		struct Payload {
			#[allow(dead_code)]
			count: u32,
		}

		let err = decode_data::<Payload>(json!({ "count": "many" }))
			.expect_err("Mismatched types should fail.");

		match err {
			Error::Transport(TransportError::MalformedBody { source, status: None }) => {
				assert_eq!(source.path().to_string(), "count");
			},
			other => panic!("Unexpected error variant: {other:?}."),
		}
	}
}
