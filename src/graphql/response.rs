//! The `{data, errors}` envelope returned by GraphQL endpoints.

// self
use crate::{_prelude::*, error::ProviderError};

/// Raw provider answer before normalization.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct GraphqlResponse {
	/// Operation-specific payload.
	#[serde(default)]
	pub data: Option<Value>,
	/// Structured errors; any entry fails the whole call.
	#[serde(default)]
	pub errors: Option<Vec<GraphqlError>>,
}
impl GraphqlResponse {
	/// Returns `data` (or `null`) when no errors were reported.
	///
	/// A payload is never trusted alongside errors, even a partial one.
	pub fn into_result(self, status: Option<u16>) -> Result<Value, ProviderError> {
		match self.errors {
			Some(errors) if !errors.is_empty() => Err(ProviderError::from_entries(&errors, status)),
			_ => Ok(self.data.unwrap_or(Value::Null)),
		}
	}
}

/// Single GraphQL error entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GraphqlError {
	/// Human-readable message.
	#[serde(default)]
	pub message: String,
	/// Provider-specific diagnostics (error codes, validation details).
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub extensions: Option<Value>,
	/// Response path the error relates to.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub path: Option<Vec<Value>>,
}

impl ProviderError {
	/// Builds the representative failure from the first entry of a non-empty error list.
	pub fn from_entries(errors: &[GraphqlError], status: Option<u16>) -> Self {
		let first = errors.first();
		let extensions = first.and_then(|entry| entry.extensions.clone());
		let code = extensions
			.as_ref()
			.and_then(|value| value.get("code"))
			.and_then(Value::as_str)
			.map(str::to_owned);

		Self {
			message: first.map(|entry| entry.message.clone()).unwrap_or_default(),
			extensions,
			code,
			status,
			error_count: errors.len(),
		}
	}
}
