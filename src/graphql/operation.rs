//! Immutable GraphQL operation documents plus their variables.

// self
use crate::{_prelude::*, error::ConfigError};

/// Query or mutation document with its variable mapping.
///
/// Serializes to the `{query, variables, operationName?}` body expected by GraphQL endpoints.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GraphqlOperation {
	query: String,
	variables: JsonMap<String, Value>,
	#[serde(rename = "operationName", skip_serializing_if = "Option::is_none")]
	operation_name: Option<String>,
}
impl GraphqlOperation {
	/// Creates an operation with no variables; blank documents are rejected.
	pub fn new(document: impl Into<String>) -> Result<Self, ConfigError> {
		let query = document.into();

		if query.trim().is_empty() {
			return Err(ConfigError::EmptyDocument);
		}

		Ok(Self { query, variables: JsonMap::new(), operation_name: None })
	}

	/// Replaces the whole variable mapping.
	pub fn with_variables(mut self, variables: JsonMap<String, Value>) -> Self {
		self.variables = variables;

		self
	}

	/// Serializes `value` and binds it to `name`.
	pub fn variable(
		mut self,
		name: impl Into<String>,
		value: impl Serialize,
	) -> Result<Self, ConfigError> {
		let name = name.into();
		let value = serde_json::to_value(value)
			.map_err(|source| ConfigError::InvalidVariable { name: name.clone(), source })?;

		self.variables.insert(name, value);

		Ok(self)
	}

	/// Sets the `operationName` sent alongside the document.
	pub fn with_operation_name(mut self, name: impl Into<String>) -> Self {
		self.operation_name = Some(name.into());

		self
	}

	/// Returns the document text.
	pub fn document(&self) -> &str {
		&self.query
	}

	/// Returns the bound variables.
	pub fn variables(&self) -> &JsonMap<String, Value> {
		&self.variables
	}

	/// Returns the operation name, if set.
	pub fn operation_name(&self) -> Option<&str> {
		self.operation_name.as_deref()
	}

	pub(crate) fn to_body(&self) -> Result<Vec<u8>, ConfigError> {
		serde_json::to_vec(self)
			.map_err(|source| ConfigError::InvalidVariable { name: "variables".into(), source })
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use serde_json::json;
	// self
	use super::*;

	#[test]
	fn blank_documents_are_rejected() {
		assert!(matches!(GraphqlOperation::new(""), Err(ConfigError::EmptyDocument)));
		assert!(matches!(GraphqlOperation::new(" \n\t"), Err(ConfigError::EmptyDocument)));
	}

	#[test]
	fn variables_and_name_serialize_into_body() {
		let document = "query ListOrder($customerEmail: StringFilterInput) { x }";
		let operation = GraphqlOperation::new(document)
			.expect("Operation fixture should be valid.")
			.variable("customerEmail", json!({ "eq": "buyer@example.com" }))
			.expect("Variable should serialize.")
			.with_operation_name("ListOrder");
		let body: Value = serde_json::from_slice(
			&operation.to_body().expect("Body should serialize."),
		)
		.expect("Body should be JSON.");

		assert_eq!(operation.operation_name(), Some("ListOrder"));
		assert_eq!(body["variables"], json!({ "customerEmail": { "eq": "buyer@example.com" } }));
		assert_eq!(body["operationName"], "ListOrder");
	}

	#[test]
	fn with_variables_replaces_existing_bindings() {
		let mut replacement = JsonMap::new();

		replacement.insert("locale".into(), json!("tr"));

		let operation = GraphqlOperation::new("query { listCountry { id } }")
			.expect("Operation fixture should be valid.")
			.variable("stale", 1)
			.expect("Variable should serialize.")
			.with_variables(replacement);

		assert_eq!(operation.variables().len(), 1);
		assert_eq!(operation.variables()["locale"], "tr");
	}
}
