//! Typed helpers for the provider operations the backend relies on.
//!
//! Each helper owns its GraphQL document, validates its input before any request is sent, and
//! decodes only the `data` subtree it needs. Admin helpers go through
//! [`CommerceClient::execute_as`](crate::client::CommerceClient::execute_as); storefront helpers
//! need a configured storefront API key.

pub mod customers;
pub mod locations;
pub mod orders;

// self
use crate::{_prelude::*, error::ConfigError};

/// `{eq: value}` filter accepted by the provider's list queries.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EqFilter<'a> {
	/// Value the field must equal.
	pub eq: &'a str,
}
impl<'a> EqFilter<'a> {
	/// Wraps `value` in an equality filter.
	pub fn new(value: &'a str) -> Self {
		Self { eq: value }
	}
}

/// Reference to a provider location (country, city, district) by id and display name.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LocationRef {
	/// Provider identifier.
	pub id: String,
	/// Display name.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
}
impl LocationRef {
	/// Creates a reference with a display name.
	pub fn named(id: impl Into<String>, name: impl Into<String>) -> Self {
		Self { id: id.into(), name: Some(name.into()) }
	}
}

pub(crate) fn require_non_blank(field: &str, value: &str) -> Result<(), ConfigError> {
	if value.trim().is_empty() {
		return Err(ConfigError::invalid_request(format!("`{field}` must not be empty")));
	}

	Ok(())
}
