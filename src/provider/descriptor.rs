//! Provider descriptor data structures shared by the client and its configuration layer.

/// Builder API for assembling provider descriptors.
pub mod builder;

pub use builder::*;

// self
use crate::{_prelude::*, token::TokenSecret};

/// Path of the credential-grant token endpoint, relative to the store URL.
pub const TOKEN_PATH: &str = "/api/admin/oauth/token";
/// Path of the admin GraphQL endpoint, relative to the API URL.
pub const ADMIN_GRAPHQL_PATH: &str = "/api/v1/admin/graphql";
/// Path of the storefront GraphQL endpoint, relative to the API URL.
pub const STOREFRONT_GRAPHQL_PATH: &str = "/api/sf/graphql";

/// Client authentication modes for token endpoint calls.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientAuthMethod {
	#[default]
	/// Form body parameters for `client_id`/`client_secret`.
	ClientSecretPost,
	/// HTTP Basic with `client_id`/`client_secret`.
	ClientSecretBasic,
}

/// Storefront endpoint plus the static API key it expects.
#[derive(Clone, PartialEq, Eq)]
pub struct StorefrontAccess {
	/// Storefront GraphQL endpoint.
	pub endpoint: Url,
	/// Value sent in the `x-api-key` header.
	pub api_key: TokenSecret,
}
impl Debug for StorefrontAccess {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("StorefrontAccess")
			.field("endpoint", &self.endpoint.as_str())
			.field("api_key", &"<redacted>")
			.finish()
	}
}

/// Endpoint set declared by a provider descriptor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProviderEndpoints {
	/// Token endpoint used for credential grants.
	pub token: Url,
	/// Admin GraphQL endpoint used with bearer tokens.
	pub admin: Url,
	/// Optional storefront GraphQL endpoint used with an API key.
	pub storefront: Option<StorefrontAccess>,
}

/// Immutable provider descriptor consumed by the client.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProviderDescriptor {
	/// Endpoint definitions exposed by the provider.
	pub endpoints: ProviderEndpoints,
	/// Client authentication mechanism for the token endpoint.
	pub client_auth_method: ClientAuthMethod,
}
impl ProviderDescriptor {
	/// Creates an empty descriptor builder.
	pub fn builder() -> ProviderDescriptorBuilder {
		ProviderDescriptorBuilder::default()
	}

	/// Returns the storefront access settings, if configured.
	pub fn storefront(&self) -> Option<&StorefrontAccess> {
		self.endpoints.storefront.as_ref()
	}
}
