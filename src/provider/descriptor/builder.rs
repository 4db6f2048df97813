// crates.io
use url::Host;
// self
use crate::{
	_prelude::*,
	provider::{ClientAuthMethod, ProviderDescriptor, ProviderEndpoints, StorefrontAccess},
	token::TokenSecret,
};

/// Errors raised while constructing or validating descriptors.
#[derive(Debug, PartialEq, Eq, ThisError)]
pub enum ProviderDescriptorError {
	/// Token endpoint is mandatory.
	#[error("Missing token endpoint.")]
	MissingTokenEndpoint,
	/// Admin GraphQL endpoint is mandatory.
	#[error("Missing admin GraphQL endpoint.")]
	MissingAdminEndpoint,
	/// Endpoints must use HTTPS unless they target a loopback host.
	#[error("The {endpoint} endpoint must use HTTPS: {url}.")]
	InsecureEndpoint {
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// Endpoint URL that failed validation.
		url: String,
	},
	/// Storefront access needs a non-empty API key.
	#[error("Storefront API key cannot be empty.")]
	EmptyStorefrontKey,
}

/// Builder for [`ProviderDescriptor`] values.
#[derive(Debug, Default)]
pub struct ProviderDescriptorBuilder {
	/// Token endpoint used for credential grants.
	pub token_endpoint: Option<Url>,
	/// Admin GraphQL endpoint.
	pub admin_endpoint: Option<Url>,
	/// Optional storefront endpoint and API key.
	pub storefront: Option<StorefrontAccess>,
	/// Client authentication method for the token endpoint.
	pub client_auth_method: ClientAuthMethod,
}
impl ProviderDescriptorBuilder {
	/// Sets the token endpoint.
	pub fn token_endpoint(mut self, url: Url) -> Self {
		self.token_endpoint = Some(url);

		self
	}

	/// Sets the admin GraphQL endpoint.
	pub fn admin_endpoint(mut self, url: Url) -> Self {
		self.admin_endpoint = Some(url);

		self
	}

	/// Enables storefront operations against `url` authenticated with `api_key`.
	pub fn storefront_endpoint(mut self, url: Url, api_key: impl Into<String>) -> Self {
		self.storefront =
			Some(StorefrontAccess { endpoint: url, api_key: TokenSecret::new(api_key) });

		self
	}

	/// Overrides the client authentication method.
	pub fn client_auth_method(mut self, method: ClientAuthMethod) -> Self {
		self.client_auth_method = method;

		self
	}

	/// Consumes the builder and validates the resulting descriptor.
	pub fn build(self) -> Result<ProviderDescriptor, ProviderDescriptorError> {
		let token = self.token_endpoint.ok_or(ProviderDescriptorError::MissingTokenEndpoint)?;
		let admin = self.admin_endpoint.ok_or(ProviderDescriptorError::MissingAdminEndpoint)?;
		let descriptor = ProviderDescriptor {
			endpoints: ProviderEndpoints { token, admin, storefront: self.storefront },
			client_auth_method: self.client_auth_method,
		};

		descriptor.validate()?;

		Ok(descriptor)
	}
}

impl ProviderDescriptor {
	/// Validates invariants for the descriptor.
	fn validate(&self) -> Result<(), ProviderDescriptorError> {
		validate_endpoint("token", &self.endpoints.token)?;
		validate_endpoint("admin", &self.endpoints.admin)?;

		if let Some(storefront) = self.endpoints.storefront.as_ref() {
			validate_endpoint("storefront", &storefront.endpoint)?;

			if storefront.api_key.expose().trim().is_empty() {
				return Err(ProviderDescriptorError::EmptyStorefrontKey);
			}
		}

		Ok(())
	}
}

fn validate_endpoint(name: &'static str, url: &Url) -> Result<(), ProviderDescriptorError> {
	if url.scheme() == "https" || (url.scheme() == "http" && is_loopback(url)) {
		Ok(())
	} else {
		Err(ProviderDescriptorError::InsecureEndpoint { endpoint: name, url: url.to_string() })
	}
}

fn is_loopback(url: &Url) -> bool {
	match url.host() {
		Some(Host::Domain(domain)) => domain.eq_ignore_ascii_case("localhost"),
		Some(Host::Ipv4(ip)) => ip.is_loopback(),
		Some(Host::Ipv6(ip)) => ip.is_loopback(),
		None => false,
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn url(value: &str) -> Url {
		Url::parse(value).expect("Failed to parse test URL.")
	}

	fn builder() -> ProviderDescriptorBuilder {
		ProviderDescriptor::builder()
	}

	#[test]
	fn loopback_http_is_accepted() {
		for candidate in ["http://localhost:8080/token", "http://127.0.0.1/token", "http://[::1]/t"]
		{
			assert!(validate_endpoint("token", &url(candidate)).is_ok(), "{candidate}");
		}

		assert!(matches!(
			validate_endpoint("token", &url("http://example.com/token")),
			Err(ProviderDescriptorError::InsecureEndpoint { endpoint: "token", .. })
		));
	}

	#[test]
	fn missing_endpoints_are_reported_in_order() {
		assert_eq!(builder().build(), Err(ProviderDescriptorError::MissingTokenEndpoint));
		assert_eq!(
			builder().token_endpoint(url("https://demo.example.com/token")).build(),
			Err(ProviderDescriptorError::MissingAdminEndpoint)
		);
	}

	#[test]
	fn storefront_key_must_not_be_blank() {
		let err = builder()
			.token_endpoint(url("https://demo.example.com/token"))
			.admin_endpoint(url("https://api.example.com/admin"))
			.storefront_endpoint(url("https://api.example.com/sf"), "  ")
			.build()
			.expect_err("Blank storefront keys should be rejected.");

		assert_eq!(err, ProviderDescriptorError::EmptyStorefrontKey);
	}
}
