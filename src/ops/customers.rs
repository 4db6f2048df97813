//! Storefront customer registration and login.

// self
use crate::{
	_prelude::*,
	client::CommerceClient,
	graphql::GraphqlOperation,
	http::{ProviderHttpClient, TransportErrorMapper},
	ops,
	token::TokenSecret,
};

/// Storefront mutation registering a customer account.
pub const REGISTER_CUSTOMER_DOCUMENT: &str = r#"
mutation registerCustomer(
	$attributes: [CustomerAttributeValueInput!],
	$captchaToken: String,
	$email: String!,
	$firstName: String!,
	$isAcceptMarketing: Boolean,
	$lastName: String!,
	$locale: String,
	$orderId: String,
	$password: String!,
	$phone: String,
	$preferredLanguage: String
) {
	registerCustomer(
		attributes: $attributes,
		captchaToken: $captchaToken,
		email: $email,
		firstName: $firstName,
		isAcceptMarketing: $isAcceptMarketing,
		lastName: $lastName,
		locale: $locale,
		orderId: $orderId,
		password: $password,
		phone: $phone,
		preferredLanguage: $preferredLanguage
	) {
		customer { id email firstName lastName phone isEmailVerified isPhoneVerified }
		token
		tokenExpiry
	}
}
"#;

/// Storefront mutation exchanging customer credentials for a session token.
pub const CUSTOMER_LOGIN_DOCUMENT: &str = r#"
mutation customerLogin($captchaToken: String, $email: String!, $password: String!) {
	customerLogin(captchaToken: $captchaToken, email: $email, password: $password) {
		customer {
			id
			email
			firstName
			lastName
			fullName
			phone
			isEmailVerified
			isPhoneVerified
			accountStatus
			orderCount
			preferredLanguage
			addresses {
				id
				title
				firstName
				lastName
				addressLine1
				addressLine2
				phone
				postalCode
				isDefault
				city { id code name }
				district { id code name }
				state { id code name }
				country { id code iso2 iso3 name }
			}
		}
		token
		tokenExpiry
	}
}
"#;

/// Input of [`register`]. The password is redacted in `Debug`.
#[derive(Clone)]
pub struct RegisterCustomer {
	/// Account email.
	pub email: String,
	/// Account password.
	pub password: TokenSecret,
	/// Given name.
	pub first_name: String,
	/// Family name.
	pub last_name: String,
	/// Contact phone number.
	pub phone: Option<String>,
	/// Marketing consent.
	pub is_accept_marketing: bool,
	/// Captcha proof, when the storefront enforces one.
	pub captcha_token: Option<String>,
	/// Preferred storefront locale.
	pub locale: Option<String>,
}
impl RegisterCustomer {
	/// Creates a registration without phone, marketing consent or captcha.
	pub fn new(
		email: impl Into<String>,
		password: impl Into<String>,
		first_name: impl Into<String>,
		last_name: impl Into<String>,
	) -> Self {
		Self {
			email: email.into(),
			password: TokenSecret::new(password),
			first_name: first_name.into(),
			last_name: last_name.into(),
			phone: None,
			is_accept_marketing: false,
			captcha_token: None,
			locale: None,
		}
	}

	fn to_operation(&self) -> Result<GraphqlOperation> {
		ops::require_non_blank("email", &self.email)?;
		ops::require_non_blank("password", self.password.expose())?;
		ops::require_non_blank("first_name", &self.first_name)?;
		ops::require_non_blank("last_name", &self.last_name)?;

		Ok(GraphqlOperation::new(REGISTER_CUSTOMER_DOCUMENT)?
			.variable("attributes", Vec::<Value>::new())?
			.variable("captchaToken", &self.captcha_token)?
			.variable("email", &self.email)?
			.variable("firstName", &self.first_name)?
			.variable("isAcceptMarketing", self.is_accept_marketing)?
			.variable("lastName", &self.last_name)?
			.variable("locale", &self.locale)?
			.variable("orderId", Value::Null)?
			.variable("password", self.password.expose())?
			.variable("phone", &self.phone)?
			.variable("preferredLanguage", &self.locale)?
			.with_operation_name("registerCustomer"))
	}
}
impl Debug for RegisterCustomer {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("RegisterCustomer")
			.field("email", &self.email)
			.field("password", &"<redacted>")
			.field("first_name", &self.first_name)
			.field("last_name", &self.last_name)
			.field("phone", &self.phone)
			.field("is_accept_marketing", &self.is_accept_marketing)
			.finish()
	}
}

/// Customer profile; fields outside the typed set stay in `details`.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
	/// Provider identifier.
	pub id: String,
	/// Account email.
	#[serde(default)]
	pub email: Option<String>,
	/// Given name.
	#[serde(default)]
	pub first_name: Option<String>,
	/// Family name.
	#[serde(default)]
	pub last_name: Option<String>,
	/// Contact phone number.
	#[serde(default)]
	pub phone: Option<String>,
	/// Whether the email address was verified.
	#[serde(default)]
	pub is_email_verified: Option<bool>,
	/// Whether the phone number was verified.
	#[serde(default)]
	pub is_phone_verified: Option<bool>,
	/// Remaining selected fields, verbatim.
	#[serde(flatten)]
	pub details: JsonMap<String, Value>,
}

/// Customer plus the storefront session issued for it.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerSession {
	/// Customer profile.
	pub customer: Option<Customer>,
	/// Storefront session token.
	#[serde(default)]
	pub token: Option<TokenSecret>,
	/// Session expiry as reported by the provider.
	#[serde(default)]
	pub token_expiry: Option<Value>,
}

#[derive(Deserialize)]
struct RegisterData {
	#[serde(rename = "registerCustomer")]
	session: CustomerSession,
}

#[derive(Deserialize)]
struct LoginData {
	#[serde(rename = "customerLogin")]
	session: CustomerSession,
}

/// Registers a storefront customer account.
pub async fn register<C, M>(
	client: &CommerceClient<C, M>,
	request: &RegisterCustomer,
) -> Result<CustomerSession>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	let operation = request.to_operation()?;
	let data: RegisterData = client.execute_storefront_as(&operation).await?;

	Ok(data.session)
}

/// Logs a customer in through the storefront.
pub async fn login<C, M>(
	client: &CommerceClient<C, M>,
	email: &str,
	password: &str,
) -> Result<CustomerSession>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	ops::require_non_blank("email", email)?;
	ops::require_non_blank("password", password)?;

	let operation = GraphqlOperation::new(CUSTOMER_LOGIN_DOCUMENT)?
		.variable("captchaToken", Value::Null)?
		.variable("email", email)?
		.variable("password", password)?
		.with_operation_name("customerLogin");
	let data: LoginData = client.execute_storefront_as(&operation).await?;

	Ok(data.session)
}

#[cfg(test)]
mod tests {
	// crates.io
	use serde_json::json;
	// self
	use super::*;
	use crate::error::ConfigError;

	#[test]
	fn registration_binds_every_declared_variable() {
		let mut request = RegisterCustomer::new("ada@example.com", "hunter2", "Ada", "Lovelace");

		request.phone = Some("+900000000000".into());

		let operation = request.to_operation().expect("Registration should build.");
		let variables = operation.variables();

		assert_eq!(variables["attributes"], json!([]));
		assert_eq!(variables["password"], "hunter2");
		assert_eq!(variables["isAcceptMarketing"], false);
		assert_eq!(variables["orderId"], Value::Null);
		assert_eq!(variables["phone"], "+900000000000");
		assert!(!format!("{request:?}").contains("hunter2"));
	}

	#[test]
	fn blank_credentials_fail_locally() {
		let request = RegisterCustomer::new("ada@example.com", "", "Ada", "Lovelace");

		assert!(matches!(
			request.to_operation(),
			Err(Error::Config(ConfigError::InvalidRequest { .. }))
		));
	}

	#[test]
	fn session_token_is_redacted() {
		let session: CustomerSession = serde_json::from_value(json!({
			"customer": { "id": "cus-1", "email": "ada@example.com", "accountStatus": "ACTIVE" },
			"token": "session-secret",
			"tokenExpiry": 1735689600000_i64
		}))
		.expect("Session should decode.");
		let customer = session.customer.as_ref().expect("Customer should be present.");

		assert_eq!(customer.details["accountStatus"], "ACTIVE");
		assert_eq!(session.token.as_ref().map(TokenSecret::expose), Some("session-secret"));
		assert!(!format!("{session:?}").contains("session-secret"));
	}
}
