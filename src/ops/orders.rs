//! Order creation and per-customer order history.

// crates.io
use serde_json::json;
use uuid::Uuid;
// self
use crate::{
	_prelude::*,
	client::CommerceClient,
	error::ConfigError,
	graphql::GraphqlOperation,
	http::{ProviderHttpClient, TransportErrorMapper},
	ops::{self, EqFilter, LocationRef},
};

/// Admin mutation creating an order together with its payment transactions.
pub const CREATE_ORDER_DOCUMENT: &str = r#"
mutation CreateOrderWithTransactions($input: CreateOrderWithTransactionsInput!) {
	createOrderWithTransactions(input: $input) {
		id
		orderNumber
		status
		totalPrice
		totalFinalPrice
		currencyCode
		orderedAt
		orderLineItems { id price quantity variant { id name } }
		billingAddress { firstName lastName addressLine1 phone city { name } country { name } }
		shippingAddress { firstName lastName addressLine1 phone city { name } country { name } }
		customer { email firstName lastName }
		shippingMethod
		paymentMethods { paymentGatewayId paymentGatewayName paymentGatewayCode price }
	}
}
"#;

/// Admin query listing the orders placed with a customer email.
pub const LIST_CUSTOMER_ORDERS_DOCUMENT: &str = r#"
query ListOrder($customerEmail: StringFilterInput) {
	listOrder(customerEmail: $customerEmail) {
		data {
			id
			orderNumber
			status
			totalPrice
			totalFinalPrice
			currencyCode
			orderedAt
			orderLineItems {
				id
				price
				quantity
				finalPrice
				variant { id name mainImageId brand { name } }
			}
			billingAddress { firstName lastName addressLine1 phone city { name } country { name } }
			shippingAddress { firstName lastName addressLine1 phone city { name } country { name } }
			customer { email firstName lastName }
			shippingMethod
			paymentMethods { price type }
			orderPackages {
				orderPackageNumber
				trackingInfo { cargoCompany trackingNumber trackingLink }
			}
		}
	}
}
"#;

/// Shipping method used when a request does not pick one.
pub const DEFAULT_SHIPPING_METHOD: &str = "SHIPMENT";

/// Product variant line of a new order.
#[derive(Clone, Debug, PartialEq)]
pub struct OrderLineItem {
	/// Provider variant identifier.
	pub variant_id: String,
	/// Unit price.
	pub price: f64,
	/// Ordered quantity; must be positive.
	pub quantity: u32,
}

/// Customer the order is attached to.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCustomer {
	/// Existing provider customer id, if known.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub id: Option<String>,
	/// Customer email.
	pub email: String,
	/// Given name.
	pub first_name: String,
	/// Family name.
	pub last_name: String,
}

/// Postal address used for billing and shipping.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderAddress {
	/// Recipient given name.
	pub first_name: String,
	/// Recipient family name.
	pub last_name: String,
	/// First address line.
	pub address_line1: String,
	/// Second address line.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub address_line2: Option<String>,
	/// Contact phone number.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub phone: Option<String>,
	/// City reference.
	pub city: LocationRef,
	/// District reference.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub district: Option<LocationRef>,
	/// Country reference.
	pub country: LocationRef,
}

/// Shipping charge line.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ShippingLine {
	/// Display title.
	pub title: String,
	/// Charged amount.
	pub price: f64,
}

/// Payment captured alongside the order.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderTransaction {
	/// Paid amount.
	pub amount: f64,
	/// Provider payment gateway identifier.
	pub payment_gateway_id: String,
}

/// Input of [`create_order`].
#[derive(Clone, Debug, PartialEq)]
pub struct CreateOrderRequest {
	/// Ordered variants; at least one is required.
	pub line_items: Vec<OrderLineItem>,
	/// ISO currency code of every price in the request.
	pub currency_code: String,
	/// Customer placing the order.
	pub customer: OrderCustomer,
	/// Billing address.
	pub billing_address: OrderAddress,
	/// Shipping address; the billing address is reused when absent.
	pub shipping_address: Option<OrderAddress>,
	/// Provider shipping method.
	pub shipping_method: String,
	/// Shipping charges.
	pub shipping_lines: Vec<ShippingLine>,
	/// Payment captured for the order.
	pub transaction: OrderTransaction,
	/// Prevents the provider from creating a customer record for unknown emails.
	pub disable_auto_create_customer: bool,
}
impl CreateOrderRequest {
	/// Creates a request with the default shipping method and no shipping charges.
	pub fn new(
		line_items: Vec<OrderLineItem>,
		currency_code: impl Into<String>,
		customer: OrderCustomer,
		billing_address: OrderAddress,
		transaction: OrderTransaction,
	) -> Self {
		Self {
			line_items,
			currency_code: currency_code.into(),
			customer,
			billing_address,
			shipping_address: None,
			shipping_method: DEFAULT_SHIPPING_METHOD.into(),
			shipping_lines: Vec::new(),
			transaction,
			disable_auto_create_customer: true,
		}
	}

	/// Checks the request locally.
	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.line_items.is_empty() {
			return Err(ConfigError::invalid_request("order must contain at least one line item"));
		}

		for item in &self.line_items {
			ops::require_non_blank("variant_id", &item.variant_id)?;

			if item.quantity == 0 {
				return Err(ConfigError::invalid_request(format!(
					"line item `{}` has zero quantity",
					item.variant_id
				)));
			}
			if !item.price.is_finite() || item.price < 0. {
				return Err(ConfigError::invalid_request(format!(
					"line item `{}` has an invalid price",
					item.variant_id
				)));
			}
		}

		ops::require_non_blank("currency_code", &self.currency_code)?;
		ops::require_non_blank("customer.email", &self.customer.email)?;
		ops::require_non_blank("shipping_method", &self.shipping_method)?;
		ops::require_non_blank("payment_gateway_id", &self.transaction.payment_gateway_id)?;

		if !self.transaction.amount.is_finite() || self.transaction.amount < 0. {
			return Err(ConfigError::invalid_request("transaction amount is invalid"));
		}

		Ok(())
	}

	/// Renders the mutation input with caller-chosen identifiers.
	pub(crate) fn to_input(&self, order_id: Uuid, billing_id: Uuid, shipping_id: Uuid) -> Value {
		let line_items = self
			.line_items
			.iter()
			.map(|item| {
				json!({
					"variant": { "id": item.variant_id },
					"price": item.price,
					"quantity": item.quantity,
				})
			})
			.collect::<Vec<_>>();
		let shipping = self.shipping_address.as_ref().unwrap_or(&self.billing_address);

		json!({
			"disableAutoCreateCustomer": self.disable_auto_create_customer,
			"order": {
				"id": order_id.to_string(),
				"orderLineItems": line_items,
				"currencyCode": self.currency_code,
				"customer": self.customer,
				"billingAddress": address_input(&self.billing_address, billing_id, true),
				"shippingAddress": address_input(shipping, shipping_id, false),
				"shippingMethod": self.shipping_method,
				"shippingLines": self.shipping_lines,
			},
			"transactions": [self.transaction],
		})
	}
}

/// Order as returned by the provider; fields outside the typed set stay in `details`.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
	/// Provider order identifier.
	pub id: String,
	/// Human-facing order number.
	#[serde(default)]
	pub order_number: Option<String>,
	/// Provider order status.
	#[serde(default)]
	pub status: Option<String>,
	/// Total before discounts.
	#[serde(default)]
	pub total_price: Option<f64>,
	/// Total after discounts.
	#[serde(default)]
	pub total_final_price: Option<f64>,
	/// ISO currency code.
	#[serde(default)]
	pub currency_code: Option<String>,
	/// Remaining selected fields, verbatim.
	#[serde(flatten)]
	pub details: JsonMap<String, Value>,
}

#[derive(Deserialize)]
struct CreateOrderData {
	#[serde(rename = "createOrderWithTransactions")]
	order: Order,
}

#[derive(Deserialize)]
struct ListOrderData {
	#[serde(rename = "listOrder")]
	list: Option<OrderPage>,
}

#[derive(Deserialize)]
struct OrderPage {
	#[serde(default)]
	data: Vec<Order>,
}

/// Creates an order with fresh identifiers for the order and both addresses.
pub async fn create_order<C, M>(
	client: &CommerceClient<C, M>,
	request: &CreateOrderRequest,
) -> Result<Order>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	request.validate()?;

	let input = request.to_input(Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
	let operation = GraphqlOperation::new(CREATE_ORDER_DOCUMENT)?
		.variable("input", input)?
		.with_operation_name("CreateOrderWithTransactions");
	let data: CreateOrderData = client.execute_as(&operation).await?;

	Ok(data.order)
}

/// Lists the orders placed with `email`.
pub async fn list_customer_orders<C, M>(
	client: &CommerceClient<C, M>,
	email: &str,
) -> Result<Vec<Order>>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	ops::require_non_blank("email", email)?;

	let operation = GraphqlOperation::new(LIST_CUSTOMER_ORDERS_DOCUMENT)?
		.variable("customerEmail", EqFilter::new(email))?
		.with_operation_name("ListOrder");
	let data: ListOrderData = client.execute_as(&operation).await?;

	Ok(data.list.map(|page| page.data).unwrap_or_default())
}

fn address_input(address: &OrderAddress, id: Uuid, is_default: bool) -> Value {
	let mut value = json!(address);

	if let Some(fields) = value.as_object_mut() {
		fields.insert("id".into(), Value::String(id.to_string()));
		fields.insert("isDefault".into(), Value::Bool(is_default));
	}

	value
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn sample_request() -> CreateOrderRequest {
		let address = OrderAddress {
			first_name: "Ada".into(),
			last_name: "Lovelace".into(),
			address_line1: "1 Analytical St".into(),
			address_line2: None,
			phone: Some("+900000000000".into()),
			city: LocationRef::named("city-1", "Istanbul"),
			district: None,
			country: LocationRef::named("country-1", "Turkey"),
		};

		CreateOrderRequest::new(
			vec![OrderLineItem { variant_id: "variant-1".into(), price: 120.5, quantity: 2 }],
			"TRY",
			OrderCustomer {
				id: None,
				email: "ada@example.com".into(),
				first_name: "Ada".into(),
				last_name: "Lovelace".into(),
			},
			address,
			OrderTransaction { amount: 241., payment_gateway_id: "gateway-1".into() },
		)
	}

	#[test]
	fn empty_orders_are_rejected() {
		let mut request = sample_request();

		assert!(request.validate().is_ok());

		request.line_items.clear();

		assert!(matches!(request.validate(), Err(ConfigError::InvalidRequest { .. })));
	}

	#[test]
	fn invalid_lines_are_rejected() {
		let mut request = sample_request();

		request.line_items[0].quantity = 0;

		assert!(request.validate().is_err());

		let mut request = sample_request();

		request.line_items[0].price = f64::NAN;

		assert!(request.validate().is_err());
	}

	#[test]
	fn input_carries_distinct_ids_and_reuses_billing_address() {
		let request = sample_request();
		let (order_id, billing_id, shipping_id) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
		let input = request.to_input(order_id, billing_id, shipping_id);
		let order = &input["order"];

		assert_eq!(input["disableAutoCreateCustomer"], true);
		assert_eq!(order["id"], order_id.to_string());
		assert_eq!(order["currencyCode"], "TRY");
		assert_eq!(order["shippingMethod"], DEFAULT_SHIPPING_METHOD);
		assert_eq!(
			order["orderLineItems"],
			json!([{ "variant": { "id": "variant-1" }, "price": 120.5, "quantity": 2 }])
		);
		assert_eq!(order["billingAddress"]["id"], billing_id.to_string());
		assert_eq!(order["billingAddress"]["isDefault"], true);
		assert_eq!(order["shippingAddress"]["id"], shipping_id.to_string());
		assert_eq!(order["shippingAddress"]["isDefault"], false);
		assert_eq!(order["shippingAddress"]["addressLine1"], "1 Analytical St");
		assert_eq!(
			order["customer"],
			json!({ "email": "ada@example.com", "firstName": "Ada", "lastName": "Lovelace" })
		);
		assert_eq!(
			input["transactions"],
			json!([{ "amount": 241.0, "paymentGatewayId": "gateway-1" }])
		);
	}

	#[test]
	fn orders_keep_untyped_fields() {
		let order: Order = serde_json::from_value(json!({
			"id": "o-1",
			"orderNumber": "1001",
			"totalFinalPrice": 241.0,
			"shippingMethod": "SHIPMENT"
		}))
		.expect("Order should decode.");

		assert_eq!(order.order_number.as_deref(), Some("1001"));
		assert_eq!(order.total_final_price, Some(241.));
		assert_eq!(order.details.get("shippingMethod"), Some(&json!("SHIPMENT")));
	}
}
