//! Demonstrates minting a client-credentials token and running an admin GraphQL query with the
//! default reqwest transport against a local mock provider.

// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use serde_json::json;
// self
use commerce_client::{
	client::ReqwestCommerceClient,
	config::CommerceConfig,
	ops::orders,
	provider::{ADMIN_GRAPHQL_PATH, TOKEN_PATH},
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let token_mock = server
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_PATH);
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"access_token\":\"demo-access\",\"expires_in\":900}");
		})
		.await;
	let graphql_mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path(ADMIN_GRAPHQL_PATH)
				.header("authorization", "Bearer demo-access");
			then.status(200).json_body(json!({
				"data": { "listOrder": { "data": [{ "id": "order-1", "orderNumber": "1001" }] } }
			}));
		})
		.await;
	let base_url = server.base_url();
	let config = CommerceConfig::from_lookup(|key| match key {
		"COMMERCE_CLIENT_ID" => Some("demo-client".into()),
		"COMMERCE_CLIENT_SECRET" => Some("super-secret".into()),
		"COMMERCE_STORE_URL" | "COMMERCE_API_URL" => Some(base_url.clone()),
		_ => None,
	})?;
	let client = ReqwestCommerceClient::from_config(&config)?;
	let token = client.access_token().await?;

	println!("Access token valid until {}.", token.expires_at);

	for order in orders::list_customer_orders(&client, "buyer@example.com").await? {
		println!("Order {} ({}).", order.id, order.order_number.unwrap_or_default());
	}

	token_mock.assert_async().await;
	graphql_mock.assert_async().await;

	Ok(())
}
