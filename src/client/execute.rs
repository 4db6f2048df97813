//! GraphQL execution against the admin and storefront endpoints.

// self
use crate::{
	_prelude::*,
	client::CommerceClient,
	error::ConfigError,
	graphql::{self, GraphqlOperation, RequestAuth},
	http::{self, ProviderHttpClient, TransportErrorMapper},
	obs::{self, CallOutcome, CallSpan, OperationKind},
};

impl<C, M> CommerceClient<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Executes an admin operation and returns its `data` tree verbatim.
	///
	/// Blank documents fail with [`ConfigError::EmptyDocument`] before any request is sent.
	pub async fn execute(
		&self,
		document: impl Into<String>,
		variables: JsonMap<String, Value>,
	) -> Result<Value> {
		let operation = GraphqlOperation::new(document)?.with_variables(variables);

		self.execute_operation(&operation).await
	}

	/// Executes a prepared admin operation with the cached bearer token.
	pub async fn execute_operation(&self, operation: &GraphqlOperation) -> Result<Value> {
		const KIND: OperationKind = OperationKind::AdminExecute;

		let span = CallSpan::new(KIND, "execute_operation");

		obs::record_call_outcome(KIND, CallOutcome::Attempt);

		let result = span
			.instrument(async move {
				let token = self.access_token().await?;
				let request = graphql::build_request(
					&self.descriptor.endpoints.admin,
					operation,
					RequestAuth::Bearer(&token.secret),
				)?;

				self.send(request).await
			})
			.await;

		self.finish(KIND, result)
	}

	/// Executes an admin operation and decodes `data` into `T`.
	pub async fn execute_as<T>(&self, operation: &GraphqlOperation) -> Result<T>
	where
		T: DeserializeOwned,
	{
		graphql::decode_data(self.execute_operation(operation).await?)
	}

	/// Executes a storefront operation authenticated with the configured API key.
	///
	/// Fails with [`ConfigError::MissingStorefront`] when the descriptor has no storefront access.
	pub async fn execute_storefront(
		&self,
		document: impl Into<String>,
		variables: JsonMap<String, Value>,
	) -> Result<Value> {
		let operation = GraphqlOperation::new(document)?.with_variables(variables);

		self.execute_storefront_operation(&operation).await
	}

	/// Executes a prepared storefront operation.
	pub async fn execute_storefront_operation(
		&self,
		operation: &GraphqlOperation,
	) -> Result<Value> {
		const KIND: OperationKind = OperationKind::StorefrontExecute;

		let storefront = self.descriptor.storefront().ok_or(ConfigError::MissingStorefront)?;
		let span = CallSpan::new(KIND, "execute_storefront_operation");

		obs::record_call_outcome(KIND, CallOutcome::Attempt);

		let result = span
			.instrument(async move {
				let request = graphql::build_request(
					&storefront.endpoint,
					operation,
					RequestAuth::ApiKey(&storefront.api_key),
				)?;

				self.send(request).await
			})
			.await;

		self.finish(KIND, result)
	}

	/// Executes a storefront operation and decodes `data` into `T`.
	pub async fn execute_storefront_as<T>(&self, operation: &GraphqlOperation) -> Result<T>
	where
		T: DeserializeOwned,
	{
		graphql::decode_data(self.execute_storefront_operation(operation).await?)
	}

	async fn send(&self, request: oauth2::HttpRequest) -> Result<Value> {
		let response =
			http::dispatch(self.http_client.as_ref(), self.transport_mapper.as_ref(), request)
				.await?;

		graphql::decode_response(&response)
	}

	fn finish(&self, kind: OperationKind, result: Result<Value>) -> Result<Value> {
		obs::record_call_outcome(kind, CallOutcome::of(&result));

		if let Err(e) = &result {
			obs::warn_failure(kind, e);
		}

		result
	}
}
