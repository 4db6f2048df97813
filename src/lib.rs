//! Commerce-provider GraphQL client with cached client-credentials tokens, single-flight refresh,
//! and a uniform provider/transport error taxonomy.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod graphql;
pub mod http;
pub mod oauth;
pub mod obs;
pub mod ops;
pub mod provider;
pub mod token;
#[cfg(all(any(test, feature = "test"), feature = "reqwest"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		client::CommerceClient,
		http::{ReqwestHttpClient, ReqwestTransportErrorMapper},
		provider::{ClientAuthMethod, ProviderDescriptor},
	};

	/// Client type alias used by reqwest-backed integration tests.
	pub type ReqwestTestClient = CommerceClient<ReqwestHttpClient, ReqwestTransportErrorMapper>;

	/// Builds a reqwest HTTP client that accepts the self-signed certificates produced by
	/// `httpmock` during tests.
	pub fn test_reqwest_http_client() -> ReqwestHttpClient {
		let client = ReqwestClient::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.redirect(reqwest::redirect::Policy::none())
			.build()
			.expect("Failed to build insecure Reqwest client for tests.");

		ReqwestHttpClient::with_client(client)
	}

	/// Builds a descriptor whose endpoints all live on the provided mock base URL.
	pub fn test_descriptor(base_url: &str) -> ProviderDescriptor {
		let base = Url::parse(base_url).expect("Mock base URL should parse successfully.");
		ProviderDescriptor::builder()
			.token_endpoint(base.join("/api/admin/oauth/token").expect("Token path should join."))
			.admin_endpoint(base.join("/api/v1/admin/graphql").expect("Admin path should join."))
			.storefront_endpoint(
				base.join("/api/sf/graphql").expect("Storefront path should join."),
				"storefront-key",
			)
			.client_auth_method(ClientAuthMethod::ClientSecretPost)
			.build()
			.expect("Mock provider descriptor should build successfully.")
	}

	/// Constructs a [`CommerceClient`] backed by the reqwest transport used across integration
	/// tests.
	pub fn build_reqwest_test_client(
		descriptor: ProviderDescriptor,
		client_id: &str,
		client_secret: &str,
	) -> ReqwestTestClient {
		CommerceClient::with_http_client(
			descriptor,
			client_id,
			client_secret,
			test_reqwest_http_client(),
			Arc::new(ReqwestTransportErrorMapper),
		)
	}
}

mod _prelude {
	pub use std::{
		collections::{BTreeMap, HashMap},
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
		time::Duration as StdDuration,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::{Mutex, RwLock};
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize, de::DeserializeOwned};
	pub use serde_json::{Map as JsonMap, Value};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use oauth2;
#[cfg(feature = "reqwest")] pub use reqwest;
pub use serde_json;
pub use url;
#[cfg(all(test, feature = "reqwest"))] use {color_eyre as _, httpmock as _};
