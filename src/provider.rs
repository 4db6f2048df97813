//! Provider-facing descriptors.
//!
//! `descriptor` exposes validated metadata (`ProviderDescriptor`) covering the token endpoint,
//! the admin GraphQL endpoint, the optional storefront endpoint with its API key, and the client
//! authentication method used for credential grants. Endpoints must use HTTPS unless they point
//! at a loopback host.

pub mod descriptor;

pub use descriptor::*;
