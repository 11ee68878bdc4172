//! OpenShift broker API client library.
//!
//! A Rust library for managing domains, applications, cartridges and gear
//! groups through the OpenShift broker REST API. The broker describes
//! every operation it permits as a link embedded in its responses; the
//! resources of this crate follow those links instead of building URLs.
//!
//! # Quick Start
//!
//! ```no_run
//! use openshift_api::{CartridgeSpec, NewApplication, OpenShiftClient, Refresh};
//!
//! #[tokio::main]
//! async fn main() -> openshift_api::Result<()> {
//!     // Create client from environment variables
//!     let client = OpenShiftClient::from_env()?;
//!
//!     // Fetch the user and one of its domains
//!     let mut user = client.user().await?;
//!     let domain = user.create_domain("mydomain").await?;
//!
//!     // Create an application
//!     let app = domain
//!         .create_application(
//!             NewApplication::new("blog").cartridge(CartridgeSpec::named("php-5.4")),
//!         )
//!         .await?;
//!     println!("Created {} at {:?}", app.name(), app.application_url());
//!
//!     // Pick up changes made by other clients
//!     domain.refresh().await?;
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - [`OpenShiftClient`] fetches the API root and the user.
//! - Resources ([`UserResource`], [`DomainResource`], [`ApplicationResource`],
//!   [`StandaloneCartridgeResource`], [`EmbeddedCartridgeResource`],
//!   [`GearGroupResource`]) cache server state and expose operations.
//! - [`Resource`] provides link lookup and dispatch; an operation whose
//!   link is absent fails with [`OpenShiftError::UnsupportedOperation`].
//! - [`Refresh`] re-fetches an entity and its loaded children.
//! - [`RestService`] builds requests from links and sends them through an
//!   injected [`HttpTransport`].
//!
//! # Configuration
//!
//! The client reads configuration from environment variables:
//!
//! - `OPENSHIFT_TOKEN` - Bearer token, or
//! - `OPENSHIFT_USER` and `OPENSHIFT_PASSWORD` - Basic authentication
//! - `OPENSHIFT_API_URL` (optional) - REST base URL (defaults to
//!   `https://openshift.redhat.com/broker/rest`)

mod cartridge;
mod client;
mod error;
mod http;
mod link;
mod messages;
mod models;
mod resources;
mod service;
mod traits;

pub mod cli;
pub mod output;

#[cfg(feature = "test-server")]
pub mod mock_server;

// Re-export core types
pub use client::OpenShiftClient;
pub use error::{OpenShiftError, Result};
pub use http::{
    Credentials, HttpMethod, HttpRequest, HttpResponse, HttpTransport, ReqwestTransport,
    API_VERSION,
};
pub use link::{Link, LinkParameter, Links, Parameters};
pub use messages::{Field, Message, Messages, Severity};
pub use service::{Envelope, RestService};

// Re-export traits
pub use traits::{Refresh, Resource};

// Re-export resources
pub use resources::{
    ApplicationResource, Cartridge, CartridgeAttributes, DomainResource,
    EmbeddedCartridgeResource, Gear, GearGroupResource, StandaloneCartridgeResource,
    UserResource, PROPERTY_ADDITIONAL_GEAR_STORAGE,
};

// Re-export request-side types
pub use cartridge::{ApplicationScale, CartridgeSpec, LatestVersionOf, NewApplication};

// Re-export DTOs
pub use models::{
    ApplicationDto, CartridgeDto, CartridgeType, DomainDto, GearDto, GearGroupCartridgeDto,
    GearGroupDto, GearState, RestResponse, UserDto,
};
