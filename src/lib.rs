//! Product Service Consumer Contracts
//!
//! Consumer-driven contract tests for the Product service HTTP API: example
//! payload factories, structural matchers, and a per-test session that stages
//! interactions against a mock provider, verifies they played out as
//! described, and records the agreed contract for provider verification.
//!
//! # Features
//!
//! - **Payload Factories**: structurally complete example entities with
//!   deterministic defaults and caller-overridable fields
//! - **Structural Matchers**: exact, type-level, regex-term, and
//!   N-or-more collection rules that compose
//! - **Interaction Staging**: `given` / `with_request` / `will_respond_with`
//!   expectations enforced only inside an activated scope
//! - **Verification**: every staged interaction must be invoked exactly
//!   once, with unexpected traffic reported as a mismatch
//! - **Contract Recording**: verified interactions merge into a stable JSON
//!   artifact per consumer/provider pair, optionally published to a broker
//!
//! # Example
//!
//! ```no_run
//! use product_contracts::{
//!     factory, Client, ContractSession, Interaction, RequestSpec, ResponseSpec, SessionConfig,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut session = ContractSession::start(SessionConfig::new(
//!     "ProductServiceClient",
//!     "ProductService",
//! ))
//! .await?;
//!
//! let expected = factory::product().create_with(&[("name", "product0".into())])?;
//! session.stage(
//!     Interaction::new("a request for a product")
//!         .given("there is a product with ID 1")
//!         .with_request(RequestSpec::get("/v2/products/1"))
//!         .will_respond_with(ResponseSpec::new(200).with_body(expected.like())),
//! );
//!
//! session.activate().await?;
//! let client = Client::new(session.base_url())?;
//! let product = client.products_v2().get(1).await?;
//! session.deactivate().await?;
//! session.verify().await?;
//!
//! assert_eq!(product.unwrap().name, expected.string("name").unwrap());
//! session.teardown().await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod contract;
pub mod error;
pub mod factory;
pub mod format;
pub mod interaction;
pub mod matcher;
pub mod models;
pub mod products;
pub mod session;

pub use client::Client;
pub use config::SessionConfig;
pub use error::{ApiError, ApiResult, ConfigurationError, VerificationError};
pub use format::Format;
pub use interaction::{HttpMethod, Interaction, RequestSpec, ResponseSpec};
pub use matcher::{Matcher, Mismatch};
pub use session::{ContractSession, SessionState};
