//! Plaid-compatible client for the Fuse aggregation API.
//!
//! [`PlaidApi`] keeps the Plaid method surface and response shapes while
//! delegating every call to Fuse, which aggregates Plaid, Teller, and MX
//! behind one set of endpoints. The work happens at the translation
//! boundary: the account type/subtype cross-walk ([`translate`]), link
//! token request shaping, and assembly of multi-call responses into one
//! Plaid-shaped record. Backend errors pass through unchanged; the only
//! local validation is the MX config check on link token creation.

pub mod api;
pub mod error;
pub mod model;
pub mod settings;
pub mod translate;

pub use api::{environments, Configuration, HttpOptions, PlaidApi};
pub use error::Error;
pub use settings::Settings;

pub use fuse_client::model::{CreateSessionRequest, CreateSessionResponse};
pub use fuse_client::{ClientError, Environment, HttpClient};
