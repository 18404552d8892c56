//! API gateway client.
//!
//! Components:
//! - `remote_trait`: `FeedbackRemote` and `AuthRemote`, the seams the core depends on.
//! - `types`: request and response bodies of the REST contract.
//! - `client`: `HttpGateway`, the reqwest-backed implementation.

pub mod client;
pub mod remote_trait;
pub mod types;

pub use client::HttpGateway;
pub use remote_trait::{AuthRemote, FeedbackRemote};
pub use types::RemotePage;
