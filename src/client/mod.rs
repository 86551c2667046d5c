//! Remote management-plane client boundary.
//!
//! The orchestrator only ever talks to [`ManagementClient`]; the concrete
//! APIC REST implementation lives in [`apic`]. Fault payloads from the
//! controller are opaque to the rest of the crate beyond their message text.

pub mod apic;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

pub use apic::ApicClient;

/// Errors raised at the management-plane boundary.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("login failed: {0}")]
    Login(String),
    #[error("commit rejected: {0}")]
    Commit(String),
    #[error("logout failed: {0}")]
    Logout(String),
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("client configuration error: {0}")]
    Config(String),
}

/// Session-scoped client for the remote management plane: `login`, one or
/// more `commit` calls, `logout`. `commit` takes the serialized construction
/// plan as one atomic request.
#[async_trait]
pub trait ManagementClient: Send + Sync {
    async fn login(&mut self) -> Result<(), ClientError>;
    async fn commit(&self, payload: &Value) -> Result<(), ClientError>;
    async fn logout(&mut self) -> Result<(), ClientError>;
}
