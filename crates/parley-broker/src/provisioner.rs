//! Avatar API token provisioning.

use parley_client::{ParleyClient, TokenGrant};
use tracing::{info, warn};

use crate::error::Result;

/// Requests a backend-issued avatar token.
///
/// The grant is handed back to the caller, which decides whether a failure
/// blocks startup, is retried, or is tolerated. Nothing is cached.
#[derive(Clone)]
pub struct TokenProvisioner {
    client: ParleyClient,
}

impl TokenProvisioner {
    /// Create a provisioner over the given client.
    pub fn new(client: ParleyClient) -> Self {
        Self { client }
    }

    /// Request a token.
    pub async fn initialize(&self) -> Result<TokenGrant> {
        match self.client.akool().generate_token().await {
            Ok(grant) => {
                info!("Avatar token provisioned");
                Ok(grant)
            }
            Err(e) => {
                warn!(error = %e, "Avatar token provisioning failed");
                Err(e.into())
            }
        }
    }
}
