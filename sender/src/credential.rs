//! Credential selection.
//!
//! Inside Azure the program authenticates with a managed identity, either the
//! system-assigned one or a user-assigned identity picked by client id. On a
//! developer machine it reuses the signed-in Azure CLI session. The choice is
//! made once at startup; tokens are only requested later by the Service Bus
//! client.

use crate::errors::{SenderError, SenderResult};
use azure_core::credentials::TokenCredential;
use azure_identity::{
    AzureCliCredential, ManagedIdentityCredential, ManagedIdentityCredentialOptions,
    UserAssignedId,
};
use std::fmt;
use std::sync::Arc;

/// The credential flavour used to authenticate against Service Bus.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CredentialKind {
    /// Managed identity; `None` selects the system-assigned identity
    ManagedIdentity {
        user_assigned_client_id: Option<String>,
    },
    /// Token from the local `az login` session
    DeveloperCli,
}

impl CredentialKind {
    /// Picks the credential for the current environment.
    ///
    /// Blank client ids count as absent.
    pub fn resolve(runs_in_azure: bool, user_assigned_client_id: Option<&str>) -> Self {
        if runs_in_azure {
            let user_assigned_client_id = user_assigned_client_id
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(str::to_string);
            CredentialKind::ManagedIdentity {
                user_assigned_client_id,
            }
        } else {
            CredentialKind::DeveloperCli
        }
    }

    /// Short label used in log output.
    pub fn identity_label(&self) -> &'static str {
        match self {
            CredentialKind::ManagedIdentity {
                user_assigned_client_id: Some(_),
            } => "User Assigned Managed Identity",
            CredentialKind::ManagedIdentity {
                user_assigned_client_id: None,
            } => "System Assigned Managed Identity",
            CredentialKind::DeveloperCli => "Azure CLI",
        }
    }

    /// Builds the `azure_identity` credential. No token is fetched here.
    pub fn build(&self) -> SenderResult<Arc<dyn TokenCredential>> {
        let credential: Arc<dyn TokenCredential> = match self {
            CredentialKind::ManagedIdentity {
                user_assigned_client_id,
            } => {
                let options = ManagedIdentityCredentialOptions {
                    user_assigned_id: user_assigned_client_id
                        .clone()
                        .map(UserAssignedId::ClientId),
                    ..Default::default()
                };
                ManagedIdentityCredential::new(Some(options))
                    .map_err(|e| SenderError::Credential(e.to_string()))?
            }
            CredentialKind::DeveloperCli => AzureCliCredential::new(None)
                .map_err(|e| SenderError::Credential(e.to_string()))?,
        };

        log::info!(
            "Azure credential obtained using {} credential.",
            self.identity_label()
        );
        Ok(credential)
    }
}

impl fmt::Display for CredentialKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identity_label())
    }
}
