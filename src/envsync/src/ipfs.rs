use crate::error::Result;
use crate::manager::{IpfsClientTarget, ManagerApi};

/// Ensure the node's IPFS client points at the local backend.
///
/// Read-before-write: when the current target is already local the manager
/// is not touched. On mismatch the target is set to local without deleting
/// any existing local client. Returns whether a mutation was issued.
pub async fn enforce_local_ipfs(manager: &dyn ManagerApi) -> Result<bool> {
    let current = manager.ipfs_client_target_get().await?;

    if current == IpfsClientTarget::Local {
        tracing::info!("[IpfsModeEnforcer] IPFS client target already local");
        return Ok(false);
    }

    tracing::info!(
        "[IpfsModeEnforcer] IPFS client target is {}, switching to local",
        current
    );
    manager
        .ipfs_client_target_set(IpfsClientTarget::Local, false)
        .await?;
    Ok(true)
}
