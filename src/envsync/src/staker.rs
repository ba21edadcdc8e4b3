use crate::error::Result;
use crate::manager::{ManagerApi, StakerConfig};
use crate::network::Network;

/// Push the network's staker configuration to the manager.
///
/// Overwrite semantics: the remote value is never read back or diffed, the
/// push replaces it wholesale. `None` (undefined network, or a profile with
/// no staker entry) is a logged no-op.
pub async fn sync_staker_config(
    manager: &dyn ManagerApi,
    network: Network,
    config: Option<&StakerConfig>,
) -> Result<()> {
    let Some(config) = config else {
        tracing::info!(
            "[StakerConfigSync] No staker config for network {}, skipping",
            network
        );
        return Ok(());
    };

    tracing::info!(
        "[StakerConfigSync] Pushing staker config for {} (execution: {}, consensus: {}, mev_boost: {})",
        network,
        config.execution_client.as_deref().unwrap_or("none"),
        config.consensus_client.as_deref().unwrap_or("none"),
        config.mev_boost
    );
    manager.staker_config_set(network, config).await
}
