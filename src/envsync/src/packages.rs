//! Package-set reconciliation: drive the node's installed packages toward
//! the desired set for the resolved network.

use std::collections::HashSet;

use crate::config::LATEST_VERSION;
use crate::error::Result;
use crate::manager::{InstalledPackage, ManagerApi};

/// Mutations performed by one reconciliation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileSummary {
    pub removed: Vec<String>,
    pub installed: Vec<String>,
}

impl ReconcileSummary {
    pub fn is_noop(&self) -> bool {
        self.removed.is_empty() && self.installed.is_empty()
    }
}

/// Compute the mutation sets without touching the environment.
///
/// `to_remove` is every installed package not on the keep list, in installed
/// order; `to_install` is every required package not currently installed, in
/// required order. The two sets are disjoint by construction.
pub fn compute_changes(
    installed: &[InstalledPackage],
    keep: &[String],
    required: &[String],
) -> (Vec<String>, Vec<String>) {
    let keep_set: HashSet<&str> = keep.iter().map(String::as_str).collect();
    let installed_set: HashSet<&str> = installed.iter().map(|p| p.name.as_str()).collect();

    let to_remove = installed
        .iter()
        .filter(|p| !keep_set.contains(p.name.as_str()))
        .map(|p| p.name.clone())
        .collect();

    let to_install = required
        .iter()
        .filter(|name| !installed_set.contains(name.as_str()))
        .cloned()
        .collect();

    (to_remove, to_install)
}

/// Reconcile the installed package set against an explicit keep list and
/// required list.
///
/// Removals delete the package's volumes: destructive and irreversible
/// within this run. Any manager error aborts immediately; verification must
/// not start against a half-reconciled package set. Running twice with no
/// external change performs zero mutations on the second pass.
pub async fn reconcile_packages(
    manager: &dyn ManagerApi,
    keep: &[String],
    required: &[String],
) -> Result<ReconcileSummary> {
    let installed = manager.packages_get().await?;
    tracing::info!(
        "[PackageSetReconciler] {} package(s) installed, keep list has {}, {} required",
        installed.len(),
        keep.len(),
        required.len()
    );

    let (to_remove, to_install) = compute_changes(&installed, keep, required);

    if to_remove.is_empty() && to_install.is_empty() {
        tracing::info!("[PackageSetReconciler] Package set already converged, nothing to do");
        return Ok(ReconcileSummary::default());
    }

    let mut summary = ReconcileSummary::default();

    for name in &to_remove {
        tracing::info!("[PackageSetReconciler] Removing {} (volumes included)", name);
        manager.package_remove(name, true).await?;
        summary.removed.push(name.clone());
    }

    for name in &to_install {
        tracing::info!("[PackageSetReconciler] Installing {}@{}", name, LATEST_VERSION);
        manager.package_install(name, LATEST_VERSION).await?;
        summary.installed.push(name.clone());
    }

    tracing::info!(
        "[PackageSetReconciler] Done: removed {}, installed {}",
        summary.removed.len(),
        summary.installed.len()
    );
    Ok(summary)
}
