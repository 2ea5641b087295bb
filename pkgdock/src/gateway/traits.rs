//! The gateway abstraction the orchestration core drives.
//!
//! All coordinators talk to the store through [`PackageGateway`] so that
//! tests can substitute a scripted in-memory gateway for the HTTP client.

use std::future::Future;
use std::path::Path;

use super::error::GatewayResult;
use super::types::{
    CheckOutcome, PackageId, PackageRecord, StoreStatistics, UploadReceipt,
};

/// Conjunctive search terms for the general package-search endpoint.
///
/// Empty strings mean "no constraint"; `architecture: None` means all
/// architectures.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    pub name: String,
    pub version: String,
    pub architecture: Option<String>,
}

/// Asynchronous client for the remote package store.
///
/// One method per REST operation the console uses. Implementations must not
/// retry: a failed call surfaces immediately and the calling coordinator
/// decides what the failure means for its own state machine.
pub trait PackageGateway: Send + Sync {
    /// Fetch the full default listing. `GET /packages`
    fn list_packages(&self) -> impl Future<Output = GatewayResult<Vec<PackageRecord>>> + Send;

    /// Search packages by name/version/architecture. `GET /packages/search`
    fn search_packages(
        &self,
        query: &SearchQuery,
    ) -> impl Future<Output = GatewayResult<Vec<PackageRecord>>> + Send;

    /// Search packages containing a file path substring.
    /// `GET /packages/files/search`
    fn search_by_file(
        &self,
        filename: &str,
    ) -> impl Future<Output = GatewayResult<Vec<PackageRecord>>> + Send;

    /// Fetch store-wide aggregate statistics. `GET /packages/statistics`
    fn statistics(&self) -> impl Future<Output = GatewayResult<StoreStatistics>> + Send;

    /// Fetch full metadata plus the complete file list for one package.
    /// `GET /packages/{id}`
    fn get_package(
        &self,
        id: &PackageId,
    ) -> impl Future<Output = GatewayResult<PackageRecord>> + Send;

    /// Upload one archive. `POST /packages/upload` (multipart)
    fn upload_package(
        &self,
        path: &Path,
    ) -> impl Future<Output = GatewayResult<UploadReceipt>> + Send;

    /// Run a server-side integrity check for one package.
    /// `GET /packages/{id}/check`
    fn check_package(
        &self,
        id: &PackageId,
    ) -> impl Future<Output = GatewayResult<CheckOutcome>> + Send;

    /// Trigger a server-side check of every stored package.
    /// `POST /packages/check-all`
    fn check_all(&self) -> impl Future<Output = GatewayResult<()>> + Send;

    /// Delete one package. `DELETE /packages/{id}`
    fn delete_package(&self, id: &PackageId) -> impl Future<Output = GatewayResult<()>> + Send;

    /// Delete a batch of packages in one call; all-or-nothing from the
    /// client's point of view. `POST /packages/batch-delete`
    fn batch_delete(&self, ids: &[PackageId]) -> impl Future<Output = GatewayResult<()>> + Send;

    /// Delete every stored package. `DELETE /packages/delete-all`
    fn delete_all(&self) -> impl Future<Output = GatewayResult<()>> + Send;
}
