//! The inventory console facade.
//!
//! Owns the state containers and wires them together the way the UI flow
//! demands: successful mutations invalidate the listing and re-pull it from
//! the store, bulk verification is followed by a reload so server-recorded
//! check timestamps win, and a successful bulk delete clears the selection.
//!
//! Independent operations are not serialized against each other beyond what
//! `&mut self` implies; the store itself is the only arbiter of concurrent
//! mutations.

use std::path::PathBuf;

use tracing::info;

use crate::gateway::{GatewayError, GatewayResult, PackageGateway, PackageId, VerificationStatus};
use crate::listing::{FilterCriteria, ListingViewModel, DEFAULT_PAGE_SIZE};
use crate::queue::{RunOutcome, TaskId, TaskStatus, UploadQueue};
use crate::selection::SelectionSet;
use crate::verify::{BatchReport, VerificationCoordinator};

/// Browser-style console over a remote package store.
pub struct InventoryConsole<G: PackageGateway> {
    gateway: G,
    /// The listing view model: filter, result rows, page window.
    pub listing: ListingViewModel,
    /// Query-scoped selection for bulk actions.
    pub selection: SelectionSet,
    /// Pending/processed upload tasks.
    pub queue: UploadQueue,
    verifier: VerificationCoordinator,
}

impl<G: PackageGateway> InventoryConsole<G> {
    /// Create a console with the default page size.
    pub fn new(gateway: G) -> Self {
        Self::with_page_size(gateway, DEFAULT_PAGE_SIZE)
    }

    /// Create a console with a specific listing page size.
    pub fn with_page_size(gateway: G, page_size: usize) -> Self {
        Self {
            gateway,
            listing: ListingViewModel::new(page_size),
            selection: SelectionSet::new(),
            queue: UploadQueue::new(),
            verifier: VerificationCoordinator::new(),
        }
    }

    /// The gateway this console drives.
    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Load the default listing plus statistics.
    pub async fn load(&mut self) {
        self.listing.load(&self.gateway).await;
    }

    /// Run a filtered search.
    pub async fn search(&mut self, filter: FilterCriteria) {
        self.listing.search(&self.gateway, filter).await;
    }

    /// Re-fetch the current view.
    pub async fn reload(&mut self) {
        self.listing.reload(&self.gateway).await;
    }

    /// Toggle selection of one package.
    pub fn toggle_select(&mut self, id: &PackageId) -> bool {
        self.selection.toggle(id)
    }

    /// Toggle the page-scoped "select all": selects every visible row unless
    /// all of them are already selected, in which case they are deselected.
    pub fn toggle_select_all_visible(&mut self) {
        let Self {
            listing, selection, ..
        } = self;
        let rows = listing.visible_rows();
        if selection.all_selected(rows) {
            selection.deselect_rows(rows);
        } else {
            selection.select_rows(rows);
        }
    }

    /// Verify a single package, updating its row status live.
    pub async fn verify_package(&mut self, id: &PackageId) -> VerificationStatus {
        let Self {
            gateway,
            listing,
            verifier,
            ..
        } = self;
        verifier
            .verify_one(gateway, id, |pid, status| listing.set_status(pid, status))
            .await
    }

    /// Verify the selected packages sequentially, then reload so the
    /// server's recorded check times replace the client's view.
    pub async fn verify_selected(&mut self) -> BatchReport {
        let ids = self.selection.ids();
        self.verify_ids(&ids).await
    }

    /// Verify every row in the current result set sequentially, then reload.
    pub async fn verify_all(&mut self) -> BatchReport {
        let ids: Vec<PackageId> = self.listing.rows().iter().map(|r| r.id.clone()).collect();
        self.verify_ids(&ids).await
    }

    async fn verify_ids(&mut self, ids: &[PackageId]) -> BatchReport {
        let report = {
            let Self {
                gateway,
                listing,
                verifier,
                ..
            } = self;
            verifier
                .verify_many(gateway, ids, |pid, status| listing.set_status(pid, status))
                .await
        };
        self.reload().await;
        report
    }

    /// True while a bulk verification batch is running.
    pub fn is_verifying(&self) -> bool {
        self.verifier.is_busy()
    }

    /// Trigger the store's own bulk verification, then reload.
    pub async fn server_check_all(&mut self) -> GatewayResult<()> {
        self.gateway.check_all().await?;
        self.reload().await;
        Ok(())
    }

    /// Delete one package and reload on success.
    pub async fn delete_package(&mut self, id: &PackageId) -> GatewayResult<()> {
        self.gateway.delete_package(id).await?;
        info!(package = %id, "package deleted");
        self.reload().await;
        Ok(())
    }

    /// Delete the selected packages in one batched call.
    ///
    /// All-or-nothing from the client's point of view: on success the
    /// selection is cleared and the listing reloaded; on failure the
    /// selection is left exactly as it was. Returns the number of deleted
    /// packages.
    pub async fn delete_selected(&mut self) -> GatewayResult<usize> {
        if self.selection.is_empty() {
            return Err(GatewayError::Rejected("No packages selected".to_string()));
        }

        let ids = self.selection.ids();
        self.gateway.batch_delete(&ids).await?;

        info!(count = ids.len(), "batch delete accepted");
        self.selection.clear();
        self.reload().await;
        Ok(ids.len())
    }

    /// Delete every package in the store, then reload the (empty) listing.
    pub async fn clear_all(&mut self) -> GatewayResult<()> {
        self.gateway.delete_all().await?;
        info!("store cleared");
        self.selection.clear();
        self.reload().await;
        Ok(())
    }

    /// Queue a local archive for upload.
    pub fn add_upload(&mut self, path: impl Into<PathBuf>) -> TaskId {
        self.queue.add(path)
    }

    /// Remove a queued task (unless it already succeeded).
    pub fn remove_upload(&mut self, id: &TaskId) -> bool {
        self.queue.remove(id)
    }

    /// Run the upload queue, then reload the listing to show what landed.
    pub async fn run_uploads(&mut self) -> RunOutcome {
        self.run_uploads_observed(|_, _| {}).await
    }

    /// Like [`run_uploads`](Self::run_uploads) with a status observer.
    pub async fn run_uploads_observed<F>(&mut self, emit: F) -> RunOutcome
    where
        F: FnMut(&TaskId, &TaskStatus),
    {
        let outcome = {
            let Self { gateway, queue, .. } = self;
            queue.start_observed(gateway, emit).await
        };
        if outcome.total() > 0 {
            self.reload().await;
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::{sample_record, MockGateway};

    fn console_with(ids: &[&str]) -> InventoryConsole<MockGateway> {
        let packages = ids
            .iter()
            .map(|id| sample_record(id, &format!("pkg-{}", id), "x86_64"))
            .collect();
        InventoryConsole::new(MockGateway::with_packages(packages))
    }

    #[tokio::test]
    async fn test_delete_selected_clears_selection_and_reloads() {
        let mut console = console_with(&["a", "b", "c"]);
        console.load().await;

        console.toggle_select(&PackageId::new("a"));
        console.toggle_select(&PackageId::new("b"));

        let deleted = console.delete_selected().await.unwrap();

        assert_eq!(deleted, 2);
        assert!(console.selection.is_empty());
        let remaining: Vec<&str> = console.listing.rows().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(remaining, vec!["c"]);
    }

    #[tokio::test]
    async fn test_rejected_delete_leaves_selection_intact() {
        let mut console = InventoryConsole::new(MockGateway {
            batch_delete_error: Some("store is read-only".to_string()),
            ..MockGateway::with_packages(vec![sample_record("a", "nginx", "x86_64")])
        });
        console.load().await;
        console.toggle_select(&PackageId::new("a"));

        let err = console.delete_selected().await.unwrap_err();

        assert_eq!(err.to_string(), "store is read-only");
        assert_eq!(console.selection.len(), 1);
        assert!(console.selection.is_selected(&PackageId::new("a")));
    }

    #[tokio::test]
    async fn test_delete_selected_requires_selection() {
        let mut console = console_with(&["a"]);
        console.load().await;

        assert!(console.delete_selected().await.is_err());
        assert_eq!(console.gateway().call_count("batch_delete"), 0);
    }

    #[tokio::test]
    async fn test_toggle_select_all_is_page_scoped() {
        let mut console = console_with(&["a", "b", "c"]);
        console.load().await;

        // An off-page id does not satisfy the page-scoped check.
        console.toggle_select(&PackageId::new("z"));
        console.toggle_select_all_visible();
        assert!(console.selection.all_selected(console.listing.visible_rows()));
        assert_eq!(console.selection.len(), 4);

        // A second toggle deselects the page but keeps the off-page id.
        console.toggle_select_all_visible();
        assert_eq!(console.selection.ids(), vec![PackageId::new("z")]);
    }

    #[tokio::test]
    async fn test_verify_selected_reloads_after_batch() {
        let mut console = console_with(&["a", "b"]);
        console.load().await;
        console.toggle_select(&PackageId::new("a"));
        console.toggle_select(&PackageId::new("b"));

        let report = console.verify_selected().await;

        assert_eq!(report.total(), 2);
        let calls = console.gateway().calls();
        let check_b = calls.iter().position(|c| c == "check:b").unwrap();
        let final_list = calls.iter().rposition(|c| c == "list").unwrap();
        assert!(final_list > check_b, "reload must follow the batch");
    }

    #[tokio::test]
    async fn test_verify_all_covers_every_loaded_row() {
        let mut console = console_with(&["a", "b", "c"]);
        console.load().await;

        let report = console.verify_all().await;

        assert_eq!(report.total(), 3);
        assert_eq!(console.gateway().call_count("check:"), 3);
    }

    #[tokio::test]
    async fn test_verify_package_updates_row_status_live() {
        let mut console = InventoryConsole::new(MockGateway {
            invalid_ids: vec![PackageId::new("a")],
            ..MockGateway::with_packages(vec![sample_record("a", "nginx", "x86_64")])
        });
        console.load().await;

        let status = console.verify_package(&PackageId::new("a")).await;

        assert_eq!(status, VerificationStatus::Invalid);
        assert_eq!(console.listing.rows()[0].status, VerificationStatus::Invalid);
    }

    #[tokio::test]
    async fn test_clear_all_empties_selection_and_listing() {
        let mut console = console_with(&["a", "b"]);
        console.load().await;
        console.toggle_select(&PackageId::new("a"));

        console.clear_all().await.unwrap();

        assert!(console.selection.is_empty());
        assert!(console.listing.rows().is_empty());
    }

    #[tokio::test]
    async fn test_run_uploads_reloads_listing() {
        let mut console = console_with(&[]);
        console.load().await;
        console.add_upload("fresh-v1-linux-x86_64.zip");

        let outcome = console.run_uploads().await;

        assert_eq!(outcome.succeeded, 1);
        assert_eq!(console.gateway().call_count("list"), 2);
    }

    #[tokio::test]
    async fn test_empty_upload_run_skips_reload() {
        let mut console = console_with(&[]);
        console.load().await;

        console.run_uploads().await;

        assert_eq!(console.gateway().call_count("list"), 1);
    }

    #[tokio::test]
    async fn test_server_check_all_triggers_and_reloads() {
        let mut console = console_with(&["a"]);
        console.load().await;

        console.server_check_all().await.unwrap();

        assert_eq!(console.gateway().call_count("check_all"), 1);
        assert_eq!(console.gateway().call_count("list"), 2);
    }
}
