//! Verification coordinator.
//!
//! Drives gateway-side integrity checks, singly or over a batch of ids.
//! Status transitions are emitted through an observer so the listing can
//! render them incrementally; the emitted sequence always passes through
//! `Checking` before a terminal state.
//!
//! A check that cannot complete reports `Invalid`: an unverifiable package
//! must never display as implicitly trustworthy.

use tracing::{info, warn};

use crate::gateway::{PackageGateway, PackageId, VerificationStatus};

/// Tally of one bulk verification run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BatchReport {
    /// Packages that verified.
    pub valid: usize,
    /// Packages that failed verification or whose check failed outright.
    pub invalid: usize,
}

impl BatchReport {
    /// Total packages checked.
    pub fn total(&self) -> usize {
        self.valid + self.invalid
    }
}

/// Coordinates per-package integrity checks.
pub struct VerificationCoordinator {
    busy: bool,
}

impl VerificationCoordinator {
    /// Create an idle coordinator.
    pub fn new() -> Self {
        Self { busy: false }
    }

    /// True while a bulk verification batch is running. The flag covers the
    /// whole batch, not individual items.
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Verify a single package.
    ///
    /// Emits `Checking` before the gateway call and the terminal state after
    /// it. Transport and application failures both collapse to `Invalid`.
    pub async fn verify_one<G, F>(
        &mut self,
        gateway: &G,
        id: &PackageId,
        mut emit: F,
    ) -> VerificationStatus
    where
        G: PackageGateway,
        F: FnMut(&PackageId, VerificationStatus),
    {
        emit(id, VerificationStatus::Checking);

        let status = match gateway.check_package(id).await {
            Ok(outcome) if outcome.valid => VerificationStatus::Valid,
            Ok(_) => VerificationStatus::Invalid,
            Err(e) => {
                warn!(package = %id, error = %e, "check failed; reporting invalid");
                VerificationStatus::Invalid
            }
        };

        emit(id, status);
        status
    }

    /// Verify a batch of packages, strictly one at a time.
    ///
    /// Sequential on purpose: bounds concurrent connections to the gateway
    /// and keeps the per-row status display incremental. Individual failures
    /// do not abort the batch. Callers should reload the listing afterwards
    /// so server-recorded check timestamps replace client guesses.
    pub async fn verify_many<G, F>(
        &mut self,
        gateway: &G,
        ids: &[PackageId],
        mut emit: F,
    ) -> BatchReport
    where
        G: PackageGateway,
        F: FnMut(&PackageId, VerificationStatus),
    {
        self.busy = true;
        info!(count = ids.len(), "starting bulk verification");

        let mut report = BatchReport::default();
        for id in ids {
            match self.verify_one(gateway, id, &mut emit).await {
                VerificationStatus::Valid => report.valid += 1,
                _ => report.invalid += 1,
            }
        }

        self.busy = false;
        info!(valid = report.valid, invalid = report.invalid, "bulk verification finished");
        report
    }
}

impl Default for VerificationCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::MockGateway;

    fn id(s: &str) -> PackageId {
        PackageId::new(s)
    }

    #[tokio::test]
    async fn test_verify_one_passes_through_checking() {
        let gateway = MockGateway::default();
        let mut coordinator = VerificationCoordinator::new();

        let mut seen = Vec::new();
        let status = coordinator
            .verify_one(&gateway, &id("a"), |pid, s| seen.push((pid.clone(), s)))
            .await;

        assert_eq!(status, VerificationStatus::Valid);
        assert_eq!(
            seen,
            vec![
                (id("a"), VerificationStatus::Checking),
                (id("a"), VerificationStatus::Valid),
            ]
        );
    }

    #[tokio::test]
    async fn test_verify_one_reports_invalid_archive() {
        let gateway = MockGateway {
            invalid_ids: vec![id("corrupt")],
            ..Default::default()
        };
        let mut coordinator = VerificationCoordinator::new();

        let mut seen = Vec::new();
        let status = coordinator
            .verify_one(&gateway, &id("corrupt"), |pid, s| seen.push((pid.clone(), s)))
            .await;

        assert_eq!(status, VerificationStatus::Invalid);
        assert_eq!(seen.last().unwrap().1, VerificationStatus::Invalid);
    }

    #[tokio::test]
    async fn test_verify_one_fails_closed_on_transport_error() {
        let gateway = MockGateway {
            check_error: Some("connection reset".to_string()),
            ..Default::default()
        };
        let mut coordinator = VerificationCoordinator::new();

        let status = coordinator.verify_one(&gateway, &id("a"), |_, _| {}).await;

        assert_eq!(status, VerificationStatus::Invalid);
    }

    #[tokio::test]
    async fn test_verify_many_is_strictly_sequential() {
        let gateway = MockGateway::default();
        let mut coordinator = VerificationCoordinator::new();
        let ids = [id("a"), id("b"), id("c")];

        let mut seen = Vec::new();
        let report = coordinator
            .verify_many(&gateway, &ids, |pid, s| seen.push((pid.clone(), s)))
            .await;

        assert_eq!(report.valid, 3);
        assert_eq!(gateway.calls(), vec!["check:a", "check:b", "check:c"]);
        // Each package settles before the next check begins.
        assert_eq!(
            seen,
            vec![
                (id("a"), VerificationStatus::Checking),
                (id("a"), VerificationStatus::Valid),
                (id("b"), VerificationStatus::Checking),
                (id("b"), VerificationStatus::Valid),
                (id("c"), VerificationStatus::Checking),
                (id("c"), VerificationStatus::Valid),
            ]
        );
    }

    #[tokio::test]
    async fn test_verify_many_continues_past_failures() {
        let gateway = MockGateway {
            check_error: Some("store offline".to_string()),
            ..Default::default()
        };
        let mut coordinator = VerificationCoordinator::new();
        let ids = [id("a"), id("b")];

        let report = coordinator.verify_many(&gateway, &ids, |_, _| {}).await;

        assert_eq!(report.invalid, 2);
        assert_eq!(gateway.call_count("check:"), 2);
    }

    #[tokio::test]
    async fn test_verify_many_mixed_results() {
        let gateway = MockGateway {
            invalid_ids: vec![id("bad")],
            ..Default::default()
        };
        let mut coordinator = VerificationCoordinator::new();
        let ids = [id("good"), id("bad")];

        let report = coordinator.verify_many(&gateway, &ids, |_, _| {}).await;

        assert_eq!(report.valid, 1);
        assert_eq!(report.invalid, 1);
        assert_eq!(report.total(), 2);
    }

    #[tokio::test]
    async fn test_busy_flag_clears_after_batch() {
        let gateway = MockGateway::default();
        let mut coordinator = VerificationCoordinator::new();

        assert!(!coordinator.is_busy());
        coordinator.verify_many(&gateway, &[id("a")], |_, _| {}).await;
        assert!(!coordinator.is_busy());
    }
}
