//! Listing view model.
//!
//! Merges three independently changing inputs — the active filter, the last
//! server result list, and the page window — into the rows the console
//! actually renders. The server result set is fetched in full; pagination is
//! entirely client-side.
//!
//! Overlapping loads are fenced: every dispatch takes a monotonic sequence
//! number and a completion older than the latest dispatch is discarded, so a
//! slow early request can never overwrite fresher data.

mod detail;
mod filter;
mod page;

pub use detail::DetailView;
pub use filter::{Arch, FilterCriteria, SearchMode};
pub use page::{PageWindow, DEFAULT_PAGE_SIZE};

use tracing::{debug, warn};

use crate::gateway::{
    GatewayResult, PackageGateway, PackageId, PackageRecord, StoreStatistics, VerificationStatus,
};

/// Load lifecycle of the listing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState {
    /// Nothing requested yet.
    #[default]
    Idle,
    /// A load or search is in flight.
    Loading,
    /// The current rows reflect the last successful response.
    Loaded,
    /// The last request failed; rows are whatever was loaded before.
    Error(String),
}

impl LoadState {
    /// True while a request is in flight.
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    /// True once a response has been applied.
    pub fn is_loaded(&self) -> bool {
        matches!(self, LoadState::Loaded)
    }
}

/// Sequence handle for one dispatched load. Stale tickets are rejected when
/// their response arrives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

/// The console's package listing.
pub struct ListingViewModel {
    state: LoadState,
    rows: Vec<PackageRecord>,
    statistics: Option<StoreStatistics>,
    filter: FilterCriteria,
    page: PageWindow,
    dispatched: u64,
}

impl ListingViewModel {
    /// Create an idle listing with the given page size.
    pub fn new(page_size: usize) -> Self {
        Self {
            state: LoadState::Idle,
            rows: Vec::new(),
            statistics: None,
            filter: FilterCriteria::default(),
            page: PageWindow::new(page_size),
            dispatched: 0,
        }
    }

    /// Current load state.
    pub fn state(&self) -> &LoadState {
        &self.state
    }

    /// The full result set of the last successful load.
    pub fn rows(&self) -> &[PackageRecord] {
        &self.rows
    }

    /// Rows of the current page.
    pub fn visible_rows(&self) -> &[PackageRecord] {
        self.page.slice(&self.rows)
    }

    /// Last fetched store statistics, if any.
    pub fn statistics(&self) -> Option<&StoreStatistics> {
        self.statistics.as_ref()
    }

    /// The active filter.
    pub fn filter(&self) -> &FilterCriteria {
        &self.filter
    }

    /// The page window.
    pub fn page(&self) -> &PageWindow {
        &self.page
    }

    /// Jump to a page (clamped).
    pub fn set_page(&mut self, page: usize) {
        self.page.set_page(page);
    }

    /// Change the page size. Always returns to page 1.
    pub fn set_page_size(&mut self, page_size: usize) {
        self.page.set_page_size(page_size);
        self.page.set_page(1);
    }

    /// Begin a load, taking the next sequence number.
    ///
    /// The primitive behind [`load`](Self::load) / [`search`](Self::search);
    /// exposed so the dispatch/apply halves are testable without a runtime.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.dispatched += 1;
        self.state = LoadState::Loading;
        LoadTicket(self.dispatched)
    }

    /// Apply a completed load.
    ///
    /// Returns false (and changes nothing) when `ticket` is stale, i.e. a
    /// newer load was dispatched after this one. A successful application
    /// replaces the rows and returns to page 1.
    pub fn apply_rows(
        &mut self,
        ticket: LoadTicket,
        result: GatewayResult<Vec<PackageRecord>>,
    ) -> bool {
        if ticket.0 != self.dispatched {
            debug!(
                ticket = ticket.0,
                latest = self.dispatched,
                "discarding stale listing response"
            );
            return false;
        }

        match result {
            Ok(rows) => {
                self.page.set_total_items(rows.len());
                self.page.set_page(1);
                self.rows = rows;
                self.state = LoadState::Loaded;
            }
            Err(e) => {
                warn!(error = %e, "listing load failed");
                self.state = LoadState::Error(e.to_string());
            }
        }
        true
    }

    /// Apply completed statistics. Stale tickets are discarded; a failed
    /// fetch keeps whatever statistics were shown before.
    pub fn apply_statistics(
        &mut self,
        ticket: LoadTicket,
        result: GatewayResult<StoreStatistics>,
    ) -> bool {
        if ticket.0 != self.dispatched {
            return false;
        }
        match result {
            Ok(stats) => self.statistics = Some(stats),
            Err(e) => warn!(error = %e, "statistics fetch failed"),
        }
        true
    }

    /// Load the default listing and store statistics in parallel.
    ///
    /// Clears the active filter: this is the unfiltered view.
    pub async fn load<G: PackageGateway>(&mut self, gateway: &G) {
        self.filter = FilterCriteria::default();
        let ticket = self.begin_load();
        let (rows, stats) = tokio::join!(gateway.list_packages(), gateway.statistics());
        self.apply_statistics(ticket, stats);
        self.apply_rows(ticket, rows);
    }

    /// Run a filtered search, routing on the filter's mode.
    pub async fn search<G: PackageGateway>(&mut self, gateway: &G, filter: FilterCriteria) {
        self.filter = filter;
        let ticket = self.begin_load();
        let result = match self.filter.search_mode() {
            SearchMode::FileContent => gateway.search_by_file(&self.filter.file_path).await,
            SearchMode::General => gateway.search_packages(&self.filter.to_query()).await,
        };
        self.apply_rows(ticket, result);
    }

    /// Re-fetch the current view: the active search if a filter is set, the
    /// default listing otherwise. Called after every successful mutation.
    pub async fn reload<G: PackageGateway>(&mut self, gateway: &G) {
        if self.filter.is_empty() {
            self.load(gateway).await;
        } else {
            let filter = self.filter.clone();
            self.search(gateway, filter).await;
        }
    }

    /// Update one row's verification status in place.
    ///
    /// Rows that scrolled out of the result set are ignored; the server's
    /// copy is refreshed on the next reload anyway.
    pub fn set_status(&mut self, id: &PackageId, status: VerificationStatus) {
        if let Some(row) = self.rows.iter_mut().find(|r| &r.id == id) {
            row.status = status;
        }
    }
}

impl Default for ListingViewModel {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::{sample_record, GatewayError, MockGateway, StoreStatistics};

    fn records(n: usize) -> Vec<PackageRecord> {
        (0..n)
            .map(|i| sample_record(&format!("id{:03}", i), &format!("pkg{}", i), "x86_64"))
            .collect()
    }

    #[tokio::test]
    async fn test_load_fetches_rows_and_statistics() {
        let gateway = MockGateway {
            stats: StoreStatistics {
                total_packages: 2,
                ..Default::default()
            },
            ..MockGateway::with_packages(records(2))
        };
        let mut listing = ListingViewModel::new(50);

        listing.load(&gateway).await;

        assert!(listing.state().is_loaded());
        assert_eq!(listing.rows().len(), 2);
        assert_eq!(listing.statistics().unwrap().total_packages, 2);
        assert_eq!(gateway.call_count("list"), 1);
        assert_eq!(gateway.call_count("stats"), 1);
    }

    #[tokio::test]
    async fn test_load_failure_sets_error_state() {
        let gateway = MockGateway {
            list_error: Some("store offline".to_string()),
            ..Default::default()
        };
        let mut listing = ListingViewModel::new(50);

        listing.load(&gateway).await;

        assert_eq!(listing.state(), &LoadState::Error("store offline".to_string()));
    }

    #[tokio::test]
    async fn test_search_with_file_term_routes_to_file_endpoint() {
        let gateway = MockGateway {
            file_hits: records(1),
            ..Default::default()
        };
        let mut listing = ListingViewModel::new(50);

        listing
            .search(
                &gateway,
                FilterCriteria {
                    name: "ignored-by-routing".to_string(),
                    file_path: "bin/nginx".to_string(),
                    ..Default::default()
                },
            )
            .await;

        assert_eq!(gateway.calls(), vec!["files_search:bin/nginx"]);
        assert_eq!(listing.rows().len(), 1);
    }

    #[tokio::test]
    async fn test_search_with_metadata_terms_routes_to_general_endpoint() {
        let gateway = MockGateway::with_packages(records(3));
        let mut listing = ListingViewModel::new(50);

        listing
            .search(
                &gateway,
                FilterCriteria {
                    name: "pkg".to_string(),
                    arch: Some(Arch::X86_64),
                    ..Default::default()
                },
            )
            .await;

        assert_eq!(gateway.call_count("search "), 1);
        assert_eq!(gateway.call_count("files_search"), 0);
        assert_eq!(listing.rows().len(), 3);
    }

    #[tokio::test]
    async fn test_successful_reload_resets_page() {
        let gateway = MockGateway::with_packages(records(120));
        let mut listing = ListingViewModel::new(50);

        listing.load(&gateway).await;
        listing.set_page(3);
        assert_eq!(listing.page().current_page(), 3);

        listing.load(&gateway).await;
        assert_eq!(listing.page().current_page(), 1);
    }

    #[tokio::test]
    async fn test_visible_rows_follow_page_window() {
        let gateway = MockGateway::with_packages(records(120));
        let mut listing = ListingViewModel::new(50);

        listing.load(&gateway).await;
        assert_eq!(listing.visible_rows().len(), 50);
        assert_eq!(listing.visible_rows()[0].id.as_str(), "id000");

        listing.set_page(3);
        assert_eq!(listing.visible_rows().len(), 20);
        assert_eq!(listing.visible_rows()[0].id.as_str(), "id100");
    }

    #[tokio::test]
    async fn test_set_page_size_returns_to_page_one() {
        let gateway = MockGateway::with_packages(records(120));
        let mut listing = ListingViewModel::new(50);

        listing.load(&gateway).await;
        listing.set_page(2);
        listing.set_page_size(25);

        assert_eq!(listing.page().current_page(), 1);
        assert_eq!(listing.page().total_pages(), 5);
        assert_eq!(listing.visible_rows().len(), 25);
    }

    #[test]
    fn test_stale_response_is_discarded() {
        let mut listing = ListingViewModel::new(50);

        let first = listing.begin_load();
        let second = listing.begin_load();

        // The later dispatch resolves first.
        assert!(listing.apply_rows(second, Ok(records(2))));
        // The earlier one straggles in afterwards and must not win.
        assert!(!listing.apply_rows(first, Ok(records(9))));

        assert_eq!(listing.rows().len(), 2);
        assert!(listing.state().is_loaded());
    }

    #[test]
    fn test_stale_error_cannot_clobber_fresh_rows() {
        let mut listing = ListingViewModel::new(50);

        let first = listing.begin_load();
        let second = listing.begin_load();

        assert!(listing.apply_rows(second, Ok(records(1))));
        assert!(!listing.apply_rows(first, Err(GatewayError::Http("timeout".to_string()))));

        assert!(listing.state().is_loaded());
        assert_eq!(listing.rows().len(), 1);
    }

    #[test]
    fn test_stale_statistics_are_discarded() {
        let mut listing = ListingViewModel::new(50);

        let first = listing.begin_load();
        let _second = listing.begin_load();

        let stale = StoreStatistics {
            total_packages: 99,
            ..Default::default()
        };
        assert!(!listing.apply_statistics(first, Ok(stale)));
        assert!(listing.statistics().is_none());
    }

    #[tokio::test]
    async fn test_reload_repeats_active_search() {
        let gateway = MockGateway::with_packages(records(2));
        let mut listing = ListingViewModel::new(50);

        listing
            .search(
                &gateway,
                FilterCriteria {
                    name: "pkg".to_string(),
                    ..Default::default()
                },
            )
            .await;
        listing.reload(&gateway).await;

        assert_eq!(gateway.call_count("search "), 2);
        assert_eq!(gateway.call_count("list"), 0);
    }

    #[tokio::test]
    async fn test_reload_without_filter_repeats_default_load() {
        let gateway = MockGateway::with_packages(records(2));
        let mut listing = ListingViewModel::new(50);

        listing.load(&gateway).await;
        listing.reload(&gateway).await;

        assert_eq!(gateway.call_count("list"), 2);
    }

    #[tokio::test]
    async fn test_set_status_updates_row() {
        let gateway = MockGateway::with_packages(records(2));
        let mut listing = ListingViewModel::new(50);
        listing.load(&gateway).await;

        let id = listing.rows()[1].id.clone();
        listing.set_status(&id, VerificationStatus::Checking);

        assert_eq!(listing.rows()[1].status, VerificationStatus::Checking);
        assert_eq!(listing.rows()[0].status, VerificationStatus::Pending);

        // Unknown ids are ignored.
        listing.set_status(&PackageId::new("ghost"), VerificationStatus::Valid);
    }
}
