//! Detail view for a single package.
//!
//! Fetches the full metadata and file manifest once, then pages through the
//! file list locally, the same way the listing pages through packages.

use super::page::PageWindow;
use super::LoadState;
use crate::gateway::{FileEntry, PackageGateway, PackageId, PackageRecord};

/// One package's detail view.
pub struct DetailView {
    state: LoadState,
    record: Option<PackageRecord>,
    page: PageWindow,
}

impl DetailView {
    /// Create an empty detail view with the given file-list page size.
    pub fn new(page_size: usize) -> Self {
        Self {
            state: LoadState::Idle,
            record: None,
            page: PageWindow::new(page_size),
        }
    }

    /// Current load state.
    pub fn state(&self) -> &LoadState {
        &self.state
    }

    /// The loaded package, if any.
    pub fn record(&self) -> Option<&PackageRecord> {
        self.record.as_ref()
    }

    /// The file-list page window.
    pub fn page(&self) -> &PageWindow {
        &self.page
    }

    /// Files on the current page.
    pub fn visible_files(&self) -> &[FileEntry] {
        match &self.record {
            Some(record) => self.page.slice(&record.files),
            None => &[],
        }
    }

    /// Jump to a file-list page (clamped).
    pub fn set_page(&mut self, page: usize) {
        self.page.set_page(page);
    }

    /// Change the file-list page size. Returns to page 1.
    pub fn set_page_size(&mut self, page_size: usize) {
        self.page.set_page_size(page_size);
        self.page.set_page(1);
    }

    /// Fetch one package's full metadata and file manifest.
    pub async fn load<G: PackageGateway>(&mut self, gateway: &G, id: &PackageId) {
        self.state = LoadState::Loading;
        match gateway.get_package(id).await {
            Ok(record) => {
                self.page.set_total_items(record.files.len());
                self.page.set_page(1);
                self.record = Some(record);
                self.state = LoadState::Loaded;
            }
            Err(e) => {
                self.state = LoadState::Error(e.to_string());
            }
        }
    }
}

impl Default for DetailView {
    fn default() -> Self {
        Self::new(super::page::DEFAULT_PAGE_SIZE)
    }
}
