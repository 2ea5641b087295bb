//! Client for the remote package store's REST surface.
//!
//! The store owns all durable state; this module is the console's only way
//! to read or mutate it. The [`PackageGateway`] trait is the seam the
//! orchestration core is tested through; [`HttpGateway`] is the production
//! implementation.

mod envelope;
mod error;
mod http;
mod traits;
mod types;

pub use error::{GatewayError, GatewayResult};
pub use http::HttpGateway;
pub use traits::{PackageGateway, SearchQuery};
pub use types::{
    ArchStat, CheckOutcome, FileEntry, PackageId, PackageRecord, StoreStatistics, SystemStat,
    UploadReceipt, VerificationStatus,
};

#[cfg(test)]
pub use traits::tests::{sample_record, MockGateway};
