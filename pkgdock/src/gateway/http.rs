//! HTTP implementation of the gateway contract using reqwest.

use std::path::Path;
use std::time::Duration;

use tracing::{debug, warn};

use super::envelope;
use super::error::{GatewayError, GatewayResult};
use super::traits::{PackageGateway, SearchQuery};
use super::types::{
    CheckOutcome, PackageId, PackageRecord, StoreStatistics, UploadReceipt,
};

/// Default HTTP request timeout (30 seconds).
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// User-Agent for all store requests.
const USER_AGENT: &str = concat!("pkgdock/", env!("CARGO_PKG_VERSION"));

/// Asynchronous HTTP client for the remote package store.
///
/// # Example
///
/// ```ignore
/// use pkgdock::gateway::HttpGateway;
///
/// let gateway = HttpGateway::new("http://store.internal:8080/api")?;
/// let packages = gateway.list_packages().await?;
/// ```
#[derive(Clone)]
pub struct HttpGateway {
    client: reqwest::Client,
    base_url: String,
}

impl std::fmt::Debug for HttpGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpGateway")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl HttpGateway {
    /// Create a gateway client with the default timeout.
    pub fn new(base_url: impl Into<String>) -> GatewayResult<Self> {
        Self::with_timeout(base_url, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a gateway client with a custom request timeout.
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> GatewayResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| GatewayError::Http(format!("Failed to create HTTP client: {}", e)))?;

        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }

        Ok(Self { client, base_url })
    }

    /// Base URL this client talks to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send a request and return the body, folding transport failures and
    /// non-2xx statuses into a uniform error.
    async fn read_body(&self, request: reqwest::RequestBuilder, url: &str) -> GatewayResult<String> {
        let response = request
            .send()
            .await
            .map_err(|e| GatewayError::Http(format!("Request failed: {}", e)))?;

        let status = response.status();
        debug!(url = url, status = status.as_u16(), "store response");

        let body = response
            .text()
            .await
            .map_err(|e| GatewayError::Http(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            // A failing status may still carry a structured rejection; use
            // the server's message when it does.
            if let Ok(value) = envelope::parse_lenient(&body) {
                if let Some(message) = value.get("error").and_then(|v| v.as_str()) {
                    return Err(GatewayError::Rejected(message.to_string()));
                }
            }
            warn!(url = url, status = status.as_u16(), "HTTP error status");
            return Err(GatewayError::Http(format!("HTTP {} from {}", status, url)));
        }

        Ok(body)
    }

    async fn get_body(&self, url: &str) -> GatewayResult<String> {
        self.read_body(self.client.get(url), url).await
    }

    /// Download the full archive for a package to `dest`.
    ///
    /// Binary retrieval bypasses the JSON envelope entirely.
    pub async fn download_package(&self, id: &PackageId, dest: &Path) -> GatewayResult<u64> {
        let url = self.url(&format!("/packages/{}/download", id));
        self.download_to(&url, dest).await
    }

    /// Download a single file out of a package's archive to `dest`.
    pub async fn download_file(
        &self,
        id: &PackageId,
        file_path: &str,
        dest: &Path,
    ) -> GatewayResult<u64> {
        let url = self.url(&format!("/packages/{}/files/download", id));
        let response = self
            .client
            .get(&url)
            .query(&[("path", file_path)])
            .send()
            .await
            .map_err(|e| GatewayError::Http(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(GatewayError::Http(format!(
                "HTTP {} from {}",
                response.status(),
                url
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| GatewayError::Http(format!("Failed to read response: {}", e)))?;
        tokio::fs::write(dest, &bytes).await?;
        Ok(bytes.len() as u64)
    }

    async fn download_to(&self, url: &str, dest: &Path) -> GatewayResult<u64> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| GatewayError::Http(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(GatewayError::Http(format!(
                "HTTP {} from {}",
                response.status(),
                url
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| GatewayError::Http(format!("Failed to read response: {}", e)))?;
        tokio::fs::write(dest, &bytes).await?;
        Ok(bytes.len() as u64)
    }
}

impl PackageGateway for HttpGateway {
    async fn list_packages(&self) -> GatewayResult<Vec<PackageRecord>> {
        let url = self.url("/packages");
        let body = self.get_body(&url).await?;
        envelope::decode_field(&body, "packages", "Failed to fetch packages")
    }

    async fn search_packages(&self, query: &SearchQuery) -> GatewayResult<Vec<PackageRecord>> {
        let url = self.url("/packages/search");
        let mut params: Vec<(&str, &str)> = Vec::new();
        if !query.name.is_empty() {
            params.push(("name", query.name.as_str()));
        }
        if !query.version.is_empty() {
            params.push(("version", query.version.as_str()));
        }
        if let Some(arch) = query.architecture.as_deref() {
            params.push(("architecture", arch));
        }

        let body = self.read_body(self.client.get(&url).query(&params), &url).await?;
        envelope::decode_field(&body, "packages", "Search failed")
    }

    async fn search_by_file(&self, filename: &str) -> GatewayResult<Vec<PackageRecord>> {
        let url = self.url("/packages/files/search");
        let body = self
            .read_body(self.client.get(&url).query(&[("filename", filename)]), &url)
            .await?;
        envelope::decode_field(&body, "packages", "File search failed")
    }

    async fn statistics(&self) -> GatewayResult<StoreStatistics> {
        let url = self.url("/packages/statistics");
        let body = self.get_body(&url).await?;
        envelope::decode_field(&body, "statistics", "Failed to fetch statistics")
    }

    async fn get_package(&self, id: &PackageId) -> GatewayResult<PackageRecord> {
        let url = self.url(&format!("/packages/{}", id));
        let body = self.get_body(&url).await?;

        let mut record: PackageRecord =
            envelope::decode_field(&body, "package", "Failed to fetch package details")?;
        // The detail endpoint serves the file manifest as a sibling of the
        // package object.
        let value = envelope::parse_lenient(&body)?;
        if let Some(files) = value.get("files") {
            record.files = serde_json::from_value(files.clone())
                .map_err(|e| GatewayError::InvalidResponse(format!("bad 'files' payload: {}", e)))?;
        }
        Ok(record)
    }

    async fn upload_package(&self, path: &Path) -> GatewayResult<UploadReceipt> {
        let url = self.url("/packages/upload");
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let bytes = tokio::fs::read(path).await?;
        debug!(file = %file_name, size = bytes.len(), "uploading archive");

        let part = reqwest::multipart::Part::bytes(bytes).file_name(file_name);
        let form = reqwest::multipart::Form::new().part("file", part);

        let body = self
            .read_body(self.client.post(&url).multipart(form), &url)
            .await?;

        let value = envelope::parse_lenient(&body)?;
        envelope::require_success(&value, "Upload failed")?;

        // The parsed identity is informative; tolerate servers that omit it.
        let payload = value.get("package").cloned().unwrap_or(value);
        Ok(serde_json::from_value(payload).unwrap_or_default())
    }

    async fn check_package(&self, id: &PackageId) -> GatewayResult<CheckOutcome> {
        let url = self.url(&format!("/packages/{}/check", id));
        let body = self.get_body(&url).await?;
        envelope::decode_bare(&body)
    }

    async fn check_all(&self) -> GatewayResult<()> {
        let url = self.url("/packages/check-all");
        let body = self.read_body(self.client.post(&url), &url).await?;
        envelope::decode_ack(&body, "Bulk check failed")
    }

    async fn delete_package(&self, id: &PackageId) -> GatewayResult<()> {
        let url = self.url(&format!("/packages/{}", id));
        let body = self.read_body(self.client.delete(&url), &url).await?;
        envelope::decode_ack(&body, "Delete failed")
    }

    async fn batch_delete(&self, ids: &[PackageId]) -> GatewayResult<()> {
        let url = self.url("/packages/batch-delete");
        let id_strings: Vec<&str> = ids.iter().map(|id| id.as_str()).collect();
        let payload = serde_json::json!({ "package_ids": id_strings });

        let body = self
            .read_body(self.client.post(&url).json(&payload), &url)
            .await?;
        envelope::decode_ack(&body, "Batch delete failed")
    }

    async fn delete_all(&self) -> GatewayResult<()> {
        let url = self.url("/packages/delete-all");
        let body = self.read_body(self.client.delete(&url), &url).await?;
        envelope::decode_ack(&body, "Clear all failed")
    }
}
