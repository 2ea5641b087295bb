//! Command handlers: the business logic behind each subcommand.
//!
//! Handlers depend only on [`CommandContext`] interfaces and return
//! [`CliError`] for anything the user has to act on.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use pkgdock::gateway::{GatewayError, PackageGateway, PackageId};
use pkgdock::listing::{Arch, DetailView, FilterCriteria, ListingViewModel, LoadState};
use pkgdock::queue::{TaskId, TaskStatus};

use super::format::{format_date, format_size};
use super::traits::{CommandContext, Output};
use crate::error::CliError;

/// Map a load state into a handler result.
fn ensure_loaded(state: &LoadState) -> Result<(), CliError> {
    match state {
        LoadState::Error(msg) => Err(CliError::Listing(msg.clone())),
        _ => Ok(()),
    }
}

/// Parse an `--arch` value; "all" means no constraint.
fn parse_arch(value: &str) -> Result<Option<Arch>, CliError> {
    if value == "all" {
        return Ok(None);
    }
    Arch::parse(value).map(Some).ok_or_else(|| {
        CliError::Config(format!(
            "Unknown architecture '{}'. Expected one of: x86_64, aarch64, armhf, armel, mips, ppc64le, all",
            value
        ))
    })
}

/// Render the current page of the listing as a table.
fn render_listing(output: &dyn Output, listing: &ListingViewModel, show_matches: bool) {
    if listing.rows().is_empty() {
        output.println("No packages found.");
        return;
    }

    output.println(&format!(
        "{:<34} {:<20} {:<12} {:<8} {:<10} {:<10} {}",
        "ID", "NAME", "VERSION", "SYSTEM", "ARCH", "STATUS", "UPLOADED"
    ));
    for row in listing.visible_rows() {
        output.println(&format!(
            "{:<34} {:<20} {:<12} {:<8} {:<10} {:<10} {}",
            row.id,
            row.name,
            row.version,
            row.system,
            row.architecture,
            row.status,
            format_date(row.upload_time),
        ));
        if show_matches {
            for file in &row.matched_files {
                output.indented(&format!("{} ({})", file.path, format_size(file.size)));
            }
        }
    }

    let page = listing.page();
    output.println(&format!(
        "Page {} of {} ({} packages)",
        page.current_page(),
        page.total_pages(),
        page.total_items(),
    ));
}

/// `list` — default listing plus a statistics summary.
pub async fn list(ctx: &mut CommandContext<'_>, page: usize) -> Result<(), CliError> {
    ctx.console.load().await;
    ensure_loaded(ctx.console.listing.state())?;
    ctx.console.listing.set_page(page);

    render_listing(ctx.output, &ctx.console.listing, false);

    if let Some(stats) = ctx.console.listing.statistics() {
        ctx.output.println(&format!(
            "Store: {} packages, {}",
            stats.total_packages,
            format_size(stats.total_size),
        ));
    }
    Ok(())
}

/// `search` — filtered search, routed by the presence of a file term.
pub async fn search(
    ctx: &mut CommandContext<'_>,
    name: String,
    version: String,
    arch: String,
    file: Option<String>,
    page: usize,
) -> Result<(), CliError> {
    let filter = FilterCriteria {
        name,
        version,
        arch: parse_arch(&arch)?,
        file_path: file.unwrap_or_default(),
    };
    let file_mode = !filter.file_path.is_empty();

    ctx.console.search(filter).await;
    ensure_loaded(ctx.console.listing.state())?;
    ctx.console.listing.set_page(page);

    render_listing(ctx.output, &ctx.console.listing, file_mode);
    Ok(())
}

/// `show` — one package's metadata and paged file manifest.
pub async fn show(
    ctx: &mut CommandContext<'_>,
    id: String,
    files_page: usize,
) -> Result<(), CliError> {
    let mut view = DetailView::new(ctx.console.listing.page().page_size());
    view.load(ctx.console.gateway(), &PackageId::new(id)).await;
    ensure_loaded(view.state())?;

    let record = match view.record() {
        Some(record) => record,
        None => return Ok(()),
    };

    ctx.output.header(&format!("{} {}", record.name, record.version));
    ctx.output.indented(&format!("Id:            {}", record.id));
    ctx.output.indented(&format!("System:        {}", record.system));
    ctx.output.indented(&format!("Architecture:  {}", record.architecture));
    ctx.output.indented(&format!("Filename:      {}", record.original_filename));
    ctx.output.indented(&format!("Files:         {}", record.file_count));
    ctx.output.indented(&format!("Size:          {}", format_size(record.total_size)));
    ctx.output.indented(&format!("Downloads:     {}", record.download_count));
    ctx.output.indented(&format!("Uploaded:      {}", format_date(record.upload_time)));
    ctx.output.indented(&format!(
        "Last download: {}",
        format_date(record.last_download_time)
    ));
    ctx.output.indented(&format!(
        "Last verified: {}",
        format_date(record.last_check_time)
    ));
    ctx.output.indented(&format!("Status:        {}", record.status));

    view.set_page(files_page);
    if !view.visible_files().is_empty() {
        ctx.output.newline();
        ctx.output.println(&format!("{:<60} {:>10} {:>8}", "PATH", "SIZE", "PULLS"));
        for file in view.visible_files() {
            ctx.output.println(&format!(
                "{:<60} {:>10} {:>8}",
                file.path,
                format_size(file.size),
                file.download_count,
            ));
        }
        ctx.output.println(&format!(
            "File page {} of {}",
            view.page().current_page(),
            view.page().total_pages(),
        ));
    }
    Ok(())
}

/// `stats` — store-wide aggregates.
pub async fn stats(ctx: &mut CommandContext<'_>) -> Result<(), CliError> {
    let stats = ctx.console.gateway().statistics().await?;

    ctx.output.header("Store statistics");
    ctx.output.indented(&format!("Packages: {}", stats.total_packages));
    ctx.output.indented(&format!("Size:     {}", format_size(stats.total_size)));

    if !stats.by_architecture.is_empty() {
        ctx.output.newline();
        ctx.output.println("By architecture:");
        for arch in &stats.by_architecture {
            ctx.output.indented(&format!(
                "{:<10} {:>6} packages  {}",
                arch.architecture,
                arch.package_count,
                format_size(arch.total_size),
            ));
        }
    }

    if !stats.by_system.is_empty() {
        ctx.output.newline();
        ctx.output.println("By system:");
        for system in &stats.by_system {
            ctx.output.indented(&format!(
                "{:<10} {:>6} packages  {}",
                system.system,
                system.package_count,
                format_size(system.total_size),
            ));
        }
    }
    Ok(())
}

/// `upload` — queue the given archives and run the queue.
pub async fn upload(ctx: &mut CommandContext<'_>, files: Vec<PathBuf>) -> Result<(), CliError> {
    for file in files {
        ctx.console.add_upload(file);
    }

    let names: HashMap<TaskId, String> = ctx
        .console
        .queue
        .tasks()
        .iter()
        .map(|t| (t.id().clone(), t.file_name()))
        .collect();

    let output = ctx.output;
    let outcome = ctx
        .console
        .run_uploads_observed(|id, status| {
            let name = names.get(id).map(String::as_str).unwrap_or("?");
            match status {
                TaskStatus::Uploading => output.println(&format!("  uploading  {}", name)),
                TaskStatus::Success => output.println(&format!("  deployed   {}", name)),
                TaskStatus::Error(msg) => {
                    output.println(&format!("  failed     {}: {}", name, msg))
                }
                TaskStatus::Pending => {}
            }
        })
        .await;

    let (finished, total) = ctx.console.queue.progress();
    ctx.output.newline();
    ctx.output.println(&format!("Progress: {} / {} completed", finished, total));
    if outcome.failed > 0 {
        ctx.output.error(&format!(
            "{} uploaded, {} failed",
            outcome.succeeded, outcome.failed
        ));
    } else {
        ctx.output
            .success(&format!("{} uploaded", outcome.succeeded));
    }
    Ok(())
}

/// `verify` — client-driven verification of specific packages.
pub async fn verify(ctx: &mut CommandContext<'_>, ids: Vec<String>) -> Result<(), CliError> {
    ctx.console.load().await;
    ensure_loaded(ctx.console.listing.state())?;

    if let [id] = ids.as_slice() {
        let status = ctx.console.verify_package(&PackageId::new(id.clone())).await;
        ctx.output.println(&format!("{}: {}", id, status));
        return Ok(());
    }

    for id in &ids {
        let id = PackageId::new(id.clone());
        if !ctx.console.selection.is_selected(&id) {
            ctx.console.toggle_select(&id);
        }
    }
    let report = ctx.console.verify_selected().await;
    ctx.output.println(&format!(
        "Verified {}: {} valid, {} invalid",
        report.total(),
        report.valid,
        report.invalid,
    ));
    Ok(())
}

/// `verify-all` — client-driven verification of every listed package.
pub async fn verify_all(ctx: &mut CommandContext<'_>) -> Result<(), CliError> {
    ctx.console.load().await;
    ensure_loaded(ctx.console.listing.state())?;

    let report = ctx.console.verify_all().await;
    ctx.output.println(&format!(
        "Verified {}: {} valid, {} invalid",
        report.total(),
        report.valid,
        report.invalid,
    ));
    Ok(())
}

/// `check-all` — server-side bulk verification trigger.
pub async fn check_all(ctx: &mut CommandContext<'_>) -> Result<(), CliError> {
    ctx.console.server_check_all().await?;
    ctx.output.success("Bulk verification triggered");
    Ok(())
}

/// `delete` — delete one or many packages, with confirmation.
pub async fn delete(
    ctx: &mut CommandContext<'_>,
    ids: Vec<String>,
    yes: bool,
) -> Result<(), CliError> {
    let prompt = if ids.len() == 1 {
        "Are you sure you want to delete this package?".to_string()
    } else {
        format!("Are you sure you want to delete {} packages?", ids.len())
    };
    if !yes && !ctx.interaction.confirm(&prompt) {
        ctx.output.println("Aborted.");
        return Ok(());
    }

    if let [id] = ids.as_slice() {
        ctx.console.delete_package(&PackageId::new(id.clone())).await?;
        ctx.output.success("Package deleted");
        return Ok(());
    }

    for id in &ids {
        let id = PackageId::new(id.clone());
        if !ctx.console.selection.is_selected(&id) {
            ctx.console.toggle_select(&id);
        }
    }
    let deleted = ctx.console.delete_selected().await?;
    ctx.output.success(&format!("{} packages deleted", deleted));
    Ok(())
}

/// `clear-all` — wipe the store.
pub async fn clear_all(ctx: &mut CommandContext<'_>, yes: bool) -> Result<(), CliError> {
    let prompt = "WARNING: This will permanently delete ALL packages and their records. Continue?";
    if !yes && !ctx.interaction.confirm(prompt) {
        ctx.output.println("Aborted.");
        return Ok(());
    }

    ctx.console.clear_all().await?;
    ctx.output.success("All packages deleted");
    Ok(())
}

/// `download` — retrieve a package's full archive.
pub async fn download(
    ctx: &mut CommandContext<'_>,
    id: String,
    output_path: PathBuf,
) -> Result<(), CliError> {
    let bytes = ctx
        .console
        .gateway()
        .download_package(&PackageId::new(id), &output_path)
        .await
        .map_err(|e| file_write_error(e, &output_path))?;

    ctx.output.success(&format!(
        "Downloaded {} ({})",
        output_path.display(),
        format_size(bytes)
    ));
    Ok(())
}

/// `download-file` — retrieve a single file out of a package.
pub async fn download_file(
    ctx: &mut CommandContext<'_>,
    id: String,
    path: String,
    output_path: PathBuf,
) -> Result<(), CliError> {
    let bytes = ctx
        .console
        .gateway()
        .download_file(&PackageId::new(id), &path, &output_path)
        .await
        .map_err(|e| file_write_error(e, &output_path))?;

    ctx.output.success(&format!(
        "Downloaded {} ({})",
        output_path.display(),
        format_size(bytes)
    ));
    Ok(())
}

fn file_write_error(e: GatewayError, path: &Path) -> CliError {
    match e {
        GatewayError::Io(error) => CliError::FileWrite {
            path: path.display().to_string(),
            error,
        },
        other => CliError::Gateway(other),
    }
}
