//! Bulk operation commands.
//!
//! # Usage
//!
//! ```bash
//! vitrine bulk delete 1 2 3
//! vitrine bulk update 4 5 --stock 0 --featured false
//! vitrine bulk export 1 2 --format json --out-dir exports
//! ```
//!
//! Progress is logged after every processed product.

use std::path::PathBuf;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use vitrine_core::{BulkOperation, ExportFormat, MAX_PAGE_SIZE, OperationStatus, ProductId};
use vitrine_dashboard::{
    BulkOperationsStore, DirectorySink, ProductService, ProductsStore, TracingNotifier,
};

use super::products::UpdateArgs;
use super::{CommandError, connect};

/// Delete every listed product.
pub async fn delete(ids: Vec<ProductId>) -> Result<(), CommandError> {
    let (config, service) = connect()?;
    let mut products = ProductsStore::new(service, config.page_size);
    let mut bulk = selection(ids, ".");

    let progress = log_progress(bulk.subscribe());
    let operation = bulk.bulk_delete(&mut products).await;
    finish(bulk, progress, operation).await
}

/// Apply the same changes to every listed product.
pub async fn update(ids: Vec<ProductId>, changes: UpdateArgs) -> Result<(), CommandError> {
    let patch = changes.into_data()?;
    let (config, service) = connect()?;
    let mut products = ProductsStore::new(service, config.page_size);
    let mut bulk = selection(ids, ".");

    let progress = log_progress(bulk.subscribe());
    let operation = bulk.bulk_update(&mut products, &patch).await;
    finish(bulk, progress, operation).await
}

/// Export the listed products into `out_dir`.
///
/// Only products on the first listing page (up to the maximum page size)
/// can be exported; ids beyond it are reported and skipped.
pub async fn export(
    ids: Vec<ProductId>,
    format: ExportFormat,
    out_dir: PathBuf,
) -> Result<(), CommandError> {
    let (_, service) = connect()?;
    let mut products: ProductsStore<ProductService> = ProductsStore::new(service, MAX_PAGE_SIZE);
    products.fetch_products(1).await;
    if let Some(error) = products.error() {
        return Err(CommandError::Request(error.to_string()));
    }

    let missing: Vec<&ProductId> = ids
        .iter()
        .filter(|id| !products.products().iter().any(|p| &p.id == *id))
        .collect();
    if !missing.is_empty() {
        warn!(?missing, "Some products were not found and will not be exported");
    }

    let mut bulk = selection(ids, out_dir);
    let progress = log_progress(bulk.subscribe());
    let operation = bulk.bulk_export(&products, format).await;
    finish(bulk, progress, operation).await
}

fn selection(ids: Vec<ProductId>, out_dir: impl Into<PathBuf>) -> BulkOperationsStore {
    let mut bulk = BulkOperationsStore::new(TracingNotifier, DirectorySink::new(out_dir));
    bulk.toggle_select_mode();
    for id in ids {
        bulk.select_item(id);
    }
    bulk
}

/// Log each progress snapshot until the store is dropped.
fn log_progress(mut rx: broadcast::Receiver<BulkOperation>) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(operation) => info!(
                    "[{}] {} {:.1}% ({}/{})",
                    operation.kind(),
                    operation.status(),
                    operation.progress(),
                    operation.processed_items(),
                    operation.items().len()
                ),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Progress updates skipped");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    })
}

async fn finish(
    bulk: BulkOperationsStore,
    progress: JoinHandle<()>,
    operation: Option<BulkOperation>,
) -> Result<(), CommandError> {
    // Closing the channel ends the progress task
    drop(bulk);
    if let Err(e) = progress.await {
        warn!(error = %e, "Progress logger stopped unexpectedly");
    }

    let operation = operation
        .ok_or_else(|| CommandError::InvalidArguments("No products selected".to_string()))?;

    if operation.status() == OperationStatus::Failed {
        return Err(CommandError::BulkFailed {
            kind: operation.kind().to_string(),
            processed: operation.processed_items(),
            total: operation.items().len(),
            message: operation.error().unwrap_or("Unknown error").to_string(),
        });
    }

    info!(operation_id = %operation.id(), "Bulk {} completed", operation.kind());
    Ok(())
}
