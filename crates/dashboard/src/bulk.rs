//! Selection and bulk operations over the product listing.
//!
//! A bulk action snapshots the current selection into a [`BulkOperation`]
//! and drives it through its state machine:
//!
//! - delete/update call the API once per selected id, strictly in selection
//!   order, stopping at the first failure
//! - export encodes the selected products of the loaded page and hands the
//!   artifact to an [`ArtifactSink`]
//!
//! Every state or progress change is published on a broadcast channel as a
//! snapshot of the operation. When an operation ends, a [`Notification`] is
//! sent; successful delete/update runs also clear the selection and reload
//! the first page of the listing.

use chrono::Utc;
use indexmap::IndexSet;
use tokio::sync::broadcast;
use tracing::{info, instrument, warn};
use vitrine_core::{
    BulkOperation, ExportArtifact, ExportFormat, OperationId, OperationKind, Product, ProductId,
    UpdateProductData,
};

use crate::download::ArtifactSink;
use crate::error::DashboardError;
use crate::notify::{Notification, Notifier};
use crate::products::ProductsStore;
use crate::service::ProductApi;

/// Capacity of the progress broadcast channel.
const PROGRESS_CHANNEL_CAPACITY: usize = 100;

/// Per-item API call made by delete/update operations.
enum Mutation<'a> {
    Delete,
    Update(&'a UpdateProductData),
}

impl Mutation<'_> {
    const fn kind(&self) -> OperationKind {
        match self {
            Self::Delete => OperationKind::Delete,
            Self::Update(_) => OperationKind::Update,
        }
    }

    /// Notification titles for success and failure.
    const fn titles(&self) -> (&'static str, &'static str) {
        match self {
            Self::Delete => ("Products deleted", "Bulk delete failed"),
            Self::Update(_) => ("Products updated", "Bulk update failed"),
        }
    }
}

/// Selection state plus the history of bulk operations.
pub struct BulkOperationsStore {
    selection: IndexSet<ProductId>,
    select_mode: bool,
    /// Newest first.
    operations: Vec<BulkOperation>,
    notifier: Box<dyn Notifier>,
    sink: Box<dyn ArtifactSink>,
    progress_tx: broadcast::Sender<BulkOperation>,
}

impl BulkOperationsStore {
    pub fn new(notifier: impl Notifier + 'static, sink: impl ArtifactSink + 'static) -> Self {
        let (progress_tx, _) = broadcast::channel(PROGRESS_CHANNEL_CAPACITY);
        Self {
            selection: IndexSet::new(),
            select_mode: false,
            operations: Vec::new(),
            notifier: Box::new(notifier),
            sink: Box::new(sink),
            progress_tx,
        }
    }

    /// Receive a snapshot of an operation after each of its changes.
    pub fn subscribe(&self) -> broadcast::Receiver<BulkOperation> {
        self.progress_tx.subscribe()
    }

    // Selection

    pub const fn is_select_mode(&self) -> bool {
        self.select_mode
    }

    /// Toggle select mode. Leaving it clears the selection.
    pub fn toggle_select_mode(&mut self) {
        self.select_mode = !self.select_mode;
        if !self.select_mode {
            self.clear_selection();
        }
    }

    pub fn select_item(&mut self, id: ProductId) {
        self.selection.insert(id);
    }

    pub fn deselect_item(&mut self, id: &ProductId) {
        self.selection.shift_remove(id);
    }

    pub fn toggle_item(&mut self, id: ProductId) {
        if self.selection.contains(&id) {
            self.deselect_item(&id);
        } else {
            self.select_item(id);
        }
    }

    /// Add every product in `products` to the selection.
    pub fn select_all(&mut self, products: &[Product]) {
        self.selection.extend(products.iter().map(|p| p.id.clone()));
    }

    pub fn deselect_all(&mut self) {
        self.selection.clear();
    }

    /// Clear the selection and leave select mode.
    pub fn clear_selection(&mut self) {
        self.selection.clear();
        self.select_mode = false;
    }

    pub fn is_selected(&self, id: &ProductId) -> bool {
        self.selection.contains(id)
    }

    pub fn selected_count(&self) -> usize {
        self.selection.len()
    }

    pub fn has_selection(&self) -> bool {
        !self.selection.is_empty()
    }

    /// Selected ids in selection order.
    pub const fn selected_items(&self) -> &IndexSet<ProductId> {
        &self.selection
    }

    // Operations

    pub fn operations(&self) -> &[BulkOperation] {
        &self.operations
    }

    pub fn operation(&self, id: OperationId) -> Option<&BulkOperation> {
        self.operations.iter().find(|op| op.id() == id)
    }

    /// Remove an operation from the history. Returns it if it existed.
    pub fn delete_operation(&mut self, id: OperationId) -> Option<BulkOperation> {
        let index = self.operations.iter().position(|op| op.id() == id)?;
        Some(self.operations.remove(index))
    }

    // Bulk actions

    /// Delete every selected product.
    ///
    /// Returns the finished operation, or `None` if nothing is selected.
    #[instrument(skip_all, fields(count = self.selection.len()))]
    pub async fn bulk_delete<A: ProductApi>(
        &mut self,
        products: &mut ProductsStore<A>,
    ) -> Option<BulkOperation> {
        self.run_bulk_mutation(products, Mutation::Delete).await
    }

    /// Apply `patch` to every selected product.
    ///
    /// Returns the finished operation, or `None` if nothing is selected.
    #[instrument(skip_all, fields(count = self.selection.len()))]
    pub async fn bulk_update<A: ProductApi>(
        &mut self,
        products: &mut ProductsStore<A>,
        patch: &UpdateProductData,
    ) -> Option<BulkOperation> {
        self.run_bulk_mutation(products, Mutation::Update(patch))
            .await
    }

    /// Export the selected products of the loaded page.
    ///
    /// The selection is kept. Returns the finished operation, or `None` if
    /// nothing is selected.
    #[instrument(skip_all, fields(count = self.selection.len(), format = %format))]
    pub async fn bulk_export<A: ProductApi>(
        &mut self,
        products: &ProductsStore<A>,
        format: ExportFormat,
    ) -> Option<BulkOperation> {
        let mut operation = self.create_operation(OperationKind::Export)?;

        match self.export(&mut operation, products.products(), format).await {
            Ok(count) => {
                self.publish(&operation);
                info!(operation_id = %operation.id(), count, "Export completed");
                self.notifier.notify(Notification::success(
                    "Export completed",
                    format!("{count} products exported"),
                ));
            }
            Err(e) => self.record_failure(&mut operation, &e, "Export failed"),
        }

        Some(operation)
    }

    async fn run_bulk_mutation<A: ProductApi>(
        &mut self,
        products: &mut ProductsStore<A>,
        mutation: Mutation<'_>,
    ) -> Option<BulkOperation> {
        let kind = mutation.kind();
        let mut operation = self.create_operation(kind)?;
        let total = operation.items().len();
        let (success, failure) = mutation.titles();

        match self.mutate_each(&mut operation, products, &mutation).await {
            Ok(()) => {
                self.publish(&operation);
                info!(operation_id = %operation.id(), total, "Bulk {kind} completed");
                self.clear_selection();
                products.fetch_products(1).await;
                self.notifier.notify(Notification::success(
                    success,
                    format!("{total} products processed"),
                ));
            }
            Err(e) => self.record_failure(&mut operation, &e, failure),
        }

        Some(operation)
    }

    /// Snapshot the selection into a new pending operation.
    fn create_operation(&mut self, kind: OperationKind) -> Option<BulkOperation> {
        if self.selection.is_empty() {
            return None;
        }
        let items: Vec<ProductId> = self.selection.iter().cloned().collect();
        let operation = BulkOperation::new(kind, items);
        self.operations.insert(0, operation.clone());
        self.publish(&operation);
        Some(operation)
    }

    async fn mutate_each<A: ProductApi>(
        &mut self,
        operation: &mut BulkOperation,
        products: &mut ProductsStore<A>,
        mutation: &Mutation<'_>,
    ) -> Result<(), DashboardError> {
        operation.start()?;
        self.publish(operation);

        for id in operation.items().to_vec() {
            match mutation {
                Mutation::Delete => {
                    products.delete_product(&id).await?;
                }
                Mutation::Update(patch) => {
                    products.update_product(&id, patch).await?;
                }
            }
            operation.advance()?;
            self.publish(operation);
        }

        operation.complete()?;
        Ok(())
    }

    async fn export(
        &mut self,
        operation: &mut BulkOperation,
        loaded: &[Product],
        format: ExportFormat,
    ) -> Result<usize, DashboardError> {
        operation.start()?;
        self.publish(operation);

        let selected: Vec<Product> = loaded
            .iter()
            .filter(|p| self.selection.contains(&p.id))
            .cloned()
            .collect();
        let artifact = ExportArtifact::build(&selected, format, Utc::now().date_naive())?;
        self.sink.deliver(&artifact).await?;

        operation.complete()?;
        Ok(selected.len())
    }

    fn record_failure(
        &mut self,
        operation: &mut BulkOperation,
        error: &DashboardError,
        title: &str,
    ) {
        let message = error.to_string();
        warn!(operation_id = %operation.id(), error = %message, "{title}");
        if let Err(e) = operation.fail(message.clone()) {
            warn!(operation_id = %operation.id(), error = %e, "Could not mark operation as failed");
        }
        self.publish(operation);
        self.notifier.notify(Notification::error(title, message));
    }

    /// Store the latest snapshot and broadcast it.
    fn publish(&mut self, operation: &BulkOperation) {
        if let Some(slot) = self.operations.iter_mut().find(|op| op.id() == operation.id()) {
            slot.clone_from(operation);
        }
        // No subscribers is fine
        let _ = self.progress_tx.send(operation.clone());
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::notify::NotificationLevel;
    use crate::testing::{FakeApi, MemorySink, RecordingNotifier, catalog};
    use std::sync::Arc;
    use vitrine_core::OperationStatus;

    struct Harness {
        api: Arc<FakeApi>,
        products: ProductsStore<Arc<FakeApi>>,
        bulk: BulkOperationsStore,
        notifier: RecordingNotifier,
        sink: MemorySink,
    }

    async fn harness() -> Harness {
        let api = Arc::new(FakeApi::new(catalog()));
        let mut products = ProductsStore::new(Arc::clone(&api), 12);
        products.fetch_products(1).await;
        api.clear_calls();
        let notifier = RecordingNotifier::default();
        let sink = MemorySink::default();
        let bulk = BulkOperationsStore::new(notifier.clone(), sink.clone());
        Harness {
            api,
            products,
            bulk,
            notifier,
            sink,
        }
    }

    fn ids(ids: &[&str]) -> Vec<ProductId> {
        ids.iter().map(|id| ProductId::new(*id)).collect()
    }

    #[test]
    fn test_selection_keeps_insertion_order() {
        let mut bulk =
            BulkOperationsStore::new(RecordingNotifier::default(), MemorySink::default());

        bulk.select_item(ProductId::new("3"));
        bulk.select_item(ProductId::new("1"));
        bulk.select_item(ProductId::new("3"));
        bulk.toggle_item(ProductId::new("2"));

        let selected: Vec<_> = bulk.selected_items().iter().cloned().collect();
        assert_eq!(selected, ids(&["3", "1", "2"]));
        assert_eq!(bulk.selected_count(), 3);

        bulk.toggle_item(ProductId::new("1"));
        let selected: Vec<_> = bulk.selected_items().iter().cloned().collect();
        assert_eq!(selected, ids(&["3", "2"]));
        assert!(!bulk.is_selected(&ProductId::new("1")));
    }

    #[test]
    fn test_select_mode_and_clearing() {
        let mut bulk =
            BulkOperationsStore::new(RecordingNotifier::default(), MemorySink::default());

        bulk.toggle_select_mode();
        assert!(bulk.is_select_mode());
        bulk.select_all(&catalog());
        assert_eq!(bulk.selected_count(), 3);

        bulk.deselect_all();
        assert!(!bulk.has_selection());
        assert!(bulk.is_select_mode());

        bulk.select_item(ProductId::new("1"));
        bulk.toggle_select_mode();
        assert!(!bulk.is_select_mode());
        assert!(!bulk.has_selection());

        bulk.toggle_select_mode();
        bulk.select_item(ProductId::new("1"));
        bulk.clear_selection();
        assert!(!bulk.is_select_mode());
        assert!(!bulk.has_selection());
    }

    #[tokio::test]
    async fn test_empty_selection_is_a_no_op() {
        let mut h = harness().await;

        assert!(h.bulk.bulk_delete(&mut h.products).await.is_none());
        assert!(
            h.bulk
                .bulk_update(&mut h.products, &UpdateProductData::default())
                .await
                .is_none()
        );
        assert!(
            h.bulk
                .bulk_export(&h.products, ExportFormat::Csv)
                .await
                .is_none()
        );

        assert!(h.bulk.operations().is_empty());
        assert!(h.notifier.take().is_empty());
        assert!(h.api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_bulk_delete_success() {
        let mut h = harness().await;
        h.bulk.toggle_select_mode();
        h.bulk.select_item(ProductId::new("1"));
        h.bulk.select_item(ProductId::new("2"));
        let mut rx = h.bulk.subscribe();

        let op = h.bulk.bulk_delete(&mut h.products).await.unwrap();

        assert_eq!(op.status(), OperationStatus::Completed);
        assert!((op.progress() - 100.0).abs() < f64::EPSILON);
        assert_eq!(op.processed_items(), 2);
        assert!(op.completed_at().is_some());
        assert!(op.error().is_none());

        assert!(!h.bulk.has_selection());
        assert!(!h.bulk.is_select_mode());
        assert_eq!(h.api.calls(), ["delete:1", "delete:2", "list:1"]);
        let remaining: Vec<_> = h.products.products().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(remaining, ["3"]);

        let mut progress = Vec::new();
        while let Ok(snapshot) = rx.try_recv() {
            progress.push((snapshot.status(), snapshot.progress()));
        }
        assert_eq!(
            progress,
            [
                (OperationStatus::Pending, 0.0),
                (OperationStatus::Processing, 0.0),
                (OperationStatus::Processing, 50.0),
                (OperationStatus::Processing, 100.0),
                (OperationStatus::Completed, 100.0),
            ]
        );

        let notes = h.notifier.take();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].level, NotificationLevel::Success);
        assert_eq!(notes[0].title, "Products deleted");
        assert_eq!(h.bulk.operation(op.id()), Some(&op));
    }

    #[tokio::test]
    async fn test_bulk_delete_stops_at_first_failure() {
        let mut h = harness().await;
        h.api.fail_on("2");
        for id in ["1", "2", "3"] {
            h.bulk.select_item(ProductId::new(id));
        }

        let op = h.bulk.bulk_delete(&mut h.products).await.unwrap();

        assert_eq!(op.status(), OperationStatus::Failed);
        assert!((op.progress() - 100.0 / 3.0).abs() < 1e-9);
        assert_eq!(op.processed_items(), 1);
        assert_eq!(op.error(), Some("Internal server error"));
        assert!(op.completed_at().is_some());

        assert_eq!(h.api.calls(), ["delete:1", "delete:2"]);
        assert_eq!(h.bulk.selected_count(), 3);

        let notes = h.notifier.take();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].level, NotificationLevel::Error);
        assert_eq!(notes[0].title, "Bulk delete failed");
        assert_eq!(notes[0].description, "Internal server error");
    }

    #[tokio::test]
    async fn test_bulk_delete_two_items_second_fails_at_half() {
        let mut h = harness().await;
        h.api.fail_on("2");
        h.bulk.select_item(ProductId::new("1"));
        h.bulk.select_item(ProductId::new("2"));

        let op = h.bulk.bulk_delete(&mut h.products).await.unwrap();

        assert_eq!(op.status(), OperationStatus::Failed);
        assert!((op.progress() - 50.0).abs() < f64::EPSILON);
        assert!(op.error().is_some());
    }

    #[tokio::test]
    async fn test_bulk_update_applies_patch_to_each_item() {
        let mut h = harness().await;
        h.bulk.select_item(ProductId::new("3"));
        h.bulk.select_item(ProductId::new("1"));
        let patch = UpdateProductData {
            featured: Some(true),
            ..UpdateProductData::default()
        };

        let op = h.bulk.bulk_update(&mut h.products, &patch).await.unwrap();

        assert_eq!(op.kind(), OperationKind::Update);
        assert_eq!(op.status(), OperationStatus::Completed);
        assert_eq!(h.api.calls(), ["update:3", "update:1", "list:1"]);
        let featured: Vec<_> = h.products.featured_products().map(|p| p.id.as_str()).collect();
        assert_eq!(featured, ["3", "1"]);
        let notes = h.notifier.take();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].title, "Products updated");
        assert_eq!(notes[0].description, "2 products processed");
    }

    #[tokio::test]
    async fn test_bulk_update_validation_error_fails_operation() {
        let mut h = harness().await;
        h.bulk.select_item(ProductId::new("1"));
        let patch = UpdateProductData {
            name: Some("   ".to_string()),
            ..UpdateProductData::default()
        };

        let op = h.bulk.bulk_update(&mut h.products, &patch).await.unwrap();

        assert_eq!(op.status(), OperationStatus::Failed);
        assert_eq!(op.error(), Some("Name cannot be empty"));
        assert!(op.progress().abs() < f64::EPSILON);
        let notes = h.notifier.take();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].level, NotificationLevel::Error);
        assert_eq!(notes[0].title, "Bulk update failed");
    }

    #[tokio::test]
    async fn test_bulk_export_writes_loaded_selection() {
        let mut h = harness().await;
        h.bulk.select_item(ProductId::new("3"));
        h.bulk.select_item(ProductId::new("missing"));
        h.bulk.select_item(ProductId::new("1"));

        let op = h
            .bulk
            .bulk_export(&h.products, ExportFormat::Csv)
            .await
            .unwrap();

        assert_eq!(op.kind(), OperationKind::Export);
        assert_eq!(op.status(), OperationStatus::Completed);
        assert!(h.api.calls().iter().all(|c| c.starts_with("list")));
        assert_eq!(h.bulk.selected_count(), 3);

        let artifacts = h.sink.artifacts();
        assert_eq!(artifacts.len(), 1);
        let artifact = &artifacts[0];
        assert!(artifact.filename.starts_with("produtos_"));
        assert!(artifact.filename.ends_with(".csv"));
        assert_eq!(artifact.mime_type, "text/csv");

        let csv = String::from_utf8(artifact.content.clone()).unwrap();
        let lines: Vec<_> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("\"3\""));
        assert!(lines[2].starts_with("\"1\""));

        let notes = h.notifier.take();
        assert_eq!(notes[0].description, "2 products exported");
    }

    #[tokio::test]
    async fn test_bulk_export_sink_failure_fails_operation() {
        let mut h = harness().await;
        h.sink.fail_with("disk full");
        h.bulk.select_item(ProductId::new("1"));

        let op = h
            .bulk
            .bulk_export(&h.products, ExportFormat::Json)
            .await
            .unwrap();

        assert_eq!(op.status(), OperationStatus::Failed);
        assert_eq!(op.error(), Some("Download failed: disk full"));
    }

    #[tokio::test]
    async fn test_operations_are_listed_newest_first_and_deletable() {
        let mut h = harness().await;
        h.bulk.select_item(ProductId::new("1"));
        let first = h
            .bulk
            .bulk_export(&h.products, ExportFormat::Csv)
            .await
            .unwrap();
        let second = h
            .bulk
            .bulk_export(&h.products, ExportFormat::Json)
            .await
            .unwrap();

        let listed: Vec<_> = h.bulk.operations().iter().map(BulkOperation::id).collect();
        assert_eq!(listed, [second.id(), first.id()]);

        assert!(h.bulk.delete_operation(first.id()).is_some());
        assert!(h.bulk.delete_operation(first.id()).is_none());
        assert_eq!(h.bulk.operations().len(), 1);
    }
}
