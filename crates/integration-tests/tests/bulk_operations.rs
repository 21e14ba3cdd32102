//! Bulk operations end to end.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use vitrine_core::{ExportFormat, OperationKind, OperationStatus, ProductId, UpdateProductData};
use vitrine_dashboard::{
    BulkOperationsStore, DirectorySink, ProductService, ProductsStore, TracingNotifier,
};
use vitrine_integration_tests::TestServer;

fn stores(
    server: &TestServer,
    out_dir: &std::path::Path,
) -> (ProductsStore<ProductService>, BulkOperationsStore) {
    (
        ProductsStore::new(server.service(), 12),
        BulkOperationsStore::new(TracingNotifier, DirectorySink::new(out_dir)),
    )
}

fn select(bulk: &mut BulkOperationsStore, ids: &[&str]) {
    for id in ids {
        bulk.select_item(ProductId::new(*id));
    }
}

#[tokio::test]
async fn test_bulk_delete_removes_products_and_refreshes_listing() {
    let server = TestServer::spawn().await;
    let tmp = tempfile::tempdir().unwrap();
    let (mut products, mut bulk) = stores(&server, tmp.path());
    products.fetch_products(1).await;
    select(&mut bulk, &["1", "2"]);
    let mut rx = bulk.subscribe();

    let op = bulk.bulk_delete(&mut products).await.unwrap();

    assert_eq!(op.status(), OperationStatus::Completed);
    assert!((op.progress() - 100.0).abs() < f64::EPSILON);
    assert!(!bulk.has_selection());
    assert_eq!(server.repository.len().await, 10);
    assert_eq!(products.pagination().total_items, 10);
    assert!(products.products().iter().all(|p| p.id.as_str() != "1"));

    let mut last_progress = -1.0;
    while let Ok(snapshot) = rx.try_recv() {
        assert!(snapshot.progress() >= last_progress);
        last_progress = snapshot.progress();
    }
    assert!((last_progress - 100.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_bulk_delete_stops_at_missing_product() {
    let server = TestServer::spawn().await;
    let tmp = tempfile::tempdir().unwrap();
    let (mut products, mut bulk) = stores(&server, tmp.path());
    select(&mut bulk, &["1", "missing", "3"]);

    let op = bulk.bulk_delete(&mut products).await.unwrap();

    assert_eq!(op.status(), OperationStatus::Failed);
    assert_eq!(op.processed_items(), 1);
    assert!((op.progress() - 100.0 / 3.0).abs() < 1e-9);
    assert_eq!(op.error(), Some("Product not found"));
    assert!(op.completed_at().is_some());

    assert!(server.repository.get(&ProductId::new("1")).await.is_err());
    assert!(server.repository.get(&ProductId::new("3")).await.is_ok());
    assert_eq!(bulk.selected_count(), 3);
}

#[tokio::test]
async fn test_bulk_update_applies_patch() {
    let server = TestServer::spawn().await;
    let tmp = tempfile::tempdir().unwrap();
    let (mut products, mut bulk) = stores(&server, tmp.path());
    select(&mut bulk, &["3", "4"]);
    let patch = UpdateProductData {
        featured: Some(true),
        stock: Some(0),
        ..UpdateProductData::default()
    };

    let op = bulk.bulk_update(&mut products, &patch).await.unwrap();

    assert_eq!(op.kind(), OperationKind::Update);
    assert_eq!(op.status(), OperationStatus::Completed);
    for id in ["3", "4"] {
        let product = server.repository.get(&ProductId::new(id)).await.unwrap();
        assert!(product.featured);
        assert_eq!(product.stock, 0);
    }
    assert_eq!(bulk.operations().len(), 1);
}

#[tokio::test]
async fn test_bulk_export_writes_json_file() {
    let server = TestServer::spawn().await;
    let tmp = tempfile::tempdir().unwrap();
    let (mut products, mut bulk) = stores(&server, tmp.path());
    products.fetch_products(1).await;
    select(&mut bulk, &["5", "9"]);

    let op = bulk
        .bulk_export(&products, ExportFormat::Json)
        .await
        .unwrap();

    assert_eq!(op.status(), OperationStatus::Completed);
    assert_eq!(bulk.selected_count(), 2);
    assert_eq!(server.repository.len().await, 12);

    let files: Vec<_> = std::fs::read_dir(tmp.path())
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .collect();
    assert_eq!(files.len(), 1);
    let name = files[0].file_name().unwrap().to_str().unwrap().to_string();
    assert!(name.starts_with("produtos_"));
    assert!(name.ends_with(".json"));

    let exported: serde_json::Value =
        serde_json::from_slice(&std::fs::read(&files[0]).unwrap()).unwrap();
    let mut ids: Vec<_> = exported
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_str().unwrap().to_string())
        .collect();
    ids.sort();
    assert_eq!(ids, ["5", "9"]);
}

#[tokio::test]
async fn test_bulk_export_csv_has_header_row() {
    let server = TestServer::spawn().await;
    let tmp = tempfile::tempdir().unwrap();
    let (mut products, mut bulk) = stores(&server, tmp.path());
    products.fetch_products(1).await;
    select(&mut bulk, &["3"]);

    bulk.bulk_export(&products, ExportFormat::Csv).await.unwrap();

    let entry = std::fs::read_dir(tmp.path()).unwrap().next().unwrap().unwrap();
    let csv = std::fs::read_to_string(entry.path()).unwrap();
    let mut lines = csv.lines();
    assert_eq!(
        lines.next(),
        Some(concat!(
            r#""ID","Nome","Descrição","Preço","#,
            r#""Categoria","Estoque","Destaque","Avaliação""#,
        ))
    );
    let row = lines.next().unwrap();
    assert!(row.starts_with("\"3\",\"Camiseta Premium\""));
    assert!(row.contains("\"89.99\""));
    assert!(row.contains("\"Não\""));
    assert!(lines.next().is_none());
}
