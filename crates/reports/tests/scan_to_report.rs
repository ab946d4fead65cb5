//! End-to-end flow across the core crates: a scanner burst identifies a
//! product, the sale is checked against availability, the store records it,
//! and history plus the branch dashboard are derived from the new snapshot.

use chrono::{DateTime, Duration, TimeZone, Utc};

use stockbook_core::{DomainError, ProductId, SaleId};
use stockbook_inventory::{
    Classifier, InMemoryLedgerStore, LedgerScope, LedgerStore, NewMovement, OperationType, project,
};
use stockbook_products::{Catalog, ComponentRequirement, Product};
use stockbook_reports::{ReportInputs, ReportScope, ReportsConfig, Sale, SaleRecord, summarize};
use stockbook_scanner::{KeyEvent, ScanDecoder, ScannerConfig};

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 9, 2, 11, 0, 0).unwrap()
}

fn burst(code: &str, start: DateTime<Utc>) -> Vec<KeyEvent> {
    let mut events: Vec<KeyEvent> = code
        .chars()
        .enumerate()
        .map(|(i, c)| KeyEvent::new(c.to_string(), start + Duration::milliseconds(i as i64 * 20)))
        .collect();
    events.push(KeyEvent::new(
        "Enter",
        start + Duration::milliseconds(code.len() as i64 * 20),
    ));
    events
}

#[test]
fn scanned_sale_flows_into_history_and_dashboard() {
    let charger = Product::simple(ProductId::new(), "USB charger", 5)
        .with_barcode("4600000000017")
        .with_branch("Central")
        .with_cost_price(600);
    let catalog = Catalog::new(vec![charger.clone()]);
    let store = InMemoryLedgerStore::with_opening_stock(&catalog);

    let mut decoder = ScanDecoder::detached(ScannerConfig::default());
    let scans = decoder.feed(&burst("4600000000017", t0()));
    assert_eq!(scans.len(), 1);

    let product = catalog.find_by_code(&scans[0].code).expect("scanned product is in catalog");
    assert_eq!(product.id, charger.id);

    let request = NewMovement::outgoing(product.id, 2)
        .with_operation(OperationType::Sale)
        .with_branch("Central")
        .with_reason("Sale #501")
        .by("Ira");
    request.validate(&catalog).expect("enough stock");
    store.append(request, scans[0].scanned_at).expect("store accepts sale");

    // A second, oversized request is stopped before it reaches the store.
    let too_many = NewMovement::outgoing(product.id, 6);
    assert!(matches!(
        too_many.validate(&catalog),
        Err(DomainError::InsufficientStock { requested: 6, available: 5 })
    ));

    let history = store.list(&LedgerScope::for_product(product.id)).unwrap();
    let views = project(&history, &Classifier::default());
    assert_eq!(views.len(), 1);
    assert_eq!(views[0].operation, OperationType::Sale);
    assert_eq!(views[0].signed_quantity, "-2");
    assert_eq!(views[0].stock_after, 3);

    // Catalog refreshed by the external store after the write.
    let refreshed = Catalog::new(vec![Product {
        stock_qty: store.current_stock(&product.id).unwrap(),
        ..charger.clone()
    }]);
    let sales = vec![Sale::from(SaleRecord {
        id: Some(SaleId::new()),
        product_id: Some(charger.id),
        branch_name: Some("Central".to_string()),
        manager_name: Some("Ira".to_string()),
        quantity: Some(2),
        total: Some(2000),
        cost_snapshot: Some(600),
        staff_earnings: Some(100),
        created_at: Some(t0()),
        ..SaleRecord::default()
    })];

    let summary = summarize(
        &ReportScope::branch("Central"),
        &ReportInputs {
            catalog: &refreshed,
            sales: &sales,
            movements: &history,
            expenses: &[],
            bonuses: &[],
        },
        &ReportsConfig::default(),
    );

    assert_eq!(summary.revenue, 2000);
    assert_eq!(summary.profit, 2000 - 1200 - 100);
    assert_eq!(summary.low_stock_count, 1);
    assert_eq!(summary.movements.units_out, 2);
}

#[test]
fn typed_digits_do_not_trigger_a_lookup() {
    let mut decoder = ScanDecoder::detached(ScannerConfig::default());
    // Human typing: ~150ms between keys.
    let events: Vec<KeyEvent> = "4600000000017"
        .chars()
        .enumerate()
        .map(|(i, c)| KeyEvent::new(c.to_string(), t0() + Duration::milliseconds(i as i64 * 150)))
        .chain(std::iter::once(KeyEvent::new("Enter", t0() + Duration::seconds(3))))
        .collect();

    assert!(decoder.feed(&events).is_empty());
}

#[test]
fn bundle_sale_is_limited_by_components() {
    let cable = Product::simple(ProductId::new(), "cable", 3).with_branch("Central");
    let adapter = Product::simple(ProductId::new(), "adapter", 10).with_branch("Central");
    let kit = Product::composite(
        ProductId::new(),
        "travel kit",
        vec![
            ComponentRequirement::new(cable.id, 1),
            ComponentRequirement::new(adapter.id, 2),
        ],
    )
    .with_barcode("KIT-0001")
    .with_branch("Central");
    let (cable_id, adapter_id) = (cable.id, adapter.id);
    let catalog = Catalog::new(vec![cable, adapter, kit]);
    let store = InMemoryLedgerStore::with_opening_stock(&catalog);

    let found = catalog.find_by_code("KIT-0001").unwrap();
    assert_eq!(catalog.available(&found.id), 3);
    assert!(NewMovement::outgoing(found.id, 4).validate(&catalog).is_err());

    let sale = NewMovement::outgoing(found.id, 3).with_operation(OperationType::Sale);
    sale.validate(&catalog).expect("bundle availability covers the sale");
    let written = store.append(sale, t0()).expect("store accepts what validation accepted");
    assert_eq!(written.stock_after, 0);
    assert_eq!(store.current_stock(&cable_id).unwrap(), 0);
    assert_eq!(store.current_stock(&adapter_id).unwrap(), 4);

    let history = store.list(&LedgerScope::all()).unwrap();
    let views = project(&history, &Classifier::default());
    assert_eq!(views.len(), 3);
    assert!(views.iter().all(|v| v.operation == OperationType::Sale));

    assert!(matches!(
        store.append(NewMovement::outgoing(found.id, 1), t0()),
        Err(DomainError::InsufficientStock { requested: 1, available: 0 })
    ));
}
