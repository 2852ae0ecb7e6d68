mod common;

use common::{groceries, FakeInventory, RecordingExporter};
use freshmart_invoicing::desk::FETCH_ERROR_MESSAGE;
use freshmart_invoicing::{
    CartError, CatalogId, Customer, InvoiceDesk, InvoiceError, InvoicingError, NewCatalogItem, ServiceError,
};
use rust_decimal::Decimal;

const APPLES: CatalogId = CatalogId::new(1);
const MILK: CatalogId = CatalogId::new(2);

fn customer() -> Customer {
    Customer { name: "Asha Rao".into(), phone: "9876543210".into(), address: "12 MG Road".into() }
}

async fn desk() -> (InvoiceDesk<FakeInventory, RecordingExporter>, FakeInventory, RecordingExporter) {
    let inventory = FakeInventory::with_catalog(groceries());
    let exporter = RecordingExporter::default();
    let desk = InvoiceDesk::open(inventory.clone(), exporter.clone()).await;
    (desk, inventory, exporter)
}

fn stock(desk: &InvoiceDesk<FakeInventory, RecordingExporter>, id: CatalogId) -> u32 {
    desk.session().catalog().available(id).unwrap()
}

#[tokio::test]
async fn test_open_loads_catalog() {
    let (desk, _, _) = desk().await;
    assert_eq!(desk.session().catalog().len(), 2);
    assert!(desk.last_error().is_none());
}

#[tokio::test]
async fn test_open_with_failed_fetch_surfaces_error() {
    let inventory = FakeInventory::with_catalog(groceries());
    inventory.fail_fetch(true);
    let mut desk = InvoiceDesk::open(inventory.clone(), RecordingExporter::default()).await;
    assert!(desk.session().catalog().is_empty());
    assert_eq!(desk.last_error(), Some(FETCH_ERROR_MESSAGE));

    inventory.fail_fetch(false);
    assert_eq!(desk.load_catalog().await.unwrap(), 2);
    assert!(desk.last_error().is_none());
}

#[tokio::test]
async fn test_failed_refresh_keeps_catalog() {
    let (mut desk, inventory, _) = desk().await;
    desk.add_to_cart(APPLES, 4).unwrap();
    inventory.fail_fetch(true);
    let err = desk.load_catalog().await.unwrap_err();
    assert!(matches!(err, InvoicingError::Service(ServiceError::Fetch(_))));
    assert_eq!(stock(&desk, APPLES), 16);
    assert_eq!(desk.session().cart().quantity_of(APPLES), 4);
}

#[tokio::test]
async fn test_create_item_is_server_confirmed() {
    let (mut desk, inventory, _) = desk().await;

    let err = desk.create_catalog_item(NewCatalogItem::new(" ", Decimal::ONE, 1)).await.unwrap_err();
    assert!(matches!(err, InvoicingError::InvalidItem(_)));
    assert_eq!(desk.last_error(), Some("Error: Name is required"));
    assert_eq!(inventory.server_catalog().len(), 2);

    inventory.fail_create(true);
    let err = desk.create_catalog_item(NewCatalogItem::new("Bread", Decimal::new(45, 0), 10)).await.unwrap_err();
    assert!(matches!(err, InvoicingError::Service(ServiceError::Create(_))));
    assert_eq!(desk.last_error(), Some("Error: Item already exists"));
    assert_eq!(desk.session().catalog().len(), 2);

    inventory.fail_create(false);
    let entry = desk.create_catalog_item(NewCatalogItem::new(" Bread ", Decimal::new(45, 0), 10)).await.unwrap();
    assert_eq!(entry.name, "Bread");
    assert_eq!(desk.session().catalog().len(), 3);
    assert_eq!(stock(&desk, entry.id), 10);
    assert!(desk.last_error().is_none());
}

#[tokio::test]
async fn test_cart_edits_are_local_and_optimistic() {
    let (mut desk, inventory, _) = desk().await;
    desk.add_to_cart(APPLES, 3).unwrap();
    desk.update_quantity(APPLES, 5).unwrap();
    desk.add_to_cart(MILK, 3).unwrap();
    assert_eq!(stock(&desk, APPLES), 15);
    assert_eq!(stock(&desk, MILK), 0);
    assert_eq!(inventory.server_catalog(), groceries());

    let err = desk.add_to_cart(MILK, 1).unwrap_err();
    assert!(matches!(err, InvoicingError::Cart(CartError::InvalidQuantity { requested: 1, available: 0 })));
    assert!(desk.remove_from_cart(CatalogId::new(99)).is_none());
    assert_eq!(desk.remove_from_cart(MILK).map(|l| l.quantity), Some(3));
    assert_eq!(stock(&desk, MILK), 3);
}

#[tokio::test]
async fn test_select_then_add() {
    let (mut desk, _, _) = desk().await;
    assert!(matches!(desk.add_selected(1), Err(InvoicingError::Cart(CartError::NoSelection))));
    desk.select_item(MILK).unwrap();
    let line = desk.add_selected(2).unwrap();
    assert_eq!(line.line_total().amount(), Decimal::new(110, 0));
    assert!(desk.session().selected_item().is_none());
}

#[tokio::test]
async fn test_save_invoice_persists_exports_and_resets() {
    let (mut desk, inventory, exporter) = desk().await;
    desk.add_to_cart(APPLES, 3).unwrap();
    desk.set_customer(customer());
    let number = desk.session().invoice_number();

    let invoice = desk.save_invoice().await.unwrap();
    assert_eq!(invoice.invoice_number(), number);
    assert_eq!(invoice.totals().total.amount(), Decimal::new(3540, 2));
    assert_eq!(inventory.invoices().len(), 1);
    assert_eq!(exporter.exported(), vec![number]);

    assert!(desk.session().cart().is_empty());
    assert_eq!(desk.session().customer(), &Customer::default());
    assert_ne!(desk.session().invoice_number(), number);
    assert_eq!(stock(&desk, APPLES), 17);
}

#[tokio::test]
async fn test_save_invoice_validates_before_calling_out() {
    let (mut desk, inventory, exporter) = desk().await;
    let err = desk.save_invoice().await.unwrap_err();
    assert!(matches!(err, InvoicingError::Invoice(InvoiceError::EmptyCart)));

    desk.add_to_cart(APPLES, 1).unwrap();
    let err = desk.save_invoice().await.unwrap_err();
    assert!(matches!(err, InvoicingError::Invoice(InvoiceError::InvalidCustomer(_))));
    assert!(inventory.invoices().is_empty());
    assert!(exporter.exported().is_empty());
}

#[tokio::test]
async fn test_failed_save_leaves_state_untouched() {
    let (mut desk, inventory, exporter) = desk().await;
    desk.add_to_cart(APPLES, 3).unwrap();
    desk.set_customer(customer());
    let number = desk.session().invoice_number();
    inventory.fail_create(true);

    let err = desk.save_invoice().await.unwrap_err();
    assert!(matches!(err, InvoicingError::Service(ServiceError::Create(_))));
    assert_eq!(desk.last_error(), Some("Error: Failed to create invoice"));
    assert_eq!(desk.session().cart().quantity_of(APPLES), 3);
    assert_eq!(stock(&desk, APPLES), 17);
    assert_eq!(desk.session().invoice_number(), number);
    assert!(exporter.exported().is_empty());
}

#[tokio::test]
async fn test_reset_replaces_catalog_with_fresh_fetch() {
    let (mut desk, inventory, _) = desk().await;
    desk.add_to_cart(APPLES, 3).unwrap();
    desk.set_customer(customer());
    let number = desk.session().invoice_number();
    inventory.set_stock(1, 8);

    desk.reset().await.unwrap();
    assert!(desk.session().cart().is_empty());
    assert_eq!(desk.session().catalog().entries(), inventory.server_catalog().as_slice());
    assert_eq!(stock(&desk, APPLES), 8);
    assert_eq!(desk.session().customer(), &Customer::default());
    assert!(desk.session().invoice_number() > number);
}

#[tokio::test]
async fn test_reset_with_failed_fetch_still_clears_cart() {
    let (mut desk, inventory, _) = desk().await;
    desk.add_to_cart(APPLES, 3).unwrap();
    inventory.fail_fetch(true);

    assert!(desk.reset().await.is_err());
    assert!(desk.session().cart().is_empty());
    assert_eq!(stock(&desk, APPLES), 20);
    assert_eq!(desk.last_error(), Some(FETCH_ERROR_MESSAGE));
}
