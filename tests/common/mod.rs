#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use freshmart_invoicing::{
    CatalogEntry, CatalogId, DocumentExporter, InventoryService, Invoice, InvoiceNumber, Money, NewCatalogItem,
    ServiceError,
};
use rust_decimal::Decimal;

pub fn groceries() -> Vec<CatalogEntry> {
    vec![
        CatalogEntry::new(1, "Apples", Money::new(Decimal::new(1000, 2)), 20),
        CatalogEntry::new(2, "Milk", Money::new(Decimal::new(5500, 2)), 3),
    ]
}

#[derive(Default)]
struct InventoryState {
    catalog: Mutex<Vec<CatalogEntry>>,
    invoices: Mutex<Vec<Invoice>>,
    fail_fetch: AtomicBool,
    fail_create: AtomicBool,
}

/// In-memory inventory service. Saving an invoice takes the sold units out of server stock.
#[derive(Clone, Default)]
pub struct FakeInventory {
    state: Arc<InventoryState>,
}

impl FakeInventory {
    pub fn with_catalog(entries: Vec<CatalogEntry>) -> Self {
        let fake = Self::default();
        *fake.state.catalog.lock().unwrap() = entries;
        fake
    }

    pub fn set_stock(&self, id: u64, stock: u32) {
        let mut catalog = self.state.catalog.lock().unwrap();
        if let Some(entry) = catalog.iter_mut().find(|e| e.id == CatalogId::new(id)) {
            entry.available_stock = stock;
        }
    }

    pub fn server_catalog(&self) -> Vec<CatalogEntry> { self.state.catalog.lock().unwrap().clone() }
    pub fn invoices(&self) -> Vec<Invoice> { self.state.invoices.lock().unwrap().clone() }
    pub fn fail_fetch(&self, fail: bool) { self.state.fail_fetch.store(fail, Ordering::SeqCst) }
    pub fn fail_create(&self, fail: bool) { self.state.fail_create.store(fail, Ordering::SeqCst) }
}

#[async_trait]
impl InventoryService for FakeInventory {
    async fn fetch_catalog(&self) -> Result<Vec<CatalogEntry>, ServiceError> {
        if self.state.fail_fetch.load(Ordering::SeqCst) {
            return Err(ServiceError::Fetch("connection refused".into()));
        }
        Ok(self.server_catalog())
    }

    async fn create_catalog_entry(&self, item: &NewCatalogItem) -> Result<CatalogEntry, ServiceError> {
        if self.state.fail_create.load(Ordering::SeqCst) {
            return Err(ServiceError::Create("Item already exists".into()));
        }
        let mut catalog = self.state.catalog.lock().unwrap();
        let id = catalog.iter().map(|e| e.id.value()).max().unwrap_or(0) + 1;
        let stock = u32::try_from(item.stock).map_err(|e| ServiceError::Create(e.to_string()))?;
        let entry = CatalogEntry::new(id, item.name.clone(), Money::new(item.price), stock);
        catalog.push(entry.clone());
        Ok(entry)
    }

    async fn create_invoice(&self, invoice: &Invoice) -> Result<(), ServiceError> {
        if self.state.fail_create.load(Ordering::SeqCst) {
            return Err(ServiceError::Create("Failed to create invoice".into()));
        }
        let mut catalog = self.state.catalog.lock().unwrap();
        for line in invoice.lines() {
            if let Some(entry) = catalog.iter_mut().find(|e| e.id == line.catalog_id) {
                entry.available_stock -= line.quantity;
            }
        }
        self.state.invoices.lock().unwrap().push(invoice.clone());
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct RecordingExporter {
    exported: Arc<Mutex<Vec<InvoiceNumber>>>,
}

impl RecordingExporter {
    pub fn exported(&self) -> Vec<InvoiceNumber> { self.exported.lock().unwrap().clone() }
}

impl DocumentExporter for RecordingExporter {
    fn export_document(&self, invoice: &Invoice) {
        self.exported.lock().unwrap().push(invoice.invoice_number());
    }
}
