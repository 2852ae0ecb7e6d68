//! Invoice desk: the thin edge between the session engine and its collaborators.
//!
//! Cart edits are optimistic and local-only. Item creation and invoice saving
//! wait for the inventory service to confirm before anything changes locally,
//! so a failed call leaves the session exactly as it was.

use crate::domain::aggregates::{CartLine, CatalogEntry, Customer, Invoice, InvoiceSession, InvoiceTotals};
use crate::domain::events::{CartEvent, CatalogEvent, DomainEvent, InvoiceEvent};
use crate::domain::value_objects::CatalogId;
use crate::services::{DocumentExporter, InventoryService, NewCatalogItem};
use crate::{InvoicingError, Result};

pub const FETCH_ERROR_MESSAGE: &str = "Error fetching grocery items. Please try again.";

pub struct InvoiceDesk<S, D> {
    session: InvoiceSession,
    inventory: S,
    exporter: D,
    last_error: Option<String>,
}

impl<S: InventoryService, D: DocumentExporter> InvoiceDesk<S, D> {
    /// Desk with an empty catalog. Call [`load_catalog`](Self::load_catalog) to populate it.
    pub fn new(inventory: S, exporter: D) -> Self {
        Self { session: InvoiceSession::new(vec![]), inventory, exporter, last_error: None }
    }

    /// Create a desk and fetch the catalog. A failed fetch is recorded in
    /// [`last_error`](Self::last_error) and the desk starts with an empty catalog.
    pub async fn open(inventory: S, exporter: D) -> Self {
        let mut desk = Self::new(inventory, exporter);
        if let Err(e) = desk.load_catalog().await {
            tracing::warn!(error = %e, "starting with an empty catalog");
        }
        desk
    }

    pub fn session(&self) -> &InvoiceSession { &self.session }
    pub fn last_error(&self) -> Option<&str> { self.last_error.as_deref() }
    pub fn totals(&self) -> InvoiceTotals { self.session.totals() }

    pub async fn load_catalog(&mut self) -> Result<usize> {
        match self.inventory.fetch_catalog().await {
            Ok(entries) => {
                let count = entries.len();
                self.session.replace_catalog(entries);
                self.last_error = None;
                self.log_events();
                Ok(count)
            }
            Err(e) => {
                tracing::error!(error = %e, "Error fetching grocery items");
                self.last_error = Some(FETCH_ERROR_MESSAGE.to_string());
                Err(e.into())
            }
        }
    }

    /// Validate locally, ask the inventory service to create the item, and
    /// merge the confirmed entry into the catalog mirror.
    pub async fn create_catalog_item(&mut self, item: NewCatalogItem) -> Result<CatalogEntry> {
        let item = item.validated();
        let item = self.record(item)?;
        let created = self.inventory.create_catalog_entry(&item).await.map_err(InvoicingError::from);
        let entry = self.record(created)?;
        self.session.merge_new_catalog_entry(entry.clone());
        self.log_events();
        Ok(entry)
    }

    pub fn select_item(&mut self, catalog_id: CatalogId) -> Result<CatalogEntry> {
        Ok(self.session.select_item(catalog_id)?.clone())
    }

    pub fn add_selected(&mut self, quantity: u32) -> Result<CartLine> {
        let line = self.session.add_selected(quantity)?.clone();
        self.log_events();
        Ok(line)
    }

    pub fn add_to_cart(&mut self, catalog_id: CatalogId, quantity: u32) -> Result<CartLine> {
        let line = self.session.add_to_cart(catalog_id, quantity)?.clone();
        self.log_events();
        Ok(line)
    }

    pub fn update_quantity(&mut self, catalog_id: CatalogId, quantity: u32) -> Result<CartLine> {
        let line = self.session.update_quantity(catalog_id, quantity)?.clone();
        self.log_events();
        Ok(line)
    }

    pub fn remove_from_cart(&mut self, catalog_id: CatalogId) -> Option<CartLine> {
        let removed = self.session.remove_from_cart(catalog_id);
        self.log_events();
        removed
    }

    pub fn set_customer(&mut self, customer: Customer) { self.session.set_customer(customer); }

    /// Persist the invoice, export its document, then start a fresh invoice.
    pub async fn save_invoice(&mut self) -> Result<Invoice> {
        let invoice = self.session.build_invoice().map_err(InvoicingError::from);
        let invoice = self.record(invoice)?;
        let created = self.inventory.create_invoice(&invoice).await.map_err(InvoicingError::from);
        self.record(created)?;

        self.exporter.export_document(&invoice);
        self.session.complete_invoice(&invoice);
        self.log_events();
        if let Err(e) = self.load_catalog().await {
            tracing::warn!(error = %e, "invoice saved but catalog refresh failed");
        }
        Ok(invoice)
    }

    /// Discard the cart and customer, refetch the catalog and take a new invoice number.
    /// The cart is cleared even when the refetch fails.
    pub async fn reset(&mut self) -> Result<()> {
        self.last_error = None;
        let fetched = self.inventory.fetch_catalog().await;
        let result = match fetched {
            Ok(entries) => {
                self.session.reset_session(entries);
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, "Error fetching grocery items");
                self.session.start_over();
                self.last_error = Some(FETCH_ERROR_MESSAGE.to_string());
                Err(e.into())
            }
        };
        self.log_events();
        result
    }

    fn record<T>(&mut self, result: Result<T>) -> Result<T> {
        match &result {
            Ok(_) => self.last_error = None,
            Err(e) => {
                tracing::error!(error = %e, "invoice desk request failed");
                self.last_error = Some(format!("Error: {e}"));
            }
        }
        result
    }

    fn log_events(&mut self) {
        for event in self.session.take_events() {
            match event {
                DomainEvent::Cart(CartEvent::ItemAdded { catalog_id, quantity, line_quantity }) => {
                    tracing::info!(%catalog_id, quantity, line_quantity, "item added to cart")
                }
                DomainEvent::Cart(CartEvent::QuantityUpdated { catalog_id, from, to }) => {
                    tracing::info!(%catalog_id, from, to, "cart quantity updated")
                }
                DomainEvent::Cart(CartEvent::ItemRemoved { catalog_id, restocked }) => {
                    tracing::info!(%catalog_id, restocked, "item removed from cart")
                }
                DomainEvent::Cart(CartEvent::Cleared { lines }) => tracing::info!(lines, "cart cleared"),
                DomainEvent::Catalog(CatalogEvent::Replaced { entries }) => tracing::info!(entries, "catalog loaded"),
                DomainEvent::Catalog(CatalogEvent::EntryMerged { catalog_id }) => {
                    tracing::info!(%catalog_id, "grocery item added to catalog")
                }
                DomainEvent::Invoice(InvoiceEvent::Saved { invoice_number, total }) => {
                    tracing::info!(%invoice_number, %total, "invoice saved")
                }
            }
        }
    }
}
