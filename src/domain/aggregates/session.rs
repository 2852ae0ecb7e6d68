//! Invoice Session Aggregate
//!
//! The cart reconciliation engine. Every cart mutation is mirrored by the
//! inverse stock mutation on the catalog, so for each catalog entry
//! `available_stock + cart quantity` stays equal to the stock seen before the
//! first add. All operations run to completion synchronously and leave the
//! session untouched when they fail.

use crate::domain::aggregates::cart::{Cart, CartError, CartLine};
use crate::domain::aggregates::catalog::{Catalog, CatalogEntry};
use crate::domain::aggregates::invoice::{Customer, Invoice, InvoiceError, InvoiceTotals};
use crate::domain::events::{CartEvent, CatalogEvent, DomainEvent, InvoiceEvent};
use crate::domain::value_objects::{CatalogId, InvoiceNumber};

/// A single cart edit, for callers that drive the session as a state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CartOperation {
    Add { catalog_id: CatalogId, quantity: u32 },
    Update { catalog_id: CatalogId, quantity: u32 },
    Remove { catalog_id: CatalogId },
}

#[derive(Clone, Debug)]
pub struct InvoiceSession {
    catalog: Catalog,
    cart: Cart,
    selected: Option<CatalogId>,
    customer: Customer,
    invoice_number: InvoiceNumber,
    events: Vec<DomainEvent>,
}

impl InvoiceSession {
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        Self::with_invoice_number(entries, InvoiceNumber::generate())
    }

    pub fn with_invoice_number(entries: Vec<CatalogEntry>, invoice_number: InvoiceNumber) -> Self {
        Self {
            catalog: Catalog::new(entries), cart: Cart::new(), selected: None,
            customer: Customer::default(), invoice_number, events: vec![],
        }
    }

    pub fn catalog(&self) -> &Catalog { &self.catalog }
    pub fn cart(&self) -> &Cart { &self.cart }
    pub fn customer(&self) -> &Customer { &self.customer }
    pub fn invoice_number(&self) -> InvoiceNumber { self.invoice_number }
    pub fn totals(&self) -> InvoiceTotals { InvoiceTotals::from_subtotal(self.cart.subtotal()) }

    pub fn set_customer(&mut self, customer: Customer) { self.customer = customer; }

    pub fn select_item(&mut self, catalog_id: CatalogId) -> Result<&CatalogEntry, CartError> {
        let entry = self.catalog.get(catalog_id).ok_or(CartError::NotFound(catalog_id))?;
        self.selected = Some(catalog_id);
        Ok(entry)
    }

    pub fn selected_item(&self) -> Option<&CatalogEntry> { self.selected.and_then(|id| self.catalog.get(id)) }

    /// Add `quantity` units of the currently selected item.
    pub fn add_selected(&mut self, quantity: u32) -> Result<&CartLine, CartError> {
        let catalog_id = self.selected_item().map(|e| e.id).ok_or(CartError::NoSelection)?;
        self.add_to_cart(catalog_id, quantity)
    }

    /// Move `quantity` units from available stock into the cart, merging with
    /// an existing line. Clears the selection on success.
    pub fn add_to_cart(&mut self, catalog_id: CatalogId, quantity: u32) -> Result<&CartLine, CartError> {
        let entry = self.catalog.get(catalog_id).ok_or(CartError::NotFound(catalog_id))?;
        if quantity < 1 || quantity > entry.available_stock {
            return Err(CartError::InvalidQuantity { requested: quantity, available: entry.available_stock });
        }
        let line = CartLine { catalog_id, name: entry.name.clone(), unit_price: entry.unit_price, quantity };
        self.catalog.reserve(catalog_id, quantity)?;
        let line_quantity = self.cart.add_line(line);
        self.selected = None;
        self.raise_event(DomainEvent::Cart(CartEvent::ItemAdded { catalog_id, quantity, line_quantity }));
        self.line(catalog_id)
    }

    /// Set the line quantity outright. The ceiling is the entry's available
    /// stock plus what the line already holds.
    pub fn update_quantity(&mut self, catalog_id: CatalogId, quantity: u32) -> Result<&CartLine, CartError> {
        let current = self.cart.line(catalog_id).map(|l| l.quantity).ok_or(CartError::NotFound(catalog_id))?;
        let effective = self.catalog.available(catalog_id)?.saturating_add(current);
        if quantity < 1 || quantity > effective {
            return Err(CartError::InvalidQuantity { requested: quantity, available: effective });
        }
        self.catalog.set_available(catalog_id, effective - quantity)?;
        let from = self.cart.set_quantity(catalog_id, quantity)?;
        self.raise_event(DomainEvent::Cart(CartEvent::QuantityUpdated { catalog_id, from, to: quantity }));
        self.line(catalog_id)
    }

    /// Drop the line and restock its units. Unknown ids are ignored.
    pub fn remove_from_cart(&mut self, catalog_id: CatalogId) -> Option<CartLine> {
        let line = self.cart.remove_line(catalog_id)?;
        self.catalog.release(catalog_id, line.quantity);
        self.raise_event(DomainEvent::Cart(CartEvent::ItemRemoved { catalog_id, restocked: line.quantity }));
        Some(line)
    }

    pub fn apply(&mut self, operation: CartOperation) -> Result<Option<CartLine>, CartError> {
        match operation {
            CartOperation::Add { catalog_id, quantity } => self.add_to_cart(catalog_id, quantity).map(|l| Some(l.clone())),
            CartOperation::Update { catalog_id, quantity } => self.update_quantity(catalog_id, quantity).map(|l| Some(l.clone())),
            CartOperation::Remove { catalog_id } => Ok(self.remove_from_cart(catalog_id)),
        }
    }

    /// Pure form of [`apply`](Self::apply): consumes the session and hands back the next one.
    pub fn transition(mut self, operation: CartOperation) -> (Self, Result<Option<CartLine>, CartError>) {
        let result = self.apply(operation);
        (self, result)
    }

    /// Replace the catalog mirror with a fresh fetch while keeping the cart.
    /// Units still held by cart lines are netted out of the fetched stock.
    pub fn replace_catalog(&mut self, entries: Vec<CatalogEntry>) {
        let entries = entries.into_iter().map(|e| self.net_held_units(e)).collect::<Vec<_>>();
        let count = entries.len();
        self.catalog.replace(entries);
        self.raise_event(DomainEvent::Catalog(CatalogEvent::Replaced { entries: count }));
    }

    /// Append an entry confirmed by the inventory service.
    pub fn merge_new_catalog_entry(&mut self, entry: CatalogEntry) {
        let catalog_id = entry.id;
        let entry = self.net_held_units(entry);
        self.catalog.merge(entry);
        self.raise_event(DomainEvent::Catalog(CatalogEvent::EntryMerged { catalog_id }));
    }

    /// Subtract the units a cart line holds from incoming stock. A line holding
    /// more than the server now has is cut down to what exists.
    fn net_held_units(&mut self, mut entry: CatalogEntry) -> CatalogEntry {
        let catalog_id = entry.id;
        let held = self.cart.quantity_of(catalog_id);
        if held <= entry.available_stock {
            entry.available_stock -= held;
            return entry;
        }
        let to = entry.available_stock;
        entry.available_stock = 0;
        if to == 0 {
            self.cart.remove_line(catalog_id);
            self.raise_event(DomainEvent::Cart(CartEvent::ItemRemoved { catalog_id, restocked: 0 }));
        } else if let Ok(from) = self.cart.set_quantity(catalog_id, to) {
            self.raise_event(DomainEvent::Cart(CartEvent::QuantityUpdated { catalog_id, from, to }));
        }
        entry
    }

    /// Empty the cart, forget the customer and take a fresh catalog and invoice number.
    pub fn reset_session(&mut self, entries: Vec<CatalogEntry>) {
        self.start_over();
        self.replace_catalog(entries);
    }

    /// Restock every cart line, forget the customer and move to the next
    /// invoice number while keeping the current catalog mirror.
    pub fn start_over(&mut self) {
        let lines = self.cart.clear();
        for line in &lines {
            self.catalog.release(line.catalog_id, line.quantity);
        }
        self.clear_form(lines.len());
    }

    fn clear_form(&mut self, lines: usize) {
        self.selected = None;
        self.customer = Customer::default();
        self.invoice_number = self.invoice_number.next();
        self.raise_event(DomainEvent::Cart(CartEvent::Cleared { lines }));
    }

    pub fn build_invoice(&self) -> Result<Invoice, InvoiceError> {
        Invoice::build(self.invoice_number, self.customer.clone(), self.cart.lines().to_vec())
    }

    /// Record a persisted invoice and release the session for the next one.
    /// The sold units stay out of the catalog mirror.
    pub fn complete_invoice(&mut self, invoice: &Invoice) {
        self.raise_event(DomainEvent::Invoice(InvoiceEvent::Saved {
            invoice_number: invoice.invoice_number(), total: invoice.totals().total,
        }));
        let lines = self.cart.clear();
        self.clear_form(lines.len());
    }

    pub fn take_events(&mut self) -> Vec<DomainEvent> { std::mem::take(&mut self.events) }
    fn raise_event(&mut self, e: DomainEvent) { self.events.push(e); }

    fn line(&self, catalog_id: CatalogId) -> Result<&CartLine, CartError> {
        self.cart.line(catalog_id).ok_or(CartError::NotFound(catalog_id))
    }
}
