//! Domain events
use crate::domain::value_objects::{CatalogId, InvoiceNumber, Money};

#[derive(Clone, Debug, PartialEq)]
pub enum DomainEvent {
    Cart(CartEvent),
    Catalog(CatalogEvent),
    Invoice(InvoiceEvent),
}

#[derive(Clone, Debug, PartialEq)]
pub enum CartEvent {
    ItemAdded { catalog_id: CatalogId, quantity: u32, line_quantity: u32 },
    QuantityUpdated { catalog_id: CatalogId, from: u32, to: u32 },
    ItemRemoved { catalog_id: CatalogId, restocked: u32 },
    Cleared { lines: usize },
}

#[derive(Clone, Debug, PartialEq)]
pub enum CatalogEvent {
    Replaced { entries: usize },
    EntryMerged { catalog_id: CatalogId },
}

#[derive(Clone, Debug, PartialEq)]
pub enum InvoiceEvent {
    Saved { invoice_number: InvoiceNumber, total: Money },
}
