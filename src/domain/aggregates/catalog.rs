//! Catalog Aggregate
//!
//! Local mirror of the inventory service's catalog. `available_stock` counts
//! the units not held by any cart line; only the session engine moves stock.

use serde::{Deserialize, Serialize};
use crate::domain::aggregates::cart::CartError;
use crate::domain::value_objects::{CatalogId, Money};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: CatalogId,
    pub name: String,
    #[serde(rename = "price")]
    pub unit_price: Money,
    #[serde(rename = "stock")]
    pub available_stock: u32,
}

impl CatalogEntry {
    pub fn new(id: u64, name: impl Into<String>, unit_price: Money, available_stock: u32) -> Self {
        Self { id: CatalogId::new(id), name: name.into(), unit_price, available_stock }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        let mut catalog = Self::default();
        catalog.replace(entries);
        catalog
    }

    pub fn entries(&self) -> &[CatalogEntry] { &self.entries }
    pub fn len(&self) -> usize { self.entries.len() }
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }
    pub fn get(&self, id: CatalogId) -> Option<&CatalogEntry> { self.entries.iter().find(|e| e.id == id) }

    pub fn available(&self, id: CatalogId) -> Result<u32, CartError> {
        self.get(id).map(|e| e.available_stock).ok_or(CartError::NotFound(id))
    }

    /// Take `qty` units out of the available stock, returning what is left.
    pub(crate) fn reserve(&mut self, id: CatalogId, qty: u32) -> Result<u32, CartError> {
        let entry = self.entry_mut(id)?;
        let remaining = entry.available_stock.checked_sub(qty)
            .ok_or(CartError::InvalidQuantity { requested: qty, available: entry.available_stock })?;
        entry.available_stock = remaining;
        Ok(remaining)
    }

    /// Put `qty` units back. Returns `None` when the entry is no longer mirrored.
    pub(crate) fn release(&mut self, id: CatalogId, qty: u32) -> Option<u32> {
        let entry = self.entry_mut(id).ok()?;
        entry.available_stock = entry.available_stock.saturating_add(qty);
        Some(entry.available_stock)
    }

    pub(crate) fn set_available(&mut self, id: CatalogId, qty: u32) -> Result<(), CartError> {
        self.entry_mut(id)?.available_stock = qty;
        Ok(())
    }

    /// Swap the whole mirror for a fresh fetch result.
    pub fn replace(&mut self, entries: Vec<CatalogEntry>) {
        self.entries.clear();
        entries.into_iter().for_each(|e| self.merge(e));
    }

    /// Append a newly created entry. An entry with a known id overwrites the old one in place.
    pub fn merge(&mut self, entry: CatalogEntry) {
        match self.entries.iter_mut().find(|e| e.id == entry.id) {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
    }

    fn entry_mut(&mut self, id: CatalogId) -> Result<&mut CatalogEntry, CartError> {
        self.entries.iter_mut().find(|e| e.id == id).ok_or(CartError::NotFound(id))
    }
}
