//! Cart Aggregate

use serde::Serialize;
use thiserror::Error;
use crate::domain::value_objects::{CatalogId, Money};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CartLine {
    pub catalog_id: CatalogId,
    pub name: String,
    /// Catalog price at the moment of the first add. Never re-synced.
    pub unit_price: Money,
    pub quantity: u32,
}

impl CartLine {
    pub fn line_total(&self) -> Money { self.unit_price.multiply(self.quantity) }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self { Self::default() }

    pub fn lines(&self) -> &[CartLine] { &self.lines }
    pub fn line(&self, catalog_id: CatalogId) -> Option<&CartLine> { self.lines.iter().find(|l| l.catalog_id == catalog_id) }
    pub fn quantity_of(&self, catalog_id: CatalogId) -> u32 { self.line(catalog_id).map_or(0, |l| l.quantity) }
    pub fn line_count(&self) -> usize { self.lines.len() }
    pub fn is_empty(&self) -> bool { self.lines.is_empty() }
    pub fn subtotal(&self) -> Money { self.lines.iter().map(CartLine::line_total).sum() }

    /// Merge `line` into an existing line for the same catalog id, or push it.
    /// Returns the resulting line quantity.
    pub(crate) fn add_line(&mut self, line: CartLine) -> u32 {
        match self.lines.iter_mut().find(|l| l.catalog_id == line.catalog_id) {
            Some(existing) => {
                existing.quantity += line.quantity;
                existing.quantity
            }
            None => {
                let quantity = line.quantity;
                self.lines.push(line);
                quantity
            }
        }
    }

    pub(crate) fn set_quantity(&mut self, catalog_id: CatalogId, quantity: u32) -> Result<u32, CartError> {
        let line = self.lines.iter_mut().find(|l| l.catalog_id == catalog_id).ok_or(CartError::NotFound(catalog_id))?;
        Ok(std::mem::replace(&mut line.quantity, quantity))
    }

    pub(crate) fn remove_line(&mut self, catalog_id: CatalogId) -> Option<CartLine> {
        let idx = self.lines.iter().position(|l| l.catalog_id == catalog_id)?;
        Some(self.lines.remove(idx))
    }

    pub(crate) fn clear(&mut self) -> Vec<CartLine> { std::mem::take(&mut self.lines) }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    #[error("Please enter valid quantity (Available: {available})")]
    InvalidQuantity { requested: u32, available: u32 },
    #[error("Item {0} not found")]
    NotFound(CatalogId),
    #[error("Please select an item!")]
    NoSelection,
}
