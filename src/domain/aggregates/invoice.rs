//! Invoice Aggregate

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::{Validate, ValidationError, ValidationErrors};
use crate::domain::aggregates::cart::CartLine;
use crate::domain::value_objects::{InvoiceNumber, Money, TaxRate};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Customer {
    #[validate(custom = "not_blank")]
    pub name: String,
    #[validate(custom = "not_blank")]
    pub phone: String,
    #[validate(custom = "not_blank", length(max = 500))]
    pub address: String,
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() { Err(ValidationError::new("blank")) } else { Ok(()) }
}

/// Totals derived from cart lines. Never stored on the cart itself.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct InvoiceTotals {
    pub subtotal: Money,
    pub tax: Money,
    pub total: Money,
}

impl InvoiceTotals {
    pub fn from_subtotal(subtotal: Money) -> Self {
        let tax = subtotal.apply_rate(TaxRate::GST);
        Self { subtotal, tax, total: subtotal + tax }
    }

    pub fn from_lines(lines: &[CartLine]) -> Self {
        Self::from_subtotal(lines.iter().map(CartLine::line_total).sum())
    }
}

/// Immutable snapshot handed to persistence and document export.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Invoice {
    invoice_number: InvoiceNumber,
    customer: Customer,
    lines: Vec<CartLine>,
    totals: InvoiceTotals,
    issued_on: NaiveDate,
}

impl Invoice {
    pub fn build(invoice_number: InvoiceNumber, customer: Customer, lines: Vec<CartLine>) -> Result<Self, InvoiceError> {
        if lines.is_empty() { return Err(InvoiceError::EmptyCart); }
        customer.validate()?;
        let totals = InvoiceTotals::from_lines(&lines);
        Ok(Self { invoice_number, customer, lines, totals, issued_on: Local::now().date_naive() })
    }

    pub fn invoice_number(&self) -> InvoiceNumber { self.invoice_number }
    pub fn customer(&self) -> &Customer { &self.customer }
    pub fn lines(&self) -> &[CartLine] { &self.lines }
    pub fn totals(&self) -> &InvoiceTotals { &self.totals }
    pub fn issued_on(&self) -> NaiveDate { self.issued_on }
}

#[derive(Debug, Error)]
pub enum InvoiceError {
    #[error("No items to generate invoice")]
    EmptyCart,
    #[error("Invalid customer details: {0}")]
    InvalidCustomer(#[from] ValidationErrors),
}
