//! Tax invoice document rendering.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use tabled::{
    builder::Builder,
    settings::{object::Columns, Alignment, Style},
};

use crate::domain::aggregates::Invoice;
use crate::domain::value_objects::TaxRate;
use crate::services::DocumentExporter;

/// Writes `Invoice-<number>.txt` tax invoices into a directory.
#[derive(Debug, Clone)]
pub struct TextDocumentExporter {
    dir: PathBuf,
    store_name: String,
}

impl TextDocumentExporter {
    pub fn new(dir: impl Into<PathBuf>, store_name: impl Into<String>) -> Self {
        Self { dir: dir.into(), store_name: store_name.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn document_path(&self, invoice: &Invoice) -> PathBuf {
        self.dir.join(format!("Invoice-{}.txt", invoice.invoice_number()))
    }

    pub fn write_to(&self, mut out: impl Write, invoice: &Invoice) -> io::Result<()> {
        let customer = invoice.customer();
        let totals = invoice.totals();
        let rate = TaxRate::GST;

        writeln!(out, "{}", self.store_name)?;
        writeln!(out, "TAX INVOICE")?;
        writeln!(out)?;
        writeln!(out, "Invoice No: {}", invoice.invoice_number())?;
        writeln!(out, "Date: {}", invoice.issued_on().format("%d/%m/%Y"))?;
        writeln!(out, "Customer: {}", customer.name)?;
        writeln!(out, "Phone: {}", customer.phone)?;
        writeln!(out, "Address: {}", customer.address)?;
        writeln!(out)?;

        let mut builder = Builder::default();
        builder.push_record([
            "Item".to_string(),
            "Quantity".to_string(),
            "Unit Price (₹)".to_string(),
            format!("Tax ({rate})"),
            "Total (₹)".to_string(),
        ]);
        for line in invoice.lines() {
            let total = line.line_total();
            builder.push_record([
                line.name.clone(),
                line.quantity.to_string(),
                format!("{:.2}", line.unit_price.rounded()),
                format!("{:.2}", total.apply_rate(rate).rounded()),
                format!("{:.2}", total.rounded()),
            ]);
        }
        let mut table = builder.build();
        table.with(Style::modern_rounded());
        table.modify(Columns::new(1..5), Alignment::right());
        writeln!(out, "{table}")?;
        writeln!(out)?;

        writeln!(out, "Subtotal: {}", totals.subtotal)?;
        writeln!(out, "Tax ({rate} GST): {}", totals.tax)?;
        writeln!(out, "Total: {}", totals.total)?;
        Ok(())
    }

    fn write_file(&self, invoice: &Invoice) -> io::Result<PathBuf> {
        fs::create_dir_all(&self.dir)?;
        let path = self.document_path(invoice);
        let mut out = BufWriter::new(File::create(&path)?);
        self.write_to(&mut out, invoice)?;
        out.flush()?;
        Ok(path)
    }
}

impl DocumentExporter for TextDocumentExporter {
    fn export_document(&self, invoice: &Invoice) {
        match self.write_file(invoice) {
            Ok(path) => tracing::info!(invoice = %invoice.invoice_number(), path = %path.display(), "invoice document written"),
            Err(e) => tracing::warn!(invoice = %invoice.invoice_number(), error = %e, "invoice document export failed"),
        }
    }
}
