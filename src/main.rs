//! FreshMart Invoicing - point-of-sale invoice desk

use anyhow::Result;
use freshmart_invoicing::{
    api,
    services::{HttpInventoryClient, TextDocumentExporter},
    AppConfig, InvoiceDesk,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry().with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into())).with(tracing_subscriber::fmt::layer()).init();

    let config = AppConfig::from_env()?;
    let inventory = HttpInventoryClient::new(&config.inventory_url, config.request_timeout)?;
    let exporter = TextDocumentExporter::new(&config.invoice_dir, &config.store_name);
    tracing::info!(inventory = %inventory.base_url(), invoices = %exporter.dir().display(), "opening invoice desk");
    let desk = InvoiceDesk::open(inventory, exporter).await;

    let app = api::router(desk);
    tracing::info!("🛒 FreshMart invoicing listening on 0.0.0.0:{}", config.port);
    axum::serve(tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?, app).await?;
    Ok(())
}
