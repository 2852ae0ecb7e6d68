//! HTTP surface for the invoice desk.
//!
//! One desk sits behind a mutex, so requests are applied one at a time and
//! no request observes another's partial state.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::desk::InvoiceDesk;
use crate::domain::aggregates::{CartError, CatalogEntry, Customer, Invoice, InvoiceError};
use crate::domain::value_objects::{CatalogId, InvoiceNumber, Money};
use crate::services::{DocumentExporter, InventoryService, NewCatalogItem};
use crate::InvoicingError;

pub struct AppState<S, D> {
    pub desk: Arc<Mutex<InvoiceDesk<S, D>>>,
}

impl<S, D> Clone for AppState<S, D> {
    fn clone(&self) -> Self { Self { desk: Arc::clone(&self.desk) } }
}

pub fn router<S, D>(desk: InvoiceDesk<S, D>) -> Router
where
    S: InventoryService + 'static,
    D: DocumentExporter + 'static,
{
    let state = AppState { desk: Arc::new(Mutex::new(desk)) };
    Router::new()
        .route("/health", get(|| async { Json(serde_json::json!({"status": "healthy", "service": "freshmart-invoicing"})) }))
        .route("/api/v1/catalog", get(get_catalog::<S, D>).post(create_catalog_item::<S, D>))
        .route("/api/v1/catalog/refresh", post(refresh_catalog::<S, D>))
        .route("/api/v1/catalog/select", post(select_item::<S, D>))
        .route("/api/v1/cart", get(get_cart::<S, D>).post(add_to_cart::<S, D>))
        .route("/api/v1/cart/selected", post(add_selected::<S, D>))
        .route("/api/v1/cart/:id", put(update_quantity::<S, D>).delete(remove_from_cart::<S, D>))
        .route("/api/v1/customer", put(set_customer::<S, D>))
        .route("/api/v1/invoice", post(save_invoice::<S, D>))
        .route("/api/v1/reset", post(reset::<S, D>))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// =============================================================================
// Views
// =============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct CatalogView {
    pub entries: Vec<CatalogEntry>,
    pub selected: Option<CatalogEntry>,
    pub error: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CartLineView {
    pub catalog_id: CatalogId,
    pub name: String,
    pub unit_price: Money,
    pub quantity: u32,
    pub line_total: Money,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CartView {
    pub invoice_number: String,
    pub customer: Customer,
    pub lines: Vec<CartLineView>,
    pub subtotal: Money,
    pub tax: Money,
    pub total: Money,
    pub error: Option<String>,
}

fn catalog_view<S: InventoryService, D: DocumentExporter>(desk: &InvoiceDesk<S, D>) -> CatalogView {
    let session = desk.session();
    CatalogView {
        entries: session.catalog().entries().to_vec(),
        selected: session.selected_item().cloned(),
        error: desk.last_error().map(str::to_string),
    }
}

fn cart_view<S: InventoryService, D: DocumentExporter>(desk: &InvoiceDesk<S, D>) -> CartView {
    let session = desk.session();
    let totals = session.totals();
    CartView {
        invoice_number: session.invoice_number().to_string(),
        customer: session.customer().clone(),
        lines: session.cart().lines().iter().map(|l| CartLineView {
            catalog_id: l.catalog_id, name: l.name.clone(), unit_price: l.unit_price,
            quantity: l.quantity, line_total: l.line_total(),
        }).collect(),
        subtotal: totals.subtotal,
        tax: totals.tax,
        total: totals.total,
        error: desk.last_error().map(str::to_string),
    }
}

// =============================================================================
// Errors
// =============================================================================

pub struct ApiError(InvoicingError);

impl From<InvoicingError> for ApiError {
    fn from(e: InvoicingError) -> Self { Self(e) }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            InvoicingError::Cart(CartError::InvalidQuantity { .. })
            | InvoicingError::InvalidItem(_)
            | InvoicingError::Invoice(InvoiceError::InvalidCustomer(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            InvoicingError::Cart(CartError::NotFound(_)) => StatusCode::NOT_FOUND,
            InvoicingError::Cart(CartError::NoSelection) | InvoicingError::Invoice(InvoiceError::EmptyCart) => StatusCode::BAD_REQUEST,
            InvoicingError::Service(_) => StatusCode::BAD_GATEWAY,
            InvoicingError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(serde_json::json!({ "error": self.0.to_string() }))).into_response()
    }
}

// =============================================================================
// Handlers
// =============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct AddToCartRequest { pub catalog_id: CatalogId, pub quantity: u32 }

#[derive(Debug, Serialize, Deserialize)]
pub struct QuantityRequest { pub quantity: u32 }

#[derive(Debug, Serialize, Deserialize)]
pub struct SelectRequest { pub catalog_id: CatalogId }

#[derive(Debug, Serialize)]
pub struct SavedInvoice { pub invoice_number: InvoiceNumber, pub invoice: Invoice, pub next_invoice_number: InvoiceNumber }

async fn get_catalog<S: InventoryService, D: DocumentExporter>(State(s): State<AppState<S, D>>) -> Json<CatalogView> {
    Json(catalog_view(&*s.desk.lock().await))
}

async fn create_catalog_item<S: InventoryService, D: DocumentExporter>(State(s): State<AppState<S, D>>, Json(r): Json<NewCatalogItem>) -> Result<(StatusCode, Json<CatalogEntry>), ApiError> {
    let entry = s.desk.lock().await.create_catalog_item(r).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

async fn refresh_catalog<S: InventoryService, D: DocumentExporter>(State(s): State<AppState<S, D>>) -> Result<Json<CatalogView>, ApiError> {
    let mut desk = s.desk.lock().await;
    desk.load_catalog().await?;
    Ok(Json(catalog_view(&*desk)))
}

async fn select_item<S: InventoryService, D: DocumentExporter>(State(s): State<AppState<S, D>>, Json(r): Json<SelectRequest>) -> Result<Json<CatalogEntry>, ApiError> {
    Ok(Json(s.desk.lock().await.select_item(r.catalog_id)?))
}

async fn get_cart<S: InventoryService, D: DocumentExporter>(State(s): State<AppState<S, D>>) -> Json<CartView> {
    Json(cart_view(&*s.desk.lock().await))
}

async fn add_to_cart<S: InventoryService, D: DocumentExporter>(State(s): State<AppState<S, D>>, Json(r): Json<AddToCartRequest>) -> Result<(StatusCode, Json<CartView>), ApiError> {
    let mut desk = s.desk.lock().await;
    desk.add_to_cart(r.catalog_id, r.quantity)?;
    Ok((StatusCode::CREATED, Json(cart_view(&*desk))))
}

async fn add_selected<S: InventoryService, D: DocumentExporter>(State(s): State<AppState<S, D>>, Json(r): Json<QuantityRequest>) -> Result<Json<CartView>, ApiError> {
    let mut desk = s.desk.lock().await;
    desk.add_selected(r.quantity)?;
    Ok(Json(cart_view(&*desk)))
}

async fn update_quantity<S: InventoryService, D: DocumentExporter>(State(s): State<AppState<S, D>>, Path(id): Path<u64>, Json(r): Json<QuantityRequest>) -> Result<Json<CartView>, ApiError> {
    let mut desk = s.desk.lock().await;
    desk.update_quantity(CatalogId::new(id), r.quantity)?;
    Ok(Json(cart_view(&*desk)))
}

async fn remove_from_cart<S: InventoryService, D: DocumentExporter>(State(s): State<AppState<S, D>>, Path(id): Path<u64>) -> Json<CartView> {
    let mut desk = s.desk.lock().await;
    desk.remove_from_cart(CatalogId::new(id));
    Json(cart_view(&*desk))
}

async fn set_customer<S: InventoryService, D: DocumentExporter>(State(s): State<AppState<S, D>>, Json(r): Json<Customer>) -> Json<CartView> {
    let mut desk = s.desk.lock().await;
    desk.set_customer(r);
    Json(cart_view(&*desk))
}

async fn save_invoice<S: InventoryService, D: DocumentExporter>(State(s): State<AppState<S, D>>) -> Result<(StatusCode, Json<SavedInvoice>), ApiError> {
    let mut desk = s.desk.lock().await;
    let invoice = desk.save_invoice().await?;
    let saved = SavedInvoice {
        invoice_number: invoice.invoice_number(),
        next_invoice_number: desk.session().invoice_number(),
        invoice,
    };
    Ok((StatusCode::CREATED, Json(saved)))
}

async fn reset<S: InventoryService, D: DocumentExporter>(State(s): State<AppState<S, D>>) -> Result<Json<CartView>, ApiError> {
    let mut desk = s.desk.lock().await;
    desk.reset().await?;
    Ok(Json(cart_view(&*desk)))
}
