//! # Product Commands
//!
//! Product CRUD. Category and warehouse are entered by name and resolved
//! against active rows inside the write transaction:
//!
//! ```text
//! stockroom product add --sku TEA-01 --category Beverages --warehouse Main ...
//!      │
//!      ▼
//! ProductForm::validate()           ← sku format, money, integer quantity
//!      │
//!      ▼
//! BEGIN
//!   categories WHERE name = 'Beverages' AND is_active  → id | NOT_FOUND
//!   warehouses WHERE name = 'Main' AND is_active       → id | NOT_FOUND
//!   INSERT INTO products ...                           → DUPLICATE on sku
//! COMMIT
//! ```

use chrono::{DateTime, Local, Utc};
use serde::Serialize;
use std::path::PathBuf;
use stockroom_core::forms::ProductForm;
use stockroom_core::{Product, Session};
use tracing::{debug, info};

use crate::error::ApiError;
use crate::export::ListExport;
use crate::state::AppState;

/// Product as shown to the operator.
///
/// ## Why DTO?
/// Unit cost is margin information; only admin sessions see it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDto {
    pub id: i64,
    pub sku: String,
    pub name: String,
    pub description: Option<String>,
    pub category_name: Option<String>,
    pub warehouse_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost_cents: Option<i64>,
    pub price_cents: i64,
    pub quantity: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_active: bool,
}

impl ProductDto {
    pub fn for_session(product: Product, session: &Session) -> Self {
        ProductDto {
            id: product.id,
            sku: product.sku,
            name: product.name,
            description: product.description,
            category_name: product.category_name,
            warehouse_name: product.warehouse_name,
            cost_cents: session.is_admin().then_some(product.cost_cents),
            price_cents: product.price_cents,
            quantity: product.quantity,
            created_at: product.created_at,
            updated_at: product.updated_at,
            is_active: product.is_active,
        }
    }
}

/// Products whose name or SKU contains `search`, by id.
pub async fn list(state: &AppState, session: &Session, search: &str) -> Result<Vec<ProductDto>, ApiError> {
    debug!(user = %session.username, search, "list products");

    let products = state.db().products().list(search).await?;
    Ok(products
        .into_iter()
        .map(|p| ProductDto::for_session(p, session))
        .collect())
}

/// Writes the product list (same filter and columns as `list`) to
/// `products_<timestamp>.txt` in the reports directory.
///
/// ## Returns
/// * `Err(VALIDATION_ERROR)` - No product matches ("No data to export")
pub async fn export(state: &AppState, session: &Session, search: &str) -> Result<PathBuf, ApiError> {
    let products = list(state, session, search).await?;
    let path = ListExport::new("products", "Products", Local::now().naive_local()).write(
        &products,
        state.config(),
        &state.config().reports_dir,
    )?;

    info!(user = %session.username, path = %path.display(), "Products exported");
    Ok(path)
}

pub async fn get(state: &AppState, session: &Session, id: i64) -> Result<ProductDto, ApiError> {
    let product = state
        .db()
        .products()
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Product", &id.to_string()))?;

    Ok(ProductDto::for_session(product, session))
}

pub async fn add(state: &AppState, session: &Session, form: &ProductForm) -> Result<ProductDto, ApiError> {
    let draft = form.validate()?;
    debug!(user = %session.username, sku = %draft.sku, "add product");

    let product = state.db().products().insert(&draft).await?;
    info!(user = %session.username, id = product.id, sku = %product.sku, "Product added");
    Ok(ProductDto::for_session(product, session))
}

pub async fn update(
    state: &AppState,
    session: &Session,
    id: i64,
    form: &ProductForm,
) -> Result<ProductDto, ApiError> {
    let draft = form.validate()?;
    debug!(user = %session.username, id, "update product");

    let product = state.db().products().update(id, &draft).await?;
    Ok(ProductDto::for_session(product, session))
}

/// Deletes a product. Fails with `IN_USE` while sales or damage records
/// reference it; deactivate it instead.
pub async fn delete(state: &AppState, session: &Session, id: i64) -> Result<(), ApiError> {
    state.db().products().delete(id).await?;
    info!(user = %session.username, id, "Product deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::{login_as, state, stocked_product};
    use crate::config::AppConfig;
    use crate::error::ErrorCode;

    fn form(sku: &str, category: &str) -> ProductForm {
        ProductForm {
            sku: sku.into(),
            name: "Rooibos".into(),
            description: "Loose leaf".into(),
            category: category.into(),
            warehouse: "Main".into(),
            cost: "0.75".into(),
            price: "2.50".into(),
            quantity: "40".into(),
            is_active: true,
        }
    }

    #[tokio::test]
    async fn test_cost_is_admin_only() {
        let state = state().await;
        let admin = login_as(&state, "ada").await;
        let clerk = login_as(&state, "ben").await;
        let tea = stocked_product(&state, &admin, 20).await;

        let seen_by_admin = get(&state, &admin, tea.id).await.unwrap();
        let seen_by_clerk = get(&state, &clerk, tea.id).await.unwrap();
        assert_eq!(seen_by_admin.cost_cents, Some(120));
        assert_eq!(seen_by_clerk.cost_cents, None);
        assert_eq!(seen_by_clerk.category_name.as_deref(), Some("Beverages"));
    }

    #[tokio::test]
    async fn test_unknown_category_aborts_insert() {
        let state = state().await;
        let session = login_as(&state, "ada").await;
        stocked_product(&state, &session, 20).await;

        let err = add(&state, &session, &form("TEA-02", "Snacks")).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(list(&state, &session, "").await.unwrap().len(), 1);

        let err = add(&state, &session, &form("TEA-01", "Beverages")).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Duplicate);

        let rooibos = add(&state, &session, &form("TEA-02", "Beverages")).await.unwrap();
        assert_eq!(rooibos.description.as_deref(), Some("Loose leaf"));
        assert_eq!(list(&state, &session, "tea-0").await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_sold_product_is_in_use() {
        let state = state().await;
        let session = login_as(&state, "ada").await;
        let tea = stocked_product(&state, &session, 20).await;

        let sale = stockroom_core::forms::SaleForm {
            receipt_no: "R-1".into(),
            date: "2024-03-09".into(),
            product: tea.id.to_string(),
            qty: "1".into(),
            notes: String::new(),
            is_active: true,
        };
        crate::commands::sale::add(&state, &session, &sale).await.unwrap();

        let err = delete(&state, &session, tea.id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::InUse);
    }

    #[tokio::test]
    async fn test_opening_stock_limit() {
        let state = state().await;
        let session = login_as(&state, "ada").await;
        stocked_product(&state, &session, 20).await;

        let mut huge = form("TEA-02", "Beverages");
        huge.quantity = i64::MAX.to_string();
        let err = add(&state, &session, &huge).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        huge.quantity = "1000000000".into();
        huge.price = "10000000.01".into();
        let err = add(&state, &session, &huge).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        huge.price = "10000000.00".into();
        let product = add(&state, &session, &huge).await.unwrap();
        assert_eq!(product.quantity, 1_000_000_000);
    }

    #[tokio::test]
    async fn test_export_product_list() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            reports_dir: dir.path().join("exports"),
            ..AppConfig::with_database_path(":memory:")
        };
        let state = AppState::in_memory(config).await;
        let session = login_as(&state, "ada").await;

        let err = export(&state, &session, "").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.message, "No data to export");
        assert!(!dir.path().join("exports").exists());

        stocked_product(&state, &session, 20).await;
        add(&state, &session, &form("TEA-02", "Beverages")).await.unwrap();

        let path = export(&state, &session, "TEA-02").await.unwrap();
        assert_eq!(path.parent(), Some(dir.path().join("exports").as_path()));
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("products_") && name.ends_with(".txt"));

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("Products"));
        assert!(text.contains("Rooibos"));
        assert!(!text.contains("Green Tea"));
    }
}
