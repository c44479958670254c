//! # Sale Commands
//!
//! Recording, editing and deleting sales. Every stock movement happens in
//! the same transaction as the sale row it belongs to.
//!
//! ## Permissions
//! ```text
//! ┌──────────────┬──────────┬──────────┐
//! │  Operation   │  user    │  admin   │
//! ├──────────────┼──────────┼──────────┤
//! │  list        │   ✓      │   ✓      │
//! │  add         │   ✓      │   ✓      │
//! │  update      │   ✗      │   ✓      │
//! │  delete      │   ✗      │   ✓      │
//! └──────────────┴──────────┴──────────┘
//! ```
//!
//! Unit cost is shown to admin sessions only.

use chrono::{Local, NaiveDate};
use serde::Serialize;
use std::path::PathBuf;
use stockroom_core::forms::{SaleEditForm, SaleForm};
use stockroom_core::{Sale, SaleFilter, Session};
use tracing::{debug, info};

use crate::error::ApiError;
use crate::export::ListExport;
use crate::state::AppState;

/// Sale as shown to the operator.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleDto {
    pub id: i64,
    pub receipt_no: String,
    pub date: NaiveDate,
    pub product_id: i64,
    pub product_name: String,
    pub qty: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_cost_cents: Option<i64>,
    pub unit_price_cents: i64,
    pub total_cents: i64,
    pub notes: String,
    pub is_active: bool,
}

impl SaleDto {
    /// ## Returns
    /// * `Err(VALIDATION_ERROR)` - `qty × price` does not fit in `i64` cents
    pub fn for_session(sale: Sale, session: &Session) -> Result<Self, ApiError> {
        let total_cents = sale.total()?.cents();
        Ok(SaleDto {
            id: sale.id,
            receipt_no: sale.receipt_no,
            date: sale.date,
            product_id: sale.product_id,
            product_name: sale.product_name,
            qty: sale.qty,
            unit_cost_cents: session.is_admin().then_some(sale.unit_cost_cents),
            unit_price_cents: sale.unit_price_cents,
            total_cents,
            notes: sale.notes,
            is_active: sale.is_active,
        })
    }
}

/// Sales matching the filter, newest first.
pub async fn list(state: &AppState, session: &Session, filter: &SaleFilter) -> Result<Vec<SaleDto>, ApiError> {
    debug!(user = %session.username, ?filter, "list sales");

    let sales = state.db().sales().list(filter).await?;
    sales
        .into_iter()
        .map(|s| SaleDto::for_session(s, session))
        .collect()
}

/// Writes the filtered sales list to `sales_<timestamp>.txt` in the
/// reports directory.
///
/// ## Returns
/// * `Ok(path)` - The written file
/// * `Err(VALIDATION_ERROR)` - Nothing matches the filter ("No data to export")
pub async fn export(state: &AppState, session: &Session, filter: &SaleFilter) -> Result<PathBuf, ApiError> {
    let sales = list(state, session, filter).await?;
    let path = ListExport::new("sales", "Sales", Local::now().naive_local()).write(
        &sales,
        state.config(),
        &state.config().reports_dir,
    )?;

    info!(user = %session.username, path = %path.display(), "Sales exported");
    Ok(path)
}

/// Records a sale and removes the sold quantity from stock.
///
/// ## Returns
/// * `Err(VALIDATION_ERROR)` - Bad date, product reference, or qty ≤ 0
/// * `Err(NOT_FOUND)` - Product does not exist; nothing is written
/// * `Err(INSUFFICIENT_STOCK)` - Negative stock is disabled and qty exceeds on-hand
pub async fn add(state: &AppState, session: &Session, form: &SaleForm) -> Result<SaleDto, ApiError> {
    let draft = form.validate()?;
    debug!(user = %session.username, product_id = draft.product_id, qty = draft.qty, "add sale");

    let sale = SaleDto::for_session(state.db().sales().record(&draft).await?, session)?;
    info!(
        user = %session.username,
        id = sale.id,
        receipt_no = %sale.receipt_no,
        total_cents = sale.total_cents,
        "Sale recorded"
    );
    Ok(sale)
}

/// Edits a sale; a quantity change adjusts stock by the difference.
pub async fn update(
    state: &AppState,
    session: &Session,
    id: i64,
    form: &SaleEditForm,
) -> Result<SaleDto, ApiError> {
    session.require_admin("update sale")?;
    let edit = form.validate()?;

    let sale = state.db().sales().update(id, &edit).await?;
    info!(user = %session.username, id, qty = sale.qty, "Sale updated");
    SaleDto::for_session(sale, session)
}

/// Deletes a sale. Stock is returned only when `restock` is set.
pub async fn delete(state: &AppState, session: &Session, id: i64, restock: bool) -> Result<(), ApiError> {
    session.require_admin("delete sale")?;

    state.db().sales().delete(id, restock).await?;
    info!(user = %session.username, id, restock, "Sale deleted");
    Ok(())
}
