//! # Inventory Command
//!
//! Stock overview: on-hand quantity next to everything damaged and sold.

use stockroom_core::{InventoryLine, Session};
use tracing::debug;

use crate::error::ApiError;
use crate::state::AppState;

pub async fn list(state: &AppState, session: &Session, search: &str) -> Result<Vec<InventoryLine>, ApiError> {
    debug!(user = %session.username, search, "list inventory");
    Ok(state.db().products().inventory(search).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::{login_as, state, stocked_product};
    use crate::commands::{damage, sale};
    use stockroom_core::forms::{DamageForm, SaleForm};

    #[tokio::test]
    async fn test_inventory_totals() {
        let state = state().await;
        let session = login_as(&state, "ada").await;
        let tea = stocked_product(&state, &session, 20).await;

        let sold = SaleForm {
            receipt_no: "R-1".into(),
            date: "2024-03-09".into(),
            product: tea.id.to_string(),
            qty: "5".into(),
            notes: String::new(),
            is_active: true,
        };
        sale::add(&state, &session, &sold).await.unwrap();

        let damaged = DamageForm {
            product: "Green Tea".into(),
            date: "2024-03-10".into(),
            qty: "2".into(),
            reason: "Torn bag".into(),
            is_active: true,
        };
        damage::add(&state, &session, &damaged).await.unwrap();

        let lines = list(&state, &session, "green").await.unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].quantity, 13);
        assert_eq!(lines[0].sold, 5);
        assert_eq!(lines[0].damaged, 2);
        assert_eq!(lines[0].category_name.as_deref(), Some("Beverages"));
    }
}
