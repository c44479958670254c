//! # Damaged Goods Commands
//!
//! Damage records take stock off the product they name; editing or
//! deleting one moves the stock back accordingly.

use stockroom_core::forms::DamageForm;
use stockroom_core::{DamageFilter, DamageRecord, Session};
use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::AppState;

pub async fn list(
    state: &AppState,
    session: &Session,
    filter: &DamageFilter,
) -> Result<Vec<DamageRecord>, ApiError> {
    debug!(user = %session.username, ?filter, "list damage records");
    Ok(state.db().damages().list(filter).await?)
}

/// Records damaged goods and decrements the product's quantity.
pub async fn add(state: &AppState, session: &Session, form: &DamageForm) -> Result<DamageRecord, ApiError> {
    let draft = form.validate()?;
    debug!(user = %session.username, product = %draft.product, qty = draft.qty, "add damage record");

    let record = state.db().damages().insert(&draft).await?;
    info!(id = record.id, product_id = record.product_id, qty = record.qty, "Damage recorded");
    Ok(record)
}

pub async fn update(
    state: &AppState,
    session: &Session,
    id: i64,
    form: &DamageForm,
) -> Result<DamageRecord, ApiError> {
    let draft = form.validate()?;
    debug!(user = %session.username, id, "update damage record");
    Ok(state.db().damages().update(id, &draft).await?)
}

/// Deletes a damage record and restores the quantity it took.
pub async fn delete(state: &AppState, session: &Session, id: i64) -> Result<(), ApiError> {
    state.db().damages().delete(id).await?;
    info!(user = %session.username, id, "Damage record deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::{login_as, state, stocked_product};
    use crate::error::ErrorCode;

    fn form(product: &str, qty: &str) -> DamageForm {
        DamageForm {
            product: product.into(),
            date: "2024-03-10".into(),
            qty: qty.into(),
            reason: "Crushed in transit".into(),
            is_active: true,
        }
    }

    async fn on_hand(state: &AppState, id: i64) -> i64 {
        state.db().products().get_by_id(id).await.unwrap().unwrap().quantity
    }

    #[tokio::test]
    async fn test_damage_moves_stock() {
        let state = state().await;
        let session = login_as(&state, "ada").await;
        let tea = stocked_product(&state, &session, 20).await;

        let record = add(&state, &session, &form("Green Tea", "3")).await.unwrap();
        assert_eq!(on_hand(&state, tea.id).await, 17);

        update(&state, &session, record.id, &form("Green Tea", "1")).await.unwrap();
        assert_eq!(on_hand(&state, tea.id).await, 19);

        let filter = DamageFilter {
            search: "transit".into(),
            ..DamageFilter::default()
        };
        assert_eq!(list(&state, &session, &filter).await.unwrap().len(), 1);

        delete(&state, &session, record.id).await.unwrap();
        assert_eq!(on_hand(&state, tea.id).await, 20);
    }

    #[tokio::test]
    async fn test_invalid_damage_is_rejected() {
        let state = state().await;
        let session = login_as(&state, "ada").await;
        let tea = stocked_product(&state, &session, 20).await;

        let err = add(&state, &session, &form("Green Tea", "0")).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let err = add(&state, &session, &form("Black Tea", "2")).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);

        assert_eq!(on_hand(&state, tea.id).await, 20);
    }
}
