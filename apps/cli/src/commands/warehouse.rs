//! # Warehouse Commands

use stockroom_core::forms::WarehouseForm;
use stockroom_core::{Session, Warehouse};
use tracing::debug;

use crate::error::ApiError;
use crate::state::AppState;

/// Warehouses whose name or location contains `search`, by id.
pub async fn list(state: &AppState, session: &Session, search: &str) -> Result<Vec<Warehouse>, ApiError> {
    debug!(user = %session.username, search, "list warehouses");
    Ok(state.db().warehouses().list(search).await?)
}

pub async fn add(state: &AppState, session: &Session, form: &WarehouseForm) -> Result<Warehouse, ApiError> {
    let draft = form.validate()?;
    debug!(user = %session.username, name = %draft.name, "add warehouse");
    Ok(state.db().warehouses().insert(&draft).await?)
}

pub async fn update(
    state: &AppState,
    session: &Session,
    id: i64,
    form: &WarehouseForm,
) -> Result<Warehouse, ApiError> {
    let draft = form.validate()?;
    debug!(user = %session.username, id, "update warehouse");
    Ok(state.db().warehouses().update(id, &draft).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::{login_as, state};
    use crate::error::ErrorCode;

    #[tokio::test]
    async fn test_capacity_must_be_a_number() {
        let state = state().await;
        let session = login_as(&state, "ada").await;

        let form = WarehouseForm {
            name: "Main".into(),
            location: "Harbour Road 1".into(),
            capacity: "lots".into(),
            is_active: true,
        };
        let err = add(&state, &session, &form).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let form = WarehouseForm {
            capacity: "5000".into(),
            ..form
        };
        let main = add(&state, &session, &form).await.unwrap();
        assert_eq!(main.capacity, 5000);
        assert_eq!(list(&state, &session, "harbour").await.unwrap().len(), 1);
    }
}
