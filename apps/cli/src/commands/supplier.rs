//! # Supplier Commands

use stockroom_core::forms::SupplierForm;
use stockroom_core::{Session, Supplier};
use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::AppState;

pub async fn list(state: &AppState, session: &Session, search: &str) -> Result<Vec<Supplier>, ApiError> {
    debug!(user = %session.username, search, "list suppliers");
    Ok(state.db().suppliers().list(search).await?)
}

pub async fn add(state: &AppState, session: &Session, form: &SupplierForm) -> Result<Supplier, ApiError> {
    let draft = form.validate()?;
    debug!(user = %session.username, name = %draft.name, "add supplier");
    Ok(state.db().suppliers().insert(&draft).await?)
}

pub async fn update(
    state: &AppState,
    session: &Session,
    id: i64,
    form: &SupplierForm,
) -> Result<Supplier, ApiError> {
    let draft = form.validate()?;
    debug!(user = %session.username, id, "update supplier");
    Ok(state.db().suppliers().update(id, &draft).await?)
}

pub async fn delete(state: &AppState, session: &Session, id: i64) -> Result<(), ApiError> {
    state.db().suppliers().delete(id).await?;
    info!(user = %session.username, id, "Supplier deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::{login_as, state};
    use crate::error::ErrorCode;

    fn form(name: &str) -> SupplierForm {
        SupplierForm {
            name: name.into(),
            contact: "Mina Sato".into(),
            phone: "555-0101".into(),
            email: "orders@leafco.example".into(),
            address: "Dock 4".into(),
            is_active: true,
        }
    }

    #[tokio::test]
    async fn test_supplier_lifecycle() {
        let state = state().await;
        let session = login_as(&state, "ada").await;

        let leafco = add(&state, &session, &form("LeafCo")).await.unwrap();
        assert_eq!(list(&state, &session, "mina").await.unwrap().len(), 1);

        let renamed = update(&state, &session, leafco.id, &form("LeafCo Ltd")).await.unwrap();
        assert_eq!(renamed.name, "LeafCo Ltd");

        delete(&state, &session, leafco.id).await.unwrap();
        let err = delete(&state, &session, leafco.id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_every_field_is_required() {
        let state = state().await;
        let session = login_as(&state, "ada").await;

        let no_email = SupplierForm {
            email: String::new(),
            ..form("LeafCo")
        };
        let err = add(&state, &session, &no_email).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.message, "email is required");
    }
}
