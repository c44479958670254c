//! # Department Commands

use stockroom_core::forms::NameForm;
use stockroom_core::{Department, Session};
use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::AppState;

pub async fn list(state: &AppState, session: &Session, search: &str) -> Result<Vec<Department>, ApiError> {
    debug!(user = %session.username, search, "list departments");
    Ok(state.db().departments().list(search).await?)
}

pub async fn add(state: &AppState, session: &Session, form: &NameForm) -> Result<Department, ApiError> {
    let draft = form.validate()?;
    debug!(user = %session.username, name = %draft.name, "add department");
    Ok(state.db().departments().insert(&draft).await?)
}

pub async fn update(
    state: &AppState,
    session: &Session,
    id: i64,
    form: &NameForm,
) -> Result<Department, ApiError> {
    let draft = form.validate()?;
    debug!(user = %session.username, id, "update department");
    Ok(state.db().departments().update(id, &draft).await?)
}

/// Deletes a department. Fails with `IN_USE` while expenses reference it.
pub async fn delete(state: &AppState, session: &Session, id: i64) -> Result<(), ApiError> {
    state.db().departments().delete(id).await?;
    info!(user = %session.username, id, "Department deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::expense;
    use crate::commands::test_support::{login_as, state};
    use crate::error::ErrorCode;
    use stockroom_core::forms::ExpenseForm;

    #[tokio::test]
    async fn test_department_in_use_cannot_be_deleted() {
        let state = state().await;
        let session = login_as(&state, "ada").await;

        let ops = add(&state, &session, &NameForm::new("Operations")).await.unwrap();
        let expense = ExpenseForm {
            date: "2024-03-01".into(),
            department: "Operations".into(),
            description: "Rent".into(),
            amount: "250.00".into(),
            is_active: true,
        };
        expense::add(&state, &session, &expense).await.unwrap();

        let err = delete(&state, &session, ops.id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::InUse);

        let spare = add(&state, &session, &NameForm::new("Marketing")).await.unwrap();
        delete(&state, &session, spare.id).await.unwrap();
        assert_eq!(list(&state, &session, "").await.unwrap().len(), 1);
    }
}
