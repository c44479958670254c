//! # Expense Commands

use stockroom_core::forms::ExpenseForm;
use stockroom_core::{Expense, Session};
use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::AppState;

/// Expenses whose date or description contains `search`, by id.
pub async fn list(state: &AppState, session: &Session, search: &str) -> Result<Vec<Expense>, ApiError> {
    debug!(user = %session.username, search, "list expenses");
    Ok(state.db().expenses().list(search).await?)
}

/// Records an expense against a department given by name.
pub async fn add(state: &AppState, session: &Session, form: &ExpenseForm) -> Result<Expense, ApiError> {
    let draft = form.validate()?;
    debug!(user = %session.username, department = %draft.department, "add expense");

    let expense = state.db().expenses().insert(&draft).await?;
    info!(id = expense.id, amount = %expense.amount(), "Expense recorded");
    Ok(expense)
}

pub async fn update(
    state: &AppState,
    session: &Session,
    id: i64,
    form: &ExpenseForm,
) -> Result<Expense, ApiError> {
    let draft = form.validate()?;
    debug!(user = %session.username, id, "update expense");
    Ok(state.db().expenses().update(id, &draft).await?)
}

pub async fn delete(state: &AppState, session: &Session, id: i64) -> Result<(), ApiError> {
    state.db().expenses().delete(id).await?;
    info!(user = %session.username, id, "Expense deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::department;
    use crate::commands::test_support::{login_as, state};
    use crate::error::ErrorCode;
    use stockroom_core::forms::NameForm;

    fn form(department: &str, amount: &str) -> ExpenseForm {
        ExpenseForm {
            date: "2024-03-01".into(),
            department: department.into(),
            description: "March rent".into(),
            amount: amount.into(),
            is_active: true,
        }
    }

    #[tokio::test]
    async fn test_expense_needs_known_department() {
        let state = state().await;
        let session = login_as(&state, "ada").await;

        let err = add(&state, &session, &form("Operations", "250.00")).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);

        department::add(&state, &session, &NameForm::new("Operations")).await.unwrap();
        let rent = add(&state, &session, &form("Operations", "250.00")).await.unwrap();
        assert_eq!(rent.amount_cents, 25_000);
        assert_eq!(rent.department_name.as_deref(), Some("Operations"));

        assert_eq!(list(&state, &session, "2024-03").await.unwrap().len(), 1);
        assert!(list(&state, &session, "payroll").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_amount_must_be_money() {
        let state = state().await;
        let session = login_as(&state, "ada").await;
        department::add(&state, &session, &NameForm::new("Operations")).await.unwrap();

        let err = add(&state, &session, &form("Operations", "a lot")).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }
}
