//! # Debt Commands

use stockroom_core::forms::DebtForm;
use stockroom_core::{Debt, DebtFilter, Session};
use tracing::debug;

use crate::error::ApiError;
use crate::state::AppState;

/// Debts matching the filter, by due date.
pub async fn list(state: &AppState, session: &Session, filter: &DebtFilter) -> Result<Vec<Debt>, ApiError> {
    debug!(user = %session.username, ?filter, "list debts");
    Ok(state.db().debts().list(filter).await?)
}

pub async fn add(state: &AppState, session: &Session, form: &DebtForm) -> Result<Debt, ApiError> {
    let draft = form.validate()?;
    debug!(user = %session.username, name = %draft.name, "add debt");
    Ok(state.db().debts().insert(&draft).await?)
}

pub async fn update(state: &AppState, session: &Session, id: i64, form: &DebtForm) -> Result<Debt, ApiError> {
    let draft = form.validate()?;
    debug!(user = %session.username, id, "update debt");
    Ok(state.db().debts().update(id, &draft).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::{login_as, state};
    use chrono::NaiveDate;
    use stockroom_core::ActiveFilter;

    fn form(name: &str, due: &str, status: &str) -> DebtForm {
        DebtForm {
            name: name.into(),
            amount: "120.00".into(),
            due_date: due.into(),
            status: status.into(),
            is_active: true,
        }
    }

    #[tokio::test]
    async fn test_debts_filter_and_order() {
        let state = state().await;
        let session = login_as(&state, "ada").await;

        add(&state, &session, &form("LeafCo", "2024-05-01", "open")).await.unwrap();
        let dairy = add(&state, &session, &form("Dairy Farm", "2024-04-01", "open")).await.unwrap();
        add(&state, &session, &form("Print Shop", "2024-04-15", "paid")).await.unwrap();

        let all = list(&state, &session, &DebtFilter::default()).await.unwrap();
        let names: Vec<_> = all.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["Dairy Farm", "Print Shop", "LeafCo"]);

        let open = DebtFilter {
            search: "open".into(),
            ..DebtFilter::default()
        };
        assert_eq!(list(&state, &session, &open).await.unwrap().len(), 2);

        let due = DebtFilter {
            due_date: NaiveDate::from_ymd_opt(2024, 4, 1),
            ..DebtFilter::default()
        };
        assert_eq!(list(&state, &session, &due).await.unwrap()[0].id, dairy.id);

        let settled = DebtForm {
            is_active: false,
            ..form("Dairy Farm", "2024-04-01", "paid")
        };
        update(&state, &session, dairy.id, &settled).await.unwrap();

        let active = DebtFilter {
            active: ActiveFilter::Active,
            ..DebtFilter::default()
        };
        assert_eq!(list(&state, &session, &active).await.unwrap().len(), 2);
    }
}
