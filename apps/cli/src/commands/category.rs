//! # Category Commands

use stockroom_core::forms::NameForm;
use stockroom_core::{Category, Session};
use tracing::debug;

use crate::error::ApiError;
use crate::state::AppState;

/// Categories whose name contains `search`, by name.
pub async fn list(state: &AppState, session: &Session, search: &str) -> Result<Vec<Category>, ApiError> {
    debug!(user = %session.username, search, "list categories");
    Ok(state.db().categories().list(search).await?)
}

pub async fn add(state: &AppState, session: &Session, form: &NameForm) -> Result<Category, ApiError> {
    let draft = form.validate()?;
    debug!(user = %session.username, name = %draft.name, "add category");
    Ok(state.db().categories().insert(&draft).await?)
}

pub async fn update(
    state: &AppState,
    session: &Session,
    id: i64,
    form: &NameForm,
) -> Result<Category, ApiError> {
    let draft = form.validate()?;
    debug!(user = %session.username, id, "update category");
    Ok(state.db().categories().update(id, &draft).await?)
}
