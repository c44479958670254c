//! # Account Management Commands
//!
//! Admin sessions only. Passwords are re-hashed on update only when a new
//! one is supplied.

use stockroom_core::forms::UserForm;
use stockroom_core::{Session, User};
use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::AppState;

pub async fn list(state: &AppState, session: &Session, search: &str) -> Result<Vec<User>, ApiError> {
    session.require_admin("list users")?;
    debug!(user = %session.username, search, "list users");
    Ok(state.db().users().list(search).await?)
}

pub async fn add(state: &AppState, session: &Session, form: &UserForm) -> Result<User, ApiError> {
    session.require_admin("add user")?;
    let draft = form.validate_new()?;

    let user = state.db().users().insert(&draft).await?;
    info!(by = %session.username, id = user.id, username = %user.username, "User added");
    Ok(user)
}

pub async fn update(state: &AppState, session: &Session, id: i64, form: &UserForm) -> Result<User, ApiError> {
    session.require_admin("update user")?;
    let draft = form.validate_update()?;

    let user = state.db().users().update(id, &draft).await?;
    info!(by = %session.username, id, password_changed = draft.password.is_some(), "User updated");
    Ok(user)
}

pub async fn delete(state: &AppState, session: &Session, id: i64) -> Result<(), ApiError> {
    session.require_admin("delete user")?;

    state.db().users().delete(id).await?;
    info!(by = %session.username, id, "User deleted");
    Ok(())
}
