//! # Authentication Commands
//!
//! Self-registration and login. These are the only commands that run
//! without a session; `login` is what produces one.
//!
//! ## Flow
//! ```text
//! stockroom register --first Ada --last Okafor --username ada --password ...
//!      │
//!      ▼
//! users.register()  ── first account ever? ──► role = admin
//!      │                                  └──► role = user
//!      ▼
//! stockroom --user ada --password ... sale add ...
//!      │
//!      ▼
//! login() → Session { user_id, role, ... } → handed to the sale command
//! ```

use stockroom_core::forms::RegistrationForm;
use stockroom_core::{Session, User};
use tracing::info;

use crate::error::ApiError;
use crate::state::AppState;

/// Creates an account. The first account created becomes the admin.
///
/// ## Returns
/// * `Ok(User)` - The new account
/// * `Err(VALIDATION_ERROR)` - A field is blank
/// * `Err(DUPLICATE)` - Username taken
pub async fn register(state: &AppState, form: &RegistrationForm) -> Result<User, ApiError> {
    let registration = form.validate()?;
    let user = state.db().users().register(&registration).await?;
    Ok(user)
}

/// Checks credentials and opens a session.
///
/// ## Returns
/// * `Err(UNAUTHORIZED)` - Unknown user, wrong password or inactive account
pub async fn login(state: &AppState, username: &str, password: &str) -> Result<Session, ApiError> {
    let user = state.db().users().authenticate(username, password).await?;
    let session = Session::new(&user);

    info!(
        session_id = %session.id,
        username = %session.username,
        role = %session.role,
        "Session opened"
    );
    Ok(session)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::state;
    use crate::error::ErrorCode;
    use stockroom_core::Role;

    fn form(username: &str) -> RegistrationForm {
        RegistrationForm {
            first_name: "Ada".into(),
            last_name: "Okafor".into(),
            username: username.into(),
            password: "secret".into(),
        }
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let state = state().await;

        let ada = register(&state, &form("ada")).await.unwrap();
        let ben = register(&state, &form("ben")).await.unwrap();
        assert_eq!(ada.role, Role::Admin);
        assert_eq!(ben.role, Role::User);

        let session = login(&state, "ben", "secret").await.unwrap();
        assert_eq!(session.user_id, ben.id);
        assert_eq!(session.display_name, "Ada Okafor");
        assert!(!session.is_admin());
    }

    #[tokio::test]
    async fn test_register_rejects_blank_and_duplicate() {
        let state = state().await;

        let blank = RegistrationForm {
            password: "  ".into(),
            ..form("ada")
        };
        let err = register(&state, &blank).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(state.db().users().count().await.unwrap(), 0);

        register(&state, &form("ada")).await.unwrap();
        let err = register(&state, &form("ada")).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Duplicate);
    }

    #[tokio::test]
    async fn test_wrong_password_is_unauthorized() {
        let state = state().await;
        register(&state, &form("ada")).await.unwrap();

        let err = login(&state, "ada", "guess").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Unauthorized);
    }
}
